//! ID prefix constants.
//!
//! IDs are generated in SQL as `{prefix}-{8 hex chars}` (see
//! `ShiftDb::generate_id`).

pub const PREFIX_EMPLOYEE: &str = "emp";
pub const PREFIX_TIME_ENTRY: &str = "ent";
pub const PREFIX_CORRECTION: &str = "cor";
pub const PREFIX_AUDIT: &str = "aud";

pub const ALL_PREFIXES: &[&str] = &[
    PREFIX_EMPLOYEE,
    PREFIX_TIME_ENTRY,
    PREFIX_CORRECTION,
    PREFIX_AUDIT,
];
