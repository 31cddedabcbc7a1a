//! Update builder types for entity mutations.
//!
//! Each builder produces an update struct with `Option` fields. Only `Some` fields
//! generate SET clauses in the dynamic UPDATE SQL, and the same fields make up
//! the before/after snapshots written to the audit log.

pub mod entry;
