//! Entity structs for all Shift domain objects.
//!
//! Each entity maps to a table in the libSQL database (see
//! `shift-db/migrations/001_initial.sql`). All structs derive `Serialize`,
//! `Deserialize`, and `JsonSchema` so reporting consumers can read them as JSON.

mod audit;
mod correction;
mod employee;
mod time_entry;

pub use audit::AuditLogEntry;
pub use correction::CorrectionRequest;
pub use employee::Employee;
pub use time_entry::TimeEntry;
