mod audit;
mod correction;
mod employee;
mod entry;

pub use audit::{AuditCommands, AuditFilterArgs};
pub use correction::CorrectionCommands;
pub use employee::EmployeeCommands;
pub use entry::EntryCommands;
