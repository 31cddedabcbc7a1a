use clap::{Args, Subcommand};

use crate::cli::subcommands::{AuditCommands, CorrectionCommands, EmployeeCommands, EntryCommands};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Employee directory.
    Employee {
        #[command(subcommand)]
        action: EmployeeCommands,
    },
    /// Start a shift.
    #[command(name = "clock-in")]
    ClockIn(ClockInArgs),
    /// End the open shift.
    #[command(name = "clock-out")]
    ClockOut(ClockOutArgs),
    /// Undo the last clock action within the grace window.
    Undo(UndoArgs),
    /// Current clock state of an employee.
    Status { employee: String },
    /// Check a clock event without recording it.
    Validate(ValidateArgs),
    /// Time entries.
    Entry {
        #[command(subcommand)]
        action: EntryCommands,
    },
    /// Correction requests.
    Correction {
        #[command(subcommand)]
        action: CorrectionCommands,
    },
    /// Overwrite one field of a time entry (admin only).
    Override(OverrideArgs),
    /// Audit log.
    Audit {
        #[command(subcommand)]
        action: AuditCommands,
    },
}

/// Arguments for `shft clock-in`.
#[derive(Clone, Debug, Args)]
pub struct ClockInArgs {
    pub employee: String,
    #[arg(long)]
    pub location: Option<String>,
    /// Accept warnings and supersede a stale open shift.
    #[arg(long)]
    pub force: bool,
}

/// Arguments for `shft clock-out`.
#[derive(Clone, Debug, Args)]
pub struct ClockOutArgs {
    pub employee: String,
    /// Accept warnings.
    #[arg(long)]
    pub force: bool,
}

/// Arguments for `shft undo`.
#[derive(Clone, Debug, Args)]
pub struct UndoArgs {
    pub employee: String,
    pub entry: String,
}

/// Arguments for `shft validate`.
#[derive(Clone, Debug, Args)]
pub struct ValidateArgs {
    pub employee: String,
    /// clock-in or clock-out
    #[arg(long)]
    pub action: String,
    /// RFC 3339 timestamp (defaults to now)
    #[arg(long)]
    pub at: Option<String>,
}

/// Arguments for `shft override`.
#[derive(Clone, Debug, Args)]
pub struct OverrideArgs {
    pub entry: String,
    #[arg(long)]
    pub admin: String,
    /// clock-in, clock-out, status, location or notes
    #[arg(long)]
    pub field: String,
    /// New value; empty or `null` clears nullable fields
    #[arg(long)]
    pub value: String,
    #[arg(long)]
    pub reason: String,
}
