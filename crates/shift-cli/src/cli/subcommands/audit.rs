use clap::{Args, Subcommand};

/// Audit log commands.
#[derive(Clone, Debug, Subcommand)]
pub enum AuditCommands {
    /// Query entries, newest first.
    List(AuditFilterArgs),
    /// Write entries to a JSONL file, oldest first.
    Export {
        path: String,
        #[command(flatten)]
        filter: AuditFilterArgs,
    },
}

/// Filters shared by `audit list` and `audit export`.
#[derive(Clone, Debug, Default, Args)]
pub struct AuditFilterArgs {
    /// time-entries, correction-requests or employees
    #[arg(long)]
    pub table: Option<String>,
    #[arg(long)]
    pub record: Option<String>,
    /// insert, update or admin-override
    #[arg(long)]
    pub action: Option<String>,
    #[arg(long)]
    pub user: Option<String>,
}
