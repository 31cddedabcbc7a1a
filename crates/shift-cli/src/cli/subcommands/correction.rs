use clap::Subcommand;

/// Correction request commands.
#[derive(Clone, Debug, Subcommand)]
pub enum CorrectionCommands {
    /// File a correction for one of the employee's entries.
    Request {
        employee: String,
        entry: String,
        /// clock-in, clock-out, break-start, break-end, cancel or manual
        #[arg(long = "type")]
        correction_type: String,
        /// RFC 3339 timestamp (the start, for manual corrections)
        #[arg(long)]
        requested: Option<String>,
        /// RFC 3339 timestamp (the end, for manual corrections)
        #[arg(long)]
        original: Option<String>,
        #[arg(long)]
        reason: String,
    },
    /// Approve a pending request and apply it.
    Approve {
        id: String,
        #[arg(long)]
        approver: String,
    },
    /// Reject a pending request.
    Reject {
        id: String,
        #[arg(long)]
        approver: String,
        #[arg(long)]
        reason: Option<String>,
    },
    /// Pending requests, oldest first.
    Pending {
        #[arg(long)]
        department: Option<String>,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// An employee's requests, newest first.
    History {
        employee: String,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Get a request by ID.
    Get { id: String },
}
