use clap::Subcommand;

/// Time entry commands.
#[derive(Clone, Debug, Subcommand)]
pub enum EntryCommands {
    /// Get a time entry by ID.
    Get { id: String },
    /// List an employee's entries, newest first.
    List {
        employee: String,
        #[arg(long)]
        limit: Option<u32>,
    },
}
