use clap::Subcommand;

/// Employee directory commands.
#[derive(Clone, Debug, Subcommand)]
pub enum EmployeeCommands {
    /// Register an employee.
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        department: String,
    },
    /// List employees by name.
    List {
        #[arg(long)]
        department: Option<String>,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Get an employee by ID.
    Get { id: String },
}
