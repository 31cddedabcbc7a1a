use clap::Parser;

pub mod global;
pub mod root_commands;
pub mod subcommands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `shft` binary.
#[derive(Debug, Parser)]
#[command(name = "shft", version, about = "Shift - employee time tracking and corrections")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, raw
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Max results to return
    #[arg(short, long, global = true)]
    pub limit: Option<u32>,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Database path (overrides `database.path` from config)
    #[arg(long, global = true)]
    pub db: Option<String>,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            limit: self.limit,
            quiet: self.quiet,
            verbose: self.verbose,
            db: self.db.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};

    use super::subcommands::{CorrectionCommands, EmployeeCommands};
    use super::{Cli, Commands, GlobalFlags, OutputFormat};

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_before_subcommand() {
        let cli = Cli::try_parse_from([
            "shft",
            "--format",
            "raw",
            "--limit",
            "10",
            "--verbose",
            "status",
            "emp-1",
        ])
        .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Raw);
        assert_eq!(cli.limit, Some(10));
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Status { ref employee } if employee == "emp-1"));
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["shft", "clock-out", "emp-1", "--quiet", "--force"])
            .expect("cli should parse");

        assert!(cli.quiet);
        assert!(matches!(cli.command, Commands::ClockOut(ref args) if args.force));
    }

    #[test]
    fn output_format_rejects_table() {
        let parsed = Cli::try_parse_from(["shft", "--format", "table", "status", "emp-1"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn clock_in_takes_location() {
        let cli = Cli::try_parse_from(["shft", "clock-in", "emp-1", "--location", "dock"])
            .expect("cli should parse");
        let Commands::ClockIn(args) = cli.command else {
            panic!("expected clock-in");
        };
        assert_eq!(args.employee, "emp-1");
        assert_eq!(args.location.as_deref(), Some("dock"));
        assert!(!args.force);
    }

    #[test]
    fn correction_request_parses_times() {
        let cli = Cli::try_parse_from([
            "shft",
            "correction",
            "request",
            "emp-1",
            "ent-1",
            "--type",
            "clock-out",
            "--requested",
            "2026-03-02T17:00:00Z",
            "--reason",
            "forgot",
        ])
        .expect("cli should parse");

        let Commands::Correction {
            action: CorrectionCommands::Request {
                correction_type,
                requested,
                original,
                ..
            },
        } = cli.command
        else {
            panic!("expected correction request");
        };
        assert_eq!(correction_type, "clock-out");
        assert_eq!(requested.as_deref(), Some("2026-03-02T17:00:00Z"));
        assert_eq!(original, None);
    }

    #[test]
    fn correction_approve_requires_approver() {
        let parsed = Cli::try_parse_from(["shft", "correction", "approve", "cor-1"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn employee_add_requires_department() {
        assert!(Cli::try_parse_from(["shft", "employee", "add", "--name", "Ada"]).is_err());
        let cli = Cli::try_parse_from([
            "shft",
            "employee",
            "add",
            "--name",
            "Ada",
            "--department",
            "ops",
        ])
        .expect("cli should parse");
        assert!(matches!(
            cli.command,
            Commands::Employee {
                action: EmployeeCommands::Add { .. }
            }
        ));
    }

    #[test]
    fn global_flags_extraction_copies_values() {
        let cli = Cli::try_parse_from(["shft", "--db", ":memory:", "status", "emp-1"])
            .expect("cli should parse");
        let flags: GlobalFlags = cli.global_flags();
        assert_eq!(flags.db.as_deref(), Some(":memory:"));
    }
}
