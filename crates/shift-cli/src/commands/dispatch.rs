use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(command: Commands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::Employee { action } => commands::employee::handle(&action, ctx, flags).await,
        Commands::ClockIn(args) => commands::clock::clock_in(&args, ctx, flags).await,
        Commands::ClockOut(args) => commands::clock::clock_out(&args, ctx, flags).await,
        Commands::Undo(args) => commands::clock::undo(&args, ctx, flags).await,
        Commands::Status { employee } => commands::clock::status(&employee, ctx, flags).await,
        Commands::Validate(args) => commands::clock::validate(&args, ctx, flags).await,
        Commands::Entry { action } => commands::entry::handle(&action, ctx, flags).await,
        Commands::Correction { action } => commands::correction::handle(&action, ctx, flags).await,
        Commands::Override(args) => commands::override_field::handle(&args, ctx, flags).await,
        Commands::Audit { action } => commands::audit::handle(&action, ctx, flags).await,
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use shift_config::ShiftConfig;
    use tempfile::TempDir;

    use super::*;
    use crate::cli::Cli;

    async fn memory_context() -> AppContext {
        let mut config = ShiftConfig::default();
        config.database.path = ":memory:".into();
        AppContext::init(config).await.unwrap()
    }

    async fn run(ctx: &AppContext, args: &[&str]) -> anyhow::Result<()> {
        let cli = Cli::try_parse_from(std::iter::once("shft").chain(args.iter().copied()))?;
        let flags = cli.global_flags();
        dispatch(cli.command, ctx, &flags).await
    }

    #[tokio::test]
    async fn clock_cycle_through_commands() {
        let ctx = memory_context().await;
        let emp = ctx.service.register_employee("Ada", "ops").await.unwrap().id;

        run(&ctx, &["clock-in", &emp, "--location", "dock"]).await.unwrap();
        assert!(ctx.service.status(&emp).await.unwrap().clocked_in);

        let err = run(&ctx, &["clock-in", &emp]).await.unwrap_err();
        assert!(err.to_string().contains("confirmation_required"));

        run(&ctx, &["status", &emp]).await.unwrap();
        run(&ctx, &["validate", &emp, "--action", "clock-out"]).await.unwrap();
        run(&ctx, &["entry", "list", &emp, "--limit", "5"]).await.unwrap();
    }

    #[tokio::test]
    async fn failed_operation_is_an_error() {
        let ctx = memory_context().await;
        let emp = ctx.service.register_employee("Ada", "ops").await.unwrap().id;

        let err = run(&ctx, &["clock-out", &emp]).await.unwrap_err();
        assert!(err.to_string().contains("no_active_entry"));

        let err = run(&ctx, &["correction", "approve", "cor-missing", "--approver", &emp])
            .await
            .unwrap_err();
        assert!(err.to_string().contains("correction_not_found"));
    }

    #[tokio::test]
    async fn bad_arguments_fail_before_the_service() {
        let ctx = memory_context().await;
        let err = run(&ctx, &["validate", "emp-1", "--action", "lunch"])
            .await
            .unwrap_err();
        assert!(err.to_string().contains("invalid action 'lunch'"));

        let err = run(
            &ctx,
            &["override", "ent-1", "--admin", "emp-1", "--field", "employee-id", "--value", "x", "--reason", "r"],
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("invalid field"));
    }

    #[tokio::test]
    async fn audit_export_writes_file() {
        let ctx = memory_context().await;
        run(&ctx, &["employee", "add", "--name", "Ada", "--department", "ops"])
            .await
            .unwrap();

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("audit.jsonl");
        run(&ctx, &["audit", "export", path.to_str().unwrap(), "--table", "employees"])
            .await
            .unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap().lines().count(), 1);
    }
}
