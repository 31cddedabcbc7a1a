use crate::cli::GlobalFlags;
use crate::cli::subcommands::EntryCommands;
use crate::commands::shared::limit::effective_limit;
use crate::context::AppContext;
use crate::output::output;

/// Handle `shft entry`.
pub async fn handle(action: &EntryCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        EntryCommands::Get { id } => {
            let entry = ctx.service.get_time_entry(id).await?;
            output(&entry, flags.format)
        }
        EntryCommands::List { employee, limit } => {
            let limit = effective_limit(*limit, flags.limit, ctx.default_limit());
            let entries = ctx.service.list_entries(employee, limit).await?;
            output(&entries, flags.format)
        }
    }
}
