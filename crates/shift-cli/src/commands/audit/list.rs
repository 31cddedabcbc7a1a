use crate::cli::GlobalFlags;
use crate::cli::subcommands::AuditFilterArgs;
use crate::commands::shared::limit::effective_limit;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(args: &AuditFilterArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let limit = effective_limit(None, flags.limit, ctx.default_limit());
    let filter = super::build_filter(args, Some(limit))?;
    let entries = ctx.service.query_audit(&filter).await?;
    output(&entries, flags.format)
}
