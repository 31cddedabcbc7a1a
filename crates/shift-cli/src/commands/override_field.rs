use shift_core::enums::OverridableField;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::OverrideArgs;
use crate::commands::shared::parse::parse_enum;
use crate::commands::shared::respond::respond;
use crate::context::AppContext;

/// Handle `shft override`.
pub async fn handle(args: &OverrideArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let field = parse_enum::<OverridableField>(&args.field, "field")?;
    let response = ctx
        .api()
        .admin_override(&args.admin, &args.entry, field, &args.value, &args.reason)
        .await;
    respond(&response, response.success, response.reason.as_deref(), flags)
}
