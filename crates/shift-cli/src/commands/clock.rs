use shift_core::enums::ClockAction;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::{ClockInArgs, ClockOutArgs, UndoArgs, ValidateArgs};
use crate::commands::shared::parse::{parse_enum, parse_optional_timestamp};
use crate::commands::shared::respond::respond;
use crate::context::AppContext;
use crate::output::output;

/// Handle `shft clock-in`.
pub async fn clock_in(args: &ClockInArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let response = ctx
        .api()
        .clock_in(&args.employee, args.location.as_deref(), args.force)
        .await;
    respond(&response, response.success, response.reason.as_deref(), flags)
}

/// Handle `shft clock-out`.
pub async fn clock_out(
    args: &ClockOutArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let response = ctx.api().clock_out(&args.employee, args.force).await;
    respond(&response, response.success, response.reason.as_deref(), flags)
}

/// Handle `shft undo`.
pub async fn undo(args: &UndoArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let response = ctx.api().quick_undo(&args.employee, &args.entry).await;
    respond(&response, response.success, response.reason.as_deref(), flags)
}

/// Handle `shft status`.
pub async fn status(employee: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let status = ctx.service.status(employee).await?;
    output(&status, flags.format)
}

/// Handle `shft validate`. Prints the report; an invalid event is not a
/// command failure.
pub async fn validate(
    args: &ValidateArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let action = parse_enum::<ClockAction>(&args.action, "action")?;
    let at = parse_optional_timestamp(args.at.as_deref(), "at")?;
    let report = ctx.service.validate(&args.employee, action, at).await?;
    output(&report, flags.format)
}
