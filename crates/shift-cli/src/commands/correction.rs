use shift_core::enums::CorrectionType;
use shift_db::workflow::CorrectionInput;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::CorrectionCommands;
use crate::commands::shared::limit::effective_limit;
use crate::commands::shared::parse::{parse_enum, parse_optional_timestamp};
use crate::commands::shared::respond::respond;
use crate::context::AppContext;
use crate::output::output;

/// Handle `shft correction`.
pub async fn handle(
    action: &CorrectionCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        CorrectionCommands::Request {
            employee,
            entry,
            correction_type,
            requested,
            original,
            reason,
        } => {
            let mut input =
                CorrectionInput::new(parse_enum::<CorrectionType>(correction_type, "type")?, reason);
            input.requested_time = parse_optional_timestamp(requested.as_deref(), "requested")?;
            input.original_time = parse_optional_timestamp(original.as_deref(), "original")?;

            let response = ctx.api().request_correction(employee, entry, input).await;
            respond(&response, response.success, response.reason.as_deref(), flags)
        }
        CorrectionCommands::Approve { id, approver } => {
            let response = ctx.api().approve_correction(id, approver).await;
            respond(&response, response.success, response.reason.as_deref(), flags)
        }
        CorrectionCommands::Reject {
            id,
            approver,
            reason,
        } => {
            let response = ctx
                .api()
                .reject_correction(id, approver, reason.as_deref())
                .await;
            respond(&response, response.success, response.reason.as_deref(), flags)
        }
        CorrectionCommands::Pending { department, limit } => {
            let limit = effective_limit(*limit, flags.limit, ctx.default_limit());
            let pending = ctx
                .service
                .list_pending_corrections(department.as_deref(), limit)
                .await?;
            output(&pending, flags.format)
        }
        CorrectionCommands::History { employee, limit } => {
            let limit = effective_limit(*limit, flags.limit, ctx.default_limit());
            let history = ctx.service.correction_history(employee, limit).await?;
            output(&history, flags.format)
        }
        CorrectionCommands::Get { id } => {
            let request = ctx.service.get_correction(id).await?;
            output(&request, flags.format)
        }
    }
}
