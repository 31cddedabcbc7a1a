#[path = "audit/export.rs"]
mod export;
#[path = "audit/list.rs"]
mod list;

use shift_core::enums::{AuditAction, AuditTable};
use shift_db::repos::audit::AuditFilter;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::{AuditCommands, AuditFilterArgs};
use crate::commands::shared::parse::parse_enum;
use crate::context::AppContext;

/// Handle `shft audit`.
pub async fn handle(action: &AuditCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        AuditCommands::List(filter) => list::run(filter, ctx, flags).await,
        AuditCommands::Export { path, filter } => export::run(path, filter, ctx, flags).await,
    }
}

fn build_filter(args: &AuditFilterArgs, limit: Option<u32>) -> anyhow::Result<AuditFilter> {
    Ok(AuditFilter {
        table: args
            .table
            .as_deref()
            .map(|value| parse_enum::<AuditTable>(value, "table"))
            .transpose()?,
        record_id: args.record.clone(),
        action: args
            .action
            .as_deref()
            .map(|value| parse_enum::<AuditAction>(&value.to_uppercase(), "action"))
            .transpose()?,
        user_id: args.user.clone(),
        limit,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_parses_table_and_action() {
        let args = AuditFilterArgs {
            table: Some("time-entries".into()),
            action: Some("admin-override".into()),
            ..AuditFilterArgs::default()
        };
        let filter = build_filter(&args, Some(5)).unwrap();
        assert_eq!(filter.table, Some(AuditTable::TimeEntries));
        assert_eq!(filter.action, Some(AuditAction::AdminOverride));
        assert_eq!(filter.limit, Some(5));
    }

    #[test]
    fn filter_rejects_unknown_table() {
        let args = AuditFilterArgs {
            table: Some("sessions".into()),
            ..AuditFilterArgs::default()
        };
        assert!(build_filter(&args, None).is_err());
    }
}
