use std::path::Path;

use anyhow::Context;
use serde_json::json;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::AuditFilterArgs;
use crate::context::AppContext;
use crate::output::output;

/// Export is unbounded unless `--limit` is given.
pub async fn run(
    path: &str,
    args: &AuditFilterArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let filter = super::build_filter(args, flags.limit)?;
    let written = ctx
        .service
        .export_audit_jsonl(Path::new(path), &filter)
        .await
        .with_context(|| format!("failed to export audit log to {path}"))?;

    output(&json!({ "path": path, "written": written }), flags.format)
}
