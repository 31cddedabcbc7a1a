use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::output::output;

/// Print a response object, then fail the command if it reports failure.
pub fn respond<T: Serialize>(
    response: &T,
    success: bool,
    reason: Option<&str>,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    output(response, flags.format)?;
    if !success {
        anyhow::bail!("operation failed ({})", reason.unwrap_or("unknown"));
    }
    Ok(())
}
