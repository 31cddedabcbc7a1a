use std::path::Path;

use anyhow::Context;
use shift_config::ShiftConfig;

use crate::cli::GlobalFlags;

/// Load `.env`, then layered config, then apply the `--db` override.
pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<ShiftConfig> {
    let cwd = std::env::current_dir().context("failed to determine current directory")?;
    load_dotenv(&cwd)?;

    let mut config = ShiftConfig::load().context("failed to load shift configuration")?;
    apply_overrides(&mut config, flags);
    Ok(config)
}

/// Load `<dir>/.env` into the process environment if it exists.
fn load_dotenv(dir: &Path) -> anyhow::Result<()> {
    let env_path = dir.join(".env");
    if env_path.exists() {
        dotenvy::from_path(&env_path)
            .with_context(|| format!("failed to load dotenv file at {}", env_path.display()))?;
    }
    Ok(())
}

fn apply_overrides(config: &mut ShiftConfig, flags: &GlobalFlags) {
    if let Some(ref path) = flags.db {
        config.database.path.clone_from(path);
    }
}
