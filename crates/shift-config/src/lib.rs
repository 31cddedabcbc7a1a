//! # shift-config
//!
//! Layered configuration loading for Shift using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`SHIFT_*` prefix, `__` as separator)
//! 2. Project-level `.shift/config.toml`
//! 3. User-level `~/.config/shift/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `SHIFT_POLICY__GRACE_WINDOW_SECS` -> `policy.grace_window_secs`,
//! `SHIFT_DATABASE__PATH` -> `database.path`, etc.
//! The `__` (double underscore) separates nested config sections.
//!
//! # Usage
//!
//! ```no_run
//! use shift_config::ShiftConfig;
//!
//! // Load from all sources (TOML + env):
//! let config = ShiftConfig::load().expect("config");
//!
//! println!("grace window: {}s", config.policy.grace_window_secs);
//! ```

mod database;
mod error;
mod general;
mod policy;

pub use database::DatabaseConfig;
pub use error::ConfigError;
pub use general::GeneralConfig;
pub use policy::PolicyConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ShiftConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub policy: PolicyConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl ShiftConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT read `.env`; the binary loads it into the process environment
    /// before calling this.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction fails or the policy is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.policy.validate()?;
        Ok(config)
    }

    /// Build the figment provider chain.
    ///
    /// This is public so tests can inspect the figment directly or add
    /// additional providers on top.
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(".shift/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed("SHIFT_").split("__"))
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("shift").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_loads() {
        let config = ShiftConfig::default();
        assert_eq!(config.database.path, ".shift/shift.db");
        assert_eq!(config.policy, PolicyConfig::default());
        assert_eq!(config.general.default_limit, 50);
    }

    #[test]
    fn figment_builds_without_files() {
        let figment = ShiftConfig::figment();
        let config: ShiftConfig = figment.extract().expect("should extract defaults");
        assert!(config.policy.validate().is_ok());
    }
}
