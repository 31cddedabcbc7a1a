use anyhow::Context;
use shift_config::ShiftConfig;
use shift_db::api::ShiftApi;
use shift_db::service::ShiftService;

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub service: ShiftService,
    pub config: ShiftConfig,
}

impl AppContext {
    /// Open the configured database, creating its directory if needed.
    pub async fn init(config: ShiftConfig) -> anyhow::Result<Self> {
        if let Some(dir) = config.database.parent_dir() {
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("failed to create database directory {}", dir.display()))?;
        }

        let service = ShiftService::from_config(&config)
            .await
            .with_context(|| format!("failed to open database at {}", config.database.path))?;
        tracing::debug!(path = %config.database.path, "opened shift database");

        Ok(Self { service, config })
    }

    /// Response-returning view of the service.
    pub const fn api(&self) -> ShiftApi<'_> {
        ShiftApi::new(&self.service)
    }

    /// Default page size from `[general] default_limit`.
    pub const fn default_limit(&self) -> u32 {
        self.config.general.default_limit
    }
}
