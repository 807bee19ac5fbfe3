//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section. Every field carries a default, so the service starts with no
//! configuration files at all.

pub mod app;
pub mod database;
pub mod logging;
pub mod realtime;

use serde::{Deserialize, Serialize};

pub use self::app::{CorsConfig, ServerConfig};
pub use self::database::DatabaseConfig;
pub use self::logging::LoggingConfig;
pub use self::realtime::{RealtimeConfig, RealtimeMode};

use crate::error::AppError;

/// Environment variable holding the listen port.
pub const PORT_ENV: &str = "PORT";

/// Environment variable holding the database connection URL.
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database connection settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Real-time WebSocket settings.
    #[serde(default)]
    pub realtime: RealtimeConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files and the environment.
    ///
    /// Merges `config/default.toml`, an environment-specific overlay
    /// `config/{env}.toml` and variables prefixed with `WALLETHUB__`, then
    /// applies the `PORT` and `DATABASE_URL` overrides.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("WALLETHUB")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let mut loaded: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        loaded.apply_overrides(
            std::env::var(PORT_ENV).ok(),
            std::env::var(DATABASE_URL_ENV).ok(),
        )?;

        Ok(loaded)
    }

    /// Apply the plain `PORT` / `DATABASE_URL` overrides used by hosting
    /// platforms. Empty values are treated as unset.
    pub fn apply_overrides(
        &mut self,
        port: Option<String>,
        database_url: Option<String>,
    ) -> Result<(), AppError> {
        if let Some(port) = port.filter(|p| !p.trim().is_empty()) {
            self.server.port = port.trim().parse().map_err(|_| {
                AppError::configuration(format!("Invalid {PORT_ENV} value: '{port}'"))
            })?;
        }

        if let Some(url) = database_url.filter(|u| !u.trim().is_empty()) {
            self.database.url = url;
        }

        Ok(())
    }
}
