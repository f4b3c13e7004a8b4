//! Client configuration schemas.
//!
//! Configuration is deserialized from a TOML file via the `config` crate
//! and overlaid with `PULSEWATCH__`-prefixed environment variables, so the
//! vault secret and the API base URL can be injected by the environment.
//! It is read once at startup.

pub mod api;
pub mod cache;
pub mod logging;
pub mod vault;

use serde::{Deserialize, Serialize};

pub use self::api::ApiConfig;
pub use self::cache::CacheConfig;
pub use self::logging::LoggingConfig;
pub use self::vault::VaultConfig;

use crate::error::AppError;

/// Root client configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Monitoring API settings.
    #[serde(default)]
    pub api: ApiConfig,
    /// Credential vault settings.
    #[serde(default)]
    pub vault: VaultConfig,
    /// Response cache settings.
    #[serde(default)]
    pub cache: CacheConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file (optional) merged with
    /// environment variables prefixed with `PULSEWATCH__`.
    ///
    /// `PULSEWATCH__VAULT__SECRET` and `PULSEWATCH__API__BASE_URL` override
    /// whatever the file contains.
    pub fn load(path: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("PULSEWATCH")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let loaded: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        loaded.validate()?;
        Ok(loaded)
    }

    /// Reject configurations the client cannot run with.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.vault.secret.trim().is_empty() {
            return Err(AppError::configuration(
                "vault.secret must be set (PULSEWATCH__VAULT__SECRET)",
            ));
        }
        if !self.api.base_url.starts_with("http://") && !self.api.base_url.starts_with("https://")
        {
            return Err(AppError::configuration(format!(
                "api.base_url must be an http(s) URL, got '{}'",
                self.api.base_url
            )));
        }
        if self.cache.sweep_interval_seconds == 0 {
            return Err(AppError::configuration(
                "cache.sweep_interval_seconds must be greater than zero",
            ));
        }
        Ok(())
    }
}
