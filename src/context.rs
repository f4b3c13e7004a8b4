//! Process-wide wiring of the client core.

use std::sync::Arc;

use pulsewatch_api::{ApiGateway, HttpTransport};
use pulsewatch_auth::{FileCredentialStore, TokenVault};
use pulsewatch_cache::ApiCache;
use pulsewatch_core::config::AppConfig;
use pulsewatch_core::error::AppError;
use pulsewatch_core::result::AppResult;
use pulsewatch_entity::user::SessionUser;
use pulsewatch_service::{MonitorService, SessionController};

/// Everything a command needs, built once from configuration.
pub struct AppContext {
    /// Session lifecycle.
    pub session: Arc<SessionController>,
    /// Guarded dashboard operations.
    pub monitor: MonitorService,
    /// Shared cache; stopped on shutdown.
    cache: Arc<ApiCache>,
}

impl AppContext {
    /// Build the vault, cache, transport, gateway and services.
    pub fn build(config: &AppConfig) -> AppResult<Self> {
        let store = Arc::new(FileCredentialStore::new(&config.vault.storage_path));
        let vault = TokenVault::new(store, &config.vault.secret)?;
        let cache = Arc::new(ApiCache::new(&config.cache)?);
        let transport = Arc::new(HttpTransport::new(&config.api)?);

        let gateway = ApiGateway::new(&config.api.base_url, transport, vault, cache.clone());
        let session = SessionController::new(gateway.clone());
        let monitor = MonitorService::new(gateway, session.clone());

        Ok(Self {
            session,
            monitor,
            cache,
        })
    }

    /// Rehydrate the persisted session, failing when nobody is signed in.
    pub async fn resume(&self) -> AppResult<SessionUser> {
        self.session
            .restore()
            .await?
            .ok_or_else(|| AppError::authentication("Not signed in. Run `pulsewatch login` first."))
    }

    /// Stop background work.
    pub async fn shutdown(&self) {
        self.cache.shutdown().await;
    }
}
