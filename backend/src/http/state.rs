//! Application state for the HTTP server.

use axum::http::HeaderName;
use std::sync::Arc;
use std::time::Duration;

use crate::config::AppConfig;
use crate::db::repository::FullRepository;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Repository instance for storage operations
    pub repository: Arc<dyn FullRepository>,
    /// Header carrying the caller's user id
    pub user_header: HeaderName,
    pub request_timeout: Duration,
    pub max_body_bytes: usize,
}

impl AppState {
    /// Create a state with default settings around `repository`.
    pub fn new(repository: Arc<dyn FullRepository>) -> Self {
        let defaults = AppConfig::default();
        Self {
            repository,
            user_header: HeaderName::from_static("x-user-id"),
            request_timeout: defaults.server.request_timeout(),
            max_body_bytes: defaults.server.max_body_bytes,
        }
    }

    /// Create a state using the `[server]` and `[auth]` settings of `config`.
    pub fn from_config(
        repository: Arc<dyn FullRepository>,
        config: &AppConfig,
    ) -> anyhow::Result<Self> {
        let user_header = HeaderName::try_from(config.auth.user_header.trim().to_lowercase())
            .map_err(|e| {
                anyhow::anyhow!("invalid auth.user_header '{}': {}", config.auth.user_header, e)
            })?;
        Ok(Self {
            repository,
            user_header,
            request_timeout: config.server.request_timeout(),
            max_body_bytes: config.server.max_body_bytes,
        })
    }
}
