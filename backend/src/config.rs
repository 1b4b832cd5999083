//! Application configuration.
//!
//! Settings are read from a TOML file and then overridden by environment
//! variables:
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 8080
//! request_timeout_secs = 30
//! max_body_bytes = 1048576
//!
//! [logging]
//! level = "info"
//!
//! [repository]
//! type = "snapshot"          # or "local"
//! snapshot_path = "seed.json"
//!
//! [auth]
//! user_header = "x-user-id"
//! ```
//!
//! | Variable | Overrides |
//! |----------|-----------|
//! | `SCHEDULER_CONFIG` | path of the TOML file |
//! | `HOST`, `PORT` | `server.host`, `server.port` |
//! | `RUST_LOG` | `logging.level` |
//! | `REPOSITORY_TYPE`, `SNAPSHOT_PATH` | `repository.type`, `repository.snapshot_path` |

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable naming an explicit configuration file.
pub const CONFIG_PATH_ENV: &str = "SCHEDULER_CONFIG";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub logging: LoggingSettings,
    pub repository: RepositorySettings,
    pub auth: AuthSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub request_timeout_secs: u64,
    pub max_body_bytes: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            request_timeout_secs: 30,
            max_body_bytes: 1024 * 1024,
        }
    }
}

impl ServerSettings {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `EnvFilter` directive, e.g. `info` or `rehearsal_scheduler=debug,tower_http=info`.
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Repository selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositorySettings {
    #[serde(rename = "type")]
    pub repo_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot_path: Option<PathBuf>,
}

impl Default for RepositorySettings {
    fn default() -> Self {
        Self {
            repo_type: "local".to_string(),
            snapshot_path: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
    /// Header carrying the caller's numeric user id.
    pub user_header: String,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            user_header: "x-user-id".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Searches for `scheduler.toml` in:
    /// 1. Current directory
    /// 2. `backend/` directory
    /// 3. Parent directory
    ///
    /// Returns `Ok(None)` when no file exists.
    pub fn from_default_location() -> Result<Option<Self>> {
        let search_paths = [
            PathBuf::from("scheduler.toml"),
            PathBuf::from("backend/scheduler.toml"),
            PathBuf::from("../scheduler.toml"),
        ];

        for path in search_paths {
            if path.exists() {
                log::info!("Loading configuration from {}", path.display());
                return Self::from_file(&path).map(Some);
            }
        }
        Ok(None)
    }

    /// File named by `SCHEDULER_CONFIG`, else the default location, else
    /// defaults; environment overrides are applied last.
    pub fn load() -> Result<Self> {
        let mut config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::from_file(&path)?,
            Err(_) => Self::from_default_location()?.unwrap_or_default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply overrides from `lookup` (the process environment in [`AppConfig::load`]).
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .trim()
                .parse()
                .with_context(|| format!("PORT must be a port number, got '{}'", port))?;
        }
        if let Some(level) = lookup("RUST_LOG") {
            self.logging.level = level;
        }
        if let Some(repo_type) = lookup("REPOSITORY_TYPE") {
            self.repository.repo_type = repo_type;
        }
        if let Some(path) = lookup("SNAPSHOT_PATH") {
            self.repository.snapshot_path = Some(PathBuf::from(path));
        }
        Ok(())
    }
}
