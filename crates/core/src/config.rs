//! Process-wide configuration
//!
//! Collaborator credentials and local paths are read from the environment
//! (after loading a `.env` file, if any) exactly once per process.
//!
//! | Env Var                  | Default                                   |
//! |--------------------------|-------------------------------------------|
//! | `PROMPTDECK_API_KEY`     | unset                                     |
//! | `PROMPTDECK_PROJECT_ID`  | unset                                     |
//! | `PROMPTDECK_AUTH_DOMAIN` | unset                                     |
//! | `PROMPTDECK_DB_PATH`     | `<data dir>/promptdeck/prompts.db`        |
//! | `PROMPTDECK_LOG`         | `promptdeck_core=info`                    |

use std::path::PathBuf;
use std::sync::OnceLock;

use serde::Serialize;

use crate::errors::{DeckError, Result};

const DEFAULT_LOG_FILTER: &str = "promptdeck_core=info";

static CONFIG: OnceLock<Config> = OnceLock::new();

/// Connection settings for the collaborators plus local paths
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// Opaque API key for the hosted identity/document service
    #[serde(skip_serializing)]
    pub api_key:     Option<String>,
    pub project_id:  Option<String>,
    pub auth_domain: Option<String>,
    /// SQLite file used by the local document store
    pub db_path:     PathBuf,
    /// `tracing` filter directive
    pub log_filter:  String,
}

impl Config {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let db_path = match non_empty("PROMPTDECK_DB_PATH") {
            Some(path) => PathBuf::from(path),
            None => default_db_path()?,
        };

        Ok(Self {
            api_key: non_empty("PROMPTDECK_API_KEY"),
            project_id: non_empty("PROMPTDECK_PROJECT_ID"),
            auth_domain: non_empty("PROMPTDECK_AUTH_DOMAIN"),
            db_path,
            log_filter: non_empty("PROMPTDECK_LOG").unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
        })
    }

    /// Configuration loaded once at startup
    pub fn global() -> Result<&'static Config> {
        if let Some(config) = CONFIG.get() {
            return Ok(config);
        }
        let config = Self::from_env()?;
        Ok(CONFIG.get_or_init(|| config))
    }

    /// True when the hosted collaborators have enough settings to connect
    pub fn has_remote_credentials(&self) -> bool {
        self.api_key.is_some() && self.project_id.is_some()
    }
}

/// Get default database path (`<data dir>/promptdeck/prompts.db`)
pub fn default_db_path() -> Result<PathBuf> {
    let base = dirs::data_dir()
        .or_else(dirs::home_dir)
        .ok_or_else(|| DeckError::ConfigError("Could not determine data directory".into()))?;
    Ok(base.join("promptdeck").join("prompts.db"))
}
