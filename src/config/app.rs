//! Application configuration loaded from `config.toml` and the environment.
//!
//! Every setting has a default, so the file is optional. Environment variables
//! (usually from `.env`) override whatever the file says.

use crate::{
    config::database::DEFAULT_DATABASE_URL,
    errors::{Error, Result},
};
use serde::Deserialize;
use std::{path::Path, time::Duration};
use tracing::{debug, info};

/// Environment variable naming the config file.
pub const CONFIG_PATH_VAR: &str = "PURCHASE_BUDDY_CONFIG";
/// Environment variable overriding [`AppConfig::api_url`].
pub const API_URL_VAR: &str = "PURCHASE_BUDDY_API_URL";
/// Environment variable overriding [`AppConfig::bind_address`].
pub const BIND_ADDRESS_VAR: &str = "BIND_ADDRESS";
/// Environment variable overriding [`AppConfig::database_url`].
pub const DATABASE_URL_VAR: &str = "DATABASE_URL";

/// Settings for both the sync client and the endpoint server.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL of the action endpoint the client talks to
    pub api_url: String,
    /// Address the endpoint server listens on
    pub bind_address: String,
    /// `SeaORM` connection string of the endpoint's database
    pub database_url: String,
    /// Per-request timeout of the sync client
    pub request_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: "http://127.0.0.1:3000/".to_string(),
            bind_address: "127.0.0.1:3000".to_string(),
            database_url: DEFAULT_DATABASE_URL.to_string(),
            request_timeout_secs: 30,
        }
    }
}

impl AppConfig {
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Applies overrides from a variable lookup (normally `std::env::var`).
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(API_URL_VAR) {
            self.api_url = url;
        }
        if let Some(addr) = lookup(BIND_ADDRESS_VAR) {
            self.bind_address = addr;
        }
        if let Some(url) = lookup(DATABASE_URL_VAR) {
            self.database_url = url;
        }
    }
}

/// Parses a TOML config file.
///
/// # Errors
/// Returns [`Error::Config`] if the file cannot be read or is not valid TOML.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;
    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse {}: {e}", path_ref.display()),
    })
}

/// Loads `config.toml` (or the file named by `PURCHASE_BUDDY_CONFIG`) when present,
/// then applies environment overrides.
///
/// # Errors
/// Returns [`Error::Config`] if an existing config file is unreadable or malformed.
pub fn load_app_configuration() -> Result<AppConfig> {
    let path = std::env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| "config.toml".to_string());
    let mut config = if Path::new(&path).exists() {
        load_config(&path)?
    } else {
        info!("No config file at {}, using defaults", path);
        AppConfig::default()
    };
    config.apply_overrides(|key| std::env::var(key).ok());
    Ok(config)
}
