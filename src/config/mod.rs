/// Application settings from `config.toml` and environment variables
pub mod app;

/// Database configuration and connection management
pub mod database;

pub use app::{AppConfig, load_app_configuration};
