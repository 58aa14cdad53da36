//! Environment-based configuration for the interactive shell.

use std::path::PathBuf;

/// Which persistence backend to run against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Json,
    Sqlite,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub backend: Backend,
    /// Path of the JSON document (json backend).
    pub json_path: PathBuf,
    /// Database URL (sqlite backend).
    pub database_url: String,
}

impl Config {
    /// Read configuration from the environment, with logged defaults.
    pub fn from_env() -> Self {
        let backend = match std::env::var("STOCKROOM_BACKEND").as_deref() {
            Ok("sqlite") => Backend::Sqlite,
            Ok("json") | Err(_) => Backend::Json,
            Ok(other) => {
                tracing::warn!(backend = other, "unknown STOCKROOM_BACKEND; using json");
                Backend::Json
            }
        };

        let json_path = std::env::var("STOCKROOM_JSON_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("products.json"));

        let database_url = std::env::var("DATABASE_URL").unwrap_or_else(|_| {
            // mode=rwc creates the file on first run.
            "sqlite://products.db?mode=rwc".to_string()
        });

        Self {
            backend,
            json_path,
            database_url,
        }
    }
}
