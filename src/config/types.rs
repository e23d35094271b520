//! Configuration types for the payroll service.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from the YAML configuration file. Every section is
//! optional and falls back to its defaults.

use std::path::PathBuf;

use serde::Deserialize;

use crate::models::FormulaConfig;

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerConfig {
    /// Address the API listens on.
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_bind() -> String {
    "127.0.0.1:3000".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

/// Persistence settings.
///
/// The local directory is always used. When `database_path` is set the
/// SQLite database becomes the primary tier and the local directory the
/// fallback.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the local JSON documents.
    #[serde(default = "default_local_dir")]
    pub local_dir: PathBuf,
    /// Optional SQLite database file.
    #[serde(default)]
    pub database_path: Option<PathBuf>,
}

fn default_local_dir() -> PathBuf {
    PathBuf::from("./data")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            local_dir: default_local_dir(),
            database_path: None,
        }
    }
}

/// The complete service configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Formula used when storage holds none yet.
    #[serde(default)]
    pub formula: FormulaConfig,
    /// Persistence settings.
    #[serde(default)]
    pub storage: StorageConfig,
}
