//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the service
//! configuration from a YAML file.

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::error::{PayrollError, PayrollResult};
use crate::models::FormulaConfig;

use super::types::{AppConfig, ServerConfig, StorageConfig};

/// Loads and provides access to the service configuration.
///
/// # File Format
///
/// ```text
/// server:
///   bind: 127.0.0.1:3000
/// formula:
///   shift_rate: 1000
///   internship_rate: 1000
///   total_bar_amount: 100000
///   bar_percentage: 0.07
/// storage:
///   local_dir: ./data
///   database_path: ./data/payroll.sqlite
/// ```
///
/// # Example
///
/// ```no_run
/// use bar_payroll::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/payroll.yaml")?;
/// println!("Listening on {}", loader.server().bind);
/// # Ok::<(), bar_payroll::error::PayrollError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    config: AppConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified YAML file.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` on success, or an error if:
    /// - The file does not exist or cannot be read (`ConfigNotFound`)
    /// - The file contains invalid YAML (`ConfigParseError`)
    pub fn load<P: AsRef<Path>>(path: P) -> PayrollResult<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| PayrollError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        let config = Self::parse(&content).map_err(|message| PayrollError::ConfigParseError {
            path: path_str.clone(),
            message,
        })?;

        info!(path = %path_str, "Loaded configuration");
        Ok(Self { config })
    }

    /// Loads the file if one is given, or falls back to built-in defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: Option<P>) -> PayrollResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                debug!("No configuration file given, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Wraps an already-built configuration.
    pub fn from_config(config: AppConfig) -> Self {
        Self { config }
    }

    fn parse(content: &str) -> Result<AppConfig, String> {
        // an empty file is a valid, all-defaults configuration
        if content.trim().is_empty() {
            return Ok(AppConfig::default());
        }
        serde_yaml::from_str(content).map_err(|e| e.to_string())
    }

    /// Returns the underlying configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Returns the server settings.
    pub fn server(&self) -> &ServerConfig {
        &self.config.server
    }

    /// Returns the formula used when storage holds none.
    pub fn default_formula(&self) -> &FormulaConfig {
        &self.config.formula
    }

    /// Returns the storage settings.
    pub fn storage(&self) -> &StorageConfig {
        &self.config.storage
    }
}
