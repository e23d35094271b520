//! Configuration loading and management for the payroll service.
//!
//! This module loads the service configuration from a YAML file: the HTTP
//! bind address, the default formula, and the storage locations.
//!
//! # Example
//!
//! ```no_run
//! use bar_payroll::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/payroll.yaml").unwrap();
//! println!("Default shift rate: {}", config.default_formula().shift_rate);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{AppConfig, ServerConfig, StorageConfig};
