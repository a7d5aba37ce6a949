//! Configuration loading and management.
//!
//! This module loads the `.fx-advisor/` directory and the credentials
//! from the process environment.

pub mod error;
pub mod loader;
pub mod models;
pub mod secrets;

pub use error::{ConfigError, ConfigResult};
pub use loader::load_config;
pub use models::AppConfig;
pub use secrets::Secrets;

/// Name of the project configuration directory.
pub const CONFIG_DIR: &str = ".fx-advisor";
