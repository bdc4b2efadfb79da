//! phpkg Configuration System
//!
//! Provides configuration management for phpkg projects including:
//! - Project configuration (phpkg.config.json)
//! - Package manifests read from installed packages
//! - Global user configuration (~/.phpkg/config.toml)
//! - Configuration precedence and merging
//!
//! # Configuration Hierarchy
//!
//! Configuration is loaded and merged in the following order (later overrides earlier):
//! 1. Global config (~/.phpkg/config.toml)
//! 2. Project config (./phpkg.config.json)
//! 3. Environment variables (PHPKG_*)
//! 4. CLI flags
//!
//! # Example
//!
//! ```no_run
//! use phpkg_config::ConfigLoader;
//! use std::path::Path;
//!
//! let mut loader = ConfigLoader::new();
//! let config = loader.load_from_directory(Path::new(".")).unwrap();
//! ```

pub mod global;
pub mod loader;
pub mod manifest;
pub mod project;

use std::path::PathBuf;
use thiserror::Error;

/// Project configuration file name, also used as the manifest of every package
pub const CONFIG_FILE: &str = "phpkg.config.json";

/// Lock file name, stored next to [`CONFIG_FILE`]
pub const LOCK_FILE: &str = "phpkg.config-lock.json";

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid JSON in {file}: {error}")]
    JsonParseError {
        file: PathBuf,
        error: serde_json::Error,
    },

    #[error("Invalid TOML syntax in {file}: {error}")]
    TomlParseError {
        file: PathBuf,
        error: toml::de::Error,
    },

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Home directory not found")]
    HomeNotFound,
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

pub(crate) fn read_config_file(path: &std::path::Path) -> ConfigResult<String> {
    std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ConfigError::NotFound(path.to_path_buf())
        } else {
            ConfigError::IoError(e)
        }
    })
}

// Re-export main types
pub use global::{Environment, GlobalConfig};
pub use loader::{Config, ConfigLoader};
pub use manifest::PackageManifest;
pub use project::ProjectConfig;
