//! Global Configuration (~/.phpkg/config.toml)
//!
//! Handles user-level configuration stored in `~/.phpkg/config.toml`.

use crate::{read_config_file, ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Global user configuration from ~/.phpkg/config.toml
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct GlobalConfig {
    /// Default settings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defaults: Option<DefaultsConfig>,

    /// Build settings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build: Option<BuildConfig>,
}

/// Default settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct DefaultsConfig {
    /// Packages directory used when a project does not set one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub packages_directory: Option<String>,
}

/// Build settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct BuildConfig {
    /// Build environment ("development" or "production")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
}

/// Build environment; selects the `builds/<environment>` output directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(ConfigError::InvalidValue {
                field: "environment".to_string(),
                reason: format!("must be 'development' or 'production', got '{}'", other),
            }),
        }
    }
}

impl GlobalConfig {
    /// Load global configuration from a file
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = read_config_file(path)?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::TomlParseError {
            file: path.to_path_buf(),
            error: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the global configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if let Some(environment) = self.build.as_ref().and_then(|b| b.environment.as_deref()) {
            environment.parse::<Environment>()?;
        }

        Ok(())
    }

    /// Get the global config file path (~/.phpkg/config.toml)
    pub fn global_config_path() -> ConfigResult<PathBuf> {
        let home = dirs::home_dir().ok_or(ConfigError::HomeNotFound)?;
        Ok(home.join(".phpkg").join("config.toml"))
    }

    /// Get the default packages directory
    pub fn packages_directory(&self) -> Option<&str> {
        self.defaults
            .as_ref()
            .and_then(|d| d.packages_directory.as_deref())
    }

    /// Get the configured environment, if any
    pub fn environment(&self) -> Option<Environment> {
        self.build
            .as_ref()
            .and_then(|b| b.environment.as_deref())
            .and_then(|e| e.parse().ok())
    }
}
