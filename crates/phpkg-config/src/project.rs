//! Project Configuration (phpkg.config.json)
//!
//! Handles project-level configuration stored in `phpkg.config.json` at the project root.

use crate::{read_config_file, ConfigError, ConfigResult};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default directory (relative to the project root) packages are installed into
pub const DEFAULT_PACKAGES_DIRECTORY: &str = "Packages";

/// Default name of the generated import file
pub const DEFAULT_IMPORT_FILE: &str = "phpkg.imports.php";

/// Project configuration from phpkg.config.json
///
/// Map-valued fields keep their file order; the build step relies on it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "kebab-case")]
pub struct ProjectConfig {
    /// Namespace -> file path, relative to the project root
    #[serde(default)]
    pub map: IndexMap<String, String>,

    /// Files that get the import file injected
    #[serde(default)]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub entry_points: Vec<String>,

    /// Paths skipped by the build
    #[serde(default)]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub excludes: Vec<String>,

    /// Where packages are installed, relative to the project root
    #[serde(skip_serializing_if = "Option::is_none")]
    pub packages_directory: Option<String>,

    /// Name of the generated import file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub import_file: Option<String>,

    /// Package URL -> requested version
    #[serde(default)]
    pub packages: IndexMap<String, String>,

    /// Alias -> package URL
    #[serde(default)]
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub aliases: IndexMap<String, String>,
}

impl ProjectConfig {
    /// Parse project configuration from a JSON string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// Load project configuration from a file
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = read_config_file(path)?;

        let config = Self::from_str(&content).map_err(|e| ConfigError::JsonParseError {
            file: path.to_path_buf(),
            error: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty JSON
    pub fn to_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write project configuration to file
    pub fn write_to_file(&self, path: &Path) -> ConfigResult<()> {
        let content = self
            .to_string()
            .map_err(|e| ConfigError::JsonParseError {
                file: path.to_path_buf(),
                error: e,
            })?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate the project configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if let Some(dir) = &self.packages_directory {
            validate_relative_path("packages-directory", dir)?;
        }

        if let Some(file) = &self.import_file {
            validate_relative_path("import-file", file)?;
        }

        for (namespace, path) in &self.map {
            if namespace.is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "map".to_string(),
                    reason: "namespace cannot be empty".to_string(),
                });
            }
            validate_relative_path(&format!("map.{}", namespace), path)?;
        }

        for (url, version) in &self.packages {
            validate_package(url, version)?;
        }

        for (alias, url) in &self.aliases {
            if !self.packages.contains_key(url) {
                return Err(ConfigError::InvalidValue {
                    field: format!("aliases.{}", alias),
                    reason: format!("'{}' is not a declared package", url),
                });
            }
        }

        Ok(())
    }

    /// Effective packages directory
    pub fn packages_directory(&self) -> &str {
        self.packages_directory
            .as_deref()
            .unwrap_or(DEFAULT_PACKAGES_DIRECTORY)
    }

    /// Effective import file name
    pub fn import_file(&self) -> &str {
        self.import_file.as_deref().unwrap_or(DEFAULT_IMPORT_FILE)
    }

}

fn validate_relative_path(field: &str, path: &str) -> ConfigResult<()> {
    if path.is_empty() {
        return Err(ConfigError::InvalidValue {
            field: field.to_string(),
            reason: "path cannot be empty".to_string(),
        });
    }

    if Path::new(path).is_absolute() {
        return Err(ConfigError::InvalidValue {
            field: field.to_string(),
            reason: format!("'{}' must be relative to the project root", path),
        });
    }

    Ok(())
}

/// Validate a package declaration
pub(crate) fn validate_package(url: &str, version: &str) -> ConfigResult<()> {
    if url.is_empty() {
        return Err(ConfigError::InvalidValue {
            field: "packages".to_string(),
            reason: "package url cannot be empty".to_string(),
        });
    }

    if version.trim().is_empty() {
        return Err(ConfigError::InvalidValue {
            field: format!("packages.{}", url),
            reason: "version cannot be empty".to_string(),
        });
    }

    Ok(())
}
