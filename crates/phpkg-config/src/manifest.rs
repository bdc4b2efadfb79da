//! Package Manifest
//!
//! The subset of an installed package's own `phpkg.config.json` that dependency
//! resolution and import mapping care about.

use crate::project::validate_package;
use crate::{read_config_file, ConfigError, ConfigResult, CONFIG_FILE};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Package manifest (subset of ProjectConfig focused on dependencies and layout)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct PackageManifest {
    /// Declared dependencies: package URL -> version
    #[serde(default)]
    pub packages: IndexMap<String, String>,

    /// Namespace -> file path, relative to the package root
    #[serde(default)]
    pub map: IndexMap<String, String>,
}

impl PackageManifest {
    /// Parse manifest from a JSON string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// Load manifest from a file
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = read_config_file(path)?;

        let manifest = Self::from_str(&content).map_err(|e| ConfigError::JsonParseError {
            file: path.to_path_buf(),
            error: e,
        })?;

        manifest.validate()?;
        Ok(manifest)
    }

    /// Load the manifest stored at the root of an installed package.
    ///
    /// Packages without a config file are valid; they declare nothing.
    pub fn load_from_package_root(root: &Path) -> ConfigResult<Self> {
        match Self::load_from_file(&root.join(CONFIG_FILE)) {
            Err(ConfigError::NotFound(path)) => {
                tracing::debug!(path = %path.display(), "package has no manifest");
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Validate the manifest
    pub fn validate(&self) -> ConfigResult<()> {
        for (url, version) in &self.packages {
            validate_package(url, version)?;
        }

        if let Some(namespace) = self.map.keys().find(|namespace| namespace.is_empty()) {
            return Err(ConfigError::InvalidValue {
                field: format!("map.{}", namespace),
                reason: "namespace cannot be empty".to_string(),
            });
        }

        Ok(())
    }

    /// Whether the package declares any dependencies
    pub fn has_dependencies(&self) -> bool {
        !self.packages.is_empty()
    }
}

impl From<&crate::ProjectConfig> for PackageManifest {
    fn from(config: &crate::ProjectConfig) -> Self {
        Self {
            packages: config.packages.clone(),
            map: config.map.clone(),
        }
    }
}
