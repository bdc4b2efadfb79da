//! Configuration Loader
//!
//! Handles loading and merging configuration from multiple sources with proper precedence.

use crate::global::{Environment, GlobalConfig};
use crate::project::{ProjectConfig, DEFAULT_PACKAGES_DIRECTORY};
use crate::{ConfigError, ConfigResult, CONFIG_FILE, LOCK_FILE};
use std::env;
use std::path::{Path, PathBuf};

/// Configuration loader
///
/// Loads configuration from multiple sources and merges them with proper precedence:
/// 1. Global config (~/.phpkg/config.toml) - lowest priority
/// 2. Project config (./phpkg.config.json) - overrides global
/// 3. Environment variables (PHPKG_*) - overrides project
/// 4. CLI flags - highest priority (handled by caller)
pub struct ConfigLoader {
    /// Cached global config path
    global_config_path: Option<PathBuf>,
}

/// Merged configuration result
#[derive(Debug, Clone)]
pub struct Config {
    /// Project configuration
    pub project: ProjectConfig,

    /// Global configuration
    pub global: GlobalConfig,

    /// Project root directory (where phpkg.config.json was found)
    pub project_root: Option<PathBuf>,

    /// Environment override from PHPKG_ENVIRONMENT
    pub environment_override: Option<Environment>,
}

impl ConfigLoader {
    /// Create a new configuration loader
    pub fn new() -> Self {
        Self {
            global_config_path: None,
        }
    }

    /// Create a loader reading global configuration from an explicit path
    pub fn with_global_config_path(path: impl Into<PathBuf>) -> Self {
        Self {
            global_config_path: Some(path.into()),
        }
    }

    /// Load configuration starting from the given directory
    ///
    /// Walks up the directory tree to find phpkg.config.json, then loads and merges
    /// global config if it exists.
    pub fn load_from_directory(&mut self, start_dir: &Path) -> ConfigResult<Config> {
        let (project_root, project_config) = self.find_project_config(start_dir)?;
        self.finish(project_root, project_config)
    }

    /// Load configuration from a specific project config file
    pub fn load_from_file(&mut self, config_path: &Path) -> ConfigResult<Config> {
        let project_config = ProjectConfig::load_from_file(config_path)?;
        let project_root = config_path.parent().map(|p| p.to_path_buf());
        self.finish(project_root, project_config)
    }

    fn finish(
        &mut self,
        project_root: Option<PathBuf>,
        project_config: ProjectConfig,
    ) -> ConfigResult<Config> {
        // Global config is optional, a broken one is reported but not fatal
        let global_config = self.load_global_config().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "ignoring unreadable global config");
            GlobalConfig::default()
        });

        let project_config = self.apply_env_overrides(project_config)?;
        let environment_override = match env::var("PHPKG_ENVIRONMENT") {
            Ok(value) => Some(value.parse::<Environment>()?),
            Err(_) => None,
        };

        Ok(Config {
            project: project_config,
            global: global_config,
            project_root,
            environment_override,
        })
    }

    /// Find project configuration by walking up directory tree
    ///
    /// Returns (project_root, project_config), or a default config with no root
    fn find_project_config(
        &self,
        start_dir: &Path,
    ) -> ConfigResult<(Option<PathBuf>, ProjectConfig)> {
        let mut current = start_dir.to_path_buf();

        loop {
            let config_path = current.join(CONFIG_FILE);

            if config_path.exists() {
                tracing::debug!(path = %config_path.display(), "found project config");
                let project_config = ProjectConfig::load_from_file(&config_path)?;
                return Ok((Some(current), project_config));
            }

            match current.parent() {
                Some(parent) => current = parent.to_path_buf(),
                None => return Ok((None, ProjectConfig::default())),
            }
        }
    }

    /// Load global configuration from ~/.phpkg/config.toml
    fn load_global_config(&mut self) -> ConfigResult<GlobalConfig> {
        let path = match &self.global_config_path {
            Some(path) => path.clone(),
            None => {
                let path = GlobalConfig::global_config_path()?;
                self.global_config_path = Some(path.clone());
                path
            }
        };

        if !path.exists() {
            return Ok(GlobalConfig::default());
        }

        GlobalConfig::load_from_file(&path)
    }

    /// Apply environment variable overrides to project config
    ///
    /// Recognized: PHPKG_PACKAGES_DIRECTORY
    fn apply_env_overrides(&self, mut config: ProjectConfig) -> ConfigResult<ProjectConfig> {
        if let Ok(dir) = env::var("PHPKG_PACKAGES_DIRECTORY") {
            if dir.is_empty() || Path::new(&dir).is_absolute() {
                return Err(ConfigError::InvalidValue {
                    field: "PHPKG_PACKAGES_DIRECTORY".to_string(),
                    reason: format!("'{}' must be a non-empty relative path", dir),
                });
            }
            config.packages_directory = Some(dir);
        }

        Ok(config)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    /// Get the project root directory
    pub fn project_root(&self) -> Option<&Path> {
        self.project_root.as_deref()
    }

    /// Check if this is a project (has phpkg.config.json)
    pub fn is_project(&self) -> bool {
        self.project_root.is_some()
    }

    /// Effective packages directory (project > global > default), relative to the root
    pub fn packages_directory(&self) -> &str {
        self.project
            .packages_directory
            .as_deref()
            .or_else(|| self.global.packages_directory())
            .unwrap_or(DEFAULT_PACKAGES_DIRECTORY)
    }

    /// Effective build environment (env > global > development)
    pub fn environment(&self) -> Environment {
        self.environment_override
            .or_else(|| self.global.environment())
            .unwrap_or_default()
    }

    /// Absolute packages directory, if this is a project
    pub fn packages_path(&self) -> Option<PathBuf> {
        self.project_root()
            .map(|root| root.join(self.packages_directory()))
    }

    /// Lock file location, if this is a project
    pub fn lock_file_path(&self) -> Option<PathBuf> {
        self.project_root().map(|root| root.join(LOCK_FILE))
    }

    /// Build output directory, `builds/<environment>` under the project root
    pub fn build_root(&self) -> Option<PathBuf> {
        self.project_root()
            .map(|root| root.join("builds").join(self.environment().as_str()))
    }
}
