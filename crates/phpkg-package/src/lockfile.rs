//! Package lock file (phpkg.config-lock.json) for reproducible installs

use crate::dependency_graph::DependencyGraph;
use crate::repository::{RepositoryIdentity, ResolvedPackage, GITHUB_DOMAIN};
use crate::version::Version;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Lock file structure (phpkg.config-lock.json)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Lockfile {
    /// Lock file format version
    pub version: u32,
    /// Locked packages, in install order
    #[serde(default)]
    pub packages: Vec<LockedPackage>,
    /// Metadata
    #[serde(default)]
    pub metadata: LockfileMetadata,
}

impl Lockfile {
    /// Current lock file format version
    pub const VERSION: u32 = 1;

    /// Create new empty lock file
    pub fn new() -> Self {
        Self {
            version: Self::VERSION,
            packages: Vec::new(),
            metadata: LockfileMetadata::default(),
        }
    }

    /// Parse lock file from JSON string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// Load lock file from file
    pub fn from_file(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_str(&content)?)
    }

    /// Load lock file, treating a missing file as an empty lock
    pub fn from_file_or_default(path: &Path) -> crate::Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no lock file, starting empty");
            return Ok(Self::new());
        }
        Self::from_file(path)
    }

    /// Serialize to pretty JSON
    pub fn to_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write lock file to file
    pub fn write_to_file(&self, path: &Path) -> crate::Result<()> {
        let content = self.to_string()?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Add a locked package, replacing an entry with the same URL in place
    pub fn add_package(&mut self, package: LockedPackage) {
        match self.packages.iter_mut().find(|p| p.url == package.url) {
            Some(existing) => *existing = package,
            None => self.packages.push(package),
        }
    }

    /// Get locked package by URL
    pub fn get_package(&self, url: &str) -> Option<&LockedPackage> {
        self.packages.iter().find(|p| p.url == url)
    }

    /// Get locked package by repository
    pub fn find(&self, owner: &str, repo: &str) -> Option<&LockedPackage> {
        self.packages
            .iter()
            .find(|p| p.owner == owner && p.repo == repo)
    }

    /// Remove package from lock file
    pub fn remove_package(&mut self, url: &str) -> bool {
        let len = self.packages.len();
        self.packages.retain(|p| p.url != url);
        len != self.packages.len()
    }

    /// Verify lock file integrity
    pub fn verify(&self) -> Result<(), String> {
        if self.version > Self::VERSION {
            return Err(format!(
                "Lock file version {} is newer than supported version {}",
                self.version,
                Self::VERSION
            ));
        }

        let mut seen = HashSet::new();
        for pkg in &self.packages {
            if !seen.insert((pkg.owner.as_str(), pkg.repo.as_str())) {
                return Err(format!(
                    "Duplicate package in lock file: {}/{}",
                    pkg.owner, pkg.repo
                ));
            }
        }

        Ok(())
    }

    /// Lock the packages that survived resolution, in graph order
    ///
    /// `urls` maps repositories to the URL they were declared with; anything
    /// missing falls back to the SSH URL.
    pub fn from_graph(graph: &DependencyGraph, urls: &HashMap<RepositoryIdentity, String>) -> Self {
        let mut lockfile = Self::new();

        for package in graph.packages() {
            let url = urls
                .get(&package.identity)
                .cloned()
                .unwrap_or_else(|| package.identity.ssh_url());
            lockfile.add_package(LockedPackage::from_resolved(package, url));
        }

        lockfile.metadata = LockfileMetadata {
            generated_at: Some(
                chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            ),
            phpkg_version: Some(env!("CARGO_PKG_VERSION").to_string()),
        };

        lockfile
    }

    /// URLs recorded for each locked repository
    pub fn urls(&self) -> HashMap<RepositoryIdentity, String> {
        self.packages
            .iter()
            .map(|p| (p.identity(), p.url.clone()))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}

impl Default for Lockfile {
    fn default() -> Self {
        Self::new()
    }
}

/// Locked package entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LockedPackage {
    /// URL the package was declared with
    pub url: String,
    pub owner: String,
    pub repo: String,
    /// Requested version (tag name or `development`)
    pub version: String,
    /// Commit hash that was downloaded
    pub hash: String,
}

impl LockedPackage {
    pub fn identity(&self) -> RepositoryIdentity {
        let domain = RepositoryIdentity::from_url(&self.url)
            .map(|identity| identity.domain)
            .unwrap_or_else(|_| GITHUB_DOMAIN.to_string());
        RepositoryIdentity::new(domain, &self.owner, &self.repo)
    }

    pub fn to_resolved(&self) -> ResolvedPackage {
        ResolvedPackage::new(self.identity(), Version::parse(&self.version), &self.hash)
    }

    pub fn from_resolved(package: &ResolvedPackage, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            owner: package.identity.owner.clone(),
            repo: package.identity.repo.clone(),
            version: package.version.to_string(),
            hash: package.hash.clone(),
        }
    }
}

/// Lock file metadata
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "kebab-case")]
pub struct LockfileMetadata {
    /// When the lock file was generated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<String>,
    /// phpkg version used to generate the lock file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phpkg_version: Option<String>,
}
