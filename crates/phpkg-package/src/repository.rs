//! Repository identity and resolved packages

use crate::graph::Vertex;
use crate::version::Version;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// The Git host every package currently lives on
pub const GITHUB_DOMAIN: &str = "github.com";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Invalid package url: '{0}'")]
pub struct InvalidPackageUrl(pub String);

/// Identifies a remote package independent of its version
///
/// Two identities are the same repository when owner and repo match exactly;
/// the domain is informational.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryIdentity {
    pub domain: String,
    pub owner: String,
    pub repo: String,
}

impl RepositoryIdentity {
    pub fn new(
        domain: impl Into<String>,
        owner: impl Into<String>,
        repo: impl Into<String>,
    ) -> Self {
        Self {
            domain: domain.into(),
            owner: owner.into(),
            repo: repo.into(),
        }
    }

    pub fn github(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self::new(GITHUB_DOMAIN, owner, repo)
    }

    /// Parse a package URL
    ///
    /// Accepted forms:
    /// - `git@github.com:owner/repo.git`
    /// - `https://github.com/owner/repo.git` (with or without `.git`)
    /// - `github.com/owner/repo`
    pub fn from_url(url: &str) -> Result<Self, InvalidPackageUrl> {
        let invalid = || InvalidPackageUrl(url.to_string());
        let trimmed = url.trim();

        let (domain, path) = if let Some(rest) = trimmed.strip_prefix("git@") {
            rest.split_once(':').ok_or_else(invalid)?
        } else {
            let rest = trimmed
                .strip_prefix("https://")
                .or_else(|| trimmed.strip_prefix("http://"))
                .unwrap_or(trimmed);
            rest.split_once('/').ok_or_else(invalid)?
        };

        let path = path.trim_end_matches('/');
        let path = path.strip_suffix(".git").unwrap_or(path);
        let (owner, repo) = path.split_once('/').ok_or_else(invalid)?;

        let valid_part = |part: &str| {
            !part.is_empty()
                && part
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        };

        if domain.is_empty() || !valid_part(owner) || !valid_part(repo) {
            return Err(invalid());
        }

        Ok(Self::new(domain, owner, repo))
    }

    /// Whether both identities name the same repository
    pub fn is_same_repository(&self, owner: &str, repo: &str) -> bool {
        self.owner == owner && self.repo == repo
    }

    pub fn ssh_url(&self) -> String {
        format!("git@{}:{}/{}.git", self.domain, self.owner, self.repo)
    }

    pub fn https_url(&self) -> String {
        format!("https://{}/{}/{}.git", self.domain, self.owner, self.repo)
    }

    /// Directory a package is installed into under `packages_dir`
    pub fn install_path(&self, packages_dir: &Path) -> PathBuf {
        packages_dir.join(&self.owner).join(&self.repo)
    }
}

impl PartialEq for RepositoryIdentity {
    fn eq(&self, other: &Self) -> bool {
        self.is_same_repository(&other.owner, &other.repo)
    }
}

impl Eq for RepositoryIdentity {}

impl Hash for RepositoryIdentity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.owner.hash(state);
        self.repo.hash(state);
    }
}

impl fmt::Display for RepositoryIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// A package pinned to a version and the content hash that was downloaded
///
/// `version` is the requested tag (or `development`); `hash` is the commit it
/// resolved to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedPackage {
    pub identity: RepositoryIdentity,
    pub version: Version,
    pub hash: String,
}

impl ResolvedPackage {
    pub fn new(identity: RepositoryIdentity, version: Version, hash: impl Into<String>) -> Self {
        Self {
            identity,
            version,
            hash: hash.into(),
        }
    }

    pub fn owner(&self) -> &str {
        &self.identity.owner
    }

    pub fn repo(&self) -> &str {
        &self.identity.repo
    }

    /// Deterministic graph key
    pub fn key(&self) -> String {
        format!(
            "owner:{},repo:{},version:{},hash:{}",
            self.identity.owner, self.identity.repo, self.version, self.hash
        )
    }

    /// Whether `other` is another version of the same repository
    pub fn is_same_repository(&self, other: &ResolvedPackage) -> bool {
        self.identity == other.identity
    }
}

/// Same node iff the keys match
impl PartialEq for ResolvedPackage {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for ResolvedPackage {}

impl Vertex for ResolvedPackage {
    fn key(&self) -> String {
        ResolvedPackage::key(self)
    }
}

impl fmt::Display for ResolvedPackage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.identity, self.version)
    }
}
