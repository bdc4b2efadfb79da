//! Source host contract
//!
//! Packages are downloaded from a Git host at a specific commit. The host
//! itself (HTTP client, credentials, archive extraction) lives outside this
//! crate; only the calls the package manager makes are modelled here.

use crate::lockfile::LockedPackage;
use crate::repository::RepositoryIdentity;
use crate::version::Version;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HostError {
    #[error("Repository '{0}' not found")]
    NotFound(String),

    #[error("Credential for '{0}' is not valid")]
    InvalidCredential(String),

    #[error("Host request failed: {0}")]
    Other(String),
}

impl HostError {
    /// Whether the same request could succeed if tried again
    pub fn is_retryable(&self) -> bool {
        matches!(self, HostError::Other(_))
    }
}

pub type HostResult<T> = Result<T, HostError>;

/// A Git host packages are fetched from
pub trait SourceHost {
    /// Hash of the newest commit on the default branch
    fn latest_commit(&self, repository: &RepositoryIdentity) -> HostResult<String>;

    /// Hash of the commit `tag` points at
    fn tag_commit(&self, repository: &RepositoryIdentity, tag: &str) -> HostResult<String>;

    /// Write the repository contents at `hash` into `destination`
    fn download(
        &self,
        repository: &RepositoryIdentity,
        hash: &str,
        destination: &Path,
    ) -> HostResult<()>;
}

/// Pin `url` at `version` to a commit
///
/// `development` follows the latest commit; any other version is a tag.
pub fn lock_package<H>(host: &H, url: &str, version: &str) -> crate::Result<LockedPackage>
where
    H: SourceHost + ?Sized,
{
    let repository = RepositoryIdentity::from_url(url)?;
    let requested = Version::parse(version);

    let hash = if requested.is_development() {
        host.latest_commit(&repository)?
    } else {
        host.tag_commit(&repository, requested.as_str())?
    };

    tracing::debug!(package = %repository, version, hash = %hash, "locked package");

    Ok(LockedPackage {
        url: url.to_string(),
        owner: repository.owner,
        repo: repository.repo,
        version: requested.as_str().to_string(),
        hash,
    })
}

/// Download a locked package into `packages_dir/owner/repo`
///
/// The download lands in a sibling staging directory first. Whatever was
/// installed before is only replaced once the download succeeds.
pub fn install_package<H>(
    host: &H,
    package: &LockedPackage,
    packages_dir: &Path,
) -> crate::Result<PathBuf>
where
    H: SourceHost + ?Sized,
{
    let repository = package.identity();
    let destination = repository.install_path(packages_dir);
    let staging = staging_path(&destination);

    if staging.exists() {
        std::fs::remove_dir_all(&staging)?;
    }
    std::fs::create_dir_all(&staging)?;

    if let Err(err) = host.download(&repository, &package.hash, &staging) {
        if let Err(cleanup) = std::fs::remove_dir_all(&staging) {
            tracing::warn!(
                path = %staging.display(),
                error = %cleanup,
                "failed to remove staging directory"
            );
        }
        return Err(err.into());
    }

    if destination.exists() {
        std::fs::remove_dir_all(&destination)?;
    }
    std::fs::rename(&staging, &destination)?;

    tracing::info!(
        package = %repository,
        version = %package.version,
        path = %destination.display(),
        "installed package"
    );
    Ok(destination)
}

/// `owner/.repo.download` next to `owner/repo`
fn staging_path(destination: &Path) -> PathBuf {
    let name = destination
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    destination.with_file_name(format!(".{}.download", name))
}
