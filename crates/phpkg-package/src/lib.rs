//! phpkg Package Resolution
//!
//! Dependency graph construction and resolution for installed packages,
//! lock file handling, and the import map that links namespaces to sources.
//!
//! # Example
//!
//! ```no_run
//! use phpkg_package::Project;
//! use std::path::Path;
//!
//! let project = Project::open(Path::new(".")).unwrap();
//! let map = project.import_map(project.build_root()).unwrap();
//! for (namespace, path) in map.iter() {
//!     println!("{} => {}", namespace, path.display());
//! }
//! ```

pub mod dependency_graph;
pub mod graph;
pub mod host;
pub mod import_map;
pub mod lockfile;
pub mod project;
pub mod repository;
pub mod resolver;
pub mod version;

pub use dependency_graph::{DependencyGraph, Selector};
pub use graph::{Digraph, Edge, Vertex};
pub use host::{install_package, lock_package, HostError, SourceHost};
pub use import_map::ImportMap;
pub use lockfile::{LockedPackage, Lockfile, LockfileMetadata};
pub use project::Project;
pub use repository::{InvalidPackageUrl, RepositoryIdentity, ResolvedPackage};
pub use resolver::{Conflict, Manifests, Resolver, ResolverError, ResolverResult};
pub use version::{compare as compare_versions, Version};

use std::path::PathBuf;

/// Package management errors
#[derive(Debug, thiserror::Error)]
pub enum PackageError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error(transparent)]
    Config(#[from] phpkg_config::ConfigError),

    #[error("Resolution failed: {0}")]
    Resolver(#[from] ResolverError),

    #[error(transparent)]
    Host(#[from] HostError),

    #[error(transparent)]
    InvalidPackageUrl(#[from] InvalidPackageUrl),

    #[error("Invalid lock file: {0}")]
    Lockfile(String),

    #[error("No phpkg.config.json found in {0} or any parent directory")]
    NotAProject(PathBuf),
}

pub type Result<T> = std::result::Result<T, PackageError>;
