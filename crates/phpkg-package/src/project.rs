//! Project session
//!
//! Ties the configuration, the lock file and the manifests of installed
//! packages together for one command invocation.

use crate::dependency_graph::DependencyGraph;
use crate::import_map::ImportMap;
use crate::lockfile::Lockfile;
use crate::resolver::{Manifests, Resolver};
use crate::{PackageError, Result};
use phpkg_config::{Config, ConfigLoader, PackageManifest};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct Project {
    config: Config,
    root: PathBuf,
    lock_path: PathBuf,
    packages_path: PathBuf,
    build_root: PathBuf,
    lockfile: Lockfile,
}

impl Project {
    /// Open the project containing `dir`
    pub fn open(dir: &Path) -> Result<Self> {
        Self::open_with(&mut ConfigLoader::new(), dir)
    }

    /// Open the project containing `dir` with a specific loader
    pub fn open_with(loader: &mut ConfigLoader, dir: &Path) -> Result<Self> {
        let config = loader.load_from_directory(dir)?;
        let not_a_project = || PackageError::NotAProject(dir.to_path_buf());

        let root = config
            .project_root()
            .map(Path::to_path_buf)
            .ok_or_else(not_a_project)?;
        let lock_path = config.lock_file_path().ok_or_else(not_a_project)?;
        let packages_path = config.packages_path().ok_or_else(not_a_project)?;
        let build_root = config.build_root().ok_or_else(not_a_project)?;

        let lockfile = Lockfile::from_file_or_default(&lock_path)?;
        lockfile.verify().map_err(PackageError::Lockfile)?;

        tracing::debug!(
            root = %root.display(),
            packages = lockfile.packages.len(),
            "opened project"
        );

        Ok(Self {
            config,
            root,
            lock_path,
            packages_path,
            build_root,
            lockfile,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn lockfile(&self) -> &Lockfile {
        &self.lockfile
    }

    pub fn packages_path(&self) -> &Path {
        &self.packages_path
    }

    /// `builds/<environment>` under the project root
    pub fn build_root(&self) -> &Path {
        &self.build_root
    }

    /// Manifests of every locked package, read from its install directory
    pub fn manifests(&self) -> Result<Manifests> {
        self.lockfile
            .packages
            .iter()
            .map(|locked| -> Result<_> {
                let identity = locked.identity();
                let manifest =
                    PackageManifest::load_from_package_root(&identity.install_path(&self.packages_path))?;
                Ok((identity, manifest))
            })
            .collect()
    }

    /// Build the installed graph and collapse it to one version per repository
    pub fn resolve(&self) -> Result<DependencyGraph> {
        let manifests = self.manifests()?;
        self.resolve_with(&manifests)
    }

    fn resolve_with(&self, manifests: &Manifests) -> Result<DependencyGraph> {
        let mut resolver = Resolver::from_lock(&self.lockfile.packages, manifests)?;

        for conflict in resolver.conflicts() {
            tracing::debug!("{}", conflict.report());
        }

        resolver.resolve()?;
        Ok(resolver.into_graph())
    }

    /// Resolve and map every namespace to where its sources live
    pub fn import_map(&self, build_root: &Path) -> Result<ImportMap> {
        let manifests = self.manifests()?;
        let graph = self.resolve_with(&manifests)?;

        Ok(ImportMap::build(
            &graph,
            &manifests,
            &self.config.project.map,
            &self.packages_path,
            build_root,
        ))
    }

    /// Rewrite the lock file from a resolved graph
    pub fn write_lockfile(&mut self, graph: &DependencyGraph) -> Result<()> {
        let lockfile = Lockfile::from_graph(graph, &self.lockfile.urls());
        lockfile.write_to_file(&self.lock_path)?;
        self.lockfile = lockfile;
        Ok(())
    }
}
