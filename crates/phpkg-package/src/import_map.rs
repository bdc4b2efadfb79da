//! Namespace to path mapping for a resolved project
//!
//! Installed packages contribute their `map` entries first, in graph order,
//! rooted at their install directory. The project's own entries come last and
//! are rooted at the build directory.

use crate::dependency_graph::DependencyGraph;
use crate::resolver::Manifests;
use indexmap::IndexMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportMap {
    entries: IndexMap<String, PathBuf>,
}

impl ImportMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn build(
        graph: &DependencyGraph,
        manifests: &Manifests,
        project_map: &IndexMap<String, String>,
        packages_dir: &Path,
        build_root: &Path,
    ) -> Self {
        let mut map = Self::new();

        for package in graph.packages() {
            let Some(manifest) = manifests.get(&package.identity) else {
                continue;
            };
            let root = package.identity.install_path(packages_dir);
            for (namespace, relative) in &manifest.map {
                map.insert(namespace, root.join(relative));
            }
        }

        for (namespace, relative) in project_map {
            map.insert(namespace, build_root.join(relative));
        }

        map
    }

    /// Later values win, but a namespace keeps its first position
    fn insert(&mut self, namespace: &str, path: PathBuf) {
        if let Some(previous) = self.entries.insert(namespace.to_string(), path) {
            tracing::debug!(
                namespace,
                previous = %previous.display(),
                "namespace mapped more than once"
            );
        }
    }

    pub fn get(&self, namespace: &str) -> Option<&Path> {
        self.entries.get(namespace).map(PathBuf::as_path)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.entries
            .iter()
            .map(|(namespace, path)| (namespace.as_str(), path.as_path()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_inner(self) -> IndexMap<String, PathBuf> {
        self.entries
    }
}
