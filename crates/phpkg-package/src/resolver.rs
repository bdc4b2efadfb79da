//! Dependency resolution over installed packages
//!
//! Every locked package becomes a vertex and every declared dependency an
//! edge. Resolution then collapses each repository to a single version: the
//! highest one wins and every other version is swapped out for it.

use crate::dependency_graph::{DependencyGraph, Selector};
use crate::lockfile::LockedPackage;
use crate::repository::{InvalidPackageUrl, RepositoryIdentity, ResolvedPackage};
use phpkg_config::PackageManifest;
use std::collections::HashMap;
use thiserror::Error;

pub mod conflict;

pub use conflict::Conflict;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResolverError {
    #[error("Package '{package}' depends on '{dependency}' which is not installed")]
    LookupFailed { package: String, dependency: String },

    #[error("No installed version of '{0}' to resolve to")]
    NoWinner(String),

    #[error(transparent)]
    InvalidPackageUrl(#[from] InvalidPackageUrl),
}

pub type ResolverResult<T> = Result<T, ResolverError>;

/// Manifests of installed packages, by repository
pub type Manifests = HashMap<RepositoryIdentity, PackageManifest>;

/// Owns the dependency graph of one command invocation
#[derive(Debug, Clone, Default)]
pub struct Resolver {
    graph: DependencyGraph,
}

impl Resolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_graph(graph: DependencyGraph) -> Self {
        Self { graph }
    }

    /// Build the graph for `locked` packages, see [`DependencyGraph::for_locked`]
    pub fn build_graph(
        locked: &[LockedPackage],
        manifests: &Manifests,
    ) -> ResolverResult<DependencyGraph> {
        DependencyGraph::for_locked(locked, manifests)
    }

    pub fn from_lock(locked: &[LockedPackage], manifests: &Manifests) -> ResolverResult<Self> {
        Self::build_graph(locked, manifests).map(Self::from_graph)
    }

    pub fn add_package(&mut self, package: ResolvedPackage) {
        self.graph.add(package);
    }

    pub fn add_dependency(&mut self, package: &ResolvedPackage, dependency: ResolvedPackage) {
        self.graph.add_dependency(package.clone(), dependency);
    }

    /// Repositories with more than one installed version
    pub fn conflicts(&self) -> Vec<Conflict> {
        conflict::detect_conflicts(&self.graph)
    }

    /// Collapse every repository to its highest installed version
    ///
    /// Works on a copy; the graph is only replaced once every conflict is
    /// gone. Resolving a resolved graph changes nothing.
    pub fn resolve(&mut self) -> ResolverResult<&DependencyGraph> {
        let mut working = self.graph.clone();

        loop {
            let conflicts = conflict::detect_conflicts(&working);
            if conflicts.is_empty() {
                break;
            }
            for conflict in &conflicts {
                conflict::collapse(&mut working, &conflict.repository)?;
            }
        }

        debug_assert!(working.is_consistent());
        tracing::debug!(packages = working.len(), "dependency graph resolved");

        self.graph = working;
        Ok(&self.graph)
    }

    /// Collapse a single repository, returning the version that was kept
    pub fn resolve_repository(&mut self, owner: &str, repo: &str) -> ResolverResult<ResolvedPackage> {
        let repository = self
            .graph
            .find(&Selector::Repository { owner, repo })
            .map(|package| package.identity.clone())
            .ok_or_else(|| ResolverError::NoWinner(format!("{}/{}", owner, repo)))?;

        let mut working = self.graph.clone();
        let winner = conflict::collapse(&mut working, &repository)?;
        self.graph = working;
        Ok(winner)
    }

    /// Remove a package along with dependencies nothing else needs
    ///
    /// A dependency is kept while any remaining package depends on it or its
    /// repository is one of `roots`. Returns what was removed, the package
    /// itself first.
    pub fn remove_package(
        &mut self,
        package: &ResolvedPackage,
        roots: &[RepositoryIdentity],
    ) -> Vec<ResolvedPackage> {
        if self.graph.get(&package.key()).is_none() {
            return Vec::new();
        }

        let candidates: Vec<ResolvedPackage> = self
            .graph
            .dependencies_of(package)
            .into_iter()
            .cloned()
            .collect();

        self.graph.remove(package);
        let mut removed = vec![package.clone()];

        // Removing an orphan can orphan another candidate, so rescan
        loop {
            let graph = &self.graph;
            let orphan = candidates
                .iter()
                .find(|candidate| {
                    graph.get(&candidate.key()).is_some()
                        && !roots.contains(&candidate.identity)
                        && graph.dependents_of(candidate).is_empty()
                })
                .cloned();
            let Some(orphan) = orphan else {
                break;
            };

            tracing::debug!(package = %orphan, "removing unused dependency");
            self.graph.remove(&orphan);
            removed.push(orphan);
        }

        removed
    }

    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    pub fn into_graph(self) -> DependencyGraph {
        self.graph
    }
}
