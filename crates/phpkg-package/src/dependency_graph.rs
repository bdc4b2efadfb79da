//! Package dependency graph
//!
//! A [`Digraph`] whose vertices are [`ResolvedPackage`]s and whose edges mean
//! "depends on". Queries take a [`Selector`] instead of an arbitrary closure.

use crate::graph::{Digraph, Edge};
use crate::lockfile::LockedPackage;
use crate::repository::{RepositoryIdentity, ResolvedPackage};
use crate::resolver::{Manifests, ResolverError, ResolverResult};
use crate::version::Version;
use std::collections::BTreeSet;

/// The vertex queries dependency resolution needs
#[derive(Debug, Clone, Copy)]
pub enum Selector<'a> {
    /// Exactly this node key
    Key(&'a str),
    /// Any version of a repository
    Repository { owner: &'a str, repo: &'a str },
    /// A version of a repository at or above `version`
    VersionAtLeast {
        owner: &'a str,
        repo: &'a str,
        version: &'a Version,
    },
}

impl<'a> Selector<'a> {
    pub fn repository(identity: &'a RepositoryIdentity) -> Self {
        Selector::Repository {
            owner: &identity.owner,
            repo: &identity.repo,
        }
    }

    pub fn matches(&self, package: &ResolvedPackage) -> bool {
        match self {
            Selector::Key(key) => package.key() == *key,
            Selector::Repository { owner, repo } => {
                package.identity.is_same_repository(owner, repo)
            }
            Selector::VersionAtLeast {
                owner,
                repo,
                version,
            } => package.identity.is_same_repository(owner, repo) && package.version >= **version,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    graph: Digraph<ResolvedPackage>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the graph of everything that is installed
    ///
    /// One vertex per locked package, then an edge from each package to the
    /// locked entry of every dependency its own manifest declares. Packages
    /// without a manifest declare nothing.
    pub fn for_locked(locked: &[LockedPackage], declared: &Manifests) -> ResolverResult<Self> {
        let installed: Vec<ResolvedPackage> = locked.iter().map(LockedPackage::to_resolved).collect();

        let mut graph = Self::new();
        for package in &installed {
            graph.add(package.clone());
        }

        for package in &installed {
            let Some(manifest) = declared.get(&package.identity) else {
                continue;
            };

            for url in manifest.packages.keys() {
                let identity = RepositoryIdentity::from_url(url)?;
                let dependency = installed
                    .iter()
                    .find(|candidate| candidate.identity == identity)
                    .ok_or_else(|| ResolverError::LookupFailed {
                        package: package.to_string(),
                        dependency: url.clone(),
                    })?;
                graph.add_dependency(package.clone(), dependency.clone());
            }
        }

        tracing::debug!(
            packages = graph.len(),
            edges = graph.edges().len(),
            "built dependency graph"
        );
        Ok(graph)
    }

    /// Add a package unless a vertex with the same key exists
    pub fn add(&mut self, package: ResolvedPackage) {
        if !self.graph.contains_key(&package.key()) {
            self.graph.add_node(package);
        }
    }

    /// Record that `package` depends on `dependency`, adding either if missing
    pub fn add_dependency(&mut self, package: ResolvedPackage, dependency: ResolvedPackage) {
        self.graph.add_edge(package, dependency);
    }

    /// Remove a package and every edge touching it
    pub fn remove(&mut self, package: &ResolvedPackage) {
        self.graph.remove(package);
    }

    pub fn has(&self, selector: &Selector<'_>) -> bool {
        self.graph.has_node(|package| selector.matches(package))
    }

    /// First package matching the selector
    pub fn find(&self, selector: &Selector<'_>) -> Option<&ResolvedPackage> {
        self.graph.find(|package| selector.matches(package))
    }

    pub fn filter(&self, selector: &Selector<'_>) -> Vec<&ResolvedPackage> {
        self.graph.filter(|package| selector.matches(package))
    }

    /// Every package `package` depends on, directly or transitively, in DFS order
    pub fn dependencies_of(&self, package: &ResolvedPackage) -> Vec<&ResolvedPackage> {
        self.graph
            .depth_first_search(package)
            .into_iter()
            .skip(1)
            .collect()
    }

    pub fn direct_dependencies(&self, package: &ResolvedPackage) -> Vec<&ResolvedPackage> {
        self.graph.out_neighbors(package)
    }

    /// Packages other than `package` itself that depend directly on it
    pub fn dependents_of(&self, package: &ResolvedPackage) -> Vec<&ResolvedPackage> {
        let key = package.key();
        self.graph
            .in_neighbors(package)
            .into_iter()
            .filter(|dependent| dependent.key() != key)
            .collect()
    }

    /// Replace `loser` with `winner`
    ///
    /// Edges into the loser are redirected to the winner, the loser's own
    /// outgoing edges are dropped, and the winner is added if missing. A
    /// winner that depended on the loser ends up with an edge to itself.
    pub fn swap(&mut self, loser: &ResolvedPackage, winner: &ResolvedPackage) {
        let loser_key = loser.key();
        let winner_key = winner.key();

        self.graph.rewrite_edges(|edge| {
            if edge.from == loser_key {
                None
            } else if edge.to == loser_key {
                Some(Edge::new(edge.from.clone(), winner_key.clone()))
            } else {
                Some(edge.clone())
            }
        });
        self.graph.remove_key(&loser_key);
        self.add(winner.clone());
    }

    /// Vertices in insertion order
    pub fn packages(&self) -> impl Iterator<Item = &ResolvedPackage> {
        self.graph.vertices().iter()
    }

    pub fn edges(&self) -> &[Edge] {
        self.graph.edges()
    }

    pub fn get(&self, key: &str) -> Option<&ResolvedPackage> {
        self.graph.get(key)
    }

    /// Distinct repositories present, in first-seen order
    pub fn repositories(&self) -> Vec<&RepositoryIdentity> {
        let mut repositories: Vec<&RepositoryIdentity> = Vec::new();
        for package in self.packages() {
            if !repositories.contains(&&package.identity) {
                repositories.push(&package.identity);
            }
        }
        repositories
    }

    /// Whether every edge endpoint is a vertex
    pub fn is_consistent(&self) -> bool {
        self.graph.dangling_edges().is_empty()
    }

    /// Vertex keys and edges as sets, for structural comparison
    pub fn fingerprint(&self) -> (BTreeSet<String>, BTreeSet<Edge>) {
        (
            self.packages().map(ResolvedPackage::key).collect(),
            self.edges().iter().cloned().collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.graph.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.is_empty()
    }
}
