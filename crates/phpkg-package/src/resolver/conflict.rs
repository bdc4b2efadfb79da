//! Conflict detection and collapse for dependency resolution
//!
//! A conflict is a repository with more than one vertex in the graph. It is
//! collapsed by keeping the highest version and swapping every other version
//! out for it. Compatibility between the versions is not checked; a collapse
//! across major versions is logged and performed anyway.

use super::{ResolverError, ResolverResult};
use crate::dependency_graph::{DependencyGraph, Selector};
use crate::repository::{RepositoryIdentity, ResolvedPackage};

/// Conflict information for reporting
#[derive(Debug, Clone, PartialEq)]
pub struct Conflict {
    pub repository: RepositoryIdentity,
    /// Installed versions, in graph order
    pub installed: Vec<ResolvedPackage>,
}

impl Conflict {
    pub fn new(repository: RepositoryIdentity, installed: Vec<ResolvedPackage>) -> Self {
        Self {
            repository,
            installed,
        }
    }

    /// The version resolution would keep
    pub fn winner(&self) -> Option<&ResolvedPackage> {
        select_winner(self.installed.iter())
    }

    /// Whether any installed version has a different major than the winner
    pub fn crosses_major_version(&self) -> bool {
        let Some(winner) = self.winner() else {
            return false;
        };
        self.installed
            .iter()
            .any(|package| package.version.has_major_change(&winner.version))
    }

    /// Generate human-readable conflict report
    pub fn report(&self) -> String {
        let mut report = format!(
            "{} versions of '{}' are installed:\n",
            self.installed.len(),
            self.repository
        );

        for package in &self.installed {
            report.push_str(&format!("  {} ({})\n", package.version, package.hash));
        }

        if let Some(winner) = self.winner() {
            report.push_str(&format!("Resolution keeps {}\n", winner.version));
        }
        if self.crosses_major_version() {
            report.push_str("Warning: the kept version is a different major version\n");
        }

        report
    }

    pub fn version_count(&self) -> usize {
        self.installed.len()
    }
}

/// List every repository installed more than once
pub fn detect_conflicts(graph: &DependencyGraph) -> Vec<Conflict> {
    graph
        .repositories()
        .into_iter()
        .filter_map(|repository| {
            let installed = graph.filter(&Selector::repository(repository));
            (installed.len() > 1).then(|| {
                Conflict::new(repository.clone(), installed.into_iter().cloned().collect())
            })
        })
        .collect()
}

/// Highest version wins; ties keep the earlier candidate
pub fn select_winner<'a, I>(installed: I) -> Option<&'a ResolvedPackage>
where
    I: IntoIterator<Item = &'a ResolvedPackage>,
{
    installed.into_iter().fold(None, |best, candidate| match best {
        Some(current) if candidate.version <= current.version => Some(current),
        _ => Some(candidate),
    })
}

/// Collapse every version of `repository` into the winner
pub fn collapse(
    graph: &mut DependencyGraph,
    repository: &RepositoryIdentity,
) -> ResolverResult<ResolvedPackage> {
    let installed: Vec<ResolvedPackage> = graph
        .filter(&Selector::repository(repository))
        .into_iter()
        .cloned()
        .collect();

    let winner = select_winner(installed.iter())
        .cloned()
        .ok_or_else(|| ResolverError::NoWinner(repository.to_string()))?;
    let winner_key = winner.key();

    for loser in installed.iter().filter(|package| package.key() != winner_key) {
        if loser.version.has_major_change(&winner.version) {
            tracing::warn!(
                repository = %repository,
                from = %loser.version,
                to = %winner.version,
                "collapsing across major versions"
            );
        } else {
            tracing::debug!(
                repository = %repository,
                from = %loser.version,
                to = %winner.version,
                "swapping package version"
            );
        }
        graph.swap(loser, &winner);
    }

    Ok(winner)
}
