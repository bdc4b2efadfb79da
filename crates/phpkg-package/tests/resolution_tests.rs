use phpkg_package::*;
use pretty_assertions::assert_eq;
use std::collections::HashSet;

fn package(owner: &str, repo: &str, version: &str, hash: &str) -> ResolvedPackage {
    ResolvedPackage::new(
        RepositoryIdentity::github(owner, repo),
        Version::parse(version),
        hash,
    )
}

fn locked(owner: &str, repo: &str, version: &str, hash: &str) -> LockedPackage {
    LockedPackage {
        url: format!("git@github.com:{}/{}.git", owner, repo),
        owner: owner.to_string(),
        repo: repo.to_string(),
        version: version.to_string(),
        hash: hash.to_string(),
    }
}

fn manifest_requiring(urls: &[&str]) -> phpkg_config::PackageManifest {
    let mut manifest = phpkg_config::PackageManifest::default();
    for url in urls {
        manifest.packages.insert(url.to_string(), "v1.0.0".to_string());
    }
    manifest
}

/// Several repositories installed in more than one version, with edges into
/// and out of the losing versions
fn tangled_graph() -> DependencyGraph {
    let mut graph = DependencyGraph::new();
    let root = package("app", "root", "development", "h0");
    let a1 = package("o", "a", "v1.0.0", "a1");
    let a2 = package("o", "a", "v1.5.0", "a2");
    let a3 = package("o", "a", "v2.0.0-beta", "a3");
    let b1 = package("o", "b", "v3.0", "b1");
    let b2 = package("o", "b", "v3.0.1", "b2");
    let c = package("o", "c", "v0.1.0", "c1");

    graph.add_dependency(root.clone(), a1.clone());
    graph.add_dependency(root.clone(), b1.clone());
    graph.add_dependency(a1.clone(), b2.clone());
    graph.add_dependency(a2.clone(), c.clone());
    graph.add_dependency(b1.clone(), a3.clone());
    graph.add_dependency(a3.clone(), a1.clone());
    graph
}

mod conflict_collapse {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_highest_version_wins_and_edge_is_redirected() {
        let x = package("o", "x", "v1.0.0", "hx");
        let old = package("owner", "repo", "v1.0.0", "h1");
        let new = package("owner", "repo", "v2.0.0", "h2");

        let mut graph = DependencyGraph::new();
        graph.add(old.clone());
        graph.add(new.clone());
        graph.add_dependency(x.clone(), old.clone());

        let mut resolver = Resolver::from_graph(graph);
        let resolved = resolver.resolve().unwrap();

        let survivors = resolved.filter(&Selector::Repository {
            owner: "owner",
            repo: "repo",
        });
        assert_eq!(survivors, vec![&new]);
        assert_eq!(resolved.edges(), &[Edge::new(x.key(), new.key())]);
    }

    #[test]
    fn test_conflicts_are_reported_before_resolution() {
        let resolver = Resolver::from_graph(tangled_graph());
        let conflicts = resolver.conflicts();

        let repositories: Vec<String> = conflicts.iter().map(|c| c.repository.to_string()).collect();
        assert_eq!(repositories, vec!["o/a", "o/b"]);
        assert_eq!(conflicts[0].winner().unwrap().hash, "a3");
        assert!(conflicts[0].report().contains("different major version"));
    }

    #[test]
    fn test_resolution_leaves_no_conflicts() {
        let mut resolver = Resolver::from_graph(tangled_graph());
        resolver.resolve().unwrap();

        assert!(resolver.conflicts().is_empty());
    }
}

mod graph_properties {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_idempotence() {
        let mut once = Resolver::from_graph(tangled_graph());
        once.resolve().unwrap();

        let mut twice = Resolver::from_graph(tangled_graph());
        twice.resolve().unwrap();
        twice.resolve().unwrap();

        assert_eq!(once.graph().fingerprint(), twice.graph().fingerprint());
    }

    #[test]
    fn test_uniqueness_after_resolution() {
        let mut resolver = Resolver::from_graph(tangled_graph());
        let graph = resolver.resolve().unwrap();

        let mut seen = HashSet::new();
        for package in graph.packages() {
            assert!(
                seen.insert((package.owner().to_string(), package.repo().to_string())),
                "{} appears twice",
                package
            );
        }
        assert_eq!(seen.len(), 4);
    }

    #[test]
    fn test_no_dangling_edges_after_resolution() {
        let mut resolver = Resolver::from_graph(tangled_graph());
        let graph = resolver.resolve().unwrap();

        for edge in graph.edges() {
            assert!(graph.get(&edge.from).is_some(), "missing source {}", edge.from);
            assert!(graph.get(&edge.to).is_some(), "missing target {}", edge.to);
        }
    }

    #[test]
    fn test_dependency_listing_visits_shared_dependency_once() {
        let x = package("o", "x", "v1.0.0", "hx");
        let y = package("o", "y", "v1.0.0", "hy");
        let z = package("o", "z", "v1.0.0", "hz");

        let mut graph = DependencyGraph::new();
        graph.add_dependency(x.clone(), y.clone());
        graph.add_dependency(y.clone(), z.clone());
        graph.add_dependency(x.clone(), z.clone());

        assert_eq!(graph.dependencies_of(&x), vec![&y, &z]);
    }
}

mod generated_graphs {
    use super::*;
    use proptest::prelude::*;

    const REPOS: [&str; 4] = ["a", "b", "c", "d"];
    const VERSIONS: [&str; 6] = ["v1.0.0", "1.0.0", "v1.2.0", "v2.0.0-beta", "v2.0.0", "development"];

    fn generated(nodes: &[(usize, usize)], edges: &[(usize, usize)]) -> DependencyGraph {
        let packages: Vec<ResolvedPackage> = nodes
            .iter()
            .map(|&(repo, version)| {
                package("o", REPOS[repo], VERSIONS[version], &format!("h{}{}", repo, version))
            })
            .collect();

        let mut graph = DependencyGraph::new();
        for package in &packages {
            graph.add(package.clone());
        }
        for &(from, to) in edges {
            let (from, to) = (from % packages.len(), to % packages.len());
            graph.add_dependency(packages[from].clone(), packages[to].clone());
        }
        graph
    }

    fn graph_shape() -> impl Strategy<Value = (Vec<(usize, usize)>, Vec<(usize, usize)>)> {
        (
            prop::collection::vec((0..REPOS.len(), 0..VERSIONS.len()), 1..10),
            prop::collection::vec((0..16usize, 0..16usize), 0..20),
        )
    }

    proptest! {
        #[test]
        fn prop_resolution_is_idempotent((nodes, edges) in graph_shape()) {
            let mut resolver = Resolver::from_graph(generated(&nodes, &edges));
            let first = resolver.resolve().unwrap().fingerprint();
            let second = resolver.resolve().unwrap().fingerprint();

            prop_assert_eq!(first, second);
        }

        #[test]
        fn prop_resolution_keeps_one_version_per_repository((nodes, edges) in graph_shape()) {
            let mut resolver = Resolver::from_graph(generated(&nodes, &edges));
            let graph = resolver.resolve().unwrap();

            let repositories: HashSet<(String, String)> = graph
                .packages()
                .map(|package| (package.owner().to_string(), package.repo().to_string()))
                .collect();
            let installed: HashSet<usize> = nodes.iter().map(|&(repo, _)| repo).collect();

            prop_assert_eq!(repositories.len(), graph.len());
            prop_assert_eq!(repositories.len(), installed.len());
        }

        #[test]
        fn prop_resolution_leaves_no_dangling_edges((nodes, edges) in graph_shape()) {
            let mut resolver = Resolver::from_graph(generated(&nodes, &edges));
            let graph = resolver.resolve().unwrap();

            prop_assert!(graph.is_consistent());
            for edge in graph.edges() {
                prop_assert!(graph.get(&edge.from).is_some());
                prop_assert!(graph.get(&edge.to).is_some());
            }
        }
    }
}

mod building {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_build_from_lock() {
        let lock = vec![
            locked("o", "app", "development", "h0"),
            locked("o", "lib", "v1.0.0", "h1"),
            locked("o", "util", "v2.0.0", "h2"),
        ];
        let mut manifests = Manifests::new();
        manifests.insert(
            RepositoryIdentity::github("o", "app"),
            manifest_requiring(&["https://github.com/o/lib.git", "git@github.com:o/util.git"]),
        );
        manifests.insert(
            RepositoryIdentity::github("o", "lib"),
            manifest_requiring(&["github.com/o/util"]),
        );

        let resolver = Resolver::from_lock(&lock, &manifests).unwrap();
        let graph = resolver.graph();

        let app = lock[0].to_resolved();
        let names: Vec<String> = graph
            .dependencies_of(&app)
            .iter()
            .map(|p| p.to_string())
            .collect();
        assert_eq!(names, vec!["o/lib@v1.0.0", "o/util@v2.0.0"]);
        assert_eq!(graph.edges().len(), 3);
    }

    #[test]
    fn test_build_reports_missing_dependency() {
        let lock = vec![locked("o", "app", "v1.0.0", "h0")];
        let mut manifests = Manifests::new();
        manifests.insert(
            RepositoryIdentity::github("o", "app"),
            manifest_requiring(&["git@github.com:o/absent.git"]),
        );

        let error = Resolver::build_graph(&lock, &manifests).unwrap_err();
        assert!(matches!(error, ResolverError::LookupFailed { .. }));
        assert!(error.to_string().contains("git@github.com:o/absent.git"));
    }
}
