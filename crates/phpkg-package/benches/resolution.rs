//! Dependency resolution benchmarks
//!
//! Measures graph construction from a lock file and conflict collapse on
//! graphs where every repository is installed in several versions.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use phpkg_package::{
    compare_versions, DependencyGraph, RepositoryIdentity, ResolvedPackage, Resolver, Version,
};

/// `repositories` repositories, each in `versions` versions, chained so every
/// version of repository `n` depends on the first version of `n + 1`
fn conflicted_graph(repositories: usize, versions: usize) -> DependencyGraph {
    let mut graph = DependencyGraph::new();
    let package = |repo: usize, version: usize| {
        ResolvedPackage::new(
            RepositoryIdentity::github("bench", format!("repo-{}", repo)),
            Version::parse(&format!("v1.{}.0", version)),
            format!("{}-{}", repo, version),
        )
    };

    for repo in 0..repositories {
        for version in 0..versions {
            if repo + 1 < repositories {
                graph.add_dependency(package(repo, version), package(repo + 1, 0));
            } else {
                graph.add(package(repo, version));
            }
        }
    }
    graph
}

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve");
    for repositories in [10, 50, 200] {
        let graph = conflicted_graph(repositories, 3);
        group.bench_with_input(
            BenchmarkId::from_parameter(repositories),
            &graph,
            |b, graph| {
                b.iter(|| {
                    let mut resolver = Resolver::from_graph(black_box(graph.clone()));
                    resolver.resolve().map(|graph| graph.len())
                })
            },
        );
    }
    group.finish();
}

fn bench_version_compare(c: &mut Criterion) {
    c.bench_function("version_compare", |b| {
        b.iter(|| {
            compare_versions(black_box("v12.4.1-beta2"), black_box("12.4.1-RC1"))
        })
    });
}

criterion_group!(benches, bench_resolve, bench_version_compare);
criterion_main!(benches);
