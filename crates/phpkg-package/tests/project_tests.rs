use phpkg_config::ConfigLoader;
use phpkg_package::*;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const PROJECT_CONFIG: &str = r#"{
    "map": {
        "App": "Source"
    },
    "packages": {
        "git@github.com:php-repos/observer.git": "v1.0.0"
    }
}"#;

const LOCK_FILE: &str = r#"{
    "version": 1,
    "packages": [
        {
            "url": "git@github.com:php-repos/observer.git",
            "owner": "php-repos",
            "repo": "observer",
            "version": "v1.0.0",
            "hash": "obs1"
        },
        {
            "url": "https://github.com/php-repos/datatype.git",
            "owner": "php-repos",
            "repo": "datatype",
            "version": "v2.1.0",
            "hash": "dt21"
        }
    ]
}"#;

fn write(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

/// A project with one direct package that pulls in a second one
fn setup_project() -> TempDir {
    let temp = TempDir::new().unwrap();
    let root = temp.path();

    write(&root.join("phpkg.config.json"), PROJECT_CONFIG);
    write(&root.join("phpkg.config-lock.json"), LOCK_FILE);
    write(
        &root.join("Packages/php-repos/observer/phpkg.config.json"),
        r#"{
            "map": { "PhpRepos\\Observer": "Source" },
            "packages": { "https://github.com/php-repos/datatype.git": "v2.1.0" }
        }"#,
    );
    write(
        &root.join("Packages/php-repos/datatype/phpkg.config.json"),
        r#"{ "map": { "PhpRepos\\Datatype": "Src" } }"#,
    );

    temp
}

fn open(dir: &Path) -> Project {
    let mut loader = ConfigLoader::with_global_config_path(dir.join("no-global.toml"));
    Project::open_with(&mut loader, dir).unwrap()
}

#[test]
fn test_resolve_project() {
    let temp = setup_project();
    let project = open(temp.path());

    let graph = project.resolve().unwrap();

    let names: Vec<String> = graph.packages().map(|p| p.to_string()).collect();
    assert_eq!(
        names,
        vec!["php-repos/observer@v1.0.0", "php-repos/datatype@v2.1.0"]
    );
    assert_eq!(
        graph.edges(),
        &[Edge::new(
            "owner:php-repos,repo:observer,version:v1.0.0,hash:obs1",
            "owner:php-repos,repo:datatype,version:v2.1.0,hash:dt21"
        )]
    );
}

#[test]
fn test_open_from_subdirectory() {
    let temp = setup_project();
    let nested = temp.path().join("Source").join("Http");
    fs::create_dir_all(&nested).unwrap();

    let project = open(&nested);

    assert_eq!(project.root(), temp.path());
    assert_eq!(project.lockfile().packages.len(), 2);
}

#[test]
fn test_import_map() {
    let temp = setup_project();
    let project = open(temp.path());
    let build_root = temp.path().join("builds").join("development");

    let map = project.import_map(&build_root).unwrap();

    let packages = temp.path().join("Packages").join("php-repos");
    let entries: Vec<(String, std::path::PathBuf)> = map
        .iter()
        .map(|(namespace, path)| (namespace.to_string(), path.to_path_buf()))
        .collect();
    assert_eq!(
        entries,
        vec![
            (
                "PhpRepos\\Observer".to_string(),
                packages.join("observer").join("Source")
            ),
            (
                "PhpRepos\\Datatype".to_string(),
                packages.join("datatype").join("Src")
            ),
            ("App".to_string(), build_root.join("Source")),
        ]
    );
}

#[test]
fn test_missing_manifest_means_no_dependencies() {
    let temp = setup_project();
    fs::remove_file(
        temp.path()
            .join("Packages/php-repos/observer/phpkg.config.json"),
    )
    .unwrap();

    let project = open(temp.path());
    let graph = project.resolve().unwrap();

    assert_eq!(graph.len(), 2);
    assert!(graph.edges().is_empty());
}

#[test]
fn test_dependency_missing_from_lock() {
    let temp = setup_project();
    write(
        &temp.path().join("phpkg.config-lock.json"),
        r#"{
            "version": 1,
            "packages": [
                {
                    "url": "git@github.com:php-repos/observer.git",
                    "owner": "php-repos",
                    "repo": "observer",
                    "version": "v1.0.0",
                    "hash": "obs1"
                }
            ]
        }"#,
    );

    let project = open(temp.path());
    let result = project.resolve();

    assert!(matches!(
        result,
        Err(PackageError::Resolver(ResolverError::LookupFailed { .. }))
    ));
}

#[test]
fn test_write_lockfile_keeps_declared_urls() {
    let temp = setup_project();
    let mut project = open(temp.path());

    let graph = project.resolve().unwrap();
    project.write_lockfile(&graph).unwrap();

    let written = Lockfile::from_file(&temp.path().join("phpkg.config-lock.json")).unwrap();
    assert_eq!(
        written.packages[1].url,
        "https://github.com/php-repos/datatype.git"
    );
    assert!(written.metadata.phpkg_version.is_some());
    assert!(written.verify().is_ok());
}
