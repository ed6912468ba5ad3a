#![allow(dead_code)]

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use tempfile::TempDir;

pub fn depgraph_cmd() -> Command {
    Command::cargo_bin("depgraph").unwrap()
}

const REPOSITORY: &str = r#"
root = "files"

[[artifact]]
group = "org.demo"
name = "app"
version = "1.0"

[[artifact.dependencies]]
group = "org.demo"
name = "core"
version = "1.0"
exclusions = [{ group = "org.legacy", name = "*" }]

[[artifact.dependencies]]
group = "junit"
name = "junit"
version = "4.13"
scope = "test"

[[artifact]]
group = "org.demo"
name = "core"
version = "1.0"
dependencies = [
  { group = "org.lib", name = "util", version = "2.0" },
  { group = "org.legacy", name = "old", version = "0.1" },
]

[[artifact]]
group = "org.lib"
name = "util"
version = "2.0"

[[artifact]]
group = "org.lib"
name = "util"
version = "1.0"

[[artifact]]
group = "org.legacy"
name = "old"
version = "0.1"

[[artifact]]
group = "junit"
name = "junit"
version = "4.13"
dependencies = [{ group = "org.lib", name = "util", version = "1.0" }]
"#;

const CONFIG: &str = r#"
root = "org.demo:app:1.0"
repository = "repository.toml"

[filters.compile]
kind = "scope"
scopes = ["compile"]

[filters.tests]
kind = "sub-graph"
artifact = "junit"

[filters.broken]
kind = "subtract"
children = [{ kind = "full" }]
"#;

/// A project directory: `depgraph.toml`, `repository.toml` and a `files/` tree.
pub fn project() -> TempDir {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("depgraph.toml"), CONFIG).unwrap();
    fs::write(tmp.path().join("repository.toml"), REPOSITORY).unwrap();
    tmp
}

/// Create an empty backing file in Maven layout under `files/`.
pub fn add_file(dir: &Path, group: &str, name: &str, version: &str) {
    let path = dir
        .join("files")
        .join(group.replace('.', "/"))
        .join(name)
        .join(version)
        .join(format!("{name}-{version}.jar"));
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, b"").unwrap();
}
