mod common;

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use common::{dep, names, root, MemoryRepo};
use depgraph_core::filter_spec::FilterSpec;
use depgraph_engine::filter::apply;
use depgraph_engine::{resolve_graph, DependencyGraph};
use depgraph_util::errors::DepgraphError;

/// app -> lib -> util, app -> junit (test) -> hamcrest, app -> plugin (org.other, maven-plugin)
fn project(repo: MemoryRepo) -> (Arc<MemoryRepo>, DependencyGraph) {
    let repo = Arc::new(
        repo.artifact(
            "g:app:1",
            vec![
                dep("g:lib:1"),
                dep("g:junit:4").scope("test"),
                dep("org.other:plugin:2"),
            ],
        )
        .artifact("g:lib:1", vec![dep("g:util:1")])
        .artifact("g:util:1", vec![])
        .artifact("g:junit:4", vec![dep("g:hamcrest:1")])
        .artifact("g:hamcrest:1", vec![])
        .packaged("org.other:plugin:2", "maven-plugin", vec![]),
    );
    let graph = resolve_graph(&root("g:app:1"), repo.as_ref(), Some(repo.clone()), false)
        .unwrap()
        .graph;
    (repo, graph)
}

fn spec(source: &str) -> FilterSpec {
    toml::from_str(source).unwrap()
}

fn run(source: &str) -> Vec<String> {
    let (_, graph) = project(MemoryRepo::new());
    names(&apply(&spec(source), &graph).unwrap())
}

fn configuration_error(source: &str) -> String {
    let (_, graph) = project(MemoryRepo::new());
    match apply(&spec(source), &graph).unwrap_err() {
        DepgraphError::Configuration { message } => message,
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn full_passes_through() {
    assert_eq!(
        run("kind = \"full\""),
        ["app", "hamcrest", "junit", "lib", "util", "plugin"]
    );
}

#[test]
fn subtract_removes_subgraph() {
    let names = run(r#"
kind = "subtract"

[[children]]
kind = "full"

[[children]]
kind = "sub-graph"
artifact = "junit"
"#);
    assert_eq!(names, ["app", "lib", "util", "plugin"]);
}

#[test]
fn or_and_of_scopes() {
    let union = run(r#"
kind = "or"
children = [
  { kind = "scope", scopes = ["compile"] },
  { kind = "scope", scopes = ["test"] },
]
"#);
    assert_eq!(union, ["app", "junit", "lib", "util", "plugin"]);

    let both = run(r#"
kind = "and"
children = [
  { kind = "scope", scopes = ["compile"] },
  { kind = "scope", scopes = ["test"] },
]
"#);
    assert_eq!(both, ["app"]);
}

#[test]
fn not_is_relative_to_input() {
    let names = run(r#"
kind = "not"
children = [{ kind = "sub-graph", artifact = "g:lib" }]
"#);
    assert_eq!(names, ["app", "hamcrest", "junit", "plugin"]);
}

#[test]
fn group_and_packaging_filters() {
    assert_eq!(
        run("kind = \"group-id\"\nnot = \"org.other\""),
        ["app", "hamcrest", "junit", "lib", "util"]
    );
    assert_eq!(
        run("kind = \"packaging\"\npackagings = [\"jar\"]"),
        ["app", "hamcrest", "junit", "lib", "util"]
    );
}

#[test]
fn artifact_set_cuts_traversal() {
    // util is listed but only reachable through lib.
    assert_eq!(
        run("kind = \"artifacts\"\nartifacts = [\"g:app\", \"g:util\", \"org.other:plugin\"]"),
        ["app", "plugin"]
    );
}

#[test]
fn exclusion_filters_accept_bare_names() {
    assert_eq!(
        run("kind = \"exclude-transitively\"\nartifacts = [\"lib\"]"),
        ["app", "hamcrest", "junit", "plugin"]
    );
    assert_eq!(
        run("kind = \"retention-set\"\nartifact = \"junit\""),
        ["hamcrest", "junit"]
    );
    assert_eq!(
        run("kind = \"remove-specific\"\nartifacts = [\"g:lib\", \"g:junit\"]"),
        ["app", "plugin"]
    );
}

#[test]
fn nested_operand_is_filtered_first() {
    // Inside the compile graph junit is unknown.
    let message = configuration_error(r#"
kind = "sub-graph"
artifact = "junit"
children = [{ kind = "scope", scopes = ["compile"] }]
"#);
    assert!(message.contains("junit"), "{message}");
}

#[test]
fn child_counts_are_checked() {
    let message = configuration_error(r#"
kind = "subtract"
children = [{ kind = "full" }]
"#);
    assert!(message.contains("exactly two"), "{message}");

    let message = configuration_error(r#"
kind = "not"
children = [{ kind = "full" }, { kind = "full" }]
"#);
    assert!(message.contains("exactly one"), "{message}");

    let message = configuration_error("kind = \"or\"");
    assert!(message.contains("at least one"), "{message}");

    let message = configuration_error(r#"
kind = "dump"
children = [{ kind = "full" }, { kind = "full" }]
"#);
    assert!(message.contains("at most one"), "{message}");
}

#[test]
fn unknown_bare_name_is_rejected() {
    let message = configuration_error("kind = \"exclude-transitively\"\nartifacts = [\"nope\"]");
    assert!(message.contains("nope"), "{message}");
}

fn jar(dir: &Path, name: &str, main_class: bool) -> PathBuf {
    let path = dir.join(format!("{name}.jar"));
    let file = std::fs::File::create(&path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    zip.start_file("META-INF/MANIFEST.MF", zip::write::SimpleFileOptions::default())
        .unwrap();
    let mut manifest = String::from("Manifest-Version: 1.0\r\n");
    if main_class {
        manifest.push_str(&format!("Main-Class: g.{name}.Main\r\n"));
    }
    zip.write_all(manifest.as_bytes()).unwrap();
    zip.finish().unwrap();
    path
}

#[test]
fn manifest_entry_reads_jars() {
    let tmp = tempfile::TempDir::new().unwrap();
    let repo = MemoryRepo::new()
        .file("g:app:1", jar(tmp.path(), "app", true))
        .file("g:lib:1", jar(tmp.path(), "lib", true))
        .file("g:util:1", jar(tmp.path(), "util", false))
        .file("g:junit:4", jar(tmp.path(), "junit", false))
        .file("org.other:plugin:2", jar(tmp.path(), "plugin", false));
    let (_, graph) = project(repo);
    let result = apply(&spec("kind = \"manifest-entry\"\nhas = \"Main-Class\""), &graph).unwrap();
    assert_eq!(names(&result), ["app", "lib"]);
}

#[test]
fn manifest_entry_propagates_file_errors() {
    let (_, graph) = project(MemoryRepo::new());
    let err = apply(&spec("kind = \"manifest-entry\"\nhas = \"Main-Class\""), &graph).unwrap_err();
    assert!(matches!(err, DepgraphError::FileResolution { .. }));
}

#[test]
fn visualize_writes_and_passes_through() {
    let tmp = tempfile::TempDir::new().unwrap();
    let output = tmp.path().join("out/deps.dot");
    let source = format!(
        r#"
kind = "visualize"
output = "{}"

[[subgraphs]]
color = "red"
filter = {{ kind = "scope", scopes = ["test"] }}
"#,
        output.display().to_string().replace('\\', "/")
    );
    let (_, graph) = project(MemoryRepo::new());
    let result = apply(&spec(&source), &graph).unwrap();
    assert_eq!(names(&result), names(&graph));

    let dot = std::fs::read_to_string(&output).unwrap();
    assert!(dot.starts_with("digraph G {"));
    assert!(dot.contains("label=\"g:junit\",color=\"red\""));
    assert!(dot.contains("label=\"test\""));
}

#[test]
fn dump_passes_through() {
    assert_eq!(run("kind = \"dump\"").len(), 6);
}

#[test]
fn ambiguous_bare_name_is_rejected() {
    let repo = MemoryRepo::new()
        .artifact("g:app:1", vec![dep("g:util:1"), dep("h:util:1")])
        .artifact("g:util:1", vec![])
        .artifact("h:util:1", vec![]);
    let graph = resolve_graph(&root("g:app:1"), &repo, None, false)
        .unwrap()
        .graph;

    for source in [
        "kind = \"sub-graph\"\nartifact = \"util\"",
        "kind = \"exclude-transitively\"\nartifacts = [\"util\"]",
    ] {
        match apply(&spec(source), &graph).unwrap_err() {
            DepgraphError::Configuration { message } => {
                assert!(message.contains("ambiguous (g:util, h:util)"), "{message}")
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    let excluded = apply(&spec("kind = \"exclude-transitively\"\nartifacts = [\"h:util\"]"), &graph).unwrap();
    assert_eq!(names(&excluded), ["app", "util"]);
}
