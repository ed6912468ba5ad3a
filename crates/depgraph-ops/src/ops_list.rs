//! Operation: list the artifacts of a (filtered) graph.

use std::path::PathBuf;

use depgraph_engine::files::resolve_node_files;
use depgraph_engine::DependencyGraph;
use depgraph_util::errors::DepgraphError;
use depgraph_util::progress;
use petgraph::graph::NodeIndex;
use serde::Serialize;

use crate::Project;

/// Options for `depgraph list`.
#[derive(Debug, Default)]
pub struct ListOptions {
    /// Named filter from `depgraph.toml`.
    pub filter: Option<String>,
    /// Resolve and print backing files.
    pub files: bool,
    /// Print backing files joined by the platform path separator.
    pub classpath: bool,
    /// Print JSON instead of plain lines.
    pub json: bool,
    /// Include the root artifact itself.
    pub include_root: bool,
}

/// One listed artifact.
#[derive(Debug, Clone, Serialize)]
pub struct ListEntry {
    pub coordinate: String,
    pub packaging: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

/// List the artifacts of the project graph.
pub async fn list(project: &Project, opts: &ListOptions) -> miette::Result<()> {
    let resolution = project.resolve()?;
    let graph = project.select(&resolution.graph, opts.filter.as_deref())?;
    let entries = collect(&graph, opts).await?;
    let output = format_entries(&entries, opts)?;
    if !output.is_empty() {
        println!("{output}");
    }
    Ok(())
}

async fn collect(graph: &DependencyGraph, opts: &ListOptions) -> miette::Result<Vec<ListEntry>> {
    let listed: Vec<NodeIndex> = graph
        .node_indices()
        .filter(|&idx| opts.include_root || Some(idx) != graph.root())
        .collect();
    let mut entries: Vec<ListEntry> = listed
        .iter()
        .map(|&idx| {
            let node = graph.node(idx);
            ListEntry {
                coordinate: node.to_string(),
                packaging: node.packaging().to_string(),
                file: None,
            }
        })
        .collect();

    // Only listed artifacts need a file.
    if opts.files || opts.classpath {
        let pb = progress::spinner(&format!("Resolving files of {} artifacts", listed.len()));
        let resolved = resolve_node_files(graph, &listed).await;
        pb.finish_and_clear();
        for (entry, file) in entries.iter_mut().zip(resolved?) {
            entry.file = file.path;
        }
    }
    Ok(entries)
}

fn format_entries(entries: &[ListEntry], opts: &ListOptions) -> miette::Result<String> {
    if opts.json {
        return serde_json::to_string_pretty(entries).map_err(|e| {
            DepgraphError::Generic {
                message: format!("Failed to serialize artifact list: {e}"),
            }
            .into()
        });
    }

    if opts.classpath {
        // System-scoped artifacts have no file to put on a classpath.
        let joined = std::env::join_paths(entries.iter().filter_map(|e| e.file.as_ref()))
            .map_err(|e| DepgraphError::Generic {
                message: format!("Cannot build classpath: {e}"),
            })?;
        return Ok(joined.to_string_lossy().into_owned());
    }

    let lines: Vec<String> = entries
        .iter()
        .map(|e| match (&e.file, opts.files) {
            (Some(file), true) => format!("{} {}", e.coordinate, file.display()),
            (None, true) => format!("{} (no file)", e.coordinate),
            _ => e.coordinate.clone(),
        })
        .collect();
    Ok(lines.join("\n"))
}
