//! GraphViz rendering of dependency graphs.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::io::Write as _;
use std::path::Path;

use depgraph_core::artifact::DEFAULT_SCOPE;
use depgraph_util::errors::DepgraphError;
use depgraph_util::fs::ensure_parent_dir;
use depgraph_util::process::CommandBuilder;
use petgraph::graph::NodeIndex;

use crate::graph::{DependencyGraph, Edge};

/// Writes `digraph` sources, painting registered subgraphs in their colors.
#[derive(Debug, Default)]
pub struct DotWriter {
    node_colors: HashMap<NodeIndex, String>,
    edge_colors: HashMap<(NodeIndex, NodeIndex), String>,
}

impl DotWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Paint every node and edge of `graph` in `color`. Later subgraphs win.
    pub fn add_colored_subgraph(&mut self, graph: &DependencyGraph, color: &str) {
        for node in graph.nodes() {
            self.node_colors.insert(node.index(), color.to_string());
        }
        for edge in graph.edges() {
            self.edge_colors
                .insert((edge.src, edge.dst), color.to_string());
        }
    }

    /// Render `graph` as GraphViz source.
    pub fn write(&self, graph: &DependencyGraph) -> String {
        let mut out = String::from("digraph G {\n");
        for node in graph.nodes() {
            let label = format!("{}:{}", node.group, node.name);
            let mut attrs = vec![("label", label)];
            if let Some(color) = self.node_colors.get(&node.index()) {
                attrs.push(("color", color.clone()));
            }
            let _ = writeln!(out, "  {} {};", id(node.index()), attributes(&attrs));
        }
        for edge in graph.edges() {
            let _ = writeln!(
                out,
                "  {} -> {} {};",
                id(edge.src),
                id(edge.dst),
                attributes(&self.edge_attributes(graph, edge))
            );
        }
        out.push_str("}\n");
        out
    }

    fn edge_attributes(&self, graph: &DependencyGraph, edge: &Edge) -> Vec<(&'static str, String)> {
        let mut attrs = Vec::new();
        // Most edges are compile scoped; only label the others.
        if edge.scope != DEFAULT_SCOPE {
            attrs.push(("label", edge.scope.clone()));
        }
        if edge.optional {
            attrs.push(("style", "dotted".to_string()));
        }
        if let Some(color) = self.edge_colors.get(&(edge.src, edge.dst)) {
            attrs.push(("color", color.clone()));
        }
        if graph.node(edge.src).group == graph.node(edge.dst).group {
            attrs.push(("weight", "10".to_string()));
        }
        attrs
    }
}

fn id(idx: NodeIndex) -> String {
    format!("n{}", idx.index())
}

fn attributes(attrs: &[(&str, String)]) -> String {
    let body: Vec<String> = attrs
        .iter()
        .map(|(k, v)| format!("{k}=\"{}\"", v.replace('"', "\\\"")))
        .collect();
    format!("[{}]", body.join(","))
}

/// Write `dot_source` to `output`.
///
/// A `.dot` (or `.gv`) output gets the source itself; any other extension is
/// rendered by the GraphViz `dot` command in that format, `png` without one.
pub fn render(dot_source: &str, output: &Path) -> Result<(), DepgraphError> {
    ensure_parent_dir(output)?;
    let format = output
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("png");
    if matches!(format, "dot" | "gv") {
        std::fs::write(output, dot_source)?;
        return Ok(());
    }

    let mut source = tempfile::Builder::new().suffix(".dot").tempfile()?;
    source.write_all(dot_source.as_bytes())?;
    source.flush()?;
    CommandBuilder::new("dot")
        .arg(format!("-T{format}"))
        .args([
            source.path().display().to_string(),
            "-o".to_string(),
            output.display().to_string(),
        ])
        .exec_checked()?;
    Ok(())
}
