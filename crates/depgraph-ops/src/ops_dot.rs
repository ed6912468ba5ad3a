//! Operation: render the graph with GraphViz.

use std::path::PathBuf;

use depgraph_engine::dot::{render, DotWriter};
use depgraph_engine::DependencyGraph;
use depgraph_util::errors::DepgraphError;
use depgraph_util::progress;

use crate::Project;

/// Options for `depgraph dot`.
#[derive(Debug)]
pub struct DotOptions {
    /// Output file; its extension selects the GraphViz format.
    pub output: PathBuf,
    /// Named filter selecting the graph to render.
    pub filter: Option<String>,
    /// `(filter name, color)` pairs painted over the rendered graph.
    pub highlight: Vec<(String, String)>,
}

/// Parse a `NAME=COLOR` highlight argument.
pub fn parse_highlight(raw: &str) -> miette::Result<(String, String)> {
    match raw.split_once('=') {
        Some((name, color)) if !name.is_empty() && !color.is_empty() => {
            Ok((name.to_string(), color.to_string()))
        }
        _ => Err(DepgraphError::Configuration {
            message: format!("invalid highlight '{raw}', expected NAME=COLOR"),
        }
        .into()),
    }
}

/// Write the project graph to `opts.output`.
pub fn dot(project: &Project, opts: &DotOptions) -> miette::Result<()> {
    let resolution = project.resolve()?;
    let graph = project.select(&resolution.graph, opts.filter.as_deref())?;
    let source = write(project, &graph, &opts.highlight)?;
    render(&source, &opts.output)?;
    progress::status("Wrote", &opts.output.display().to_string());
    Ok(())
}

fn write(
    project: &Project,
    graph: &DependencyGraph,
    highlight: &[(String, String)],
) -> miette::Result<String> {
    let mut writer = DotWriter::new();
    for (name, color) in highlight {
        let subgraph = project.select(graph, Some(name))?;
        tracing::debug!("Highlighting {} artifacts of '{name}' in {color}", subgraph.len());
        writer.add_colored_subgraph(&subgraph, color);
    }
    Ok(writer.write(graph))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::project_dir;
    use crate::GlobalOptions;

    #[test]
    fn parses_highlights() {
        assert_eq!(
            parse_highlight("tests=red").unwrap(),
            ("tests".to_string(), "red".to_string())
        );
        assert!(parse_highlight("tests").is_err());
        assert!(parse_highlight("=red").is_err());
    }

    #[test]
    fn writes_dot_with_highlights() {
        let tmp = project_dir();
        let project = Project::load(tmp.path(), &GlobalOptions::default()).unwrap();
        let output = tmp.path().join("out/deps.dot");
        dot(
            &project,
            &DotOptions {
                output: output.clone(),
                filter: None,
                highlight: vec![("tests".into(), "red".into())],
            },
        )
        .unwrap();

        let source = std::fs::read_to_string(output).unwrap();
        assert!(source.starts_with("digraph G {"));
        assert!(source.contains("[label=\"junit:junit\",color=\"red\"];"));
        assert!(source.contains("[label=\"org.demo:core\"];"));
    }

    #[test]
    fn unknown_highlight_filter_fails() {
        let tmp = project_dir();
        let project = Project::load(tmp.path(), &GlobalOptions::default()).unwrap();
        let opts = DotOptions {
            output: tmp.path().join("deps.dot"),
            filter: Some("compile".into()),
            highlight: vec![("missing".into(), "blue".into())],
        };
        assert!(dot(&project, &opts).is_err());
        assert!(!tmp.path().join("deps.dot").exists());
    }
}
