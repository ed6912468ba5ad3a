//! Evaluation of declarative [`FilterSpec`] trees.
//!
//! Every filter receives the graph it operates on explicitly. A filter without
//! children works on that graph directly; otherwise its children are evaluated
//! against it first and their results become the filter's operands.

use std::collections::HashSet;

use depgraph_core::artifact::ArtifactId;
use depgraph_core::filter_spec::FilterSpec;
use depgraph_util::errors::DepgraphError;
use petgraph::graph::NodeIndex;

use crate::dot::{render, DotWriter};
use crate::graph::{DependencyGraph, Node};
use crate::manifest::has_main_attribute;
use crate::visitor::{ArtifactSetFilter, GraphVisitor, GroupIdFilter};

/// Apply `spec` to `input`. The input is never modified.
pub fn apply(spec: &FilterSpec, input: &DependencyGraph) -> Result<DependencyGraph, DepgraphError> {
    let output = evaluate(spec, input)?;
    tracing::debug!(
        "{} filter: {} -> {} nodes",
        spec.kind(),
        input.len(),
        output.len()
    );
    Ok(output)
}

fn evaluate(spec: &FilterSpec, input: &DependencyGraph) -> Result<DependencyGraph, DepgraphError> {
    match spec {
        FilterSpec::Full => Ok(input.clone()),
        FilterSpec::Scope { scopes, .. } => single_child(spec, input)?.filter_scope(scopes),
        FilterSpec::Packaging { packagings, .. } => {
            single_child(spec, input)?.filter_packaging(packagings)
        }
        FilterSpec::GroupId { value, not, .. } => {
            let mut visitor = GroupIdFilter {
                value: value.clone(),
                not: not.clone(),
            };
            single_child(spec, input)?.filter(&mut visitor)
        }
        FilterSpec::Artifacts { artifacts, .. } => {
            let base = single_child(spec, input)?;
            let ids = artifact_ids(spec, &base, artifacts)?;
            base.filter(&mut ArtifactSetFilter::new(ids))
        }
        FilterSpec::Subtract { children } => {
            let [base, excess] = children.as_slice() else {
                return Err(DepgraphError::configuration(format!(
                    "subtract needs exactly two children, got {}",
                    children.len()
                )));
            };
            apply(base, input)?.subtract(&apply(excess, input)?)
        }
        FilterSpec::And { children } => {
            let mut graphs = at_least_one(spec, children, input)?.into_iter();
            let mut result = graphs.next().unwrap_or_else(|| input.clone());
            for g in graphs {
                result = result.intersect(&g)?;
            }
            Ok(result)
        }
        FilterSpec::Or { children } => {
            let mut graphs = at_least_one(spec, children, input)?.into_iter();
            let mut result = graphs.next().unwrap_or_else(|| input.clone());
            for g in graphs {
                result = result.union(&g)?;
            }
            Ok(result)
        }
        FilterSpec::Not { children } => {
            let [child] = children.as_slice() else {
                return Err(DepgraphError::configuration(format!(
                    "not needs exactly one child, got {}",
                    children.len()
                )));
            };
            input.subtract(&apply(child, input)?)
        }
        FilterSpec::ExcludeTransitively { artifacts, .. } => {
            let base = single_child(spec, input)?;
            let ids = artifact_ids(spec, &base, artifacts)?;
            base.exclude_transitively(&ids)
        }
        FilterSpec::RemoveSpecific { artifacts, .. } => {
            let base = single_child(spec, input)?;
            let ids = artifact_ids(spec, &base, artifacts)?;
            base.remove_specific(&ids)
        }
        FilterSpec::RetentionSet { artifact, .. } => {
            let base = single_child(spec, input)?;
            let target = member(spec, &base, artifact)?;
            base.retention_set(target)
        }
        FilterSpec::SubGraph { artifact, .. } => {
            let base = single_child(spec, input)?;
            let target = member(spec, &base, artifact)?;
            base.rooted_at(target)
        }
        FilterSpec::ManifestEntry { has, .. } => {
            let base = single_child(spec, input)?;
            let mut visitor = ManifestEntryVisitor {
                graph: &base,
                attribute: has,
                error: None,
            };
            let result = base.filter(&mut visitor)?;
            match visitor.error {
                Some(e) => Err(e),
                None => Ok(result),
            }
        }
        FilterSpec::Dump { .. } => {
            let graph = single_child(spec, input)?;
            tracing::info!("{graph}");
            Ok(graph)
        }
        FilterSpec::Visualize {
            output, subgraphs, ..
        } => {
            let graph = single_child(spec, input)?;
            let mut writer = DotWriter::new();
            for sub in subgraphs {
                writer.add_colored_subgraph(&apply(&sub.filter, &graph)?, &sub.color);
            }
            // GraphViz may be missing; the graph still flows on.
            if let Err(e) = render(&writer.write(&graph), output) {
                tracing::warn!("Failed to create {}: {e}", output.display());
            }
            Ok(graph)
        }
    }
}

/// The operand of a single-input filter: its only child, or the input.
fn single_child(spec: &FilterSpec, input: &DependencyGraph) -> Result<DependencyGraph, DepgraphError> {
    match spec.children() {
        [] => Ok(input.clone()),
        [child] => apply(child, input),
        children => Err(DepgraphError::configuration(format!(
            "{} takes at most one child, got {}",
            spec.kind(),
            children.len()
        ))),
    }
}

fn at_least_one(
    spec: &FilterSpec,
    children: &[FilterSpec],
    input: &DependencyGraph,
) -> Result<Vec<DependencyGraph>, DepgraphError> {
    if children.is_empty() {
        return Err(DepgraphError::configuration(format!(
            "{} needs at least one child",
            spec.kind()
        )));
    }
    children.iter().map(|c| apply(c, input)).collect()
}

/// A node of `graph` named by `key`: an exact `group:name[:classifier]`, or a
/// bare name that only one member carries.
fn member(spec: &FilterSpec, graph: &DependencyGraph, key: &str) -> Result<NodeIndex, DepgraphError> {
    if let Ok(id) = key.parse::<ArtifactId>() {
        if let Some(idx) = graph.find(&id) {
            return Ok(idx);
        }
    }
    let candidates: Vec<NodeIndex> = graph.find_by_name(key).collect();
    match candidates.as_slice() {
        [idx] => Ok(*idx),
        [] => Err(DepgraphError::configuration(format!(
            "{} filter refers to {key}, which is not in the graph",
            spec.kind()
        ))),
        several => {
            let ids: Vec<String> = several.iter().map(|&i| graph.node(i).id().to_string()).collect();
            Err(DepgraphError::configuration(format!(
                "{} filter refers to {key}, which is ambiguous ({}); use group:name",
                spec.kind(),
                ids.join(", ")
            )))
        }
    }
}

/// Identities named by `keys`. Full ids need not be in the graph; bare names must be.
fn artifact_ids(
    spec: &FilterSpec,
    graph: &DependencyGraph,
    keys: &[String],
) -> Result<HashSet<ArtifactId>, DepgraphError> {
    keys.iter()
        .map(|key| match key.parse::<ArtifactId>() {
            Ok(id) => Ok(id),
            Err(_) => member(spec, graph, key).map(|idx| graph.node(idx).id()),
        })
        .collect()
}

/// Keeps nodes whose JAR manifest declares an attribute. A node without a file
/// does not match. The first resolution failure stops the traversal.
struct ManifestEntryVisitor<'a> {
    graph: &'a DependencyGraph,
    attribute: &'a str,
    error: Option<DepgraphError>,
}

impl ManifestEntryVisitor<'_> {
    fn check(&self, node: &Node) -> Result<bool, DepgraphError> {
        match self.graph.artifact_file(node.index())? {
            Some(path) => has_main_attribute(&path, self.attribute),
            None => Ok(false),
        }
    }
}

impl GraphVisitor for ManifestEntryVisitor<'_> {
    fn visit_node(&mut self, node: &Node) -> bool {
        if self.error.is_some() {
            return false;
        }
        match self.check(node) {
            Ok(matched) => matched,
            Err(e) => {
                self.error = Some(e);
                false
            }
        }
    }
}
