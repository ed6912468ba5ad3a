//! Concurrent resolution of backing files once a graph is final.

use std::path::PathBuf;
use std::sync::Arc;

use depgraph_core::artifact::ArtifactId;
use depgraph_util::errors::DepgraphError;
use petgraph::graph::NodeIndex;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::graph::DependencyGraph;

const MAX_CONCURRENT_RESOLUTIONS: usize = 8;

/// A member of a graph together with its backing file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFile {
    pub id: ArtifactId,
    /// `group:name:version[:classifier]`
    pub coordinate: String,
    /// `None` for system-scoped artifacts.
    pub path: Option<PathBuf>,
}

/// Resolve the backing file of every node in `graph`, in identity order.
pub async fn resolve_files(graph: &DependencyGraph) -> Result<Vec<ResolvedFile>, DepgraphError> {
    let nodes: Vec<NodeIndex> = graph.node_indices().collect();
    resolve_node_files(graph, &nodes).await
}

/// Resolve the backing files of `nodes` only, in the given order.
///
/// Resolvers run on blocking threads, at most eight at a time. The first
/// failure is returned.
pub async fn resolve_node_files(
    graph: &DependencyGraph,
    nodes: &[NodeIndex],
) -> Result<Vec<ResolvedFile>, DepgraphError> {
    if let Some(&foreign) = nodes.iter().find(|&&idx| !graph.contains(idx)) {
        return Err(DepgraphError::invariant(format!(
            "node #{} is not part of the graph",
            foreign.index()
        )));
    }

    let shared = Arc::new(graph.clone());
    let semaphore = Arc::new(Semaphore::new(MAX_CONCURRENT_RESOLUTIONS));
    let mut join_set = JoinSet::new();

    for (position, &idx) in nodes.iter().enumerate() {
        let graph = shared.clone();
        let sem = semaphore.clone();
        join_set.spawn(async move {
            let _permit = sem.acquire_owned().await;
            let result = tokio::task::spawn_blocking(move || graph.artifact_file(idx)).await;
            (position, result)
        });
    }

    let mut slots: Vec<Option<PathBuf>> = vec![None; nodes.len()];
    let mut failure = None;
    while let Some(joined) = join_set.join_next().await {
        let (position, result) = joined.map_err(|e| DepgraphError::Generic {
            message: format!("file resolution task failed: {e}"),
        })?;
        let resolved = result.map_err(|e| DepgraphError::Generic {
            message: format!("file resolution task failed: {e}"),
        })?;
        match resolved {
            Ok(path) => slots[position] = path,
            Err(e) => {
                failure.get_or_insert(e);
            }
        }
    }
    if let Some(e) = failure {
        return Err(e);
    }

    Ok(nodes
        .iter()
        .zip(slots)
        .map(|(&idx, path)| {
            let node = graph.node(idx);
            ResolvedFile {
                id: node.id(),
                coordinate: node.to_string(),
                path,
            }
        })
        .collect())
}
