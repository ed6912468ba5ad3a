//! Graph construction: breadth-first expansion with Maven's "nearest wins"
//! version conflict policy.
//!
//! Nodes are keyed by identity (`group:name[:classifier]`). Because the queue is
//! strictly breadth-first, the first request for an identity comes through the
//! shortest chain from the root, and every later request is folded onto the
//! node created for it.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

use depgraph_core::artifact::{ArtifactDescriptor, ArtifactId};
use depgraph_core::metadata::Metadata;
use depgraph_core::source::{FileResolver, MetadataSource};
use depgraph_util::errors::{BoxError, DepgraphError};
use petgraph::graph::NodeIndex;

use crate::conflict::{ConflictReport, VersionConflict};
use crate::exclusion::resolve_exclusions;
use crate::graph::{Arena, DependencyGraph, Edge, Node};

/// The output of graph construction.
#[derive(Debug)]
pub struct Resolution {
    pub graph: DependencyGraph,
    pub conflicts: ConflictReport,
    /// Dependencies skipped because their metadata failed to load (tolerant builds only).
    pub broken: Vec<BrokenDependency>,
}

/// A dependency whose metadata could not be loaded, together with where it was requested.
#[derive(Debug, Clone)]
pub struct BrokenDependency {
    pub artifact: ArtifactDescriptor,
    /// `root -> ... -> artifact`.
    pub trail: String,
    pub error: String,
}

/// Builds the full dependency graph of a root artifact.
pub struct GraphBuilder<'a> {
    source: &'a dyn MetadataSource,
    files: Option<Arc<dyn FileResolver>>,
    tolerate_broken_metadata: bool,
}

/// Mutable state of one build.
struct BuildState {
    arena: Arena,
    table: HashMap<ArtifactId, NodeIndex>,
    depth: HashMap<NodeIndex, usize>,
    /// BFS discovery parent, i.e. the last hop of the shortest trail.
    parent: HashMap<NodeIndex, NodeIndex>,
    failed: HashSet<ArtifactId>,
    conflicts: ConflictReport,
    broken: Vec<BrokenDependency>,
}

impl BuildState {
    fn trail(&self, idx: NodeIndex) -> String {
        let mut chain = vec![self.arena[idx].to_string()];
        let mut at = idx;
        while let Some(&p) = self.parent.get(&at) {
            chain.push(self.arena[p].to_string());
            at = p;
        }
        chain.reverse();
        chain.join(" -> ")
    }
}

impl<'a> GraphBuilder<'a> {
    pub fn new(source: &'a dyn MetadataSource) -> Self {
        Self {
            source,
            files: None,
            tolerate_broken_metadata: false,
        }
    }

    /// Skip dependencies whose metadata fails to load instead of aborting.
    pub fn tolerate_broken_metadata(mut self, tolerate: bool) -> Self {
        self.tolerate_broken_metadata = tolerate;
        self
    }

    /// Resolver used for nodes' backing files. Without one, file access fails.
    pub fn file_resolver(mut self, files: Arc<dyn FileResolver>) -> Self {
        self.files = Some(files);
        self
    }

    fn metadata(&self, artifact: &ArtifactDescriptor) -> Result<Option<Metadata>, BoxError> {
        if artifact.is_system() {
            return Ok(None);
        }
        self.source.resolve_metadata(artifact)
    }

    fn add_node(
        &self,
        state: &mut BuildState,
        artifact: ArtifactDescriptor,
        metadata: Option<Metadata>,
    ) -> NodeIndex {
        let index = NodeIndex::new(state.arena.node_count());
        let repositories = metadata
            .as_ref()
            .map(|m| m.repositories.clone())
            .unwrap_or_default();
        let id = artifact.id();
        let node = Node::new(index, artifact, metadata, repositories, self.files.clone());
        let added = state.arena.add_node(node);
        debug_assert_eq!(index, added);
        state.table.insert(id, added);
        added
    }

    /// Build the full graph below `root`.
    ///
    /// A root whose metadata cannot be loaded is always an error.
    pub fn build(&self, root: &ArtifactDescriptor) -> Result<Resolution, DepgraphError> {
        let mut state = BuildState {
            arena: Arena::new(),
            table: HashMap::new(),
            depth: HashMap::new(),
            parent: HashMap::new(),
            failed: HashSet::new(),
            conflicts: ConflictReport::new(),
            broken: Vec::new(),
        };

        let root_metadata =
            self.metadata(root)
                .map_err(|source| DepgraphError::MetadataResolution {
                    artifact: root.to_string(),
                    trail: root.to_string(),
                    source,
                })?;
        let root_idx = self.add_node(&mut state, root.clone(), root_metadata);
        state.depth.insert(root_idx, 0);

        let mut queue = VecDeque::from([root_idx]);
        while let Some(current) = queue.pop_front() {
            let Some(metadata) = state.arena[current].metadata.clone() else {
                continue;
            };
            let depth = state.depth[&current] + 1;

            for dep in &metadata.dependencies {
                let artifact = dep.to_descriptor();
                let id = artifact.id();

                let dst = if let Some(&existing) = state.table.get(&id) {
                    let chosen = &state.arena[existing];
                    if chosen.version != artifact.version {
                        state.conflicts.add(VersionConflict {
                            group: artifact.group.clone(),
                            name: artifact.name.clone(),
                            requested: artifact.version.clone(),
                            resolved: chosen.version.clone(),
                            requested_by: state.arena[current].to_string(),
                            reason: format!(
                                "nearest wins (depth {} vs {depth})",
                                state.depth[&existing]
                            ),
                        });
                    }
                    existing
                } else if state.failed.contains(&id) {
                    tracing::debug!("Skipping {artifact}: its metadata failed to load earlier");
                    continue;
                } else {
                    match self.metadata(&artifact) {
                        Ok(meta) => {
                            let idx = self.add_node(&mut state, artifact, meta);
                            state.depth.insert(idx, depth);
                            state.parent.insert(idx, current);
                            queue.push_back(idx);
                            idx
                        }
                        Err(source) => {
                            let trail = format!("{} -> {artifact}", state.trail(current));
                            if !self.tolerate_broken_metadata {
                                return Err(DepgraphError::MetadataResolution {
                                    artifact: artifact.to_string(),
                                    trail,
                                    source,
                                });
                            }
                            tracing::warn!(
                                "Failed to resolve metadata of {artifact}, skipping it (trail: {trail}): {source}"
                            );
                            state.failed.insert(id);
                            state.broken.push(BrokenDependency {
                                artifact,
                                trail,
                                error: source.to_string(),
                            });
                            continue;
                        }
                    }
                };

                if state.arena.find_edge(current, dst).is_none() {
                    state.arena.add_edge(
                        current,
                        dst,
                        Edge {
                            src: current,
                            dst,
                            scope: dep.effective_scope().to_string(),
                            optional: dep.optional,
                            exclusions: dep.exclusions.clone(),
                        },
                    );
                }
            }
        }

        tracing::debug!(
            "Built graph of {root}: {} nodes, {} edges, {} conflicts",
            state.arena.node_count(),
            state.arena.edge_count(),
            state.conflicts.len()
        );

        let arena = Arc::new(state.arena);
        let graph = DependencyGraph::from_parts(
            arena.clone(),
            Some(root_idx),
            arena.node_indices(),
            arena.edge_indices(),
        )?;
        Ok(Resolution {
            graph,
            conflicts: state.conflicts,
            broken: state.broken,
        })
    }
}

/// Build the graph of `root` and apply the exclusion baseline pass.
///
/// This is the graph every filter starts from.
pub fn resolve_graph(
    root: &ArtifactDescriptor,
    source: &dyn MetadataSource,
    files: Option<Arc<dyn FileResolver>>,
    tolerate_broken_metadata: bool,
) -> Result<Resolution, DepgraphError> {
    let mut builder = GraphBuilder::new(source).tolerate_broken_metadata(tolerate_broken_metadata);
    if let Some(files) = files {
        builder = builder.file_resolver(files);
    }
    let mut resolution = builder.build(root)?;
    let before = resolution.graph.len();
    resolution.graph = resolve_exclusions(&resolution.graph)?;
    tracing::debug!(
        "Exclusions removed {} of {before} nodes",
        before - resolution.graph.len()
    );
    Ok(resolution)
}
