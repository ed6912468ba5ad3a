//! Path-scoped exclusion resolution.
//!
//! An exclusion declared on a dependency removes matching artifacts from that
//! dependency's subtree only. A node excluded along one path stays in the graph
//! when some other path reaches it without an exclusion in force (the diamond
//! case), so exclusions cannot be applied by marking nodes globally.

use std::collections::{BTreeSet, HashMap, HashSet};

use depgraph_core::artifact::Exclusion;
use depgraph_util::errors::DepgraphError;
use petgraph::graph::NodeIndex;

use crate::graph::{DependencyGraph, Node};

/// Remove every node that is only reachable through paths excluding it.
///
/// Optional edges are not followed. The result shares the input's root.
pub fn resolve_exclusions(graph: &DependencyGraph) -> Result<DependencyGraph, DepgraphError> {
    let Some(root) = graph.root() else {
        return Ok(graph.clone());
    };
    let walk = ExclusionWalk::run(graph, root);
    tracing::debug!(
        "Exclusion walk: {} expansions for {} nodes",
        walk.expansions,
        graph.len()
    );
    graph.induced_subgraph(root, &walk.reachable)
}

struct ExclusionWalk<'g> {
    graph: &'g DependencyGraph,
    /// One frame per node on the current path: the exclusions of the edge it was entered through.
    frames: Vec<&'g [Exclusion]>,
    reachable: HashSet<NodeIndex>,
    /// Exclusion sets each node's dependencies have already been expanded under.
    expanded: HashMap<NodeIndex, Vec<BTreeSet<&'g Exclusion>>>,
    on_path: HashSet<NodeIndex>,
    expansions: usize,
}

impl<'g> ExclusionWalk<'g> {
    fn run(graph: &'g DependencyGraph, root: NodeIndex) -> Self {
        let mut walk = Self {
            graph,
            frames: Vec::new(),
            reachable: HashSet::new(),
            expanded: HashMap::new(),
            on_path: HashSet::new(),
            expansions: 0,
        };
        walk.visit(root, &[]);
        walk
    }

    fn excluded(&self, node: &Node) -> bool {
        self.frames
            .iter()
            .any(|frame| frame.iter().any(|e| e.matches(&node.group, &node.name)))
    }

    fn visit(&mut self, idx: NodeIndex, entered_with: &'g [Exclusion]) {
        let graph = self.graph;
        if self.excluded(graph.node(idx)) {
            return;
        }
        self.reachable.insert(idx);
        if self.on_path.contains(&idx) {
            return;
        }

        // Reachability only grows, and more exclusions never reach more nodes:
        // a revisit under a superset of an already expanded set is redundant.
        let active: BTreeSet<&'g Exclusion> = self
            .frames
            .iter()
            .copied()
            .chain(std::iter::once(entered_with))
            .flat_map(|frame| frame.iter())
            .collect();
        let seen = self.expanded.entry(idx).or_default();
        if seen.iter().any(|done| done.is_subset(&active)) {
            return;
        }
        seen.push(active);
        self.expansions += 1;

        self.on_path.insert(idx);
        self.frames.push(entered_with);
        for edge in graph.forward_edges(idx) {
            if edge.optional {
                continue;
            }
            self.visit(edge.dst, &edge.exclusions);
        }
        self.frames.pop();
        self.on_path.remove(&idx);
    }
}
