//! Subgraph algebra. Every operation returns a new snapshot over the same arena
//! and leaves its inputs untouched.

use std::collections::HashSet;

use depgraph_core::artifact::ArtifactId;
use depgraph_util::errors::DepgraphError;
use petgraph::graph::NodeIndex;

use crate::graph::DependencyGraph;
use crate::visitor::{node_filter, AcceptAll, GraphVisitor, PackagingFilter, ScopeFilter};

impl DependencyGraph {
    /// Traverse from the root, keeping what `visitor` accepts.
    pub fn filter(&self, visitor: &mut dyn GraphVisitor) -> Result<DependencyGraph, DepgraphError> {
        match self.root() {
            Some(root) => self.filter_from(root, visitor),
            None => Ok(self.clone()),
        }
    }

    /// Traverse from `start`, keeping what `visitor` accepts.
    ///
    /// A rejected node is not traversed further. A rejected edge is not followed,
    /// but its destination survives when a kept edge reaches it. The result is
    /// rooted at `start` and empty when `start` itself is rejected.
    pub fn filter_from(
        &self,
        start: NodeIndex,
        visitor: &mut dyn GraphVisitor,
    ) -> Result<DependencyGraph, DepgraphError> {
        if !self.contains(start) {
            return Err(DepgraphError::invariant(format!(
                "cannot traverse from {}: not part of the graph",
                self.describe(start)
            )));
        }
        if !visitor.visit_node(self.node(start)) {
            return Ok(DependencyGraph::empty(self.arena().clone()));
        }

        let mut nodes = vec![start];
        let mut edges = Vec::new();
        let mut visited = HashSet::from([start]);
        let mut stack = vec![start];
        while let Some(idx) = stack.pop() {
            for &e in self.forward_edge_indices(idx) {
                let edge = self.edge(e);
                if !visitor.visit_edge(edge) {
                    continue;
                }
                edges.push(e);
                if visited.insert(edge.dst) && visitor.visit_node(self.node(edge.dst)) {
                    nodes.push(edge.dst);
                    stack.push(edge.dst);
                }
            }
        }

        DependencyGraph::from_parts(self.arena().clone(), Some(start), nodes, edges)
    }

    /// Everything below `node`, rooted there.
    pub fn rooted_at(&self, node: NodeIndex) -> Result<DependencyGraph, DepgraphError> {
        self.filter_from(node, &mut AcceptAll)
    }

    /// Exactly `nodes`, with every edge of this graph between two of them.
    ///
    /// Membership is taken as given, so each node must still be reachable from
    /// `root` through the kept edges.
    pub fn induced_subgraph(
        &self,
        root: NodeIndex,
        nodes: &HashSet<NodeIndex>,
    ) -> Result<DependencyGraph, DepgraphError> {
        let members: Vec<NodeIndex> = self
            .node_indices()
            .filter(|idx| nodes.contains(idx))
            .collect();
        if !members.contains(&root) {
            return Err(DepgraphError::invariant(format!(
                "induced subgraph root {} is not among its nodes",
                self.describe(root)
            )));
        }
        let edges: Vec<_> = members
            .iter()
            .flat_map(|&idx| self.forward_edge_indices(idx).iter().copied())
            .collect();
        DependencyGraph::from_parts(self.arena().clone(), Some(root), members, edges)
    }

    /// Nodes of this graph not in `other`, by traversal from this graph's root.
    pub fn subtract(&self, other: &DependencyGraph) -> Result<DependencyGraph, DepgraphError> {
        self.filter(&mut node_filter(|n| !other.contains_node(n)))
    }

    /// Nodes in both graphs, by traversal from this graph's root.
    pub fn intersect(&self, other: &DependencyGraph) -> Result<DependencyGraph, DepgraphError> {
        self.filter(&mut node_filter(|n| other.contains_node(n)))
    }

    /// Nodes and edges of either graph. Both must share an arena and a root.
    pub fn union(&self, other: &DependencyGraph) -> Result<DependencyGraph, DepgraphError> {
        if other.is_empty() {
            return Ok(self.clone());
        }
        if self.is_empty() {
            return Ok(other.clone());
        }
        if !self.same_arena(other) || self.root() != other.root() {
            return Err(DepgraphError::configuration(
                "cannot union graphs with different roots",
            ));
        }
        let nodes = self.node_indices().chain(other.node_indices());
        let edges = self
            .node_indices()
            .flat_map(|idx| self.forward_edge_indices(idx).iter().copied())
            .chain(
                other
                    .node_indices()
                    .flat_map(|idx| other.forward_edge_indices(idx).iter().copied()),
            );
        DependencyGraph::from_parts(self.arena().clone(), self.root(), nodes, edges)
    }

    /// Drop `ids` and everything reachable only through them.
    pub fn exclude_transitively(
        &self,
        ids: &HashSet<ArtifactId>,
    ) -> Result<DependencyGraph, DepgraphError> {
        self.filter(&mut node_filter(|n| !ids.contains(&n.id())))
    }

    /// Drop what is specific to any one of `ids`: keep only nodes that survive
    /// the transitive exclusion of each id on its own.
    pub fn remove_specific(&self, ids: &HashSet<ArtifactId>) -> Result<DependencyGraph, DepgraphError> {
        let mut keep: HashSet<NodeIndex> = self.node_indices().collect();
        for id in ids {
            let without = self.exclude_transitively(&HashSet::from([id.clone()]))?;
            keep.retain(|&idx| without.contains(idx));
        }
        self.filter(&mut node_filter(|n| keep.contains(&n.index())))
    }

    /// The retention set of `target`: what hangs below it and becomes unreachable
    /// from the root once it is removed. Rooted at `target`.
    pub fn retention_set(&self, target: NodeIndex) -> Result<DependencyGraph, DepgraphError> {
        if !self.contains(target) {
            return Err(DepgraphError::invariant(format!(
                "no retention set for {}: not part of the graph",
                self.describe(target)
            )));
        }
        let id = self.node(target).id();
        let remaining = self.exclude_transitively(&HashSet::from([id]))?;
        self.filter_from(target, &mut node_filter(|n| !remaining.contains_node(n)))
    }

    /// Follow only edges of the given scopes.
    pub fn filter_scope<S: AsRef<str>>(&self, scopes: &[S]) -> Result<DependencyGraph, DepgraphError> {
        self.filter(&mut ScopeFilter::new(scopes.iter().map(|s| s.as_ref())))
    }

    /// Keep only nodes of the given packagings.
    pub fn filter_packaging<S: AsRef<str>>(
        &self,
        packagings: &[S],
    ) -> Result<DependencyGraph, DepgraphError> {
        self.filter(&mut PackagingFilter::new(packagings.iter().map(|s| s.as_ref())))
    }
}
