//! Dependency graph model: nodes and edges in a shared arena, viewed through
//! immutable snapshots.
//!
//! A build produces one arena (a petgraph `DiGraph`) holding every node and edge
//! discovered. A [`DependencyGraph`] is a snapshot over that arena: a root, a set
//! of member nodes and the forward/backward edge indexes restricted to them.
//! Derived graphs (filters, subtraction, ...) point at the same arena, so a node
//! is the same value in every graph that contains it.

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use depgraph_core::artifact::{ArtifactDescriptor, ArtifactId, Exclusion, DEFAULT_SCOPE};
use depgraph_core::metadata::Metadata;
use depgraph_core::source::FileResolver;
use depgraph_util::errors::{BoxError, DepgraphError};
use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};

/// Storage shared by a full graph and every graph derived from it.
pub type Arena = DiGraph<Node, Edge>;

/// One resolved module. Equality of modules is identity (`group:name[:classifier]`),
/// never version.
pub struct Node {
    index: NodeIndex,
    pub group: String,
    pub name: String,
    pub version: String,
    pub kind: String,
    pub classifier: Option<String>,
    /// `None` for system-scoped artifacts and artifacts without metadata.
    pub metadata: Option<Metadata>,
    file: ArtifactFile,
}

/// Lazily resolved backing file of a node.
struct ArtifactFile {
    descriptor: ArtifactDescriptor,
    repositories: Vec<String>,
    resolver: Option<Arc<dyn FileResolver>>,
    path: Mutex<Option<PathBuf>>,
}

impl ArtifactFile {
    fn resolve(&self) -> Result<Option<PathBuf>, BoxError> {
        if self.descriptor.is_system() {
            return Ok(None);
        }
        // Held across the resolver call: one node resolves at most once at a time.
        let mut slot = self.path.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(path) = slot.as_ref() {
            return Ok(Some(path.clone()));
        }
        let resolver = self
            .resolver
            .as_ref()
            .ok_or("no file resolver configured")?;
        let path = resolver.resolve_file(&self.descriptor, &self.repositories)?;
        *slot = Some(path.clone());
        Ok(Some(path))
    }
}

impl Node {
    pub(crate) fn new(
        index: NodeIndex,
        descriptor: ArtifactDescriptor,
        metadata: Option<Metadata>,
        repositories: Vec<String>,
        resolver: Option<Arc<dyn FileResolver>>,
    ) -> Self {
        Self {
            index,
            group: descriptor.group.clone(),
            name: descriptor.name.clone(),
            version: descriptor.version.clone(),
            kind: descriptor.kind.clone(),
            classifier: descriptor.classifier.clone(),
            metadata,
            file: ArtifactFile {
                descriptor,
                repositories,
                resolver,
                path: Mutex::new(None),
            },
        }
    }

    /// Position of this node in its arena.
    pub fn index(&self) -> NodeIndex {
        self.index
    }

    pub fn id(&self) -> ArtifactId {
        ArtifactId {
            group: self.group.clone(),
            name: self.name.clone(),
            classifier: self.classifier.clone(),
        }
    }

    /// The descriptor that won conflict resolution for this identity.
    pub fn descriptor(&self) -> &ArtifactDescriptor {
        &self.file.descriptor
    }

    /// Packaging declared by the metadata, or the artifact type without metadata.
    pub fn packaging(&self) -> &str {
        match &self.metadata {
            Some(m) => &m.packaging,
            None => &self.kind,
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group, self.name, self.version)?;
        if let Some(c) = &self.classifier {
            write!(f, ":{c}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("index", &self.index.index())
            .field("coordinate", &self.to_string())
            .field("kind", &self.kind)
            .field("has_metadata", &self.metadata.is_some())
            .finish()
    }
}

/// A "depends on" relation, carrying the exclusions declared on it.
#[derive(Debug, Clone)]
pub struct Edge {
    pub src: NodeIndex,
    pub dst: NodeIndex,
    pub scope: String,
    pub optional: bool,
    pub exclusions: Vec<Exclusion>,
}

impl Edge {
    pub fn new(src: NodeIndex, dst: NodeIndex) -> Self {
        Self {
            src,
            dst,
            scope: DEFAULT_SCOPE.to_string(),
            optional: false,
            exclusions: Vec::new(),
        }
    }
}

/// An immutable snapshot over an [`Arena`].
#[derive(Clone)]
pub struct DependencyGraph {
    arena: Arc<Arena>,
    root: Option<NodeIndex>,
    nodes: BTreeMap<ArtifactId, NodeIndex>,
    members: HashSet<NodeIndex>,
    forward: HashMap<NodeIndex, Vec<EdgeIndex>>,
    backward: HashMap<NodeIndex, Vec<EdgeIndex>>,
}

impl DependencyGraph {
    /// An empty graph over `arena`.
    pub fn empty(arena: Arc<Arena>) -> Self {
        Self {
            arena,
            root: None,
            nodes: BTreeMap::new(),
            members: HashSet::new(),
            forward: HashMap::new(),
            backward: HashMap::new(),
        }
    }

    /// Assemble a snapshot from arena parts.
    ///
    /// The root is always a member. Edges with an endpoint outside the node set
    /// are dropped and a repeated `(src, dst)` pair is registered once. Every
    /// member must be reachable from the root.
    pub fn from_parts(
        arena: Arc<Arena>,
        root: Option<NodeIndex>,
        nodes: impl IntoIterator<Item = NodeIndex>,
        edges: impl IntoIterator<Item = EdgeIndex>,
    ) -> Result<Self, DepgraphError> {
        let mut members: HashSet<NodeIndex> = nodes.into_iter().collect();
        let Some(root) = root else {
            if !members.is_empty() {
                return Err(DepgraphError::invariant(
                    "a graph with nodes must have a root",
                ));
            }
            return Ok(Self::empty(arena));
        };
        members.insert(root);

        let mut by_id = BTreeMap::new();
        for &idx in &members {
            let node = arena.node_weight(idx).ok_or_else(|| {
                DepgraphError::invariant(format!("node #{} is not in the arena", idx.index()))
            })?;
            if let Some(other) = by_id.insert(node.id(), idx) {
                return Err(DepgraphError::invariant(format!(
                    "two nodes (#{} and #{}) share identity {}",
                    other.index(),
                    idx.index(),
                    node.id()
                )));
            }
        }

        let mut edges: Vec<EdgeIndex> = edges.into_iter().collect();
        edges.sort();
        edges.dedup();

        let mut forward: HashMap<NodeIndex, Vec<EdgeIndex>> = HashMap::new();
        let mut backward: HashMap<NodeIndex, Vec<EdgeIndex>> = HashMap::new();
        let mut pairs = HashSet::new();
        for e in edges {
            let edge = arena.edge_weight(e).ok_or_else(|| {
                DepgraphError::invariant(format!("edge #{} is not in the arena", e.index()))
            })?;
            if !members.contains(&edge.src) || !members.contains(&edge.dst) {
                continue;
            }
            if !pairs.insert((edge.src, edge.dst)) {
                continue;
            }
            forward.entry(edge.src).or_default().push(e);
            backward.entry(edge.dst).or_default().push(e);
        }

        let graph = Self {
            arena,
            root: Some(root),
            nodes: by_id,
            members,
            forward,
            backward,
        };
        graph.check_reachable()?;
        Ok(graph)
    }

    fn check_reachable(&self) -> Result<(), DepgraphError> {
        let Some(root) = self.root else {
            return Ok(());
        };
        let mut seen = HashSet::from([root]);
        let mut queue = VecDeque::from([root]);
        while let Some(idx) = queue.pop_front() {
            for edge in self.forward_edges(idx) {
                if seen.insert(edge.dst) {
                    queue.push_back(edge.dst);
                }
            }
        }
        if seen.len() == self.members.len() {
            return Ok(());
        }
        let orphans: Vec<String> = self
            .nodes()
            .filter(|n| !seen.contains(&n.index))
            .map(|n| n.to_string())
            .collect();
        Err(DepgraphError::invariant(format!(
            "unreachable from {}: {}",
            self.arena[root],
            orphans.join(", ")
        )))
    }

    pub fn arena(&self) -> &Arc<Arena> {
        &self.arena
    }

    /// Whether both graphs are views over the same arena.
    pub fn same_arena(&self, other: &DependencyGraph) -> bool {
        Arc::ptr_eq(&self.arena, &other.arena)
    }

    pub fn root(&self) -> Option<NodeIndex> {
        self.root
    }

    pub fn root_node(&self) -> Option<&Node> {
        self.root.map(|r| &self.arena[r])
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Number of member nodes, root included.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Number of edges in this snapshot.
    pub fn edge_count(&self) -> usize {
        self.forward.values().map(Vec::len).sum()
    }

    /// Arena node at `idx`. Panics if `idx` does not belong to the arena.
    pub fn node(&self, idx: NodeIndex) -> &Node {
        &self.arena[idx]
    }

    pub fn edge(&self, idx: EdgeIndex) -> &Edge {
        &self.arena[idx]
    }

    /// Member nodes in identity order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.nodes.values().map(|&idx| &self.arena[idx])
    }

    pub fn node_indices(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.nodes.values().copied()
    }

    /// All member edges, grouped by source in identity order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> + '_ {
        self.node_indices().flat_map(move |idx| self.forward_edges(idx))
    }

    pub fn forward_edge_indices(&self, idx: NodeIndex) -> &[EdgeIndex] {
        self.forward.get(&idx).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn backward_edge_indices(&self, idx: NodeIndex) -> &[EdgeIndex] {
        self.backward.get(&idx).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Outgoing edges of `idx`, in declaration order.
    pub fn forward_edges(&self, idx: NodeIndex) -> impl Iterator<Item = &Edge> + '_ {
        self.forward_edge_indices(idx)
            .iter()
            .map(move |&e| &self.arena[e])
    }

    /// Incoming edges of `idx`.
    pub fn backward_edges(&self, idx: NodeIndex) -> impl Iterator<Item = &Edge> + '_ {
        self.backward_edge_indices(idx)
            .iter()
            .map(move |&e| &self.arena[e])
    }

    pub fn contains(&self, idx: NodeIndex) -> bool {
        self.members.contains(&idx)
    }

    /// Membership by node identity: the node must be this graph's arena node.
    pub fn contains_node(&self, node: &Node) -> bool {
        self.contains(node.index)
            && self
                .arena
                .node_weight(node.index)
                .is_some_and(|n| std::ptr::eq(n, node))
    }

    pub fn find(&self, id: &ArtifactId) -> Option<NodeIndex> {
        self.nodes.get(id).copied()
    }

    /// Resolve a user-provided key to a member node.
    ///
    /// Tries an exact `group:name[:classifier]` first, then falls back to the
    /// first member with that name.
    pub fn resolve_key(&self, key: &str) -> Option<NodeIndex> {
        if let Ok(id) = key.parse::<ArtifactId>() {
            if let Some(idx) = self.find(&id) {
                return Some(idx);
            }
        }
        self.find_by_name(key).next()
    }

    /// Members named `name`, in identity order.
    pub fn find_by_name<'a>(&'a self, name: &'a str) -> impl Iterator<Item = NodeIndex> + 'a {
        self.nodes
            .iter()
            .filter(move |(id, _)| id.name == name)
            .map(|(_, &idx)| idx)
    }

    /// Node label for messages; `#<index>` when `idx` is not in the arena.
    pub(crate) fn describe(&self, idx: NodeIndex) -> String {
        self.arena
            .node_weight(idx)
            .map_or_else(|| format!("#{}", idx.index()), |n| n.to_string())
    }

    /// Edges leading from the root to `idx`, root first. Empty for the root itself.
    ///
    /// Walks backward edges breadth-first, so the shortest trail is returned.
    /// Ties between trails of equal length go by edge declaration order, starting at `idx`.
    pub fn trail(&self, idx: NodeIndex) -> Result<Vec<&Edge>, DepgraphError> {
        let root = self
            .root
            .ok_or_else(|| DepgraphError::invariant("trail requested in an empty graph"))?;
        if !self.contains(idx) {
            return Err(DepgraphError::invariant(format!(
                "{} is not part of the graph",
                self.describe(idx)
            )));
        }

        let mut via: HashMap<NodeIndex, EdgeIndex> = HashMap::new();
        let mut queue = VecDeque::from([idx]);
        let mut seen = HashSet::from([idx]);
        while let Some(current) = queue.pop_front() {
            if current == root {
                let mut trail = Vec::new();
                let mut at = root;
                while at != idx {
                    let edge = &self.arena[via[&at]];
                    trail.push(edge);
                    at = edge.dst;
                }
                return Ok(trail);
            }
            for &e in self.backward_edge_indices(current) {
                let src = self.arena[e].src;
                if seen.insert(src) {
                    via.insert(src, e);
                    queue.push_back(src);
                }
            }
        }
        Err(DepgraphError::invariant(format!(
            "{} has no path back to {}",
            self.arena[idx], self.arena[root]
        )))
    }

    /// The trail rendered as `root -> ... -> node`.
    pub fn trail_string(&self, idx: NodeIndex) -> Result<String, DepgraphError> {
        let trail = self.trail(idx)?;
        let mut out = match trail.first() {
            Some(edge) => self.arena[edge.src].to_string(),
            None => return Ok(self.arena[idx].to_string()),
        };
        for edge in trail {
            out.push_str(" -> ");
            out.push_str(&self.arena[edge.dst].to_string());
        }
        Ok(out)
    }

    /// Backing file of a member node, resolved on first access and memoized.
    ///
    /// `None` only for system-scoped artifacts.
    pub fn artifact_file(&self, idx: NodeIndex) -> Result<Option<PathBuf>, DepgraphError> {
        let node = &self.arena[idx];
        node.file.resolve().map_err(|source| {
            let trail = self
                .trail_string(idx)
                .unwrap_or_else(|_| node.to_string());
            DepgraphError::FileResolution {
                artifact: node.to_string(),
                trail,
                source,
            }
        })
    }

    /// Print the dependency tree to a string, grouping the root's edges by scope.
    pub fn print_tree(&self, max_depth: Option<usize>) -> String {
        let mut output = String::new();
        let Some(root) = self.root else {
            return output;
        };
        output.push_str(&format!("{}\n", self.arena[root]));

        let mut sections: BTreeMap<(usize, &str), Vec<NodeIndex>> = BTreeMap::new();
        for edge in self.forward_edges(root) {
            let scope = edge.scope.as_str();
            sections
                .entry((scope_rank(scope), scope))
                .or_default()
                .push(edge.dst);
        }

        let show_headers =
            sections.len() > 1 || sections.keys().any(|(_, scope)| *scope != DEFAULT_SCOPE);
        let mut visited = HashSet::from([root]);
        let total_sections = sections.len();

        for (i, ((_, scope), deps)) in sections.iter().enumerate() {
            if show_headers {
                output.push_str(&format!("[{scope}]\n"));
            }
            let is_last_section = i + 1 == total_sections;
            let count = deps.len();
            for (j, &idx) in deps.iter().enumerate() {
                let is_last = j + 1 == count && is_last_section;
                self.print_subtree(&mut output, idx, "", is_last, 1, max_depth, &mut visited);
            }
        }

        output
    }

    #[allow(clippy::too_many_arguments)]
    fn print_subtree(
        &self,
        output: &mut String,
        idx: NodeIndex,
        prefix: &str,
        is_last: bool,
        depth: usize,
        max_depth: Option<usize>,
        visited: &mut HashSet<NodeIndex>,
    ) {
        let connector = if is_last { "└── " } else { "├── " };
        output.push_str(&format!("{prefix}{connector}{}\n", self.arena[idx]));

        if max_depth.is_some_and(|max| depth >= max) {
            return;
        }
        if !visited.insert(idx) {
            return;
        }

        let child_prefix = format!("{prefix}{}", if is_last { "    " } else { "│   " });
        let children = self.forward_edge_indices(idx);
        let count = children.len();
        for (i, &e) in children.iter().enumerate() {
            self.print_subtree(
                output,
                self.arena[e].dst,
                &child_prefix,
                i + 1 == count,
                depth + 1,
                max_depth,
                visited,
            );
        }

        visited.remove(&idx);
    }

    /// Find a path from the root to a specific dependency.
    ///
    /// Accepts either `group:name` or just `name` (partial match).
    pub fn find_path(&self, target_key: &str) -> Option<Vec<&Node>> {
        let target = self.resolve_key(target_key)?;
        let trail = self.trail(target).ok()?;
        let mut path = vec![self.root_node()?];
        path.extend(trail.iter().map(|e| &self.arena[e.dst]));
        Some(path)
    }

    /// Build an inverted dependency tree (reverse edges) for a single artifact.
    ///
    /// Accepts either `group:name` or just `name` (partial match).
    pub fn print_inverted_tree(&self, target_key: &str) -> String {
        let mut output = String::new();
        let Some(idx) = self.resolve_key(target_key) else {
            return output;
        };
        output.push_str(&format!("{}\n", self.arena[idx]));

        let mut visited = HashSet::from([idx]);
        let dependents = self.backward_edge_indices(idx);
        let count = dependents.len();
        for (i, &e) in dependents.iter().enumerate() {
            self.print_inverted_subtree(
                &mut output,
                self.arena[e].src,
                "",
                i + 1 == count,
                &mut visited,
            );
        }

        output
    }

    fn print_inverted_subtree(
        &self,
        output: &mut String,
        idx: NodeIndex,
        prefix: &str,
        is_last: bool,
        visited: &mut HashSet<NodeIndex>,
    ) {
        let connector = if is_last { "└── " } else { "├── " };
        output.push_str(&format!("{prefix}{connector}{}\n", self.arena[idx]));

        if !visited.insert(idx) {
            return;
        }

        let child_prefix = format!("{prefix}{}", if is_last { "    " } else { "│   " });
        let dependents = self.backward_edge_indices(idx);
        let count = dependents.len();
        for (i, &e) in dependents.iter().enumerate() {
            self.print_inverted_subtree(
                output,
                self.arena[e].src,
                &child_prefix,
                i + 1 == count,
                visited,
            );
        }

        visited.remove(&idx);
    }
}

/// Well-known scopes print in build order; anything else after them, alphabetically.
fn scope_rank(scope: &str) -> usize {
    match scope {
        "compile" => 0,
        "provided" => 1,
        "runtime" => 2,
        "system" => 3,
        "test" => 4,
        _ => 5,
    }
}

impl fmt::Display for DependencyGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.root_node() {
            Some(root) => writeln!(f, "DependencyGraph[root={root}")?,
            None => return write!(f, "DependencyGraph[empty]"),
        }
        writeln!(f, "  nodes=[")?;
        for node in self.nodes() {
            writeln!(f, "    {node}")?;
        }
        writeln!(f, "  ]")?;
        writeln!(f, "  edges=[")?;
        for edge in self.edges() {
            write!(
                f,
                "    {} -> {} ({}",
                self.arena[edge.src], self.arena[edge.dst], edge.scope
            )?;
            if edge.optional {
                write!(f, ", optional")?;
            }
            writeln!(f, ")")?;
        }
        write!(f, "  ]\n]")
    }
}

impl fmt::Debug for DependencyGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DependencyGraph")
            .field("root", &self.root_node().map(|n| n.to_string()))
            .field("nodes", &self.len())
            .field("edges", &self.edge_count())
            .finish()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Arena fixture: nodes named by artifact name under group `g`, edges as index pairs.
    pub(crate) fn arena(names: &[&str], edges: &[(usize, usize, &str)]) -> Arc<Arena> {
        let mut arena = Arena::new();
        for name in names {
            let idx = NodeIndex::new(arena.node_count());
            arena.add_node(Node::new(
                idx,
                ArtifactDescriptor::new("g", *name, "1.0"),
                None,
                Vec::new(),
                None,
            ));
        }
        for &(src, dst, scope) in edges {
            let mut edge = Edge::new(NodeIndex::new(src), NodeIndex::new(dst));
            edge.scope = scope.to_string();
            arena.add_edge(edge.src, edge.dst, edge);
        }
        Arc::new(arena)
    }

    pub(crate) fn full(arena: &Arc<Arena>) -> DependencyGraph {
        DependencyGraph::from_parts(
            arena.clone(),
            Some(NodeIndex::new(0)),
            arena.node_indices(),
            arena.edge_indices(),
        )
        .unwrap()
    }

    fn idx(i: usize) -> NodeIndex {
        NodeIndex::new(i)
    }

    #[test]
    fn from_parts_rejects_orphans() {
        let arena = arena(&["app", "a", "b"], &[(0, 1, "compile")]);
        let err = DependencyGraph::from_parts(
            arena.clone(),
            Some(idx(0)),
            arena.node_indices(),
            arena.edge_indices(),
        )
        .unwrap_err();
        assert!(matches!(err, DepgraphError::InvariantViolation { .. }));
        assert!(err.to_string().contains("g:b:1.0"));
    }

    #[test]
    fn from_parts_drops_dangling_edges() {
        let arena = arena(&["app", "a", "b"], &[(0, 1, "compile"), (1, 2, "compile")]);
        let g = DependencyGraph::from_parts(
            arena.clone(),
            Some(idx(0)),
            [idx(0), idx(1)],
            arena.edge_indices(),
        )
        .unwrap();
        assert_eq!(g.len(), 2);
        assert_eq!(g.edge_count(), 1);
        assert!(g.backward_edge_indices(idx(2)).is_empty());
    }

    #[test]
    fn from_parts_without_nodes_is_empty() {
        let arena = arena(&["app"], &[]);
        let g = DependencyGraph::from_parts(arena, None, [], []).unwrap();
        assert!(g.is_empty());
        assert_eq!(g.len(), 0);
        assert!(g.root_node().is_none());
    }

    #[test]
    fn edges_register_once() {
        let arena = arena(&["app", "a"], &[(0, 1, "compile")]);
        let e = arena.edge_indices().next().unwrap();
        let g = DependencyGraph::from_parts(arena.clone(), Some(idx(0)), [idx(1)], [e, e]).unwrap();
        assert_eq!(g.forward_edge_indices(idx(0)), &[e]);
        assert_eq!(g.backward_edge_indices(idx(1)), &[e]);
    }

    #[test]
    fn trail_is_shortest_and_root_first() {
        // app -> a -> b -> c, app -> c
        let arena = arena(
            &["app", "a", "b", "c"],
            &[(0, 1, "compile"), (1, 2, "compile"), (2, 3, "compile"), (0, 3, "test")],
        );
        let g = full(&arena);
        let trail = g.trail(idx(3)).unwrap();
        assert_eq!(trail.len(), 1);
        assert_eq!(trail[0].src, idx(0));
        assert_eq!(g.trail_string(idx(2)).unwrap(), "g:app:1.0 -> g:a:1.0 -> g:b:1.0");
        assert!(g.trail(idx(0)).unwrap().is_empty());
    }

    #[test]
    fn trail_survives_cycles() {
        let arena = arena(
            &["app", "a", "b"],
            &[(0, 1, "compile"), (1, 2, "compile"), (2, 1, "compile")],
        );
        let g = full(&arena);
        assert_eq!(g.trail(idx(2)).unwrap().len(), 2);
    }

    #[test]
    fn contains_node_is_by_arena_identity() {
        let arena_a = arena(&["app", "a"], &[(0, 1, "compile")]);
        let arena_b = arena(&["app", "a"], &[(0, 1, "compile")]);
        let g = full(&arena_a);
        assert!(g.contains_node(&arena_a[idx(1)]));
        assert!(!g.contains_node(&arena_b[idx(1)]));
    }

    #[test]
    fn resolve_key_exact_and_by_name() {
        let arena = arena(&["app", "my-lib"], &[(0, 1, "compile")]);
        let g = full(&arena);
        assert_eq!(g.resolve_key("g:my-lib"), Some(idx(1)));
        assert_eq!(g.resolve_key("my-lib"), Some(idx(1)));
        assert_eq!(g.resolve_key("missing"), None);
    }

    #[test]
    fn tree_printing() {
        let arena = arena(
            &["app", "a", "b", "c"],
            &[(0, 1, "compile"), (0, 2, "compile"), (1, 3, "compile")],
        );
        let tree = full(&arena).print_tree(None);
        assert!(tree.starts_with("g:app:1.0\n"));
        assert!(tree.contains("├── g:a:1.0"));
        assert!(tree.contains("│   └── g:c:1.0"));
        assert!(tree.contains("└── g:b:1.0"));
        assert!(!tree.contains("[compile]"));
    }

    #[test]
    fn tree_groups_by_scope() {
        let arena = arena(&["app", "a", "b"], &[(0, 2, "test"), (0, 1, "compile")]);
        let tree = full(&arena).print_tree(None);
        let compile = tree.find("[compile]").unwrap();
        let test = tree.find("[test]").unwrap();
        assert!(compile < test);
    }

    #[test]
    fn tree_respects_depth() {
        let arena = arena(&["app", "a", "b"], &[(0, 1, "compile"), (1, 2, "compile")]);
        let tree = full(&arena).print_tree(Some(1));
        assert!(tree.contains("g:a:1.0"));
        assert!(!tree.contains("g:b:1.0"));
    }

    #[test]
    fn find_path_and_inverted_tree() {
        let arena = arena(&["app", "a", "b"], &[(0, 1, "compile"), (1, 2, "compile")]);
        let g = full(&arena);
        let path = g.find_path("b").unwrap();
        let names: Vec<&str> = path.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, ["app", "a", "b"]);
        assert!(g.find_path("missing").is_none());

        let inv = g.print_inverted_tree("g:b");
        assert!(inv.starts_with("g:b:1.0\n"));
        assert!(inv.contains("└── g:a:1.0"));
        assert!(inv.contains("    └── g:app:1.0"));
    }

    #[test]
    fn system_scope_has_no_file() {
        let mut desc = ArtifactDescriptor::new("g", "tools", "1.0");
        desc.scope = "system".into();
        let mut arena = Arena::new();
        arena.add_node(Node::new(idx(0), desc, None, Vec::new(), None));
        let g = full(&Arc::new(arena));
        assert_eq!(g.artifact_file(idx(0)).unwrap(), None);
    }

    #[test]
    fn missing_resolver_is_file_error() {
        let arena = arena(&["app"], &[]);
        let err = full(&arena).artifact_file(idx(0)).unwrap_err();
        assert!(matches!(err, DepgraphError::FileResolution { .. }));
    }
}
