//! Graph visitors: the predicates subgraph traversal is driven by.
//!
//! A visitor answers two questions during traversal: should this node be kept,
//! and should this edge be followed. Both default to yes. Visitors compose
//! with [`and`], [`or`] and [`not`].

use std::collections::HashSet;

use depgraph_core::artifact::ArtifactId;

use crate::graph::{Edge, Node};

pub trait GraphVisitor {
    /// Keep `node` (and traverse its outgoing edges)?
    fn visit_node(&mut self, _node: &Node) -> bool {
        true
    }

    /// Keep `edge` (and traverse to its destination)?
    fn visit_edge(&mut self, _edge: &Edge) -> bool {
        true
    }
}

impl<V: GraphVisitor + ?Sized> GraphVisitor for &mut V {
    fn visit_node(&mut self, node: &Node) -> bool {
        (**self).visit_node(node)
    }

    fn visit_edge(&mut self, edge: &Edge) -> bool {
        (**self).visit_edge(edge)
    }
}

impl<V: GraphVisitor + ?Sized> GraphVisitor for Box<V> {
    fn visit_node(&mut self, node: &Node) -> bool {
        (**self).visit_node(node)
    }

    fn visit_edge(&mut self, edge: &Edge) -> bool {
        (**self).visit_edge(edge)
    }
}

/// Accepts everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct AcceptAll;

impl GraphVisitor for AcceptAll {}

/// A visitor made of a node predicate; every edge is accepted.
pub struct NodeFilter<F>(F);

impl<F: FnMut(&Node) -> bool> GraphVisitor for NodeFilter<F> {
    fn visit_node(&mut self, node: &Node) -> bool {
        (self.0)(node)
    }
}

pub fn node_filter<F: FnMut(&Node) -> bool>(f: F) -> NodeFilter<F> {
    NodeFilter(f)
}

/// A visitor made of an edge predicate; every node is accepted.
pub struct EdgeFilter<F>(F);

impl<F: FnMut(&Edge) -> bool> GraphVisitor for EdgeFilter<F> {
    fn visit_edge(&mut self, edge: &Edge) -> bool {
        (self.0)(edge)
    }
}

pub fn edge_filter<F: FnMut(&Edge) -> bool>(f: F) -> EdgeFilter<F> {
    EdgeFilter(f)
}

/// Follow only edges of the given scopes.
#[derive(Debug, Clone)]
pub struct ScopeFilter {
    scopes: HashSet<String>,
}

impl ScopeFilter {
    pub fn new<S: Into<String>>(scopes: impl IntoIterator<Item = S>) -> Self {
        Self {
            scopes: scopes.into_iter().map(Into::into).collect(),
        }
    }
}

impl GraphVisitor for ScopeFilter {
    fn visit_edge(&mut self, edge: &Edge) -> bool {
        self.scopes.contains(&edge.scope)
    }
}

/// Keep only nodes whose packaging is listed.
#[derive(Debug, Clone)]
pub struct PackagingFilter {
    packagings: HashSet<String>,
}

impl PackagingFilter {
    pub fn new<S: Into<String>>(packagings: impl IntoIterator<Item = S>) -> Self {
        Self {
            packagings: packagings.into_iter().map(Into::into).collect(),
        }
    }
}

impl GraphVisitor for PackagingFilter {
    fn visit_node(&mut self, node: &Node) -> bool {
        self.packagings.contains(node.packaging())
    }
}

/// Keep nodes whose group equals `value`, or whose group differs from `not`.
///
/// With both unset nothing matches.
#[derive(Debug, Clone, Default)]
pub struct GroupIdFilter {
    pub value: Option<String>,
    pub not: Option<String>,
}

impl GraphVisitor for GroupIdFilter {
    fn visit_node(&mut self, node: &Node) -> bool {
        if self.value.as_deref() == Some(node.group.as_str()) {
            return true;
        }
        matches!(&self.not, Some(not) if *not != node.group)
    }
}

/// Keep only the listed identities.
#[derive(Debug, Clone)]
pub struct ArtifactSetFilter {
    ids: HashSet<ArtifactId>,
}

impl ArtifactSetFilter {
    pub fn new(ids: impl IntoIterator<Item = ArtifactId>) -> Self {
        Self {
            ids: ids.into_iter().collect(),
        }
    }
}

impl GraphVisitor for ArtifactSetFilter {
    fn visit_node(&mut self, node: &Node) -> bool {
        self.ids.contains(&node.id())
    }
}

pub struct And<'a>(Vec<Box<dyn GraphVisitor + 'a>>);

impl GraphVisitor for And<'_> {
    fn visit_node(&mut self, node: &Node) -> bool {
        self.0.iter_mut().all(|v| v.visit_node(node))
    }

    fn visit_edge(&mut self, edge: &Edge) -> bool {
        self.0.iter_mut().all(|v| v.visit_edge(edge))
    }
}

pub struct Or<'a>(Vec<Box<dyn GraphVisitor + 'a>>);

impl GraphVisitor for Or<'_> {
    fn visit_node(&mut self, node: &Node) -> bool {
        self.0.iter_mut().any(|v| v.visit_node(node))
    }

    fn visit_edge(&mut self, edge: &Edge) -> bool {
        self.0.iter_mut().any(|v| v.visit_edge(edge))
    }
}

pub struct Not<'a>(Box<dyn GraphVisitor + 'a>);

impl GraphVisitor for Not<'_> {
    fn visit_node(&mut self, node: &Node) -> bool {
        !self.0.visit_node(node)
    }

    fn visit_edge(&mut self, edge: &Edge) -> bool {
        !self.0.visit_edge(edge)
    }
}

/// Accept what every visitor accepts, asking them left to right.
pub fn and<'a>(visitors: Vec<Box<dyn GraphVisitor + 'a>>) -> And<'a> {
    And(visitors)
}

/// Accept what any visitor accepts, asking them left to right.
pub fn or<'a>(visitors: Vec<Box<dyn GraphVisitor + 'a>>) -> Or<'a> {
    Or(visitors)
}

pub fn not<'a>(visitor: impl GraphVisitor + 'a) -> Not<'a> {
    Not(Box::new(visitor))
}
