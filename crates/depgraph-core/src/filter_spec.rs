//! Declarative filter trees, as written in `[filters.<name>]` tables.
//!
//! Each filter takes the graphs produced by its children as input. A filter
//! without children operates on the graph it is applied to.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum FilterSpec {
    /// The input graph, unchanged.
    Full,

    /// Only traverse edges of the given scopes.
    Scope {
        scopes: Vec<String>,
        #[serde(default)]
        children: Vec<FilterSpec>,
    },

    /// Only keep nodes whose packaging is listed.
    Packaging {
        packagings: Vec<String>,
        #[serde(default)]
        children: Vec<FilterSpec>,
    },

    /// Keep nodes of group `value`, or of any group other than `not`.
    GroupId {
        #[serde(default)]
        value: Option<String>,
        #[serde(default)]
        not: Option<String>,
        #[serde(default)]
        children: Vec<FilterSpec>,
    },

    /// Only keep the listed artifacts. Unlisted nodes cut traversal.
    Artifacts {
        artifacts: Vec<String>,
        #[serde(default)]
        children: Vec<FilterSpec>,
    },

    /// First child minus second child.
    Subtract {
        #[serde(default)]
        children: Vec<FilterSpec>,
    },

    /// Intersection of all children.
    And {
        #[serde(default)]
        children: Vec<FilterSpec>,
    },

    /// Union of all children.
    Or {
        #[serde(default)]
        children: Vec<FilterSpec>,
    },

    /// The input graph minus the single child.
    Not {
        #[serde(default)]
        children: Vec<FilterSpec>,
    },

    /// Drop the listed artifacts and everything only reachable through them.
    ExcludeTransitively {
        artifacts: Vec<String>,
        #[serde(default)]
        children: Vec<FilterSpec>,
    },

    /// Drop artifacts that are specific to any one of the listed artifacts.
    RemoveSpecific {
        artifacts: Vec<String>,
        #[serde(default)]
        children: Vec<FilterSpec>,
    },

    /// The artifacts that become unreachable once `artifact` is removed.
    RetentionSet {
        artifact: String,
        #[serde(default)]
        children: Vec<FilterSpec>,
    },

    /// The full subgraph below `artifact`.
    SubGraph {
        artifact: String,
        #[serde(default)]
        children: Vec<FilterSpec>,
    },

    /// Keep nodes whose JAR main manifest has the attribute `has`.
    ManifestEntry {
        has: String,
        #[serde(default)]
        children: Vec<FilterSpec>,
    },

    /// Log the graph and pass it through.
    Dump {
        #[serde(default)]
        children: Vec<FilterSpec>,
    },

    /// Render the graph with GraphViz and pass it through.
    Visualize {
        output: PathBuf,
        #[serde(default)]
        subgraphs: Vec<ColoredSubgraph>,
        #[serde(default)]
        children: Vec<FilterSpec>,
    },
}

/// A subgraph painted in its own color by a `visualize` filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColoredSubgraph {
    pub color: String,
    pub filter: FilterSpec,
}

impl FilterSpec {
    /// The `kind` tag as written in configuration.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Scope { .. } => "scope",
            Self::Packaging { .. } => "packaging",
            Self::GroupId { .. } => "group-id",
            Self::Artifacts { .. } => "artifacts",
            Self::Subtract { .. } => "subtract",
            Self::And { .. } => "and",
            Self::Or { .. } => "or",
            Self::Not { .. } => "not",
            Self::ExcludeTransitively { .. } => "exclude-transitively",
            Self::RemoveSpecific { .. } => "remove-specific",
            Self::RetentionSet { .. } => "retention-set",
            Self::SubGraph { .. } => "sub-graph",
            Self::ManifestEntry { .. } => "manifest-entry",
            Self::Dump { .. } => "dump",
            Self::Visualize { .. } => "visualize",
        }
    }

    pub fn children(&self) -> &[FilterSpec] {
        match self {
            Self::Full => &[],
            Self::Scope { children, .. }
            | Self::Packaging { children, .. }
            | Self::GroupId { children, .. }
            | Self::Artifacts { children, .. }
            | Self::Subtract { children }
            | Self::And { children }
            | Self::Or { children }
            | Self::Not { children }
            | Self::ExcludeTransitively { children, .. }
            | Self::RemoveSpecific { children, .. }
            | Self::RetentionSet { children, .. }
            | Self::SubGraph { children, .. }
            | Self::ManifestEntry { children, .. }
            | Self::Dump { children }
            | Self::Visualize { children, .. } => children,
        }
    }

    /// `scope` filter over the input graph.
    pub fn scope<S: Into<String>>(scopes: impl IntoIterator<Item = S>) -> Self {
        Self::Scope {
            scopes: scopes.into_iter().map(Into::into).collect(),
            children: Vec::new(),
        }
    }
}
