//! Dependency graph engine: nearest-wins graph construction, path-scoped
//! exclusions, subgraph algebra, filter trees and rendering.

pub mod builder;
pub mod conflict;
pub mod dot;
pub mod exclusion;
pub mod files;
pub mod filter;
pub mod graph;
pub mod manifest;
pub mod subgraph;
pub mod visitor;

pub use builder::{resolve_graph, GraphBuilder, Resolution};
pub use graph::{DependencyGraph, Edge, Node};
