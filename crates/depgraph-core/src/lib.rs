//! Core data types for depgraph.
//!
//! This crate defines what the graph engine consumes: artifact identities and
//! descriptors, dependency-declaration metadata, the capabilities a host
//! supplies (metadata and file resolution), a TOML-described repository that
//! implements both, the `depgraph.toml` project configuration, and the
//! declarative filter trees it names.
//!
//! This crate is intentionally free of graph algorithms, async code and network I/O.

pub mod artifact;
pub mod config;
pub mod filter_spec;
pub mod metadata;
pub mod repository;
pub mod source;
