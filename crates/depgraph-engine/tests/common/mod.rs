#![allow(dead_code)]

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use depgraph_core::artifact::ArtifactDescriptor;
use depgraph_core::metadata::{DependencyDecl, Metadata};
use depgraph_core::source::{FileResolver, MetadataSource};
use depgraph_engine::DependencyGraph;
use depgraph_util::errors::BoxError;

/// In-memory repository: metadata keyed by `group:name:version`, files by the same key.
#[derive(Default)]
pub struct MemoryRepo {
    metadata: HashMap<String, Metadata>,
    files: HashMap<String, PathBuf>,
    pub metadata_calls: Mutex<Vec<String>>,
    pub file_calls: AtomicUsize,
}

impl MemoryRepo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare `coordinate` (`group:name:version`) with `deps`.
    pub fn artifact(mut self, coordinate: &str, deps: Vec<DependencyDecl>) -> Self {
        let mut meta = Metadata::new("jar");
        meta.dependencies = deps;
        self.metadata.insert(coordinate.to_string(), meta);
        self
    }

    pub fn packaged(mut self, coordinate: &str, packaging: &str, deps: Vec<DependencyDecl>) -> Self {
        let mut meta = Metadata::new(packaging);
        meta.dependencies = deps;
        self.metadata.insert(coordinate.to_string(), meta);
        self
    }

    pub fn file(mut self, coordinate: &str, path: PathBuf) -> Self {
        self.files.insert(coordinate.to_string(), path);
        self
    }
}

impl MetadataSource for MemoryRepo {
    fn resolve_metadata(&self, artifact: &ArtifactDescriptor) -> Result<Option<Metadata>, BoxError> {
        let key = artifact.to_string();
        self.metadata_calls.lock().unwrap().push(key.clone());
        self.metadata
            .get(&key)
            .cloned()
            .map(Some)
            .ok_or_else(|| format!("{key} not found").into())
    }
}

impl FileResolver for MemoryRepo {
    fn resolve_file(&self, artifact: &ArtifactDescriptor, _repositories: &[String]) -> Result<PathBuf, BoxError> {
        self.file_calls.fetch_add(1, Ordering::SeqCst);
        let key = format!("{}:{}:{}", artifact.group, artifact.name, artifact.version);
        self.files
            .get(&key)
            .cloned()
            .ok_or_else(|| format!("no file for {key}").into())
    }
}

/// `group:name:version` dependency declaration.
pub fn dep(coordinate: &str) -> DependencyDecl {
    let parts: Vec<&str> = coordinate.split(':').collect();
    DependencyDecl::new(parts[0], parts[1], parts[2])
}

pub fn root(coordinate: &str) -> ArtifactDescriptor {
    ArtifactDescriptor::parse(coordinate).unwrap()
}

/// Artifact names of the graph's members, in identity order.
pub fn names(graph: &DependencyGraph) -> Vec<String> {
    graph.nodes().map(|n| n.name.clone()).collect()
}

/// Every member other than the root must be reachable from it.
pub fn assert_reachable(graph: &DependencyGraph) {
    for idx in graph.node_indices() {
        assert!(graph.trail(idx).is_ok(), "{} is unreachable", graph.node(idx));
    }
}
