//! Capabilities the host environment supplies to the graph engine.

use std::path::PathBuf;

use depgraph_util::errors::BoxError;

use crate::artifact::ArtifactDescriptor;
use crate::metadata::Metadata;

/// Resolves the dependency-declaration metadata of an artifact.
pub trait MetadataSource {
    /// `Ok(None)` means the artifact legitimately has no metadata; it then has
    /// no dependencies.
    fn resolve_metadata(&self, artifact: &ArtifactDescriptor) -> Result<Option<Metadata>, BoxError>;
}

/// Locates or materializes the backing file of an artifact.
///
/// Implementations may be called from several threads at once, but never twice
/// concurrently for the same graph node.
pub trait FileResolver: Send + Sync {
    fn resolve_file(
        &self,
        artifact: &ArtifactDescriptor,
        repositories: &[String],
    ) -> Result<PathBuf, BoxError>;
}
