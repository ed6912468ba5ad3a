use miette::Diagnostic;
use thiserror::Error;

/// Error reported by a host capability (metadata source or file resolver).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Unified error type for all depgraph operations.
#[derive(Debug, Error, Diagnostic)]
pub enum DepgraphError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or malformed `depgraph.toml` or repository file.
    #[error("Manifest error: {message}")]
    #[diagnostic(help("Check depgraph.toml and the repository file for syntax errors"))]
    Manifest { message: String },

    /// Metadata of an artifact could not be loaded while building the graph.
    #[error("Failed to resolve metadata of {artifact} (trail: {trail})")]
    #[diagnostic(help(
        "Fix the dependency declaration along the trail, or pass --tolerate-broken-metadata"
    ))]
    MetadataResolution {
        artifact: String,
        trail: String,
        #[source]
        source: BoxError,
    },

    /// The backing file of an artifact could not be obtained.
    #[error("Failed to resolve file of {artifact} (trail: {trail})")]
    FileResolution {
        artifact: String,
        trail: String,
        #[source]
        source: BoxError,
    },

    /// A graph was constructed or traversed in a state that should be impossible.
    #[error("Graph invariant violated: {message}")]
    InvariantViolation { message: String },

    /// A filter was configured incorrectly (wrong number of children, unknown artifact, ...).
    #[error("Filter configuration error: {message}")]
    Configuration { message: String },

    /// An external process (e.g. GraphViz `dot`) failed.
    #[error("Process error: {message}")]
    Process { message: String },

    /// Catch-all for miscellaneous errors.
    #[error("{message}")]
    Generic { message: String },
}

impl DepgraphError {
    pub fn invariant(message: impl Into<String>) -> Self {
        Self::InvariantViolation {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}
