use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use depgraph_util::errors::DepgraphError;

use crate::artifact::ArtifactDescriptor;
use crate::filter_spec::FilterSpec;

/// File name of the project configuration.
pub const CONFIG_FILE: &str = "depgraph.toml";

/// Project configuration loaded from `depgraph.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Root artifact, `group:name:version[:type[:classifier]]`.
    #[serde(default)]
    pub root: Option<String>,

    /// Repository file, relative to the configuration file.
    #[serde(default)]
    pub repository: Option<PathBuf>,

    #[serde(default, rename = "tolerate-broken-metadata")]
    pub tolerate_broken_metadata: bool,

    /// Named filter trees selectable with `--filter`.
    #[serde(default)]
    pub filters: BTreeMap<String, FilterSpec>,
}

impl ProjectConfig {
    /// Load `depgraph.toml` from `path`.
    pub fn from_path(path: &Path) -> miette::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| DepgraphError::Manifest {
            message: format!("Failed to read {}: {e}", path.display()),
        })?;
        Self::from_str(&content)
    }

    /// Parse configuration from a string.
    pub fn from_str(content: &str) -> miette::Result<Self> {
        toml::from_str(content).map_err(|e| {
            DepgraphError::Manifest {
                message: format!("Failed to parse {CONFIG_FILE}: {e}"),
            }
            .into()
        })
    }

    /// The configured root artifact, parsed.
    pub fn root_artifact(&self) -> miette::Result<ArtifactDescriptor> {
        let raw = self.root.as_deref().ok_or_else(|| DepgraphError::Manifest {
            message: "no root artifact configured; set `root` or pass --root".to_string(),
        })?;
        ArtifactDescriptor::parse(raw).ok_or_else(|| {
            DepgraphError::Manifest {
                message: format!(
                    "invalid root artifact '{raw}', expected group:name:version[:type[:classifier]]"
                ),
            }
            .into()
        })
    }

    /// Look up a named filter.
    pub fn filter(&self, name: &str) -> miette::Result<&FilterSpec> {
        self.filters.get(name).ok_or_else(|| {
            let known: Vec<&str> = self.filters.keys().map(String::as_str).collect();
            DepgraphError::Manifest {
                message: format!(
                    "no filter named '{name}' (defined: {})",
                    if known.is_empty() {
                        "none".to_string()
                    } else {
                        known.join(", ")
                    }
                ),
            }
            .into()
        })
    }
}
