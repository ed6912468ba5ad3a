//! A repository described by a TOML file: artifact metadata inline, backing files
//! on disk in Maven repository layout (or at explicitly configured paths).

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use depgraph_util::errors::{BoxError, DepgraphError};
use serde::{Deserialize, Serialize};

use crate::artifact::ArtifactDescriptor;
use crate::metadata::Metadata;
use crate::source::{FileResolver, MetadataSource};

/// On-disk format of a repository file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RepositoryFile {
    /// Directory holding backing files, relative to the repository file.
    #[serde(default)]
    pub root: Option<String>,

    #[serde(default, rename = "artifact")]
    pub artifacts: Vec<ArtifactEntry>,
}

/// One `[[artifact]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactEntry {
    pub group: String,
    pub name: String,
    pub version: String,
    /// Explicit backing file, relative to the repository root.
    #[serde(default)]
    pub file: Option<String>,
    #[serde(flatten)]
    pub metadata: Metadata,
}

/// In-memory repository answering metadata and file lookups.
#[derive(Debug, Clone)]
pub struct StaticRepository {
    root: PathBuf,
    entries: HashMap<String, ArtifactEntry>,
}

impl StaticRepository {
    /// Load a repository file. Relative paths inside it resolve against its directory.
    pub fn from_path(path: &Path) -> miette::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| DepgraphError::Manifest {
            message: format!("Failed to read {}: {e}", path.display()),
        })?;
        let dir = path.parent().unwrap_or(Path::new("."));
        Self::from_str(&content, dir)
    }

    /// Parse repository TOML, resolving relative paths against `base_dir`.
    pub fn from_str(content: &str, base_dir: &Path) -> miette::Result<Self> {
        let file: RepositoryFile = toml::from_str(content).map_err(|e| DepgraphError::Manifest {
            message: format!("Failed to parse repository: {e}"),
        })?;
        Ok(Self::from_file(file, base_dir))
    }

    pub fn from_file(file: RepositoryFile, base_dir: &Path) -> Self {
        let root = match &file.root {
            Some(r) => base_dir.join(r),
            None => base_dir.to_path_buf(),
        };
        let entries = file
            .artifacts
            .into_iter()
            .map(|e| (coordinate_key(&e.group, &e.name, &e.version), e))
            .collect();
        Self { root, entries }
    }

    /// Directory backing files are looked up in.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn entry(&self, artifact: &ArtifactDescriptor) -> Option<&ArtifactEntry> {
        self.entries
            .get(&coordinate_key(&artifact.group, &artifact.name, &artifact.version))
    }

    /// Path of an artifact in Maven layout under `base`.
    pub fn layout_path(base: &Path, artifact: &ArtifactDescriptor) -> PathBuf {
        let filename = match &artifact.classifier {
            Some(c) => format!(
                "{}-{}-{c}.{}",
                artifact.name,
                artifact.version,
                extension(&artifact.kind)
            ),
            None => format!(
                "{}-{}.{}",
                artifact.name,
                artifact.version,
                extension(&artifact.kind)
            ),
        };
        base.join(artifact.group.replace('.', "/"))
            .join(&artifact.name)
            .join(&artifact.version)
            .join(filename)
    }
}

impl MetadataSource for StaticRepository {
    fn resolve_metadata(&self, artifact: &ArtifactDescriptor) -> Result<Option<Metadata>, BoxError> {
        match self.entry(artifact) {
            Some(entry) => Ok(Some(entry.metadata.clone())),
            None => Err(format!("{artifact} is not present in the repository").into()),
        }
    }
}

impl FileResolver for StaticRepository {
    fn resolve_file(
        &self,
        artifact: &ArtifactDescriptor,
        repositories: &[String],
    ) -> Result<PathBuf, BoxError> {
        if artifact.classifier.is_none() {
            if let Some(file) = self.entry(artifact).and_then(|e| e.file.as_ref()) {
                let path = self.root.join(file);
                return if path.is_file() {
                    Ok(path)
                } else {
                    Err(format!("{} does not exist", path.display()).into())
                };
            }
        }

        let mut searched = Vec::new();
        let bases = std::iter::once(self.root.clone())
            .chain(repositories.iter().map(|r| self.root.join(r)));
        for base in bases {
            let candidate = Self::layout_path(&base, artifact);
            if candidate.is_file() {
                return Ok(candidate);
            }
            searched.push(candidate.display().to_string());
        }
        Err(format!("no file for {artifact}; searched {}", searched.join(", ")).into())
    }
}

fn coordinate_key(group: &str, name: &str, version: &str) -> String {
    format!("{group}:{name}:{version}")
}

fn extension(kind: &str) -> &str {
    match kind {
        "bundle" | "maven-plugin" | "ejb" | "test-jar" => "jar",
        other => other,
    }
}
