//! Parsed dependency-declaration metadata of an artifact (the POM equivalent).

use serde::{Deserialize, Serialize};

use crate::artifact::{ArtifactDescriptor, Exclusion, DEFAULT_KIND, DEFAULT_SCOPE};

/// What a metadata source knows about one artifact.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default = "default_packaging")]
    pub packaging: String,
    /// Declared dependencies, in declaration order.
    #[serde(default)]
    pub dependencies: Vec<DependencyDecl>,
    /// Extra repositories this artifact's metadata asks to be searched for files.
    #[serde(default)]
    pub repositories: Vec<String>,
}

fn default_packaging() -> String {
    DEFAULT_KIND.to_string()
}

impl Metadata {
    pub fn new(packaging: impl Into<String>) -> Self {
        Self {
            packaging: packaging.into(),
            dependencies: Vec::new(),
            repositories: Vec::new(),
        }
    }

    pub fn with_dependency(mut self, dep: DependencyDecl) -> Self {
        self.dependencies.push(dep);
        self
    }
}

/// A dependency declared in an artifact's metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyDecl {
    pub group: String,
    pub name: String,
    pub version: String,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub classifier: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub exclusions: Vec<Exclusion>,
}

impl DependencyDecl {
    pub fn new(group: impl Into<String>, name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            name: name.into(),
            version: version.into(),
            kind: None,
            classifier: None,
            scope: None,
            optional: false,
            exclusions: Vec::new(),
        }
    }

    pub fn scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn classifier(mut self, classifier: impl Into<String>) -> Self {
        self.classifier = Some(classifier.into());
        self
    }

    pub fn exclude(mut self, group: impl Into<String>, name: impl Into<String>) -> Self {
        self.exclusions.push(Exclusion::new(group, name));
        self
    }

    /// Effective scope, `compile` when undeclared.
    pub fn effective_scope(&self) -> &str {
        self.scope.as_deref().unwrap_or(DEFAULT_SCOPE)
    }

    /// The descriptor used to resolve this dependency.
    pub fn to_descriptor(&self) -> ArtifactDescriptor {
        ArtifactDescriptor {
            group: self.group.clone(),
            name: self.name.clone(),
            version: self.version.clone(),
            kind: self.kind.clone().unwrap_or_else(|| DEFAULT_KIND.to_string()),
            classifier: self.classifier.clone(),
            scope: self.effective_scope().to_string(),
            optional: self.optional,
        }
    }
}
