//! Artifact identity and descriptors.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Scope assigned to dependencies that do not declare one.
pub const DEFAULT_SCOPE: &str = "compile";

/// Scope of artifacts that have no backing metadata.
pub const SYSTEM_SCOPE: &str = "system";

/// Artifact type assumed when none is declared.
pub const DEFAULT_KIND: &str = "jar";

/// Version-independent identity of a module: `group:name[:classifier]`.
///
/// Two requests for the same module at different versions share one `ArtifactId`,
/// which is what lets nearest-wins conflict resolution fold them onto one node.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ArtifactId {
    pub group: String,
    pub name: String,
    pub classifier: Option<String>,
}

impl ArtifactId {
    pub fn new(group: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            name: name.into(),
            classifier: None,
        }
    }

    pub fn with_classifier(mut self, classifier: impl Into<String>) -> Self {
        self.classifier = Some(classifier.into());
        self
    }
}

impl fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.classifier {
            Some(c) => write!(f, "{}:{}:{c}", self.group, self.name),
            None => write!(f, "{}:{}", self.group, self.name),
        }
    }
}

impl FromStr for ArtifactId {
    type Err = String;

    /// Parse `"group:name"` or `"group:name:classifier"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        if parts.iter().any(|p| p.is_empty()) {
            return Err(format!("invalid artifact id '{s}'"));
        }
        match parts.as_slice() {
            [group, name] => Ok(Self::new(*group, *name)),
            [group, name, classifier] => Ok(Self::new(*group, *name).with_classifier(*classifier)),
            _ => Err(format!(
                "invalid artifact id '{s}', expected group:name[:classifier]"
            )),
        }
    }
}

impl TryFrom<String> for ArtifactId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ArtifactId> for String {
    fn from(id: ArtifactId) -> Self {
        id.to_string()
    }
}

/// One resolvable unit: the coordinates of an artifact plus how it was requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactDescriptor {
    pub group: String,
    pub name: String,
    pub version: String,
    pub kind: String,
    pub classifier: Option<String>,
    pub scope: String,
    pub optional: bool,
}

impl ArtifactDescriptor {
    /// A compile-scoped `jar` descriptor without classifier.
    pub fn new(group: impl Into<String>, name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            name: name.into(),
            version: version.into(),
            kind: DEFAULT_KIND.to_string(),
            classifier: None,
            scope: DEFAULT_SCOPE.to_string(),
            optional: false,
        }
    }

    pub fn id(&self) -> ArtifactId {
        ArtifactId {
            group: self.group.clone(),
            name: self.name.clone(),
            classifier: self.classifier.clone(),
        }
    }

    /// System-scoped artifacts have no metadata to resolve.
    pub fn is_system(&self) -> bool {
        self.scope == SYSTEM_SCOPE
    }

    /// Parse `"group:name:version[:type[:classifier]]"`.
    pub fn parse(s: &str) -> Option<Self> {
        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() < 3 || parts.len() > 5 || parts.iter().any(|p| p.is_empty()) {
            return None;
        }
        let mut desc = Self::new(parts[0], parts[1], parts[2]);
        if let Some(kind) = parts.get(3) {
            desc.kind = kind.to_string();
        }
        desc.classifier = parts.get(4).map(|c| c.to_string());
        Some(desc)
    }
}

impl fmt::Display for ArtifactDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group, self.name, self.version)?;
        if let Some(c) = &self.classifier {
            write!(f, ":{c}")?;
        }
        Ok(())
    }
}

/// A transitive dependency to exclude, declared on one dependency edge.
///
/// `"*"` in either position matches anything.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Exclusion {
    pub group: String,
    #[serde(default = "wildcard")]
    pub name: String,
}

fn wildcard() -> String {
    "*".to_string()
}

impl Exclusion {
    pub fn new(group: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            name: name.into(),
        }
    }

    /// Whether this exclusion covers the module `group:name`.
    pub fn matches(&self, group: &str, name: &str) -> bool {
        (self.group == "*" || self.group == group) && (self.name == "*" || self.name == name)
    }
}

impl fmt::Display for Exclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group, self.name)
    }
}
