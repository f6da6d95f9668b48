use std::fmt;

/// Maven coordinates of a published package: `group:artifact:version`.
///
/// Fields are private so a coordinate cannot change once built; its
/// [`key`](Self::key) is the node identity used throughout the graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PackageCoordinate {
    group: String,
    artifact: String,
    version: String,
}

impl PackageCoordinate {
    pub fn new(
        group: impl Into<String>,
        artifact: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            artifact: artifact.into(),
            version: version.into(),
        }
    }

    /// Parse `"group:artifact:version"` into coordinates.
    ///
    /// Returns `None` unless there are exactly three non-empty parts.
    pub fn parse(s: &str) -> Option<Self> {
        let parts: Vec<&str> = s.trim().split(':').map(str::trim).collect();
        match parts.as_slice() {
            [g, a, v] if !g.is_empty() && !a.is_empty() && !v.is_empty() => {
                Some(Self::new(*g, *a, *v))
            }
            _ => None,
        }
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn artifact(&self) -> &str {
        &self.artifact
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Identity key `group:artifact:version`.
    pub fn key(&self) -> String {
        self.to_string()
    }

    /// `group:artifact` identifier (without version), as used by dependency management.
    pub fn management_key(&self) -> String {
        management_key(&self.group, &self.artifact)
    }
}

impl fmt::Display for PackageCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group, self.artifact, self.version)
    }
}

/// Build a `group:artifact` key.
pub fn management_key(group: &str, artifact: &str) -> String {
    format!("{group}:{artifact}")
}
