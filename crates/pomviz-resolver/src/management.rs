//! Managed dependency versions keyed by `group:artifact`.

use std::collections::BTreeMap;

use pomviz_core::coordinate::management_key;

/// Versions pinned by `<dependencyManagement>` sections, used when a
/// dependency declaration omits its version.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyManagementTable {
    versions: BTreeMap<String, String>,
}

impl DependencyManagementTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin `group:artifact` to `version`, replacing any earlier entry.
    pub fn insert(&mut self, group: &str, artifact: &str, version: impl Into<String>) {
        self.versions
            .insert(management_key(group, artifact), version.into());
    }

    /// Pin `group:artifact` only if nothing manages it yet. Returns whether it was added.
    pub fn insert_if_absent(&mut self, group: &str, artifact: &str, version: &str) -> bool {
        let key = management_key(group, artifact);
        if self.versions.contains_key(&key) {
            return false;
        }
        self.versions.insert(key, version.to_string());
        true
    }

    /// Managed version for `group:artifact`.
    pub fn get(&self, group: &str, artifact: &str) -> Option<&str> {
        self.versions
            .get(&management_key(group, artifact))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    /// `(group:artifact, version)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.versions.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
