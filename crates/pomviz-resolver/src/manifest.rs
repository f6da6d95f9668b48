//! Resolve one POM against its parent lineage: merged properties, merged
//! dependency management (including BOM imports), and the concrete direct
//! dependency list.

use std::collections::HashSet;

use pomviz_core::coordinate::PackageCoordinate;
use pomviz_maven::fetch::ManifestFetcher;
use pomviz_maven::pom::{self, ParentRef, Pom};
use pomviz_util::errors::PomvizError;

use crate::management::DependencyManagementTable;
use crate::properties::PropertyTable;

/// A direct dependency with its group, artifact and version resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDependency {
    pub coordinate: PackageCoordinate,
    pub scope: Option<String>,
}

/// Output of resolving one manifest.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution {
    pub properties: PropertyTable,
    pub management: DependencyManagementTable,
    pub dependencies: Vec<ResolvedDependency>,
}

/// Cycle guard for one resolution.
///
/// `walked` holds the `group:artifact:version` keys of the manifest and the
/// parents already fetched for it, and stops cyclic lineages. `importing`
/// holds the manifests whose resolution is in progress further up the BOM
/// import stack, and stops cyclic imports. Each imported BOM walks its own
/// lineage from scratch, so a parent shared with the importer or with a
/// sibling BOM is still inherited.
#[derive(Debug, Clone, Default)]
pub struct ParentChain {
    walked: HashSet<String>,
    importing: HashSet<String>,
}

impl ParentChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `coord` as walked. Returns `false` if it already was.
    pub fn insert(&mut self, coord: &PackageCoordinate) -> bool {
        self.walked.insert(coord.key())
    }

    pub fn contains(&self, coord: &PackageCoordinate) -> bool {
        self.walked.contains(&coord.key())
    }

    /// Whether `coord` is being resolved somewhere up the import stack.
    pub fn is_importing(&self, coord: &PackageCoordinate) -> bool {
        self.importing.contains(&coord.key())
    }

    fn enter(&mut self, coord: &PackageCoordinate) {
        self.walked.insert(coord.key());
        self.importing.insert(coord.key());
    }

    /// Guard for resolving the BOM `bom`: no walked parents, only the
    /// import stack. `None` when `bom` is already on that stack.
    fn for_import(&self, bom: &PackageCoordinate) -> Option<ParentChain> {
        if self.is_importing(bom) {
            return None;
        }
        let mut importing = self.importing.clone();
        importing.insert(bom.key());
        Some(ParentChain {
            walked: HashSet::new(),
            importing,
        })
    }
}

/// Resolves manifests, fetching parents and BOMs through `F`.
pub struct ManifestResolver<'f, F> {
    fetcher: &'f F,
}

impl<'f, F: ManifestFetcher> ManifestResolver<'f, F> {
    pub fn new(fetcher: &'f F) -> Self {
        Self { fetcher }
    }

    /// Parse `bytes` and resolve it.
    ///
    /// Inherited tables form the lowest layer; the merge order is
    /// inherited < eldest ancestor < ... < parent < this manifest. Parents that
    /// cannot be fetched or parsed simply contribute nothing. Only a malformed
    /// `bytes` document is an error.
    pub async fn resolve(
        &self,
        bytes: &[u8],
        inherited_properties: &PropertyTable,
        chain: &mut ParentChain,
        inherited_management: &DependencyManagementTable,
    ) -> Result<Resolution, PomvizError> {
        let pom = pom::parse_pom(bytes)?;
        Ok(self
            .resolve_pom(&pom, inherited_properties, chain, inherited_management)
            .await)
    }

    async fn resolve_pom(
        &self,
        pom: &Pom,
        inherited_properties: &PropertyTable,
        chain: &mut ParentChain,
        inherited_management: &DependencyManagementTable,
    ) -> Resolution {
        if let Some(own) = own_coordinate(pom) {
            chain.enter(&own);
        }
        let ancestors = self.lineage(pom, chain).await;

        let mut properties = inherited_properties.clone();
        for ancestor in ancestors.iter().rev() {
            properties.overlay(ancestor.own_properties());
        }
        properties.overlay(pom.own_properties());
        properties.overlay(pom.builtin_properties());

        let mut management = inherited_management.clone();
        let mut imports = Vec::new();
        for declaring in ancestors.iter().rev().chain(std::iter::once(pom)) {
            for managed in declaring.managed_dependencies() {
                let Some((group, artifact)) = group_and_artifact(managed, &properties) else {
                    continue;
                };
                let version = resolved(managed.version.as_deref(), &properties);
                if managed.is_bom_import() {
                    if let Some(version) = version {
                        imports.push(PackageCoordinate::new(group, artifact, version));
                    }
                    continue;
                }
                match version {
                    Some(version) => management.insert(&group, &artifact, version),
                    None => tracing::debug!("managed {group}:{artifact} declares no version"),
                }
            }
        }

        let mut imported = HashSet::new();
        for bom in imports {
            if imported.insert(bom.key()) {
                self.import_bom(&bom, chain, &mut management).await;
            }
        }

        let dependencies = pom
            .direct_dependencies()
            .iter()
            .filter_map(|dep| resolve_dependency(dep, &properties, &management))
            .collect();

        Resolution {
            properties,
            management,
            dependencies,
        }
    }

    /// Fetch the parent chain of `pom`, nearest parent first.
    ///
    /// Stops at the first parent that is already in `chain`, missing, or
    /// unparseable.
    async fn lineage(&self, pom: &Pom, chain: &mut ParentChain) -> Vec<Pom> {
        let mut ancestors = Vec::new();
        let mut next = pom.parent.as_ref().and_then(ParentRef::coordinate);

        while let Some(parent) = next.take() {
            if !chain.insert(&parent) {
                tracing::debug!("parent cycle at {parent}, stopping inheritance walk");
                break;
            }
            let Some(parent_pom) = self.fetch_pom(&parent, "parent").await else {
                break;
            };
            next = parent_pom.parent.as_ref().and_then(ParentRef::coordinate);
            ancestors.push(parent_pom);
        }
        ancestors
    }

    /// Merge the managed versions of an imported BOM under the existing entries.
    async fn import_bom(
        &self,
        bom: &PackageCoordinate,
        chain: &ParentChain,
        management: &mut DependencyManagementTable,
    ) {
        let Some(mut bom_chain) = chain.for_import(bom) else {
            tracing::debug!("BOM import cycle at {bom}, skipping");
            return;
        };
        let Some(bom_pom) = self.fetch_pom(bom, "BOM").await else {
            return;
        };
        let imported = Box::pin(self.resolve_pom(
            &bom_pom,
            &PropertyTable::new(),
            &mut bom_chain,
            &DependencyManagementTable::new(),
        ))
        .await;
        for (key, version) in imported.management.iter() {
            if let Some((group, artifact)) = key.split_once(':') {
                management.insert_if_absent(group, artifact, version);
            }
        }
    }

    async fn fetch_pom(&self, coord: &PackageCoordinate, role: &str) -> Option<Pom> {
        match self.fetcher.fetch(coord).await {
            Ok(Some(bytes)) => match pom::parse_pom(&bytes) {
                Ok(pom) => Some(pom),
                Err(e) => {
                    tracing::warn!("ignoring unparseable {role} POM {coord}: {e}");
                    None
                }
            },
            Ok(None) => {
                tracing::debug!("{role} POM {coord} not found");
                None
            }
            Err(e) => {
                tracing::warn!("failed to fetch {role} POM {coord}: {e}");
                None
            }
        }
    }
}

/// Turn a declared dependency into a concrete one, or `None` if it is filtered
/// out (test scope, optional) or cannot be resolved (no group, artifact, or
/// version).
fn resolve_dependency(
    dep: &pom::PomDependency,
    properties: &PropertyTable,
    management: &DependencyManagementTable,
) -> Option<ResolvedDependency> {
    let Some((group, artifact)) = group_and_artifact(dep, properties) else {
        tracing::debug!("skipping dependency without groupId/artifactId");
        return None;
    };

    let scope = resolved(dep.scope.as_deref(), properties);
    if scope.as_deref() == Some("test") {
        tracing::debug!("skipping test dependency {group}:{artifact}");
        return None;
    }
    if resolved(dep.optional.as_deref(), properties).as_deref() == Some("true") {
        tracing::debug!("skipping optional dependency {group}:{artifact}");
        return None;
    }

    let version = resolved(dep.version.as_deref(), properties)
        .or_else(|| management.get(&group, &artifact).map(str::to_string));
    let Some(version) = version else {
        tracing::debug!("skipping {group}:{artifact}: no version declared or managed");
        return None;
    };

    Some(ResolvedDependency {
        coordinate: PackageCoordinate::new(group, artifact, version),
        scope,
    })
}

fn group_and_artifact(
    dep: &pom::PomDependency,
    properties: &PropertyTable,
) -> Option<(String, String)> {
    let group = resolved(dep.group_id.as_deref(), properties)?;
    let artifact = resolved(dep.artifact_id.as_deref(), properties)?;
    Some((group, artifact))
}

/// Substitute a raw field; a value that resolves to nothing counts as absent.
fn resolved(raw: Option<&str>, properties: &PropertyTable) -> Option<String> {
    let value = properties.resolve(raw?);
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// The manifest's own coordinates, when it names them literally.
fn own_coordinate(pom: &Pom) -> Option<PackageCoordinate> {
    let artifact = pom.artifact_id.as_deref()?;
    let group = pom.effective_group_id()?;
    let version = pom.effective_version()?;
    if [group, artifact, version].iter().any(|s| s.contains("${")) {
        return None;
    }
    Some(PackageCoordinate::new(group, artifact, version))
}
