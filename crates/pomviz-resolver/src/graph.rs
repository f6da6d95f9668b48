//! Depth-bounded, cycle-safe traversal from a root coordinate, producing a
//! deduplicated edge set.

use std::collections::{BTreeSet, HashSet};
use std::fmt;

use futures_util::stream::{self, StreamExt};
use pomviz_core::config::DEFAULT_JOBS;
use pomviz_core::coordinate::PackageCoordinate;
use pomviz_maven::fetch::ManifestFetcher;

use crate::management::DependencyManagementTable;
use crate::manifest::{ManifestResolver, ParentChain};
use crate::properties::PropertyTable;

/// A directed dependency edge between two `group:artifact:version` keys.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Edge {
    pub from: String,
    pub to: String,
}

impl Edge {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}

/// Ordered, deduplicated set of edges.
pub type EdgeSet = BTreeSet<Edge>;

/// Outcome counts for one traversal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildStats {
    /// Coordinates whose manifest was fetched and resolved.
    pub expanded: usize,
    /// Coordinates the repository does not have.
    pub missing: usize,
    /// Coordinates whose fetch or parse failed.
    pub failed: usize,
}

/// The result of a traversal.
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    root: PackageCoordinate,
    edges: EdgeSet,
    stats: BuildStats,
}

impl DependencyGraph {
    pub fn root(&self) -> &PackageCoordinate {
        &self.root
    }

    pub fn edges(&self) -> &EdgeSet {
        &self.edges
    }

    pub fn stats(&self) -> BuildStats {
        self.stats
    }

    pub fn into_edges(self) -> EdgeSet {
        self.edges
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Number of distinct coordinates appearing in the edge set.
    pub fn node_count(&self) -> usize {
        self.edges
            .iter()
            .flat_map(|e| [e.from.as_str(), e.to.as_str()])
            .collect::<HashSet<_>>()
            .len()
    }
}

enum Expansion {
    Resolved(Vec<PackageCoordinate>),
    Missing,
    Failed,
}

/// Builds the transitive dependency graph of a root coordinate.
pub struct GraphBuilder<'f, F> {
    fetcher: &'f F,
    max_depth: usize,
    jobs: usize,
}

impl<'f, F: ManifestFetcher> GraphBuilder<'f, F> {
    /// The root is at depth 0; coordinates deeper than `max_depth` are not
    /// expanded, so `max_depth = 0` still yields the root's direct edges.
    pub fn new(fetcher: &'f F, max_depth: usize) -> Self {
        Self {
            fetcher,
            max_depth,
            jobs: DEFAULT_JOBS,
        }
    }

    /// Bound on concurrent expansions within one level (at least 1).
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs.max(1);
        self
    }

    /// Traverse breadth first from `root`.
    ///
    /// Levels are processed in order and every coordinate is expanded at
    /// most once, at its minimal depth, so the edge set does not depend on
    /// the order in which fetches complete. Missing or broken manifests only
    /// lose their outgoing edges.
    pub async fn build(&self, root: &PackageCoordinate) -> DependencyGraph {
        let mut edges = EdgeSet::new();
        let mut stats = BuildStats::default();
        let mut visited: HashSet<PackageCoordinate> = HashSet::new();
        let mut level = vec![root.clone()];
        let mut depth = 0usize;

        while !level.is_empty() && depth <= self.max_depth {
            let batch: Vec<PackageCoordinate> = level
                .into_iter()
                .filter(|coord| visited.insert(coord.clone()))
                .collect();
            tracing::info!("depth {depth}: expanding {} package(s)", batch.len());

            let expansions: Vec<(PackageCoordinate, Expansion)> = stream::iter(batch)
                .map(|coord| async move {
                    let expansion = self.expand(&coord).await;
                    (coord, expansion)
                })
                .buffered(self.jobs)
                .collect()
                .await;

            let mut next = Vec::new();
            for (coord, expansion) in expansions {
                match expansion {
                    Expansion::Resolved(children) => {
                        stats.expanded += 1;
                        let from = coord.key();
                        for child in children {
                            edges.insert(Edge::new(from.clone(), child.key()));
                            next.push(child);
                        }
                    }
                    Expansion::Missing => stats.missing += 1,
                    Expansion::Failed => stats.failed += 1,
                }
            }

            level = next;
            depth += 1;
        }

        tracing::info!(
            "graph for {root}: {} edge(s), {} expanded, {} missing, {} failed",
            edges.len(),
            stats.expanded,
            stats.missing,
            stats.failed
        );
        DependencyGraph {
            root: root.clone(),
            edges,
            stats,
        }
    }

    async fn expand(&self, coord: &PackageCoordinate) -> Expansion {
        let bytes = match self.fetcher.fetch(coord).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                tracing::debug!("{coord} not found in repository");
                return Expansion::Missing;
            }
            Err(e) => {
                tracing::warn!("failed to fetch {coord}: {e}");
                return Expansion::Failed;
            }
        };

        let resolution = ManifestResolver::new(self.fetcher)
            .resolve(
                &bytes,
                &PropertyTable::new(),
                &mut ParentChain::new(),
                &DependencyManagementTable::new(),
            )
            .await;
        match resolution {
            Ok(resolution) => Expansion::Resolved(
                resolution
                    .dependencies
                    .into_iter()
                    .map(|dep| dep.coordinate)
                    .collect(),
            ),
            Err(e) => {
                tracing::warn!("skipping {coord}: {e}");
                Expansion::Failed
            }
        }
    }
}
