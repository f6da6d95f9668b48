//! Manifest transport: fetch raw POM bytes for a coordinate, or report that
//! the repository does not have it.

use std::collections::HashMap;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use pomviz_core::coordinate::PackageCoordinate;
use pomviz_util::errors::PomvizError;
use reqwest::Client;

use crate::repository::RepositoryLocation;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Source of raw manifest bytes.
///
/// `Ok(None)` means the manifest does not exist at its expected location.
/// `Err` is reserved for transport failures.
pub trait ManifestFetcher: Sync {
    fn fetch(
        &self,
        coord: &PackageCoordinate,
    ) -> impl Future<Output = miette::Result<Option<Vec<u8>>>> + Send;
}

/// Build a shared reqwest client for manifest downloads.
pub fn build_client() -> miette::Result<Client> {
    Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .user_agent(concat!("pomviz/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| {
            PomvizError::Network {
                message: format!("Failed to create HTTP client: {e}"),
            }
            .into()
        })
}

/// Fetches POMs from a remote repository over HTTP(S).
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    location: RepositoryLocation,
}

impl HttpFetcher {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            location: RepositoryLocation::Http(base_url.trim_end_matches('/').to_string()),
        }
    }
}

impl ManifestFetcher for HttpFetcher {
    async fn fetch(&self, coord: &PackageCoordinate) -> miette::Result<Option<Vec<u8>>> {
        let url = self.location.pom_location(coord);
        tracing::debug!("GET {url}");
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| PomvizError::Network {
                message: format!("Request to {url} failed: {e}"),
            })?;

        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(PomvizError::Network {
                message: format!("HTTP {status} fetching {url}"),
            }
            .into());
        }

        let bytes = resp.bytes().await.map_err(|e| PomvizError::Network {
            message: format!("Failed to read response from {url}: {e}"),
        })?;
        Ok(Some(bytes.to_vec()))
    }
}

/// Reads POMs from a repository laid out on the local filesystem.
#[derive(Debug, Clone)]
pub struct FileFetcher {
    root: PathBuf,
}

impl FileFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ManifestFetcher for FileFetcher {
    async fn fetch(&self, coord: &PackageCoordinate) -> miette::Result<Option<Vec<u8>>> {
        let path = self.root.join(RepositoryLocation::pom_path(coord));
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(PomvizError::Network {
                message: format!("Failed to read {}: {e}", path.display()),
            }
            .into()),
        }
    }
}

/// Fetcher chosen from a configured repository location.
#[derive(Debug, Clone)]
pub enum RepositoryFetcher {
    Http(HttpFetcher),
    File(FileFetcher),
}

impl RepositoryFetcher {
    /// Pick HTTP or filesystem transport from the location's scheme.
    pub fn for_location(location: &str) -> miette::Result<Self> {
        match RepositoryLocation::parse(location) {
            RepositoryLocation::Http(url) => Ok(Self::Http(HttpFetcher::new(build_client()?, &url))),
            RepositoryLocation::File(root) => {
                if !root.is_dir() {
                    return Err(PomvizError::Config {
                        message: format!("Repository directory {} does not exist", root.display()),
                    }
                    .into());
                }
                Ok(Self::File(FileFetcher::new(root)))
            }
        }
    }
}

impl ManifestFetcher for RepositoryFetcher {
    async fn fetch(&self, coord: &PackageCoordinate) -> miette::Result<Option<Vec<u8>>> {
        match self {
            Self::Http(f) => f.fetch(coord).await,
            Self::File(f) => f.fetch(coord).await,
        }
    }
}

/// Memoizes another fetcher for the duration of one run.
///
/// Parent POMs and BOMs are shared by many packages; both hits and misses are
/// remembered, transport errors are not.
#[derive(Debug)]
pub struct CachingFetcher<F> {
    inner: F,
    cache: Mutex<HashMap<PackageCoordinate, Option<Vec<u8>>>>,
}

impl<F: ManifestFetcher> CachingFetcher<F> {
    pub fn new(inner: F) -> Self {
        Self {
            inner,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Number of distinct coordinates remembered so far.
    pub fn cached_len(&self) -> usize {
        self.cache.lock().map(|c| c.len()).unwrap_or_default()
    }

    fn lookup(&self, coord: &PackageCoordinate) -> Option<Option<Vec<u8>>> {
        self.cache.lock().ok()?.get(coord).cloned()
    }

    fn remember(&self, coord: &PackageCoordinate, value: Option<Vec<u8>>) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(coord.clone(), value);
        }
    }
}

impl<F: ManifestFetcher> ManifestFetcher for CachingFetcher<F> {
    async fn fetch(&self, coord: &PackageCoordinate) -> miette::Result<Option<Vec<u8>>> {
        if let Some(hit) = self.lookup(coord) {
            tracing::debug!("manifest cache hit for {coord}");
            return Ok(hit);
        }
        let fetched = self.inner.fetch(coord).await?;
        self.remember(coord, fetched.clone());
        Ok(fetched)
    }
}

/// In-memory repository keyed by coordinate, for tests.
///
/// Records how often each coordinate was requested.
#[cfg(any(test, feature = "testing"))]
#[derive(Debug, Default)]
pub struct MemoryFetcher {
    manifests: HashMap<PackageCoordinate, Vec<u8>>,
    requests: Mutex<HashMap<PackageCoordinate, usize>>,
}

#[cfg(any(test, feature = "testing"))]
impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the POM for `coord` (a `group:artifact:version` string).
    ///
    /// Panics on a malformed coordinate string.
    pub fn with(mut self, coord: &str, pom_xml: &str) -> Self {
        self.insert(coord, pom_xml);
        self
    }

    /// Register the POM for `coord` (a `group:artifact:version` string).
    ///
    /// Panics on a malformed coordinate string.
    pub fn insert(&mut self, coord: &str, pom_xml: &str) {
        let coord = PackageCoordinate::parse(coord)
            .unwrap_or_else(|| panic!("invalid coordinate '{coord}'"));
        self.manifests.insert(coord, pom_xml.as_bytes().to_vec());
    }

    /// How many times `coord` has been fetched.
    pub fn request_count(&self, coord: &str) -> usize {
        let Some(coord) = PackageCoordinate::parse(coord) else {
            return 0;
        };
        self.requests
            .lock()
            .map(|r| r.get(&coord).copied().unwrap_or_default())
            .unwrap_or_default()
    }
}

#[cfg(any(test, feature = "testing"))]
impl ManifestFetcher for MemoryFetcher {
    async fn fetch(&self, coord: &PackageCoordinate) -> miette::Result<Option<Vec<u8>>> {
        if let Ok(mut requests) = self.requests.lock() {
            *requests.entry(coord.clone()).or_default() += 1;
        }
        Ok(self.manifests.get(coord).cloned())
    }
}
