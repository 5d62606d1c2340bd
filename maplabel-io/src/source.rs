//! Fetching GeoJSON sources.
//!
//! [`SourceFetcher`] abstracts where bytes come from so the viewer can be
//! driven by an in-memory fetcher in tests. [`HttpFetcher`] talks to remote
//! servers, [`FileFetcher`] reads local paths, and [`RoutingFetcher`] picks
//! between them by URL scheme.

use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{debug, warn};
use maplabel_core::FeatureCollection;
use reqwest::header::{CACHE_CONTROL, PRAGMA};
use thiserror::Error;

use crate::geojson::{parse_feature_collection, GeoJsonError};

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("request to {url} failed: {message}")]
    Http { url: String, message: String },

    #[error("failed to create HTTP client: {0}")]
    Client(String),

    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("could not read {path}: {source}")]
    Io { path: String, source: io::Error },

    #[error(transparent)]
    Parse(#[from] GeoJsonError),
}

/// Something that can return the raw bytes behind a source URL.
pub trait SourceFetcher: Send + Sync {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<Vec<u8>, SourceError>> + Send;
}

/// Fetch `url` and parse it as GeoJSON, naming the collection `name`.
pub async fn load_collection<F: SourceFetcher>(
    fetcher: &F,
    name: &str,
    url: &str,
) -> Result<FeatureCollection, SourceError> {
    let bytes = fetcher.fetch(url).await?;
    debug!("{}: fetched {} bytes from {}", name, bytes.len(), url);
    Ok(parse_feature_collection(name, &bytes)?)
}

/// `true` for `http://` and `https://` URLs.
pub fn is_remote(url: &str) -> bool {
    let lower = url.get(..8).unwrap_or(url).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

// ── HTTP ─────────────────────────────────────────────────────────────

const USER_AGENT: &str = concat!("maplabel/", env!("CARGO_PKG_VERSION"));

/// Remote sources over HTTP(S). Every request bypasses caches so a reload
/// always sees the current file.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, SourceError> {
        Self::with_timeout(30)
    }

    pub fn with_timeout(timeout_secs: u64) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| SourceError::Client(e.to_string()))?;
        Ok(Self { client })
    }
}

impl SourceFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, SourceError> {
        let response = self
            .client
            .get(url)
            .header(CACHE_CONTROL, "no-cache")
            .header(PRAGMA, "no-cache")
            .send()
            .await
            .map_err(|e| {
                warn!("GET {} failed: {}", url, e);
                SourceError::Http {
                    url: url.to_string(),
                    message: e.to_string(),
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!("GET {} returned {}", url, status);
            return Err(SourceError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response
            .bytes()
            .await
            .map(|b| b.to_vec())
            .map_err(|e| SourceError::Http {
                url: url.to_string(),
                message: format!("failed to read response: {}", e),
            })
    }
}

// ── Local files ──────────────────────────────────────────────────────

/// Local sources. Relative paths resolve against `root`.
#[derive(Debug, Clone, Default)]
pub struct FileFetcher {
    root: PathBuf,
}

impl FileFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn resolve(&self, url: &str) -> PathBuf {
        let path = Path::new(url.strip_prefix("file://").unwrap_or(url));
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

impl SourceFetcher for FileFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, SourceError> {
        let path = self.resolve(url);
        tokio::fs::read(&path).await.map_err(|source| SourceError::Io {
            path: path.display().to_string(),
            source,
        })
    }
}

/// HTTP(S) URLs go to [`HttpFetcher`], everything else to [`FileFetcher`].
#[derive(Debug, Clone)]
pub struct RoutingFetcher {
    http: HttpFetcher,
    files: FileFetcher,
}

impl RoutingFetcher {
    pub fn new(http: HttpFetcher, files: FileFetcher) -> Self {
        Self { http, files }
    }
}

impl SourceFetcher for RoutingFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, SourceError> {
        if is_remote(url) {
            self.http.fetch(url).await
        } else {
            self.files.fetch(url).await
        }
    }
}
