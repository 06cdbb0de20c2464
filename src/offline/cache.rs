//! Named asset cache over libSQL, applying the network-first strategy.

use std::path::Path;
use std::sync::Arc;

use libsql::{params, Connection, Database as LibSqlDatabase};
use tracing::{debug, info, warn};

use crate::config::CacheConfig;
use crate::error::CacheError;

/// How the asset is being requested, the analogue of a browser request's
/// navigate/resource distinction. Navigations get the offline page as a
/// last resort; other resources get a plain 503.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestMode {
    Navigate,
    Resource,
}

/// Where a fetched asset came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetSource {
    Network,
    Cache,
    OfflinePage,
    Synthetic,
}

/// An asset as returned to the caller, whatever path produced it.
#[derive(Debug, Clone)]
pub struct FetchedAsset {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
    pub source: AssetSource,
}

impl FetchedAsset {
    fn synthetic_offline_json() -> Self {
        let body = serde_json::json!({ "status": "error", "message": "Hors ligne" });
        Self {
            status: 200,
            content_type: Some("application/json".to_string()),
            body: serde_json::to_vec(&body).unwrap_or_default(),
            source: AssetSource::Synthetic,
        }
    }

    fn synthetic_unavailable() -> Self {
        Self {
            status: 503,
            content_type: Some("text/plain".to_string()),
            body: b"Ressource non disponible hors ligne".to_vec(),
            source: AssetSource::Synthetic,
        }
    }
}

/// One named cache of GET responses.
pub struct AssetCache {
    #[allow(dead_code)]
    db: Arc<LibSqlDatabase>,
    conn: Connection,
    client: reqwest::Client,
    base: String,
    config: CacheConfig,
}

impl AssetCache {
    /// Open (or create) the cache database.
    pub async fn new_local(
        path: &Path,
        base: impl Into<String>,
        config: CacheConfig,
    ) -> Result<Self, CacheError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| CacheError::Open(format!("Failed to create cache directory: {e}")))?;
        }
        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| CacheError::Open(format!("Failed to open cache database: {e}")))?;
        Self::with_db(db, base, config).await
    }

    /// In-memory cache (for tests).
    pub async fn new_memory(
        base: impl Into<String>,
        config: CacheConfig,
    ) -> Result<Self, CacheError> {
        let db = libsql::Builder::new_local(":memory:")
            .build()
            .await
            .map_err(|e| CacheError::Open(format!("Failed to create in-memory cache: {e}")))?;
        Self::with_db(db, base, config).await
    }

    async fn with_db(
        db: LibSqlDatabase,
        base: impl Into<String>,
        config: CacheConfig,
    ) -> Result<Self, CacheError> {
        let conn = db
            .connect()
            .map_err(|e| CacheError::Open(format!("Failed to create connection: {e}")))?;
        let cache = Self {
            db: Arc::new(db),
            conn,
            client: reqwest::Client::new(),
            base: base.into().trim_end_matches('/').to_string(),
            config,
        };
        cache.init_schema().await?;
        Ok(cache)
    }

    async fn init_schema(&self) -> Result<(), CacheError> {
        self.conn
            .execute(
                "CREATE TABLE IF NOT EXISTS assets (
                    cache TEXT NOT NULL,
                    url TEXT NOT NULL,
                    status INTEGER NOT NULL,
                    content_type TEXT,
                    body BLOB NOT NULL,
                    fetched_at TEXT NOT NULL,
                    PRIMARY KEY (cache, url)
                )",
                (),
            )
            .await
            .map_err(|e| CacheError::Query(format!("init_schema: {e}")))?;
        Ok(())
    }

    /// Absolute URLs pass through; paths are resolved against the app base.
    fn resolve(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else {
            format!("{}{url}", self.base)
        }
    }

    /// API requests bypass the cache entirely.
    fn is_api_request(url: &str) -> bool {
        match reqwest::Url::parse(url) {
            Ok(parsed) => parsed.path().starts_with("/api/"),
            Err(_) => url.starts_with("/api/"),
        }
    }

    /// Pre-populate the cache with the app shell and third-party assets.
    ///
    /// All-or-nothing like `cache.addAll`: the first asset that cannot be
    /// fetched and stored fails the install. Returns the number of assets
    /// stored.
    pub async fn precache(&self) -> Result<usize, CacheError> {
        let assets = self.config.static_assets.clone();
        let mut stored = 0;
        for asset in &assets {
            let url = self.resolve(asset);
            let resp = self.client.get(&url).send().await.map_err(|e| {
                CacheError::Query(format!("precache fetch {url}: {e}"))
            })?;
            let status = resp.status().as_u16();
            if status != 200 {
                return Err(CacheError::Query(format!(
                    "precache fetch {url}: HTTP {status}"
                )));
            }
            let content_type = header_content_type(&resp);
            let body = resp
                .bytes()
                .await
                .map_err(|e| CacheError::Query(format!("precache read {url}: {e}")))?;
            self.store(&url, status, content_type.as_deref(), &body).await?;
            stored += 1;
        }
        info!(count = stored, cache = %self.config.cache_name, "Static assets cached");
        Ok(stored)
    }

    /// Drop entries belonging to any other cache name.
    pub async fn activate(&self) -> Result<usize, CacheError> {
        let purged = self
            .conn
            .execute(
                "DELETE FROM assets WHERE cache != ?1",
                params![self.config.cache_name.as_str()],
            )
            .await
            .map_err(|e| CacheError::Query(format!("activate: {e}")))?;
        if purged > 0 {
            debug!(purged, "Old cache entries removed");
        }
        Ok(purged as usize)
    }

    /// Fetch a GET resource with the network-first strategy.
    pub async fn fetch(&self, url: &str, mode: RequestMode) -> Result<FetchedAsset, CacheError> {
        let url = self.resolve(url);

        // API requests always go to the network; offline yields a synthetic
        // JSON error body, never a cached response.
        if Self::is_api_request(&url) {
            return match self.client.get(&url).send().await {
                Ok(resp) => Ok(network_asset(resp).await),
                Err(e) => {
                    debug!("API request offline ({url}): {e}");
                    Ok(FetchedAsset::synthetic_offline_json())
                }
            };
        }

        match self.client.get(&url).send().await {
            Ok(resp) => {
                let asset = network_asset(resp).await;
                // Only clean 200 responses refresh the cache.
                if asset.status == 200 {
                    self.store(&url, asset.status, asset.content_type.as_deref(), &asset.body)
                        .await?;
                }
                Ok(asset)
            }
            Err(e) => {
                debug!("Network failed for {url}: {e}");
                self.fallback(&url, mode).await
            }
        }
    }

    async fn fallback(&self, url: &str, mode: RequestMode) -> Result<FetchedAsset, CacheError> {
        if let Some(mut cached) = self.lookup(url).await? {
            cached.source = AssetSource::Cache;
            return Ok(cached);
        }

        if mode == RequestMode::Navigate {
            let offline_url = self.resolve(&self.config.offline_url);
            if let Some(mut page) = self.lookup(&offline_url).await? {
                page.source = AssetSource::OfflinePage;
                return Ok(page);
            }
            warn!("Offline page missing from cache");
        }

        Ok(FetchedAsset::synthetic_unavailable())
    }

    async fn store(
        &self,
        url: &str,
        status: u16,
        content_type: Option<&str>,
        body: &[u8],
    ) -> Result<(), CacheError> {
        let now = chrono::Utc::now().to_rfc3339();
        self.conn
            .execute(
                "INSERT INTO assets (cache, url, status, content_type, body, fetched_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 ON CONFLICT (cache, url)
                 DO UPDATE SET status = ?3, content_type = ?4, body = ?5, fetched_at = ?6",
                params![
                    self.config.cache_name.as_str(),
                    url,
                    status as i64,
                    content_type,
                    body.to_vec(),
                    now
                ],
            )
            .await
            .map_err(|e| CacheError::Query(format!("store: {e}")))?;
        Ok(())
    }

    async fn lookup(&self, url: &str) -> Result<Option<FetchedAsset>, CacheError> {
        let mut rows = self
            .conn
            .query(
                "SELECT status, content_type, body FROM assets WHERE cache = ?1 AND url = ?2",
                params![self.config.cache_name.as_str(), url],
            )
            .await
            .map_err(|e| CacheError::Query(format!("lookup: {e}")))?;

        match rows.next().await {
            Ok(Some(row)) => {
                let status: i64 = row
                    .get(0)
                    .map_err(|e| CacheError::Query(format!("lookup: {e}")))?;
                let content_type: Option<String> = row.get(1).ok();
                let body: Vec<u8> = row
                    .get(2)
                    .map_err(|e| CacheError::Query(format!("lookup: {e}")))?;
                Ok(Some(FetchedAsset {
                    status: status as u16,
                    content_type,
                    body,
                    source: AssetSource::Cache,
                }))
            }
            Ok(None) => Ok(None),
            Err(e) => Err(CacheError::Query(format!("lookup: {e}"))),
        }
    }
}

fn header_content_type(resp: &reqwest::Response) -> Option<String> {
    resp.headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(String::from)
}

async fn network_asset(resp: reqwest::Response) -> FetchedAsset {
    let status = resp.status().as_u16();
    let content_type = header_content_type(&resp);
    let body = resp.bytes().await.map(|b| b.to_vec()).unwrap_or_default();
    FetchedAsset {
        status,
        content_type,
        body,
        source: AssetSource::Network,
    }
}
