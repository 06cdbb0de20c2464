//! Configuration types.

use std::time::Duration;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the GEDEON API (empty means same-origin in the web app;
    /// here it must be a full `http(s)://` origin).
    pub api_base: String,
    /// Path of the local durable store database.
    pub db_path: String,
    /// Cosmetic screen-transition delay. Not a correctness mechanism.
    pub transition_delay: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base: "http://localhost:5000".to_string(),
            db_path: "./data/gedeon.db".to_string(),
            transition_delay: Duration::from_millis(250),
        }
    }
}

/// Offline asset cache configuration.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Named cache version. Entries under any other name are purged on
    /// activation.
    pub cache_name: String,
    /// Path of the dedicated offline fallback page, served to navigations
    /// when both network and cache miss.
    pub offline_url: String,
    /// App shell and third-party assets to pre-populate on install.
    pub static_assets: Vec<String>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            cache_name: "gedeon-cache-v1.1".to_string(),
            offline_url: "/offline.html".to_string(),
            static_assets: vec![
                "/".to_string(),
                "/index.html".to_string(),
                "/scanner.html".to_string(),
                "/offline.html".to_string(),
                "/manifest.json".to_string(),
                "/icons/icon-192x192.png".to_string(),
                "/icons/icon-512x512.png".to_string(),
                "https://cdn.tailwindcss.com".to_string(),
                "https://unpkg.com/leaflet@1.9.4/dist/leaflet.css".to_string(),
                "https://unpkg.com/leaflet@1.9.4/dist/leaflet.js".to_string(),
                "https://unpkg.com/leaflet.markercluster@1.5.3/dist/MarkerCluster.css".to_string(),
                "https://unpkg.com/leaflet.markercluster@1.5.3/dist/MarkerCluster.Default.css"
                    .to_string(),
                "https://unpkg.com/leaflet.markercluster@1.5.3/dist/leaflet.markercluster.js"
                    .to_string(),
            ],
        }
    }
}
