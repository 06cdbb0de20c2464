use std::sync::Arc;
use std::time::Duration;

use gedeon_onboarding::api::{ApiClient, AuthApi, HttpAuthGateway};
use gedeon_onboarding::cli::Wizard;
use gedeon_onboarding::config::{AppConfig, CacheConfig};
use gedeon_onboarding::offline::AssetCache;
use gedeon_onboarding::onboarding::OnboardingFlow;
use gedeon_onboarding::store::{LibSqlStore, LocalStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let defaults = AppConfig::default();
    let api_base = std::env::var("GEDEON_API_BASE").unwrap_or(defaults.api_base);
    let db_path = std::env::var("GEDEON_DB_PATH").unwrap_or(defaults.db_path);
    let transition_delay = std::env::var("GEDEON_TRANSITION_MS")
        .ok()
        .and_then(|v| v.parse().ok())
        .map(Duration::from_millis)
        .unwrap_or(defaults.transition_delay);

    eprintln!("GEDEON onboarding v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   API: {api_base}");
    eprintln!("   Store: {db_path}");
    eprintln!("   Type `quit` to exit.\n");

    let store: Arc<dyn LocalStore> = Arc::new(
        LibSqlStore::new_local(std::path::Path::new(&db_path))
            .await
            .map_err(|e| anyhow::anyhow!("Failed to open local store at {db_path}: {e}"))?,
    );

    let api: Arc<dyn AuthApi> = Arc::new(HttpAuthGateway::new(ApiClient::new(api_base.clone())));

    // Offline asset cache: opt-in, and never fatal — the app works without
    // it exactly like the web app works without its service worker.
    if let Ok(cache_path) = std::env::var("GEDEON_CACHE_DB") {
        match AssetCache::new_local(
            std::path::Path::new(&cache_path),
            api_base.clone(),
            CacheConfig::default(),
        )
        .await
        {
            Ok(cache) => {
                if let Err(e) = cache.activate().await {
                    tracing::warn!("Cache activation failed: {e}");
                }
                match cache.precache().await {
                    Ok(count) => tracing::info!("Pre-cached {count} static assets"),
                    Err(e) => tracing::warn!("Pre-cache failed: {e}"),
                }
            }
            Err(e) => tracing::warn!("Offline cache unavailable: {e}"),
        }
    }

    let flow = OnboardingFlow::new(api, store, transition_delay);
    Wizard::new(flow).run().await
}
