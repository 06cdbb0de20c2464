//! Offline support — network-first asset cache with cache fallback.
//!
//! The PWA shape of this logic lives in a service worker; here the same
//! strategy backs any asset fetch the app makes: try the network, keep
//! fresh copies of everything that returns 200, and degrade to the cache,
//! then to the offline page, then to a synthetic 503. API calls are never
//! cached and fail with a synthetic offline JSON body instead.

pub mod cache;

pub use cache::{AssetCache, AssetSource, FetchedAsset, RequestMode};
