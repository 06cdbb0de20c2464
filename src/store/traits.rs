//! `LocalStore` trait — string-keyed durable storage.
//!
//! The web app keeps its onboarding payload in two string-valued
//! `localStorage` keys; this is the same shape behind an async trait so the
//! finalizer can be tested against an in-memory backend.

use async_trait::async_trait;

use crate::error::StorageError;

/// Backend-agnostic durable key/value store with string values.
#[async_trait]
pub trait LocalStore: Send + Sync {
    /// Read the value under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`. Returns whether a value was present.
    async fn remove(&self, key: &str) -> Result<bool, StorageError>;
}
