//! Error types for the GEDEON onboarding flow.

use serde::Deserialize;

/// Top-level error type for the crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Structured error body returned by the GEDEON backend.
///
/// The backend answers failures with `{"status": "error", "message": …}` and
/// sometimes a machine-readable `code` (e.g. `EMAIL_NOT_CONFIRMED`). Older
/// endpoints use `error` instead of `message`. Every field is optional;
/// unknown shapes deserialize to an empty payload rather than failing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorPayload {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
}

/// Errors from the auth/profile HTTP API.
///
/// Non-2xx responses become `Status` carrying the HTTP status and whatever
/// structured payload the body contained. A body that fails to parse is an
/// absent payload, not a fatal error.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {status}")]
    Status {
        status: u16,
        payload: Option<ErrorPayload>,
    },
}

impl ApiError {
    /// The user-facing message for this failure.
    ///
    /// Prefers the backend's `message`, then `error`, then a generic
    /// `Erreur HTTP {status}` line.
    pub fn user_message(&self) -> String {
        match self {
            Self::Transport(e) => e.to_string(),
            Self::Status { status, payload } => payload
                .as_ref()
                .and_then(|p| p.message.clone().or_else(|| p.error.clone()))
                .unwrap_or_else(|| format!("Erreur HTTP {status}")),
        }
    }

    /// The backend's machine-readable error code, if any.
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Status {
                payload: Some(p), ..
            } => p.code.as_deref(),
            _ => None,
        }
    }

    /// The HTTP status, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport(_) => None,
            Self::Status { status, .. } => Some(*status),
        }
    }
}

/// Durable local storage errors.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Failed to open store: {0}")]
    Open(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Offline asset cache errors.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Failed to open cache: {0}")]
    Open(String),

    #[error("Query failed: {0}")]
    Query(String),
}

/// Result type alias for the crate.
pub type Result<T> = std::result::Result<T, Error>;
