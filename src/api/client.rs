//! Thin JSON wrapper over reqwest, shared by every gateway operation.

use serde::Serialize;
use serde_json::Value;

use crate::error::{ApiError, ErrorPayload};

/// JSON API client for the GEDEON backend.
///
/// Holds a cookie store so the session cookie set by `/api/auth/login`
/// rides along on subsequent calls.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base: String,
    client: reqwest::Client,
}

impl ApiClient {
    /// Build a client for the given API base URL (scheme + host, no
    /// trailing slash required).
    pub fn new(base: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .expect("HTTP client construction");
        Self {
            base: base.into().trim_end_matches('/').to_string(),
            client,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }

    /// GET `path`, returning the parsed JSON body (if any).
    pub async fn get(&self, path: &str) -> Result<Option<Value>, ApiError> {
        let resp = self.client.get(self.url(path)).send().await?;
        Self::read_json(resp).await
    }

    /// POST `body` as JSON to `path`, returning the parsed JSON body (if any).
    pub async fn post<B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Option<Value>, ApiError> {
        let resp = self.client.post(self.url(path)).json(body).send().await?;
        Self::read_json(resp).await
    }

    /// Turn a response into `Ok(parsed body)` or an `ApiError::Status`.
    ///
    /// The body is parsed best-effort on both paths: an unparseable body on
    /// a 2xx yields `Ok(None)`, on a non-2xx an absent payload.
    async fn read_json(resp: reqwest::Response) -> Result<Option<Value>, ApiError> {
        let status = resp.status();
        let body: Option<Value> = match resp.bytes().await {
            Ok(bytes) => serde_json::from_slice(&bytes).ok(),
            Err(_) => None,
        };

        if status.is_success() {
            return Ok(body);
        }

        let payload = body.and_then(|v| serde_json::from_value::<ErrorPayload>(v).ok());
        Err(ApiError::Status {
            status: status.as_u16(),
            payload,
        })
    }
}
