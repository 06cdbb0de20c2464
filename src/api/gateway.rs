//! Auth gateway — typed operations over the GEDEON auth/profile endpoints.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;

use crate::error::ApiError;
use crate::onboarding::finalize::OnboardingSnapshot;

use super::client::ApiClient;

/// Result of the session probe.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionCheck {
    #[serde(default)]
    pub logged_in: bool,
    #[serde(default)]
    pub username: Option<String>,
}

/// Success body shared by the auth endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

/// Outcome of a best-effort operation.
///
/// Failure is a first-class value rather than a swallowed exception; the
/// caller decides (visibly) to ignore it.
#[derive(Debug)]
pub enum BestEffort {
    Delivered,
    Failed(ApiError),
}

impl BestEffort {
    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered)
    }
}

/// The authentication/profile API surface the flow talks to.
///
/// A trait so tests can substitute a stub the way the agent stubs its LLM
/// provider.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// GET /api/auth/check — probe the session cookie.
    async fn check_session(&self) -> Result<SessionCheck, ApiError>;

    /// POST /api/auth/register — create an account awaiting email
    /// confirmation.
    async fn register(
        &self,
        email: &str,
        pseudo: &str,
        password: &SecretString,
    ) -> Result<AuthResponse, ApiError>;

    /// POST /api/auth/login — authenticate and establish the session cookie.
    async fn login(&self, email: &str, password: &SecretString)
        -> Result<AuthResponse, ApiError>;

    /// POST /api/auth/resend-confirmation.
    async fn resend_confirmation(&self, email: &str) -> Result<AuthResponse, ApiError>;

    /// POST /api/auth/forgot-password — trigger a reset email.
    async fn forgot_password(&self, email: &str) -> Result<AuthResponse, ApiError>;

    /// POST /api/auth/logout — clear the server-side session.
    async fn logout(&self) -> Result<AuthResponse, ApiError>;

    /// POST /api/profile/onboarding — best-effort profile sync. The endpoint
    /// may not exist at all; failure is returned, not raised.
    async fn sync_profile(&self, snapshot: &OnboardingSnapshot) -> BestEffort;
}

/// reqwest-backed `AuthApi` implementation.
pub struct HttpAuthGateway {
    client: ApiClient,
}

impl HttpAuthGateway {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Emails travel trimmed and lowercased, like the backend stores them.
    fn normalize_email(email: &str) -> String {
        email.trim().to_lowercase()
    }

    fn parse<T: Default + serde::de::DeserializeOwned>(body: Option<serde_json::Value>) -> T {
        body.and_then(|v| serde_json::from_value(v).ok())
            .unwrap_or_default()
    }
}

#[async_trait]
impl AuthApi for HttpAuthGateway {
    async fn check_session(&self) -> Result<SessionCheck, ApiError> {
        let body = self.client.get("/api/auth/check").await?;
        Ok(Self::parse(body))
    }

    async fn register(
        &self,
        email: &str,
        pseudo: &str,
        password: &SecretString,
    ) -> Result<AuthResponse, ApiError> {
        let body = json!({
            "email": Self::normalize_email(email),
            "pseudo": pseudo.trim(),
            "password": password.expose_secret(),
        });
        let resp = self.client.post("/api/auth/register", &body).await?;
        Ok(Self::parse(resp))
    }

    async fn login(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<AuthResponse, ApiError> {
        let body = json!({
            "email": Self::normalize_email(email),
            "password": password.expose_secret(),
        });
        let resp = self.client.post("/api/auth/login", &body).await?;
        Ok(Self::parse(resp))
    }

    async fn resend_confirmation(&self, email: &str) -> Result<AuthResponse, ApiError> {
        let body = json!({ "email": Self::normalize_email(email) });
        let resp = self
            .client
            .post("/api/auth/resend-confirmation", &body)
            .await?;
        Ok(Self::parse(resp))
    }

    async fn forgot_password(&self, email: &str) -> Result<AuthResponse, ApiError> {
        let body = json!({ "email": Self::normalize_email(email) });
        let resp = self.client.post("/api/auth/forgot-password", &body).await?;
        Ok(Self::parse(resp))
    }

    async fn logout(&self) -> Result<AuthResponse, ApiError> {
        let resp = self
            .client
            .post("/api/auth/logout", &serde_json::Value::Null)
            .await?;
        Ok(Self::parse(resp))
    }

    async fn sync_profile(&self, snapshot: &OnboardingSnapshot) -> BestEffort {
        match self.client.post("/api/profile/onboarding", snapshot).await {
            Ok(_) => BestEffort::Delivered,
            Err(e) => {
                tracing::debug!("Profile sync unavailable: {}", e.user_message());
                BestEffort::Failed(e)
            }
        }
    }
}
