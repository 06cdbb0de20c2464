//! Finalizer — persists the accumulated answers and syncs them upstream.
//!
//! The local write is the source of truth: both storage keys are written
//! before anything else happens, and only a successful local write lets the
//! flow advance to the done screen. The remote sync afterwards is
//! best-effort; the endpoint may not even exist.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::{AuthApi, BestEffort};
use crate::error::StorageError;
use crate::store::LocalStore;

use super::profile::{OnboardingProfile, OnboardingState};

/// Keys used in the durable local store.
pub mod storage_keys {
    /// JSON-serialized [`super::OnboardingSnapshot`].
    pub const ONBOARDING_PAYLOAD: &str = "gedeon_onboarding";
    /// Boolean-as-string flag marking onboarding as completed.
    pub const ONBOARDED_FLAG: &str = "gedeon_onboarded";
}

/// The payload written to local storage and posted to the sync endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingSnapshot {
    pub first_name: String,
    pub last_name: String,
    pub profile: OnboardingProfile,
    pub notif_choice: Option<bool>,
    pub saved_at: DateTime<Utc>,
}

impl OnboardingSnapshot {
    /// Capture the current answers, trimming the identity fields.
    pub fn capture(state: &OnboardingState) -> Self {
        Self {
            first_name: state.first_name.trim().to_string(),
            last_name: state.last_name.trim().to_string(),
            profile: state.profile.clone(),
            notif_choice: state.notif_choice,
            saved_at: Utc::now(),
        }
    }
}

/// Serializes the accumulated profile, writes it locally, and best-effort
/// posts it to the backend.
pub struct Finalizer {
    store: Arc<dyn LocalStore>,
    api: Arc<dyn AuthApi>,
}

impl Finalizer {
    pub fn new(store: Arc<dyn LocalStore>, api: Arc<dyn AuthApi>) -> Self {
        Self { store, api }
    }

    /// Persist the snapshot under both keys, then attempt the remote sync.
    ///
    /// A storage failure propagates and nothing is synced; the sync outcome
    /// is returned so the caller's decision to ignore it stays visible.
    pub async fn finalize(&self, state: &OnboardingState) -> Result<BestEffort, StorageError> {
        let snapshot = OnboardingSnapshot::capture(state);
        let payload = serde_json::to_string(&snapshot)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;

        self.store
            .set(storage_keys::ONBOARDING_PAYLOAD, &payload)
            .await?;
        self.store.set(storage_keys::ONBOARDED_FLAG, "true").await?;

        Ok(self.api.sync_profile(&snapshot).await)
    }
}
