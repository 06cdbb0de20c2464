//! Onboarding system — the first-launch preference flow.
//!
//! A linear sequence of screens collects identity and preference answers
//! into an [`profile::OnboardingState`], authenticating against the GEDEON
//! backend along the way. One [`flow::OnboardingFlow`] owns everything; a
//! front-end only renders it and reports gestures back.

pub mod actions;
pub mod auth;
pub mod finalize;
pub mod flow;
pub mod profile;
pub mod screen;

pub use actions::ProfileAction;
pub use auth::{AuthMode, AuthPanel, is_valid_email};
pub use finalize::{Finalizer, OnboardingSnapshot, storage_keys};
pub use flow::OnboardingFlow;
pub use profile::{OnboardingProfile, OnboardingState};
pub use screen::{Screen, StepController, SCREENS};
