//! OnboardingFlow — the single owner of all onboarding state.
//!
//! Screens render from this one object and report user gestures back to it;
//! nothing else mutates the step, the accumulated answers, or the auth
//! panel. Each network-backed handler issues at most one outstanding
//! request, gated by its loading flag.

use std::sync::Arc;
use std::time::Duration;

use crate::api::{AuthApi, BestEffort};
use crate::error::StorageError;
use crate::store::LocalStore;

use super::actions::ProfileAction;
use super::auth::{messages, AuthMode, AuthPanel, CODE_EMAIL_NOT_CONFIRMED};
use super::finalize::Finalizer;
use super::profile::OnboardingState;
use super::screen::{Screen, StepController};

pub struct OnboardingFlow {
    controller: StepController,
    state: OnboardingState,
    auth: AuthPanel,
    api: Arc<dyn AuthApi>,
    finalizer: Finalizer,
    saving: bool,
}

impl OnboardingFlow {
    pub fn new(
        api: Arc<dyn AuthApi>,
        store: Arc<dyn LocalStore>,
        transition_delay: Duration,
    ) -> Self {
        Self {
            controller: StepController::new(transition_delay),
            state: OnboardingState::default(),
            auth: AuthPanel::default(),
            finalizer: Finalizer::new(store, Arc::clone(&api)),
            api,
            saving: false,
        }
    }

    pub fn screen(&self) -> Screen {
        self.controller.screen()
    }

    pub fn percent(&self) -> u8 {
        self.controller.percent()
    }

    pub fn state(&self) -> &OnboardingState {
        &self.state
    }

    pub fn auth(&self) -> &AuthPanel {
        &self.auth
    }

    pub fn auth_mut(&mut self) -> &mut AuthPanel {
        &mut self.auth
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    /// Apply one user gesture to the accumulated state.
    pub fn dispatch(&mut self, action: ProfileAction) {
        self.state.apply(action);
    }

    /// Session probe on mount: an existing session skips the auth screens
    /// entirely. Probe failures mean "feature unavailable" and are ignored.
    pub async fn bootstrap(&mut self) {
        match self.api.check_session().await {
            Ok(check) if check.logged_in => {
                tracing::debug!(username = ?check.username, "Session active, skipping auth");
                self.controller.jump_to(Screen::Identity);
            }
            Ok(_) => {}
            Err(e) => {
                tracing::debug!("Session probe unavailable: {}", e.user_message());
            }
        }
    }

    /// Whether the current screen's "next" control is enabled. Cooperative:
    /// the controller itself never checks this.
    pub fn can_continue(&self) -> bool {
        let profile = &self.state.profile;
        match self.screen() {
            Screen::Welcome | Screen::QuestionsIntro => true,
            Screen::AuthEmail => self.auth.can_proceed_email(),
            Screen::AuthCredentials => self.auth.can_submit() && !self.auth.loading,
            Screen::Identity => {
                !self.state.first_name.is_empty() && !self.state.last_name.is_empty()
            }
            Screen::Interests => profile.interests.len() >= 3,
            Screen::Sport => profile.sport_type.is_some(),
            Screen::Music => !profile.music_genres.is_empty(),
            Screen::Companion => profile.companion.is_some(),
            Screen::Distance => profile.distance.is_some(),
            Screen::Budget => profile.budget.is_some(),
            Screen::Frequency => profile.frequency.is_some(),
            Screen::When => !profile.when.is_empty(),
            Screen::Discovery => profile.discovery.is_some(),
            Screen::Ambiance => profile.ambiance.is_some(),
            Screen::Notifications => self.state.notif_choice.is_some() && !self.saving,
            Screen::Done => false,
        }
    }

    pub async fn advance(&mut self) -> Screen {
        self.controller.advance().await
    }

    pub async fn retreat(&mut self) -> Screen {
        self.controller.retreat().await
    }

    /// "Passer pour l'instant" on the questions intro.
    pub fn skip_questions(&mut self) -> Screen {
        self.controller.skip_questions()
    }

    /// Redo the onboarding from the welcome screen. Accumulated answers are
    /// intentionally retained.
    pub fn restart(&mut self) -> Screen {
        self.controller.restart()
    }

    /// Submit the credentials form in the current mode.
    ///
    /// Register success leaves the user on the credentials screen awaiting
    /// email confirmation; login success jumps to the identity screen. A
    /// login refused with `EMAIL_NOT_CONFIRMED` re-shows the confirmation
    /// affordances instead of a generic error.
    pub async fn submit_auth(&mut self) {
        if self.auth.loading {
            return;
        }
        self.auth.clear_feedback();
        self.auth.loading = true;

        match self.auth.mode {
            AuthMode::Register => {
                let result = self
                    .api
                    .register(
                        &self.auth.form.email,
                        &self.auth.form.pseudo,
                        &self.auth.form.password,
                    )
                    .await;
                match result {
                    Ok(resp) => {
                        self.auth.info =
                            Some(resp.message.unwrap_or_else(|| messages::REGISTERED.into()));
                        self.auth.pending_confirm = true;
                        // Stay on the credentials screen until confirmation.
                    }
                    Err(e) => self.fail_auth(e),
                }
            }
            AuthMode::Login => {
                let result = self
                    .api
                    .login(&self.auth.form.email, &self.auth.form.password)
                    .await;
                match result {
                    Ok(resp) => {
                        self.auth.info =
                            Some(resp.message.unwrap_or_else(|| messages::LOGGED_IN.into()));
                        self.controller.jump_to(Screen::Identity);
                    }
                    Err(e) => self.fail_auth(e),
                }
            }
        }

        self.auth.loading = false;
    }

    fn fail_auth(&mut self, e: crate::error::ApiError) {
        if e.code() == Some(CODE_EMAIL_NOT_CONFIRMED) {
            self.auth.error = Some(messages::NOT_CONFIRMED.into());
            self.auth.pending_confirm = true;
        } else {
            self.auth.error = Some(e.user_message());
        }
    }

    /// "J'ai confirmé": try a login; if the email is confirmed it succeeds.
    pub async fn confirm_and_login(&mut self) {
        self.auth.mode = AuthMode::Login;
        self.submit_auth().await;
    }

    /// Ask the backend to resend the confirmation link.
    pub async fn resend_confirmation(&mut self) {
        if self.auth.loading {
            return;
        }
        self.auth.error = None;
        self.auth.info = None;
        if !self.auth.can_proceed_email() {
            self.auth.error = Some(messages::NEED_VALID_EMAIL.into());
            return;
        }
        self.auth.loading = true;

        match self.api.resend_confirmation(&self.auth.form.email).await {
            Ok(resp) => {
                self.auth.info = Some(resp.message.unwrap_or_else(|| messages::RESENT.into()));
                self.auth.pending_confirm = true;
            }
            Err(e) => self.auth.error = Some(e.user_message()),
        }

        self.auth.loading = false;
    }

    /// Trigger a password-reset email. The surfaced message is identical
    /// whatever the backend answered, to avoid leaking account existence.
    pub async fn forgot_password(&mut self) {
        if self.auth.forgot_loading {
            return;
        }
        self.auth.forgot_info = None;
        self.auth.error = None;
        if !self.auth.can_proceed_email() {
            self.auth.error = Some(messages::FORGOT_NEED_EMAIL.into());
            return;
        }
        self.auth.forgot_loading = true;

        let _ = self.api.forgot_password(&self.auth.form.email).await;
        self.auth.forgot_info = Some(messages::FORGOT_UNIFORM.into());

        self.auth.forgot_loading = false;
    }

    /// Persist the answers locally, best-effort sync them upstream, and
    /// advance to the done screen. A failed local write propagates and the
    /// step does not move.
    pub async fn finalize(&mut self) -> Result<(), StorageError> {
        if self.saving {
            return Ok(());
        }
        self.saving = true;

        let result = self.finalizer.finalize(&self.state).await;
        self.saving = false;

        match result {
            Ok(outcome) => {
                if let BestEffort::Failed(e) = outcome {
                    tracing::debug!("Ignoring profile sync failure: {}", e.user_message());
                }
                self.controller.advance().await;
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}
