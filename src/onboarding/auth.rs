//! Auth panel state — transient, never persisted.
//!
//! Holds the credentials form, the register/login mode, and the
//! loading/error/info flags the credentials screen renders. Validation here
//! is purely local: failures only keep the submit control disabled, nothing
//! is raised.

use std::sync::OnceLock;

use regex::Regex;
use secrecy::{ExposeSecret, SecretString};

/// Backend code for a login attempt against an unconfirmed email.
pub const CODE_EMAIL_NOT_CONFIRMED: &str = "EMAIL_NOT_CONFIRMED";

/// User-facing copy, shared between handlers and tests.
pub mod messages {
    pub const REGISTERED: &str = "Compte créé. Vérifie ton email pour confirmer.";
    pub const LOGGED_IN: &str = "Connexion réussie.";
    pub const NOT_CONFIRMED: &str = "Email non confirmé. Clique sur le lien reçu, puis réessaie.";
    pub const NEED_VALID_EMAIL: &str = "Entre un email valide d'abord.";
    pub const RESENT: &str = "Email de confirmation renvoyé.";
    pub const FORGOT_NEED_EMAIL: &str = "Entre ton email (valide) pour recevoir le lien.";
    /// Always the same text whatever the backend answered, so the flow
    /// never leaks whether an account exists.
    pub const FORGOT_UNIFORM: &str =
        "Si cet email existe, tu recevras un lien de réinitialisation.";
}

/// Simple, safe email shape check on the trimmed, lowercased input.
pub fn is_valid_email(email: &str) -> bool {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let re = PATTERN.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
    });
    let candidate = email.trim().to_lowercase();
    !candidate.is_empty() && re.is_match(&candidate)
}

/// Which form the credentials screen shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    #[default]
    Register,
    Login,
}

impl AuthMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::Register => Self::Login,
            Self::Login => Self::Register,
        }
    }
}

/// The credentials form. Passwords never appear in Debug output.
pub struct AuthForm {
    pub email: String,
    pub pseudo: String,
    pub password: SecretString,
    pub password2: SecretString,
}

impl Default for AuthForm {
    fn default() -> Self {
        Self {
            email: String::new(),
            pseudo: String::new(),
            password: SecretString::from(String::new()),
            password2: SecretString::from(String::new()),
        }
    }
}

impl AuthForm {
    pub fn set_password(&mut self, password: impl Into<String>) {
        self.password = SecretString::from(password.into());
    }

    pub fn set_password2(&mut self, password: impl Into<String>) {
        self.password2 = SecretString::from(password.into());
    }

    fn passwords_match(&self) -> bool {
        self.password.expose_secret() == self.password2.expose_secret()
    }
}

/// Transient UI state for the authentication screens.
pub struct AuthPanel {
    pub mode: AuthMode,
    pub form: AuthForm,
    /// Submit/resend request in flight; the triggering control is disabled.
    pub loading: bool,
    /// Forgot-password request in flight.
    pub forgot_loading: bool,
    pub error: Option<String>,
    pub info: Option<String>,
    pub forgot_info: Option<String>,
    /// A registered account is awaiting its email confirmation link.
    pub pending_confirm: bool,
}

impl Default for AuthPanel {
    fn default() -> Self {
        Self {
            mode: AuthMode::Register,
            form: AuthForm::default(),
            loading: false,
            forgot_loading: false,
            error: None,
            info: None,
            forgot_info: None,
            pending_confirm: false,
        }
    }
}

impl AuthPanel {
    /// Whether the email step can proceed.
    pub fn can_proceed_email(&self) -> bool {
        is_valid_email(&self.form.email)
    }

    /// Whether the credentials form can be submitted: valid email, password
    /// of at least 4 characters, and in register mode a pseudo of at least
    /// 2 characters plus a matching confirmation.
    pub fn can_submit(&self) -> bool {
        if !is_valid_email(&self.form.email) {
            return false;
        }
        if self.form.password.expose_secret().len() < 4 {
            return false;
        }
        if self.mode == AuthMode::Register {
            if self.form.pseudo.trim().len() < 2 {
                return false;
            }
            if !self.form.passwords_match() {
                return false;
            }
        }
        true
    }

    /// Clear every message and the pending flag; used before a submit and
    /// when switching modes.
    pub fn clear_feedback(&mut self) {
        self.error = None;
        self.info = None;
        self.forgot_info = None;
        self.pending_confirm = false;
    }

    /// Toggle between register and login, dropping stale feedback.
    pub fn switch_mode(&mut self) {
        self.clear_feedback();
        self.mode = self.mode.toggled();
    }
}
