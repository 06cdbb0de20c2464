//! Screen state machine — tracks which screen of the flow is showing.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// The screens of the onboarding flow, in order.
///
/// Progression is linear: one forward or backward at a time, plus two named
/// jump affordances (`skip to notifications` from the questions intro,
/// `restart` from the done screen). `Done` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    Welcome,
    AuthEmail,
    AuthCredentials,
    Identity,
    QuestionsIntro,
    Interests,
    Sport,
    Music,
    Companion,
    Distance,
    Budget,
    Frequency,
    When,
    Discovery,
    Ambiance,
    Notifications,
    Done,
}

/// Ordered transition table. The linear progression is this array; there
/// are no other forward paths.
pub const SCREENS: [Screen; 17] = [
    Screen::Welcome,
    Screen::AuthEmail,
    Screen::AuthCredentials,
    Screen::Identity,
    Screen::QuestionsIntro,
    Screen::Interests,
    Screen::Sport,
    Screen::Music,
    Screen::Companion,
    Screen::Distance,
    Screen::Budget,
    Screen::Frequency,
    Screen::When,
    Screen::Discovery,
    Screen::Ambiance,
    Screen::Notifications,
    Screen::Done,
];

impl Screen {
    /// Position of this screen in the linear order.
    pub fn index(&self) -> usize {
        SCREENS.iter().position(|s| s == self).unwrap_or(0)
    }

    /// The next screen in the linear progression, if any.
    pub fn next(&self) -> Option<Screen> {
        SCREENS.get(self.index() + 1).copied()
    }

    /// The previous screen in the linear progression, if any.
    pub fn prev(&self) -> Option<Screen> {
        self.index().checked_sub(1).map(|i| SCREENS[i])
    }

    /// Whether this screen is terminal (the flow is done).
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Welcome => "welcome",
            Self::AuthEmail => "auth_email",
            Self::AuthCredentials => "auth_credentials",
            Self::Identity => "identity",
            Self::QuestionsIntro => "questions_intro",
            Self::Interests => "interests",
            Self::Sport => "sport",
            Self::Music => "music",
            Self::Companion => "companion",
            Self::Distance => "distance",
            Self::Budget => "budget",
            Self::Frequency => "frequency",
            Self::When => "when",
            Self::Discovery => "discovery",
            Self::Ambiance => "ambiance",
            Self::Notifications => "notifications",
            Self::Done => "done",
        };
        write!(f, "{s}")
    }
}

impl Default for Screen {
    fn default() -> Self {
        Self::Welcome
    }
}

/// Owns the current screen and the transition animation flag.
///
/// The animation window is a fixed cosmetic delay that serializes
/// transitions visually; it carries no other semantics. The controller does
/// not validate completeness — each view disables its own "next" control, a
/// cooperative invariant, and `jump_to` accepts any screen.
#[derive(Debug)]
pub struct StepController {
    screen: Screen,
    animating: bool,
    delay: Duration,
}

impl StepController {
    pub fn new(delay: Duration) -> Self {
        Self {
            screen: Screen::Welcome,
            animating: false,
            delay,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn is_animating(&self) -> bool {
        self.animating
    }

    /// Move forward by exactly one screen after the animation window.
    /// At the terminal screen this is a no-op.
    pub async fn advance(&mut self) -> Screen {
        if let Some(next) = self.screen.next() {
            self.animate().await;
            self.screen = next;
            self.animating = false;
        }
        self.screen
    }

    /// Move backward by exactly one screen after the animation window.
    /// Only permitted when not on the first screen.
    pub async fn retreat(&mut self) -> Screen {
        if let Some(prev) = self.screen.prev() {
            self.animate().await;
            self.screen = prev;
            self.animating = false;
        }
        self.screen
    }

    /// Named jump: "skip for now" on the questions intro, straight to the
    /// notifications screen.
    pub fn skip_questions(&mut self) -> Screen {
        self.jump_to(Screen::Notifications)
    }

    /// Named jump: redo the onboarding from the start. From the done screen
    /// this is the only transition back into the machine.
    pub fn restart(&mut self) -> Screen {
        self.jump_to(Screen::Welcome)
    }

    /// Direct jump, used by the two named affordances and the session-probe
    /// auto-skip. Accepts any screen.
    pub fn jump_to(&mut self, screen: Screen) -> Screen {
        self.screen = screen;
        self.screen
    }

    /// Progress percentage for the progress bar: position over the last
    /// pre-terminal screen, clamped to 100.
    pub fn percent(&self) -> u8 {
        let span = Screen::Notifications.index() as f64;
        let pct = (self.screen.index() as f64 / span) * 100.0;
        pct.min(100.0).round() as u8
    }

    async fn animate(&mut self) {
        self.animating = true;
        tokio::time::sleep(self.delay).await;
    }
}
