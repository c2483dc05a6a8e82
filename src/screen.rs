//! Explicit UI state for the terminal front-end
//!
//! Every lookup takes a ticket when it starts loading. Only the holder of the
//! latest ticket may move the screen out of `Loading`, so a slow lookup that
//! finishes after a newer one was started cannot overwrite it.

use std::fmt;

use serde::Serialize;

use crate::presenter::WeatherView;
use crate::theme::Theme;

/// What the screen currently shows
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum UiState {
    /// Welcome message, nothing looked up yet
    Idle,
    Loading,
    Error { message: String },
    Content,
}

/// Identifies one lookup for the lifetime of the screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

/// Machine-readable form of the screen, for `--json` output
#[derive(Debug, Serialize)]
pub struct ScreenSnapshot<'a> {
    #[serde(flatten)]
    pub state: &'a UiState,
    pub theme: Option<Theme>,
    pub weather: Option<&'a WeatherView>,
}

#[derive(Debug)]
pub struct Screen {
    state: UiState,
    view: Option<WeatherView>,
    theme: Option<Theme>,
    issued: u64,
}

impl Default for Screen {
    fn default() -> Self {
        Self::new()
    }
}

impl Screen {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: UiState::Idle,
            view: None,
            theme: None,
            issued: 0,
        }
    }

    #[must_use]
    pub fn state(&self) -> &UiState {
        &self.state
    }

    /// Last successfully rendered view; kept when a later lookup fails
    #[must_use]
    pub fn view(&self) -> Option<&WeatherView> {
        self.view.as_ref()
    }

    #[must_use]
    pub fn theme(&self) -> Option<Theme> {
        self.theme
    }

    #[must_use]
    pub fn snapshot(&self) -> ScreenSnapshot<'_> {
        ScreenSnapshot {
            state: &self.state,
            theme: self.theme,
            weather: self.view.as_ref(),
        }
    }

    /// Enter `Loading`, clear any error and hand out a fresh ticket
    pub fn begin(&mut self) -> Ticket {
        self.issued += 1;
        self.state = UiState::Loading;
        Ticket(self.issued)
    }

    #[must_use]
    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.issued
    }

    /// Show `view`, replacing the theme. Returns `false` for a stale ticket.
    pub fn show(&mut self, ticket: Ticket, view: WeatherView) -> bool {
        if !self.is_current(ticket) {
            tracing::debug!(?ticket, latest = self.issued, "Discarding superseded result");
            return false;
        }
        self.theme = Some(view.theme);
        self.view = Some(view);
        self.state = UiState::Content;
        true
    }

    /// Show the error banner. Returns `false` for a stale ticket.
    pub fn fail(&mut self, ticket: Ticket, message: impl Into<String>) -> bool {
        if !self.is_current(ticket) {
            tracing::debug!(?ticket, latest = self.issued, "Discarding superseded failure");
            return false;
        }
        self.state = UiState::Error {
            message: message.into(),
        };
        true
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.state, &self.view) {
            (UiState::Idle, _) => {
                writeln!(f, "Search for a city, or use your location to see the weather.")
            }
            (UiState::Loading, _) => writeln!(f, "Loading…"),
            (UiState::Error { message }, _) => writeln!(f, "⚠️  {message}"),
            (UiState::Content, Some(view)) => write!(f, "{view}"),
            (UiState::Content, None) => Ok(()),
        }
    }
}
