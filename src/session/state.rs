//! Session state types

use crate::message::Message;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

/// Maximum number of messages a story may hold. The proxy refuses any
/// request carrying this many messages or more.
pub const MAX_HISTORY: usize = 100;

/// Interval at which the hosting loop delivers `Event::Tick`
pub const TICK_INTERVAL: Duration = Duration::from_millis(10);

/// File name used when exporting the transcript
pub const TRANSCRIPT_FILE_NAME: &str = "story.md";

/// Request lifecycle state of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionState {
    /// Ready for user input, no request outstanding
    #[default]
    Idle,

    /// Proxy call in flight for the given turn
    Awaiting { turn: Uuid },

    /// Submission attempted at the history ceiling. Processing stays set
    /// with nothing outstanding; only a reset leaves this state.
    HistoryFull,
}

impl SessionState {
    #[must_use]
    pub fn is_processing(self) -> bool {
        !matches!(self, SessionState::Idle)
    }

    /// Turn id of the outstanding proxy call, if any
    #[must_use]
    pub fn pending_turn(self) -> Option<Uuid> {
        match self {
            SessionState::Awaiting { turn } => Some(turn),
            _ => None,
        }
    }
}

/// One story session: history, input buffer, request state and wait timer
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Session {
    pub history: Vec<Message>,
    pub input: String,
    pub state: SessionState,
    pub waiting_time: Duration,
    /// Message of the last failed turn, cleared on the next submit or reset
    pub last_error: Option<String>,
}

impl Session {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn processing(&self) -> bool {
        self.state.is_processing()
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.history.len() >= MAX_HISTORY
    }

    /// Elapsed wait in seconds, for display
    #[must_use]
    pub fn waiting_seconds(&self) -> f64 {
        self.waiting_time.as_secs_f64()
    }

    /// Whether an export is currently allowed
    #[must_use]
    pub fn can_export(&self) -> bool {
        !self.processing() && !self.history.is_empty()
    }

    /// Messages shown in the transcript, in conversation order
    #[must_use]
    pub fn visible_messages(&self) -> impl Iterator<Item = &Message> {
        self.history.iter().filter(|m| m.is_visible())
    }

    /// Placeholder text for the input line
    #[must_use]
    pub fn placeholder(&self) -> &'static str {
        if self.history.is_empty() {
            "Enter your story prompt here..."
        } else if self.is_full() {
            "Too many messages, please start a new story."
        } else {
            "Describe your changes..."
        }
    }

    /// Label of the send button: the running timer while processing, rounded
    /// to hundredths with trailing zeros dropped ("1.2", not "1.20")
    #[must_use]
    pub fn send_label(&self) -> String {
        if self.processing() {
            round_hundredths(self.waiting_seconds()).to_string()
        } else {
            "Send".to_string()
        }
    }
}

/// Hint shown while the transcript is still empty
pub const EMPTY_TRANSCRIPT_HINT: &str = "To start, simply enter a prompt to start the story with!";

fn round_hundredths(value: f64) -> f64 {
    ((value + f64::EPSILON) * 100.0).round() / 100.0
}
