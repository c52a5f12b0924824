//! Pure state transition function
//!
//! Given the same session and event, `transition` always yields the same
//! session and effects. All I/O is left to whoever executes the effects.

use super::state::TICK_INTERVAL;
use super::transcript::export_transcript;
use super::{Effect, Event, Session, SessionState};
use crate::api::ChatRequest;
use crate::message::Message;
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub session: Session,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    #[must_use]
    pub fn new(session: Session) -> Self {
        Self {
            session,
            effects: vec![],
        }
    }

    #[must_use]
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Events a session refuses. The session is left untouched.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Nothing to send")]
    EmptyInput,
    #[error("A reply is still pending, cannot accept message")]
    Busy,
    #[error("Reply belongs to a turn that is no longer pending")]
    StaleResponse,
    #[error("Nothing to export while the story is empty or a reply is pending")]
    ExportUnavailable,
}

/// Pure transition function
///
/// # Errors
///
/// Returns a [`TransitionError`] when the session refuses the event: blank
/// or concurrent submits, replies for a turn that is not pending, and
/// exports of an empty or busy story.
pub fn transition(session: &Session, event: Event) -> Result<TransitionResult, TransitionError> {
    match event {
        Event::InputChanged { text } => Ok(TransitionResult::new(Session {
            input: text,
            ..session.clone()
        })),

        Event::Submit { text, turn } => {
            if text.trim().is_empty() {
                return Err(TransitionError::EmptyInput);
            }
            if session.processing() {
                return Err(TransitionError::Busy);
            }

            // At the ceiling the session parks in HistoryFull without a call
            if session.is_full() {
                return Ok(TransitionResult::new(Session {
                    state: SessionState::HistoryFull,
                    ..session.clone()
                }));
            }

            let mut history = session.history.clone();
            history.push(Message::user(text));
            let request = ChatRequest::new(history.clone());

            Ok(TransitionResult::new(Session {
                history,
                input: String::new(),
                state: SessionState::Awaiting { turn },
                waiting_time: std::time::Duration::ZERO,
                last_error: None,
            })
            .with_effect(Effect::SendChat { turn, request }))
        }

        Event::Response { turn, message } => {
            if session.state.pending_turn() != Some(turn) {
                return Err(TransitionError::StaleResponse);
            }

            let mut history = session.history.clone();
            history.push(message);

            Ok(TransitionResult::new(Session {
                history,
                state: SessionState::Idle,
                ..session.clone()
            })
            .with_effect(Effect::FocusInput))
        }

        // The user turn stays in history so the story can be resumed
        Event::TransportFailed { turn, error } => {
            if session.state.pending_turn() != Some(turn) {
                return Err(TransitionError::StaleResponse);
            }

            Ok(TransitionResult::new(Session {
                state: SessionState::Idle,
                last_error: Some(error),
                ..session.clone()
            })
            .with_effect(Effect::FocusInput))
        }

        // Same dead end as a local ceiling hit; only a reset leaves it
        Event::HistoryRejected { turn } => {
            if session.state.pending_turn() != Some(turn) {
                return Err(TransitionError::StaleResponse);
            }

            Ok(TransitionResult::new(Session {
                state: SessionState::HistoryFull,
                ..session.clone()
            }))
        }

        Event::Tick => {
            if !session.processing() {
                return Ok(TransitionResult::new(session.clone()));
            }
            Ok(TransitionResult::new(Session {
                waiting_time: session.waiting_time + TICK_INTERVAL,
                ..session.clone()
            }))
        }

        Event::Reset => Ok(TransitionResult::new(Session::default()).with_effect(Effect::FocusInput)),

        Event::Export => {
            if !session.can_export() {
                return Err(TransitionError::ExportUnavailable);
            }
            Ok(TransitionResult::new(session.clone())
                .with_effect(Effect::save_transcript(export_transcript(&session.history))))
        }
    }
}
