//! Story session state machine
//!
//! Implements the Elm Architecture pattern with pure state transitions:
//! one in-flight proxy call at a time, the message history, the wait timer,
//! and the export/reset side effects.

mod effect;
pub mod event;
pub mod state;
mod transcript;
pub(crate) mod transition;

#[cfg(test)]
mod proptests;

pub use effect::Effect;
pub use event::Event;
pub use state::{Session, SessionState, EMPTY_TRANSCRIPT_HINT, MAX_HISTORY, TICK_INTERVAL};
pub use transcript::export_transcript;
pub use transition::{transition, TransitionError, TransitionResult};
