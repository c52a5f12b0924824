//! Events that can occur in a story session

use crate::message::Message;
use uuid::Uuid;

/// Events that trigger state transitions
#[derive(Debug, Clone)]
pub enum Event {
    // User events
    InputChanged {
        text: String,
    },
    /// Submit `text` as the next user turn. `turn` tags the proxy call it
    /// starts so that late replies can be told apart.
    Submit {
        text: String,
        turn: Uuid,
    },
    Export,
    Reset,

    // Proxy events
    Response {
        turn: Uuid,
        message: Message,
    },
    TransportFailed {
        turn: Uuid,
        error: String,
    },
    /// The proxy refused the turn because the story is at the history ceiling
    HistoryRejected {
        turn: Uuid,
    },

    // Timer
    Tick,
}

impl Event {
    /// Submit with a freshly generated turn id
    #[must_use]
    pub fn submit(text: impl Into<String>) -> Self {
        Event::Submit {
            text: text.into(),
            turn: Uuid::new_v4(),
        }
    }
}
