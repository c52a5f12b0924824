//! Effects produced by session transitions

use crate::api::ChatRequest;
use uuid::Uuid;

/// Effects to be executed after a state transition
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Post the full history to the completion proxy
    SendChat { turn: Uuid, request: ChatRequest },

    /// Write the rendered transcript to a file
    SaveTranscript { file_name: String, contents: String },

    /// Give keyboard focus back to the input line
    FocusInput,
}

impl Effect {
    #[must_use]
    pub fn save_transcript(contents: String) -> Self {
        Effect::SaveTranscript {
            file_name: super::state::TRANSCRIPT_FILE_NAME.to_string(),
            contents,
        }
    }
}
