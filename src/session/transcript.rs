//! Markdown rendering of a story transcript

use crate::message::Message;

/// Render the visible history as markdown, one paragraph per message.
///
/// Pure: the same history always renders to the same text.
#[must_use]
pub fn export_transcript(history: &[Message]) -> String {
    history
        .iter()
        .filter_map(|message| {
            message
                .role
                .speaker_label()
                .map(|label| format!("**{label}:** {}", message.content))
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
