//! Common types for LLM interactions

use crate::message::Message;

/// LLM request: the fully assembled message sequence plus sampling settings
#[derive(Debug, Clone, PartialEq)]
pub struct LlmRequest {
    pub messages: Vec<Message>,
    pub temperature: Option<f32>,
    pub max_completion_tokens: Option<u32>,
}

/// LLM response: the first choice's message
#[derive(Debug, Clone)]
pub struct LlmResponse {
    pub message: Message,
    pub finish_reason: Option<String>,
    pub usage: Usage,
}

impl LlmResponse {
    /// Whether the model stopped because it ran out of token budget
    #[must_use]
    pub fn truncated(&self) -> bool {
        self.finish_reason.as_deref() == Some("length")
    }
}

/// Usage statistics
#[derive(Debug, Clone, Copy, Default)]
pub struct Usage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}
