//! Chat message types shared by the proxy and its clients

use serde::{Deserialize, Serialize};

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

impl Role {
    /// Label shown in front of a message in the rendered transcript.
    /// System messages are never rendered.
    #[must_use]
    pub fn speaker_label(self) -> Option<&'static str> {
        match self {
            Role::User => Some("You"),
            Role::Assistant => Some("AI"),
            Role::System => None,
        }
    }
}

/// A single message in a story conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    #[must_use]
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    /// Whether the message appears in the transcript shown to the user
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.role != Role::System
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serializes_lowercase() {
        let json = serde_json::to_value(Message::assistant("Hi there.")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "role": "assistant", "content": "Hi there." })
        );
    }

    #[test]
    fn test_unknown_role_rejected() {
        let result: Result<Message, _> =
            serde_json::from_str(r#"{"role":"narrator","content":"x"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_system_messages_hidden() {
        assert!(!Message::system("rules").is_visible());
        assert!(Message::user("hello").is_visible());
        assert_eq!(Role::System.speaker_label(), None);
    }
}
