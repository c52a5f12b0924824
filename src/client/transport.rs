//! Transport between a story session and the completion proxy

use crate::api::{ChatRequest, ErrorResponse, TOO_MANY_MESSAGES};
use crate::message::Message;
use std::time::Duration;
use thiserror::Error;

/// Default proxy address used by the terminal client
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8000";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(90);

/// Failures of a single proxy call
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Proxy refused the story: {0}")]
    Rejected(String),
    #[error("Proxy returned HTTP {status}: {message}")]
    Http { status: u16, message: String },
    #[error("Could not reach proxy: {0}")]
    Io(String),
    #[error("Malformed proxy response: {0}")]
    Decode(String),
}

impl TransportError {
    /// Whether the proxy refused because the story hit the history ceiling
    #[must_use]
    pub fn is_too_many_messages(&self) -> bool {
        matches!(self, TransportError::Rejected(msg) if msg == TOO_MANY_MESSAGES)
    }
}

/// Blocking call to the completion proxy. Implementations are invoked from
/// worker threads.
pub trait ChatTransport: Send + Sync + 'static {
    /// # Errors
    ///
    /// Returns [`TransportError::Rejected`] for a 400 from the proxy and the
    /// other variants for HTTP, network and decoding failures.
    fn send(&self, request: &ChatRequest) -> Result<Message, TransportError>;
}

/// HTTP transport posting JSON to `<base>/api/chat`
pub struct HttpTransport {
    agent: ureq::Agent,
    endpoint: String,
}

impl HttpTransport {
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(REQUEST_TIMEOUT).build();
        Self {
            agent,
            endpoint: format!("{}/api/chat", base_url.trim_end_matches('/')),
        }
    }
}

impl ChatTransport for HttpTransport {
    fn send(&self, request: &ChatRequest) -> Result<Message, TransportError> {
        match self.agent.post(&self.endpoint).send_json(request) {
            Ok(response) => response
                .into_json::<Message>()
                .map_err(|e| TransportError::Decode(e.to_string())),
            Err(ureq::Error::Status(status, response)) => {
                let message = response
                    .into_json::<ErrorResponse>()
                    .map_or_else(|e| e.to_string(), |body| body.error);
                if status == 400 {
                    Err(TransportError::Rejected(message))
                } else {
                    Err(TransportError::Http { status, message })
                }
            }
            Err(ureq::Error::Transport(e)) => Err(TransportError::Io(e.to_string())),
        }
    }
}
