//! HTTP API for the story proxy

mod assets;
mod handlers;
mod types;

pub use handlers::create_router;
pub use types::*;

use crate::llm::LlmService;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Upstream completions service; `None` when no API key is configured
    pub llm: Option<Arc<dyn LlmService>>,
}

impl AppState {
    #[must_use]
    pub fn new(llm: Option<Arc<dyn LlmService>>) -> Self {
        Self { llm }
    }
}
