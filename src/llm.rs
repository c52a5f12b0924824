//! Upstream LLM provider abstraction
//!
//! Provides a common interface for the chat-completions provider that writes
//! each story turn.

mod config;
mod error;
mod openrouter;
mod types;

#[cfg(test)]
pub mod testing;

pub use config::{LlmConfig, DEFAULT_BASE_URL, DEFAULT_MODEL};
pub use error::{LlmError, LlmErrorKind};
pub use openrouter::OpenRouterService;
pub use types::*;

use async_trait::async_trait;
use std::sync::Arc;

/// Common interface for LLM providers
#[async_trait]
pub trait LlmService: Send + Sync {
    /// Make a completion request
    ///
    /// # Errors
    ///
    /// Returns an [`LlmError`] classifying network, auth, rate-limit and
    /// upstream failures.
    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError>;

    /// Get the model ID
    fn model_id(&self) -> &str;
}

/// Logging wrapper for LLM services
pub struct LoggingService {
    inner: Arc<dyn LlmService>,
    model_id: String,
}

impl LoggingService {
    #[must_use]
    pub fn new(inner: Arc<dyn LlmService>) -> Self {
        let model_id = inner.model_id().to_string();
        Self { inner, model_id }
    }
}

#[async_trait]
impl LlmService for LoggingService {
    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError> {
        let start = std::time::Instant::now();
        let result = self.inner.complete(request).await;
        let duration = start.elapsed();

        match &result {
            Ok(response) => {
                tracing::info!(
                    model = %self.model_id,
                    duration_ms = %duration.as_millis(),
                    messages = request.messages.len(),
                    input_tokens = response.usage.input_tokens,
                    output_tokens = response.usage.output_tokens,
                    truncated = response.truncated(),
                    "LLM request completed"
                );
            }
            Err(e) => {
                tracing::error!(
                    model = %self.model_id,
                    duration_ms = %duration.as_millis(),
                    error = %e.message,
                    kind = e.kind.as_str(),
                    "LLM request failed"
                );
            }
        }

        result
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}

/// Build the production service from configuration.
/// Returns `None` when no API key is configured.
///
/// # Errors
///
/// Fails when the HTTP client for the provider cannot be built.
pub fn service_from_config(config: &LlmConfig) -> Result<Option<Arc<dyn LlmService>>, LlmError> {
    let Some(api_key) = config.api_key.as_deref() else {
        return Ok(None);
    };
    let service: Arc<dyn LlmService> = Arc::new(OpenRouterService::new(config, api_key)?);
    Ok(Some(Arc::new(LoggingService::new(service))))
}
