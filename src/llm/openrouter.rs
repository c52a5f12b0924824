//! `OpenRouter` (`OpenAI`-compatible chat completions) provider implementation

use super::config::LlmConfig;
use super::types::{LlmRequest, LlmResponse, Usage};
use super::{LlmError, LlmService};
use crate::message::{Message, Role};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Chat completions client for an `OpenAI`-compatible endpoint
pub struct OpenRouterService {
    client: Client,
    api_key: String,
    model: String,
    endpoint: String,
    referer: String,
    title: String,
}

impl OpenRouterService {
    /// # Errors
    ///
    /// Fails when the underlying HTTP client cannot be built.
    pub fn new(config: &LlmConfig, api_key: impl Into<String>) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| LlmError::unknown(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            model: config.model.clone(),
            endpoint: format!(
                "{}/chat/completions",
                config.base_url.trim_end_matches('/')
            ),
            referer: config.referer.clone(),
            title: config.title.clone(),
        })
    }

    fn translate_request(&self, request: &LlmRequest) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model.clone(),
            messages: request.messages.clone(),
            temperature: request.temperature,
            max_completion_tokens: request.max_completion_tokens,
            stream: false,
        }
    }

    fn normalize_response(resp: ChatCompletionResponse) -> Result<LlmResponse, LlmError> {
        let choice = resp
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::unknown("No choices in response"))?;

        let usage = resp.usage.map_or_else(Usage::default, |u| Usage {
            input_tokens: u64::from(u.prompt_tokens),
            output_tokens: u64::from(u.completion_tokens),
        });

        Ok(LlmResponse {
            message: Message {
                role: choice.message.role,
                content: choice.message.content.unwrap_or_default(),
            },
            finish_reason: choice.finish_reason,
            usage,
        })
    }
}

#[async_trait]
impl LlmService for OpenRouterService {
    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError> {
        let body = self.translate_request(request);

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .header("HTTP-Referer", &self.referer)
            .header("X-Title", &self.title)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::network(format!("Request timeout: {e}"))
                } else if e.is_connect() {
                    LlmError::network(format!("Connection failed: {e}"))
                } else {
                    LlmError::unknown(format!("Request failed: {e}"))
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| LlmError::network(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            if let Ok(error_resp) = serde_json::from_str::<ErrorResponseBody>(&body) {
                return Err(LlmError::from_status(
                    status.as_u16(),
                    &error_resp.error.message,
                ));
            }
            return Err(LlmError::from_status(status.as_u16(), &body));
        }

        let completion: ChatCompletionResponse = serde_json::from_str(&body).map_err(|e| {
            LlmError::unknown(format!("Failed to parse response: {e} - body: {body}"))
        })?;

        Self::normalize_response(completion)
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}

// Chat completions API types

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_completion_tokens: Option<u32>,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<WireUsage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    role: Role,
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
#[allow(clippy::struct_field_names)]
struct WireUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ErrorResponseBody {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::LlmErrorKind;
    use serde_json::json;

    fn service() -> OpenRouterService {
        OpenRouterService::new(&LlmConfig::default(), "test-key").unwrap()
    }

    #[test]
    fn test_endpoint_from_base_url() {
        let config = LlmConfig {
            base_url: "https://example.com/api/v1/".to_string(),
            ..LlmConfig::default()
        };
        let service = OpenRouterService::new(&config, "k").unwrap();
        assert_eq!(
            service.endpoint,
            "https://example.com/api/v1/chat/completions"
        );
    }

    #[test]
    fn test_request_wire_format() {
        let request = LlmRequest {
            messages: vec![Message::system("rules"), Message::user("Start")],
            temperature: Some(0.2),
            max_completion_tokens: Some(50),
        };

        let body = serde_json::to_value(service().translate_request(&request)).unwrap();

        assert_eq!(body["model"], "google/gemini-2.5-flash-lite-preview-06-17");
        assert_eq!(body["max_completion_tokens"], 50);
        assert_eq!(body["stream"], false);
        assert!((body["temperature"].as_f64().unwrap() - 0.2).abs() < 1e-6);
        assert_eq!(
            body["messages"],
            json!([
                { "role": "system", "content": "rules" },
                { "role": "user", "content": "Start" }
            ])
        );
    }

    #[test]
    fn test_first_choice_returned() {
        let resp: ChatCompletionResponse = serde_json::from_value(json!({
            "choices": [
                { "message": { "role": "assistant", "content": "Once upon a tide." }, "finish_reason": "stop" },
                { "message": { "role": "assistant", "content": "ignored" }, "finish_reason": "stop" }
            ],
            "usage": { "prompt_tokens": 120, "completion_tokens": 9, "total_tokens": 129 }
        }))
        .unwrap();

        let normalized = OpenRouterService::normalize_response(resp).unwrap();
        assert_eq!(normalized.message, Message::assistant("Once upon a tide."));
        assert_eq!(normalized.usage.input_tokens, 120);
        assert_eq!(normalized.usage.output_tokens, 9);
        assert!(!normalized.truncated());
    }

    #[test]
    fn test_null_content_becomes_empty() {
        let resp: ChatCompletionResponse = serde_json::from_value(json!({
            "choices": [ { "message": { "role": "assistant", "content": null }, "finish_reason": "length" } ]
        }))
        .unwrap();

        let normalized = OpenRouterService::normalize_response(resp).unwrap();
        assert_eq!(normalized.message, Message::assistant(""));
        assert!(normalized.truncated());
    }

    #[test]
    fn test_no_choices_is_error() {
        let resp: ChatCompletionResponse =
            serde_json::from_value(json!({ "choices": [] })).unwrap();
        let err = OpenRouterService::normalize_response(resp).unwrap_err();
        assert_eq!(err.kind, LlmErrorKind::Unknown);
    }
}
