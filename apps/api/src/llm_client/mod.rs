/// LLM Client — the single point of entry for all generative-model calls.
///
/// ARCHITECTURAL RULE: no other module may call the Anthropic API directly.
/// All model interactions go through `CompletionProvider`, so the generation
/// pipeline can be exercised against a test double.
///
/// Model: claude-sonnet-4-5 (hardcoded — do not make configurable to prevent drift)
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
/// The model used for all LLM calls.
pub const MODEL: &str = "claude-sonnet-4-5";

/// Provider failures, categorized so callers can produce differentiated
/// user-facing status: connection problems map to 503, rate limits to 429,
/// anything else is a provider fault.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("failed to connect to model API: {0}")]
    ConnectionFailed(#[from] reqwest::Error),

    #[error("model API rate limit exceeded")]
    RateLimited,

    #[error("model API returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("model returned empty content")]
    EmptyContent,
}

/// A generative text provider. One prompt in, one completion out; every
/// failure is a categorized `LlmError`, never a panic.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(
        &self,
        prompt: &str,
        system: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: Vec<AnthropicMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
    usage: Usage,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    input_tokens: u32,
    output_tokens: u32,
}

impl MessagesResponse {
    /// Extracts the text content from the first text block.
    fn text(&self) -> Option<&str> {
        self.content
            .iter()
            .find(|b| b.block_type == "text")
            .and_then(|b| b.text.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct AnthropicError {
    error: AnthropicErrorBody,
}

#[derive(Debug, Deserialize)]
struct AnthropicErrorBody {
    message: String,
}

/// Anthropic Messages API client. Cheap to clone; constructed once at startup.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
}

impl LlmClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
        }
    }
}

#[async_trait]
impl CompletionProvider for LlmClient {
    /// Makes a single call to the Messages API and returns the trimmed text.
    ///
    /// One attempt per call: retry policy belongs to the caller, which may be
    /// fanning out over many angles and budgeting one model call per angle.
    async fn complete(
        &self,
        prompt: &str,
        system: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String, LlmError> {
        let request_body = AnthropicRequest {
            model: MODEL,
            max_tokens,
            temperature,
            system,
            messages: vec![AnthropicMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(ANTHROPIC_API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();

        if status.as_u16() == 429 {
            return Err(LlmError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            // Surface the API's own error message when the body parses
            let message = serde_json::from_str::<AnthropicError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        parse_success_body(status.as_u16(), &body)
    }
}

/// Decodes a success-status Messages API body into the completion text.
///
/// A 2xx response whose body does not decode is a provider-payload fault and
/// maps to `Status`, never `ConnectionFailed`.
fn parse_success_body(status: u16, body: &str) -> Result<String, LlmError> {
    let parsed: MessagesResponse =
        serde_json::from_str(body).map_err(|e| LlmError::Status {
            status,
            message: format!("response body could not be decoded: {e}"),
        })?;

    debug!(
        "LLM call succeeded: input_tokens={}, output_tokens={}",
        parsed.usage.input_tokens, parsed.usage.output_tokens
    );

    let text = parsed.text().ok_or(LlmError::EmptyContent)?;
    Ok(text.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_text_returns_first_text_block() {
        let response = MessagesResponse {
            content: vec![
                ContentBlock {
                    block_type: "thinking".to_string(),
                    text: None,
                },
                ContentBlock {
                    block_type: "text".to_string(),
                    text: Some("the draft".to_string()),
                },
            ],
            usage: Usage {
                input_tokens: 10,
                output_tokens: 5,
            },
        };
        assert_eq!(response.text(), Some("the draft"));
    }

    #[test]
    fn response_text_is_none_without_text_block() {
        let response = MessagesResponse {
            content: vec![],
            usage: Usage {
                input_tokens: 0,
                output_tokens: 0,
            },
        };
        assert_eq!(response.text(), None);
    }

    #[test]
    fn messages_response_deserializes_from_api_shape() {
        let json = r#"{
            "content": [{"type": "text", "text": "Generated post body"}],
            "usage": {"input_tokens": 120, "output_tokens": 80}
        }"#;
        let parsed: MessagesResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.text(), Some("Generated post body"));
        assert_eq!(parsed.usage.output_tokens, 80);
    }

    #[test]
    fn success_body_decodes_to_trimmed_text() {
        let body = r#"{
            "content": [{"type": "text", "text": "  the draft  "}],
            "usage": {"input_tokens": 1, "output_tokens": 2}
        }"#;
        assert_eq!(parse_success_body(200, body).unwrap(), "the draft");
    }

    #[test]
    fn undecodable_success_body_is_a_status_error() {
        let err = parse_success_body(200, "<html>upstream proxy page</html>").unwrap_err();
        match err {
            LlmError::Status { status, message } => {
                assert_eq!(status, 200);
                assert!(message.contains("could not be decoded"));
            }
            other => panic!("expected Status, got {other:?}"),
        }
    }

    #[test]
    fn success_body_without_text_block_is_empty_content() {
        let body = r#"{"content": [], "usage": {"input_tokens": 1, "output_tokens": 0}}"#;
        assert!(matches!(
            parse_success_body(200, body),
            Err(LlmError::EmptyContent)
        ));
    }

    #[test]
    fn request_serializes_with_temperature() {
        let request = AnthropicRequest {
            model: MODEL,
            max_tokens: 1500,
            temperature: 0.75,
            system: "sys",
            messages: vec![AnthropicMessage {
                role: "user",
                content: "hello",
            }],
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["temperature"], 0.75);
        assert_eq!(value["max_tokens"], 1500);
        assert_eq!(value["messages"][0]["role"], "user");
    }
}
