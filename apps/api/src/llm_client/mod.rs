/// LLM Client — the single point of entry for all completion calls in Blog Agent.
///
/// ARCHITECTURAL RULE: No other module may call the completion API directly.
/// Pipelines depend on the `CompletionService` trait; `LlmClient` is the
/// production implementation carried in `AppState`.
///
/// Models are hardcoded per profile (see `ModelProfile`) to prevent drift.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;
#[cfg(test)]
pub mod testing;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
/// Model used for writing, planning, reviewing and revising.
pub const MODEL: &str = "gpt-4o-2024-11-20";
/// Cheaper model used for short extraction calls.
pub const MINI_MODEL: &str = "gpt-4o-mini";
/// Sampling temperature shared by every call.
pub const TEMPERATURE: f32 = 0.52;
const MAX_RETRIES: u32 = 3;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("LLM returned empty content")]
    EmptyContent,
}

// ────────────────────────────────────────────────────────────────────────────
// Request model
// ────────────────────────────────────────────────────────────────────────────

/// Model + sampling limits for a single call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelProfile {
    pub model: &'static str,
    pub temperature: f32,
    pub max_completion_tokens: u32,
}

impl ModelProfile {
    pub const fn standard(max_completion_tokens: u32) -> Self {
        Self {
            model: MODEL,
            temperature: TEMPERATURE,
            max_completion_tokens,
        }
    }

    pub const fn mini(max_completion_tokens: u32) -> Self {
        Self {
            model: MINI_MODEL,
            temperature: TEMPERATURE,
            max_completion_tokens,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One message of a conversation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    Text,
    Json,
}

/// A structured prompt: system instructions, the rendered user variables,
/// and any prior turns (earlier sections, rejected replies, corrections).
///
/// `history` is sent after the user message, in order.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub profile: ModelProfile,
    pub system: String,
    pub user: String,
    pub history: Vec<Turn>,
    pub format: ResponseFormat,
}

impl CompletionRequest {
    pub fn new(profile: ModelProfile, system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            profile,
            system: system.into(),
            user: user.into(),
            history: Vec::new(),
            format: ResponseFormat::Text,
        }
    }

    /// Switches the request to JSON-object mode.
    pub fn json(mut self) -> Self {
        self.format = ResponseFormat::Json;
        self
    }

    pub fn with_turn(mut self, turn: Turn) -> Self {
        self.history.push(turn);
        self
    }

    /// All turns in wire order: system, user, then history.
    pub fn turns(&self) -> Vec<Turn> {
        let mut turns = Vec::with_capacity(self.history.len() + 2);
        turns.push(Turn {
            role: Role::System,
            content: self.system.clone(),
        });
        turns.push(Turn::user(self.user.clone()));
        turns.extend(self.history.iter().cloned());
        turns
    }
}

/// The completion seam. Implement this to swap backends (or script replies
/// in tests) without touching pipeline code.
///
/// Carried in `AppState` as `Arc<dyn CompletionService>`.
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Returns the model's reply text.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError>;
}

/// Calls the service and deserializes the reply as JSON of shape `T`.
/// A reply that does not match `T` is an error, never coerced.
pub async fn complete_json<T: DeserializeOwned>(
    llm: &dyn CompletionService,
    request: &CompletionRequest,
) -> Result<T, LlmError> {
    let text = llm.complete(request).await?;
    parse_json(&text)
}

/// Parses a model reply as JSON, tolerating markdown code fences.
pub fn parse_json<T: DeserializeOwned>(text: &str) -> Result<T, LlmError> {
    serde_json::from_str(strip_json_fences(text)).map_err(LlmError::Parse)
}

// ────────────────────────────────────────────────────────────────────────────
// OpenAI Chat Completions wire types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    max_completion_tokens: u32,
    messages: Vec<Turn>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ChatResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ChatResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<Choice>,
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl ChatResponse {
    /// Extracts the text of the first choice.
    pub fn text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .filter(|t| !t.trim().is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// The production completion client.
/// Wraps the Chat Completions API with retry logic on 429/5xx.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl LlmClient {
    pub fn new(api_key: String, base_url: Option<String>, timeout: Duration) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            api_key,
            base_url: base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    /// Makes a raw call, returning the full response object.
    /// Retries on 429 (rate limit) and 5xx errors with exponential backoff.
    pub async fn call(&self, request: &CompletionRequest) -> Result<ChatResponse, LlmError> {
        let request_body = ChatRequest {
            model: request.profile.model,
            temperature: request.profile.temperature,
            max_completion_tokens: request.profile.max_completion_tokens,
            messages: request.turns(),
            response_format: match request.format {
                ResponseFormat::Json => Some(ChatResponseFormat {
                    format_type: "json_object",
                }),
                ResponseFormat::Text => None,
            },
        };
        let endpoint = self.endpoint();

        let mut last_error: Option<LlmError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s
                let delay = Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "LLM call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(&endpoint)
                .bearer_auth(&self.api_key)
                .json(&request_body)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(LlmError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("LLM API returned {}: {}", status, body);
                last_error = Some(LlmError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<ApiError>(&body)
                    .map(|e| e.error.message)
                    .unwrap_or(body);
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let chat_response: ChatResponse = response.json().await?;

            if let Some(usage) = &chat_response.usage {
                debug!(
                    model = request.profile.model,
                    "LLM call succeeded: prompt_tokens={}, completion_tokens={}",
                    usage.prompt_tokens,
                    usage.completion_tokens
                );
            }
            if let Some(reason) = chat_response.choices.first().and_then(|c| c.finish_reason.as_deref()) {
                if reason == "length" {
                    warn!(model = request.profile.model, "LLM reply was cut off by max_completion_tokens");
                }
            }

            return Ok(chat_response);
        }

        Err(last_error.unwrap_or(LlmError::RateLimited {
            retries: MAX_RETRIES,
        }))
    }
}

#[async_trait]
impl CompletionService for LlmClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        let response = self.call(request).await?;
        response
            .text()
            .map(str::to_string)
            .ok_or(LlmError::EmptyContent)
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Shape {
        restaurant: String,
    }

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "{\"key\": \"value\"}";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_parse_json_rejects_wrong_shape() {
        let result: Result<Shape, _> = parse_json(r#"{"name": "소고기 천국"}"#);
        assert!(matches!(result, Err(LlmError::Parse(_))));
    }

    #[test]
    fn test_parse_json_accepts_fenced_reply() {
        let shape: Shape = parse_json("```json\n{\"restaurant\": \"소고기 천국\"}\n```").unwrap();
        assert_eq!(shape.restaurant, "소고기 천국");
    }

    #[test]
    fn test_turns_are_system_user_then_history() {
        let request = CompletionRequest::new(ModelProfile::standard(100), "sys", "hello")
            .with_turn(Turn::assistant("draft"))
            .with_turn(Turn::user("too short"));

        let roles: Vec<Role> = request.turns().iter().map(|t| t.role).collect();
        assert_eq!(
            roles,
            vec![Role::System, Role::User, Role::Assistant, Role::User]
        );
        assert_eq!(request.turns()[3].content, "too short");
    }

    #[test]
    fn test_chat_request_serializes_json_mode() {
        let request = CompletionRequest::new(ModelProfile::mini(100), "sys", "hi").json();
        let body = ChatRequest {
            model: request.profile.model,
            temperature: request.profile.temperature,
            max_completion_tokens: request.profile.max_completion_tokens,
            messages: request.turns(),
            response_format: Some(ChatResponseFormat {
                format_type: "json_object",
            }),
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["model"], MINI_MODEL);
        assert_eq!(value["response_format"]["type"], "json_object");
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][1]["content"], "hi");
    }

    #[test]
    fn test_chat_response_text_skips_blank_content() {
        let json = r#"{"choices":[{"message":{"content":"   "},"finish_reason":"stop"}],"usage":null}"#;
        let response: ChatResponse = serde_json::from_str(json).unwrap();
        assert!(response.text().is_none());
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = LlmClient::new(
            "key".to_string(),
            Some("http://localhost:9000/v1/".to_string()),
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(client.endpoint(), "http://localhost:9000/v1/chat/completions");
    }
}
