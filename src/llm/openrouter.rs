//! OpenRouter API client implementation.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::error::LlmError;
use super::{ChatMessage, ChatResponse, LlmClient, TokenUsage, ToolCall, ToolDefinition};
use crate::models::ModelProfile;

const OPENROUTER_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

/// OpenRouter chat-completions client.
///
/// Bound at construction to one model identifier and one output token
/// ceiling; the ceiling is sent as `max_tokens` on every request. Constructing
/// a client performs no network I/O.
pub struct OpenRouterClient {
    client: Client,
    api_key: String,
    model: String,
    max_output_tokens: u64,
}

impl OpenRouterClient {
    /// Create a client for a registry profile.
    pub fn new(profile: &ModelProfile, api_key: impl Into<String>) -> Self {
        Self::for_model(profile.model_id, api_key, profile.max_output_tokens)
    }

    /// Create a client for an arbitrary model identifier.
    ///
    /// Used for ad hoc `LLM_MODEL` overrides; the caller supplies the ceiling.
    pub fn for_model(
        model: impl Into<String>,
        api_key: impl Into<String>,
        max_output_tokens: u64,
    ) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            max_output_tokens,
        }
    }

    /// Output token ceiling applied to every request.
    pub fn max_output_tokens(&self) -> u64 {
        self.max_output_tokens
    }

    /// Model identifier on the wire.
    ///
    /// Registry identifiers use the `openrouter/<provider>/<model>` routing
    /// form; the API itself expects the bare `<provider>/<model>` id.
    fn wire_model(&self) -> &str {
        self.model
            .strip_prefix("openrouter/")
            .unwrap_or(&self.model)
    }

    async fn execute_request(&self, request: &OpenRouterRequest<'_>) -> Result<ChatResponse, LlmError> {
        let response = match self
            .client
            .post(OPENROUTER_API_URL)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .header("HTTP-Referer", "https://github.com/agent-runner")
            .header("X-Title", "Agent Runner")
            .json(request)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                if e.is_timeout() {
                    return Err(LlmError::network_error(format!("Request timeout: {}", e)));
                } else if e.is_connect() {
                    return Err(LlmError::network_error(format!("Connection failed: {}", e)));
                } else {
                    return Err(LlmError::network_error(format!("Request failed: {}", e)));
                }
            }
        };

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if !status.is_success() {
            return Err(LlmError::from_status(status.as_u16(), body));
        }

        let parsed: OpenRouterResponse = serde_json::from_str(&body).map_err(|e| {
            LlmError::parse_error(format!("Failed to parse response: {}, body: {}", e, body))
        })?;

        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::parse_error("No choices in response".to_string()))?;

        Ok(ChatResponse {
            content: choice.message.content,
            tool_calls: choice.message.tool_calls,
            finish_reason: choice.finish_reason,
            usage: parsed
                .usage
                .map(|u| TokenUsage::new(u.prompt_tokens, u.completion_tokens)),
            model: parsed.model.or_else(|| Some(self.model.clone())),
        })
    }
}

#[async_trait]
impl LlmClient for OpenRouterClient {
    fn model(&self) -> &str {
        &self.model
    }

    async fn chat_completion(
        &self,
        messages: &[ChatMessage],
        tools: Option<&[ToolDefinition]>,
    ) -> anyhow::Result<ChatResponse> {
        let request = OpenRouterRequest {
            model: self.wire_model(),
            messages,
            tools,
            tool_choice: tools.map(|_| "auto"),
            max_tokens: self.max_output_tokens,
        };

        tracing::debug!("Sending request to OpenRouter: model={}", request.model);

        self.execute_request(&request).await.map_err(|e| {
            tracing::error!("OpenRouter request failed: {}", e);
            anyhow::anyhow!("{}", e)
        })
    }
}

/// OpenRouter API request format.
#[derive(Debug, Serialize)]
struct OpenRouterRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<&'a [ToolDefinition]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<&'a str>,
    max_tokens: u64,
}

/// OpenRouter API response format.
#[derive(Debug, Deserialize)]
struct OpenRouterResponse {
    choices: Vec<OpenRouterChoice>,
    #[serde(default)]
    usage: Option<OpenRouterUsage>,
    #[serde(default)]
    model: Option<String>,
}

/// A choice in the OpenRouter response.
#[derive(Debug, Deserialize)]
struct OpenRouterChoice {
    message: OpenRouterMessage,
    finish_reason: Option<String>,
}

/// Message in an OpenRouter response.
#[derive(Debug, Deserialize)]
struct OpenRouterMessage {
    content: Option<String>,
    tool_calls: Option<Vec<ToolCall>>,
}

/// Usage data (OpenAI-compatible).
#[derive(Debug, Deserialize)]
struct OpenRouterUsage {
    prompt_tokens: u64,
    completion_tokens: u64,
}
