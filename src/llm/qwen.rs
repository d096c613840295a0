//! Qwen client implementation
//!
//! Async HTTP client for the DashScope compatible-mode (OpenAI-style)
//! chat-completions API, with tool calling support.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::core::{Config, Message, PlannerError, Result, ToolCall, ToolDefinition};
use crate::llm::traits::{GenerateOptions, LlmProvider, LlmResponse, TokenUsage};

/// Qwen API client (OpenAI-compatible wire format)
#[derive(Clone)]
pub struct QwenClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    default_temperature: f32,
    default_max_tokens: u32,
    debug: bool,
}

/// Chat completions request
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ApiMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<&'a [ToolDefinition]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

/// Message in the OpenAI-compatible wire format
#[derive(Debug, Serialize, Deserialize)]
struct ApiMessage {
    role: String,
    #[serde(default)]
    content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<ApiToolCall>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
}

/// Tool call in the OpenAI-compatible wire format
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ApiToolCall {
    #[serde(default)]
    id: Option<String>,
    #[serde(rename = "type")]
    call_type: String,
    function: ApiFunctionCall,
}

/// Function payload of a tool call; arguments arrive JSON-encoded as a string
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ApiFunctionCall {
    name: String,
    arguments: String,
}

/// Chat completions response
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    #[serde(default)]
    model: String,
    #[serde(default)]
    usage: Option<ApiUsage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ApiMessage,
}

#[derive(Debug, Deserialize)]
struct ApiUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
    #[serde(default)]
    total_tokens: u32,
}

impl QwenClient {
    /// Create a new Qwen client from configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.llm.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.llm.base_url.trim_end_matches('/').to_string(),
            api_key: config.llm.api_key.clone(),
            model: config.llm.model.clone(),
            default_temperature: config.llm.temperature,
            default_max_tokens: config.llm.max_tokens,
            debug: config.agent.debug,
        })
    }

    /// Create a client with a custom base URL (used by tests)
    pub fn with_base_url(base_url: impl Into<String>, model: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: String::new(),
            model: model.into(),
            default_temperature: 0.1,
            default_max_tokens: 2048,
            debug: false,
        })
    }

    /// Convert internal Message to the wire format
    fn to_api_message(msg: &Message) -> ApiMessage {
        ApiMessage {
            role: msg.role.clone(),
            content: Some(msg.content.clone()),
            tool_calls: msg.tool_calls.as_ref().map(|calls| {
                calls
                    .iter()
                    .map(|tc| ApiToolCall {
                        id: tc.id.clone(),
                        call_type: "function".to_string(),
                        function: ApiFunctionCall {
                            name: tc.name.clone(),
                            arguments: tc.arguments.to_string(),
                        },
                    })
                    .collect()
            }),
            tool_call_id: msg.tool_call_id.clone(),
        }
    }

    /// Convert a wire response to LlmResponse
    fn to_llm_response(response: ChatResponse) -> Result<LlmResponse> {
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| PlannerError::llm("Response contained no choices"))?;

        let tool_calls = choice
            .message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(|tc| {
                // Arguments are a JSON-encoded string; a malformed payload
                // becomes an empty object rather than a hard failure.
                let arguments = serde_json::from_str(&tc.function.arguments)
                    .unwrap_or_else(|_| serde_json::json!({}));
                ToolCall {
                    id: tc.id,
                    name: tc.function.name,
                    arguments,
                }
            })
            .collect();

        let usage = response.usage.map(|u| TokenUsage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        });

        Ok(LlmResponse {
            content: choice.message.content.unwrap_or_default(),
            tool_calls,
            usage,
            model: response.model,
        })
    }

    /// Debug print if enabled
    fn debug_print(&self, label: &str, content: &str) {
        if self.debug {
            let cut = truncate_for_log(content, 500);
            if cut.len() < content.len() {
                tracing::debug!("{}: {}...", label, cut);
            } else {
                tracing::debug!("{}: {}", label, content);
            }
        }
    }

    async fn send_chat(&self, request: &ChatRequest<'_>) -> Result<LlmResponse> {
        let request_json = serde_json::to_string(request)?;
        self.debug_print("Request", &request_json);

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() || e.is_timeout() {
                    PlannerError::llm(format!(
                        "Cannot reach LLM backend at {}: {}",
                        self.base_url, e
                    ))
                } else {
                    PlannerError::from(e)
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(PlannerError::llm(format!(
                "LLM API error ({}): {}",
                status, error_text
            )));
        }

        let response_text = response.text().await?;
        self.debug_print("Response", &response_text);

        let chat_response: ChatResponse = serde_json::from_str(&response_text)
            .map_err(|e| PlannerError::llm(format!("Failed to parse response: {}", e)))?;

        Self::to_llm_response(chat_response)
    }
}

/// Truncate to at most `max` bytes without splitting a character
fn truncate_for_log(content: &str, max: usize) -> &str {
    if content.len() <= max {
        return content;
    }
    let mut end = max;
    while !content.is_char_boundary(end) {
        end -= 1;
    }
    &content[..end]
}

#[async_trait]
impl LlmProvider for QwenClient {
    async fn chat(
        &self,
        messages: &[Message],
        options: Option<GenerateOptions>,
    ) -> Result<LlmResponse> {
        let options = options.unwrap_or_default();
        let request = ChatRequest {
            model: &self.model,
            messages: messages.iter().map(Self::to_api_message).collect(),
            tools: None,
            temperature: options.temperature.or(Some(self.default_temperature)),
            max_tokens: options.max_tokens.or(Some(self.default_max_tokens)),
        };

        self.send_chat(&request).await
    }

    async fn chat_with_tools(
        &self,
        messages: &[Message],
        tools: &[ToolDefinition],
        options: Option<GenerateOptions>,
    ) -> Result<LlmResponse> {
        let options = options.unwrap_or_default();
        let request = ChatRequest {
            model: &self.model,
            messages: messages.iter().map(Self::to_api_message).collect(),
            tools: Some(tools),
            temperature: options.temperature.or(Some(self.default_temperature)),
            max_tokens: options.max_tokens.or(Some(self.default_max_tokens)),
        };

        self.send_chat(&request).await
    }

    fn name(&self) -> &str {
        "qwen"
    }
}
