//! Shared test doubles for the loop and API tests

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use itinera::core::{Message, PlannerError, Result, ToolCall, ToolDefinition, ToolResult};
use itinera::llm::{GenerateOptions, LlmProvider, LlmResponse};
use itinera::tools::Tool;

/// An LLM stub that replays scripted responses
///
/// Router evaluations consume the `router` queue (via `chat_with_tools`),
/// summarizer calls consume the `summarizer` queue (via `chat`). When the
/// router queue runs dry the stub either answers with plain text or, in
/// misbehaving mode, keeps proposing the same tool call forever.
pub struct ScriptedLlm {
    router: Mutex<VecDeque<Result<LlmResponse>>>,
    summarizer: Mutex<VecDeque<Result<LlmResponse>>>,
    misbehave: Option<ToolCall>,
    pub router_calls: AtomicUsize,
    pub summarizer_calls: AtomicUsize,
    pub summarizer_requests: Mutex<Vec<Vec<Message>>>,
    pub router_requests: Mutex<Vec<Vec<Message>>>,
}

impl ScriptedLlm {
    pub fn new(
        router: Vec<Result<LlmResponse>>,
        summarizer: Vec<Result<LlmResponse>>,
    ) -> Self {
        Self {
            router: Mutex::new(router.into()),
            summarizer: Mutex::new(summarizer.into()),
            misbehave: None,
            router_calls: AtomicUsize::new(0),
            summarizer_calls: AtomicUsize::new(0),
            summarizer_requests: Mutex::new(Vec::new()),
            router_requests: Mutex::new(Vec::new()),
        }
    }

    /// A stub that proposes `call` on every router evaluation, forever
    pub fn misbehaving(call: ToolCall, summarizer_text: &str) -> Self {
        let mut stub = Self::new(vec![], vec![Ok(LlmResponse::text(summarizer_text))]);
        stub.misbehave = Some(call);
        stub
    }

    /// Convenience: a router response proposing a single tool call
    pub fn tool_response(name: &str, arguments: serde_json::Value) -> Result<LlmResponse> {
        Ok(LlmResponse {
            content: String::new(),
            tool_calls: vec![ToolCall::new(name, arguments)],
            usage: None,
            model: String::new(),
        })
    }

    /// Convenience: a plain-text response
    pub fn text_response(text: &str) -> Result<LlmResponse> {
        Ok(LlmResponse::text(text))
    }

    /// Convenience: a failed LLM call
    pub fn error_response(message: &str) -> Result<LlmResponse> {
        Err(PlannerError::llm(message))
    }
}

#[async_trait]
impl LlmProvider for ScriptedLlm {
    async fn chat(
        &self,
        messages: &[Message],
        _options: Option<GenerateOptions>,
    ) -> Result<LlmResponse> {
        self.summarizer_calls.fetch_add(1, Ordering::SeqCst);
        self.summarizer_requests
            .lock()
            .unwrap()
            .push(messages.to_vec());
        self.summarizer
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(LlmResponse::text("(no answer)")))
    }

    async fn chat_with_tools(
        &self,
        messages: &[Message],
        _tools: &[ToolDefinition],
        _options: Option<GenerateOptions>,
    ) -> Result<LlmResponse> {
        self.router_calls.fetch_add(1, Ordering::SeqCst);
        self.router_requests.lock().unwrap().push(messages.to_vec());
        if let Some(response) = self.router.lock().unwrap().pop_front() {
            return response;
        }
        if let Some(ref call) = self.misbehave {
            return Ok(LlmResponse {
                content: String::new(),
                tool_calls: vec![call.clone()],
                usage: None,
                model: String::new(),
            });
        }
        Ok(LlmResponse::text(""))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// A tool stub with a fixed outcome
pub struct StubTool {
    name: String,
    succeed: bool,
    payload: serde_json::Value,
    pub calls: AtomicUsize,
}

impl StubTool {
    pub fn ok(name: &str, payload: serde_json::Value) -> Self {
        Self {
            name: name.to_string(),
            succeed: true,
            payload,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(name: &str, error: &str) -> Self {
        Self {
            name: name.to_string(),
            succeed: false,
            payload: serde_json::json!(error),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl Tool for StubTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition::function(
            self.name.clone(),
            "stub",
            serde_json::json!({"type": "object", "properties": {}}),
        )
    }

    async fn invoke(&self, _arguments: &serde_json::Value) -> ToolResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.succeed {
            ToolResult::success_with_data(&self.name, self.payload.to_string(), self.payload.clone())
        } else {
            ToolResult::failure(
                &self.name,
                self.payload.as_str().unwrap_or("stub failure").to_string(),
            )
        }
    }
}
