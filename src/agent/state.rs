//! Conversation state threaded through the planning loop
//!
//! One instance per session; every loop step reads and mutates it.

use std::collections::HashMap;

use crate::core::Message;

/// Sentinel value of `next_node` meaning "stop routing, summarize"
pub const FINISH: &str = "finish";

/// Mutable state of one conversation
#[derive(Debug, Clone, Default)]
pub struct ConversationState {
    /// Ordered message history; this is the LLM's context window
    pub messages: Vec<Message>,
    /// Last finalized travel plan, if any
    pub current_plan: Option<String>,
    /// Router evaluation budget consumed by the current invocation
    pub max_iterations: u32,
    /// Name of the tool to invoke next, or the finish sentinel; transient,
    /// only meaningful between a router step and the step that consumes it
    pub next_node: Option<String>,
    /// Result or error of the most recent executor step, at most one entry;
    /// cleared by every summarizer step
    pub tool_results: HashMap<String, serde_json::Value>,
}

impl ConversationState {
    /// Create a fresh conversation state
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a user message
    pub fn push_user(&mut self, content: impl Into<String>) {
        self.messages.push(Message::user(content));
    }

    /// The first user message of the conversation, if any
    pub fn first_user_message(&self) -> Option<&Message> {
        self.messages.iter().find(|m| m.role == "user")
    }

    /// The most recent assistant message carrying tool calls, if any
    pub fn last_tool_call_message(&self) -> Option<&Message> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == "assistant" && m.tool_calls.is_some())
    }

    /// Content of the last message, if any
    pub fn last_content(&self) -> Option<&str> {
        self.messages.last().map(|m| m.content.as_str())
    }
}
