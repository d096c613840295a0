//! Tool executor step - runs exactly one tool invocation
//!
//! Executes the first tool call of the most recent assistant turn and folds
//! the result (or failure) into the conversation as a tool-result message.
//! Nothing raised by a tool escapes this step.

use std::sync::Arc;

use crate::agent::state::{ConversationState, FINISH};
use crate::core::Message;
use crate::tools::ToolRegistry;

/// Executes tool calls proposed by the router
pub struct ToolExecutorStep {
    tools: Arc<ToolRegistry>,
}

impl ToolExecutorStep {
    pub fn new(tools: Arc<ToolRegistry>) -> Self {
        Self { tools }
    }

    /// Record a dispatch failure and force early summarization
    fn dispatch_failure(state: &mut ConversationState, message: &str) {
        tracing::error!("{}", message);
        state.tool_results.clear();
        state
            .tool_results
            .insert("error".to_string(), serde_json::json!(message));
        state.next_node = Some(FINISH.to_string());
    }

    /// Execute the pending tool call, appending its result to the history
    /// and returning control to the router.
    pub async fn run(&self, state: &mut ConversationState) {
        let Some(last_call_message) = state.last_tool_call_message().cloned() else {
            Self::dispatch_failure(state, "No tool calls found in previous assistant message");
            return;
        };

        let calls = last_call_message.tool_calls.unwrap_or_default();
        let Some(call) = calls.into_iter().next() else {
            Self::dispatch_failure(state, "Assistant message has an empty tool call list");
            return;
        };

        if call.name.is_empty() {
            Self::dispatch_failure(state, "Tool call is missing a name");
            return;
        }

        if !self.tools.contains(&call.name) {
            Self::dispatch_failure(state, &format!("Tool '{}' not found", call.name));
            return;
        }

        tracing::info!(tool = %call.name, args = %call.arguments, "executing tool");
        let result = self.tools.execute(&call).await;

        let value = if result.success {
            result
                .data
                .clone()
                .unwrap_or_else(|| serde_json::json!(result.output))
        } else {
            serde_json::json!({ "error": result.output })
        };
        // One entry per step; results of earlier steps already live in the
        // message history as tool-result messages.
        state.tool_results.clear();
        state.tool_results.insert(call.name.clone(), value);

        // Correlate the result with the originating call; generate an id
        // locally when the backend did not supply one.
        let call_id = call.id.clone().unwrap_or_else(|| {
            format!("tool_call_{}_{:08x}", call.name, rand::random::<u32>())
        });
        state
            .messages
            .push(Message::tool(result.output, call_id));

        // Consumed; the controller hands control back to the router.
        state.next_node = None;
    }
}
