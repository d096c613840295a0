//! Router step - decides whether to call a tool or finish
//!
//! Asks the LLM, with the full tool registry in scope, whether the
//! conversation needs more data or can be answered. Every failure path
//! degrades to the summarizer; this step never returns an error.

use std::sync::Arc;

use crate::agent::state::{ConversationState, FINISH};
use crate::core::Message;
use crate::llm::LlmProvider;
use crate::tools::ToolRegistry;

const ROUTER_SYSTEM_PROMPT: &str = "\
You are a decision-making assistant for a travel planner. Analyze the user's \
request and the conversation so far, and decide whether an external tool is \
needed to gather information.

If a tool is needed, call the appropriate tool with all required arguments.
If no tool is needed, or the available information is already sufficient, \
reply to the user directly in natural language.

Keep in mind:
- Consider the latest progress of the conversation and the user's intent at \
every decision.
- Your goal is to satisfy the user's travel-planning request effectively.";

const BUDGET_EXHAUSTED_MESSAGE: &str = "\
It looks like I have tried many times without completing the task. I will \
summarize the information gathered so far and give a best-effort answer.";

/// Decides the next node for the loop controller
pub struct RouterStep {
    llm: Arc<dyn LlmProvider>,
    tools: Arc<ToolRegistry>,
    max_iterations: u32,
}

impl RouterStep {
    pub fn new(llm: Arc<dyn LlmProvider>, tools: Arc<ToolRegistry>, max_iterations: u32) -> Self {
        Self {
            llm,
            tools,
            max_iterations,
        }
    }

    /// Evaluate the router once, setting `state.next_node` and appending the
    /// LLM's response (or a synthetic fallback) to the history.
    pub async fn run(&self, state: &mut ConversationState) {
        if state.max_iterations >= self.max_iterations {
            tracing::warn!(
                iterations = state.max_iterations,
                "iteration budget exhausted, forcing summarizer"
            );
            state.next_node = Some(FINISH.to_string());
            // Without any proposed tool call there is nothing for the
            // summarizer to lean on; tell it to answer best-effort.
            if !state.messages.iter().any(|m| m.has_tool_calls()) {
                state
                    .messages
                    .push(Message::assistant(BUDGET_EXHAUSTED_MESSAGE));
            }
            return;
        }
        // Each evaluation consumes one unit of the budget, so a single
        // invocation terminates no matter what the LLM keeps proposing.
        state.max_iterations += 1;

        let mut request = Vec::with_capacity(state.messages.len() + 1);
        request.push(Message::system(ROUTER_SYSTEM_PROMPT));
        request.extend(state.messages.iter().cloned());

        let definitions = self.tools.definitions();

        match self.llm.chat_with_tools(&request, &definitions, None).await {
            Ok(response) => {
                // Only the first proposed call is honored per iteration.
                let next = match response.tool_calls.first() {
                    Some(call) if !call.name.is_empty() => call.name.clone(),
                    Some(_) => {
                        tracing::warn!("tool call without a name, forcing summarizer");
                        FINISH.to_string()
                    }
                    None => FINISH.to_string(),
                };

                state.messages.push(Message::assistant_with_tools(
                    response.content,
                    response.tool_calls,
                ));
                state.next_node = Some(next);
            }
            Err(e) => {
                tracing::error!(error = %e, "router LLM call failed");
                state.messages.push(Message::assistant(format!(
                    "An error occurred while deciding the next step: {}. I will \
                     try to summarize the information available so far.",
                    e
                )));
                state.next_node = Some(FINISH.to_string());
            }
        }
    }
}
