//! Summarizer step - produces the final natural-language answer
//!
//! Always the terminal step of an invocation. Tool results already live in
//! the message history as tool-result messages, so only the history is sent.

use std::sync::Arc;

use crate::agent::state::ConversationState;
use crate::core::Message;
use crate::llm::LlmProvider;

const SUMMARIZER_SYSTEM_PROMPT: &str = "\
You are a travel-planning assistant. Based on the conversation history and \
all tool results, produce a natural-language answer:
- If there are tool results, base your answer on them, combined with the \
user's earlier questions, and answer in detail.
- If there are no tool results, answer the user's question directly, or say \
that the requested information could not be obtained.
- Keep the answer clear and friendly, and do not expose the internal tool \
invocation process.
- If the user asked for a travel plan, produce a detailed itinerary.
- Orient the answer around the user's original intent, summarizing all \
available information.";

/// Marker pair identifying a plan-generation request
const PLAN_MARKERS: (&str, &str) = ("generate", "travel plan");

/// Produces the final answer and maintains the stored plan
pub struct SummarizerStep {
    llm: Arc<dyn LlmProvider>,
}

impl SummarizerStep {
    pub fn new(llm: Arc<dyn LlmProvider>) -> Self {
        Self { llm }
    }

    /// Whether the first user message of the conversation asked for a plan
    fn is_plan_request(state: &ConversationState) -> bool {
        state
            .first_user_message()
            .map(|m| {
                let text = m.content.to_lowercase();
                text.contains(PLAN_MARKERS.0) && text.contains(PLAN_MARKERS.1)
            })
            .unwrap_or(false)
    }

    /// Summarize the conversation, appending the answer and updating
    /// `current_plan` when this turn was a plan-generation request.
    pub async fn run(&self, state: &mut ConversationState) {
        let mut request = Vec::with_capacity(state.messages.len() + 1);
        request.push(Message::system(SUMMARIZER_SYSTEM_PROMPT));
        request.extend(state.messages.iter().cloned());

        match self.llm.chat(&request, None).await {
            Ok(response) => {
                state.messages.push(Message::assistant(&response.content));
                if Self::is_plan_request(state) {
                    state.current_plan = Some(response.content);
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "summarizer LLM call failed");
                state.messages.push(Message::assistant(format!(
                    "I could not produce a final answer: {}",
                    e
                )));
            }
        }

        // Result data is already folded into the history; stale entries
        // must not leak into the next turn.
        state.tool_results.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_request_detection() {
        let mut state = ConversationState::new();
        state.push_user("Generate a 3-day travel plan:\n- Destination: Kyoto");
        assert!(SummarizerStep::is_plan_request(&state));
    }

    #[test]
    fn test_plain_question_is_not_a_plan_request() {
        let mut state = ConversationState::new();
        state.push_user("What is the weather like in Kyoto?");
        assert!(!SummarizerStep::is_plan_request(&state));
    }

    #[test]
    fn test_first_user_message_decides() {
        let mut state = ConversationState::new();
        state.push_user("What is the weather like?");
        state.push_user("Please generate a travel plan too");
        assert!(!SummarizerStep::is_plan_request(&state));
    }
}
