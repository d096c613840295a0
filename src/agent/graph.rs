//! Loop controller - sequences router, tool executor, and summarizer
//!
//! A three-node state machine: the router decides, the executor runs one
//! tool and hands control back, the summarizer terminates. The transition
//! after the router is the only conditional edge.

use std::sync::Arc;

use crate::agent::router::RouterStep;
use crate::agent::state::{ConversationState, FINISH};
use crate::agent::summarizer::SummarizerStep;
use crate::agent::tool_executor::ToolExecutorStep;
use crate::llm::LlmProvider;
use crate::tools::ToolRegistry;

/// Nodes of the planning loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Node {
    Router,
    ToolExecutor,
    Summarizer,
}

/// The planning loop over one conversation state
pub struct PlannerGraph {
    router: RouterStep,
    tool_executor: ToolExecutorStep,
    summarizer: SummarizerStep,
    tools: Arc<ToolRegistry>,
}

impl PlannerGraph {
    pub fn new(llm: Arc<dyn LlmProvider>, tools: Arc<ToolRegistry>, max_iterations: u32) -> Self {
        Self {
            router: RouterStep::new(llm.clone(), tools.clone(), max_iterations),
            tool_executor: ToolExecutorStep::new(tools.clone()),
            summarizer: SummarizerStep::new(llm),
            tools,
        }
    }

    /// Transition taken after a router evaluation
    ///
    /// Unset, the finish sentinel, and unknown tool names all fall through
    /// to the summarizer; only a registered tool reaches the executor.
    fn next_after_router(&self, state: &ConversationState) -> Node {
        match state.next_node.as_deref() {
            None | Some("") | Some(FINISH) => Node::Summarizer,
            Some(name) if self.tools.contains(name) => Node::ToolExecutor,
            Some(name) => {
                tracing::warn!(tool = %name, "router proposed an unregistered tool");
                Node::Summarizer
            }
        }
    }

    /// Drive the loop from the router to the terminal summarizer
    pub async fn invoke(&self, state: &mut ConversationState) {
        let mut node = Node::Router;
        loop {
            match node {
                Node::Router => {
                    self.router.run(state).await;
                    node = self.next_after_router(state);
                    state.next_node = None;
                }
                Node::ToolExecutor => {
                    self.tool_executor.run(state).await;
                    node = Node::Router;
                }
                Node::Summarizer => {
                    self.summarizer.run(state).await;
                    break;
                }
            }
        }
    }
}
