//! Agent module - the planning loop and session management
//!
//! Contains the router/tool-executor/summarizer steps, the loop controller
//! that sequences them, and the per-session state store.

pub mod graph;
pub mod router;
pub mod session;
pub mod state;
pub mod summarizer;
pub mod tool_executor;

pub use graph::{Node, PlannerGraph};
pub use session::SessionStore;
pub use state::{ConversationState, FINISH};
