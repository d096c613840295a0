//! Itinera - Conversational Travel-Planning Agent
//!
//! An HTTP service that drives an LLM through a bounded decision loop to
//! answer travel questions and generate itineraries, calling out to travel
//! data tools (POI search, routing, weather, congestion, opening hours)
//! along the way.
//!
//! # Architecture
//!
//! - **Core**: Shared types, configuration, and error handling
//! - **LLM**: LLM provider abstraction with the Qwen backend
//! - **Tools**: Tool registry with the AMap-backed travel tools
//! - **Agent**: The router/tool-executor/summarizer loop and session store
//! - **API**: axum HTTP endpoints

pub mod agent;
pub mod api;
pub mod core;
pub mod llm;
pub mod tools;

// Re-export commonly used items
pub use agent::{ConversationState, PlannerGraph, SessionStore};
pub use core::{Config, PlannerError, Result};
