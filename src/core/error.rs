//! Custom error types for Itinera
//!
//! Provides a unified error handling system across all modules.
//!
//! Failures inside the planning loop (LLM refusals, tool errors) are never
//! expressed through this type; they degrade into synthetic messages and
//! failure results so a turn always completes. `PlannerError` covers the
//! plumbing around the loop: configuration, startup, and HTTP clients.

use thiserror::Error;

/// Main error type for Itinera operations
#[derive(Error, Debug)]
pub enum PlannerError {
    /// LLM backend connection or API errors
    #[error("LLM error: {0}")]
    Llm(String),

    /// Tool execution errors
    #[error("Tool execution error: {0}")]
    ToolExecution(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON parsing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error for other cases
    #[error("{0}")]
    Other(String),
}

/// Convenience Result type for Itinera operations
pub type Result<T> = std::result::Result<T, PlannerError>;

impl PlannerError {
    /// Create an LLM error
    pub fn llm(msg: impl Into<String>) -> Self {
        Self::Llm(msg.into())
    }

    /// Create a tool execution error
    pub fn tool(msg: impl Into<String>) -> Self {
        Self::ToolExecution(msg.into())
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
