//! LLM module - Language Model integrations
//!
//! Provides abstractions for different LLM backends with Qwen as the primary.

pub mod qwen;
pub mod traits;

pub use qwen::QwenClient;
pub use traits::{GenerateOptions, LlmProvider, LlmResponse, TokenUsage};
