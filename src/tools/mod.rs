//! Tools module - travel-data tool implementations for the agent
//!
//! Contains the AMap-backed tools and the tool registry.

pub mod amap;
pub mod registry;

pub use registry::{Tool, ToolRegistry};
