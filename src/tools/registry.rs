//! Tool registry - manages and dispatches tool calls
//!
//! Central hub for registering tools and routing tool calls to handlers.
//! The registry is built once at startup and immutable afterwards; lookup
//! is a map access, not a scan.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::core::{Config, Result, ToolCall, ToolDefinition, ToolResult};
use crate::tools::amap::{
    AmapClient, GetOpeningHoursTool, GetPoiCongestionTool, GetRouteTool, GetWeatherTool,
    SearchPoiTool,
};

/// A tool the planning loop can invoke
///
/// Implementations never return an error: invalid arguments and transport
/// failures are reported as failure `ToolResult`s so the loop can fold them
/// into the conversation and continue.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique tool name
    fn name(&self) -> &str;

    /// Schema definition advertised to the LLM
    fn definition(&self) -> ToolDefinition;

    /// Invoke the tool with JSON arguments
    async fn invoke(&self, arguments: &serde_json::Value) -> ToolResult;
}

/// Registry of available tools
pub struct ToolRegistry {
    /// Tools indexed by name
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Create a registry with the travel tools wired to the AMap API
    pub fn with_travel_tools(config: &Config) -> Result<Self> {
        let client = Arc::new(AmapClient::from_config(config)?);

        let mut registry = Self::new();
        registry.register(Arc::new(SearchPoiTool::new(client.clone())));
        registry.register(Arc::new(GetRouteTool::new(client.clone())));
        registry.register(Arc::new(GetWeatherTool::new(client.clone())));
        registry.register(Arc::new(GetPoiCongestionTool::new(client.clone())));
        registry.register(Arc::new(GetOpeningHoursTool::new(client)));

        Ok(registry)
    }

    /// Register a tool
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    /// Whether a tool with the given name is registered
    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Get all tool definitions
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.values().map(|t| t.definition()).collect()
    }

    /// Number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Execute a tool call, dispatching by name
    pub async fn execute(&self, tool_call: &ToolCall) -> ToolResult {
        match self.tools.get(&tool_call.name) {
            Some(tool) => tool.invoke(&tool_call.arguments).await,
            None => ToolResult::failure(
                &tool_call.name,
                format!("Tool '{}' not found", tool_call.name),
            ),
        }
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }

        fn definition(&self) -> ToolDefinition {
            ToolDefinition::function(
                "echo",
                "Echo the input back",
                serde_json::json!({"type": "object", "properties": {}}),
            )
        }

        async fn invoke(&self, arguments: &serde_json::Value) -> ToolResult {
            ToolResult::success("echo", arguments.to_string())
        }
    }

    #[tokio::test]
    async fn test_register_and_execute() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(EchoTool));

        assert!(registry.contains("echo"));
        assert_eq!(registry.len(), 1);

        let call = ToolCall::new("echo", serde_json::json!({"x": 1}));
        let result = registry.execute(&call).await;
        assert!(result.success);
        assert!(result.output.contains("\"x\":1"));
    }

    #[tokio::test]
    async fn test_unknown_tool_is_a_failure_result() {
        let registry = ToolRegistry::new();
        let call = ToolCall::new("teleport", serde_json::json!({}));
        let result = registry.execute(&call).await;
        assert!(!result.success);
        assert!(result.output.contains("not found"));
    }

    #[test]
    fn test_travel_registry_has_five_tools() {
        let config = Config::default();
        let registry = ToolRegistry::with_travel_tools(&config).unwrap();
        assert_eq!(registry.len(), 5);
        for name in [
            "search_poi",
            "get_route",
            "get_weather",
            "get_poi_congestion",
            "get_opening_hours",
        ] {
            assert!(registry.contains(name), "missing tool: {}", name);
        }
    }
}
