//! AMap API client and the travel-data tools built on it
//!
//! Five tools back the planning loop: point-of-interest search, route
//! planning, weather lookup, POI congestion, and opening hours. Every tool
//! validates its required arguments before calling out and converts any
//! transport failure into a failure `ToolResult` instead of an error — the
//! loop must never abort because a data source misbehaved.

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

use crate::core::{Config, Result, ToolDefinition, ToolResult};
use crate::tools::registry::Tool;

/// Accepted transport modes for route planning
const ROUTE_MODES: [&str; 3] = ["walking", "bus", "driving"];

/// HTTP client for the AMap REST API
#[derive(Clone)]
pub struct AmapClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl AmapClient {
    /// Create a new AMap client from configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.amap.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.amap.base_url.trim_end_matches('/').to_string(),
            api_key: config.amap.api_key.clone(),
        })
    }

    /// Create a client with a custom base URL (used by tests)
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(15))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: "test-key".to_string(),
        })
    }

    /// GET a JSON payload from an API path with query parameters
    async fn get_json(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> std::result::Result<serde_json::Value, String> {
        let url = format!("{}/{}", self.base_url, path);
        let mut query: Vec<(&str, &str)> = vec![("key", self.api_key.as_str()), ("output", "json")];
        query.extend_from_slice(params);

        let response = self
            .client
            .get(&url)
            .query(&query)
            .send()
            .await
            .map_err(|e| format!("Request error: {}", e))?;

        let response = response
            .error_for_status()
            .map_err(|e| format!("Request error: {}", e))?;

        response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| format!("Request error: {}", e))
    }
}

/// Build a `ToolResult` from a raw API outcome
fn api_result(tool_name: &str, outcome: std::result::Result<serde_json::Value, String>) -> ToolResult {
    match outcome {
        Ok(body) => {
            let output = body.to_string();
            ToolResult::success_with_data(tool_name, output, body)
        }
        Err(e) => ToolResult::failure(tool_name, e),
    }
}

/// Read an optional string argument, trimmed
fn arg_str(arguments: &serde_json::Value, key: &str) -> String {
    arguments
        .get(key)
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .trim()
        .to_string()
}

/// Point-of-interest keyword search
pub struct SearchPoiTool {
    client: Arc<AmapClient>,
}

impl SearchPoiTool {
    pub fn new(client: Arc<AmapClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for SearchPoiTool {
    fn name(&self) -> &str {
        "search_poi"
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition::function(
            "search_poi",
            "Search for points of interest (attractions, restaurants, hotels) by keyword within a city",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "keyword": {
                        "type": "string",
                        "description": "Search keyword, e.g. a sight or venue name"
                    },
                    "city": {
                        "type": "string",
                        "description": "City to search in"
                    },
                    "poi_type": {
                        "type": "string",
                        "description": "Optional POI category filter"
                    }
                },
                "required": ["keyword", "city"]
            }),
        )
    }

    async fn invoke(&self, arguments: &serde_json::Value) -> ToolResult {
        let keyword = arg_str(arguments, "keyword");
        let city = arg_str(arguments, "city");
        if keyword.is_empty() || city.is_empty() {
            return ToolResult::failure(self.name(), "Keyword and city must not be empty");
        }
        let poi_type = arg_str(arguments, "poi_type");

        let outcome = self
            .client
            .get_json(
                "place/text",
                &[
                    ("keywords", keyword.as_str()),
                    ("city", city.as_str()),
                    ("types", poi_type.as_str()),
                    ("offset", "5"),
                ],
            )
            .await;
        api_result(self.name(), outcome)
    }
}

/// Route planning between two locations
pub struct GetRouteTool {
    client: Arc<AmapClient>,
}

impl GetRouteTool {
    pub fn new(client: Arc<AmapClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for GetRouteTool {
    fn name(&self) -> &str {
        "get_route"
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition::function(
            "get_route",
            "Plan a route between a start and end location",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "start": {
                        "type": "string",
                        "description": "Start location"
                    },
                    "end": {
                        "type": "string",
                        "description": "End location"
                    },
                    "city": {
                        "type": "string",
                        "description": "Optional city the route is in"
                    },
                    "mode": {
                        "type": "string",
                        "enum": ["walking", "bus", "driving"],
                        "description": "Transport mode, defaults to walking"
                    }
                },
                "required": ["start", "end"]
            }),
        )
    }

    async fn invoke(&self, arguments: &serde_json::Value) -> ToolResult {
        let start = arg_str(arguments, "start");
        let end = arg_str(arguments, "end");
        if start.is_empty() || end.is_empty() {
            return ToolResult::failure(self.name(), "Start and end must not be empty");
        }

        let mode = {
            let m = arg_str(arguments, "mode");
            if m.is_empty() {
                "walking".to_string()
            } else {
                m
            }
        };
        if !ROUTE_MODES.contains(&mode.as_str()) {
            return ToolResult::failure(
                self.name(),
                format!("Mode must be one of {}", ROUTE_MODES.join(", ")),
            );
        }

        let city = arg_str(arguments, "city");
        let mut params: Vec<(&str, &str)> =
            vec![("origin", start.as_str()), ("destination", end.as_str())];
        if !city.is_empty() {
            params.push(("city", city.as_str()));
        }

        let path = format!("direction/{}", mode);
        let outcome = self.client.get_json(&path, &params).await;
        api_result(self.name(), outcome)
    }
}

/// Weather lookup for a city, optionally for a forecast date
pub struct GetWeatherTool {
    client: Arc<AmapClient>,
}

impl GetWeatherTool {
    pub fn new(client: Arc<AmapClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for GetWeatherTool {
    fn name(&self) -> &str {
        "get_weather"
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition::function(
            "get_weather",
            "Look up the current weather or forecast for a city",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "city": {
                        "type": "string",
                        "description": "City name"
                    },
                    "date": {
                        "type": "string",
                        "description": "Optional date in YYYY-MM-DD format; requests a forecast"
                    }
                },
                "required": ["city"]
            }),
        )
    }

    async fn invoke(&self, arguments: &serde_json::Value) -> ToolResult {
        let city = arg_str(arguments, "city");
        if city.is_empty() {
            return ToolResult::failure(self.name(), "City must not be empty");
        }

        let date = arg_str(arguments, "date");
        if !date.is_empty() && NaiveDate::parse_from_str(&date, "%Y-%m-%d").is_err() {
            return ToolResult::failure(self.name(), "Date must be in YYYY-MM-DD format");
        }

        // A dated request asks for the full forecast, otherwise live weather.
        let extensions = if date.is_empty() { "base" } else { "all" };
        let outcome = self
            .client
            .get_json(
                "weather/weatherInfo",
                &[("city", city.as_str()), ("extensions", extensions)],
            )
            .await;
        api_result(self.name(), outcome)
    }
}

/// Congestion level of a point of interest
pub struct GetPoiCongestionTool {
    client: Arc<AmapClient>,
}

impl GetPoiCongestionTool {
    pub fn new(client: Arc<AmapClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for GetPoiCongestionTool {
    fn name(&self) -> &str {
        "get_poi_congestion"
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition::function(
            "get_poi_congestion",
            "Check how crowded a point of interest currently is",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "poi_id": {
                        "type": "string",
                        "description": "POI id from a previous search_poi result"
                    }
                },
                "required": ["poi_id"]
            }),
        )
    }

    async fn invoke(&self, arguments: &serde_json::Value) -> ToolResult {
        let poi_id = arg_str(arguments, "poi_id");
        if poi_id.is_empty() {
            return ToolResult::failure(self.name(), "POI id must not be empty");
        }

        let outcome = self
            .client
            .get_json(
                "place/detail",
                &[("id", poi_id.as_str()), ("extensions", "all")],
            )
            .await;
        api_result(self.name(), outcome)
    }
}

/// Opening hours of a point of interest
pub struct GetOpeningHoursTool {
    client: Arc<AmapClient>,
}

impl GetOpeningHoursTool {
    pub fn new(client: Arc<AmapClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for GetOpeningHoursTool {
    fn name(&self) -> &str {
        "get_opening_hours"
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition::function(
            "get_opening_hours",
            "Look up the opening hours of a point of interest",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "poi_id": {
                        "type": "string",
                        "description": "POI id from a previous search_poi result"
                    }
                },
                "required": ["poi_id"]
            }),
        )
    }

    async fn invoke(&self, arguments: &serde_json::Value) -> ToolResult {
        let poi_id = arg_str(arguments, "poi_id");
        if poi_id.is_empty() {
            return ToolResult::failure(self.name(), "POI id must not be empty");
        }

        let outcome = self
            .client
            .get_json(
                "place/detail",
                &[("id", poi_id.as_str()), ("extensions", "all")],
            )
            .await;
        api_result(self.name(), outcome)
    }
}
