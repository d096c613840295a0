//! Configuration management for Itinera
//!
//! Supports environment variables, config files, and runtime overrides.
//!
//! Config file location: ~/.config/itinera/config.toml

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

use crate::core::error::{PlannerError, Result};

/// Hard cap on router evaluations per invocation
pub const MAX_ITERATIONS: u32 = 20;

/// Main configuration for Itinera
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// LLM backend configuration
    #[serde(default)]
    pub llm: LlmConfig,
    /// AMap travel-data API configuration
    #[serde(default)]
    pub amap: AmapConfig,
    /// Agent behavior configuration
    #[serde(default)]
    pub agent: AgentConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address (default: 127.0.0.1)
    pub host: String,
    /// Port number (default: 5000)
    pub port: u16,
    /// Allowed CORS origins
    pub origins: Vec<String>,
}

/// LLM backend configuration (OpenAI-compatible chat completions)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// API key for the backend
    pub api_key: String,
    /// Base URL of the compatible-mode endpoint
    pub base_url: String,
    /// Model name
    pub model: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Sampling temperature
    pub temperature: f32,
    /// Maximum tokens per completion
    pub max_tokens: u32,
}

/// AMap API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmapConfig {
    /// API key for the AMap REST API
    pub api_key: String,
    /// Base URL (default: https://restapi.amap.com/v3)
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

/// Agent behavior configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Router evaluation budget per invocation
    /// Default: 20
    pub max_iterations: u32,
    /// Maximum number of live sessions before LRU eviction
    /// Default: 1024
    pub session_capacity: usize,
    /// Whether to log request/response bodies
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            llm: LlmConfig::default(),
            amap: AmapConfig::default(),
            agent: AgentConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        let origins = env::var("ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173,http://127.0.0.1:5173".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5000),
            origins,
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: env::var("QWEN_API_KEY").unwrap_or_default(),
            base_url: env::var("QWEN_API_URL").unwrap_or_else(|_| {
                "https://dashscope.aliyuncs.com/compatible-mode/v1".to_string()
            }),
            model: env::var("QWEN_MODEL_NAME").unwrap_or_else(|_| "qwen-turbo".to_string()),
            timeout_secs: 120,
            temperature: 0.1,
            max_tokens: 2048,
        }
    }
}

impl Default for AmapConfig {
    fn default() -> Self {
        Self {
            api_key: env::var("AMAP_API_KEY").unwrap_or_default(),
            base_url: "https://restapi.amap.com/v3".to_string(),
            timeout_secs: 15,
        }
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_iterations: MAX_ITERATIONS,
            session_capacity: 1024,
            debug: env::var("ITINERA_DEBUG")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("itinera")
    }

    /// Get the config file path
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Load configuration from file, environment, and defaults
    /// Priority: env vars > config file > defaults
    pub fn load() -> Self {
        // Try to load .env file if it exists
        let _ = dotenvy::dotenv();

        // Try to load from config file
        if let Ok(config) = Self::load_from_file() {
            return config;
        }

        // Fall back to defaults (which respect env vars)
        Self::default()
    }

    /// Load configuration from file only
    pub fn load_from_file() -> Result<Self> {
        let config_path = Self::config_file();

        if !config_path.exists() {
            return Err(PlannerError::config("Config file not found"));
        }

        let content = fs::read_to_string(&config_path)
            .map_err(|e| PlannerError::config(format!("Failed to read config: {}", e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| PlannerError::config(format!("Failed to parse config: {}", e)))?;

        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let config_dir = Self::config_dir();
        let config_path = Self::config_file();

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)
                .map_err(|e| PlannerError::config(format!("Failed to create config dir: {}", e)))?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| PlannerError::config(format!("Failed to serialize config: {}", e)))?;

        fs::write(&config_path, content)
            .map_err(|e| PlannerError::config(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    /// Get the socket address to bind
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
