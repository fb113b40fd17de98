//! Configuration management for Autoflow
//!
//! Supports environment variables, config files, and runtime overrides.
//!
//! Config file location: ~/.config/autoflow/config.toml

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

use crate::core::error::{AutoflowError, Result};

/// Main configuration for Autoflow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP server configuration
    pub server: ServerConfig,
    /// Plan-generation backend configuration
    pub gemini: GeminiConfig,
    /// Workflow engine configuration
    pub engine: EngineConfig,
    /// UI perception configuration
    #[serde(default)]
    pub vision: VisionConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address (default: 127.0.0.1)
    pub host: String,
    /// Port number (default: 8000)
    pub port: u16,
}

/// Gemini plan-generation backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// API key; when absent the engine falls back to template plans
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Model used to turn request text into a plan
    pub model: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

/// Workflow engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Base simulated duration of one step in milliseconds
    pub step_delay_ms: u64,
    /// Random extra per-step latency in milliseconds
    pub jitter_ms: u64,
}

/// UI perception configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisionConfig {
    /// Whether to probe for the vision helper at startup
    pub enabled: bool,
    /// Name of the vision helper binary
    pub helper: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            gemini: GeminiConfig::default(),
            engine: EngineConfig::default(),
            vision: VisionConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: env::var("AUTOFLOW_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("AUTOFLOW_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8000),
        }
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: env::var("GEMINI_API_KEY").ok().filter(|k| !k.is_empty()),
            model: env::var("AUTOFLOW_GEMINI_MODEL")
                .unwrap_or_else(|_| "gemini-2.5-flash".to_string()),
            timeout_secs: 30,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            step_delay_ms: env::var("AUTOFLOW_STEP_DELAY_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1000),
            jitter_ms: 250,
        }
    }
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            enabled: env::var("AUTOFLOW_VISION_ENABLED")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(true),
            helper: env::var("AUTOFLOW_VISION_HELPER")
                .unwrap_or_else(|_| "ui-vision".to_string()),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("autoflow")
    }

    /// Get the config file path
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Load configuration from file, environment, and defaults
    /// Priority: CLI args > env vars > config file > defaults
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
            return Err(AutoflowError::config("Config file not found"));
        }

        let content = fs::read_to_string(&config_path)
            .map_err(|e| AutoflowError::config(format!("Failed to read config: {}", e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| AutoflowError::config(format!("Failed to parse config: {}", e)))?;

        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let config_dir = Self::config_dir();
        let config_path = Self::config_file();

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)
                .map_err(|e| AutoflowError::config(format!("Failed to create config dir: {}", e)))?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| AutoflowError::config(format!("Failed to serialize config: {}", e)))?;

        fs::write(&config_path, content)
            .map_err(|e| AutoflowError::config(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    /// Get the bind address for the HTTP server
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Get the Gemini generateContent endpoint for the configured model
    pub fn gemini_url(&self) -> String {
        format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent",
            self.gemini.model
        )
    }

    /// Whether a plan-generation API key is configured
    pub fn has_api_key(&self) -> bool {
        self.gemini.api_key.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.gemini.model, "gemini-2.5-flash");
        assert_eq!(config.engine.step_delay_ms, 1000);
        assert!(config.vision.enabled);
    }

    #[test]
    fn test_gemini_url() {
        let config = Config::default();
        assert!(config
            .gemini_url()
            .ends_with("models/gemini-2.5-flash:generateContent"));
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("step_delay_ms"));
        assert!(toml_str.contains("[server]"));
    }

    #[test]
    fn test_config_dir() {
        let dir = Config::config_dir();
        assert!(dir.to_string_lossy().contains("autoflow"));
    }
}
