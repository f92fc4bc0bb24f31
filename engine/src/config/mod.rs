//! Configuration management
//!
//! This module handles loading, validation, and management of the Folio configuration.
//! Configuration is stored in TOML format at ~/.folio/config.toml.
//!
//! # Configuration Sections
//!
//! - **core**: log level
//! - **gateway**: AI provider, endpoint, model, key lookup and timeout
//! - **console**: welcome line, progress delay, startup tab
//! - **registry**: optional file catalog replacing the built-in one
//!
//! # Examples
//!
//! ```no_run
//! use folio_engine::config::Config;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::load_or_create()?;
//! println!("Provider: {}", config.gateway.provider);
//! # Ok(())
//! # }
//! ```

use sdk::errors::EngineError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::console::DEFAULT_WELCOME;

/// Longest accepted delay between progress lines.
pub const MAX_PROGRESS_STEP_MS: u64 = 5000;

/// Main configuration structure
///
/// Every section is optional in the file; missing sections take defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub core: CoreConfig,

    #[serde(default)]
    pub gateway: GatewayConfig,

    #[serde(default)]
    pub console: ConsoleConfig,

    #[serde(default)]
    pub registry: RegistryConfig,
}

/// Core engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// AI gateway configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Provider name (gemini, offline)
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Base URL for the Gemini API
    #[serde(default = "default_gemini_base_url")]
    pub base_url: String,

    /// Model name
    #[serde(default = "default_gemini_model")]
    pub model: String,

    /// Environment variable checked for the API key before the OS keychain
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    // Note: API key stored in the environment or OS keychain, not in config
}

/// Console configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsoleConfig {
    /// First line of every session's history
    #[serde(default = "default_welcome")]
    pub welcome: String,

    /// Delay before each progress line of a streaming job (milliseconds)
    #[serde(default = "default_progress_step_ms")]
    pub progress_step_ms: u64,

    /// Open the `readme` entry as the first tab on startup
    #[serde(default = "default_true")]
    pub open_readme_on_start: bool,
}

/// File registry configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// TOML catalog replacing the built-in files (supports ~ expansion)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_provider() -> String {
    "gemini".to_string()
}

fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_gemini_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_welcome() -> String {
    DEFAULT_WELCOME.to_string()
}

fn default_progress_step_ms() -> u64 {
    50
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            base_url: default_gemini_base_url(),
            model: default_gemini_model(),
            api_key_env: default_api_key_env(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            welcome: default_welcome(),
            progress_step_ms: default_progress_step_ms(),
            open_readme_on_start: true,
        }
    }
}

impl Config {
    /// Load configuration from the default location (~/.folio/config.toml)
    ///
    /// If the configuration file doesn't exist, creates a default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Configuration file cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    pub fn load_or_create() -> Result<Self, EngineError> {
        let config_path = Self::default_config_path()?;

        if config_path.exists() {
            Self::load_from_path(&config_path)
        } else {
            Self::create_default(&config_path)
        }
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self, EngineError> {
        let contents = fs::read_to_string(path)
            .map_err(|e| EngineError::Config(format!("Failed to read config file: {}", e)))?;

        let mut config: Config = toml::from_str(&contents)
            .map_err(|e| EngineError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate_and_process()?;

        Ok(config)
    }

    /// Create default configuration and save to path
    fn create_default(path: &Path) -> Result<Self, EngineError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                EngineError::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let mut config = Self::default();
        config.validate_and_process()?;

        let toml_string = toml::to_string_pretty(&config)
            .map_err(|e| EngineError::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, toml_string)
            .map_err(|e| EngineError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(config)
    }

    /// Get the default configuration file path (~/.folio/config.toml)
    pub fn default_config_path() -> Result<PathBuf, EngineError> {
        let home = dirs::home_dir()
            .ok_or_else(|| EngineError::Config("Could not determine home directory".to_string()))?;

        Ok(home.join(".folio").join("config.toml"))
    }

    /// Validate and process configuration
    ///
    /// Checks enumerated fields and numeric bounds, then expands `~` in the
    /// registry path.
    pub fn validate_and_process(&mut self) -> Result<(), EngineError> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.core.log_level.as_str()) {
            return Err(EngineError::Config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.core.log_level,
                valid_log_levels.join(", ")
            )));
        }

        let valid_providers = ["gemini", "offline"];
        if !valid_providers.contains(&self.gateway.provider.as_str()) {
            return Err(EngineError::Config(format!(
                "Invalid provider '{}'. Must be one of: {}",
                self.gateway.provider,
                valid_providers.join(", ")
            )));
        }

        if self.gateway.base_url.trim().is_empty() {
            return Err(EngineError::Config(
                "gateway.base_url must not be empty".to_string(),
            ));
        }

        if self.gateway.timeout_secs == 0 {
            return Err(EngineError::Config(
                "gateway.timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.console.progress_step_ms > MAX_PROGRESS_STEP_MS {
            return Err(EngineError::Config(format!(
                "console.progress_step_ms must be at most {}",
                MAX_PROGRESS_STEP_MS
            )));
        }

        if let Some(path) = &self.registry.path {
            self.registry.path = Some(expand_path(path)?);
        }

        Ok(())
    }
}

/// Expand ~ in path to user's home directory
fn expand_path(path: &Path) -> Result<PathBuf, EngineError> {
    let path_str = path
        .to_str()
        .ok_or_else(|| EngineError::Config("Invalid UTF-8 in path".to_string()))?;

    if let Some(rest) = path_str.strip_prefix("~/") {
        let home = dirs::home_dir()
            .ok_or_else(|| EngineError::Config("Could not determine home directory".to_string()))?;

        Ok(home.join(rest))
    } else if path_str == "~" {
        dirs::home_dir()
            .ok_or_else(|| EngineError::Config("Could not determine home directory".to_string()))
    } else {
        Ok(path.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_creation() {
        let config = Config::default();

        assert_eq!(config.core.log_level, "info");
        assert_eq!(config.gateway.provider, "gemini");
        assert_eq!(config.console.progress_step_ms, 50);
        assert!(config.console.open_readme_on_start);
        assert_eq!(config.console.welcome, DEFAULT_WELCOME);
        assert!(config.registry.path.is_none());
    }

    #[test]
    fn test_expand_path_with_tilde() {
        let path = PathBuf::from("~/catalog.toml");
        let expanded = expand_path(&path).unwrap();

        let home = dirs::home_dir().unwrap();
        assert_eq!(expanded, home.join("catalog.toml"));
    }

    #[test]
    fn test_expand_path_without_tilde() {
        let path = PathBuf::from("/tmp/catalog.toml");
        assert_eq!(expand_path(&path).unwrap(), path);
    }

    #[test]
    fn test_partial_file_takes_defaults() {
        let mut config: Config = toml::from_str("[console]\nprogress_step_ms = 0\n").unwrap();
        config.validate_and_process().unwrap();
        assert_eq!(config.console.progress_step_ms, 0);
        assert_eq!(config.gateway.timeout_secs, 30);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut config = Config::default();
        config.gateway.timeout_secs = 0;
        assert!(config.validate_and_process().is_err());

        let mut config = Config::default();
        config.console.progress_step_ms = MAX_PROGRESS_STEP_MS + 1;
        assert!(config.validate_and_process().is_err());

        let mut config = Config::default();
        config.gateway.provider = "ollama".to_string();
        assert!(config.validate_and_process().is_err());
    }
}
