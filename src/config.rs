//! Configuration management for OKU
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::error::{OkuError, Result};
use anyhow::Context;
use crate::kernel::KernelRegistry;
use crate::providers::{SamplingConfig, DEFAULT_MODEL};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure for OKU
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Provider configuration (remote chat endpoint)
    pub provider: ProviderConfig,
    /// Chat session behaviour
    #[serde(default)]
    pub chat: ChatConfig,
    /// Breathing exercise timings
    #[serde(default)]
    pub breathing: BreathingConfig,
    /// Log output settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Provider configuration
///
/// Specifies which chat endpoint to use and its settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Type of provider to use
    #[serde(rename = "type")]
    pub provider_type: String,

    /// Google Gemini configuration
    #[serde(default)]
    pub gemini: GeminiConfig,
}

/// Google Gemini provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// Model to use for new sessions
    #[serde(default = "default_gemini_model")]
    pub model: String,

    /// API base URL, without trailing slash
    ///
    /// Overridable so tests can point the provider at a mock server.
    #[serde(default = "default_gemini_api_base")]
    pub api_base: String,

    /// API key. Usually supplied through the environment rather than the file.
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Top-k sampling cut-off
    #[serde(default = "default_top_k")]
    pub top_k: u32,

    /// Per-request timeout (seconds)
    #[serde(default = "default_request_timeout")]
    pub timeout_seconds: u64,
}

fn default_gemini_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_gemini_api_base() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_temperature() -> f32 {
    SamplingConfig::default().temperature
}

fn default_top_k() -> u32 {
    SamplingConfig::default().top_k
}

fn default_request_timeout() -> u64 {
    60
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            model: default_gemini_model(),
            api_base: default_gemini_api_base(),
            api_key: None,
            temperature: default_temperature(),
            top_k: default_top_k(),
            timeout_seconds: default_request_timeout(),
        }
    }
}

impl GeminiConfig {
    /// Sampling parameters for new sessions
    pub fn sampling(&self) -> SamplingConfig {
        SamplingConfig {
            temperature: self.temperature,
            top_k: self.top_k,
        }
    }
}

/// Chat session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Kernel activated when a chat starts
    #[serde(default = "default_kernel")]
    pub default_kernel: String,

    /// Print the ethics and safety disclaimer when a chat starts
    #[serde(default = "default_show_disclaimer")]
    pub show_disclaimer: bool,
}

fn default_kernel() -> String {
    "genesis-qc".to_string()
}

fn default_show_disclaimer() -> bool {
    true
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            default_kernel: default_kernel(),
            show_disclaimer: default_show_disclaimer(),
        }
    }
}

/// Longest accepted breathing phase, in seconds
pub const MAX_BREATHING_PHASE_SECONDS: u64 = 60;

/// Breathing exercise configuration
///
/// The defaults give a 10 second cycle, i.e. 6 breaths per minute.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreathingConfig {
    #[serde(default = "default_inhale")]
    pub inhale_seconds: u64,
    #[serde(default = "default_hold")]
    pub hold_seconds: u64,
    #[serde(default = "default_exhale")]
    pub exhale_seconds: u64,
    /// Cycles run by `oku breathe` and `/breathe` without an argument
    #[serde(default = "default_cycles")]
    pub default_cycles: u32,
}

fn default_inhale() -> u64 {
    4
}

fn default_hold() -> u64 {
    1
}

fn default_exhale() -> u64 {
    5
}

fn default_cycles() -> u32 {
    6
}

impl Default for BreathingConfig {
    fn default() -> Self {
        Self {
            inhale_seconds: default_inhale(),
            hold_seconds: default_hold(),
            exhale_seconds: default_exhale(),
            default_cycles: default_cycles(),
        }
    }
}

/// Log output configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Emit JSON formatted log lines instead of human readable text
    #[serde(default)]
    pub json: bool,
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// # Arguments
    ///
    /// * `path` - Path to configuration file
    /// * `cli` - CLI arguments for overrides
    ///
    /// # Returns
    ///
    /// Returns the loaded and merged configuration
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::debug!("Config file not found at {}, using defaults", path);
            Self::default_config()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn default_config() -> Self {
        Self {
            provider: ProviderConfig {
                provider_type: "gemini".to_string(),
                gemini: GeminiConfig::default(),
            },
            chat: ChatConfig::default(),
            breathing: BreathingConfig::default(),
            logging: LoggingConfig::default(),
        }
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(OkuError::Io)
            .with_context(|| format!("Failed to read config file {}", path))?;
        serde_yaml::from_str(&contents)
            .map_err(OkuError::Yaml)
            .with_context(|| format!("Failed to parse config {}", path))
    }

    fn apply_env_vars(&mut self) {
        if let Ok(provider_type) = std::env::var("OKU_PROVIDER") {
            self.provider.provider_type = provider_type;
        }

        if let Ok(model) = std::env::var("OKU_GEMINI_MODEL") {
            self.provider.gemini.model = model;
        }

        if let Ok(api_base) = std::env::var("OKU_GEMINI_API_BASE") {
            self.provider.gemini.api_base = api_base.trim_end_matches('/').to_string();
        }

        // First non-empty key wins
        let api_key = ["OKU_GEMINI_API_KEY", "GEMINI_API_KEY", "API_KEY"]
            .iter()
            .filter_map(|name| std::env::var(name).ok())
            .find(|value| !value.trim().is_empty());
        if let Some(key) = api_key {
            self.provider.gemini.api_key = Some(key);
        }

        if let Ok(kernel) = std::env::var("OKU_DEFAULT_KERNEL") {
            self.chat.default_kernel = kernel;
        }

        if let Ok(json) = std::env::var("OKU_LOG_JSON") {
            match json.to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => self.logging.json = true,
                "0" | "false" | "no" | "off" => self.logging.json = false,
                other => tracing::warn!("Invalid OKU_LOG_JSON: {}", other),
            }
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if cli.verbose {
            tracing::debug!("Verbose mode enabled");
        }

        if let crate::cli::Commands::Chat { kernel, provider } = &cli.command {
            if let Some(provider) = provider {
                self.provider.provider_type = provider.clone();
            }
            if let Some(kernel) = kernel {
                self.chat.default_kernel = kernel.clone();
            }
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns error if any validation check fails
    pub fn validate(&self) -> Result<()> {
        if self.provider.provider_type.is_empty() {
            return Err(OkuError::Config("Provider type cannot be empty".to_string()).into());
        }

        let valid_providers = ["gemini"];
        if !valid_providers.contains(&self.provider.provider_type.as_str()) {
            return Err(OkuError::Config(format!(
                "Invalid provider type: {}. Must be one of: {}",
                self.provider.provider_type,
                valid_providers.join(", ")
            ))
            .into());
        }

        let gemini = &self.provider.gemini;
        if gemini.model.trim().is_empty() {
            return Err(OkuError::Config("gemini.model cannot be empty".to_string()).into());
        }

        if !gemini.api_base.starts_with("http://") && !gemini.api_base.starts_with("https://") {
            return Err(OkuError::Config(format!(
                "gemini.api_base must be an http(s) URL: {}",
                gemini.api_base
            ))
            .into());
        }

        if !(0.0..=2.0).contains(&gemini.temperature) {
            return Err(OkuError::Config(
                "gemini.temperature must be between 0.0 and 2.0".to_string(),
            )
            .into());
        }

        if gemini.top_k == 0 {
            return Err(
                OkuError::Config("gemini.top_k must be greater than 0".to_string()).into(),
            );
        }

        if gemini.timeout_seconds == 0 {
            return Err(OkuError::Config(
                "gemini.timeout_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        let registry = KernelRegistry::builtin();
        if !registry.contains(&self.chat.default_kernel) {
            return Err(OkuError::Config(format!(
                "chat.default_kernel '{}' is not a known kernel. Must be one of: {}",
                self.chat.default_kernel,
                registry.ids().join(", ")
            ))
            .into());
        }

        let breathing = &self.breathing;
        if breathing.inhale_seconds == 0 || breathing.exhale_seconds == 0 {
            return Err(OkuError::Config(
                "breathing inhale and exhale durations must be greater than 0".to_string(),
            )
            .into());
        }

        let phases = [
            ("inhale_seconds", breathing.inhale_seconds),
            ("hold_seconds", breathing.hold_seconds),
            ("exhale_seconds", breathing.exhale_seconds),
        ];
        for (name, seconds) in phases {
            if seconds > MAX_BREATHING_PHASE_SECONDS {
                return Err(OkuError::Config(format!(
                    "breathing.{} must be at most {} seconds, got {}",
                    name, MAX_BREATHING_PHASE_SECONDS, seconds
                ))
                .into());
            }
        }

        if breathing.default_cycles == 0 {
            return Err(OkuError::Config(
                "breathing.default_cycles must be greater than 0".to_string(),
            )
            .into());
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}
