//! Provider module for OKU
//!
//! This module contains the remote chat endpoint abstraction and the
//! Google Gemini implementation.

pub mod base;
pub mod gemini;

pub use base::{ChatSession, Provider, SamplingConfig, SessionRequest, DEFAULT_MODEL};
pub use gemini::GeminiProvider;

use crate::config::ProviderConfig;
use crate::error::{OkuError, Result};

/// Create a provider instance based on configuration
///
/// # Arguments
///
/// * `provider_type` - Type of provider ("gemini")
/// * `config` - Provider configuration
///
/// # Errors
///
/// Returns error if provider type is invalid or initialization fails
///
/// # Examples
///
/// ```
/// use oku::config::Config;
/// use oku::providers::create_provider;
///
/// let config = Config::default();
/// let provider = create_provider("gemini", &config.provider).unwrap();
/// assert_eq!(provider.name(), "gemini");
/// ```
pub fn create_provider(provider_type: &str, config: &ProviderConfig) -> Result<Box<dyn Provider>> {
    match provider_type {
        "gemini" => Ok(Box::new(GeminiProvider::new(config.gemini.clone())?)),
        _ => Err(OkuError::Provider(format!("Unknown provider type: {}", provider_type)).into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeminiConfig;

    #[test]
    fn test_create_provider_invalid_type() {
        let config = ProviderConfig {
            provider_type: "invalid".to_string(),
            gemini: GeminiConfig::default(),
        };

        let result = create_provider("invalid", &config);
        assert!(result.is_err());
    }

    #[test]
    fn test_create_provider_gemini() {
        let config = ProviderConfig {
            provider_type: "gemini".to_string(),
            gemini: GeminiConfig {
                model: "gemini-2.0-flash".to_string(),
                ..GeminiConfig::default()
            },
        };

        let provider = create_provider("gemini", &config).unwrap();
        assert_eq!(provider.name(), "gemini");
    }
}
