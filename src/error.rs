//! Error types for OKU
//!
//! This module defines all error types used throughout the application,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for OKU operations
///
/// Covers configuration loading, provider interactions, kernel lookup,
/// session lifecycle and in-chat command parsing.
#[derive(Error, Debug)]
pub enum OkuError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Provider-related errors (client setup, HTTP status, API error bodies)
    #[error("Provider error: {0}")]
    Provider(String),

    /// Requested kernel id is not in the registry
    #[error("Unknown kernel: {id}. Available kernels: {available}")]
    UnknownKernel {
        /// The id that was requested
        id: String,
        /// Comma separated list of valid ids
        available: String,
    },

    /// No live remote session (initialization failed or was never attempted)
    #[error("Chat session not initialized")]
    SessionUnavailable,

    /// Invalid in-chat command
    #[error("Command error: {0}")]
    Command(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP transport errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for OKU operations
///
/// Uses `anyhow::Error` so callers get context chaining and `?` on any
/// error type, while library code raises typed `OkuError` variants.
pub type Result<T> = anyhow::Result<T>;
