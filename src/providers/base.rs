//! Base provider traits and common types for OKU
//!
//! A provider opens remote chat sessions; a session carries one remote
//! conversation context and exchanges text with the model. Both are trait
//! objects so the conversation controller never depends on a concrete
//! endpoint.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Default model used for new sessions
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Sampling parameters passed through unchanged for every session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplingConfig {
    /// Sampling temperature (0.0 - 2.0)
    pub temperature: f32,
    /// Top-k cut-off
    pub top_k: u32,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_k: 40,
        }
    }
}

/// Everything a provider needs to open a session
#[derive(Debug, Clone, PartialEq)]
pub struct SessionRequest {
    /// Persona instruction, sent once per session as the system prompt
    pub system_instruction: String,
    /// Model identifier, e.g. `gemini-2.5-flash`
    pub model: String,
    pub sampling: SamplingConfig,
}

impl SessionRequest {
    /// Creates a request with default sampling
    ///
    /// # Examples
    ///
    /// ```
    /// use oku::providers::SessionRequest;
    ///
    /// let request = SessionRequest::new("You are calm.", "gemini-2.5-flash");
    /// assert_eq!(request.sampling.top_k, 40);
    /// ```
    pub fn new(system_instruction: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            system_instruction: system_instruction.into(),
            model: model.into(),
            sampling: SamplingConfig::default(),
        }
    }

    pub fn with_sampling(mut self, sampling: SamplingConfig) -> Self {
        self.sampling = sampling;
        self
    }
}

/// One live remote conversation context
///
/// Implementations keep whatever state the endpoint needs to continue the
/// conversation (server-side handle or replayed history).
#[async_trait]
pub trait ChatSession: Send {
    /// Sends user text and returns the model reply
    ///
    /// An empty string is a valid reply; callers decide how to present it.
    ///
    /// # Errors
    ///
    /// Returns error on transport failure, non-success status or an
    /// unparseable response
    async fn send_message(&mut self, text: &str) -> Result<String>;

    /// Identifier of this session, used in logs
    fn id(&self) -> &str;

    /// Number of exchanged turns currently held by the session
    fn history_len(&self) -> usize {
        0
    }
}

/// Factory for remote chat sessions
///
/// # Examples
///
/// ```no_run
/// use async_trait::async_trait;
/// use oku::error::Result;
/// use oku::providers::{ChatSession, Provider, SessionRequest};
///
/// struct Echo;
///
/// #[async_trait]
/// impl ChatSession for Echo {
///     async fn send_message(&mut self, text: &str) -> Result<String> {
///         Ok(text.to_string())
///     }
///     fn id(&self) -> &str {
///         "echo"
///     }
/// }
///
/// struct EchoProvider;
///
/// #[async_trait]
/// impl Provider for EchoProvider {
///     async fn create_session(&self, _request: SessionRequest) -> Result<Box<dyn ChatSession>> {
///         Ok(Box::new(Echo))
///     }
/// }
/// ```
#[async_trait]
pub trait Provider: Send + Sync {
    /// Opens a new remote conversation seeded with the system instruction
    ///
    /// # Errors
    ///
    /// Returns error if the session cannot be initialized
    async fn create_session(&self, request: SessionRequest) -> Result<Box<dyn ChatSession>>;

    /// Short provider name for status output
    fn name(&self) -> &str {
        "unknown"
    }
}
