//! OKU - meditation and well-being companion library
//!
//! This library provides the core functionality for OKU: a conversation
//! with a meditation persona ("kernel") backed by a hosted LLM chat
//! endpoint, a client-side safety trigger with crisis resources, and a
//! cardiac coherence breathing exercise.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `kernel`: Static registry of persona configurations
//! - `chat`: Transcript, session ownership and the conversation controller
//! - `providers`: Remote chat endpoint abstraction and the Gemini implementation
//! - `safety`: Keyword trigger and crisis resources
//! - `breathing`: Breathing pattern and terminal animation
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli` / `commands`: Command-line interface and handlers
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use oku::{Config, ConversationController, KernelRegistry};
//! use oku::providers::{create_provider, Provider};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config/config.yaml", &Default::default())?;
//!     config.validate()?;
//!
//!     let provider: Arc<dyn Provider> =
//!         Arc::from(create_provider("gemini", &config.provider)?);
//!     let controller = ConversationController::new(
//!         provider,
//!         config.provider.gemini.model.clone(),
//!         config.provider.gemini.sampling(),
//!     )?;
//!     controller
//!         .switch_kernel(KernelRegistry::builtin().default_kernel())
//!         .await?;
//!     controller.send_user_message("Bonjour").await;
//!     Ok(())
//! }
//! ```

pub mod breathing;
pub mod chat;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod kernel;
pub mod providers;
pub mod safety;

// Re-export commonly used types
pub use chat::{ConversationController, Message, Role, SendOutcome};
pub use config::Config;
pub use error::{OkuError, Result};
pub use kernel::{Kernel, KernelRegistry};
pub use safety::{crisis_resources, CrisisResource, SafetyTrigger};
