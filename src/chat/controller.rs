//! Conversation controller
//!
//! Owns the transcript, the active kernel and the live remote session. The
//! controller is used through `&self` and can be shared in an `Arc`:
//!
//! - the session owner sits behind a `tokio::sync::Mutex`. A send takes it
//!   with `try_lock` and is ignored when it is held, so at most one send is
//!   outstanding. A kernel switch takes it with `lock().await` and therefore
//!   waits for a pending send to resolve before clearing the transcript.
//! - the transcript sits behind a `std::sync::RwLock` that is never held
//!   across an await, so snapshots can be rendered while a send is pending.
//! - crisis overlay visibility is published on a `watch` channel.

use crate::chat::{Message, SessionOwner, Transcript};
use crate::error::{OkuError, Result};
use crate::kernel::Kernel;
use crate::providers::{Provider, SamplingConfig, SessionRequest};
use crate::safety::SafetyTrigger;

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::{watch, Mutex};

/// Shown in place of an empty model reply
pub const FALLBACK_REPLY: &str = "Désolé, je n'ai pas pu traiter cette réponse.";

/// Appended as a flagged system message when a send fails
pub const SEND_ERROR_MESSAGE: &str =
    "Désolé, une erreur de connexion est survenue. Vérifiez votre clé API.";

/// Why a send was not performed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Text was empty or whitespace only
    Empty,
    /// Another send or a kernel switch is in flight
    Busy,
}

/// Result of [`ConversationController::send_user_message`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Nothing was appended and no remote call was made
    Ignored(IgnoreReason),
    /// User message and model reply were appended
    Replied,
    /// User message and the fixed error message were appended
    Failed,
}

/// Read-only view of the session slot for status displays
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionStatus {
    pub live: bool,
    pub generation: u64,
    pub history_len: usize,
}

/// Drives one conversation with the remote chat endpoint
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use async_trait::async_trait;
/// use oku::chat::{ConversationController, SendOutcome};
/// use oku::error::Result;
/// use oku::kernel::KernelRegistry;
/// use oku::providers::{ChatSession, Provider, SamplingConfig, SessionRequest};
///
/// struct Echo;
///
/// #[async_trait]
/// impl ChatSession for Echo {
///     async fn send_message(&mut self, text: &str) -> Result<String> {
///         Ok(format!("echo: {}", text))
///     }
///     fn id(&self) -> &str {
///         "echo"
///     }
/// }
///
/// #[async_trait]
/// impl Provider for Echo {
///     async fn create_session(&self, _request: SessionRequest) -> Result<Box<dyn ChatSession>> {
///         Ok(Box::new(Echo))
///     }
/// }
///
/// # tokio_test::block_on(async {
/// let controller =
///     ConversationController::new(Arc::new(Echo), "model", SamplingConfig::default()).unwrap();
/// controller
///     .switch_kernel(KernelRegistry::builtin().default_kernel())
///     .await
///     .unwrap();
///
/// assert_eq!(controller.send_user_message("allo").await, SendOutcome::Replied);
/// assert_eq!(controller.transcript()[2].content(), "echo: allo");
/// # });
/// ```
pub struct ConversationController {
    provider: Arc<dyn Provider>,
    model: String,
    sampling: SamplingConfig,
    safety: SafetyTrigger,
    session: Mutex<SessionOwner>,
    transcript: RwLock<Transcript>,
    active_kernel: RwLock<Option<&'static Kernel>>,
    init_error: RwLock<Option<String>>,
    crisis: watch::Sender<bool>,
}

impl ConversationController {
    /// Creates a controller with no active kernel and no session
    ///
    /// Call [`switch_kernel`](Self::switch_kernel) to open the first session.
    ///
    /// # Errors
    ///
    /// Returns error if the safety pattern fails to compile
    pub fn new(
        provider: Arc<dyn Provider>,
        model: impl Into<String>,
        sampling: SamplingConfig,
    ) -> Result<Self> {
        let (crisis, _) = watch::channel(false);
        Ok(Self {
            provider,
            model: model.into(),
            sampling,
            safety: SafetyTrigger::new()?,
            session: Mutex::new(SessionOwner::new()),
            transcript: RwLock::new(Transcript::new()),
            active_kernel: RwLock::new(None),
            init_error: RwLock::new(None),
            crisis,
        })
    }

    /// Activates a kernel with a fresh remote session
    ///
    /// Waits for any pending send, clears the transcript, disposes the old
    /// session and opens a new one seeded with the kernel's system
    /// instruction. On success the opening message is the only transcript
    /// entry. On failure the transcript stays empty, no session is live and
    /// the error is kept for [`init_error`](Self::init_error).
    ///
    /// # Errors
    ///
    /// Returns the provider error when the session cannot be created
    pub async fn switch_kernel(&self, kernel: &'static Kernel) -> Result<()> {
        let mut owner = self.session.lock().await;

        tracing::info!("Switching to kernel {}", kernel.id);
        self.transcript_mut().clear();
        owner.dispose();
        *write(&self.active_kernel) = Some(kernel);

        let request = SessionRequest::new(kernel.system_instruction, self.model.clone())
            .with_sampling(self.sampling);

        match self.provider.create_session(request).await {
            Ok(session) => {
                owner.replace(session);
                self.transcript_mut()
                    .push(Message::model(kernel.opening_message));
                *write(&self.init_error) = None;
                tracing::debug!(
                    "Kernel {} active, session generation {}",
                    kernel.id,
                    owner.generation()
                );
                Ok(())
            }
            Err(e) => {
                tracing::error!("Failed to initialize chat for kernel {}: {:#}", kernel.id, e);
                *write(&self.init_error) = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Re-opens the active kernel, discarding the conversation
    ///
    /// # Errors
    ///
    /// Returns error if no kernel was ever activated or the session cannot
    /// be created
    pub async fn reset(&self) -> Result<()> {
        let kernel = self
            .active_kernel()
            .ok_or(OkuError::SessionUnavailable)?;
        self.switch_kernel(kernel).await
    }

    /// Sends user text to the live session
    ///
    /// Empty input and input arriving while another send is pending are
    /// ignored without touching the transcript. Otherwise the user message
    /// is appended first, the safety trigger is evaluated against the raw
    /// text, and exactly one reply or error message follows.
    pub async fn send_user_message(&self, text: &str) -> SendOutcome {
        if text.trim().is_empty() {
            return SendOutcome::Ignored(IgnoreReason::Empty);
        }

        let Ok(mut owner) = self.session.try_lock() else {
            tracing::debug!("Send ignored: another request is in flight");
            return SendOutcome::Ignored(IgnoreReason::Busy);
        };

        self.transcript_mut().push(Message::user(text));

        if self.safety.check(text) {
            self.show_crisis();
        }

        let result = match owner.session_mut() {
            Some(session) => session.send_message(text).await,
            None => Err(OkuError::SessionUnavailable.into()),
        };

        match result {
            Ok(reply) => {
                let content = if reply.trim().is_empty() {
                    FALLBACK_REPLY.to_string()
                } else {
                    reply
                };
                self.transcript_mut().push(Message::model(content));
                SendOutcome::Replied
            }
            Err(e) => {
                tracing::error!("Chat send failed: {:#}", e);
                self.transcript_mut().push(Message::error(SEND_ERROR_MESSAGE));
                SendOutcome::Failed
            }
        }
    }

    /// Raises the crisis overlay
    pub fn show_crisis(&self) {
        if !self.crisis.send_replace(true) {
            tracing::info!("Crisis overlay raised");
        }
    }

    /// Lowers the crisis overlay
    pub fn dismiss_crisis(&self) {
        if self.crisis.send_replace(false) {
            tracing::info!("Crisis overlay dismissed");
        }
    }

    pub fn crisis_visible(&self) -> bool {
        *self.crisis.borrow()
    }

    /// Receiver notified on every overlay visibility change
    pub fn subscribe_crisis(&self) -> watch::Receiver<bool> {
        self.crisis.subscribe()
    }

    /// Snapshot of the transcript
    pub fn transcript(&self) -> Vec<Message> {
        read(&self.transcript).messages().to_vec()
    }

    pub fn transcript_len(&self) -> usize {
        read(&self.transcript).len()
    }

    pub fn active_kernel(&self) -> Option<&'static Kernel> {
        *read(&self.active_kernel)
    }

    /// True while a send or a kernel switch holds the session
    pub fn is_busy(&self) -> bool {
        self.session.try_lock().is_err()
    }

    /// Last session initialisation error, cleared by a successful switch
    pub fn init_error(&self) -> Option<String> {
        read(&self.init_error).clone()
    }

    /// Session slot status, `None` while busy
    pub fn session_status(&self) -> Option<SessionStatus> {
        let owner = self.session.try_lock().ok()?;
        Some(SessionStatus {
            live: owner.is_live(),
            generation: owner.generation(),
            history_len: owner.history_len(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    fn transcript_mut(&self) -> RwLockWriteGuard<'_, Transcript> {
        write(&self.transcript)
    }
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}
