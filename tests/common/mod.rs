use std::collections::VecDeque;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tempfile::TempDir;
use tokio::sync::{Notify, Semaphore};

use oku::chat::ConversationController;
use oku::error::{OkuError, Result};
use oku::providers::{ChatSession, Provider, SamplingConfig, SessionRequest};

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}

/// Scripted reply for the next send
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub enum Reply {
    Text(&'static str),
    Fail,
}

#[derive(Default)]
struct Shared {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<SessionRequest>>,
    sent: Mutex<Vec<String>>,
    fail_init: Mutex<bool>,
}

/// In-memory provider that replays scripted replies
///
/// Clones share state, so a test can keep one handle while the controller
/// owns another. With `gated()` every send blocks until `release()`.
#[derive(Clone, Default)]
pub struct ScriptedProvider {
    shared: Arc<Shared>,
    gate: Option<Arc<Semaphore>>,
    started: Arc<Notify>,
}

#[allow(dead_code)]
impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_replies(replies: impl IntoIterator<Item = Reply>) -> Self {
        let provider = Self::new();
        provider.shared.replies.lock().unwrap().extend(replies);
        provider
    }

    pub fn gated(mut self) -> Self {
        self.gate = Some(Arc::new(Semaphore::new(0)));
        self
    }

    pub fn push_reply(&self, reply: Reply) {
        self.shared.replies.lock().unwrap().push_back(reply);
    }

    pub fn fail_init(&self, fail: bool) {
        *self.shared.fail_init.lock().unwrap() = fail;
    }

    /// Session requests seen so far
    pub fn requests(&self) -> Vec<SessionRequest> {
        self.shared.requests.lock().unwrap().clone()
    }

    /// Texts that reached a session
    pub fn sent(&self) -> Vec<String> {
        self.shared.sent.lock().unwrap().clone()
    }

    /// Waits until a send has reached the session
    pub async fn wait_started(&self) {
        self.started.notified().await;
    }

    /// Lets one gated send complete
    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.add_permits(1);
        }
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    async fn create_session(&self, request: SessionRequest) -> Result<Box<dyn ChatSession>> {
        self.shared.requests.lock().unwrap().push(request);
        if *self.shared.fail_init.lock().unwrap() {
            return Err(OkuError::Provider("session init refused".to_string()).into());
        }
        let generation = self.shared.requests.lock().unwrap().len();
        Ok(Box::new(ScriptedSession {
            id: format!("scripted-{}", generation),
            provider: self.clone(),
        }))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

struct ScriptedSession {
    id: String,
    provider: ScriptedProvider,
}

#[async_trait]
impl ChatSession for ScriptedSession {
    async fn send_message(&mut self, text: &str) -> Result<String> {
        self.provider.shared.sent.lock().unwrap().push(text.to_string());
        self.provider.started.notify_one();

        if let Some(gate) = &self.provider.gate {
            gate.acquire()
                .await
                .map_err(|e| OkuError::Provider(e.to_string()))?
                .forget();
        }

        let reply = self
            .provider
            .shared
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Reply::Text("ok"));
        match reply {
            Reply::Text(text) => Ok(text.to_string()),
            Reply::Fail => Err(OkuError::Provider("scripted failure".to_string()).into()),
        }
    }

    fn id(&self) -> &str {
        &self.id
    }
}

/// Controller over a scripted provider with default model and sampling
#[allow(dead_code)]
pub fn controller_with(provider: &ScriptedProvider) -> ConversationController {
    ConversationController::new(
        Arc::new(provider.clone()),
        "test-model",
        SamplingConfig::default(),
    )
    .expect("controller")
}
