//! Owner of the live remote session.

use crate::providers::ChatSession;

/// Holds at most one live remote session
///
/// Replacing the session drops the previous one and bumps a generation
/// counter, so callers can tell whether the session they talked to is
/// still the current one.
#[derive(Default)]
pub struct SessionOwner {
    session: Option<Box<dyn ChatSession>>,
    generation: u64,
}

impl SessionOwner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs a new session, disposing of the previous one
    pub fn replace(&mut self, session: Box<dyn ChatSession>) {
        self.dispose();
        tracing::debug!("Session {} is now live", session.id());
        self.session = Some(session);
        self.generation += 1;
    }

    /// Drops the live session, if any
    pub fn dispose(&mut self) {
        if let Some(old) = self.session.take() {
            tracing::debug!(
                "Disposing session {} ({} history entries)",
                old.id(),
                old.history_len()
            );
        }
    }

    pub fn session_mut(&mut self) -> Option<&mut (dyn ChatSession + 'static)> {
        self.session.as_deref_mut()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_live(&self) -> bool {
        self.session.is_some()
    }

    /// History length reported by the live session, 0 when none
    pub fn history_len(&self) -> usize {
        self.session.as_ref().map_or(0, |s| s.history_len())
    }
}
