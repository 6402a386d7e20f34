//! Append-only transcript.

use super::message::Message;

/// Ordered messages of one kernel session
///
/// Messages can only be appended; the only way to remove anything is to
/// clear the whole transcript, which happens on a kernel switch.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: Message) {
        tracing::trace!(
            "Transcript append: role={}, error={}",
            message.role(),
            message.is_error()
        );
        self.messages.push(message);
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }
}
