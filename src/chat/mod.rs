//! Conversation state: messages, transcript, session ownership and the
//! controller that ties them to a remote chat endpoint.

pub mod controller;
pub mod message;
pub mod session;
pub mod transcript;

pub use controller::{
    ConversationController, IgnoreReason, SendOutcome, SessionStatus, FALLBACK_REPLY,
    SEND_ERROR_MESSAGE,
};
pub use message::{Message, Role};
pub use session::SessionOwner;
pub use transcript::Transcript;
