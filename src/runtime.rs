//! Runtime for executing dialogues
//!
//! A single worker drains the inbound channel, so events are processed one at
//! a time in arrival order.

mod executor;
pub mod traits;

#[cfg(test)]
pub mod testing;

pub use executor::BotRuntime;
pub use traits::*;

use crate::store::{ChatId, InMemoryDialogueStore, InMemorySurveyStore, UserId};
use crate::telegram::TelegramClient;
use std::sync::Arc;

/// Type alias for production runtime with concrete implementations
pub type ProductionRuntime =
    BotRuntime<Arc<InMemoryDialogueStore>, Arc<InMemorySurveyStore>, TelegramClient>;

/// One unit of inbound work, normalized from the messaging platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    /// Free text or a reply-keyboard label
    Message {
        user_id: UserId,
        chat_id: ChatId,
        text: String,
    },
    /// Inline button press
    Selection {
        callback_id: String,
        user_id: UserId,
        chat_id: ChatId,
        payload: String,
    },
}

impl Inbound {
    pub fn user_id(&self) -> UserId {
        match self {
            Inbound::Message { user_id, .. } | Inbound::Selection { user_id, .. } => *user_id,
        }
    }
}
