//! Trait abstractions for runtime I/O
//!
//! The stores live in `crate::store`; the only remaining seam is outbound
//! delivery, which tests replace with a recording mock.

use crate::reply::Reply;
use crate::store::ChatId;
use crate::telegram::{TelegramClient, TransportError};
use async_trait::async_trait;
use std::sync::Arc;

/// Outbound side of the messaging platform
#[async_trait]
pub trait Transport: Send + Sync {
    /// Deliver a reply to a chat
    async fn send(&self, chat_id: ChatId, reply: &Reply) -> Result<(), TransportError>;

    /// Acknowledge an inline button press so the client stops its spinner
    async fn acknowledge(&self, callback_id: &str) -> Result<(), TransportError>;
}

// ============================================================================
// Arc implementations for trait objects
// ============================================================================

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn send(&self, chat_id: ChatId, reply: &Reply) -> Result<(), TransportError> {
        (**self).send(chat_id, reply).await
    }

    async fn acknowledge(&self, callback_id: &str) -> Result<(), TransportError> {
        (**self).acknowledge(callback_id).await
    }
}

// ============================================================================
// Production Adapters
// ============================================================================

#[async_trait]
impl Transport for TelegramClient {
    async fn send(&self, chat_id: ChatId, reply: &Reply) -> Result<(), TransportError> {
        self.send_message(chat_id, reply).await.map(|_| ())
    }

    async fn acknowledge(&self, callback_id: &str) -> Result<(), TransportError> {
        self.answer_callback_query(callback_id).await
    }
}
