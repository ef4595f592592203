//! Telegram Bot API transport
//!
//! Inbound updates arrive through long polling or the webhook endpoint and
//! are normalized into `runtime::Inbound`; replies go out through
//! `TelegramClient`.

mod client;
mod poller;
mod types;

pub use client::{TelegramClient, TransportError};
pub use poller::poll_updates;
pub use types::Update;
