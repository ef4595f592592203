//! HTTP API: Telegram webhook intake plus liveness endpoints

mod handlers;

pub use handlers::create_router;

use crate::runtime::Inbound;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Header Telegram echoes back with the secret given to `setWebhook`
pub const SECRET_HEADER: &str = "x-telegram-bot-api-secret-token";

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub inbound_tx: mpsc::Sender<Inbound>,
    pub webhook_secret: Option<Arc<str>>,
}

impl AppState {
    pub fn new(inbound_tx: mpsc::Sender<Inbound>, webhook_secret: Option<String>) -> Self {
        Self {
            inbound_tx,
            webhook_secret: webhook_secret.map(Arc::from),
        }
    }
}
