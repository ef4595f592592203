//! Telegram Bot API client

use super::types::{AnswerCallbackQuery, ApiResponse, GetUpdates, Message, SendMessage, Update};
use crate::reply::Reply;
use crate::store::ChatId;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

/// Slack on top of the long-poll timeout before the HTTP request gives up
const REQUEST_SLACK: Duration = Duration::from_secs(10);

/// Update kinds requested from `getUpdates`
const ALLOWED_UPDATES: &[&str] = &["message", "callback_query"];

/// Outbound delivery failure
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network failure. The URL (which embeds the bot token) is stripped.
    #[error("HTTP request failed: {0}")]
    Http(reqwest::Error),
    #[error("Telegram API error {code}: {description}")]
    Api { code: i32, description: String },
    #[error("Failed to decode Telegram response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        TransportError::Http(e.without_url())
    }
}

impl<T> ApiResponse<T> {
    fn into_result(self) -> Result<T, TransportError> {
        match (self.ok, self.result) {
            (true, Some(result)) => Ok(result),
            _ => Err(TransportError::Api {
                code: self.error_code.unwrap_or_default(),
                description: self
                    .description
                    .unwrap_or_else(|| "missing result".to_string()),
            }),
        }
    }
}

/// Thin JSON-over-HTTPS client; cheap to clone
#[derive(Clone)]
pub struct TelegramClient {
    http: Client,
    base_url: String,
}

impl TelegramClient {
    pub fn new(api_url: &str, token: &str, poll_timeout: Duration) -> Result<Self, TransportError> {
        let http = Client::builder()
            .timeout(poll_timeout.saturating_add(REQUEST_SLACK))
            .build()?;

        Ok(Self {
            http,
            base_url: format!("{}/bot{token}", api_url.trim_end_matches('/')),
        })
    }

    async fn call<P, R>(&self, method: &str, params: &P) -> Result<R, TransportError>
    where
        P: Serialize + Sync,
        R: DeserializeOwned,
    {
        let response = self
            .http
            .post(format!("{}/{method}", self.base_url))
            .json(params)
            .send()
            .await?;

        // Error responses carry the same envelope, so the status is not checked separately
        let body = response.text().await?;
        serde_json::from_str::<ApiResponse<R>>(&body)?.into_result()
    }

    /// Long-poll for updates after `offset`
    pub async fn get_updates(
        &self,
        offset: Option<i64>,
        timeout: Duration,
    ) -> Result<Vec<Update>, TransportError> {
        self.call(
            "getUpdates",
            &GetUpdates {
                offset,
                timeout: timeout.as_secs(),
                allowed_updates: ALLOWED_UPDATES,
            },
        )
        .await
    }

    pub async fn send_message(
        &self,
        chat_id: ChatId,
        reply: &Reply,
    ) -> Result<Message, TransportError> {
        self.call("sendMessage", &SendMessage::new(chat_id, reply))
            .await
    }

    pub async fn answer_callback_query(&self, callback_id: &str) -> Result<(), TransportError> {
        let _: bool = self
            .call(
                "answerCallbackQuery",
                &AnswerCallbackQuery {
                    callback_query_id: callback_id,
                },
            )
            .await?;
        Ok(())
    }
}
