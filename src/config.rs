//! Runtime configuration from environment variables

use std::time::Duration;
use thiserror::Error;

const DEFAULT_API_URL: &str = "https://api.telegram.org";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_POLL_TIMEOUT_SECS: u64 = 60;
/// Long-poll requests are held open by Telegram for at most this long
const MAX_POLL_TIMEOUT_SECS: u64 = 600;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} has invalid value {value:?}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// How updates reach the bot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateMode {
    /// `getUpdates` long polling
    Poll,
    /// Telegram pushes updates to `POST /telegram/webhook`
    Webhook,
}

#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    pub bot_token: String,
    pub api_url: String,
    pub mode: UpdateMode,
    pub port: u16,
    pub webhook_secret: Option<String>,
    pub poll_timeout: Duration,
}

// The token never reaches logs
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("bot_token", &"<redacted>")
            .field("api_url", &self.api_url)
            .field("mode", &self.mode)
            .field("port", &self.port)
            .field("webhook_secret", &self.webhook_secret.as_ref().map(|_| "<redacted>"))
            .field("poll_timeout", &self.poll_timeout)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let bot_token = var("TELEGRAM_BOT_TOKEN").ok_or(ConfigError::Missing("TELEGRAM_BOT_TOKEN"))?;

        let mode = match var("SURVEY_BOT_MODE").as_deref() {
            None | Some("poll") => UpdateMode::Poll,
            Some("webhook") => UpdateMode::Webhook,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: "SURVEY_BOT_MODE",
                    value: other.to_string(),
                    reason: "expected \"poll\" or \"webhook\"".to_string(),
                })
            }
        };

        let port = parse_or(var("SURVEY_BOT_PORT"), "SURVEY_BOT_PORT", DEFAULT_PORT)?;
        let poll_timeout = parse_or(
            var("SURVEY_BOT_POLL_TIMEOUT"),
            "SURVEY_BOT_POLL_TIMEOUT",
            DEFAULT_POLL_TIMEOUT_SECS,
        )?;
        if poll_timeout > MAX_POLL_TIMEOUT_SECS {
            return Err(ConfigError::Invalid {
                name: "SURVEY_BOT_POLL_TIMEOUT",
                value: poll_timeout.to_string(),
                reason: format!("must be at most {MAX_POLL_TIMEOUT_SECS} seconds"),
            });
        }

        Ok(Self {
            bot_token,
            api_url: var("TELEGRAM_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            mode,
            port,
            webhook_secret: var("SURVEY_BOT_WEBHOOK_SECRET"),
            poll_timeout: Duration::from_secs(poll_timeout),
        })
    }
}

fn parse_or<T>(value: Option<String>, name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            reason: e.to_string(),
            value,
        }),
    }
}
