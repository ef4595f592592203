//! Survey bot
//!
//! A Telegram bot that walks creators through authoring multiple-choice
//! surveys and lets anyone take them through inline buttons.

mod api;
mod config;
mod reply;
mod runtime;
mod state_machine;
mod store;
mod survey_taking;
mod telegram;

use api::{create_router, AppState};
use config::{Config, UpdateMode};
use runtime::ProductionRuntime;
use std::net::SocketAddr;
use std::sync::Arc;
use store::{InMemoryDialogueStore, InMemorySurveyStore};
use telegram::TelegramClient;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Bound on inbound events buffered ahead of the dialogue worker
const INBOUND_CAPACITY: usize = 256;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "survey_bot=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    // Configuration
    let config = Config::from_env()?;
    tracing::info!(config = ?config, "Configuration loaded");

    let client = TelegramClient::new(&config.api_url, &config.bot_token, config.poll_timeout)?;
    let runtime: ProductionRuntime = runtime::BotRuntime::new(
        Arc::new(InMemoryDialogueStore::new()),
        Arc::new(InMemorySurveyStore::new()),
        client.clone(),
    );

    let (inbound_tx, inbound_rx) = mpsc::channel(INBOUND_CAPACITY);
    let cancel = CancellationToken::new();

    // Ctrl-C stops the update source; the runtime drains what is queued
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for shutdown signal");
            }
            tracing::info!("Shutdown requested");
            cancel.cancel();
        }
    });

    let source = match config.mode {
        UpdateMode::Poll => tokio::spawn(telegram::poll_updates(
            client,
            config.poll_timeout,
            inbound_tx,
            cancel,
        )),
        UpdateMode::Webhook => {
            let app = create_router(AppState::new(inbound_tx, config.webhook_secret.clone()));
            let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
            let listener = tokio::net::TcpListener::bind(addr).await?;
            tracing::info!("Webhook server listening on {}", addr);

            tokio::spawn(async move {
                if let Err(e) = axum::serve(listener, app)
                    .with_graceful_shutdown(cancel.cancelled_owned())
                    .await
                {
                    tracing::error!(error = %e, "Webhook server failed");
                }
            })
        }
    };

    // Returns once every sender (poller or router state) is dropped
    runtime.run(inbound_rx).await;
    source.await?;

    tracing::info!("Survey bot stopped");
    Ok(())
}
