//! Long-polling update source

use super::TelegramClient;
use crate::runtime::Inbound;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Pause after a failed `getUpdates` before polling again
const RETRY_DELAY: Duration = Duration::from_secs(3);

/// Feed updates into the runtime channel until cancelled or the runtime is gone.
///
/// The offset is advanced past every received update, including ones the bot
/// ignores, so Telegram never redelivers them.
pub async fn poll_updates(
    client: TelegramClient,
    timeout: Duration,
    inbound_tx: mpsc::Sender<Inbound>,
    cancel: CancellationToken,
) {
    tracing::info!(timeout_secs = timeout.as_secs(), "Polling for updates");
    let mut offset: Option<i64> = None;

    loop {
        let result = tokio::select! {
            () = cancel.cancelled() => break,
            result = client.get_updates(offset, timeout) => result,
        };

        let updates = match result {
            Ok(updates) => updates,
            Err(e) => {
                tracing::warn!(error = %e, "getUpdates failed, retrying");
                tokio::select! {
                    () = cancel.cancelled() => break,
                    () = tokio::time::sleep(RETRY_DELAY) => {}
                }
                continue;
            }
        };

        for update in updates {
            offset = Some(update.update_id + 1);
            let Some(inbound) = update.into_inbound() else {
                continue;
            };
            if inbound_tx.send(inbound).await.is_err() {
                tracing::info!("Runtime channel closed, stopping poller");
                return;
            }
        }
    }

    tracing::info!("Update poller stopped");
}
