//! Push-update channel: an in-process broadcast fan-out, optionally fed by
//! the server's websocket.

use futures::{SinkExt, StreamExt};
use shared::protocol::{PushUpdate, StatusQuery};
use tokio::{sync::broadcast, task::JoinHandle};
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, info, warn};

use crate::error::WidgetError;

#[derive(Clone)]
pub struct PushChannel {
    tx: broadcast::Sender<PushUpdate>,
}

impl PushChannel {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Fans the update out to every subscriber. Returns how many received it.
    pub fn publish(&self, update: PushUpdate) -> usize {
        self.tx.send(update).unwrap_or(0)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PushUpdate> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for PushChannel {
    fn default() -> Self {
        Self::new(256)
    }
}

pub fn query_frame(addrs: &[String]) -> String {
    serde_json::to_string(&StatusQuery {
        query: addrs.to_vec(),
    })
    .unwrap_or_else(|_| r#"{"query":[]}"#.to_string())
}

/// Connects to the websocket feed and republishes every decoded update on
/// `channel`. When `query` is non-empty a status query is sent first, so the
/// server replies with the latest known values. Malformed frames are skipped.
pub async fn spawn_push_feed(
    ws_url: &str,
    channel: PushChannel,
    query: &[String],
) -> Result<JoinHandle<()>, WidgetError> {
    let (ws_stream, _) = connect_async(ws_url)
        .await
        .map_err(|err| WidgetError::PushFeed(format!("{ws_url}: {err}")))?;
    let (mut ws_writer, mut ws_reader) = ws_stream.split();

    if !query.is_empty() {
        ws_writer
            .send(Message::Text(query_frame(query)))
            .await
            .map_err(|err| WidgetError::PushFeed(err.to_string()))?;
    }
    info!(%ws_url, "push feed connected");

    Ok(tokio::spawn(async move {
        // keep the write half open for the lifetime of the feed
        let _ws_writer = ws_writer;
        while let Some(msg) = ws_reader.next().await {
            match msg {
                Ok(Message::Text(text)) => match serde_json::from_str::<PushUpdate>(&text) {
                    Ok(update) => {
                        channel.publish(update);
                    }
                    Err(error) => debug!(%error, "skipping malformed push frame"),
                },
                Ok(Message::Close(_)) => break,
                Ok(_) => {}
                Err(error) => {
                    warn!(%error, "push feed read failed");
                    break;
                }
            }
        }
        info!("push feed closed");
    }))
}

#[cfg(test)]
#[path = "tests/push_tests.rs"]
mod tests;
