//! Per-subscriber snapshot publisher
//!
//! Every subscriber connection gets its own publisher task pumping L3
//! snapshots at a fixed cadence until the peer stops accepting them.

use axum::extract::ws::{Message, WebSocket};
use futures_util::stream::SplitSink;
use futures_util::SinkExt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::interval;
use tracing::{debug, warn};

use crate::metrics::FRAMES_PUBLISHED;
use crate::server::OutboundMessage;
use crate::AppState;

/// Write half of a subscriber socket, shared with the command-reply path.
pub type SubscriberSink = Arc<Mutex<SplitSink<WebSocket, Message>>>;

/// Pushes the current book's snapshot to one subscriber at 20 Hz.
pub struct Publisher {
    state: Arc<AppState>,
    sink: SubscriberSink,
}

impl Publisher {
    pub fn new(state: Arc<AppState>, sink: SubscriberSink) -> Self {
        Self { state, sink }
    }

    /// Tick until the subscriber disconnects.
    pub async fn run(self) {
        let mut ticker = interval(Duration::from_millis(self.state.config.publish_interval_ms));

        loop {
            ticker.tick().await;

            // Read the current book reference first, then snapshot under its
            // read lock; a symbol switch between ticks is picked up here.
            let book = self.state.controller.book().await;
            let snapshot = book.read().await.snapshot(self.state.config.top_levels);

            let frame = OutboundMessage::L3Update { data: snapshot };
            let text = match serde_json::to_string(&frame) {
                Ok(text) => text,
                Err(e) => {
                    warn!(error = %e, "Failed to serialize snapshot");
                    continue;
                }
            };

            let mut sink = self.sink.lock().await;
            if sink.send(Message::Text(text)).await.is_err() {
                debug!("Subscriber disconnected, stopping publisher");
                return;
            }
            FRAMES_PUBLISHED.inc();
        }
    }
}
