//! Feed synchronizer: keeps one book in lockstep with the upstream feed
//!
//! Lifecycle per connection: dial the delta stream, fetch the REST snapshot
//! (retrying until a nonzero update id arrives), then apply deltas until the
//! stream fails or the controller cancels. Failures back off and redial; the
//! snapshot is refetched on every reconnect so the book resyncs from a clean
//! base.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, RwLock};
use tokio::time::{sleep, timeout};
use tracing::{info, warn};

use super::DeltaStream;
use crate::config::Config;
use crate::error::{FeedError, Result};
use crate::metrics::{DELTAS_APPLIED, RECONNECTS, SNAPSHOTS_LOADED};
use crate::orderbook::L3Book;
use crate::parser::{DepthSnapshot, DepthUpdate};

/// Drives one [`L3Book`] from the exchange feed until cancelled.
pub struct FeedSynchronizer {
    symbol: String,
    config: Arc<Config>,
    book: Arc<RwLock<L3Book>>,
    cancel: watch::Receiver<bool>,
    http: reqwest::Client,
}

impl FeedSynchronizer {
    pub fn new(
        symbol: &str,
        config: Arc<Config>,
        book: Arc<RwLock<L3Book>>,
        cancel: watch::Receiver<bool>,
        http: reqwest::Client,
    ) -> Self {
        Self {
            symbol: symbol.to_lowercase(),
            config,
            book,
            cancel,
            http,
        }
    }

    fn cancelled(&self) -> bool {
        *self.cancel.borrow()
    }

    /// Run until the cancel signal is observed. Reconnects with a fixed
    /// backoff on any feed failure.
    pub async fn run(mut self) {
        loop {
            if self.cancelled() {
                info!(symbol = %self.symbol, "Cancelling feed sync");
                return;
            }

            match self.connect_and_sync().await {
                Err(FeedError::Cancelled) => {
                    info!(symbol = %self.symbol, "Cancelling feed sync");
                    return;
                }
                Err(e) => {
                    warn!(symbol = %self.symbol, error = %e, "Feed connection failed, retrying");
                    RECONNECTS.inc();
                    sleep(Duration::from_secs(self.config.backoff_secs)).await;
                }
                Ok(()) => {}
            }
        }
    }

    /// One connection's worth of work: dial, snapshot, live loop.
    async fn connect_and_sync(&mut self) -> Result<()> {
        let url = format!("{}/{}@depth@100ms", self.config.ws_endpoint, self.symbol);
        let mut stream = DeltaStream::connect(&url).await?;

        let snapshot = self.fetch_snapshot().await?;
        {
            let mut book = self.book.write().await;
            book.load_snapshot(&snapshot);
            info!(
                symbol = %self.symbol,
                last_update_id = snapshot.last_update_id,
                bid_levels = book.bid_levels(),
                ask_levels = book.ask_levels(),
                "Depth snapshot loaded"
            );
        }
        SNAPSHOTS_LOADED.inc();

        let read_deadline = Duration::from_millis(self.config.read_deadline_ms);
        loop {
            if self.cancelled() {
                stream.close().await;
                return Err(FeedError::Cancelled);
            }

            match timeout(read_deadline, stream.recv()).await {
                // Read deadline: not an error, poll the cancel signal again
                Err(_) => continue,
                Ok(Ok(None)) => continue,
                Ok(Ok(Some(text))) => {
                    let update: DepthUpdate = match serde_json::from_str(&text) {
                        Ok(update) => update,
                        Err(e) => {
                            warn!(error = %e, "Failed to parse depth update");
                            continue;
                        }
                    };
                    self.book.write().await.apply_delta(&update);
                    DELTAS_APPLIED.inc();
                }
                Ok(Err(e)) => return Err(e),
            }
        }
    }

    /// Fetch the REST snapshot, retrying until a usable body arrives or the
    /// cancel signal is raised.
    async fn fetch_snapshot(&self) -> Result<DepthSnapshot> {
        let url = format!(
            "{}/depth?symbol={}&limit={}",
            self.config.rest_endpoint,
            self.symbol.to_uppercase(),
            self.config.snapshot_depth
        );

        loop {
            if self.cancelled() {
                return Err(FeedError::Cancelled);
            }

            match self.try_fetch(&url).await {
                Ok(snapshot) if snapshot.last_update_id != 0 => return Ok(snapshot),
                Ok(_) => {
                    warn!(symbol = %self.symbol, "Snapshot carried zero update id, retrying");
                }
                Err(e) => {
                    warn!(symbol = %self.symbol, error = %e, "Snapshot fetch failed, retrying");
                }
            }

            sleep(Duration::from_millis(self.config.snapshot_retry_ms)).await;
        }
    }

    async fn try_fetch(&self, url: &str) -> Result<DepthSnapshot> {
        let response = self.http.get(url).send().await?;
        if !response.status().is_success() {
            return Err(FeedError::RestApi(format!(
                "Snapshot request returned status {}",
                response.status()
            )));
        }
        Ok(response.json::<DepthSnapshot>().await?)
    }
}
