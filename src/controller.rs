//! Controller: owns the live book and its feed synchronizer
//!
//! Symbol switching cancels the old synchronizer, builds a fresh empty book
//! and cancel channel, and spawns a new synchronizer before swapping the
//! cell. The swap is eager: the new book stays empty until its sync lands a
//! snapshot.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, RwLock};
use tracing::info;

use crate::config::Config;
use crate::error::{FeedError, Result};
use crate::orderbook::L3Book;
use crate::sync::FeedSynchronizer;

struct Active {
    symbol: String,
    book: Arc<RwLock<L3Book>>,
    cancel: watch::Sender<bool>,
}

/// Top-level owner of the current `(Book, cancel)` pair.
pub struct Controller {
    config: Arc<Config>,
    http: reqwest::Client,
    inner: RwLock<Active>,
}

impl Controller {
    /// Build the controller and spawn the synchronizer for the configured
    /// initial symbol.
    pub fn start(config: Arc<Config>) -> Result<Arc<Self>> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.rest_timeout_secs))
            .build()?;

        let symbol = config.symbol.clone();
        let book = Arc::new(RwLock::new(L3Book::new(&symbol)));
        let cancel = spawn_sync(&symbol, config.clone(), book.clone(), http.clone());

        Ok(Arc::new(Self {
            config,
            http,
            inner: RwLock::new(Active {
                symbol,
                book,
                cancel,
            }),
        }))
    }

    /// Reference to the current book.
    pub async fn book(&self) -> Arc<RwLock<L3Book>> {
        self.inner.read().await.book.clone()
    }

    /// Current symbol, lower-cased.
    pub async fn symbol(&self) -> String {
        self.inner.read().await.symbol.clone()
    }

    /// Switch the live symbol. Returns the uppercase symbol on success.
    ///
    /// Switching to the current symbol is a no-op success. Otherwise the old
    /// synchronizer's cancel is raised and a fresh book + synchronizer take
    /// its place; no delta from the old feed can reach the new book.
    pub async fn switch_symbol(&self, requested: &str) -> Result<String> {
        let symbol = requested.trim().to_lowercase();
        if symbol.is_empty() {
            return Err(FeedError::Config("symbol must not be empty".to_string()));
        }

        let mut inner = self.inner.write().await;
        if inner.symbol == symbol {
            return Ok(symbol.to_uppercase());
        }

        info!(from = %inner.symbol, to = %symbol, "Switching symbol");
        let _ = inner.cancel.send(true);

        let book = Arc::new(RwLock::new(L3Book::new(&symbol)));
        let cancel = spawn_sync(&symbol, self.config.clone(), book.clone(), self.http.clone());

        *inner = Active {
            symbol: symbol.clone(),
            book,
            cancel,
        };

        Ok(symbol.to_uppercase())
    }
}

fn spawn_sync(
    symbol: &str,
    config: Arc<Config>,
    book: Arc<RwLock<L3Book>>,
    http: reqwest::Client,
) -> watch::Sender<bool> {
    let (tx, rx) = watch::channel(false);
    let sync = FeedSynchronizer::new(symbol, config, book, rx, http);
    tokio::spawn(sync.run());
    tx
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Arc<Config> {
        Arc::new(Config {
            symbol: "ethusdt".to_string(),
            // Unroutable endpoints keep the spawned synchronizers inert
            ws_endpoint: "ws://127.0.0.1:1".to_string(),
            rest_endpoint: "http://127.0.0.1:1".to_string(),
            ..Config::default()
        })
    }

    #[tokio::test]
    async fn switch_to_same_symbol_keeps_book() {
        let controller = Controller::start(test_config()).unwrap();
        let before = controller.book().await;

        let switched = controller.switch_symbol("ETHUSDT").await.unwrap();
        assert_eq!(switched, "ETHUSDT");
        assert!(Arc::ptr_eq(&before, &controller.book().await));
    }

    #[tokio::test]
    async fn switch_to_new_symbol_replaces_book() {
        let controller = Controller::start(test_config()).unwrap();
        let before = controller.book().await;

        let switched = controller.switch_symbol("btcusdt").await.unwrap();
        assert_eq!(switched, "BTCUSDT");
        assert_eq!(controller.symbol().await, "btcusdt");

        let after = controller.book().await;
        assert!(!Arc::ptr_eq(&before, &after));
        assert_eq!(after.read().await.symbol(), "BTCUSDT");
        assert_eq!(after.read().await.last_update_id(), 0);
    }

    #[tokio::test]
    async fn empty_symbol_is_rejected() {
        let controller = Controller::start(test_config()).unwrap();
        let before = controller.book().await;

        assert!(controller.switch_symbol("   ").await.is_err());
        assert!(Arc::ptr_eq(&before, &controller.book().await));
    }
}
