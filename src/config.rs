//! Configuration for the L3 order book service

use serde::Deserialize;
use std::env;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Initial symbol, lower-cased (e.g. "ethusdt")
    pub symbol: String,

    /// WebSocket endpoint for the futures depth stream
    pub ws_endpoint: String,

    /// REST API endpoint for snapshots and exchange info
    pub rest_endpoint: String,

    /// Address the subscriber server binds to
    pub bind_addr: String,

    /// Depth limit requested from the REST snapshot
    pub snapshot_depth: usize,

    /// Levels per side included in published snapshots
    pub top_levels: usize,

    /// Publish cadence per subscriber in milliseconds
    pub publish_interval_ms: u64,

    /// Read deadline on the delta stream in milliseconds
    pub read_deadline_ms: u64,

    /// Delay before redialing after a feed failure
    pub backoff_secs: u64,

    /// Delay between REST snapshot retries in milliseconds
    pub snapshot_retry_ms: u64,

    /// REST client timeout in seconds
    pub rest_timeout_secs: u64,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// `symbol_arg` is the optional positional CLI argument; it overrides the
    /// `SYMBOL` environment variable and is folded to lowercase.
    pub fn load(symbol_arg: Option<String>) -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let symbol = symbol_arg
            .or_else(|| env::var("SYMBOL").ok())
            .unwrap_or_else(|| "ethusdt".to_string())
            .trim()
            .to_lowercase();

        Ok(Self {
            symbol,
            ws_endpoint: env::var("WS_ENDPOINT")
                .unwrap_or_else(|_| "wss://fstream.binance.com/ws".to_string()),
            rest_endpoint: env::var("REST_ENDPOINT")
                .unwrap_or_else(|_| "https://fapi.binance.com/fapi/v1".to_string()),
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string()),
            snapshot_depth: env::var("SNAPSHOT_DEPTH")
                .unwrap_or_else(|_| "1000".to_string())
                .parse()
                .unwrap_or(1000),
            top_levels: env::var("TOP_LEVELS")
                .unwrap_or_else(|_| "100".to_string())
                .parse()
                .unwrap_or(100),
            publish_interval_ms: env::var("PUBLISH_INTERVAL_MS")
                .unwrap_or_else(|_| "50".to_string())
                .parse()
                .unwrap_or(50),
            read_deadline_ms: env::var("READ_DEADLINE_MS")
                .unwrap_or_else(|_| "1000".to_string())
                .parse()
                .unwrap_or(1000),
            backoff_secs: env::var("BACKOFF_SECS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .unwrap_or(5),
            snapshot_retry_ms: env::var("SNAPSHOT_RETRY_MS")
                .unwrap_or_else(|_| "200".to_string())
                .parse()
                .unwrap_or(200),
            rest_timeout_secs: env::var("REST_TIMEOUT_SECS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .unwrap_or(10),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            symbol: "ethusdt".to_string(),
            ws_endpoint: "wss://fstream.binance.com/ws".to_string(),
            rest_endpoint: "https://fapi.binance.com/fapi/v1".to_string(),
            bind_addr: "0.0.0.0:8080".to_string(),
            snapshot_depth: 1000,
            top_levels: 100,
            publish_interval_ms: 50,
            read_deadline_ms: 1000,
            backoff_secs: 5,
            snapshot_retry_ms: 200,
            rest_timeout_secs: 10,
        }
    }
}
