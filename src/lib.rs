//! L3 Order Book Estimator
//!
//! Reconstructs a per-order (Level-3) view of a futures order book from
//! Binance Level-2 depth streams and publishes periodic L3 snapshots to
//! WebSocket subscribers.

use std::sync::Arc;

pub mod config;
pub mod controller;
pub mod error;
pub mod metrics;
pub mod orderbook;
pub mod parser;
pub mod precision;
pub mod publisher;
pub mod server;
pub mod sync;

pub use config::Config;
pub use controller::Controller;
pub use error::{FeedError, Result};
pub use orderbook::{L3Book, L3Level, L3Snapshot, OrderQueue};
pub use parser::{DepthSnapshot, DepthUpdate};
pub use precision::PrecisionManager;
pub use sync::FeedSynchronizer;

/// Application state shared across components
pub struct AppState {
    pub controller: Arc<Controller>,
    pub precision: Arc<PrecisionManager>,
    pub config: Arc<Config>,
}
