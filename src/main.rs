//! L3 Order Book Estimator
//!
//! Reconstructs per-order queues from Binance futures depth streams and
//! serves L3 snapshots to WebSocket subscribers on :8080.

use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use l3_orderbook::{server, AppState, Config, Controller, PrecisionManager};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().json())
        .with(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .init();

    let symbol_arg = std::env::args().nth(1);
    let config = Arc::new(Config::load(symbol_arg)?);
    info!(symbol = %config.symbol.to_uppercase(), "Starting L3 order book estimator");

    let controller = Controller::start(config.clone())?;
    let precision = Arc::new(PrecisionManager::new(config.clone())?);

    let state = Arc::new(AppState {
        controller,
        precision,
        config,
    });

    server::serve(state).await
}
