//! Subscriber-facing HTTP/WebSocket server
//!
//! One WebSocket endpoint per subscriber plus health and metrics routes.
//! Each accepted socket is split: a publisher task pushes L3 snapshots on a
//! fixed tick while this module's read loop handles inbound commands.

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use axum::{routing::get, Json, Router};
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, trace, warn};

use crate::orderbook::L3Snapshot;
use crate::precision::PrecisionInfo;
use crate::publisher::{Publisher, SubscriberSink};
use crate::AppState;

/// Commands a subscriber may send.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SubscriberCommand {
    SwitchSymbol { symbol: String },
    RefreshPrecision,
}

/// Frames pushed to a subscriber.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutboundMessage {
    L3Update { data: L3Snapshot },
    SymbolSwitched { symbol: String },
    Precision { data: PrecisionInfo },
    Error { message: String },
}

/// Bind and serve until shutdown.
pub async fn serve(state: Arc<AppState>) -> anyhow::Result<()> {
    let app = Router::new()
        .route("/ws", get(ws_handler))
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .with_state(state.clone());

    info!(addr = %state.config.bind_addr, "L3 order book server listening");

    let listener = tokio::net::TcpListener::bind(&state.config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_subscriber(socket, state))
}

/// Drive one subscriber: spawn its publisher, then loop on inbound commands
/// until the socket drops.
async fn handle_subscriber(socket: WebSocket, state: Arc<AppState>) {
    let (sink, mut inbound) = socket.split();
    let sink: SubscriberSink = Arc::new(Mutex::new(sink));

    let publisher = tokio::spawn(Publisher::new(state.clone(), sink.clone()).run());

    while let Some(message) = inbound.next().await {
        let message = match message {
            Ok(message) => message,
            Err(e) => {
                trace!(error = %e, "Subscriber read error");
                break;
            }
        };

        let text = match message {
            Message::Text(text) => text,
            Message::Close(_) => break,
            _ => continue,
        };

        let command = match serde_json::from_str::<SubscriberCommand>(&text) {
            Ok(command) => command,
            Err(e) => {
                trace!(error = %e, msg = %text, "Ignoring unknown subscriber message");
                continue;
            }
        };

        let reply = dispatch(&state, command).await;
        let text = match serde_json::to_string(&reply) {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "Failed to serialize reply");
                continue;
            }
        };

        let mut guard = sink.lock().await;
        if guard.send(Message::Text(text)).await.is_err() {
            break;
        }
    }

    publisher.abort();
}

async fn dispatch(state: &Arc<AppState>, command: SubscriberCommand) -> OutboundMessage {
    match command {
        SubscriberCommand::SwitchSymbol { symbol } => {
            info!(symbol = %symbol, "Subscriber requested symbol switch");
            match state.controller.switch_symbol(&symbol).await {
                Ok(symbol) => OutboundMessage::SymbolSwitched { symbol },
                Err(e) => OutboundMessage::Error {
                    message: e.to_string(),
                },
            }
        }
        SubscriberCommand::RefreshPrecision => {
            let symbol = state.controller.symbol().await;
            let data = state.precision.get(&symbol).await;
            OutboundMessage::Precision { data }
        }
    }
}

async fn health(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let symbol = state.controller.symbol().await;
    Json(serde_json::json!({
        "status": "healthy",
        "symbol": symbol.to_uppercase(),
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

async fn metrics() -> String {
    crate::metrics::gather()
}
