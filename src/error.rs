//! Error types for the L3 order book service

use thiserror::Error;

/// Errors surfaced by the feed synchronizer, controller, and collaborators
#[derive(Error, Debug)]
pub enum FeedError {
    #[error("WebSocket connection error: {0}")]
    WebSocketConnection(String),

    #[error("WebSocket message error: {0}")]
    WebSocketMessage(String),

    #[error("Failed to parse message: {0}")]
    Parse(String),

    #[error("REST API error: {0}")]
    RestApi(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Symbol {0} not found in exchange info")]
    UnknownSymbol(String),

    #[error("Synchronizer cancelled")]
    Cancelled,
}

impl From<tokio_tungstenite::tungstenite::Error> for FeedError {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        FeedError::WebSocketConnection(err.to_string())
    }
}

impl From<serde_json::Error> for FeedError {
    fn from(err: serde_json::Error) -> Self {
        FeedError::Parse(err.to_string())
    }
}

impl From<reqwest::Error> for FeedError {
    fn from(err: reqwest::Error) -> Self {
        FeedError::RestApi(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, FeedError>;
