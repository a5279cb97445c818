//! WebSocket client for the upstream depth stream

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};

use crate::error::{FeedError, Result};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// A single connection to one symbol's delta stream.
pub struct DeltaStream {
    stream: WsStream,
}

impl DeltaStream {
    /// Dial the stream endpoint.
    pub async fn connect(url: &str) -> Result<Self> {
        info!(url = %url, "Connecting to depth stream");

        let (stream, response) = connect_async(url)
            .await
            .map_err(|e| FeedError::WebSocketConnection(format!("Failed to connect: {}", e)))?;

        info!(status = ?response.status(), "Depth stream connected");
        Ok(Self { stream })
    }

    /// Receive the next text payload.
    ///
    /// Control frames are handled inline and yield `Ok(None)`; a close frame
    /// or a dead stream is a connection error.
    pub async fn recv(&mut self) -> Result<Option<String>> {
        match self.stream.next().await {
            Some(Ok(Message::Text(text))) => Ok(Some(text)),
            Some(Ok(Message::Binary(data))) => {
                Ok(Some(String::from_utf8_lossy(&data).to_string()))
            }
            Some(Ok(Message::Ping(data))) => {
                debug!("Received ping, sending pong");
                let _ = self.stream.send(Message::Pong(data)).await;
                Ok(None)
            }
            Some(Ok(Message::Pong(_))) => Ok(None),
            Some(Ok(Message::Close(frame))) => {
                warn!(frame = ?frame, "Received close frame");
                Err(FeedError::WebSocketConnection(
                    "Connection closed".to_string(),
                ))
            }
            Some(Ok(Message::Frame(_))) => Ok(None),
            Some(Err(e)) => Err(FeedError::WebSocketMessage(e.to_string())),
            None => Err(FeedError::WebSocketConnection("Stream ended".to_string())),
        }
    }

    /// Close the connection.
    pub async fn close(&mut self) {
        let _ = self.stream.close(None).await;
    }
}
