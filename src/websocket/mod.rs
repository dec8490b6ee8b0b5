//! Async WebSocket client for the Coinone public stream.
//!
//! This module is organized by concern:
//! - [`subscription`] - Channel subscribe/unsubscribe requests
//! - [`handler`] - Incoming message parsing
//! - [`connection`] - Ticker connection lifecycle

mod connection;
mod handler;
mod subscription;

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, info};
use tungstenite::Message;

use crate::Result;
use crate::models::PingRequest;

pub use connection::{ConnectionState, TickerClient};
pub use handler::{StreamEvent, parse_stream_message};
pub use subscription::{subscribe, unsubscribe};

/// Write half of a stream connection.
pub type WsWriter = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>;

/// Read half of a stream connection.
pub type WsReader = SplitStream<WebSocketStream<MaybeTlsStream<TcpStream>>>;

/// Establishes a WebSocket connection to the given URL.
///
/// # Errors
///
/// Returns a [`CandleviewError`](crate::CandleviewError) if the connection or TLS handshake fails.
pub async fn connect(url: &str) -> Result<(WsWriter, WsReader)> {
    let (ws_stream, _) = connect_async(url).await?;
    info!(url, "WebSocket handshake completed");

    Ok(ws_stream.split())
}

/// Sends a keepalive ping request.
///
/// # Errors
///
/// Returns a [`CandleviewError`](crate::CandleviewError) if sending the message fails.
pub async fn ping(write: &mut WsWriter) -> Result<()> {
    let json = serde_json::to_string(&PingRequest::new())?;
    write.send(Message::Text(json.into())).await?;
    debug!("Sent ping");

    Ok(())
}

/// Sends a close frame, ending the connection from our side.
///
/// # Errors
///
/// Returns a [`CandleviewError`](crate::CandleviewError) if the frame cannot be sent.
pub async fn close(write: &mut WsWriter) -> Result<()> {
    write.send(Message::Close(None)).await?;
    info!("WebSocket closed");

    Ok(())
}
