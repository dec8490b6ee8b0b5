//! Ticker connection lifecycle.
//!
//! [`TickerClient`] connects, subscribes to the ticker channel for one pair,
//! forwards snapshots to the main loop and keeps the connection alive with
//! periodic pings. When the connection drops it either reconnects with
//! exponential backoff or stays closed, depending on configuration.

use std::time::Duration;

use futures_util::StreamExt;
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, warn};
use tungstenite::Message as WsMessage;

use super::handler::{StreamEvent, parse_stream_message};
use super::{WsReader, WsWriter, close, connect, ping, subscribe, unsubscribe};
use crate::models::{Pair, StreamChannel};
use crate::tui::Message;

/// Interval between keepalive pings while the connection is open.
const PING_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Initial backoff duration between reconnection attempts.
const INITIAL_BACKOFF: Duration = Duration::from_secs(1);

/// Maximum backoff duration between reconnection attempts.
const MAX_BACKOFF: Duration = Duration::from_secs(60);

/// Observable state of the ticker connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Open,
    Closed,
}

impl ConnectionState {
    /// Returns a display string for the state.
    pub fn label(&self) -> &'static str {
        match self {
            ConnectionState::Connecting => "Connecting...",
            ConnectionState::Open => "Live",
            ConnectionState::Closed => "Offline",
        }
    }
}

/// Why the reader loop exited.
enum DisconnectReason {
    /// The connection was lost, errored or closed by the server.
    ConnectionError,
    /// Shutdown was requested or the main loop went away.
    Shutdown,
}

/// Streams ticker snapshots for one pair into the main loop.
pub struct TickerClient {
    url: String,
    pair: Pair,
    reconnect: bool,
    tx: mpsc::UnboundedSender<Message>,
    shutdown: watch::Receiver<bool>,
}

impl TickerClient {
    /// Creates a new ticker client.
    ///
    /// Setting `true` on the `shutdown` channel closes the socket and ends
    /// [`run`](Self::run).
    #[must_use]
    pub fn new(
        url: String,
        pair: Pair,
        reconnect: bool,
        tx: mpsc::UnboundedSender<Message>,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            url,
            pair,
            reconnect,
            tx,
            shutdown,
        }
    }

    /// Runs until shutdown, or until the first disconnect when reconnecting
    /// is disabled.
    pub async fn run(mut self) {
        let mut backoff = INITIAL_BACKOFF;

        loop {
            let (reason, was_open) = self.run_session().await;

            match reason {
                DisconnectReason::Shutdown => {
                    info!("Ticker client shutting down");
                    return;
                }
                DisconnectReason::ConnectionError if !self.reconnect => {
                    info!("Ticker connection closed, reconnect disabled");
                    return;
                }
                DisconnectReason::ConnectionError => {
                    if was_open {
                        backoff = INITIAL_BACKOFF;
                    }
                    info!(backoff_secs = backoff.as_secs(), "Backing off before retry");

                    tokio::select! {
                        () = tokio::time::sleep(backoff) => {}
                        _ = self.shutdown.changed() => {
                            info!("Ticker client shutting down");
                            return;
                        }
                    }
                    backoff = (backoff * 2).min(MAX_BACKOFF);
                }
            }
        }
    }

    /// One connection attempt from `Connecting` to `Closed`.
    ///
    /// Also reports whether the connection ever reached `Open`.
    async fn run_session(&mut self) -> (DisconnectReason, bool) {
        if *self.shutdown.borrow() {
            return (DisconnectReason::Shutdown, false);
        }
        if !self.set_state(ConnectionState::Connecting) {
            return (DisconnectReason::Shutdown, false);
        }

        info!(url = %self.url, pair = %self.pair, "Connecting to ticker stream");
        let (mut write, read) = match connect(&self.url).await {
            Ok(pair) => pair,
            Err(e) => {
                error!("Connection failed: {e}");
                self.set_state(ConnectionState::Closed);
                return (DisconnectReason::ConnectionError, false);
            }
        };

        if !self.set_state(ConnectionState::Open) {
            close_quietly(&mut write).await;
            return (DisconnectReason::Shutdown, true);
        }

        if let Err(e) = subscribe(&mut write, StreamChannel::Ticker, &self.pair).await {
            warn!("Subscribe failed: {e}");
            self.set_state(ConnectionState::Closed);
            return (DisconnectReason::ConnectionError, true);
        }

        let reason = read_loop(read, &mut write, &self.tx, &mut self.shutdown).await;

        if matches!(reason, DisconnectReason::Shutdown) {
            if let Err(e) = unsubscribe(&mut write, StreamChannel::Ticker, &self.pair).await {
                debug!("Unsubscribe not sent: {e}");
            }
            close_quietly(&mut write).await;
        }
        self.set_state(ConnectionState::Closed);

        (reason, true)
    }

    /// Notifies the main loop; returns `false` once it has gone away.
    fn set_state(&self, state: ConnectionState) -> bool {
        debug!(state = state.label(), "Ticker connection state");
        self.tx.send(Message::Connection(state)).is_ok()
    }
}

/// Sends a close frame; the socket is going away either way.
async fn close_quietly(write: &mut WsWriter) {
    if let Err(e) = close(write).await {
        debug!("Close frame not sent: {e}");
    }
}

/// Reads frames until the connection ends or shutdown is requested.
async fn read_loop(
    mut read: WsReader,
    write: &mut WsWriter,
    tx: &mpsc::UnboundedSender<Message>,
    shutdown: &mut watch::Receiver<bool>,
) -> DisconnectReason {
    let mut keepalive =
        tokio::time::interval_at(tokio::time::Instant::now() + PING_INTERVAL, PING_INTERVAL);

    loop {
        tokio::select! {
            msg = read.next() => {
                match msg {
                    Some(Ok(WsMessage::Text(text))) => {
                        if !forward(text.as_str(), tx) {
                            return DisconnectReason::Shutdown;
                        }
                    }
                    Some(Ok(WsMessage::Close(frame))) => {
                        info!(?frame, "Server closed the connection");
                        return DisconnectReason::ConnectionError;
                    }
                    Some(Ok(_)) => {} // Binary/Ping/Pong frames
                    Some(Err(e)) => {
                        warn!("WebSocket error: {e}");
                        return DisconnectReason::ConnectionError;
                    }
                    None => {
                        warn!("WebSocket stream ended");
                        return DisconnectReason::ConnectionError;
                    }
                }
            }

            _ = keepalive.tick() => {
                if let Err(e) = ping(write).await {
                    warn!("Ping failed: {e}");
                    return DisconnectReason::ConnectionError;
                }
            }

            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    return DisconnectReason::Shutdown;
                }
            }
        }
    }
}

/// Handles one text frame; returns `false` once the main loop has gone away.
fn forward(text: &str, tx: &mpsc::UnboundedSender<Message>) -> bool {
    match parse_stream_message(text) {
        Ok(StreamEvent::Ticker(snapshot)) => tx.send(Message::Ticker(snapshot)).is_ok(),
        Ok(StreamEvent::Error { code, message }) => {
            warn!(%code, %message, "Stream request rejected");
            true
        }
        Ok(StreamEvent::Control(kind)) => {
            debug!(response_type = %kind, "Stream control response");
            true
        }
        Ok(StreamEvent::Ignored) => true,
        Err(e) => {
            warn!("Skipping stream message: {e}");
            true
        }
    }
}
