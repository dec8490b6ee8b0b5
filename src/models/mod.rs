//! Shared models for the Coinone public APIs.
//!
//! Contains the trading pair type, stream channel definitions, the
//! subscription handshake and the inbound stream envelope.

pub mod article;
pub mod candle;
pub mod ticker;

use std::fmt;

use serde::{Deserialize, Serialize};

/// A trading pair, e.g. BTC quoted in KRW.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Pair {
    /// Currency prices are quoted in (`KRW`).
    pub quote: String,
    /// Currency being traded (`BTC`).
    pub target: String,
}

impl Pair {
    /// Creates a pair, upper-casing both currency codes.
    pub fn new(quote: &str, target: &str) -> Self {
        Self {
            quote: quote.trim().to_ascii_uppercase(),
            target: target.trim().to_ascii_uppercase(),
        }
    }
}

impl fmt::Display for Pair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.target, self.quote)
    }
}

/// Public stream channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StreamChannel {
    Ticker,
}

impl StreamChannel {
    /// Returns the wire-format channel name.
    pub fn as_str(&self) -> &'static str {
        match self {
            StreamChannel::Ticker => "TICKER",
        }
    }
}

/// Request kinds accepted by the stream endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RequestType {
    Subscribe,
    Unsubscribe,
    Ping,
}

/// Pair selector used in subscription requests.
#[derive(Debug, Clone, Serialize)]
pub struct Topic {
    pub quote_currency: String,
    pub target_currency: String,
}

impl From<&Pair> for Topic {
    fn from(pair: &Pair) -> Self {
        Self {
            quote_currency: pair.quote.clone(),
            target_currency: pair.target.clone(),
        }
    }
}

/// A `SUBSCRIBE` / `UNSUBSCRIBE` request sent over the stream.
#[derive(Debug, Clone, Serialize)]
pub struct SubscribeRequest {
    pub request_type: RequestType,
    pub channel: StreamChannel,
    pub topic: Topic,
}

impl SubscribeRequest {
    pub fn new(channel: StreamChannel, pair: &Pair) -> Self {
        Self {
            request_type: RequestType::Subscribe,
            channel,
            topic: Topic::from(pair),
        }
    }

    pub fn unsubscribe(channel: StreamChannel, pair: &Pair) -> Self {
        Self {
            request_type: RequestType::Unsubscribe,
            channel,
            topic: Topic::from(pair),
        }
    }
}

/// Keepalive request; the server answers with a `PONG` envelope.
#[derive(Debug, Clone, Serialize)]
pub struct PingRequest {
    pub request_type: RequestType,
}

impl PingRequest {
    pub fn new() -> Self {
        Self {
            request_type: RequestType::Ping,
        }
    }
}

impl Default for PingRequest {
    fn default() -> Self {
        Self::new()
    }
}

/// Envelope of every inbound stream message.
///
/// Only `data` matters for market updates; the remaining fields identify
/// control responses (`CONNECTED`, `SUBSCRIBED`, `PONG`, `ERROR`).
#[derive(Debug, Clone, Deserialize)]
pub struct StreamResponse {
    #[serde(default)]
    pub response_type: Option<String>,
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
    #[serde(default)]
    pub error_code: Option<serde_json::Value>,
    #[serde(default)]
    pub message: Option<String>,
}

impl StreamResponse {
    /// Returns `true` if the server reported a request failure.
    pub fn is_error(&self) -> bool {
        self.response_type.as_deref() == Some("ERROR")
    }
}
