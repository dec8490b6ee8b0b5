//! Incoming stream message parsing.

use crate::Result;
use crate::error::CandleviewError;
use crate::models::ticker::TickerSnapshot;
use crate::models::{StreamChannel, StreamResponse};

/// What a single inbound text frame means to the ticker.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// A fresh ticker snapshot.
    Ticker(Box<TickerSnapshot>),
    /// A control response such as `CONNECTED`, `SUBSCRIBED` or `PONG`.
    Control(String),
    /// The server rejected a request.
    Error { code: String, message: String },
    /// Anything else (other channels, empty envelopes).
    Ignored,
}

/// Parses one text frame from the stream.
///
/// # Errors
///
/// Returns [`CandleviewError::MalformedMessage`] if the frame is not JSON or
/// its `data` does not describe a ticker.
pub fn parse_stream_message(text: &str) -> Result<StreamEvent> {
    let response: StreamResponse = serde_json::from_str(text)
        .map_err(|e| CandleviewError::MalformedMessage(e.to_string()))?;

    if response.is_error() {
        let code = response
            .error_code
            .map(|c| match c {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            })
            .unwrap_or_else(|| "unknown".to_string());
        return Ok(StreamEvent::Error {
            code,
            message: response.message.unwrap_or_default(),
        });
    }

    let is_data = response.response_type.as_deref().is_none_or(|t| t == "DATA");
    if is_data && let Some(data) = response.data {
        let is_ticker = response
            .channel
            .as_deref()
            .is_none_or(|c| c == StreamChannel::Ticker.as_str());
        if !is_ticker {
            return Ok(StreamEvent::Ignored);
        }

        let snapshot: TickerSnapshot = serde_json::from_value(data)
            .map_err(|e| CandleviewError::MalformedMessage(format!("ticker data: {e}")))?;
        return Ok(StreamEvent::Ticker(Box::new(snapshot)));
    }

    Ok(response
        .response_type
        .map(StreamEvent::Control)
        .unwrap_or(StreamEvent::Ignored))
}
