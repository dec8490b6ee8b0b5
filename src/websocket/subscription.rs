//! Channel subscription and unsubscription requests.

use futures_util::SinkExt;
use tracing::{debug, info};
use tungstenite::Message;

use super::WsWriter;
use crate::Result;
use crate::models::{Pair, StreamChannel, SubscribeRequest};

/// Subscribes to a channel for one trading pair.
///
/// # Errors
///
/// Returns a [`CandleviewError`](crate::CandleviewError) if sending the subscription message fails.
pub async fn subscribe(write: &mut WsWriter, channel: StreamChannel, pair: &Pair) -> Result<()> {
    let request = SubscribeRequest::new(channel, pair);
    let json = serde_json::to_string(&request)?;
    debug!("Sending subscribe request: {}", json);
    write.send(Message::Text(json.into())).await?;
    info!(channel = channel.as_str(), %pair, "Subscribed to channel");

    Ok(())
}

/// Unsubscribes from a channel for one trading pair.
///
/// # Errors
///
/// Returns a [`CandleviewError`](crate::CandleviewError) if sending the unsubscribe message fails.
pub async fn unsubscribe(write: &mut WsWriter, channel: StreamChannel, pair: &Pair) -> Result<()> {
    let request = SubscribeRequest::unsubscribe(channel, pair);
    let json = serde_json::to_string(&request)?;
    write.send(Message::Text(json.into())).await?;
    info!(channel = channel.as_str(), %pair, "Unsubscribed from channel");

    Ok(())
}
