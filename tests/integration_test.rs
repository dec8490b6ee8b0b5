//! Live tests against the Coinone public API.
//!
//! These tests require network access.
//! Run with: `cargo test --features integration-tests`

#![cfg(feature = "integration-tests")]

mod common;

use candleview::models::candle::Interval;
use candleview::models::{Pair, StreamChannel};
use candleview::rest::ApiClient;
use candleview::websocket::{
    StreamEvent, connect, parse_stream_message, ping, subscribe, unsubscribe,
};
use futures_util::StreamExt;

use common::{COINONE_API_URL, COINONE_WS_URL};

#[tokio::test]
async fn test_connect_to_coinone_stream() {
    let result = connect(COINONE_WS_URL).await;
    assert!(result.is_ok(), "Failed to connect to Coinone stream");
}

#[tokio::test]
async fn test_ping_pong() {
    let (mut write, mut read) = connect(COINONE_WS_URL).await.expect("Failed to connect");

    ping(&mut write).await.expect("Failed to send ping");

    let timeout = tokio::time::timeout(tokio::time::Duration::from_secs(5), async {
        while let Some(msg) = read.next().await {
            if let Ok(tungstenite::Message::Text(text)) = msg
                && let Ok(StreamEvent::Control(kind)) = parse_stream_message(text.as_str())
                && kind == "PONG"
            {
                return true;
            }
        }
        false
    });

    let received_pong = timeout.await.expect("Timeout waiting for pong");
    assert!(received_pong, "Did not receive pong response");
}

#[tokio::test]
async fn test_subscribe_and_receive_ticker() {
    let (mut write, mut read) = connect(COINONE_WS_URL).await.expect("Failed to connect");
    let pair = Pair::new("KRW", "BTC");

    subscribe(&mut write, StreamChannel::Ticker, &pair)
        .await
        .expect("Failed to subscribe to ticker");

    let timeout = tokio::time::timeout(tokio::time::Duration::from_secs(10), async {
        while let Some(msg) = read.next().await {
            if let Ok(tungstenite::Message::Text(text)) = msg
                && let Ok(StreamEvent::Ticker(snapshot)) = parse_stream_message(text.as_str())
            {
                return Some(snapshot);
            }
        }
        None
    });

    let snapshot = timeout
        .await
        .expect("Timeout waiting for ticker")
        .expect("Stream ended before a ticker arrived");
    assert_eq!(snapshot.target_currency, "BTC");
    assert!(snapshot.last > rust_decimal::Decimal::ZERO);

    unsubscribe(&mut write, StreamChannel::Ticker, &pair)
        .await
        .expect("Failed to unsubscribe from ticker");
}

#[tokio::test]
async fn test_fetch_live_chart() {
    let api = ApiClient::new(COINONE_API_URL, COINONE_API_URL).expect("Failed to build client");

    let candles = api
        .fetch_chart(&Pair::new("KRW", "BTC"), Interval::M1, 100)
        .await
        .expect("Failed to fetch chart");

    assert!(!candles.is_empty());
    assert!(candles.len() <= 100);
    assert!(candles.windows(2).all(|w| w[0].timestamp > w[1].timestamp));
}
