//! Shared test utilities and constants.
#![allow(dead_code)]

use futures_util::{SinkExt, StreamExt};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use tungstenite::Message;

/// Coinone public stream endpoint.
pub const COINONE_WS_URL: &str = "wss://stream.coinone.co.kr";

/// Coinone public REST endpoint.
pub const COINONE_API_URL: &str = "https://api.coinone.co.kr";

/// A ticker frame as the stream sends it, with the given timestamp and last price.
pub fn ticker_frame(timestamp: i64, last: &str) -> String {
    format!(
        r#"{{
            "response_type": "DATA",
            "channel": "TICKER",
            "data": {{
                "quote_currency": "KRW",
                "target_currency": "BTC",
                "timestamp": {timestamp},
                "quote_volume": "22050017499.6518",
                "target_volume": "555.20985413",
                "high": "39818000",
                "low": "39475000",
                "first": "39736000",
                "last": "{last}",
                "volume_power": "75.35",
                "ask_best_price": "39613000",
                "ask_best_qty": "0.03",
                "bid_best_price": "39612000",
                "bid_best_qty": "0.0004",
                "id": "{timestamp}001",
                "yesterday_high": "39950000",
                "yesterday_low": "39500000",
                "yesterday_first": "39800000",
                "yesterday_last": "39736000",
                "yesterday_quote_volume": "30000000000",
                "yesterday_target_volume": "760.5"
            }}
        }}"#
    )
}

/// A chart response body with `count` candles, newest first.
pub fn chart_body(count: usize) -> String {
    let candles: Vec<String> = (0..count)
        .map(|i| {
            let timestamp = 1_700_000_000_000i64 - (i as i64) * 60_000;
            let open = 40_000_000 + (i as i64) * 1_000;
            format!(
                r#"{{"timestamp":{timestamp},"open":"{open}","high":"{}","low":"{}","close":"{}","target_volume":"0.5","quote_volume":"20000000"}}"#,
                open + 5_000,
                open - 5_000,
                open + 2_000
            )
        })
        .collect();

    format!(
        r#"{{"result":"success","error_code":"0","server_time":1700000000123,"quote_currency":"KRW","target_currency":"BTC","interval":"1m","chart":[{}]}}"#,
        candles.join(",")
    )
}

/// Serves exactly one HTTP response and hands back the raw request text.
pub async fn serve_once(status_line: &'static str, body: String) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind test server");
    let addr = listener.local_addr().expect("no local address");

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.expect("accept failed");
        let request = read_request(&mut socket).await;
        let response = format!(
            "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        socket
            .write_all(response.as_bytes())
            .await
            .expect("write failed");
        let _ = socket.shutdown().await;
        request
    });

    (format!("http://{addr}"), handle)
}

async fn read_request(socket: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    loop {
        let n = socket.read(&mut chunk).await.expect("read failed");
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let headers = String::from_utf8_lossy(&buf[..end]).to_ascii_lowercase();
            let body_len = headers
                .lines()
                .find_map(|l| l.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= end + 4 + body_len {
                break;
            }
        }
    }

    String::from_utf8_lossy(&buf).into_owned()
}

/// Accepts one WebSocket client, records its first text frame, sends
/// `frames`, then optionally closes from the server side.
///
/// The handle resolves to every text frame the client sent, plus `"<close>"`
/// if the client sent a close frame.
pub async fn ws_server(frames: Vec<String>, close_after: bool) -> (String, JoinHandle<Vec<String>>) {
    ws_server_sessions(1, frames, close_after).await
}

/// Like [`ws_server`], but serves `sessions` consecutive connections, each
/// receiving the same `frames`. Received frames from all sessions are
/// concatenated in order.
pub async fn ws_server_sessions(
    sessions: usize,
    frames: Vec<String>,
    close_after: bool,
) -> (String, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind test server");
    let addr = listener.local_addr().expect("no local address");

    let handle = tokio::spawn(async move {
        let mut received = Vec::new();
        for _ in 0..sessions {
            let (socket, _) = listener.accept().await.expect("accept failed");
            serve_session(socket, &frames, close_after, &mut received).await;
        }
        received
    });

    (format!("ws://{addr}"), handle)
}

async fn serve_session(
    socket: TcpStream,
    frames: &[String],
    close_after: bool,
    received: &mut Vec<String>,
) {
    let mut ws = tokio_tungstenite::accept_async(socket)
        .await
        .expect("websocket handshake failed");

    // The subscription handshake comes first.
    if let Some(Ok(Message::Text(text))) = ws.next().await {
        received.push(text.to_string());
    }

    for frame in frames {
        ws.send(Message::Text(frame.clone().into()))
            .await
            .expect("send failed");
    }
    if close_after {
        let _ = ws.send(Message::Close(None)).await;
    }

    while let Ok(Some(msg)) =
        tokio::time::timeout(std::time::Duration::from_secs(5), ws.next()).await
    {
        match msg {
            Ok(Message::Text(text)) => received.push(text.to_string()),
            Ok(Message::Close(_)) => {
                received.push("<close>".to_string());
                break;
            }
            Ok(_) => {}
            Err(_) => break,
        }
    }
}
