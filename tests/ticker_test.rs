//! Ticker frames flowing through the stream parser into the ticker book.

mod common;

use rust_decimal_macros::dec;

use candleview::models::ticker::TickerBook;
use candleview::websocket::{StreamEvent, parse_stream_message};

fn apply_frame(book: &mut TickerBook, frame: &str) -> bool {
    match parse_stream_message(frame).expect("frame should parse") {
        StreamEvent::Ticker(snapshot) => book.apply(*snapshot),
        other => panic!("expected a ticker event, got {other:?}"),
    }
}

#[test]
fn later_snapshot_replaces_earlier_verbatim() {
    let mut book = TickerBook::new();
    let first = common::ticker_frame(1_693_560_155_038, "39612000");
    let second = common::ticker_frame(1_693_560_156_000, "39615000");

    assert!(apply_frame(&mut book, &first));
    assert!(apply_frame(&mut book, &second));

    let StreamEvent::Ticker(expected) = parse_stream_message(&second).unwrap() else {
        unreachable!();
    };
    assert_eq!(book.current(), Some(expected.as_ref()));
}

#[test]
fn older_snapshot_is_rejected() {
    let mut book = TickerBook::new();

    assert!(apply_frame(&mut book, &common::ticker_frame(2_000, "100")));
    assert!(!apply_frame(&mut book, &common::ticker_frame(1_000, "90")));
    assert!(!apply_frame(&mut book, &common::ticker_frame(2_000, "95")));

    let current = book.current().unwrap();
    assert_eq!(current.timestamp, 2_000);
    assert_eq!(current.last, dec!(100));
}

#[test]
fn control_frames_are_not_tickers() {
    for frame in [
        r#"{"response_type":"CONNECTED","data":{"session_id":"s"}}"#,
        r#"{"response_type":"SUBSCRIBED","channel":"TICKER"}"#,
        r#"{"response_type":"PONG"}"#,
    ] {
        let event = parse_stream_message(frame).unwrap();
        assert!(
            matches!(event, StreamEvent::Control(_)),
            "{frame} produced {event:?}"
        );
    }
}

#[test]
fn error_frame_carries_code_and_message() {
    let frame = r#"{"response_type":"ERROR","error_code":160012,"message":"Invalid topic"}"#;

    let event = parse_stream_message(frame).unwrap();

    assert_eq!(
        event,
        StreamEvent::Error {
            code: "160012".to_string(),
            message: "Invalid topic".to_string(),
        }
    );
}

#[test]
fn malformed_frame_is_an_error() {
    assert!(parse_stream_message("not json").is_err());
}
