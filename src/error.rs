//! Crate-level error types.
//!
//! [`CandleviewError`] unifies every error source (configuration, HTTP,
//! WebSocket, JSON) behind a single enum so callers can match on the variant
//! they care about while still using the `?` operator for easy propagation.

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CandleviewError>;

/// Top-level error type returned by all public APIs.
#[derive(Debug, thiserror::Error)]
pub enum CandleviewError {
    /// An environment variable held a value that could not be used.
    #[error("configuration error: {0}")]
    Config(String),

    /// A WebSocket operation (connect, send, receive) failed.
    #[error("websocket error: {0}")]
    WebSocket(#[from] tungstenite::Error),

    /// An HTTP request failed or returned a non-success status.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization or deserialization failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The exchange answered but reported a failure in the body.
    #[error("api error {code}: {message}")]
    Api { code: String, message: String },

    /// A message did not have the expected shape.
    #[error("malformed message: {0}")]
    MalformedMessage(String),

    /// Terminal or file I/O failed.
    #[error("io error: {0}")]
    Io(String),
}
