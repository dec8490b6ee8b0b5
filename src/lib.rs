//! Coinone market viewer library.
//!
//! Provides the candle data pipeline (normalization, range reduction, zoom),
//! an async REST client for charts and articles, and a WebSocket ticker
//! client, plus the Ratatui front end that ties them together.

pub mod chart;
pub mod config;
pub mod error;
pub mod models;
pub mod rest;
pub mod tui;
pub mod websocket;

pub use error::{CandleviewError, Result};
