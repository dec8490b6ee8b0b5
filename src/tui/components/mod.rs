//! Reusable UI components.

pub mod candle_chart;
pub mod status_bar;
pub mod ticker_header;
