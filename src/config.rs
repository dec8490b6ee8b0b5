//! Application configuration loaded from environment variables.
//!
//! Every setting is optional:
//! - `CANDLEVIEW_API_URL`: exchange REST base (default `https://api.coinone.co.kr`)
//! - `CANDLEVIEW_WEBSOCKET_URL`: public stream endpoint (default `wss://stream.coinone.co.kr`)
//! - `CANDLEVIEW_ARTICLES_URL`: article service base (default `http://localhost:3000`)
//! - `CANDLEVIEW_QUOTE_CURRENCY` / `CANDLEVIEW_TARGET_CURRENCY`: the pair (default `KRW` / `BTC`)
//! - `CANDLEVIEW_INTERVAL`: initial candle interval (default `1m`)
//! - `CANDLEVIEW_WINDOW_SIZE`: initial candle count (default `100`)
//! - `CANDLEVIEW_RECONNECT`: reconnect the ticker stream after it drops (default `true`)
//! - `CANDLEVIEW_LOG_FILE`: where the TUI writes its log (default `candleview.log`)

use std::str::FromStr;

use crate::chart::ChartWindow;
use crate::models::Pair;
use crate::models::candle::Interval;

/// Default exchange REST endpoint.
const DEFAULT_API_URL: &str = "https://api.coinone.co.kr";

/// Default public WebSocket endpoint.
const DEFAULT_WEBSOCKET_URL: &str = "wss://stream.coinone.co.kr";

/// Default article service endpoint.
const DEFAULT_ARTICLES_URL: &str = "http://localhost:3000";

const DEFAULT_QUOTE_CURRENCY: &str = "KRW";
const DEFAULT_TARGET_CURRENCY: &str = "BTC";
const DEFAULT_LOG_FILE: &str = "candleview.log";

/// Top-level application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub exchange: ExchangeConfig,
    pub chart: ChartConfig,
    pub articles_url: String,
    pub log_file: String,
}

/// Exchange endpoints and the pair being watched.
#[derive(Debug, Clone)]
pub struct ExchangeConfig {
    pub api_url: String,
    pub websocket_url: String,
    pub pair: Pair,
    pub reconnect: bool,
}

/// Initial chart parameters.
#[derive(Debug, Clone)]
pub struct ChartConfig {
    pub interval: Interval,
    pub window: ChartWindow,
}

/// Loads the application configuration from the process environment.
///
/// # Errors
///
/// Returns [`CandleviewError::Config`](crate::CandleviewError::Config) if a
/// variable is set to a value that cannot be parsed.
pub fn fetch_config() -> crate::Result<AppConfig> {
    config_from_lookup(|name| std::env::var(name).ok())
}

/// Builds the configuration from an arbitrary variable lookup.
///
/// Empty values are treated as absent.
///
/// # Errors
///
/// Returns [`CandleviewError::Config`](crate::CandleviewError::Config) naming
/// the offending variable when a value is invalid.
pub fn config_from_lookup<F>(lookup: F) -> crate::Result<AppConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let var = |name: &str| lookup(name).filter(|s| !s.is_empty());

    let api_url = var("CANDLEVIEW_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
    let websocket_url =
        var("CANDLEVIEW_WEBSOCKET_URL").unwrap_or_else(|| DEFAULT_WEBSOCKET_URL.to_string());
    let articles_url =
        var("CANDLEVIEW_ARTICLES_URL").unwrap_or_else(|| DEFAULT_ARTICLES_URL.to_string());
    let log_file = var("CANDLEVIEW_LOG_FILE").unwrap_or_else(|| DEFAULT_LOG_FILE.to_string());

    let pair = Pair::new(
        &var("CANDLEVIEW_QUOTE_CURRENCY").unwrap_or_else(|| DEFAULT_QUOTE_CURRENCY.to_string()),
        &var("CANDLEVIEW_TARGET_CURRENCY").unwrap_or_else(|| DEFAULT_TARGET_CURRENCY.to_string()),
    );

    let interval = match var("CANDLEVIEW_INTERVAL") {
        Some(raw) => Interval::from_str(&raw)
            .map_err(|e| crate::CandleviewError::Config(format!("CANDLEVIEW_INTERVAL: {e}")))?,
        None => Interval::default(),
    };

    let window = match var("CANDLEVIEW_WINDOW_SIZE") {
        Some(raw) => {
            let size = raw.parse::<usize>().map_err(|e| {
                crate::CandleviewError::Config(format!(
                    "CANDLEVIEW_WINDOW_SIZE must be a positive integer, got {raw:?}: {e}"
                ))
            })?;
            ChartWindow::new(size)
        }
        None => ChartWindow::default(),
    };

    let reconnect = match var("CANDLEVIEW_RECONNECT") {
        Some(raw) => parse_bool(&raw).ok_or_else(|| {
            crate::CandleviewError::Config(format!(
                "CANDLEVIEW_RECONNECT must be true/false/1/0, got {raw:?}"
            ))
        })?,
        None => true,
    };

    Ok(AppConfig {
        exchange: ExchangeConfig {
            api_url,
            websocket_url,
            pair,
            reconnect,
        },
        chart: ChartConfig { interval, window },
        articles_url,
        log_file,
    })
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
