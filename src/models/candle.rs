//! Candlestick chart models.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Response body of the public v2 chart endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ChartResponse {
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub error_code: Option<String>,
    #[serde(default)]
    pub quote_currency: Option<String>,
    #[serde(default)]
    pub target_currency: Option<String>,
    #[serde(default)]
    pub interval: Option<String>,
    /// Candles, newest first.
    #[serde(default)]
    pub chart: Vec<Candle>,
}

impl ChartResponse {
    /// Returns `true` if the body reports a failed request.
    pub fn is_error(&self) -> bool {
        self.result.as_deref() == Some("error")
    }
}

/// A single OHLC candlestick bar as delivered by the exchange.
///
/// Prices and volumes travel as decimal strings and are parsed on arrival.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Candle {
    /// Start of the candle's time bucket, epoch milliseconds.
    pub timestamp: i64,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub quote_volume: Decimal,
    pub target_volume: Decimal,
}

/// Supported candle granularities.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Interval {
    #[default]
    #[serde(rename = "1m")]
    M1,
    #[serde(rename = "3m")]
    M3,
    #[serde(rename = "5m")]
    M5,
    #[serde(rename = "15m")]
    M15,
    #[serde(rename = "30m")]
    M30,
    #[serde(rename = "1h")]
    H1,
    #[serde(rename = "2h")]
    H2,
    #[serde(rename = "4h")]
    H4,
    #[serde(rename = "6h")]
    H6,
    #[serde(rename = "1d")]
    D1,
    #[serde(rename = "1w")]
    W1,
    #[serde(rename = "1mon")]
    Mon1,
}

impl Interval {
    /// Every interval, shortest first.
    pub const ALL: [Interval; 12] = [
        Interval::M1,
        Interval::M3,
        Interval::M5,
        Interval::M15,
        Interval::M30,
        Interval::H1,
        Interval::H2,
        Interval::H4,
        Interval::H6,
        Interval::D1,
        Interval::W1,
        Interval::Mon1,
    ];

    /// Returns the wire-format name used in the chart query string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::M1 => "1m",
            Interval::M3 => "3m",
            Interval::M5 => "5m",
            Interval::M15 => "15m",
            Interval::M30 => "30m",
            Interval::H1 => "1h",
            Interval::H2 => "2h",
            Interval::H4 => "4h",
            Interval::H6 => "6h",
            Interval::D1 => "1d",
            Interval::W1 => "1w",
            Interval::Mon1 => "1mon",
        }
    }

    /// Next longer interval, wrapping to the shortest.
    pub fn next(self) -> Self {
        let idx = self.position();
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Next shorter interval, wrapping to the longest.
    pub fn previous(self) -> Self {
        let idx = self.position();
        Self::ALL[idx.checked_sub(1).unwrap_or(Self::ALL.len() - 1)]
    }

    fn position(self) -> usize {
        Self::ALL.iter().position(|i| *i == self).unwrap_or(0)
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Interval {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|i| i.as_str() == s)
            .copied()
            .ok_or_else(|| format!("unsupported interval {s:?}"))
    }
}
