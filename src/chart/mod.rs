//! Candle data pipeline.
//!
//! Raw candles from the chart endpoint are normalized into chronological
//! [`NormalizedCandle`]s, scanned for a [`PriceRange`] that sizes the value
//! axis, and held in a [`ChartState`] that only accepts the response to the
//! most recent request.

pub mod zoom;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use tracing::debug;

use crate::models::candle::Candle;

pub use zoom::ZoomController;

/// Smallest number of candles a chart may request.
pub const MIN_WINDOW: usize = 50;

/// Largest number of candles a chart may request.
pub const MAX_WINDOW: usize = 500;

/// Window size used when nothing else is configured.
pub const DEFAULT_WINDOW: usize = 100;

/// A candle ready for rendering, with open and close paired.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedCandle {
    pub timestamp: i64,
    /// `[open, close]`.
    pub open_close: [Decimal; 2],
    pub high: Decimal,
    pub low: Decimal,
    pub quote_volume: Decimal,
    pub target_volume: Decimal,
}

impl NormalizedCandle {
    pub fn open(&self) -> Decimal {
        self.open_close[0]
    }

    pub fn close(&self) -> Decimal {
        self.open_close[1]
    }

    /// A candle closing above its open.
    pub fn is_rising(&self) -> bool {
        self.close() > self.open()
    }
}

impl From<Candle> for NormalizedCandle {
    fn from(candle: Candle) -> Self {
        Self {
            timestamp: candle.timestamp,
            open_close: [candle.open, candle.close],
            high: candle.high,
            low: candle.low,
            quote_volume: candle.quote_volume,
            target_volume: candle.target_volume,
        }
    }
}

/// Converts a newest-first candle feed into chronological render order.
pub fn normalize(candles: Vec<Candle>) -> Vec<NormalizedCandle> {
    candles
        .into_iter()
        .rev()
        .map(NormalizedCandle::from)
        .collect()
}

/// Value-axis extent of a candle sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

impl PriceRange {
    /// The seed of the reduction: `min = +∞`, `max = -∞`.
    pub const EMPTY: PriceRange = PriceRange {
        min: f64::INFINITY,
        max: f64::NEG_INFINITY,
    };

    /// Returns `true` for the degenerate range of an empty sequence.
    pub fn is_empty(&self) -> bool {
        self.min > self.max
    }

    /// Axis bounds, or `None` when there is nothing to draw.
    pub fn bounds(&self) -> Option<(f64, f64)> {
        if self.is_empty() {
            None
        } else {
            Some((self.min, self.max))
        }
    }

    fn include(self, value: Decimal) -> Self {
        let value = value.to_f64().unwrap_or(f64::NAN);
        Self {
            min: self.min.min(value),
            max: self.max.max(value),
        }
    }
}

impl Default for PriceRange {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Scans every open, close, high and low for the global extremes.
pub fn reduce_range(candles: &[NormalizedCandle]) -> PriceRange {
    candles.iter().fold(PriceRange::EMPTY, |range, candle| {
        range
            .include(candle.open())
            .include(candle.close())
            .include(candle.high)
            .include(candle.low)
    })
}

/// Number of candles requested per fetch, always within
/// [`MIN_WINDOW`]..=[`MAX_WINDOW`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartWindow {
    size: usize,
}

impl ChartWindow {
    /// Creates a window, clamping `size` into the allowed range.
    pub fn new(size: usize) -> Self {
        Self {
            size: size.clamp(MIN_WINDOW, MAX_WINDOW),
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Moves the window by `delta` candles, saturating at the bounds.
    pub fn offset(self, delta: i64) -> Self {
        let size = (self.size as i64).saturating_add(delta).max(0) as usize;
        Self::new(size)
    }
}

impl Default for ChartWindow {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}

/// Identifies one chart fetch; larger tokens are newer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Chart data owned by the view, guarded against out-of-order responses.
#[derive(Debug, Clone, Default)]
pub struct ChartState {
    candles: Vec<NormalizedCandle>,
    range: PriceRange,
    latest: u64,
    loading: bool,
    error: Option<String>,
}

impl ChartState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a token for a new fetch, superseding any in flight.
    pub fn begin_request(&mut self) -> RequestToken {
        self.latest += 1;
        self.loading = true;
        RequestToken(self.latest)
    }

    fn is_latest(&self, token: RequestToken) -> bool {
        token.0 == self.latest
    }

    /// Replaces the chart with `candles` if `token` is the latest issued.
    ///
    /// Returns `true` when the data was applied.
    pub fn apply(&mut self, token: RequestToken, candles: Vec<Candle>) -> bool {
        if !self.is_latest(token) {
            debug!(
                token = token.0,
                latest = self.latest,
                "Dropping stale chart response"
            );
            return false;
        }

        self.candles = normalize(candles);
        self.range = reduce_range(&self.candles);
        self.loading = false;
        self.error = None;
        true
    }

    /// Records a failed fetch if `token` is the latest issued.
    ///
    /// The previous candles stay visible.
    pub fn fail(&mut self, token: RequestToken, error: impl Into<String>) -> bool {
        if !self.is_latest(token) {
            return false;
        }

        self.loading = false;
        self.error = Some(error.into());
        true
    }

    pub fn candles(&self) -> &[NormalizedCandle] {
        &self.candles
    }

    pub fn range(&self) -> PriceRange {
        self.range
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
