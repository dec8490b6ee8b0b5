//! Ticker channel models.

use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::debug;

/// Latest market snapshot for one trading pair.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TickerSnapshot {
    pub quote_currency: String,
    pub target_currency: String,
    /// Exchange time of the snapshot, epoch milliseconds.
    pub timestamp: i64,
    pub quote_volume: Decimal,
    pub target_volume: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub first: Decimal,
    pub last: Decimal,
    #[serde(default)]
    pub volume_power: Option<Decimal>,
    pub ask_best_price: Decimal,
    pub ask_best_qty: Decimal,
    pub bid_best_price: Decimal,
    pub bid_best_qty: Decimal,
    #[serde(default)]
    pub id: Option<String>,
    pub yesterday_high: Decimal,
    pub yesterday_low: Decimal,
    pub yesterday_first: Decimal,
    pub yesterday_last: Decimal,
    pub yesterday_quote_volume: Decimal,
    pub yesterday_target_volume: Decimal,
}

/// Movement of the last price against the previous day's close.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceChange {
    /// Absolute change in percent, two decimal places.
    pub percent: Decimal,
    /// Absolute change in quote currency.
    pub absolute: Decimal,
    pub is_positive: bool,
}

impl TickerSnapshot {
    /// Computes the change of `last` relative to `yesterday_last`.
    ///
    /// A zero reference price yields a zero percentage.
    pub fn price_change(&self) -> PriceChange {
        let diff = self.last - self.yesterday_last;
        let percent = if self.yesterday_last.is_zero() {
            Decimal::ZERO
        } else {
            (diff / self.yesterday_last * Decimal::ONE_HUNDRED).round_dp(2)
        };

        PriceChange {
            percent: percent.abs(),
            absolute: diff.abs(),
            is_positive: diff >= Decimal::ZERO,
        }
    }

    /// Spread between best ask and best bid.
    pub fn spread(&self) -> Decimal {
        self.ask_best_price - self.bid_best_price
    }
}

/// Holds the current ticker snapshot and rejects out-of-order updates.
#[derive(Debug, Clone, Default)]
pub struct TickerBook {
    current: Option<TickerSnapshot>,
}

impl TickerBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the held snapshot if `snapshot` is strictly newer.
    ///
    /// Returns `true` when the snapshot was accepted.
    pub fn apply(&mut self, snapshot: TickerSnapshot) -> bool {
        if let Some(current) = &self.current
            && snapshot.timestamp <= current.timestamp
        {
            debug!(
                held = current.timestamp,
                incoming = snapshot.timestamp,
                "Dropping stale ticker snapshot"
            );
            return false;
        }

        self.current = Some(snapshot);
        true
    }

    pub fn current(&self) -> Option<&TickerSnapshot> {
        self.current.as_ref()
    }
}
