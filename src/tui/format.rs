//! Number and time formatting for display.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

/// Formats a price with thousands separators, e.g. `39,612,000`.
///
/// Fractional digits are kept as they are, without trailing zeros.
pub fn format_price(price: Decimal) -> String {
    let normalized = price.normalize();
    let text = normalized.abs().to_string();
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3 + 2);
    if normalized.is_sign_negative() && !normalized.is_zero() {
        grouped.push('-');
    }
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if let Some(frac) = frac_part {
        grouped.push('.');
        grouped.push_str(frac);
    }
    grouped
}

/// Formats a volume with a `K`/`M`/`B` suffix and two decimals.
pub fn format_volume(volume: Decimal) -> String {
    let value = volume.to_f64().unwrap_or(0.0);
    if value >= 1_000_000_000.0 {
        format!("{:.2}B", value / 1_000_000_000.0)
    } else if value >= 1_000_000.0 {
        format!("{:.2}M", value / 1_000_000.0)
    } else if value >= 1_000.0 {
        format!("{:.2}K", value / 1_000.0)
    } else {
        format!("{value:.2}")
    }
}

/// Formats epoch milliseconds as `HH:MM:SS` (UTC).
pub fn format_clock(timestamp_ms: i64) -> String {
    let secs = timestamp_ms.div_euclid(1000).rem_euclid(86_400);
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}

/// Compact axis label for an `f64` price.
pub fn format_axis(value: f64) -> String {
    if value.abs() >= 1_000.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}
