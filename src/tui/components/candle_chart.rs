//! Candlestick chart component.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use rust_decimal::prelude::ToPrimitive;

use crate::chart::NormalizedCandle;
use crate::tui::app::App;
use crate::tui::format::{format_axis, format_clock, format_price};

/// Columns reserved for the price axis (`{:>10} │`).
const AXIS_WIDTH: u16 = 12;

/// Renders the chart panel.
///
/// While the pointer is over a candle, that column is highlighted, a
/// reference line marks its close, and its OHLC values are shown along the
/// bottom border.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let title = format!(" {} {} · {} ", app.pair, app.interval, app.zoom.size());
    let mut block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);

    let candles = app.chart.candles();
    let Some((min, max)) = app.chart.range().bounds() else {
        frame.render_widget(block, area);
        let text = if app.chart.is_loading() {
            "Loading candles..."
        } else {
            "No candle data"
        };
        let para = Paragraph::new(text).style(Style::default().fg(Color::DarkGray));
        frame.render_widget(para, inner);
        return;
    };

    let height = inner.height.saturating_sub(1) as usize;
    let cols = inner.width.saturating_sub(AXIS_WIDTH) as usize;
    if height == 0 || cols == 0 {
        frame.render_widget(block, area);
        return;
    }

    // A flat series still needs a non-zero span to place rows.
    let (min, max) = if max > min {
        (min, max)
    } else {
        (min - 1.0, max + 1.0)
    };
    let step = (max - min) / height as f64;
    let visible = &candles[candles.len().saturating_sub(cols)..];

    let hovered = app
        .hover_column
        .and_then(|column| hovered_index(column, inner, visible.len()));
    let hovered_close = hovered.map(|i| visible[i].close().to_f64().unwrap_or(f64::NAN));
    if let Some(i) = hovered {
        block = block.title_bottom(Span::styled(
            readout(&visible[i]),
            Style::default().fg(Color::Yellow),
        ));
    }
    frame.render_widget(block, area);

    let mut lines: Vec<Line> = Vec::with_capacity(height + 1);
    for row in 0..height {
        let top = max - step * row as f64;
        let bottom = top - step;
        let on_reference = hovered_close.is_some_and(|close| close > bottom && close <= top);

        let mut spans: Vec<Span> = Vec::with_capacity(visible.len() + 1);
        spans.push(Span::raw(format!("{:>10} │", format_axis(top))));
        for (i, candle) in visible.iter().enumerate() {
            let color = if candle.is_rising() {
                Color::Red
            } else {
                Color::Blue
            };
            let mut style = Style::default().fg(color);
            if hovered == Some(i) {
                style = style.bg(Color::DarkGray);
            }

            let symbol = match glyph(candle, top, bottom) {
                ' ' if on_reference => {
                    style = style.fg(Color::Yellow);
                    '─'
                }
                c => c,
            };
            spans.push(Span::styled(symbol.to_string(), style));
        }
        lines.push(Line::from(spans));
    }

    if let (Some(first), Some(last)) = (visible.first(), visible.last()) {
        let left = format_clock(first.timestamp);
        let right = format_clock(last.timestamp);
        let gap = cols.saturating_sub(left.len() + right.len());
        lines.push(Line::from(Span::styled(
            format!("{:>10} └{left}{}{right}", format_axis(min), " ".repeat(gap)),
            Style::default().fg(Color::Gray),
        )));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Index into the visible candles for a pointer at terminal `column`.
fn hovered_index(column: u16, inner: Rect, visible: usize) -> Option<usize> {
    let offset = column.checked_sub(inner.x + AXIS_WIDTH)? as usize;
    (offset < visible).then_some(offset)
}

/// One-line OHLC summary of a candle.
fn readout(candle: &NormalizedCandle) -> String {
    format!(
        " {}  O {}  H {}  L {}  C {} ",
        format_clock(candle.timestamp),
        format_price(candle.open()),
        format_price(candle.high),
        format_price(candle.low),
        format_price(candle.close())
    )
}

/// Picks the character for one candle in the price band `(bottom, top]`.
fn glyph(candle: &NormalizedCandle, top: f64, bottom: f64) -> char {
    let value = |d: rust_decimal::Decimal| d.to_f64().unwrap_or(f64::NAN);
    let open = value(candle.open());
    let close = value(candle.close());
    let high = value(candle.high);
    let low = value(candle.low);

    let body_top = open.max(close);
    let body_bottom = open.min(close);

    let overlaps = |hi: f64, lo: f64| hi > bottom && lo <= top;

    if overlaps(body_top, body_bottom) {
        '█'
    } else if overlaps(high, low) {
        '│'
    } else {
        ' '
    }
}
