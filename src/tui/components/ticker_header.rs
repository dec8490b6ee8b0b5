//! Live ticker header component.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::tui::app::App;
use crate::tui::format::{format_clock, format_price, format_volume};

/// Renders the last price, daily change, range and volumes.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let pair_span = Span::styled(
        format!(" {} ", app.pair),
        Style::default().add_modifier(Modifier::BOLD),
    );

    let Some(t) = app.ticker.current() else {
        let line = Line::from(vec![
            pair_span,
            Span::styled(" waiting for ticker... ", Style::default().fg(Color::Gray)),
        ]);
        frame.render_widget(Paragraph::new(line), area);
        return;
    };

    let change = t.price_change();
    // Rising prices in red, falling in blue.
    let change_color = if change.is_positive {
        Color::Red
    } else {
        Color::Blue
    };
    let (arrow, sign) = if change.is_positive {
        ("▲", "+")
    } else {
        ("▼", "-")
    };

    let price_line = Line::from(vec![
        pair_span,
        Span::styled(
            format!("{} ", format_price(t.last)),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!("{} ", t.quote_currency)),
        Span::styled(
            format!("({} UTC) ", format_clock(t.timestamp)),
            Style::default().fg(Color::Gray),
        ),
        Span::styled(
            format!("{arrow} {}% {sign}{}", change.percent, format_price(change.absolute)),
            Style::default().fg(change_color),
        ),
    ]);

    let stats_line = Line::from(vec![
        Span::raw(" High "),
        Span::styled(format_price(t.high), Style::default().fg(Color::Red)),
        Span::raw("  Low "),
        Span::styled(format_price(t.low), Style::default().fg(Color::Blue)),
        Span::raw("  │ Vol(24H) "),
        Span::raw(format!("{} {}", format_volume(t.target_volume), t.target_currency)),
        Span::raw("  Value(24H) "),
        Span::raw(format!("{} {}", format_volume(t.quote_volume), t.quote_currency)),
        Span::raw("  │ Bid "),
        Span::styled(format_price(t.bid_best_price), Style::default().fg(Color::Red)),
        Span::raw(" Ask "),
        Span::styled(format_price(t.ask_best_price), Style::default().fg(Color::Blue)),
    ]);

    frame.render_widget(Paragraph::new(vec![price_line, stats_line]), area);
}
