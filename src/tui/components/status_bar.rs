//! Status bar component.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::tui::app::App;
use crate::websocket::ConnectionState;

/// Renders the status bar.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let status_color = match app.connection {
        ConnectionState::Open => Color::Green,
        ConnectionState::Connecting => Color::Yellow,
        ConnectionState::Closed => Color::Red,
    };

    let loading_span = if app.chart.is_loading() {
        Span::styled(" loading ", Style::default().fg(Color::Yellow))
    } else {
        Span::raw("")
    };

    let error_span = if let Some(ref error) = app.error_message {
        Span::styled(
            format!(" {} ", error.message),
            Style::default().fg(Color::Red),
        )
    } else {
        Span::raw("")
    };

    let line = Line::from(vec![
        Span::styled(
            format!(" {} ", app.connection.label()),
            Style::default().fg(status_color),
        ),
        Span::raw("│"),
        Span::styled(format!(" {} ", app.pair), Style::default().fg(Color::White)),
        Span::raw("│"),
        Span::styled(
            format!(" {} ", app.interval),
            Style::default().fg(Color::Cyan),
        ),
        Span::raw("│"),
        size_span(app),
        Span::raw("│"),
        loading_span,
        error_span,
    ]);

    let para = Paragraph::new(line).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(para, area);
}

/// Window size, or the size being typed while entry is open.
fn size_span(app: &App) -> Span<'static> {
    match &app.size_input {
        Some(input) => Span::styled(
            format!(" size: {}▏ ", input.as_str()),
            Style::default().fg(Color::Black).bg(Color::Yellow),
        ),
        None => Span::raw(format!(" {} candles ", app.zoom.size())),
    }
}
