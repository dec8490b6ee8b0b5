//! Main UI rendering coordinator.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::Paragraph,
};

use super::app::App;
use super::components::{candle_chart, status_bar, ticker_header};

/// Renders the entire application UI.
pub fn render(frame: &mut Frame, app: &App) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Status bar
            Constraint::Length(2), // Ticker header
            Constraint::Min(6),    // Chart
            Constraint::Length(1), // Keybindings help
        ])
        .split(frame.area());

    status_bar::render(frame, layout[0], app);
    ticker_header::render(frame, layout[1], app);
    candle_chart::render(frame, layout[2], app);
    render_keybindings(frame, layout[3], app);
}

/// Renders the keybindings help line.
fn render_keybindings(frame: &mut Frame, area: Rect, app: &App) {
    let help = if app.size_input.is_some() {
        "type a candle count (50-500) [Enter]apply [Esc]cancel"
    } else {
        "[+/-/wheel]zoom [s]ize [ [ ] ]interval [r]efresh [q]uit"
    };

    let para = Paragraph::new(help).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(para, area);
}
