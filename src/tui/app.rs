//! Application state for the TUI.

use std::time::{Duration, Instant};

use crate::chart::{ChartState, ChartWindow, RequestToken, ZoomController};
use crate::config::AppConfig;
use crate::models::Pair;
use crate::models::candle::Interval;
use crate::models::ticker::TickerBook;
use crate::websocket::ConnectionState;

use super::input::SizeInput;

/// How long an error stays in the status bar.
const ERROR_DISPLAY_TIME: Duration = Duration::from_secs(5);

/// Central application state container.
pub struct App {
    /// Pair shown by both the chart and the ticker.
    pub pair: Pair,
    /// Candle granularity of the chart.
    pub interval: Interval,
    /// Chart window size and wheel debounce.
    pub zoom: ZoomController,
    /// Candles of the latest applied fetch.
    pub chart: ChartState,
    /// Latest ticker snapshot.
    pub ticker: TickerBook,
    /// Ticker stream connection state.
    pub connection: ConnectionState,
    /// Window size being typed, while size entry is open.
    pub size_input: Option<SizeInput>,
    /// Terminal column under the mouse pointer, for the candle readout.
    pub hover_column: Option<u16>,
    /// Error message to display (clears after timeout).
    pub error_message: Option<ErrorDisplay>,
    /// Flag to signal application should quit.
    pub should_quit: bool,
}

impl App {
    /// Creates a new App for one pair.
    pub fn new(pair: Pair, interval: Interval, window: ChartWindow) -> Self {
        Self {
            pair,
            interval,
            zoom: ZoomController::new(window),
            chart: ChartState::new(),
            ticker: TickerBook::new(),
            connection: ConnectionState::Connecting,
            size_input: None,
            hover_column: None,
            error_message: None,
            should_quit: false,
        }
    }

    /// Creates the App described by the loaded configuration.
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.exchange.pair.clone(),
            config.chart.interval,
            config.chart.window,
        )
    }

    /// Starts a chart fetch for the current pair, interval and window.
    ///
    /// Any fetch still in flight becomes stale.
    pub fn request_chart(&mut self) -> FetchRequest {
        FetchRequest {
            token: self.chart.begin_request(),
            pair: self.pair.clone(),
            interval: self.interval,
            size: self.zoom.size(),
        }
    }

    /// Shows an error in the status bar from `now` on.
    pub fn show_error_at(&mut self, message: impl Into<String>, now: Instant) {
        self.error_message = Some(ErrorDisplay {
            message: message.into(),
            timestamp: now,
        });
    }

    /// Clears error messages older than the display time.
    pub fn clear_stale_errors(&mut self, now: Instant) {
        if let Some(ref error) = self.error_message
            && now.duration_since(error.timestamp) > ERROR_DISPLAY_TIME
        {
            self.error_message = None;
        }
    }
}

/// Parameters of one chart fetch, carried back with its response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub token: RequestToken,
    pub pair: Pair,
    pub interval: Interval,
    pub size: usize,
}

/// Error message with timestamp for auto-clear.
#[derive(Clone, Debug)]
pub struct ErrorDisplay {
    /// The error message.
    pub message: String,
    /// When the error was shown.
    pub timestamp: Instant,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        App::new(Pair::new("KRW", "BTC"), Interval::M1, ChartWindow::default())
    }

    #[test]
    fn request_chart_uses_current_parameters() {
        let mut app = app();
        app.interval = Interval::H4;
        app.zoom.set_size(300);

        let first = app.request_chart();
        let second = app.request_chart();

        assert_eq!(second.interval, Interval::H4);
        assert_eq!(second.size, 300);
        assert_eq!(second.pair.to_string(), "BTC/KRW");
        assert!(second.token > first.token);
        assert!(app.chart.is_loading());
    }

    #[test]
    fn errors_expire() {
        let mut app = app();
        let start = Instant::now();
        app.show_error_at("boom", start);

        app.clear_stale_errors(start + Duration::from_secs(1));
        assert!(app.error_message.is_some());

        app.clear_stale_errors(start + Duration::from_secs(6));
        assert!(app.error_message.is_none());
    }
}
