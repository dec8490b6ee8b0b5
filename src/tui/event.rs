//! Event handling for the TUI.
//!
//! [`update`] is the view-state reducer: every state change goes through it,
//! and anything that needs I/O comes back as an [`Action`] for the main loop
//! to perform.

use std::time::{Duration, Instant};

use crossterm::event::{
    Event as CrosstermEvent, EventStream, KeyCode, KeyEvent, KeyModifiers, MouseEventKind,
};
use futures_util::StreamExt;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::chart::RequestToken;
use crate::models::candle::Candle;
use crate::models::ticker::TickerSnapshot;
use crate::websocket::ConnectionState;

use super::app::{App, FetchRequest};
use super::input::SizeInput;

/// Terminal input the viewer reacts to.
#[derive(Debug)]
pub enum Event {
    /// A key was pressed.
    Key(KeyEvent),
    /// The mouse wheel moved; positive is scrolling down.
    Wheel(f64),
    /// The mouse pointer moved to this terminal column.
    Hover(u16),
    /// Periodic tick; fires the wheel debounce and expires errors.
    Tick,
}

/// Messages that update application state.
#[derive(Debug)]
pub enum Message {
    /// Input event from terminal.
    Input(Event),

    /// Ticker snapshot from the stream.
    Ticker(Box<TickerSnapshot>),
    /// Ticker stream connection state changed.
    Connection(ConnectionState),

    /// A chart fetch finished.
    ChartLoaded {
        token: RequestToken,
        result: Result<Vec<Candle>, String>,
    },
}

/// Side effects requested by [`update`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Fetch chart data; deliver the outcome as [`Message::ChartLoaded`].
    FetchChart(FetchRequest),
}

/// Forwards keys, wheel and pointer motion to the main loop until it goes
/// away or the terminal stops producing events.
pub fn spawn_event_reader(tx: mpsc::UnboundedSender<Message>) {
    tokio::spawn(async move {
        let mut events = EventStream::new();
        loop {
            tokio::select! {
                () = tx.closed() => break,
                next = events.next() => match next {
                    Some(Ok(event)) => {
                        if let Some(event) = translate(event)
                            && tx.send(Message::Input(event)).is_err()
                        {
                            break;
                        }
                    }
                    Some(Err(e)) => {
                        warn!("Terminal input failed: {e}");
                        break;
                    }
                    None => break,
                },
            }
        }
        debug!("Input reader stopped");
    });
}

/// Maps a terminal event onto a viewer event.
fn translate(event: CrosstermEvent) -> Option<Event> {
    match event {
        CrosstermEvent::Key(key) => Some(Event::Key(key)),
        CrosstermEvent::Mouse(mouse) => match mouse.kind {
            MouseEventKind::ScrollDown => Some(Event::Wheel(1.0)),
            MouseEventKind::ScrollUp => Some(Event::Wheel(-1.0)),
            MouseEventKind::Moved => Some(Event::Hover(mouse.column)),
            _ => None,
        },
        _ => None,
    }
}

/// Sends a [`Event::Tick`] every `period`.
///
/// Late ticks are skipped rather than bunched up; a debounced wheel zoom
/// only needs one tick after it is due.
pub fn spawn_tick_timer(tx: mpsc::UnboundedSender<Message>, period: Duration) {
    tokio::spawn(async move {
        let mut ticks = tokio::time::interval(period);
        ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            ticks.tick().await;
            if tx.send(Message::Input(Event::Tick)).is_err() {
                break;
            }
        }
    });
}

/// Updates application state based on a message.
pub fn update(app: &mut App, message: Message) -> Option<Action> {
    update_at(app, message, Instant::now())
}

/// [`update`] with an explicit clock, for the time-dependent paths.
pub fn update_at(app: &mut App, message: Message, now: Instant) -> Option<Action> {
    match message {
        Message::Input(event) => handle_input(app, event, now),
        Message::Ticker(snapshot) => {
            app.ticker.apply(*snapshot);
            None
        }
        Message::Connection(state) => {
            if state == ConnectionState::Closed && app.connection == ConnectionState::Open {
                app.show_error_at("ticker stream disconnected", now);
            }
            app.connection = state;
            None
        }
        Message::ChartLoaded { token, result } => {
            match result {
                Ok(candles) => {
                    app.chart.apply(token, candles);
                }
                Err(error) => {
                    if app.chart.fail(token, error.clone()) {
                        warn!(token = token.value(), %error, "Chart fetch failed");
                        app.show_error_at(format!("chart: {error}"), now);
                    }
                }
            }
            None
        }
    }
}

fn handle_input(app: &mut App, event: Event, now: Instant) -> Option<Action> {
    match event {
        Event::Key(key) => handle_key(app, key, now),
        Event::Wheel(delta_y) => {
            app.zoom.on_wheel(delta_y, now);
            None
        }
        Event::Tick => {
            app.clear_stale_errors(now);
            app.zoom.poll(now).map(|_| refetch(app))
        }
        Event::Hover(column) => {
            app.hover_column = Some(column);
            None
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent, now: Instant) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return None;
    }
    if app.size_input.is_some() {
        return handle_size_entry(app, key, now);
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => {
            app.should_quit = true;
            None
        }
        KeyCode::Char('+') | KeyCode::Char('=') => app.zoom.zoom_in().map(|_| refetch(app)),
        KeyCode::Char('-') => app.zoom.zoom_out().map(|_| refetch(app)),
        KeyCode::Char(']') => {
            app.interval = app.interval.next();
            info!(interval = app.interval.as_str(), "Interval changed");
            Some(refetch(app))
        }
        KeyCode::Char('[') => {
            app.interval = app.interval.previous();
            info!(interval = app.interval.as_str(), "Interval changed");
            Some(refetch(app))
        }
        KeyCode::Char('r') => Some(refetch(app)),
        KeyCode::Char('s') => {
            app.size_input = Some(SizeInput::new());
            None
        }
        _ => None,
    }
}

/// Keys while a window size is being typed.
fn handle_size_entry(app: &mut App, key: KeyEvent, now: Instant) -> Option<Action> {
    let input = app.size_input.as_mut()?;

    match key.code {
        KeyCode::Char(c) => input.insert(c),
        KeyCode::Backspace => input.backspace(),
        KeyCode::Delete => input.delete(),
        KeyCode::Left => input.move_left(),
        KeyCode::Right => input.move_right(),
        KeyCode::Esc => app.size_input = None,
        KeyCode::Enter => {
            let size = app.size_input.take()?.value();
            let Some(size) = size else {
                app.show_error_at("enter a number of candles", now);
                return None;
            };
            return app.zoom.set_size(size).map(|_| refetch(app));
        }
        _ => {}
    }
    None
}

fn refetch(app: &mut App) -> Action {
    Action::FetchChart(app.request_chart())
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;
    use crate::chart::ChartWindow;
    use crate::models::Pair;
    use crate::models::candle::Interval;

    fn app() -> App {
        App::new(Pair::new("KRW", "BTC"), Interval::M1, ChartWindow::new(100))
    }

    fn key(c: char) -> Message {
        Message::Input(Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)))
    }

    fn press(code: KeyCode) -> Message {
        Message::Input(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)))
    }

    fn fetch_size(action: Option<Action>) -> usize {
        match action {
            Some(Action::FetchChart(request)) => request.size,
            None => panic!("expected a fetch"),
        }
    }

    fn candle(timestamp: i64) -> Candle {
        Candle {
            timestamp,
            open: dec!(100),
            high: dec!(110),
            low: dec!(90),
            close: dec!(105),
            quote_volume: dec!(1),
            target_volume: dec!(1),
        }
    }

    #[test]
    fn zoom_keys_refetch_with_new_size() {
        let mut app = app();
        assert_eq!(fetch_size(update(&mut app, key('+'))), 50);
        assert_eq!(update(&mut app, key('+')), None);
        assert_eq!(fetch_size(update(&mut app, key('-'))), 100);
    }

    #[test]
    fn wheel_refetches_after_debounce() {
        let mut app = app();
        let start = Instant::now();

        assert_eq!(
            update_at(&mut app, Message::Input(Event::Wheel(5.0)), start),
            None
        );
        assert_eq!(
            update_at(&mut app, Message::Input(Event::Tick), start),
            None
        );

        let action = update_at(
            &mut app,
            Message::Input(Event::Tick),
            start + Duration::from_millis(20),
        );
        assert_eq!(fetch_size(action), 110);
    }

    #[test]
    fn interval_change_refetches() {
        let mut app = app();
        match update(&mut app, key(']')) {
            Some(Action::FetchChart(request)) => assert_eq!(request.interval, Interval::M3),
            None => panic!("expected a fetch"),
        }
        assert_eq!(app.interval, Interval::M3);

        update(&mut app, key('['));
        assert_eq!(app.interval, Interval::M1);
    }

    #[test]
    fn stale_chart_response_is_ignored() {
        let mut app = app();
        let Some(Action::FetchChart(first)) = update(&mut app, key('r')) else {
            panic!("expected a fetch");
        };
        let Some(Action::FetchChart(second)) = update(&mut app, key('r')) else {
            panic!("expected a fetch");
        };

        update(
            &mut app,
            Message::ChartLoaded {
                token: second.token,
                result: Ok(vec![candle(2), candle(1)]),
            },
        );
        update(
            &mut app,
            Message::ChartLoaded {
                token: first.token,
                result: Ok(vec![candle(9)]),
            },
        );

        let timestamps: Vec<i64> = app.chart.candles().iter().map(|c| c.timestamp).collect();
        assert_eq!(timestamps, vec![1, 2]);
    }

    #[test]
    fn failed_fetch_shows_error() {
        let mut app = app();
        let Some(Action::FetchChart(request)) = update(&mut app, key('r')) else {
            panic!("expected a fetch");
        };

        update(
            &mut app,
            Message::ChartLoaded {
                token: request.token,
                result: Err("timeout".into()),
            },
        );

        assert_eq!(app.chart.error(), Some("timeout"));
        assert!(app.error_message.unwrap().message.contains("timeout"));
    }

    #[test]
    fn quit_keys() {
        let mut by_q = app();
        update(&mut by_q, key('q'));
        assert!(by_q.should_quit);

        let mut by_ctrl_c = app();
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        update(&mut by_ctrl_c, Message::Input(Event::Key(ctrl_c)));
        assert!(by_ctrl_c.should_quit);
    }

    #[test]
    fn connection_drop_is_reported() {
        let mut app = app();
        update(&mut app, Message::Connection(ConnectionState::Open));
        assert!(app.error_message.is_none());

        update(&mut app, Message::Connection(ConnectionState::Closed));
        assert_eq!(app.connection, ConnectionState::Closed);
        assert!(app.error_message.is_some());
    }

    #[test]
    fn typed_size_is_clamped_and_refetched() {
        let mut app = app();
        assert_eq!(update(&mut app, key('s')), None);
        for c in "1000".chars() {
            assert_eq!(update(&mut app, key(c)), None);
        }
        assert_eq!(app.zoom.size(), 100);

        assert_eq!(fetch_size(update(&mut app, press(KeyCode::Enter))), 500);
        assert!(app.size_input.is_none());
    }

    #[test]
    fn size_entry_swallows_command_keys() {
        let mut app = app();
        update(&mut app, key('s'));
        update(&mut app, key('q'));
        update(&mut app, key('+'));
        assert!(!app.should_quit);
        assert_eq!(app.zoom.size(), 100);

        update(&mut app, press(KeyCode::Esc));
        assert!(app.size_input.is_none());
        assert!(!app.should_quit);
    }

    #[test]
    fn unchanged_or_empty_size_does_not_refetch() {
        let mut app = app();
        update(&mut app, key('s'));
        for c in "100".chars() {
            update(&mut app, key(c));
        }
        assert_eq!(update(&mut app, press(KeyCode::Enter)), None);

        update(&mut app, key('s'));
        assert_eq!(update(&mut app, press(KeyCode::Enter)), None);
        assert!(app.error_message.is_some());
    }

    #[test]
    fn pointer_motion_tracks_column() {
        let mut app = app();
        update(&mut app, Message::Input(Event::Hover(42)));
        assert_eq!(app.hover_column, Some(42));
    }

    #[test]
    fn terminal_events_translate_to_viewer_events() {
        use crossterm::event::MouseEvent;

        let mouse = |kind| {
            CrosstermEvent::Mouse(MouseEvent {
                kind,
                column: 7,
                row: 3,
                modifiers: KeyModifiers::NONE,
            })
        };

        assert!(matches!(
            translate(mouse(MouseEventKind::ScrollDown)),
            Some(Event::Wheel(d)) if d > 0.0
        ));
        assert!(matches!(
            translate(mouse(MouseEventKind::ScrollUp)),
            Some(Event::Wheel(d)) if d < 0.0
        ));
        assert!(matches!(
            translate(mouse(MouseEventKind::Moved)),
            Some(Event::Hover(7))
        ));
        assert!(translate(CrosstermEvent::Resize(80, 24)).is_none());
    }
}
