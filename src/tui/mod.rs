//! Terminal User Interface for the candle viewer.
//!
//! Provides a Ratatui-based TUI showing the live ticker and the candlestick
//! chart for one trading pair.

pub mod app;
pub mod components;
pub mod event;
pub mod format;
pub mod input;
pub mod terminal;
pub mod ui;

pub use app::App;
pub use event::{Action, Event, Message};
pub use terminal::{Tui, install_panic_hook, restore_terminal, setup_terminal};
pub use ui::render;
