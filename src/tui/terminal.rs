//! Terminal setup and teardown.
//!
//! The viewer runs in raw mode on the alternate screen with mouse capture on,
//! so wheel and motion events reach the chart. Every exit path, including a
//! panic, has to undo all three or the user's shell is left unusable.

use std::io::{self, IsTerminal, Stdout, Write};
use std::panic;

use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::error;

use crate::{CandleviewError, Result};

/// Terminal driven by the viewer.
pub type Tui = Terminal<CrosstermBackend<Stdout>>;

fn io_error(context: &'static str) -> impl FnOnce(io::Error) -> CandleviewError {
    move |e| CandleviewError::Io(format!("{context}: {e}"))
}

/// Leaves raw mode, the alternate screen and mouse capture on `out`.
fn leave(out: &mut impl Write) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(out, DisableMouseCapture, LeaveAlternateScreen)
}

/// Puts the terminal into viewer mode.
///
/// # Errors
///
/// Returns [`CandleviewError::Io`] if stdout is not a TTY or the terminal
/// rejects any of the mode switches. A partial setup is undone first.
pub fn setup_terminal() -> Result<Tui> {
    if !io::stdout().is_terminal() {
        return Err(CandleviewError::Io(
            "the chart view needs an interactive terminal".to_string(),
        ));
    }

    enable_raw_mode().map_err(io_error("failed to enable raw mode"))?;

    let mut stdout = io::stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen, EnableMouseCapture) {
        let _ = leave(&mut stdout);
        return Err(io_error("failed to enter the alternate screen")(e));
    }

    Terminal::new(CrosstermBackend::new(stdout)).map_err(|e| {
        let _ = leave(&mut io::stdout());
        io_error("failed to create terminal")(e)
    })
}

/// Restores the terminal after the viewer exits normally.
///
/// # Errors
///
/// Returns [`CandleviewError::Io`] if the terminal cannot be restored.
pub fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    leave(terminal.backend_mut()).map_err(io_error("failed to restore terminal"))?;
    terminal
        .show_cursor()
        .map_err(io_error("failed to show cursor"))
}

/// Restores the terminal before the default panic output is printed, and
/// records the panic in the log file.
pub fn install_panic_hook() {
    let previous = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        let _ = leave(&mut io::stdout());
        let location = info.location().map_or_else(
            || "unknown location".to_string(),
            |loc| format!("{}:{}", loc.file(), loc.line()),
        );
        error!(%location, "Viewer panicked: {info}");
        previous(info);
    }));
}
