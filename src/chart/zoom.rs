//! Maps wheel deltas and zoom buttons onto the chart window.
//!
//! A positive wheel delta (scrolling down) widens the window, showing more
//! candles; a negative delta narrows it. Wheel input is debounced: the last
//! delta of a burst is applied once the wheel has been quiet for
//! [`WHEEL_DEBOUNCE`].

use std::time::{Duration, Instant};

use tracing::debug;

use super::ChartWindow;

/// Candles added or removed per debounced wheel notch.
pub const WHEEL_STEP: i64 = 10;

/// Candles added or removed per zoom button press.
pub const BUTTON_STEP: i64 = 50;

/// Quiet period after the last wheel event before it is applied.
pub const WHEEL_DEBOUNCE: Duration = Duration::from_millis(10);

#[derive(Debug, Clone, Copy)]
struct PendingWheel {
    delta_y: f64,
    due: Instant,
}

/// Owns the [`ChartWindow`] and every way of changing it.
///
/// Each operation returns the new window size only when the size actually
/// changed; a `Some` is the caller's cue to refetch.
#[derive(Debug, Clone)]
pub struct ZoomController {
    window: ChartWindow,
    pending: Option<PendingWheel>,
}

impl ZoomController {
    pub fn new(window: ChartWindow) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    pub fn window(&self) -> ChartWindow {
        self.window
    }

    pub fn size(&self) -> usize {
        self.window.size()
    }

    /// Records a wheel event; it is applied by [`poll`](Self::poll) once
    /// the debounce period has passed without another event.
    pub fn on_wheel(&mut self, delta_y: f64, now: Instant) {
        self.pending = Some(PendingWheel {
            delta_y,
            due: now + WHEEL_DEBOUNCE,
        });
    }

    /// Returns `true` while a wheel event is waiting out its debounce.
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Applies a pending wheel event whose debounce period has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<usize> {
        let pending = self.pending?;
        if now < pending.due {
            return None;
        }

        self.pending = None;
        self.apply_wheel(pending.delta_y)
    }

    /// Applies one wheel delta immediately, bypassing the debounce.
    pub fn apply_wheel(&mut self, delta_y: f64) -> Option<usize> {
        if delta_y == 0.0 || delta_y.is_nan() {
            return None;
        }

        let sign = if delta_y > 0.0 { 1 } else { -1 };
        self.shift(sign * WHEEL_STEP)
    }

    /// Narrows the window by one button step.
    pub fn zoom_in(&mut self) -> Option<usize> {
        self.shift(-BUTTON_STEP)
    }

    /// Widens the window by one button step.
    pub fn zoom_out(&mut self) -> Option<usize> {
        self.shift(BUTTON_STEP)
    }

    /// Sets the window from explicit user input, clamped to the bounds.
    pub fn set_size(&mut self, size: usize) -> Option<usize> {
        self.replace(ChartWindow::new(size))
    }

    fn shift(&mut self, delta: i64) -> Option<usize> {
        self.replace(self.window.offset(delta))
    }

    fn replace(&mut self, window: ChartWindow) -> Option<usize> {
        if window == self.window {
            return None;
        }

        debug!(from = self.window.size(), to = window.size(), "Chart window changed");
        self.window = window;
        Some(window.size())
    }
}

impl Default for ZoomController {
    fn default() -> Self {
        Self::new(ChartWindow::default())
    }
}
