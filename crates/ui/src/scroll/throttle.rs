use std::time::{Duration, Instant};

/// Leading and trailing edge throttle driven by an explicit clock
///
/// The first call in an idle period fires immediately and opens a window of `interval`.
/// Calls inside the window collapse into one trailing fire, delivered by [`Throttle::poll`]
/// once the window closes; that fire opens a fresh window.
#[derive(Debug, Clone)]
pub struct Throttle {
    interval: Duration,
    window_end: Option<Instant>,
    trailing: bool,
}

impl Throttle {
    pub fn new(interval: Duration) -> Self {
        Self { interval, window_end: None, trailing: false }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Register a call at `now`. Returns `true` when the action should run immediately.
    pub fn call(&mut self, now: Instant) -> bool {
        match self.window_end {
            Some(end) if now < end => {
                self.trailing = true;
                false
            }
            _ => {
                self.trailing = false;
                self.window_end = Some(now + self.interval);
                true
            }
        }
    }

    /// Advance the clock. Returns `true` when a deferred trailing call is due.
    pub fn poll(&mut self, now: Instant) -> bool {
        let Some(end) = self.window_end else {
            return false;
        };
        if now < end {
            return false;
        }

        if self.trailing {
            self.trailing = false;
            self.window_end = Some(now + self.interval);
            true
        } else {
            self.window_end = None;
            false
        }
    }

    /// Drop any pending trailing call and reset to idle
    pub fn cancel(&mut self) {
        self.window_end = None;
        self.trailing = false;
    }

    pub fn is_pending(&self) -> bool {
        self.trailing
    }

    /// When [`Throttle::poll`] next has work to do, if ever
    pub fn next_deadline(&self) -> Option<Instant> {
        if self.trailing { self.window_end } else { None }
    }
}
