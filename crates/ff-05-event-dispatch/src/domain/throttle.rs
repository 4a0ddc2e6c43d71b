//! Leading-edge throttle for tally pushes.
//!
//! The first request in a quiet period emits at once and opens a window.
//! Requests inside the window collapse into one trailing emission at the
//! window's end, which opens the next window. Time is passed in, never read.

use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone)]
pub struct MonitorThrottle {
    interval: Duration,
    window_end: Option<Instant>,
    pending: bool,
}

impl MonitorThrottle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            window_end: None,
            pending: false,
        }
    }

    /// Register a request. Returns `true` when the caller should emit now.
    pub fn on_request(&mut self, now: Instant) -> bool {
        match self.window_end {
            Some(end) if now < end => {
                self.pending = true;
                false
            }
            _ => {
                self.window_end = Some(now + self.interval);
                self.pending = false;
                true
            }
        }
    }

    /// When a trailing emission is due, if one is pending.
    pub fn deadline(&self) -> Option<Instant> {
        if self.pending {
            self.window_end
        } else {
            None
        }
    }

    /// Called once the deadline passes. Returns `true` when the caller should
    /// emit the trailing update.
    pub fn on_deadline(&mut self, now: Instant) -> bool {
        match self.window_end {
            Some(end) if self.pending && now >= end => {
                self.pending = false;
                self.window_end = Some(now + self.interval);
                true
            }
            _ => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }
}
