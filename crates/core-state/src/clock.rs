//! Time source and the single-shot debounce deadline.
//!
//! The engine never sleeps or spawns: the owner's scheduler polls with the
//! current instant (`tick(now)`), which keeps every timing path deterministic
//! under test via `ManualClock`.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock advanced by hand; clones share the same instant.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<Instant>>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Arc::new(Mutex::new(Instant::now())),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Cancellable, re-armable single-shot deadline. Once disposed it never
/// reports expiry again.
#[derive(Debug, Clone)]
pub struct DebounceTimer {
    window: Duration,
    deadline: Option<Instant>,
    disposed: bool,
}

impl DebounceTimer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            deadline: None,
            disposed: false,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Restart the countdown from `now`.
    pub fn arm(&mut self, now: Instant) {
        if self.disposed {
            return;
        }
        self.deadline = Some(now + self.window);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn expired(&self, now: Instant) -> bool {
        !self.disposed && self.deadline.is_some_and(|d| now >= d)
    }

    pub fn dispose(&mut self) {
        self.disposed = true;
        self.deadline = None;
    }
}
