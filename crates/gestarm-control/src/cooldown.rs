//! Cooldown gate
//!
//! A debounce deadline checked inline against the frame clock. There is no
//! timer task: expiry is noticed on the first check after the deadline.

use std::time::Duration;

use gestarm_core::Timestamp;

#[derive(Debug, Clone)]
pub struct Cooldown {
    duration: Duration,
    until: Option<Timestamp>,
}

impl Cooldown {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            until: None,
        }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Start (or restart) the window at `now`
    pub fn start(&mut self, now: Timestamp) {
        self.until = Some(now.saturating_add(self.duration));
    }

    pub fn clear(&mut self) {
        self.until = None;
    }

    /// Active on `[start, start + duration)`
    pub fn is_active(&self, now: Timestamp) -> bool {
        self.until.map_or(false, |until| now < until)
    }

    pub fn remaining(&self, now: Timestamp) -> Duration {
        self.until.map_or(Duration::ZERO, |until| until - now)
    }
}
