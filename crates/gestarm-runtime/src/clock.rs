//! Session clocks
//!
//! Frame timestamps are microseconds since the session started. The live
//! clock follows the OS monotonic clock; the fixed-rate clock advances one
//! frame period per read, for replays and tests.

use std::time::{Duration, Instant};

use gestarm_core::Timestamp;

/// Source of per-frame timestamps
pub trait FrameClock {
    /// Timestamp for the frame about to be processed. Never decreases.
    fn now(&mut self) -> Timestamp;
}

/// Monotonic wall clock anchored at session start
#[derive(Debug, Clone)]
pub struct SessionClock {
    reference: Instant,
    value: Timestamp,
}

impl SessionClock {
    pub fn new() -> Self {
        Self {
            reference: Instant::now(),
            value: Timestamp::ZERO,
        }
    }

    /// Advance to the current instant and return it
    pub fn tick(&mut self) -> Timestamp {
        let elapsed = self.reference.elapsed();
        let micros = i64::try_from(elapsed.as_micros()).unwrap_or(i64::MAX);
        // Instant is monotonic; max() keeps that true across saturation
        self.value = self.value.max(Timestamp::from_micros(micros));
        self.value
    }

    /// Last ticked value, without advancing
    pub fn last(&self) -> Timestamp {
        self.value
    }

    pub fn elapsed(&self) -> Duration {
        self.reference.elapsed()
    }
}

impl Default for SessionClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock for SessionClock {
    fn now(&mut self) -> Timestamp {
        self.tick()
    }
}

/// Simulated camera clock: each read is one frame period after the last
#[derive(Debug, Clone)]
pub struct FixedRateClock {
    period: Duration,
    next: Timestamp,
}

impl FixedRateClock {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            next: Timestamp::ZERO,
        }
    }

    /// Clock for a camera running at `fps` frames per second
    pub fn from_fps(fps: u32) -> Self {
        Self::new(Duration::from_secs(1) / fps.max(1))
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Skip ahead without producing a frame
    pub fn advance(&mut self, duration: Duration) {
        self.next = self.next.saturating_add(duration);
    }
}

impl FrameClock for FixedRateClock {
    fn now(&mut self) -> Timestamp {
        let now = self.next;
        self.next = self.next.saturating_add(self.period);
        now
    }
}
