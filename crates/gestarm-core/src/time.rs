//! Time primitives
//!
//! Frames are stamped with a monotonic session time. Keeping it as an
//! integer microsecond count makes cooldown and sampling arithmetic exact
//! and lets tests drive time explicitly.

use std::ops::{Add, Sub};
use std::time::Duration;

/// Monotonic session time in microseconds since session start
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timestamp(pub i64);

impl Timestamp {
    pub const ZERO: Timestamp = Timestamp(0);

    #[inline]
    pub fn from_micros(micros: i64) -> Self {
        Timestamp(micros)
    }

    #[inline]
    pub fn from_millis(millis: i64) -> Self {
        Timestamp(millis * 1000)
    }

    #[inline]
    pub fn from_secs_f64(secs: f64) -> Self {
        Timestamp((secs * 1_000_000.0) as i64)
    }

    #[inline]
    pub fn as_micros(self) -> i64 {
        self.0
    }

    #[inline]
    pub fn as_millis(self) -> i64 {
        self.0 / 1000
    }

    #[inline]
    pub fn as_secs_f64(self) -> f64 {
        self.0 as f64 / 1_000_000.0
    }

    /// Signed difference `self - earlier` in seconds
    #[inline]
    pub fn seconds_since(self, earlier: Timestamp) -> f64 {
        (self.0 - earlier.0) as f64 / 1_000_000.0
    }

    #[inline]
    pub fn saturating_add(self, duration: Duration) -> Self {
        Timestamp(self.0.saturating_add(duration.as_micros() as i64))
    }
}

impl Add<Duration> for Timestamp {
    type Output = Timestamp;

    #[inline]
    fn add(self, rhs: Duration) -> Self::Output {
        Timestamp(self.0 + rhs.as_micros() as i64)
    }
}

impl Sub<Timestamp> for Timestamp {
    type Output = Duration;

    /// Saturates at zero when `rhs` is later
    #[inline]
    fn sub(self, rhs: Timestamp) -> Self::Output {
        let diff = self.0 - rhs.0;
        if diff >= 0 {
            Duration::from_micros(diff as u64)
        } else {
            Duration::ZERO
        }
    }
}

impl std::fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "t({:.3}ms)", self.0 as f64 / 1000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_arithmetic() {
        let t1 = Timestamp::from_millis(100);
        let t2 = t1 + Duration::from_millis(10);

        assert!(t2 > t1);
        assert_eq!(t2 - t1, Duration::from_millis(10));
        assert_eq!(t1 - t2, Duration::ZERO);
        assert!((t2.seconds_since(t1) - 0.01).abs() < 1e-12);
        assert!((t1.seconds_since(t2) + 0.01).abs() < 1e-12);
    }

    #[test]
    fn test_timestamp_conversions() {
        let t = Timestamp::from_secs_f64(1.5);
        assert_eq!(t.as_millis(), 1500);
        assert_eq!(t.as_micros(), 1_500_000);
        assert!((t.as_secs_f64() - 1.5).abs() < 1e-12);
    }
}
