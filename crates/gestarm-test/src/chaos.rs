//! Detector chaos
//!
//! Simulates an unreliable landmark detector in front of a clean source:
//! - Per-landmark jitter
//! - Missed detections, singly and in bursts
//! - Malformed frames with the wrong point count

use gestarm_control::LandmarkSource;
use gestarm_core::{Landmark, LandmarkFrame};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Detector chaos configuration
#[derive(Clone, Debug)]
pub struct DetectorChaosConfig {
    /// Standard deviation of per-coordinate noise (normalized units)
    pub jitter_stddev: f64,
    /// Probability a frame loses its hand
    pub dropout_rate: f64,
    /// Probability a dropout starts a burst
    pub burst_dropout_prob: f64,
    /// Burst length range in frames
    pub burst_length: (u32, u32),
    /// Probability a frame is truncated
    pub malformed_rate: f64,
    pub seed: u64,
}

impl Default for DetectorChaosConfig {
    fn default() -> Self {
        DetectorChaosConfig {
            jitter_stddev: 0.002,
            dropout_rate: 0.02,
            burst_dropout_prob: 0.1,
            burst_length: (2, 6),
            malformed_rate: 0.005,
            seed: 42,
        }
    }
}

impl DetectorChaosConfig {
    /// Steady hand, good lighting
    pub fn clean() -> Self {
        DetectorChaosConfig {
            jitter_stddev: 0.0005,
            dropout_rate: 0.0,
            burst_dropout_prob: 0.0,
            burst_length: (1, 1),
            malformed_rate: 0.0,
            ..Default::default()
        }
    }

    /// Poor lighting, partial occlusion
    pub fn poor() -> Self {
        DetectorChaosConfig {
            jitter_stddev: 0.01,
            dropout_rate: 0.1,
            burst_dropout_prob: 0.3,
            burst_length: (3, 12),
            malformed_rate: 0.02,
            ..Default::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

/// Chaos counters
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChaosStats {
    pub frames: u64,
    pub dropped: u64,
    pub malformed: u64,
}

/// Wraps a source and corrupts what it produces
pub struct ChaosSource<S> {
    inner: S,
    config: DetectorChaosConfig,
    rng: StdRng,
    burst_remaining: u32,
    stats: ChaosStats,
}

impl<S: LandmarkSource> ChaosSource<S> {
    pub fn new(inner: S, config: DetectorChaosConfig) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        Self {
            inner,
            config,
            rng,
            burst_remaining: 0,
            stats: ChaosStats::default(),
        }
    }

    pub fn stats(&self) -> &ChaosStats {
        &self.stats
    }

    /// Box-Muller normal sample
    fn gaussian(&mut self, stddev: f64) -> f64 {
        if stddev <= 0.0 {
            return 0.0;
        }
        let u1: f64 = self.rng.gen::<f64>().max(f64::MIN_POSITIVE);
        let u2: f64 = self.rng.gen();
        stddev * (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
    }

    fn should_drop(&mut self) -> bool {
        if self.burst_remaining > 0 {
            self.burst_remaining -= 1;
            return true;
        }
        if self.rng.gen::<f64>() >= self.config.dropout_rate {
            return false;
        }
        if self.rng.gen::<f64>() < self.config.burst_dropout_prob {
            let (lo, hi) = self.config.burst_length;
            let length = self.rng.gen_range(lo..=hi.max(lo));
            self.burst_remaining = length.saturating_sub(1);
        }
        true
    }

    fn corrupt(&mut self, frame: LandmarkFrame) -> LandmarkFrame {
        let stddev = self.config.jitter_stddev;
        let mut points: Vec<Landmark> = frame
            .points()
            .iter()
            .map(|p| Landmark {
                x: p.x + self.gaussian(stddev),
                y: p.y + self.gaussian(stddev),
                z: p.z,
            })
            .collect();

        if self.rng.gen::<f64>() < self.config.malformed_rate {
            self.stats.malformed += 1;
            let keep = self.rng.gen_range(0..points.len().max(1));
            points.truncate(keep);
        }

        LandmarkFrame::new(points)
    }
}

impl<S: LandmarkSource> LandmarkSource for ChaosSource<S> {
    fn next_frame(&mut self) -> Option<LandmarkFrame> {
        let frame = self.inner.next_frame();
        self.stats.frames += 1;

        if self.should_drop() {
            self.stats.dropped += 1;
            return None;
        }
        frame.map(|f| self.corrupt(f))
    }

    fn is_exhausted(&self) -> bool {
        self.inner.is_exhausted()
    }
}
