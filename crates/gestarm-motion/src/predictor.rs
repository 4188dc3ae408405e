//! Motion predictor - constant-acceleration extrapolation from two samples

use std::time::Duration;

use gestarm_core::{MotionError, PredictorConfig, Timestamp, Vec3};
use tracing::debug;

/// Hand position in the arm frame at a point in time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionSample {
    pub position: Vec3,
    pub time: Timestamp,
}

impl PositionSample {
    pub fn new(position: Vec3, time: Timestamp) -> Self {
        Self { position, time }
    }
}

/// Velocity (mm/s) and acceleration (mm/s²) estimate
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Motion {
    pub velocity: Vec3,
    pub acceleration: Vec3,
}

impl Motion {
    pub const STILL: Motion = Motion {
        velocity: Vec3::ZERO,
        acceleration: Vec3::ZERO,
    };

    /// `p + v·Δt + ½·a·Δt²`
    pub fn extrapolate(&self, position: Vec3, horizon: Duration) -> Vec3 {
        let dt = horizon.as_secs_f64();
        position + self.velocity * dt + self.acceleration * (0.5 * dt * dt)
    }
}

/// Result of one predictor step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    /// Where the hand is expected to be after the horizon
    pub position: Vec3,
    pub motion: Motion,
}

/// Per-hand predictor.
///
/// Keeps only the previous sample and the previous velocity. Sampling
/// intervals shorter than `min_interval` (including duplicate timestamps)
/// are clamped up to it; intervals that go backwards are refused with
/// `DegenerateSample` and leave the history untouched.
#[derive(Debug, Clone)]
pub struct MotionPredictor {
    min_interval: Duration,
    previous: Option<PositionSample>,
    previous_velocity: Vec3,
}

impl MotionPredictor {
    pub fn new(config: &PredictorConfig) -> Self {
        Self {
            min_interval: config.min_interval,
            previous: None,
            previous_velocity: Vec3::ZERO,
        }
    }

    /// Forget all history; the next sample is treated as the first
    pub fn reset(&mut self) {
        self.previous = None;
        self.previous_velocity = Vec3::ZERO;
    }

    pub fn has_history(&self) -> bool {
        self.previous.is_some()
    }

    pub fn last_sample(&self) -> Option<&PositionSample> {
        self.previous.as_ref()
    }

    /// Record a sample and return the motion estimate it implies
    pub fn update(&mut self, sample: PositionSample) -> Result<Motion, MotionError> {
        let Some(previous) = self.previous else {
            self.previous = Some(sample);
            self.previous_velocity = Vec3::ZERO;
            return Ok(Motion::STILL);
        };

        let delta_us = sample.time.as_micros() - previous.time.as_micros();
        if delta_us < 0 {
            return Err(MotionError::DegenerateSample { delta_us });
        }

        let min_dt = self.min_interval.as_secs_f64();
        let mut dt = sample.time.seconds_since(previous.time);
        if dt < min_dt {
            debug!(delta_us, "sampling interval clamped");
            dt = min_dt;
        }

        let velocity = (sample.position - previous.position) / dt;
        let acceleration = (velocity - self.previous_velocity) / dt;

        self.previous = Some(sample);
        self.previous_velocity = velocity;

        Ok(Motion {
            velocity,
            acceleration,
        })
    }

    /// Record a sample and extrapolate `horizon` ahead of it.
    ///
    /// The first sample is returned unchanged.
    pub fn predict(&mut self, sample: PositionSample, horizon: Duration) -> Result<Prediction, MotionError> {
        let motion = self.update(sample)?;
        Ok(Prediction {
            position: motion.extrapolate(sample.position, horizon),
            motion,
        })
    }
}

impl Default for MotionPredictor {
    fn default() -> Self {
        Self::new(&PredictorConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const HORIZON: Duration = Duration::from_millis(100);

    fn sample(x: f64, y: f64, z: f64, millis: i64) -> PositionSample {
        PositionSample::new(Vec3::new(x, y, z), Timestamp::from_millis(millis))
    }

    fn assert_close(a: Vec3, b: Vec3) {
        assert!(a.distance(&b) < 1e-6, "{:?} != {:?}", a, b);
    }

    #[test]
    fn test_first_sample_passes_through() {
        let mut predictor = MotionPredictor::default();
        let prediction = predictor.predict(sample(200.0, 0.0, 50.0, 0), HORIZON).unwrap();

        assert_eq!(prediction.position, Vec3::new(200.0, 0.0, 50.0));
        assert_eq!(prediction.motion, Motion::STILL);
        assert!(predictor.has_history());
    }

    #[test]
    fn test_constant_velocity() {
        let mut predictor = MotionPredictor::default();

        // +10mm every 100ms along x
        predictor.predict(sample(100.0, 20.0, -5.0, 0), HORIZON).unwrap();
        predictor.predict(sample(110.0, 20.0, -5.0, 100), HORIZON).unwrap();
        let prediction = predictor.predict(sample(120.0, 20.0, -5.0, 200), HORIZON).unwrap();

        assert_close(prediction.motion.velocity, Vec3::new(100.0, 0.0, 0.0));
        assert_close(prediction.motion.acceleration, Vec3::ZERO);
        assert_close(prediction.position, Vec3::new(130.0, 20.0, -5.0));
    }

    #[test]
    fn test_second_sample_accelerates_from_rest() {
        let mut predictor = MotionPredictor::default();

        predictor.update(sample(0.0, 0.0, 0.0, 0)).unwrap();
        let motion = predictor.update(sample(10.0, 0.0, 0.0, 100)).unwrap();

        // Velocity history starts at zero
        assert_close(motion.velocity, Vec3::new(100.0, 0.0, 0.0));
        assert_close(motion.acceleration, Vec3::new(1000.0, 0.0, 0.0));
    }

    #[test]
    fn test_horizon_independent_of_sampling_interval() {
        let mut predictor = MotionPredictor::default();

        predictor.update(sample(0.0, 0.0, 0.0, 0)).unwrap();
        predictor.update(sample(0.0, 5.0, 0.0, 50)).unwrap();
        let prediction = predictor
            .predict(sample(0.0, 10.0, 0.0, 100), Duration::from_millis(200))
            .unwrap();

        // 100 mm/s for 0.2s
        assert_close(prediction.position, Vec3::new(0.0, 30.0, 0.0));
    }

    #[test]
    fn test_duplicate_timestamp_clamped() {
        let mut predictor = MotionPredictor::default();

        predictor.predict(sample(150.0, 10.0, 0.0, 500), HORIZON).unwrap();
        let prediction = predictor.predict(sample(150.0, 10.0, 0.0, 500), HORIZON).unwrap();

        assert!(prediction.position.is_finite());
        assert_close(prediction.position, Vec3::new(150.0, 10.0, 0.0));
        assert_close(prediction.motion.velocity, Vec3::ZERO);
    }

    #[test]
    fn test_duplicate_timestamp_with_motion_stays_finite() {
        let mut predictor = MotionPredictor::default();

        predictor.update(sample(0.0, 0.0, 0.0, 0)).unwrap();
        let motion = predictor.update(sample(1.0, 0.0, 0.0, 0)).unwrap();

        // 1mm over the 1ms floor
        assert_close(motion.velocity, Vec3::new(1000.0, 0.0, 0.0));
        assert!(motion.acceleration.is_finite());
    }

    #[test]
    fn test_backwards_time_rejected() {
        let mut predictor = MotionPredictor::default();

        predictor.update(sample(0.0, 0.0, 0.0, 100)).unwrap();
        let err = predictor.update(sample(5.0, 0.0, 0.0, 90)).unwrap_err();
        assert_eq!(err, MotionError::DegenerateSample { delta_us: -10_000 });

        // History untouched
        assert_eq!(predictor.last_sample().unwrap().time, Timestamp::from_millis(100));
    }

    #[test]
    fn test_reset_forgets_history() {
        let mut predictor = MotionPredictor::default();

        predictor.update(sample(0.0, 0.0, 0.0, 0)).unwrap();
        predictor.update(sample(50.0, 0.0, 0.0, 100)).unwrap();
        predictor.reset();

        let prediction = predictor.predict(sample(80.0, 0.0, 0.0, 200), HORIZON).unwrap();
        assert_eq!(prediction.position, Vec3::new(80.0, 0.0, 0.0));
        assert_eq!(prediction.motion, Motion::STILL);
    }

    proptest! {
        #[test]
        fn prop_repeated_position_never_moves(
            x in -500.0f64..500.0, y in -500.0f64..500.0, z in -200.0f64..200.0,
            steps in proptest::collection::vec(0i64..50, 1..20)
        ) {
            let mut predictor = MotionPredictor::default();
            let mut t = 0;
            for step in steps {
                t += step;
                let p = predictor
                    .predict(sample(x, y, z, t), HORIZON)
                    .unwrap();
                prop_assert!((p.position.x - x).abs() < 1e-9);
                prop_assert!((p.position.y - y).abs() < 1e-9);
                prop_assert!((p.position.z - z).abs() < 1e-9);
            }
        }
    }
}
