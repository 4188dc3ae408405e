//! Mode-aware reachability validator

use gestarm_core::{ArmEnvelopeConfig, ControlMode, RailConfig};

use crate::{ArmEnvelope, Reachability, Rejection};

/// Answers "is this target commandable" for the active control mode.
///
/// Stateless: every query re-evaluates the envelope.
#[derive(Debug, Clone)]
pub struct ReachabilityValidator {
    envelope: ArmEnvelope,
    rail_min: f64,
    rail_max: f64,
}

impl ReachabilityValidator {
    pub fn new(arm: ArmEnvelopeConfig, rail: &RailConfig) -> Self {
        Self {
            envelope: ArmEnvelope::new(arm),
            rail_min: rail.min_travel,
            rail_max: rail.max_travel,
        }
    }

    pub fn envelope(&self) -> &ArmEnvelope {
        &self.envelope
    }

    /// Rail mode checks only `rail_offset`; arm mode checks only `(x, y, z)`.
    pub fn evaluate(&self, mode: ControlMode, x: f64, y: f64, z: f64, rail_offset: f64) -> Reachability {
        match mode {
            ControlMode::Rail => self.evaluate_rail(rail_offset),
            ControlMode::Arm => self.envelope.evaluate(x, y, z),
        }
    }

    pub fn is_reachable(&self, mode: ControlMode, x: f64, y: f64, z: f64, rail_offset: f64) -> bool {
        self.evaluate(mode, x, y, z, rail_offset).is_reachable()
    }

    pub fn evaluate_rail(&self, offset: f64) -> Reachability {
        if self.rail_min <= offset && offset <= self.rail_max {
            Reachability::Reachable
        } else {
            Reachability::Unreachable(Rejection::RailTravel { offset })
        }
    }
}

impl Default for ReachabilityValidator {
    fn default() -> Self {
        Self::new(ArmEnvelopeConfig::default(), &RailConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_rail_travel_inclusive() {
        let v = ReachabilityValidator::default();

        assert!(v.is_reachable(ControlMode::Rail, 0.0, 0.0, 0.0, 0.0));
        assert!(v.is_reachable(ControlMode::Rail, 0.0, 0.0, 0.0, 500.0));
        assert!(v.is_reachable(ControlMode::Rail, 0.0, 0.0, 0.0, 1000.0));
        assert!(!v.is_reachable(ControlMode::Rail, 0.0, 0.0, 0.0, 1000.0001));
        assert!(!v.is_reachable(ControlMode::Rail, 0.0, 0.0, 0.0, -0.0001));
        assert!(!v.is_reachable(ControlMode::Rail, 0.0, 0.0, 0.0, f64::NAN));
    }

    #[test]
    fn test_rail_ignores_arm_position() {
        let v = ReachabilityValidator::default();
        // Far outside the arm envelope
        assert!(v.is_reachable(ControlMode::Rail, -900.0, 900.0, 900.0, 250.0));
    }

    #[test]
    fn test_arm_ignores_rail_offset() {
        let v = ReachabilityValidator::default();
        assert!(v.is_reachable(ControlMode::Arm, 170.0, 0.0, -90.0, -50.0));
        assert!(v.is_reachable(ControlMode::Arm, 200.0, 0.0, 50.0, 5000.0));
    }

    #[test]
    fn test_arm_rejection_reported() {
        let v = ReachabilityValidator::default();
        // 120 degrees around the base
        let x = 200.0 * 120f64.to_radians().cos();
        let y = 200.0 * 120f64.to_radians().sin();

        assert_eq!(
            v.evaluate(ControlMode::Arm, x, y, 0.0, 0.0),
            Reachability::Unreachable(Rejection::HorizontalAngle { angle: 120.0 })
        );
    }

    #[test]
    fn test_custom_rail_travel() {
        let rail = RailConfig {
            min_travel: 100.0,
            max_travel: 400.0,
            ..RailConfig::default()
        };
        let v = ReachabilityValidator::new(ArmEnvelopeConfig::default(), &rail);

        assert!(!v.is_reachable(ControlMode::Rail, 0.0, 0.0, 0.0, 50.0));
        assert!(v.is_reachable(ControlMode::Rail, 0.0, 0.0, 0.0, 400.0));
    }

    proptest! {
        #[test]
        fn prop_evaluation_deterministic(
            x in -400.0f64..400.0, y in -400.0f64..400.0, z in -200.0f64..200.0
        ) {
            let v = ReachabilityValidator::default();
            prop_assert_eq!(
                v.evaluate(ControlMode::Arm, x, y, z, 0.0),
                v.evaluate(ControlMode::Arm, x, y, z, 0.0)
            );
        }

        #[test]
        fn prop_reachable_points_respect_limits(
            x in -400.0f64..400.0, y in -400.0f64..400.0, z in -200.0f64..200.0
        ) {
            let v = ReachabilityValidator::default();
            if v.is_reachable(ControlMode::Arm, x, y, z, 0.0) {
                let polar = v.envelope().decompose(x, y, z);
                prop_assert!(polar.horizontal_angle.abs() <= 90.0);
                prop_assert!(polar.vertical_angle >= -30.0 && polar.vertical_angle <= 41.67);
                // Widest bound anywhere is the 327 boundary less the margin
                prop_assert!(polar.distance <= 317.0);
            }
        }
    }
}
