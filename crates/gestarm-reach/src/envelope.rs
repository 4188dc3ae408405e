//! Arm envelope - angle decomposition and distance bounds

use gestarm_core::{atan2_degrees, hypot, round_to, ArmEnvelopeConfig};

/// Polar view of a target relative to the arm base
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleDecomposition {
    /// Distance in the horizontal plane
    pub planar: f64,
    /// Straight-line distance from the base
    pub distance: f64,
    /// Base rotation, degrees, 0 straight ahead
    pub horizontal_angle: f64,
    /// Elevation above the horizontal plane, degrees
    pub vertical_angle: f64,
}

impl AngleDecomposition {
    /// Decompose `(x, y, z)`; distance and angles rounded to `places` decimals
    pub fn of(x: f64, y: f64, z: f64, places: i32) -> Self {
        let planar = hypot(x, y);
        Self {
            planar,
            distance: round_to(hypot(planar, z), places),
            horizontal_angle: round_to(atan2_degrees(y, x), places),
            vertical_angle: round_to(atan2_degrees(z, planar), places),
        }
    }
}

/// Allowed straight-line distance at one elevation, safety margin applied
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistanceBounds {
    pub minimum: f64,
    pub maximum: f64,
}

impl DistanceBounds {
    pub fn contains(&self, distance: f64) -> bool {
        self.minimum <= distance && distance <= self.maximum
    }
}

/// Why a target was refused
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rejection {
    NonFinite,
    HorizontalAngle { angle: f64 },
    VerticalAngle { angle: f64 },
    TooClose { distance: f64, minimum: f64 },
    TooFar { distance: f64, maximum: f64 },
    RailTravel { offset: f64 },
}

/// Outcome of a reachability query
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reachability {
    Reachable,
    Unreachable(Rejection),
}

impl Reachability {
    pub fn is_reachable(&self) -> bool {
        matches!(self, Reachability::Reachable)
    }

    pub fn rejection(&self) -> Option<Rejection> {
        match self {
            Reachability::Reachable => None,
            Reachability::Unreachable(rejection) => Some(*rejection),
        }
    }
}

/// Evaluate a polynomial, coefficients highest order first
fn horner(coefficients: &[f64], x: f64) -> f64 {
    coefficients.iter().fold(0.0, |acc, c| acc * x + c)
}

/// Reachable region of the rotary arm
#[derive(Debug, Clone)]
pub struct ArmEnvelope {
    config: ArmEnvelopeConfig,
}

impl ArmEnvelope {
    pub fn new(config: ArmEnvelopeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ArmEnvelopeConfig {
        &self.config
    }

    /// Closest reach at this elevation, before the safety margin
    pub fn minimum_distance(&self, vertical_angle: f64, z: f64) -> f64 {
        let c = &self.config;
        let raw = if vertical_angle > c.min_distance_pivot {
            horner(&c.min_distance_cubic, z)
        } else if vertical_angle < c.min_distance_pivot && z != 0.0 {
            horner(&c.min_distance_quadratic, z)
        } else {
            c.min_distance_boundary
        };
        round_to(raw, c.rounding_places)
    }

    /// Farthest reach at this elevation, before the safety margin
    pub fn maximum_distance(&self, vertical_angle: f64, z: f64) -> f64 {
        let c = &self.config;
        let raw = if vertical_angle > c.max_distance_pivot {
            c.max_reach()
        } else if vertical_angle < c.max_distance_pivot {
            horner(&c.max_distance_quadratic, z)
        } else {
            c.max_distance_boundary
        };
        round_to(raw, c.rounding_places)
    }

    pub fn bounds(&self, vertical_angle: f64, z: f64) -> DistanceBounds {
        DistanceBounds {
            minimum: self.minimum_distance(vertical_angle, z) - self.config.safety_margin,
            maximum: self.maximum_distance(vertical_angle, z) - self.config.safety_margin,
        }
    }

    pub fn decompose(&self, x: f64, y: f64, z: f64) -> AngleDecomposition {
        AngleDecomposition::of(x, y, z, self.config.rounding_places)
    }

    pub fn evaluate(&self, x: f64, y: f64, z: f64) -> Reachability {
        if !(x.is_finite() && y.is_finite() && z.is_finite()) {
            return Reachability::Unreachable(Rejection::NonFinite);
        }

        let polar = self.decompose(x, y, z);
        let (h_lo, h_hi) = self.config.horizontal_limits;
        let (v_lo, v_hi) = self.config.vertical_limits;

        if !(h_lo <= polar.horizontal_angle && polar.horizontal_angle <= h_hi) {
            return Reachability::Unreachable(Rejection::HorizontalAngle {
                angle: polar.horizontal_angle,
            });
        }
        if !(v_lo <= polar.vertical_angle && polar.vertical_angle <= v_hi) {
            return Reachability::Unreachable(Rejection::VerticalAngle {
                angle: polar.vertical_angle,
            });
        }

        let bounds = self.bounds(polar.vertical_angle, z);
        if polar.distance < bounds.minimum {
            return Reachability::Unreachable(Rejection::TooClose {
                distance: polar.distance,
                minimum: bounds.minimum,
            });
        }
        if polar.distance > bounds.maximum {
            return Reachability::Unreachable(Rejection::TooFar {
                distance: polar.distance,
                maximum: bounds.maximum,
            });
        }

        Reachability::Reachable
    }

    pub fn contains(&self, x: f64, y: f64, z: f64) -> bool {
        self.evaluate(x, y, z).is_reachable()
    }
}

impl Default for ArmEnvelope {
    fn default() -> Self {
        Self::new(ArmEnvelopeConfig::default())
    }
}
