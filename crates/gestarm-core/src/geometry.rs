//! Geometry helpers shared by the classifier, validator and predictor

use std::ops::{Add, Div, Mul, Sub};

use serde::{Deserialize, Serialize};

/// 3D vector in millimeters (arm frame) or normalized units (image frame)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Euclidean length
    pub fn length(&self) -> f64 {
        distance3d(Vec3::ZERO, *self)
    }

    /// Euclidean distance to another point
    pub fn distance(&self, other: &Vec3) -> f64 {
        distance3d(*self, *other)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl Add for Vec3 {
    type Output = Vec3;

    #[inline]
    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;

    #[inline]
    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f64> for Vec3 {
    type Output = Vec3;

    #[inline]
    fn mul(self, rhs: f64) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Div<f64> for Vec3 {
    type Output = Vec3;

    #[inline]
    fn div(self, rhs: f64) -> Vec3 {
        Vec3::new(self.x / rhs, self.y / rhs, self.z / rhs)
    }
}

/// `sqrt(a² + b²)`
#[inline]
pub fn hypot(a: f64, b: f64) -> f64 {
    a.hypot(b)
}

/// Planar distance between (x1, y1) and (x2, y2)
#[inline]
pub fn distance2d(x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    hypot(x2 - x1, y2 - y1)
}

/// Spatial distance between two points
#[inline]
pub fn distance3d(a: Vec3, b: Vec3) -> f64 {
    hypot(hypot(b.x - a.x, b.y - a.y), b.z - a.z)
}

/// `atan2(y, x)` in degrees
#[inline]
pub fn atan2_degrees(y: f64, x: f64) -> f64 {
    y.atan2(x).to_degrees()
}

/// Round to `places` decimal places.
///
/// Works on the exact decimal expansion of `value`, ties to even: 1.115 is
/// stored as 1.11499... and rounds to 1.11. Scaling by 10^places first
/// would give 1.12. Negative `places` is treated as zero.
pub fn round_to(value: f64, places: i32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    // Float formatting with a precision is decimal-exact
    format!("{:.*}", places.max(0) as usize, value)
        .parse()
        .unwrap_or(value)
}
