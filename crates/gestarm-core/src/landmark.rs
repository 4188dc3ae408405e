//! Hand landmarks - the per-frame output of the detection model
//!
//! The detection model is an opaque oracle. It hands us one `LandmarkFrame`
//! per detected hand per camera frame, with normalized image coordinates
//! (x, y in [0, 1], smaller y is higher on screen) and a depth proxy in z.

use serde::{Deserialize, Serialize};

use crate::{distance2d, GestureError};

/// Number of points in a well-formed hand frame
pub const LANDMARK_COUNT: usize = 21;

/// Landmark identifier in the standard 21-point hand topology
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandLandmark {
    Wrist = 0,

    ThumbCmc = 1,
    ThumbMcp = 2,
    ThumbIp = 3,
    ThumbTip = 4,

    IndexMcp = 5,
    IndexPip = 6,
    IndexDip = 7,
    IndexTip = 8,

    MiddleMcp = 9,
    MiddlePip = 10,
    MiddleDip = 11,
    MiddleTip = 12,

    RingMcp = 13,
    RingPip = 14,
    RingDip = 15,
    RingTip = 16,

    PinkyMcp = 17,
    PinkyPip = 18,
    PinkyDip = 19,
    PinkyTip = 20,
}

impl HandLandmark {
    /// All landmarks in index order
    pub fn all() -> &'static [HandLandmark] {
        &[
            HandLandmark::Wrist,
            HandLandmark::ThumbCmc,
            HandLandmark::ThumbMcp,
            HandLandmark::ThumbIp,
            HandLandmark::ThumbTip,
            HandLandmark::IndexMcp,
            HandLandmark::IndexPip,
            HandLandmark::IndexDip,
            HandLandmark::IndexTip,
            HandLandmark::MiddleMcp,
            HandLandmark::MiddlePip,
            HandLandmark::MiddleDip,
            HandLandmark::MiddleTip,
            HandLandmark::RingMcp,
            HandLandmark::RingPip,
            HandLandmark::RingDip,
            HandLandmark::RingTip,
            HandLandmark::PinkyMcp,
            HandLandmark::PinkyPip,
            HandLandmark::PinkyDip,
            HandLandmark::PinkyTip,
        ]
    }

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// The four non-thumb fingers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Finger {
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    pub const ALL: [Finger; 4] = [Finger::Index, Finger::Middle, Finger::Ring, Finger::Pinky];

    /// Knuckle (MCP joint) of this finger
    pub fn knuckle(self) -> HandLandmark {
        match self {
            Finger::Index => HandLandmark::IndexMcp,
            Finger::Middle => HandLandmark::MiddleMcp,
            Finger::Ring => HandLandmark::RingMcp,
            Finger::Pinky => HandLandmark::PinkyMcp,
        }
    }

    /// Fingertip of this finger
    pub fn tip(self) -> HandLandmark {
        match self {
            Finger::Index => HandLandmark::IndexTip,
            Finger::Middle => HandLandmark::MiddleTip,
            Finger::Ring => HandLandmark::RingTip,
            Finger::Pinky => HandLandmark::PinkyTip,
        }
    }
}

/// A single detected keypoint
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
    /// Depth proxy reported by the model
    pub z: f64,
}

impl Landmark {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Image-plane distance to another landmark (depth ignored)
    pub fn planar_distance(&self, other: &Landmark) -> f64 {
        distance2d(self.x, self.y, other.x, other.y)
    }
}

/// Landmarks of one hand for one camera frame
///
/// Construction does not validate the point count: the model output is
/// accepted as-is and checked by [`LandmarkFrame::validate`] at the point of
/// use, so malformed frames surface as `InvalidInput` instead of being
/// padded or truncated.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LandmarkFrame {
    points: Vec<Landmark>,
}

impl LandmarkFrame {
    pub fn new(points: Vec<Landmark>) -> Self {
        Self { points }
    }

    /// Build from `[x, y, z]` triples as most detection runtimes emit them
    pub fn from_triples(triples: &[[f64; 3]]) -> Self {
        Self {
            points: triples
                .iter()
                .map(|[x, y, z]| Landmark::new(*x, *y, *z))
                .collect(),
        }
    }

    /// Fail fast unless the frame holds exactly 21 points
    pub fn validate(&self) -> Result<(), GestureError> {
        if self.points.len() != LANDMARK_COUNT {
            return Err(GestureError::InvalidInput {
                expected: LANDMARK_COUNT,
                actual: self.points.len(),
            });
        }
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Landmark by name, `None` if the frame is too short
    pub fn get(&self, landmark: HandLandmark) -> Option<&Landmark> {
        self.points.get(landmark.index())
    }

    /// Landmark by name on a frame already checked with [`validate`](Self::validate)
    ///
    /// Panics on a short frame.
    pub fn point(&self, landmark: HandLandmark) -> &Landmark {
        &self.points[landmark.index()]
    }

    pub fn points(&self) -> &[Landmark] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
