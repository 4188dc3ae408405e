//! Per-finger open/closed tests

use gestarm_core::{Finger, HandLandmark, LandmarkFrame};

/// Extension of one finger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FingerState {
    Open,
    Closed,
}

/// Landmark the thumb tip is measured against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThumbReference {
    IndexTip,
    MiddleKnuckle,
    PinkyTip,
}

impl ThumbReference {
    pub fn landmark(self) -> HandLandmark {
        match self {
            ThumbReference::IndexTip => HandLandmark::IndexTip,
            ThumbReference::MiddleKnuckle => HandLandmark::MiddleMcp,
            ThumbReference::PinkyTip => HandLandmark::PinkyTip,
        }
    }
}

/// Thumb position relative to its reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThumbPose {
    /// Tip closer than the threshold (closed)
    Adducted,
    /// Tip farther than the threshold (open)
    Abducted,
}

/// Thumb condition of a gesture pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ThumbRule {
    pub reference: ThumbReference,
    pub pose: ThumbPose,
}

impl ThumbRule {
    pub const fn adducted(reference: ThumbReference) -> Self {
        Self {
            reference,
            pose: ThumbPose::Adducted,
        }
    }

    pub const fn abducted(reference: ThumbReference) -> Self {
        Self {
            reference,
            pose: ThumbPose::Abducted,
        }
    }

    /// Frame must already be validated.
    /// A distance exactly equal to the threshold satisfies neither pose.
    pub(crate) fn matches(&self, frame: &LandmarkFrame, threshold: f64) -> bool {
        let tip = frame.point(HandLandmark::ThumbTip);
        let reference = frame.point(self.reference.landmark());
        let distance = tip.planar_distance(reference);

        match self.pose {
            ThumbPose::Adducted => distance < threshold,
            ThumbPose::Abducted => distance > threshold,
        }
    }
}

/// Open iff the fingertip sits above its knuckle by more than `threshold`.
///
/// Image y grows downward, so "above" means `knuckle.y - tip.y > threshold`.
/// Frame must already be validated.
pub(crate) fn finger_state(frame: &LandmarkFrame, finger: Finger, threshold: f64) -> FingerState {
    let tip = frame.point(finger.tip());
    let knuckle = frame.point(finger.knuckle());

    if knuckle.y - tip.y > threshold {
        FingerState::Open
    } else {
        FingerState::Closed
    }
}

/// Snapshot of the four non-thumb fingers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FingerStates {
    pub index: FingerState,
    pub middle: FingerState,
    pub ring: FingerState,
    pub pinky: FingerState,
}

impl FingerStates {
    pub(crate) fn measure(frame: &LandmarkFrame, threshold: f64) -> Self {
        Self {
            index: finger_state(frame, Finger::Index, threshold),
            middle: finger_state(frame, Finger::Middle, threshold),
            ring: finger_state(frame, Finger::Ring, threshold),
            pinky: finger_state(frame, Finger::Pinky, threshold),
        }
    }

    pub fn get(&self, finger: Finger) -> FingerState {
        match finger {
            Finger::Index => self.index,
            Finger::Middle => self.middle,
            Finger::Ring => self.ring,
            Finger::Pinky => self.pinky,
        }
    }

    pub fn open_count(&self) -> usize {
        Finger::ALL
            .iter()
            .filter(|f| self.get(**f) == FingerState::Open)
            .count()
    }
}
