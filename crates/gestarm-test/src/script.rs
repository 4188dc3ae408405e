//! Gesture scripts
//!
//! A script is a frame-by-frame storyboard of what the camera sees: which
//! hand pose, where the palm is, how close the hand is, and gaps with no
//! hand at all.

use gestarm_control::ReplaySource;
use gestarm_core::{GestureSymbol, HandLandmark, LandmarkFrame, Vec3, WorkspaceMappingConfig};
use gestarm_gesture::HandPose;

/// Builder for a landmark frame sequence
#[derive(Debug, Clone)]
pub struct GestureScript {
    frames: Vec<Option<LandmarkFrame>>,
    mapping: WorkspaceMappingConfig,
    palm: (f64, f64),
    scale: f64,
}

impl Default for GestureScript {
    fn default() -> Self {
        Self::new()
    }
}

impl GestureScript {
    /// Empty script with the palm centered at zero depth
    pub fn new() -> Self {
        Self::with_mapping(WorkspaceMappingConfig::default())
    }

    /// Script whose `at_arm` / `at_depth` invert a custom mapping
    pub fn with_mapping(mapping: WorkspaceMappingConfig) -> Self {
        let mut script = Self {
            frames: Vec::new(),
            mapping,
            palm: (0.5, 0.5),
            scale: 1.0,
        };
        script.set_depth(0.0);
        script
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frames(&self) -> &[Option<LandmarkFrame>] {
        &self.frames
    }

    /// Place later poses with the palm centroid at `(x, y)` in image space
    pub fn at_palm(mut self, x: f64, y: f64) -> Self {
        self.palm = (x, y);
        self
    }

    /// Size later poses so the estimated depth is `depth` mm
    pub fn at_depth(mut self, depth: f64) -> Self {
        self.set_depth(depth);
        self
    }

    /// Place later poses so they map onto `target` in the arm frame
    pub fn at_arm(self, target: Vec3) -> Self {
        let m = &self.mapping;
        let palm_x = (target.y - m.lateral_offset) / m.lateral_span;
        let palm_y = (target.x - m.forward_offset) / m.forward_span;
        self.at_palm(palm_x, palm_y).at_depth(target.z)
    }

    /// `frames` frames of the canonical pose for `symbol`
    pub fn hold(self, symbol: GestureSymbol, frames: usize) -> Self {
        self.pose(HandPose::for_gesture(symbol), frames)
    }

    /// `frames` frames of a custom pose at the current palm and depth
    pub fn pose(mut self, pose: HandPose, frames: usize) -> Self {
        let frame = self.place(pose);
        self.frames.extend(std::iter::repeat(Some(frame)).take(frames));
        self
    }

    pub fn no_hand(mut self, frames: usize) -> Self {
        self.frames.extend(std::iter::repeat(None).take(frames));
        self
    }

    /// Move the palm linearly to `(x, y)` over `frames` frames, holding
    /// `symbol`. The last frame lands on the destination.
    pub fn sweep(mut self, symbol: GestureSymbol, to: (f64, f64), frames: usize) -> Self {
        let from = self.palm;
        for i in 1..=frames {
            let t = i as f64 / frames as f64;
            self.palm = (from.0 + (to.0 - from.0) * t, from.1 + (to.1 - from.1) * t);
            let frame = self.place(HandPose::for_gesture(symbol));
            self.frames.push(Some(frame));
        }
        self
    }

    /// Append a raw frame, valid or not
    pub fn raw(mut self, frame: Option<LandmarkFrame>) -> Self {
        self.frames.push(frame);
        self
    }

    pub fn into_source(self) -> ReplaySource {
        ReplaySource::new(self.frames)
    }

    fn place(&self, pose: HandPose) -> LandmarkFrame {
        pose.scaled(self.scale)
            .with_palm_at(self.palm.0, self.palm.1)
            .build()
    }

    fn set_depth(&mut self, depth: f64) {
        let m = &self.mapping;
        let span = m.depth_near_span
            + (depth + m.depth_range / 2.0) / m.depth_range * (m.depth_far_span - m.depth_near_span);
        self.scale = span / unit_hand_span();
    }
}

/// Wrist to middle-knuckle distance of an unscaled synthetic hand
fn unit_hand_span() -> f64 {
    let frame = HandPose::fist().build();
    frame
        .point(HandLandmark::Wrist)
        .planar_distance(frame.point(HandLandmark::MiddleMcp))
}

#[cfg(test)]
mod tests {
    use super::*;
    use gestarm_control::LandmarkSource;
    use gestarm_core::Landmark;
    use gestarm_gesture::GestureClassifier;

    #[test]
    fn test_script_layout() {
        let script = GestureScript::new()
            .hold(GestureSymbol::ToggleTracking, 3)
            .no_hand(2)
            .hold(GestureSymbol::OpenGripper, 1);

        assert_eq!(script.len(), 6);
        assert!(script.frames()[3].is_none());

        let classifier = GestureClassifier::default();
        let mut source = script.into_source();
        let first = source.next_frame().unwrap();
        assert_eq!(classifier.classify(&first).unwrap(), GestureSymbol::ToggleTracking);
    }

    #[test]
    fn test_sweep_ends_at_destination() {
        let script = GestureScript::new()
            .at_palm(0.2, 0.5)
            .sweep(GestureSymbol::None, (0.8, 0.5), 6);

        assert_eq!(script.len(), 6);
        let last = script.frames()[5].as_ref().unwrap();
        let palm_x = [HandLandmark::Wrist, HandLandmark::MiddleMcp, HandLandmark::RingMcp]
            .iter()
            .map(|&l| last.point(l).x)
            .sum::<f64>()
            / 3.0;
        assert!((palm_x - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_raw_frames_pass_through() {
        let short = LandmarkFrame::new(vec![Landmark::default(); 5]);
        let script = GestureScript::new().raw(Some(short.clone()));
        assert_eq!(script.frames()[0], Some(short));
    }
}
