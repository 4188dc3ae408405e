//! Landmark frame → arm-frame hand position

use gestarm_core::{
    GestureError, HandLandmark, LandmarkFrame, RailConfig, Vec3, WorkspaceMappingConfig,
};

/// Where the hand is, in every frame the pipeline needs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandPosition {
    /// Palm in the arm frame (mm)
    pub arm: Vec3,
    /// Carriage offset for rail mode (mm of travel)
    pub rail_lateral: f64,
    /// Palm centroid in normalized image coordinates
    pub palm: (f64, f64),
}

impl HandPosition {
    /// A position given directly in the arm frame, for hosts that do their
    /// own landmark processing
    pub fn from_arm(arm: Vec3, rail_lateral: f64) -> Self {
        Self {
            arm,
            rail_lateral,
            palm: (f64::NAN, f64::NAN),
        }
    }
}

/// Palm centroid: mean of wrist, middle knuckle and ring knuckle.
/// Frame must already be validated.
pub(crate) fn palm_centroid(frame: &LandmarkFrame) -> (f64, f64) {
    let anchors = [
        frame.point(HandLandmark::Wrist),
        frame.point(HandLandmark::MiddleMcp),
        frame.point(HandLandmark::RingMcp),
    ];
    let x = anchors.iter().map(|p| p.x).sum::<f64>() / 3.0;
    let y = anchors.iter().map(|p| p.y).sum::<f64>() / 3.0;
    (x, y)
}

/// Stateless mapping from image space into the arm and rail frames
#[derive(Debug, Clone)]
pub struct WorkspaceMapper {
    config: WorkspaceMappingConfig,
    rail_min: f64,
    rail_max: f64,
}

impl WorkspaceMapper {
    pub fn new(config: WorkspaceMappingConfig, rail: &RailConfig) -> Self {
        Self {
            config,
            rail_min: rail.min_travel,
            rail_max: rail.max_travel,
        }
    }

    pub fn config(&self) -> &WorkspaceMappingConfig {
        &self.config
    }

    /// Depth from apparent hand size.
    ///
    /// A larger wrist to middle-knuckle span means the hand is nearer the
    /// camera. The span is clamped to the calibrated range and mapped
    /// linearly onto `[-range/2, range/2]` mm.
    pub(crate) fn estimate_depth(&self, frame: &LandmarkFrame) -> f64 {
        let c = &self.config;
        let span = frame
            .point(HandLandmark::Wrist)
            .planar_distance(frame.point(HandLandmark::MiddleMcp))
            .clamp(c.depth_near_span, c.depth_far_span);

        (span - c.depth_near_span) / (c.depth_far_span - c.depth_near_span) * c.depth_range
            - c.depth_range / 2.0
    }

    /// Arm frame x is forward (image y), y is lateral (image x)
    pub fn palm_to_arm(&self, palm_x: f64, palm_y: f64, depth: f64) -> Vec3 {
        let c = &self.config;
        Vec3::new(
            palm_y * c.forward_span + c.forward_offset,
            palm_x * c.lateral_span + c.lateral_offset,
            depth,
        )
    }

    /// Normalized horizontal palm position scaled onto the rail travel
    pub fn palm_to_rail(&self, palm_x: f64) -> f64 {
        self.rail_min + palm_x * (self.rail_max - self.rail_min)
    }

    pub fn map(&self, frame: &LandmarkFrame) -> Result<HandPosition, GestureError> {
        frame.validate()?;

        let palm = palm_centroid(frame);
        let depth = self.estimate_depth(frame);

        Ok(HandPosition {
            arm: self.palm_to_arm(palm.0, palm.1, depth),
            rail_lateral: self.palm_to_rail(palm.0),
            palm,
        })
    }
}

impl Default for WorkspaceMapper {
    fn default() -> Self {
        Self::new(WorkspaceMappingConfig::default(), &RailConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gestarm_core::Landmark;
    use gestarm_gesture::HandPose;

    #[test]
    fn test_palm_centroid() {
        let frame = HandPose::fist().with_palm_at(0.25, 0.75).build();
        let (x, y) = palm_centroid(&frame);
        assert!((x - 0.25).abs() < 1e-9);
        assert!((y - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_depth_from_hand_span() {
        let mapper = WorkspaceMapper::default();

        // Synthetic hand spans 0.4 at scale 1: middle of the range
        assert!(mapper.estimate_depth(&HandPose::fist().build()).abs() < 1e-9);
        assert!((mapper.estimate_depth(&HandPose::fist().scaled(1.25).build()) - 90.0).abs() < 1e-9);
        assert!((mapper.estimate_depth(&HandPose::fist().scaled(0.75).build()) + 90.0).abs() < 1e-9);
        // Clamped beyond calibration
        assert!((mapper.estimate_depth(&HandPose::fist().scaled(3.0).build()) - 90.0).abs() < 1e-9);
        assert!((mapper.estimate_depth(&HandPose::fist().scaled(0.1).build()) + 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_axis_mapping() {
        let mapper = WorkspaceMapper::default();

        let center = mapper.palm_to_arm(0.5, 0.5, 0.0);
        assert!((center.x - 242.0).abs() < 1e-9);
        assert!(center.y.abs() < 1e-9);

        let left = mapper.palm_to_arm(0.0, 0.0, 10.0);
        assert_eq!(left, Vec3::new(-16.0, -380.0, 10.0));
    }

    #[test]
    fn test_rail_scaling() {
        let mapper = WorkspaceMapper::default();
        assert_eq!(mapper.palm_to_rail(0.0), 0.0);
        assert_eq!(mapper.palm_to_rail(0.5), 500.0);
        assert_eq!(mapper.palm_to_rail(1.0), 1000.0);
        // Hands partly off-screen map past the rail ends
        assert!(mapper.palm_to_rail(1.01) > 1000.0);
    }

    #[test]
    fn test_map_frame() {
        let mapper = WorkspaceMapper::default();
        let frame = HandPose::fist().with_palm_at(0.5, (200.0 + 16.0) / 516.0).build();

        let position = mapper.map(&frame).unwrap();
        assert!(position.arm.distance(&Vec3::new(200.0, 0.0, 0.0)) < 1e-6);
        assert!((position.rail_lateral - 500.0).abs() < 1e-9);
    }

    #[test]
    fn test_map_rejects_short_frame() {
        let mapper = WorkspaceMapper::default();
        let frame = LandmarkFrame::new(vec![Landmark::default(); 3]);
        assert!(mapper.map(&frame).is_err());
    }
}
