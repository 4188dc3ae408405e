//! Synthetic hand poses
//!
//! Builds well-formed 21-point frames for a chosen finger configuration.
//! Used by simulators, replay tools and tests in place of a live detector.

use gestarm_core::{Finger, GestureSymbol, HandLandmark, Landmark, LandmarkFrame, LANDMARK_COUNT};

use crate::{FingerState, ThumbReference};

const WRIST: (f64, f64) = (0.5, 0.9);
const KNUCKLE_Y: f64 = 0.5;
const OPEN_TIP_Y: f64 = 0.25;
const CLOSED_TIP_Y: f64 = 0.55;
const THUMB_SPREAD: (f64, f64) = (0.15, 0.55);
const THUMB_TOUCH_OFFSET: f64 = 0.02;

fn knuckle_x(finger: Finger) -> f64 {
    match finger {
        Finger::Index => 0.44,
        Finger::Middle => 0.5,
        Finger::Ring => 0.56,
        Finger::Pinky => 0.62,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum ThumbPlacement {
    Spread,
    Touching(ThumbReference),
    At(f64, f64),
}

/// Builder for a synthetic hand frame
///
/// Coordinates are laid out around a wrist at (0.5, 0.9) with knuckles 0.4
/// above it, then scaled about the wrist and translated.
#[derive(Debug, Clone, PartialEq)]
pub struct HandPose {
    fingers: [FingerState; 4],
    thumb: ThumbPlacement,
    scale: f64,
    offset: (f64, f64),
}

impl Default for HandPose {
    fn default() -> Self {
        Self::fist()
    }
}

impl HandPose {
    /// All fingers curled, thumb spread
    pub fn fist() -> Self {
        Self {
            fingers: [FingerState::Closed; 4],
            thumb: ThumbPlacement::Spread,
            scale: 1.0,
            offset: (0.0, 0.0),
        }
    }

    /// Canonical pose for a gesture; `None` yields a two-finger "peace" sign
    /// that matches no pattern
    pub fn for_gesture(symbol: GestureSymbol) -> Self {
        use FingerState::{Closed, Open};

        let (fingers, thumb) = match symbol {
            GestureSymbol::ToggleTracking => ([Closed; 4], ThumbPlacement::Spread),
            GestureSymbol::SelectRailMode => (
                [Open, Closed, Closed, Closed],
                ThumbPlacement::Touching(ThumbReference::MiddleKnuckle),
            ),
            GestureSymbol::SelectArmMode => (
                [Open, Open, Open, Closed],
                ThumbPlacement::Touching(ThumbReference::PinkyTip),
            ),
            GestureSymbol::CloseGripper => (
                [Closed; 4],
                ThumbPlacement::Touching(ThumbReference::IndexTip),
            ),
            GestureSymbol::OpenGripper => ([Open; 4], ThumbPlacement::Spread),
            GestureSymbol::None => ([Open, Open, Closed, Closed], ThumbPlacement::Spread),
        };

        Self {
            fingers,
            thumb,
            ..Self::fist()
        }
    }

    pub fn with_finger(mut self, finger: Finger, state: FingerState) -> Self {
        self.fingers[finger_slot(finger)] = state;
        self
    }

    pub fn with_thumb_spread(mut self) -> Self {
        self.thumb = ThumbPlacement::Spread;
        self
    }

    pub fn with_thumb_touching(mut self, reference: ThumbReference) -> Self {
        self.thumb = ThumbPlacement::Touching(reference);
        self
    }

    /// Thumb tip at an unscaled layout position
    pub fn with_thumb_at(mut self, x: f64, y: f64) -> Self {
        self.thumb = ThumbPlacement::At(x, y);
        self
    }

    /// Scale about the wrist; changes the apparent depth
    pub fn scaled(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// Shift the whole hand in normalized image space
    pub fn translated(mut self, dx: f64, dy: f64) -> Self {
        self.offset = (self.offset.0 + dx, self.offset.1 + dy);
        self
    }

    /// Shift the hand so its palm centroid (wrist, middle and ring
    /// knuckles) lands on `(x, y)`
    pub fn with_palm_at(mut self, x: f64, y: f64) -> Self {
        let layout_palm_x = (WRIST.0 + knuckle_x(Finger::Middle) + knuckle_x(Finger::Ring)) / 3.0;
        let layout_palm_y = (WRIST.1 + 2.0 * KNUCKLE_Y) / 3.0;
        let (px, py) = self.transform(layout_palm_x, layout_palm_y);
        self.offset = (self.offset.0 + x - px, self.offset.1 + y - py);
        self
    }

    pub fn build(&self) -> LandmarkFrame {
        let mut layout = [(0.0, 0.0); LANDMARK_COUNT];
        layout[HandLandmark::Wrist.index()] = WRIST;

        for finger in Finger::ALL {
            let x = knuckle_x(finger);
            let tip_y = match self.fingers[finger_slot(finger)] {
                FingerState::Open => OPEN_TIP_Y,
                FingerState::Closed => CLOSED_TIP_Y,
            };
            let base = finger.knuckle().index();
            // MCP, PIP, DIP, TIP
            for step in 0..4 {
                let t = step as f64 / 3.0;
                layout[base + step] = (x, KNUCKLE_Y + (tip_y - KNUCKLE_Y) * t);
            }
        }

        let thumb_tip = match self.thumb {
            ThumbPlacement::Spread => THUMB_SPREAD,
            ThumbPlacement::At(x, y) => (x, y),
            ThumbPlacement::Touching(reference) => {
                let (rx, ry) = layout[reference.landmark().index()];
                (rx + THUMB_TOUCH_OFFSET, ry + THUMB_TOUCH_OFFSET)
            }
        };
        let thumb_base = HandLandmark::ThumbCmc.index();
        for step in 0..4 {
            let t = (step + 1) as f64 / 4.0;
            layout[thumb_base + step] = (
                WRIST.0 + (thumb_tip.0 - WRIST.0) * t,
                WRIST.1 + (thumb_tip.1 - WRIST.1) * t,
            );
        }

        let points = layout
            .iter()
            .map(|(x, y)| {
                let (tx, ty) = self.transform(*x, *y);
                Landmark::new(tx, ty, 0.0)
            })
            .collect();

        LandmarkFrame::new(points)
    }

    fn transform(&self, x: f64, y: f64) -> (f64, f64) {
        (
            WRIST.0 + (x - WRIST.0) * self.scale + self.offset.0,
            WRIST.1 + (y - WRIST.1) * self.scale + self.offset.1,
        )
    }
}

fn finger_slot(finger: Finger) -> usize {
    match finger {
        Finger::Index => 0,
        Finger::Middle => 1,
        Finger::Ring => 2,
        Finger::Pinky => 3,
    }
}
