//! Gesture patterns
//!
//! A pattern is a conjunction of per-finger states and one thumb rule.
//! Patterns are evaluated in table order and the first match wins, so the
//! order of the table is the tie-breaking priority.

use gestarm_core::{Finger, GestureSymbol, LandmarkFrame};

use crate::{FingerState, FingerStates, ThumbReference, ThumbRule};

use FingerState::{Closed, Open};

/// One entry of the classification table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GesturePattern {
    pub symbol: GestureSymbol,
    /// Required state for index, middle, ring, pinky. `None` = don't care.
    pub fingers: [Option<FingerState>; 4],
    /// `None` = don't care
    pub thumb: Option<ThumbRule>,
}

impl GesturePattern {
    pub const fn new(
        symbol: GestureSymbol,
        fingers: [FingerState; 4],
        thumb: ThumbRule,
    ) -> Self {
        Self {
            symbol,
            fingers: [
                Some(fingers[0]),
                Some(fingers[1]),
                Some(fingers[2]),
                Some(fingers[3]),
            ],
            thumb: Some(thumb),
        }
    }

    /// Does the frame satisfy every constraint of this pattern?
    pub(crate) fn matches(&self, frame: &LandmarkFrame, states: &FingerStates, threshold: f64) -> bool {
        let fingers_match = Finger::ALL
            .iter()
            .zip(self.fingers.iter())
            .all(|(finger, required)| match required {
                Some(state) => states.get(*finger) == *state,
                None => true,
            });

        fingers_match
            && self
                .thumb
                .map_or(true, |rule| rule.matches(frame, threshold))
    }
}

/// The built-in control vocabulary, highest priority first
pub const DEFAULT_PATTERNS: [GesturePattern; 5] = [
    // Fist with the thumb out
    GesturePattern::new(
        GestureSymbol::ToggleTracking,
        [Closed, Closed, Closed, Closed],
        ThumbRule::abducted(ThumbReference::IndexTip),
    ),
    // Pointing, thumb tucked onto the middle knuckle
    GesturePattern::new(
        GestureSymbol::SelectRailMode,
        [Open, Closed, Closed, Closed],
        ThumbRule::adducted(ThumbReference::MiddleKnuckle),
    ),
    // Three fingers, thumb holding the pinky down
    GesturePattern::new(
        GestureSymbol::SelectArmMode,
        [Open, Open, Open, Closed],
        ThumbRule::adducted(ThumbReference::PinkyTip),
    ),
    // Closed fist
    GesturePattern::new(
        GestureSymbol::CloseGripper,
        [Closed, Closed, Closed, Closed],
        ThumbRule::adducted(ThumbReference::IndexTip),
    ),
    // Open palm
    GesturePattern::new(
        GestureSymbol::OpenGripper,
        [Open, Open, Open, Open],
        ThumbRule::abducted(ThumbReference::IndexTip),
    ),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_priority_order() {
        let order: Vec<GestureSymbol> = DEFAULT_PATTERNS.iter().map(|p| p.symbol).collect();
        assert_eq!(
            order,
            vec![
                GestureSymbol::ToggleTracking,
                GestureSymbol::SelectRailMode,
                GestureSymbol::SelectArmMode,
                GestureSymbol::CloseGripper,
                GestureSymbol::OpenGripper,
            ]
        );
    }

    #[test]
    fn test_default_patterns_fully_constrained() {
        for pattern in DEFAULT_PATTERNS.iter() {
            assert!(pattern.fingers.iter().all(Option::is_some));
            assert!(pattern.thumb.is_some());
            assert!(!pattern.symbol.is_none());
        }
    }
}
