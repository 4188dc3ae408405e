//! Gesture classifier - one landmark frame in, one symbol out

use gestarm_core::{GestureConfig, GestureError, GestureSymbol, LandmarkFrame};
use tracing::trace;

use crate::{FingerStates, GesturePattern, DEFAULT_PATTERNS};

/// Stateless first-match classifier over a pattern table
#[derive(Debug, Clone)]
pub struct GestureClassifier {
    threshold: f64,
    patterns: Vec<GesturePattern>,
}

impl GestureClassifier {
    /// Classifier with the built-in control vocabulary
    pub fn new(config: &GestureConfig) -> Self {
        Self::with_patterns(config, DEFAULT_PATTERNS.to_vec())
    }

    /// Classifier with a custom table; earlier entries win ties
    pub fn with_patterns(config: &GestureConfig, patterns: Vec<GesturePattern>) -> Self {
        Self {
            threshold: config.threshold,
            patterns,
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn patterns(&self) -> &[GesturePattern] {
        &self.patterns
    }

    /// Classify one hand.
    ///
    /// Returns the symbol of the first matching pattern, or
    /// `GestureSymbol::None` when nothing matches. A frame without exactly
    /// 21 points is rejected with `InvalidInput`.
    pub fn classify(&self, frame: &LandmarkFrame) -> Result<GestureSymbol, GestureError> {
        let states = self.classify_fingers(frame)?;

        let symbol = self
            .patterns
            .iter()
            .find(|pattern| pattern.matches(frame, &states, self.threshold))
            .map_or(GestureSymbol::None, |pattern| pattern.symbol);

        trace!(?states, symbol = symbol.name(), "classified hand");
        Ok(symbol)
    }

    /// Open/closed state of the four non-thumb fingers
    pub fn classify_fingers(&self, frame: &LandmarkFrame) -> Result<FingerStates, GestureError> {
        frame.validate()?;
        Ok(FingerStates::measure(frame, self.threshold))
    }
}

impl Default for GestureClassifier {
    fn default() -> Self {
        Self::new(&GestureConfig::default())
    }
}
