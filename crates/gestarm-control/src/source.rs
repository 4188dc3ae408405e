//! Landmark source interface

use std::collections::VecDeque;

use gestarm_core::LandmarkFrame;

/// Producer of one landmark frame per camera frame.
///
/// `next_frame` returns `None` when no hand was detected this frame; that is
/// a normal frame, not the end of the stream. Finite sources report the end
/// through `is_exhausted`.
pub trait LandmarkSource {
    fn next_frame(&mut self) -> Option<LandmarkFrame>;

    fn is_exhausted(&self) -> bool {
        false
    }
}

impl<S: LandmarkSource + ?Sized> LandmarkSource for Box<S> {
    fn next_frame(&mut self) -> Option<LandmarkFrame> {
        (**self).next_frame()
    }

    fn is_exhausted(&self) -> bool {
        (**self).is_exhausted()
    }
}

/// Finite, pre-recorded sequence of frames
#[derive(Debug, Clone, Default)]
pub struct ReplaySource {
    frames: VecDeque<Option<LandmarkFrame>>,
}

impl ReplaySource {
    pub fn new(frames: impl IntoIterator<Item = Option<LandmarkFrame>>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
        }
    }

    pub fn push(&mut self, frame: Option<LandmarkFrame>) {
        self.frames.push_back(frame);
    }

    /// Append the same frame `count` times
    pub fn repeat(&mut self, frame: Option<LandmarkFrame>, count: usize) {
        for _ in 0..count {
            self.frames.push_back(frame.clone());
        }
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl LandmarkSource for ReplaySource {
    fn next_frame(&mut self) -> Option<LandmarkFrame> {
        self.frames.pop_front().flatten()
    }

    fn is_exhausted(&self) -> bool {
        self.frames.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gestarm_core::Landmark;

    #[test]
    fn test_replay_order_and_gaps() {
        let frame = LandmarkFrame::new(vec![Landmark::default(); 21]);
        let mut source = ReplaySource::new([Some(frame.clone()), None]);
        source.repeat(Some(frame.clone()), 2);

        assert_eq!(source.remaining(), 4);
        assert_eq!(source.next_frame(), Some(frame.clone()));
        assert_eq!(source.next_frame(), None);
        assert!(!source.is_exhausted());
        assert!(source.next_frame().is_some());
        assert!(source.next_frame().is_some());
        assert!(source.is_exhausted());
        assert_eq!(source.next_frame(), None);
    }
}
