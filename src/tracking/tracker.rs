//! Per-frame hand tracking
//!
//! Glues classification, pointer extraction and stabilization into the
//! single call the capture tick makes per completed inference.

use super::classifier::classify;
use super::landmarks::LandmarkSet;
use super::stabilizer::{RawHandFrame, SignalStabilizer, StabilizedHandState};
use crate::config::TrackingConfig;

/// Landmarks in, stabilized hand state out
#[derive(Debug, Clone)]
pub struct HandTracker {
    stabilizer: SignalStabilizer,
    /// Mirror the pointer horizontally
    mirror_x: bool,
}

impl Default for HandTracker {
    fn default() -> Self {
        Self::new(&TrackingConfig::default())
    }
}

impl HandTracker {
    pub fn new(config: &TrackingConfig) -> Self {
        Self {
            stabilizer: SignalStabilizer::new(config),
            mirror_x: config.mirror_x,
        }
    }

    /// Raw reading for one detection result
    pub fn raw_frame(&self, hand: Option<&LandmarkSet>) -> RawHandFrame {
        let Some(hand) = hand else {
            return RawHandFrame::absent();
        };
        let palm = hand.palm_center();
        let x = if self.mirror_x { 1.0 - palm.x } else { palm.x };
        RawHandFrame::present(classify(Some(hand)), x.clamp(0.0, 1.0), palm.y.clamp(0.0, 1.0))
    }

    /// Classify, extract the pointer and stabilize
    pub fn ingest(&mut self, hand: Option<&LandmarkSet>) -> StabilizedHandState {
        let raw = self.raw_frame(hand);
        self.stabilizer.update(raw)
    }

    /// Current stabilized state
    pub fn state(&self) -> StabilizedHandState {
        self.stabilizer.state()
    }

    pub fn reset(&mut self) {
        self.stabilizer.reset();
    }
}
