//! Hand tracking module
//!
//! Classifies per-frame hand landmarks into discrete gestures and stabilizes
//! the gesture and pointer over time.

pub mod classifier;
pub mod landmarks;
pub mod stabilizer;
pub mod tracker;

pub use classifier::{classify, FoldState, Gesture};
pub use landmarks::{Finger, Landmark, LandmarkSet, LANDMARK_COUNT};
pub use stabilizer::{RawHandFrame, SignalStabilizer, StabilizedHandState};
pub use tracker::HandTracker;
