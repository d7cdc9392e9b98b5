//! Capture module
//!
//! Camera frames and the landmark model are supplied by the host through
//! [`FrameSource`] and [`LandmarkDetector`]. The pipeline runs the detector on
//! a worker thread and hands completed detections to the capture tick at a
//! throttled rate.

pub mod frame;
pub mod inference;
pub mod pipeline;

pub use frame::{CaptureFrame, FrameSource};
pub use inference::{Detection, InferenceWorker, LandmarkDetector};
pub use pipeline::{CapturePipeline, PipelineState, TickThrottle};
