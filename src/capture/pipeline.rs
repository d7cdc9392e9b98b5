//! Throttled capture pipeline
//!
//! Owns the frame source and the inference worker. `poll` is called from the
//! main loop as often as it likes; at most `target_fps` times per second it
//! forwards the newest frame to the worker and returns the newest completed
//! detection. Any acquisition failure leaves the pipeline `Unavailable`,
//! which looks to the rest of the system like a permanently absent hand.

use std::time::{Duration, Instant};

use super::frame::{CaptureFrame, FrameSource};
use super::inference::{Detection, InferenceWorker, LandmarkDetector};
use crate::config::CaptureConfig;

/// Elapsed-time gate for a periodic callback
#[derive(Debug, Clone)]
pub struct TickThrottle {
    interval: Duration,
    last: Option<Instant>,
}

impl TickThrottle {
    /// Gate to roughly `rate_hz` ticks per second
    pub fn new(rate_hz: f32) -> Self {
        let fallback = Duration::from_secs_f32(1.0 / 30.0);
        let interval = if rate_hz.is_finite() && rate_hz > 0.0 {
            Duration::try_from_secs_f32(1.0 / rate_hz).unwrap_or(fallback)
        } else {
            fallback
        };
        Self { interval, last: None }
    }

    /// Whether a tick is due at `now`; records the tick when it is
    pub fn ready(&mut self, now: Instant) -> bool {
        match self.last {
            Some(last) if now.saturating_duration_since(last) < self.interval => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}

/// Pipeline lifecycle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipelineState {
    /// Created, not started
    Idle,
    /// Capturing and running inference
    Running,
    /// Stopped by the host
    Stopped,
    /// Device or worker could not be acquired; gesture control is off
    Unavailable,
}

/// Frame source, inference worker and capture-rate throttle
pub struct CapturePipeline {
    source: Box<dyn FrameSource>,
    /// Detector waiting to be moved into the worker on start
    detector: Option<Box<dyn LandmarkDetector>>,
    worker: Option<InferenceWorker>,
    throttle: TickThrottle,
    state: PipelineState,
    queue_depth: usize,
    inference_size: [u32; 2],
    frames_submitted: u64,
    frames_dropped: u64,
}

impl CapturePipeline {
    pub fn new(
        source: Box<dyn FrameSource>,
        detector: Box<dyn LandmarkDetector>,
        config: &CaptureConfig,
    ) -> Self {
        Self {
            source,
            detector: Some(detector),
            worker: None,
            throttle: TickThrottle::new(config.target_fps),
            state: PipelineState::Idle,
            queue_depth: config.queue_depth,
            inference_size: config.inference_size,
            frames_submitted: 0,
            frames_dropped: 0,
        }
    }

    /// Open the frame source and spawn the worker.
    ///
    /// Only has an effect from `Idle`. Failures are logged and leave the
    /// pipeline `Unavailable`.
    pub fn start(&mut self) -> PipelineState {
        if self.state != PipelineState::Idle {
            return self.state;
        }

        if let Err(e) = self.source.open() {
            tracing::warn!(error = %e, "Capture unavailable, gesture control disabled");
            self.state = PipelineState::Unavailable;
            return self.state;
        }

        let Some(detector) = self.detector.take() else {
            self.source.close();
            self.state = PipelineState::Unavailable;
            return self.state;
        };

        match InferenceWorker::spawn(detector, self.queue_depth) {
            Ok(worker) => {
                self.worker = Some(worker);
                self.throttle.reset();
                self.state = PipelineState::Running;
                tracing::info!(
                    interval_ms = self.throttle.interval().as_secs_f32() * 1000.0,
                    "Capture pipeline started"
                );
            }
            Err(e) => {
                tracing::warn!(error = %e, "Inference worker unavailable, gesture control disabled");
                self.source.close();
                self.state = PipelineState::Unavailable;
            }
        }
        self.state
    }

    /// Run one capture tick if one is due.
    ///
    /// Returns the newest detection completed since the previous tick.
    pub fn poll(&mut self, now: Instant) -> Option<Detection> {
        if self.state != PipelineState::Running || !self.throttle.ready(now) {
            return None;
        }
        let worker = self.worker.as_ref()?;

        if let Some(frame) = self.source.latest_frame() {
            let [width, height] = self.inference_size;
            let frame = CaptureFrame {
                data: frame.downscale(width, height),
                width,
                height,
                ..frame
            };
            if worker.submit(frame) {
                self.frames_submitted += 1;
            } else {
                self.frames_dropped += 1;
            }
        }

        worker.take_detection()
    }

    /// Stop inference and release the device. Safe before start and when repeated.
    pub fn stop(&mut self) {
        if let Some(mut worker) = self.worker.take() {
            worker.stop();
        }
        self.detector = None;
        self.source.close();
        if self.state != PipelineState::Unavailable {
            self.state = PipelineState::Stopped;
        }
        tracing::debug!(
            submitted = self.frames_submitted,
            dropped = self.frames_dropped,
            "Capture pipeline stopped"
        );
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Frames handed to the worker
    pub fn frames_submitted(&self) -> u64 {
        self.frames_submitted
    }

    /// Frames dropped because the worker was busy
    pub fn frames_dropped(&self) -> u64 {
        self.frames_dropped
    }
}

impl Drop for CapturePipeline {
    fn drop(&mut self) {
        self.stop();
    }
}
