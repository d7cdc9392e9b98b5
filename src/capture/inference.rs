//! Landmark inference worker
//!
//! Runs the host's landmark model on a dedicated thread. Frames arrive over
//! a small bounded channel and are dropped when the worker falls behind; the
//! newest completed detection waits in a shared slot until the capture tick
//! takes it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender, TrySendError};
use parking_lot::Mutex;

use super::frame::CaptureFrame;
use crate::error::{Error, Result};
use crate::tracking::LandmarkSet;

/// Black-box hand landmark model
///
/// Returns `Ok(None)` when no hand is visible. Errors are treated as
/// transient: they are logged and the next frame is processed normally.
pub trait LandmarkDetector: Send {
    fn detect(&mut self, frame: &CaptureFrame) -> Result<Option<LandmarkSet>>;
}

/// One completed inference
#[derive(Clone, Debug, PartialEq)]
pub struct Detection {
    /// The detected hand, if any
    pub hand: Option<LandmarkSet>,
    /// Frame number this result corresponds to
    pub frame_number: u64,
}

/// Inference worker thread
pub struct InferenceWorker {
    /// Latest completed detection, consumed by `take_detection`
    latest: Arc<Mutex<Option<Detection>>>,
    /// Channel to send frames to the worker
    frame_sender: Option<Sender<CaptureFrame>>,
    /// Whether the worker loop is alive
    running: Arc<AtomicBool>,
    /// Worker thread handle
    thread_handle: Option<std::thread::JoinHandle<()>>,
}

impl InferenceWorker {
    /// Spawn the worker with room for `queue_depth` pending frames
    pub fn spawn(detector: Box<dyn LandmarkDetector>, queue_depth: usize) -> Result<Self> {
        let latest = Arc::new(Mutex::new(None));
        let running = Arc::new(AtomicBool::new(true));
        let (frame_sender, frame_receiver) = crossbeam_channel::bounded(queue_depth.max(1));

        let latest_clone = latest.clone();
        let running_clone = running.clone();

        let thread_handle = std::thread::Builder::new()
            .name("landmark-inference".to_string())
            .spawn(move || {
                Self::inference_thread(detector, frame_receiver, latest_clone, running_clone);
            })
            .map_err(Error::WorkerSpawn)?;

        Ok(Self {
            latest,
            frame_sender: Some(frame_sender),
            running,
            thread_handle: Some(thread_handle),
        })
    }

    /// Worker main loop; exits when the sender is dropped
    fn inference_thread(
        mut detector: Box<dyn LandmarkDetector>,
        frame_receiver: Receiver<CaptureFrame>,
        latest: Arc<Mutex<Option<Detection>>>,
        running: Arc<AtomicBool>,
    ) {
        tracing::info!("Landmark inference thread started");

        while let Ok(frame) = frame_receiver.recv() {
            if !running.load(Ordering::Acquire) {
                break;
            }
            match detector.detect(&frame) {
                Ok(hand) => {
                    // Checked under the lock so a result finished after `stop` is discarded
                    let mut slot = latest.lock();
                    if !running.load(Ordering::Acquire) {
                        break;
                    }
                    *slot = Some(Detection {
                        hand,
                        frame_number: frame.frame_number,
                    });
                }
                Err(e) => {
                    tracing::debug!(frame = frame.frame_number, error = %e, "Inference failed, skipping frame");
                }
            }
        }

        running.store(false, Ordering::Release);
        tracing::info!("Landmark inference thread stopped");
    }

    /// Queue a frame for inference without blocking.
    ///
    /// Returns false when the frame was dropped (queue full or worker stopped).
    pub fn submit(&self, frame: CaptureFrame) -> bool {
        let Some(sender) = &self.frame_sender else {
            return false;
        };
        match sender.try_send(frame) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => false,
            Err(TrySendError::Disconnected(_)) => {
                tracing::warn!("Inference worker disconnected");
                false
            }
        }
    }

    /// Take the newest completed detection, if one arrived since the last call
    pub fn take_detection(&self) -> Option<Detection> {
        self.latest.lock().take()
    }

    /// Check if the worker loop is alive
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Stop the worker without waiting on an in-flight inference.
    ///
    /// A detector call that is still running is abandoned; its thread exits
    /// on its own once the call returns and its result is discarded. Safe to
    /// call more than once.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::Release);
        // Dropping the sender ends the worker loop
        self.frame_sender = None;

        if let Some(handle) = self.thread_handle.take() {
            if handle.is_finished() {
                if handle.join().is_err() {
                    tracing::warn!("Inference thread panicked");
                }
            } else {
                tracing::debug!("Detaching busy inference thread");
            }
        }
        self.latest.lock().take();
    }
}

impl Drop for InferenceWorker {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    /// Detector that fails on odd frames and reports a fixed hand on even ones
    struct AlternatingDetector {
        hand: LandmarkSet,
    }

    impl LandmarkDetector for AlternatingDetector {
        fn detect(&mut self, frame: &CaptureFrame) -> Result<Option<LandmarkSet>> {
            if frame.frame_number % 2 == 1 {
                Err(Error::Detection("odd frame".to_string()))
            } else {
                Ok(Some(self.hand))
            }
        }
    }

    fn frame(frame_number: u64) -> CaptureFrame {
        CaptureFrame {
            data: vec![0; 4],
            width: 1,
            height: 1,
            frame_number,
            timestamp: Instant::now(),
        }
    }

    fn wait_for(worker: &InferenceWorker) -> Option<Detection> {
        let deadline = Instant::now() + Duration::from_secs(2);
        while Instant::now() < deadline {
            if let Some(detection) = worker.take_detection() {
                return Some(detection);
            }
            std::thread::sleep(Duration::from_millis(1));
        }
        None
    }

    #[test]
    fn test_detection_round_trip() {
        let hand = crate::demo::synthetic_hand(crate::demo::HandShape::FIST, 0.5, 0.5, 1.0);
        let mut worker = InferenceWorker::spawn(Box::new(AlternatingDetector { hand }), 2).unwrap();

        assert!(worker.submit(frame(4)));
        let detection = wait_for(&worker).expect("detection");
        assert_eq!(detection.frame_number, 4);
        assert_eq!(detection.hand, Some(hand));

        // Consumed once
        assert!(worker.take_detection().is_none());
        worker.stop();
    }

    #[test]
    fn test_errors_are_swallowed() {
        let hand = crate::demo::synthetic_hand(crate::demo::HandShape::OPEN_PALM, 0.5, 0.5, 1.0);
        let mut worker = InferenceWorker::spawn(Box::new(AlternatingDetector { hand }), 2).unwrap();

        assert!(worker.submit(frame(1)));
        assert!(worker.submit(frame(2)));
        let detection = wait_for(&worker).expect("worker survives a failed frame");
        assert_eq!(detection.frame_number, 2);
        assert!(worker.is_running());
        worker.stop();
    }

    /// Detector that blocks far longer than any test waits
    struct HangingDetector {
        entered: Arc<AtomicBool>,
    }

    impl LandmarkDetector for HangingDetector {
        fn detect(&mut self, _frame: &CaptureFrame) -> Result<Option<LandmarkSet>> {
            self.entered.store(true, Ordering::SeqCst);
            std::thread::sleep(Duration::from_secs(3));
            Ok(None)
        }
    }

    #[test]
    fn test_stop_does_not_wait_for_hung_detector() {
        let entered = Arc::new(AtomicBool::new(false));
        let detector = HangingDetector {
            entered: entered.clone(),
        };
        let mut worker = InferenceWorker::spawn(Box::new(detector), 1).unwrap();
        assert!(worker.submit(frame(0)));

        let deadline = Instant::now() + Duration::from_secs(2);
        while !entered.load(Ordering::SeqCst) && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(1));
        }
        assert!(entered.load(Ordering::SeqCst));

        let started = Instant::now();
        worker.stop();
        assert!(started.elapsed() < Duration::from_millis(500), "{:?}", started.elapsed());
        assert!(!worker.is_running());
        assert!(worker.take_detection().is_none());
    }

    #[test]
    fn test_stop_is_idempotent() {
        let hand = crate::demo::synthetic_hand(crate::demo::HandShape::FIST, 0.5, 0.5, 1.0);
        let mut worker = InferenceWorker::spawn(Box::new(AlternatingDetector { hand }), 1).unwrap();
        worker.stop();
        worker.stop();
        assert!(!worker.is_running());
        assert!(!worker.submit(frame(0)));
        assert!(worker.take_detection().is_none());
    }
}
