//! Synthetic hands and a scripted capture source
//!
//! Lets the scene run headless without a camera or landmark model. The
//! scripted detector plays a fixed loop of hand poses keyed off each frame's
//! capture time, so it behaves the same behind the real inference worker.

use std::f32::consts::TAU;
use std::time::{Duration, Instant};

use crate::capture::{CaptureFrame, FrameSource, LandmarkDetector};
use crate::error::Result;
use crate::tracking::{Finger, Landmark, LandmarkSet, LANDMARK_COUNT};

/// Pose for a synthetic hand
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HandShape {
    /// Index, middle, ring, pinky
    pub folded: [bool; 4],
    pub thumb_extended: bool,
}

impl HandShape {
    pub const FIST: HandShape = HandShape {
        folded: [true; 4],
        thumb_extended: false,
    };

    pub const OPEN_PALM: HandShape = HandShape {
        folded: [false; 4],
        thumb_extended: true,
    };

    pub const TWO_FINGERS: HandShape = HandShape {
        folded: [false, false, true, true],
        thumb_extended: false,
    };
}

/// Horizontal offset of each finger base from the hand center
const BASE_OFFSETS: [f32; 4] = [-0.09, -0.03, 0.03, 0.09];

/// Upright hand centered on `(cx, cy)` in normalized image coordinates.
///
/// The wrist sits `0.2 * scale` below the finger bases; extended fingers
/// point up and folded fingers curl back below their base.
pub fn synthetic_hand(shape: HandShape, cx: f32, cy: f32, scale: f32) -> LandmarkSet {
    let mut points = [Landmark::default(); LANDMARK_COUNT];
    let at = |dx: f32, dy: f32| Landmark::new(cx + dx * scale, cy + dy * scale);

    points[0] = at(0.0, 0.2);

    let thumb: [(f32, f32); 4] = if shape.thumb_extended {
        [(-0.06, 0.16), (-0.12, 0.11), (-0.17, 0.06), (-0.21, 0.02)]
    } else {
        [(-0.06, 0.16), (-0.09, 0.11), (-0.07, 0.07), (-0.04, 0.06)]
    };
    for (i, (dx, dy)) in thumb.into_iter().enumerate() {
        points[1 + i] = at(dx, dy);
    }

    for (finger, dx) in Finger::ALL.into_iter().zip(BASE_OFFSETS) {
        let joints = if shape.folded[finger as usize] {
            [0.0, -0.07, -0.03, 0.03]
        } else {
            [0.0, -0.08, -0.14, -0.2]
        };
        for (j, dy) in joints.into_iter().enumerate() {
            points[finger.base() + j] = at(dx, dy);
        }
    }

    LandmarkSet::new(points)
}

/// One step of the scripted loop
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScriptStep {
    /// `None` for no hand in view
    pub shape: Option<HandShape>,
    pub duration: Duration,
}

/// Default loop: nothing, open palm, two fingers, fist
pub fn default_script() -> Vec<ScriptStep> {
    let step = |shape, secs| ScriptStep {
        shape,
        duration: Duration::from_secs_f32(secs),
    };
    vec![
        step(None, 1.0),
        step(Some(HandShape::OPEN_PALM), 4.0),
        step(Some(HandShape::TWO_FINGERS), 2.5),
        step(Some(HandShape::FIST), 2.5),
    ]
}

/// Landmark detector that replays a script instead of running a model
pub struct ScriptedDetector {
    script: Vec<ScriptStep>,
    period: Duration,
    start: Option<Instant>,
}

impl ScriptedDetector {
    pub fn new(script: Vec<ScriptStep>) -> Self {
        let period = script.iter().map(|s| s.duration).sum();
        Self {
            script,
            period,
            start: None,
        }
    }

    /// Pose at `offset` into the loop
    pub fn shape_at(&self, offset: Duration) -> Option<HandShape> {
        if self.period.is_zero() {
            return None;
        }
        let mut t = Duration::from_nanos((offset.as_nanos() % self.period.as_nanos()) as u64);
        for step in &self.script {
            if t < step.duration {
                return step.shape;
            }
            t -= step.duration;
        }
        None
    }
}

impl Default for ScriptedDetector {
    fn default() -> Self {
        Self::new(default_script())
    }
}

impl LandmarkDetector for ScriptedDetector {
    fn detect(&mut self, frame: &CaptureFrame) -> Result<Option<LandmarkSet>> {
        let start = *self.start.get_or_insert(frame.timestamp);
        let offset = frame.timestamp.saturating_duration_since(start);

        let Some(shape) = self.shape_at(offset) else {
            return Ok(None);
        };

        // Sweep the hand in a slow circle so the pointer crosses the screen
        let angle = offset.as_secs_f32() * TAU / 6.0;
        let cx = 0.5 + 0.3 * angle.cos();
        let cy = 0.5 + 0.25 * angle.sin();
        Ok(Some(synthetic_hand(shape, cx, cy, 0.35)))
    }
}

/// Frame source producing blank RGBA frames
pub struct SyntheticFrameSource {
    width: u32,
    height: u32,
    frame_number: u64,
    open: bool,
}

impl SyntheticFrameSource {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            frame_number: 0,
            open: false,
        }
    }
}

impl FrameSource for SyntheticFrameSource {
    fn open(&mut self) -> Result<()> {
        self.open = true;
        tracing::info!(width = self.width, height = self.height, "Synthetic camera opened");
        Ok(())
    }

    fn latest_frame(&mut self) -> Option<CaptureFrame> {
        if !self.open {
            return None;
        }
        self.frame_number += 1;
        Some(CaptureFrame {
            data: vec![0; (self.width * self.height * 4) as usize],
            width: self.width,
            height: self.height,
            frame_number: self.frame_number,
            timestamp: Instant::now(),
        })
    }

    fn close(&mut self) {
        if self.open {
            tracing::info!(frames = self.frame_number, "Synthetic camera closed");
        }
        self.open = false;
    }
}
