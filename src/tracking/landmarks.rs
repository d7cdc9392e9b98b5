//! Hand landmark sets
//!
//! 21 normalized 2D joint positions per hand in the MediaPipe index order.

use glam::Vec2;

/// Number of landmarks in one hand skeleton
pub const LANDMARK_COUNT: usize = 21;

/// Wrist landmark index
pub const WRIST: usize = 0;

/// Landmarks averaged for the palm center (wrist and the four finger bases)
pub const PALM_INDICES: [usize; 5] = [0, 5, 9, 13, 17];

/// A single joint in normalized image coordinates
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
}

impl Landmark {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another landmark
    pub fn distance(self, other: Landmark) -> f32 {
        self.to_vec2().distance(other.to_vec2())
    }

    pub fn to_vec2(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// The four non-thumb fingers
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Finger {
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    pub const ALL: [Finger; 4] = [Finger::Index, Finger::Middle, Finger::Ring, Finger::Pinky];

    /// Landmark index of the finger base (MCP joint)
    pub const fn base(self) -> usize {
        match self {
            Finger::Index => 5,
            Finger::Middle => 9,
            Finger::Ring => 13,
            Finger::Pinky => 17,
        }
    }

    /// Landmark index of the proximal interphalangeal joint
    pub const fn pip(self) -> usize {
        self.base() + 1
    }

    /// Landmark index of the fingertip
    pub const fn tip(self) -> usize {
        self.base() + 3
    }
}

/// One hand's skeleton for a single frame
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LandmarkSet {
    points: [Landmark; LANDMARK_COUNT],
}

impl LandmarkSet {
    pub const fn new(points: [Landmark; LANDMARK_COUNT]) -> Self {
        Self { points }
    }

    /// Build from a slice; anything other than exactly 21 points is rejected
    pub fn from_slice(points: &[Landmark]) -> Option<Self> {
        let points: [Landmark; LANDMARK_COUNT] = points.try_into().ok()?;
        Some(Self { points })
    }

    /// Build from `(x, y)` pairs
    pub fn from_xy(points: &[(f32, f32)]) -> Option<Self> {
        if points.len() != LANDMARK_COUNT {
            return None;
        }
        let mut out = [Landmark::default(); LANDMARK_COUNT];
        for (dst, &(x, y)) in out.iter_mut().zip(points) {
            *dst = Landmark::new(x, y);
        }
        Some(Self { points: out })
    }

    pub fn get(&self, index: usize) -> Landmark {
        self.points[index]
    }

    pub fn wrist(&self) -> Landmark {
        self.points[WRIST]
    }

    pub fn points(&self) -> &[Landmark; LANDMARK_COUNT] {
        &self.points
    }

    /// Average of the wrist and the four finger bases
    pub fn palm_center(&self) -> Vec2 {
        let sum: Vec2 = PALM_INDICES.iter().map(|&i| self.points[i].to_vec2()).sum();
        sum / PALM_INDICES.len() as f32
    }
}
