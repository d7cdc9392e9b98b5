//! Pointer selection
//!
//! Projects each photo's scattered anchor (not its animated position) to
//! normalized device coordinates and picks the one nearest the hand pointer.
//! There is no hysteresis; the pick may change every frame.

use glam::Vec2;

use super::camera::SceneCamera;
use super::mode::DisplayMode;
use super::objects::ObjectPopulation;
use crate::config::SelectionConfig;
use crate::tracking::StabilizedHandState;

/// A photo under the pointer
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Selection {
    /// Index into the photo list
    pub index: usize,
    /// NDC distance between pointer and anchor
    pub distance: f32,
}

/// Map a normalized image pointer to NDC (y flipped)
pub fn ndc_from_pointer(pointer: Vec2) -> Vec2 {
    Vec2::new(2.0 * pointer.x - 1.0, 1.0 - 2.0 * pointer.y)
}

/// Nearest-anchor picker with a fixed distance threshold
#[derive(Debug, Clone)]
pub struct PointerSelector {
    threshold: f32,
}

impl Default for PointerSelector {
    fn default() -> Self {
        Self::new(&SelectionConfig::default())
    }
}

impl PointerSelector {
    pub fn new(config: &SelectionConfig) -> Self {
        Self {
            threshold: config.threshold,
        }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Nearest candidate to `pointer_ndc`, if strictly closer than the threshold.
    ///
    /// Candidates are `(index, ndc)` pairs; on equal distance the first wins.
    pub fn nearest(&self, candidates: impl IntoIterator<Item = (usize, Vec2)>, pointer_ndc: Vec2) -> Option<Selection> {
        let mut best: Option<Selection> = None;
        for (index, ndc) in candidates {
            let distance = ndc.distance(pointer_ndc);
            if best.map_or(true, |b| distance < b.distance) {
                best = Some(Selection { index, distance });
            }
        }
        best.filter(|b| b.distance < self.threshold)
    }

    /// Pick the loaded photo under the hand pointer. Only active while scattered.
    pub fn select(
        &self,
        mode: DisplayMode,
        population: &ObjectPopulation,
        camera: &SceneCamera,
        hand: &StabilizedHandState,
    ) -> Option<Selection> {
        if mode != DisplayMode::Scattered {
            return None;
        }

        let candidates = population
            .photos()
            .iter()
            .enumerate()
            .filter(|(_, object)| object.is_renderable())
            .filter_map(|(index, object)| {
                camera
                    .project_to_ndc(object.anchor(mode))
                    .map(|ndc| (index, ndc))
            });
        self.nearest(candidates, ndc_from_pointer(hand.position))
    }
}
