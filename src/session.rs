//! Gesture scene session
//!
//! Owns every core component and exposes the two periodic entry points:
//! `capture_tick` (stabilizer and mode machine, ~30 Hz) and `render_tick`
//! (selector and animator, display rate). The stabilized hand state is the
//! only thing passed between them. The capture tick overwrites it and the
//! render tick reads whatever snapshot is current.

use crate::config::SceneConfig;
use crate::scene::{
    AnimationContext, DisplayMode, InstanceRaw, ModeStateMachine, ModeTransition, ObjectAnimator, ObjectId,
    ObjectPopulation, PhotoEntry, PhotoRef, PointerSelector, SceneCamera,
};
use crate::tracking::{Gesture, HandTracker, LandmarkSet, StabilizedHandState};

/// Hand status for the UI layer
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HandStatus {
    pub present: bool,
    pub gesture: Gesture,
}

impl HandStatus {
    pub fn label(&self) -> &'static str {
        if self.present {
            self.gesture.label()
        } else {
            "No hand detected"
        }
    }
}

/// Everything the host needs to draw one frame
#[derive(Clone, Debug)]
pub struct SceneFrame {
    /// One instance per managed object, primitives first
    pub instances: Vec<InstanceRaw>,
    pub mode: DisplayMode,
    /// Photo under the pointer this frame (scattered only)
    pub hovered: Option<usize>,
    /// Photo that focusing will use
    pub selected_index: usize,
    pub photo_count: usize,
    pub hand: HandStatus,
}

/// The gesture-driven scene
pub struct GestureScene {
    tracker: HandTracker,
    /// Shared snapshot; written by the capture tick only
    hand: StabilizedHandState,
    modes: ModeStateMachine,
    photos: Vec<PhotoEntry>,
    population: ObjectPopulation,
    animator: ObjectAnimator,
    selector: PointerSelector,
    camera: SceneCamera,
    selected_index: usize,
    hovered: Option<usize>,
    /// Seconds of render time since creation
    elapsed: f32,
}

impl GestureScene {
    pub fn new(config: &SceneConfig) -> Self {
        let population = ObjectPopulation::new(&config.layout);
        tracing::info!(
            primitives = population.primitive_count(),
            capture_fps = config.capture.target_fps,
            "Scene created"
        );
        Self {
            tracker: HandTracker::new(&config.tracking),
            hand: StabilizedHandState::default(),
            modes: ModeStateMachine::new(),
            photos: Vec::new(),
            population,
            animator: ObjectAnimator::new(&config.animation),
            selector: PointerSelector::new(&config.selection),
            camera: SceneCamera::new(&config.camera),
            selected_index: 0,
            hovered: None,
            elapsed: 0.0,
        }
    }

    /// Handle one completed inference (`None` = no hand).
    ///
    /// Updates the stabilized hand state and applies any mode transition.
    pub fn capture_tick(&mut self, hand: Option<&LandmarkSet>) -> Option<ModeTransition> {
        let was_present = self.hand.is_present;
        self.hand = self.tracker.ingest(hand);
        if was_present != self.hand.is_present {
            tracing::debug!(present = self.hand.is_present, "Hand presence changed");
        }

        let transition = self
            .modes
            .observe(self.hand.gesture, self.population.first_ready_photo().is_some())?;

        match transition.to {
            DisplayMode::Scattered => {
                self.population.reshuffle_photos();
            }
            DisplayMode::Focused => {
                if !self.population.is_photo_ready(self.selected_index) {
                    if let Some(index) = self.population.first_ready_photo() {
                        self.selected_index = index;
                    }
                }
            }
            DisplayMode::Assembled => {}
        }

        tracing::info!(
            from = transition.from.label(),
            to = transition.to.label(),
            gesture = transition.gesture.label(),
            "Mode transition"
        );
        Some(transition)
    }

    /// Advance animation by `delta_time` seconds and produce the frame
    pub fn render_tick(&mut self, delta_time: f32) -> SceneFrame {
        let delta_time = delta_time.max(0.0);
        self.elapsed += delta_time;
        let mode = self.modes.mode();

        let hit = self.selector.select(mode, &self.population, &self.camera, &self.hand);
        self.hovered = hit.map(|s| s.index);
        if let Some(selection) = hit {
            if selection.index != self.selected_index {
                tracing::debug!(index = selection.index, distance = selection.distance, "Selection changed");
            }
            self.selected_index = selection.index;
        }

        let context = AnimationContext {
            mode,
            selected: self.highlighted(mode),
            elapsed: self.elapsed,
            delta_time,
        };
        self.animator.update(self.population.objects(), &context);

        SceneFrame {
            instances: self.animator.instances(self.population.objects()),
            mode,
            hovered: self.hovered,
            selected_index: self.selected_index,
            photo_count: self.population.photo_count(),
            hand: self.hand_status(),
        }
    }

    /// Object the animator should single out in this mode
    fn highlighted(&self, mode: DisplayMode) -> Option<ObjectId> {
        let index = match mode {
            DisplayMode::Assembled => return None,
            DisplayMode::Scattered => self.hovered?,
            DisplayMode::Focused => self.selected_index,
        };
        self.population.photo(index).map(|o| o.id)
    }

    /// Append a photo; it stays hidden until marked ready
    pub fn add_photo(&mut self, reference: PhotoRef) {
        self.add_photos(std::iter::once(reference));
    }

    /// Append several photos with a single layout rebuild
    pub fn add_photos(&mut self, references: impl IntoIterator<Item = PhotoRef>) {
        self.photos
            .extend(references.into_iter().map(|reference| PhotoEntry { reference, ready: false }));
        self.population.sync_photos(&self.photos);
        tracing::info!(count = self.photos.len(), "Photo list updated");
    }

    /// Mark a photo's resource as loaded. Returns false for unknown references.
    pub fn mark_photo_ready(&mut self, reference: &PhotoRef) -> bool {
        let mut found = false;
        for entry in self.photos.iter_mut().filter(|e| &e.reference == reference) {
            entry.ready = true;
            found = true;
        }
        if found {
            self.population.sync_photos(&self.photos);
        }
        found
    }

    /// Empty the photo list and reset the selection to the first slot
    pub fn clear_photos(&mut self) {
        self.photos.clear();
        self.population.sync_photos(&self.photos);
        self.selected_index = 0;
        self.hovered = None;
        tracing::info!("Photo list cleared");
    }

    /// Discard and rebuild the whole object population
    pub fn rebuild_population(&mut self) {
        self.population.reset();
        self.population.sync_photos(&self.photos);
        self.animator.clear();
        tracing::info!(objects = self.population.len(), "Population rebuilt");
    }

    /// Update the projection for a new viewport size
    pub fn resize(&mut self, width: u32, height: u32) {
        if height > 0 {
            self.camera.set_aspect(width as f32 / height as f32);
        }
    }

    pub fn mode(&self) -> DisplayMode {
        self.modes.mode()
    }

    pub fn hand_state(&self) -> &StabilizedHandState {
        &self.hand
    }

    pub fn hand_status(&self) -> HandStatus {
        HandStatus {
            present: self.hand.is_present,
            gesture: self.hand.gesture,
        }
    }

    pub fn selected_index(&self) -> usize {
        self.selected_index
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    pub fn photo_count(&self) -> usize {
        self.photos.len()
    }

    pub fn population(&self) -> &ObjectPopulation {
        &self.population
    }

    pub fn camera(&self) -> &SceneCamera {
        &self.camera
    }

    pub fn animator(&self) -> &ObjectAnimator {
        &self.animator
    }
}
