//! Object animator
//!
//! Every render tick each object gets a target transform from the display
//! mode, its anchors, its id and the elapsed time. The live transform then
//! moves a fraction `rate * dt` of the remaining distance toward it, so mode
//! changes never make anything jump and the motion is independent of frame
//! rate.

use std::collections::HashMap;
use std::f32::consts::{PI, TAU};

use glam::Vec3;

use super::instance::InstanceRaw;
use super::layout::azimuth;
use super::mode::DisplayMode;
use super::objects::{ManagedObject, ObjectId};
use crate::config::AnimationConfig;

/// Live transform of one object
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimatedTransform {
    pub position: Vec3,
    /// Uniform scale
    pub scale: f32,
    /// Euler angles (XYZ, radians)
    pub rotation: Vec3,
}

impl AnimatedTransform {
    /// Where a freshly created object starts: its initial anchor, invisible
    fn spawn(object: &ManagedObject) -> Self {
        Self {
            position: object.anchors.initial,
            scale: 0.0,
            rotation: Vec3::ZERO,
        }
    }
}

/// Inputs shared by every object for one render tick
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimationContext {
    pub mode: DisplayMode,
    /// Hovered object while scattered, focused photo while focused
    pub selected: Option<ObjectId>,
    /// Seconds since the scene started
    pub elapsed: f32,
    /// Seconds since the previous render tick
    pub delta_time: f32,
}

/// Per-object exponential interpolation toward mode targets
#[derive(Debug, Clone)]
pub struct ObjectAnimator {
    config: AnimationConfig,
    transforms: HashMap<ObjectId, AnimatedTransform>,
}

impl Default for ObjectAnimator {
    fn default() -> Self {
        Self::new(&AnimationConfig::default())
    }
}

impl ObjectAnimator {
    pub fn new(config: &AnimationConfig) -> Self {
        Self {
            config: config.clone(),
            transforms: HashMap::new(),
        }
    }

    /// Target transform for one object
    pub fn target(&self, object: &ManagedObject, ctx: &AnimationContext) -> AnimatedTransform {
        let is_selected = ctx.selected == Some(object.id);
        let spin = object.spin_rates * ctx.elapsed;

        match ctx.mode {
            DisplayMode::Assembled => {
                let anchor = object.anchors.assembled;
                AnimatedTransform {
                    position: anchor,
                    scale: object.scale_factor,
                    // Face outward from the vertical axis
                    rotation: Vec3::new(0.0, azimuth(anchor), 0.0),
                }
            }
            DisplayMode::Scattered => {
                let dimmed = ctx.selected.is_some() && !is_selected;
                let scale = if dimmed {
                    object.scale_factor * self.config.unselected_scale
                } else {
                    object.scale_factor
                };
                AnimatedTransform {
                    position: object.anchors.scattered + self.oscillation(object.id, ctx.elapsed),
                    scale,
                    rotation: spin,
                }
            }
            DisplayMode::Focused if is_selected => AnimatedTransform {
                position: Vec3::from_array(self.config.focus_position),
                scale: self.config.focus_scale,
                rotation: Vec3::ZERO,
            },
            DisplayMode::Focused => AnimatedTransform {
                position: object.anchors.scattered * self.config.recede_distance,
                scale: object.scale_factor * self.config.recede_scale,
                rotation: spin,
            },
        }
    }

    /// Low-amplitude drift, phase-keyed by id so neighbours move out of step
    fn oscillation(&self, id: ObjectId, elapsed: f32) -> Vec3 {
        let phase = (id.0 % 1024) as f32 * 1.618;
        let [ax, ay, az] = self.config.oscillation_amplitude;
        let [fx, fy, fz] = self.config.oscillation_frequency;
        Vec3::new(
            ax * (fx * elapsed + phase).sin(),
            ay * (fy * elapsed + phase * 1.3).sin(),
            az * (fz * elapsed + phase * 0.7).cos(),
        )
    }

    /// Position approach rate for a mode
    pub fn position_rate(&self, mode: DisplayMode) -> f32 {
        match mode {
            DisplayMode::Assembled => self.config.assembled_rate,
            DisplayMode::Scattered | DisplayMode::Focused => self.config.free_rate,
        }
    }

    /// Advance every object by one render tick
    pub fn update(&mut self, objects: &[ManagedObject], ctx: &AnimationContext) {
        // Drop transforms of objects that no longer exist (photo rebuild, reset)
        if self.transforms.len() > objects.len() {
            let mut live: HashMap<ObjectId, AnimatedTransform> = HashMap::with_capacity(objects.len());
            for object in objects {
                if let Some(t) = self.transforms.get(&object.id) {
                    live.insert(object.id, *t);
                }
            }
            self.transforms = live;
        }

        let dt = ctx.delta_time.max(0.0);
        let position_step = step(self.position_rate(ctx.mode), dt);
        let scale_step = step(self.config.scale_rate, dt);
        let rotation_step = step(self.config.rotation_rate, dt);

        for object in objects {
            let target = self.target(object, ctx);
            let current = self
                .transforms
                .entry(object.id)
                .or_insert_with(|| AnimatedTransform::spawn(object));

            current.position += (target.position - current.position) * position_step;
            current.scale += (target.scale - current.scale) * scale_step;
            current.rotation += wrap_angles(target.rotation - current.rotation) * rotation_step;
        }
    }

    /// Live transform of an object, if it has been animated yet
    pub fn transform(&self, id: ObjectId) -> Option<&AnimatedTransform> {
        self.transforms.get(&id)
    }

    /// Instance records for the host, in population order
    pub fn instances(&self, objects: &[ManagedObject]) -> Vec<InstanceRaw> {
        objects
            .iter()
            .map(|object| {
                let transform = self
                    .transforms
                    .get(&object.id)
                    .copied()
                    .unwrap_or_else(|| AnimatedTransform::spawn(object));
                InstanceRaw::new(object, &transform)
            })
            .collect()
    }

    /// Forget all live transforms; objects re-enter from their initial anchors
    pub fn clear(&mut self) {
        self.transforms.clear();
    }
}

/// Fraction of the remaining distance covered in one tick, never overshooting
fn step(rate: f32, dt: f32) -> f32 {
    (rate * dt).clamp(0.0, 1.0)
}

/// Shortest signed angle for each component, in (-PI, PI]
fn wrap_angles(delta: Vec3) -> Vec3 {
    Vec3::new(wrap_angle(delta.x), wrap_angle(delta.y), wrap_angle(delta.z))
}

fn wrap_angle(angle: f32) -> f32 {
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI {
        wrapped + TAU
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::scene::objects::{ObjectPopulation, PhotoEntry, PhotoRef};

    fn population(primitives: usize, photos: usize) -> ObjectPopulation {
        let layout = LayoutConfig {
            primitive_count: primitives,
            ..LayoutConfig::default()
        };
        let mut population = ObjectPopulation::new(&layout);
        let entries: Vec<_> = (0..photos)
            .map(|i| PhotoEntry {
                reference: PhotoRef(format!("p{i}")),
                ready: true,
            })
            .collect();
        population.sync_photos(&entries);
        population
    }

    fn ctx(mode: DisplayMode, selected: Option<ObjectId>, elapsed: f32) -> AnimationContext {
        AnimationContext {
            mode,
            selected,
            elapsed,
            delta_time: 1.0 / 60.0,
        }
    }

    fn run(animator: &mut ObjectAnimator, objects: &[ManagedObject], context: AnimationContext, frames: usize) {
        let mut context = context;
        for _ in 0..frames {
            animator.update(objects, &context);
            context.elapsed += context.delta_time;
        }
    }

    #[test]
    fn test_converges_to_assembled_anchor() {
        let population = population(10, 0);
        let mut animator = ObjectAnimator::default();
        run(&mut animator, population.objects(), ctx(DisplayMode::Assembled, None, 0.0), 600);

        for object in population.objects() {
            let t = animator.transform(object.id).unwrap();
            assert!(t.position.distance(object.anchors.assembled) < 1e-2);
            assert!((t.scale - object.scale_factor).abs() < 1e-3);
        }
    }

    #[test]
    fn test_assembled_faces_outward() {
        let population = population(5, 0);
        let animator = ObjectAnimator::default();
        let object = &population.objects()[0];
        let target = animator.target(object, &ctx(DisplayMode::Assembled, None, 0.0));
        assert_eq!(target.rotation.y, azimuth(object.anchors.assembled));
        assert_eq!(target.rotation.x, 0.0);
    }

    #[test]
    fn test_no_jump_on_mode_switch() {
        let population = population(20, 4);
        let objects = population.objects();
        let mut animator = ObjectAnimator::default();
        run(&mut animator, objects, ctx(DisplayMode::Assembled, None, 0.0), 300);

        let focused = population.photo(0).map(|o| o.id);
        for mode in [DisplayMode::Scattered, DisplayMode::Focused, DisplayMode::Assembled] {
            let context = ctx(mode, focused, 5.0);
            let before: Vec<_> = objects.iter().map(|o| *animator.transform(o.id).unwrap()).collect();
            animator.update(objects, &context);

            let max_step = step(animator.position_rate(mode), context.delta_time);
            for (object, old) in objects.iter().zip(&before) {
                let target = animator.target(object, &context);
                let moved = animator.transform(object.id).unwrap().position.distance(old.position);
                let bound = old.position.distance(target.position) * max_step;
                assert!(moved <= bound + 1e-4, "{mode:?}: moved {moved} > {bound}");
            }
        }
    }

    #[test]
    fn test_large_delta_does_not_overshoot() {
        let population = population(3, 0);
        let mut animator = ObjectAnimator::default();
        let mut context = ctx(DisplayMode::Assembled, None, 0.0);
        context.delta_time = 10.0;
        animator.update(population.objects(), &context);
        for object in population.objects() {
            let t = animator.transform(object.id).unwrap();
            assert!(t.position.distance(object.anchors.assembled) < 1e-4);
        }
    }

    #[test]
    fn test_scattered_oscillation_desynchronized() {
        let population = population(2, 0);
        let animator = ObjectAnimator::default();
        let [a, b] = [&population.objects()[0], &population.objects()[1]];
        let context = ctx(DisplayMode::Scattered, None, 2.0);

        let offset_a = animator.target(a, &context).position - a.anchors.scattered;
        let offset_b = animator.target(b, &context).position - b.anchors.scattered;
        assert!(offset_a.length() > 0.0);
        assert!(offset_a.length() < 1.0);
        assert!((offset_a - offset_b).length() > 1e-3);
    }

    #[test]
    fn test_selection_dims_others_when_scattered() {
        let population = population(3, 2);
        let animator = ObjectAnimator::default();
        let selected = population.photo(1).unwrap();
        let other = population.photo(0).unwrap();
        let context = ctx(DisplayMode::Scattered, Some(selected.id), 1.0);

        assert_eq!(animator.target(selected, &context).scale, selected.scale_factor);
        assert!(animator.target(other, &context).scale < other.scale_factor);

        let no_selection = ctx(DisplayMode::Scattered, None, 1.0);
        assert_eq!(animator.target(other, &no_selection).scale, other.scale_factor);
    }

    #[test]
    fn test_focused_targets() {
        let population = population(3, 2);
        let config = AnimationConfig::default();
        let animator = ObjectAnimator::new(&config);
        let focused = population.photo(0).unwrap();
        let context = ctx(DisplayMode::Focused, Some(focused.id), 1.0);

        let target = animator.target(focused, &context);
        assert_eq!(target.position, Vec3::from_array(config.focus_position));
        assert_eq!(target.scale, config.focus_scale);
        assert_eq!(target.rotation, Vec3::ZERO);

        let other = population.photo(1).unwrap();
        let target = animator.target(other, &context);
        assert!((target.position - other.anchors.scattered * config.recede_distance).length() < 1e-5);
        assert!(target.scale < other.scale_factor);
    }

    #[test]
    fn test_new_objects_start_at_initial_anchor() {
        let population = population(4, 0);
        let animator = ObjectAnimator::default();
        let instances = animator.instances(population.objects());
        assert_eq!(instances.len(), 4);
        // Zero scale until animated
        assert!(instances.iter().all(|i| i.model[0][0] == 0.0));
    }

    #[test]
    fn test_unready_photo_hidden_but_animated() {
        let layout = LayoutConfig {
            primitive_count: 1,
            ..LayoutConfig::default()
        };
        let mut population = ObjectPopulation::new(&layout);
        population.sync_photos(&[PhotoEntry {
            reference: PhotoRef("late".into()),
            ready: false,
        }]);

        let mut animator = ObjectAnimator::default();
        animator.update(population.objects(), &ctx(DisplayMode::Assembled, None, 0.0));
        let instances = animator.instances(population.objects());
        assert_eq!(instances[0].visible, 1);
        assert_eq!(instances[1].visible, 0);
        assert!(animator.transform(population.photo(0).unwrap().id).is_some());
    }

    #[test]
    fn test_stale_transforms_pruned() {
        let mut population = population(2, 3);
        let mut animator = ObjectAnimator::default();
        animator.update(population.objects(), &ctx(DisplayMode::Assembled, None, 0.0));
        let old_photo = population.photo(0).unwrap().id;

        population.sync_photos(&[]);
        animator.update(population.objects(), &ctx(DisplayMode::Assembled, None, 0.0));
        assert!(animator.transform(old_photo).is_none());
    }

    #[test]
    fn test_wrap_angle() {
        assert!((wrap_angle(3.0 * PI - 0.1) - (PI - 0.1)).abs() < 1e-5);
        assert!((wrap_angle(-0.5) + 0.5).abs() < 1e-6);
        assert!((wrap_angle(TAU + 0.25) - 0.25).abs() < 1e-5);
    }
}
