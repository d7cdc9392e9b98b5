//! Managed scene objects
//!
//! Every object carries one anchor per display mode plus per-object scale
//! and spin. Primitives are created once per population; photo objects are
//! rebuilt whenever the photo list changes length.

use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::layout::{derive_seed, formation_layout, initial_layout, scatter_layout};
use super::mode::DisplayMode;
use crate::config::LayoutConfig;

/// Photos sit this far outside the primitive cone
const PHOTO_RADIAL_OFFSET: f32 = 0.6;

/// Stable object identifier; never reused within a population's lifetime
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub u64);

impl ObjectId {
    /// 32-bit key for GPU instance data.
    ///
    /// This is the low half of the id, so it wraps after 2^32 allocations.
    /// Keys are unique among live objects as long as a population holds
    /// fewer than 2^32 ids spanning its oldest and newest object.
    pub fn instance_key(self) -> u32 {
        (self.0 & u64::from(u32::MAX)) as u32
    }
}

/// Opaque handle to a host-owned photo resource
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PhotoRef(pub String);

impl From<&str> for PhotoRef {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Primitive mesh shapes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PrimitiveShape {
    Sphere,
    Cube,
    Cone,
}

impl PrimitiveShape {
    pub const ALL: [PrimitiveShape; 3] = [PrimitiveShape::Sphere, PrimitiveShape::Cube, PrimitiveShape::Cone];
}

/// What an object draws
#[derive(Clone, Debug, PartialEq)]
pub enum ObjectPayload {
    Primitive(PrimitiveShape),
    Photo {
        reference: PhotoRef,
        /// Whether the host has finished loading the resource
        ready: bool,
    },
}

/// Flat object kind for hosts that pick a mesh per kind
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum ObjectKind {
    Sphere = 0,
    Cube = 1,
    Cone = 2,
    Photo = 3,
}

/// Per-mode target positions
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Anchors {
    pub assembled: Vec3,
    pub scattered: Vec3,
    pub initial: Vec3,
}

/// One object in the scene
#[derive(Clone, Debug, PartialEq)]
pub struct ManagedObject {
    pub id: ObjectId,
    pub payload: ObjectPayload,
    pub anchors: Anchors,
    /// Base scale
    pub scale_factor: f32,
    /// Spin speed per axis (radians per second) while scattered
    pub spin_rates: Vec3,
}

impl ManagedObject {
    pub fn kind(&self) -> ObjectKind {
        match &self.payload {
            ObjectPayload::Primitive(PrimitiveShape::Sphere) => ObjectKind::Sphere,
            ObjectPayload::Primitive(PrimitiveShape::Cube) => ObjectKind::Cube,
            ObjectPayload::Primitive(PrimitiveShape::Cone) => ObjectKind::Cone,
            ObjectPayload::Photo { .. } => ObjectKind::Photo,
        }
    }

    /// Only photos can be selected and focused
    pub fn is_selectable(&self) -> bool {
        matches!(self.payload, ObjectPayload::Photo { .. })
    }

    /// Photos are hidden until their resource has loaded
    pub fn is_renderable(&self) -> bool {
        match &self.payload {
            ObjectPayload::Primitive(_) => true,
            ObjectPayload::Photo { ready, .. } => *ready,
        }
    }

    pub fn photo_ref(&self) -> Option<&PhotoRef> {
        match &self.payload {
            ObjectPayload::Photo { reference, .. } => Some(reference),
            ObjectPayload::Primitive(_) => None,
        }
    }

    /// Anchor relevant to a display mode
    pub fn anchor(&self, mode: DisplayMode) -> Vec3 {
        match mode {
            DisplayMode::Assembled => self.anchors.assembled,
            DisplayMode::Scattered | DisplayMode::Focused => self.anchors.scattered,
        }
    }
}

/// One entry of the host's photo list
#[derive(Clone, Debug, PartialEq)]
pub struct PhotoEntry {
    pub reference: PhotoRef,
    pub ready: bool,
}

/// All managed objects, primitives first, then photos in list order
#[derive(Debug, Clone)]
pub struct ObjectPopulation {
    objects: Vec<ManagedObject>,
    layout: LayoutConfig,
    next_id: u64,
    /// Layout generation; bumped for every new layout so each gets a fresh seed
    generation: u64,
    primitive_count: usize,
}

impl ObjectPopulation {
    /// Create a population with the configured number of primitives
    pub fn new(layout: &LayoutConfig) -> Self {
        let mut population = Self {
            objects: Vec::new(),
            layout: layout.clone(),
            next_id: 0,
            generation: 0,
            primitive_count: 0,
        };
        population.populate_primitives();
        population
    }

    fn next_seed(&mut self) -> u64 {
        let seed = derive_seed(self.layout.seed, self.generation);
        self.generation += 1;
        seed
    }

    fn allocate_id(&mut self) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        id
    }

    fn populate_primitives(&mut self) {
        let count = self.layout.primitive_count;
        let seed = self.next_seed();
        let assembled = formation_layout(count, seed, &self.layout, 0.0);
        let scattered = scatter_layout(count, seed ^ 1, &self.layout);
        let initial = initial_layout(count, seed ^ 2, &self.layout);
        let mut rng = StdRng::seed_from_u64(seed ^ 3);

        for i in 0..count {
            let shape = PrimitiveShape::ALL[rng.random_range(0..PrimitiveShape::ALL.len())];
            let object = ManagedObject {
                id: self.allocate_id(),
                payload: ObjectPayload::Primitive(shape),
                anchors: Anchors {
                    assembled: assembled[i],
                    scattered: scattered[i],
                    initial: initial[i],
                },
                scale_factor: self.layout.primitive_scale * rng.random_range(0.6..1.4),
                spin_rates: Vec3::new(
                    rng.random_range(-1.0..1.0),
                    rng.random_range(-1.0..1.0),
                    rng.random_range(-1.0..1.0),
                ),
            };
            self.objects.push(object);
        }
        self.primitive_count = count;
    }

    /// Bring photo objects in line with the host's photo list.
    ///
    /// A length change discards every photo object and lays the new set out
    /// from scratch. Otherwise payloads are updated in place so late-loading
    /// photos appear in the slot they already occupy. Returns true when the
    /// set was rebuilt.
    pub fn sync_photos(&mut self, photos: &[PhotoEntry]) -> bool {
        if photos.len() != self.photo_count() {
            self.rebuild_photos(photos);
            return true;
        }

        let start = self.primitive_count;
        for (object, entry) in self.objects[start..].iter_mut().zip(photos) {
            object.payload = ObjectPayload::Photo {
                reference: entry.reference.clone(),
                ready: entry.ready,
            };
        }
        false
    }

    fn rebuild_photos(&mut self, photos: &[PhotoEntry]) {
        self.objects.truncate(self.primitive_count);

        let count = photos.len();
        let seed = self.next_seed();
        let assembled = formation_layout(count, seed, &self.layout, PHOTO_RADIAL_OFFSET);
        let scattered = scatter_layout(count, seed ^ 1, &self.layout);
        let initial = initial_layout(count, seed ^ 2, &self.layout);

        for (i, entry) in photos.iter().enumerate() {
            let object = ManagedObject {
                id: self.allocate_id(),
                payload: ObjectPayload::Photo {
                    reference: entry.reference.clone(),
                    ready: entry.ready,
                },
                anchors: Anchors {
                    assembled: assembled[i],
                    scattered: scattered[i],
                    initial: initial[i],
                },
                scale_factor: self.layout.photo_scale,
                spin_rates: Vec3::ZERO,
            };
            self.objects.push(object);
        }

        tracing::debug!(count, "Rebuilt photo objects");
    }

    /// Give every photo a fresh scattered anchor
    pub fn reshuffle_photos(&mut self) {
        let count = self.photo_count();
        if count == 0 {
            return;
        }
        let seed = self.next_seed();
        let scattered = scatter_layout(count, seed, &self.layout);
        let start = self.primitive_count;
        for (object, anchor) in self.objects[start..].iter_mut().zip(scattered) {
            object.anchors.scattered = anchor;
        }
    }

    /// Clear everything and rebuild the primitives; photos must be re-synced
    pub fn reset(&mut self) {
        self.objects.clear();
        self.primitive_count = 0;
        self.populate_primitives();
    }

    pub fn objects(&self) -> &[ManagedObject] {
        &self.objects
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn primitive_count(&self) -> usize {
        self.primitive_count
    }

    pub fn photo_count(&self) -> usize {
        self.objects.len() - self.primitive_count
    }

    /// Photo objects in list order
    pub fn photos(&self) -> &[ManagedObject] {
        &self.objects[self.primitive_count..]
    }

    /// Photo object at a photo-list index
    pub fn photo(&self, index: usize) -> Option<&ManagedObject> {
        self.photos().get(index)
    }

    /// Whether the photo at `index` exists and has loaded
    pub fn is_photo_ready(&self, index: usize) -> bool {
        self.photo(index).is_some_and(|o| o.is_renderable())
    }

    /// Index of the first loaded photo
    pub fn first_ready_photo(&self) -> Option<usize> {
        self.photos().iter().position(|o| o.is_renderable())
    }
}
