//! Scene module
//!
//! Display modes, the managed object population, anchor layouts, per-object
//! animation and pointer selection. Rendering itself belongs to the host,
//! which receives [`InstanceRaw`] transforms every frame.

pub mod animator;
pub mod camera;
pub mod instance;
pub mod layout;
pub mod mode;
pub mod objects;
pub mod selector;

pub use animator::{AnimatedTransform, AnimationContext, ObjectAnimator};
pub use camera::SceneCamera;
pub use instance::InstanceRaw;
pub use mode::{DisplayMode, ModeStateMachine, ModeTransition};
pub use objects::{
    Anchors, ManagedObject, ObjectId, ObjectKind, ObjectPayload, ObjectPopulation, PhotoEntry, PhotoRef,
    PrimitiveShape,
};
pub use selector::{ndc_from_pointer, PointerSelector, Selection};
