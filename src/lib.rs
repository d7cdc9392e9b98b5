//! Gesture Scene - hand-gesture driven 3D scene core
//!
//! Turns per-frame hand landmarks into a debounced gesture and a smoothed
//! pointer, switches the scene between assembled, scattered and focused
//! display modes, and animates every scene object toward its mode target.
//! Camera, landmark model and renderer are supplied by the host.

pub mod capture;
pub mod config;
pub mod demo;
pub mod error;
pub mod scene;
pub mod session;
pub mod telemetry;
pub mod tracking;

pub use config::SceneConfig;
pub use error::{Error, Result};
pub use session::{GestureScene, HandStatus, SceneFrame};
