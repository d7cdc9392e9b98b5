//! Display mode state machine
//!
//! Reacts to edges of the debounced gesture. Holding a gesture does nothing
//! after the frame it first appeared on.

use crate::tracking::Gesture;

/// Coarse scene layout
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DisplayMode {
    /// Objects gathered into the formation
    #[default]
    Assembled,
    /// Objects floating freely
    Scattered,
    /// One photo pulled up close
    Focused,
}

impl DisplayMode {
    /// Label for status display
    pub fn label(&self) -> &'static str {
        match self {
            DisplayMode::Assembled => "Assembled",
            DisplayMode::Scattered => "Scattered",
            DisplayMode::Focused => "Focused",
        }
    }
}

/// A mode change caused by a gesture edge
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ModeTransition {
    pub from: DisplayMode,
    pub to: DisplayMode,
    pub gesture: Gesture,
}

/// Current display mode plus the last gesture seen, for edge detection
#[derive(Debug, Clone, Default)]
pub struct ModeStateMachine {
    mode: DisplayMode,
    last_gesture: Gesture,
}

impl ModeStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    /// Feed the debounced gesture for this capture tick.
    ///
    /// `has_photos` (at least one loaded photo) gates focusing. Returns the
    /// transition, if one fired.
    pub fn observe(&mut self, gesture: Gesture, has_photos: bool) -> Option<ModeTransition> {
        if gesture == self.last_gesture {
            return None;
        }
        self.last_gesture = gesture;

        let next = match (gesture, self.mode) {
            (Gesture::Fist, mode) if mode != DisplayMode::Assembled => DisplayMode::Assembled,
            (Gesture::OpenPalm, mode) if mode != DisplayMode::Scattered => DisplayMode::Scattered,
            (Gesture::TwoFingers, DisplayMode::Scattered) if has_photos => DisplayMode::Focused,
            _ => return None,
        };

        let transition = ModeTransition {
            from: self.mode,
            to: next,
            gesture,
        };
        self.mode = next;
        Some(transition)
    }

    /// Return to the initial mode and forget the last gesture
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
