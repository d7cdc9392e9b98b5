//! Gesture classification
//!
//! Maps a single frame's landmarks to a discrete gesture. A finger counts as
//! folded when its tip is closer to the wrist than `FOLD_RATIO` times its
//! PIP joint. Both distances share the wrist as origin, so the test holds at
//! any hand size or camera distance.

use super::landmarks::{Finger, LandmarkSet};

/// Tip-to-wrist over PIP-to-wrist ratio below which a finger is folded
pub const FOLD_RATIO: f32 = 1.1;

/// Discrete hand gesture
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Gesture {
    /// No hand
    #[default]
    None,
    Fist,
    OpenPalm,
    /// Index and middle extended, ring and pinky folded
    TwoFingers,
}

impl Gesture {
    /// Label for status display
    pub fn label(&self) -> &'static str {
        match self {
            Gesture::None => "None",
            Gesture::Fist => "Fist",
            Gesture::OpenPalm => "Open Palm",
            Gesture::TwoFingers => "Two Fingers",
        }
    }
}

/// Fold state of the four non-thumb fingers, index first
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FoldState {
    pub folded: [bool; 4],
}

impl FoldState {
    /// Measure every finger of a landmark set
    pub fn measure(hand: &LandmarkSet) -> Self {
        let mut folded = [false; 4];
        for (slot, finger) in folded.iter_mut().zip(Finger::ALL) {
            *slot = finger_folded(hand, finger);
        }
        Self { folded }
    }

    pub fn is_folded(&self, finger: Finger) -> bool {
        self.folded[finger as usize]
    }

    pub fn count(&self) -> usize {
        self.folded.iter().filter(|&&f| f).count()
    }

    /// Peace sign: index and middle up, ring and pinky down
    pub fn is_two_fingers(&self) -> bool {
        !self.is_folded(Finger::Index)
            && !self.is_folded(Finger::Middle)
            && self.is_folded(Finger::Ring)
            && self.is_folded(Finger::Pinky)
    }

    /// Gesture for this fold pattern; first matching rule wins
    pub fn gesture(&self) -> Gesture {
        if self.is_two_fingers() {
            return Gesture::TwoFingers;
        }
        if self.count() >= 3 {
            Gesture::Fist
        } else {
            // Two folded fingers outside the peace pattern are ambiguous and read as open.
            Gesture::OpenPalm
        }
    }
}

/// Whether a finger's tip has curled back toward the wrist
pub fn finger_folded(hand: &LandmarkSet, finger: Finger) -> bool {
    let wrist = hand.wrist();
    let tip = hand.get(finger.tip()).distance(wrist);
    let pip = hand.get(finger.pip()).distance(wrist);
    tip < FOLD_RATIO * pip
}

/// Classify one frame; `None` means no hand was detected
pub fn classify(hand: Option<&LandmarkSet>) -> Gesture {
    match hand {
        Some(hand) => FoldState::measure(hand).gesture(),
        None => Gesture::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo::{synthetic_hand, HandShape};

    fn hand(folded: [bool; 4], thumb_extended: bool) -> LandmarkSet {
        synthetic_hand(HandShape { folded, thumb_extended }, 0.5, 0.5, 1.0)
    }

    #[test]
    fn test_absent_is_none() {
        assert_eq!(classify(None), Gesture::None);
    }

    #[test]
    fn test_open_palm() {
        assert_eq!(classify(Some(&hand([false; 4], true))), Gesture::OpenPalm);
        // One folded finger is still an open palm
        for i in 0..4 {
            let mut folded = [false; 4];
            folded[i] = true;
            assert_eq!(classify(Some(&hand(folded, false))), Gesture::OpenPalm);
        }
    }

    #[test]
    fn test_fist() {
        assert_eq!(classify(Some(&hand([true; 4], false))), Gesture::Fist);
        // Any three folded fingers
        for i in 0..4 {
            let mut folded = [true; 4];
            folded[i] = false;
            assert_eq!(classify(Some(&hand(folded, true))), Gesture::Fist);
        }
    }

    #[test]
    fn test_two_fingers_ignores_thumb() {
        let peace = [false, false, true, true];
        assert_eq!(classify(Some(&hand(peace, true))), Gesture::TwoFingers);
        assert_eq!(classify(Some(&hand(peace, false))), Gesture::TwoFingers);
    }

    #[test]
    fn test_two_folded_fallback_is_open_palm() {
        let patterns = [
            [true, true, false, false],
            [true, false, true, false],
            [false, true, false, true],
            [true, false, false, true],
            [false, true, true, false],
        ];
        for folded in patterns {
            assert_eq!(classify(Some(&hand(folded, true))), Gesture::OpenPalm, "{folded:?}");
        }
    }

    #[test]
    fn test_scale_invariant() {
        let peace = HandShape {
            folded: [false, false, true, true],
            thumb_extended: true,
        };
        for scale in [0.3, 0.6, 1.0, 1.5] {
            let set = synthetic_hand(peace, 0.4, 0.6, scale);
            assert_eq!(classify(Some(&set)), Gesture::TwoFingers);
        }
    }

    #[test]
    fn test_fold_state_count() {
        let state = FoldState::measure(&hand([true, false, true, false], true));
        assert_eq!(state.count(), 2);
        assert!(state.is_folded(Finger::Index));
        assert!(!state.is_folded(Finger::Middle));
    }
}
