//! Temporal stabilization of raw hand readings
//!
//! The pointer is smoothed with an exponential moving average and the gesture
//! is debounced with a majority vote over a short history. Losing the hand is
//! trusted immediately; regaining it has to win the vote.

use std::collections::VecDeque;

use glam::Vec2;

use super::classifier::Gesture;
use crate::config::TrackingConfig;

/// One unfiltered reading from the capture tick
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RawHandFrame {
    pub gesture: Gesture,
    pub x: f32,
    pub y: f32,
    pub present: bool,
}

impl RawHandFrame {
    /// A reading with a hand at normalized `(x, y)`
    pub fn present(gesture: Gesture, x: f32, y: f32) -> Self {
        Self {
            gesture,
            x,
            y,
            present: true,
        }
    }

    /// A reading with no hand
    pub fn absent() -> Self {
        Self {
            gesture: Gesture::None,
            x: 0.0,
            y: 0.0,
            present: false,
        }
    }
}

/// Stabilized hand state shared with every downstream consumer
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StabilizedHandState {
    /// Debounced gesture; always `None` while the hand is absent
    pub gesture: Gesture,
    /// Smoothed pointer in normalized image coordinates; frozen while absent
    pub position: Vec2,
    pub is_present: bool,
}

impl Default for StabilizedHandState {
    fn default() -> Self {
        Self {
            gesture: Gesture::None,
            position: Vec2::splat(0.5),
            is_present: false,
        }
    }
}

/// EMA pointer smoothing plus majority-vote gesture debouncing
#[derive(Debug, Clone)]
pub struct SignalStabilizer {
    /// Smoothing factor for the pointer
    alpha: f32,
    /// Raw gesture labels, oldest first
    history: VecDeque<Gesture>,
    /// History window length
    history_len: usize,
    /// Votes required to change the emitted gesture
    majority: usize,
    /// Last emitted state
    state: StabilizedHandState,
}

impl Default for SignalStabilizer {
    fn default() -> Self {
        Self::new(&TrackingConfig::default())
    }
}

impl SignalStabilizer {
    pub fn new(config: &TrackingConfig) -> Self {
        let history_len = config.history_len.max(1);
        Self {
            alpha: config.smoothing_alpha.clamp(0.0, 1.0),
            history: VecDeque::with_capacity(history_len + 1),
            history_len,
            majority: config.majority.clamp(1, history_len),
            state: StabilizedHandState::default(),
        }
    }

    /// Feed one raw reading and return the updated stabilized state
    pub fn update(&mut self, raw: RawHandFrame) -> StabilizedHandState {
        if !raw.present {
            self.history.clear();
            self.state.gesture = Gesture::None;
            self.state.is_present = false;
            return self.state;
        }

        let target = Vec2::new(raw.x, raw.y);
        self.state.position += (target - self.state.position) * self.alpha;
        self.state.is_present = true;

        self.history.push_back(raw.gesture);
        while self.history.len() > self.history_len {
            self.history.pop_front();
        }

        if let Some((gesture, votes)) = self.dominant() {
            if votes >= self.majority {
                self.state.gesture = gesture;
            }
        }

        self.state
    }

    /// Most frequent label in the history.
    ///
    /// Ties go to the label encountered first when walking oldest to newest.
    /// The rule is arbitrary but deterministic.
    fn dominant(&self) -> Option<(Gesture, usize)> {
        let mut best: Option<(Gesture, usize)> = None;
        for (i, &gesture) in self.history.iter().enumerate() {
            if self.history.iter().take(i).any(|&seen| seen == gesture) {
                continue;
            }
            let votes = self.history.iter().filter(|&&g| g == gesture).count();
            if best.map_or(true, |(_, most)| votes > most) {
                best = Some((gesture, votes));
            }
        }
        best
    }

    /// Current stabilized state
    pub fn state(&self) -> StabilizedHandState {
        self.state
    }

    /// Number of raw labels currently held
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Forget everything and return to the initial state
    pub fn reset(&mut self) {
        self.history.clear();
        self.state = StabilizedHandState::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(stabilizer: &mut SignalStabilizer, gestures: &[Gesture]) -> StabilizedHandState {
        let mut state = stabilizer.state();
        for &g in gestures {
            state = stabilizer.update(RawHandFrame::present(g, 0.5, 0.5));
        }
        state
    }

    #[test]
    fn test_identical_gestures_are_emitted() {
        let mut stabilizer = SignalStabilizer::default();
        let state = feed(&mut stabilizer, &[Gesture::Fist; 5]);
        assert_eq!(state.gesture, Gesture::Fist);
        assert!(state.is_present);
    }

    #[test]
    fn test_needs_three_votes() {
        let mut stabilizer = SignalStabilizer::default();
        assert_eq!(feed(&mut stabilizer, &[Gesture::Fist; 2]).gesture, Gesture::None);
        assert_eq!(feed(&mut stabilizer, &[Gesture::Fist]).gesture, Gesture::Fist);
    }

    #[test]
    fn test_alternating_retains_previous() {
        let mut stabilizer = SignalStabilizer::default();
        feed(&mut stabilizer, &[Gesture::OpenPalm; 5]);

        for g in [Gesture::Fist, Gesture::TwoFingers, Gesture::Fist, Gesture::TwoFingers] {
            let state = stabilizer.update(RawHandFrame::present(g, 0.5, 0.5));
            assert_eq!(state.gesture, Gesture::OpenPalm);
        }
    }

    #[test]
    fn test_history_is_bounded() {
        let mut stabilizer = SignalStabilizer::default();
        feed(&mut stabilizer, &[Gesture::OpenPalm; 12]);
        assert_eq!(stabilizer.history_len(), 5);

        // Three new labels evict enough old ones to win
        let state = feed(&mut stabilizer, &[Gesture::Fist; 3]);
        assert_eq!(state.gesture, Gesture::Fist);
    }

    #[test]
    fn test_presence_loss_is_immediate() {
        let mut stabilizer = SignalStabilizer::default();
        feed(&mut stabilizer, &[Gesture::Fist; 5]);

        let state = stabilizer.update(RawHandFrame::absent());
        assert_eq!(state.gesture, Gesture::None);
        assert!(!state.is_present);
        assert_eq!(stabilizer.history_len(), 0);

        // Regaining the hand must win the vote again
        let state = feed(&mut stabilizer, &[Gesture::Fist; 2]);
        assert_eq!(state.gesture, Gesture::None);
        assert!(state.is_present);
    }

    #[test]
    fn test_position_frozen_while_absent() {
        let mut stabilizer = SignalStabilizer::default();
        for _ in 0..10 {
            stabilizer.update(RawHandFrame::present(Gesture::OpenPalm, 0.9, 0.1));
        }
        let before = stabilizer.state().position;
        for _ in 0..10 {
            stabilizer.update(RawHandFrame::absent());
        }
        assert_eq!(stabilizer.state().position, before);
    }

    #[test]
    fn test_position_converges() {
        let mut stabilizer = SignalStabilizer::default();
        let target = Vec2::new(0.2, 0.8);
        // Error shrinks by 0.9 per tick: 0.43 * 0.9^60 < 1e-3
        for _ in 0..60 {
            stabilizer.update(RawHandFrame::present(Gesture::OpenPalm, target.x, target.y));
        }
        assert!(stabilizer.state().position.distance(target) < 1e-3);
    }

    #[test]
    fn test_first_step_is_alpha() {
        let mut stabilizer = SignalStabilizer::default();
        let state = stabilizer.update(RawHandFrame::present(Gesture::OpenPalm, 1.0, 0.5));
        assert!((state.position.x - 0.55).abs() < 1e-6);
        assert!((state.position.y - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_tie_goes_to_oldest_label() {
        let config = TrackingConfig {
            history_len: 4,
            majority: 2,
            ..TrackingConfig::default()
        };
        let mut stabilizer = SignalStabilizer::new(&config);
        let state = feed(
            &mut stabilizer,
            &[Gesture::TwoFingers, Gesture::Fist, Gesture::Fist, Gesture::TwoFingers],
        );
        assert_eq!(state.gesture, Gesture::TwoFingers);
    }

    #[test]
    fn test_reset() {
        let mut stabilizer = SignalStabilizer::default();
        feed(&mut stabilizer, &[Gesture::Fist; 5]);
        stabilizer.reset();
        assert_eq!(stabilizer.state(), StabilizedHandState::default());
        assert_eq!(stabilizer.history_len(), 0);
    }
}
