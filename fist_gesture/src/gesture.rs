//! Fist detection.
//!
//! The detector runs once per depth frame, after the classifier's scan. It
//! compares the number of distinct hand columns against a threshold that
//! shrinks as the hand moves away from the sensor, and turns the resulting
//! fist state into press/release edges.

use crate::classifier::FrameMeasurement;
use crate::config::{GestureConfig, HandDepthSource};

// ════════════════════════════════════════════════════════════════════════════
// ButtonEdge / GestureDecision
// ════════════════════════════════════════════════════════════════════════════

/// A primary-button transition to forward to the output sink.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ButtonEdge {
    Press,
    Release,
}

/// Everything `finalize` decided about one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureDecision {
    pub is_fist:         bool,
    pub hand_columns:    usize,
    /// `None` when the frame had no hand pixels.
    pub width_separator: Option<f32>,
    pub edge:            Option<ButtonEdge>,
}

// ════════════════════════════════════════════════════════════════════════════
// GestureState
// ════════════════════════════════════════════════════════════════════════════

/// State carried from one frame to the next.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GestureState {
    /// Closest foreground depth of the last finalized frame.
    pub previous_closest_depth: u16,
    pub is_fist:                bool,
    /// Mirrors the last edge sent to the sink.
    pub button_down:            bool,
}

impl GestureState {
    pub fn new(max_depth: u16) -> Self {
        GestureState {
            previous_closest_depth: max_depth,
            is_fist:                false,
            button_down:            false,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// GestureDetector
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug)]
pub struct GestureDetector {
    cfg:       GestureConfig,
    max_depth: u16,
    state:     GestureState,
}

impl GestureDetector {
    pub fn new(cfg: GestureConfig, max_depth: u16) -> Self {
        GestureDetector { cfg, max_depth, state: GestureState::new(max_depth) }
    }

    pub fn state(&self) -> &GestureState {
        &self.state
    }

    /// Column count a hand at `hand_depth` must exceed to count as a fist.
    pub fn width_separator(&self, hand_depth: u16) -> f32 {
        (self.max_depth as f32 - hand_depth as f32) / self.cfg.fist_divisor - self.cfg.fist_offset
    }

    /// Close out one frame. Must be called exactly once per classified frame.
    pub fn finalize(&mut self, m: &FrameMeasurement) -> GestureDecision {
        // Seeds the proximity test of the *next* frame.
        self.state.previous_closest_depth = m.closest_foreground_depth;

        let hand_depth = match self.cfg.hand_depth {
            HandDepthSource::FirstColumn => m.first_hand_depth,
            HandDepthSource::Nearest     => m.nearest_hand_depth,
        };
        let width_separator = hand_depth.map(|d| self.width_separator(d));
        let hand_columns = m.hand_columns.len();

        let is_fist = match width_separator {
            Some(sep) => hand_columns as f32 > sep,
            None      => false,
        };
        self.state.is_fist = is_fist;

        let edge = match (is_fist, self.state.button_down) {
            (true, false) => {
                self.state.button_down = true;
                Some(ButtonEdge::Press)
            }
            (false, true) => {
                self.state.button_down = false;
                Some(ButtonEdge::Release)
            }
            _ => None,
        };

        GestureDecision { is_fist, hand_columns, width_separator, edge }
    }

    /// Forget all carried state. Returns a release edge if the button was
    /// left down, so the sink never ends up with a stuck press.
    pub fn reset(&mut self) -> Option<ButtonEdge> {
        let was_down = self.state.button_down;
        self.state = GestureState::new(self.max_depth);
        was_down.then_some(ButtonEdge::Release)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
