//! Hand selection and cursor mapping.
//!
//! A hand takes control when it is pushed out in front of the shoulder
//! center. The right hand is checked first, so with both hands raised the
//! right one wins. That order is a policy, not something the geometry forces.

use depth_stream::{Joint, JointSample, Skeleton};

use crate::config::CursorConfig;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HandSide {
    Left,
    Right,
}

impl HandSide {
    pub fn joint(&self) -> Joint {
        match self {
            HandSide::Left  => Joint::HandLeft,
            HandSide::Right => Joint::HandRight,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            HandSide::Left  => "left",
            HandSide::Right => "right",
        }
    }
}

/// Whether the depth classifier should look for a hand this frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HandTrackingContext {
    pub armed:       bool,
    pub active_side: Option<HandSide>,
}

/// Absolute screen position requested for the cursor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CursorTarget {
    pub side: HandSide,
    pub x:    i32,
    pub y:    i32,
}

#[derive(Clone, Debug)]
pub struct CursorMapper {
    cfg: CursorConfig,
}

impl CursorMapper {
    pub fn new(cfg: CursorConfig) -> Self {
        CursorMapper { cfg }
    }

    pub fn config(&self) -> &CursorConfig {
        &self.cfg
    }

    /// True if `hand` is more than `reach_threshold` in front of `shoulder`.
    fn reaching(&self, hand: JointSample, shoulder: JointSample) -> bool {
        hand.z - shoulder.z < -self.cfg.reach_threshold
    }

    /// Pick the active hand: first tracked skeleton with a reaching hand,
    /// right before left.
    pub fn select(&self, skeletons: &[Skeleton]) -> Option<(HandSide, JointSample, JointSample)> {
        skeletons.iter().filter(|s| s.is_tracked()).find_map(|s| {
            let shoulder = s.joint(Joint::ShoulderCenter)?;
            [HandSide::Right, HandSide::Left].into_iter().find_map(|side| {
                let hand = s.joint(side.joint())?;
                self.reaching(hand, shoulder).then_some((side, hand, shoulder))
            })
        })
    }

    /// Screen coordinates for `hand` relative to `shoulder`.
    pub fn map(&self, side: HandSide, hand: JointSample, shoulder: JointSample) -> (i32, i32) {
        let bias = match side {
            HandSide::Right => self.cfg.bias_right,
            HandSide::Left  => self.cfg.bias_left,
        };
        let dx = hand.x - shoulder.x;
        // screen y grows downward, sensor y grows upward
        let dy = shoulder.y - hand.y;

        let w = self.cfg.screen_width as f32;
        let h = self.cfg.screen_height as f32;
        let mut x = ((dx + bias) / self.cfg.fov_divisor * w) as i32;
        let mut y = (dy / self.cfg.fov_divisor * h) as i32;

        if self.cfg.clamp_to_screen {
            x = clamp_axis(x, self.cfg.screen_width);
            y = clamp_axis(y, self.cfg.screen_height);
        }
        (x, y)
    }

    /// Process one skeleton frame: re-arm (or disarm) `context` and return
    /// the cursor target when a hand is active.
    pub fn update(
        &self,
        skeletons: &[Skeleton],
        context:   &mut HandTrackingContext,
    ) -> Option<CursorTarget> {
        match self.select(skeletons) {
            Some((side, hand, shoulder)) => {
                context.armed = true;
                context.active_side = Some(side);
                let (x, y) = self.map(side, hand, shoulder);
                Some(CursorTarget { side, x, y })
            }
            None => {
                context.armed = false;
                context.active_side = None;
                None
            }
        }
    }
}

/// Clamp to `0..extent`, widening so no extent can underflow or overflow.
fn clamp_axis(v: i32, extent: u32) -> i32 {
    let hi = (extent as i64 - 1).clamp(0, i32::MAX as i64);
    (v as i64).clamp(0, hi) as i32
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
