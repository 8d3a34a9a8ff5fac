//! Tracked skeletons and their joints.

use serde::{Deserialize, Serialize};

// ════════════════════════════════════════════════════════════════════════════
// Joint
// ════════════════════════════════════════════════════════════════════════════

/// Joints the cursor pipeline reads.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Joint {
    ShoulderCenter,
    HandLeft,
    HandRight,
}

impl Joint {
    pub const COUNT: usize = 3;

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn name(&self) -> &'static str {
        match self {
            Joint::ShoulderCenter => "shoulder-center",
            Joint::HandLeft       => "hand-left",
            Joint::HandRight      => "hand-right",
        }
    }
}

/// Joint position in sensor space (meters; +z points away from the sensor).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct JointSample {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl JointSample {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        JointSample { x, y, z }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Skeleton
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrackingState {
    NotTracked,
    /// Only a coarse body position is known; joints are not valid.
    PositionOnly,
    Tracked,
}

/// One body reported by the sensor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Skeleton {
    pub tracking: TrackingState,
    joints:       [Option<JointSample>; Joint::COUNT],
}

impl Skeleton {
    pub fn new(tracking: TrackingState) -> Self {
        Skeleton { tracking, joints: [None; Joint::COUNT] }
    }

    /// Fully tracked skeleton with no joints yet; add them with [`Skeleton::with_joint`].
    pub fn tracked() -> Self {
        Skeleton::new(TrackingState::Tracked)
    }

    pub fn with_joint(mut self, joint: Joint, sample: JointSample) -> Self {
        self.set_joint(joint, sample);
        self
    }

    pub fn set_joint(&mut self, joint: Joint, sample: JointSample) {
        self.joints[joint.index()] = Some(sample);
    }

    pub fn is_tracked(&self) -> bool {
        self.tracking == TrackingState::Tracked
    }

    /// Position of `joint`. Always `None` unless the skeleton is tracked.
    pub fn joint(&self, joint: Joint) -> Option<JointSample> {
        if !self.is_tracked() {
            return None;
        }
        self.joints[joint.index()]
    }
}
