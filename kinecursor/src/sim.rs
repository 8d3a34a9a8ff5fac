//! Simulated sensor, driven from the viewer window.
//!
//! The viewer forwards raw mouse/keyboard state as [`SimInput`]s; the
//! [`SimFrameSource`] thread folds them into a [`SimPose`] and renders a
//! skeleton frame plus a depth frame from it at the configured rate. The
//! rest of the app cannot tell these frames from real sensor output.
//!
//! Hands move toward their target depth at a fixed speed rather than
//! jumping, the way a real arm does. The classifier's proximity test relies
//! on that continuity.

use std::sync::mpsc::{Receiver, Sender, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

use depth_stream::{
    DepthFrame, DepthLayout, FrameError, FrameSource, Joint, JointSample, SceneBuilder,
    SensorFrame, Skeleton,
};
use fist_gesture::{CursorConfig, HandSide, TrackerConfig};
use serde::{Deserialize, Serialize};

// ════════════════════════════════════════════════════════════════════════════
// SimConfig
// ════════════════════════════════════════════════════════════════════════════

/// Shape of the simulated scene. Depths are in millimetres, which is also
/// the sensor's depth unit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub fps:             u32,
    pub body_depth:      u16,
    /// Hand depth when fully reached out.
    pub reach_depth:     u16,
    /// Max hand travel per frame.
    pub reach_speed:     u16,
    pub open_hand_width: usize,
    pub fist_width:      usize,
    pub floor_far:       u16,
    pub floor_near:      u16,
}

impl Default for SimConfig {
    fn default() -> Self {
        SimConfig {
            fps:             30,
            body_depth:      2200,
            reach_depth:     1750,
            reach_speed:     40,
            open_hand_width: 10,
            fist_width:      30,
            floor_far:       3800,
            floor_near:      1400,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// SimInput / SimPose
// ════════════════════════════════════════════════════════════════════════════

/// Raw input from the viewer window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SimInput {
    /// Pointer position, normalised to 0.0–1.0 across the window.
    Pointer { x: f32, y: f32 },
    Reach { side: HandSide, out: bool },
    Fist(bool),
    /// Deliver the next depth frame as dropped.
    DropFrame,
    Quit,
}

/// The simulated user's body state.
#[derive(Clone, Debug, PartialEq)]
pub struct SimPose {
    pub pointer:     (f32, f32),
    pub right_out:   bool,
    pub left_out:    bool,
    pub fist:        bool,
    pub right_depth: u16,
    pub left_depth:  u16,
    drop_next:       bool,
}

impl SimPose {
    /// Standing still, both hands at the body's depth.
    pub fn at_rest(cfg: &SimConfig) -> Self {
        SimPose {
            pointer:     (0.5, 0.5),
            right_out:   false,
            left_out:    false,
            fist:        false,
            right_depth: cfg.body_depth,
            left_depth:  cfg.body_depth,
            drop_next:   false,
        }
    }

    pub fn apply(&mut self, input: SimInput) {
        match input {
            SimInput::Pointer { x, y } => self.pointer = (x.clamp(0.0, 1.0), y.clamp(0.0, 1.0)),
            SimInput::Reach { side: HandSide::Right, out } => self.right_out = out,
            SimInput::Reach { side: HandSide::Left,  out } => self.left_out  = out,
            SimInput::Fist(closed) => self.fist = closed,
            SimInput::DropFrame    => self.drop_next = true,
            SimInput::Quit         => {}
        }
    }

    /// Move each hand one step toward its target depth.
    pub fn advance(&mut self, cfg: &SimConfig) {
        let step = |current: u16, out: bool| {
            let target = (if out { cfg.reach_depth } else { cfg.body_depth }) as i32;
            let delta = (target - current as i32).clamp(-(cfg.reach_speed as i32), cfg.reach_speed as i32);
            (current as i32 + delta) as u16
        };
        self.right_depth = step(self.right_depth, self.right_out);
        self.left_depth  = step(self.left_depth,  self.left_out);
    }

    /// Hand the pointer steers: right if it is out, else left if out.
    fn steering(&self) -> Option<HandSide> {
        if self.right_out {
            Some(HandSide::Right)
        } else if self.left_out {
            Some(HandSide::Left)
        } else {
            None
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// SimScene: pose → frames
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug)]
pub struct SimScene {
    pub cfg:    SimConfig,
    width:      usize,
    height:     usize,
    layout:     DepthLayout,
    cursor:     CursorConfig,
}

impl SimScene {
    pub fn new(cfg: SimConfig, tracker: &TrackerConfig) -> Self {
        SimScene {
            cfg,
            width:  tracker.classifier.width,
            height: tracker.classifier.height,
            layout: tracker.classifier.layout,
            cursor: tracker.cursor.clone(),
        }
    }

    fn shoulder(&self) -> JointSample {
        JointSample::new(0.0, 0.35, self.cfg.body_depth as f32 / 1000.0)
    }

    /// Sensor-space position of a hand. The steering hand is placed so the
    /// cursor mapper lands on the pointer; the other hangs at its side.
    fn hand(&self, pose: &SimPose, side: HandSide) -> JointSample {
        let s = self.shoulder();
        let depth = match side {
            HandSide::Right => pose.right_depth,
            HandSide::Left  => pose.left_depth,
        };
        let z = depth as f32 / 1000.0;

        if pose.steering() != Some(side) {
            let x = match side {
                HandSide::Right => s.x + 0.25,
                HandSide::Left  => s.x - 0.25,
            };
            return JointSample::new(x, s.y - 0.45, z);
        }

        let bias = match side {
            HandSide::Right => self.cursor.bias_right,
            HandSide::Left  => self.cursor.bias_left,
        };
        let (px, py) = pose.pointer;
        JointSample::new(
            s.x + px * self.cursor.fov_divisor - bias,
            s.y - py * self.cursor.fov_divisor,
            z,
        )
    }

    pub fn skeleton(&self, pose: &SimPose) -> Skeleton {
        Skeleton::tracked()
            .with_joint(Joint::ShoulderCenter, self.shoulder())
            .with_joint(Joint::HandRight, self.hand(pose, HandSide::Right))
            .with_joint(Joint::HandLeft, self.hand(pose, HandSide::Left))
    }

    pub fn depth_frame(&self, pose: &SimPose) -> Result<DepthFrame, FrameError> {
        let (w, h) = (self.width, self.height);
        let body = self.cfg.body_depth;

        // torso and head
        let torso_w = w / 5;
        let torso_x = (w - torso_w) / 2;
        let head_w  = torso_w / 2;
        let mut scene = SceneBuilder::new(w, h, self.layout)
            .floor(self.cfg.floor_far, self.cfg.floor_near)
            .rect(torso_x, h / 4, torso_w, h - h / 4, 1, body)
            .rect((w - head_w) / 2, (h / 4).saturating_sub(head_w), head_w, head_w, 1, body);

        for side in [HandSide::Left, HandSide::Right] {
            let depth = match side {
                HandSide::Right => pose.right_depth,
                HandSide::Left  => pose.left_depth,
            };
            let (x, y, hw, hh) = if pose.steering() == Some(side) {
                let (px, py) = pose.pointer;
                let (hw, hh) = if pose.fist { (self.cfg.fist_width, 20) } else { (self.cfg.open_hand_width, 28) };
                let cx = (px * w as f32) as usize;
                let cy = (py * h as f32) as usize;
                (cx.saturating_sub(hw / 2), cy.saturating_sub(hh / 2), hw, hh)
            } else {
                let x = match side {
                    HandSide::Left  => torso_x.saturating_sub(14),
                    HandSide::Right => torso_x + torso_w + 2,
                };
                (x, h * 3 / 5, 12, 16)
            };
            scene = scene.rect(x, y, hw, hh, 1, depth);
        }

        scene.build()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// SimFrameSource
// ════════════════════════════════════════════════════════════════════════════

/// Frame source fed by [`SimInput`]s from the viewer window.
pub struct SimFrameSource {
    pub rx:    Receiver<SimInput>,
    pub scene: SimScene,
}

impl FrameSource for SimFrameSource {
    fn run(self: Box<Self>, tx: Sender<SensorFrame>) {
        let cfg = self.scene.cfg.clone();
        let period = Duration::from_secs_f64(1.0 / cfg.fps.max(1) as f64);
        let mut pose = SimPose::at_rest(&cfg);

        loop {
            let started = Instant::now();

            loop {
                match self.rx.try_recv() {
                    Ok(SimInput::Quit) | Err(TryRecvError::Disconnected) => return,
                    Ok(input) => pose.apply(input),
                    Err(TryRecvError::Empty) => break,
                }
            }
            pose.advance(&cfg);

            let skeletons = vec![self.scene.skeleton(&pose)];
            if tx.send(SensorFrame::Skeletons(Some(skeletons))).is_err() {
                return;
            }

            let depth = if std::mem::take(&mut pose.drop_next) {
                None
            } else {
                match self.scene.depth_frame(&pose) {
                    Ok(frame) => Some(frame),
                    Err(e) => {
                        log::error!("simulated scene is unusable: {}", e);
                        return;
                    }
                }
            };
            if tx.send(SensorFrame::Depth(depth)).is_err() {
                return;
            }

            if let Some(rest) = period.checked_sub(started.elapsed()) {
                thread::sleep(rest);
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
