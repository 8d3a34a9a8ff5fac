//! Per-session frame pipeline.
//!
//! [`Session`] owns everything that persists between frames: the gesture
//! state, the hand-tracking context, and the output sink. Frames go in one at
//! a time through `&mut self`, so two frames can never be processed at once.
//!
//! ```text
//!  depth frame ──► DepthClassifier ──► GestureDetector::finalize ──► press / release
//!                       ▲                                                 │
//!                       │ armed                                           ▼
//!  skeletons ───► CursorMapper ─────────────────────────────────────► OutputSink
//! ```

use depth_stream::{DepthFrame, SensorFrame, Skeleton};

use crate::classifier::DepthClassifier;
use crate::config::TrackerConfig;
use crate::cursor::{CursorMapper, CursorTarget, HandTrackingContext};
use crate::error::TrackerError;
use crate::gesture::{ButtonEdge, GestureDecision, GestureDetector, GestureState};
use crate::sink::OutputSink;

/// What a processed depth frame hands back to the display side.
#[derive(Clone, Debug)]
pub struct DepthOutcome {
    /// BGR0 visualization; ownership passes to the caller.
    pub pixels:   Vec<u8>,
    pub decision: GestureDecision,
}

pub struct Session<S: OutputSink> {
    classifier: DepthClassifier,
    detector:   GestureDetector,
    mapper:     CursorMapper,
    context:    HandTrackingContext,
    sink:       S,
}

impl<S: OutputSink> Session<S> {
    pub fn new(cfg: TrackerConfig, sink: S) -> Result<Self, TrackerError> {
        cfg.validate()?;
        let max_depth = cfg.classifier.max_depth;
        Ok(Session {
            classifier: DepthClassifier::new(cfg.classifier),
            detector:   GestureDetector::new(cfg.gesture, max_depth),
            mapper:     CursorMapper::new(cfg.cursor),
            context:    HandTrackingContext::default(),
            sink,
        })
    }

    // ── frame entry points ────────────────────────────────────────────────

    /// Process one depth frame.
    ///
    /// `None` (a frame the sensor dropped) is a no-op. A frame of the wrong
    /// shape is rejected before any state changes.
    pub fn on_depth_frame(
        &mut self,
        frame: Option<&DepthFrame>,
    ) -> Result<Option<DepthOutcome>, TrackerError> {
        let frame = match frame {
            Some(f) => f,
            None => {
                log::debug!("depth frame dropped by sensor");
                return Ok(None);
            }
        };

        let previous = self.detector.state().previous_closest_depth;
        let classified = self.classifier.classify(frame, &self.context, previous)?;
        let decision = self.detector.finalize(&classified.measurement);

        if let Some(edge) = decision.edge {
            match edge {
                ButtonEdge::Press => log::info!(
                    "fist closed: {} columns > {:.1}, pressing",
                    decision.hand_columns,
                    decision.width_separator.unwrap_or(f32::INFINITY),
                ),
                ButtonEdge::Release => log::info!(
                    "fist opened: {} columns, releasing", decision.hand_columns
                ),
            }
            self.sink.apply_edge(edge);
        }

        Ok(Some(DepthOutcome { pixels: classified.pixels, decision }))
    }

    /// Process one skeleton frame. `None` is a no-op; an empty list disarms.
    pub fn on_skeleton_frame(&mut self, skeletons: Option<&[Skeleton]>) -> Option<CursorTarget> {
        let skeletons = match skeletons {
            Some(s) => s,
            None => {
                log::debug!("skeleton frame dropped by sensor");
                return None;
            }
        };

        let before = self.context;
        let target = self.mapper.update(skeletons, &mut self.context);
        if self.context != before {
            match self.context.active_side {
                Some(side) => log::debug!("hand tracking armed ({} hand)", side.name()),
                None       => log::debug!("hand tracking disarmed"),
            }
        }

        if let Some(t) = target {
            self.sink.move_cursor(t.x, t.y);
        }
        target
    }

    /// Route a [`SensorFrame`] to the matching entry point.
    pub fn handle(&mut self, frame: SensorFrame) -> Result<Option<DepthOutcome>, TrackerError> {
        match frame {
            SensorFrame::Depth(depth) => self.on_depth_frame(depth.as_ref()),
            SensorFrame::Skeletons(skeletons) => {
                self.on_skeleton_frame(skeletons.as_deref());
                Ok(None)
            }
        }
    }

    /// Start over after a sensor restart. A held button is released first.
    pub fn reset(&mut self) {
        if let Some(edge) = self.detector.reset() {
            log::info!("session reset with button held, releasing");
            self.sink.apply_edge(edge);
        }
        self.context = HandTrackingContext::default();
    }

    // ── accessors ─────────────────────────────────────────────────────────

    pub fn context(&self)       -> &HandTrackingContext { &self.context }
    pub fn gesture_state(&self) -> &GestureState        { self.detector.state() }
    pub fn sink(&self)          -> &S                   { &self.sink }

    pub fn frame_size(&self) -> (usize, usize) {
        let c = self.classifier.config();
        (c.width, c.height)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClassifierConfig;
    use crate::sink::{NullSink, RecordingSink, SinkEvent};
    use approx::assert_relative_eq;
    use depth_stream::{DepthLayout, Joint, JointSample, SceneBuilder};

    const W: usize = 320;
    const H: usize = 240;

    fn session() -> Session<RecordingSink> {
        Session::new(TrackerConfig::default(), RecordingSink::default()).unwrap()
    }

    fn scene() -> SceneBuilder {
        SceneBuilder::new(W, H, DepthLayout::KINECT).background(3500)
    }

    fn reaching_right() -> Vec<Skeleton> {
        vec![Skeleton::tracked()
            .with_joint(Joint::ShoulderCenter, JointSample::new(0.0, 0.3, 2.0))
            .with_joint(Joint::HandRight, JointSample::new(0.1, 0.2, 1.5))
            .with_joint(Joint::HandLeft, JointSample::new(-0.2, 0.0, 2.0))]
    }

    fn at_rest() -> Vec<Skeleton> {
        vec![Skeleton::tracked()
            .with_joint(Joint::ShoulderCenter, JointSample::new(0.0, 0.3, 2.0))
            .with_joint(Joint::HandRight, JointSample::new(0.2, 0.0, 2.0))
            .with_joint(Joint::HandLeft, JointSample::new(-0.2, 0.0, 2.0))]
    }

    fn depth(s: &mut Session<RecordingSink>, frame: &DepthFrame) -> DepthOutcome {
        s.on_depth_frame(Some(frame)).unwrap().unwrap()
    }

    #[test]
    fn white_background_frame_emits_nothing() {
        let mut s = session();
        s.on_skeleton_frame(Some(&reaching_right()));
        let frame = SceneBuilder::new(W, H, DepthLayout::KINECT).background(800).build().unwrap();
        let out = depth(&mut s, &frame);
        assert!(out.pixels.chunks_exact(4).all(|px| px[..3] == [255u8, 255, 255]));
        assert_eq!(out.decision.hand_columns, 0);
        assert!(s.sink().buttons().is_empty());
    }

    #[test]
    fn single_pixel_is_open_hand() {
        let mut s = session();
        s.on_skeleton_frame(Some(&reaching_right()));
        // seed previous closest = 960
        depth(&mut s, &scene().pixel(0, 0, 1, 960).build().unwrap());
        assert_eq!(s.gesture_state().previous_closest_depth, 960);

        let out = depth(&mut s, &scene().pixel(200, 100, 1, 1000).build().unwrap());
        assert_eq!(out.decision.hand_columns, 1);
        assert_relative_eq!(out.decision.width_separator.unwrap(), 27.615385, epsilon = 1e-4);
        assert!(!out.decision.is_fist);
        assert!(s.sink().buttons().is_empty());
    }

    #[test]
    fn wide_blob_presses_then_releases() {
        let mut s = session();
        s.on_skeleton_frame(Some(&reaching_right()));
        let fist = scene().rect(100, 50, 40, 30, 1, 900).build().unwrap();
        let open = scene().rect(100, 50, 8, 30, 1, 900).build().unwrap();

        let out = depth(&mut s, &fist);
        assert_eq!(out.decision.hand_columns, 40);
        assert!(out.decision.is_fist);
        depth(&mut s, &fist);
        depth(&mut s, &open);
        depth(&mut s, &open);

        assert_eq!(s.sink().buttons(), vec![SinkEvent::Press, SinkEvent::Release]);
    }

    #[test]
    fn reaching_hand_moves_cursor() {
        let mut s = session();
        let t = s.on_skeleton_frame(Some(&reaching_right())).unwrap();
        assert_eq!(s.sink().events, vec![SinkEvent::Move { x: t.x, y: t.y }]);
        assert!(s.context().armed);
    }

    #[test]
    fn rest_pose_disarms_without_moving() {
        let mut s = session();
        s.on_skeleton_frame(Some(&reaching_right()));
        assert_eq!(s.on_skeleton_frame(Some(&at_rest())), None);
        assert!(!s.context().armed);
        assert_eq!(s.sink().events.len(), 1);
    }

    #[test]
    fn disarmed_frames_are_idempotent() {
        let mut s = session();
        let frame = scene().rect(100, 50, 60, 100, 1, 1500).build().unwrap();
        let a = depth(&mut s, &frame);
        let state = *s.gesture_state();
        let b = depth(&mut s, &frame);
        assert_eq!(a.pixels, b.pixels);
        assert_eq!(*s.gesture_state(), state);
        assert!(s.sink().events.is_empty());
    }

    #[test]
    fn dropped_frames_change_nothing() {
        let mut s = session();
        s.on_skeleton_frame(Some(&reaching_right()));
        depth(&mut s, &scene().rect(100, 50, 40, 30, 1, 900).build().unwrap());
        let (ctx, state, events) = (*s.context(), *s.gesture_state(), s.sink().events.clone());

        assert!(s.on_depth_frame(None).unwrap().is_none());
        assert_eq!(s.on_skeleton_frame(None), None);
        assert!(s.handle(SensorFrame::Depth(None)).unwrap().is_none());

        assert_eq!(*s.context(), ctx);
        assert_eq!(*s.gesture_state(), state);
        assert_eq!(s.sink().events, events);
    }

    #[test]
    fn wrong_shape_leaves_state_alone() {
        let mut s = session();
        depth(&mut s, &scene().pixel(5, 5, 1, 1234).build().unwrap());
        let state = *s.gesture_state();
        let small = SceneBuilder::new(80, 60, DepthLayout::KINECT).build().unwrap();
        assert!(matches!(
            s.on_depth_frame(Some(&small)),
            Err(TrackerError::FrameShape { .. })
        ));
        assert_eq!(*s.gesture_state(), state);
    }

    #[test]
    fn proximity_uses_previous_frame_closest() {
        let mut s = session();
        s.on_skeleton_frame(Some(&reaching_right()));
        // frame 1 establishes closest = 1500
        depth(&mut s, &scene().rect(0, 0, 10, 10, 1, 1500).build().unwrap());
        // frame 2: a body at 1500 and a hand at 1200. The hand is far nearer
        // than last frame's closest, the body is within the band, so both
        // count; the 1200 value only takes effect next frame.
        let f2 = scene()
            .rect(0, 100, 50, 10, 1, 1500)
            .rect(200, 20, 5, 5, 1, 1200)
            .build()
            .unwrap();
        assert_eq!(depth(&mut s, &f2).decision.hand_columns, 55);
        // frame 3: same scene, now only pixels below 1260 qualify
        assert_eq!(depth(&mut s, &f2).decision.hand_columns, 5);
    }

    #[test]
    fn reset_releases_and_disarms() {
        let mut s = session();
        s.on_skeleton_frame(Some(&reaching_right()));
        depth(&mut s, &scene().rect(100, 50, 40, 30, 1, 900).build().unwrap());
        s.reset();
        assert!(!s.context().armed);
        assert!(!s.gesture_state().button_down);
        assert_eq!(s.gesture_state().previous_closest_depth, 4095);
        assert_eq!(s.sink().buttons(), vec![SinkEvent::Press, SinkEvent::Release]);
    }

    #[test]
    fn small_frames_finalize_after_the_last_pixel() {
        let cfg = TrackerConfig {
            classifier: ClassifierConfig { width: 7, height: 5, ..ClassifierConfig::default() },
            ..TrackerConfig::default()
        };
        let mut s = Session::new(cfg, NullSink).unwrap();
        assert_eq!(s.frame_size(), (7, 5));

        let frame = SceneBuilder::new(7, 5, DepthLayout::KINECT)
            .background(3000)
            .pixel(6, 4, 1, 1111)
            .build()
            .unwrap();
        let out = s.on_depth_frame(Some(&frame)).unwrap().unwrap();
        assert_eq!(out.pixels.len(), 7 * 5 * 4);
        assert_eq!(&out.pixels[(7 * 5 - 1) * 4..], &[0u8, 0, 255, 0]);
        assert_eq!(s.gesture_state().previous_closest_depth, 1111);

        // the default-size frame no longer fits
        let wrong = scene().build().unwrap();
        assert!(matches!(s.on_depth_frame(Some(&wrong)), Err(TrackerError::FrameShape { .. })));
        assert_eq!(s.gesture_state().previous_closest_depth, 1111);
    }

    #[test]
    fn invalid_config_refuses_to_start() {
        let mut cfg = TrackerConfig::default();
        cfg.cursor.fov_divisor = 0.0;
        assert!(Session::new(cfg, RecordingSink::default()).is_err());
    }
}
