//! Top-level application: config, per-frame state, and the main loop.
//!
//! `AppState` owns the tracking [`Session`] and everything the viewer shows.
//! Frames arrive from the simulated sensor over a channel; the loop drains
//! them, then redraws.

use std::path::Path;
use std::sync::mpsc::{self, TryRecvError};

use anyhow::{Context, Result};
use minifb::Scale;
use serde::{Deserialize, Serialize};

use depth_stream::{spawn_frame_source, SensorFrame};
use fist_gesture::{OutputSink, Session, TrackerConfig};

use crate::output::open_output;
use crate::sim::{SimConfig, SimFrameSource, SimInput, SimScene};
use crate::viewer::{Indicators, Viewer};

// ════════════════════════════════════════════════════════════════════════════
// AppConfig
// ════════════════════════════════════════════════════════════════════════════

/// Configuration for the full application, loadable from RON.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub tracker:      TrackerConfig,
    pub sim:          SimConfig,
    /// Viewer magnification: 1, 2, 4, or 8.
    pub window_scale: u8,
    /// Log cursor output instead of moving the real pointer.
    pub dry_run:      bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            tracker:      TrackerConfig::default(),
            sim:          SimConfig::default(),
            window_scale: 2,
            dry_run:      false,
        }
    }
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let cfg: AppConfig = ron::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        cfg.tracker.validate().context("invalid tracker config")?;
        Ok(cfg)
    }

    pub fn to_ron(&self) -> Result<String> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .context("serialising config")
    }

    pub fn scale(&self) -> Scale {
        match self.window_scale {
            0 | 1 => Scale::X1,
            2     => Scale::X2,
            3..=4 => Scale::X4,
            _     => Scale::X8,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// AppState
// ════════════════════════════════════════════════════════════════════════════

pub struct AppState<S: OutputSink> {
    session:     Session<S>,
    last_pixels: Option<Vec<u8>>,
    last_fist:   bool,
    rejected:    usize,
    pub status:  String,
}

impl<S: OutputSink> AppState<S> {
    pub fn new(tracker: TrackerConfig, sink: S) -> Result<Self> {
        let session = Session::new(tracker, sink).context("starting tracking session")?;
        Ok(AppState {
            session,
            last_pixels: None,
            last_fist:   false,
            rejected:    0,
            status:      "IDLE: PUSH A HAND FORWARD".to_string(),
        })
    }

    // ── process one sensor frame ──────────────────────────────────────────

    pub fn handle_frame(&mut self, frame: SensorFrame) {
        match self.session.handle(frame) {
            Ok(Some(outcome)) => {
                self.last_fist = outcome.decision.is_fist;
                self.status = self.describe(&outcome.decision);
                self.last_pixels = Some(outcome.pixels);
            }
            Ok(None) => {}
            Err(e) => {
                self.rejected += 1;
                log::warn!("frame rejected: {}", e);
            }
        }
    }

    fn describe(&self, d: &fist_gesture::GestureDecision) -> String {
        match self.session.context().active_side {
            Some(side) => {
                let sep = d
                    .width_separator
                    .map_or_else(|| "-".to_string(), |s| format!("{:.1}", s));
                format!(
                    "ARMED {}  FIST: {}  COLS {} SEP {}",
                    side.name(), d.is_fist, d.hand_columns, sep
                )
            }
            None => "IDLE: PUSH A HAND FORWARD".to_string(),
        }
    }

    /// Start over as after a sensor restart.
    pub fn restart(&mut self) {
        self.session.reset();
        self.last_fist = false;
        self.status = "RESET".to_string();
    }

    // ── accessors for the render loop ─────────────────────────────────────

    pub fn pixels(&self) -> Option<&[u8]> { self.last_pixels.as_deref() }
    pub fn rejected(&self) -> usize       { self.rejected }
    pub fn session(&self) -> &Session<S>  { &self.session }

    pub fn indicators(&self) -> Indicators {
        Indicators {
            armed: self.session.context().active_side,
            fist:  self.last_fist,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// run(): the main application loop
// ════════════════════════════════════════════════════════════════════════════

/// Run the full application: simulated sensor, viewer, and output backend.
pub fn run(cfg: AppConfig) -> Result<()> {
    let sink = open_output(cfg.dry_run);
    let mut app = AppState::new(cfg.tracker.clone(), sink)?;
    let (width, height) = app.session().frame_size();

    // ── simulated sensor ──────────────────────────────────────────────────
    let (sim_tx, sim_rx) = mpsc::channel::<SimInput>();
    let scene = SimScene::new(cfg.sim.clone(), &cfg.tracker);
    let frames = spawn_frame_source(SimFrameSource { rx: sim_rx, scene });

    let mut viewer = Viewer::new(width, height, cfg.scale(), sim_tx)
        .map_err(|e| anyhow::anyhow!("opening viewer window: {}", e))?;
    log::info!("tracking {}x{} depth frames", width, height);

    // ── main loop ─────────────────────────────────────────────────────────
    'frames: while viewer.is_open() {
        if !viewer.poll_input() { break; }
        if viewer.reset_requested() {
            log::info!("restarting session");
            app.restart();
        }

        loop {
            match frames.try_recv() {
                Ok(frame) => app.handle_frame(frame),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    log::info!("sensor stream ended");
                    break 'frames;
                }
            }
        }

        viewer.render(app.pixels(), &app.status, app.indicators());
    }

    // never leave the button held on exit
    app.restart();
    if app.rejected() > 0 {
        log::warn!("{} frames were rejected", app.rejected());
    }
    Ok(())
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use depth_stream::{DepthFrame, Joint, JointSample, SceneBuilder, Skeleton};
    use fist_gesture::{HandSide, RecordingSink, SinkEvent};

    fn make_app() -> AppState<RecordingSink> {
        AppState::new(TrackerConfig::default(), RecordingSink::default()).unwrap()
    }

    fn reaching_right() -> SensorFrame {
        let s = Skeleton::tracked()
            .with_joint(Joint::ShoulderCenter, JointSample::new(0.0, 0.3, 2.0))
            .with_joint(Joint::HandRight, JointSample::new(0.1, 0.2, 1.5))
            .with_joint(Joint::HandLeft, JointSample::new(-0.2, 0.0, 2.0));
        SensorFrame::Skeletons(Some(vec![s]))
    }

    fn hand_frame(width: usize) -> SensorFrame {
        let f = SceneBuilder::new(320, 240, depth_stream::DepthLayout::KINECT)
            .background(3000)
            .rect(150, 100, width, 20, 1, 1500)
            .build()
            .unwrap();
        SensorFrame::Depth(Some(f))
    }

    #[test]
    fn status_reports_fist_state() {
        let mut app = make_app();
        app.handle_frame(reaching_right());
        app.handle_frame(hand_frame(40)); // seeds closest depth
        app.handle_frame(hand_frame(40));
        assert!(app.status.starts_with("ARMED right"), "{}", app.status);
        assert!(app.status.contains("FIST: true"), "{}", app.status);
        assert_eq!(app.indicators(), Indicators { armed: Some(HandSide::Right), fist: true });
        assert_eq!(app.pixels().map(|p| p.len()), Some(320 * 240 * 4));
    }

    #[test]
    fn idle_without_reaching_hand() {
        let mut app = make_app();
        app.handle_frame(SensorFrame::Skeletons(Some(vec![])));
        app.handle_frame(hand_frame(40));
        assert!(app.status.starts_with("IDLE"));
        assert_eq!(app.indicators(), Indicators::default());
    }

    #[test]
    fn wrong_size_frames_are_counted_not_fatal() {
        let mut app = make_app();
        let small = DepthFrame::filled(4, 4, 0).unwrap();
        app.handle_frame(SensorFrame::Depth(Some(small)));
        assert_eq!(app.rejected(), 1);
        assert!(app.pixels().is_none());
    }

    #[test]
    fn restart_releases_held_button() {
        let mut app = make_app();
        app.handle_frame(reaching_right());
        app.handle_frame(hand_frame(40));
        app.handle_frame(hand_frame(40));
        app.restart();
        assert_eq!(
            app.session().sink().buttons(),
            vec![SinkEvent::Press, SinkEvent::Release]
        );
        assert!(!app.indicators().fist);
    }

    #[test]
    fn config_round_trips_through_ron() {
        let cfg = AppConfig { window_scale: 4, dry_run: true, ..AppConfig::default() };
        let text = cfg.to_ron().unwrap();
        let back: AppConfig = ron::from_str(&text).unwrap();
        assert_eq!(back, cfg);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let cfg: AppConfig = ron::from_str("(dry_run: true, sim: (fps: 15))").unwrap();
        assert!(cfg.dry_run);
        assert_eq!(cfg.sim.fps, 15);
        assert_eq!(cfg.sim.body_depth, SimConfig::default().body_depth);
        assert_eq!(cfg.tracker, TrackerConfig::default());
    }

    #[test]
    fn scale_maps_to_nearest_supported() {
        let scale = |n| AppConfig { window_scale: n, ..AppConfig::default() }.scale();
        assert!(matches!(scale(1), Scale::X1));
        assert!(matches!(scale(2), Scale::X2));
        assert!(matches!(scale(3), Scale::X4));
        assert!(matches!(scale(16), Scale::X8));
    }
}
