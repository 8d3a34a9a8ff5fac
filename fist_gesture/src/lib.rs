//! # fist_gesture
//!
//! Turns a segmenting depth sensor's frames into pointer input: a hand pushed
//! out in front of the body steers the cursor, and closing that hand into a
//! fist holds the primary button.
//!
//! ## Per-frame pipeline
//!
//! | Stage | Input | Output |
//! |---|---|---|
//! | [`CursorMapper`] | tracked skeletons | cursor target, hand armed/disarmed |
//! | [`DepthClassifier`] | depth frame, armed flag, previous closest depth | BGR0 pixels, [`FrameMeasurement`] |
//! | [`GestureDetector`] | measurement | fist state, press/release edge |
//! | [`OutputSink`] | cursor target, edges | platform input |
//!
//! [`Session`] wires the stages together and owns the state that carries
//! between frames.
//!
//! ## Fist threshold
//!
//! A closed fist shows more distinct hand columns than an open hand pointing
//! at the sensor. Because a nearer hand covers more pixels, the column count
//! is compared against
//!
//! ```text
//! separator = (max_depth - hand_depth) / fist_divisor - fist_offset
//! ```
//!
//! which defaults to `(4095 - d) / 65 - 20`.
//!
//! ## Quick start
//!
//! ```rust
//! use fist_gesture::{RecordingSink, Session, TrackerConfig};
//! use depth_stream::{DepthLayout, SceneBuilder};
//!
//! let mut session = Session::new(TrackerConfig::default(), RecordingSink::default()).unwrap();
//! let frame = SceneBuilder::new(320, 240, DepthLayout::KINECT)
//!     .background(2500)
//!     .build()
//!     .unwrap();
//! let out = session.on_depth_frame(Some(&frame)).unwrap().unwrap();
//! assert_eq!(out.pixels.len(), 320 * 240 * 4);
//! assert!(!out.decision.is_fist);
//! ```

pub mod config;
pub mod error;
pub mod classifier;
pub mod gesture;
pub mod cursor;
pub mod sink;
pub mod session;

pub use config::{ClassifierConfig, CursorConfig, GestureConfig, HandDepthSource, TrackerConfig};
pub use error::TrackerError;
pub use classifier::{ClassifiedFrame, DepthClassifier, FrameMeasurement, HandColumns};
pub use gesture::{ButtonEdge, GestureDecision, GestureDetector, GestureState};
pub use cursor::{CursorMapper, CursorTarget, HandSide, HandTrackingContext};
pub use sink::{NullSink, OutputSink, RecordingSink, SinkEvent};
pub use session::{DepthOutcome, Session};
