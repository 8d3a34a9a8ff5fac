//! # depth_stream
//!
//! Frame model for a segmenting depth sensor: packed 16-bit depth samples,
//! tracked skeletons with named joints, and the [`FrameSource`] interface
//! that delivers both to a consumer.
//!
//! Each depth sample packs two fields:
//!
//! | Bits | Field | Meaning |
//! |---|---|---|
//! | low `segment_bits` | segment tag | non-zero = pixel belongs to a tracked body |
//! | remaining high bits | depth magnitude | distance in sensor units, larger = farther |
//!
//! ## Quick start
//!
//! ```rust
//! use depth_stream::{DepthLayout, SceneBuilder};
//!
//! let layout = DepthLayout::KINECT;
//! let frame = SceneBuilder::new(320, 240, layout)
//!     .background(2500)
//!     .rect(100, 60, 80, 120, 1, 1800)   // body
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(frame.len(), 320 * 240);
//! assert_eq!(layout.decode(frame.get(120, 100).unwrap()), (1, 1800));
//! ```

pub mod sample;
pub mod frame;
pub mod skeleton;
pub mod scene;
pub mod source;

pub use sample::DepthLayout;
pub use frame::{DepthFrame, FrameError};
pub use skeleton::{Joint, JointSample, Skeleton, TrackingState};
pub use scene::SceneBuilder;
pub use source::{FrameSource, ReplaySource, SensorFrame, spawn_frame_source};

/// Frame width of the sensor's 320×240 depth mode.
pub const DEFAULT_WIDTH:  usize = 320;
/// Frame height of the sensor's 320×240 depth mode.
pub const DEFAULT_HEIGHT: usize = 240;
