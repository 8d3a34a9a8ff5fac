//! Frame sources.
//!
//! A source delivers [`SensorFrame`]s over a `mpsc` channel. The consumer
//! never learns whether frames came from hardware, a simulator, or a replay,
//! and it processes them one at a time on its own thread.

use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use crate::frame::DepthFrame;
use crate::skeleton::Skeleton;

/// One sensor callback's worth of data.
///
/// `None` payloads are frames the hardware announced but failed to deliver;
/// consumers treat them as no-ops.
#[derive(Clone, Debug, PartialEq)]
pub enum SensorFrame {
    Depth(Option<DepthFrame>),
    Skeletons(Option<Vec<Skeleton>>),
}

/// Anything that can deliver [`SensorFrame`]s over a channel.
///
/// `run` returns when the source is exhausted or the receiver hangs up;
/// dropping the sender is the end-of-stream signal.
pub trait FrameSource: Send + 'static {
    fn run(self: Box<Self>, tx: Sender<SensorFrame>);
}

/// Spawn a frame source on its own thread and return the receiving end.
pub fn spawn_frame_source<S: FrameSource>(source: S) -> Receiver<SensorFrame> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        Box::new(source).run(tx);
        log::debug!("frame source finished");
    });
    rx
}

/// Source that plays back a fixed list of frames, then hangs up.
#[derive(Clone, Debug, Default)]
pub struct ReplaySource {
    pub frames: Vec<SensorFrame>,
}

impl FrameSource for ReplaySource {
    fn run(self: Box<Self>, tx: Sender<SensorFrame>) {
        for frame in self.frames {
            if tx.send(frame).is_err() {
                return;
            }
        }
    }
}
