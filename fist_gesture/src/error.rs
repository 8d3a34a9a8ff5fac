use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("invalid tracker configuration: {0}")]
    Config(String),

    #[error("depth frame is {got_width}x{got_height}, session expects {width}x{height}")]
    FrameShape {
        width:      usize,
        height:     usize,
        got_width:  usize,
        got_height: usize,
    },
}
