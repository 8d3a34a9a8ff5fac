//! Output backends for cursor moves and button edges.
//!
//! The default build only logs what it would do. With the `os-input`
//! feature, [`open_output`] drives the real system pointer through enigo.

use fist_gesture::OutputSink;

// ════════════════════════════════════════════════════════════════════════════
// LogSink: used for dry runs and when no OS backend is compiled in
// ════════════════════════════════════════════════════════════════════════════

/// Writes every request to the log instead of the OS.
#[derive(Clone, Debug, Default)]
pub struct LogSink {
    last: Option<(i32, i32)>,
}

impl OutputSink for LogSink {
    fn move_cursor(&mut self, x: i32, y: i32) {
        // hands jitter, so only log actual motion
        if self.last != Some((x, y)) {
            log::debug!("cursor -> ({}, {})", x, y);
            self.last = Some((x, y));
        }
    }
    fn press_primary(&mut self) {
        log::info!("primary button down");
    }
    fn release_primary(&mut self) {
        log::info!("primary button up");
    }
}

// ════════════════════════════════════════════════════════════════════════════
// EnigoSink: real pointer injection
// ════════════════════════════════════════════════════════════════════════════

#[cfg(feature = "os-input")]
pub struct EnigoSink {
    enigo: enigo::Enigo,
}

#[cfg(feature = "os-input")]
impl EnigoSink {
    pub fn new() -> Self {
        EnigoSink { enigo: enigo::Enigo::new() }
    }
}

#[cfg(feature = "os-input")]
impl OutputSink for EnigoSink {
    fn move_cursor(&mut self, x: i32, y: i32) {
        use enigo::MouseControllable;
        self.enigo.mouse_move_to(x, y);
    }
    fn press_primary(&mut self) {
        use enigo::{MouseButton, MouseControllable};
        self.enigo.mouse_down(MouseButton::Left);
    }
    fn release_primary(&mut self) {
        use enigo::{MouseButton, MouseControllable};
        self.enigo.mouse_up(MouseButton::Left);
    }
}

// ════════════════════════════════════════════════════════════════════════════
// open_output: pick a backend
// ════════════════════════════════════════════════════════════════════════════

/// Open the OS pointer backend, or a [`LogSink`] for dry runs and builds
/// without `os-input`.
pub fn open_output(dry_run: bool) -> Box<dyn OutputSink> {
    if dry_run {
        log::info!("dry run: cursor output is logged only");
        return Box::new(LogSink::default());
    }

    #[cfg(feature = "os-input")]
    {
        log::info!("driving the system pointer");
        Box::new(EnigoSink::new())
    }

    #[cfg(not(feature = "os-input"))]
    {
        log::warn!("built without `os-input`; cursor output is logged only");
        Box::new(LogSink::default())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use fist_gesture::ButtonEdge;

    #[test]
    fn log_sink_tracks_last_position() {
        let mut sink = LogSink::default();
        sink.move_cursor(10, 20);
        sink.move_cursor(10, 20);
        assert_eq!(sink.last, Some((10, 20)));
        sink.apply_edge(ButtonEdge::Press);
        sink.apply_edge(ButtonEdge::Release);
        assert_eq!(sink.last, Some((10, 20)));
    }

    #[test]
    fn dry_run_always_opens() {
        let mut out = open_output(true);
        out.move_cursor(0, 0);
        out.press_primary();
        out.release_primary();
    }
}
