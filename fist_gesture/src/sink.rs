//! Output sink: where cursor moves and button edges end up.
//!
//! The core never talks to the operating system. Platform input injection,
//! logging, and test recording all sit behind [`OutputSink`].

use crate::gesture::ButtonEdge;

pub trait OutputSink {
    /// Place the cursor at absolute screen coordinates.
    fn move_cursor(&mut self, x: i32, y: i32);
    fn press_primary(&mut self);
    fn release_primary(&mut self);

    fn apply_edge(&mut self, edge: ButtonEdge) {
        match edge {
            ButtonEdge::Press   => self.press_primary(),
            ButtonEdge::Release => self.release_primary(),
        }
    }
}

impl<S: OutputSink + ?Sized> OutputSink for Box<S> {
    fn move_cursor(&mut self, x: i32, y: i32) { (**self).move_cursor(x, y) }
    fn press_primary(&mut self)               { (**self).press_primary() }
    fn release_primary(&mut self)             { (**self).release_primary() }
}

// ── null sink ─────────────────────────────────────────────────────────────

/// Discards everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl OutputSink for NullSink {
    fn move_cursor(&mut self, _x: i32, _y: i32) {}
    fn press_primary(&mut self)                 {}
    fn release_primary(&mut self)               {}
}

// ── recording sink ────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SinkEvent {
    Move { x: i32, y: i32 },
    Press,
    Release,
}

/// Keeps every call in order, for tests and dry runs.
#[derive(Clone, Debug, Default)]
pub struct RecordingSink {
    pub events: Vec<SinkEvent>,
}

impl RecordingSink {
    /// Only the press/release events, in order.
    pub fn buttons(&self) -> Vec<SinkEvent> {
        self.events
            .iter()
            .copied()
            .filter(|e| !matches!(e, SinkEvent::Move { .. }))
            .collect()
    }
}

impl OutputSink for RecordingSink {
    fn move_cursor(&mut self, x: i32, y: i32) {
        self.events.push(SinkEvent::Move { x, y });
    }
    fn press_primary(&mut self) {
        self.events.push(SinkEvent::Press);
    }
    fn release_primary(&mut self) {
        self.events.push(SinkEvent::Release);
    }
}
