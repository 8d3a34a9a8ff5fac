//! Depth viewer window, built on `minifb`.
//!
//! ```text
//! ┌──────────────────────────────┐
//! │                              │
//! │  classified depth image      │  width × height, scaled up
//! │                              │
//! ├──────────────────────────────┤
//! │ status line                  │
//! │ key legend                   │
//! └──────────────────────────────┘
//! ```
//!
//! The window doubles as the simulator's control surface: pointer, keys, and
//! mouse button are read every frame and forwarded as [`SimInput`]s.

use std::sync::mpsc::Sender;
use std::time::Duration;

use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Scale, Window, WindowOptions};

use fist_gesture::HandSide;

use crate::sim::SimInput;

// ════════════════════════════════════════════════════════════════════════════
// Layout constants
// ════════════════════════════════════════════════════════════════════════════

const STATUS_H:     usize = 22;
const BG_COLOR:     u32   = 0x0010_1018;
const STATUS_BG:    u32   = 0x0020_2838;
const TEXT_COLOR:   u32   = 0x00EE_EEEE;
const LEGEND_COLOR: u32   = 0x0088_8888;
const ARMED_COLOR:  u32   = 0x00FF_D700;
const FIST_COLOR:   u32   = 0x00FF_4040;

const LEGEND: &str = "R/L=REACH  SPACE/CLICK=FIST  D=DROP  X=RESET  Q=QUIT";

/// What the status bar shows besides the text line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Indicators {
    pub armed: Option<HandSide>,
    pub fist:  bool,
}

// ════════════════════════════════════════════════════════════════════════════
// Controls: window state → SimInput
// ════════════════════════════════════════════════════════════════════════════

/// Input state sampled from the window once per frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Controls {
    pub pointer:     Option<(f32, f32)>,
    pub reach_right: bool,
    pub reach_left:  bool,
    pub fist:        bool,
}

impl Controls {
    /// Inputs needed to move the simulator from `prev` to `self`.
    pub fn changes_since(&self, prev: &Controls) -> Vec<SimInput> {
        let mut out = Vec::new();
        if self.pointer != prev.pointer {
            if let Some((x, y)) = self.pointer {
                out.push(SimInput::Pointer { x, y });
            }
        }
        if self.reach_right != prev.reach_right {
            out.push(SimInput::Reach { side: HandSide::Right, out: self.reach_right });
        }
        if self.reach_left != prev.reach_left {
            out.push(SimInput::Reach { side: HandSide::Left, out: self.reach_left });
        }
        if self.fist != prev.fist {
            out.push(SimInput::Fist(self.fist));
        }
        out
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Viewer
// ════════════════════════════════════════════════════════════════════════════

pub struct Viewer {
    window:   Window,
    buf:      Vec<u32>,
    width:    usize,
    height:   usize,
    sim_tx:   Sender<SimInput>,
    controls: Controls,
}

impl Viewer {
    /// Open a window for `width × height` depth frames.
    pub fn new(
        width:  usize,
        height: usize,
        scale:  Scale,
        sim_tx: Sender<SimInput>,
    ) -> Result<Self, minifb::Error> {
        let total_h = height + STATUS_H;
        let mut window = Window::new(
            "Kinecursor: depth view",
            width, total_h,
            WindowOptions {
                resize: false,
                scale,
                ..WindowOptions::default()
            },
        )?;
        window.limit_update_rate(Some(Duration::from_millis(16)));

        Ok(Viewer {
            window,
            buf: vec![BG_COLOR; width * total_h],
            width,
            height,
            sim_tx,
            controls: Controls::default(),
        })
    }

    pub fn is_open(&self) -> bool { self.window.is_open() }

    /// Sample the window and forward what changed to the simulator.
    /// Returns false once the user asked to quit.
    pub fn poll_input(&mut self) -> bool {
        if !self.window.is_open() { return false; }

        let w = &self.window;
        if w.is_key_pressed(Key::Q, KeyRepeat::No) || w.is_key_pressed(Key::Escape, KeyRepeat::No) {
            let _ = self.sim_tx.send(SimInput::Quit);
            return false;
        }
        if w.is_key_pressed(Key::D, KeyRepeat::No) {
            let _ = self.sim_tx.send(SimInput::DropFrame);
        }

        let (fw, fh) = (self.width.max(1) as f32, self.height.max(1) as f32);
        let now = Controls {
            pointer:     w.get_mouse_pos(MouseMode::Clamp)
                              .map(|(x, y)| ((x / fw).clamp(0.0, 1.0), (y / fh).clamp(0.0, 1.0))),
            reach_right: w.is_key_down(Key::R),
            reach_left:  w.is_key_down(Key::L),
            fist:        w.is_key_down(Key::Space) || w.get_mouse_down(MouseButton::Left),
        };

        for input in now.changes_since(&self.controls) {
            if self.sim_tx.send(input).is_err() {
                return false;
            }
        }
        self.controls = now;
        true
    }

    /// True once per press of the reset key.
    pub fn reset_requested(&self) -> bool {
        self.window.is_key_pressed(Key::X, KeyRepeat::No)
    }

    /// Show a classified frame (BGR0 bytes) and the status bar.
    pub fn render(&mut self, pixels: Option<&[u8]>, status: &str, ind: Indicators) {
        let n = self.width * self.height;
        match pixels {
            Some(px) if px.len() == n * 4 => blit_bgr0(px, &mut self.buf[..n]),
            _ => self.buf[..n].fill(BG_COLOR),
        }

        let y0 = self.height;
        self.fill_rect(0, y0, self.width, STATUS_H, STATUS_BG);

        // side marker, then fist marker
        if let Some(side) = ind.armed {
            self.fill_rect(4, y0 + 3, 8, 7, ARMED_COLOR);
            let label = match side { HandSide::Left => "L", HandSide::Right => "R" };
            self.draw_label(label, 6, y0 + 4, BG_COLOR);
        }
        if ind.fist {
            self.fill_rect(14, y0 + 3, 8, 7, FIST_COLOR);
        }
        self.draw_label(status, 26, y0 + 4, TEXT_COLOR);
        self.draw_label(LEGEND, 4, y0 + 14, LEGEND_COLOR);

        let total_h = self.height + STATUS_H;
        if let Err(e) = self.window.update_with_buffer(&self.buf, self.width, total_h) {
            log::warn!("viewer update failed: {}", e);
        }
    }

    // ── drawing helpers ───────────────────────────────────────────────────

    fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        let total_h = self.height + STATUS_H;
        for row in y..(y + h).min(total_h) {
            for col in x..(x + w).min(self.width) {
                self.buf[row * self.width + col] = color;
            }
        }
    }

    fn set_pixel(&mut self, x: usize, y: usize, color: u32) {
        if x < self.width && y < self.height + STATUS_H {
            self.buf[y * self.width + x] = color;
        }
    }

    fn draw_label(&mut self, text: &str, x: usize, y: usize, color: u32) {
        let mut cx = x;
        for ch in text.chars() {
            if cx + 3 > self.width { break; }
            let g = glyph(ch);
            for row in 0..5 {
                for col in 0..3 {
                    if glyph_bit(g, row, col) {
                        self.set_pixel(cx + col, y + row, color);
                    }
                }
            }
            cx += 4;
        }
    }
}

/// Convert BGR0 bytes to minifb's `0RGB` words.
pub fn blit_bgr0(src: &[u8], dst: &mut [u32]) {
    for (px, out) in src.chunks_exact(4).zip(dst.iter_mut()) {
        *out = u32::from_le_bytes([px[0], px[1], px[2], 0]);
    }
}

// ────────────────────────────────────────────────────────────────────────────
// 3×5 font, packed row-major into the low 15 bits (top row highest)
// ────────────────────────────────────────────────────────────────────────────

fn glyph_bit(g: u16, row: usize, col: usize) -> bool {
    g & (1 << (14 - (row * 3 + col))) != 0
}

fn glyph(c: char) -> u16 {
    match c.to_ascii_uppercase() {
        '0' => 0b111_101_101_101_111,
        '1' => 0b010_110_010_010_111,
        '2' => 0b111_001_111_100_111,
        '3' => 0b111_001_011_001_111,
        '4' => 0b101_101_111_001_001,
        '5' => 0b111_100_111_001_111,
        '6' => 0b111_100_111_101_111,
        '7' => 0b111_001_010_010_010,
        '8' => 0b111_101_111_101_111,
        '9' => 0b111_101_111_001_111,
        'A' => 0b010_101_111_101_101,
        'B' => 0b110_101_110_101_110,
        'C' => 0b011_100_100_100_011,
        'D' => 0b110_101_101_101_110,
        'E' => 0b111_100_110_100_111,
        'F' => 0b111_100_110_100_100,
        'G' => 0b011_100_101_101_011,
        'H' => 0b101_101_111_101_101,
        'I' => 0b111_010_010_010_111,
        'K' => 0b101_101_110_101_101,
        'L' => 0b100_100_100_100_111,
        'M' => 0b101_111_111_101_101,
        'N' => 0b110_101_101_101_101,
        'O' => 0b010_101_101_101_010,
        'P' => 0b110_101_110_100_100,
        'Q' => 0b010_101_101_110_011,
        'R' => 0b110_101_110_101_101,
        'S' => 0b011_100_010_001_110,
        'T' => 0b111_010_010_010_010,
        'U' => 0b101_101_101_101_111,
        'W' => 0b101_101_111_111_101,
        'X' => 0b101_101_010_101_101,
        'Y' => 0b101_101_010_010_010,
        '/' => 0b001_001_010_100_100,
        '-' => 0b000_000_111_000_000,
        '.' => 0b000_000_000_000_010,
        ':' => 0b000_010_000_010_000,
        '=' => 0b000_111_000_111_000,
        '>' => 0b100_010_001_010_100,
        '(' => 0b001_010_010_010_001,
        ')' => 0b100_010_010_010_100,
        ',' => 0b000_000_000_010_100,
        ' ' => 0,
        _   => 0b000_000_010_000_000,
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
