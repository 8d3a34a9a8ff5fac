//! Session constants.
//!
//! Every threshold the pipeline depends on lives here with its baseline
//! value as the `Default`. Configs deserialize with `#[serde(default)]`, so a
//! file only has to name the values it changes.

use depth_stream::{DepthLayout, DEFAULT_HEIGHT, DEFAULT_WIDTH};
use serde::{Deserialize, Serialize};

use crate::error::TrackerError;

// ════════════════════════════════════════════════════════════════════════════
// ClassifierConfig
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Depth frame width in pixels.
    pub width:  usize,
    /// Depth frame height in pixels.
    pub height: usize,
    pub layout: DepthLayout,
    /// Depth rendered at full brightness; anything nearer clamps to 255.
    pub min_depth: u16,
    /// Depth rendered black; anything farther clamps to 0. Also the seed for
    /// the closest-depth tracker and the far end of the fist threshold.
    pub max_depth: u16,
    /// A foreground pixel is part of the hand when its depth is less than
    /// this many units behind the previous frame's closest foreground depth.
    pub proximity_threshold: i32,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        ClassifierConfig {
            width:               DEFAULT_WIDTH,
            height:              DEFAULT_HEIGHT,
            layout:              DepthLayout::KINECT,
            min_depth:           800,
            max_depth:           4095,
            proximity_threshold: 60,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// GestureConfig
// ════════════════════════════════════════════════════════════════════════════

/// Which hand depth scales the fist threshold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum HandDepthSource {
    /// Depth of the first new hand column met in raster order.
    FirstColumn,
    /// Smallest depth among all hand pixels.
    Nearest,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// `separator = (max_depth - hand_depth) / fist_divisor - fist_offset`
    pub fist_divisor: f32,
    pub fist_offset:  f32,
    pub hand_depth:   HandDepthSource,
}

impl Default for GestureConfig {
    fn default() -> Self {
        GestureConfig {
            fist_divisor: 65.0,
            fist_offset:  20.0,
            hand_depth:   HandDepthSource::FirstColumn,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// CursorConfig
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CursorConfig {
    /// How far (meters) a hand must be in front of the shoulder center to
    /// take control of the cursor.
    pub reach_threshold: f32,
    /// Hand travel (meters) that spans the full screen.
    pub fov_divisor:     f32,
    pub bias_right:      f32,
    pub bias_left:       f32,
    pub screen_width:    u32,
    pub screen_height:   u32,
    /// Clamp targets to the screen instead of passing them through.
    pub clamp_to_screen: bool,
}

impl Default for CursorConfig {
    fn default() -> Self {
        CursorConfig {
            reach_threshold: 0.3,
            fov_divisor:     0.35,
            bias_right:      0.05,
            bias_left:       0.30,
            screen_width:    1920,
            screen_height:   1080,
            clamp_to_screen: false,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// TrackerConfig
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    pub classifier: ClassifierConfig,
    pub gesture:    GestureConfig,
    pub cursor:     CursorConfig,
}

impl TrackerConfig {
    /// Reject values that would make the per-frame arithmetic meaningless.
    pub fn validate(&self) -> Result<(), TrackerError> {
        let c = &self.classifier;
        if c.width == 0 || c.height == 0 {
            return Err(invalid(format!("frame size {}x{} has zero area", c.width, c.height)));
        }
        if c.layout.segment_bits >= 16 {
            return Err(invalid(format!(
                "segment_bits {} leaves no room for depth", c.layout.segment_bits
            )));
        }
        if c.max_depth <= c.min_depth {
            return Err(invalid(format!(
                "max_depth {} must exceed min_depth {}", c.max_depth, c.min_depth
            )));
        }
        if c.max_depth > c.layout.max_depth() {
            return Err(invalid(format!(
                "max_depth {} exceeds the {}-bit depth field",
                c.max_depth, 16 - c.layout.segment_bits
            )));
        }

        let g = &self.gesture;
        if !(g.fist_divisor.is_finite() && g.fist_divisor > 0.0) {
            return Err(invalid(format!("fist_divisor {} must be positive", g.fist_divisor)));
        }
        if !g.fist_offset.is_finite() {
            return Err(invalid("fist_offset must be finite".to_string()));
        }

        let k = &self.cursor;
        if !(k.fov_divisor.is_finite() && k.fov_divisor > 0.0) {
            return Err(invalid(format!("fov_divisor {} must be positive", k.fov_divisor)));
        }
        if k.screen_width == 0 || k.screen_height == 0 {
            return Err(invalid(format!(
                "screen size {}x{} has zero area", k.screen_width, k.screen_height
            )));
        }
        // cursor coordinates are i32
        if k.screen_width > i32::MAX as u32 || k.screen_height > i32::MAX as u32 {
            return Err(invalid(format!(
                "screen size {}x{} exceeds the cursor coordinate range",
                k.screen_width, k.screen_height
            )));
        }
        Ok(())
    }
}

fn invalid(msg: String) -> TrackerError {
    TrackerError::Config(msg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        TrackerConfig::default().validate().unwrap();
    }

    #[test]
    fn inverted_depth_range_rejected() {
        let mut cfg = TrackerConfig::default();
        cfg.classifier.min_depth = 4095;
        cfg.classifier.max_depth = 800;
        assert!(matches!(cfg.validate(), Err(TrackerError::Config(_))));
    }

    #[test]
    fn zero_fist_divisor_rejected() {
        let mut cfg = TrackerConfig::default();
        cfg.gesture.fist_divisor = 0.0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn oversized_screen_rejected() {
        let mut cfg = TrackerConfig::default();
        cfg.cursor.clamp_to_screen = true;
        cfg.cursor.screen_width = 3_000_000_000;
        assert!(matches!(cfg.validate(), Err(TrackerError::Config(_))));

        let mut cfg = TrackerConfig::default();
        cfg.cursor.screen_height = i32::MAX as u32 + 1;
        assert!(cfg.validate().is_err());

        cfg.cursor.screen_height = i32::MAX as u32;
        cfg.validate().unwrap();
    }

    #[test]
    fn max_depth_must_fit_layout() {
        let mut cfg = TrackerConfig::default();
        cfg.classifier.layout = DepthLayout::new(5); // 11 depth bits → 2047
        assert!(cfg.validate().is_err());
    }
}
