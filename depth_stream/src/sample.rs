//! Packed depth-sample layout.

use serde::{Deserialize, Serialize};

// ════════════════════════════════════════════════════════════════════════════
// DepthLayout
// ════════════════════════════════════════════════════════════════════════════

/// Fixed bit split of a raw depth sample into segment tag and depth.
///
/// The split is constant for the life of a sensor session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepthLayout {
    /// Number of low bits holding the segment (player) tag.
    pub segment_bits: u8,
}

impl DepthLayout {
    /// Three player-index bits, thirteen depth bits.
    pub const KINECT: DepthLayout = DepthLayout { segment_bits: 3 };

    pub fn new(segment_bits: u8) -> Self {
        DepthLayout { segment_bits }
    }

    /// Bitmask selecting the segment tag.
    pub fn segment_mask(&self) -> u16 {
        ((1u32 << self.segment_bits) - 1) as u16
    }

    /// Segment tag of a raw sample; zero means background.
    #[inline]
    pub fn segment(&self, raw: u16) -> u16 {
        raw & self.segment_mask()
    }

    /// Depth magnitude of a raw sample.
    #[inline]
    pub fn depth(&self, raw: u16) -> u16 {
        ((raw as u32) >> self.segment_bits) as u16
    }

    /// `(segment, depth)` of a raw sample.
    #[inline]
    pub fn decode(&self, raw: u16) -> (u16, u16) {
        (self.segment(raw), self.depth(raw))
    }

    /// Pack a segment tag and depth into a raw sample.
    /// Bits that don't fit either field are dropped.
    pub fn encode(&self, segment: u16, depth: u16) -> u16 {
        let packed = ((depth as u32) << self.segment_bits) as u16;
        packed | (segment & self.segment_mask())
    }

    /// Largest depth magnitude the layout can carry.
    pub fn max_depth(&self) -> u16 {
        self.depth(u16::MAX)
    }
}

impl Default for DepthLayout {
    fn default() -> Self {
        DepthLayout::KINECT
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
