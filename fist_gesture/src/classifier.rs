//! Depth classifier: one raster pass per frame.
//!
//! The pass paints a BGR0 visualization and, in the same loop, gathers the
//! [`FrameMeasurement`] the gesture detector consumes:
//!
//! * background pixels → grayscale, nearer is brighter
//! * foreground pixels → red, and tracked for the frame's closest depth
//! * foreground pixels near the *previous* frame's closest depth, while a hand
//!   is armed → yellow "hand" pixels whose columns are collected; the pixel
//!   that opens a new column is painted green

use depth_stream::DepthFrame;

use crate::config::ClassifierConfig;
use crate::cursor::HandTrackingContext;
use crate::error::TrackerError;

// ════════════════════════════════════════════════════════════════════════════
// Output format
// ════════════════════════════════════════════════════════════════════════════

/// Bytes per output pixel: blue, green, red, unused.
pub const BYTES_PER_PIXEL: usize = 4;

pub const BLUE:  usize = 0;
pub const GREEN: usize = 1;
pub const RED:   usize = 2;

/// Colors as `[blue, green, red]`.
pub const FOREGROUND_COLOR: [u8; 3] = [0, 0, 255];
pub const HAND_COLOR:       [u8; 3] = [0, 255, 255];
pub const HAND_EDGE_COLOR:  [u8; 3] = [0, 255, 0];

// ════════════════════════════════════════════════════════════════════════════
// HandColumns
// ════════════════════════════════════════════════════════════════════════════

/// Distinct columns touched by hand pixels, in first-touch order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HandColumns {
    seen:  Vec<bool>,
    order: Vec<usize>,
}

impl HandColumns {
    pub fn new(width: usize) -> Self {
        HandColumns { seen: vec![false; width], order: Vec::new() }
    }

    /// Record `column`; returns `true` if it wasn't already present.
    pub fn insert(&mut self, column: usize) -> bool {
        if self.seen[column] {
            return false;
        }
        self.seen[column] = true;
        self.order.push(column);
        true
    }

    pub fn contains(&self, column: usize) -> bool {
        self.seen.get(column).copied().unwrap_or(false)
    }

    pub fn len(&self)      -> usize { self.order.len() }
    pub fn is_empty(&self) -> bool  { self.order.is_empty() }

    /// Columns in the order they were first touched.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.order.iter().copied()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// FrameMeasurement
// ════════════════════════════════════════════════════════════════════════════

/// What one raster pass learned about the hand. Lives for one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameMeasurement {
    /// Smallest foreground depth this frame; `max_depth` if there was none.
    pub closest_foreground_depth: u16,
    pub hand_columns:             HandColumns,
    /// Depth of the pixel that opened the first hand column.
    pub first_hand_depth:         Option<u16>,
    /// Smallest depth among all hand pixels.
    pub nearest_hand_depth:       Option<u16>,
}

impl FrameMeasurement {
    pub fn new(width: usize, max_depth: u16) -> Self {
        FrameMeasurement {
            closest_foreground_depth: max_depth,
            hand_columns:             HandColumns::new(width),
            first_hand_depth:         None,
            nearest_hand_depth:       None,
        }
    }
}

/// Result of classifying one frame.
#[derive(Clone, Debug)]
pub struct ClassifiedFrame {
    /// `width * height * 4` bytes, BGR0.
    pub pixels:      Vec<u8>,
    pub measurement: FrameMeasurement,
}

// ════════════════════════════════════════════════════════════════════════════
// DepthClassifier
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug)]
pub struct DepthClassifier {
    cfg: ClassifierConfig,
}

impl DepthClassifier {
    pub fn new(cfg: ClassifierConfig) -> Self {
        DepthClassifier { cfg }
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.cfg
    }

    /// Grayscale level for a background pixel at `depth`.
    ///
    /// 255 at or nearer than `min_depth`, 0 at or beyond `max_depth`,
    /// linear (integer) in between.
    pub fn intensity(&self, depth: u16) -> u8 {
        let span   = (self.cfg.max_depth as i32 - self.cfg.min_depth as i32).max(1);
        let offset = (depth as i32 - self.cfg.min_depth as i32).max(0);
        (255 - 255 * offset / span).clamp(0, 255) as u8
    }

    /// Classify one frame.
    ///
    /// `previous_closest` is the closest foreground depth of the *previous*
    /// frame; the current frame's value is only known once the scan ends.
    pub fn classify(
        &self,
        frame:            &DepthFrame,
        context:          &HandTrackingContext,
        previous_closest: u16,
    ) -> Result<ClassifiedFrame, TrackerError> {
        let (width, height) = (self.cfg.width, self.cfg.height);
        if frame.width() != width || frame.height() != height {
            return Err(TrackerError::FrameShape {
                width,
                height,
                got_width:  frame.width(),
                got_height: frame.height(),
            });
        }

        let layout = self.cfg.layout;
        let mut pixels = vec![0u8; frame.len() * BYTES_PER_PIXEL];
        let mut m = FrameMeasurement::new(width, self.cfg.max_depth);

        for (index, (&raw, px)) in frame
            .samples()
            .iter()
            .zip(pixels.chunks_exact_mut(BYTES_PER_PIXEL))
            .enumerate()
        {
            let (segment, depth) = layout.decode(raw);

            if segment == 0 {
                let i = self.intensity(depth);
                paint(px, [i, i, i]);
                continue;
            }

            paint(px, FOREGROUND_COLOR);
            m.closest_foreground_depth = m.closest_foreground_depth.min(depth);

            if !context.armed
                || depth as i32 - previous_closest as i32 >= self.cfg.proximity_threshold
            {
                continue;
            }

            paint(px, HAND_COLOR);
            m.nearest_hand_depth = Some(m.nearest_hand_depth.map_or(depth, |d| d.min(depth)));

            let column = index % width;
            let was_empty = m.hand_columns.is_empty();
            if m.hand_columns.insert(column) {
                if was_empty {
                    m.first_hand_depth = Some(depth);
                }
                paint(px, HAND_EDGE_COLOR);
            }
        }

        Ok(ClassifiedFrame { pixels, measurement: m })
    }
}

#[inline]
fn paint(px: &mut [u8], [b, g, r]: [u8; 3]) {
    px[BLUE]  = b;
    px[GREEN] = g;
    px[RED]   = r;
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::HandSide;
    use depth_stream::{DepthLayout, SceneBuilder};

    const W: usize = 320;
    const H: usize = 240;

    fn classifier() -> DepthClassifier {
        DepthClassifier::new(ClassifierConfig::default())
    }

    fn armed() -> HandTrackingContext {
        HandTrackingContext { armed: true, active_side: Some(HandSide::Right) }
    }

    fn scene() -> SceneBuilder {
        SceneBuilder::new(W, H, DepthLayout::KINECT)
    }

    fn bgr(pixels: &[u8], x: usize, y: usize) -> [u8; 3] {
        let i = (y * W + x) * BYTES_PER_PIXEL;
        [pixels[i + BLUE], pixels[i + GREEN], pixels[i + RED]]
    }

    // ── intensity ─────────────────────────────────────────────────────────

    #[test]
    fn intensity_clamps_at_bounds() {
        let c = classifier();
        assert_eq!(c.intensity(0),    255);
        assert_eq!(c.intensity(800),  255);
        assert_eq!(c.intensity(4095), 0);
        assert_eq!(c.intensity(8191), 0);
    }

    #[test]
    fn intensity_never_increases_with_depth() {
        let c = classifier();
        let mut last = 255u8;
        for d in 0..=8191u16 {
            let i = c.intensity(d);
            assert!(i <= last, "intensity rose at depth {}", d);
            last = i;
        }
    }

    // ── background-only frame ─────────────────────────────────────────────

    #[test]
    fn uniform_near_background_is_white() {
        let frame = scene().background(800).build().unwrap();
        let out = classifier()
            .classify(&frame, &armed(), 4095)
            .unwrap();
        for px in out.pixels.chunks_exact(BYTES_PER_PIXEL) {
            assert_eq!(px, &[255u8, 255, 255, 0]);
        }
        assert!(out.measurement.hand_columns.is_empty());
        assert_eq!(out.measurement.first_hand_depth, None);
        assert_eq!(out.measurement.closest_foreground_depth, 4095);
    }

    // ── foreground and hand pixels ────────────────────────────────────────

    #[test]
    fn single_near_pixel_is_hand_edge() {
        let frame = scene().background(3000).pixel(17, 5, 1, 1000).build().unwrap();
        let out = classifier().classify(&frame, &armed(), 960).unwrap();
        let m = &out.measurement;
        assert_eq!(m.hand_columns.len(), 1);
        assert!(m.hand_columns.contains(17));
        assert_eq!(m.first_hand_depth, Some(1000));
        assert_eq!(m.closest_foreground_depth, 1000);
        assert_eq!(bgr(&out.pixels, 17, 5), HAND_EDGE_COLOR);
    }

    #[test]
    fn disarmed_foreground_stays_red() {
        let frame = scene().background(3000).rect(10, 10, 5, 5, 1, 1000).build().unwrap();
        let out = classifier()
            .classify(&frame, &HandTrackingContext::default(), 960)
            .unwrap();
        assert!(out.measurement.hand_columns.is_empty());
        assert_eq!(out.measurement.closest_foreground_depth, 1000);
        assert_eq!(bgr(&out.pixels, 12, 12), FOREGROUND_COLOR);
    }

    #[test]
    fn far_foreground_is_not_hand() {
        // 1100 - 960 = 140, well past the 60-unit band
        let frame = scene().background(3000).pixel(3, 3, 2, 1100).build().unwrap();
        let out = classifier().classify(&frame, &armed(), 960).unwrap();
        assert!(out.measurement.hand_columns.is_empty());
        assert_eq!(bgr(&out.pixels, 3, 3), FOREGROUND_COLOR);
    }

    #[test]
    fn columns_are_distinct_and_ordered() {
        // 4×3 blob: first row opens four columns, later rows repeat them
        let frame = scene().background(3000).rect(50, 20, 4, 3, 1, 1010).build().unwrap();
        let out = classifier().classify(&frame, &armed(), 1000).unwrap();
        let cols: Vec<usize> = out.measurement.hand_columns.iter().collect();
        assert_eq!(cols, vec![50, 51, 52, 53]);
        assert_eq!(bgr(&out.pixels, 51, 20), HAND_EDGE_COLOR);
        assert_eq!(bgr(&out.pixels, 51, 21), HAND_COLOR);
    }

    #[test]
    fn first_hand_depth_follows_raster_order() {
        // The farther pixel comes first in raster order, so it seeds the
        // first-column depth even though a nearer one follows.
        let frame = scene()
            .background(3000)
            .pixel(100, 10, 1, 1040)
            .pixel(20, 30, 1, 990)
            .build()
            .unwrap();
        let m = classifier().classify(&frame, &armed(), 1000).unwrap().measurement;
        assert_eq!(m.first_hand_depth, Some(1040));
        assert_eq!(m.nearest_hand_depth, Some(990));
    }

    #[test]
    fn alpha_byte_is_zero() {
        let frame = scene().floor(4000, 900).rect(0, 0, 30, 30, 1, 1000).build().unwrap();
        let out = classifier().classify(&frame, &armed(), 1000).unwrap();
        assert!(out.pixels.chunks_exact(BYTES_PER_PIXEL).all(|px| px[3] == 0));
        assert_eq!(out.pixels.len(), W * H * BYTES_PER_PIXEL);
    }

    #[test]
    fn wrong_shape_rejected() {
        let frame = SceneBuilder::new(160, 120, DepthLayout::KINECT).build().unwrap();
        let err = classifier().classify(&frame, &armed(), 1000).unwrap_err();
        assert!(matches!(err, TrackerError::FrameShape { got_width: 160, .. }));
    }

    #[test]
    fn classify_is_deterministic() {
        let frame = scene().floor(4000, 900).rect(120, 40, 60, 150, 1, 1900).build().unwrap();
        let c = classifier();
        let ctx = HandTrackingContext::default();
        let a = c.classify(&frame, &ctx, 1900).unwrap();
        let b = c.classify(&frame, &ctx, 1900).unwrap();
        assert_eq!(a.pixels, b.pixels);
        assert_eq!(a.measurement, b.measurement);
    }
}
