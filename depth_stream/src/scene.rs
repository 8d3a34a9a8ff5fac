//! Synthetic depth scenes.
//!
//! [`SceneBuilder`] paints rectangles of tagged or untagged depth into a
//! frame, which is enough to stand in for a sensor when driving the pipeline
//! from a keyboard or from tests.

use crate::frame::{DepthFrame, FrameError};
use crate::sample::DepthLayout;

/// Builder for a [`DepthFrame`]; later shapes paint over earlier ones.
#[derive(Clone, Debug)]
pub struct SceneBuilder {
    layout:  DepthLayout,
    width:   usize,
    height:  usize,
    samples: Vec<u16>,
}

impl SceneBuilder {
    /// Start from an all-zero frame (background, depth 0).
    pub fn new(width: usize, height: usize, layout: DepthLayout) -> Self {
        SceneBuilder {
            layout,
            width,
            height,
            samples: vec![0; width * height],
        }
    }

    /// Untagged background at a uniform depth.
    pub fn background(mut self, depth: u16) -> Self {
        let raw = self.layout.encode(0, depth);
        self.samples.fill(raw);
        self
    }

    /// Untagged background sloping linearly from `top` depth on the first row
    /// to `bottom` depth on the last, like a floor seen from above the sensor.
    pub fn floor(mut self, top: u16, bottom: u16) -> Self {
        let span = self.height.saturating_sub(1).max(1) as i32;
        for y in 0..self.height {
            let d = top as i32 + (bottom as i32 - top as i32) * y as i32 / span;
            let raw = self.layout.encode(0, d.clamp(0, u16::MAX as i32) as u16);
            let row = y * self.width;
            self.samples[row..row + self.width].fill(raw);
        }
        self
    }

    /// Fill a rectangle; the part outside the frame is clipped.
    pub fn rect(mut self, x: usize, y: usize, w: usize, h: usize, segment: u16, depth: u16) -> Self {
        let raw = self.layout.encode(segment, depth);
        let x1 = (x + w).min(self.width);
        let y1 = (y + h).min(self.height);
        for row in y.min(y1)..y1 {
            for col in x.min(x1)..x1 {
                self.samples[row * self.width + col] = raw;
            }
        }
        self
    }

    pub fn pixel(self, x: usize, y: usize, segment: u16, depth: u16) -> Self {
        self.rect(x, y, 1, 1, segment, depth)
    }

    pub fn build(self) -> Result<DepthFrame, FrameError> {
        DepthFrame::new(self.width, self.height, self.samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_is_clipped() {
        let l = DepthLayout::KINECT;
        let f = SceneBuilder::new(10, 10, l)
            .background(3000)
            .rect(8, 8, 5, 5, 1, 1200)
            .build()
            .unwrap();
        assert_eq!(l.decode(f.get(9, 9).unwrap()), (1, 1200));
        assert_eq!(l.decode(f.get(7, 9).unwrap()), (0, 3000));
    }

    #[test]
    fn floor_slopes_between_rows() {
        let l = DepthLayout::KINECT;
        let f = SceneBuilder::new(4, 5, l).floor(4000, 1000).build().unwrap();
        assert_eq!(l.depth(f.get(0, 0).unwrap()), 4000);
        assert_eq!(l.depth(f.get(3, 4).unwrap()), 1000);
        assert_eq!(l.depth(f.get(1, 2).unwrap()), 2500);
    }

    #[test]
    fn zero_width_scene_fails_to_build() {
        assert!(SceneBuilder::new(0, 10, DepthLayout::KINECT).build().is_err());
    }
}
