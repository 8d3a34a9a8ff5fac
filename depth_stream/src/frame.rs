//! A single dense depth frame.

use thiserror::Error;

/// Reasons a depth frame is rejected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FrameError {
    #[error("depth frame has zero area ({width}x{height})")]
    Empty { width: usize, height: usize },

    #[error("depth frame {width}x{height} needs {expected} samples, got {actual}")]
    SizeMismatch {
        width:    usize,
        height:   usize,
        expected: usize,
        actual:   usize,
    },
}

/// Row-major raw depth samples with fixed dimensions.
///
/// The sample count always equals `width * height`; the constructor is the
/// only way in, so downstream code can index without re-checking.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DepthFrame {
    width:   usize,
    height:  usize,
    samples: Vec<u16>,
}

impl DepthFrame {
    pub fn new(width: usize, height: usize, samples: Vec<u16>) -> Result<Self, FrameError> {
        if width == 0 || height == 0 {
            return Err(FrameError::Empty { width, height });
        }
        let expected = width * height;
        if samples.len() != expected {
            return Err(FrameError::SizeMismatch {
                width,
                height,
                expected,
                actual: samples.len(),
            });
        }
        Ok(DepthFrame { width, height, samples })
    }

    /// Frame where every sample carries the same raw value.
    pub fn filled(width: usize, height: usize, raw: u16) -> Result<Self, FrameError> {
        DepthFrame::new(width, height, vec![raw; width * height])
    }

    pub fn width(&self)   -> usize  { self.width }
    pub fn height(&self)  -> usize  { self.height }
    pub fn len(&self)     -> usize  { self.samples.len() }
    pub fn is_empty(&self) -> bool  { self.samples.is_empty() }
    pub fn samples(&self) -> &[u16] { &self.samples }

    /// Raw sample at `(x, y)`, or `None` outside the frame.
    pub fn get(&self, x: usize, y: usize) -> Option<u16> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.samples[y * self.width + x])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_short_buffer() {
        let err = DepthFrame::new(4, 3, vec![0; 11]).unwrap_err();
        assert_eq!(
            err,
            FrameError::SizeMismatch { width: 4, height: 3, expected: 12, actual: 11 }
        );
    }

    #[test]
    fn rejects_zero_area() {
        assert!(matches!(DepthFrame::new(0, 240, vec![]), Err(FrameError::Empty { .. })));
    }

    #[test]
    fn get_is_row_major() {
        let f = DepthFrame::new(3, 2, vec![0, 1, 2, 3, 4, 5]).unwrap();
        assert_eq!(f.get(2, 0), Some(2));
        assert_eq!(f.get(0, 1), Some(3));
        assert_eq!(f.get(3, 0), None);
        assert_eq!(f.get(0, 2), None);
    }
}
