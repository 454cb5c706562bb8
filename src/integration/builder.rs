//! Builder for painting label frames.

use ndarray::{Array2, s};

/// Builder for label frames made of rectangular objects.
///
/// Later paint calls overwrite earlier ones where they overlap; regions
/// falling outside the frame are clipped.
#[derive(Debug, Clone)]
pub struct LabelFrameBuilder {
    labels: Array2<u32>,
}

impl LabelFrameBuilder {
    /// Create an all-background frame of the given size.
    pub fn new(height: usize, width: usize) -> Self {
        Self {
            labels: Array2::zeros((height, width)),
        }
    }

    /// Paint rows `top..top + height` and cols `left..left + width` with `label`.
    pub fn rect(mut self, label: u32, top: usize, left: usize, height: usize, width: usize) -> Self {
        let (h, w) = self.labels.dim();
        let bottom = (top + height).min(h);
        let right = (left + width).min(w);
        if top < bottom && left < right {
            self.labels
                .slice_mut(s![top..bottom, left..right])
                .fill(label);
        }
        self
    }

    /// Paint a square of side `2 * radius + 1` centered on `(row, col)`.
    pub fn square(self, label: u32, row: usize, col: usize, radius: usize) -> Self {
        let top = row.saturating_sub(radius);
        let left = col.saturating_sub(radius);
        let side_h = row + radius + 1 - top;
        let side_w = col + radius + 1 - left;
        self.rect(label, top, left, side_h, side_w)
    }

    /// Paint a single pixel.
    pub fn pixel(self, label: u32, row: usize, col: usize) -> Self {
        self.rect(label, row, col, 1, 1)
    }

    /// Build the final label frame.
    pub fn build(self) -> Array2<u32> {
        self.labels
    }
}
