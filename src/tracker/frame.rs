//! Label volumes: the per-frame instance segmentation handed to the tracker.

use ndarray::{Array2, Array3, ArrayView2, Axis};

use crate::error::{Result, TrackError};

/// A single labeled frame. Label 0 is background.
pub type Frame<'a> = ArrayView2<'a, u32>;

/// Time-ordered stack of label images, shape `(frame_count, height, width)`.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelVolume {
    data: Array3<u32>,
}

impl LabelVolume {
    /// Wrap an existing 3-D label array.
    pub fn new(data: Array3<u32>) -> Result<Self> {
        if data.len_of(Axis(0)) == 0 {
            return Err(TrackError::EmptyVolume);
        }
        Ok(Self { data })
    }

    /// Stack individual frames. All frames must share the first frame's shape.
    pub fn from_frames(frames: Vec<Array2<u32>>) -> Result<Self> {
        let first = frames.first().ok_or(TrackError::EmptyVolume)?;
        let expected = first.dim();

        for (index, frame) in frames.iter().enumerate() {
            if frame.dim() != expected {
                return Err(TrackError::DimensionMismatch {
                    index,
                    expected,
                    found: frame.dim(),
                });
            }
        }

        let views: Vec<ArrayView2<u32>> = frames.iter().map(|f| f.view()).collect();
        let data = ndarray::stack(Axis(0), &views).map_err(|_| TrackError::DimensionMismatch {
            index: 0,
            expected,
            found: expected,
        })?;
        Ok(Self { data })
    }

    pub fn frame_count(&self) -> usize {
        self.data.len_of(Axis(0))
    }

    /// Frame shape as `(height, width)`.
    pub fn frame_shape(&self) -> (usize, usize) {
        let (_, h, w) = self.data.dim();
        (h, w)
    }

    pub fn frame(&self, index: usize) -> Frame<'_> {
        self.data.index_axis(Axis(0), index)
    }

    pub fn frames(&self) -> impl ExactSizeIterator<Item = Frame<'_>> {
        self.data.outer_iter()
    }

    pub fn as_array(&self) -> &Array3<u32> {
        &self.data
    }

    pub fn into_array(self) -> Array3<u32> {
        self.data
    }
}
