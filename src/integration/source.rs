//! Trait for segmentation backends that produce label volumes.

use ndarray::{Array2, Array3};

use crate::error::Result;
use crate::tracker::LabelVolume;

/// Trait for instance-segmentation backends.
///
/// Implement this trait to feed any segmentation model's output into the
/// tracking pipeline.
///
/// # Example
///
/// ```ignore
/// use celltrack_rs::{LabelSource, LabelVolume};
///
/// struct MyModel {
///     // Your model here
/// }
///
/// impl LabelSource for MyModel {
///     type Error = std::io::Error;
///
///     fn segment(&mut self) -> Result<LabelVolume, Self::Error> {
///         // Run segmentation over every frame and stack the masks
///         todo!()
///     }
/// }
/// ```
pub trait LabelSource {
    /// Error type for segmentation failures.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Produce the label volume to track, shape `(frames, height, width)`.
    fn segment(&mut self) -> std::result::Result<LabelVolume, Self::Error>;
}

/// Helper trait for converting label containers into a [`LabelVolume`].
pub trait IntoLabelVolume {
    fn into_label_volume(self) -> Result<LabelVolume>;
}

impl IntoLabelVolume for LabelVolume {
    fn into_label_volume(self) -> Result<LabelVolume> {
        Ok(self)
    }
}

impl IntoLabelVolume for Array3<u32> {
    fn into_label_volume(self) -> Result<LabelVolume> {
        LabelVolume::new(self)
    }
}

impl IntoLabelVolume for Vec<Array2<u32>> {
    fn into_label_volume(self) -> Result<LabelVolume> {
        LabelVolume::from_frames(self)
    }
}
