//! Integration module for running the tracker over whole label volumes.
//!
//! This module provides the seam to external segmentation backends, the
//! worker pool that parallelizes the per-frame stages, and the pipeline that
//! ties them to the stitcher.

mod builder;
mod executor;
mod pipeline;
mod source;

pub use builder::LabelFrameBuilder;
pub use executor::{CancelToken, ExecutionMode, ExecutorConfig, ParallelExecutor};
pub use pipeline::TrackingPipeline;
pub use source::{IntoLabelVolume, LabelSource};
