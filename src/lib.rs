//! Centroid-based multi-object tracking for time-lapse cell segmentation.
//!
//! A label volume (one instance-segmentation label image per frame) is turned
//! into a flat track table in three steps: per-frame centroid extraction,
//! optimal assignment between adjacent frames, and sequential stitching of
//! the pairwise matches into track identities.

pub mod error;
pub mod integration;
pub mod tracker;

pub use error::{Result, TrackError};
pub use integration::{
    CancelToken, ExecutionMode, ExecutorConfig, IntoLabelVolume, LabelFrameBuilder, LabelSource,
    ParallelExecutor, TrackingPipeline,
};
pub use tracker::{
    Assignment, Centroid, CentroidSet, ContinuationPolicy, LabelVolume, MatchPair, MatchSet,
    Position, TrackEntry, TrackStitcher, TrackTable, TrackerConfig, extract_centroids,
    match_centroids,
};
