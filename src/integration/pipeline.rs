//! TrackingPipeline: label volume in, track table out.

use ndarray::ArrayView2;
use tracing::{info, warn};

use crate::error::{Result, TrackError};
use crate::tracker::{
    CentroidSet, LabelVolume, MatchSet, TrackStitcher, TrackTable, TrackerConfig,
    extract_centroids, match_centroids,
};

use super::{CancelToken, ExecutorConfig, LabelSource, ParallelExecutor};

/// End-to-end tracker over a whole label volume.
///
/// Centroid extraction and frame matching run on the worker pool; stitching
/// starts only once both parallel stages have fully drained.
#[derive(Debug)]
pub struct TrackingPipeline {
    config: TrackerConfig,
    executor: ParallelExecutor,
    cancel: CancelToken,
}

impl TrackingPipeline {
    /// Create a pipeline with the given tracker and executor configuration.
    pub fn new(config: TrackerConfig, executor: ExecutorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            executor: ParallelExecutor::new(&executor)?,
            cancel: CancelToken::new(),
        })
    }

    /// Create a pipeline with default configuration.
    pub fn with_default_config() -> Result<Self> {
        Self::new(TrackerConfig::default(), ExecutorConfig::default())
    }

    /// Token that aborts the current and future runs of this pipeline.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn executor(&self) -> &ParallelExecutor {
        &self.executor
    }

    /// Per-frame centroids, in frame order.
    pub fn extract(&self, volume: &LabelVolume) -> Result<Vec<CentroidSet>> {
        let frames: Vec<ArrayView2<u32>> = volume.frames().collect();
        self.executor
            .map(&frames, &self.cancel, |frame| Ok(extract_centroids(frame.view())))
    }

    /// Match sets for every adjacent frame pair, in pair order.
    pub fn match_frames(&self, centroids: &[CentroidSet]) -> Result<Vec<MatchSet>> {
        let pairs: Vec<(&CentroidSet, &CentroidSet)> =
            centroids.windows(2).map(|w| (&w[0], &w[1])).collect();
        self.executor.map(&pairs, &self.cancel, |(parents, children)| {
            match_centroids(parents, children, &self.config)
        })
    }

    /// Track every object in `volume`.
    pub fn run(&self, volume: &LabelVolume) -> Result<TrackTable> {
        let frame_count = volume.frame_count();
        info!(
            frames = frame_count,
            shape = ?volume.frame_shape(),
            workers = self.executor.workers(),
            "tracking started"
        );

        let centroids = self.guard(self.extract(volume))?;
        let objects: usize = centroids.iter().map(CentroidSet::len).sum();
        info!(objects, "centroids extracted");

        let match_sets = self.guard(self.match_frames(&centroids))?;
        let matched: usize = match_sets.iter().map(MatchSet::len).sum();
        info!(matched, "frames matched");

        self.guard(self.cancel.check())?;
        let table =
            TrackStitcher::from_config(&self.config).stitch_checked(&centroids, &match_sets)?;

        info!(
            tracks = table.track_count(),
            entries = table.len(),
            "tracking finished"
        );
        Ok(table)
    }

    /// Segment with `source`, then track the resulting volume.
    pub fn run_source<S: LabelSource>(&self, source: &mut S) -> Result<TrackTable> {
        let volume = source
            .segment()
            .map_err(|e| TrackError::Source(Box::new(e)))?;
        self.run(&volume)
    }

    fn guard<T>(&self, result: Result<T>) -> Result<T> {
        if let Err(TrackError::Cancelled) = &result {
            warn!("tracking cancelled before stitching");
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integration::LabelFrameBuilder;

    struct MockSource {
        volume: Option<LabelVolume>,
    }

    #[derive(Debug, thiserror::Error)]
    #[error("segmentation unavailable")]
    struct MockError;

    impl LabelSource for MockSource {
        type Error = MockError;

        fn segment(&mut self) -> std::result::Result<LabelVolume, Self::Error> {
            self.volume.take().ok_or(MockError)
        }
    }

    fn pipeline() -> TrackingPipeline {
        TrackingPipeline::new(TrackerConfig::default(), ExecutorConfig::with_threads(2)).unwrap()
    }

    fn moving_square() -> LabelVolume {
        let frames = (0..4)
            .map(|t| {
                LabelFrameBuilder::new(64, 64)
                    .square(1 + t as u32, 10 + 3 * t, 20, 2)
                    .build()
            })
            .collect();
        LabelVolume::from_frames(frames).unwrap()
    }

    #[test]
    fn test_tracker_pipeline() {
        let table = pipeline().run(&moving_square()).unwrap();
        assert_eq!(table.track_count(), 1);
        let rows: Vec<[i64; 4]> = table.entries().iter().map(|e| e.to_row()).collect();
        assert_eq!(
            rows,
            vec![[0, 0, 10, 20], [0, 1, 13, 20], [0, 2, 16, 20], [0, 3, 19, 20]]
        );
    }

    #[test]
    fn test_run_source() {
        let pipeline = pipeline();
        let mut source = MockSource {
            volume: Some(moving_square()),
        };
        assert_eq!(pipeline.run_source(&mut source).unwrap().len(), 4);
        assert!(matches!(
            pipeline.run_source(&mut source),
            Err(TrackError::Source(_))
        ));
    }

    #[test]
    fn test_cancelled_run() {
        let pipeline = pipeline();
        pipeline.cancel_token().cancel();
        assert!(matches!(
            pipeline.run(&moving_square()),
            Err(TrackError::Cancelled)
        ));
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = TrackerConfig {
            max_matching_dist: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            TrackingPipeline::new(config, ExecutorConfig::default()),
            Err(TrackError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_single_frame() {
        let volume = LabelVolume::from_frames(vec![
            LabelFrameBuilder::new(8, 8).pixel(1, 2, 2).build(),
        ])
        .unwrap();
        assert!(pipeline().run(&volume).unwrap().is_empty());
    }
}
