mod centroid;
mod config;
mod frame;
mod matching;
mod point;
mod stitcher;
mod track;

pub use centroid::{Centroid, CentroidSet, extract_centroids};
pub use config::{APPROX_INF, ContinuationPolicy, MAX_MATCHING_DIST, TrackerConfig, VANISH_COST_FACTOR};
pub use frame::{Frame, LabelVolume};
pub use matching::{
    Assignment, MatchPair, MatchSet, cost_matrix, linear_assignment, match_centroids,
    solve_rectangular,
};
pub use point::{Position, distance_matrix};
pub use stitcher::TrackStitcher;
pub use track::{TrackEntry, TrackTable};
