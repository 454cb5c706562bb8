use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrackError {
    #[error("label volume contains no frames")]
    EmptyVolume,
    #[error("frame {index} has shape {found:?}, expected {expected:?}")]
    DimensionMismatch {
        index: usize,
        expected: (usize, usize),
        found: (usize, usize),
    },
    #[error("invalid tracker configuration: {0}")]
    InvalidConfig(String),
    #[error("assignment solver failed: {0}")]
    Assignment(String),
    #[error("expected {expected} match sets, got {found}")]
    MatchSetCount { expected: usize, found: usize },
    #[error("match set {pair_index} references label {label} absent from frame {frame_index}")]
    UnknownLabel {
        pair_index: usize,
        frame_index: usize,
        label: u32,
    },
    #[error("match set {pair_index} contains parent label {label} more than once")]
    DuplicateParent { pair_index: usize, label: u32 },
    #[error("match set {pair_index} contains child label {label} more than once")]
    DuplicateChild { pair_index: usize, label: u32 },
    #[error("tracking run was cancelled")]
    Cancelled,
    #[error("failed to build worker pool: {0}")]
    ThreadPool(String),
    #[error("label source failed: {0}")]
    Source(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T> = std::result::Result<T, TrackError>;
