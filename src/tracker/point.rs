/// Sub-pixel position inside a frame, in (row, col) order.
///
/// Rows grow downwards and columns grow to the right, matching the layout of
/// the label arrays the positions are computed from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position(pub nalgebra::Point2<f64>);

impl Position {
    /// Create a position from row and column coordinates.
    #[inline]
    pub fn new(row: f64, col: f64) -> Self {
        Self(nalgebra::Point2::new(row, col))
    }

    #[inline]
    pub fn row(&self) -> f64 {
        self.0.x
    }

    #[inline]
    pub fn col(&self) -> f64 {
        self.0.y
    }

    /// Euclidean distance to another position.
    #[inline]
    pub fn distance(&self, other: &Position) -> f64 {
        nalgebra::distance(&self.0, &other.0)
    }

    /// Round to the nearest pixel, ties to even: `(row, col)`.
    #[inline]
    pub fn to_pixel(&self) -> (i64, i64) {
        (
            self.row().round_ties_even() as i64,
            self.col().round_ties_even() as i64,
        )
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

impl From<(f64, f64)> for Position {
    fn from((row, col): (f64, f64)) -> Self {
        Self::new(row, col)
    }
}

use ndarray::Array2;

/// Pairwise distance matrix between two sets of positions.
///
/// Returns a matrix of shape (M, N) where M is the length of `a`
/// and N is the length of `b`.
pub fn distance_matrix(a: &[Position], b: &[Position]) -> Array2<f64> {
    let mut dists = Array2::zeros((a.len(), b.len()));
    for (i, p) in a.iter().enumerate() {
        for (j, q) in b.iter().enumerate() {
            dists[[i, j]] = p.distance(q);
        }
    }
    dists
}
