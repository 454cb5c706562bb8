//! Matching utilities between centroids of adjacent frames.

use ndarray::{Array2, s};
use tracing::debug;

use crate::error::{Result, TrackError};
use crate::tracker::centroid::{Centroid, CentroidSet};
use crate::tracker::config::TrackerConfig;
use crate::tracker::point::distance_matrix;

/// An object in frame `i` believed to be the same physical object as `child` in frame `i + 1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchPair {
    pub parent: Centroid,
    pub child: Centroid,
}

/// All match pairs between one adjacent frame pair, in solver row order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchSet {
    pairs: Vec<MatchPair>,
}

impl MatchSet {
    pub fn new(pairs: Vec<MatchPair>) -> Self {
        Self { pairs }
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MatchPair> {
        self.pairs.iter()
    }

    pub fn get(&self, index: usize) -> Option<&MatchPair> {
        self.pairs.get(index)
    }

    /// Index of the pair whose parent carries `label`.
    pub fn find_parent(&self, label: u32) -> Option<usize> {
        self.pairs.iter().position(|p| p.parent.label == label)
    }
}

impl std::ops::Index<usize> for MatchSet {
    type Output = MatchPair;

    fn index(&self, index: usize) -> &MatchPair {
        &self.pairs[index]
    }
}

impl<'a> IntoIterator for &'a MatchSet {
    type Item = &'a MatchPair;
    type IntoIter = std::slice::Iter<'a, MatchPair>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.iter()
    }
}

/// Solver outcome for one parent row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assignment {
    /// The parent continues as the child at this index of the child set.
    Matched(usize),
    /// The parent has no continuation in the next frame.
    Vanished,
}

/// Build the augmented `(P, P + C)` cost matrix for `P` parents and `C` children.
///
/// The first `C` columns hold parent/child distances, with anything beyond
/// `max_matching_dist` replaced by `approx_inf`. The remaining `P` columns
/// all cost `vanish_cost()` and let a parent disappear.
pub fn cost_matrix(
    parents: &CentroidSet,
    children: &CentroidSet,
    config: &TrackerConfig,
) -> Array2<f64> {
    let num_parents = parents.len();
    let num_children = children.len();

    let mut dists = distance_matrix(&parents.positions(), &children.positions());
    dists.mapv_inplace(|d| {
        if d > config.max_matching_dist {
            config.approx_inf
        } else {
            d
        }
    });

    let mut augmented =
        Array2::from_elem((num_parents, num_parents + num_children), config.vanish_cost());
    augmented
        .slice_mut(s![.., ..num_children])
        .assign(&dists);
    augmented
}

/// Solve a rectangular minimum-cost assignment with at least as many columns as rows.
///
/// Returns the chosen column for every row; no column is used twice.
pub fn solve_rectangular(cost: &Array2<f64>) -> Result<Vec<usize>> {
    let (num_rows, num_cols) = cost.dim();

    if num_rows == 0 {
        return Ok(vec![]);
    }
    if num_rows > num_cols {
        return Err(TrackError::Assignment(format!(
            "cost matrix {num_rows}x{num_cols} has more rows than columns"
        )));
    }
    if cost.iter().any(|c| !c.is_finite()) {
        return Err(TrackError::Assignment(
            "cost matrix contains non-finite entries".to_string(),
        ));
    }

    // Zero-cost filler rows take up the columns no real row wants.
    let mut padded = Array2::<f64>::zeros((num_cols, num_cols));
    padded.slice_mut(s![..num_rows, ..]).assign(cost);

    let (row_to_col, _) =
        lapjv::lapjv(&padded).map_err(|e| TrackError::Assignment(format!("{e:?}")))?;

    if row_to_col.len() != num_cols {
        return Err(TrackError::Assignment(format!(
            "solver returned {} rows, expected {num_cols}",
            row_to_col.len()
        )));
    }

    let mut used = vec![false; num_cols];
    let mut columns = Vec::with_capacity(num_rows);
    for &col in &row_to_col[..num_rows] {
        if col >= num_cols || used[col] {
            return Err(TrackError::Assignment(format!(
                "solver produced invalid column {col}"
            )));
        }
        used[col] = true;
        columns.push(col);
    }
    Ok(columns)
}

/// Solve the augmented cost matrix and classify each parent row.
pub fn linear_assignment(
    cost: &Array2<f64>,
    num_children: usize,
    config: &TrackerConfig,
) -> Result<Vec<Assignment>> {
    let (num_parents, num_cols) = cost.dim();
    if num_cols != num_parents + num_children {
        return Err(TrackError::Assignment(format!(
            "augmented cost matrix has {num_cols} columns, expected {}",
            num_parents + num_children
        )));
    }

    let columns = solve_rectangular(cost)?;
    Ok(columns
        .into_iter()
        .enumerate()
        .map(|(row, col)| {
            if col < num_children && cost[[row, col]] < config.approx_inf {
                Assignment::Matched(col)
            } else {
                Assignment::Vanished
            }
        })
        .collect())
}

/// Optimally match the centroids of frame `i` to those of frame `i + 1`.
///
/// Parents assigned to an auxiliary column vanish and children no parent
/// picked are births; neither yields a [`MatchPair`].
pub fn match_centroids(
    parents: &CentroidSet,
    children: &CentroidSet,
    config: &TrackerConfig,
) -> Result<MatchSet> {
    if parents.is_empty() || children.is_empty() {
        return Ok(MatchSet::default());
    }

    let cost = cost_matrix(parents, children, config);
    let assignments = linear_assignment(&cost, children.len(), config)?;

    let pairs: Vec<MatchPair> = assignments
        .iter()
        .enumerate()
        .filter_map(|(row, assignment)| match *assignment {
            Assignment::Matched(col) => Some(MatchPair {
                parent: parents[row],
                child: children[col],
            }),
            Assignment::Vanished => None,
        })
        .collect();

    debug!(
        parents = parents.len(),
        children = children.len(),
        matched = pairs.len(),
        vanished = parents.len() - pairs.len(),
        born = children.len() - pairs.len(),
        "matched frame pair"
    );

    Ok(MatchSet::new(pairs))
}
