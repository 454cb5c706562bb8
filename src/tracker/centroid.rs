//! Per-frame centroid extraction.

use std::collections::BTreeMap;

use crate::tracker::frame::Frame;
use crate::tracker::point::Position;

/// Center of mass of all pixels carrying `label` in one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Centroid {
    pub label: u32,
    pub position: Position,
}

impl Centroid {
    pub fn new(label: u32, row: f64, col: f64) -> Self {
        Self {
            label,
            position: Position::new(row, col),
        }
    }
}

/// Centroids of one frame, sorted by ascending label.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CentroidSet {
    centroids: Vec<Centroid>,
}

impl CentroidSet {
    /// Build a set from arbitrary centroids. Sorts by label; a repeated label
    /// keeps its first occurrence.
    pub fn from_centroids(mut centroids: Vec<Centroid>) -> Self {
        centroids.sort_by_key(|c| c.label);
        centroids.dedup_by_key(|c| c.label);
        Self { centroids }
    }

    pub fn len(&self) -> usize {
        self.centroids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.centroids.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Centroid> {
        self.centroids.iter()
    }

    pub fn as_slice(&self) -> &[Centroid] {
        &self.centroids
    }

    pub fn positions(&self) -> Vec<Position> {
        self.centroids.iter().map(|c| c.position).collect()
    }

    pub fn labels(&self) -> Vec<u32> {
        self.centroids.iter().map(|c| c.label).collect()
    }

    /// Look up the centroid of `label`.
    pub fn get(&self, label: u32) -> Option<&Centroid> {
        self.centroids
            .binary_search_by_key(&label, |c| c.label)
            .ok()
            .map(|i| &self.centroids[i])
    }

    pub fn contains(&self, label: u32) -> bool {
        self.get(label).is_some()
    }
}

impl std::ops::Index<usize> for CentroidSet {
    type Output = Centroid;

    fn index(&self, index: usize) -> &Centroid {
        &self.centroids[index]
    }
}

impl<'a> IntoIterator for &'a CentroidSet {
    type Item = &'a Centroid;
    type IntoIter = std::slice::Iter<'a, Centroid>;

    fn into_iter(self) -> Self::IntoIter {
        self.centroids.iter()
    }
}

#[derive(Default)]
struct Moments {
    row_sum: f64,
    col_sum: f64,
    count: u64,
}

/// Compute the unweighted center of mass of every non-zero label in `frame`.
///
/// An all-background frame yields an empty set.
pub fn extract_centroids(frame: Frame<'_>) -> CentroidSet {
    let mut moments: BTreeMap<u32, Moments> = BTreeMap::new();

    for ((row, col), &label) in frame.indexed_iter() {
        if label == 0 {
            continue;
        }
        let m = moments.entry(label).or_default();
        m.row_sum += row as f64;
        m.col_sum += col as f64;
        m.count += 1;
    }

    let centroids = moments
        .into_iter()
        .map(|(label, m)| {
            let n = m.count as f64;
            Centroid::new(label, m.row_sum / n, m.col_sum / n)
        })
        .collect();

    CentroidSet { centroids }
}
