//! Sequential stitching of pairwise matches into track identities.

use std::collections::HashSet;

use tracing::debug;

use crate::error::{Result, TrackError};
use crate::tracker::centroid::CentroidSet;
use crate::tracker::config::{ContinuationPolicy, TrackerConfig};
use crate::tracker::matching::MatchSet;
use crate::tracker::track::{TrackEntry, TrackTable};

/// Consumed flags for every `(pair_index, match_index)`, stored flat.
struct VisitedMap {
    offsets: Vec<usize>,
    flags: Vec<bool>,
}

impl VisitedMap {
    fn new(match_sets: &[MatchSet]) -> Self {
        let mut offsets = Vec::with_capacity(match_sets.len());
        let mut total = 0;
        for set in match_sets {
            offsets.push(total);
            total += set.len();
        }
        Self {
            offsets,
            flags: vec![false; total],
        }
    }

    fn total(&self) -> usize {
        self.flags.len()
    }

    fn is_visited(&self, pair: usize, index: usize) -> bool {
        self.flags[self.offsets[pair] + index]
    }

    fn visit(&mut self, pair: usize, index: usize) {
        self.flags[self.offsets[pair] + index] = true;
    }

    fn visit_all(&mut self, pair: usize, len: usize) {
        let start = self.offsets[pair];
        self.flags[start..start + len].fill(true);
    }
}

/// Turns the match sets of a whole volume into a track table in one pass.
#[derive(Debug, Clone, Default)]
pub struct TrackStitcher {
    continuation: ContinuationPolicy,
}

impl TrackStitcher {
    pub fn new(continuation: ContinuationPolicy) -> Self {
        Self { continuation }
    }

    pub fn from_config(config: &TrackerConfig) -> Self {
        Self::new(config.continuation)
    }

    /// Stitch `match_sets` (one per adjacent frame pair) into tracks.
    ///
    /// Track ids are assigned in scan order: pair index ascending, then
    /// match index ascending. A track follows its child label into the next
    /// match set for as long as a pair with that parent label exists there.
    pub fn stitch(&self, match_sets: &[MatchSet], frame_count: usize) -> Result<TrackTable> {
        let expected = frame_count.saturating_sub(1);
        if match_sets.len() != expected {
            return Err(TrackError::MatchSetCount {
                expected,
                found: match_sets.len(),
            });
        }
        check_unique_labels(match_sets)?;

        let mut visited = VisitedMap::new(match_sets);
        let mut table = TrackTable::with_capacity(2 * visited.total());

        for (i, set) in match_sets.iter().enumerate() {
            for (j, pair) in set.iter().enumerate() {
                if visited.is_visited(i, j) {
                    continue;
                }
                visited.visit(i, j);

                let track_id = table.next_track_id();
                table.push(TrackEntry::from_centroid(track_id, i, &pair.parent));
                table.push(TrackEntry::from_centroid(track_id, i + 1, &pair.child));

                let mut label = pair.child.label;
                for (s, next) in match_sets.iter().enumerate().skip(i + 1) {
                    if self.continuation == ContinuationPolicy::Legacy {
                        visited.visit_all(s, next.len());
                    }
                    let Some(k) = next.find_parent(label) else {
                        break;
                    };
                    visited.visit(s, k);
                    table.push(TrackEntry::from_centroid(track_id, s + 1, &next[k].child));
                    label = next[k].child.label;
                }
            }
        }

        debug!(
            frames = frame_count,
            pairs = visited.total(),
            tracks = table.track_count(),
            entries = table.len(),
            "stitched tracks"
        );

        Ok(table)
    }

    /// Like [`stitch`](Self::stitch), but first verifies every pair against
    /// the centroid sets it was matched from.
    pub fn stitch_checked(
        &self,
        centroids: &[CentroidSet],
        match_sets: &[MatchSet],
    ) -> Result<TrackTable> {
        if match_sets.len() != centroids.len().saturating_sub(1) {
            return Err(TrackError::MatchSetCount {
                expected: centroids.len().saturating_sub(1),
                found: match_sets.len(),
            });
        }

        for (pair_index, set) in match_sets.iter().enumerate() {
            for pair in set {
                if !centroids[pair_index].contains(pair.parent.label) {
                    return Err(TrackError::UnknownLabel {
                        pair_index,
                        frame_index: pair_index,
                        label: pair.parent.label,
                    });
                }
                if !centroids[pair_index + 1].contains(pair.child.label) {
                    return Err(TrackError::UnknownLabel {
                        pair_index,
                        frame_index: pair_index + 1,
                        label: pair.child.label,
                    });
                }
            }
        }

        self.stitch(match_sets, centroids.len())
    }
}

fn check_unique_labels(match_sets: &[MatchSet]) -> Result<()> {
    for (pair_index, set) in match_sets.iter().enumerate() {
        let mut parents = HashSet::with_capacity(set.len());
        let mut children = HashSet::with_capacity(set.len());
        for pair in set {
            if !parents.insert(pair.parent.label) {
                return Err(TrackError::DuplicateParent {
                    pair_index,
                    label: pair.parent.label,
                });
            }
            if !children.insert(pair.child.label) {
                return Err(TrackError::DuplicateChild {
                    pair_index,
                    label: pair.child.label,
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::centroid::Centroid;
    use crate::tracker::matching::MatchPair;

    fn pair(parent: (u32, f64, f64), child: (u32, f64, f64)) -> MatchPair {
        MatchPair {
            parent: Centroid::new(parent.0, parent.1, parent.2),
            child: Centroid::new(child.0, child.1, child.2),
        }
    }

    fn rows(table: &TrackTable) -> Vec<[i64; 4]> {
        table.entries().iter().map(|e| e.to_row()).collect()
    }

    #[test]
    fn test_single_chain() {
        let sets = vec![
            MatchSet::new(vec![pair((1, 0.0, 0.0), (4, 1.0, 1.0))]),
            MatchSet::new(vec![pair((4, 1.0, 1.0), (9, 2.0, 2.0))]),
        ];
        let table = TrackStitcher::default().stitch(&sets, 3).unwrap();
        assert_eq!(rows(&table), vec![[0, 0, 0, 0], [0, 1, 1, 1], [0, 2, 2, 2]]);
    }

    #[test]
    fn test_chain_breaks_and_restarts() {
        // Label 2 in frame 1 has no continuation; label 3 in frame 1 starts a
        // new track in pair 1.
        let sets = vec![
            MatchSet::new(vec![pair((1, 0.0, 0.0), (2, 0.0, 1.0))]),
            MatchSet::new(vec![pair((3, 9.0, 9.0), (5, 9.0, 10.0))]),
        ];
        let table = TrackStitcher::default().stitch(&sets, 3).unwrap();
        assert_eq!(
            rows(&table),
            vec![[0, 0, 0, 0], [0, 1, 0, 1], [1, 1, 9, 9], [1, 2, 9, 10]]
        );
    }

    #[test]
    fn test_continuation_at_non_first_index() {
        let sets = vec![
            MatchSet::new(vec![pair((1, 0.0, 0.0), (2, 1.0, 0.0))]),
            MatchSet::new(vec![
                pair((7, 30.0, 30.0), (8, 31.0, 30.0)),
                pair((2, 1.0, 0.0), (3, 2.0, 0.0)),
            ]),
        ];

        let exact = TrackStitcher::default().stitch(&sets, 3).unwrap();
        assert_eq!(
            rows(&exact),
            vec![
                [0, 0, 0, 0],
                [0, 1, 1, 0],
                [0, 2, 2, 0],
                [1, 1, 30, 30],
                [1, 2, 31, 30],
            ]
        );

        // The searched match set is fully consumed, so the 7 -> 8 pair is lost.
        let legacy = TrackStitcher::new(ContinuationPolicy::Legacy)
            .stitch(&sets, 3)
            .unwrap();
        assert_eq!(rows(&legacy), vec![[0, 0, 0, 0], [0, 1, 1, 0], [0, 2, 2, 0]]);
        assert_eq!(legacy.track_count(), 1);
    }

    #[test]
    fn test_legacy_marks_set_even_without_continuation() {
        let sets = vec![
            MatchSet::new(vec![pair((1, 0.0, 0.0), (2, 1.0, 0.0))]),
            MatchSet::new(vec![pair((7, 30.0, 30.0), (8, 31.0, 30.0))]),
        ];
        let legacy = TrackStitcher::new(ContinuationPolicy::Legacy)
            .stitch(&sets, 3)
            .unwrap();
        assert_eq!(legacy.track_count(), 1);
        assert_eq!(legacy.len(), 2);
    }

    #[test]
    fn test_empty_inputs() {
        let stitcher = TrackStitcher::default();
        assert!(stitcher.stitch(&[], 1).unwrap().is_empty());
        assert!(stitcher.stitch(&[], 0).unwrap().is_empty());
        let sets = vec![MatchSet::default(), MatchSet::default()];
        assert!(stitcher.stitch(&sets, 3).unwrap().is_empty());
    }

    #[test]
    fn test_rejects_wrong_set_count() {
        let sets = vec![MatchSet::default()];
        assert!(matches!(
            TrackStitcher::default().stitch(&sets, 3),
            Err(TrackError::MatchSetCount {
                expected: 2,
                found: 1
            })
        ));
    }

    #[test]
    fn test_rejects_duplicate_labels() {
        let sets = vec![MatchSet::new(vec![
            pair((1, 0.0, 0.0), (2, 0.0, 0.0)),
            pair((1, 5.0, 5.0), (3, 5.0, 5.0)),
        ])];
        assert!(matches!(
            TrackStitcher::default().stitch(&sets, 2),
            Err(TrackError::DuplicateParent {
                pair_index: 0,
                label: 1
            })
        ));

        let sets = vec![MatchSet::new(vec![
            pair((1, 0.0, 0.0), (2, 0.0, 0.0)),
            pair((4, 5.0, 5.0), (2, 5.0, 5.0)),
        ])];
        assert!(matches!(
            TrackStitcher::default().stitch(&sets, 2),
            Err(TrackError::DuplicateChild {
                pair_index: 0,
                label: 2
            })
        ));
    }

    #[test]
    fn test_checked_rejects_unknown_label() {
        let centroids = vec![
            CentroidSet::from_centroids(vec![Centroid::new(1, 0.0, 0.0)]),
            CentroidSet::from_centroids(vec![Centroid::new(2, 0.0, 1.0)]),
        ];
        let sets = vec![MatchSet::new(vec![pair((1, 0.0, 0.0), (3, 0.0, 1.0))])];
        assert!(matches!(
            TrackStitcher::default().stitch_checked(&centroids, &sets),
            Err(TrackError::UnknownLabel {
                pair_index: 0,
                frame_index: 1,
                label: 3
            })
        ));

        let sets = vec![MatchSet::new(vec![pair((1, 0.0, 0.0), (2, 0.0, 1.0))])];
        let table = TrackStitcher::default()
            .stitch_checked(&centroids, &sets)
            .unwrap();
        assert_eq!(table.len(), 2);
    }
}
