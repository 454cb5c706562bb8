//! Track table: the flat `[track_id, frame_index, row, col]` output of stitching.

use ndarray::Array2;

use crate::tracker::centroid::Centroid;

/// One observation of a track in one frame, at integer pixel precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TrackEntry {
    pub track_id: u64,
    pub frame_index: usize,
    pub row: i64,
    pub col: i64,
}

impl TrackEntry {
    pub fn from_centroid(track_id: u64, frame_index: usize, centroid: &Centroid) -> Self {
        let (row, col) = centroid.position.to_pixel();
        Self {
            track_id,
            frame_index,
            row,
            col,
        }
    }

    pub fn to_row(&self) -> [i64; 4] {
        [
            self.track_id as i64,
            self.frame_index as i64,
            self.row,
            self.col,
        ]
    }
}

/// Entries grouped by track id in creation order, frame-ascending within a track.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackTable {
    entries: Vec<TrackEntry>,
    track_count: u64,
}

impl TrackTable {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            track_count: 0,
        }
    }

    /// Allocate the next track id.
    pub(crate) fn next_track_id(&mut self) -> u64 {
        let id = self.track_count;
        self.track_count += 1;
        id
    }

    pub(crate) fn push(&mut self, entry: TrackEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[TrackEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of distinct tracks.
    pub fn track_count(&self) -> u64 {
        self.track_count
    }

    /// Iterate over the entries of each track, one slice per track.
    pub fn tracks(&self) -> impl Iterator<Item = &[TrackEntry]> {
        self.entries.chunk_by(|a, b| a.track_id == b.track_id)
    }

    /// All entries of one track.
    pub fn track(&self, track_id: u64) -> Option<&[TrackEntry]> {
        self.tracks().find(|t| t[0].track_id == track_id)
    }

    /// Convert to an `(n, 4)` array with columns `[track_id, frame_index, row, col]`.
    pub fn to_array(&self) -> Array2<i64> {
        let mut out = Array2::zeros((self.entries.len(), 4));
        for (mut row, entry) in out.rows_mut().into_iter().zip(&self.entries) {
            for (dst, src) in row.iter_mut().zip(entry.to_row()) {
                *dst = src;
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(track_id: u64, frame_index: usize, row: i64, col: i64) -> TrackEntry {
        TrackEntry {
            track_id,
            frame_index,
            row,
            col,
        }
    }

    #[test]
    fn test_from_centroid_rounds() {
        let c = Centroid::new(3, 2.5, 7.6);
        assert_eq!(TrackEntry::from_centroid(4, 1, &c), entry(4, 1, 2, 8));
    }

    #[test]
    fn test_to_array() {
        let mut table = TrackTable::default();
        let id = table.next_track_id();
        table.push(entry(id, 0, 1, 2));
        table.push(entry(id, 1, 3, 4));

        let array = table.to_array();
        assert_eq!(array, ndarray::array![[0i64, 0, 1, 2], [0, 1, 3, 4]]);
        assert_eq!(TrackTable::default().to_array().dim(), (0, 4));
    }

    #[test]
    fn test_tracks_grouping() {
        let mut table = TrackTable::default();
        for _ in 0..2 {
            let id = table.next_track_id();
            table.push(entry(id, 2, 0, 0));
            table.push(entry(id, 3, 0, 0));
        }

        assert_eq!(table.track_count(), 2);
        assert_eq!(table.tracks().count(), 2);
        assert_eq!(table.track(1).unwrap().len(), 2);
        assert!(table.track(2).is_none());
    }
}
