use crate::models::Coordinates;
use serde::{Deserialize, Serialize};

/// A single leg of a path, between `coordinates[index]` and `coordinates[index + 1]`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Segment {
    pub index: usize,
    pub start: Coordinates,
    pub end: Coordinates,
}

/// Partition of a path's segments by whether they cross another part of the path
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SegmentClassification {
    pub normal: Vec<Segment>,
    pub overlapping: Vec<Segment>,
}

impl SegmentClassification {
    pub fn overlapping_indices(&self) -> Vec<usize> {
        self.overlapping.iter().map(|s| s.index).collect()
    }

    pub fn has_overlaps(&self) -> bool {
        !self.overlapping.is_empty()
    }
}
