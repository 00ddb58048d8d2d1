use crate::constants::MAX_OVERLAP_PATH_POINTS;
use crate::error::{AppError, Result};
use crate::models::{Coordinates, Segment, SegmentClassification};
use std::collections::BTreeSet;

/// Orientation of an ordered triplet in lng/lat plane coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Orientation {
    Collinear,
    Clockwise,
    CounterClockwise,
}

/// Cross product of (q - p) and (r - q), using lng as x and lat as y
fn cross(p: &Coordinates, q: &Coordinates, r: &Coordinates) -> f64 {
    (q.lat - p.lat) * (r.lng - q.lng) - (q.lng - p.lng) * (r.lat - q.lat)
}

fn orientation(p: &Coordinates, q: &Coordinates, r: &Coordinates) -> Orientation {
    let value = cross(p, q, r);
    if value == 0.0 {
        Orientation::Collinear
    } else if value > 0.0 {
        Orientation::Clockwise
    } else {
        Orientation::CounterClockwise
    }
}

/// Whether `q` lies inside the bounding box of segment `p`-`r`
fn on_segment(p: &Coordinates, q: &Coordinates, r: &Coordinates) -> bool {
    q.lng <= p.lng.max(r.lng)
        && q.lng >= p.lng.min(r.lng)
        && q.lat <= p.lat.max(r.lat)
        && q.lat >= p.lat.min(r.lat)
}

/// Whether segment `p1`-`q1` touches or crosses segment `p2`-`q2`
pub fn segments_intersect(
    p1: &Coordinates,
    q1: &Coordinates,
    p2: &Coordinates,
    q2: &Coordinates,
) -> bool {
    let o1 = orientation(p1, q1, p2);
    let o2 = orientation(p1, q1, q2);
    let o3 = orientation(p2, q2, p1);
    let o4 = orientation(p2, q2, q1);

    if o1 != o2 && o3 != o4 {
        return true;
    }

    // Collinear cases
    (o1 == Orientation::Collinear && on_segment(p1, p2, q1))
        || (o2 == Orientation::Collinear && on_segment(p1, q2, q1))
        || (o3 == Orientation::Collinear && on_segment(p2, p1, q2))
        || (o4 == Orientation::Collinear && on_segment(p2, q1, q2))
}

/// Indices of segments that intersect a non-adjacent segment of the same path.
///
/// Segments `i` and `j` are compared when `j >= i + 2`. On a closed path the first
/// and last segments meet at the closing vertex and count as adjacent.
pub fn find_overlapping_segments(path: &[Coordinates]) -> BTreeSet<usize> {
    let mut overlapping = BTreeSet::new();
    if path.len() < 4 {
        return overlapping;
    }

    let segment_count = path.len() - 1;
    let closed = path.first() == path.last();

    for i in 0..segment_count {
        for j in (i + 2)..segment_count {
            if closed && i == 0 && j == segment_count - 1 {
                continue;
            }
            if segments_intersect(&path[i], &path[i + 1], &path[j], &path[j + 1]) {
                overlapping.insert(i);
                overlapping.insert(j);
            }
        }
    }

    overlapping
}

/// Split a path's segments into normal and self-intersecting ones for display.
/// Quadratic in path length, so paths above `MAX_OVERLAP_PATH_POINTS` are refused.
pub fn classify_segments(path: &[Coordinates]) -> Result<SegmentClassification> {
    if path.len() > MAX_OVERLAP_PATH_POINTS {
        return Err(AppError::InvalidRequest(format!(
            "Path has {} points, overlap detection accepts at most {}",
            path.len(),
            MAX_OVERLAP_PATH_POINTS
        )));
    }

    let overlapping_indices = find_overlapping_segments(path);
    let mut classification = SegmentClassification::default();

    for (index, pair) in path.windows(2).enumerate() {
        let segment = Segment {
            index,
            start: pair[0],
            end: pair[1],
        };
        if overlapping_indices.contains(&index) {
            classification.overlapping.push(segment);
        } else {
            classification.normal.push(segment);
        }
    }

    Ok(classification)
}

/// Approximate the waypoint polygon of a path by sampling it every
/// `len / point_count` points, bracketed by `start`.
/// Indices past the end of short paths clamp to the last point.
pub fn resample_waypoints(
    path: &[Coordinates],
    start: Coordinates,
    point_count: usize,
) -> Vec<Coordinates> {
    let mut waypoints = Vec::with_capacity(point_count + 2);
    waypoints.push(start);

    if let Some(last_index) = path.len().checked_sub(1) {
        let step = (path.len() / point_count.max(1)).max(1);
        for i in 1..=point_count {
            let index = (i * step).min(last_index);
            waypoints.push(path[index]);
        }
    }

    waypoints.push(start);
    waypoints
}
