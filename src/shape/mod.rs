use crate::shared::LngLat;
use serde::{Deserialize, Serialize};
use std::ops::Range;

pub mod generator;
pub mod router;

/// How much of a shape's path survived generation. Anything other than
/// `Complete` means at least one routing chunk was dropped after its
/// retries ran out, leaving a gap in the path.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeStatus {
    #[default]
    Complete,
    Partial,
    Failed,
}

impl ShapeStatus {
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete)
    }
}

/// A pattern's road path plus the index of each of its stops on that path.
///
/// Invariant: `stop_indices.len()` equals the number of stops in the
/// pattern key, and the indices are non-decreasing in stop order.
/// `status` only serializes when degraded, so healthy records and
/// hand-authored overrides keep the plain `{coordinates, stop_indices}`
/// form the viewer expects.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub coordinates: Vec<LngLat>,
    #[serde(default)]
    pub stop_indices: Vec<usize>,
    #[serde(default, skip_serializing_if = "ShapeStatus::is_complete")]
    pub status: ShapeStatus,
}

/// Overlapping waypoint windows over `len` points: a new window starts
/// every `stride` points and runs one point into the next window, so
/// consecutive road segments share a boundary coordinate. The default
/// stride of 20 keeps every request at or under 21 waypoints.
pub fn chunk_ranges(len: usize, stride: usize) -> Vec<Range<usize>> {
    assert!(stride >= 1);
    if len < 2 {
        return Vec::new();
    }
    (0..len - 1)
        .step_by(stride)
        .map(|start| start..usize::min(start + stride + 1, len))
        .collect()
}

/// Matches each stop to its nearest path coordinate by squared euclidean
/// distance, searching forward only from the previous stop's match. Assumes
/// the path never backtracks past an earlier stop; when that is violated
/// the match degrades to the nearest point in the remaining window, which
/// is still deterministic.
pub fn match_stops(path: &[LngLat], stops: &[LngLat]) -> Vec<usize> {
    let mut indices = Vec::with_capacity(stops.len());
    let mut search_start = 0;
    for stop in stops {
        let mut closest = 0;
        let mut closest_dist = f64::INFINITY;
        for (i, point) in path.iter().enumerate().skip(search_start) {
            let dist = point.sq_dist(stop);
            if dist < closest_dist {
                closest_dist = dist;
                closest = i;
            }
        }
        indices.push(closest);
        search_start = closest;
    }
    indices
}

#[test]
fn chunk_ranges_short_test() {
    assert!(chunk_ranges(0, 20).is_empty());
    assert!(chunk_ranges(1, 20).is_empty());
    assert_eq!(chunk_ranges(2, 20), vec![0..2]);
    assert_eq!(chunk_ranges(21, 20), vec![0..21]);
}

#[test]
fn chunk_ranges_overlap_test() {
    // 25 points: one full window of 21, one of 5, sharing point 20.
    assert_eq!(chunk_ranges(25, 20), vec![0..21, 20..25]);
    assert_eq!(chunk_ranges(41, 20), vec![0..21, 20..41]);
    assert_eq!(chunk_ranges(42, 20), vec![0..21, 20..41, 40..42]);
}
