//! Point-to-point distance helpers shared by kNN search and radius queries.

use crate::types::PointCloud;

/// Squared Euclidean distance between rows `i` and `j` of `points`.
///
/// Kept separate from [`euclidean`] so callers that only need ordering
/// (kNN's top-k maintenance) can avoid the square root entirely.
#[inline]
pub fn squared_euclidean(points: &PointCloud, i: usize, j: usize) -> f64 {
    let mut acc = 0.0;
    for col in 0..points.ncols() {
        let diff = points[(i, col)] - points[(j, col)];
        acc += diff * diff;
    }
    acc
}

/// Euclidean distance between rows `i` and `j` of `points`. `sqrt(0)` is `0`,
/// so coincident points are admitted rather than producing `NaN`.
#[inline]
pub fn euclidean(points: &PointCloud, i: usize, j: usize) -> f64 {
    squared_euclidean(points, i, j).sqrt()
}
