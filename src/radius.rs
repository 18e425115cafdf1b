//! Radius query: all points within a given Euclidean distance of a center.
//!
//! Brute-force `O(n*d)`; a tree-based or batched-accelerator variant is
//! equally valid as long as it returns the same set. Ties at exactly
//! `radius` are included.

use rayon::prelude::*;

use crate::types::PointCloud;

/// Indices of every row of `points` within `radius` (inclusive) of row
/// `center`. Order is unspecified but stable within one call (ascending by
/// index, since that's the natural order of the parallel scan's collect).
pub fn radius_query(points: &PointCloud, center: usize, radius: f64) -> Vec<usize> {
    let n = points.nrows();
    (0..n)
        .into_par_iter()
        .filter(|&i| crate::distances::euclidean(points, center, i) <= radius)
        .collect()
}
