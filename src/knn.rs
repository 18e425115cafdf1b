//! Brute-force k-nearest-neighbor search on a dense point cloud.
//!
//! `knn(P, k) -> (D, I)`: `D` ascending per row, `I[i, r] != i`, ties broken
//! by ascending index. Distances are Euclidean, not squared; the square
//! root is taken once per retained neighbor rather than once per candidate
//! pair.

use log::debug;
use rayon::prelude::*;

use crate::distances::squared_euclidean;
use crate::error::{PipelineError, Result};
use crate::types::{KnnResult, PointCloud};

/// One query's top-k accumulator: ascending by squared distance, ties by
/// ascending index. Kept as a sorted `Vec` rather than a `BinaryHeap` since
/// `k` is small (tens) and insertion is a linear scan with early exit —
/// simpler than heap bookkeeping and just as fast at this scale.
struct TopK {
    // (squared_distance, index), ascending.
    entries: Vec<(f64, usize)>,
    capacity: usize,
}

impl TopK {
    fn new(capacity: usize) -> Self {
        TopK {
            entries: Vec::with_capacity(capacity),
            capacity,
        }
    }

    fn offer(&mut self, dist_sq: f64, idx: usize) {
        if self.entries.len() == self.capacity {
            if let Some(&(worst, _)) = self.entries.last() {
                if dist_sq > worst || (dist_sq == worst && idx > self.entries.last().unwrap().1) {
                    return;
                }
            }
        }

        let pos = self
            .entries
            .partition_point(|&(d, i)| (d, i) < (dist_sq, idx));
        self.entries.insert(pos, (dist_sq, idx));
        if self.entries.len() > self.capacity {
            self.entries.truncate(self.capacity);
        }
    }
}

/// Run brute-force kNN search on `points`, excluding self, returning
/// ascending Euclidean distances and their neighbor indices per row.
///
/// Fails with `InvalidArgument` when `n <= 0`, `d <= 0`, `k <= 0`, or
/// `k >= n`, and rejects non-finite entries in `points`.
pub fn knn(points: &PointCloud, k: usize) -> Result<KnnResult> {
    let n = points.nrows();
    let d = points.ncols();

    if n == 0 {
        return Err(PipelineError::InvalidArgument(
            "point cloud must have n >= 2 rows".to_string(),
        ));
    }
    if d == 0 {
        return Err(PipelineError::InvalidArgument(
            "point cloud must have d >= 1 columns".to_string(),
        ));
    }
    if n < 2 {
        return Err(PipelineError::InvalidArgument(
            "point cloud must have n >= 2 rows".to_string(),
        ));
    }
    if k == 0 {
        return Err(PipelineError::InvalidArgument(
            "k must be a positive integer".to_string(),
        ));
    }
    if k >= n {
        return Err(PipelineError::InvalidArgument(format!(
            "k ({k}) must be strictly less than n ({n})"
        )));
    }
    if !points.iter().all(|x| x.is_finite()) {
        return Err(PipelineError::InvalidArgument(
            "point cloud contains non-finite entries".to_string(),
        ));
    }

    debug!("knn: n={n} d={d} k={k}, brute force over {} pairs", n * (n - 1) / 2);

    // Each query is independent, so rows are computed in parallel; the
    // result is invariant under the choice of worker count.
    let rows: Vec<TopK> = (0..n)
        .into_par_iter()
        .map(|i| {
            let mut top = TopK::new(k);
            for j in 0..n {
                if j == i {
                    continue;
                }
                let dist_sq = squared_euclidean(points, i, j);
                top.offer(dist_sq, j);
            }
            top
        })
        .collect();

    let mut distances = nalgebra::DMatrix::<f64>::zeros(n, k);
    let mut indices = nalgebra::DMatrix::<i32>::zeros(n, k);
    for (i, top) in rows.into_iter().enumerate() {
        for (r, &(dist_sq, idx)) in top.entries.iter().enumerate() {
            distances[(i, r)] = dist_sq.sqrt();
            indices[(i, r)] = idx as i32;
        }
    }

    Ok(KnnResult {
        distances,
        indices,
        n,
        k,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::DMatrix;

    fn line_points() -> PointCloud {
        // (0,0) (1,0) (2,0) (3,0)
        DMatrix::from_row_slice(4, 2, &[0.0, 0.0, 1.0, 0.0, 2.0, 0.0, 3.0, 0.0])
    }

    #[test]
    fn rejects_k_too_large() {
        let pts = line_points();
        assert!(matches!(
            knn(&pts, 4),
            Err(PipelineError::InvalidArgument(_))
        ));
        assert!(matches!(
            knn(&pts, 5),
            Err(PipelineError::InvalidArgument(_))
        ));
    }

    #[test]
    fn rejects_zero_k() {
        let pts = line_points();
        assert!(matches!(
            knn(&pts, 0),
            Err(PipelineError::InvalidArgument(_))
        ));
    }

    #[test]
    fn rejects_non_finite_input() {
        let pts = DMatrix::from_row_slice(3, 2, &[0.0, 0.0, 1.0, 0.0, f64::NAN, 0.0]);
        assert!(matches!(
            knn(&pts, 1),
            Err(PipelineError::InvalidArgument(_))
        ));
    }

    #[test]
    fn row_ordering_is_ascending_and_excludes_self() {
        let pts = line_points();
        let result = knn(&pts, 2).unwrap();
        for i in 0..4 {
            assert!(result.distance(i, 0) <= result.distance(i, 1));
            assert_ne!(result.neighbor(i, 0), i);
            assert_ne!(result.neighbor(i, 1), i);
        }
    }

    #[test]
    fn nearest_neighbors_on_a_line_are_adjacent() {
        let pts = line_points();
        let result = knn(&pts, 1).unwrap();
        // point 0's nearest neighbor is point 1 at distance 1
        assert_eq!(result.neighbor(0, 0), 1);
        assert_eq!(result.distance(0, 0), 1.0);
        // point 3's nearest neighbor is point 2
        assert_eq!(result.neighbor(3, 0), 2);
    }

    #[test]
    fn symmetry_on_exact_distances() {
        let pts = line_points();
        let result = knn(&pts, 2).unwrap();
        for i in 0..4 {
            for r in 0..2 {
                let j = result.neighbor(i, r);
                let d_ij = result.distance(i, r);
                // j's neighbor list must contain i at the same distance
                let found = (0..2).any(|r2| {
                    result.neighbor(j, r2) == i && (result.distance(j, r2) - d_ij).abs() < 1e-12
                });
                assert!(found, "expected {i} in {j}'s neighbor list at distance {d_ij}");
            }
        }
    }

    #[test]
    fn coincident_points_yield_zero_distance() {
        let pts = DMatrix::from_row_slice(3, 2, &[1.0, 1.0, 1.0, 1.0, 5.0, 5.0]);
        let result = knn(&pts, 1).unwrap();
        assert_eq!(result.distance(0, 0), 0.0);
        assert_eq!(result.neighbor(0, 0), 1);
    }

    #[test]
    fn sqrt_applied_once_per_retained_neighbor() {
        // 3-4-5 triangle: distances should come out exact, not accumulated
        // squared-distance error from repeated sqrt.
        let pts = DMatrix::from_row_slice(3, 2, &[0.0, 0.0, 3.0, 0.0, 0.0, 4.0]);
        let result = knn(&pts, 2).unwrap();
        let mut dists: Vec<f64> = (0..2).map(|r| result.distance(0, r)).collect();
        dists.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert!((dists[0] - 3.0).abs() < 1e-12);
        assert!((dists[1] - 4.0).abs() < 1e-12);
    }
}
