//! Density filtration: kth-neighbor distance to filtration value.
//!
//! A superlevel-set "higher density ⇒ earlier birth" problem is converted
//! into a sublevel-set filtration via negation, which is what the H0/H1
//! reduction machinery expects.

use num_traits::Float;

use crate::types::KnnResult;

/// Clamp `x` up to `floor`, generic over any `Float` so the same clamp
/// logic is reusable regardless of the numeric precision a caller chooses.
#[inline]
fn clamp_min<T: Float>(x: T, floor: T) -> T {
    if x > floor {
        x
    } else {
        floor
    }
}

/// `F[i] = -1 / max(kth[i], epsilon)`. The `epsilon` clamp prevents a
/// division blow-up when two points coincide (`kth[i] == 0`).
pub fn filtration(result: &KnnResult, epsilon: f64) -> Vec<f64> {
    (0..result.n)
        .map(|i| -1.0 / clamp_min(result.kth_distance(i), epsilon))
        .collect()
}
