//! Persistence diagrams and small summary statistics over them.
//!
//! These are conveniences over the `PersistencePair` output of
//! `persistence_h0`/`persistence_h1`, not on the critical path of any
//! pipeline stage, but useful to a caller inspecting a result (see
//! DESIGN.md for why these specific helpers were kept and others trimmed).

use crate::types::PersistencePair;

/// A persistence diagram: a multiset of (birth, death, dimension) points.
#[derive(Debug, Clone, Default)]
pub struct PersistenceDiagram {
    pub points: Vec<(f64, f64, usize)>,
}

impl PersistenceDiagram {
    pub fn new() -> Self {
        PersistenceDiagram { points: Vec::new() }
    }

    /// Build a diagram from persistence pairs, restricting to `dimension`
    /// when given and dropping non-finite pairs (this crate's H0/H1 never
    /// emit those, but a diagram built by a caller from mixed sources
    /// might contain them).
    pub fn from_pairs(pairs: &[PersistencePair], dimension: Option<usize>) -> Self {
        let points = pairs
            .iter()
            .filter(|p| dimension.map_or(true, |d| p.dimension == d))
            .filter(|p| p.is_finite())
            .map(|p| (p.birth, p.death, p.dimension))
            .collect();
        PersistenceDiagram { points }
    }

    pub fn add_point(&mut self, birth: f64, death: f64, dimension: usize) {
        self.points.push((birth, death, dimension));
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points_by_dimension(&self, dimension: usize) -> Vec<(f64, f64)> {
        self.points
            .iter()
            .filter(|(_, _, d)| *d == dimension)
            .map(|(b, d, _)| (*b, *d))
            .collect()
    }

    pub fn persistence_values(&self) -> Vec<f64> {
        self.points.iter().map(|(b, d, _)| d - b).collect()
    }

    /// Points whose lifetime is at least `threshold`. This is a plain
    /// fixed-threshold cut, distinct from the mean/stddev significance rule
    /// in `crate::features` — useful when a caller already knows the scale
    /// of lifetime they care about.
    pub fn significant_features(&self, threshold: f64) -> Vec<(f64, f64, usize)> {
        self.points
            .iter()
            .filter(|(b, d, _)| d - b >= threshold)
            .copied()
            .collect()
    }
}

/// Number of homology classes of `dimension` alive at filtration value `t`:
/// pairs with `birth <= t < death`. Matches the usual persistent Betti
/// number definition, specialized to this crate's `[PersistencePair]`
/// representation rather than a full simplicial complex.
pub fn betti_number(pairs: &[PersistencePair], dimension: usize, t: f64) -> usize {
    pairs
        .iter()
        .filter(|p| p.dimension == dimension && p.is_finite())
        .filter(|p| p.birth <= t && t < p.death)
        .count()
}

/// Euler characteristic at filtration value `t`, `chi(t) = beta_0(t) -
/// beta_1(t)`, the alternating sum of Betti numbers for the two dimensions
/// this crate computes.
pub fn euler_characteristic(pairs: &[PersistencePair], t: f64) -> i64 {
    let beta0 = betti_number(pairs, 0, t) as i64;
    let beta1 = betti_number(pairs, 1, t) as i64;
    beta0 - beta1
}

/// Shannon entropy of the normalized lifetime distribution — a scalar
/// summary of how concentrated a diagram's persistence is in one or two
/// long-lived features versus spread across many short-lived ones.
pub fn persistence_entropy(diagram: &PersistenceDiagram) -> f64 {
    let lifetimes = diagram.persistence_values();
    if lifetimes.is_empty() {
        return 0.0;
    }
    let total: f64 = lifetimes.iter().sum();
    if total == 0.0 {
        return 0.0;
    }
    -lifetimes
        .iter()
        .map(|&l| l / total)
        .filter(|&p| p > 0.0)
        .map(|p| p * p.ln())
        .sum::<f64>()
}
