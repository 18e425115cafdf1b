//! Core data model shared across pipeline stages.
//!
//! Ownership follows the single-shot pipeline model: each stage owns the
//! arrays it produces and hands them by move to the next stage. Nothing here
//! is reference-counted — there is exactly one consumer for every
//! intermediate value.

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

/// Dense (n, d) point cloud, row-major: row `i` is point `i`'s coordinates.
pub type PointCloud = DMatrix<f64>;

/// Output of [`crate::knn::knn`]: per-row ascending distances and the
/// neighbor indices they belong to, both shape (n, k).
#[derive(Debug, Clone)]
pub struct KnnResult {
    /// `distances[(i, r)]` is the Euclidean distance from point `i` to its
    /// `r`-th nearest neighbor, ascending in `r`.
    pub distances: DMatrix<f64>,
    /// `indices[(i, r)]` is the point index of `i`'s `r`-th nearest
    /// neighbor; never equal to `i`.
    pub indices: DMatrix<i32>,
    pub n: usize,
    pub k: usize,
}

impl KnnResult {
    pub fn distance(&self, i: usize, r: usize) -> f64 {
        self.distances[(i, r)]
    }

    pub fn neighbor(&self, i: usize, r: usize) -> usize {
        self.indices[(i, r)] as usize
    }

    /// The kth (last, largest) distance for point `i` — the input to
    /// [`crate::filtration::filtration`].
    pub fn kth_distance(&self, i: usize) -> f64 {
        self.distances[(i, self.k - 1)]
    }
}

/// An undirected edge in the 1-skeleton, canonicalized so `src < dst`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub src: usize,
    pub dst: usize,
    pub filt: f64,
}

impl Edge {
    pub fn new(a: usize, b: usize, filt: f64) -> Self {
        debug_assert_ne!(a, b);
        if a < b {
            Edge { src: a, dst: b, filt }
        } else {
            Edge { src: b, dst: a, filt }
        }
    }

    pub fn key(&self) -> (usize, usize) {
        (self.src, self.dst)
    }
}

/// A 2-simplex in the 2-skeleton, with vertices sorted ascending.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub v0: usize,
    pub v1: usize,
    pub v2: usize,
    pub filt: f64,
}

impl Triangle {
    pub fn new(mut vs: [usize; 3], filt: f64) -> Self {
        vs.sort_unstable();
        Triangle {
            v0: vs[0],
            v1: vs[1],
            v2: vs[2],
            filt,
        }
    }

    /// The three bounding edges, each as a canonical `(min, max)` key.
    pub fn edge_keys(&self) -> [(usize, usize); 3] {
        [(self.v0, self.v1), (self.v0, self.v2), (self.v1, self.v2)]
    }

    pub fn key(&self) -> (usize, usize, usize) {
        (self.v0, self.v1, self.v2)
    }
}

/// A birth/death pair for a homology class in a given dimension.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PersistencePair {
    pub dimension: usize,
    pub birth: f64,
    pub death: f64,
}

impl PersistencePair {
    pub fn new(dimension: usize, birth: f64, death: f64) -> Self {
        PersistencePair {
            dimension,
            birth,
            death,
        }
    }

    pub fn lifetime(&self) -> f64 {
        self.death - self.birth
    }

    pub fn is_finite(&self) -> bool {
        self.birth.is_finite() && self.death.is_finite()
    }
}

/// A significant feature with its enumerated membership.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    pub birth: f64,
    pub death: f64,
    pub lifetime: f64,
    pub members: Vec<i32>,
}

/// Summary of a single pipeline invocation, produced alongside the
/// persistence diagrams and candidate lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunMetadata {
    pub n: usize,
    pub d: usize,
    pub k: usize,
    pub sigma: f64,
    pub epsilon: f64,
    pub count_h0: usize,
    pub count_h1: usize,
    pub accelerator_used: &'static str,
}
