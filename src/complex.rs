//! Build the simplicial input to persistence from a kNN neighbor graph.
//!
//! Edge and triangle enumeration is bounded by the neighbor lists, not an
//! `O(n^3)` scan: triangles are found by testing, for each vertex, whether
//! pairs of its neighbors are themselves connected via a hashed edge
//! lookup.

use std::collections::HashMap;

use itertools::Itertools;
use log::debug;

use crate::types::{Edge, KnnResult, Triangle};

/// The vertex/edge/triangle input to `PersistenceH0`/`PersistenceH1`.
pub struct Complex {
    /// Vertex filtration values, indexed by vertex id (copy of `F`).
    pub vertex_filt: Vec<f64>,
    pub edges: Vec<Edge>,
    pub triangles: Vec<Triangle>,
}

/// Build edges (and, if `with_triangles`, triangles) from the neighbor graph
/// `knn` and vertex filtration `vertex_filt`.
///
/// Duplicate directed pairs `(i -> j)` and `(j -> i)` collapse into a single
/// undirected edge via a hashed `(min, max)` key; duplicate triangles
/// (reached from more than one of their three vertices) collapse the same
/// way.
pub fn build_complex(knn: &KnnResult, vertex_filt: Vec<f64>, with_triangles: bool) -> Complex {
    debug_assert_eq!(vertex_filt.len(), knn.n);

    let mut edge_map: HashMap<(usize, usize), f64> = HashMap::new();
    for i in 0..knn.n {
        for r in 0..knn.k {
            let j = knn.neighbor(i, r);
            let filt = vertex_filt[i].max(vertex_filt[j]);
            let key = if i < j { (i, j) } else { (j, i) };
            edge_map
                .entry(key)
                .and_modify(|existing| *existing = existing.max(filt))
                .or_insert(filt);
        }
    }

    let mut edges: Vec<Edge> = edge_map
        .iter()
        .map(|(&(src, dst), &filt)| Edge { src, dst, filt })
        .collect();
    edges.sort_by(|a, b| a.key().cmp(&b.key()));

    debug!(
        "build_complex: {} vertices, {} edges after dedup",
        knn.n,
        edges.len()
    );

    let triangles = if with_triangles {
        enumerate_triangles(knn, &edge_map)
    } else {
        Vec::new()
    };

    debug!("build_complex: {} triangles", triangles.len());

    Complex {
        vertex_filt,
        edges,
        triangles,
    }
}

/// For each vertex, test pairs of its neighbors for edge closure via the
/// hashed edge lookup built above — `O(sum_v deg(v)^2)`, not `O(n^3)`.
fn enumerate_triangles(
    knn: &KnnResult,
    edge_map: &HashMap<(usize, usize), f64>,
) -> Vec<Triangle> {
    // Adjacency built from the deduped edge set itself, not the directed
    // neighbor rows — an edge can owe its existence to either endpoint's
    // own kNN row, so both endpoints must see it in their adjacency list.
    let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); knn.n];
    for &(a, b) in edge_map.keys() {
        adjacency[a].push(b);
        adjacency[b].push(a);
    }
    for neighbors in adjacency.iter_mut() {
        neighbors.sort_unstable();
        neighbors.dedup();
    }

    let edge_filt = |a: usize, b: usize| -> f64 {
        let key = if a < b { (a, b) } else { (b, a) };
        edge_map[&key]
    };

    let mut seen: std::collections::HashSet<(usize, usize, usize)> = std::collections::HashSet::new();
    let mut triangles = Vec::new();

    for v in 0..knn.n {
        // Every unordered pair of v's neighbors is a candidate closing
        // triangle; `tuple_combinations` enumerates them without a manual
        // double index loop.
        for (a, b) in adjacency[v].iter().copied().tuple_combinations() {
            let closing_key = if a < b { (a, b) } else { (b, a) };
            if let Some(&closing_filt) = edge_map.get(&closing_key) {
                let tri_filt = edge_filt(v, a).max(edge_filt(v, b)).max(closing_filt);
                let tri = Triangle::new([v, a, b], tri_filt);
                if seen.insert(tri.key()) {
                    triangles.push(tri);
                }
            }
        }
    }

    triangles
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::DMatrix;

    fn triangle_knn() -> KnnResult {
        // Three mutually-nearest points: a full triangle closes.
        let distances = DMatrix::from_row_slice(3, 2, &[1.0, 1.0, 1.0, 1.0, 1.0, 1.0]);
        let indices = DMatrix::from_row_slice(3, 2, &[1i32, 2, 0, 2, 0, 1]);
        KnnResult {
            distances,
            indices,
            n: 3,
            k: 2,
        }
    }

    #[test]
    fn dedups_bidirectional_edges() {
        let knn = triangle_knn();
        let vertex_filt = vec![0.0, 0.0, 0.0];
        let complex = build_complex(&knn, vertex_filt, false);
        // 3 vertices all pairwise mutual neighbors -> exactly 3 undirected edges
        assert_eq!(complex.edges.len(), 3);
        for e in &complex.edges {
            assert!(e.src < e.dst);
        }
    }

    #[test]
    fn closes_one_triangle() {
        let knn = triangle_knn();
        let vertex_filt = vec![0.0, 0.0, 0.0];
        let complex = build_complex(&knn, vertex_filt, true);
        assert_eq!(complex.triangles.len(), 1);
        let tri = complex.triangles[0];
        assert_eq!((tri.v0, tri.v1, tri.v2), (0, 1, 2));
    }

    #[test]
    fn no_triangles_without_closure() {
        // A 4-cycle (square) with k=2: no triangle should close.
        let distances = DMatrix::from_row_slice(4, 2, &[1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0]);
        let indices = DMatrix::from_row_slice(4, 2, &[1i32, 3, 0, 2, 1, 3, 0, 2]);
        let knn = KnnResult {
            distances,
            indices,
            n: 4,
            k: 2,
        };
        let complex = build_complex(&knn, vec![0.0; 4], true);
        assert_eq!(complex.edges.len(), 4);
        assert!(complex.triangles.is_empty());
    }

    #[test]
    fn edge_filt_is_max_of_endpoint_filtrations() {
        let knn = triangle_knn();
        let vertex_filt = vec![-1.0, -2.0, -0.5];
        let complex = build_complex(&knn, vertex_filt.clone(), false);
        for e in &complex.edges {
            let expected = vertex_filt[e.src].max(vertex_filt[e.dst]);
            assert_eq!(e.filt, expected);
        }
    }
}
