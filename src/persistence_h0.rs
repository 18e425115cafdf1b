//! H0 persistent homology via sorted-edge union-find.
//!
//! Union-find is an arena of integer-indexed arrays (parent, rank, birth),
//! not a linked structure. Path compression uses halving inside `find`.

use log::debug;

use crate::cancellation::CancellationToken;
use crate::error::Result;
use crate::types::{Edge, PersistencePair};

struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<usize>,
    birth: Vec<f64>,
}

impl UnionFind {
    fn new(vertex_filt: &[f64]) -> Self {
        UnionFind {
            parent: (0..vertex_filt.len()).collect(),
            rank: vec![0; vertex_filt.len()],
            birth: vertex_filt.to_vec(),
        }
    }

    /// Path-compression by halving: each visited node is repointed to its
    /// grandparent, shortening the chain without a second full pass.
    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }
}

/// Compute H0 persistence pairs from the vertex filtration and edge set.
///
/// Edges are processed in ascending `(filt, src, dst)` order so the output
/// is a deterministic function of the input. Only finite pairs with
/// `dying_birth < f` are emitted; the surviving (oldest) component per
/// connected component of the final graph is never paired (it is the
/// infinite feature, suppressed from this output per the wire contract).
pub fn h0(
    vertex_filt: &[f64],
    edges: &[Edge],
    token: &CancellationToken,
) -> Result<Vec<PersistencePair>> {
    let mut sorted_edges: Vec<&Edge> = edges.iter().collect();
    sorted_edges.sort_by(|a, b| {
        a.filt
            .partial_cmp(&b.filt)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.key().cmp(&b.key()))
    });

    token.check()?;

    let mut uf = UnionFind::new(vertex_filt);
    let mut pairs = Vec::new();

    for edge in sorted_edges {
        let ru = uf.find(edge.src);
        let rv = uf.find(edge.dst);
        if ru == rv {
            continue;
        }

        let (survivor, dying) = if uf.birth[ru] <= uf.birth[rv] {
            (ru, rv)
        } else {
            (rv, ru)
        };

        let dying_birth = uf.birth[dying];
        if dying_birth < edge.filt {
            pairs.push(PersistencePair::new(0, dying_birth, edge.filt));
        }

        // Union by rank decides which root becomes the new tree parent
        // (for find() speed); birth is always carried forward onto
        // whichever root ends up on top, so it stays the survivor's.
        let new_root = if uf.rank[survivor] < uf.rank[dying] {
            uf.parent[survivor] = dying;
            dying
        } else if uf.rank[survivor] > uf.rank[dying] {
            uf.parent[dying] = survivor;
            survivor
        } else {
            uf.parent[dying] = survivor;
            uf.rank[survivor] += 1;
            survivor
        };
        uf.birth[new_root] = uf.birth[survivor];
    }

    debug!("h0: {} finite pairs from {} edges", pairs.len(), edges.len());

    Ok(pairs)
}
