//! H1 persistent homology via left-to-right column reduction over Z/2.
//!
//! Boundary columns are owned `Vec<usize>` kept in descending sorted order;
//! symmetric difference is a linear merge of two descending lists rather
//! than heap-allocated shared state — column replacement is a move, never
//! a reference count.

use std::collections::HashMap;

use log::debug;

use crate::cancellation::CancellationToken;
use crate::error::Result;
use crate::types::{Edge, PersistencePair, Triangle};

/// Merge two descending-sorted row-index lists under XOR (Z/2 symmetric
/// difference): equal entries cancel, distinct entries are kept, result
/// stays descending.
fn xor_descending(a: &[usize], b: &[usize]) -> Vec<usize> {
    let mut result = Vec::with_capacity(a.len() + b.len());
    let mut i = 0;
    let mut j = 0;
    while i < a.len() && j < b.len() {
        if a[i] > b[j] {
            result.push(a[i]);
            i += 1;
        } else if a[i] < b[j] {
            result.push(b[j]);
            j += 1;
        } else {
            i += 1;
            j += 1;
        }
    }
    result.extend_from_slice(&a[i..]);
    result.extend_from_slice(&b[j..]);
    result
}

/// Compute H1 persistence pairs from the edge and triangle lists.
///
/// Edges are sorted ascending by `(filt, src, dst)` — their position in
/// that order is their row index in the boundary matrix. Triangles are
/// sorted ascending by `(filt, v0, v1, v2)` — their position is the column
/// order. `birth == death` pairs are suppressed; every emitted pair has
/// `death > birth`.
pub fn h1(edges: &[Edge], triangles: &[Triangle], token: &CancellationToken) -> Result<Vec<PersistencePair>> {
    let mut sorted_edges: Vec<&Edge> = edges.iter().collect();
    sorted_edges.sort_by(|a, b| {
        a.filt
            .partial_cmp(&b.filt)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.key().cmp(&b.key()))
    });
    let mut edge_row: HashMap<(usize, usize), usize> = HashMap::with_capacity(sorted_edges.len());
    for (row, e) in sorted_edges.iter().enumerate() {
        edge_row.insert(e.key(), row);
    }
    let edge_filt: Vec<f64> = sorted_edges.iter().map(|e| e.filt).collect();

    let mut sorted_triangles: Vec<&Triangle> = triangles.iter().collect();
    sorted_triangles.sort_by(|a, b| {
        a.filt
            .partial_cmp(&b.filt)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.key().cmp(&b.key()))
    });

    // Build each triangle's boundary column: its three bounding edges,
    // resolved to row indices, stored descending (largest/pivot first).
    let mut columns: Vec<Vec<usize>> = Vec::with_capacity(sorted_triangles.len());
    for tri in &sorted_triangles {
        let mut column: Vec<usize> = tri
            .edge_keys()
            .iter()
            .map(|key| {
                *edge_row
                    .get(key)
                    .expect("complex builder guarantees every triangle edge exists")
            })
            .collect();
        column.sort_unstable_by(|a, b| b.cmp(a));
        columns.push(column);
    }

    token.check()?;

    let mut pivot_owner: HashMap<usize, usize> = HashMap::new();
    let mut pairs = Vec::new();

    for col in 0..columns.len() {
        let mut current = std::mem::take(&mut columns[col]);

        loop {
            let Some(&pivot) = current.first() else {
                break;
            };
            match pivot_owner.get(&pivot) {
                None => {
                    pivot_owner.insert(pivot, col);
                    let birth = edge_filt[pivot];
                    let death = sorted_triangles[col].filt;
                    if birth < death {
                        pairs.push(PersistencePair::new(1, birth, death));
                    }
                    break;
                }
                Some(&owner) => {
                    current = xor_descending(&current, &columns[owner]);
                }
            }
        }

        columns[col] = current;
    }

    debug!(
        "h1: {} finite pairs from {} triangles over {} edges",
        pairs.len(),
        triangles.len(),
        edges.len()
    );

    Ok(pairs)
}
