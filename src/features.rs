//! FeatureExtractor: significance filtering and member-set enumeration.
//!
//! Given the persistence pairs for one homology dimension, select the pairs
//! whose lifetime exceeds `mean + sigma * stddev` across all finite pairs in
//! that dimension, then for each survivor perform a radius query on the
//! original point cloud to enumerate members.

use crate::radius::radius_query;
use crate::types::{Candidate, PersistencePair, PointCloud};

/// Select the significant pairs in `pairs` (already restricted to one
/// dimension) by `lifetime > mean + sigma * stddev`. With fewer than two
/// pairs there is no sample spread to compare against, so nothing is
/// significant.
pub fn significant_pairs(pairs: &[PersistencePair], sigma: f64) -> Vec<PersistencePair> {
    if pairs.len() < 2 {
        return Vec::new();
    }

    let lifetimes: Vec<f64> = pairs.iter().map(PersistencePair::lifetime).collect();
    let mean = lifetimes.iter().sum::<f64>() / lifetimes.len() as f64;
    let variance =
        lifetimes.iter().map(|&l| (l - mean).powi(2)).sum::<f64>() / lifetimes.len() as f64;
    let threshold = mean + sigma * variance.sqrt();

    pairs
        .iter()
        .copied()
        .filter(|p| p.lifetime() > threshold)
        .collect()
}

/// Find the vertex whose filtration value equals `birth` — the
/// representative point for a feature. Exact equality holds in
/// practice: `birth` is always one of `vertex_filt`'s own values (directly,
/// for an H0 pair; as the max of two vertex filtrations, for an H1 pair, so
/// one of the two endpoints matches exactly). Nearest-value search (rather
/// than a direct equality scan) makes this robust to that H1 case without
/// needing to thread the winning endpoint through the persistence result;
/// ties broken by ascending index via `min_by` stability.
pub fn representative_of(vertex_filt: &[f64], birth: f64) -> usize {
    vertex_filt
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| {
            let da = (**a - birth).abs();
            let db = (**b - birth).abs();
            da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|(i, _)| i)
        .expect("vertex_filt is non-empty whenever feature extraction runs")
}

/// Build the candidate list for one dimension: significance filtering,
/// followed for each survivor by a radius query centered on its
/// representative vertex with `radius = -1 / death` (back-transforming the
/// death filtration value into the original distance scale under the
/// density-filtration mapping). Candidates are sorted by lifetime
/// descending.
///
/// Every candidate has at least one member: the representative is at
/// distance zero from itself, and zero is always `<= radius` here since
/// `death < 0` makes `radius = -1 / death` strictly positive.
pub fn extract_candidates(
    pairs: &[PersistencePair],
    vertex_filt: &[f64],
    points: &PointCloud,
    sigma: f64,
) -> Vec<Candidate> {
    let mut candidates: Vec<Candidate> = significant_pairs(pairs, sigma)
        .into_iter()
        .map(|pair| {
            let center = representative_of(vertex_filt, pair.birth);
            let radius = -1.0 / pair.death;
            let members = radius_query(points, center, radius)
                .into_iter()
                .map(|i| i as i32)
                .collect();
            Candidate {
                birth: pair.birth,
                death: pair.death,
                lifetime: pair.lifetime(),
                members,
            }
        })
        .collect();

    candidates.sort_by(|a, b| {
        b.lifetime
            .partial_cmp(&a.lifetime)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::DMatrix;

    fn pair(birth: f64, death: f64) -> PersistencePair {
        PersistencePair::new(0, birth, death)
    }

    #[test]
    fn fewer_than_two_pairs_is_never_significant() {
        assert!(significant_pairs(&[], 3.0).is_empty());
        assert!(significant_pairs(&[pair(-10.0, -1.0)], 3.0).is_empty());
    }

    #[test]
    fn one_outlier_lifetime_is_significant() {
        let pairs = vec![
            pair(-10.0, -9.9),
            pair(-10.0, -9.8),
            pair(-10.0, -9.9),
            pair(-10.0, -1.0), // much longer-lived than the rest
        ];
        let sig = significant_pairs(&pairs, 1.0);
        assert_eq!(sig.len(), 1);
        assert_eq!(sig[0].death, -1.0);
    }

    #[test]
    fn uniform_lifetimes_are_never_significant() {
        let pairs = vec![pair(-10.0, -9.0), pair(-8.0, -7.0), pair(-6.0, -5.0)];
        assert!(significant_pairs(&pairs, 3.0).is_empty());
    }

    #[test]
    fn representative_finds_exact_match() {
        let vertex_filt = vec![-10.0, -5.0, -3.0, -1.0];
        assert_eq!(representative_of(&vertex_filt, -3.0), 2);
    }

    #[test]
    fn representative_picks_lower_index_on_tie() {
        let vertex_filt = vec![-5.0, -3.0, -5.0];
        // Both index 0 and 2 are equidistant from -4.0; min_by keeps the
        // first-seen minimum, i.e. the lower index.
        assert_eq!(representative_of(&vertex_filt, -5.0), 0);
    }

    #[test]
    fn every_candidate_includes_its_representative() {
        let points = DMatrix::from_row_slice(
            6,
            2,
            &[0.0, 0.0, 0.0, 0.1, 0.0, 0.2, 10.0, 0.0, 10.0, 0.1, 10.0, 0.2],
        );
        let vertex_filt = vec![-10.0, -5.0, -3.0, -10.0, -5.0, -3.0];
        let pairs = vec![
            pair(-10.0, -9.9),
            pair(-10.0, -9.8),
            pair(-10.0, -1.0), // the one significant merge
        ];
        let candidates = extract_candidates(&pairs, &vertex_filt, &points, 1.0);
        assert_eq!(candidates.len(), 1);
        let rep = representative_of(&vertex_filt, candidates[0].birth);
        assert!(candidates[0].members.contains(&(rep as i32)));
    }

    #[test]
    fn candidates_sorted_by_lifetime_descending() {
        let points = DMatrix::from_row_slice(4, 1, &[0.0, 1.0, 2.0, 3.0]);
        let vertex_filt = vec![-10.0, -8.0, -4.0, -1.0];
        let pairs = vec![
            pair(-10.0, -8.0),
            pair(-10.0, -4.0),
            pair(-10.0, -1.0),
            pair(-10.0, -9.5),
        ];
        let candidates = extract_candidates(&pairs, &vertex_filt, &points, 0.1);
        for w in candidates.windows(2) {
            assert!(w[0].lifetime >= w[1].lifetime);
        }
    }
}
