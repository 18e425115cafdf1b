//! Computational core of a topological stream-finder.
//!
//! This crate computes persistent homology (degrees 0 and 1) over a dense
//! point cloud and, for each significant feature, the set of input points
//! that participate in it. It is domain-neutral: the pipeline consumes a
//! dense numeric matrix and emits persistence pairs with member index sets.
//! The motivating use is discovery of elongated 1-dimensional structure
//! (stellar streams) in a low-dimensional phase-space point cloud, but
//! nothing here is astronomy-specific — catalog fetching, job-queue
//! plumbing, and visualization are external collaborators, not part of
//! this crate.
//!
//! # Pipeline
//!
//! Five stages run in strict forward order (see [`pipeline::Pipeline`]):
//!
//! 1. [`knn`] — k-nearest-neighbor search on the point cloud.
//! 2. [`filtration`] — converts kth-neighbor distances into a density
//!    filtration.
//! 3. [`complex`] — builds the vertex/edge/triangle input to persistence
//!    from the neighbor graph.
//! 4. [`persistence_h0`] — sorted-edge union-find over the 1-skeleton.
//! 5. [`persistence_h1`] — column reduction over Z/2 on the 2-skeleton.
//! 6. [`features`] — significance filtering and radius-query member
//!    enumeration.
//!
//! # Example
//!
//! ```rust
//! use nalgebra::DMatrix;
//! use topostream_core::cancellation::CancellationToken;
//! use topostream_core::config::PipelineConfig;
//! use topostream_core::pipeline::Pipeline;
//!
//! // Two well-separated clusters of three points each.
//! let points = DMatrix::from_row_slice(6, 2, &[
//!     0.0, 0.0, 0.0, 0.1, 0.0, 0.2,
//!     10.0, 0.0, 10.0, 0.1, 10.0, 0.2,
//! ]);
//!
//! let mut config = PipelineConfig::default();
//! config.k = 2;
//!
//! let pipeline = Pipeline::new(config).unwrap();
//! let output = pipeline.run(&points, &CancellationToken::new()).unwrap();
//! println!("{} finite H0 pairs, {} finite H1 pairs", output.metadata.count_h0, output.metadata.count_h1);
//! ```

pub mod cancellation;
pub mod capability;
pub mod complex;
pub mod config;
pub mod distances;
pub mod error;
pub mod features;
pub mod filtration;
pub mod knn;
pub mod persistence_diagram;
pub mod persistence_h0;
pub mod persistence_h1;
pub mod pipeline;
pub mod radius;
pub mod types;

pub use cancellation::CancellationToken;
pub use capability::{Capability, HostCapability};
pub use complex::{build_complex, Complex};
pub use config::{AcceleratorMode, PipelineConfig};
pub use error::{PipelineError, Result};
pub use features::{extract_candidates, representative_of, significant_pairs};
pub use filtration::filtration as density_filtration;
pub use knn::knn;
pub use persistence_diagram::PersistenceDiagram;
pub use persistence_h0::h0;
pub use persistence_h1::h1;
pub use pipeline::{Pipeline, PipelineOutput};
pub use radius::radius_query;
pub use types::{Candidate, Edge, KnnResult, PersistencePair, PointCloud, RunMetadata, Triangle};

/// Convenient imports for the common case: build a [`PipelineConfig`], run
/// a [`Pipeline`], inspect [`PipelineOutput`].
pub mod prelude {
    pub use crate::cancellation::CancellationToken;
    pub use crate::config::{AcceleratorMode, PipelineConfig};
    pub use crate::error::{PipelineError, Result};
    pub use crate::pipeline::{Pipeline, PipelineOutput};
    pub use crate::types::{Candidate, PersistencePair, PointCloud};
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::DMatrix;

    #[test]
    fn end_to_end_pipeline_on_a_hexagon_produces_valid_h1_pairs() {
        // Six points on a unit-radius hexagon. k=3 pulls in enough
        // diagonal neighbors that the hexagon's interior actually
        // triangulates and the loop born at cycle closure is filled in,
        // rather than persisting forever.
        let n = 6;
        let mut coords = Vec::with_capacity(n * 2);
        for i in 0..n {
            let angle = 2.0 * std::f64::consts::PI * (i as f64) / (n as f64);
            coords.push(angle.cos());
            coords.push(angle.sin());
        }
        let points = DMatrix::from_row_slice(n, 2, &coords);

        let mut config = PipelineConfig::default();
        config.k = 3;
        let pipeline = Pipeline::new(config).unwrap();
        let output = pipeline.run(&points, &CancellationToken::new()).unwrap();

        assert_eq!(output.metadata.n, 6);
        for pair in &output.h1_pairs {
            assert!(pair.death > pair.birth);
            assert_eq!(pair.dimension, 1);
        }
    }

    #[test]
    fn invalid_k_is_rejected_before_any_stage_runs() {
        let points = DMatrix::from_row_slice(3, 2, &[0.0, 0.0, 1.0, 0.0, 2.0, 0.0]);
        let mut config = PipelineConfig::default();
        config.k = 3; // k >= n
        let pipeline = Pipeline::new(config).unwrap();
        let result = pipeline.run(&points, &CancellationToken::new());
        assert!(matches!(result, Err(PipelineError::InvalidArgument(_))));
    }

    #[test]
    fn rejects_invalid_config_at_construction() {
        let mut config = PipelineConfig::default();
        config.sigma = -1.0;
        assert!(matches!(
            Pipeline::new(config),
            Err(PipelineError::InvalidArgument(_))
        ));
    }
}
