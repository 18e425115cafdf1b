//! Pipeline orchestration: strict forward data flow from a point cloud to
//! persistence diagrams and candidate feature lists.
//!
//! A `Pipeline` is constructed once (capability selection happens here and
//! is thereafter read-only) and `run` is a single-shot invocation: inputs
//! in, results out, all intermediates released on exit whether success or
//! failure.

use log::info;
use serde::{Deserialize, Serialize};

use crate::cancellation::CancellationToken;
use crate::capability::{make_accelerator, Capability, HostCapability};
use crate::complex::build_complex;
use crate::config::{AcceleratorMode, PipelineConfig};
use crate::error::{PipelineError, Result};
use crate::features::extract_candidates;
use crate::filtration::filtration;
use crate::persistence_h0::h0;
use crate::persistence_h1::h1;
use crate::types::{Candidate, PersistencePair, PointCloud, RunMetadata};

/// Everything a pipeline invocation produces: persistence diagrams and
/// candidate feature lists for both dimensions, plus run metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineOutput {
    pub h0_pairs: Vec<PersistencePair>,
    pub h1_pairs: Vec<PersistencePair>,
    pub h0_candidates: Vec<Candidate>,
    pub h1_candidates: Vec<Candidate>,
    pub metadata: RunMetadata,
}

impl PipelineOutput {
    /// Serialize the full result to a JSON string, so a caller (job-queue
    /// worker, cloud-storage serializer — both external to this crate) can
    /// persist or transmit it without this crate mandating a wire format
    /// of its own.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| PipelineError::Internal(format!("JSON serialization failed: {e}")))
    }
}

pub struct Pipeline {
    config: PipelineConfig,
    capability: Box<dyn Capability>,
}

impl Pipeline {
    /// Validate `config` and select the capability (host or accelerator)
    /// once, per `config.use_accelerator`.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        let capability = select_capability(config.use_accelerator)?;
        info!(
            "pipeline constructed: k={} sigma={} epsilon={} capability={}",
            config.k,
            config.sigma,
            config.epsilon_density,
            capability.name()
        );
        Ok(Pipeline { config, capability })
    }

    /// Run the full pipeline on `points`, checking `token` between every
    /// stage boundary.
    pub fn run(&self, points: &PointCloud, token: &CancellationToken) -> Result<PipelineOutput> {
        let n = points.nrows();
        let d = points.ncols();
        if self.config.k >= n {
            return Err(PipelineError::InvalidArgument(format!(
                "k ({}) must be strictly less than n ({n})",
                self.config.k
            )));
        }

        token.check()?;
        let knn = self.capability.knn(points, self.config.k, token)?;

        token.check()?;
        let vertex_filt = filtration(&knn, self.config.epsilon_density);

        token.check()?;
        let complex = build_complex(&knn, vertex_filt, true);
        // The kNN arrays are not needed past complex construction: the
        // radius queries in feature extraction are served from `points`
        // alone.
        drop(knn);

        token.check()?;
        let h0_pairs = h0(&complex.vertex_filt, &complex.edges, token)?;

        token.check()?;
        let h1_pairs = h1(&complex.edges, &complex.triangles, token)?;

        token.check()?;
        let h0_candidates =
            extract_candidates(&h0_pairs, &complex.vertex_filt, points, self.config.sigma);
        let h1_candidates =
            extract_candidates(&h1_pairs, &complex.vertex_filt, points, self.config.sigma);

        let metadata = RunMetadata {
            n,
            d,
            k: self.config.k,
            sigma: self.config.sigma,
            epsilon: self.config.epsilon_density,
            count_h0: h0_pairs.len(),
            count_h1: h1_pairs.len(),
            accelerator_used: self.capability.name(),
        };

        info!(
            "pipeline finished: n={n} d={d} h0={} h1={} h0_candidates={} h1_candidates={}",
            metadata.count_h0,
            metadata.count_h1,
            h0_candidates.len(),
            h1_candidates.len()
        );

        Ok(PipelineOutput {
            h0_pairs,
            h1_pairs,
            h0_candidates,
            h1_candidates,
            metadata,
        })
    }
}

/// Resolve `mode` to a concrete capability, trying the accelerator first
/// for `Auto`/`Required` and falling back to the host only for `Auto`.
/// Any accelerator error other than "unavailable" is fatal during actual
/// operation calls, but that doesn't apply to this one-time selection.
fn select_capability(mode: AcceleratorMode) -> Result<Box<dyn Capability>> {
    match mode {
        AcceleratorMode::Off => Ok(Box::new(HostCapability)),
        AcceleratorMode::Required => match make_accelerator() {
            Some(cap) if cap.is_available() => Ok(cap),
            _ => Err(PipelineError::AcceleratorUnavailable(
                "use_accelerator=required but no accelerator backend is present".to_string(),
            )),
        },
        AcceleratorMode::Auto => match make_accelerator() {
            Some(cap) if cap.is_available() => Ok(cap),
            _ => Ok(Box::new(HostCapability)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::DMatrix;

    fn two_clusters() -> PointCloud {
        DMatrix::from_row_slice(
            6,
            2,
            &[
                0.0, 0.0, 0.0, 0.1, 0.0, 0.2, 10.0, 0.0, 10.0, 0.1, 10.0, 0.2,
            ],
        )
    }

    #[test]
    fn off_mode_always_selects_host() {
        let cap = select_capability(AcceleratorMode::Off).unwrap();
        assert_eq!(cap.name(), "host");
    }

    #[test]
    fn auto_mode_falls_back_to_host_without_the_accelerator_feature() {
        let cap = select_capability(AcceleratorMode::Auto).unwrap();
        assert_eq!(cap.name(), "host");
    }

    #[cfg(not(feature = "accelerator"))]
    #[test]
    fn required_mode_fails_without_the_accelerator_feature() {
        assert!(matches!(
            select_capability(AcceleratorMode::Required),
            Err(PipelineError::AcceleratorUnavailable(_))
        ));
    }

    #[test]
    fn output_round_trips_through_json() {
        let mut config = PipelineConfig::default();
        config.k = 2;
        let pipeline = Pipeline::new(config).unwrap();
        let output = pipeline
            .run(&two_clusters(), &CancellationToken::new())
            .unwrap();

        let json = output.to_json().unwrap();
        let parsed: PipelineOutput = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.metadata.n, output.metadata.n);
        assert_eq!(parsed.h0_pairs.len(), output.h0_pairs.len());
        assert_eq!(parsed.h1_pairs.len(), output.h1_pairs.len());
    }

    #[test]
    fn end_to_end_runs_all_stages_and_reports_consistent_metadata() {
        let mut config = PipelineConfig::default();
        config.k = 2;
        config.sigma = 1.0;
        let pipeline = Pipeline::new(config).unwrap();
        let token = CancellationToken::new();
        let output = pipeline.run(&two_clusters(), &token).unwrap();

        assert_eq!(output.metadata.n, 6);
        assert_eq!(output.metadata.d, 2);
        assert_eq!(output.metadata.count_h0, output.h0_pairs.len());
        assert_eq!(output.metadata.count_h1, output.h1_pairs.len());
        assert_eq!(output.metadata.accelerator_used, "host");
        for p in output.h0_pairs.iter().chain(output.h1_pairs.iter()) {
            assert!(p.death > p.birth);
        }
        for candidate in output.h0_candidates.iter().chain(output.h1_candidates.iter()) {
            assert!(!candidate.members.is_empty());
        }
    }

    #[test]
    fn cross_cluster_edge_produces_one_finite_h0_merge() {
        // With k large enough to bridge the two clusters, the two
        // components merge exactly once.
        let mut config = PipelineConfig::default();
        config.k = 4;
        let pipeline = Pipeline::new(config).unwrap();
        let token = CancellationToken::new();
        let output = pipeline.run(&two_clusters(), &token).unwrap();
        assert!(output.metadata.count_h0 >= 1);
    }

    #[test]
    fn rejects_k_not_less_than_n() {
        let mut config = PipelineConfig::default();
        config.k = 6;
        let pipeline = Pipeline::new(config).unwrap();
        let token = CancellationToken::new();
        assert!(matches!(
            pipeline.run(&two_clusters(), &token),
            Err(PipelineError::InvalidArgument(_))
        ));
    }

    #[test]
    fn cancellation_before_any_stage_short_circuits() {
        let mut config = PipelineConfig::default();
        config.k = 2;
        let pipeline = Pipeline::new(config).unwrap();
        let token = CancellationToken::new();
        token.cancel();
        assert!(matches!(
            pipeline.run(&two_clusters(), &token),
            Err(PipelineError::Cancelled)
        ));
    }
}
