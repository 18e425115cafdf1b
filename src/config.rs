//! Pipeline configuration.
//!
//! The options recognized here are `k`, `sigma`, `use_accelerator`, and
//! `epsilon_density`. No other tunable is load-bearing; anything else a
//! caller wants (logging verbosity, deadlines) lives outside this crate.

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};

/// Tri-state accelerator selection, evaluated once at pipeline construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AcceleratorMode {
    /// Use the accelerator if present; fall back to host on
    /// `AcceleratorUnavailable` only.
    Auto,
    /// Use the accelerator; fail with `AcceleratorUnavailable` if absent.
    Required,
    /// Never consider the accelerator.
    Off,
}

impl Default for AcceleratorMode {
    fn default() -> Self {
        AcceleratorMode::Auto
    }
}

/// Configuration accepted by [`crate::pipeline::Pipeline`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Number of nearest neighbors per point. Must be positive and `< n`.
    pub k: usize,
    /// Significance threshold multiplier for lifetime filtering in
    /// [`crate::features`]. Must be positive.
    pub sigma: f64,
    pub use_accelerator: AcceleratorMode,
    /// Clamp applied to kth-neighbor distances before inversion. Must be
    /// positive.
    pub epsilon_density: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            k: 32,
            sigma: 3.0,
            use_accelerator: AcceleratorMode::Auto,
            epsilon_density: 1e-10,
        }
    }
}

impl PipelineConfig {
    /// Validate the configuration in isolation from any particular input
    /// matrix (the `k < n` check needs `n` and happens in
    /// [`crate::knn::knn`]/`Pipeline::run`).
    pub fn validate(&self) -> Result<()> {
        if self.k == 0 {
            return Err(PipelineError::InvalidArgument(
                "k must be a positive integer".to_string(),
            ));
        }
        if !(self.sigma > 0.0) {
            return Err(PipelineError::InvalidArgument(
                "sigma must be a positive real".to_string(),
            ));
        }
        if !(self.epsilon_density > 0.0) {
            return Err(PipelineError::InvalidArgument(
                "epsilon_density must be a positive real".to_string(),
            ));
        }
        Ok(())
    }
}
