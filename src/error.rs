//! Error types surfaced at the pipeline boundary.
//!
//! A precondition failure on caller input is always `InvalidArgument`;
//! accelerator failures are split by the resource they touch so a caller
//! can tell "no device" from "device present but the operation failed";
//! `Internal` is reserved for invariant violations this crate should never
//! itself trigger.

use thiserror::Error;

/// Result type used throughout the pipeline.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Errors that can occur while running the persistence pipeline.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// A precondition on shapes, sizes, or input values was violated
    /// (e.g. `k >= n`, a non-finite entry in the point matrix).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A host allocation failed.
    #[error("out of memory: {0}")]
    OutOfMemory(String),

    /// `use_accelerator = required` but no accelerator is present.
    #[error("accelerator unavailable: {0}")]
    AcceleratorUnavailable(String),

    /// Accelerator-side allocation failed.
    #[error("accelerator allocation failed: {0}")]
    AcceleratorAllocFailed(String),

    /// Host-to-device or device-to-host copy failed.
    #[error("accelerator copy failed: {0}")]
    AcceleratorCopyFailed(String),

    /// An accelerator kernel launch or execution failed.
    #[error("accelerator kernel failed: {0}")]
    AcceleratorKernelFailed(String),

    /// An invariant this crate maintains internally was violated. This is a
    /// bug signal, not a recoverable condition a caller can work around.
    #[error("internal error: {0}")]
    Internal(String),

    /// The caller's cancellation token was observed set at a stage boundary.
    #[error("cancelled")]
    Cancelled,
}

impl PipelineError {
    /// Short human-readable description, no stack trace, suitable for
    /// logging or surfacing to a caller (per the error-handling contract:
    /// callers decide whether/how to log).
    pub fn code(&self) -> &'static str {
        match self {
            PipelineError::InvalidArgument(_) => "InvalidArgument",
            PipelineError::OutOfMemory(_) => "OutOfMemory",
            PipelineError::AcceleratorUnavailable(_) => "AcceleratorUnavailable",
            PipelineError::AcceleratorAllocFailed(_) => "AcceleratorAllocFailed",
            PipelineError::AcceleratorCopyFailed(_) => "AcceleratorCopyFailed",
            PipelineError::AcceleratorKernelFailed(_) => "AcceleratorKernelFailed",
            PipelineError::Internal(_) => "Internal",
            PipelineError::Cancelled => "Cancelled",
        }
    }

    /// Whether `use_accelerator = auto` should fall back to the host
    /// capability after this error, rather than propagating it.
    pub fn is_accelerator_fallback_eligible(&self) -> bool {
        matches!(self, PipelineError::AcceleratorUnavailable(_))
    }
}
