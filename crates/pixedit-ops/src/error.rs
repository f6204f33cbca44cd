//! Error types for image operations.

use thiserror::Error;

/// Error type for image operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OpsError {
    /// The buffer has zero width or height.
    #[error("empty buffer: {width}x{height} image has no pixels")]
    EmptyBuffer {
        /// Buffer width
        width: u32,
        /// Buffer height
        height: u32,
    },

    /// Kernel is malformed or does not fit the buffer.
    #[error("invalid kernel: {0}")]
    InvalidKernel(String),

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Unknown filter name.
    #[error("filter '{0}' not supported")]
    UnsupportedFilter(String),

    /// Unknown adjustment kind.
    #[error("adjustment type '{0}' not supported")]
    UnsupportedAdjustment(String),

    /// Pixel buffer error.
    #[error(transparent)]
    Core(#[from] pixedit_core::Error),

    /// A pipeline step failed; later steps were not run.
    #[error("step {index} ({operation}) failed")]
    Step {
        /// Zero-based position in the operation list
        index: usize,
        /// Human-readable operation, e.g. `blur x2`
        operation: String,
        /// What went wrong
        #[source]
        source: Box<OpsError>,
    },
}

impl OpsError {
    /// Strips [`OpsError::Step`] wrappers and returns the underlying error.
    pub fn root(&self) -> &OpsError {
        match self {
            Self::Step { source, .. } => source.root(),
            other => other,
        }
    }
}

/// Result type for image operations.
pub type OpsResult<T> = Result<T, OpsError>;
