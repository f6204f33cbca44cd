//! Error types for pixedit-core operations.
//!
//! The [`Error`] enum covers the failure modes of the pixel buffer itself:
//! bounds checking on pixel access, channel count mismatches on writes and
//! data length mismatches on construction.
//!
//! # Usage
//!
//! ```rust
//! use pixedit_core::{Error, Result};
//!
//! fn check(x: u32, y: u32, width: u32, height: u32) -> Result<()> {
//!     if x >= width || y >= height {
//!         return Err(Error::out_of_bounds(x, y, width, height));
//!     }
//!     Ok(())
//! }
//!
//! assert!(check(4, 0, 4, 4).is_err());
//! ```
//!
//! # Used By
//!
//! - [`crate::buffer::PixelBuffer`] - accessors and constructors
//! - `pixedit-ops` - wrapped into `OpsError::Core`
//! - `pixedit-io` - wrapped into `IoError::Core`

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by [`PixelBuffer`](crate::PixelBuffer) operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// Pixel coordinates are outside the buffer.
    ///
    /// Returned when accessing (x, y) with `x >= width` or `y >= height`.
    ///
    /// ```rust
    /// use pixedit_core::Error;
    ///
    /// let err = Error::out_of_bounds(100, 50, 80, 60);
    /// assert!(err.to_string().contains("100"));
    /// ```
    #[error("pixel ({x}, {y}) out of bounds for image {width}x{height}")]
    OutOfBounds {
        /// X coordinate that was out of bounds
        x: u32,
        /// Y coordinate that was out of bounds
        y: u32,
        /// Image width
        width: u32,
        /// Image height
        height: u32,
    },

    /// A pixel write supplied the wrong number of channel values.
    #[error("channel mismatch: expected {expected}, got {got}")]
    ChannelMismatch {
        /// Channel count of the buffer
        expected: usize,
        /// Number of values supplied
        got: usize,
    },

    /// Raw data does not fit the requested dimensions.
    #[error("invalid dimensions: {width}x{height} ({reason})")]
    InvalidDimensions {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
        /// Why the dimensions were rejected
        reason: String,
    },
}

impl Error {
    /// Creates an [`Error::OutOfBounds`] error.
    #[inline]
    pub fn out_of_bounds(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self::OutOfBounds {
            x,
            y,
            width,
            height,
        }
    }

    /// Creates an [`Error::ChannelMismatch`] error.
    #[inline]
    pub fn channel_mismatch(expected: usize, got: usize) -> Self {
        Self::ChannelMismatch { expected, got }
    }

    /// Creates an [`Error::InvalidDimensions`] error.
    #[inline]
    pub fn invalid_dimensions(width: u32, height: u32, reason: impl Into<String>) -> Self {
        Self::InvalidDimensions {
            width,
            height,
            reason: reason.into(),
        }
    }
}
