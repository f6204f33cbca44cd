//! # pixedit-core
//!
//! Core types for pixedit image editing.
//!
//! This crate provides the foundational types used throughout the pixedit
//! workspace:
//!
//! - [`PixelBuffer`] - Owned 8-bit image buffer, grayscale or RGB
//! - [`ChannelMode`] - Channel layout of a buffer
//! - [`Error`] / [`Result`] - Buffer access and construction errors
//!
//! ## Crate Structure
//!
//! This crate has no internal dependencies. The other crates build on it:
//!
//! ```text
//! pixedit-core (this crate)
//!    ^
//!    |
//!    +-- pixedit-ops (convolution, filters, adjustments, pipeline)
//!    +-- pixedit-io (PNG / JPEG load and save)
//!    +-- pixedit-cli (command-line front end)
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod buffer;
pub mod error;
pub mod pixel;

pub use buffer::PixelBuffer;
pub use error::{Error, Result};
pub use pixel::{luma_rec601, ChannelMode};

/// Prelude module for convenient imports.
///
/// ```
/// use pixedit_core::prelude::*;
///
/// let buf = PixelBuffer::new(2, 2, ChannelMode::Gray);
/// assert_eq!(buf.channels(), 1);
/// ```
pub mod prelude {
    pub use crate::buffer::PixelBuffer;
    pub use crate::error::{Error, Result};
    pub use crate::pixel::ChannelMode;
}
