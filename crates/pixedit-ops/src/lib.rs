//! # pixedit-ops
//!
//! The pixel-processing core of pixedit: convolution, filters, tonal
//! adjustments and the pipeline that sequences them.
//!
//! # Modules
//!
//! - [`convolve`] - Kernels, border handling and the convolution engine
//! - [`filter`] - Blur, edge detection, sharpen
//! - [`adjust`] - Brightness, contrast, saturation
//! - [`pipeline`] - Ordered operations over one working buffer
//!
//! Every operation takes a [`PixelBuffer`](pixedit_core::PixelBuffer) by
//! reference and returns a new one of the same width and height.
//!
//! # Example
//!
//! ```rust
//! use pixedit_core::{ChannelMode, PixelBuffer};
//! use pixedit_ops::Pipeline;
//!
//! let mut pipeline = Pipeline::new(PixelBuffer::new(16, 16, ChannelMode::Rgb));
//! pipeline.apply_filter("sharpen", 1).unwrap();
//! pipeline.adjust("brightness", 30.0).unwrap();
//! assert!(pipeline.buffer().data().iter().all(|&v| v == 30));
//! ```
//!
//! # Feature Flags
//!
//! - `parallel` (default) - run convolution rows and per-pixel maps on rayon.
//!   Results are identical with the feature off.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
mod parallel;

pub mod adjust;
pub mod convolve;
pub mod filter;
pub mod pipeline;

pub use adjust::Adjustment;
pub use convolve::{convolve, convolve_with, Border, Kernel, Response};
pub use error::{OpsError, OpsResult};
pub use filter::Filter;
pub use pipeline::{Operation, Pipeline};
