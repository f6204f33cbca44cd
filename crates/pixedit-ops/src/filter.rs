//! The spatial filters: blur, edge detection and sharpen.
//!
//! Each filter converts its input to the channel mode it works in, runs the
//! [convolution engine](crate::convolve) and truncates the response back to
//! 8 bits. Inputs are never modified.
//!
//! | Filter | Kernel | Works in | Post-step |
//! |---|---|---|---|
//! | [`Filter::Blur`] | 3x3 box | RGB | truncate |
//! | [`Filter::EdgeDetection`] | Sobel X + Y | grayscale | gradient magnitude, clamp, truncate |
//! | [`Filter::Sharpen`] | 3x3 Laplacian sharpen | RGB | clamp, truncate |
//!
//! # Example
//!
//! ```rust
//! use pixedit_core::{ChannelMode, PixelBuffer};
//! use pixedit_ops::Filter;
//!
//! let src = PixelBuffer::filled(4, 4, ChannelMode::Rgb, &[10, 20, 30]).unwrap();
//! let out = Filter::Blur.apply_n(&src, 2).unwrap();
//! assert_eq!(out, src);
//!
//! let edges = "edge_detection".parse::<Filter>().unwrap().apply(&src).unwrap();
//! assert!(edges.data().iter().all(|&v| v == 0));
//! ```

use crate::convolve::{convolve, Kernel};
use crate::{OpsError, OpsResult};
use pixedit_core::{ChannelMode, PixelBuffer};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// A named spatial filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Filter {
    /// 3x3 box blur.
    Blur,
    /// Sobel gradient magnitude on the grayscale image.
    EdgeDetection,
    /// 3x3 Laplacian sharpen.
    Sharpen,
}

impl Filter {
    /// Every filter, in name-table order.
    pub const ALL: [Filter; 3] = [Filter::Blur, Filter::EdgeDetection, Filter::Sharpen];

    /// Wire name used on the command line and in recipes.
    pub const fn name(self) -> &'static str {
        match self {
            Filter::Blur => "blur",
            Filter::EdgeDetection => "edge_detection",
            Filter::Sharpen => "sharpen",
        }
    }

    /// Applies the filter once and returns a new buffer.
    ///
    /// # Errors
    ///
    /// Propagates [`OpsError::EmptyBuffer`] and [`OpsError::InvalidKernel`]
    /// from the convolution engine (images smaller than 3x3).
    pub fn apply(self, buffer: &PixelBuffer) -> OpsResult<PixelBuffer> {
        let (width, height) = buffer.dimensions();
        debug!(filter = self.name(), width, height, "applying filter");

        match self {
            Filter::Blur => {
                let rgb = buffer.to_rgb();
                convolve(&rgb, &Kernel::box_blur(3))?.to_buffer(ChannelMode::Rgb)
            }
            Filter::EdgeDetection => {
                let gray = buffer.to_grayscale();
                let gx = convolve(&gray, &Kernel::sobel_x())?;
                let gy = convolve(&gray, &Kernel::sobel_y())?;
                gx.zip_map(&gy, |a, b| (a * a + b * b).sqrt())?
                    .to_buffer(ChannelMode::Gray)
            }
            Filter::Sharpen => {
                let rgb = buffer.to_rgb();
                convolve(&rgb, &Kernel::sharpen(1.0))?.to_buffer(ChannelMode::Rgb)
            }
        }
    }

    /// Applies the filter `strength` times, feeding each output to the next pass.
    ///
    /// # Errors
    ///
    /// [`OpsError::InvalidParameter`] if `strength` is zero, otherwise as
    /// [`apply`](Self::apply).
    pub fn apply_n(self, buffer: &PixelBuffer, strength: u32) -> OpsResult<PixelBuffer> {
        if strength == 0 {
            return Err(OpsError::InvalidParameter(format!(
                "{} strength must be a positive integer, got 0",
                self.name()
            )));
        }
        let mut out = self.apply(buffer)?;
        for _ in 1..strength {
            out = self.apply(&out)?;
        }
        Ok(out)
    }

    /// Validates a signed strength coming from untyped input.
    ///
    /// ```rust
    /// use pixedit_ops::Filter;
    ///
    /// assert_eq!(Filter::Sharpen.strength(3).unwrap(), 3);
    /// assert!(Filter::Sharpen.strength(0).is_err());
    /// assert!(Filter::Sharpen.strength(-2).is_err());
    /// ```
    pub fn strength(self, strength: i64) -> OpsResult<u32> {
        u32::try_from(strength)
            .ok()
            .filter(|&n| n > 0)
            .ok_or_else(|| {
                OpsError::InvalidParameter(format!(
                    "{} strength must be a positive integer, got {strength}",
                    self.name()
                ))
            })
    }
}

impl FromStr for Filter {
    type Err = OpsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Filter::ALL
            .into_iter()
            .find(|f| f.name() == s)
            .ok_or_else(|| OpsError::UnsupportedFilter(s.to_string()))
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
