//! Channel modes and luma conversion.
//!
//! # Types
//!
//! - [`ChannelMode`] - grayscale (1 channel) or RGB (3 channels)
//!
//! # Luma
//!
//! Grayscale conversion uses the ITU-R 601-2 weights
//! `L = R*299/1000 + G*587/1000 + B*114/1000`, evaluated in 16.16 fixed
//! point so that a neutral pixel `(v, v, v)` maps exactly to `v`:
//!
//! ```
//! use pixedit_core::pixel::luma_rec601;
//!
//! assert_eq!(luma_rec601([255, 255, 255]), 255);
//! assert_eq!(luma_rec601([255, 0, 0]), 76);
//! assert_eq!(luma_rec601([77, 77, 77]), 77);
//! ```
//!
//! # Used By
//!
//! - [`crate::buffer::PixelBuffer::to_grayscale`]
//! - `pixedit-io` - decoders pick a mode per file

use std::fmt;

// 0.299, 0.587, 0.114 in 16.16 fixed point; they sum to exactly 1 << 16.
const LUMA_FIX_R: u32 = 19595;
const LUMA_FIX_G: u32 = 38470;
const LUMA_FIX_B: u32 = 7471;

/// Converts an 8-bit RGB triple to 8-bit Rec.601 luma with rounding.
#[inline]
pub fn luma_rec601(rgb: [u8; 3]) -> u8 {
    let l = rgb[0] as u32 * LUMA_FIX_R
        + rgb[1] as u32 * LUMA_FIX_G
        + rgb[2] as u32 * LUMA_FIX_B
        + 0x8000;
    // Max is 255 << 16 + 0x8000, which still shifts down to 255.
    (l >> 16) as u8
}

/// Channel layout of a [`PixelBuffer`](crate::PixelBuffer).
///
/// Only 8-bit grayscale and 8-bit RGB exist; there is no alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ChannelMode {
    /// Single luminance channel.
    Gray,
    /// Interleaved red, green, blue.
    #[default]
    Rgb,
}

impl ChannelMode {
    /// Number of interleaved channels per pixel.
    #[inline]
    pub const fn channels(self) -> usize {
        match self {
            Self::Gray => 1,
            Self::Rgb => 3,
        }
    }
}

impl fmt::Display for ChannelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gray => f.write_str("L"),
            Self::Rgb => f.write_str("RGB"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_point_weights_match_float() {
        let scale = (1u32 << 16) as f64;
        for (fix, weight) in [(LUMA_FIX_R, 0.299), (LUMA_FIX_G, 0.587), (LUMA_FIX_B, 0.114)] {
            assert!((fix as f64 / scale - weight).abs() < 1e-4);
        }
        assert_eq!(LUMA_FIX_R + LUMA_FIX_G + LUMA_FIX_B, 1 << 16);
    }

    #[test]
    fn test_luma_neutral_is_exact() {
        for v in 0..=255u8 {
            assert_eq!(luma_rec601([v, v, v]), v);
        }
    }

    #[test]
    fn test_luma_primaries() {
        assert_eq!(luma_rec601([255, 0, 0]), 76);
        assert_eq!(luma_rec601([0, 255, 0]), 150);
        assert_eq!(luma_rec601([0, 0, 255]), 29);
    }

    #[test]
    fn test_channel_mode() {
        assert_eq!(ChannelMode::Gray.channels(), 1);
        assert_eq!(ChannelMode::Rgb.channels(), 3);
        assert_eq!(ChannelMode::Gray.to_string(), "L");
    }
}
