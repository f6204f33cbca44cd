//! Tonal adjustments: brightness, contrast and saturation.
//!
//! All three work on the RGB form of the input and return a new RGB buffer.
//! Brightness truncates its result like the filters do. Contrast and
//! saturation pass through `[0, 1]` floats and round back, so a factor of
//! `1.0` reproduces the input exactly.
//! None of them looks at neighbouring pixels; contrast does need one extra
//! pass over the whole buffer for its mean.
//!
//! | Adjustment | Parameter | Identity | Domain |
//! |---|---|---|---|
//! | [`Adjustment::Brightness`] | additive offset | `0.0` | finite, typically `[-255, 255]` |
//! | [`Adjustment::Contrast`] | factor around the mean | `1.0` | finite, `>= 0` |
//! | [`Adjustment::Saturation`] | HSV saturation factor | `1.0` | finite, `>= 0` |
//!
//! # Example
//!
//! ```rust
//! use pixedit_core::{ChannelMode, PixelBuffer};
//! use pixedit_ops::Adjustment;
//!
//! let src = PixelBuffer::filled(2, 2, ChannelMode::Rgb, &[100, 100, 100]).unwrap();
//! let out = Adjustment::Brightness.apply(&src, 300.0).unwrap();
//! assert!(out.data().iter().all(|&v| v == 255));
//! ```

use crate::convolve::{quantize, truncate};
use crate::parallel;
use crate::{OpsError, OpsResult};
use pixedit_core::PixelBuffer;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// A named tonal adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Adjustment {
    /// Adds a constant to every channel.
    Brightness,
    /// Scales distance from the buffer-wide mean.
    Contrast,
    /// Scales HSV saturation per pixel.
    Saturation,
}

impl Adjustment {
    /// Every adjustment, in name-table order.
    pub const ALL: [Adjustment; 3] = [
        Adjustment::Brightness,
        Adjustment::Contrast,
        Adjustment::Saturation,
    ];

    /// Wire name used on the command line and in recipes.
    pub const fn name(self) -> &'static str {
        match self {
            Adjustment::Brightness => "brightness",
            Adjustment::Contrast => "contrast",
            Adjustment::Saturation => "saturation",
        }
    }

    /// Checks `value` against this adjustment's domain.
    pub fn validate(self, value: f64) -> OpsResult<()> {
        let ok = match self {
            Adjustment::Brightness => value.is_finite(),
            Adjustment::Contrast | Adjustment::Saturation => value.is_finite() && value >= 0.0,
        };
        if ok {
            Ok(())
        } else {
            Err(OpsError::InvalidParameter(format!(
                "{} value {value} is out of range",
                self.name()
            )))
        }
    }

    /// Applies the adjustment and returns a new RGB buffer.
    ///
    /// # Errors
    ///
    /// [`OpsError::InvalidParameter`] if `value` is outside the domain.
    pub fn apply(self, buffer: &PixelBuffer, value: f64) -> OpsResult<PixelBuffer> {
        match self {
            Adjustment::Brightness => brightness(buffer, value),
            Adjustment::Contrast => contrast(buffer, value),
            Adjustment::Saturation => saturation(buffer, value),
        }
    }
}

impl FromStr for Adjustment {
    type Err = OpsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Adjustment::ALL
            .into_iter()
            .find(|a| a.name() == s)
            .ok_or_else(|| OpsError::UnsupportedAdjustment(s.to_string()))
    }
}

impl fmt::Display for Adjustment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Adds `value` to every channel, clamping to `[0, 255]` and dropping the fraction.
pub fn brightness(buffer: &PixelBuffer, value: f64) -> OpsResult<PixelBuffer> {
    Adjustment::Brightness.validate(value)?;
    debug!(value, "brightness");

    let mut out = buffer.to_rgb();
    parallel::map_samples(out.data_mut(), |v| truncate(v as f64 + value));
    Ok(out)
}

/// Pushes every channel away from (or towards) the buffer-wide mean.
///
/// Samples are normalized to `[0, 1]`, the mean `m` of all samples is taken,
/// then `out = clamp(m + (in - m) * factor, 0, 1) * 255`.
pub fn contrast(buffer: &PixelBuffer, factor: f64) -> OpsResult<PixelBuffer> {
    Adjustment::Contrast.validate(factor)?;

    let mut out = buffer.to_rgb();
    if out.data().is_empty() {
        return Ok(out);
    }
    let mean = mean_intensity(&out);
    debug!(factor, mean, "contrast");

    parallel::map_samples(out.data_mut(), |v| {
        let n = v as f64 / 255.0;
        quantize((mean + (n - mean) * factor).clamp(0.0, 1.0) * 255.0)
    });
    Ok(out)
}

/// Mean of all samples, normalized to `[0, 1]`.
///
/// Returns `0.0` for an empty buffer.
pub fn mean_intensity(buffer: &PixelBuffer) -> f64 {
    let data = buffer.data();
    if data.is_empty() {
        return 0.0;
    }
    let sum: u64 = data.iter().map(|&v| v as u64).sum();
    sum as f64 / data.len() as f64 / 255.0
}

/// Scales each pixel's HSV saturation by `factor`, clamped to `[0, 1]`.
pub fn saturation(buffer: &PixelBuffer, factor: f64) -> OpsResult<PixelBuffer> {
    Adjustment::Saturation.validate(factor)?;
    debug!(factor, "saturation");

    let mut out = buffer.to_rgb();
    parallel::map_pixels(out.data_mut(), 3, |px| {
        let rgb = [px[0], px[1], px[2]].map(|v| v as f64 / 255.0);
        let [h, s, v] = rgb_to_hsv(rgb);
        let rgb = hsv_to_rgb([h, (s * factor).clamp(0.0, 1.0), v]);
        for (dst, c) in px.iter_mut().zip(rgb) {
            *dst = quantize(c * 255.0);
        }
    });
    Ok(out)
}

/// Converts normalized RGB to HSV.
///
/// Hue is a fraction of a full turn in `[0, 1)`; saturation and value are
/// in `[0, 1]`. Grays have hue and saturation `0`.
pub fn rgb_to_hsv([r, g, b]: [f64; 3]) -> [f64; 3] {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let v = max;
    if max == min {
        return [0.0, 0.0, v];
    }
    let delta = max - min;
    let s = delta / max;
    let rc = (max - r) / delta;
    let gc = (max - g) / delta;
    let bc = (max - b) / delta;
    let h = if r == max {
        bc - gc
    } else if g == max {
        2.0 + rc - bc
    } else {
        4.0 + gc - rc
    };
    [(h / 6.0).rem_euclid(1.0), s, v]
}

/// Converts HSV (hue as a fraction of a turn) back to normalized RGB.
pub fn hsv_to_rgb([h, s, v]: [f64; 3]) -> [f64; 3] {
    if s == 0.0 {
        return [v, v, v];
    }
    let h6 = h.rem_euclid(1.0) * 6.0;
    let sector = h6.floor();
    let f = h6 - sector;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));
    match sector as u8 % 6 {
        0 => [v, t, p],
        1 => [q, v, p],
        2 => [p, v, t],
        3 => [p, q, v],
        4 => [t, p, v],
        _ => [v, p, q],
    }
}
