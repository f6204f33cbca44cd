//! Convolution engine shared by every spatial filter.
//!
//! # Kernels
//!
//! - [`Kernel::box_blur`] - uniform average
//! - [`Kernel::sobel_x`] / [`Kernel::sobel_y`] - horizontal / vertical gradients
//! - [`Kernel::sharpen`] - Laplacian sharpening
//!
//! # Borders
//!
//! Samples outside the image come from a [`Border`] rule. The default,
//! [`Border::Reflect`], mirrors interior samples without repeating the edge:
//! index `-1` reads index `1`, index `len` reads index `len - 2`.
//!
//! # Output
//!
//! [`convolve`] returns a [`Response`]: raw `f64` sums, one per sample, with
//! no clamping or casting. Filters decide how to bring it back to 8 bits;
//! [`Response::to_buffer`] clamps and truncates.
//!
//! # Example
//!
//! ```rust
//! use pixedit_core::{ChannelMode, PixelBuffer};
//! use pixedit_ops::convolve::{convolve, Kernel};
//!
//! let src = PixelBuffer::filled(5, 5, ChannelMode::Gray, &[90]).unwrap();
//! let response = convolve(&src, &Kernel::box_blur(3)).unwrap();
//! assert!(response.data().iter().all(|v| (v - 90.0).abs() < 1e-9));
//! ```

use crate::parallel;
use crate::{OpsError, OpsResult};
use pixedit_core::{ChannelMode, PixelBuffer};
use tracing::trace;

/// Square convolution kernel with an odd side length.
///
/// Weights are stored row-major: `data[ky * size + kx]`, where `ky` pairs
/// with the vertical offset and `kx` with the horizontal one.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    data: Vec<f64>,
    size: usize,
}

impl Kernel {
    /// Creates a kernel from row-major weights.
    ///
    /// # Errors
    ///
    /// [`OpsError::InvalidKernel`] if `size` is zero or even, or if
    /// `data.len() != size * size`.
    pub fn new(data: Vec<f64>, size: usize) -> OpsResult<Self> {
        if size % 2 == 0 {
            return Err(OpsError::InvalidKernel(format!(
                "kernel size must be odd, got {size}"
            )));
        }
        if data.len() != size * size {
            return Err(OpsError::InvalidKernel(format!(
                "kernel data size {} doesn't match {}x{}",
                data.len(),
                size,
                size
            )));
        }
        Ok(Self { data, size })
    }

    /// Creates a kernel from nested rows.
    ///
    /// ```rust
    /// use pixedit_ops::convolve::Kernel;
    ///
    /// let k = Kernel::from_rows([[0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 0.0]]).unwrap();
    /// assert_eq!(k.radius(), 1);
    /// ```
    pub fn from_rows<const N: usize>(rows: [[f64; N]; N]) -> OpsResult<Self> {
        Self::new(rows.iter().flatten().copied().collect(), N)
    }

    /// Creates a box blur kernel (simple average).
    ///
    /// Even sizes are bumped to the next odd size.
    pub fn box_blur(size: usize) -> Self {
        let size = if size % 2 == 0 { size + 1 } else { size };
        let count = size * size;
        let weight = 1.0 / count as f64;
        Self {
            data: vec![weight; count],
            size,
        }
    }

    /// Sobel operator for horizontal gradients.
    pub fn sobel_x() -> Self {
        Self {
            data: vec![
                -1.0, 0.0, 1.0,
                -2.0, 0.0, 2.0,
                -1.0, 0.0, 1.0,
            ],
            size: 3,
        }
    }

    /// Sobel operator for vertical gradients.
    pub fn sobel_y() -> Self {
        Self {
            data: vec![
                -1.0, -2.0, -1.0,
                0.0, 0.0, 0.0,
                1.0, 2.0, 1.0,
            ],
            size: 3,
        }
    }

    /// Creates a sharpening kernel.
    ///
    /// `sharpen(1.0)` is the classic `[[0,-1,0],[-1,5,-1],[0,-1,0]]`.
    ///
    /// ```rust
    /// use pixedit_ops::convolve::Kernel;
    ///
    /// let k = Kernel::sharpen(1.0);
    /// assert_eq!(k.data()[4], 5.0);
    /// ```
    pub fn sharpen(amount: f64) -> Self {
        let center = 1.0 + 4.0 * amount;
        Self {
            data: vec![
                0.0, -amount, 0.0,
                -amount, center, -amount,
                0.0, -amount, 0.0,
            ],
            size: 3,
        }
    }

    /// Side length.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns the kernel radius (half-size).
    #[inline]
    pub fn radius(&self) -> usize {
        self.size / 2
    }

    /// Row-major weights.
    #[inline]
    pub fn data(&self) -> &[f64] {
        &self.data
    }
}

/// How samples outside the image are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Border {
    /// Mirror around the edge sample without repeating it.
    #[default]
    Reflect,
    /// Outside samples are zero.
    Zero,
    /// Outside samples repeat the nearest edge sample.
    Replicate,
}

impl Border {
    /// Maps a possibly out-of-range index onto `0..len`.
    ///
    /// `None` means the sample contributes nothing ([`Border::Zero`]).
    /// For [`Border::Reflect`] the caller guarantees `-len < i < 2 * len - 1`,
    /// which holds whenever the kernel fits the image.
    #[inline]
    pub fn resolve(self, i: isize, len: usize) -> Option<usize> {
        let len = len as isize;
        if (0..len).contains(&i) {
            return Some(i as usize);
        }
        match self {
            Border::Reflect => {
                let r = if i < 0 { -i } else { 2 * (len - 1) - i };
                debug_assert!((0..len).contains(&r), "reflect index {i} escapes 0..{len}");
                Some(r as usize)
            }
            Border::Zero => None,
            Border::Replicate => Some(i.clamp(0, len - 1) as usize),
        }
    }

    /// Resolves every padded coordinate `0..len + 2 * radius` once up front.
    fn index_table(self, len: usize, radius: usize) -> Vec<Option<usize>> {
        (0..len + 2 * radius)
            .map(|p| self.resolve(p as isize - radius as isize, len))
            .collect()
    }
}

/// Unclamped convolution output, one `f64` per input sample.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    data: Vec<f64>,
    width: u32,
    height: u32,
    channels: usize,
}

impl Response {
    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Interleaved channels per pixel.
    #[inline]
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Raw interleaved sums.
    #[inline]
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Sample at (x, y, channel), or `None` outside the plane.
    pub fn get(&self, x: u32, y: u32, channel: usize) -> Option<f64> {
        if x >= self.width || y >= self.height || channel >= self.channels {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * self.channels + channel;
        Some(self.data[idx])
    }

    /// Combines two responses of the same shape sample by sample.
    ///
    /// # Errors
    ///
    /// [`OpsError::InvalidParameter`] if the shapes differ.
    pub fn zip_map<F>(&self, other: &Response, f: F) -> OpsResult<Response>
    where
        F: Fn(f64, f64) -> f64,
    {
        if (self.width, self.height, self.channels) != (other.width, other.height, other.channels) {
            return Err(OpsError::InvalidParameter(format!(
                "response shape mismatch: {}x{}x{} vs {}x{}x{}",
                self.width, self.height, self.channels, other.width, other.height, other.channels
            )));
        }
        let data = self
            .data
            .iter()
            .zip(&other.data)
            .map(|(&a, &b)| f(a, b))
            .collect();
        Ok(Response { data, ..*self })
    }

    /// Clamps to `[0, 255]`, truncates and packs into a buffer.
    ///
    /// # Errors
    ///
    /// [`OpsError::InvalidParameter`] if `mode` does not match the channel count.
    pub fn to_buffer(&self, mode: ChannelMode) -> OpsResult<PixelBuffer> {
        if mode.channels() != self.channels {
            return Err(OpsError::InvalidParameter(format!(
                "cannot pack {}-channel response as {mode}",
                self.channels
            )));
        }
        let data = self.data.iter().map(|&v| truncate(v)).collect();
        Ok(PixelBuffer::from_data(self.width, self.height, mode, data)?)
    }
}

/// Accumulation error tolerated below an integer before truncating.
///
/// Fractional weights such as `1/9` sum a flat neighbourhood to a hair under
/// the input value; anything within this distance counts as the integer.
const TRUNCATE_TOLERANCE: f64 = 1e-9;

/// Clamps a float sample to `[0, 255]` and drops the fraction.
///
/// ```rust
/// use pixedit_ops::convolve::truncate;
///
/// assert_eq!(truncate(56.67), 56);
/// assert_eq!(truncate(-12.0), 0);
/// assert_eq!(truncate(300.0), 255);
/// ```
#[inline]
pub fn truncate(v: f64) -> u8 {
    (v + TRUNCATE_TOLERANCE).clamp(0.0, 255.0) as u8
}

/// Rounds a float sample to the nearest 8-bit value, saturating at the ends.
#[inline]
pub fn quantize(v: f64) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

/// Convolves every channel of `buffer` with `kernel` using reflect padding.
///
/// # Errors
///
/// - [`OpsError::EmptyBuffer`] if width or height is zero
/// - [`OpsError::InvalidKernel`] if the kernel is larger than the image
///
/// # Example
///
/// ```rust
/// use pixedit_core::{ChannelMode, PixelBuffer};
/// use pixedit_ops::convolve::{convolve, Kernel};
///
/// let src = PixelBuffer::new(8, 8, ChannelMode::Rgb);
/// let result = convolve(&src, &Kernel::box_blur(3)).unwrap();
/// assert_eq!(result.data().len(), 8 * 8 * 3);
/// ```
pub fn convolve(buffer: &PixelBuffer, kernel: &Kernel) -> OpsResult<Response> {
    convolve_with(buffer, kernel, Border::Reflect)
}

/// Convolves every channel of `buffer` with `kernel` using `border`.
///
/// Same contract as [`convolve`].
pub fn convolve_with(buffer: &PixelBuffer, kernel: &Kernel, border: Border) -> OpsResult<Response> {
    let (width, height) = buffer.dimensions();
    let channels = buffer.channels();
    let size = kernel.size();
    trace!(width, height, channels, kernel = size, ?border, "convolve");

    if buffer.is_empty() {
        return Err(OpsError::EmptyBuffer { width, height });
    }
    if size > width as usize || size > height as usize {
        return Err(OpsError::InvalidKernel(format!(
            "{size}x{size} kernel does not fit {width}x{height} image"
        )));
    }

    let w = width as usize;
    let radius = kernel.radius();
    let cols = border.index_table(w, radius);
    let rows = border.index_table(height as usize, radius);
    let src = buffer.data();
    let weights = kernel.data();

    let mut dst = vec![0.0f64; w * height as usize * channels];

    parallel::for_each_row(&mut dst, w * channels, |y, out| {
        for x in 0..w {
            for c in 0..channels {
                let mut acc = 0.0f64;
                for (ky, krow) in weights.chunks_exact(size).enumerate() {
                    let Some(sy) = rows[y + ky] else { continue };
                    let line = sy * w;
                    for (kx, &kw) in krow.iter().enumerate() {
                        if let Some(sx) = cols[x + kx] {
                            acc += src[(line + sx) * channels + c] as f64 * kw;
                        }
                    }
                }
                out[x * channels + c] = acc;
            }
        }
    });

    Ok(Response {
        data: dst,
        width,
        height,
        channels,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn gray(width: u32, height: u32, data: Vec<u8>) -> PixelBuffer {
        PixelBuffer::from_data(width, height, ChannelMode::Gray, data).unwrap()
    }

    #[test]
    fn test_kernel_box() {
        let k = Kernel::box_blur(3);
        assert_eq!(k.size(), 3);
        assert_eq!(k.data().len(), 9);
        for v in k.data() {
            assert_abs_diff_eq!(*v, 1.0 / 9.0);
        }
        assert_eq!(Kernel::box_blur(4).size(), 5);
    }

    #[test]
    fn test_kernel_sums() {
        let sum = |k: Kernel| k.data().iter().sum::<f64>();
        assert_abs_diff_eq!(sum(Kernel::box_blur(5)), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(sum(Kernel::sharpen(1.0)), 1.0);
        assert_abs_diff_eq!(sum(Kernel::sobel_x()), 0.0);
        assert_abs_diff_eq!(sum(Kernel::sobel_y()), 0.0);
    }

    #[test]
    fn test_kernel_validation() {
        assert!(matches!(Kernel::new(vec![1.0; 4], 2), Err(OpsError::InvalidKernel(_))));
        assert!(matches!(Kernel::new(vec![], 0), Err(OpsError::InvalidKernel(_))));
        assert!(matches!(Kernel::new(vec![1.0; 8], 3), Err(OpsError::InvalidKernel(_))));
        assert!(Kernel::new(vec![1.0], 1).is_ok());
    }

    #[test]
    fn test_reflect_resolve() {
        let b = Border::Reflect;
        assert_eq!(b.resolve(-1, 5), Some(1));
        assert_eq!(b.resolve(-2, 5), Some(2));
        assert_eq!(b.resolve(5, 5), Some(3));
        assert_eq!(b.resolve(6, 5), Some(2));
        assert_eq!(b.resolve(0, 5), Some(0));
        assert_eq!(b.resolve(4, 5), Some(4));
    }

    #[test]
    fn test_zero_and_replicate_resolve() {
        assert_eq!(Border::Zero.resolve(-1, 5), None);
        assert_eq!(Border::Zero.resolve(5, 5), None);
        assert_eq!(Border::Replicate.resolve(-3, 5), Some(0));
        assert_eq!(Border::Replicate.resolve(9, 5), Some(4));
    }

    #[test]
    fn test_identity_kernel() {
        let src = gray(3, 3, (10..19).collect());
        let k = Kernel::from_rows([[0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 0.0]]).unwrap();
        let out = convolve(&src, &k).unwrap();
        let expected: Vec<f64> = (10..19).map(f64::from).collect();
        assert_eq!(out.data(), expected.as_slice());
    }

    #[test]
    fn test_flat_image_unchanged() {
        let src = PixelBuffer::filled(5, 5, ChannelMode::Rgb, &[128, 64, 200]).unwrap();
        let out = convolve(&src, &Kernel::box_blur(3)).unwrap();
        for (o, s) in out.data().iter().zip(src.data()) {
            assert_abs_diff_eq!(*o, *s as f64, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_reflect_padding_reads_mirror_not_edge() {
        // Row [0, 90, 0]: reflect pads to [90 | 0 90 0 | 90].
        let src = gray(3, 3, vec![0, 90, 0, 0, 90, 0, 0, 90, 0]);
        let k = Kernel::from_rows([[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 0.0]]).unwrap();
        let out = convolve(&src, &k).unwrap();
        // Left neighbour of x=0 is x=1 under reflection.
        assert_eq!(out.get(0, 0, 0), Some(90.0));
        assert_eq!(out.get(1, 0, 0), Some(0.0));
        assert_eq!(out.get(2, 0, 0), Some(90.0));
    }

    #[test]
    fn test_zero_padding_differs_at_border() {
        let src = PixelBuffer::filled(4, 4, ChannelMode::Gray, &[90]).unwrap();
        let k = Kernel::box_blur(3);
        let reflect = convolve_with(&src, &k, Border::Reflect).unwrap();
        let zero = convolve_with(&src, &k, Border::Zero).unwrap();
        // Corner sees 4 of 9 taps inside the image.
        assert_abs_diff_eq!(zero.get(0, 0, 0).unwrap(), 40.0, epsilon = 1e-9);
        assert_abs_diff_eq!(reflect.get(0, 0, 0).unwrap(), 90.0, epsilon = 1e-9);
        // Interior agrees.
        assert_abs_diff_eq!(zero.get(1, 1, 0).unwrap(), reflect.get(1, 1, 0).unwrap(), epsilon = 1e-9);
    }

    #[test]
    fn test_replicate_padding() {
        let src = gray(3, 3, vec![0, 90, 0, 0, 90, 0, 0, 90, 0]);
        let k = Kernel::from_rows([[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 0.0]]).unwrap();
        let out = convolve_with(&src, &k, Border::Replicate).unwrap();
        assert_eq!(out.get(0, 0, 0), Some(0.0));
    }

    #[test]
    fn test_no_intermediate_clamping() {
        let src = gray(3, 3, vec![0, 0, 0, 0, 255, 0, 0, 0, 0]);
        let out = convolve(&src, &Kernel::sharpen(1.0)).unwrap();
        assert_eq!(out.get(1, 1, 0), Some(1275.0));
        assert_eq!(out.get(1, 0, 0), Some(-510.0));
    }

    #[test]
    fn test_minimum_size() {
        let ok = PixelBuffer::new(3, 3, ChannelMode::Rgb);
        assert!(convolve(&ok, &Kernel::box_blur(3)).is_ok());

        let small = PixelBuffer::new(2, 2, ChannelMode::Rgb);
        assert!(matches!(
            convolve(&small, &Kernel::box_blur(3)),
            Err(OpsError::InvalidKernel(_))
        ));

        let narrow = PixelBuffer::new(10, 2, ChannelMode::Gray);
        assert!(matches!(
            convolve(&narrow, &Kernel::sobel_x()),
            Err(OpsError::InvalidKernel(_))
        ));
    }

    #[test]
    fn test_empty_buffer() {
        let empty = PixelBuffer::new(0, 5, ChannelMode::Gray);
        assert_eq!(
            convolve(&empty, &Kernel::box_blur(3)),
            Err(OpsError::EmptyBuffer { width: 0, height: 5 })
        );
    }

    #[test]
    fn test_channels_independent() {
        let mut src = PixelBuffer::new(3, 3, ChannelMode::Rgb);
        src.set(1, 1, &[255, 0, 0]).unwrap();
        let out = convolve(&src, &Kernel::box_blur(3)).unwrap();
        assert_abs_diff_eq!(out.get(1, 1, 0).unwrap(), 255.0 / 9.0, epsilon = 1e-9);
        assert_eq!(out.get(1, 1, 1), Some(0.0));
        assert_eq!(out.get(1, 1, 2), Some(0.0));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate(-3.2), 0);
        assert_eq!(truncate(28.33), 28);
        assert_eq!(truncate(56.67), 56);
        assert_eq!(truncate(113.99), 113);
        assert_eq!(truncate(1275.0), 255);
        assert_eq!(truncate(f64::NAN), 0);
        // Sums of 1/9 weights land just below the input value.
        assert_eq!(truncate(127.99999999999997), 128);
    }

    #[test]
    fn test_box_blur_truncates_flat_exactly() {
        for v in 0..=255u8 {
            let src = gray(3, 3, vec![v; 9]);
            let out = convolve(&src, &Kernel::box_blur(3)).unwrap();
            let packed = out.to_buffer(ChannelMode::Gray).unwrap();
            assert_eq!(packed, src, "flat {v}");
        }
    }

    #[test]
    fn test_quantize() {
        assert_eq!(quantize(-3.2), 0);
        assert_eq!(quantize(28.33), 28);
        assert_eq!(quantize(56.67), 57);
        assert_eq!(quantize(1275.0), 255);
        assert_eq!(quantize(f64::NAN), 0);
    }

    #[test]
    fn test_zip_map_and_to_buffer() {
        let src = gray(3, 3, vec![0, 0, 0, 0, 255, 0, 0, 0, 0]);
        let gx = convolve(&src, &Kernel::sobel_x()).unwrap();
        let gy = convolve(&src, &Kernel::sobel_y()).unwrap();
        let mag = gx.zip_map(&gy, |a, b| (a * a + b * b).sqrt()).unwrap();
        let out = mag.to_buffer(ChannelMode::Gray).unwrap();
        assert_eq!(out.dimensions(), (3, 3));
        assert!(mag.to_buffer(ChannelMode::Rgb).is_err());
    }
}
