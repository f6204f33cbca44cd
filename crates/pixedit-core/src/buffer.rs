//! The 8-bit pixel buffer every pixedit operation consumes and produces.
//!
//! # Memory Layout
//!
//! Pixels are stored **row-major**, top-to-bottom, channels interleaved:
//!
//! ```text
//! RGB:  [R G B R G B R G B ...]  <- Row 0
//!       [R G B R G B R G B ...]  <- Row 1
//! Gray: [L L L ...]
//! ```
//!
//! The buffer length is always `width * height * channels`.
//!
//! # Usage
//!
//! ```rust
//! use pixedit_core::{ChannelMode, PixelBuffer};
//!
//! let mut buf = PixelBuffer::new(4, 4, ChannelMode::Rgb);
//! buf.set(1, 2, &[255, 128, 0]).unwrap();
//! assert_eq!(buf.get(1, 2).unwrap(), &[255, 128, 0]);
//!
//! let gray = buf.to_grayscale();
//! assert_eq!(gray.channels(), 1);
//! assert_eq!(gray.dimensions(), (4, 4));
//! ```

use crate::pixel::luma_rec601;
use crate::{ChannelMode, Error, Result};

/// Owned 8-bit image buffer in grayscale or RGB.
///
/// Conversions ([`to_grayscale`](Self::to_grayscale),
/// [`to_rgb`](Self::to_rgb)) always return a fresh buffer and leave the
/// source alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    data: Vec<u8>,
    width: u32,
    height: u32,
    mode: ChannelMode,
}

impl PixelBuffer {
    /// Creates a zero-filled (black) buffer.
    pub fn new(width: u32, height: u32, mode: ChannelMode) -> Self {
        let len = width as usize * height as usize * mode.channels();
        Self {
            data: vec![0; len],
            width,
            height,
            mode,
        }
    }

    /// Creates a buffer with every pixel set to `pixel`.
    ///
    /// # Errors
    ///
    /// [`Error::ChannelMismatch`] if `pixel` does not have one value per
    /// channel of `mode`.
    pub fn filled(width: u32, height: u32, mode: ChannelMode, pixel: &[u8]) -> Result<Self> {
        if pixel.len() != mode.channels() {
            return Err(Error::channel_mismatch(mode.channels(), pixel.len()));
        }
        let pixel_count = width as usize * height as usize;
        let data = pixel.repeat(pixel_count);
        Ok(Self {
            data,
            width,
            height,
            mode,
        })
    }

    /// Wraps existing interleaved pixel data.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidDimensions`] if `data.len() != width * height * channels`.
    ///
    /// ```rust
    /// use pixedit_core::{ChannelMode, PixelBuffer};
    ///
    /// let buf = PixelBuffer::from_data(2, 2, ChannelMode::Gray, vec![0, 64, 128, 255]).unwrap();
    /// assert_eq!(buf.get(1, 1).unwrap(), &[255]);
    /// assert!(PixelBuffer::from_data(2, 2, ChannelMode::Rgb, vec![0; 4]).is_err());
    /// ```
    pub fn from_data(width: u32, height: u32, mode: ChannelMode, data: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * mode.channels();
        if data.len() != expected {
            return Err(Error::invalid_dimensions(
                width,
                height,
                format!("expected {} elements, got {}", expected, data.len()),
            ));
        }
        Ok(Self {
            data,
            width,
            height,
            mode,
        })
    }

    /// Returns the width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns (width, height).
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Returns the channel mode.
    #[inline]
    pub fn mode(&self) -> ChannelMode {
        self.mode
    }

    /// Returns the number of interleaved channels (1 or 3).
    #[inline]
    pub fn channels(&self) -> usize {
        self.mode.channels()
    }

    /// Returns `true` if the buffer has zero area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Raw interleaved samples.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Mutable access to the raw samples.
    ///
    /// The slice cannot change length, so the size invariant holds.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> Result<usize> {
        if x >= self.width || y >= self.height {
            return Err(Error::out_of_bounds(x, y, self.width, self.height));
        }
        Ok((y as usize * self.width as usize + x as usize) * self.channels())
    }

    /// Returns the channel values of the pixel at (x, y).
    ///
    /// # Errors
    ///
    /// [`Error::OutOfBounds`] if `x >= width` or `y >= height`.
    pub fn get(&self, x: u32, y: u32) -> Result<&[u8]> {
        let offset = self.offset(x, y)?;
        Ok(&self.data[offset..offset + self.channels()])
    }

    /// Overwrites the pixel at (x, y).
    ///
    /// # Errors
    ///
    /// [`Error::OutOfBounds`] for coordinates outside the buffer,
    /// [`Error::ChannelMismatch`] if `values` has the wrong length.
    pub fn set(&mut self, x: u32, y: u32, values: &[u8]) -> Result<()> {
        let channels = self.channels();
        if values.len() != channels {
            return Err(Error::channel_mismatch(channels, values.len()));
        }
        let offset = self.offset(x, y)?;
        self.data[offset..offset + channels].copy_from_slice(values);
        Ok(())
    }

    /// Iterates over pixels in row-major order, one channel slice each.
    pub fn pixels(&self) -> std::slice::ChunksExact<'_, u8> {
        self.data.chunks_exact(self.channels())
    }

    /// Returns a grayscale copy using Rec.601 luma.
    ///
    /// A grayscale buffer comes back as an identical clone.
    pub fn to_grayscale(&self) -> PixelBuffer {
        match self.mode {
            ChannelMode::Gray => self.clone(),
            ChannelMode::Rgb => {
                let data = self
                    .data
                    .chunks_exact(3)
                    .map(|px| luma_rec601([px[0], px[1], px[2]]))
                    .collect();
                Self {
                    data,
                    width: self.width,
                    height: self.height,
                    mode: ChannelMode::Gray,
                }
            }
        }
    }

    /// Returns an RGB copy, replicating the gray channel if needed.
    pub fn to_rgb(&self) -> PixelBuffer {
        match self.mode {
            ChannelMode::Rgb => self.clone(),
            ChannelMode::Gray => {
                let data = self.data.iter().flat_map(|&l| [l, l, l]).collect();
                Self {
                    data,
                    width: self.width,
                    height: self.height,
                    mode: ChannelMode::Rgb,
                }
            }
        }
    }
}
