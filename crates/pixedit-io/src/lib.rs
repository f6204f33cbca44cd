//! # pixedit-io
//!
//! Loading and saving [`PixelBuffer`]s as PNG and JPEG files.
//!
//! - [`load`] - identify the file by its signature, falling back to the
//!   extension, and decode
//! - [`save`] / [`save_with`] - encode by destination extension
//!
//! Decoded images always arrive as 8-bit [`ChannelMode::Gray`] or
//! [`ChannelMode::Rgb`]; alpha is discarded.
//!
//! # Example
//!
//! ```rust,no_run
//! let buffer = pixedit_io::load("photo.jpg")?;
//! pixedit_io::save("photo.png", &buffer)?;
//! # Ok::<(), pixedit_io::IoError>(())
//! ```
//!
//! # Feature Flags
//!
//! - `png` - PNG support (default)
//! - `jpeg` - JPEG support (default)
//!
//! [`ChannelMode::Gray`]: pixedit_core::ChannelMode::Gray
//! [`ChannelMode::Rgb`]: pixedit_core::ChannelMode::Rgb

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;

#[cfg(feature = "png")]
pub mod png;

#[cfg(feature = "jpeg")]
pub mod jpeg;

pub use error::{IoError, IoResult};

use pixedit_core::PixelBuffer;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::trace;

/// Default JPEG quality used by [`save`].
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1A, b'\n'];
const JPEG_SOI: [u8; 3] = [0xFF, 0xD8, 0xFF];

/// File formats pixedit reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Portable Network Graphics.
    Png,
    /// JPEG/JFIF.
    Jpeg,
}

impl Format {
    /// Format named by the path's extension, ignoring case.
    pub fn from_extension(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            _ => None,
        }
    }

    /// Format announced by the leading bytes of a file.
    pub fn sniff(header: &[u8]) -> Option<Self> {
        if header.starts_with(&PNG_SIGNATURE) {
            Some(Self::Png)
        } else if header.starts_with(&JPEG_SOI) {
            Some(Self::Jpeg)
        } else {
            None
        }
    }

    /// Identifies an existing file by content, then by extension.
    ///
    /// # Errors
    ///
    /// [`IoError::Io`] if the file cannot be read, [`IoError::UnsupportedFormat`]
    /// if neither the content nor the name identifies it.
    pub fn detect<P: AsRef<Path>>(path: P) -> IoResult<Self> {
        let path = path.as_ref();
        let mut header = Vec::with_capacity(PNG_SIGNATURE.len());
        File::open(path)?
            .take(PNG_SIGNATURE.len() as u64)
            .read_to_end(&mut header)?;

        Self::sniff(&header)
            .or_else(|| Self::from_extension(path))
            .ok_or_else(|| IoError::UnsupportedFormat(path.display().to_string()))
    }

    /// Short display name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Png => "PNG",
            Self::Jpeg => "JPEG",
        }
    }
}

/// Encoder settings for [`save_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveOptions {
    /// JPEG quality, 1-100. Ignored for PNG.
    pub jpeg_quality: u8,
}

impl Default for SaveOptions {
    fn default() -> Self {
        Self { jpeg_quality: DEFAULT_JPEG_QUALITY }
    }
}

/// Reads an image from a file, auto-detecting the format.
///
/// # Errors
///
/// - [`IoError::Io`] if the file cannot be opened
/// - [`IoError::UnsupportedFormat`] if the format is not recognized or its
///   feature is disabled
/// - [`IoError::DecodeError`] if the file is corrupted
pub fn load<P: AsRef<Path>>(path: P) -> IoResult<PixelBuffer> {
    let path = path.as_ref();
    let format = Format::detect(path)?;
    trace!(path = %path.display(), format = format.name(), "load");

    match format {
        #[cfg(feature = "png")]
        Format::Png => png::read(path),

        #[cfg(feature = "jpeg")]
        Format::Jpeg => jpeg::read(path),

        #[allow(unreachable_patterns)]
        _ => Err(IoError::UnsupportedFormat(path.display().to_string())),
    }
}

/// Writes a buffer to a file with default options.
///
/// The format is chosen by the destination extension.
pub fn save<P: AsRef<Path>>(path: P, buffer: &PixelBuffer) -> IoResult<()> {
    save_with(path, buffer, SaveOptions::default())
}

/// Writes a buffer to a file.
///
/// # Errors
///
/// - [`IoError::UnsupportedFormat`] for an unknown extension; nothing is written
/// - [`IoError::Io`] if the destination cannot be created
/// - [`IoError::EncodeError`] if the encoder rejects the data
#[allow(unused_variables)]
pub fn save_with<P: AsRef<Path>>(
    path: P,
    buffer: &PixelBuffer,
    options: SaveOptions,
) -> IoResult<()> {
    let path = path.as_ref();
    let format = Format::from_extension(path)
        .ok_or_else(|| IoError::UnsupportedFormat(path.display().to_string()))?;
    trace!(path = %path.display(), format = format.name(), "save");

    match format {
        #[cfg(feature = "png")]
        Format::Png => png::write(path, buffer),

        #[cfg(feature = "jpeg")]
        Format::Jpeg => jpeg::write(path, buffer, options.jpeg_quality),

        #[allow(unreachable_patterns)]
        _ => Err(IoError::UnsupportedFormat(path.display().to_string())),
    }
}
