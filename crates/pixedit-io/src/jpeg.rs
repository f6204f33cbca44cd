//! JPEG format support.
//!
//! Decoding goes through `jpeg-decoder`, encoding through `jpeg-encoder`.
//! Luminance JPEGs load as [`ChannelMode::Gray`], color JPEGs as
//! [`ChannelMode::Rgb`]. CMYK files are converted to RGB by plain inversion
//! and 16-bit luminance keeps its high byte.

use crate::{IoError, IoResult};
use jpeg_decoder::PixelFormat as JpegPixelFormat;
use jpeg_encoder::{ColorType as JpegColorType, Encoder};
use pixedit_core::{ChannelMode, PixelBuffer};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use tracing::debug;

/// Reads a JPEG file from the given path.
pub fn read<P: AsRef<Path>>(path: P) -> IoResult<PixelBuffer> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let mut decoder = jpeg_decoder::Decoder::new(BufReader::new(file));
    let pixels = decoder
        .decode()
        .map_err(|e| IoError::DecodeError(e.to_string()))?;
    let info = decoder
        .info()
        .ok_or_else(|| IoError::DecodeError("missing image info".into()))?;

    let width = u32::from(info.width);
    let height = u32::from(info.height);
    let (mode, data) = match info.pixel_format {
        JpegPixelFormat::L8 => (ChannelMode::Gray, pixels),
        JpegPixelFormat::L16 => (
            ChannelMode::Gray,
            pixels.chunks_exact(2).map(|s| s[0]).collect(),
        ),
        JpegPixelFormat::RGB24 => (ChannelMode::Rgb, pixels),
        JpegPixelFormat::CMYK32 => (ChannelMode::Rgb, cmyk_to_rgb(&pixels)),
    };

    debug!(path = %path.display(), width, height, %mode, "jpeg::read");
    Ok(PixelBuffer::from_data(width, height, mode, data)?)
}

/// Writes a buffer to a JPEG file.
///
/// `quality` is clamped to 1-100. JPEG dimensions are limited to 65535.
pub fn write<P: AsRef<Path>>(path: P, buffer: &PixelBuffer, quality: u8) -> IoResult<()> {
    let path = path.as_ref();
    let (w, h) = buffer.dimensions();
    let (Ok(w16), Ok(h16)) = (u16::try_from(w), u16::try_from(h)) else {
        return Err(IoError::EncodeError(format!(
            "{w}x{h} exceeds JPEG limit of 65535"
        )));
    };
    let color_type = match buffer.mode() {
        ChannelMode::Gray => JpegColorType::Luma,
        ChannelMode::Rgb => JpegColorType::Rgb,
    };

    let file = File::create(path)?;
    let quality = quality.clamp(1, 100);
    let encoder = Encoder::new(BufWriter::new(file), quality);
    encoder
        .encode(buffer.data(), w16, h16, color_type)
        .map_err(|e| IoError::EncodeError(e.to_string()))?;

    debug!(path = %path.display(), width = w, height = h, quality, "jpeg::write");
    Ok(())
}

fn cmyk_to_rgb(data: &[u8]) -> Vec<u8> {
    data.chunks_exact(4)
        .flat_map(|p| {
            let k = 255 - p[3] as u16;
            [p[0], p[1], p[2]].map(|c| ((255 - c as u16) * k / 255) as u8)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cmyk_to_rgb() {
        assert_eq!(cmyk_to_rgb(&[0, 0, 0, 0]), vec![255, 255, 255]);
        assert_eq!(cmyk_to_rgb(&[0, 0, 0, 255]), vec![0, 0, 0]);
        assert_eq!(cmyk_to_rgb(&[255, 0, 255, 0]), vec![0, 255, 0]);
    }

    #[test]
    fn test_gray_roundtrip_is_close() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gray.jpg");
        let src = PixelBuffer::filled(16, 16, ChannelMode::Gray, &[128]).unwrap();
        write(&path, &src, 95).unwrap();

        let back = read(&path).unwrap();
        assert_eq!(back.mode(), ChannelMode::Gray);
        assert_eq!(back.dimensions(), (16, 16));
        assert!(back.data().iter().all(|&v| v.abs_diff(128) <= 2));
    }

    #[test]
    fn test_garbage_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.jpg");
        std::fs::write(&path, [0xFF, 0xD8, 0xFF, 0x00, 0x01]).unwrap();
        assert!(matches!(read(&path), Err(IoError::DecodeError(_))));
    }
}
