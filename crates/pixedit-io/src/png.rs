//! PNG format support.
//!
//! Decoding normalizes every PNG variant to 8 bits per sample: palettes are
//! expanded, 16-bit samples are stripped to their high byte and alpha is
//! dropped. Grayscale files load as [`ChannelMode::Gray`], everything else as
//! [`ChannelMode::Rgb`]. Encoding writes 8-bit grayscale or RGB to match the
//! buffer's mode.

use crate::{IoError, IoResult};
use pixedit_core::{ChannelMode, PixelBuffer};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use tracing::debug;

/// Reads a PNG file from the given path.
pub fn read<P: AsRef<Path>>(path: P) -> IoResult<PixelBuffer> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let mut decoder = png::Decoder::new(BufReader::new(file));
    decoder.set_transformations(png::Transformations::normalize_to_color8());
    let mut reader = decoder
        .read_info()
        .map_err(|e| IoError::DecodeError(e.to_string()))?;

    let buf_size = reader
        .output_buffer_size()
        .ok_or_else(|| IoError::DecodeError("cannot determine output buffer size".into()))?;
    let mut buf = vec![0u8; buf_size];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e| IoError::DecodeError(e.to_string()))?;
    buf.truncate(info.buffer_size());

    if info.bit_depth != png::BitDepth::Eight {
        return Err(IoError::DecodeError(format!(
            "unexpected bit depth {:?} after normalization",
            info.bit_depth
        )));
    }

    let (mode, data) = match info.color_type {
        png::ColorType::Grayscale => (ChannelMode::Gray, buf),
        png::ColorType::GrayscaleAlpha => (ChannelMode::Gray, drop_alpha(&buf, 2)),
        png::ColorType::Rgb => (ChannelMode::Rgb, buf),
        png::ColorType::Rgba => (ChannelMode::Rgb, drop_alpha(&buf, 4)),
        png::ColorType::Indexed => {
            return Err(IoError::DecodeError("palette was not expanded".into()));
        }
    };

    debug!(path = %path.display(), width = info.width, height = info.height, %mode, "png::read");
    Ok(PixelBuffer::from_data(info.width, info.height, mode, data)?)
}

/// Writes a buffer to a PNG file.
pub fn write<P: AsRef<Path>>(path: P, buffer: &PixelBuffer) -> IoResult<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let w = BufWriter::new(file);

    let mut encoder = png::Encoder::new(w, buffer.width(), buffer.height());
    encoder.set_color(match buffer.mode() {
        ChannelMode::Gray => png::ColorType::Grayscale,
        ChannelMode::Rgb => png::ColorType::Rgb,
    });
    encoder.set_depth(png::BitDepth::Eight);

    let mut writer = encoder
        .write_header()
        .map_err(|e| IoError::EncodeError(e.to_string()))?;
    writer
        .write_image_data(buffer.data())
        .map_err(|e| IoError::EncodeError(e.to_string()))?;
    writer
        .finish()
        .map_err(|e| IoError::EncodeError(e.to_string()))?;

    debug!(path = %path.display(), width = buffer.width(), height = buffer.height(), "png::write");
    Ok(())
}

/// Keeps the color samples of interleaved pixels with a trailing alpha.
fn drop_alpha(data: &[u8], stride: usize) -> Vec<u8> {
    data.chunks_exact(stride)
        .flat_map(|px| px[..stride - 1].iter().copied())
        .collect()
}
