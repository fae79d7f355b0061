//! Artifact writers: raw binaries, PNG images and ca65 byte tables.

use std::fmt::Write as _;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use nss_core::graphics::ColorOps;
use nss_core::types::Frame;

use crate::ExportError;

pub fn write_binary(path: &Path, bytes: &[u8]) -> Result<(), ExportError> {
    fs::write(path, bytes).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Convert ARGB8888 pixels to packed RGBA8.
pub fn frame_to_rgba(frame: &Frame) -> Vec<u8> {
    frame
        .pixels
        .iter()
        .flat_map(|&p| ColorOps::to_rgba_bytes(p))
        .collect()
}

/// Write `frame` as an 8-bit RGBA PNG.
pub fn write_png(path: &Path, frame: &Frame) -> Result<(), ExportError> {
    if frame.is_empty() {
        return Err(ExportError::EmptyCanvas {
            width: frame.width,
            height: frame.height,
        });
    }
    let png_err = |source| ExportError::Png {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut encoder = png::Encoder::new(BufWriter::new(file), frame.width, frame.height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);

    let mut writer = encoder.write_header().map_err(png_err)?;
    writer
        .write_image_data(&frame_to_rgba(frame))
        .map_err(png_err)?;
    writer.finish().map_err(png_err)
}

/// One `.byte $XX,$XX,...` line, without a trailing newline.
pub fn format_byte_row(bytes: &[u8]) -> String {
    let mut line = String::with_capacity(6 + bytes.len() * 4);
    line.push_str(".byte ");
    for (i, b) in bytes.iter().enumerate() {
        if i > 0 {
            line.push(',');
        }
        let _ = write!(line, "${:02X}", b);
    }
    line
}

/// `bytes` split into `.byte` lines of `per_row` values each.
pub fn format_byte_rows(bytes: &[u8], per_row: usize) -> String {
    let mut out = String::new();
    for chunk in bytes.chunks(per_row.max(1)) {
        out.push_str(&format_byte_row(chunk));
        out.push('\n');
    }
    out
}
