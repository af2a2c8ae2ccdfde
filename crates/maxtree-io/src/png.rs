//! PNG image format support
//!
//! Every PNG color type is decoded to 8-bit gray: sub-byte and 16-bit
//! samples are normalized to 8 bits, palettes are expanded, color is
//! reduced to luma and alpha is dropped.

use crate::{IoError, IoResult, luma};
use maxtree_core::GrayImage;
use png::{BitDepth, ColorType, Decoder, Encoder, Transformations};
use std::io::{BufRead, Seek, Write};

/// Read a PNG image
pub fn read_png<R: BufRead + Seek>(reader: R) -> IoResult<GrayImage> {
    let mut decoder = Decoder::new(reader);
    decoder.set_transformations(Transformations::normalize_to_color8());
    let mut reader = decoder
        .read_info()
        .map_err(|e| IoError::DecodeError(format!("PNG decode error: {}", e)))?;

    let buf_size = reader
        .output_buffer_size()
        .ok_or_else(|| IoError::DecodeError("failed to get output buffer size".to_string()))?;
    let mut buf = vec![0; buf_size];
    let output_info = reader
        .next_frame(&mut buf)
        .map_err(|e| IoError::DecodeError(format!("PNG frame error: {}", e)))?;

    let width = output_info.width;
    let height = output_info.height;
    let color_type = output_info.color_type;
    if output_info.bit_depth != BitDepth::Eight {
        return Err(IoError::UnsupportedFormat(format!(
            "unsupported PNG output depth: {:?}",
            output_info.bit_depth
        )));
    }

    let samples = match color_type {
        ColorType::Grayscale => 1,
        ColorType::GrayscaleAlpha => 2,
        ColorType::Rgb => 3,
        ColorType::Rgba => 4,
        ColorType::Indexed => {
            return Err(IoError::UnsupportedFormat(
                "unexpanded PNG palette".to_string(),
            ));
        }
    };

    let bytes_per_row = output_info.line_size;
    let data = &buf[..output_info.buffer_size()];
    let mut image = GrayImage::new(width, height)?;
    let w = width as usize;

    for (y, out_row) in image.data_mut().chunks_exact_mut(w).enumerate() {
        let row = &data[y * bytes_per_row..y * bytes_per_row + w * samples];
        for (px, s) in out_row.iter_mut().zip(row.chunks_exact(samples)) {
            *px = match samples {
                1 | 2 => s[0],
                _ => luma(s[0], s[1], s[2]),
            };
        }
    }

    Ok(image)
}

/// Write an image as 8-bit grayscale PNG
pub fn write_png<W: Write>(image: &GrayImage, writer: W) -> IoResult<()> {
    let mut encoder = Encoder::new(writer, image.width(), image.height());
    encoder.set_color(ColorType::Grayscale);
    encoder.set_depth(BitDepth::Eight);

    let mut writer = encoder
        .write_header()
        .map_err(|e| IoError::EncodeError(format!("PNG header error: {}", e)))?;
    writer
        .write_image_data(image.data())
        .map_err(|e| IoError::EncodeError(format!("PNG write error: {}", e)))?;
    writer
        .finish()
        .map_err(|e| IoError::EncodeError(format!("PNG finish error: {}", e)))?;
    Ok(())
}
