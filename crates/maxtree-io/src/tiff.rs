//! TIFF image format support
//!
//! Reads the first page of a TIFF file as 8-bit gray. 16-bit gray keeps
//! its high byte; RGB(A) is reduced to luma. Writing always produces a
//! single uncompressed 8-bit grayscale page.

use crate::{IoError, IoResult, luma};
use maxtree_core::GrayImage;
use std::io::{Read, Seek, Write};
use tiff::ColorType;
use tiff::decoder::{Decoder, DecodingResult};
use tiff::encoder::TiffEncoder;
use tiff::encoder::colortype::Gray8;

/// Read a TIFF image
pub fn read_tiff<R: Read + Seek>(reader: R) -> IoResult<GrayImage> {
    let mut decoder = Decoder::new(reader)
        .map_err(|e| IoError::DecodeError(format!("TIFF decode error: {}", e)))?;
    let (width, height) = decoder
        .dimensions()
        .map_err(|e| IoError::DecodeError(format!("Failed to get TIFF dimensions: {}", e)))?;
    let color_type = decoder
        .colortype()
        .map_err(|e| IoError::DecodeError(format!("Failed to get TIFF color type: {}", e)))?;
    let image_data = decoder
        .read_image()
        .map_err(|e| IoError::DecodeError(format!("Failed to read TIFF image data: {}", e)))?;

    let mut image = GrayImage::new(width, height)?;
    let len = image.len();

    match (color_type, image_data) {
        (ColorType::Gray(8), DecodingResult::U8(data)) => {
            copy_samples(&mut image, &data, 1, len, |s| s[0])?;
        }
        (ColorType::GrayA(8), DecodingResult::U8(data)) => {
            copy_samples(&mut image, &data, 2, len, |s| s[0])?;
        }
        (ColorType::RGB(8), DecodingResult::U8(data)) => {
            copy_samples(&mut image, &data, 3, len, |s| luma(s[0], s[1], s[2]))?;
        }
        (ColorType::RGBA(8), DecodingResult::U8(data)) => {
            copy_samples(&mut image, &data, 4, len, |s| luma(s[0], s[1], s[2]))?;
        }
        (ColorType::Gray(16), DecodingResult::U16(data)) => {
            copy_samples(&mut image, &data, 1, len, |s| (s[0] >> 8) as u8)?;
        }
        (color_type, _) => {
            return Err(IoError::UnsupportedFormat(format!(
                "unsupported TIFF color type: {:?}",
                color_type
            )));
        }
    }

    Ok(image)
}

fn copy_samples<T: Copy>(
    image: &mut GrayImage,
    data: &[T],
    samples: usize,
    len: usize,
    convert: impl Fn(&[T]) -> u8,
) -> IoResult<()> {
    if data.len() < len * samples {
        return Err(IoError::InvalidData(format!(
            "TIFF: expected {} samples, got {}",
            len * samples,
            data.len()
        )));
    }
    for (px, s) in image.data_mut().iter_mut().zip(data.chunks_exact(samples)) {
        *px = convert(s);
    }
    Ok(())
}

/// Write an image as an 8-bit grayscale TIFF
pub fn write_tiff<W: Write + Seek>(image: &GrayImage, writer: W) -> IoResult<()> {
    let mut encoder = TiffEncoder::new(writer)
        .map_err(|e| IoError::EncodeError(format!("TIFF encoder error: {}", e)))?;
    encoder
        .write_image::<Gray8>(image.width(), image.height(), image.data())
        .map_err(|e| IoError::EncodeError(format!("TIFF write error: {}", e)))?;
    Ok(())
}
