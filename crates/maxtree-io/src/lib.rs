//! maxtree-io - Image I/O for max-tree filtering
//!
//! Reads and writes 8-bit grayscale images:
//!
//! - **PGM** - plain (P2) and raw (P5) graymaps, always available
//! - **PNG** - feature `png-format` (default)
//! - **TIFF** - feature `tiff-format` (default)
//!
//! Color inputs are reduced to luma on read. Formats are detected by
//! their magic bytes, not by file extension.
//!
//! # Example
//!
//! ```
//! use maxtree_core::GrayImage;
//! use maxtree_io::{read_image_mem, write_image_mem, ImageFormat};
//!
//! let image = GrayImage::new_filled(4, 3, 128).unwrap();
//! let bytes = write_image_mem(&image, ImageFormat::Pnm).unwrap();
//! assert!(bytes.starts_with(b"P5\n4 3\n255\n"));
//! let back = read_image_mem(&bytes).unwrap();
//! assert_eq!(back, image);
//! ```

pub mod error;
pub mod format;
pub mod pgm;
#[cfg(feature = "png-format")]
pub mod png;
#[cfg(feature = "tiff-format")]
pub mod tiff;

pub use error::{IoError, IoResult};
pub use format::{ImageFormat, detect_format, detect_format_from_bytes};
pub use pgm::{read_pgm, write_pgm, write_pgm_ascii};

use maxtree_core::{GrayImage, Template};
use std::fs::File;
use std::io::{BufReader, BufWriter, Cursor};
use std::path::Path;

/// ITU-R BT.601 luma of an 8-bit RGB triple
#[cfg(any(feature = "png-format", feature = "tiff-format"))]
#[inline]
pub(crate) fn luma(r: u8, g: u8, b: u8) -> u8 {
    ((77 * r as u32 + 150 * g as u32 + 29 * b as u32 + 128) >> 8) as u8
}

/// Read an image from a file path
///
/// The format is detected from the file contents.
///
/// # Errors
///
/// Returns an error if the file cannot be opened, the format is unknown
/// or not enabled, or the data is malformed.
pub fn read_image<P: AsRef<Path>>(path: P) -> IoResult<GrayImage> {
    let path = path.as_ref();
    let format = detect_format(path)?;
    let file = File::open(path)?;
    let image = read_image_format(BufReader::new(file), format)?;
    tracing::debug!(
        path = %path.display(),
        ?format,
        width = image.width(),
        height = image.height(),
        "read image"
    );
    Ok(image)
}

/// Read an image from an in-memory buffer
pub fn read_image_mem(data: &[u8]) -> IoResult<GrayImage> {
    let format = detect_format_from_bytes(data)?;
    read_image_format(Cursor::new(data), format)
}

fn read_image_format<R>(reader: R, format: ImageFormat) -> IoResult<GrayImage>
where
    R: std::io::BufRead + std::io::Seek,
{
    match format {
        ImageFormat::Pnm => pgm::read_pgm(reader),
        #[cfg(feature = "png-format")]
        ImageFormat::Png => png::read_png(reader),
        #[cfg(feature = "tiff-format")]
        ImageFormat::Tiff => tiff::read_tiff(reader),
        #[allow(unreachable_patterns)]
        other => Err(IoError::UnsupportedFormat(format!(
            "{:?} support not enabled",
            other
        ))),
    }
}

/// Write an image to a file path
///
/// # Arguments
///
/// * `image` - Image to write
/// * `path` - Destination path
/// * `format` - Output format
pub fn write_image<P: AsRef<Path>>(
    image: &GrayImage,
    path: P,
    format: ImageFormat,
) -> IoResult<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    write_image_format(image, BufWriter::new(file), format)?;
    tracing::debug!(
        path = %path.display(),
        ?format,
        width = image.width(),
        height = image.height(),
        "wrote image"
    );
    Ok(())
}

/// Encode an image into an in-memory buffer
pub fn write_image_mem(image: &GrayImage, format: ImageFormat) -> IoResult<Vec<u8>> {
    let mut cursor = Cursor::new(Vec::new());
    write_image_format(image, &mut cursor, format)?;
    Ok(cursor.into_inner())
}

fn write_image_format<W>(image: &GrayImage, writer: W, format: ImageFormat) -> IoResult<()>
where
    W: std::io::Write + std::io::Seek,
{
    match format {
        ImageFormat::Pnm => pgm::write_pgm(image, writer),
        #[cfg(feature = "png-format")]
        ImageFormat::Png => png::write_png(image, writer),
        #[cfg(feature = "tiff-format")]
        ImageFormat::Tiff => tiff::write_tiff(image, writer),
        #[allow(unreachable_patterns)]
        other => Err(IoError::UnsupportedFormat(format!(
            "{:?} support not enabled",
            other
        ))),
    }
}

/// Load the template for `image`
///
/// With no path every pixel participates. With a path the file is read
/// and must have the same dimensions as `image`.
///
/// # Errors
///
/// Returns [`IoError::Core`] wrapping a dimension mismatch, or any read
/// error from [`read_image`].
pub fn read_template<P: AsRef<Path>>(path: Option<P>, image: &GrayImage) -> IoResult<Template> {
    let mask = match path {
        Some(path) => Some(read_image(path)?),
        None => None,
    };
    Ok(Template::resolve(mask, image)?)
}
