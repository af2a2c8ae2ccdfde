//! Image formats and signature-based detection

use crate::{IoError, IoResult};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Image file formats known to the I/O layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    /// Portable graymap (P2 plain or P5 raw)
    Pnm,
    /// PNG
    Png,
    /// TIFF
    Tiff,
}

impl ImageFormat {
    /// Conventional file extension
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Pnm => "pgm",
            ImageFormat::Png => "png",
            ImageFormat::Tiff => "tif",
        }
    }

    /// Guess the format from a path's extension
    ///
    /// Unknown or missing extensions yield `None`.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "pgm" | "pnm" => Some(ImageFormat::Pnm),
            "png" => Some(ImageFormat::Png),
            "tif" | "tiff" => Some(ImageFormat::Tiff),
            _ => None,
        }
    }
}

/// Leading bytes that identify each supported format
const SIGNATURES: &[(&[u8], ImageFormat)] = &[
    (&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A], ImageFormat::Png),
    (b"II*\0", ImageFormat::Tiff),
    (b"MM\0*", ImageFormat::Tiff),
    (b"P2", ImageFormat::Pnm),
    (b"P5", ImageFormat::Pnm),
];

/// Longest signature in [`SIGNATURES`]
const HEADER_LEN: usize = 8;

/// Detect the format of an image file from its first bytes
pub fn detect_format<P: AsRef<Path>>(path: P) -> IoResult<ImageFormat> {
    let mut header = Vec::with_capacity(HEADER_LEN);
    File::open(path)?
        .take(HEADER_LEN as u64)
        .read_to_end(&mut header)?;
    detect_format_from_bytes(&header)
}

/// Detect the format of an encoded image
///
/// Only graymap PNMs (P2, P5) are recognized; color and bitmap variants
/// are rejected.
///
/// # Errors
///
/// Returns [`IoError::InvalidData`] for fewer than two bytes and
/// [`IoError::UnsupportedFormat`] when no signature matches.
pub fn detect_format_from_bytes(data: &[u8]) -> IoResult<ImageFormat> {
    if data.len() < 2 {
        return Err(IoError::InvalidData(format!(
            "{} byte(s) are too few to identify an image",
            data.len()
        )));
    }
    SIGNATURES
        .iter()
        .find(|(signature, _)| data.starts_with(signature))
        .map(|&(_, format)| format)
        .ok_or_else(|| {
            IoError::UnsupportedFormat(format!("unrecognized signature {:02X?}", &data[..2]))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_png() {
        let data = [
            0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x00,
        ];
        assert_eq!(detect_format_from_bytes(&data).unwrap(), ImageFormat::Png);
    }

    #[test]
    fn test_detect_tiff() {
        let le = [0x49, 0x49, 0x2A, 0x00, 0x08, 0x00, 0x00, 0x00];
        let be = [0x4D, 0x4D, 0x00, 0x2A, 0x00, 0x00, 0x00, 0x08];
        assert_eq!(detect_format_from_bytes(&le).unwrap(), ImageFormat::Tiff);
        assert_eq!(detect_format_from_bytes(&be).unwrap(), ImageFormat::Tiff);
    }

    #[test]
    fn test_detect_pgm() {
        assert_eq!(
            detect_format_from_bytes(b"P5\n100 100\n255\n").unwrap(),
            ImageFormat::Pnm
        );
        assert_eq!(
            detect_format_from_bytes(b"P2\n# comment\n1 1\n255\n0\n").unwrap(),
            ImageFormat::Pnm
        );
    }

    #[test]
    fn test_detect_unknown() {
        assert!(detect_format_from_bytes(b"P6\n1 1\n255\n").is_err());
        assert!(detect_format_from_bytes(b"UNKNOWN_FORMAT").is_err());
        assert!(detect_format_from_bytes(b"P").is_err());
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(ImageFormat::from_path("out.pgm"), Some(ImageFormat::Pnm));
        assert_eq!(ImageFormat::from_path("a/b.PNG"), Some(ImageFormat::Png));
        assert_eq!(ImageFormat::from_path("x.tiff"), Some(ImageFormat::Tiff));
        assert_eq!(ImageFormat::from_path("noext"), None);
        assert_eq!(ImageFormat::Pnm.extension(), "pgm");
    }
}
