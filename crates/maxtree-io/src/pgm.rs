//! PGM (portable graymap) format support
//!
//! Reads plain (P2) and raw (P5) graymaps and writes both variants.
//! Header fields may be separated by any whitespace and interleaved
//! with `#` comment lines. Samples with a `maxval` other than 255 are
//! rescaled to 8 bits; raw files with `maxval > 255` carry two
//! big-endian bytes per sample.

use crate::{IoError, IoResult};
use maxtree_core::GrayImage;
use std::io::{BufRead, Write};

/// Plain or raw PGM encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PgmKind {
    Plain,
    Raw,
}

/// Byte cursor over an in-memory PGM file
struct HeaderCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> HeaderCursor<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Skip whitespace and comments up to the next token
    fn skip_separators(&mut self) {
        while let Some(&b) = self.data.get(self.pos) {
            if b == b'#' {
                while let Some(&c) = self.data.get(self.pos) {
                    self.pos += 1;
                    if c == b'\n' || c == b'\r' {
                        break;
                    }
                }
            } else if b.is_ascii_whitespace() {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    /// Parse the next decimal integer
    fn next_uint(&mut self, what: &str) -> IoResult<u32> {
        self.skip_separators();
        let start = self.pos;
        while self.data.get(self.pos).is_some_and(|b| b.is_ascii_digit()) {
            self.pos += 1;
        }
        if start == self.pos {
            return Err(IoError::InvalidData(format!("PGM: missing {}", what)));
        }
        std::str::from_utf8(&self.data[start..self.pos])
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .ok_or_else(|| IoError::InvalidData(format!("PGM: {} out of range", what)))
    }
}

/// Rescale a sample with the given `maxval` to 0..=255
#[inline]
fn scale_sample(value: u32, maxval: u32) -> u8 {
    if maxval == 255 {
        value.min(255) as u8
    } else {
        let v = value.min(maxval) as u64;
        ((v * 255 + maxval as u64 / 2) / maxval as u64) as u8
    }
}

/// Read a PGM image (P2 or P5) from a reader.
///
/// # Arguments
///
/// * `reader` - A buffered reader positioned at the `P2`/`P5` magic
///
/// # Returns
///
/// The decoded 8-bit image.
///
/// # Errors
///
/// Returns [`IoError::UnsupportedFormat`] for other PNM variants and
/// [`IoError::InvalidData`] for malformed headers or truncated rasters.
pub fn read_pgm<R: BufRead>(mut reader: R) -> IoResult<GrayImage> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    decode_pgm(&bytes)
}

/// Decode an in-memory PGM file
pub fn decode_pgm(bytes: &[u8]) -> IoResult<GrayImage> {
    if bytes.len() < 2 {
        return Err(IoError::InvalidData("PGM: file too short".to_string()));
    }
    let kind = match &bytes[..2] {
        b"P2" => PgmKind::Plain,
        b"P5" => PgmKind::Raw,
        other => {
            return Err(IoError::UnsupportedFormat(format!(
                "not a graymap: magic {:?}",
                String::from_utf8_lossy(other)
            )));
        }
    };

    let mut cursor = HeaderCursor::new(bytes);
    cursor.pos = 2;
    let width = cursor.next_uint("width")?;
    let height = cursor.next_uint("height")?;
    let maxval = cursor.next_uint("maxval")?;
    if maxval == 0 || maxval > 65535 {
        return Err(IoError::InvalidData(format!(
            "PGM: invalid maxval {}",
            maxval
        )));
    }

    let len = (width as usize)
        .checked_mul(height as usize)
        .ok_or_else(|| IoError::InvalidData(format!("PGM: {}x{} is too large", width, height)))?;

    let data = match kind {
        PgmKind::Plain => {
            // Every sample takes at least one digit and one separator
            let remaining = bytes.len().saturating_sub(cursor.pos);
            if len > remaining / 2 + 1 {
                return Err(IoError::InvalidData(format!(
                    "PGM: {} samples cannot fit in {} bytes",
                    len, remaining
                )));
            }
            let mut data = Vec::with_capacity(len);
            for i in 0..len {
                let v = cursor
                    .next_uint("sample")
                    .map_err(|_| IoError::InvalidData(format!("PGM: truncated at sample {}", i)))?;
                data.push(scale_sample(v, maxval));
            }
            data
        }
        PgmKind::Raw => {
            // Exactly one whitespace byte separates maxval from the raster
            let start = cursor.pos + 1;
            let bytes_per_sample = if maxval > 255 { 2 } else { 1 };
            let available = bytes.len().saturating_sub(start);
            let raster = len
                .checked_mul(bytes_per_sample)
                .and_then(|needed| bytes.get(start..start.checked_add(needed)?))
                .ok_or_else(|| {
                    IoError::InvalidData(format!(
                        "PGM: raster truncated: need {} samples of {} byte(s), have {} bytes",
                        len, bytes_per_sample, available
                    ))
                })?;
            if bytes_per_sample == 1 {
                raster.iter().map(|&v| scale_sample(v as u32, maxval)).collect()
            } else {
                raster
                    .chunks_exact(2)
                    .map(|pair| scale_sample(((pair[0] as u32) << 8) | pair[1] as u32, maxval))
                    .collect()
            }
        }
    };

    Ok(GrayImage::from_vec(width, height, data)?)
}

/// Write an image as raw PGM (P5).
///
/// The header is `P5\n<width> <height>\n255\n`, followed by the pixels
/// in row-major order, one byte each.
pub fn write_pgm<W: Write>(image: &GrayImage, mut writer: W) -> IoResult<()> {
    write!(writer, "P5\n{} {}\n255\n", image.width(), image.height())?;
    writer.write_all(image.data())?;
    writer.flush()?;
    Ok(())
}

/// Write an image as plain PGM (P2).
///
/// One image row per line, samples separated by single spaces.
pub fn write_pgm_ascii<W: Write>(image: &GrayImage, mut writer: W) -> IoResult<()> {
    write!(writer, "P2\n{} {}\n255\n", image.width(), image.height())?;
    for y in 0..image.height() {
        if let Some(row) = image.row(y) {
            let line = row
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(" ");
            writeln!(writer, "{}", line)?;
        }
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_read_p5() {
        let mut file = b"P5\n3 2\n255\n".to_vec();
        file.extend_from_slice(&[0, 10, 20, 30, 40, 255]);
        let image = read_pgm(Cursor::new(file)).unwrap();
        assert_eq!(image.dimensions(), (3, 2));
        assert_eq!(image.data(), &[0, 10, 20, 30, 40, 255]);
    }

    #[test]
    fn test_read_p5_with_comments() {
        let mut file = b"P5\n# created by hand\n2 # width\n1\n# maxval next\n255\n".to_vec();
        file.extend_from_slice(&[7, 9]);
        let image = read_pgm(Cursor::new(file)).unwrap();
        assert_eq!(image.data(), &[7, 9]);
    }

    #[test]
    fn test_read_p5_binary_whitespace_sample() {
        // First raster byte is '\n' (10); must not be eaten as a separator
        let mut file = b"P5 2 1 255\n".to_vec();
        file.extend_from_slice(&[10, 32]);
        let image = read_pgm(Cursor::new(file)).unwrap();
        assert_eq!(image.data(), &[10, 32]);
    }

    #[test]
    fn test_read_p2() {
        let file = b"P2\n# plain\n2 2\n255\n1 2\n3 4\n";
        let image = read_pgm(Cursor::new(&file[..])).unwrap();
        assert_eq!(image.data(), &[1, 2, 3, 4]);
    }

    #[test]
    fn test_read_maxval_rescale() {
        let file = b"P2\n3 1\n15\n0 15 8\n";
        let image = read_pgm(Cursor::new(&file[..])).unwrap();
        assert_eq!(image.data(), &[0, 255, 136]);
    }

    #[test]
    fn test_read_16bit_raw() {
        let mut file = b"P5\n2 1\n65535\n".to_vec();
        file.extend_from_slice(&[0xFF, 0xFF, 0x00, 0x00]);
        let image = read_pgm(Cursor::new(file)).unwrap();
        assert_eq!(image.data(), &[255, 0]);
    }

    #[test]
    fn test_read_truncated() {
        let mut file = b"P5\n4 4\n255\n".to_vec();
        file.extend_from_slice(&[1, 2, 3]);
        assert!(matches!(
            read_pgm(Cursor::new(file)),
            Err(IoError::InvalidData(_))
        ));
        let file = b"P2\n2 2\n255\n1 2 3\n";
        assert!(read_pgm(Cursor::new(&file[..])).is_err());
    }

    #[test]
    fn test_header_larger_than_file() {
        // Rejected from the header alone, nothing sized by it is allocated
        assert!(matches!(
            decode_pgm(b"P5\n40000 40000\n255\nab"),
            Err(IoError::InvalidData(_))
        ));
        assert!(matches!(
            decode_pgm(b"P5\n40000 40000\n65535\nab"),
            Err(IoError::InvalidData(_))
        ));
        assert!(matches!(
            decode_pgm(b"P2\n40000 40000\n255\n1 2 3\n"),
            Err(IoError::InvalidData(_))
        ));
        assert!(matches!(
            decode_pgm(b"P5\n4294967295 4294967295\n255\n\0"),
            Err(IoError::InvalidData(_))
        ));
    }

    #[test]
    fn test_read_bad_magic() {
        assert!(matches!(
            read_pgm(Cursor::new(&b"P6\n1 1\n255\n\0\0\0"[..])),
            Err(IoError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_read_zero_size() {
        assert!(matches!(
            read_pgm(Cursor::new(&b"P5\n0 3\n255\n"[..])),
            Err(IoError::Core(_))
        ));
    }

    #[test]
    fn test_write_header() {
        let image = GrayImage::from_vec(2, 1, vec![5, 6]).unwrap();
        let mut out = Vec::new();
        write_pgm(&image, &mut out).unwrap();
        assert_eq!(out, b"P5\n2 1\n255\n\x05\x06");
    }

    #[test]
    fn test_write_ascii() {
        let image = GrayImage::from_vec(2, 2, vec![0, 1, 254, 255]).unwrap();
        let mut out = Vec::new();
        write_pgm_ascii(&image, &mut out).unwrap();
        assert_eq!(out, b"P2\n2 2\n255\n0 1\n254 255\n");
        let back = read_pgm(Cursor::new(out)).unwrap();
        assert_eq!(back, image);
    }
}
