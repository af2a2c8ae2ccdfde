//! Synthetic test images
//!
//! Builders for the small images used across the regression tests.
//! All of them panic on invalid input; they are meant for tests only.

use maxtree_core::GrayImage;

/// Uniform image
pub fn flat(width: u32, height: u32, value: u8) -> GrayImage {
    GrayImage::new_filled(width, height, value).expect("valid fixture dimensions")
}

/// Image from explicit rows
///
/// # Panics
///
/// Panics if the rows are empty or have differing lengths.
pub fn from_rows(rows: &[&[u8]]) -> GrayImage {
    let height = rows.len() as u32;
    let width = rows.first().map_or(0, |r| r.len()) as u32;
    assert!(
        rows.iter().all(|r| r.len() as u32 == width),
        "ragged fixture rows"
    );
    let data = rows.iter().flat_map(|r| r.iter().copied()).collect();
    GrayImage::from_vec(width, height, data).expect("valid fixture rows")
}

/// Axis-aligned rectangle painted at a gray level
#[derive(Debug, Clone, Copy)]
pub struct Blob {
    /// Left column (inclusive)
    pub x0: u32,
    /// Top row (inclusive)
    pub y0: u32,
    /// Right column (exclusive)
    pub x1: u32,
    /// Bottom row (exclusive)
    pub y1: u32,
    /// Gray level
    pub level: u8,
}

impl Blob {
    /// Rectangle `[x0, x1) x [y0, y1)` at `level`
    pub fn new(x0: u32, y0: u32, x1: u32, y1: u32, level: u8) -> Self {
        Self {
            x0,
            y0,
            x1,
            y1,
            level,
        }
    }

    /// Same blob moved `dx` columns to the left
    pub fn shifted_left(self, dx: u32) -> Self {
        Self {
            x0: self.x0 - dx,
            x1: self.x1 - dx,
            ..self
        }
    }

    /// Number of pixels covered
    pub fn area(&self) -> usize {
        ((self.x1 - self.x0) * (self.y1 - self.y0)) as usize
    }
}

/// Background image with blobs painted in order (later blobs on top)
pub fn blob_image(width: u32, height: u32, background: u8, blobs: &[Blob]) -> GrayImage {
    let mut image = flat(width, height, background);
    for blob in blobs {
        for y in blob.y0..blob.y1.min(height) {
            for x in blob.x0..blob.x1.min(width) {
                image.set_pixel(x, y, blob.level).expect("blob inside image");
            }
        }
    }
    image
}

/// Left/right pair where every blob sits `shift` columns further left in
/// the right image
pub fn stereo_pair(
    width: u32,
    height: u32,
    background: u8,
    blobs: &[Blob],
    shift: u32,
) -> (GrayImage, GrayImage) {
    let left = blob_image(width, height, background, blobs);
    let moved: Vec<Blob> = blobs.iter().map(|b| b.shifted_left(shift)).collect();
    let right = blob_image(width, height, background, &moved);
    (left, right)
}

/// Horizontal gray ramp: column `x` has level `x * step`, saturating
pub fn ramp(width: u32, height: u32, step: u8) -> GrayImage {
    let mut image = flat(width, height, 0);
    for y in 0..height {
        for x in 0..width {
            let v = (x as u64 * step as u64).min(255) as u8;
            image.set_pixel(x, y, v).expect("inside image");
        }
    }
    image
}

/// Image of uniformly random gray levels
pub fn random_image(width: u32, height: u32) -> GrayImage {
    let data = (0..width as usize * height as usize)
        .map(|_| rand::random::<u8>())
        .collect();
    GrayImage::from_vec(width, height, data).expect("valid fixture dimensions")
}

/// Image of random gray levels drawn from `levels` distinct values
///
/// Fewer levels produce larger connected components.
pub fn random_quantized(width: u32, height: u32, levels: u8) -> GrayImage {
    let levels = levels.max(1) as u32;
    let step = 255 / levels.max(2).saturating_sub(1).max(1);
    let data = (0..width as usize * height as usize)
        .map(|_| ((rand::random::<u8>() as u32 % levels) * step).min(255) as u8)
        .collect();
    GrayImage::from_vec(width, height, data).expect("valid fixture dimensions")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rows() {
        let image = from_rows(&[&[1, 2, 3], &[4, 5, 6]]);
        assert_eq!(image.dimensions(), (3, 2));
        assert_eq!(image.get_pixel(2, 1), Some(6));
    }

    #[test]
    fn test_blob_image() {
        let image = blob_image(6, 4, 10, &[Blob::new(1, 1, 3, 3, 200)]);
        assert_eq!(image.get_pixel(1, 1), Some(200));
        assert_eq!(image.get_pixel(3, 1), Some(10));
        assert_eq!(image.histogram()[200], 4);
    }

    #[test]
    fn test_stereo_pair() {
        let (left, right) = stereo_pair(8, 3, 0, &[Blob::new(4, 0, 6, 3, 90)], 2);
        assert_eq!(left.get_pixel(4, 0), Some(90));
        assert_eq!(right.get_pixel(2, 0), Some(90));
        assert_eq!(right.get_pixel(4, 0), Some(0));
    }

    #[test]
    fn test_random_quantized_levels() {
        let image = random_quantized(16, 16, 4);
        assert!(image.count_levels() <= 4);
    }
}
