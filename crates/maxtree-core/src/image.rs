//! GrayImage - 8-bit grayscale pixel grid
//!
//! The `GrayImage` is the only image type the max-tree operates on:
//! a row-major grid of 8-bit gray levels.
//!
//! # Pixel layout
//!
//! - One byte per pixel, no row padding
//! - Pixel `(x, y)` lives at index `y * width + x`
//! - Gray levels span `0..=255` ([`NUM_LEVELS`] levels)

use crate::error::{Error, Result};

/// Number of gray levels in an 8-bit image
pub const NUM_LEVELS: usize = 256;

/// 8-bit single-channel image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrayImage {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl GrayImage {
    /// Create a new image with every pixel set to 0
    ///
    /// # Arguments
    ///
    /// * `width` - Image width in pixels
    /// * `height` - Image height in pixels
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if either dimension is 0.
    ///
    /// # Example
    ///
    /// ```
    /// use maxtree_core::GrayImage;
    ///
    /// let image = GrayImage::new(640, 480).unwrap();
    /// assert_eq!(image.width(), 640);
    /// assert_eq!(image.height(), 480);
    /// ```
    pub fn new(width: u32, height: u32) -> Result<Self> {
        Self::new_filled(width, height, 0)
    }

    /// Create a new image with every pixel set to `value`
    pub fn new_filled(width: u32, height: u32, value: u8) -> Result<Self> {
        let len = Self::checked_len(width, height)?;
        let mut data = Vec::new();
        data.try_reserve_exact(len)
            .map_err(|_| Error::AllocationFailed)?;
        data.resize(len, value);
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Wrap an existing row-major pixel buffer
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] for zero dimensions and
    /// [`Error::InvalidBufferLength`] if `data.len() != width * height`.
    pub fn from_vec(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let len = Self::checked_len(width, height)?;
        if data.len() != len {
            return Err(Error::InvalidBufferLength {
                expected: len,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    fn checked_len(width: u32, height: u32) -> Result<usize> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        (width as usize)
            .checked_mul(height as usize)
            .ok_or(Error::InvalidDimension { width, height })
    }

    /// Image width in pixels
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)`
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Total number of pixels
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Always false; zero-sized images cannot be constructed
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Raw row-major pixel data
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Mutable raw pixel data
    #[inline]
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Consume the image and return its pixel buffer
    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }

    /// Linear index of `(x, y)`, or `None` if outside the image
    #[inline]
    pub fn index(&self, x: u32, y: u32) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    /// Coordinates of a linear index
    #[inline]
    pub fn coords(&self, index: usize) -> (u32, u32) {
        let w = self.width as usize;
        ((index % w) as u32, (index / w) as u32)
    }

    /// Gray level at `(x, y)`, or `None` if outside the image
    #[inline]
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<u8> {
        self.index(x, y).map(|i| self.data[i])
    }

    /// Gray level at a linear index
    #[inline]
    pub fn get(&self, index: usize) -> Option<u8> {
        self.data.get(index).copied()
    }

    /// Set the gray level at `(x, y)`
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] if `(x, y)` is outside the image.
    pub fn set_pixel(&mut self, x: u32, y: u32, value: u8) -> Result<()> {
        let index = self.index(x, y).ok_or(Error::IndexOutOfBounds {
            index: y as usize * self.width as usize + x as usize,
            len: self.data.len(),
        })?;
        self.data[index] = value;
        Ok(())
    }

    /// Set every pixel to `value`
    pub fn fill(&mut self, value: u8) {
        self.data.fill(value);
    }

    /// Gray-level histogram (256 bins)
    pub fn histogram(&self) -> [usize; NUM_LEVELS] {
        let mut hist = [0usize; NUM_LEVELS];
        for &v in &self.data {
            hist[v as usize] += 1;
        }
        hist
    }

    /// Lowest gray level present
    pub fn min_level(&self) -> u8 {
        self.data.iter().copied().min().unwrap_or(0)
    }

    /// Highest gray level present
    pub fn max_level(&self) -> u8 {
        self.data.iter().copied().max().unwrap_or(0)
    }

    /// Number of distinct gray levels present
    pub fn count_levels(&self) -> usize {
        self.histogram().iter().filter(|&&n| n > 0).count()
    }

    /// Check that `other` has the same dimensions as `self`
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] with `self` as the expected size.
    pub fn check_same_size(&self, other: &GrayImage) -> Result<()> {
        if self.dimensions() != other.dimensions() {
            return Err(Error::DimensionMismatch {
                expected: self.dimensions(),
                actual: other.dimensions(),
            });
        }
        Ok(())
    }

    /// Row `y` as a slice
    pub fn row(&self, y: u32) -> Option<&[u8]> {
        if y >= self.height {
            return None;
        }
        let w = self.width as usize;
        let start = y as usize * w;
        Some(&self.data[start..start + w])
    }
}
