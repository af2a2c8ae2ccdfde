//! Template - binary mask restricting the flooded region
//!
//! A template has the same dimensions as the image it masks. Nonzero
//! template pixels participate in tree construction and rendering; zero
//! pixels are skipped and keep their input value in filtered output.

use crate::error::{Error, Result};
use crate::image::GrayImage;

/// Value used for "pixel set" in a full template
pub const TEMPLATE_SET: u8 = 255;

/// Binary mask over a [`GrayImage`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    mask: GrayImage,
}

impl Template {
    /// Template with every pixel set
    ///
    /// This is the default when no template file is supplied.
    pub fn full(width: u32, height: u32) -> Result<Self> {
        Ok(Self {
            mask: GrayImage::new_filled(width, height, TEMPLATE_SET)?,
        })
    }

    /// Full template matching the dimensions of `image`
    pub fn full_like(image: &GrayImage) -> Result<Self> {
        Self::full(image.width(), image.height())
    }

    /// Use a gray image as a mask (nonzero = set)
    pub fn from_image(mask: GrayImage) -> Self {
        Self { mask }
    }

    /// Use `mask` as the template for `image`
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if the mask and the image
    /// differ in size.
    pub fn for_image(mask: GrayImage, image: &GrayImage) -> Result<Self> {
        image.check_same_size(&mask)?;
        Ok(Self { mask })
    }

    /// Resolve an optional mask into a template for `image`
    ///
    /// `None` yields a full template.
    pub fn resolve(mask: Option<GrayImage>, image: &GrayImage) -> Result<Self> {
        match mask {
            Some(mask) => Self::for_image(mask, image),
            None => Self::full_like(image),
        }
    }

    /// Check that the template matches the dimensions of `image`
    pub fn check_image(&self, image: &GrayImage) -> Result<()> {
        if self.mask.dimensions() != image.dimensions() {
            return Err(Error::DimensionMismatch {
                expected: image.dimensions(),
                actual: self.mask.dimensions(),
            });
        }
        Ok(())
    }

    /// Whether the pixel at linear index `index` is set
    #[inline]
    pub fn contains(&self, index: usize) -> bool {
        self.mask.get(index).is_some_and(|v| v != 0)
    }

    /// Whether `(x, y)` is set
    #[inline]
    pub fn contains_xy(&self, x: u32, y: u32) -> bool {
        self.mask.get_pixel(x, y).is_some_and(|v| v != 0)
    }

    /// Number of set pixels
    pub fn count(&self) -> usize {
        self.mask.data().iter().filter(|&&v| v != 0).count()
    }

    /// Template width
    pub fn width(&self) -> u32 {
        self.mask.width()
    }

    /// Template height
    pub fn height(&self) -> u32 {
        self.mask.height()
    }

    /// Underlying mask image
    pub fn as_image(&self) -> &GrayImage {
        &self.mask
    }
}
