//! Size and shape payloads: area, enclosing rectangle and moments

use super::{AttributeData, PixelContext};
use crate::error::TreeResult;
use std::f64::consts::PI;

/// Pixel count
#[derive(Debug, Clone, PartialEq)]
pub struct AreaData {
    pub area: usize,
}

impl AreaData {
    /// Area in pixels
    pub fn area(&self) -> f64 {
        self.area as f64
    }
}

impl AttributeData for AreaData {
    fn create(_pixel: &PixelContext<'_>) -> TreeResult<Self> {
        Ok(Self { area: 1 })
    }

    fn add(&mut self, _pixel: &PixelContext<'_>) {
        self.area += 1;
    }

    fn merge(&mut self, child: Self) {
        self.area += child.area;
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, PartialEq)]
pub struct EnclosingRectData {
    pub min_x: u32,
    pub min_y: u32,
    pub max_x: u32,
    pub max_y: u32,
}

impl EnclosingRectData {
    fn extent(&self) -> (f64, f64) {
        (
            (self.max_x - self.min_x + 1) as f64,
            (self.max_y - self.min_y + 1) as f64,
        )
    }

    /// Area of the bounding box
    pub fn rect_area(&self) -> f64 {
        let (w, h) = self.extent();
        w * h
    }

    /// Squared length of the bounding box diagonal
    pub fn diagonal_squared(&self) -> f64 {
        let (w, h) = self.extent();
        w * w + h * h
    }
}

impl AttributeData for EnclosingRectData {
    fn create(pixel: &PixelContext<'_>) -> TreeResult<Self> {
        Ok(Self {
            min_x: pixel.x,
            min_y: pixel.y,
            max_x: pixel.x,
            max_y: pixel.y,
        })
    }

    fn add(&mut self, pixel: &PixelContext<'_>) {
        self.min_x = self.min_x.min(pixel.x);
        self.min_y = self.min_y.min(pixel.y);
        self.max_x = self.max_x.max(pixel.x);
        self.max_y = self.max_y.max(pixel.y);
    }

    fn merge(&mut self, child: Self) {
        self.min_x = self.min_x.min(child.min_x);
        self.min_y = self.min_y.min(child.min_y);
        self.max_x = self.max_x.max(child.max_x);
        self.max_y = self.max_y.max(child.max_y);
    }
}

/// First and second order moments of the pixel coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct InertiaData {
    pub area: usize,
    pub sum_x: f64,
    pub sum_y: f64,
    pub sum_x2: f64,
    pub sum_y2: f64,
}

impl InertiaData {
    pub(crate) fn seed(x: u32, y: u32) -> Self {
        let (x, y) = (x as f64, y as f64);
        Self {
            area: 1,
            sum_x: x,
            sum_y: y,
            sum_x2: x * x,
            sum_y2: y * y,
        }
    }

    pub(crate) fn accumulate(&mut self, x: u32, y: u32) {
        let (x, y) = (x as f64, y as f64);
        self.area += 1;
        self.sum_x += x;
        self.sum_y += y;
        self.sum_x2 += x * x;
        self.sum_y2 += y * y;
    }

    pub(crate) fn combine(&mut self, child: &Self) {
        self.area += child.area;
        self.sum_x += child.sum_x;
        self.sum_y += child.sum_y;
        self.sum_x2 += child.sum_x2;
        self.sum_y2 += child.sum_y2;
    }

    /// Moment of inertia about the centroid
    ///
    /// Each pixel is treated as a unit square, hence the `A / 6` term.
    pub fn inertia(&self) -> f64 {
        let a = self.area as f64;
        self.sum_x2 + self.sum_y2 - (self.sum_x * self.sum_x + self.sum_y * self.sum_y) / a
            + a / 6.0
    }

    /// Inertia normalized by squared area; `1.0` for a disc
    pub fn elongation(&self) -> f64 {
        let a = self.area as f64;
        self.inertia() * 2.0 * PI / (a * a)
    }

    /// Mean column
    pub fn mean_x(&self) -> f64 {
        self.sum_x / self.area as f64
    }

    /// Mean row
    pub fn mean_y(&self) -> f64 {
        self.sum_y / self.area as f64
    }
}

impl AttributeData for InertiaData {
    fn create(pixel: &PixelContext<'_>) -> TreeResult<Self> {
        Ok(Self::seed(pixel.x, pixel.y))
    }

    fn add(&mut self, pixel: &PixelContext<'_>) {
        self.accumulate(pixel.x, pixel.y);
    }

    fn merge(&mut self, child: Self) {
        self.combine(&child);
    }
}
