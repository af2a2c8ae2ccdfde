//! Perimeter payloads
//!
//! Three perimeter estimators are provided:
//!
//! - **City-block**: counts 4-connected boundary edges. Each pixel of gray
//!   level `h` contributes `4 - n` for its `n` template neighbours, plus one
//!   per lower neighbour and minus one per higher neighbour, so that the
//!   sum over a component and all of its children is its boundary length.
//! - **Large**: 8-neighbourhood estimator that traces the boundary around
//!   the outside of the pixels.
//! - **Small**: 8-neighbourhood estimator that traces the boundary through
//!   the pixel centers.
//!
//! The 8-neighbourhood estimators read the image directly and ignore the
//! template.

use super::shape::InertiaData;
use super::{AttributeData, PixelContext};
use crate::error::TreeResult;
use std::f64::consts::{PI, SQRT_2};

/// City-block boundary contribution of one pixel
fn cityblock_contribution(pixel: &PixelContext<'_>) -> i64 {
    let h = pixel.level();
    let mut peri = 4 - pixel.neighbors.len() as i64;
    for q in pixel.neighbor_levels() {
        if q < h {
            peri += 1;
        }
        if q > h {
            peri -= 1;
        }
    }
    peri
}

/// One quarter of the large perimeter around a pixel of level `h`
///
/// `b` is the edge neighbour of this side, `a` and `c` the corners next
/// to it, `d` and `e` the edge neighbours adjacent to `a` and `c`.
fn large_side(h: i32, a: i32, b: i32, c: i32, d: i32, e: i32) -> f64 {
    const ADD: [f64; 8] = [4.0, 4.0, 2.0, 2.0, 4.0, 2.0, 2.0, 2.701_778_718_6];
    let bit = |v: i32| usize::from(v >= h);
    let sqrt8 = 8.0f64.sqrt();
    let mut l = 0.0;

    if b < h && c > h && e >= h {
        l += SQRT_2 - 2.0;
    }
    if b < h && a > h && d >= h {
        l += SQRT_2 - 2.0;
    }
    if b > h {
        if c < h && e > h {
            l += sqrt8 - 4.0;
        } else if a > h && d > h {
            if c > h && e > h {
                l -= 20.0f64.sqrt() - sqrt8;
            } else {
                l -= sqrt8;
            }
        }
        if (a <= h && c <= h) || (d <= h && e <= h) || (a <= h && e <= h) || (c <= h && d <= h) {
            l -= 2.0;
        }
    }

    if b >= h {
        l
    } else if a < h {
        if c >= h && e >= h {
            l + SQRT_2
        } else {
            l + 2.0
        }
    } else {
        l + ADD[(bit(c) << 2) + (bit(d) << 1) + bit(e)].sqrt()
    }
}

/// One quarter of the small perimeter around a pixel of level `h`
///
/// `b` is the corner of this side, `a` and `c` the edge neighbours on
/// either side of it.
fn small_side(h: i32, a: i32, b: i32, c: i32) -> f64 {
    const ADD: [f64; 8] = [0.0, 0.25, 0.0, 2.0 / 9.0, 0.25, 2.0 / 9.0, 2.0 / 9.0, 0.0];
    let bit = |v: i32| usize::from(v >= h);
    let l = ADD[(bit(a) << 2) + (bit(b) << 1) + bit(c)].sqrt();

    if c > h {
        if b < h {
            if a < h {
                return l + 1.0;
            } else if a > h {
                return l + SQRT_2 * 2.0 / 3.0;
            }
        } else if b > h {
            if a == h {
                return l - 1.0;
            } else if a > h {
                return l - SQRT_2;
            }
        }
    }
    l
}

fn large_contribution(pixel: &PixelContext<'_>) -> f64 {
    let h = pixel.level() as i32;
    let n = pixel.neighbors8();
    0.5 * (large_side(h, n[0], n[1], n[2], n[7], n[3])
        + large_side(h, n[2], n[3], n[4], n[1], n[5])
        + large_side(h, n[4], n[5], n[6], n[3], n[7])
        + large_side(h, n[6], n[7], n[0], n[5], n[1]))
}

fn small_contribution(pixel: &PixelContext<'_>) -> f64 {
    let h = pixel.level() as i32;
    let n = pixel.neighbors8();
    small_side(h, n[7], n[0], n[1])
        + small_side(h, n[1], n[2], n[3])
        + small_side(h, n[3], n[4], n[5])
        + small_side(h, n[5], n[6], n[7])
}

/// `P^2 / (4 pi A)`; `1.0` for a disc
fn compactness(perimeter: f64, area: usize) -> f64 {
    perimeter * perimeter / (4.0 * PI * area as f64)
}

/// Area and city-block perimeter
#[derive(Debug, Clone, PartialEq)]
pub struct CityBlockPerimeterData {
    pub area: usize,
    pub perimeter: i64,
}

impl CityBlockPerimeterData {
    /// Boundary length in pixel edges
    pub fn perimeter(&self) -> f64 {
        self.perimeter as f64
    }

    /// Perimeter / area
    pub fn complexity(&self) -> f64 {
        self.perimeter as f64 / self.area as f64
    }

    /// Area / perimeter
    pub fn simplicity(&self) -> f64 {
        self.area as f64 / self.perimeter as f64
    }

    /// Perimeter^2 / (4 pi area)
    pub fn compactness(&self) -> f64 {
        compactness(self.perimeter as f64, self.area)
    }
}

impl AttributeData for CityBlockPerimeterData {
    fn create(pixel: &PixelContext<'_>) -> TreeResult<Self> {
        Ok(Self {
            area: 1,
            perimeter: cityblock_contribution(pixel),
        })
    }

    fn add(&mut self, pixel: &PixelContext<'_>) {
        self.area += 1;
        self.perimeter += cityblock_contribution(pixel);
    }

    fn merge(&mut self, child: Self) {
        self.area += child.area;
        self.perimeter += child.perimeter;
    }
}

/// Area and large (outer) 8-neighbourhood perimeter
#[derive(Debug, Clone, PartialEq)]
pub struct LargePerimeterData {
    pub area: usize,
    pub perimeter: f64,
}

impl LargePerimeterData {
    /// Estimated outer boundary length
    pub fn perimeter(&self) -> f64 {
        self.perimeter
    }

    /// Perimeter^2 / (4 pi area)
    pub fn compactness(&self) -> f64 {
        compactness(self.perimeter, self.area)
    }
}

impl AttributeData for LargePerimeterData {
    fn create(pixel: &PixelContext<'_>) -> TreeResult<Self> {
        Ok(Self {
            area: 1,
            perimeter: large_contribution(pixel),
        })
    }

    fn add(&mut self, pixel: &PixelContext<'_>) {
        self.area += 1;
        self.perimeter += large_contribution(pixel);
    }

    fn merge(&mut self, child: Self) {
        self.area += child.area;
        self.perimeter += child.perimeter;
    }
}

/// Area and small (center-line) 8-neighbourhood perimeter
#[derive(Debug, Clone, PartialEq)]
pub struct SmallPerimeterData {
    pub area: usize,
    pub perimeter: f64,
}

impl SmallPerimeterData {
    /// Estimated boundary length through pixel centers
    pub fn perimeter(&self) -> f64 {
        self.perimeter
    }

    /// Perimeter^2 / (4 pi area)
    pub fn compactness(&self) -> f64 {
        compactness(self.perimeter, self.area)
    }
}

impl AttributeData for SmallPerimeterData {
    fn create(pixel: &PixelContext<'_>) -> TreeResult<Self> {
        Ok(Self {
            area: 1,
            perimeter: small_contribution(pixel),
        })
    }

    fn add(&mut self, pixel: &PixelContext<'_>) {
        self.area += 1;
        self.perimeter += small_contribution(pixel);
    }

    fn merge(&mut self, child: Self) {
        self.area += child.area;
        self.perimeter += child.perimeter;
    }
}

/// City-block perimeter together with coordinate moments
#[derive(Debug, Clone, PartialEq)]
pub struct JaggedData {
    pub perimeter: i64,
    pub moments: InertiaData,
}

impl JaggedData {
    /// `A * P^2 / (8 pi^2 I)`
    pub fn jaggedness(&self) -> f64 {
        let a = self.moments.area as f64;
        let p = self.perimeter as f64;
        a * p * p / (8.0 * PI * PI * self.moments.inertia())
    }
}

impl AttributeData for JaggedData {
    fn create(pixel: &PixelContext<'_>) -> TreeResult<Self> {
        Ok(Self {
            perimeter: cityblock_contribution(pixel),
            moments: InertiaData::seed(pixel.x, pixel.y),
        })
    }

    fn add(&mut self, pixel: &PixelContext<'_>) {
        self.perimeter += cityblock_contribution(pixel);
        self.moments.accumulate(pixel.x, pixel.y);
    }

    fn merge(&mut self, child: Self) {
        self.perimeter += child.perimeter;
        self.moments.combine(&child.moments);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maxtree_core::GrayImage;

    /// 4-neighbours in E, N, W, S order with a full template
    fn neighbors4(image: &GrayImage, p: usize) -> Vec<usize> {
        let w = image.width() as usize;
        let x = p % w;
        let mut n = Vec::new();
        if x + 1 < w {
            n.push(p + 1);
        }
        if p >= w {
            n.push(p - w);
        }
        if x > 0 {
            n.push(p - 1);
        }
        if p + w < image.len() {
            n.push(p + w);
        }
        n
    }

    /// Aggregate all pixels of `level` into one payload
    fn aggregate_level<A: AttributeData>(image: &GrayImage, level: u8) -> A {
        let mut payload: Option<A> = None;
        for p in 0..image.len() {
            if image.data()[p] != level {
                continue;
            }
            let n = neighbors4(image, p);
            let ctx = PixelContext::new(image, p, &n);
            match payload.as_mut() {
                Some(a) => a.add(&ctx),
                None => payload = Some(A::create(&ctx).unwrap()),
            }
        }
        payload.unwrap()
    }

    fn isolated_pixel() -> GrayImage {
        let mut image = GrayImage::new(3, 3).unwrap();
        image.set_pixel(1, 1, 100).unwrap();
        image
    }

    #[test]
    fn test_cityblock_isolated_pixel() {
        let d: CityBlockPerimeterData = aggregate_level(&isolated_pixel(), 100);
        assert_eq!(d.perimeter, 4);
        assert_eq!(d.complexity(), 4.0);
        assert_eq!(d.simplicity(), 0.25);
        assert!((d.compactness() - 16.0 / (4.0 * PI)).abs() < 1e-12);
    }

    #[test]
    fn test_cityblock_flat_square() {
        let image = GrayImage::new_filled(3, 3, 7).unwrap();
        let d: CityBlockPerimeterData = aggregate_level(&image, 7);
        assert_eq!(d.area, 9);
        assert_eq!(d.perimeter, 12);
    }

    #[test]
    fn test_cityblock_parent_sees_child_as_interior() {
        // Background ring at 0 around a bright center: the ring's own
        // contribution plus the child's 4 equals the outer boundary 12
        let image = isolated_pixel();
        let mut ring: CityBlockPerimeterData = aggregate_level(&image, 0);
        assert_eq!(ring.perimeter, 8);
        ring.merge(aggregate_level(&image, 100));
        assert_eq!(ring.perimeter, 12);
        assert_eq!(ring.area, 9);
    }

    #[test]
    fn test_large_perimeter() {
        let d: LargePerimeterData = aggregate_level(&isolated_pixel(), 100);
        assert!((d.perimeter() - 4.0).abs() < 1e-12);
        let square = GrayImage::new_filled(3, 3, 7).unwrap();
        let d: LargePerimeterData = aggregate_level(&square, 7);
        assert!((d.perimeter() - 12.0).abs() < 1e-12);
        assert!((d.compactness() - 144.0 / (36.0 * PI)).abs() < 1e-12);
    }

    #[test]
    fn test_small_perimeter() {
        let d: SmallPerimeterData = aggregate_level(&isolated_pixel(), 100);
        assert_eq!(d.perimeter(), 0.0);
        let square = GrayImage::new_filled(3, 3, 7).unwrap();
        let d: SmallPerimeterData = aggregate_level(&square, 7);
        assert!((d.perimeter() - 8.0).abs() < 1e-12);
    }

    #[test]
    fn test_large_side_cases() {
        // Open side: everything below
        assert_eq!(large_side(5, 0, 0, 0, 0, 0), 2.0);
        // Edge neighbour at the same level closes the side
        assert_eq!(large_side(5, 0, 5, 0, 0, 0), 0.0);
        // Diagonal step: corners and side neighbours at h
        assert!((large_side(5, 0, 0, 5, 0, 5) - SQRT_2).abs() < 1e-12);
    }

    #[test]
    fn test_small_side_cases() {
        assert_eq!(small_side(5, 0, 0, 0), 0.0);
        assert_eq!(small_side(5, 0, 0, 9), 0.5 + 1.0);
        assert_eq!(small_side(5, 5, 5, 5), 0.0);
    }

    #[test]
    fn test_jaggedness_square() {
        let image = GrayImage::new_filled(2, 2, 1).unwrap();
        let d: JaggedData = aggregate_level(&image, 1);
        assert_eq!(d.perimeter, 8);
        let inertia = 2.0 + 4.0 / 6.0;
        let expected = 4.0 * 64.0 / (8.0 * PI * PI * inertia);
        assert!((d.jaggedness() - expected).abs() < 1e-12);
    }
}
