//! Component attributes
//!
//! An attribute is computed in two phases. While the tree is flooded, each
//! node aggregates a payload type implementing [`AttributeData`]:
//!
//! 1. `create` seeds the payload with the first pixel of the node
//! 2. `add` folds in every further pixel of the node
//! 3. `merge` folds in the finished payload of a child node
//!
//! When the node is finalized an evaluator `fn(&A) -> f64` reads the
//! payload out as a scalar. Several evaluators can share one payload
//! kind; [`AttributeKind`] lists the 19 available pairs.
//!
//! Payloads are released by `Drop`.

mod intensity;
mod perimeter;
mod registry;
mod shape;

pub use intensity::{EntropyData, LambdaMaxData, LevelData};
pub use perimeter::{CityBlockPerimeterData, JaggedData, LargePerimeterData, SmallPerimeterData};
pub use registry::{AttributeEntry, AttributeKind, AttributeRegistry, AttributeVisitor};
pub use shape::{AreaData, EnclosingRectData, InertiaData};

use crate::error::TreeResult;
use maxtree_core::GrayImage;

/// Evaluator reading a payload out as a scalar
pub type Evaluator<A> = fn(&A) -> f64;

/// Aggregated statistics of one max-tree node
pub trait AttributeData: Sized {
    /// Start a payload from the first pixel of a node
    ///
    /// # Errors
    ///
    /// Payloads that allocate return
    /// [`TreeError::AllocationFailed`](crate::TreeError::AllocationFailed)
    /// when allocation fails.
    fn create(pixel: &PixelContext<'_>) -> TreeResult<Self>;

    /// Fold one more pixel of the same node into the payload
    fn add(&mut self, pixel: &PixelContext<'_>);

    /// Fold a finished child node's payload into this one
    fn merge(&mut self, child: Self);
}

/// A pixel being absorbed into a node
///
/// `neighbors` holds the linear indices of the 4-connected neighbours
/// inside the template, in east, north, west, south order.
#[derive(Debug, Clone, Copy)]
pub struct PixelContext<'a> {
    /// Column
    pub x: u32,
    /// Row
    pub y: u32,
    /// Linear pixel index
    pub index: usize,
    /// 4-connected neighbours inside the template
    pub neighbors: &'a [usize],
    /// Image being flooded
    pub image: &'a GrayImage,
}

impl<'a> PixelContext<'a> {
    /// Context for the pixel at linear `index`
    pub fn new(image: &'a GrayImage, index: usize, neighbors: &'a [usize]) -> Self {
        let (x, y) = image.coords(index);
        Self {
            x,
            y,
            index,
            neighbors,
            image,
        }
    }

    /// Gray level of the pixel
    #[inline]
    pub fn level(&self) -> u8 {
        self.image.data()[self.index]
    }

    /// Gray levels of the template neighbours
    pub fn neighbor_levels(&self) -> impl Iterator<Item = u8> + '_ {
        let data = self.image.data();
        self.neighbors.iter().map(move |&q| data[q])
    }

    /// Gray levels of the 8-neighbourhood, `-1` outside the image
    ///
    /// Order: NW, N, NE, E, SE, S, SW, W. The template is ignored.
    pub fn neighbors8(&self) -> [i32; 8] {
        let mut n = [-1i32; 8];
        let (w, h) = self.image.dimensions();
        let (x, y) = (self.x, self.y);
        let at = |dx: i64, dy: i64| -> i32 {
            let nx = (x as i64 + dx) as u32;
            let ny = (y as i64 + dy) as u32;
            self.image.get_pixel(nx, ny).map_or(-1, i32::from)
        };
        if y > 0 {
            n[1] = at(0, -1);
            if x > 0 {
                n[0] = at(-1, -1);
            }
            if x + 1 < w {
                n[2] = at(1, -1);
            }
        }
        if x + 1 < w {
            n[3] = at(1, 0);
        }
        if y + 1 < h {
            n[5] = at(0, 1);
            if x > 0 {
                n[6] = at(-1, 1);
            }
            if x + 1 < w {
                n[4] = at(1, 1);
            }
        }
        if x > 0 {
            n[7] = at(-1, 0);
        }
        n
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neighbors8_interior() {
        let image = GrayImage::from_vec(3, 3, vec![1, 2, 3, 8, 0, 4, 7, 6, 5]).unwrap();
        let ctx = PixelContext::new(&image, 4, &[]);
        assert_eq!(ctx.neighbors8(), [1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(ctx.level(), 0);
    }

    #[test]
    fn test_neighbors8_corner() {
        let image = GrayImage::from_vec(2, 2, vec![9, 1, 2, 3]).unwrap();
        let ctx = PixelContext::new(&image, 0, &[]);
        assert_eq!(ctx.neighbors8(), [-1, -1, -1, 1, 3, 2, -1, -1]);
    }

    #[test]
    fn test_neighbor_levels() {
        let image = GrayImage::from_vec(3, 1, vec![5, 6, 7]).unwrap();
        let ctx = PixelContext::new(&image, 1, &[2, 0]);
        assert_eq!(ctx.neighbor_levels().collect::<Vec<_>>(), vec![7, 5]);
        assert_eq!((ctx.x, ctx.y), (1, 0));
    }
}
