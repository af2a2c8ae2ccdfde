//! maxtree-core - Basic data structures for max-tree image filtering
//!
//! This crate provides the pixel containers shared by every other crate
//! in the workspace:
//!
//! - [`GrayImage`] - 8-bit grayscale pixel grid
//! - [`Template`] - binary mask selecting the pixels that participate
//!
//! # Example
//!
//! ```
//! use maxtree_core::{GrayImage, Template};
//!
//! let image = GrayImage::new_filled(4, 4, 100).unwrap();
//! let template = Template::full_like(&image).unwrap();
//! assert_eq!(template.count(), 16);
//! ```

pub mod error;
pub mod image;
pub mod template;

pub use error::{Error, Result};
pub use image::{GrayImage, NUM_LEVELS};
pub use template::{TEMPLATE_SET, Template};
