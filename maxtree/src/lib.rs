//! maxtree - Connected attribute filtering with max-trees
//!
//! A max-tree represents every connected component of every upper level
//! set of a grayscale image as a node. Attributes measured on those nodes
//! drive the filters and the stereo matcher.
//!
//! # Overview
//!
//! - Image and template types (re-exported at the top level)
//! - Image I/O for PGM, PNG and TIFF ([`io`])
//! - Tree construction and 19 component attributes ([`tree`])
//! - Min, Direct, Max and Subtractive attribute filters ([`filter`])
//! - Disparity from matched components of a stereo pair ([`stereo`])
//!
//! # Example
//!
//! ```
//! use maxtree::filter::{Decision, FilterParams, filter_image};
//! use maxtree::{GrayImage, Template};
//!
//! let image = GrayImage::from_vec(3, 1, vec![0, 200, 0]).unwrap();
//! let template = Template::full_like(&image).unwrap();
//! let params = FilterParams::new()
//!     .with_decision(Decision::Direct)
//!     .with_lambda(2.0);
//! let out = filter_image(&image, &template, &params).unwrap();
//! assert_eq!(out.data(), &[0, 0, 0]);
//! ```

// Re-export core types (primary data structures used everywhere)
pub use maxtree_core::*;

// Re-export domain crates as modules to avoid name conflicts
pub use maxtree_filter as filter;
pub use maxtree_io as io;
pub use maxtree_stereo as stereo;
pub use maxtree_tree as tree;
