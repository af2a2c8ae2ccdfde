//! maxtree-filter - Attribute filters over max-trees
//!
//! This crate removes image components whose attribute falls below a
//! threshold, using one of four decision rules:
//!
//! - **Min** - a removed node takes all of its descendants with it
//! - **Direct** - only the nodes below the threshold are removed
//! - **Max** - a node survives while any descendant survives
//! - **Subtractive** - survivors are lowered by the contrast removed below them
//!
//! # Examples
//!
//! ```
//! use maxtree_core::{GrayImage, Template};
//! use maxtree_filter::{Decision, FilterParams, filter_image};
//! use maxtree_tree::AttributeKind;
//!
//! let image = GrayImage::new_filled(3, 3, 100).unwrap();
//! let template = Template::full_like(&image).unwrap();
//! let params = FilterParams::new()
//!     .with_attribute(AttributeKind::Area)
//!     .with_decision(Decision::Direct)
//!     .with_lambda(9.0);
//! let out = filter_image(&image, &template, &params).unwrap();
//! assert_eq!(out, image);
//! ```

pub mod connected;
pub mod decision;
mod error;

pub use connected::{
    FilterParams, filter_direct, filter_image, filter_max, filter_min, filter_subtractive,
    filter_tree,
};
pub use decision::Decision;
pub use error::{FilterError, FilterResult};
