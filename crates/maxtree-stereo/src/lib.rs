//! maxtree-stereo - Stereo disparity from matched max-tree components
//!
//! This crate matches the components of a rectified left/right image pair:
//!
//! - **Matching** - per-row search for the right component whose attribute
//!   is closest to the left one
//! - **Scoring** - mean absolute error and bad-pixel ratio against ground truth
//!
//! # Examples
//!
//! ```
//! use maxtree_core::{GrayImage, Template};
//! use maxtree_stereo::{DisparityOptions, compute_disparity};
//!
//! let left = GrayImage::from_vec(6, 1, vec![0, 0, 0, 80, 80, 0]).unwrap();
//! let right = GrayImage::from_vec(6, 1, vec![0, 80, 80, 0, 0, 0]).unwrap();
//! let template = Template::full_like(&left).unwrap();
//! let disparity =
//!     compute_disparity(&left, &right, &template, &template, &DisparityOptions::new()).unwrap();
//! assert_eq!(disparity.data(), &[0, 0, 0, 2, 2, 0]);
//! ```

pub mod disparity;
mod error;
pub mod metrics;

pub use disparity::{DisparityOptions, compute_disparity};
pub use error::{StereoError, StereoResult};
pub use metrics::{DisparityStats, evaluate_disparity};
