//! maxtree-tree - Max-tree construction for 8-bit images
//!
//! This crate builds the component tree of a grayscale image:
//!
//! - **Hierarchical queue** - One FIFO per gray level over a shared buffer
//! - **Flood builder** - Recursive level-ordered flooding with 4-connectivity
//! - **Attributes** - Payloads aggregated per node and evaluated to a scalar
//! - **Tree queries** - Pixel to node lookup, level passes and rendering
//!
//! # Examples
//!
//! ## Building a tree for a catalog attribute
//!
//! ```
//! use maxtree_core::{GrayImage, Template};
//! use maxtree_tree::{AttributeKind, MaxTree};
//!
//! let image = GrayImage::from_vec(3, 1, vec![10, 60, 10]).unwrap();
//! let template = Template::full_like(&image).unwrap();
//! let tree = MaxTree::build_attribute(&image, &template, AttributeKind::Area).unwrap();
//!
//! let peak = tree.node_of_pixel(&image, 1).unwrap();
//! assert_eq!(peak.attribute, 1.0);
//! assert_eq!(tree.root().unwrap().area, 3);
//! ```
//!
//! ## Listing the catalog
//!
//! ```
//! use maxtree_tree::AttributeRegistry;
//!
//! let registry = AttributeRegistry::standard();
//! assert_eq!(registry.entries()[0].name, "Area");
//! ```

pub mod attribute;
mod builder;
pub mod error;
pub mod hqueue;
pub mod tree;

pub use attribute::{AttributeData, AttributeKind, AttributeRegistry, Evaluator, PixelContext};
pub use error::{TreeError, TreeResult};
pub use hqueue::HierarchicalQueue;
pub use tree::{MaxNode, MaxTree, PixelStatus};
