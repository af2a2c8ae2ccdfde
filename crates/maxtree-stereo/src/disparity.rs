//! Component matching along epipolar lines
//!
//! Both images of a rectified pair are decomposed into max-trees. For every
//! row, each left pixel looks up its node and scans the right row from the
//! same column leftward for the node whose attribute is closest. The
//! disparity of a matched node is the horizontal offset between the mean
//! columns of the two components, never negative.
//!
//! Matches are kept per left node: further pixels of the same node only
//! replace its match with a strictly closer one.

use crate::error::{StereoResult, check_size};
use maxtree_core::{GrayImage, Template};
use maxtree_tree::{AttributeKind, MaxTree};

/// Options for disparity computation
#[derive(Debug, Clone, PartialEq)]
pub struct DisparityOptions {
    /// Attribute compared between left and right nodes
    pub attribute: AttributeKind,
    /// Farthest column offset searched, unlimited when `None`
    pub max_disparity: Option<u32>,
}

impl Default for DisparityOptions {
    fn default() -> Self {
        Self {
            attribute: AttributeKind::Area,
            max_disparity: None,
        }
    }
}

impl DisparityOptions {
    /// Create new options with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the matching attribute
    pub fn with_attribute(mut self, attribute: AttributeKind) -> Self {
        self.attribute = attribute;
        self
    }

    /// Limit the search range
    pub fn with_max_disparity(mut self, max_disparity: u32) -> Self {
        self.max_disparity = Some(max_disparity);
        self
    }
}

/// Best right-image match of one left node
#[derive(Debug, Clone, Copy)]
struct Match {
    difference: f64,
    disparity: u8,
}

/// Disparity between two mean columns, clamped to `0..=255`
fn offset(left_mean_x: f64, right_mean_x: f64) -> u8 {
    (left_mean_x - right_mean_x).max(0.0).round().min(255.0) as u8
}

/// Compute a disparity map for a rectified left/right pair
///
/// # Arguments
///
/// * `left` - Left image; the output is aligned with it
/// * `right` - Right image of the same size
/// * `left_template` - Pixels of `left` that take part
/// * `right_template` - Pixels of `right` that take part
/// * `options` - Matching attribute and search range
///
/// # Returns
///
/// An image holding, for every left pixel, the disparity of its node's
/// best match, or 0 where no match was found.
///
/// # Errors
///
/// Returns [`StereoError::DimensionMismatch`](crate::StereoError::DimensionMismatch)
/// before any work is done if the images or templates differ in size, and
/// [`StereoError::Tree`](crate::StereoError::Tree) if a tree cannot be built.
pub fn compute_disparity(
    left: &GrayImage,
    right: &GrayImage,
    left_template: &Template,
    right_template: &Template,
    options: &DisparityOptions,
) -> StereoResult<GrayImage> {
    check_size("left/right image", left.dimensions(), right.dimensions())?;
    check_size(
        "left template",
        left.dimensions(),
        left_template.as_image().dimensions(),
    )?;
    check_size(
        "right template",
        right.dimensions(),
        right_template.as_image().dimensions(),
    )?;

    let left_tree = MaxTree::build_attribute(left, left_template, options.attribute)?;
    let right_tree = MaxTree::build_attribute(right, right_template, options.attribute)?;
    let left_mean_x = left_tree.subtree_mean_x(left);
    let right_mean_x = right_tree.subtree_mean_x(right);

    let (width, height) = left.dimensions();
    let width = width as usize;
    let mut matches: Vec<Option<Match>> = vec![None; left.len()];

    for y in 0..height as usize {
        let row = y * width;
        for x in 0..width {
            let p = row + x;
            if !left_template.contains(p) {
                continue;
            }
            let Some(l_idx) = left_tree.node_index_of_pixel(left, p) else {
                continue;
            };
            let Some(l_node) = left_tree.node(l_idx) else {
                continue;
            };

            let lowest = match options.max_disparity {
                Some(d) => x.saturating_sub(d as usize),
                None => 0,
            };
            let mut best: Option<(f64, usize)> = None;
            for xr in (lowest..=x).rev() {
                let q = row + xr;
                if !right_template.contains(q) {
                    continue;
                }
                let Some(r_idx) = right_tree.node_index_of_pixel(right, q) else {
                    continue;
                };
                let Some(r_node) = right_tree.node(r_idx) else {
                    continue;
                };
                let difference = (l_node.attribute - r_node.attribute).abs();
                if best.is_none_or(|(d, _)| difference < d) {
                    best = Some((difference, r_idx));
                }
            }

            if let Some((difference, r_idx)) = best
                && matches[l_idx].is_none_or(|m| difference < m.difference)
            {
                matches[l_idx] = Some(Match {
                    difference,
                    disparity: offset(left_mean_x[l_idx], right_mean_x[r_idx]),
                });
            }
        }
    }

    let mut out = GrayImage::new(left.width(), left.height())?;
    for (p, value) in out.data_mut().iter_mut().enumerate() {
        if let Some(m) = left_tree
            .node_index_of_pixel(left, p)
            .and_then(|idx| matches[idx])
        {
            *value = m.disparity;
        }
    }

    tracing::debug!(
        attribute = options.attribute.name(),
        left_nodes = left_tree.node_count(),
        right_nodes = right_tree.node_count(),
        matched = matches.iter().flatten().count(),
        "disparity computed"
    );
    Ok(out)
}
