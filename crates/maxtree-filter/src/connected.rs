//! Attribute filters
//!
//! Every filter thresholds the attribute stored in each node against
//! `lambda`, assigns new gray levels through one or two passes over the
//! node array, and renders the result. Nodes whose attribute is below
//! `lambda` are removed: they take the new level of their parent.
//!
//! The ascending pass visits levels from 0 to 255 and, within a level,
//! nodes in creation order. A parent always has a lower level than its
//! children, so its new level is final when a child reads it.

use crate::decision::Decision;
use crate::error::FilterResult;
use maxtree_core::{GrayImage, Template};
use maxtree_tree::{AttributeKind, MaxTree};

/// Parameters of an attribute filter
#[derive(Debug, Clone, PartialEq)]
pub struct FilterParams {
    /// Attribute compared against `lambda`
    pub attribute: AttributeKind,
    /// Reconstruction rule
    pub decision: Decision,
    /// Nodes with an attribute below this value are removed
    pub lambda: f64,
}

impl Default for FilterParams {
    fn default() -> Self {
        Self {
            attribute: AttributeKind::Area,
            decision: Decision::default(),
            lambda: 0.0,
        }
    }
}

impl FilterParams {
    /// Create new parameters with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the attribute
    pub fn with_attribute(mut self, attribute: AttributeKind) -> Self {
        self.attribute = attribute;
        self
    }

    /// Set the decision rule
    pub fn with_decision(mut self, decision: Decision) -> Self {
        self.decision = decision;
        self
    }

    /// Set the threshold
    pub fn with_lambda(mut self, lambda: f64) -> Self {
        self.lambda = lambda;
        self
    }
}

/// Direct rule: removed nodes take the parent's new level
pub fn filter_direct(
    tree: &mut MaxTree,
    image: &GrayImage,
    template: &Template,
    lambda: f64,
) -> GrayImage {
    direct_pass(tree, lambda);
    tree.render(image, template)
}

fn direct_pass(tree: &mut MaxTree, lambda: f64) {
    tree.ascending_pass(|node, parent| {
        if node.attribute < lambda {
            parent.new_level
        } else {
            node.level
        }
    });
}

/// Min rule: a node is also removed when its parent was removed
pub fn filter_min(
    tree: &mut MaxTree,
    image: &GrayImage,
    template: &Template,
    lambda: f64,
) -> GrayImage {
    tree.ascending_pass(|node, parent| {
        if node.attribute < lambda || parent.level != parent.new_level {
            parent.new_level
        } else {
            node.level
        }
    });
    tree.render(image, template)
}

/// Max rule: a removed node is restored when any child was kept
///
/// Runs the direct pass, then walks the levels downward restoring the
/// parent of every kept node.
pub fn filter_max(
    tree: &mut MaxTree,
    image: &GrayImage,
    template: &Template,
    lambda: f64,
) -> GrayImage {
    direct_pass(tree, lambda);
    tree.descending_pass(|node, parent| {
        if node.new_level == node.level {
            parent.new_level = parent.level;
        }
    });
    tree.render(image, template)
}

/// Subtractive rule: kept nodes drop by the contrast removed below them
pub fn filter_subtractive(
    tree: &mut MaxTree,
    image: &GrayImage,
    template: &Template,
    lambda: f64,
) -> GrayImage {
    tree.ascending_pass(|node, parent| {
        if node.attribute < lambda {
            parent.new_level
        } else {
            let shifted =
                i32::from(node.level) + i32::from(parent.new_level) - i32::from(parent.level);
            shifted.clamp(0, 255) as u8
        }
    });
    tree.render(image, template)
}

/// Apply `decision` to an already built tree
pub fn filter_tree(
    tree: &mut MaxTree,
    image: &GrayImage,
    template: &Template,
    decision: Decision,
    lambda: f64,
) -> GrayImage {
    let out = match decision {
        Decision::Min => filter_min(tree, image, template, lambda),
        Decision::Direct => filter_direct(tree, image, template, lambda),
        Decision::Max => filter_max(tree, image, template, lambda),
        Decision::Subtractive => filter_subtractive(tree, image, template, lambda),
    };
    let changed = tree.nodes().filter(|(_, n)| n.new_level != n.level).count();
    tracing::debug!(
        decision = decision.name(),
        lambda,
        nodes = tree.node_count(),
        changed,
        "filter applied"
    );
    out
}

/// Build the max-tree of `image` for the selected attribute and filter it
///
/// # Arguments
///
/// * `image` - Input image
/// * `template` - Mask of the pixels to flood and rewrite
/// * `params` - Attribute, decision rule and threshold
///
/// # Errors
///
/// Returns [`FilterError::Tree`](crate::FilterError::Tree) if the tree
/// cannot be built, e.g. because the template size differs from the image.
///
/// # Examples
///
/// ```
/// use maxtree_core::{GrayImage, Template};
/// use maxtree_filter::{Decision, FilterParams, filter_image};
///
/// let image = GrayImage::from_vec(2, 2, vec![10, 10, 10, 50]).unwrap();
/// let template = Template::full_like(&image).unwrap();
/// let params = FilterParams::new()
///     .with_decision(Decision::Direct)
///     .with_lambda(2.0);
/// let out = filter_image(&image, &template, &params).unwrap();
/// assert_eq!(out.data(), &[10, 10, 10, 10]);
/// ```
pub fn filter_image(
    image: &GrayImage,
    template: &Template,
    params: &FilterParams,
) -> FilterResult<GrayImage> {
    let mut tree = MaxTree::build_attribute(image, template, params.attribute)?;
    Ok(filter_tree(&mut tree, image, template, params.decision, params.lambda))
}

#[cfg(test)]
mod tests {
    use super::*;
    use maxtree_tree::attribute::AreaData;

    /// Ridge 0 < 10 < 20 along one row
    fn ridge() -> GrayImage {
        GrayImage::from_vec(7, 1, vec![0, 10, 20, 20, 20, 10, 0]).unwrap()
    }

    /// Large components score low, so the 10 plateau is removed while the
    /// 20 plateau on top of it is kept
    fn negative_area(a: &AreaData) -> f64 {
        -(a.area as f64)
    }

    fn ridge_tree(image: &GrayImage, template: &Template) -> MaxTree {
        MaxTree::build(image, template, negative_area).unwrap()
    }

    #[test]
    fn test_rules_on_ridge() {
        let image = ridge();
        let template = Template::full_like(&image).unwrap();

        let mut tree = ridge_tree(&image, &template);
        let out = filter_direct(&mut tree, &image, &template, -3.0);
        assert_eq!(out.data(), &[0, 0, 20, 20, 20, 0, 0]);

        let mut tree = ridge_tree(&image, &template);
        let out = filter_min(&mut tree, &image, &template, -3.0);
        assert_eq!(out.data(), &[0; 7]);

        let mut tree = ridge_tree(&image, &template);
        let out = filter_max(&mut tree, &image, &template, -3.0);
        assert_eq!(out, image);

        let mut tree = ridge_tree(&image, &template);
        let out = filter_subtractive(&mut tree, &image, &template, -3.0);
        assert_eq!(out.data(), &[0, 0, 10, 10, 10, 0, 0]);
    }

    #[test]
    fn test_lambda_zero_is_identity() {
        let image = ridge();
        let template = Template::full_like(&image).unwrap();
        for decision in Decision::ALL {
            let params = FilterParams::new().with_decision(decision);
            assert_eq!(filter_image(&image, &template, &params).unwrap(), image);
        }
    }

    #[test]
    fn test_params_builder() {
        let params = FilterParams::new()
            .with_attribute(AttributeKind::Entropy)
            .with_decision(Decision::Max)
            .with_lambda(1.5);
        assert_eq!(params.attribute, AttributeKind::Entropy);
        assert_eq!(params.decision, Decision::Max);
        assert_eq!(params.lambda, 1.5);
        assert_eq!(FilterParams::default().decision, Decision::Subtractive);
    }

    #[test]
    fn test_template_restricts_output() {
        let image = ridge();
        let mut mask = GrayImage::new_filled(7, 1, 255).unwrap();
        mask.set_pixel(3, 0, 0).unwrap();
        let template = Template::from_image(mask);
        let params = FilterParams::new()
            .with_decision(Decision::Direct)
            .with_lambda(100.0);
        let out = filter_image(&image, &template, &params).unwrap();
        // The masked pixel cuts the row; pixels past it are never flooded
        // and keep their input values
        assert_eq!(out.data(), &[0, 0, 0, 20, 20, 10, 0]);
    }
}
