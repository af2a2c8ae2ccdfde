//! Max-tree data model and queries
//!
//! Nodes live in one flat array partitioned by gray level: the nodes of
//! level `l` occupy the slots starting at the number of pixels below `l`.
//! A pixel finds its node through its level and the rank stored in its
//! status entry.

use crate::attribute::{AttributeData, AttributeKind, AttributeVisitor, Evaluator};
use crate::builder;
use crate::error::TreeResult;
use maxtree_core::{GrayImage, NUM_LEVELS, Template};
use std::ops::Range;

/// Flood state of one pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelStatus {
    /// Never reached by the flood
    NotAnalyzed,
    /// Queued but not yet absorbed
    InQueue,
    /// Absorbed into the node with this rank among its level's nodes
    Node(usize),
}

/// One connected component at one gray level
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaxNode {
    /// Index of the parent node; the root is its own parent
    pub parent: usize,
    /// Pixels in the component, descendants included
    pub area: usize,
    /// Evaluated attribute of the component
    pub attribute: f64,
    /// Original gray level
    pub level: u8,
    /// Gray level after filtering
    pub new_level: u8,
}

/// Component tree of an 8-bit image
#[derive(Debug, Clone)]
pub struct MaxTree {
    width: u32,
    height: u32,
    status: Vec<PixelStatus>,
    pixels_below_level: [usize; NUM_LEVELS],
    nodes_at_level: [usize; NUM_LEVELS],
    nodes: Vec<Option<MaxNode>>,
    root: usize,
}

struct BuildVisitor<'a> {
    image: &'a GrayImage,
    template: &'a Template,
}

impl AttributeVisitor for BuildVisitor<'_> {
    type Output = TreeResult<MaxTree>;

    fn visit<A: AttributeData>(self, evaluate: Evaluator<A>) -> Self::Output {
        MaxTree::build(self.image, self.template, evaluate)
    }
}

impl MaxTree {
    pub(crate) fn from_parts(
        (width, height): (u32, u32),
        status: Vec<PixelStatus>,
        pixels_below_level: [usize; NUM_LEVELS],
        nodes_at_level: [usize; NUM_LEVELS],
        nodes: Vec<Option<MaxNode>>,
        root: usize,
    ) -> Self {
        Self {
            width,
            height,
            status,
            pixels_below_level,
            nodes_at_level,
            nodes,
            root,
        }
    }

    /// Build a tree aggregating payload `A` and evaluating it with `evaluate`
    ///
    /// # Arguments
    ///
    /// * `image` - Image to decompose
    /// * `template` - Mask of the pixels the flood may enter
    /// * `evaluate` - Read-out applied to each finished node payload
    ///
    /// # Errors
    ///
    /// Returns an error if the template size differs from the image or an
    /// allocation fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use maxtree_core::{GrayImage, Template};
    /// use maxtree_tree::MaxTree;
    /// use maxtree_tree::attribute::AreaData;
    ///
    /// let image = GrayImage::from_vec(2, 2, vec![10, 10, 10, 50]).unwrap();
    /// let template = Template::full_like(&image).unwrap();
    /// let tree = MaxTree::build(&image, &template, AreaData::area).unwrap();
    /// assert_eq!(tree.node_count(), 2);
    /// assert_eq!(tree.root().unwrap().area, 4);
    /// ```
    pub fn build<A: AttributeData>(
        image: &GrayImage,
        template: &Template,
        evaluate: Evaluator<A>,
    ) -> TreeResult<Self> {
        builder::build(image, template, evaluate)
    }

    /// Build a tree for one of the catalog attributes
    pub fn build_attribute(
        image: &GrayImage,
        template: &Template,
        kind: AttributeKind,
    ) -> TreeResult<Self> {
        kind.dispatch(BuildVisitor { image, template })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Node stored at `index`, `None` for an unused slot
    pub fn node(&self, index: usize) -> Option<&MaxNode> {
        self.nodes.get(index).and_then(Option::as_ref)
    }

    pub fn node_mut(&mut self, index: usize) -> Option<&mut MaxNode> {
        self.nodes.get_mut(index).and_then(Option::as_mut)
    }

    /// Index of the root node
    pub fn root_index(&self) -> usize {
        self.root
    }

    /// Root node at the global minimum level
    pub fn root(&self) -> Option<&MaxNode> {
        self.node(self.root)
    }

    /// Total number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes_at_level.iter().sum()
    }

    /// Flood state of pixel `index`
    pub fn pixel_status(&self, index: usize) -> Option<PixelStatus> {
        self.status.get(index).copied()
    }

    /// Number of pixels with a gray level below `level`
    pub fn pixels_below_level(&self, level: u8) -> usize {
        self.pixels_below_level[level as usize]
    }

    /// Number of nodes at `level`
    pub fn nodes_at_level(&self, level: u8) -> usize {
        self.nodes_at_level[level as usize]
    }

    /// Node slots holding the nodes of `level`
    pub fn level_range(&self, level: u8) -> Range<usize> {
        let start = self.pixels_below_level[level as usize];
        start..start + self.nodes_at_level[level as usize]
    }

    /// Nodes in storage order, which is ascending level
    pub fn nodes(&self) -> impl Iterator<Item = (usize, &MaxNode)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(i, n)| n.as_ref().map(|n| (i, n)))
    }

    /// Indices of the direct children of node `index`
    pub fn children_of(&self, index: usize) -> Vec<usize> {
        self.nodes()
            .filter(|&(i, n)| n.parent == index && i != index)
            .map(|(i, _)| i)
            .collect()
    }

    /// Node index owning pixel `index` of `image`
    ///
    /// `image` must be the image the tree was built from. Returns `None`
    /// for pixels the flood never absorbed.
    pub fn node_index_of_pixel(&self, image: &GrayImage, index: usize) -> Option<usize> {
        match self.status.get(index)? {
            PixelStatus::Node(rank) => {
                let level = image.get(index)?;
                Some(self.pixels_below_level[level as usize] + rank)
            }
            _ => None,
        }
    }

    /// Node owning pixel `index` of `image`
    pub fn node_of_pixel(&self, image: &GrayImage, index: usize) -> Option<&MaxNode> {
        self.node(self.node_index_of_pixel(image, index)?)
    }

    /// Mean column of every node's component, indexed like the node array
    ///
    /// Unused slots hold `0.0`.
    pub fn subtree_mean_x(&self, image: &GrayImage) -> Vec<f64> {
        let mut sum_x = vec![0.0f64; self.nodes.len()];
        let width = self.width as usize;
        for p in 0..self.status.len() {
            if let Some(idx) = self.node_index_of_pixel(image, p) {
                sum_x[idx] += (p % width) as f64;
            }
        }
        for level in (0..NUM_LEVELS).rev() {
            for idx in self.level_range(level as u8) {
                if let Some(node) = self.nodes[idx]
                    && node.parent != idx
                {
                    sum_x[node.parent] += sum_x[idx];
                }
            }
        }
        for (idx, sum) in sum_x.iter_mut().enumerate() {
            *sum = match self.nodes[idx] {
                Some(node) => *sum / node.area as f64,
                None => 0.0,
            };
        }
        sum_x
    }

    /// Set every node's `new_level` back to its own level
    pub fn reset_levels(&mut self) {
        for node in self.nodes.iter_mut().flatten() {
            node.new_level = node.level;
        }
    }

    /// Assign `new_level` to every node in ascending level order
    ///
    /// `decide` receives each non-root node and its parent, whose
    /// `new_level` has already been assigned, and returns the node's new
    /// level. The root keeps its own level.
    pub fn ascending_pass<F>(&mut self, mut decide: F)
    where
        F: FnMut(&MaxNode, &MaxNode) -> u8,
    {
        for level in 0..NUM_LEVELS {
            for idx in self.level_range(level as u8) {
                let Some(node) = self.nodes[idx] else {
                    continue;
                };
                let new_level = if node.parent == idx {
                    node.level
                } else {
                    match self.nodes[node.parent] {
                        Some(parent) => decide(&node, &parent),
                        None => node.level,
                    }
                };
                if let Some(n) = self.nodes[idx].as_mut() {
                    n.new_level = new_level;
                }
            }
        }
    }

    /// Visit every non-root node from level 255 down to level 1
    ///
    /// `visit` receives the node and mutable access to its parent.
    pub fn descending_pass<F>(&mut self, mut visit: F)
    where
        F: FnMut(&MaxNode, &mut MaxNode),
    {
        for level in (1..NUM_LEVELS).rev() {
            for idx in self.level_range(level as u8) {
                let Some(node) = self.nodes[idx] else {
                    continue;
                };
                if node.parent == idx {
                    continue;
                }
                if let Some(parent) = self.nodes[node.parent].as_mut() {
                    visit(&node, parent);
                }
            }
        }
    }

    /// Render the filtered image
    ///
    /// Pixels inside `template` that belong to a node take that node's
    /// `new_level`; every other pixel keeps its value from `image`.
    pub fn render(&self, image: &GrayImage, template: &Template) -> GrayImage {
        let mut out = image.clone();
        for (p, value) in out.data_mut().iter_mut().enumerate() {
            if !template.contains(p) {
                continue;
            }
            if let Some(node) = self.node_of_pixel(image, p) {
                *value = node.new_level;
            }
        }
        out
    }
}
