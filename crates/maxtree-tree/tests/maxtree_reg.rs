//! Max-tree construction regression test
//!
//! Checks the structural invariants of trees built from synthetic images:
//! node areas against pixel ownership, parent levels, total coverage, and
//! release of every payload on success and on failure.
//!
//! Run with:
//! ```
//! cargo test -p maxtree-tree --test maxtree_reg
//! ```

use maxtree_core::{GrayImage, Template};
use maxtree_test::{RegParams, fixtures};
use maxtree_tree::attribute::{AreaData, InertiaData, LambdaMaxData};
use maxtree_tree::{
    AttributeData, AttributeKind, MaxTree, PixelContext, PixelStatus, TreeError, TreeResult,
};
use std::cell::Cell;

// ============================================================================
// Helpers
// ============================================================================

fn build_area(image: &GrayImage) -> MaxTree {
    let template = Template::full_like(image).expect("template");
    MaxTree::build(image, &template, AreaData::area).expect("build max-tree")
}

/// Pixels owned by each node or one of its descendants
fn owned_pixels(tree: &MaxTree, image: &GrayImage) -> Vec<usize> {
    let mut counts = vec![0usize; image.len()];
    for p in 0..image.len() {
        let Some(mut idx) = tree.node_index_of_pixel(image, p) else {
            continue;
        };
        loop {
            counts[idx] += 1;
            let parent = tree.node(idx).expect("node on parent chain").parent;
            if parent == idx {
                break;
            }
            idx = parent;
        }
    }
    counts
}

fn check_invariants(rp: &mut RegParams, tree: &MaxTree, image: &GrayImage) {
    let counts = owned_pixels(tree, image);
    let mut area_ok = true;
    let mut order_ok = true;
    let mut roots = 0;
    for (idx, node) in tree.nodes() {
        area_ok &= counts[idx] == node.area;
        if node.parent == idx {
            roots += 1;
        } else {
            let parent = tree.node(node.parent).expect("parent exists");
            order_ok &= parent.level < node.level;
        }
    }
    rp.compare_values(1.0, area_ok as u8 as f64, 0.0);
    rp.compare_values(1.0, order_ok as u8 as f64, 0.0);
    rp.compare_values(1.0, roots as f64, 0.0);

    let root = tree.root().expect("root");
    rp.compare_values(image.len() as f64, root.area as f64, 0.0);
    rp.compare_values(image.min_level() as f64, root.level as f64, 0.0);
}

// ============================================================================
// Structure
// ============================================================================

#[test]
fn maxtree_reg() {
    let mut rp = RegParams::new("maxtree");

    eprintln!("=== Random quantized images ===");
    for levels in [2u8, 5, 16] {
        let image = fixtures::random_quantized(40, 30, levels);
        let tree = build_area(&image);
        eprintln!("  levels={} nodes={}", levels, tree.node_count());
        check_invariants(&mut rp, &tree, &image);
    }

    eprintln!("=== Random full-range image ===");
    let image = fixtures::random_image(33, 17);
    let tree = build_area(&image);
    check_invariants(&mut rp, &tree, &image);

    eprintln!("=== Ramp ===");
    // Each column is its own level, so the tree is a chain
    let image = fixtures::ramp(16, 4, 10);
    let tree = build_area(&image);
    rp.compare_values(16.0, tree.node_count() as f64, 0.0);
    check_invariants(&mut rp, &tree, &image);

    eprintln!("=== Every pixel absorbed ===");
    let image = fixtures::random_quantized(12, 9, 4);
    let tree = build_area(&image);
    let absorbed = (0..image.len())
        .filter(|&p| matches!(tree.pixel_status(p), Some(PixelStatus::Node(_))))
        .count();
    rp.compare_values(image.len() as f64, absorbed as f64, 0.0);

    assert!(rp.cleanup(), "maxtree regression test failed");
}

/// Brightest pixel level owned by each node or one of its descendants
fn subtree_max_levels(tree: &MaxTree, image: &GrayImage) -> Vec<u8> {
    let mut max = vec![0u8; image.len()];
    for p in 0..image.len() {
        let Some(mut idx) = tree.node_index_of_pixel(image, p) else {
            continue;
        };
        let level = image.data()[p];
        loop {
            max[idx] = max[idx].max(level);
            let parent = tree.node(idx).expect("node on parent chain").parent;
            if parent == idx {
                break;
            }
            idx = parent;
        }
    }
    max
}

// ============================================================================
// Payload propagation
// ============================================================================

/// Evaluated attributes must include every merged child, including the
/// child handed down to a frame before its first pixel
#[test]
fn maxtree_payload_reg() {
    let mut rp = RegParams::new("maxtree_payload");
    let template_for = |image: &GrayImage| Template::full_like(image).expect("template");

    let mut images: Vec<GrayImage> = [2u8, 3, 5, 8, 16]
        .iter()
        .flat_map(|&levels| (0..4).map(move |_| fixtures::random_quantized(30, 20, levels)))
        .collect();
    images.push(fixtures::random_image(25, 15));
    images.push(fixtures::ramp(12, 3, 20));

    eprintln!("=== Area payload matches counted area ===");
    for image in &images {
        let tree = MaxTree::build(image, &template_for(image), AreaData::area).expect("build");
        let mismatches = tree
            .nodes()
            .filter(|(_, node)| node.attribute != node.area as f64)
            .count();
        rp.compare_values(0.0, mismatches as f64, 0.0);
    }

    eprintln!("=== Lambda-max reaches the brightest descendant ===");
    for image in &images {
        let tree = MaxTree::build(image, &template_for(image), LambdaMaxData::lambda_max)
            .expect("build");
        let max = subtree_max_levels(&tree, image);
        let mismatches = tree
            .nodes()
            .filter(|&(idx, node)| node.attribute != f64::from(max[idx] - node.level))
            .count();
        rp.compare_values(0.0, mismatches as f64, 0.0);

        let root = tree.root().expect("root");
        rp.compare_values(
            f64::from(image.max_level() - image.min_level()),
            root.attribute,
            0.0,
        );
    }

    assert!(rp.cleanup(), "maxtree payload regression test failed");
}

#[test]
fn maxtree_scenario_reg() {
    let mut rp = RegParams::new("maxtree_scenario");

    eprintln!("=== 3x3 flat ===");
    let image = fixtures::flat(3, 3, 100);
    let tree = build_area(&image);
    rp.compare_values(1.0, tree.node_count() as f64, 0.0);
    let root = tree.root().expect("root");
    rp.compare_values(9.0, root.area as f64, 0.0);
    rp.compare_values(9.0, root.attribute, 0.0);
    rp.compare_values(tree.root_index() as f64, root.parent as f64, 0.0);

    eprintln!("=== 2x2 with one bright pixel ===");
    let image = fixtures::from_rows(&[&[10, 10], &[10, 50]]);
    let tree = build_area(&image);
    rp.compare_values(2.0, tree.node_count() as f64, 0.0);
    let bright = tree.node_of_pixel(&image, 3).expect("bright node");
    rp.compare_values(1.0, bright.area as f64, 0.0);
    rp.compare_values(50.0, bright.level as f64, 0.0);
    let parent = tree.node(bright.parent).expect("parent");
    rp.compare_values(4.0, parent.area as f64, 0.0);
    rp.compare_values(10.0, parent.level as f64, 0.0);

    eprintln!("=== Nested plateaus ===");
    let image = fixtures::blob_image(
        9,
        9,
        20,
        &[
            fixtures::Blob::new(1, 1, 8, 8, 60),
            fixtures::Blob::new(3, 3, 6, 6, 120),
        ],
    );
    let template = Template::full_like(&image).expect("template");
    let tree =
        MaxTree::build(&image, &template, InertiaData::mean_x).expect("build mean-x tree");
    let inner = tree.node_of_pixel(&image, 4 * 9 + 4).expect("inner node");
    rp.compare_values(9.0, inner.area as f64, 0.0);
    rp.compare_values(4.0, inner.attribute, 1e-12);
    let middle = tree.node(inner.parent).expect("middle node");
    rp.compare_values(49.0, middle.area as f64, 0.0);
    rp.compare_values(4.0, middle.attribute, 1e-12);

    assert!(rp.cleanup(), "maxtree scenario regression test failed");
}

#[test]
fn maxtree_catalog_reg() {
    let mut rp = RegParams::new("maxtree_catalog");

    let image = fixtures::random_quantized(24, 16, 6);
    let template = Template::full_like(&image).expect("template");
    let reference = build_area(&image);

    // The topology does not depend on the attribute
    for kind in AttributeKind::ALL {
        let tree = MaxTree::build_attribute(&image, &template, kind).expect("build attribute");
        rp.compare_values(reference.node_count() as f64, tree.node_count() as f64, 0.0);
        let finite = tree.nodes().all(|(_, n)| !n.attribute.is_nan());
        eprintln!("  {:>2} {}: finite={}", kind.index(), kind.name(), finite);
        rp.compare_values(1.0, finite as u8 as f64, 0.0);
    }

    assert!(rp.cleanup(), "maxtree catalog regression test failed");
}

// ============================================================================
// Payload ownership
// ============================================================================

thread_local! {
    static LIVE: Cell<isize> = const { Cell::new(0) };
}

fn live() -> isize {
    LIVE.with(Cell::get)
}

/// Area payload that counts live instances and refuses level 200
struct Tracked {
    area: usize,
}

impl Tracked {
    fn area(&self) -> f64 {
        self.area as f64
    }
}

impl AttributeData for Tracked {
    fn create(pixel: &PixelContext<'_>) -> TreeResult<Self> {
        if pixel.level() == 200 {
            return Err(TreeError::AllocationFailed);
        }
        LIVE.with(|c| c.set(c.get() + 1));
        Ok(Self { area: 1 })
    }

    fn add(&mut self, _pixel: &PixelContext<'_>) {
        self.area += 1;
    }

    fn merge(&mut self, child: Self) {
        self.area += child.area;
    }
}

impl Drop for Tracked {
    fn drop(&mut self) {
        LIVE.with(|c| c.set(c.get() - 1));
    }
}

#[test]
fn maxtree_ownership_reg() {
    let mut rp = RegParams::new("maxtree_ownership");

    eprintln!("=== Successful build releases every payload ===");
    let image = fixtures::random_quantized(20, 20, 5);
    let template = Template::full_like(&image).expect("template");
    let tree = MaxTree::build(&image, &template, Tracked::area).expect("build");
    rp.compare_values(0.0, live() as f64, 0.0);
    rp.compare_values(400.0, tree.root().expect("root").attribute, 0.0);

    eprintln!("=== Failure deep in the recursion unwinds ===");
    let image = fixtures::blob_image(
        10,
        10,
        0,
        &[
            fixtures::Blob::new(1, 1, 9, 9, 50),
            fixtures::Blob::new(2, 2, 8, 8, 100),
            fixtures::Blob::new(4, 4, 6, 6, 200),
        ],
    );
    let template = Template::full_like(&image).expect("template");
    let result = MaxTree::build(&image, &template, Tracked::area);
    rp.compare_values(
        1.0,
        matches!(result, Err(TreeError::AllocationFailed)) as u8 as f64,
        0.0,
    );
    rp.compare_values(0.0, live() as f64, 0.0);

    assert!(rp.cleanup(), "maxtree ownership regression test failed");
}
