//! Max-tree construction by recursive flooding
//!
//! The flood starts at the first pixel holding the global minimum and
//! drains the hierarchical queue one level at a time. Whenever a pixel
//! pushes a brighter neighbour, flooding recurses into that level and keeps
//! recursing into whatever level the child returns until control comes
//! back to the calling level. The call stack therefore holds one frame per
//! pending node, at strictly increasing levels.
//!
//! Each frame owns the payload of the node it is building. When a node is
//! finalized its attribute is evaluated and stored in the node, and the
//! payload moves up to the caller to be merged into the parent.

use crate::attribute::{AttributeData, Evaluator, PixelContext};
use crate::error::{TreeError, TreeResult};
use crate::hqueue::HierarchicalQueue;
use crate::tree::{MaxNode, MaxTree, PixelStatus};
use maxtree_core::{GrayImage, NUM_LEVELS, Template};

/// Area and payload handed from a finished frame to its caller
struct Flooded<A> {
    area: usize,
    payload: A,
}

struct Builder<'a, A> {
    image: &'a GrayImage,
    template: &'a Template,
    evaluate: Evaluator<A>,
    queue: HierarchicalQueue,
    status: Vec<PixelStatus>,
    pixels_below_level: [usize; NUM_LEVELS],
    nodes_at_level: [usize; NUM_LEVELS],
    node_at_level: [bool; NUM_LEVELS],
    nodes: Vec<Option<MaxNode>>,
}

/// Allocate `len` copies of `value` or report allocation failure
fn try_filled<T: Clone>(len: usize, value: T) -> TreeResult<Vec<T>> {
    let mut v = Vec::new();
    v.try_reserve_exact(len)
        .map_err(|_| TreeError::AllocationFailed)?;
    v.resize(len, value);
    Ok(v)
}

/// 4-connected neighbours of `p` inside the template, in E, N, W, S order
fn template_neighbors(image: &GrayImage, template: &Template, p: usize) -> ([usize; 4], usize) {
    let width = image.width() as usize;
    let size = image.len();
    let x = p % width;
    let mut out = [0usize; 4];
    let mut n = 0;
    let mut push = |q: usize| {
        if template.contains(q) {
            out[n] = q;
            n += 1;
        }
    };
    if x + 1 < width {
        push(p + 1);
    }
    if p >= width {
        push(p - width);
    }
    if x > 0 {
        push(p - 1);
    }
    if p + width < size {
        push(p + width);
    }
    (out, n)
}

impl<'a, A: AttributeData> Builder<'a, A> {
    fn new(
        image: &'a GrayImage,
        template: &'a Template,
        evaluate: Evaluator<A>,
    ) -> TreeResult<Self> {
        let histogram = image.histogram();
        let mut pixels_below_level = [0usize; NUM_LEVELS];
        for level in 1..NUM_LEVELS {
            pixels_below_level[level] = pixels_below_level[level - 1] + histogram[level - 1];
        }

        Ok(Self {
            image,
            template,
            evaluate,
            queue: HierarchicalQueue::new(&histogram)?,
            status: try_filled(image.len(), PixelStatus::NotAnalyzed)?,
            pixels_below_level,
            nodes_at_level: [0; NUM_LEVELS],
            node_at_level: [false; NUM_LEVELS],
            nodes: try_filled(image.len(), None)?,
        })
    }

    /// Drain level `h`, building one node
    ///
    /// `inherited` is the last finished child handed over by the caller;
    /// its area seeds this node's area and its payload is merged into the
    /// payload created for the first pixel.
    ///
    /// Returns the level of the pending ancestor that control goes back
    /// to, `None` once the root is finalized.
    fn flood(
        &mut self,
        h: u8,
        inherited: Option<Flooded<A>>,
    ) -> TreeResult<(Option<u8>, Flooded<A>)> {
        let image = self.image;
        let data = image.data();
        let (mut area, mut inherited) = match inherited {
            Some(child) => (child.area, Some(child.payload)),
            None => (0, None),
        };
        let mut payload: Option<A> = None;

        while let Some(p) = self.queue.pop(h) {
            area += 1;
            let (buf, count) = template_neighbors(image, self.template, p);
            let neighbors = &buf[..count];
            let pixel = PixelContext::new(image, p, neighbors);
            match payload.as_mut() {
                Some(current) => current.add(&pixel),
                None => {
                    let mut current = A::create(&pixel)?;
                    if let Some(child) = inherited.take() {
                        current.merge(child);
                    }
                    payload = Some(current);
                }
            }
            self.status[p] = PixelStatus::Node(self.nodes_at_level[h as usize]);

            for &q in neighbors {
                if self.status[q] != PixelStatus::NotAnalyzed {
                    continue;
                }
                let level = data[q];
                self.queue.push(level, q);
                self.status[q] = PixelStatus::InQueue;
                self.node_at_level[level as usize] = true;

                if level > h {
                    let mut m = level;
                    let mut child = None;
                    let child = loop {
                        let (next, flooded) = self.flood(m, child.take())?;
                        match next {
                            Some(next) if next != h => {
                                m = next;
                                child = Some(flooded);
                            }
                            _ => break flooded,
                        }
                    };
                    area += child.area;
                    if let Some(current) = payload.as_mut() {
                        current.merge(child.payload);
                    }
                }
            }
        }

        let payload = match (payload, inherited) {
            (Some(current), _) => current,
            (None, Some(child)) => child,
            (None, None) => return Err(TreeError::EmptyLevel(h)),
        };

        let hl = h as usize;
        let idx = self.pixels_below_level[hl] + self.nodes_at_level[hl];
        self.nodes_at_level[hl] += 1;
        let ancestor = (0..h).rev().find(|&l| self.node_at_level[l as usize]);
        let parent = match ancestor {
            Some(m) => self.pixels_below_level[m as usize] + self.nodes_at_level[m as usize],
            None => idx,
        };
        self.nodes[idx] = Some(MaxNode {
            parent,
            area,
            attribute: (self.evaluate)(&payload),
            level: h,
            new_level: h,
        });
        self.node_at_level[hl] = false;

        Ok((ancestor, Flooded { area, payload }))
    }

    fn finish(self, root: usize) -> MaxTree {
        MaxTree::from_parts(
            self.image.dimensions(),
            self.status,
            self.pixels_below_level,
            self.nodes_at_level,
            self.nodes,
            root,
        )
    }
}

/// Build the max-tree of `image` restricted to `template`
///
/// # Errors
///
/// Returns [`TreeError::Core`] if the template size differs from the
/// image, or the first allocation or payload error raised while flooding.
/// Every payload built so far is dropped on the way out.
pub(crate) fn build<A: AttributeData>(
    image: &GrayImage,
    template: &Template,
    evaluate: Evaluator<A>,
) -> TreeResult<MaxTree> {
    template.check_image(image)?;
    let mut builder = Builder::new(image, template, evaluate)?;

    let (start, &level) = image
        .data()
        .iter()
        .enumerate()
        .min_by_key(|&(_, v)| *v)
        .ok_or(TreeError::EmptyLevel(0))?;
    builder.node_at_level[level as usize] = true;
    builder.queue.push(level, start);
    builder.status[start] = PixelStatus::InQueue;

    let (_, root) = builder.flood(level, None)?;
    let root_index = builder.pixels_below_level[level as usize];
    tracing::debug!(
        width = image.width(),
        height = image.height(),
        nodes = builder.nodes_at_level.iter().sum::<usize>(),
        root_level = level,
        root_area = root.area,
        "max-tree built"
    );
    Ok(builder.finish(root_index))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::AreaData;

    fn full(image: &GrayImage) -> Template {
        Template::full_like(image).unwrap()
    }

    #[test]
    fn test_neighbor_order() {
        let image = GrayImage::new(3, 3).unwrap();
        let (buf, n) = template_neighbors(&image, &full(&image), 4);
        assert_eq!(&buf[..n], &[5, 1, 3, 7]);
        let (buf, n) = template_neighbors(&image, &full(&image), 0);
        assert_eq!(&buf[..n], &[1, 3]);
    }

    #[test]
    fn test_neighbors_respect_template() {
        let image = GrayImage::new(3, 3).unwrap();
        let mut mask = GrayImage::new_filled(3, 3, 255).unwrap();
        mask.set_pixel(2, 1, 0).unwrap();
        let template = Template::from_image(mask);
        let (buf, n) = template_neighbors(&image, &template, 4);
        assert_eq!(&buf[..n], &[1, 3, 7]);
    }

    #[test]
    fn test_build_two_levels() {
        let image = GrayImage::from_vec(2, 2, vec![10, 10, 10, 50]).unwrap();
        let tree = build(&image, &full(&image), AreaData::area).unwrap();
        assert_eq!(tree.node_count(), 2);
        let root = tree.root().unwrap();
        assert_eq!((root.level, root.area, root.attribute), (10, 4, 4.0));
        let child = tree.node_index_of_pixel(&image, 3).unwrap();
        let child = tree.node(child).unwrap();
        assert_eq!((child.level, child.area, child.parent), (50, 1, 0));
    }

    #[test]
    fn test_template_size_mismatch() {
        let image = GrayImage::new(4, 4).unwrap();
        let template = Template::full(3, 3).unwrap();
        assert!(matches!(
            build(&image, &template, AreaData::area),
            Err(TreeError::Core(_))
        ));
    }
}
