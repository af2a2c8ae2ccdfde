//! Hierarchical queue
//!
//! 256 FIFO queues, one per gray level, sharing a single buffer. The
//! window for level `l` starts at the number of pixels below `l` and is
//! exactly as long as the histogram count of `l`, so pushing every pixel
//! once at its own level can never overflow a window.

use crate::error::{TreeError, TreeResult};
use maxtree_core::NUM_LEVELS;

/// Level-ordered bucket queue over pixel indices
#[derive(Debug)]
pub struct HierarchicalQueue {
    pixels: Vec<usize>,
    head: [usize; NUM_LEVELS],
    tail: [usize; NUM_LEVELS],
}

impl HierarchicalQueue {
    /// Create a queue sized by a gray-level histogram
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::AllocationFailed`] if the shared buffer cannot
    /// be allocated.
    pub fn new(histogram: &[usize; NUM_LEVELS]) -> TreeResult<Self> {
        let total: usize = histogram.iter().sum();
        let mut pixels = Vec::new();
        pixels
            .try_reserve_exact(total)
            .map_err(|_| TreeError::AllocationFailed)?;
        pixels.resize(total, 0);

        let mut head = [0usize; NUM_LEVELS];
        let mut start = 0;
        for (level, count) in histogram.iter().enumerate() {
            head[level] = start;
            start += count;
        }

        Ok(Self {
            pixels,
            head,
            tail: head,
        })
    }

    /// Append `pixel` to the queue of `level`
    #[inline]
    pub fn push(&mut self, level: u8, pixel: usize) {
        let l = level as usize;
        self.pixels[self.tail[l]] = pixel;
        self.tail[l] += 1;
    }

    /// Remove the oldest pixel queued at `level`
    #[inline]
    pub fn pop(&mut self, level: u8) -> Option<usize> {
        let l = level as usize;
        if self.head[l] == self.tail[l] {
            return None;
        }
        let pixel = self.pixels[self.head[l]];
        self.head[l] += 1;
        Some(pixel)
    }

    /// Whether nothing is queued at `level`
    #[inline]
    pub fn is_empty(&self, level: u8) -> bool {
        let l = level as usize;
        self.head[l] == self.tail[l]
    }

    /// Number of pixels currently queued at `level`
    pub fn len(&self, level: u8) -> usize {
        let l = level as usize;
        self.tail[l] - self.head[l]
    }
}
