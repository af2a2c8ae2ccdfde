//! Gray-level payloads: entropy, lambda-max and level

use super::{AttributeData, PixelContext};
use crate::error::{TreeError, TreeResult};
use maxtree_core::NUM_LEVELS;

/// Gray-level histogram of a component
#[derive(Debug, Clone, PartialEq)]
pub struct EntropyData {
    pub hist: Vec<u64>,
}

impl EntropyData {
    /// Number of pixels counted
    pub fn area(&self) -> u64 {
        self.hist.iter().sum()
    }

    /// Shannon entropy of the histogram in bits
    pub fn entropy(&self) -> f64 {
        let total = self.area() as f64;
        self.hist
            .iter()
            .filter(|&&count| count > 0)
            .map(|&count| {
                let p = count as f64 / total;
                -p * (p + 0.00001).log2()
            })
            .sum()
    }
}

impl AttributeData for EntropyData {
    fn create(pixel: &PixelContext<'_>) -> TreeResult<Self> {
        let mut hist = Vec::new();
        hist.try_reserve_exact(NUM_LEVELS)
            .map_err(|_| TreeError::AllocationFailed)?;
        hist.resize(NUM_LEVELS, 0);
        hist[pixel.level() as usize] = 1;
        Ok(Self { hist })
    }

    fn add(&mut self, pixel: &PixelContext<'_>) {
        self.hist[pixel.level() as usize] += 1;
    }

    fn merge(&mut self, child: Self) {
        for (count, c) in self.hist.iter_mut().zip(child.hist) {
            *count += c;
        }
    }
}

/// Own level and highest level in the subtree
#[derive(Debug, Clone, PartialEq)]
pub struct LambdaMaxData {
    pub min_level: u8,
    pub max_level: u8,
}

impl LambdaMaxData {
    /// Contrast between the brightest descendant and the node itself
    pub fn lambda_max(&self) -> f64 {
        f64::from(self.max_level - self.min_level)
    }
}

impl AttributeData for LambdaMaxData {
    fn create(pixel: &PixelContext<'_>) -> TreeResult<Self> {
        let level = pixel.level();
        Ok(Self {
            min_level: level,
            max_level: level,
        })
    }

    fn add(&mut self, _pixel: &PixelContext<'_>) {}

    fn merge(&mut self, child: Self) {
        self.max_level = self.max_level.max(child.max_level);
    }
}

/// Gray level of the node
#[derive(Debug, Clone, PartialEq)]
pub struct LevelData {
    pub level: u8,
}

impl LevelData {
    pub fn level(&self) -> f64 {
        f64::from(self.level)
    }
}

impl AttributeData for LevelData {
    fn create(pixel: &PixelContext<'_>) -> TreeResult<Self> {
        Ok(Self {
            level: pixel.level(),
        })
    }

    fn add(&mut self, _pixel: &PixelContext<'_>) {}

    fn merge(&mut self, _child: Self) {}
}
