//! Decision rules
//!
//! A decision rule turns the per-node keep/remove verdict of an attribute
//! threshold into new gray levels. The rules differ in how a removed node
//! affects its descendants.

use crate::error::{FilterError, FilterResult};
use std::fmt;

/// Reconstruction strategy applied after thresholding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Decision {
    /// Remove a node and everything above it once any ancestor is removed
    Min,
    /// Remove exactly the nodes below the threshold
    Direct,
    /// Keep a node while any descendant is kept
    Max,
    /// Shift kept nodes down by the contrast removed beneath them
    #[default]
    Subtractive,
}

impl Decision {
    /// Number of decision rules
    pub const COUNT: usize = 4;

    /// All rules in table order
    pub const ALL: [Decision; Self::COUNT] =
        [Self::Min, Self::Direct, Self::Max, Self::Subtractive];

    /// Look up a rule by table index
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::UnknownDecision`] if `index >= COUNT`.
    pub fn from_index(index: usize) -> FilterResult<Self> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or(FilterError::UnknownDecision(index))
    }

    /// Table index
    pub fn index(self) -> usize {
        self as usize
    }

    /// Display name
    pub fn name(self) -> &'static str {
        match self {
            Self::Min => "Min",
            Self::Direct => "Direct",
            Self::Max => "Max",
            Self::Subtractive => "Subtractive",
        }
    }

    /// Whether this is the rule used when none is given
    pub fn is_default(self) -> bool {
        self == Self::default()
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
