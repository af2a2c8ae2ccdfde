//! Attribute catalog
//!
//! [`AttributeKind`] enumerates the 19 named attributes in catalog order.
//! Each kind pairs a payload type with an evaluator; since the payload type
//! differs per kind, callers reach it through [`AttributeVisitor`].

use super::{
    AreaData, AttributeData, CityBlockPerimeterData, EnclosingRectData, EntropyData, Evaluator,
    InertiaData, JaggedData, LambdaMaxData, LargePerimeterData, LevelData, SmallPerimeterData,
};
use crate::error::{TreeError, TreeResult};

/// Named attribute selectable by index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeKind {
    Area,
    EnclosingRectArea,
    EnclosingRectDiagonal,
    CityBlockPerimeter,
    CityBlockComplexity,
    CityBlockSimplicity,
    CityBlockCompactness,
    LargePerimeter,
    LargeCompactness,
    SmallPerimeter,
    SmallCompactness,
    Inertia,
    Elongation,
    MeanX,
    MeanY,
    Jaggedness,
    Entropy,
    LambdaMax,
    Level,
}

/// Callback receiving the payload type and evaluator of an attribute kind
///
/// # Examples
///
/// ```
/// use maxtree_tree::attribute::{AttributeData, AttributeKind, AttributeVisitor};
///
/// struct PayloadSize;
///
/// impl AttributeVisitor for PayloadSize {
///     type Output = usize;
///     fn visit<A: AttributeData>(self, _evaluate: fn(&A) -> f64) -> usize {
///         std::mem::size_of::<A>()
///     }
/// }
///
/// assert!(AttributeKind::Area.dispatch(PayloadSize) > 0);
/// ```
pub trait AttributeVisitor {
    type Output;

    fn visit<A: AttributeData>(self, evaluate: Evaluator<A>) -> Self::Output;
}

impl AttributeKind {
    /// Number of catalog entries
    pub const COUNT: usize = 19;

    /// All kinds in catalog order
    pub const ALL: [AttributeKind; Self::COUNT] = [
        Self::Area,
        Self::EnclosingRectArea,
        Self::EnclosingRectDiagonal,
        Self::CityBlockPerimeter,
        Self::CityBlockComplexity,
        Self::CityBlockSimplicity,
        Self::CityBlockCompactness,
        Self::LargePerimeter,
        Self::LargeCompactness,
        Self::SmallPerimeter,
        Self::SmallCompactness,
        Self::Inertia,
        Self::Elongation,
        Self::MeanX,
        Self::MeanY,
        Self::Jaggedness,
        Self::Entropy,
        Self::LambdaMax,
        Self::Level,
    ];

    /// Look up a kind by catalog index
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::UnknownAttribute`] if `index >= COUNT`.
    pub fn from_index(index: usize) -> TreeResult<Self> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or(TreeError::UnknownAttribute(index))
    }

    /// Catalog index
    pub fn index(self) -> usize {
        self as usize
    }

    /// Display name shown in the catalog
    pub fn name(self) -> &'static str {
        match self {
            Self::Area => "Area",
            Self::EnclosingRectArea => "Area of min. enclosing rectangle",
            Self::EnclosingRectDiagonal => "Square of diagonal of min. enclosing rectangle",
            Self::CityBlockPerimeter => "Cityblock perimeter",
            Self::CityBlockComplexity => "Cityblock complexity (Perimeter/Area)",
            Self::CityBlockSimplicity => "Cityblock simplicity (Area/Perimeter)",
            Self::CityBlockCompactness => "Cityblock compactness (Perimeter^2/(4*PI*Area))",
            Self::LargePerimeter => "Large perimeter",
            Self::LargeCompactness => "Large compactness (Perimeter^2/(4*PI*Area))",
            Self::SmallPerimeter => "Small perimeter",
            Self::SmallCompactness => "Small compactness (Perimeter^2/(4*PI*Area))",
            Self::Inertia => "Moment of Inertia",
            Self::Elongation => "Elongation: (Moment of Inertia) / (area)^2",
            Self::MeanX => "Mean X position",
            Self::MeanY => "Mean Y position",
            Self::Jaggedness => "Jaggedness: Area*Perimeter^2/(8*PI^2*Inertia)",
            Self::Entropy => "Entropy",
            Self::LambdaMax => "Lambda-max (Max.child gray level - current gray level)",
            Self::Level => "Gray level",
        }
    }

    /// Hand the payload type and evaluator of this kind to `visitor`
    pub fn dispatch<V: AttributeVisitor>(self, visitor: V) -> V::Output {
        match self {
            Self::Area => visitor.visit::<AreaData>(AreaData::area),
            Self::EnclosingRectArea => {
                visitor.visit::<EnclosingRectData>(EnclosingRectData::rect_area)
            }
            Self::EnclosingRectDiagonal => {
                visitor.visit::<EnclosingRectData>(EnclosingRectData::diagonal_squared)
            }
            Self::CityBlockPerimeter => {
                visitor.visit::<CityBlockPerimeterData>(CityBlockPerimeterData::perimeter)
            }
            Self::CityBlockComplexity => {
                visitor.visit::<CityBlockPerimeterData>(CityBlockPerimeterData::complexity)
            }
            Self::CityBlockSimplicity => {
                visitor.visit::<CityBlockPerimeterData>(CityBlockPerimeterData::simplicity)
            }
            Self::CityBlockCompactness => {
                visitor.visit::<CityBlockPerimeterData>(CityBlockPerimeterData::compactness)
            }
            Self::LargePerimeter => {
                visitor.visit::<LargePerimeterData>(LargePerimeterData::perimeter)
            }
            Self::LargeCompactness => {
                visitor.visit::<LargePerimeterData>(LargePerimeterData::compactness)
            }
            Self::SmallPerimeter => {
                visitor.visit::<SmallPerimeterData>(SmallPerimeterData::perimeter)
            }
            Self::SmallCompactness => {
                visitor.visit::<SmallPerimeterData>(SmallPerimeterData::compactness)
            }
            Self::Inertia => visitor.visit::<InertiaData>(InertiaData::inertia),
            Self::Elongation => visitor.visit::<InertiaData>(InertiaData::elongation),
            Self::MeanX => visitor.visit::<InertiaData>(InertiaData::mean_x),
            Self::MeanY => visitor.visit::<InertiaData>(InertiaData::mean_y),
            Self::Jaggedness => visitor.visit::<JaggedData>(JaggedData::jaggedness),
            Self::Entropy => visitor.visit::<EntropyData>(EntropyData::entropy),
            Self::LambdaMax => visitor.visit::<LambdaMaxData>(LambdaMaxData::lambda_max),
            Self::Level => visitor.visit::<LevelData>(LevelData::level),
        }
    }
}

impl std::fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One row of the attribute catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeEntry {
    pub index: usize,
    pub kind: AttributeKind,
    pub name: &'static str,
}

/// Ordered table of every selectable attribute
///
/// Built once by the caller and passed where index-based selection is
/// needed.
#[derive(Debug, Clone)]
pub struct AttributeRegistry {
    entries: Vec<AttributeEntry>,
}

impl AttributeRegistry {
    /// Registry holding the full catalog
    pub fn standard() -> Self {
        let entries = AttributeKind::ALL
            .iter()
            .map(|&kind| AttributeEntry {
                index: kind.index(),
                kind,
                name: kind.name(),
            })
            .collect();
        Self { entries }
    }

    /// All entries in index order
    pub fn entries(&self) -> &[AttributeEntry] {
        &self.entries
    }

    /// Entry at `index`
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::UnknownAttribute`] for an index past the end.
    pub fn get(&self, index: usize) -> TreeResult<&AttributeEntry> {
        self.entries
            .get(index)
            .ok_or(TreeError::UnknownAttribute(index))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for AttributeRegistry {
    fn default() -> Self {
        Self::standard()
    }
}
