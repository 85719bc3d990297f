//! Error types for configuration validation
//!
//! Three disjoint families that are never conflated: [`VersionError`] for an
//! unsupported schema tag (checked before anything else), [`StructuralError`]
//! for malformed shape, and [`ReferenceError`] for column/dataset references
//! that do not resolve against the caller-supplied dataset schema. Structural
//! and reference errors are collected and returned as complete lists so a
//! single pass over a hand-edited document yields every diagnostic at once.

use std::fmt;

/// Path to a value inside the wire document, e.g.
/// `$.config.visState.layers[0].config.columns.lat`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValuePath(Vec<PathSegment>);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl ValuePath {
    /// The document root, displayed as `$`.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Returns a new path descending into an object key.
    pub fn key(&self, key: &str) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Key(key.to_string()));
        Self(segments)
    }

    /// Returns a new path descending into an array element.
    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Index(index));
        Self(segments)
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }
}

impl fmt::Display for ValuePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "$")?;
        for segment in &self.0 {
            match segment {
                PathSegment::Key(key) => write!(f, ".{}", key)?,
                PathSegment::Index(index) => write!(f, "[{}]", index)?,
            }
        }
        Ok(())
    }
}

/// Unsupported or missing `version` tag. Surfaced before any structural rule
/// runs, since structural rules are version-specific.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VersionError {
    #[error("missing `version` tag")]
    Missing,

    #[error("`version` tag is not a string")]
    NotAString,

    #[error("unsupported configuration version `{0}` (supported: v1)")]
    Unsupported(String),
}

/// A malformed-shape diagnostic: wrong type, out-of-domain enum value,
/// mismatched paired-array lengths, unordered range. Always recoverable by
/// fixing the input.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{kind} at {path}")]
pub struct StructuralError {
    pub path: ValuePath,
    pub kind: StructuralErrorKind,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StructuralErrorKind {
    #[error("missing required key `{0}`")]
    MissingKey(String),

    #[error("unknown key `{0}`")]
    UnknownKey(String),

    #[error("expected {expected}, found {found}")]
    WrongType {
        expected: &'static str,
        found: &'static str,
    },

    /// Enum value outside its declared set. Carries the deserializer's
    /// message, which names the offending value and the accepted variants.
    #[error("{0}")]
    UnknownVariant(String),

    #[error("range is not ordered: {min} > {max}")]
    UnorderedRange { min: f64, max: f64 },

    #[error("`{left}` and `{right}` must have the same length ({left_len} != {right_len})")]
    LengthMismatch {
        left: &'static str,
        right: &'static str,
        left_len: usize,
        right_len: usize,
    },

    #[error("value {value} out of range [{min}, {max}]")]
    OutOfRange { value: f64, min: f64, max: f64 },

    #[error("value {value} out of range [{min}, {max})")]
    OutOfRangeExclusive { value: f64, min: f64, max: f64 },

    #[error("expected a positive number, found {0}")]
    NotPositive(f64),

    #[error("expected a non-negative number, found {0}")]
    Negative(f64),

    #[error("a color needs 3 or 4 components, found {0}")]
    BadColorLength(usize),

    #[error("color component {0} out of range [0, 255]")]
    InvalidColorComponent(f64),

    #[error("invalid hex color `{0}`")]
    InvalidHexColor(String),

    #[error("color ramp has no colors")]
    EmptyColorRamp,

    #[error("diverging color ramp must have an even number of colors, found {0}")]
    OddDivergingRamp(usize),

    #[error("color and stroke color ramps differ in length ({color} != {stroke})")]
    RampLengthMismatch { color: usize, stroke: usize },

    #[error("filter applies to no dataset")]
    EmptyDataIds,

    #[error("unknown column role `{role}` for a {kind} layer")]
    UnknownColumnRole { role: String, kind: String },

    #[error("duplicate id `{0}`")]
    DuplicateId(String),
}

/// A reference that does not resolve against the dataset schema supplied to
/// the resolver. Unknown dataset and unknown column are distinct kinds so
/// callers can report precise diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} (entity `{entity_id}` at {path})")]
pub struct ReferenceError {
    /// Id of the layer or filter the reference belongs to, or `tooltip` for
    /// interaction tooltip entries.
    pub entity_id: String,
    pub path: ValuePath,
    pub kind: ReferenceErrorKind,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReferenceErrorKind {
    #[error("unknown dataset `{0}`")]
    UnknownDataset(String),

    #[error("unknown column `{column}` in dataset `{data_id}`")]
    UnknownColumn { data_id: String, column: String },
}
