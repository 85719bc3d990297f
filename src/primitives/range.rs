//! Ordered numeric pairs
//!
//! Several wire fields are `[min, max]` arrays (filter values, radius
//! bounds). [`OrderedRange`] enforces `min <= max` at construction.

use crate::errors::StructuralErrorKind;
use crate::parse::{json_type, Errors, Node};
use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderedRange<T> {
    pub min: T,
    pub max: T,
}

impl<T: PartialOrd> OrderedRange<T> {
    /// Returns `None` when the pair is not ordered.
    pub fn new(min: T, max: T) -> Option<Self> {
        if min <= max {
            Some(Self { min, max })
        } else {
            None
        }
    }

    pub fn contains(&self, value: &T) -> bool {
        *value >= self.min && *value <= self.max
    }
}

impl<T: Serialize> Serialize for OrderedRange<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(2))?;
        seq.serialize_element(&self.min)?;
        seq.serialize_element(&self.max)?;
        seq.end()
    }
}

fn pair<'a>(node: &Node<'a>, errs: &mut Errors) -> Option<[Node<'a>; 2]> {
    let items = node.as_array(errs)?;
    match <[Node<'a>; 2]>::try_from(items) {
        Ok(pair) => Some(pair),
        Err(items) => {
            errs.push(
                node.path.clone(),
                StructuralErrorKind::WrongType {
                    expected: "a [min, max] pair",
                    found: if items.len() < 2 {
                        "too few elements"
                    } else {
                        "too many elements"
                    },
                },
            );
            None
        }
    }
}

impl OrderedRange<f64> {
    pub(crate) fn parse_f64(node: &Node<'_>, errs: &mut Errors) -> Option<Self> {
        let [lo, hi] = pair(node, errs)?;
        let (min, max) = (lo.as_f64(errs), hi.as_f64(errs));
        let (min, max) = (min?, max?);
        match Self::new(min, max) {
            Some(range) => Some(range),
            None => {
                errs.push(
                    node.path.clone(),
                    StructuralErrorKind::UnorderedRange { min, max },
                );
                None
            }
        }
    }
}

impl OrderedRange<i64> {
    /// Parses an epoch-millisecond pair. Values may be negative (times before
    /// the Unix epoch) but must be integers.
    pub(crate) fn parse_i64(node: &Node<'_>, errs: &mut Errors) -> Option<Self> {
        let [lo, hi] = pair(node, errs)?;
        let (min, max) = (as_i64(&lo, errs), as_i64(&hi, errs));
        let (min, max) = (min?, max?);
        match Self::new(min, max) {
            Some(range) => Some(range),
            None => {
                errs.push(
                    node.path.clone(),
                    StructuralErrorKind::UnorderedRange {
                        min: min as f64,
                        max: max as f64,
                    },
                );
                None
            }
        }
    }
}

fn as_i64(node: &Node<'_>, errs: &mut Errors) -> Option<i64> {
    match node.value.as_i64() {
        Some(value) => Some(value),
        None => {
            errs.push(
                node.path.clone(),
                StructuralErrorKind::WrongType {
                    expected: "integer",
                    found: json_type(node.value),
                },
            );
            None
        }
    }
}
