//! Error-collecting traversal over the wire document
//!
//! Structural validation is *total*: a pass over the document records every
//! diagnostic instead of failing on the first, so authors of hand-edited
//! configurations get a complete report. [`Node`] and [`ObjectNode`] are the
//! cursors entity parsers use; every accessor records an error and returns
//! `None` instead of bailing out.
//!
//! Entity parsers follow one pattern: evaluate every field into a local
//! `Option` first (collecting errors as they go), then combine with `?` at
//! construction. That way a broken field never stops its siblings from being
//! checked.

use crate::errors::{StructuralError, StructuralErrorKind, ValuePath};
use crate::primitives::Maybe;
use fxhash::FxHashSet;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::cell::RefCell;

/// Switches governing structural validation.
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// Reject unknown keys instead of preserving them verbatim.
    pub strict: bool,
    /// Require a layer's color and stroke-color ramps to have the same
    /// number of colors.
    pub matched_ramp_lengths: bool,
}

impl ParseOptions {
    pub fn strict() -> Self {
        Self {
            strict: true,
            ..Self::default()
        }
    }
}

/// JSON type name for diagnostics.
pub(crate) fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[derive(Debug, Default)]
pub(crate) struct Errors {
    pub list: Vec<StructuralError>,
}

impl Errors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, path: ValuePath, kind: StructuralErrorKind) {
        self.list.push(StructuralError { path, kind });
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }
}

/// Cursor over a single value, carrying its path for diagnostics.
pub(crate) struct Node<'a> {
    pub value: &'a Value,
    pub path: ValuePath,
}

impl<'a> Node<'a> {
    pub fn root(value: &'a Value) -> Self {
        Self {
            value,
            path: ValuePath::root(),
        }
    }

    fn wrong_type(&self, expected: &'static str, errs: &mut Errors) {
        errs.push(
            self.path.clone(),
            StructuralErrorKind::WrongType {
                expected,
                found: json_type(self.value),
            },
        );
    }

    pub fn as_object(&self, errs: &mut Errors) -> Option<ObjectNode<'a>> {
        match self.value.as_object() {
            Some(map) => Some(ObjectNode {
                map,
                path: self.path.clone(),
                seen: RefCell::new(FxHashSet::default()),
            }),
            None => {
                self.wrong_type("object", errs);
                None
            }
        }
    }

    pub fn as_array(&self, errs: &mut Errors) -> Option<Vec<Node<'a>>> {
        match self.value.as_array() {
            Some(items) => Some(
                items
                    .iter()
                    .enumerate()
                    .map(|(i, value)| Node {
                        value,
                        path: self.path.index(i),
                    })
                    .collect(),
            ),
            None => {
                self.wrong_type("array", errs);
                None
            }
        }
    }

    pub fn as_str(&self, errs: &mut Errors) -> Option<&'a str> {
        match self.value.as_str() {
            Some(s) => Some(s),
            None => {
                self.wrong_type("string", errs);
                None
            }
        }
    }

    pub fn as_string(&self, errs: &mut Errors) -> Option<String> {
        self.as_str(errs).map(str::to_string)
    }

    pub fn as_bool(&self, errs: &mut Errors) -> Option<bool> {
        match self.value.as_bool() {
            Some(b) => Some(b),
            None => {
                self.wrong_type("boolean", errs);
                None
            }
        }
    }

    pub fn as_f64(&self, errs: &mut Errors) -> Option<f64> {
        match self.value.as_f64() {
            Some(n) => Some(n),
            None => {
                self.wrong_type("number", errs);
                None
            }
        }
    }

    pub fn as_i64(&self, errs: &mut Errors) -> Option<i64> {
        match self.value.as_i64() {
            Some(n) => Some(n),
            None => {
                self.wrong_type("integer", errs);
                None
            }
        }
    }

    /// Number restricted to a closed interval.
    pub fn as_f64_in(&self, min: f64, max: f64, errs: &mut Errors) -> Option<f64> {
        let value = self.as_f64(errs)?;
        if (min..=max).contains(&value) {
            Some(value)
        } else {
            errs.push(
                self.path.clone(),
                StructuralErrorKind::OutOfRange { value, min, max },
            );
            None
        }
    }

    /// Number restricted to a half-open interval `[min, max)`.
    pub fn as_f64_below(&self, min: f64, max: f64, errs: &mut Errors) -> Option<f64> {
        let value = self.as_f64(errs)?;
        if value >= min && value < max {
            Some(value)
        } else {
            errs.push(
                self.path.clone(),
                StructuralErrorKind::OutOfRangeExclusive { value, min, max },
            );
            None
        }
    }

    pub fn as_f64_positive(&self, errs: &mut Errors) -> Option<f64> {
        let value = self.as_f64(errs)?;
        if value > 0.0 {
            Some(value)
        } else {
            errs.push(self.path.clone(), StructuralErrorKind::NotPositive(value));
            None
        }
    }

    pub fn as_f64_non_negative(&self, errs: &mut Errors) -> Option<f64> {
        let value = self.as_f64(errs)?;
        if value >= 0.0 {
            Some(value)
        } else {
            errs.push(self.path.clone(), StructuralErrorKind::Negative(value));
            None
        }
    }

    /// Deserializes an enum value, turning the deserializer's message (which
    /// names the value and the accepted variants) into a diagnostic.
    pub fn enum_variant<T: DeserializeOwned>(&self, errs: &mut Errors) -> Option<T> {
        match serde_json::from_value::<T>(self.value.clone()) {
            Ok(value) => Some(value),
            Err(err) => {
                errs.push(
                    self.path.clone(),
                    StructuralErrorKind::UnknownVariant(err.to_string()),
                );
                None
            }
        }
    }
}

/// Cursor over an object. Tracks which keys the parser consumed so the
/// leftovers can be rejected (strict mode) or preserved verbatim.
pub(crate) struct ObjectNode<'a> {
    map: &'a Map<String, Value>,
    pub path: ValuePath,
    seen: RefCell<FxHashSet<&'a str>>,
}

/// Three-state view of an object field, mirroring [`Maybe`].
pub(crate) enum MaybeNode<'a> {
    Absent,
    Null,
    Value(Node<'a>),
}

impl<'a> MaybeNode<'a> {
    /// Applies a parser to the value state; `Absent` and `Null` pass through.
    /// Returns `None` only when the parser failed (errors already recorded).
    pub fn map_value<T>(self, f: impl FnOnce(Node<'a>) -> Option<T>) -> Option<Maybe<T>> {
        match self {
            MaybeNode::Absent => Some(Maybe::Absent),
            MaybeNode::Null => Some(Maybe::Null),
            MaybeNode::Value(node) => f(node).map(Maybe::Value),
        }
    }
}

impl<'a> ObjectNode<'a> {
    pub fn require(&self, key: &str, errs: &mut Errors) -> Option<Node<'a>> {
        match self.get(key) {
            Some(node) => Some(node),
            None => {
                errs.push(
                    self.path.clone(),
                    StructuralErrorKind::MissingKey(key.to_string()),
                );
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<Node<'a>> {
        self.map.get_key_value(key).map(|(k, value)| {
            self.seen.borrow_mut().insert(k.as_str());
            Node {
                value,
                path: self.path.key(k),
            }
        })
    }

    /// Three-state access: absent key, explicit null, or a value to parse.
    pub fn field(&self, key: &str) -> MaybeNode<'a> {
        match self.get(key) {
            None => MaybeNode::Absent,
            Some(node) if node.value.is_null() => MaybeNode::Null,
            Some(node) => MaybeNode::Value(node),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    /// Raw entries, for parsers that consume every key themselves (the
    /// visual-channel pair walker). Does not mark keys as seen.
    pub fn entries(&self) -> impl Iterator<Item = (&'a String, &'a Value)> {
        self.map.iter()
    }

    /// Closes the object: keys the parser did not consume become
    /// [`StructuralErrorKind::UnknownKey`] errors in strict mode, or are
    /// returned verbatim for pass-through otherwise.
    pub fn extras(&self, opts: &ParseOptions, errs: &mut Errors) -> Map<String, Value> {
        let seen = self.seen.borrow();
        let mut extras = Map::new();
        for (key, value) in self.map {
            if seen.contains(key.as_str()) {
                continue;
            }
            if opts.strict {
                errs.push(
                    self.path.clone(),
                    StructuralErrorKind::UnknownKey(key.clone()),
                );
            } else {
                log::debug!("preserving unknown key `{}` at {}", key, self.path);
                extras.insert(key.clone(), value.clone());
            }
        }
        extras
    }

    /// Like [`extras`](Self::extras) but never an error, for open knob sets
    /// that are preserved opaquely even in strict mode.
    pub fn extras_opaque(&self) -> Map<String, Value> {
        let seen = self.seen.borrow();
        self.map
            .iter()
            .filter(|(key, _)| !seen.contains(key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
}

/// Parses an optional field: absence is valid (`Some(None)`), a present but
/// malformed value is an error (`None`).
pub(crate) fn opt<'a, T>(
    obj: &ObjectNode<'a>,
    key: &str,
    f: impl FnOnce(Node<'a>) -> Option<T>,
) -> Option<Option<T>> {
    match obj.get(key) {
        None => Some(None),
        Some(node) => f(node).map(Some),
    }
}
