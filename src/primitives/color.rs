//! Color value types
//!
//! Wire colors come in three shapes: integer channel tuples of length 3 or 4
//! ([`Color`]), float channel triples used by the basemap building color
//! ([`FloatColor`]), and `#rrggbb`/`#rrggbbaa` strings inside color ramps
//! ([`HexColor`]).

use crate::errors::StructuralErrorKind;
use crate::parse::{json_type, Errors, Node};
use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};

/// An RGB color with integer channels in `[0, 255]` and an optional alpha
/// channel. A 3-component wire tuple keeps `alpha` as `None` so it re-encodes
/// with 3 components; consumers read an effective alpha of 255.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub alpha: Option<u8>,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self {
            r,
            g,
            b,
            alpha: None,
        }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r,
            g,
            b,
            alpha: Some(a),
        }
    }

    /// The alpha channel, defaulting to fully opaque when omitted.
    pub fn alpha_or_opaque(&self) -> u8 {
        self.alpha.unwrap_or(255)
    }

    pub(crate) fn parse(node: &Node<'_>, errs: &mut Errors) -> Option<Self> {
        let items = node.as_array(errs)?;
        if items.len() != 3 && items.len() != 4 {
            errs.push(
                node.path.clone(),
                StructuralErrorKind::BadColorLength(items.len()),
            );
            return None;
        }
        let mut channels = [0u8; 4];
        let mut ok = true;
        for (slot, item) in channels.iter_mut().zip(&items) {
            match parse_channel(item, errs) {
                Some(value) => *slot = value,
                None => ok = false,
            }
        }
        if !ok {
            return None;
        }
        let [r, g, b, a] = channels;
        Some(if items.len() == 4 {
            Self::rgba(r, g, b, a)
        } else {
            Self::rgb(r, g, b)
        })
    }
}

fn parse_channel(node: &Node<'_>, errs: &mut Errors) -> Option<u8> {
    if let Some(value) = node.value.as_i64() {
        if (0..=255).contains(&value) {
            Some(value as u8)
        } else {
            errs.push(
                node.path.clone(),
                StructuralErrorKind::InvalidColorComponent(value as f64),
            );
            None
        }
    } else {
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

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = if self.alpha.is_some() { 4 } else { 3 };
        let mut seq = serializer.serialize_seq(Some(len))?;
        seq.serialize_element(&self.r)?;
        seq.serialize_element(&self.g)?;
        seq.serialize_element(&self.b)?;
        if let Some(alpha) = self.alpha {
            seq.serialize_element(&alpha)?;
        }
        seq.end()
    }
}

/// A 3-channel color with float components in `[0, 255]`. The basemap
/// `threeDBuildingColor` carries fractional channel values on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FloatColor(pub [f64; 3]);

impl FloatColor {
    pub(crate) fn parse(node: &Node<'_>, errs: &mut Errors) -> Option<Self> {
        let items = node.as_array(errs)?;
        if items.len() != 3 {
            errs.push(
                node.path.clone(),
                StructuralErrorKind::BadColorLength(items.len()),
            );
            return None;
        }
        let mut channels = [0.0; 3];
        let mut ok = true;
        for (slot, item) in channels.iter_mut().zip(&items) {
            match item.as_f64(errs) {
                Some(value) if (0.0..=255.0).contains(&value) => *slot = value,
                Some(value) => {
                    errs.push(
                        item.path.clone(),
                        StructuralErrorKind::InvalidColorComponent(value),
                    );
                    ok = false;
                }
                None => ok = false,
            }
        }
        ok.then_some(Self(channels))
    }
}

/// A hex color string of the form `#rrggbb` or `#rrggbbaa`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HexColor(String);

impl HexColor {
    /// Validates and wraps a hex color string.
    pub fn new(value: &str) -> Option<Self> {
        let digits = value.strip_prefix('#')?;
        if digits.len() != 6 && digits.len() != 8 {
            return None;
        }
        digits
            .chars()
            .all(|c| c.is_ascii_hexdigit())
            .then(|| Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub(crate) fn parse(node: &Node<'_>, errs: &mut Errors) -> Option<Self> {
        let raw = node.as_str(errs)?;
        match Self::new(raw) {
            Some(color) => Some(color),
            None => {
                errs.push(
                    node.path.clone(),
                    StructuralErrorKind::InvalidHexColor(raw.to_string()),
                );
                None
            }
        }
    }
}
