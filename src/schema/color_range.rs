//! Named color ramps

use crate::errors::StructuralErrorKind;
use crate::parse::{opt, Errors, Node, ParseOptions};
use crate::primitives::HexColor;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Shape of a color ramp. Diverging ramps must have an even number of colors
/// so the midpoint falls between two entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RampType {
    Sequential,
    Diverging,
    Qualitative,
}

/// A named, ordered palette of colors used by a scale to map data values to
/// colors, e.g. `ColorBrewer RdYlGn-10`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorRange {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<RampType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub colors: Vec<HexColor>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ColorRange {
    pub(crate) fn parse(node: &Node<'_>, errs: &mut Errors, opts: &ParseOptions) -> Option<Self> {
        let obj = node.as_object(errs)?;
        let name = opt(&obj, "name", |n| n.as_string(errs));
        let kind = opt(&obj, "type", |n| n.enum_variant::<RampType>(errs));
        let category = opt(&obj, "category", |n| n.as_string(errs));
        let colors = obj.require("colors", errs).and_then(|n| {
            let items = n.as_array(errs)?;
            if items.is_empty() {
                errs.push(n.path.clone(), StructuralErrorKind::EmptyColorRamp);
                return None;
            }
            let parsed: Vec<Option<HexColor>> = items
                .iter()
                .map(|item| HexColor::parse(item, errs))
                .collect();
            parsed.into_iter().collect::<Option<Vec<_>>>()
        });

        let mut shape_ok = true;
        if let (Some(Some(RampType::Diverging)), Some(colors)) = (&kind, &colors) {
            if colors.len() % 2 != 0 {
                errs.push(
                    obj.path.key("colors"),
                    StructuralErrorKind::OddDivergingRamp(colors.len()),
                );
                shape_ok = false;
            }
        }

        let extra = obj.extras(opts, errs);
        if !shape_ok {
            return None;
        }
        Some(Self {
            name: name?,
            kind: kind?,
            category: category?,
            colors: colors?,
            extra,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: &Value) -> (Option<ColorRange>, Errors) {
        let mut errs = Errors::new();
        let range = ColorRange::parse(&Node::root(value), &mut errs, &ParseOptions::default());
        (range, errs)
    }

    #[test]
    fn test_diverging_ramp_must_be_even() {
        let value = json!({
            "name": "RdYlGn-3",
            "type": "diverging",
            "category": "ColorBrewer",
            "colors": ["#a50026", "#fee08b", "#006837"]
        });
        let (range, errs) = parse(&value);
        assert!(range.is_none());
        assert!(matches!(
            errs.list[0].kind,
            StructuralErrorKind::OddDivergingRamp(3)
        ));
    }

    #[test]
    fn test_even_diverging_ramp_is_accepted() {
        let value = json!({
            "name": "RdYlGn-4",
            "type": "diverging",
            "category": "ColorBrewer",
            "colors": ["#a50026", "#fdae61", "#a6d96a", "#006837"]
        });
        let (range, errs) = parse(&value);
        assert!(errs.is_empty());
        assert_eq!(range.unwrap().colors.len(), 4);
    }

    #[test]
    fn test_empty_ramp_is_an_error() {
        let value = json!({ "name": "empty", "type": "sequential", "colors": [] });
        let (range, errs) = parse(&value);
        assert!(range.is_none());
        assert!(matches!(
            errs.list[0].kind,
            StructuralErrorKind::EmptyColorRamp
        ));
    }

    #[test]
    fn test_bad_hex_entries_are_all_reported() {
        let value = json!({ "colors": ["#a50026", "nope", "#12345"] });
        let (range, errs) = parse(&value);
        assert!(range.is_none());
        assert_eq!(errs.list.len(), 2);
    }
}
