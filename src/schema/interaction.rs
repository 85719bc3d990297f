//! Tooltip, brush, geocoder and coordinate interaction settings

use crate::defaults;
use crate::parse::{opt, Errors, Node, ParseOptions};
use crate::primitives::Maybe;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// How tooltip values of two split maps are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompareType {
    Absolute,
    Relative,
}

/// One tooltip entry: the column to show and an optional display format.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TooltipField {
    pub name: String,
    #[serde(skip_serializing_if = "Maybe::is_absent")]
    pub format: Maybe<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TooltipField {
    fn parse(node: &Node<'_>, errs: &mut Errors, opts: &ParseOptions) -> Option<Self> {
        let obj = node.as_object(errs)?;
        let name = obj.require("name", errs).and_then(|n| n.as_string(errs));
        let format = obj.field("format").map_value(|n| n.as_string(errs));
        let extra = obj.extras(opts, errs);
        Some(Self {
            name: name?,
            format: format?,
            extra,
        })
    }

    fn with_defaults(self) -> Self {
        let Self {
            name,
            format,
            extra,
        } = self;
        Self {
            name,
            format: format.defaulted(Maybe::Null),
            extra,
        }
    }
}

/// Tooltip configuration: which columns to show per dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Tooltip {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields_to_show: Option<BTreeMap<String, Vec<TooltipField>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compare_mode: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compare_type: Option<CompareType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Tooltip {
    fn parse(node: &Node<'_>, errs: &mut Errors, opts: &ParseOptions) -> Option<Self> {
        let obj = node.as_object(errs)?;
        let fields_to_show = opt(&obj, "fieldsToShow", |n| {
            let outer = n.as_object(errs)?;
            let mut shown = BTreeMap::new();
            let mut ok = true;
            for (data_id, entries) in outer.entries() {
                let list_node = Node {
                    value: entries,
                    path: outer.path.key(data_id),
                };
                let items = match list_node.as_array(errs) {
                    Some(items) => items,
                    None => {
                        ok = false;
                        continue;
                    }
                };
                let parsed: Vec<Option<TooltipField>> = items
                    .iter()
                    .map(|item| TooltipField::parse(item, errs, opts))
                    .collect();
                match parsed.into_iter().collect::<Option<Vec<_>>>() {
                    Some(fields) => {
                        shown.insert(data_id.clone(), fields);
                    }
                    None => ok = false,
                }
            }
            ok.then_some(shown)
        });
        let compare_mode = opt(&obj, "compareMode", |n| n.as_bool(errs));
        let compare_type = opt(&obj, "compareType", |n| n.enum_variant::<CompareType>(errs));
        let enabled = opt(&obj, "enabled", |n| n.as_bool(errs));
        let extra = obj.extras(opts, errs);
        Some(Self {
            fields_to_show: fields_to_show?,
            compare_mode: compare_mode?,
            compare_type: compare_type?,
            enabled: enabled?,
            extra,
        })
    }

    fn with_defaults(self) -> Self {
        let Self {
            fields_to_show,
            compare_mode,
            compare_type,
            enabled,
            extra,
        } = self;
        Self {
            fields_to_show: Some(
                fields_to_show
                    .unwrap_or_default()
                    .into_iter()
                    .map(|(data_id, fields)| {
                        (
                            data_id,
                            fields
                                .into_iter()
                                .map(TooltipField::with_defaults)
                                .collect(),
                        )
                    })
                    .collect(),
            ),
            compare_mode: compare_mode.or(Some(defaults::TOOLTIP_COMPARE_MODE)),
            compare_type: compare_type.or(Some(defaults::TOOLTIP_COMPARE_TYPE)),
            enabled: enabled.or(Some(defaults::TOOLTIP_ENABLED)),
            extra,
        }
    }
}

/// Brush interaction: highlight features within a radius of the cursor.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct Brush {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Brush {
    fn parse(node: &Node<'_>, errs: &mut Errors, opts: &ParseOptions) -> Option<Self> {
        let obj = node.as_object(errs)?;
        let size = opt(&obj, "size", |n| n.as_f64_positive(errs));
        let enabled = opt(&obj, "enabled", |n| n.as_bool(errs));
        let extra = obj.extras(opts, errs);
        Some(Self {
            size: size?,
            enabled: enabled?,
            extra,
        })
    }

    fn with_defaults(self) -> Self {
        let Self {
            size,
            enabled,
            extra,
        } = self;
        Self {
            size: size.or(Some(defaults::BRUSH_SIZE)),
            enabled: enabled.or(Some(defaults::BRUSH_ENABLED)),
            extra,
        }
    }
}

/// Enable/disable toggle shared by the geocoder and coordinate displays.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct InteractionToggle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl InteractionToggle {
    fn parse(node: &Node<'_>, errs: &mut Errors, opts: &ParseOptions) -> Option<Self> {
        let obj = node.as_object(errs)?;
        let enabled = opt(&obj, "enabled", |n| n.as_bool(errs));
        let extra = obj.extras(opts, errs);
        Some(Self {
            enabled: enabled?,
            extra,
        })
    }

    fn with_defaults(self, default_enabled: bool) -> Self {
        let Self { enabled, extra } = self;
        Self {
            enabled: enabled.or(Some(default_enabled)),
            extra,
        }
    }
}

/// The interaction block: tooltip, brush, geocoder and coordinate display.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct InteractionConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<Tooltip>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brush: Option<Brush>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geocoder: Option<InteractionToggle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinate: Option<InteractionToggle>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl InteractionConfig {
    pub(crate) fn parse(node: &Node<'_>, errs: &mut Errors, opts: &ParseOptions) -> Option<Self> {
        let obj = node.as_object(errs)?;
        let tooltip = opt(&obj, "tooltip", |n| Tooltip::parse(&n, errs, opts));
        let brush = opt(&obj, "brush", |n| Brush::parse(&n, errs, opts));
        let geocoder = opt(&obj, "geocoder", |n| InteractionToggle::parse(&n, errs, opts));
        let coordinate = opt(&obj, "coordinate", |n| {
            InteractionToggle::parse(&n, errs, opts)
        });
        let extra = obj.extras(opts, errs);
        Some(Self {
            tooltip: tooltip?,
            brush: brush?,
            geocoder: geocoder?,
            coordinate: coordinate?,
            extra,
        })
    }

    pub fn with_defaults(self) -> Self {
        let Self {
            tooltip,
            brush,
            geocoder,
            coordinate,
            extra,
        } = self;
        Self {
            tooltip: Some(tooltip.unwrap_or_default().with_defaults()),
            brush: Some(brush.unwrap_or_default().with_defaults()),
            geocoder: Some(
                geocoder
                    .unwrap_or_default()
                    .with_defaults(defaults::GEOCODER_ENABLED),
            ),
            coordinate: Some(
                coordinate
                    .unwrap_or_default()
                    .with_defaults(defaults::COORDINATE_ENABLED),
            ),
            extra,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_omitted_brush_gets_documented_defaults() {
        let value = json!({
            "tooltip": { "enabled": true },
            "geocoder": { "enabled": false }
        });
        let mut errs = Errors::new();
        let parsed =
            InteractionConfig::parse(&Node::root(&value), &mut errs, &ParseOptions::default())
                .unwrap();
        assert!(errs.is_empty());
        assert!(parsed.brush.is_none());

        let merged = parsed.with_defaults();
        let brush = merged.brush.unwrap();
        assert_eq!(brush.size, Some(0.5));
        assert_eq!(brush.enabled, Some(false));
    }

    #[test]
    fn test_brush_size_must_be_positive() {
        let value = json!({ "brush": { "size": 0.0, "enabled": true } });
        let mut errs = Errors::new();
        InteractionConfig::parse(&Node::root(&value), &mut errs, &ParseOptions::default());
        assert_eq!(errs.list.len(), 1);
    }

    #[test]
    fn test_tooltip_fields_keep_null_formats() {
        let value = json!({
            "tooltip": {
                "fieldsToShow": {
                    "activity_changes": [
                        { "name": "count_A", "format": null },
                        { "name": "count_B" }
                    ]
                },
                "enabled": true
            }
        });
        let mut errs = Errors::new();
        let parsed =
            InteractionConfig::parse(&Node::root(&value), &mut errs, &ParseOptions::default())
                .unwrap();
        assert!(errs.is_empty());
        let tooltip = parsed.tooltip.unwrap();
        let fields = &tooltip.fields_to_show.as_ref().unwrap()["activity_changes"];
        assert!(fields[0].format.is_null());
        assert!(fields[1].format.is_absent());

        // Merge materializes the documented null default for absent formats.
        let merged = tooltip.with_defaults();
        let fields = &merged.fields_to_show.as_ref().unwrap()["activity_changes"];
        assert!(fields[1].format.is_null());
    }
}
