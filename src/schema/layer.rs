//! Renderable layers
//!
//! A layer binds one dataset to a set of column-to-visual-channel mappings.
//! The layer kind fixes which column roles exist; the wire shape of
//! `visualChannels` is flat `<name>Field`/`<name>Scale` key pairs which the
//! model groups into per-channel entries.

use crate::defaults;
use crate::errors::StructuralErrorKind;
use crate::parse::{json_type, opt, Errors, Node, ParseOptions};
use crate::schema::color_range::ColorRange;
use crate::primitives::{Color, FieldRef, Maybe, OrderedRange};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Supported layer kinds. Each kind fixes its set of column roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    Point,
    Arc,
    Line,
    Grid,
    Hexagon,
    Heatmap,
    Geojson,
    Icon,
    Cluster,
}

impl LayerKind {
    /// Column roles that must be present for this kind (their value may
    /// still be `null`, meaning "not yet bound").
    pub fn required_columns(&self) -> &'static [&'static str] {
        match self {
            LayerKind::Point | LayerKind::Grid | LayerKind::Hexagon | LayerKind::Heatmap
            | LayerKind::Cluster => &["lat", "lng"],
            LayerKind::Arc | LayerKind::Line => &["lat0", "lng0", "lat1", "lng1"],
            LayerKind::Geojson => &["geojson"],
            LayerKind::Icon => &["lat", "lng", "icon"],
        }
    }

    /// Column roles this kind understands beyond the required set.
    pub fn optional_columns(&self) -> &'static [&'static str] {
        match self {
            LayerKind::Point | LayerKind::Icon => &["altitude"],
            _ => &[],
        }
    }

    fn knows_role(&self, role: &str) -> bool {
        self.required_columns().contains(&role) || self.optional_columns().contains(&role)
    }
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayerKind::Point => write!(f, "point"),
            LayerKind::Arc => write!(f, "arc"),
            LayerKind::Line => write!(f, "line"),
            LayerKind::Grid => write!(f, "grid"),
            LayerKind::Hexagon => write!(f, "hexagon"),
            LayerKind::Heatmap => write!(f, "heatmap"),
            LayerKind::Geojson => write!(f, "geojson"),
            LayerKind::Icon => write!(f, "icon"),
            LayerKind::Cluster => write!(f, "cluster"),
        }
    }
}

/// Mapping from column role to bound column name. A `None` value is the wire
/// `null`: the role exists but no column is bound.
pub type LayerColumns = BTreeMap<String, Option<String>>;

/// Scale function mapping data values to a visual property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScaleType {
    Linear,
    Sqrt,
    Log,
    Quantize,
    Quantile,
    Ordinal,
}

/// One visual channel: the bound field (if any) and its scale.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VisualChannel {
    pub field: Maybe<FieldRef>,
    pub scale: Option<ScaleType>,
}

/// Channel map keyed by channel name (`color`, `strokeColor`, `size`, ...).
///
/// Serializes back to the flat `<name>Field`/`<name>Scale` wire pairs.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VisualChannels {
    pub channels: BTreeMap<String, VisualChannel>,
    pub extra: Map<String, Value>,
}

impl VisualChannels {
    pub fn channel(&self, name: &str) -> Option<&VisualChannel> {
        self.channels.get(name)
    }

    pub(crate) fn parse(node: &Node<'_>, errs: &mut Errors, opts: &ParseOptions) -> Option<Self> {
        let obj = node.as_object(errs)?;
        let mut channels: BTreeMap<String, VisualChannel> = BTreeMap::new();
        let mut extra = Map::new();
        for (key, value) in obj.entries() {
            let child = Node {
                value,
                path: obj.path.key(key),
            };
            if let Some(name) = key.strip_suffix("Field").filter(|n| !n.is_empty()) {
                let field = if value.is_null() {
                    Some(Maybe::Null)
                } else {
                    FieldRef::parse(&child, errs, opts).map(Maybe::Value)
                };
                if let Some(field) = field {
                    channels.entry(name.to_string()).or_default().field = field;
                }
            } else if let Some(name) = key.strip_suffix("Scale").filter(|n| !n.is_empty()) {
                if let Some(scale) = child.enum_variant::<ScaleType>(errs) {
                    channels.entry(name.to_string()).or_default().scale = Some(scale);
                }
            } else if opts.strict {
                errs.push(
                    obj.path.clone(),
                    StructuralErrorKind::UnknownKey(key.clone()),
                );
            } else {
                extra.insert(key.clone(), value.clone());
            }
        }
        Some(Self { channels, extra })
    }

    /// Fills absent fields with `null` and absent scales with the channel's
    /// documented default scale.
    pub fn with_defaults(self) -> Self {
        let channels = self
            .channels
            .into_iter()
            .map(|(name, channel)| {
                let scale = channel
                    .scale
                    .or(Some(defaults::scale_for_channel(&name)));
                let field = channel.field.defaulted(Maybe::Null);
                (name, VisualChannel { field, scale })
            })
            .collect();
        Self {
            channels,
            extra: self.extra,
        }
    }
}

impl Serialize for VisualChannels {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for (name, channel) in &self.channels {
            if !channel.field.is_absent() {
                map.serialize_entry(&format!("{}Field", name), &channel.field)?;
            }
            if let Some(scale) = &channel.scale {
                map.serialize_entry(&format!("{}Scale", name), scale)?;
            }
        }
        for (key, value) in &self.extra {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Horizontal anchor of a text label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelAnchor {
    Start,
    Middle,
    End,
}

/// Vertical alignment of a text label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelAlignment {
    Top,
    Center,
    Bottom,
}

/// One text label drawn next to rendered features.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TextLabel {
    #[serde(skip_serializing_if = "Maybe::is_absent")]
    pub field: Maybe<FieldRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<[f64; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchor: Option<LabelAnchor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alignment: Option<LabelAlignment>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn parse_offset(node: Node<'_>, errs: &mut Errors) -> Option<[f64; 2]> {
    let items = node.as_array(errs)?;
    if items.len() != 2 {
        errs.push(
            node.path.clone(),
            StructuralErrorKind::WrongType {
                expected: "an [x, y] pair",
                found: "array",
            },
        );
        return None;
    }
    let (x, y) = (items[0].as_f64(errs), items[1].as_f64(errs));
    Some([x?, y?])
}

impl TextLabel {
    pub(crate) fn parse(node: &Node<'_>, errs: &mut Errors, opts: &ParseOptions) -> Option<Self> {
        let obj = node.as_object(errs)?;
        let field = obj
            .field("field")
            .map_value(|n| FieldRef::parse(&n, errs, opts));
        let color = opt(&obj, "color", |n| Color::parse(&n, errs));
        let size = opt(&obj, "size", |n| n.as_f64_positive(errs));
        let offset = opt(&obj, "offset", |n| parse_offset(n, errs));
        let anchor = opt(&obj, "anchor", |n| n.enum_variant::<LabelAnchor>(errs));
        let alignment = opt(&obj, "alignment", |n| n.enum_variant::<LabelAlignment>(errs));
        let extra = obj.extras(opts, errs);
        Some(Self {
            field: field?,
            color: color?,
            size: size?,
            offset: offset?,
            anchor: anchor?,
            alignment: alignment?,
            extra,
        })
    }

    pub fn with_defaults(self) -> Self {
        let Self {
            field,
            color,
            size,
            offset,
            anchor,
            alignment,
            extra,
        } = self;
        Self {
            field: field.defaulted(Maybe::Null),
            color: color.or(Some(defaults::TEXT_LABEL_COLOR)),
            size: size.or(Some(defaults::TEXT_LABEL_SIZE)),
            offset: offset.or(Some(defaults::TEXT_LABEL_OFFSET)),
            anchor: anchor.or(Some(defaults::TEXT_LABEL_ANCHOR)),
            alignment: alignment.or(Some(defaults::TEXT_LABEL_ALIGNMENT)),
            extra,
        }
    }
}

/// Style knobs for a layer. The knob set is open: the knobs below are typed
/// and validated, anything else passes through opaquely in `extra` (per-kind
/// knob vocabularies vary by renderer version).
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct VisConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixed_radius: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outline: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thickness: Option<f64>,
    #[serde(skip_serializing_if = "Maybe::is_absent")]
    pub stroke_color: Maybe<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_range: Option<ColorRange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_color_range: Option<ColorRange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius_range: Option<OrderedRange<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filled: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl VisConfig {
    pub(crate) fn parse(node: &Node<'_>, errs: &mut Errors, opts: &ParseOptions) -> Option<Self> {
        let obj = node.as_object(errs)?;
        let radius = opt(&obj, "radius", |n| n.as_f64_positive(errs));
        let fixed_radius = opt(&obj, "fixedRadius", |n| n.as_bool(errs));
        let opacity = opt(&obj, "opacity", |n| n.as_f64_in(0.0, 1.0, errs));
        let outline = opt(&obj, "outline", |n| n.as_bool(errs));
        let thickness = opt(&obj, "thickness", |n| n.as_f64_positive(errs));
        let stroke_color = obj
            .field("strokeColor")
            .map_value(|n| Color::parse(&n, errs));
        let color_range = opt(&obj, "colorRange", |n| ColorRange::parse(&n, errs, opts));
        let stroke_color_range = opt(&obj, "strokeColorRange", |n| {
            ColorRange::parse(&n, errs, opts)
        });
        let radius_range = opt(&obj, "radiusRange", |n| {
            OrderedRange::parse_f64(&n, errs)
        });
        let filled = opt(&obj, "filled", |n| n.as_bool(errs));

        let mut shape_ok = true;
        if opts.matched_ramp_lengths {
            if let (Some(Some(color)), Some(Some(stroke))) = (&color_range, &stroke_color_range) {
                if color.colors.len() != stroke.colors.len() {
                    errs.push(
                        obj.path.clone(),
                        StructuralErrorKind::RampLengthMismatch {
                            color: color.colors.len(),
                            stroke: stroke.colors.len(),
                        },
                    );
                    shape_ok = false;
                }
            }
        }

        let extra = obj.extras_opaque();
        if !shape_ok {
            return None;
        }
        Some(Self {
            radius: radius?,
            fixed_radius: fixed_radius?,
            opacity: opacity?,
            outline: outline?,
            thickness: thickness?,
            stroke_color: stroke_color?,
            color_range: color_range?,
            stroke_color_range: stroke_color_range?,
            radius_range: radius_range?,
            filled: filled?,
            extra,
        })
    }

    pub fn with_defaults(self) -> Self {
        let Self {
            radius,
            fixed_radius,
            opacity,
            outline,
            thickness,
            stroke_color,
            color_range,
            stroke_color_range,
            radius_range,
            filled,
            extra,
        } = self;
        Self {
            radius: radius.or(Some(defaults::RADIUS)),
            fixed_radius: fixed_radius.or(Some(defaults::FIXED_RADIUS)),
            opacity: opacity.or(Some(defaults::OPACITY)),
            outline: outline.or(Some(defaults::OUTLINE)),
            thickness: thickness.or(Some(defaults::THICKNESS)),
            stroke_color: stroke_color.defaulted(Maybe::Null),
            color_range: color_range.or_else(|| Some(defaults::DEFAULT_COLOR_RANGE.clone())),
            stroke_color_range: stroke_color_range
                .or_else(|| Some(defaults::DEFAULT_COLOR_RANGE.clone())),
            radius_range: radius_range.or(Some(defaults::RADIUS_RANGE)),
            filled: filled.or(Some(defaults::FILLED)),
            extra,
        }
    }
}

/// Kind-specific configuration of a layer: the bound dataset, base styling
/// and the column role bindings.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerConfig {
    pub data_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(skip_serializing_if = "Maybe::is_absent")]
    pub highlight_color: Maybe<Color>,
    pub columns: LayerColumns,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_visible: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vis_config: Option<VisConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hidden: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_label: Option<Vec<TextLabel>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn parse_columns(
    node: Node<'_>,
    kind: Option<LayerKind>,
    errs: &mut Errors,
) -> Option<LayerColumns> {
    let obj = node.as_object(errs)?;
    let mut columns = LayerColumns::new();
    let mut ok = true;
    for (role, value) in obj.entries() {
        if let Some(kind) = kind {
            if !kind.knows_role(role) {
                errs.push(
                    obj.path.key(role),
                    StructuralErrorKind::UnknownColumnRole {
                        role: role.clone(),
                        kind: kind.to_string(),
                    },
                );
                ok = false;
                continue;
            }
        }
        match value {
            Value::Null => {
                columns.insert(role.clone(), None);
            }
            Value::String(name) => {
                columns.insert(role.clone(), Some(name.clone()));
            }
            other => {
                errs.push(
                    obj.path.key(role),
                    StructuralErrorKind::WrongType {
                        expected: "column name or null",
                        found: json_type(other),
                    },
                );
                ok = false;
            }
        }
    }
    if let Some(kind) = kind {
        for role in kind.required_columns() {
            if !obj.contains(role) {
                errs.push(
                    obj.path.clone(),
                    StructuralErrorKind::MissingKey(role.to_string()),
                );
                ok = false;
            }
        }
    }
    ok.then_some(columns)
}

impl LayerConfig {
    pub(crate) fn parse(
        node: &Node<'_>,
        kind: Option<LayerKind>,
        errs: &mut Errors,
        opts: &ParseOptions,
    ) -> Option<Self> {
        let obj = node.as_object(errs)?;
        let data_id = obj.require("dataId", errs).and_then(|n| n.as_string(errs));
        let label = opt(&obj, "label", |n| n.as_string(errs));
        let color = opt(&obj, "color", |n| Color::parse(&n, errs));
        let highlight_color = obj
            .field("highlightColor")
            .map_value(|n| Color::parse(&n, errs));
        let columns = obj
            .require("columns", errs)
            .and_then(|n| parse_columns(n, kind, errs));
        let is_visible = opt(&obj, "isVisible", |n| n.as_bool(errs));
        let vis_config = opt(&obj, "visConfig", |n| VisConfig::parse(&n, errs, opts));
        let hidden = opt(&obj, "hidden", |n| n.as_bool(errs));
        let text_label = opt(&obj, "textLabel", |n| {
            let items = n.as_array(errs)?;
            let parsed: Vec<Option<TextLabel>> = items
                .iter()
                .map(|item| TextLabel::parse(item, errs, opts))
                .collect();
            parsed.into_iter().collect()
        });
        let extra = obj.extras(opts, errs);
        Some(Self {
            data_id: data_id?,
            label: label?,
            color: color?,
            highlight_color: highlight_color?,
            columns: columns?,
            is_visible: is_visible?,
            vis_config: vis_config?,
            hidden: hidden?,
            text_label: text_label?,
            extra,
        })
    }

    fn with_defaults(self, kind: LayerKind) -> Self {
        let Self {
            data_id,
            label,
            color,
            highlight_color,
            mut columns,
            is_visible,
            vis_config,
            hidden,
            text_label,
            extra,
        } = self;
        for role in kind.optional_columns() {
            columns.entry(role.to_string()).or_insert(None);
        }
        Self {
            data_id,
            label: label.or_else(|| Some(defaults::LAYER_LABEL.to_string())),
            color: color.or(Some(defaults::LAYER_COLOR)),
            highlight_color: highlight_color.defaulted(Maybe::Value(defaults::HIGHLIGHT_COLOR)),
            columns,
            is_visible: is_visible.or(Some(defaults::IS_VISIBLE)),
            vis_config: Some(vis_config.unwrap_or_default().with_defaults()),
            hidden: hidden.or(Some(defaults::HIDDEN)),
            text_label: Some(
                text_label
                    .unwrap_or_default()
                    .into_iter()
                    .map(TextLabel::with_defaults)
                    .collect(),
            ),
            extra,
        }
    }
}

/// One renderable visual element bound to a dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Layer {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: LayerKind,
    pub config: LayerConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visual_channels: Option<VisualChannels>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Layer {
    pub(crate) fn parse(node: &Node<'_>, errs: &mut Errors, opts: &ParseOptions) -> Option<Self> {
        let obj = node.as_object(errs)?;
        let id = obj.require("id", errs).and_then(|n| n.as_string(errs));
        let kind = obj
            .require("type", errs)
            .and_then(|n| n.enum_variant::<LayerKind>(errs));
        let config = obj
            .require("config", errs)
            .and_then(|n| LayerConfig::parse(&n, kind, errs, opts));
        let visual_channels = opt(&obj, "visualChannels", |n| {
            VisualChannels::parse(&n, errs, opts)
        });
        let extra = obj.extras(opts, errs);
        Some(Self {
            id: id?,
            kind: kind?,
            config: config?,
            visual_channels: visual_channels?,
            extra,
        })
    }

    pub fn with_defaults(self) -> Self {
        let Self {
            id,
            kind,
            config,
            visual_channels,
            extra,
        } = self;
        Self {
            id,
            kind,
            config: config.with_defaults(kind),
            visual_channels: Some(visual_channels.unwrap_or_default().with_defaults()),
            extra,
        }
    }
}
