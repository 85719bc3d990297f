//! Data-driven filters
//!
//! A filter narrows what the bound layers render. Its `value` payload shape
//! is fixed by its `type` tag, so an invalid tag/payload combination is
//! unrepresentable after parsing.

use crate::defaults;
use crate::errors::StructuralErrorKind;
use crate::parse::{opt, Errors, Node, ObjectNode, ParseOptions};
use crate::primitives::{FieldRef, Maybe, OrderedRange};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Plot drawn in the filter panel for range-like filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PlotType {
    Histogram,
    LineChart,
}

/// Playback mode for animated time-range filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationWindow {
    Free,
    Incremental,
}

/// Filter constraint, tagged by the wire `type` key. The payload shape is
/// fixed per tag: range-like filters carry an ordered `[min, max]` pair,
/// `timeRange` values are epoch milliseconds (UTC).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum FilterValue {
    TimeRange(OrderedRange<i64>),
    Range(OrderedRange<f64>),
    Select(Value),
    MultiSelect(Vec<Value>),
    Input(String),
}

impl FilterValue {
    const TYPES: &'static str =
        "expected one of `timeRange`, `range`, `select`, `multiSelect`, `input`";

    pub(crate) fn parse(obj: &ObjectNode<'_>, errs: &mut Errors) -> Option<Self> {
        let tag_node = obj.require("type", errs);
        let value_node = obj.require("value", errs);
        let tag_node = tag_node?;
        let tag = tag_node.as_str(errs)?;
        let value = value_node?;
        match tag {
            "timeRange" => OrderedRange::parse_i64(&value, errs).map(Self::TimeRange),
            "range" => OrderedRange::parse_f64(&value, errs).map(Self::Range),
            "select" => Some(Self::Select(value.value.clone())),
            "multiSelect" => {
                let items = value.as_array(errs)?;
                Some(Self::MultiSelect(
                    items.into_iter().map(|n| n.value.clone()).collect(),
                ))
            }
            "input" => value.as_string(errs).map(Self::Input),
            other => {
                errs.push(
                    tag_node.path.clone(),
                    StructuralErrorKind::UnknownVariant(format!(
                        "unknown filter type `{}`, {}",
                        other,
                        Self::TYPES
                    )),
                );
                None
            }
        }
    }
}

/// A data-driven constraint applied before rendering.
///
/// `dataId` and `name` are paired arrays: `name[i]` is the column the filter
/// reads in dataset `dataId[i]`, so their lengths must match.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Filter {
    pub data_id: Vec<String>,
    pub id: String,
    pub name: Vec<String>,
    #[serde(flatten)]
    pub value: FilterValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enlarged: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plot_type: Option<PlotType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub animation_window: Option<AnimationWindow>,
    #[serde(skip_serializing_if = "Maybe::is_absent")]
    pub y_axis: Maybe<FieldRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn string_list(node: Node<'_>, errs: &mut Errors) -> Option<Vec<String>> {
    let items = node.as_array(errs)?;
    let parsed: Vec<Option<String>> = items.iter().map(|item| item.as_string(errs)).collect();
    parsed.into_iter().collect()
}

impl Filter {
    pub(crate) fn parse(node: &Node<'_>, errs: &mut Errors, opts: &ParseOptions) -> Option<Self> {
        let obj = node.as_object(errs)?;
        let data_id = obj
            .require("dataId", errs)
            .and_then(|n| string_list(n, errs));
        let id = obj.require("id", errs).and_then(|n| n.as_string(errs));
        let name = obj.require("name", errs).and_then(|n| string_list(n, errs));
        let value = FilterValue::parse(&obj, errs);
        let enlarged = opt(&obj, "enlarged", |n| n.as_bool(errs));
        let plot_type = opt(&obj, "plotType", |n| n.enum_variant::<PlotType>(errs));
        let animation_window = opt(&obj, "animationWindow", |n| {
            n.enum_variant::<AnimationWindow>(errs)
        });
        let y_axis = obj
            .field("yAxis")
            .map_value(|n| FieldRef::parse(&n, errs, opts));
        let speed = opt(&obj, "speed", |n| n.as_f64_positive(errs));

        let mut shape_ok = true;
        if let (Some(ids), Some(names)) = (&data_id, &name) {
            if ids.is_empty() {
                errs.push(obj.path.key("dataId"), StructuralErrorKind::EmptyDataIds);
                shape_ok = false;
            }
            if ids.len() != names.len() {
                errs.push(
                    obj.path.clone(),
                    StructuralErrorKind::LengthMismatch {
                        left: "name",
                        right: "dataId",
                        left_len: names.len(),
                        right_len: ids.len(),
                    },
                );
                shape_ok = false;
            }
        }

        let extra = obj.extras(opts, errs);
        if !shape_ok {
            return None;
        }
        Some(Self {
            data_id: data_id?,
            id: id?,
            name: name?,
            value: value?,
            enlarged: enlarged?,
            plot_type: plot_type?,
            animation_window: animation_window?,
            y_axis: y_axis?,
            speed: speed?,
            extra,
        })
    }

    /// Fills absent optional fields with their documented defaults.
    pub fn with_defaults(self) -> Self {
        let Self {
            data_id,
            id,
            name,
            value,
            enlarged,
            plot_type,
            animation_window,
            y_axis,
            speed,
            extra,
        } = self;
        Self {
            data_id,
            id,
            name,
            value,
            enlarged: enlarged.or(Some(defaults::FILTER_ENLARGED)),
            plot_type: plot_type.or(Some(defaults::FILTER_PLOT_TYPE)),
            animation_window: animation_window.or(Some(defaults::FILTER_ANIMATION_WINDOW)),
            y_axis: y_axis.defaulted(Maybe::Null),
            speed: speed.or(Some(defaults::FILTER_SPEED)),
            extra,
        }
    }
}
