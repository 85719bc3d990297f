//! Basemap style selection
//!
//! `mapStyles` is an opaque pass-through bag: basemap providers add
//! provider-specific keys, so it is preserved verbatim rather than typed.

use crate::defaults;
use crate::parse::{opt, Errors, Node, ParseOptions};
use crate::primitives::FloatColor;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Built-in basemap style presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BasemapStyle {
    Dark,
    Light,
    Muted,
    MutedNight,
    Satellite,
}

#[derive(Debug, Clone, PartialEq, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct MapStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style_type: Option<BasemapStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_layer_groups: Option<BTreeMap<String, bool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible_layer_groups: Option<BTreeMap<String, bool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub three_d_building_color: Option<FloatColor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map_styles: Option<Map<String, Value>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn parse_group_flags(node: Node<'_>, errs: &mut Errors) -> Option<BTreeMap<String, bool>> {
    let obj = node.as_object(errs)?;
    let mut groups = BTreeMap::new();
    let mut ok = true;
    for (group, flag) in obj.entries() {
        let child = Node {
            value: flag,
            path: obj.path.key(group),
        };
        match child.as_bool(errs) {
            Some(flag) => {
                groups.insert(group.clone(), flag);
            }
            None => ok = false,
        }
    }
    ok.then_some(groups)
}

impl MapStyle {
    pub(crate) fn parse(node: &Node<'_>, errs: &mut Errors, opts: &ParseOptions) -> Option<Self> {
        let obj = node.as_object(errs)?;
        let style_type = opt(&obj, "styleType", |n| n.enum_variant::<BasemapStyle>(errs));
        let top_layer_groups = opt(&obj, "topLayerGroups", |n| parse_group_flags(n, errs));
        let visible_layer_groups = opt(&obj, "visibleLayerGroups", |n| parse_group_flags(n, errs));
        let three_d_building_color = opt(&obj, "threeDBuildingColor", |n| {
            FloatColor::parse(&n, errs)
        });
        let map_styles = opt(&obj, "mapStyles", |n| {
            n.as_object(errs).map(|o| o.extras_opaque())
        });
        let extra = obj.extras(opts, errs);
        Some(Self {
            style_type: style_type?,
            top_layer_groups: top_layer_groups?,
            visible_layer_groups: visible_layer_groups?,
            three_d_building_color: three_d_building_color?,
            map_styles: map_styles?,
            extra,
        })
    }

    pub fn with_defaults(self) -> Self {
        let Self {
            style_type,
            top_layer_groups,
            visible_layer_groups,
            three_d_building_color,
            map_styles,
            extra,
        } = self;
        Self {
            style_type: style_type.or(Some(defaults::STYLE_TYPE)),
            top_layer_groups: top_layer_groups.or_else(|| Some(BTreeMap::new())),
            visible_layer_groups: visible_layer_groups.or_else(|| Some(BTreeMap::new())),
            three_d_building_color: three_d_building_color
                .or(Some(defaults::THREE_D_BUILDING_COLOR)),
            map_styles: map_styles.or_else(|| Some(Map::new())),
            extra,
        }
    }
}
