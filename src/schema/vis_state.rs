//! Visual state: filters, layers, interaction and playback settings

use crate::defaults;
use crate::errors::StructuralErrorKind;
use crate::parse::{opt, Errors, Node, ParseOptions};
use crate::primitives::Maybe;
use crate::schema::filter::Filter;
use crate::schema::interaction::InteractionConfig;
use crate::schema::layer::Layer;
use fxhash::FxHashSet;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// How overlapping layers composite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerBlending {
    Normal,
    Additive,
    Subtractive,
}

/// One split-map panel: which layers are visible on it.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct SplitMap {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layers: Option<BTreeMap<String, bool>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SplitMap {
    fn parse(node: &Node<'_>, errs: &mut Errors, opts: &ParseOptions) -> Option<Self> {
        let obj = node.as_object(errs)?;
        let layers = opt(&obj, "layers", |n| {
            let inner = n.as_object(errs)?;
            let mut flags = BTreeMap::new();
            let mut ok = true;
            for (layer_id, flag) in inner.entries() {
                let child = Node {
                    value: flag,
                    path: inner.path.key(layer_id),
                };
                match child.as_bool(errs) {
                    Some(flag) => {
                        flags.insert(layer_id.clone(), flag);
                    }
                    None => ok = false,
                }
            }
            ok.then_some(flags)
        });
        let extra = obj.extras(opts, errs);
        Some(Self {
            layers: layers?,
            extra,
        })
    }
}

/// Filter playback settings.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AnimationConfig {
    #[serde(skip_serializing_if = "Maybe::is_absent")]
    pub current_time: Maybe<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AnimationConfig {
    fn parse(node: &Node<'_>, errs: &mut Errors, opts: &ParseOptions) -> Option<Self> {
        let obj = node.as_object(errs)?;
        let current_time = obj.field("currentTime").map_value(|n| n.as_i64(errs));
        let speed = opt(&obj, "speed", |n| n.as_f64_positive(errs));
        let extra = obj.extras(opts, errs);
        Some(Self {
            current_time: current_time?,
            speed: speed?,
            extra,
        })
    }

    fn with_defaults(self) -> Self {
        let Self {
            current_time,
            speed,
            extra,
        } = self;
        Self {
            current_time: current_time.defaulted(Maybe::Null),
            speed: speed.or(Some(defaults::ANIMATION_SPEED)),
            extra,
        }
    }
}

/// The visual state block of the configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct VisState {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<Vec<Filter>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layers: Option<Vec<Layer>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interaction_config: Option<InteractionConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layer_blending: Option<LayerBlending>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub split_maps: Option<Vec<SplitMap>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub animation_config: Option<AnimationConfig>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Parses a list of id-carrying entities, rejecting duplicate ids.
fn entity_list<'a, T>(
    node: Node<'a>,
    errs: &mut Errors,
    parse: impl Fn(&Node<'a>, &mut Errors) -> Option<T>,
    id_of: impl Fn(&T) -> String,
) -> Option<Vec<T>> {
    let items = node.as_array(errs)?;
    let mut out = Vec::with_capacity(items.len());
    let mut seen: FxHashSet<String> = FxHashSet::default();
    let mut ok = true;
    for item in &items {
        match parse(item, errs) {
            Some(entity) => {
                let id = id_of(&entity);
                if !seen.insert(id.clone()) {
                    errs.push(item.path.key("id"), StructuralErrorKind::DuplicateId(id));
                    ok = false;
                }
                out.push(entity);
            }
            None => ok = false,
        }
    }
    ok.then_some(out)
}

impl VisState {
    pub(crate) fn parse(node: &Node<'_>, errs: &mut Errors, opts: &ParseOptions) -> Option<Self> {
        let obj = node.as_object(errs)?;
        let filters = opt(&obj, "filters", |n| {
            entity_list(
                n,
                errs,
                |item, errs| Filter::parse(item, errs, opts),
                |f| f.id.clone(),
            )
        });
        let layers = opt(&obj, "layers", |n| {
            entity_list(
                n,
                errs,
                |item, errs| Layer::parse(item, errs, opts),
                |l| l.id.clone(),
            )
        });
        let interaction_config = opt(&obj, "interactionConfig", |n| {
            InteractionConfig::parse(&n, errs, opts)
        });
        let layer_blending = opt(&obj, "layerBlending", |n| {
            n.enum_variant::<LayerBlending>(errs)
        });
        let split_maps = opt(&obj, "splitMaps", |n| {
            let items = n.as_array(errs)?;
            let parsed: Vec<Option<SplitMap>> = items
                .iter()
                .map(|item| SplitMap::parse(item, errs, opts))
                .collect();
            parsed.into_iter().collect()
        });
        let animation_config = opt(&obj, "animationConfig", |n| {
            AnimationConfig::parse(&n, errs, opts)
        });
        let extra = obj.extras(opts, errs);
        Some(Self {
            filters: filters?,
            layers: layers?,
            interaction_config: interaction_config?,
            layer_blending: layer_blending?,
            split_maps: split_maps?,
            animation_config: animation_config?,
            extra,
        })
    }

    pub fn with_defaults(self) -> Self {
        let Self {
            filters,
            layers,
            interaction_config,
            layer_blending,
            split_maps,
            animation_config,
            extra,
        } = self;
        Self {
            filters: Some(
                filters
                    .unwrap_or_default()
                    .into_iter()
                    .map(Filter::with_defaults)
                    .collect(),
            ),
            layers: Some(
                layers
                    .unwrap_or_default()
                    .into_iter()
                    .map(Layer::with_defaults)
                    .collect(),
            ),
            interaction_config: Some(interaction_config.unwrap_or_default().with_defaults()),
            layer_blending: layer_blending.or(Some(defaults::LAYER_BLENDING)),
            split_maps: Some(split_maps.unwrap_or_default()),
            animation_config: Some(animation_config.unwrap_or_default().with_defaults()),
            extra,
        }
    }
}
