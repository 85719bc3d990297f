//! The `{version, config}` document envelope

use crate::parse::{opt, Errors, Node, ParseOptions};
use crate::schema::map_state::MapState;
use crate::schema::map_style::MapStyle;
use crate::schema::vis_state::VisState;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;

/// Schema version tag. Structural rules are version-specific, so an unknown
/// tag is rejected before any other validation runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaVersion {
    V1,
}

impl SchemaVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaVersion::V1 => "v1",
        }
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The configuration body: visual state, camera pose and basemap style.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct MapConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vis_state: Option<VisState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map_state: Option<MapState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map_style: Option<MapStyle>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MapConfig {
    pub(crate) fn parse(node: &Node<'_>, errs: &mut Errors, opts: &ParseOptions) -> Option<Self> {
        let obj = node.as_object(errs)?;
        let vis_state = opt(&obj, "visState", |n| VisState::parse(&n, errs, opts));
        let map_state = opt(&obj, "mapState", |n| MapState::parse(&n, errs, opts));
        let map_style = opt(&obj, "mapStyle", |n| MapStyle::parse(&n, errs, opts));
        let extra = obj.extras(opts, errs);
        Some(Self {
            vis_state: vis_state?,
            map_state: map_state?,
            map_style: map_style?,
            extra,
        })
    }

    pub fn with_defaults(self) -> Self {
        let Self {
            vis_state,
            map_state,
            map_style,
            extra,
        } = self;
        Self {
            vis_state: Some(vis_state.unwrap_or_default().with_defaults()),
            map_state: Some(map_state.unwrap_or_default().with_defaults()),
            map_style: Some(map_style.unwrap_or_default().with_defaults()),
            extra,
        }
    }
}

/// A validated configuration document.
///
/// Immutable by discipline: validation constructs it once and edits produce a
/// new validated value, so a consumer never observes a partially-invalid
/// state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfigDocument {
    pub version: SchemaVersion,
    pub config: MapConfig,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ConfigDocument {
    /// Fills every omitted optional field with its documented default.
    ///
    /// Field-local: a present parent with some children set does not change
    /// how its absent siblings default. Explicit `null` is never replaced.
    /// Idempotent.
    pub fn with_defaults(self) -> Self {
        let Self {
            version,
            config,
            extra,
        } = self;
        Self {
            version,
            config: config.with_defaults(),
            extra,
        }
    }
}
