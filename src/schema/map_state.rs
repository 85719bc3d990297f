//! Camera pose
//!
//! Coordinates are WGS84 degrees. Bearing wraps at 360 so the wire value is
//! half-open; pitch is capped at the renderer-dependent 60 degrees.

use crate::defaults;
use crate::parse::{opt, Errors, Node, ParseOptions};
use serde::Serialize;
use serde_json::{Map, Value};

/// Maximum camera pitch in degrees.
pub const MAX_PITCH: f64 = 60.0;

#[derive(Debug, Clone, PartialEq, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct MapState {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bearing: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drag_rotate: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pitch: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zoom: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_split: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MapState {
    pub(crate) fn parse(node: &Node<'_>, errs: &mut Errors, opts: &ParseOptions) -> Option<Self> {
        let obj = node.as_object(errs)?;
        let bearing = opt(&obj, "bearing", |n| n.as_f64_below(0.0, 360.0, errs));
        let drag_rotate = opt(&obj, "dragRotate", |n| n.as_bool(errs));
        let latitude = opt(&obj, "latitude", |n| n.as_f64_in(-90.0, 90.0, errs));
        let longitude = opt(&obj, "longitude", |n| n.as_f64_in(-180.0, 180.0, errs));
        let pitch = opt(&obj, "pitch", |n| n.as_f64_in(0.0, MAX_PITCH, errs));
        let zoom = opt(&obj, "zoom", |n| n.as_f64_non_negative(errs));
        let is_split = opt(&obj, "isSplit", |n| n.as_bool(errs));
        let extra = obj.extras(opts, errs);
        Some(Self {
            bearing: bearing?,
            drag_rotate: drag_rotate?,
            latitude: latitude?,
            longitude: longitude?,
            pitch: pitch?,
            zoom: zoom?,
            is_split: is_split?,
            extra,
        })
    }

    pub fn with_defaults(self) -> Self {
        let Self {
            bearing,
            drag_rotate,
            latitude,
            longitude,
            pitch,
            zoom,
            is_split,
            extra,
        } = self;
        Self {
            bearing: bearing.or(Some(defaults::BEARING)),
            drag_rotate: drag_rotate.or(Some(defaults::DRAG_ROTATE)),
            latitude: latitude.or(Some(defaults::LATITUDE)),
            longitude: longitude.or(Some(defaults::LONGITUDE)),
            pitch: pitch.or(Some(defaults::PITCH)),
            zoom: zoom.or(Some(defaults::ZOOM)),
            is_split: is_split.or(Some(defaults::IS_SPLIT)),
            extra,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::StructuralErrorKind;
    use serde_json::json;

    fn parse(value: &Value) -> (Option<MapState>, Errors) {
        let mut errs = Errors::new();
        let state = MapState::parse(&Node::root(value), &mut errs, &ParseOptions::default());
        (state, errs)
    }

    #[test]
    fn test_sample_camera_pose_parses() {
        let value = json!({
            "bearing": 0,
            "dragRotate": false,
            "latitude": 41.95881451637651,
            "longitude": -71.02476870680071,
            "pitch": 0,
            "zoom": 7.792586400255164,
            "isSplit": false
        });
        let (state, errs) = parse(&value);
        assert!(errs.is_empty());
        let state = state.unwrap();
        assert_eq!(state.latitude, Some(41.95881451637651));
        assert_eq!(state.zoom, Some(7.792586400255164));
    }

    #[test]
    fn test_every_out_of_domain_value_is_reported() {
        let value = json!({
            "bearing": 360,
            "latitude": 91,
            "longitude": -200,
            "pitch": 75,
            "zoom": -1
        });
        let (state, errs) = parse(&value);
        assert!(state.is_none());
        assert_eq!(errs.list.len(), 5);
        assert!(errs.list.iter().any(|e| matches!(
            e.kind,
            StructuralErrorKind::OutOfRangeExclusive { value, .. } if value == 360.0
        )));
    }

    #[test]
    fn test_defaults_center_the_world_view() {
        let (state, _) = parse(&json!({}));
        let merged = state.unwrap().with_defaults();
        assert_eq!(merged.latitude, Some(0.0));
        assert_eq!(merged.longitude, Some(0.0));
        assert_eq!(merged.zoom, Some(0.0));
        assert_eq!(merged.drag_rotate, Some(false));
    }
}
