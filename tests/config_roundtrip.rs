//! Integration tests driving the full pipeline against a real exported
//! point-map configuration document.

use mapconf::prelude::*;
use serde_json::json;

/// An activity-changes point map exported by a visualization UI: one time
/// filter, one point layer with diverging/sequential ramps, tooltip and
/// camera state.
const ACTIVITY_CONFIG: &str = r##"{
  "version": "v1",
  "config": {
    "visState": {
      "filters": [
        {
          "dataId": ["activity_changes"],
          "id": "g6kdxyjpk",
          "name": ["hour"],
          "type": "timeRange",
          "value": [-2208988800000, -2208985279000],
          "enlarged": true,
          "plotType": "histogram",
          "animationWindow": "free",
          "yAxis": null,
          "speed": 1
        }
      ],
      "layers": [
        {
          "id": "du9qvv7",
          "type": "point",
          "config": {
            "dataId": "activity_changes",
            "label": "Activity changes",
            "color": [231, 159, 213],
            "highlightColor": [252, 242, 26, 255],
            "columns": { "lat": "latitude", "lng": "longitude", "altitude": null },
            "isVisible": true,
            "visConfig": {
              "radius": 10,
              "fixedRadius": false,
              "opacity": 0.05,
              "outline": false,
              "thickness": 2,
              "strokeColor": null,
              "colorRange": {
                "name": "ColorBrewer RdYlGn-10",
                "type": "diverging",
                "category": "ColorBrewer",
                "colors": [
                  "#a50026", "#d73027", "#f46d43", "#fdae61", "#fee08b",
                  "#d9ef8b", "#a6d96a", "#66bd63", "#1a9850", "#006837"
                ]
              },
              "strokeColorRange": {
                "name": "Global Warming",
                "type": "sequential",
                "category": "Uber",
                "colors": ["#5A1846", "#900C3F", "#C70039", "#E3611C", "#F1920E", "#FFC300"]
              },
              "radiusRange": [0, 50],
              "filled": true
            },
            "hidden": false,
            "textLabel": [
              {
                "field": null,
                "color": [255, 255, 255],
                "size": 18,
                "offset": [0, 0],
                "anchor": "start",
                "alignment": "center"
              }
            ]
          },
          "visualChannels": {
            "colorField": { "name": "delta_count_[%]", "type": "real" },
            "colorScale": "quantize",
            "strokeColorField": null,
            "strokeColorScale": "quantile",
            "sizeField": null,
            "sizeScale": "linear"
          }
        }
      ],
      "interactionConfig": {
        "tooltip": {
          "fieldsToShow": {
            "activity_changes": [
              { "name": "count_A", "format": null },
              { "name": "count_B", "format": null },
              { "name": "delta_count", "format": null }
            ]
          },
          "compareMode": false,
          "compareType": "absolute",
          "enabled": true
        },
        "brush": { "size": 0.5, "enabled": false },
        "geocoder": { "enabled": false },
        "coordinate": { "enabled": true }
      },
      "layerBlending": "normal",
      "splitMaps": [],
      "animationConfig": { "currentTime": null, "speed": 1 }
    },
    "mapState": {
      "bearing": 0,
      "dragRotate": false,
      "latitude": 41.95881451637651,
      "longitude": -71.02476870680071,
      "pitch": 0,
      "zoom": 7.792586400255164,
      "isSplit": false
    },
    "mapStyle": {
      "styleType": "light",
      "topLayerGroups": { "road": true, "label": true },
      "visibleLayerGroups": {
        "label": true, "road": true, "border": false, "building": true,
        "water": true, "land": true, "3d building": false
      },
      "threeDBuildingColor": [218.82023004728686, 223.47597962276103, 223.47597962276103],
      "mapStyles": {}
    }
  }
}"##;

fn activity_datasets() -> DatasetColumns {
    let columns: HashSet<String> = [
        "hour",
        "latitude",
        "longitude",
        "count_A",
        "count_B",
        "delta_count",
        "delta_count_[%]",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    let mut datasets = DatasetColumns::default();
    datasets.insert("activity_changes".to_string(), columns);
    datasets
}

/// Normalizes every number to its f64 value so `5` and `5.0` compare equal;
/// re-encoding may canonicalize integral numbers into float form.
fn canonical(value: &Value) -> Value {
    match value {
        Value::Number(n) => json!(n.as_f64().expect("finite number")),
        Value::Array(items) => Value::Array(items.iter().map(canonical).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, value)| (key.clone(), canonical(value)))
                .collect(),
        ),
        other => other.clone(),
    }
}

#[test]
fn decodes_the_exported_document_without_errors() {
    let doc = decode_str(ACTIVITY_CONFIG, &ParseOptions::default()).expect("document is valid");

    let vis_state = doc.config.vis_state.as_ref().unwrap();
    assert_eq!(vis_state.filters.as_ref().unwrap().len(), 1);
    assert_eq!(vis_state.layers.as_ref().unwrap().len(), 1);

    let layer = &vis_state.layers.as_ref().unwrap()[0];
    assert_eq!(layer.kind, LayerKind::Point);
    assert_eq!(layer.config.data_id, "activity_changes");
    assert_eq!(layer.config.columns.get("altitude"), Some(&None));

    let vis_config = layer.config.vis_config.as_ref().unwrap();
    assert_eq!(vis_config.color_range.as_ref().unwrap().colors.len(), 10);
    assert_eq!(
        vis_config.stroke_color_range.as_ref().unwrap().colors.len(),
        6
    );
    assert!(vis_config.stroke_color.is_null());

    let filter = &vis_state.filters.as_ref().unwrap()[0];
    assert_eq!(filter.data_id.len(), filter.name.len());
    assert_eq!(
        filter.value,
        FilterValue::TimeRange(OrderedRange::new(-2208988800000, -2208985279000).unwrap())
    );
}

#[test]
fn wire_round_trip_preserves_the_document() {
    let doc = decode_str(ACTIVITY_CONFIG, &ParseOptions::default()).unwrap();

    // encode . decode is the identity on the typed model.
    let encoded = encode(&doc).unwrap();
    let reparsed = decode(&encoded, &ParseOptions::default()).unwrap();
    assert_eq!(reparsed, doc);

    // decode . encode reproduces the wire document up to numeric form.
    let original: Value = serde_json::from_str(ACTIVITY_CONFIG).unwrap();
    assert_eq!(canonical(&encoded), canonical(&original));
}

#[test]
fn resolves_against_the_dataset_schema() {
    let doc = decode_str(ACTIVITY_CONFIG, &ParseOptions::default()).unwrap();
    assert!(resolve(&doc, &activity_datasets()).is_ok());
}

#[test]
fn a_missing_column_is_reported_once_with_its_name() {
    let doc = decode_str(ACTIVITY_CONFIG, &ParseOptions::default()).unwrap();
    let mut datasets = activity_datasets();
    datasets
        .get_mut("activity_changes")
        .unwrap()
        .remove("longitude");

    let errors = match resolve(&doc, &datasets).unwrap_err() {
        ConfigError::Reference(errors) => errors,
        err => panic!("expected reference errors, got: {err}"),
    };
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].entity_id, "du9qvv7");
    assert!(matches!(
        &errors[0].kind,
        ReferenceErrorKind::UnknownColumn { data_id, column }
            if data_id == "activity_changes" && column == "longitude"
    ));
}

#[test]
fn merge_fills_documented_defaults_and_is_idempotent() {
    let partial = json!({
        "version": "v1",
        "config": {
            "visState": {
                "interactionConfig": {
                    "tooltip": { "enabled": true }
                }
            }
        }
    });
    let doc = decode(&partial, &ParseOptions::default()).unwrap();
    let merged = doc.with_defaults();

    let interaction = merged
        .config
        .vis_state
        .as_ref()
        .unwrap()
        .interaction_config
        .as_ref()
        .unwrap();
    let brush = interaction.brush.as_ref().unwrap();
    assert_eq!(brush.size, Some(0.5));
    assert_eq!(brush.enabled, Some(false));

    // Sibling presence does not change how absent fields default.
    let tooltip = interaction.tooltip.as_ref().unwrap();
    assert_eq!(tooltip.enabled, Some(true));
    assert_eq!(tooltip.compare_mode, Some(false));
    assert_eq!(tooltip.compare_type, Some(CompareType::Absolute));

    let map_state = merged.config.map_state.as_ref().unwrap();
    assert_eq!(map_state.zoom, Some(0.0));
    assert_eq!(map_state.bearing, Some(0.0));

    assert_eq!(merged.clone().with_defaults(), merged);
}

#[test]
fn merged_document_still_round_trips() {
    let doc = decode_str(ACTIVITY_CONFIG, &ParseOptions::default())
        .unwrap()
        .with_defaults();
    let encoded = encode(&doc).unwrap();
    let reparsed = decode(&encoded, &ParseOptions::default()).unwrap();
    assert_eq!(reparsed, doc);
}

#[test]
fn unsupported_version_wins_over_structural_errors() {
    let mut raw: Value = serde_json::from_str(ACTIVITY_CONFIG).unwrap();
    raw["version"] = json!("v2");
    raw["config"]["mapState"]["pitch"] = json!(999);

    let err = decode(&raw, &ParseOptions::default()).unwrap_err();
    assert!(matches!(
        err,
        ConfigError::Version(VersionError::Unsupported(ref tag)) if tag == "v2"
    ));
}

#[test]
fn ramp_length_parity_is_opt_in() {
    // The exported document legitimately mixes a 10-color ramp with a
    // 6-color stroke ramp; only the opt-in strictness flag rejects that.
    let strict_ramps = ParseOptions {
        matched_ramp_lengths: true,
        ..ParseOptions::default()
    };
    let err = decode_str(ACTIVITY_CONFIG, &strict_ramps).unwrap_err();
    let ConfigError::Structural(errors) = err else {
        panic!("expected structural errors");
    };
    assert!(errors.iter().any(|e| matches!(
        e.kind,
        StructuralErrorKind::RampLengthMismatch {
            color: 10,
            stroke: 6
        }
    )));

    assert!(decode_str(ACTIVITY_CONFIG, &ParseOptions::default()).is_ok());
}

#[test]
fn load_runs_the_full_pipeline() {
    let raw: Value = serde_json::from_str(ACTIVITY_CONFIG).unwrap();
    let doc = mapconf::load(&raw, &activity_datasets(), &ParseOptions::default()).unwrap();

    // Defaults are materialized after load.
    let vis_state = doc.config.vis_state.as_ref().unwrap();
    assert_eq!(vis_state.layer_blending, Some(LayerBlending::Normal));
    let layer = &vis_state.layers.as_ref().unwrap()[0];
    let channels = layer.visual_channels.as_ref().unwrap();
    assert_eq!(
        channels.channel("size").unwrap().scale,
        Some(ScaleType::Linear)
    );
}

#[test]
fn strict_mode_rejects_a_misspelled_key() {
    let mut raw: Value = serde_json::from_str(ACTIVITY_CONFIG).unwrap();
    let map_state = raw["config"]["mapState"].as_object_mut().unwrap();
    let zoom = map_state.remove("zoom").unwrap();
    map_state.insert("zoomm".to_string(), zoom);

    let err = decode(&raw, &ParseOptions::strict()).unwrap_err();
    let ConfigError::Structural(errors) = err else {
        panic!("expected structural errors");
    };
    assert!(errors.iter().any(
        |e| matches!(&e.kind, StructuralErrorKind::UnknownKey(key) if key == "zoomm")
    ));

    // Lenient mode keeps the stray key and re-emits it.
    let doc = decode(&raw, &ParseOptions::default()).unwrap();
    let encoded = encode(&doc).unwrap();
    assert_eq!(encoded["config"]["mapState"]["zoomm"], json!(7.792586400255164));
}
