//! Cross-reference resolution against a dataset schema
//!
//! Every non-null column reference in the configuration must name a column
//! of the dataset it is declared against. The caller supplies the dataset
//! schema as [`DatasetColumns`]; resolution is pure, reads it only, and
//! collects every failure instead of stopping at the first. A reference to
//! an unknown dataset and a reference to a missing column of a known dataset
//! are distinct error kinds.

use crate::errors::{ReferenceError, ReferenceErrorKind, ValuePath};
use crate::schema::document::ConfigDocument;
use crate::schema::filter::Filter;
use crate::schema::layer::Layer;
use crate::ConfigError;
use fxhash::{FxHashMap, FxHashSet};

/// Column sets per dataset id, supplied by the caller (dataset loading and
/// column inference live outside this crate).
pub type DatasetColumns = FxHashMap<String, FxHashSet<String>>;

struct Resolver<'a> {
    datasets: &'a DatasetColumns,
    errors: Vec<ReferenceError>,
}

impl<'a> Resolver<'a> {
    fn check_column(&mut self, entity_id: &str, data_id: &str, column: &str, path: ValuePath) {
        match self.datasets.get(data_id) {
            None => self.errors.push(ReferenceError {
                entity_id: entity_id.to_string(),
                path,
                kind: ReferenceErrorKind::UnknownDataset(data_id.to_string()),
            }),
            Some(columns) if !columns.contains(column) => self.errors.push(ReferenceError {
                entity_id: entity_id.to_string(),
                path,
                kind: ReferenceErrorKind::UnknownColumn {
                    data_id: data_id.to_string(),
                    column: column.to_string(),
                },
            }),
            Some(_) => {}
        }
    }

    fn layer(&mut self, layer: &Layer, path: ValuePath) {
        let data_id = &layer.config.data_id;

        let columns_path = path.key("config").key("columns");
        for (role, column) in &layer.config.columns {
            if let Some(column) = column {
                self.check_column(&layer.id, data_id, column, columns_path.key(role));
            }
        }

        if let Some(channels) = &layer.visual_channels {
            let channels_path = path.key("visualChannels");
            for (name, channel) in &channels.channels {
                if let Some(field) = channel.field.value() {
                    self.check_column(
                        &layer.id,
                        data_id,
                        &field.name,
                        channels_path.key(&format!("{}Field", name)),
                    );
                }
            }
        }

        if let Some(labels) = &layer.config.text_label {
            let labels_path = path.key("config").key("textLabel");
            for (i, label) in labels.iter().enumerate() {
                if let Some(field) = label.field.value() {
                    self.check_column(
                        &layer.id,
                        data_id,
                        &field.name,
                        labels_path.index(i).key("field"),
                    );
                }
            }
        }
    }

    fn filter(&mut self, filter: &Filter, path: ValuePath) {
        for (i, (data_id, column)) in filter.data_id.iter().zip(&filter.name).enumerate() {
            self.check_column(&filter.id, data_id, column, path.key("name").index(i));
        }
        if let Some(field) = filter.y_axis.value() {
            // yAxis reads from the filter's first dataset.
            if let Some(data_id) = filter.data_id.first() {
                self.check_column(&filter.id, data_id, &field.name, path.key("yAxis"));
            }
        }
    }

    fn tooltip(&mut self, doc: &ConfigDocument, path: ValuePath) {
        let tooltip = doc
            .config
            .vis_state
            .as_ref()
            .and_then(|vs| vs.interaction_config.as_ref())
            .and_then(|ic| ic.tooltip.as_ref());
        let Some(tooltip) = tooltip else {
            return;
        };
        let Some(fields_to_show) = &tooltip.fields_to_show else {
            return;
        };
        for (data_id, fields) in fields_to_show {
            let entry_path = path.key(data_id);
            for (i, field) in fields.iter().enumerate() {
                self.check_column(
                    "tooltip",
                    data_id,
                    &field.name,
                    entry_path.index(i).key("name"),
                );
            }
        }
    }
}

/// Checks every column/dataset reference in `doc` against `datasets`.
///
/// Returns `Err(ConfigError::Reference)` carrying the complete list of
/// failures. Succeeds on a document with no references at all.
pub fn resolve(doc: &ConfigDocument, datasets: &DatasetColumns) -> crate::Result<()> {
    let mut resolver = Resolver {
        datasets,
        errors: Vec::new(),
    };

    let root = ValuePath::root().key("config").key("visState");
    if let Some(vis_state) = &doc.config.vis_state {
        if let Some(layers) = &vis_state.layers {
            let layers_path = root.key("layers");
            for (i, layer) in layers.iter().enumerate() {
                resolver.layer(layer, layers_path.index(i));
            }
        }
        if let Some(filters) = &vis_state.filters {
            let filters_path = root.key("filters");
            for (i, filter) in filters.iter().enumerate() {
                resolver.filter(filter, filters_path.index(i));
            }
        }
    }
    resolver.tooltip(
        doc,
        root.key("interactionConfig").key("tooltip").key("fieldsToShow"),
    );

    if resolver.errors.is_empty() {
        log::debug!(
            "resolved configuration references against {} dataset(s)",
            datasets.len()
        );
        Ok(())
    } else {
        Err(ConfigError::Reference(resolver.errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::decode;
    use crate::parse::ParseOptions;
    use serde_json::json;

    fn activity_columns() -> DatasetColumns {
        let columns: FxHashSet<String> = [
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

    fn point_doc() -> ConfigDocument {
        let value = json!({
            "version": "v1",
            "config": {
                "visState": {
                    "layers": [{
                        "id": "du9qvv7",
                        "type": "point",
                        "config": {
                            "dataId": "activity_changes",
                            "columns": { "lat": "latitude", "lng": "longitude", "altitude": null }
                        },
                        "visualChannels": {
                            "colorField": { "name": "delta_count_[%]", "type": "real" },
                            "colorScale": "quantize"
                        }
                    }]
                }
            }
        });
        decode(&value, &ParseOptions::default()).unwrap()
    }

    #[test]
    fn test_sample_layer_resolves_cleanly() {
        assert!(resolve(&point_doc(), &activity_columns()).is_ok());
    }

    #[test]
    fn test_removed_column_yields_exactly_one_error() {
        let mut datasets = activity_columns();
        datasets
            .get_mut("activity_changes")
            .unwrap()
            .remove("longitude");

        let errors = match resolve(&point_doc(), &datasets).unwrap_err() {
            ConfigError::Reference(errors) => errors,
            err => panic!("expected reference errors, got {err}"),
        };
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].entity_id, "du9qvv7");
        assert!(matches!(
            &errors[0].kind,
            ReferenceErrorKind::UnknownColumn { column, .. } if column == "longitude"
        ));
    }

    #[test]
    fn test_unknown_dataset_is_a_distinct_error() {
        let datasets = DatasetColumns::default();
        let err = resolve(&point_doc(), &datasets).unwrap_err();
        let ConfigError::Reference(errors) = err else {
            panic!("expected reference errors");
        };
        // Both bound columns and the color field point at the missing
        // dataset; each reference reports it.
        assert!(!errors.is_empty());
        assert!(errors
            .iter()
            .all(|e| matches!(&e.kind, ReferenceErrorKind::UnknownDataset(id) if id == "activity_changes")));
    }

    #[test]
    fn test_null_references_are_skipped() {
        // The altitude role is bound to null; no error for it even though
        // no dataset has an "altitude" column.
        let errors = resolve(&point_doc(), &activity_columns());
        assert!(errors.is_ok());
    }

    #[test]
    fn test_filter_names_resolve_per_dataset() {
        let value = json!({
            "version": "v1",
            "config": {
                "visState": {
                    "filters": [{
                        "dataId": ["activity_changes"],
                        "id": "f1",
                        "name": ["hour"],
                        "type": "timeRange",
                        "value": [0, 10]
                    }]
                }
            }
        });
        let doc = decode(&value, &ParseOptions::default()).unwrap();
        let err = resolve(&doc, &activity_columns()).unwrap_err();
        let ConfigError::Reference(errors) = err else {
            panic!("expected reference errors");
        };
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].entity_id, "f1");
        assert!(errors[0].path.to_string().ends_with("name[0]"));
    }

    #[test]
    fn test_tooltip_fields_are_checked() {
        let value = json!({
            "version": "v1",
            "config": {
                "visState": {
                    "interactionConfig": {
                        "tooltip": {
                            "fieldsToShow": {
                                "activity_changes": [
                                    { "name": "count_A", "format": null },
                                    { "name": "missing_column", "format": null }
                                ]
                            },
                            "enabled": true
                        }
                    }
                }
            }
        });
        let doc = decode(&value, &ParseOptions::default()).unwrap();
        let err = resolve(&doc, &activity_columns()).unwrap_err();
        let ConfigError::Reference(errors) = err else {
            panic!("expected reference errors");
        };
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].entity_id, "tooltip");
        assert!(matches!(
            &errors[0].kind,
            ReferenceErrorKind::UnknownColumn { column, .. } if column == "missing_column"
        ));
    }
}
