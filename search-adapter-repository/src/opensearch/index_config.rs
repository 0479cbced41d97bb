//! Index settings and mapping bodies.
//!
//! This module builds the request bodies used to create the index and to
//! update an existing one from the configured `IndexSettings`.

use serde_json::{json, Map, Value};

use crate::config::IndexSettings;

/// Get the create-index body for the configured index.
///
/// The backend is typeless, so the `properties` of every configured type are
/// merged into a single mapping. Other top-level mapping keys keep the value
/// of the first type that sets them.
pub fn create_index_body(settings: &IndexSettings) -> Value {
    let mut index_settings = Map::new();
    index_settings.insert("number_of_shards".to_string(), json!(settings.number_of_shards));
    index_settings.insert(
        "number_of_replicas".to_string(),
        json!(settings.number_of_replicas),
    );
    if let Some(analysis) = &settings.analysis {
        index_settings.insert("analysis".to_string(), analysis.clone());
    }

    let mut body = Map::new();
    body.insert("settings".to_string(), Value::Object(index_settings));
    if !settings.mappings.is_empty() {
        body.insert("mappings".to_string(), merged_mappings(&settings.mappings));
    }

    Value::Object(body)
}

/// Get the settings body applied to an existing (closed) index.
///
/// Returns `None` when no analysis is configured.
pub fn analysis_settings_body(settings: &IndexSettings) -> Option<Value> {
    settings
        .analysis
        .as_ref()
        .map(|analysis| json!({ "analysis": analysis }))
}

fn merged_mappings(mappings: &Map<String, Value>) -> Value {
    let mut merged = Map::new();
    let mut properties = Map::new();

    for definition in mappings.values() {
        let Some(definition) = definition.as_object() else {
            continue;
        };

        for (key, value) in definition {
            if key == "properties" {
                if let Some(fields) = value.as_object() {
                    for (field, mapping) in fields {
                        properties.insert(field.clone(), mapping.clone());
                    }
                }
            } else if !merged.contains_key(key) {
                merged.insert(key.clone(), value.clone());
            }
        }
    }

    merged.insert("properties".to_string(), Value::Object(properties));
    Value::Object(merged)
}
