//! Wire codec for the `{version, config}` envelope
//!
//! `decode` runs the version gate first, then total structural validation;
//! `encode` serializes the typed model straight back to the nested wire
//! shape. For any document `c` that decoded cleanly, `decode(encode(c))`
//! reproduces `c`; re-encoding a decoded wire value reproduces it up to key
//! ordering and numeric canonicalization (an integral number may come back
//! in float form).

use crate::errors::VersionError;
use crate::parse::{Errors, Node, ParseOptions};
use crate::schema::document::{ConfigDocument, MapConfig, SchemaVersion};
use crate::ConfigError;
use serde_json::Value;

fn check_version(raw: &Value) -> Result<SchemaVersion, VersionError> {
    let tag = match raw.get("version") {
        None => return Err(VersionError::Missing),
        Some(Value::String(tag)) => tag,
        Some(_) => return Err(VersionError::NotAString),
    };
    match tag.as_str() {
        "v1" => Ok(SchemaVersion::V1),
        other => Err(VersionError::Unsupported(other.to_string())),
    }
}

/// Decodes and validates a wire document.
///
/// Version errors surface before structural validation; structural errors
/// come back as one complete list. No partially-valid document is ever
/// returned.
pub fn decode(raw: &Value, opts: &ParseOptions) -> crate::Result<ConfigDocument> {
    let mut errs = Errors::new();
    let root = Node::root(raw);
    let obj = match root.as_object(&mut errs) {
        Some(obj) => obj,
        None => return Err(ConfigError::Structural(errs.list)),
    };

    let version = check_version(raw)?;
    let _ = obj.get("version");

    let config = obj
        .require("config", &mut errs)
        .and_then(|n| MapConfig::parse(&n, &mut errs, opts));
    let extra = obj.extras(opts, &mut errs);

    if !errs.is_empty() {
        return Err(ConfigError::Structural(errs.list));
    }
    let config = config.unwrap_or_default();

    log::debug!(
        "decoded {} configuration with {} layer(s), {} filter(s)",
        version,
        config
            .vis_state
            .as_ref()
            .and_then(|vs| vs.layers.as_ref())
            .map_or(0, Vec::len),
        config
            .vis_state
            .as_ref()
            .and_then(|vs| vs.filters.as_ref())
            .map_or(0, Vec::len),
    );
    Ok(ConfigDocument {
        version,
        config,
        extra,
    })
}

/// Decodes a JSON string; syntax errors surface as
/// [`ConfigError::Serialization`].
pub fn decode_str(raw: &str, opts: &ParseOptions) -> crate::Result<ConfigDocument> {
    let value: Value = serde_json::from_str(raw)?;
    decode(&value, opts)
}

/// Serializes a document back to its wire shape.
pub fn encode(doc: &ConfigDocument) -> crate::Result<Value> {
    Ok(serde_json::to_value(doc)?)
}

/// Serializes a document to a JSON string.
pub fn encode_string(doc: &ConfigDocument) -> crate::Result<String> {
    Ok(serde_json::to_string(doc)?)
}
