//! # Mapconf
//!
//! Schema validation and round-trip codec for map visualization
//! configurations: the nested `{version, config}` documents that describe
//! filters, layers, interaction settings, camera pose and basemap style for
//! a rendering consumer.
//!
//! The crate performs no rendering and no I/O. It takes a raw
//! [`serde_json::Value`], validates it totally (every diagnostic collected
//! in one pass), resolves column references against a caller-supplied
//! dataset schema, fills documented defaults, and serializes back to the
//! original wire shape.
//!
//! ```
//! use mapconf::prelude::*;
//! use serde_json::json;
//!
//! let raw = json!({
//!     "version": "v1",
//!     "config": {
//!         "visState": {
//!             "layers": [{
//!                 "id": "stops",
//!                 "type": "point",
//!                 "config": {
//!                     "dataId": "transit",
//!                     "columns": { "lat": "stop_lat", "lng": "stop_lon" }
//!                 }
//!             }]
//!         }
//!     }
//! });
//!
//! let mut datasets = DatasetColumns::default();
//! datasets.insert(
//!     "transit".to_string(),
//!     ["stop_lat", "stop_lon"].iter().map(|s| s.to_string()).collect(),
//! );
//!
//! let doc = mapconf::load(&raw, &datasets, &ParseOptions::default())?;
//! assert_eq!(doc.version.as_str(), "v1");
//! # Ok::<(), mapconf::ConfigError>(())
//! ```

pub mod codec;
pub mod defaults;
pub mod errors;
pub mod prelude;
pub mod primitives;
pub mod resolve;
pub mod schema;

mod parse;

pub use crate::parse::ParseOptions;

// Re-export public API
pub use codec::{decode, decode_str, encode, encode_string};
pub use errors::{
    ReferenceError, ReferenceErrorKind, StructuralError, StructuralErrorKind, ValuePath,
    VersionError,
};
pub use resolve::{resolve, DatasetColumns};
pub use schema::{ConfigDocument, MapConfig, SchemaVersion};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("configuration version error: {0}")]
    Version(#[from] errors::VersionError),

    #[error("configuration failed structural validation ({} error(s))", .0.len())]
    Structural(Vec<errors::StructuralError>),

    #[error("configuration failed reference resolution ({} error(s))", .0.len())]
    Reference(Vec<errors::ReferenceError>),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Decodes, resolves and defaults a wire document in one pass: the full
/// pipeline a rendering consumer runs before it touches the configuration.
pub fn load(
    raw: &serde_json::Value,
    datasets: &DatasetColumns,
    opts: &ParseOptions,
) -> Result<ConfigDocument> {
    let doc = decode(raw, opts)?;
    resolve(&doc, datasets)?;
    Ok(doc.with_defaults())
}
