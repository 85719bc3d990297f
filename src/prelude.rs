//! Prelude module for common mapconf types
//!
//! This module re-exports the most commonly used types and functions for
//! easy importing with `use mapconf::prelude::*;`

pub use crate::primitives::{
    color::{Color, FloatColor, HexColor},
    field::{FieldKind, FieldRef, Maybe},
    range::OrderedRange,
};

pub use crate::schema::{
    color_range::{ColorRange, RampType},
    document::{ConfigDocument, MapConfig, SchemaVersion},
    filter::{AnimationWindow, Filter, FilterValue, PlotType},
    interaction::{Brush, CompareType, InteractionConfig, InteractionToggle, Tooltip, TooltipField},
    layer::{
        LabelAlignment, LabelAnchor, Layer, LayerColumns, LayerConfig, LayerKind, ScaleType,
        TextLabel, VisConfig, VisualChannel, VisualChannels,
    },
    map_state::MapState,
    map_style::{BasemapStyle, MapStyle},
    vis_state::{AnimationConfig, LayerBlending, SplitMap, VisState},
};

pub use crate::codec::{decode, decode_str, encode, encode_string};
pub use crate::errors::{
    ReferenceError, ReferenceErrorKind, StructuralError, StructuralErrorKind, ValuePath,
    VersionError,
};
pub use crate::resolve::{resolve, DatasetColumns};

pub use crate::{load, ConfigError, ParseOptions, Result};

pub use serde_json::Value;

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet, FxHasher};
