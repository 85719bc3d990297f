//! Typed entity definitions for the configuration document
//!
//! Each entity owns its parser (total, error-collecting) and its defaults
//! merge. Serialization back to the wire shape is derived, so the typed model
//! is the single source of truth for key names.

pub mod color_range;
pub mod document;
pub mod filter;
pub mod interaction;
pub mod layer;
pub mod map_state;
pub mod map_style;
pub mod vis_state;

pub use color_range::{ColorRange, RampType};
pub use document::{ConfigDocument, MapConfig, SchemaVersion};
pub use filter::{AnimationWindow, Filter, FilterValue, PlotType};
pub use interaction::{
    Brush, CompareType, InteractionConfig, InteractionToggle, Tooltip, TooltipField,
};
pub use layer::{
    Layer, LayerColumns, LayerConfig, LayerKind, LabelAlignment, LabelAnchor, ScaleType,
    TextLabel, VisConfig, VisualChannel, VisualChannels,
};
pub use map_state::MapState;
pub use map_style::{BasemapStyle, MapStyle};
pub use vis_state::{AnimationConfig, LayerBlending, SplitMap, VisState};
