//! Documented defaults for every optional configuration field
//!
//! The merge rule is field-local: only *absent* keys take these values, an
//! explicit `null` always survives. Fields whose default is `null` (bound
//! columns, stroke color, filter `yAxis`, animation `currentTime`, tooltip
//! `format`) are defaulted in the entity `with_defaults` impls via
//! [`Maybe::defaulted`](crate::primitives::Maybe::defaulted) and have no
//! entry here.

use crate::primitives::{Color, FloatColor, HexColor, OrderedRange};
use crate::schema::color_range::{ColorRange, RampType};
use crate::schema::filter::{AnimationWindow, PlotType};
use crate::schema::interaction::CompareType;
use crate::schema::layer::{LabelAlignment, LabelAnchor, ScaleType};
use crate::schema::map_style::BasemapStyle;
use crate::schema::vis_state::LayerBlending;
use once_cell::sync::Lazy;
use serde_json::Map;

// Filter
pub const FILTER_ENLARGED: bool = false;
pub const FILTER_PLOT_TYPE: PlotType = PlotType::Histogram;
pub const FILTER_ANIMATION_WINDOW: AnimationWindow = AnimationWindow::Free;
pub const FILTER_SPEED: f64 = 1.0;

// Layer
pub const LAYER_LABEL: &str = "new layer";
pub const LAYER_COLOR: Color = Color::rgb(18, 147, 154);
pub const HIGHLIGHT_COLOR: Color = Color::rgba(252, 242, 26, 255);
pub const IS_VISIBLE: bool = true;
pub const HIDDEN: bool = false;

// Layer visConfig
pub const RADIUS: f64 = 10.0;
pub const FIXED_RADIUS: bool = false;
pub const OPACITY: f64 = 0.8;
pub const OUTLINE: bool = false;
pub const THICKNESS: f64 = 2.0;
pub const FILLED: bool = true;
pub const RADIUS_RANGE: OrderedRange<f64> = OrderedRange {
    min: 0.0,
    max: 50.0,
};

/// The "Global Warming" ramp assigned when a layer carries no color range.
pub static DEFAULT_COLOR_RANGE: Lazy<ColorRange> = Lazy::new(|| ColorRange {
    name: Some("Global Warming".to_string()),
    kind: Some(RampType::Sequential),
    category: Some("Uber".to_string()),
    colors: ["#5A1846", "#900C3F", "#C70039", "#E3611C", "#F1920E", "#FFC300"]
        .iter()
        .map(|hex| HexColor::new(hex).expect("static ramp colors are valid"))
        .collect(),
    extra: Map::new(),
});

// Text labels
pub const TEXT_LABEL_COLOR: Color = Color::rgb(255, 255, 255);
pub const TEXT_LABEL_SIZE: f64 = 18.0;
pub const TEXT_LABEL_OFFSET: [f64; 2] = [0.0, 0.0];
pub const TEXT_LABEL_ANCHOR: LabelAnchor = LabelAnchor::Start;
pub const TEXT_LABEL_ALIGNMENT: LabelAlignment = LabelAlignment::Center;

/// Default scale per visual channel: size-like channels interpolate
/// linearly, color-like channels bin by quantile.
pub fn scale_for_channel(name: &str) -> ScaleType {
    match name {
        "size" | "height" | "radius" => ScaleType::Linear,
        _ => ScaleType::Quantile,
    }
}

// Interaction
pub const TOOLTIP_ENABLED: bool = true;
pub const TOOLTIP_COMPARE_MODE: bool = false;
pub const TOOLTIP_COMPARE_TYPE: CompareType = CompareType::Absolute;
pub const BRUSH_SIZE: f64 = 0.5;
pub const BRUSH_ENABLED: bool = false;
pub const GEOCODER_ENABLED: bool = false;
pub const COORDINATE_ENABLED: bool = false;

// Vis state
pub const LAYER_BLENDING: LayerBlending = LayerBlending::Normal;
pub const ANIMATION_SPEED: f64 = 1.0;

// Map state: whole-world view, north up
pub const BEARING: f64 = 0.0;
pub const DRAG_ROTATE: bool = false;
pub const LATITUDE: f64 = 0.0;
pub const LONGITUDE: f64 = 0.0;
pub const PITCH: f64 = 0.0;
pub const ZOOM: f64 = 0.0;
pub const IS_SPLIT: bool = false;

// Map style
pub const STYLE_TYPE: BasemapStyle = BasemapStyle::Dark;
pub const THREE_D_BUILDING_COLOR: FloatColor = FloatColor([209.0, 206.0, 199.0]);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ramp_is_well_formed() {
        let ramp = &*DEFAULT_COLOR_RANGE;
        assert!(!ramp.colors.is_empty());
        assert_eq!(ramp.colors.len(), 6);
        assert_eq!(ramp.colors[0].as_str(), "#5A1846");
    }

    #[test]
    fn test_channel_scale_defaults() {
        assert_eq!(scale_for_channel("size"), ScaleType::Linear);
        assert_eq!(scale_for_channel("color"), ScaleType::Quantile);
        assert_eq!(scale_for_channel("strokeColor"), ScaleType::Quantile);
    }
}
