//! Editor configuration.
//!
//! Plain structs with `Default`; the browser bridge overrides fields before
//! handing the config to `Editor::new`.

use sd_core::model::{
    Color, FONT_WEIGHT_NORMAL, HandleStyle, Paint, Shadow, TextAlign, TextDirection,
};

// ─── Text ─────────────────────────────────────────────────────────────────

/// Defaults for newly created text nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct TextDefaults {
    pub fill: Color,
    pub font_size: f32,
    pub font_weight: u16,
    pub align: TextAlign,
    pub direction: TextDirection,
    /// Selection padding around text, wider than for graphics.
    pub padding: f32,
    pub stroke_uniform: bool,
}

impl Default for TextDefaults {
    fn default() -> Self {
        Self {
            fill: Color::WHITE,
            font_size: 40.0,
            font_weight: FONT_WEIGHT_NORMAL,
            align: TextAlign::Right,
            direction: TextDirection::Rtl,
            padding: 20.0,
            stroke_uniform: true,
        }
    }
}

/// Per-call overrides for `Editor::add_text`. `None` keeps the default.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextOptions {
    pub fill: Option<Paint>,
    pub font_size: Option<f32>,
    pub font_weight: Option<u16>,
    pub shadow: Option<Shadow>,
    pub stroke: Option<Color>,
    pub stroke_width: Option<f32>,
}

// ─── Editor ───────────────────────────────────────────────────────────────

/// Configuration for an `Editor`.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorConfig {
    /// Share of the print area an inserted graphic may cover. Default: **0.6**.
    pub fit_ratio: f32,

    /// Size assumed for nodes whose intrinsic size is zero or unknown.
    pub fallback_size: f32,

    /// Output pixels per canvas unit for exports. Default: **2**.
    pub export_multiplier: f32,
    pub export_quality: f32,
    /// Download name prefix; the timestamp and extension are appended.
    pub export_prefix: String,

    pub text: TextDefaults,

    /// Fill for graphics built from raw path data.
    pub graphic_fill: Color,
    pub graphic_padding: f32,

    pub handles: HandleStyle,

    /// Stroke applied when a stroke is switched on.
    pub stroke_width: f32,
    pub stroke_color: Color,

    /// Shadow applied when a shadow is switched on.
    pub shadow: Shadow,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            fit_ratio: 0.6,
            fallback_size: 100.0,
            export_multiplier: 2.0,
            export_quality: 1.0,
            export_prefix: "smart-design".to_string(),
            text: TextDefaults::default(),
            graphic_fill: Color::WHITE,
            graphic_padding: 10.0,
            handles: HandleStyle::default(),
            stroke_width: 1.0,
            stroke_color: Color::BLACK,
            shadow: Shadow {
                color: Color::BLACK,
                blur: 10.0,
                offset_x: 5.0,
                offset_y: 5.0,
            },
        }
    }
}
