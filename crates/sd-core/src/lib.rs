pub mod catalog;
pub mod geometry;
pub mod id;
pub mod model;
pub mod parser;
pub mod scene;

pub use catalog::{
    CANVAS_HEIGHT, CANVAS_WIDTH, DEFAULT_GRADIENT_ANGLE, FONTS, GRADIENT_PRESETS, GradientPreset,
    PrintArea, Product, ProductColor, ProductView, SWATCHES, TEXT_PRESETS, TextPreset, ViewBox,
    find_gradient_preset, find_product, find_text_preset, products,
};
pub use id::NodeId;
pub use model::*;
pub use parser::{SvgDocument, SvgShape, parse_color, parse_path_data, parse_svg_document};
pub use scene::{RasterError, RasterFormat, RasterOptions, SceneCapability, SceneEvent};

// Re-export kurbo so downstream crates share one geometry version.
pub use kurbo;
