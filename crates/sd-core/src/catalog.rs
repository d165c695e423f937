//! Product catalog: garments, color variants, views and print areas.
//!
//! Catalog data is immutable and lives for the whole program.

use crate::model::{Color, FONT_WEIGHT_BOLD, FONT_WEIGHT_NORMAL, PathCmd};
use crate::parser;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Design canvas size in scene units.
pub const CANVAS_WIDTH: u32 = 500;
pub const CANVAS_HEIGHT: u32 = 600;

/// Font families offered by the text tools.
pub const FONTS: &[&str] = &[
    "Vazirmatn",
    "Arial",
    "Times New Roman",
    "Courier New",
    "Tahoma",
    "Yekan",
    "Impact",
];

/// Swatches offered by the fill and stroke pickers.
pub const SWATCHES: &[&str] = &[
    "#ffffff", "#000000", "#ef4444", "#f97316", "#f59e0b", "#84cc16", "#10b981", "#06b6d4",
    "#3b82f6", "#6366f1", "#8b5cf6", "#d946ef", "#f43f5e", "#881337", "#1e293b",
];

/// A named two-stop gradient for the fill picker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GradientPreset {
    pub name: &'static str,
    pub start: &'static str,
    pub end: &'static str,
}

pub const GRADIENT_PRESETS: &[GradientPreset] = &[
    GradientPreset { name: "Sunset", start: "#f59e0b", end: "#db2777" },
    GradientPreset { name: "Ocean", start: "#06b6d4", end: "#3b82f6" },
    GradientPreset { name: "Gold", start: "#fcd34d", end: "#b45309" },
    GradientPreset { name: "Cyber", start: "#d946ef", end: "#4f46e5" },
];

/// Angle a gradient starts with when nothing sets one.
pub const DEFAULT_GRADIENT_ANGLE: f32 = 90.0;

/// Quick-add text styles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextPreset {
    pub id: &'static str,
    /// Initial content, also the button label.
    pub label: &'static str,
    pub font_size: f32,
    pub font_weight: u16,
}

pub const TEXT_PRESETS: &[TextPreset] = &[
    TextPreset { id: "heading", label: "عنوان", font_size: 50.0, font_weight: FONT_WEIGHT_BOLD },
    TextPreset { id: "body", label: "متن ساده", font_size: 32.0, font_weight: FONT_WEIGHT_NORMAL },
];

pub fn find_text_preset(id: &str) -> Option<&'static TextPreset> {
    TEXT_PRESETS.iter().find(|p| p.id == id)
}

pub fn find_gradient_preset(name: &str) -> Option<&'static GradientPreset> {
    GRADIENT_PRESETS.iter().find(|p| p.name.eq_ignore_ascii_case(name))
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewBox {
    pub min_x: f32,
    pub min_y: f32,
    pub width: f32,
    pub height: f32,
}

/// Printable rectangle on a product view, in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PrintArea {
    pub top: f32,
    pub left: f32,
    pub width: f32,
    pub height: f32,
}

impl PrintArea {
    pub fn center(&self) -> (f32, f32) {
        (self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    /// Uniform scale that fits a `w × h` box into `ratio` of this area.
    /// Non-positive sizes fall back to `fallback`.
    pub fn fit_scale(&self, w: f32, h: f32, ratio: f32, fallback: f32) -> f32 {
        let w = if w > 0.0 { w } else { fallback };
        let h = if h > 0.0 { h } else { fallback };
        (self.width * ratio / w).min(self.height * ratio / h)
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.left && x <= self.left + self.width && y >= self.top && y <= self.top + self.height
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductColor {
    pub id: String,
    pub name: String,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductView {
    pub id: String,
    pub name: String,
    /// Outer silhouette as SVG path data.
    pub path: Option<String>,
    /// Decorative strokes (collar, hood, pocket).
    pub detail_paths: Vec<String>,
    pub view_box: ViewBox,
    pub print_area: PrintArea,
}

impl ProductView {
    pub fn silhouette(&self) -> Result<Vec<PathCmd>, String> {
        match &self.path {
            Some(d) => parser::parse_path_data(d),
            None => Ok(Vec::new()),
        }
    }

    pub fn details(&self) -> Result<Vec<Vec<PathCmd>>, String> {
        self.detail_paths.iter().map(|d| parser::parse_path_data(d)).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub price: f32,
    pub colors: Vec<ProductColor>,
    pub views: Vec<ProductView>,
}

impl Product {
    pub fn view(&self, id: &str) -> Option<&ProductView> {
        self.views.iter().find(|v| v.id == id)
    }

    pub fn color(&self, id: &str) -> Option<&ProductColor> {
        self.colors.iter().find(|c| c.id == id)
    }
}

// ─── Built-in catalog ───────────────────────────────────────────────────

const TSHIRT_PATH: &str = "M 160 80 Q 250 110 340 80 L 420 140 L 440 200 L 380 220 L 380 520 L 120 520 L 120 220 L 60 200 L 80 140 Z";
const TSHIRT_DETAILS: &[&str] = &["M 160 80 Q 250 110 340 80"];

const HOODIE_PATH: &str = "M 200 70 C 230 70 270 70 300 70 L 440 140 L 410 220 L 370 190 L 370 530 L 130 530 L 130 190 L 90 220 L 60 140 L 200 70 Z";
const HOODIE_DETAILS: &[&str] = &[
    "M 200 70 C 200 30 300 30 300 70",
    "M 170 420 L 330 420 L 330 530 L 170 530 Z",
];

const GARMENT_VIEW_BOX: ViewBox = ViewBox {
    min_x: 0.0,
    min_y: 0.0,
    width: CANVAS_WIDTH as f32,
    height: CANVAS_HEIGHT as f32,
};

fn color(id: &str, name: &str, hex: &str) -> ProductColor {
    ProductColor {
        id: id.into(),
        name: name.into(),
        color: Color::from_hex(hex).unwrap_or(Color::BLACK),
    }
}

fn view(id: &str, name: &str, path: &str, details: &[&str], print_area: PrintArea) -> ProductView {
    ProductView {
        id: id.into(),
        name: name.into(),
        path: Some(path.into()),
        detail_paths: details.iter().map(|d| d.to_string()).collect(),
        view_box: GARMENT_VIEW_BOX,
        print_area,
    }
}

static PRODUCTS: LazyLock<Vec<Product>> = LazyLock::new(|| {
    let tshirt_area = PrintArea {
        top: 150.0,
        left: 145.0,
        width: 210.0,
        height: 280.0,
    };
    let hoodie_area = PrintArea {
        top: 190.0,
        left: 150.0,
        width: 200.0,
        height: 220.0,
    };
    vec![
        Product {
            id: "tshirt-classic".into(),
            name: "تی‌شرت نخی کلاسیک".into(),
            price: 24.99,
            colors: vec![
                color("black", "مشکی", "#18181b"),
                color("white", "سفید", "#ffffff"),
                color("navy", "سرمه‌ای", "#172554"),
                color("heather", "طوسی", "#52525b"),
                color("red", "قرمز", "#b91c1c"),
                color("yellow", "زرد", "#a16207"),
            ],
            views: vec![
                view("front", "نمای جلو", TSHIRT_PATH, TSHIRT_DETAILS, tshirt_area),
                view("back", "نمای پشت", TSHIRT_PATH, TSHIRT_DETAILS, tshirt_area),
            ],
        },
        Product {
            id: "hoodie-premium".into(),
            name: "هودی ممتاز".into(),
            price: 49.99,
            colors: vec![
                color("black", "مشکی", "#18181b"),
                color("maroon", "زرشکی", "#450a0a"),
                color("forest", "سبز جنگلی", "#022c22"),
            ],
            views: vec![view("front", "نمای جلو", HOODIE_PATH, HOODIE_DETAILS, hoodie_area)],
        },
    ]
});

/// All products, in display order. The first one is the default.
pub fn products() -> &'static [Product] {
    &PRODUCTS
}

pub fn find_product(id: &str) -> Option<&'static Product> {
    products().iter().find(|p| p.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_shape() {
        let all = products();
        assert_eq!(all.len(), 2);
        let tshirt = find_product("tshirt-classic").unwrap();
        assert_eq!(tshirt.colors.len(), 6);
        assert_eq!(tshirt.views.len(), 2);
        let hoodie = find_product("hoodie-premium").unwrap();
        assert_eq!(hoodie.colors.len(), 3);
        assert_eq!(hoodie.view("front").unwrap().print_area.top, 190.0);
        assert!(find_product("mug").is_none());
    }

    #[test]
    fn catalog_paths_parse() {
        for product in products() {
            for view in &product.views {
                assert!(!view.silhouette().unwrap().is_empty(), "{} / {}", product.id, view.id);
                assert_eq!(view.details().unwrap().len(), view.detail_paths.len());
            }
        }
    }

    #[test]
    fn palette_and_presets_parse() {
        assert_eq!(SWATCHES.len(), 15);
        for hex in SWATCHES {
            assert!(Color::from_hex(hex).is_some(), "{hex}");
        }
        for preset in GRADIENT_PRESETS {
            assert!(Color::from_hex(preset.start).is_some());
            assert!(Color::from_hex(preset.end).is_some());
        }
        assert_eq!(find_gradient_preset("ocean").map(|p| p.end), Some("#3b82f6"));
        let heading = find_text_preset("heading").unwrap();
        assert_eq!((heading.font_size, heading.font_weight), (50.0, 700));
        assert_eq!(find_text_preset("body").unwrap().font_size, 32.0);
        assert!(find_text_preset("caption").is_none());
    }

    #[test]
    fn fit_scale_uses_smaller_axis() {
        let area = PrintArea {
            top: 150.0,
            left: 145.0,
            width: 210.0,
            height: 280.0,
        };
        assert_eq!(area.center(), (250.0, 290.0));
        // 0.6 * 210 / 200 = 0.63 vs 0.6 * 280 / 100 = 1.68
        assert!((area.fit_scale(200.0, 100.0, 0.6, 100.0) - 0.63).abs() < 1e-6);
        // Zero size falls back to 100 on that axis.
        assert!((area.fit_scale(0.0, 0.0, 0.6, 100.0) - 1.26).abs() < 1e-6);
    }
}
