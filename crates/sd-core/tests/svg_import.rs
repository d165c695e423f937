//! Integration tests: SVG documents and catalog paths → path commands.
//!
//! Exercises the `sd-core` import pipeline: text → parsed shapes → bounds.

use pretty_assertions::assert_eq;
use sd_core::geometry::{path_bounds, union_bounds};
use sd_core::model::*;
use sd_core::parser::parse_svg_document;
use sd_core::{find_product, products};

// ─── SVG documents ──────────────────────────────────────────────────────

#[test]
fn badge_fixture_imports_all_drawable_shapes() {
    let doc = parse_svg_document(include_str!("fixtures/badge.svg")).unwrap();

    assert_eq!((doc.width, doc.height), (120.0, 80.0));
    // rect, polygon, ellipse, line, arc path; the gradient stop is skipped.
    assert_eq!(doc.shapes.len(), 5, "shapes: {:#?}", doc.shapes);

    let red = Color::from_hex("#b91c1c").unwrap();
    assert_eq!(doc.shapes[0].fill, Some(Paint::Solid(red)));
    assert_eq!(doc.shapes[0].stroke, Some(Color::from_hex("#18181b").unwrap()));
    assert_eq!(doc.shapes[0].stroke_width, 2.0);
    assert_eq!(doc.shapes[1].fill, Some(Paint::Solid(red)), "fill inherited from <g>");

    assert_eq!(doc.shapes[2].fill, Some(Paint::Solid(Color::WHITE)));
    // Line has no fill attribute, so the SVG default (black) applies.
    assert_eq!(doc.shapes[3].fill, Some(Paint::Solid(Color::BLACK)));
    assert_eq!(doc.shapes[4].fill, None);
}

#[test]
fn badge_fixture_bounds_match_viewbox() {
    let doc = parse_svg_document(include_str!("fixtures/badge.svg")).unwrap();
    let bounds = union_bounds(doc.shapes.iter().filter_map(|s| path_bounds(&s.commands))).unwrap();

    assert!((bounds.x0 - 4.0).abs() < 1e-3, "left edge {}", bounds.x0);
    assert!((bounds.x1 - 116.0).abs() < 1e-3, "right edge {}", bounds.x1);
    assert!(bounds.y0 >= 4.0 - 1e-3);
    assert!(bounds.y1 <= 76.0 + 1e-3);
}

#[test]
fn svg_with_malformed_path_reports_error() {
    let svg = r#"<svg viewBox="0 0 10 10"><path d="M 0 0 L 5"/></svg>"#;
    let err = parse_svg_document(svg).unwrap_err();
    assert!(err.contains("Path parse error"), "unexpected error: {err}");
}

#[test]
fn svg_without_shapes_is_empty_not_error() {
    let doc = parse_svg_document(r#"<svg width="10" height="10"></svg>"#).unwrap();
    assert!(doc.shapes.is_empty());
    assert_eq!(doc.view_box, None);
}

// ─── Catalog silhouettes ────────────────────────────────────────────────

#[test]
fn garment_silhouettes_fit_inside_view_box() {
    for product in products() {
        for view in &product.views {
            let outline = view.silhouette().unwrap();
            let b = path_bounds(&outline).unwrap();
            assert!(b.x0 >= 0.0 && b.x1 <= view.view_box.width as f64);
            assert!(b.y0 >= 0.0 && b.y1 <= view.view_box.height as f64);
        }
    }
}

#[test]
fn print_area_sits_inside_the_garment() {
    let hoodie = find_product("hoodie-premium").unwrap();
    let front = hoodie.view("front").unwrap();
    let b = path_bounds(&front.silhouette().unwrap()).unwrap();
    let area = front.print_area;

    assert!(area.left as f64 >= b.x0 && (area.left + area.width) as f64 <= b.x1);
    assert!(area.top as f64 >= b.y0 && (area.top + area.height) as f64 <= b.y1);
    assert!(area.contains(250.0, 300.0));
}
