//! Integration tests: canvas → pixels.
//!
//! Exercises the `sd-render` pipeline: nodes → tiny-skia pixmap → PNG.

use sd_core::model::*;
use sd_core::scene::{RasterOptions, SceneCapability};
use sd_render::{Canvas, RenderOptions};
use std::sync::Arc;

// ─── Helpers ─────────────────────────────────────────────────────────────

fn square(size: f32, left: f32, top: f32, fill: Color) -> SceneNode {
    let mut node = SceneNode::path(PathData::new(vec![
        PathCmd::MoveTo(0.0, 0.0),
        PathCmd::LineTo(size, 0.0),
        PathCmd::LineTo(size, size),
        PathCmd::LineTo(0.0, size),
        PathCmd::Close,
    ]));
    node.transform = Transform::at(left, top);
    node.fill = Some(Paint::Solid(fill));
    node
}

fn rgba_at(pixmap: &tiny_skia::Pixmap, x: u32, y: u32) -> [u8; 4] {
    let px = pixmap.pixel(x, y).expect("pixel in bounds").demultiply();
    [px.red(), px.green(), px.blue(), px.alpha()]
}

const PLAIN: RenderOptions = RenderOptions {
    scale: 1.0,
    background: None,
    show_selection: false,
    draw_text: true,
};

const RED: Color = Color::rgba(1.0, 0.0, 0.0, 1.0);
const BLUE: Color = Color::rgba(0.0, 0.0, 1.0, 1.0);

// ─── Fills ───────────────────────────────────────────────────────────────

#[test]
fn solid_path_fills_its_box_only() {
    let mut canvas = Canvas::new(100, 100);
    canvas.add_node(square(40.0, 50.0, 50.0, RED));
    let pixmap = canvas.render(&PLAIN).unwrap();

    assert_eq!(rgba_at(&pixmap, 50, 50), [255, 0, 0, 255]);
    assert_eq!(rgba_at(&pixmap, 5, 5)[3], 0, "background stays transparent");
}

#[test]
fn later_nodes_paint_over_earlier_ones() {
    let mut canvas = Canvas::new(100, 100);
    let red = canvas.add_node(square(40.0, 50.0, 50.0, RED));
    let blue = canvas.add_node(square(40.0, 50.0, 50.0, BLUE));
    assert_eq!(rgba_at(&canvas.render(&PLAIN).unwrap(), 50, 50), [0, 0, 255, 255]);

    canvas.bring_forward(red);
    assert_eq!(rgba_at(&canvas.render(&PLAIN).unwrap(), 50, 50), [255, 0, 0, 255]);
    assert_eq!(canvas.nodes(), vec![blue, red]);
}

#[test]
fn hidden_nodes_are_not_painted() {
    let mut canvas = Canvas::new(100, 100);
    let id = canvas.add_node(square(40.0, 50.0, 50.0, RED));
    canvas.node_mut(id).unwrap().visible = false;
    assert_eq!(rgba_at(&canvas.render(&PLAIN).unwrap(), 50, 50)[3], 0);
}

#[test]
fn gradient_runs_from_start_to_end_color() {
    let mut canvas = Canvas::new(100, 100);
    let id = canvas.add_node(square(80.0, 50.0, 50.0, RED));
    canvas.node_mut(id).unwrap().fill = Some(Paint::LinearGradient(LinearGradient::new(RED, BLUE, 0.0)));
    let pixmap = canvas.render(&PLAIN).unwrap();

    let left = rgba_at(&pixmap, 12, 50);
    let right = rgba_at(&pixmap, 88, 50);
    assert!(left[0] > 200 && left[2] < 60, "left edge {left:?}");
    assert!(right[2] > 200 && right[0] < 60, "right edge {right:?}");
}

// ─── Strokes & shadows ───────────────────────────────────────────────────

#[test]
fn stroke_under_fill_is_hidden_inside() {
    let mut canvas = Canvas::new(100, 100);
    let id = canvas.add_node(square(40.0, 50.0, 50.0, RED));
    {
        let node = canvas.node_mut(id).unwrap();
        node.stroke = Some(BLUE);
        node.stroke_width = 8.0;
    }
    // Fill first: stroke covers the inner half of the edge.
    assert_eq!(rgba_at(&canvas.render(&PLAIN).unwrap(), 32, 50), [0, 0, 255, 255]);

    canvas.node_mut(id).unwrap().paint_order = PaintOrder::Stroke;
    assert_eq!(rgba_at(&canvas.render(&PLAIN).unwrap(), 32, 50), [255, 0, 0, 255]);
    // Outer half of the stroke is still visible.
    assert_eq!(rgba_at(&canvas.render(&PLAIN).unwrap(), 28, 50), [0, 0, 255, 255]);
}

#[test]
fn shadow_is_painted_at_offset() {
    let mut canvas = Canvas::new(100, 100);
    let id = canvas.add_node(square(20.0, 30.0, 30.0, RED));
    canvas.node_mut(id).unwrap().shadow = Some(Shadow {
        color: Color::BLACK,
        blur: 10.0,
        offset_x: 30.0,
        offset_y: 30.0,
    });
    let pixmap = canvas.render(&PLAIN).unwrap();
    assert_eq!(rgba_at(&pixmap, 30, 30), [255, 0, 0, 255]);
    assert_eq!(rgba_at(&pixmap, 60, 60), [0, 0, 0, 255]);
}

// ─── Images & selection ──────────────────────────────────────────────────

#[test]
fn raster_images_are_drawn_centered() {
    let pixels: Vec<u8> = [0u8, 255, 0, 255].repeat(10 * 10);
    let mut node = SceneNode::image(RasterImage {
        width: 10,
        height: 10,
        pixels: Arc::from(pixels),
        source: None,
    });
    node.transform = Transform::at(50.0, 50.0);
    node.transform.scale_x = 2.0;
    node.transform.scale_y = 2.0;

    let mut canvas = Canvas::new(100, 100);
    canvas.add_node(node);
    let pixmap = canvas.render(&PLAIN).unwrap();
    assert_eq!(rgba_at(&pixmap, 50, 50), [0, 255, 0, 255]);
    assert_eq!(rgba_at(&pixmap, 42, 42), [0, 255, 0, 255]);
    assert_eq!(rgba_at(&pixmap, 25, 25)[3], 0);
}

#[test]
fn selection_decorations_only_when_selected() {
    let mut canvas = Canvas::new(100, 100);
    let id = canvas.add_node(square(20.0, 50.0, 50.0, RED));
    let options = RenderOptions {
        show_selection: true,
        ..PLAIN
    };
    // Top-left handle sits at the padded corner (40 - 10, 40 - 10).
    assert_eq!(rgba_at(&canvas.render(&options).unwrap(), 30, 30)[3], 0);

    canvas.set_active_node(Some(id));
    let handle = rgba_at(&canvas.render(&options).unwrap(), 30, 30);
    assert_eq!(handle, [0x3B, 0x82, 0xF6, 255]);
}

#[test]
fn png_export_doubles_dimensions() {
    let mut canvas = Canvas::new(500, 600);
    canvas.add_node(square(40.0, 250.0, 300.0, RED));
    let png = canvas
        .export_raster(&RasterOptions {
            multiplier: 2.0,
            ..Default::default()
        })
        .unwrap();
    let decoded = tiny_skia::Pixmap::decode_png(&png).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (1000, 1200));
    assert_eq!(rgba_at(&decoded, 500, 600), [255, 0, 0, 255]);
}

#[test]
fn png_export_leaves_out_selection_handles() {
    let mut canvas = Canvas::new(100, 100);
    let id = canvas.add_node(square(20.0, 50.0, 50.0, RED));
    canvas.set_active_node(Some(id));
    let png = canvas.export_raster(&RasterOptions::default()).unwrap();
    let decoded = tiny_skia::Pixmap::decode_png(&png).unwrap();
    assert_eq!(rgba_at(&decoded, 30, 30)[3], 0);
    assert_eq!(rgba_at(&decoded, 50, 50), [255, 0, 0, 255]);
}

// ─── Text ────────────────────────────────────────────────────────────────

fn heading(content: &str) -> SceneNode {
    let mut props = TextProps::new(
        content,
        FontSpec {
            family: "Arial".into(),
            weight: 700,
            size: 80.0,
        },
    );
    props.direction = TextDirection::Ltr;
    props.align = TextAlign::Center;
    let mut node = SceneNode::text(props);
    node.transform = Transform::at(200.0, 100.0);
    node
}

fn painted_pixels(pixmap: &tiny_skia::Pixmap) -> usize {
    pixmap.pixels().iter().filter(|px| px.alpha() > 0).count()
}

#[test]
fn text_nodes_are_painted() {
    let mut canvas = Canvas::new(400, 200);
    canvas.add_node(heading("HELLO"));
    let pixmap = canvas.render(&PLAIN).unwrap();
    assert!(painted_pixels(&pixmap) > 100);

    let hosted = RenderOptions {
        draw_text: false,
        ..PLAIN
    };
    assert_eq!(painted_pixels(&canvas.render(&hosted).unwrap()), 0);
}

#[test]
fn png_export_of_text_only_scene_is_not_blank() {
    let mut canvas = Canvas::new(400, 200);
    canvas.add_node(heading("HELLO"));
    let png = canvas.export_raster(&RasterOptions::default()).unwrap();
    let decoded = tiny_skia::Pixmap::decode_png(&png).unwrap();
    assert!(painted_pixels(&decoded) > 100);
}

#[test]
fn text_shadow_is_painted() {
    let mut canvas = Canvas::new(400, 200);
    let mut node = heading("HELLO");
    node.fill = None;
    node.shadow = Some(Shadow {
        color: BLUE,
        offset_x: 4.0,
        offset_y: 4.0,
        blur: 0.0,
    });
    canvas.add_node(node);
    let pixmap = canvas.render(&PLAIN).unwrap();
    let blue = pixmap
        .pixels()
        .iter()
        .filter(|px| px.alpha() > 0 && px.blue() > px.red())
        .count();
    assert!(blue > 100);
}
