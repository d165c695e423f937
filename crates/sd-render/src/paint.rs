//! Scene → tiny-skia drawing commands.
//!
//! Walks the canvas bottom to top and paints fills, strokes, gradients,
//! offset shadows, raster images, text outlines, and selection decorations.

use crate::canvas::Canvas;
use crate::text::text_path;
use kurbo::{Affine, Point, Vec2};
use sd_core::model::{
    Color, CornerStyle, NodeKind, Paint, PaintOrder, PathCmd, RasterImage, SceneNode,
};
use tiny_skia::{
    ColorU8, FillRule, GradientStop, IntSize, LinearGradient, PathBuilder, Pixmap, PixmapPaint,
    Rect, Shader, SpreadMode, Stroke, Transform,
};

/// Options for one rasterization pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    /// Output pixels per scene unit.
    pub scale: f32,
    /// Fill behind the scene; `None` keeps it transparent.
    pub background: Option<Color>,
    /// Draw the selection box and handles around the active node.
    pub show_selection: bool,
    /// Rasterize text nodes. Hosts that draw text themselves turn this off.
    pub draw_text: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            scale: 1.0,
            background: None,
            show_selection: true,
            draw_text: true,
        }
    }
}

/// Paint the whole canvas into `pixmap`.
pub fn paint_scene(pixmap: &mut Pixmap, canvas: &Canvas, options: &RenderOptions) {
    if let Some(bg) = options.background {
        pixmap.fill(to_skia_color(bg, 1.0));
    }
    let base = Affine::scale(options.scale as f64);

    for node in canvas.top_level() {
        paint_node(pixmap, canvas, node, base, 1.0, options.draw_text);
    }

    if options.show_selection {
        for id in canvas.selection() {
            if let Some(node) = canvas.get(*id) {
                paint_selection(pixmap, node, base);
            }
        }
    }
}

fn paint_node(
    pixmap: &mut Pixmap,
    canvas: &Canvas,
    node: &SceneNode,
    parent: Affine,
    opacity: f32,
    draw_text: bool,
) {
    if !node.visible {
        return;
    }
    let opacity = opacity * node.opacity;
    let m = parent * node.transform.affine();

    if let Some(shadow) = node.shadow {
        // Shadow offsets are in scene space, not rotated with the node.
        let offset = Affine::translate(Vec2::new(shadow.offset_x as f64, shadow.offset_y as f64));
        let shadow_m = parent * offset * node.transform.affine();
        let silhouette = Silhouette {
            color: shadow.color,
            opacity,
            draw_text,
        };
        paint_silhouette(pixmap, canvas, node, shadow_m, &silhouette);
    }

    match &node.kind {
        NodeKind::Text(props) => {
            if !draw_text {
                return;
            }
            match text_path(props, node.width, node.height) {
                Some(path) => paint_shape(pixmap, node, &path, m, Affine::IDENTITY, opacity),
                None => log::trace!("text {} has no visible glyphs", node.id),
            }
        }
        NodeKind::Image(image) => paint_image(pixmap, image, m, opacity),
        NodeKind::Path(data) => {
            let local = Affine::translate(Vec2::new(-data.offset.0 as f64, -data.offset.1 as f64));
            if let Some(path) = build_path(&data.commands) {
                paint_shape(pixmap, node, &path, m, local, opacity);
            }
        }
        NodeKind::Group => {
            for child in canvas.children_of(node.id) {
                paint_node(pixmap, canvas, child, m, opacity, draw_text);
            }
        }
    }
}

// ─── Shape painters ──────────────────────────────────────────────────────────

/// Fill and stroke an outline in node space, honoring the paint order.
/// `local` maps the outline's own coordinates into node space.
fn paint_shape(
    pixmap: &mut Pixmap,
    node: &SceneNode,
    path: &tiny_skia::Path,
    m: Affine,
    local: Affine,
    opacity: f32,
) {
    let transform = to_skia_transform(m * local);

    let fill = |pixmap: &mut Pixmap| {
        if let Some(paint) = &node.fill
            && let Some(shader) = fill_shader(paint, node, local, opacity)
        {
            let skia_paint = tiny_skia::Paint {
                shader,
                anti_alias: true,
                ..Default::default()
            };
            pixmap.fill_path(path, &skia_paint, FillRule::Winding, transform, None);
        }
    };
    let stroke = |pixmap: &mut Pixmap| {
        if let Some(color) = node.stroke
            && node.stroke_width > 0.0
        {
            let mut skia_paint = tiny_skia::Paint::default();
            skia_paint.set_color(to_skia_color(color, opacity));
            skia_paint.anti_alias = true;
            let stroke = Stroke {
                width: stroke_width(node),
                ..Default::default()
            };
            pixmap.stroke_path(path, &skia_paint, &stroke, transform, None);
        }
    };

    match node.paint_order {
        PaintOrder::Fill => {
            fill(pixmap);
            stroke(pixmap);
        }
        PaintOrder::Stroke => {
            stroke(pixmap);
            fill(pixmap);
        }
    }
}

/// Uniform strokes keep their on-screen width regardless of node scale.
fn stroke_width(node: &SceneNode) -> f32 {
    if node.stroke_uniform {
        let s = (node.transform.scale_x.abs() + node.transform.scale_y.abs()) / 2.0;
        if s > f32::EPSILON {
            return node.stroke_width / s;
        }
    }
    node.stroke_width
}

fn paint_image(pixmap: &mut Pixmap, image: &RasterImage, m: Affine, opacity: f32) {
    let Some(source) = to_pixmap(image) else {
        log::warn!("skipping {}x{} image with mismatched pixel data", image.width, image.height);
        return;
    };
    let local = Affine::translate(Vec2::new(
        -(image.width as f64) / 2.0,
        -(image.height as f64) / 2.0,
    ));
    let paint = PixmapPaint {
        opacity,
        ..Default::default()
    };
    pixmap.draw_pixmap(0, 0, source.as_ref(), &paint, to_skia_transform(m * local), None);
}

struct Silhouette {
    color: Color,
    opacity: f32,
    draw_text: bool,
}

/// Fill the node's outline with a flat color (used for shadows).
fn paint_silhouette(pixmap: &mut Pixmap, canvas: &Canvas, node: &SceneNode, m: Affine, s: &Silhouette) {
    let mut paint = tiny_skia::Paint::default();
    paint.set_color(to_skia_color(s.color, s.opacity));
    paint.anti_alias = true;

    match &node.kind {
        NodeKind::Path(data) => {
            if node.fill.is_none() {
                return;
            }
            let local = Affine::translate(Vec2::new(-data.offset.0 as f64, -data.offset.1 as f64));
            if let Some(path) = build_path(&data.commands) {
                pixmap.fill_path(&path, &paint, FillRule::Winding, to_skia_transform(m * local), None);
            }
        }
        NodeKind::Image(_) => {
            let (hw, hh) = (node.width / 2.0, node.height / 2.0);
            if let Some(rect) = Rect::from_xywh(-hw, -hh, node.width, node.height) {
                let path = PathBuilder::from_rect(rect);
                pixmap.fill_path(&path, &paint, FillRule::Winding, to_skia_transform(m), None);
            }
        }
        NodeKind::Group => {
            for child in canvas.children_of(node.id) {
                paint_silhouette(pixmap, canvas, child, m * child.transform.affine(), s);
            }
        }
        NodeKind::Text(props) => {
            if s.draw_text
                && let Some(path) = text_path(props, node.width, node.height)
            {
                pixmap.fill_path(&path, &paint, FillRule::Winding, to_skia_transform(m), None);
            }
        }
    }
}

// ─── Selection decorations ───────────────────────────────────────────────────

fn paint_selection(pixmap: &mut Pixmap, node: &SceneNode, base: Affine) {
    let style = node.handles;
    let m = base * node.transform.affine();
    let sx = node.transform.scale_x.abs().max(f32::EPSILON);
    let sy = node.transform.scale_y.abs().max(f32::EPSILON);
    let hw = (node.width / 2.0 + style.padding / sx) as f64;
    let hh = (node.height / 2.0 + style.padding / sy) as f64;

    let corners = [(-hw, -hh), (hw, -hh), (hw, hh), (-hw, hh)].map(|(x, y)| m * Point::new(x, y));
    let mids: Vec<Point> = (0..4).map(|i| corners[i].midpoint(corners[(i + 1) % 4])).collect();

    let mut paint = tiny_skia::Paint::default();
    paint.set_color(to_skia_color(style.corner_color, 1.0));
    paint.anti_alias = true;

    let mut pb = PathBuilder::new();
    pb.move_to(corners[0].x as f32, corners[0].y as f32);
    for p in &corners[1..] {
        pb.line_to(p.x as f32, p.y as f32);
    }
    pb.close();
    if let Some(outline) = pb.finish() {
        let stroke = Stroke {
            width: 1.0,
            ..Default::default()
        };
        pixmap.stroke_path(&outline, &paint, &stroke, Transform::identity(), None);
    }

    let size = style.corner_size;
    for p in corners.iter().chain(mids.iter()) {
        let (x, y) = (p.x as f32, p.y as f32);
        let handle = match style.corner_style {
            CornerStyle::Circle => PathBuilder::from_circle(x, y, size / 2.0),
            CornerStyle::Rect => {
                Rect::from_xywh(x - size / 2.0, y - size / 2.0, size, size).map(PathBuilder::from_rect)
            }
        };
        let Some(handle) = handle else {
            continue;
        };
        if style.transparent_corners {
            let stroke = Stroke {
                width: 1.0,
                ..Default::default()
            };
            pixmap.stroke_path(&handle, &paint, &stroke, Transform::identity(), None);
        } else {
            pixmap.fill_path(&handle, &paint, FillRule::Winding, Transform::identity(), None);
        }
    }
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

/// kurbo `[a b c d e f]` → tiny-skia `(sx ky kx sy tx ty)`.
pub fn to_skia_transform(m: Affine) -> Transform {
    let [a, b, c, d, e, f] = m.as_coeffs();
    Transform::from_row(a as f32, b as f32, c as f32, d as f32, e as f32, f as f32)
}

pub fn to_skia_color(c: Color, opacity: f32) -> tiny_skia::Color {
    let [r, g, b, a] = c.to_rgba8();
    let alpha = (a as f32 * opacity.clamp(0.0, 1.0)).round() as u8;
    tiny_skia::Color::from_rgba8(r, g, b, alpha)
}

pub fn build_path(commands: &[PathCmd]) -> Option<tiny_skia::Path> {
    let mut pb = PathBuilder::new();
    for cmd in commands {
        match *cmd {
            PathCmd::MoveTo(x, y) => pb.move_to(x, y),
            PathCmd::LineTo(x, y) => pb.line_to(x, y),
            PathCmd::QuadTo(cx, cy, x, y) => pb.quad_to(cx, cy, x, y),
            PathCmd::CubicTo(c1x, c1y, c2x, c2y, x, y) => pb.cubic_to(c1x, c1y, c2x, c2y, x, y),
            PathCmd::Close => pb.close(),
        }
    }
    pb.finish()
}

/// Shader for a node fill. Gradients span the node's intrinsic box.
fn fill_shader(paint: &Paint, node: &SceneNode, local: Affine, opacity: f32) -> Option<Shader<'static>> {
    match paint {
        Paint::Solid(c) => Some(Shader::SolidColor(to_skia_color(*c, opacity))),
        Paint::LinearGradient(g) => {
            let coords = g.coords();
            let (w, h) = (node.width, node.height);
            let (x0, y0) = (-w / 2.0, -h / 2.0);
            // Gradient points are in node space; undo the path's own offset.
            let inverse_local = to_skia_transform(local.inverse());
            let stops = g
                .stops()
                .iter()
                .map(|s| GradientStop::new(s.offset, to_skia_color(s.color, opacity)))
                .collect();
            LinearGradient::new(
                tiny_skia::Point::from_xy(x0 + coords.x1 * w, y0 + coords.y1 * h),
                tiny_skia::Point::from_xy(x0 + coords.x2 * w, y0 + coords.y2 * h),
                stops,
                SpreadMode::Pad,
                inverse_local,
            )
        }
    }
}

fn to_pixmap(image: &RasterImage) -> Option<Pixmap> {
    from_straight_rgba(image.width, image.height, &image.pixels)
}

/// Straight-alpha RGBA8 → premultiplied pixmap. `None` when the buffer
/// length does not match the size.
pub fn from_straight_rgba(width: u32, height: u32, pixels: &[u8]) -> Option<Pixmap> {
    let size = IntSize::from_wh(width, height)?;
    if pixels.len() != (width as usize) * (height as usize) * 4 {
        return None;
    }
    let data = pixels
        .chunks_exact(4)
        .flat_map(|px| {
            let c = ColorU8::from_rgba(px[0], px[1], px[2], px[3]).premultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect();
    Pixmap::from_vec(data, size)
}

/// Premultiplied pixmap → straight-alpha RGBA8, as canvas `ImageData` wants.
pub fn to_straight_rgba(pixmap: &Pixmap) -> Vec<u8> {
    pixmap
        .pixels()
        .iter()
        .flat_map(|px| {
            let c = px.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn affine_conversion_maps_points_identically() {
        let m = Affine::translate(Vec2::new(10.0, 20.0)) * Affine::rotate(0.5) * Affine::scale(2.0);
        let t = to_skia_transform(m);
        let p = m * Point::new(3.0, 4.0);
        let mut q = [tiny_skia::Point::from_xy(3.0, 4.0)];
        t.map_points(&mut q);
        assert!((p.x as f32 - q[0].x).abs() < 1e-3);
        assert!((p.y as f32 - q[0].y).abs() < 1e-3);
    }

    #[test]
    fn opacity_scales_alpha() {
        let c = to_skia_color(Color::WHITE, 0.5);
        assert!((c.alpha() - 128.0 / 255.0).abs() < 1e-3);
    }

    #[test]
    fn image_pixels_are_premultiplied() {
        let image = RasterImage {
            width: 1,
            height: 1,
            pixels: vec![200, 100, 50, 128].into(),
            source: None,
        };
        let pixmap = to_pixmap(&image).unwrap();
        let px = pixmap.pixel(0, 0).unwrap();
        assert_eq!(px.alpha(), 128);
        assert!(px.red() < 200);
    }

    #[test]
    fn mismatched_pixel_buffer_is_rejected() {
        let image = RasterImage {
            width: 2,
            height: 2,
            pixels: vec![0; 4].into(),
            source: None,
        };
        assert!(to_pixmap(&image).is_none());
    }

    #[test]
    fn straight_rgba_undoes_premultiplication() {
        let image = RasterImage {
            width: 1,
            height: 1,
            pixels: vec![255, 0, 0, 255].into(),
            source: None,
        };
        let pixmap = to_pixmap(&image).unwrap();
        assert_eq!(to_straight_rgba(&pixmap), vec![255, 0, 0, 255]);
    }

    #[test]
    fn straight_rgba_buffer_must_match_size() {
        assert!(from_straight_rgba(2, 1, &[0; 4]).is_none());
        let pixmap = from_straight_rgba(1, 1, &[10, 20, 30, 0]).unwrap();
        assert_eq!(pixmap.pixel(0, 0).unwrap().alpha(), 0);
    }
}
