//! Canvas2D text pass.
//!
//! The tiny-skia raster carries shapes and images; text goes through the
//! browser so the page's web fonts and bidi layout apply. Each text node is
//! drawn in its own box (origin at the center) under the node's full
//! transform.

use sd_core::kurbo::Affine;
use sd_core::model::{FontStyle, Paint, PaintOrder, SceneNode, TextAlign, TextProps};
use sd_render::Canvas;
use web_sys::CanvasRenderingContext2d;

/// A text node resolved to device space.
pub struct PlacedText<'a> {
    pub node: &'a SceneNode,
    pub props: &'a TextProps,
    /// Canvas `setTransform` coefficients.
    pub matrix: [f64; 6],
    pub opacity: f64,
}

/// Visible text nodes bottom → top, with groups flattened.
pub fn placed_texts(canvas: &Canvas, scale: f64) -> Vec<PlacedText<'_>> {
    let mut out = Vec::new();
    for node in canvas.top_level() {
        collect(canvas, node, Affine::scale(scale), 1.0, &mut out);
    }
    out
}

fn collect<'a>(
    canvas: &'a Canvas,
    node: &'a SceneNode,
    parent: Affine,
    opacity: f64,
    out: &mut Vec<PlacedText<'a>>,
) {
    if !node.visible {
        return;
    }
    let m = parent * node.transform.affine();
    let opacity = opacity * node.opacity as f64;
    match node.text_props() {
        Some(props) => out.push(PlacedText {
            node,
            props,
            matrix: m.as_coeffs(),
            opacity,
        }),
        None => {
            for child in canvas.children_of(node.id) {
                collect(canvas, child, m, opacity, out);
            }
        }
    }
}

/// CSS font shorthand, e.g. `italic 700 50px Vazirmatn`.
pub fn font_shorthand(props: &TextProps) -> String {
    let italic = match props.style {
        FontStyle::Italic => "italic ",
        FontStyle::Normal => "",
    };
    format!(
        "{italic}{} {}px {}",
        props.font.weight, props.font.size, props.font.family
    )
}

/// Anchor x and canvas `textAlign` for a box of half-width `hw`.
pub fn anchor(align: TextAlign, hw: f64) -> (f64, &'static str) {
    match align {
        TextAlign::Left => (-hw, "left"),
        TextAlign::Center => (0.0, "center"),
        TextAlign::Right => (hw, "right"),
    }
}

/// Draw every visible text node over whatever is already in `ctx`.
pub fn draw_texts(ctx: &CanvasRenderingContext2d, canvas: &Canvas, scale: f64) {
    for placed in placed_texts(canvas, scale) {
        draw_text(ctx, &placed, scale);
    }
}

fn draw_text(ctx: &CanvasRenderingContext2d, placed: &PlacedText<'_>, scale: f64) {
    let PlacedText { node, props, matrix, opacity } = *placed;
    let [a, b, c, d, e, f] = matrix;

    ctx.save();
    if ctx.set_transform(a, b, c, d, e, f).is_err() {
        ctx.restore();
        return;
    }
    ctx.set_global_alpha(opacity);
    ctx.set_font(&font_shorthand(props));
    ctx.set_text_baseline("top");

    let (hw, hh) = (node.width as f64 / 2.0, node.height as f64 / 2.0);
    let (x, align) = anchor(props.align, hw);
    ctx.set_text_align(align);
    let size = props.font.size as f64;
    let line_advance = size * props.line_height as f64;
    let lines: Vec<&str> = props.content.split('\n').collect();

    let fill = |ctx: &CanvasRenderingContext2d| {
        let Some(paint) = &node.fill else {
            return;
        };
        apply_fill(ctx, paint, node);
        if let Some(shadow) = node.shadow {
            // Shadow offsets are device pixels and ignore the transform.
            ctx.set_shadow_color(&shadow.color.to_css());
            ctx.set_shadow_blur(shadow.blur as f64 * scale);
            ctx.set_shadow_offset_x(shadow.offset_x as f64 * scale);
            ctx.set_shadow_offset_y(shadow.offset_y as f64 * scale);
        }
        for (i, line) in lines.iter().enumerate() {
            let y = -hh + i as f64 * line_advance;
            let _ = ctx.fill_text(line, x, y);
            if props.underline {
                underline(ctx, line, x, y, size, props.align);
            }
        }
        clear_shadow(ctx);
    };
    let stroke = |ctx: &CanvasRenderingContext2d| {
        let Some(color) = node.stroke.filter(|_| node.stroke_width > 0.0) else {
            return;
        };
        ctx.set_stroke_style_str(&color.to_css());
        ctx.set_line_width(node.stroke_width as f64);
        for (i, line) in lines.iter().enumerate() {
            let _ = ctx.stroke_text(line, x, -hh + i as f64 * line_advance);
        }
    };

    match node.paint_order {
        PaintOrder::Fill => {
            fill(ctx);
            stroke(ctx);
        }
        PaintOrder::Stroke => {
            stroke(ctx);
            fill(ctx);
        }
    }
    ctx.restore();
}

fn underline(ctx: &CanvasRenderingContext2d, line: &str, x: f64, y: f64, size: f64, align: TextAlign) {
    let Ok(metrics) = ctx.measure_text(line) else {
        return;
    };
    let width = metrics.width();
    let start = match align {
        TextAlign::Left => x,
        TextAlign::Center => x - width / 2.0,
        TextAlign::Right => x - width,
    };
    ctx.fill_rect(start, y + size * 0.9, width, (size * 0.05).max(1.0));
}

/// Gradients span the node's intrinsic box, like the raster fill.
fn apply_fill(ctx: &CanvasRenderingContext2d, paint: &Paint, node: &SceneNode) {
    match paint {
        Paint::Solid(c) => ctx.set_fill_style_str(&c.to_css()),
        Paint::LinearGradient(g) => {
            let coords = g.coords();
            let (w, h) = (node.width as f64, node.height as f64);
            let (x0, y0) = (-w / 2.0, -h / 2.0);
            let grad = ctx.create_linear_gradient(
                x0 + coords.x1 as f64 * w,
                y0 + coords.y1 as f64 * h,
                x0 + coords.x2 as f64 * w,
                y0 + coords.y2 as f64 * h,
            );
            for stop in g.stops() {
                let _ = grad.add_color_stop(stop.offset, &stop.color.to_css());
            }
            ctx.set_fill_style_canvas_gradient(&grad);
        }
    }
}

fn clear_shadow(ctx: &CanvasRenderingContext2d) {
    ctx.set_shadow_blur(0.0);
    ctx.set_shadow_offset_x(0.0);
    ctx.set_shadow_offset_y(0.0);
    ctx.set_shadow_color("transparent");
}
