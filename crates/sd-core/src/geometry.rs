//! Geometry helpers bridging `PathCmd` lists and `kurbo` shapes.

use crate::model::PathCmd;
use kurbo::{BezPath, PathEl, Point, Rect, Shape};

/// Shape flattening tolerance for circle/ellipse conversion.
const SHAPE_TOLERANCE: f64 = 0.1;

fn pt(x: f32, y: f32) -> Point {
    Point::new(x as f64, y as f64)
}

/// Build a `kurbo::BezPath` from path commands.
pub fn to_bez_path(commands: &[PathCmd]) -> BezPath {
    let mut path = BezPath::new();
    let mut open = false;
    for cmd in commands {
        match *cmd {
            PathCmd::MoveTo(x, y) => {
                path.move_to(pt(x, y));
                open = true;
            }
            // A drawing command without a preceding moveto starts at the origin.
            _ if !open => {
                path.move_to(Point::ORIGIN);
                open = true;
                push_segment(&mut path, cmd);
            }
            _ => push_segment(&mut path, cmd),
        }
    }
    path
}

fn push_segment(path: &mut BezPath, cmd: &PathCmd) {
    match *cmd {
        PathCmd::MoveTo(x, y) => path.move_to(pt(x, y)),
        PathCmd::LineTo(x, y) => path.line_to(pt(x, y)),
        PathCmd::QuadTo(cx, cy, x, y) => path.quad_to(pt(cx, cy), pt(x, y)),
        PathCmd::CubicTo(c1x, c1y, c2x, c2y, x, y) => {
            path.curve_to(pt(c1x, c1y), pt(c2x, c2y), pt(x, y))
        }
        PathCmd::Close => path.close_path(),
    }
}

/// Convert any kurbo shape into path commands.
pub fn shape_to_commands(shape: &impl Shape) -> Vec<PathCmd> {
    shape
        .path_elements(SHAPE_TOLERANCE)
        .map(|el| match el {
            PathEl::MoveTo(p) => PathCmd::MoveTo(p.x as f32, p.y as f32),
            PathEl::LineTo(p) => PathCmd::LineTo(p.x as f32, p.y as f32),
            PathEl::QuadTo(c, p) => PathCmd::QuadTo(c.x as f32, c.y as f32, p.x as f32, p.y as f32),
            PathEl::CurveTo(c1, c2, p) => PathCmd::CubicTo(
                c1.x as f32,
                c1.y as f32,
                c2.x as f32,
                c2.y as f32,
                p.x as f32,
                p.y as f32,
            ),
            PathEl::ClosePath => PathCmd::Close,
        })
        .collect()
}

/// Tight bounding box of the path geometry (curves included), or `None`
/// when there are no drawing commands.
pub fn path_bounds(commands: &[PathCmd]) -> Option<Rect> {
    if !commands.iter().any(|c| !matches!(c, PathCmd::Close)) {
        return None;
    }
    Some(to_bez_path(commands).bounding_box())
}

/// Union of several optional rectangles.
pub fn union_bounds(rects: impl IntoIterator<Item = Rect>) -> Option<Rect> {
    rects.into_iter().reduce(|acc, r| acc.union(r))
}
