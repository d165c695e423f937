//! Hit testing: point → node lookup.
//!
//! Reverse-walks the top-level nodes (front-to-back) to find which node
//! is at a given (x, y) canvas position. Groups are hit as a whole.

use crate::canvas::Canvas;
use kurbo::{Affine, Point};
use sd_core::id::NodeId;
use sd_core::model::SceneNode;

/// Whether a node can be picked by pointer interaction at all.
fn pickable(node: &SceneNode) -> bool {
    node.visible && node.selectable
}

/// Point-in-node test against the node's rotated box, widened by the
/// selection padding (in screen units, so it does not scale with the node).
pub fn node_contains(node: &SceneNode, parent: Affine, px: f32, py: f32) -> bool {
    let m = parent * node.transform.affine();
    if m.determinant().abs() < f64::EPSILON {
        return false;
    }
    let local = m.inverse() * Point::new(px as f64, py as f64);
    let pad = node.handles.padding as f64;
    let sx = (node.transform.scale_x as f64).abs().max(f64::EPSILON);
    let sy = (node.transform.scale_y as f64).abs().max(f64::EPSILON);
    let half_w = node.width as f64 / 2.0 + pad / sx;
    let half_h = node.height as f64 / 2.0 + pad / sy;
    local.x.abs() <= half_w && local.y.abs() <= half_h
}

/// Find the topmost pickable node at position (px, py).
/// Returns `None` if no node is hit (background).
pub fn hit_test(canvas: &Canvas, px: f32, py: f32) -> Option<NodeId> {
    // Last painted = topmost
    canvas
        .top_level()
        .rev()
        .find(|node| pickable(node) && node_contains(node, Affine::IDENTITY, px, py))
        .map(|node| node.id)
}

/// Find all pickable nodes whose bounds intersect the given rectangle.
/// Used for marquee (box) selection. Returned bottom → top.
pub fn hit_test_rect(canvas: &Canvas, rx: f32, ry: f32, rw: f32, rh: f32) -> Vec<NodeId> {
    canvas
        .top_level()
        .filter(|node| pickable(node))
        .filter(|node| {
            let Some(coords) = node.coords else {
                return false;
            };
            let (x, y, w, h) = coords.aabb();
            x < rx + rw && x + w > rx && y < ry + rh && y + h > ry
        })
        .map(|node| node.id)
        .collect()
}
