//! In-memory canvas: the scene capability the editor drives.
//!
//! Nodes live in a `petgraph` stable graph (edges go group → child).
//! Top-level z-order is an explicit list, bottom → top. Interactive
//! operations queue `SceneEvent`s; programmatic writes through
//! `node_mut` stay silent.

use crate::hit;
use crate::paint::{RenderOptions, paint_scene};
use kurbo::Affine;
use petgraph::Direction;
use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use sd_core::id::NodeId;
use sd_core::model::SceneNode;
use sd_core::scene::{RasterError, RasterFormat, RasterOptions, SceneCapability, SceneEvent};
use smallvec::SmallVec;
use std::collections::HashMap;
use tiny_skia::Pixmap;

#[derive(Debug, Clone)]
pub struct Canvas {
    graph: StableDiGraph<SceneNode, ()>,
    /// Top-level nodes, bottom → top.
    order: Vec<NodeIndex>,
    id_index: HashMap<NodeId, NodeIndex>,
    /// Active selection; more than one entry is a multi-selection.
    active: SmallVec<[NodeId; 4]>,
    events: Vec<SceneEvent>,
    width: u32,
    height: u32,
    redraws: u64,
}

impl Canvas {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            graph: StableDiGraph::new(),
            order: Vec::new(),
            id_index: HashMap::new(),
            active: SmallVec::new(),
            events: Vec::new(),
            width,
            height,
            redraws: 0,
        }
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Number of redraws requested so far.
    pub fn redraw_count(&self) -> u64 {
        self.redraws
    }

    /// Top-level nodes, bottom → top.
    pub fn top_level(&self) -> impl DoubleEndedIterator<Item = &SceneNode> + '_ {
        self.order.iter().map(|&idx| &self.graph[idx])
    }

    pub fn get(&self, id: NodeId) -> Option<&SceneNode> {
        self.id_index.get(&id).map(|idx| &self.graph[*idx])
    }

    /// Child indices of a group in insertion (paint) order.
    ///
    /// Sorts by `NodeIndex` so the result is deterministic regardless of
    /// how `petgraph` iterates its adjacency list.
    fn child_indices(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut children: Vec<NodeIndex> = self
            .graph
            .neighbors_directed(idx, Direction::Outgoing)
            .collect();
        children.sort();
        children
    }

    pub fn children_of(&self, id: NodeId) -> Vec<&SceneNode> {
        match self.id_index.get(&id) {
            Some(&idx) => self
                .child_indices(idx)
                .into_iter()
                .map(|c| &self.graph[c])
                .collect(),
            None => Vec::new(),
        }
    }

    fn parent(&self, idx: NodeIndex) -> Option<NodeIndex> {
        self.graph.neighbors_directed(idx, Direction::Incoming).next()
    }

    pub fn selection(&self) -> &[NodeId] {
        &self.active
    }

    fn insert(&mut self, node: SceneNode) -> NodeIndex {
        let id = node.id;
        let idx = self.graph.add_node(node);
        self.id_index.insert(id, idx);
        idx
    }

    // ─── Selection ───────────────────────────────────────────────────────

    /// Replace the selection and queue the matching selection event.
    fn select(&mut self, ids: SmallVec<[NodeId; 4]>) {
        let had_selection = !self.active.is_empty();
        let changed = self.active != ids;
        self.active = ids;
        match self.active.first().copied() {
            Some(first) if !had_selection => self.events.push(SceneEvent::SelectionCreated(first)),
            Some(first) if changed => self.events.push(SceneEvent::SelectionUpdated(first)),
            Some(_) => {}
            None if had_selection => self.events.push(SceneEvent::SelectionCleared),
            None => {}
        }
        if changed {
            self.request_redraw();
        }
    }

    /// Pointer-down selection: picks the topmost visible, selectable node.
    pub fn select_at(&mut self, x: f32, y: f32) -> Option<NodeId> {
        let hit = hit::hit_test(self, x, y);
        self.select(hit.into_iter().collect());
        hit
    }

    /// Marquee selection over a scene-space rectangle.
    pub fn select_in_rect(&mut self, x: f32, y: f32, w: f32, h: f32) -> Vec<NodeId> {
        let hits = hit::hit_test_rect(self, x, y, w, h);
        self.select(hits.iter().copied().collect());
        hits
    }

    /// Select several nodes at once. Unknown ids are ignored.
    pub fn select_nodes(&mut self, ids: &[NodeId]) {
        let known = ids
            .iter()
            .copied()
            .filter(|id| self.id_index.contains_key(id))
            .collect();
        self.select(known);
    }

    pub fn clear_selection(&mut self) {
        self.select(SmallVec::new());
    }

    // ─── Interactive transforms ──────────────────────────────────────────

    fn interact(&mut self, id: NodeId, edit: impl FnOnce(&mut SceneNode) -> bool) -> bool {
        let Some(&idx) = self.id_index.get(&id) else {
            return false;
        };
        if !edit(&mut self.graph[idx]) {
            log::debug!("interaction on locked node {id} refused");
            return false;
        }
        self.graph[idx].dirty = true;
        self.recompute_coordinates(id);
        self.request_redraw();
        true
    }

    /// Drag by a scene-space delta. Refused when movement is locked.
    pub fn translate(&mut self, id: NodeId, dx: f32, dy: f32) -> bool {
        let moved = self.interact(id, |node| {
            if node.locks.movement {
                return false;
            }
            node.transform.left += dx;
            node.transform.top += dy;
            true
        });
        if moved {
            self.events.push(SceneEvent::NodeMoving(id));
        }
        moved
    }

    /// Multiply the node's scale. Locked axes keep their scale; refused
    /// when both axes are locked.
    pub fn scale(&mut self, id: NodeId, fx: f32, fy: f32) -> bool {
        let scaled = self.interact(id, |node| {
            if node.locks.scaling_x && node.locks.scaling_y {
                return false;
            }
            if !node.locks.scaling_x {
                node.transform.scale_x *= fx;
            }
            if !node.locks.scaling_y {
                node.transform.scale_y *= fy;
            }
            true
        });
        if scaled {
            self.events.push(SceneEvent::NodeScaling(id));
        }
        scaled
    }

    /// Rotate by `delta` degrees. Refused when rotation is locked.
    pub fn rotate(&mut self, id: NodeId, delta: f32) -> bool {
        let rotated = self.interact(id, |node| {
            if node.locks.rotation {
                return false;
            }
            node.transform.angle = (node.transform.angle + delta).rem_euclid(360.0);
            true
        });
        if rotated {
            self.events.push(SceneEvent::NodeRotating(id));
        }
        rotated
    }

    /// End of a drag/scale/rotate gesture.
    pub fn finish_transform(&mut self, id: NodeId) {
        if self.id_index.contains_key(&id) {
            self.events.push(SceneEvent::NodeModified(id));
        }
    }

    // ─── Z-order ─────────────────────────────────────────────────────────

    fn reorder(&mut self, id: NodeId, forward: bool) -> bool {
        let Some(&idx) = self.id_index.get(&id) else {
            return false;
        };
        let Some(pos) = self.order.iter().position(|&i| i == idx) else {
            return false;
        };
        let target = if forward {
            if pos + 1 >= self.order.len() {
                return false; // already at front
            }
            pos + 1
        } else {
            if pos == 0 {
                return false; // already at back
            }
            pos - 1
        };
        self.order.swap(pos, target);
        self.events.push(SceneEvent::NodeModified(id));
        self.request_redraw();
        true
    }

    /// Move one step forward in z-order. Returns true if the order changed.
    pub fn bring_forward(&mut self, id: NodeId) -> bool {
        self.reorder(id, true)
    }

    /// Move one step backward in z-order. Returns true if the order changed.
    pub fn send_backward(&mut self, id: NodeId) -> bool {
        self.reorder(id, false)
    }

    // ─── Rendering ───────────────────────────────────────────────────────

    /// Rasterize the canvas at `options.scale`.
    pub fn render(&self, options: &RenderOptions) -> Result<Pixmap, RasterError> {
        let width = (self.width as f32 * options.scale).round() as u32;
        let height = (self.height as f32 * options.scale).round() as u32;
        let mut pixmap =
            Pixmap::new(width, height).ok_or(RasterError::InvalidSize { width, height })?;
        paint_scene(&mut pixmap, self, options);
        Ok(pixmap)
    }
}

impl SceneCapability for Canvas {
    fn add_node(&mut self, node: SceneNode) -> NodeId {
        let id = node.id;
        let idx = self.insert(node);
        self.order.push(idx);
        self.recompute_coordinates(id);
        self.events.push(SceneEvent::NodeAdded(id));
        self.request_redraw();
        id
    }

    fn add_group(&mut self, group: SceneNode, children: Vec<SceneNode>) -> NodeId {
        let id = group.id;
        let idx = self.insert(group);
        for child in children {
            let child_idx = self.insert(child);
            self.graph.add_edge(idx, child_idx, ());
        }
        self.order.push(idx);
        self.recompute_coordinates(id);
        self.events.push(SceneEvent::NodeAdded(id));
        self.request_redraw();
        id
    }

    fn remove_node(&mut self, id: NodeId) -> Option<SceneNode> {
        let idx = self.id_index.get(&id).copied()?;

        // Descendants go first so the graph never holds orphans.
        let mut stack = self.child_indices(idx);
        while let Some(child) = stack.pop() {
            stack.extend(self.child_indices(child));
            if let Some(removed) = self.graph.remove_node(child) {
                self.id_index.remove(&removed.id);
            }
        }

        self.order.retain(|&i| i != idx);
        let removed = self.graph.remove_node(idx)?;
        self.id_index.remove(&id);
        self.events.push(SceneEvent::NodeRemoved(id));

        if self.active.contains(&id) {
            self.active.retain(|a| *a != id);
            if self.active.is_empty() {
                self.events.push(SceneEvent::SelectionCleared);
            }
        }
        self.request_redraw();
        Some(removed)
    }

    fn nodes(&self) -> Vec<NodeId> {
        self.top_level().map(|n| n.id).collect()
    }

    fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.get(id)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.id_index
            .get(&id)
            .copied()
            .map(|idx| &mut self.graph[idx])
    }

    fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.children_of(id).into_iter().map(|n| n.id).collect()
    }

    fn active_node(&self) -> Option<NodeId> {
        match self.active.as_slice() {
            [single] => Some(*single),
            _ => None,
        }
    }

    fn active_nodes(&self) -> Vec<NodeId> {
        self.active.to_vec()
    }

    fn set_active_node(&mut self, id: Option<NodeId>) {
        let next: SmallVec<[NodeId; 4]> = id
            .filter(|id| self.id_index.contains_key(id))
            .into_iter()
            .collect();
        if self.active != next {
            self.active = next;
            self.request_redraw();
        }
    }

    fn request_redraw(&mut self) {
        self.redraws += 1;
    }

    fn recompute_coordinates(&mut self, id: NodeId) {
        let Some(&idx) = self.id_index.get(&id) else {
            return;
        };
        // Children of a group are placed relative to the group's center.
        let parent = match self.parent(idx) {
            Some(p) => self.graph[p].transform.affine(),
            None => Affine::IDENTITY,
        };
        let coords = self.graph[idx].compute_coords(parent);
        self.graph[idx].coords = Some(coords);

        let m = parent * self.graph[idx].transform.affine();
        for child in self.child_indices(idx) {
            let coords = self.graph[child].compute_coords(m);
            self.graph[child].coords = Some(coords);
        }
    }

    fn export_raster(&self, options: &RasterOptions) -> Result<Vec<u8>, RasterError> {
        let pixmap = self.render(&RenderOptions {
            scale: options.multiplier,
            background: None,
            show_selection: false,
            draw_text: true,
        })?;
        match options.format {
            RasterFormat::Png => pixmap
                .encode_png()
                .map_err(|e| RasterError::Encode(e.to_string())),
        }
    }

    fn drain_events(&mut self) -> Vec<SceneEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sd_core::model::*;

    fn dot(left: f32, top: f32) -> SceneNode {
        let mut node = SceneNode::group(20.0, 20.0);
        node.transform = Transform::at(left, top);
        node
    }

    #[test]
    fn add_and_remove_keep_order_and_index() {
        let mut canvas = Canvas::new(500, 600);
        let a = canvas.add_node(dot(10.0, 10.0));
        let b = canvas.add_node(dot(20.0, 20.0));
        let c = canvas.add_node(dot(30.0, 30.0));
        assert_eq!(canvas.nodes(), vec![a, b, c]);

        let removed = canvas.remove_node(b).unwrap();
        assert_eq!(removed.id, b);
        assert_eq!(canvas.nodes(), vec![a, c]);
        assert!(canvas.node(b).is_none());
        assert!(canvas.remove_node(b).is_none());
    }

    #[test]
    fn events_are_queued_and_drained_once() {
        let mut canvas = Canvas::new(500, 600);
        let a = canvas.add_node(dot(100.0, 100.0));
        canvas.select_at(100.0, 100.0);
        assert_eq!(
            canvas.drain_events(),
            vec![SceneEvent::NodeAdded(a), SceneEvent::SelectionCreated(a)]
        );
        assert!(canvas.drain_events().is_empty());
    }

    #[test]
    fn removing_active_node_clears_selection() {
        let mut canvas = Canvas::new(500, 600);
        let a = canvas.add_node(dot(100.0, 100.0));
        canvas.set_active_node(Some(a));
        canvas.drain_events();

        canvas.remove_node(a);
        assert_eq!(canvas.active_node(), None);
        assert_eq!(
            canvas.drain_events(),
            vec![SceneEvent::NodeRemoved(a), SceneEvent::SelectionCleared]
        );
    }

    #[test]
    fn selection_events_follow_transitions() {
        let mut canvas = Canvas::new(500, 600);
        let a = canvas.add_node(dot(100.0, 100.0));
        let b = canvas.add_node(dot(300.0, 300.0));
        canvas.drain_events();

        canvas.select_at(100.0, 100.0);
        canvas.select_at(300.0, 300.0);
        canvas.select_at(300.0, 300.0);
        canvas.select_at(450.0, 50.0);
        assert_eq!(
            canvas.drain_events(),
            vec![
                SceneEvent::SelectionCreated(a),
                SceneEvent::SelectionUpdated(b),
                SceneEvent::SelectionCleared,
            ]
        );
    }

    #[test]
    fn multi_selection_has_no_single_active_node() {
        let mut canvas = Canvas::new(500, 600);
        let a = canvas.add_node(dot(10.0, 10.0));
        let b = canvas.add_node(dot(50.0, 50.0));
        canvas.select_nodes(&[a, b, NodeId::intern("ghost")]);
        assert_eq!(canvas.active_nodes(), vec![a, b]);
        assert_eq!(canvas.active_node(), None);
    }

    #[test]
    fn locked_nodes_refuse_interaction() {
        let mut canvas = Canvas::new(500, 600);
        let a = canvas.add_node(dot(100.0, 100.0));
        canvas.node_mut(a).unwrap().locks = Locks::all(true);
        canvas.drain_events();

        assert!(!canvas.translate(a, 10.0, 0.0));
        assert!(!canvas.rotate(a, 15.0));
        assert!(!canvas.scale(a, 2.0, 2.0));
        assert_eq!(canvas.node(a).unwrap().transform, Transform::at(100.0, 100.0));
        assert!(canvas.drain_events().is_empty());
    }

    #[test]
    fn interactions_emit_gesture_events_and_update_coords() {
        let mut canvas = Canvas::new(500, 600);
        let a = canvas.add_node(dot(100.0, 100.0));
        canvas.drain_events();

        assert!(canvas.translate(a, 10.0, 5.0));
        assert!(canvas.scale(a, 2.0, 2.0));
        assert!(canvas.rotate(a, 370.0));
        canvas.finish_transform(a);

        let node = canvas.node(a).unwrap();
        assert_eq!(node.transform.angle, 10.0);
        let (cx, cy) = node.coords.unwrap().center();
        assert!((cx - 110.0).abs() < 1e-3 && (cy - 105.0).abs() < 1e-3, "center ({cx}, {cy})");
        assert_eq!(
            canvas.drain_events(),
            vec![
                SceneEvent::NodeMoving(a),
                SceneEvent::NodeScaling(a),
                SceneEvent::NodeRotating(a),
                SceneEvent::NodeModified(a),
            ]
        );
    }

    #[test]
    fn z_order_swaps_neighbors() {
        let mut canvas = Canvas::new(500, 600);
        let a = canvas.add_node(dot(10.0, 10.0));
        let b = canvas.add_node(dot(20.0, 20.0));
        assert!(!canvas.bring_forward(b));
        assert!(canvas.bring_forward(a));
        assert_eq!(canvas.nodes(), vec![b, a]);
        assert!(canvas.send_backward(a));
        assert_eq!(canvas.nodes(), vec![a, b]);
        assert!(!canvas.send_backward(a));
    }

    #[test]
    fn group_children_are_placed_relative_to_group() {
        let mut canvas = Canvas::new(500, 600);
        let mut child = SceneNode::group(10.0, 10.0);
        child.transform = Transform::at(5.0, 0.0);
        let child_id = child.id;
        let mut group = SceneNode::group(20.0, 10.0);
        group.transform = Transform::at(200.0, 100.0);
        group.transform.scale_x = 2.0;
        group.transform.scale_y = 2.0;
        let g = canvas.add_group(group, vec![child]);

        assert_eq!(canvas.children(g), vec![child_id]);
        assert_eq!(canvas.nodes(), vec![g]);
        let center = canvas.node(child_id).unwrap().coords.unwrap().center();
        assert_eq!(center, (210.0, 100.0));

        canvas.remove_node(g);
        assert!(canvas.node(child_id).is_none());
    }

    #[test]
    fn export_rejects_zero_sized_canvas() {
        let canvas = Canvas::new(0, 600);
        let err = canvas.export_raster(&RasterOptions::default()).unwrap_err();
        assert!(matches!(err, RasterError::InvalidSize { width: 0, .. }));
    }

    #[test]
    fn export_encodes_png_at_multiplier() {
        let mut canvas = Canvas::new(50, 60);
        canvas.add_node(dot(25.0, 30.0));
        let bytes = canvas
            .export_raster(&RasterOptions {
                multiplier: 2.0,
                ..Default::default()
            })
            .unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
        let pixmap = Pixmap::decode_png(&bytes).unwrap();
        assert_eq!((pixmap.width(), pixmap.height()), (100, 120));
    }
}
