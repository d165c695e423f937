//! Layer mirror and index-addressed layer operations.
//!
//! The mirror is a plain copy of what the layers panel shows. It is rebuilt
//! from the live scene after every mutation and every drained event batch,
//! so its length and order always equal the scene's top-level list.

use crate::sync::Editor;
use sd_core::id::NodeId;
use sd_core::model::{Locks, NodeKind, SceneNode};
use sd_core::scene::SceneCapability;
use serde::Serialize;

/// One row of the layers panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerEntry {
    /// Position in the scene's top-level list (0 = bottom).
    pub index: usize,
    pub id: NodeId,
    pub kind: &'static str,
    pub name: String,
    pub visible: bool,
    pub locked: bool,
}

impl LayerEntry {
    pub fn from_node(index: usize, node: &SceneNode) -> Self {
        let name = match &node.kind {
            NodeKind::Text(props) if !props.content.is_empty() => props.content.clone(),
            NodeKind::Image(_) => "تصویر".to_string(),
            _ => "لایه".to_string(),
        };
        Self {
            index,
            id: node.id,
            kind: node.kind.name(),
            name,
            visible: node.visible,
            locked: node.locks.movement,
        }
    }
}

/// The editor's copy of the layer list and the active node.
#[derive(Debug, Clone, Default)]
pub struct LayerMirror {
    layers: Vec<LayerEntry>,
    active: Option<NodeId>,
    snapshot: Option<SceneNode>,
}

impl LayerMirror {
    pub fn layers(&self) -> &[LayerEntry] {
        &self.layers
    }

    pub fn active(&self) -> Option<NodeId> {
        self.active
    }

    pub fn snapshot(&self) -> Option<&SceneNode> {
        self.snapshot.as_ref()
    }

    pub(crate) fn clear(&mut self) {
        *self = Self::default();
    }

    /// Re-read every top-level node and the scene's selection.
    pub(crate) fn rebuild<S: SceneCapability>(&mut self, scene: &S) {
        self.layers = scene
            .nodes()
            .into_iter()
            .enumerate()
            .filter_map(|(index, id)| scene.node(id).map(|n| LayerEntry::from_node(index, n)))
            .collect();
        self.snapshot = scene.active_node().and_then(|id| scene.node(id).cloned());
        self.active = self.snapshot.as_ref().map(|n| n.id);
    }

    /// Entries top-most first, as the panel lists them.
    pub fn display_order(&self) -> impl Iterator<Item = &LayerEntry> + '_ {
        self.layers.iter().rev()
    }
}

// ─── Layer operations ───────────────────────────────────────────────────────

impl<S: SceneCapability> Editor<S> {
    /// Resolve the node at `index` from the live scene (not the mirror).
    fn node_at(&self, index: usize) -> Option<NodeId> {
        self.scene()?.nodes().get(index).copied()
    }

    pub fn display_order(&self) -> impl Iterator<Item = &LayerEntry> + '_ {
        self.mirror.display_order()
    }

    /// Remove the layer at `index` and clear the selection.
    pub fn delete_layer(&mut self, index: usize) -> bool {
        let Some(id) = self.node_at(index) else {
            log::debug!("delete_layer: no layer at {index}");
            return false;
        };
        let Some(scene) = self.scene_mut() else {
            return false;
        };
        scene.remove_node(id);
        scene.set_active_node(None);
        scene.request_redraw();
        self.reconcile();
        true
    }

    /// Flip all four locks and selectability together.
    pub fn toggle_lock(&mut self, index: usize) -> bool {
        let Some(id) = self.node_at(index) else {
            return false;
        };
        let Some(scene) = self.scene_mut() else {
            return false;
        };
        let Some(node) = scene.node_mut(id) else {
            return false;
        };
        let lock = !node.locks.movement;
        node.locks = Locks::all(lock);
        node.selectable = !lock;
        scene.request_redraw();
        self.reconcile();
        true
    }

    /// Show or hide the layer at `index`. Hiding clears the selection.
    pub fn toggle_visibility(&mut self, index: usize) -> bool {
        let Some(id) = self.node_at(index) else {
            return false;
        };
        let Some(scene) = self.scene_mut() else {
            return false;
        };
        let Some(node) = scene.node_mut(id) else {
            return false;
        };
        node.visible = !node.visible;
        let hidden = !node.visible;
        if hidden {
            scene.set_active_node(None);
        }
        scene.request_redraw();
        self.reconcile();
        true
    }
}
