//! The scene capability: the contract between the editor and whatever
//! owns the drawable nodes (the in-memory canvas, or a test double).

use crate::id::NodeId;
use crate::model::SceneNode;
use thiserror::Error;

/// Change notifications queued by a scene and drained by the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneEvent {
    NodeAdded(NodeId),
    NodeRemoved(NodeId),
    NodeModified(NodeId),
    NodeScaling(NodeId),
    NodeMoving(NodeId),
    NodeRotating(NodeId),
    SelectionCreated(NodeId),
    SelectionUpdated(NodeId),
    SelectionCleared,
}

impl SceneEvent {
    /// The node the event is about, if any.
    pub fn node(&self) -> Option<NodeId> {
        match *self {
            SceneEvent::NodeAdded(id)
            | SceneEvent::NodeRemoved(id)
            | SceneEvent::NodeModified(id)
            | SceneEvent::NodeScaling(id)
            | SceneEvent::NodeMoving(id)
            | SceneEvent::NodeRotating(id)
            | SceneEvent::SelectionCreated(id)
            | SceneEvent::SelectionUpdated(id) => Some(id),
            SceneEvent::SelectionCleared => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RasterFormat {
    #[default]
    Png,
}

impl RasterFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            RasterFormat::Png => "png",
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            RasterFormat::Png => "image/png",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterOptions {
    pub format: RasterFormat,
    /// 0.0 ..= 1.0; ignored by lossless formats.
    pub quality: f32,
    /// Output pixels per scene unit.
    pub multiplier: f32,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            format: RasterFormat::Png,
            quality: 1.0,
            multiplier: 1.0,
        }
    }
}

#[derive(Debug, Error)]
pub enum RasterError {
    #[error("cannot rasterize a {width}x{height} surface")]
    InvalidSize { width: u32, height: u32 },

    #[error("image encoding failed: {0}")]
    Encode(String),
}

/// Everything the editor needs from a scene.
///
/// Nodes are owned by the scene; callers hold `NodeId`s and resolve them
/// on every access. Writes through `node_mut` emit no events; callers
/// follow them with `recompute_coordinates` and `request_redraw`.
pub trait SceneCapability {
    /// Append a top-level node (top-most). Queues `NodeAdded`.
    fn add_node(&mut self, node: SceneNode) -> NodeId;

    /// Append a group with its children. Queues `NodeAdded` for the group.
    fn add_group(&mut self, group: SceneNode, children: Vec<SceneNode>) -> NodeId;

    /// Remove a top-level node and its children. Queues `NodeRemoved`,
    /// plus `SelectionCleared` if it was selected.
    fn remove_node(&mut self, id: NodeId) -> Option<SceneNode>;

    /// Top-level nodes, bottom → top.
    fn nodes(&self) -> Vec<NodeId>;

    fn node(&self, id: NodeId) -> Option<&SceneNode>;

    fn node_mut(&mut self, id: NodeId) -> Option<&mut SceneNode>;

    /// Direct children of a group, in paint order.
    fn children(&self, id: NodeId) -> Vec<NodeId>;

    fn active_node(&self) -> Option<NodeId>;

    /// All selected nodes (one entry for a single selection).
    fn active_nodes(&self) -> Vec<NodeId>;

    /// Replace the selection without queueing events.
    fn set_active_node(&mut self, id: Option<NodeId>);

    fn request_redraw(&mut self);

    /// Refresh the cached corner coordinates of a node (and its children).
    fn recompute_coordinates(&mut self, id: NodeId);

    /// Flatten the scene into encoded image bytes.
    fn export_raster(&self, options: &RasterOptions) -> Result<Vec<u8>, RasterError>;

    /// Take all queued events, oldest first.
    fn drain_events(&mut self) -> Vec<SceneEvent>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_node_lookup() {
        let id = NodeId::intern("evt");
        assert_eq!(SceneEvent::NodeMoving(id).node(), Some(id));
        assert_eq!(SceneEvent::SelectionCleared.node(), None);
    }

    #[test]
    fn raster_error_messages() {
        let e = RasterError::InvalidSize {
            width: 0,
            height: 600,
        };
        assert_eq!(e.to_string(), "cannot rasterize a 0x600 surface");
    }
}
