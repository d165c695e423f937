//! Keyboard shortcut mapping.
//!
//! Maps key events to semantic `ShortcutAction`s and runs them against the
//! editor. Keys typed into text fields never reach the canvas.

use crate::sync::Editor;
use sd_core::scene::SceneCapability;

/// Actions that keyboard shortcuts can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    /// Remove every selected node.
    Delete,
    Deselect,
}

/// Resolves key events into shortcut actions.
pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key event to an action.
    ///
    /// `key` is the `KeyboardEvent.key` value (e.g. `"Delete"`).
    /// Modifiers do not change the binding of the editing keys.
    pub fn resolve(
        key: &str,
        _ctrl: bool,
        _shift: bool,
        _alt: bool,
        _meta: bool,
    ) -> Option<ShortcutAction> {
        match key {
            "Delete" | "Backspace" => Some(ShortcutAction::Delete),
            "Escape" => Some(ShortcutAction::Deselect),
            _ => None,
        }
    }
}

/// The element that had focus when the key was pressed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FocusTarget {
    /// Upper-case tag name, as `Element.tagName` reports it.
    pub tag_name: String,
    pub content_editable: bool,
}

impl FocusTarget {
    pub fn new(tag_name: impl Into<String>, content_editable: bool) -> Self {
        Self {
            tag_name: tag_name.into(),
            content_editable,
        }
    }

    /// Whether the element takes typed text itself.
    pub fn accepts_text(&self) -> bool {
        self.content_editable
            || self.tag_name.eq_ignore_ascii_case("INPUT")
            || self.tag_name.eq_ignore_ascii_case("TEXTAREA")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyInput {
    pub key: String,
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub meta: bool,
    pub focus: FocusTarget,
}

impl KeyInput {
    pub fn new(key: impl Into<String>, focus: FocusTarget) -> Self {
        Self {
            key: key.into(),
            focus,
            ..Default::default()
        }
    }
}

impl<S: SceneCapability> Editor<S> {
    /// Handle a key press. Returns the action that ran, if any.
    pub fn handle_key(&mut self, input: &KeyInput) -> Option<ShortcutAction> {
        if input.focus.accepts_text() {
            return None;
        }
        let action = ShortcutMap::resolve(&input.key, input.ctrl, input.shift, input.alt, input.meta)?;
        match action {
            ShortcutAction::Delete => {
                self.delete_selection();
            }
            ShortcutAction::Deselect => self.select(None),
        }
        Some(action)
    }

    /// Remove all selected nodes, clearing the selection first. Returns how
    /// many nodes were removed.
    pub fn delete_selection(&mut self) -> usize {
        let Some(scene) = self.scene_mut() else {
            return 0;
        };
        let selected = scene.active_nodes();
        if selected.is_empty() {
            return 0;
        }
        scene.set_active_node(None);
        let removed = selected
            .into_iter()
            .filter(|id| scene.remove_node(*id).is_some())
            .count();
        scene.request_redraw();
        self.reconcile();
        log::debug!("deleted {removed} selected node(s)");
        removed
    }
}
