//! The editor: property sync between the UI and the scene.
//!
//! `Editor` owns an optional scene capability plus a mirror of its layer
//! list and active node. The UI reads from the mirror and writes through
//! the editor:
//!
//! - **UI → Scene**: `apply_property` writes one property on the active
//!   node, disables caching, marks it dirty, refreshes its coordinates,
//!   requests a redraw and re-reads the scene into the mirror.
//! - **Scene → UI**: interactive changes queue `SceneEvent`s on the scene;
//!   `reconcile` drains them and rebuilds the mirror.
//!
//! Without a scene (or without an active node) every write is a no-op.

use crate::config::EditorConfig;
use crate::layers::{LayerEntry, LayerMirror};
use sd_core::catalog::{CANVAS_HEIGHT, CANVAS_WIDTH, PrintArea, Product, ProductColor, ProductView};
use sd_core::id::NodeId;
use sd_core::model::*;
use sd_core::scene::{SceneCapability, SceneEvent};
use sd_core::{DEFAULT_GRADIENT_ANGLE, find_gradient_preset, find_product, products};

/// How the active node is filled, as the fill picker shows it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FillMode {
    Solid(Color),
    Gradient { start: Color, end: Color, angle: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaleAxis {
    X,
    Y,
    Both,
}

/// One field of a shadow, for slider-style edits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShadowField {
    Color(Color),
    Blur(f32),
    OffsetX(f32),
    OffsetY(f32),
}

/// Editor state: the scene plus the UI-facing mirror of it.
pub struct Editor<S: SceneCapability> {
    scene: Option<S>,
    pub config: EditorConfig,
    pub(crate) mirror: LayerMirror,
    product: &'static Product,
    color_id: String,
    view_id: String,
}

impl<S: SceneCapability> Editor<S> {
    /// Create an editor bound to a scene.
    pub fn new(scene: S, config: EditorConfig) -> Self {
        let mut editor = Self::detached(config);
        editor.attach(scene);
        editor
    }

    /// Create an editor with no scene yet (the canvas mounts later).
    pub fn detached(config: EditorConfig) -> Self {
        let product = &products()[0];
        Self {
            scene: None,
            config,
            mirror: LayerMirror::default(),
            product,
            color_id: product.colors.first().map(|c| c.id.clone()).unwrap_or_default(),
            view_id: product.views.first().map(|v| v.id.clone()).unwrap_or_default(),
        }
    }

    pub fn attach(&mut self, scene: S) {
        self.scene = Some(scene);
        self.mirror.clear();
        self.reconcile();
    }

    /// Unmount the scene, returning it. The mirror is emptied.
    pub fn detach(&mut self) -> Option<S> {
        self.mirror.clear();
        self.scene.take()
    }

    pub fn scene(&self) -> Option<&S> {
        self.scene.as_ref()
    }

    /// Direct scene access for interactive gestures. Call `reconcile`
    /// afterwards so the mirror picks up the queued events.
    pub fn scene_mut(&mut self) -> Option<&mut S> {
        self.scene.as_mut()
    }

    // ─── Mirror ──────────────────────────────────────────────────────────

    /// Layers bottom → top, as last read from the scene.
    pub fn layers(&self) -> &[LayerEntry] {
        self.mirror.layers()
    }

    pub fn active(&self) -> Option<NodeId> {
        self.mirror.active()
    }

    /// A copy of the active node taken at the last refresh.
    pub fn active_snapshot(&self) -> Option<&SceneNode> {
        self.mirror.snapshot()
    }

    /// Drain queued scene events and re-read the scene into the mirror.
    /// The active node always follows the scene's selection; a
    /// multi-selection leaves it empty. Returns how many events were
    /// processed.
    pub fn reconcile(&mut self) -> usize {
        let Some(scene) = self.scene.as_mut() else {
            log::debug!("reconcile: no scene mounted");
            return 0;
        };
        let events = scene.drain_events();
        for event in &events {
            if let SceneEvent::NodeAdded(id) = *event
                && let Some(node) = scene.node_mut(id)
            {
                node.caching = false;
            }
        }
        log::trace!("reconcile: {} event(s)", events.len());
        self.mirror.rebuild(&*scene);
        events.len()
    }

    /// Make `id` the active node and refresh the mirror.
    pub fn select(&mut self, id: Option<NodeId>) {
        let Some(scene) = self.scene.as_mut() else {
            return;
        };
        let id = id.filter(|id| scene.node(*id).is_some());
        scene.set_active_node(id);
        scene.request_redraw();
        self.reconcile();
    }

    // ─── Product ─────────────────────────────────────────────────────────

    pub fn product(&self) -> &'static Product {
        self.product
    }

    pub fn product_color(&self) -> Option<&'static ProductColor> {
        self.product.color(&self.color_id)
    }

    pub fn product_view(&self) -> Option<&'static ProductView> {
        self.product.view(&self.view_id)
    }

    /// Switch garments. Color and view reset to the product's first ones.
    pub fn select_product(&mut self, id: &str) -> bool {
        let Some(product) = find_product(id) else {
            log::warn!("unknown product '{id}'");
            return false;
        };
        self.product = product;
        self.color_id = product.colors.first().map(|c| c.id.clone()).unwrap_or_default();
        self.view_id = product.views.first().map(|v| v.id.clone()).unwrap_or_default();
        true
    }

    pub fn select_color(&mut self, id: &str) -> bool {
        if self.product.color(id).is_none() {
            return false;
        }
        self.color_id = id.to_string();
        true
    }

    pub fn select_view(&mut self, id: &str) -> bool {
        if self.product.view(id).is_none() {
            return false;
        }
        self.view_id = id.to_string();
        true
    }

    /// Print area of the current view, or the whole canvas if the product
    /// has no views.
    pub fn print_area(&self) -> PrintArea {
        self.product_view()
            .or_else(|| self.product.views.first())
            .map(|v| v.print_area)
            .unwrap_or(PrintArea {
                top: 0.0,
                left: 0.0,
                width: CANVAS_WIDTH as f32,
                height: CANVAS_HEIGHT as f32,
            })
    }

    // ─── Property writes ─────────────────────────────────────────────────

    /// Run `edit` against the active node, then run the post-write pipeline.
    fn write_active(&mut self, edit: impl FnOnce(&mut S, NodeId) -> bool) -> bool {
        let Some(id) = self.mirror.active() else {
            log::debug!("property write skipped: nothing selected");
            return false;
        };
        let Some(scene) = self.scene.as_mut() else {
            log::debug!("property write skipped: no scene mounted");
            return false;
        };
        if scene.node(id).is_none() || !edit(scene, id) {
            return false;
        }
        if let Some(node) = scene.node_mut(id) {
            node.caching = false;
            node.dirty = true;
        }
        scene.recompute_coordinates(id);
        scene.request_redraw();
        self.reconcile();
        true
    }

    /// Write one property on the active node. A fill on a group is also
    /// written to each of its direct children. Hiding the node clears the
    /// selection.
    pub fn apply_property(&mut self, prop: Property) -> bool {
        self.write_active(|scene, id| {
            let fill = match &prop {
                Property::Fill(paint) => Some(*paint),
                _ => None,
            };
            let hides = matches!(prop, Property::Visible(false));
            let Some(node) = scene.node_mut(id) else {
                return false;
            };
            let is_group = node.is_group();
            if !node.set(prop) {
                log::debug!("property does not apply to a {} node", node.kind.name());
                return false;
            }
            if let (true, Some(paint)) = (is_group, fill) {
                for child in scene.children(id) {
                    if let Some(child) = scene.node_mut(child) {
                        child.fill = paint;
                        child.dirty = true;
                    }
                }
            }
            if hides {
                scene.set_active_node(None);
            }
            true
        })
    }

    fn read_active(&self) -> Option<&SceneNode> {
        let id = self.mirror.active()?;
        self.scene.as_ref()?.node(id)
    }

    // ─── Shadow ──────────────────────────────────────────────────────────

    /// Switch the shadow on (with the configured default) or off.
    pub fn toggle_shadow(&mut self, on: bool) -> bool {
        let shadow = on.then_some(self.config.shadow);
        self.apply_property(Property::Shadow(shadow))
    }

    /// Merge one field into the current shadow (a blank black shadow if
    /// there is none yet).
    pub fn update_shadow(&mut self, field: ShadowField) -> bool {
        let mut shadow = self.current_shadow();
        match field {
            ShadowField::Color(c) => shadow.color = c,
            ShadowField::Blur(b) => shadow.blur = b.max(0.0),
            ShadowField::OffsetX(x) => shadow.offset_x = x,
            ShadowField::OffsetY(y) => shadow.offset_y = y,
        }
        self.apply_property(Property::Shadow(Some(shadow)))
    }

    /// Place the shadow `distance` units away at `angle` degrees.
    pub fn set_shadow_polar(&mut self, distance: f32, angle: f32) -> bool {
        let current = self.current_shadow();
        let shadow = Shadow::from_polar(current.color, current.blur, distance, angle);
        self.apply_property(Property::Shadow(Some(shadow)))
    }

    /// The active node's shadow offset as rounded (distance, angle).
    pub fn shadow_polar(&self) -> Option<(f32, f32)> {
        self.read_active()?.shadow.map(|s| s.polar())
    }

    fn current_shadow(&self) -> Shadow {
        self.read_active()
            .and_then(|n| n.shadow)
            .unwrap_or(Shadow {
                color: Color::BLACK,
                blur: 0.0,
                offset_x: 0.0,
                offset_y: 0.0,
            })
    }

    // ─── Stroke ──────────────────────────────────────────────────────────

    /// Enabling sets the default width and a default color only when none
    /// is set. Disabling zeroes the width and keeps the color.
    pub fn set_stroke_enabled(&mut self, enabled: bool) -> bool {
        let width = if enabled { self.config.stroke_width } else { 0.0 };
        let default_color = self.config.stroke_color;
        self.write_active(|scene, id| {
            let Some(node) = scene.node_mut(id) else {
                return false;
            };
            node.stroke_width = width;
            if enabled && node.stroke.is_none() {
                node.stroke = Some(default_color);
            }
            true
        })
    }

    pub fn stroke_enabled(&self) -> bool {
        self.read_active().is_some_and(|n| n.has_stroke())
    }

    // ─── Fill ────────────────────────────────────────────────────────────

    pub fn apply_gradient(&mut self, start: Color, end: Color, angle: f32) -> bool {
        let gradient = LinearGradient::new(start, end, angle);
        self.apply_property(Property::Fill(Some(Paint::LinearGradient(gradient))))
    }

    /// Apply a named gradient preset, keeping the current gradient angle.
    pub fn apply_gradient_preset(&mut self, name: &str) -> bool {
        let Some(preset) = find_gradient_preset(name) else {
            log::warn!("unknown gradient preset '{name}'");
            return false;
        };
        let (Some(start), Some(end)) = (Color::from_hex(preset.start), Color::from_hex(preset.end))
        else {
            return false;
        };
        let angle = match self.fill_mode() {
            Some(FillMode::Gradient { angle, .. }) => angle,
            _ => DEFAULT_GRADIENT_ANGLE,
        };
        self.apply_gradient(start, end, angle)
    }

    /// Switch back to a solid fill. A gradient is replaced by black; a
    /// solid fill is left as is.
    pub fn use_solid_fill(&mut self) -> bool {
        match self.fill_mode() {
            Some(FillMode::Gradient { .. }) => {
                self.apply_property(Property::Fill(Some(Paint::Solid(Color::BLACK))))
            }
            _ => false,
        }
    }

    pub fn fill_mode(&self) -> Option<FillMode> {
        Some(match self.read_active()?.fill? {
            Paint::Solid(c) => FillMode::Solid(c),
            Paint::LinearGradient(g) => {
                let [first, last] = g.stops();
                FillMode::Gradient {
                    start: first.color,
                    end: last.color,
                    angle: g.angle,
                }
            }
        })
    }

    // ─── Transform ───────────────────────────────────────────────────────

    /// Set the scale from a percentage (100 = natural size).
    pub fn set_scale_percent(&mut self, axis: ScaleAxis, percent: f32) -> bool {
        let scale = percent / 100.0;
        self.write_active(|scene, id| {
            let Some(node) = scene.node_mut(id) else {
                return false;
            };
            if matches!(axis, ScaleAxis::X | ScaleAxis::Both) {
                node.transform.scale_x = scale;
            }
            if matches!(axis, ScaleAxis::Y | ScaleAxis::Both) {
                node.transform.scale_y = scale;
            }
            true
        })
    }

    /// Scale as whole percentages, (x, y).
    pub fn scale_percent(&self) -> Option<(i32, i32)> {
        let t = self.read_active()?.transform;
        Some((
            (t.scale_x * 100.0).round() as i32,
            (t.scale_y * 100.0).round() as i32,
        ))
    }

    pub fn reset_scale(&mut self) -> bool {
        self.set_scale_percent(ScaleAxis::Both, 100.0)
    }

    pub fn reset_angle(&mut self) -> bool {
        self.apply_property(Property::Angle(0.0))
    }

    pub fn center_horizontally(&mut self) -> bool {
        self.apply_property(Property::Left(CANVAS_WIDTH as f32 / 2.0))
    }

    pub fn center_vertically(&mut self) -> bool {
        self.apply_property(Property::Top(CANVAS_HEIGHT as f32 / 2.0))
    }
}
