//! WASM bridge for Smart Design: exposes the editor to the browser UI.
//!
//! Compiled via `wasm-pack build --target web`. Values cross the boundary
//! as plain numbers, strings, and JSON strings.

mod download;
mod services;
mod text2d;

pub use services::{analyze_design_complexity, generate_design_ideas, search_images};

use sd_core::catalog::{
    CANVAS_HEIGHT, CANVAS_WIDTH, FONTS, GRADIENT_PRESETS, SWATCHES, TEXT_PRESETS, products,
};
use sd_core::id::NodeId;
use sd_core::model::{Color, Property};
use sd_core::scene::{RasterError, RasterOptions};
use sd_editor::assets::{ImageSource, bytes_are_svg, decode_asset, load_asset};
use sd_editor::props::{PropertyJson, TextOptionsSpec, node_properties};
use sd_editor::shortcuts::{FocusTarget, KeyInput, ShortcutAction};
use sd_editor::sync::{Editor, ScaleAxis};
use sd_editor::EditorConfig;
use sd_render::paint::{from_straight_rgba, to_straight_rgba};
use sd_render::{Canvas, RenderOptions};
use sd_services::HttpFetcher;
use serde_json::json;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::Clamped;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, ImageData};

type SharedEditor = Rc<RefCell<Editor<Canvas>>>;

/// The main WASM-facing canvas controller.
///
/// Holds the editor behind a shared cell so async image loads can insert
/// their result once they finish without holding a borrow across the wait.
#[wasm_bindgen]
pub struct SdCanvas {
    editor: SharedEditor,
    /// Node being dragged, if the last pointer-down hit one.
    dragging: Option<NodeId>,
    last_pointer: (f32, f32),
}

#[wasm_bindgen]
impl SdCanvas {
    /// Create a controller with a design canvas of the standard size.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        console_error_panic_hook_setup();
        let canvas = Canvas::new(CANVAS_WIDTH, CANVAS_HEIGHT);
        Self {
            editor: Rc::new(RefCell::new(Editor::new(canvas, EditorConfig::default()))),
            dragging: None,
            last_pointer: (0.0, 0.0),
        }
    }

    /// Paint the scene (with selection handles) into a 2D context. Text is
    /// drawn by the browser over the raster. Returns `false` if
    /// rasterization failed.
    pub fn render(&self, ctx: &CanvasRenderingContext2d) -> bool {
        let editor = self.editor.borrow();
        let Some(canvas) = editor.scene() else {
            return false;
        };
        let options = RenderOptions {
            draw_text: false,
            ..RenderOptions::default()
        };
        let pixmap = match canvas.render(&options) {
            Ok(p) => p,
            Err(e) => {
                log::error!("render failed: {e}");
                return false;
            }
        };
        let data = to_straight_rgba(&pixmap);
        let image = match ImageData::new_with_u8_clamped_array_and_sh(
            Clamped(&data[..]),
            pixmap.width(),
            pixmap.height(),
        ) {
            Ok(image) => image,
            Err(_) => return false,
        };
        if ctx.put_image_data(&image, 0.0, 0.0).is_err() {
            return false;
        }
        text2d::draw_texts(ctx, canvas, 1.0);
        true
    }

    // ─── Pointer ─────────────────────────────────────────────────────────

    /// Select whatever is under the pointer. Returns the selected id or "".
    pub fn handle_pointer_down(&mut self, x: f32, y: f32) -> String {
        let mut editor = self.editor.borrow_mut();
        let hit = editor.scene_mut().and_then(|c| c.select_at(x, y));
        editor.reconcile();
        self.dragging = hit;
        self.last_pointer = (x, y);
        hit.map(|id| id.as_str().to_string()).unwrap_or_default()
    }

    /// Drag the node picked on pointer-down. Returns `true` if it moved.
    pub fn handle_pointer_move(&mut self, x: f32, y: f32) -> bool {
        let Some(id) = self.dragging else {
            return false;
        };
        let (px, py) = self.last_pointer;
        self.last_pointer = (x, y);
        let mut editor = self.editor.borrow_mut();
        let moved = editor
            .scene_mut()
            .is_some_and(|c| c.translate(id, x - px, y - py));
        editor.reconcile();
        moved
    }

    pub fn handle_pointer_up(&mut self) -> bool {
        let Some(id) = self.dragging.take() else {
            return false;
        };
        let mut editor = self.editor.borrow_mut();
        if let Some(canvas) = editor.scene_mut() {
            canvas.finish_transform(id);
        }
        editor.reconcile();
        true
    }

    // ─── Layers & selection ──────────────────────────────────────────────

    /// Layers top-most first, as JSON.
    pub fn get_layers_json(&self) -> String {
        let editor = self.editor.borrow();
        let layers: Vec<_> = editor.display_order().collect();
        serde_json::to_string(&layers).unwrap_or_else(|_| "[]".to_string())
    }

    /// Properties of the active node as JSON, or `null`.
    pub fn get_selected_props(&self) -> String {
        let editor = self.editor.borrow();
        match editor.active_snapshot() {
            Some(node) => serde_json::Value::Object(node_properties(node)).to_string(),
            None => "null".to_string(),
        }
    }

    pub fn select_by_id(&mut self, node_id: &str) -> bool {
        let id = NodeId::intern(node_id);
        let mut editor = self.editor.borrow_mut();
        editor.select(Some(id));
        editor.active() == Some(id)
    }

    pub fn delete_layer(&mut self, index: usize) -> bool {
        self.editor.borrow_mut().delete_layer(index)
    }

    pub fn toggle_lock(&mut self, index: usize) -> bool {
        self.editor.borrow_mut().toggle_lock(index)
    }

    pub fn toggle_visibility(&mut self, index: usize) -> bool {
        self.editor.borrow_mut().toggle_visibility(index)
    }

    pub fn bring_forward(&mut self) -> bool {
        self.reorder(true)
    }

    pub fn send_backward(&mut self) -> bool {
        self.reorder(false)
    }

    fn reorder(&mut self, forward: bool) -> bool {
        let mut editor = self.editor.borrow_mut();
        let Some(id) = editor.active() else {
            return false;
        };
        let moved = editor.scene_mut().is_some_and(|c| {
            if forward {
                c.bring_forward(id)
            } else {
                c.send_backward(id)
            }
        });
        editor.reconcile();
        moved
    }

    // ─── Keyboard ────────────────────────────────────────────────────────

    /// Handle a keydown. Returns `{"changed":bool,"action":"<name>"}`.
    #[allow(clippy::too_many_arguments)]
    pub fn handle_key(
        &mut self,
        key: &str,
        ctrl: bool,
        shift: bool,
        alt: bool,
        meta: bool,
        tag_name: &str,
        content_editable: bool,
    ) -> String {
        let input = KeyInput {
            key: key.to_string(),
            ctrl,
            shift,
            alt,
            meta,
            focus: FocusTarget::new(tag_name, content_editable),
        };
        let action = self.editor.borrow_mut().handle_key(&input);
        let name = match action {
            Some(ShortcutAction::Delete) => "delete",
            Some(ShortcutAction::Deselect) => "deselect",
            None => "none",
        };
        json!({ "changed": action.is_some(), "action": name }).to_string()
    }

    // ─── Properties ──────────────────────────────────────────────────────

    /// Set one property on the active node. `value` is JSON
    /// (`"#ff0000"`, `12`, `null`, `{"blur":4}` …).
    pub fn set_prop(&mut self, key: &str, value: &str) -> bool {
        let Ok(value) = serde_json::from_str::<serde_json::Value>(value) else {
            return false;
        };
        let Some(prop) = Property::from_json(key, &value) else {
            log::warn!("rejected value for '{key}'");
            return false;
        };
        self.editor.borrow_mut().apply_property(prop)
    }

    pub fn toggle_shadow(&mut self, on: bool) -> bool {
        self.editor.borrow_mut().toggle_shadow(on)
    }

    pub fn set_shadow_polar(&mut self, distance: f32, angle: f32) -> bool {
        self.editor.borrow_mut().set_shadow_polar(distance, angle)
    }

    /// `[distance, angle]` of the active node's shadow, or `null`.
    pub fn get_shadow_polar(&self) -> String {
        match self.editor.borrow().shadow_polar() {
            Some((d, a)) => json!([d, a]).to_string(),
            None => "null".to_string(),
        }
    }

    pub fn set_stroke_enabled(&mut self, enabled: bool) -> bool {
        self.editor.borrow_mut().set_stroke_enabled(enabled)
    }

    pub fn apply_gradient(&mut self, start: &str, end: &str, angle: f32) -> bool {
        let (Some(start), Some(end)) = (Color::parse(start), Color::parse(end)) else {
            return false;
        };
        self.editor.borrow_mut().apply_gradient(start, end, angle)
    }

    /// Apply a named gradient (`"Sunset"`, `"Ocean"` …) to the active node.
    pub fn apply_gradient_preset(&mut self, name: &str) -> bool {
        self.editor.borrow_mut().apply_gradient_preset(name)
    }

    pub fn use_solid_fill(&mut self) -> bool {
        self.editor.borrow_mut().use_solid_fill()
    }

    /// `axis` is `"x"`, `"y"` or anything else for both.
    pub fn set_scale_percent(&mut self, axis: &str, percent: f32) -> bool {
        let axis = match axis {
            "x" | "X" => ScaleAxis::X,
            "y" | "Y" => ScaleAxis::Y,
            _ => ScaleAxis::Both,
        };
        self.editor.borrow_mut().set_scale_percent(axis, percent)
    }

    pub fn reset_scale(&mut self) -> bool {
        self.editor.borrow_mut().reset_scale()
    }

    pub fn reset_angle(&mut self) -> bool {
        self.editor.borrow_mut().reset_angle()
    }

    pub fn center_horizontally(&mut self) -> bool {
        self.editor.borrow_mut().center_horizontally()
    }

    pub fn center_vertically(&mut self) -> bool {
        self.editor.borrow_mut().center_vertically()
    }

    // ─── Inserting ───────────────────────────────────────────────────────

    /// Add text. `options` is JSON (`{"fill":"#fff","fontSize":60}`) or "".
    /// Returns the new node id, or "".
    pub fn add_text(&mut self, text: &str, font_family: &str, options: &str) -> String {
        let spec: TextOptionsSpec = if options.trim().is_empty() {
            TextOptionsSpec::default()
        } else {
            serde_json::from_str(options).unwrap_or_default()
        };
        let id = self
            .editor
            .borrow_mut()
            .add_text(text, font_family, spec.into_options());
        id_string(id)
    }

    /// Add a quick-add text (`"heading"` or `"body"`). Returns the id or "".
    pub fn add_text_preset(&mut self, preset_id: &str, font_family: &str) -> String {
        id_string(self.editor.borrow_mut().add_text_preset(preset_id, font_family))
    }

    pub fn add_graphic(&mut self, path_data: &str) -> String {
        id_string(self.editor.borrow_mut().add_graphic(path_data))
    }

    /// Insert an uploaded file. Returns the new node id, or "".
    pub fn add_image_bytes(&mut self, data: Vec<u8>, mime: &str) -> String {
        let mime = (!mime.is_empty()).then_some(mime);
        match decode_asset(&data, bytes_are_svg(&data, mime), None) {
            Ok(asset) => id_string(self.editor.borrow_mut().insert_asset(asset)),
            Err(e) => {
                log::warn!("upload rejected: {e}");
                String::new()
            }
        }
    }

    /// Fetch and insert an image by URL. Resolves to the new node id;
    /// rejects with the error message.
    pub fn add_image_url(&self, url: String) -> js_sys::Promise {
        let editor = Rc::clone(&self.editor);
        wasm_bindgen_futures::future_to_promise(async move {
            let asset = load_asset(&HttpFetcher::new(), ImageSource::Url(url))
                .await
                .map_err(|e| JsValue::from_str(&e.to_string()))?;
            let id = editor.borrow_mut().insert_asset(asset);
            Ok(JsValue::from_str(&id_string(id)))
        })
    }

    // ─── Product ─────────────────────────────────────────────────────────

    pub fn select_product(&mut self, id: &str) -> bool {
        self.editor.borrow_mut().select_product(id)
    }

    pub fn select_color(&mut self, id: &str) -> bool {
        self.editor.borrow_mut().select_color(id)
    }

    pub fn select_view(&mut self, id: &str) -> bool {
        self.editor.borrow_mut().select_view(id)
    }

    /// The current garment view for the backdrop: silhouette path, detail
    /// paths, view box, print area and garment color.
    pub fn get_product_view_json(&self) -> String {
        let editor = self.editor.borrow();
        let Some(view) = editor.product_view() else {
            return "null".to_string();
        };
        let vb = view.view_box;
        json!({
            "productId": editor.product().id,
            "viewId": view.id,
            "path": view.path,
            "details": view.detail_paths,
            "viewBox": format!("{} {} {} {}", vb.min_x, vb.min_y, vb.width, vb.height),
            "printArea": view.print_area,
            "color": editor.product_color().map(|c| c.color.to_hex()),
        })
        .to_string()
    }

    // ─── Export ──────────────────────────────────────────────────────────

    /// Export a 2× PNG and trigger a download. Returns `false` on failure.
    pub fn export_png(&mut self) -> bool {
        let image = self
            .editor
            .borrow_mut()
            .export_with(js_sys::Date::now() as u64, compose_export);
        let Some(image) = image else {
            return false;
        };
        match download::trigger_download(&image.bytes, &image.filename, image.mime) {
            Ok(()) => true,
            Err(e) => {
                log::error!("download failed: {e:?}");
                false
            }
        }
    }
}

impl Default for SdCanvas {
    fn default() -> Self {
        Self::new()
    }
}

/// Raster without text, then the browser's text pass on an offscreen
/// canvas, read back and encoded.
fn compose_export(scene: &Canvas, options: &RasterOptions) -> Result<Vec<u8>, RasterError> {
    let pixmap = scene.render(&RenderOptions {
        scale: options.multiplier,
        background: None,
        show_selection: false,
        draw_text: false,
    })?;
    let (width, height) = (pixmap.width(), pixmap.height());
    let browser = |e: JsValue| RasterError::Encode(format!("offscreen canvas: {e:?}"));

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| RasterError::Encode("no document".into()))?;
    let offscreen: HtmlCanvasElement = document
        .create_element("canvas")
        .map_err(browser)?
        .dyn_into()
        .map_err(|e| browser(e.into()))?;
    offscreen.set_width(width);
    offscreen.set_height(height);
    let ctx: CanvasRenderingContext2d = offscreen
        .get_context("2d")
        .map_err(browser)?
        .ok_or_else(|| RasterError::Encode("no 2d context".into()))?
        .dyn_into()
        .map_err(|e| browser(e.into()))?;

    let data = to_straight_rgba(&pixmap);
    let image = ImageData::new_with_u8_clamped_array_and_sh(Clamped(&data[..]), width, height)
        .map_err(browser)?;
    ctx.put_image_data(&image, 0.0, 0.0).map_err(browser)?;
    text2d::draw_texts(&ctx, scene, options.multiplier as f64);

    let composed = ctx
        .get_image_data(0.0, 0.0, width as f64, height as f64)
        .map_err(browser)?;
    let composed = from_straight_rgba(width, height, &composed.data())
        .ok_or_else(|| RasterError::Encode("composed image has the wrong size".into()))?;
    composed
        .encode_png()
        .map_err(|e| RasterError::Encode(e.to_string()))
}

fn id_string(id: Option<NodeId>) -> String {
    id.map(|id| id.as_str().to_string()).unwrap_or_default()
}

/// Install a panic hook that logs to the browser console.
fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("Smart Design WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}

// ─── Standalone functions (no canvas needed) ─────────────────────────────

/// All products with their colors and views, as JSON.
#[wasm_bindgen]
pub fn get_products_json() -> String {
    let list: Vec<_> = products()
        .iter()
        .map(|p| {
            json!({
                "id": p.id,
                "name": p.name,
                "price": p.price,
                "colors": p.colors.iter().map(|c| json!({
                    "id": c.id,
                    "name": c.name,
                    "hex": c.color.to_hex(),
                })).collect::<Vec<_>>(),
                "views": p.views.iter().map(|v| json!({ "id": v.id, "name": v.name })).collect::<Vec<_>>(),
            })
        })
        .collect();
    serde_json::Value::Array(list).to_string()
}

/// Font families offered by the text panel, as JSON.
#[wasm_bindgen]
pub fn get_fonts_json() -> String {
    json!(FONTS).to_string()
}

/// Quick-add text styles, as JSON.
#[wasm_bindgen]
pub fn get_text_presets_json() -> String {
    json!(TEXT_PRESETS).to_string()
}

/// Color swatches and named gradients for the fill pickers, as JSON.
#[wasm_bindgen]
pub fn get_swatches_json() -> String {
    json!({ "colors": SWATCHES, "gradients": GRADIENT_PRESETS }).to_string()
}

/// Validate SVG path data. Returns `{"ok":true}` or `{"ok":false,"error":"..."}`.
#[wasm_bindgen]
pub fn validate_path(path_data: &str) -> String {
    match sd_core::parse_path_data(path_data) {
        Ok(_) => json!({ "ok": true }).to_string(),
        Err(e) => json!({ "ok": false, "error": e }).to_string(),
    }
}
