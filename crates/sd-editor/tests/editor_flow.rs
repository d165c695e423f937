//! Integration tests: UI actions → editor → canvas → mirror.
//!
//! Drives `sd-editor` against the real `sd-render` canvas the way the
//! browser bridge does, checking the scene and the mirror agree.

use pretty_assertions::assert_eq;
use sd_core::model::*;
use sd_core::scene::SceneCapability;
use sd_editor::*;
use sd_render::Canvas;
use std::collections::HashMap;
use std::io::Cursor;
use std::time::Duration;

// ─── Helpers ─────────────────────────────────────────────────────────────

fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn editor() -> Editor<Canvas> {
    init_logs();
    Editor::new(Canvas::new(500, 600), EditorConfig::default())
}

fn add_texts(editor: &mut Editor<Canvas>, n: usize) -> Vec<sd_core::NodeId> {
    (0..n)
        .map(|i| {
            editor
                .add_text(format!("متن {i}"), "Vazirmatn", TextOptions::default())
                .unwrap()
        })
        .collect()
}

fn assert_mirror_matches(editor: &Editor<Canvas>) {
    let scene_ids = editor.scene().unwrap().nodes();
    let mirror_ids: Vec<_> = editor.layers().iter().map(|l| l.id).collect();
    assert_eq!(mirror_ids, scene_ids);
    for (i, layer) in editor.layers().iter().enumerate() {
        assert_eq!(layer.index, i);
    }
}

fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba([200, 30, 30, 255]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png).unwrap();
    out.into_inner()
}

/// Serves canned bytes after a per-URL delay.
struct FakeFetcher {
    files: HashMap<String, (Vec<u8>, Duration)>,
}

impl AssetFetcher for FakeFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, AssetError> {
        let Some((bytes, delay)) = self.files.get(url) else {
            return Err(AssetError::Fetch {
                url: url.to_string(),
                reason: "404".into(),
            });
        };
        tokio::time::sleep(*delay).await;
        Ok(bytes.clone())
    }
}

// ─── Placement ───────────────────────────────────────────────────────────

#[test]
fn inserted_graphics_are_centered_and_fitted() {
    let mut editor = editor();
    for (w, h) in [(100.0, 50.0), (20.0, 300.0), (400.0, 400.0)] {
        let id = editor
            .add_graphic(&format!("M 0 0 L {w} 0 L {w} {h} L 0 {h} Z"))
            .unwrap();
        let area = editor.print_area();
        let node = editor.scene().unwrap().node(id).unwrap();
        let expected = (0.6 * area.width / w).min(0.6 * area.height / h);
        assert!((node.transform.scale_x - expected).abs() < 1e-4, "{w}x{h}");
        assert_eq!(node.transform.scale_x, node.transform.scale_y);
        assert_eq!(
            (node.transform.left, node.transform.top),
            area.center(),
            "{w}x{h}"
        );
    }
}

#[test]
fn placement_follows_the_current_view() {
    let mut editor = editor();
    editor.select_product("hoodie-premium");
    let id = editor.add_text("A", "Vazirmatn", TextOptions::default()).unwrap();
    let node = editor.scene().unwrap().node(id).unwrap();
    // Hoodie front: left 150 + 200 / 2, top 190 + 220 / 2.
    assert_eq!((node.transform.left, node.transform.top), (250.0, 300.0));
}

// ─── Property sync ───────────────────────────────────────────────────────

#[test]
fn shadow_polar_round_trip_within_one_unit() {
    let mut editor = editor();
    add_texts(&mut editor, 1);
    for distance in [0.0_f32, 3.0, 12.0, 50.0] {
        for angle in [-170.0_f32, -90.0, -45.0, 0.0, 33.0, 90.0, 135.0, 180.0] {
            editor.set_shadow_polar(distance, angle);
            let (d, a) = editor.shadow_polar().unwrap();
            assert!((d - distance).abs() <= 1.0, "distance {distance} → {d}");
            if distance >= 50.0 {
                // Short offsets round too coarsely to recover the angle.
                let diff = (a - angle).rem_euclid(360.0);
                assert!(diff <= 1.0 || diff >= 359.0, "angle {angle} → {a}");
            }
        }
    }
}

#[test]
fn group_fill_reaches_every_child() {
    let mut editor = editor();
    let doc = sd_core::parse_svg_document(
        r##"<svg viewBox="0 0 60 20">
            <rect x="0" y="0" width="10" height="10" fill="#111111"/>
            <rect x="20" y="0" width="10" height="10" fill="#222222"/>
            <circle cx="50" cy="10" r="10" fill="#333333"/>
        </svg>"##,
    )
    .unwrap();
    let id = editor.insert_asset(LoadedAsset::Vector(doc)).unwrap();

    let gold = Paint::Solid(Color::from_hex("#d4af37").unwrap());
    assert!(editor.apply_property(Property::Fill(Some(gold))));

    let scene = editor.scene().unwrap();
    assert_eq!(scene.node(id).unwrap().fill, Some(gold));
    let children = scene.children(id);
    assert_eq!(children.len(), 3);
    for child in children {
        assert_eq!(scene.node(child).unwrap().fill, Some(gold));
    }
}

#[test]
fn stroke_toggle_is_idempotent_and_keeps_color() {
    let mut editor = editor();
    let id = add_texts(&mut editor, 1)[0];
    let teal = Color::from_hex("#0d9488").unwrap();
    editor.apply_property(Property::Stroke(Some(teal)));

    for _ in 0..2 {
        editor.set_stroke_enabled(false);
    }
    let node = editor.scene().unwrap().node(id).unwrap();
    assert_eq!((node.stroke, node.stroke_width), (Some(teal), 0.0));

    for _ in 0..2 {
        editor.set_stroke_enabled(true);
    }
    let node = editor.scene().unwrap().node(id).unwrap();
    assert_eq!((node.stroke, node.stroke_width), (Some(teal), 1.0));
}

#[test]
fn json_property_writes_reach_the_scene() {
    let mut editor = editor();
    let id = add_texts(&mut editor, 1)[0];
    let prop = Property::from_json("fontSize", &serde_json::json!(72)).unwrap();
    editor.apply_property(prop);

    let node = editor.scene().unwrap().node(id).unwrap();
    assert_eq!(node.text_props().unwrap().font.size, 72.0);
    let snapshot = sd_editor::props::node_properties(editor.active_snapshot().unwrap());
    assert_eq!(snapshot["fontSize"], serde_json::json!(72.0));
}

// ─── Mirror ──────────────────────────────────────────────────────────────

#[test]
fn mirror_tracks_scene_through_mixed_edits() {
    let mut editor = editor();
    let ids = add_texts(&mut editor, 3);
    assert_mirror_matches(&editor);

    editor.add_graphic("M 0 0 L 10 0 L 5 8 Z");
    editor.delete_layer(1);
    assert_mirror_matches(&editor);

    let canvas = editor.scene_mut().unwrap();
    canvas.bring_forward(ids[0]);
    canvas.translate(ids[2], 10.0, 0.0);
    canvas.finish_transform(ids[2]);
    editor.reconcile();
    assert_mirror_matches(&editor);

    editor.toggle_visibility(0);
    editor.toggle_lock(1);
    assert_mirror_matches(&editor);
    assert_eq!(editor.layers().len(), 3);
}

#[test]
fn canvas_clicks_drive_the_active_node() {
    let mut editor = editor();
    let ids = add_texts(&mut editor, 2);
    let (x, y) = editor.print_area().center();

    editor.scene_mut().unwrap().select_at(5.0, 5.0);
    editor.reconcile();
    assert_eq!(editor.active(), None);

    editor.scene_mut().unwrap().select_at(x, y);
    editor.reconcile();
    assert_eq!(editor.active(), Some(ids[1]), "topmost text wins");

    editor.scene_mut().unwrap().select_nodes(&ids);
    editor.reconcile();
    assert_eq!(editor.active(), None, "multi-selection has no single target");
    assert!(!editor.apply_property(Property::Opacity(0.2)));
}

#[test]
fn added_nodes_never_cache() {
    let mut editor = editor();
    let canvas = editor.scene_mut().unwrap();
    let id = canvas.add_node(SceneNode::group(10.0, 10.0));
    assert!(canvas.node(id).unwrap().caching);
    editor.reconcile();
    assert!(!editor.scene().unwrap().node(id).unwrap().caching);
    assert_mirror_matches(&editor);
}

#[test]
fn lock_toggle_flips_all_flags_together() {
    let mut editor = editor();
    let ids = add_texts(&mut editor, 2);
    for round in 0..4 {
        editor.toggle_lock(1);
        let node = editor.scene().unwrap().node(ids[1]).unwrap();
        let locked = round % 2 == 0;
        assert_eq!(node.locks, Locks::all(locked));
        assert_eq!(node.selectable, !locked);
        assert_eq!(editor.layers()[1].locked, locked);
    }
}

#[test]
fn add_text_then_hide() {
    let mut editor = editor();
    let before = editor.layers().len();
    let id = editor.add_text("A", "Vazirmatn", TextOptions::default()).unwrap();

    assert_eq!(editor.active(), Some(id));
    assert_eq!(editor.layers().len(), before + 1);
    let layer = editor.layers().last().unwrap();
    assert!(layer.visible && !layer.locked);
    assert_eq!(layer.name, "A");

    editor.toggle_visibility(before);
    assert!(!editor.layers()[before].visible);
    assert_eq!(editor.active(), None);
    assert_eq!(editor.scene().unwrap().active_node(), None);
}

#[test]
fn delete_key_removes_exactly_the_selection() {
    let mut editor = editor();
    let ids = add_texts(&mut editor, 5);
    let doomed = [ids[0], ids[2], ids[4]];
    editor.scene_mut().unwrap().select_nodes(&doomed);
    editor.reconcile();

    let key = KeyInput::new("Delete", FocusTarget::new("BODY", false));
    assert_eq!(editor.handle_key(&key), Some(ShortcutAction::Delete));

    assert_eq!(editor.scene().unwrap().nodes(), vec![ids[1], ids[3]]);
    assert_mirror_matches(&editor);
    assert_eq!(editor.active(), None);
}

// ─── Export ──────────────────────────────────────────────────────────────

#[test]
fn export_is_double_size_png() {
    let mut editor = editor();
    editor.add_graphic("M 0 0 L 10 0 L 10 10 Z");
    let image = editor.export(42).unwrap();
    let decoded = image::load_from_memory(&image.bytes).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (1000, 1200));
    assert_eq!(image.filename, "smart-design-42.png");
}

// ─── Async loads ─────────────────────────────────────────────────────────

#[tokio::test]
async fn raster_load_inserts_fitted_image() {
    let mut editor = editor();
    let fetcher = FakeFetcher {
        files: HashMap::from([(
            "https://img.test/photo.png".to_string(),
            (png_bytes(50, 100), Duration::ZERO),
        )]),
    };
    let asset = load_asset(&fetcher, ImageSource::Url("https://img.test/photo.png".into()))
        .await
        .unwrap();
    let id = editor.insert_asset(asset).unwrap();

    let node = editor.scene().unwrap().node(id).unwrap();
    assert_eq!((node.width, node.height), (50.0, 100.0));
    // min(0.6 * 210 / 50, 0.6 * 280 / 100) = 1.68
    assert!((node.transform.scale_x - 1.68).abs() < 1e-4);
    assert!(!node.caching);
}

#[tokio::test]
async fn failed_loads_insert_nothing() {
    let mut editor = editor();
    let fetcher = FakeFetcher {
        files: HashMap::from([(
            "https://img.test/empty.svg".to_string(),
            (br#"<svg width="5" height="5"></svg>"#.to_vec(), Duration::ZERO),
        )]),
    };
    let missing = load_asset(&fetcher, ImageSource::Url("https://img.test/nope.png".into())).await;
    assert!(matches!(missing, Err(AssetError::Fetch { .. })));

    let empty = load_asset(&fetcher, ImageSource::Url("https://img.test/empty.svg".into())).await;
    assert!(matches!(empty, Err(AssetError::EmptyVector)));
    assert!(editor.layers().is_empty());
}

#[tokio::test]
async fn slow_load_does_not_touch_the_current_selection() {
    let mut editor = editor();
    let fetcher = FakeFetcher {
        files: HashMap::from([
            (
                "https://img.test/slow.png".to_string(),
                (png_bytes(10, 10), Duration::from_millis(40)),
            ),
            (
                "https://img.test/fast.svg".to_string(),
                (
                    br##"<svg viewBox="0 0 10 10"><rect width="10" height="10" fill="#00ff00"/></svg>"##
                        .to_vec(),
                    Duration::from_millis(5),
                ),
            ),
        ]),
    };

    let slow = load_asset(&fetcher, ImageSource::Url("https://img.test/slow.png".into()));
    let fast = load_asset(&fetcher, ImageSource::Url("https://img.test/fast.svg".into()));

    // Before either load completes the user adds and edits a text.
    let text = editor.add_text("B", "Vazirmatn", TextOptions::default()).unwrap();
    let (slow, fast) = tokio::join!(slow, fast);
    editor.apply_property(Property::Opacity(0.5));

    let group = editor.insert_asset(fast.unwrap()).unwrap();
    let image = editor.insert_asset(slow.unwrap()).unwrap();

    let scene = editor.scene().unwrap();
    assert_eq!(scene.nodes(), vec![text, group, image]);
    assert_eq!(scene.node(text).unwrap().opacity, 0.5);
    assert_eq!(editor.active(), Some(image));
    assert_mirror_matches(&editor);
}
