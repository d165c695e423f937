//! Text → vector outlines.
//!
//! Faces are looked up in the system font database by family, weight and
//! style, falling back to any sans-serif face. Without a usable face each
//! visible character becomes a filled box (the missing-glyph mark), so
//! text never silently drops out of a raster.
//!
//! Lines are laid out in the node's own box (origin at its center), one
//! glyph run per line. Right-to-left lines are placed in reverse character
//! order; there is no shaping.

use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use rusttype::{Font, OutlineBuilder, Scale, point};
use sd_core::model::{FontStyle, TextAlign, TextDirection, TextProps};
use std::collections::HashMap;
use std::sync::{Mutex, OnceLock};
use tiny_skia::{Path, PathBuilder, Rect};

/// Missing-glyph box, in ems.
const BOX_ADVANCE: f32 = 0.5;
const BOX_WIDTH: f32 = 0.4;
const BOX_HEIGHT: f32 = 0.7;
/// Baseline position when no face metrics are available, in ems.
const FALLBACK_ASCENT: f32 = 0.8;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct FaceKey {
    family: String,
    weight: u16,
    italic: bool,
}

fn database() -> &'static Database {
    static DB: OnceLock<Database> = OnceLock::new();
    DB.get_or_init(|| {
        #[cfg_attr(target_arch = "wasm32", allow(unused_mut))]
        let mut db = Database::new();
        #[cfg(not(target_arch = "wasm32"))]
        db.load_system_fonts();
        log::debug!("font database: {} face(s)", db.len());
        db
    })
}

/// Resolve (and cache) the face for a font spec. `None` when the database
/// has nothing usable.
fn face_for(props: &TextProps) -> Option<&'static Font<'static>> {
    static CACHE: OnceLock<Mutex<HashMap<FaceKey, Option<&'static Font<'static>>>>> =
        OnceLock::new();
    let cache = CACHE.get_or_init(Default::default);
    let key = FaceKey {
        family: props.font.family.clone(),
        weight: props.font.weight,
        italic: props.style == FontStyle::Italic,
    };

    if let Some(found) = cache.lock().unwrap_or_else(|p| p.into_inner()).get(&key) {
        return *found;
    }
    let loaded: Option<&'static Font<'static>> =
        load_face(&key).map(|font| &*Box::leak(Box::new(font)));
    if loaded.is_none() {
        log::debug!("no font face for '{}'; drawing missing-glyph boxes", key.family);
    }
    cache
        .lock()
        .unwrap_or_else(|p| p.into_inner())
        .insert(key, loaded);
    loaded
}

fn load_face(key: &FaceKey) -> Option<Font<'static>> {
    let db = database();
    let families = [Family::Name(&key.family), Family::SansSerif];
    let query = Query {
        families: &families,
        weight: Weight(key.weight),
        stretch: Stretch::Normal,
        style: if key.italic { Style::Italic } else { Style::Normal },
    };
    let id = db.query(&query).or_else(|| db.faces().next().map(|face| face.id))?;
    db.with_face_data(id, |data, index| {
        Font::try_from_vec_and_index(data.to_vec(), index)
    })
    .flatten()
}

/// Feeds glyph outlines into a tiny-skia path.
struct GlyphSink<'a>(&'a mut PathBuilder);

impl OutlineBuilder for GlyphSink<'_> {
    fn move_to(&mut self, x: f32, y: f32) {
        self.0.move_to(x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.0.line_to(x, y);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        self.0.quad_to(x1, y1, x, y);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        self.0.cubic_to(x1, y1, x2, y2, x, y);
    }

    fn close(&mut self) {
        self.0.close();
    }
}

/// Outline of `props` laid out in a `width × height` box centered on the
/// origin. `None` when nothing visible would be drawn.
pub fn text_path(props: &TextProps, width: f32, height: f32) -> Option<Path> {
    let size = props.font.size.max(1.0);
    let line_advance = size * props.line_height;
    let face = face_for(props);
    let scale = Scale::uniform(size);
    let ascent = match face {
        Some(font) => font.v_metrics(scale).ascent,
        None => size * FALLBACK_ASCENT,
    };

    let mut pb = PathBuilder::new();
    for (i, line) in props.content.split('\n').enumerate() {
        let visual: String = match props.direction {
            TextDirection::Rtl => line.chars().rev().collect(),
            TextDirection::Ltr => line.to_string(),
        };
        let baseline = -height / 2.0 + i as f32 * line_advance + ascent;
        let line_width = match face {
            Some(font) => run_width(font, &visual, scale),
            None => visual.chars().count() as f32 * size * BOX_ADVANCE,
        };
        let x = line_start(props.align, width, line_width);

        match face {
            Some(font) => {
                for glyph in font.layout(&visual, scale, point(x, baseline)) {
                    glyph.build_outline(&mut GlyphSink(&mut pb));
                }
            }
            None => push_missing_glyphs(&mut pb, &visual, size, x, baseline),
        }

        if props.underline
            && line_width > 0.0
            && let Some(rect) =
                Rect::from_xywh(x, baseline + size * 0.1, line_width, (size * 0.05).max(1.0))
        {
            pb.push_rect(rect);
        }
    }
    pb.finish()
}

fn run_width(font: &Font<'_>, text: &str, scale: Scale) -> f32 {
    font.layout(text, scale, point(0.0, 0.0))
        .last()
        .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
        .unwrap_or(0.0)
}

fn line_start(align: TextAlign, box_width: f32, line_width: f32) -> f32 {
    match align {
        TextAlign::Left => -box_width / 2.0,
        TextAlign::Center => -line_width / 2.0,
        TextAlign::Right => box_width / 2.0 - line_width,
    }
}

fn push_missing_glyphs(pb: &mut PathBuilder, text: &str, size: f32, x: f32, baseline: f32) {
    let advance = size * BOX_ADVANCE;
    let inset = (advance - size * BOX_WIDTH) / 2.0;
    for (i, c) in text.chars().enumerate() {
        if c.is_whitespace() {
            continue;
        }
        let left = x + i as f32 * advance + inset;
        if let Some(rect) =
            Rect::from_xywh(left, baseline - size * BOX_HEIGHT, size * BOX_WIDTH, size * BOX_HEIGHT)
        {
            pb.push_rect(rect);
        }
    }
}
