//! Core scene data model for Smart Design canvases.
//!
//! A scene is an ordered list of drawable nodes (text, raster images,
//! vector paths, and groups of paths). Nodes are owned by the scene
//! capability; everything else refers to them by `NodeId`.
//!
//! Every node shares one base record (transform, fill, stroke, shadow,
//! visibility, locks) and carries kind-specific data in `NodeKind`, so
//! property access is checked against the kind instead of guessed.

use crate::geometry;
use crate::id::NodeId;
use kurbo::{Affine, Point, Vec2};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

// ─── Colors & Paint ──────────────────────────────────────────────────────

/// RGBA color. Stored as 4 × f32 [0.0, 1.0].
///
/// This is the one canonical color representation; hex and `rgba(...)`
/// strings are converted at the edges (`Color::parse`, `to_hex`, `to_css`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

/// Helper to parse a single hex digit.
pub fn hex_val(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl Color {
    pub const WHITE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgba(0.0, 0.0, 0.0, 1.0);
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::rgba(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        )
    }

    pub fn to_rgba8(&self) -> [u8; 4] {
        let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }

    /// Parse a hex color string: `#RGB`, `#RGBA`, `#RRGGBB`, `#RRGGBBAA`.
    /// The string may optionally start with `#`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let bytes = hex.as_bytes();

        match bytes.len() {
            3 | 4 => {
                let mut c = [15u8; 4];
                for (i, b) in bytes.iter().enumerate() {
                    c[i] = hex_val(*b)?;
                }
                Some(Self::from_rgba8(c[0] * 17, c[1] * 17, c[2] * 17, c[3] * 17))
            }
            6 | 8 => {
                let mut c = [255u8; 4];
                for (i, pair) in bytes.chunks(2).enumerate() {
                    c[i] = hex_val(pair[0])? << 4 | hex_val(pair[1])?;
                }
                Some(Self::from_rgba8(c[0], c[1], c[2], c[3]))
            }
            _ => None,
        }
    }

    /// Parse any supported CSS color string (hex, `rgb()`, `rgba()`, a few names).
    pub fn parse(s: &str) -> Option<Self> {
        crate::parser::parse_color(s)
    }

    /// Emit as `#RRGGBB`, or `#RRGGBBAA` when not fully opaque.
    pub fn to_hex(&self) -> String {
        let [r, g, b, a] = self.to_rgba8();
        if a == 255 {
            format!("#{r:02X}{g:02X}{b:02X}")
        } else {
            format!("#{r:02X}{g:02X}{b:02X}{a:02X}")
        }
    }

    /// Emit as a CSS `rgba(r, g, b, a)` string.
    pub fn to_css(&self) -> String {
        let [r, g, b, _] = self.to_rgba8();
        let a = (self.a.clamp(0.0, 1.0) * 1000.0).round() / 1000.0;
        format!("rgba({r}, {g}, {b}, {a})")
    }
}

/// Percentage-unit endpoints of a linear gradient across a node's box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientCoords {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

/// A gradient stop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    pub offset: f32, // 0.0 .. 1.0
    pub color: Color,
}

/// Two-stop linear gradient described by its end colors and an angle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearGradient {
    pub start: Color,
    pub end: Color,
    /// Degrees; 0 runs left → right, 90 runs top → bottom.
    pub angle: f32,
}

impl LinearGradient {
    pub fn new(start: Color, end: Color, angle: f32) -> Self {
        Self { start, end, angle }
    }

    /// Endpoints in percentage units of the node's bounding box.
    pub fn coords(&self) -> GradientCoords {
        let rad = self.angle.to_radians();
        let (sin, cos) = rad.sin_cos();
        GradientCoords {
            x1: 0.5 - 0.5 * cos,
            y1: 0.5 - 0.5 * sin,
            x2: 0.5 + 0.5 * cos,
            y2: 0.5 + 0.5 * sin,
        }
    }

    pub fn stops(&self) -> [GradientStop; 2] {
        [
            GradientStop {
                offset: 0.0,
                color: self.start,
            },
            GradientStop {
                offset: 1.0,
                color: self.end,
            },
        ]
    }
}

/// Fill paint: a solid color or a two-stop linear gradient.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Paint {
    Solid(Color),
    LinearGradient(LinearGradient),
}

impl Paint {
    /// The color a UI swatch should show for this paint.
    pub fn primary_color(&self) -> Color {
        match self {
            Paint::Solid(c) => *c,
            Paint::LinearGradient(g) => g.start,
        }
    }
}

/// Whether the fill or the stroke is painted first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PaintOrder {
    /// Fill first, stroke drawn over the fill.
    #[default]
    Fill,
    /// Stroke first, fill drawn over it (stroke sits under the fill).
    Stroke,
}

// ─── Shadow ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shadow {
    pub color: Color,
    pub blur: f32,
    pub offset_x: f32,
    pub offset_y: f32,
}

impl Shadow {
    /// Convert a (distance, angle in degrees) pair into rounded offsets.
    pub fn offsets_from_polar(distance: f32, angle: f32) -> (f32, f32) {
        let rad = (angle as f64).to_radians();
        let d = distance as f64;
        ((d * rad.cos()).round() as f32, (d * rad.sin()).round() as f32)
    }

    /// Build a shadow from polar offsets.
    pub fn from_polar(color: Color, blur: f32, distance: f32, angle: f32) -> Self {
        let (offset_x, offset_y) = Self::offsets_from_polar(distance, angle);
        Self {
            color,
            blur,
            offset_x,
            offset_y,
        }
    }

    /// Read the offsets back as rounded (distance, angle in degrees).
    pub fn polar(&self) -> (f32, f32) {
        let x = self.offset_x as f64;
        let y = self.offset_y as f64;
        (x.hypot(y).round() as f32, y.atan2(x).to_degrees().round() as f32)
    }
}

// ─── Font / Text ─────────────────────────────────────────────────────────

pub const FONT_WEIGHT_NORMAL: u16 = 400;
pub const FONT_WEIGHT_BOLD: u16 = 700;

/// Average glyph advance as a fraction of the font size. Used to size text
/// boxes until a real shaper lays them out.
const AVERAGE_ADVANCE: f32 = 0.6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontSpec {
    pub family: String,
    pub weight: u16, // 100..900
    pub size: f32,
}

impl Default for FontSpec {
    fn default() -> Self {
        Self {
            family: "Vazirmatn".into(),
            weight: FONT_WEIGHT_NORMAL,
            size: 40.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
}

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextAlign {
    Left,
    Center,
    #[default]
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextDirection {
    Ltr,
    #[default]
    Rtl,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextProps {
    pub content: String,
    pub font: FontSpec,
    pub style: FontStyle,
    pub align: TextAlign,
    pub direction: TextDirection,
    pub underline: bool,
    pub line_height: f32,
}

impl TextProps {
    pub fn new(content: impl Into<String>, font: FontSpec) -> Self {
        Self {
            content: content.into(),
            font,
            style: FontStyle::Normal,
            align: TextAlign::Right,
            direction: TextDirection::Rtl,
            underline: false,
            line_height: 1.16,
        }
    }

    /// Estimated box size: longest line × average advance, lines × line height.
    pub fn measure(&self) -> (f32, f32) {
        let lines: Vec<&str> = self.content.split('\n').collect();
        let longest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        let width = longest as f32 * self.font.size * AVERAGE_ADVANCE;
        let height = lines.len() as f32 * self.font.size * self.line_height;
        (width, height)
    }
}

// ─── Path data ───────────────────────────────────────────────────────────

/// A single path command (SVG-like, absolute coordinates only).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PathCmd {
    MoveTo(f32, f32),
    LineTo(f32, f32),
    QuadTo(f32, f32, f32, f32),            // control, end
    CubicTo(f32, f32, f32, f32, f32, f32), // c1, c2, end
    Close,
}

/// Vector path geometry. Commands stay in their source coordinates;
/// `offset` is the center of their bounding box, so drawing subtracts it
/// to put the path's center on the node origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathData {
    pub commands: Vec<PathCmd>,
    pub offset: (f32, f32),
    pub width: f32,
    pub height: f32,
}

impl PathData {
    pub fn new(commands: Vec<PathCmd>) -> Self {
        let bounds = geometry::path_bounds(&commands);
        let (offset, width, height) = match bounds {
            Some(r) => {
                let c = r.center();
                ((c.x as f32, c.y as f32), r.width() as f32, r.height() as f32)
            }
            None => ((0.0, 0.0), 0.0, 0.0),
        };
        Self {
            commands,
            offset,
            width,
            height,
        }
    }
}

// ─── Raster images ───────────────────────────────────────────────────────

/// Decoded raster pixels (straight-alpha RGBA8, row-major).
#[derive(Clone, PartialEq)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Arc<[u8]>,
    /// Where the image came from (URL or a MIME label for uploads).
    pub source: Option<String>,
}

impl fmt::Debug for RasterImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RasterImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

// ─── Transform & interaction flags ───────────────────────────────────────

/// Node placement. `left`/`top` locate the node's center (origin = center).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub left: f32,
    pub top: f32,
    pub scale_x: f32,
    pub scale_y: f32,
    /// Rotation in degrees, clockwise.
    pub angle: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            left: 0.0,
            top: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            angle: 0.0,
        }
    }
}

impl Transform {
    pub fn at(left: f32, top: f32) -> Self {
        Self {
            left,
            top,
            ..Default::default()
        }
    }

    /// Local → parent affine: translate · rotate · scale.
    pub fn affine(&self) -> Affine {
        Affine::translate(Vec2::new(self.left as f64, self.top as f64))
            * Affine::rotate((self.angle as f64).to_radians())
            * Affine::scale_non_uniform(self.scale_x as f64, self.scale_y as f64)
    }
}

/// Interaction locks. The UI treats them as one switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Locks {
    pub movement: bool,
    pub rotation: bool,
    pub scaling_x: bool,
    pub scaling_y: bool,
}

impl Locks {
    pub fn all(locked: bool) -> Self {
        Self {
            movement: locked,
            rotation: locked,
            scaling_x: locked,
            scaling_y: locked,
        }
    }

    pub fn is_locked(&self) -> bool {
        self.movement
    }

    pub fn is_uniform(&self) -> bool {
        let v = self.movement;
        self.rotation == v && self.scaling_x == v && self.scaling_y == v
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CornerStyle {
    #[default]
    Circle,
    Rect,
}

/// Selection decoration style. `padding` also widens the hit area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HandleStyle {
    pub corner_color: Color,
    pub corner_style: CornerStyle,
    pub corner_size: f32,
    pub transparent_corners: bool,
    pub padding: f32,
}

impl Default for HandleStyle {
    fn default() -> Self {
        Self {
            corner_color: Color::from_rgba8(0x3B, 0x82, 0xF6, 0xFF),
            corner_style: CornerStyle::Circle,
            corner_size: 10.0,
            transparent_corners: false,
            padding: 10.0,
        }
    }
}

/// Cached corner positions in scene coordinates (tl, tr, br, bl).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coords {
    pub corners: [(f32, f32); 4],
}

impl Coords {
    /// Axis-aligned bounds: (x, y, width, height).
    pub fn aabb(&self) -> (f32, f32, f32, f32) {
        let xs = self.corners.map(|c| c.0);
        let ys = self.corners.map(|c| c.1);
        let min_x = xs.iter().copied().fold(f32::MAX, f32::min);
        let max_x = xs.iter().copied().fold(f32::MIN, f32::max);
        let min_y = ys.iter().copied().fold(f32::MAX, f32::min);
        let max_y = ys.iter().copied().fold(f32::MIN, f32::max);
        (min_x, min_y, max_x - min_x, max_y - min_y)
    }

    pub fn center(&self) -> (f32, f32) {
        let (x, y, w, h) = self.aabb();
        (x + w / 2.0, y + h / 2.0)
    }
}

// ─── Scene nodes ─────────────────────────────────────────────────────────

/// Kind-specific node data.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Text(TextProps),
    Image(RasterImage),
    Path(PathData),
    /// Container for vector sub-paths; children live in the scene.
    Group,
}

impl NodeKind {
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Text(_) => "text",
            NodeKind::Image(_) => "image",
            NodeKind::Path(_) => "path",
            NodeKind::Group => "group",
        }
    }
}

/// A single drawable node.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    pub id: NodeId,
    pub kind: NodeKind,
    pub transform: Transform,
    /// Intrinsic (unscaled) size.
    pub width: f32,
    pub height: f32,
    pub fill: Option<Paint>,
    pub stroke: Option<Color>,
    pub stroke_width: f32,
    /// Keep stroke width constant under scaling.
    pub stroke_uniform: bool,
    pub paint_order: PaintOrder,
    pub shadow: Option<Shadow>,
    pub opacity: f32,
    pub visible: bool,
    pub selectable: bool,
    pub locks: Locks,
    /// Render through a cached bitmap. Interactive nodes keep this off.
    pub caching: bool,
    /// Needs repaint.
    pub dirty: bool,
    pub handles: HandleStyle,
    /// Corner coordinates from the last `recompute_coordinates`.
    pub coords: Option<Coords>,
}

impl SceneNode {
    pub fn new(id: NodeId, kind: NodeKind, width: f32, height: f32) -> Self {
        Self {
            id,
            kind,
            transform: Transform::default(),
            width,
            height,
            fill: Some(Paint::Solid(Color::BLACK)),
            stroke: None,
            stroke_width: 0.0,
            stroke_uniform: false,
            paint_order: PaintOrder::Fill,
            shadow: None,
            opacity: 1.0,
            visible: true,
            selectable: true,
            locks: Locks::default(),
            caching: true,
            dirty: true,
            handles: HandleStyle::default(),
            coords: None,
        }
    }

    pub fn text(props: TextProps) -> Self {
        let (w, h) = props.measure();
        Self::new(NodeId::with_prefix("text"), NodeKind::Text(props), w, h)
    }

    pub fn image(image: RasterImage) -> Self {
        let (w, h) = (image.width as f32, image.height as f32);
        let mut node = Self::new(NodeId::with_prefix("image"), NodeKind::Image(image), w, h);
        node.fill = None;
        node
    }

    pub fn path(data: PathData) -> Self {
        let (w, h) = (data.width, data.height);
        Self::new(NodeId::with_prefix("path"), NodeKind::Path(data), w, h)
    }

    pub fn group(width: f32, height: f32) -> Self {
        Self::new(NodeId::with_prefix("group"), NodeKind::Group, width, height)
    }

    pub fn is_group(&self) -> bool {
        matches!(self.kind, NodeKind::Group)
    }

    pub fn text_props(&self) -> Option<&TextProps> {
        match &self.kind {
            NodeKind::Text(props) => Some(props),
            _ => None,
        }
    }

    /// Whether the stroke will actually paint.
    pub fn has_stroke(&self) -> bool {
        self.stroke.is_some() && self.stroke_width > 0.0
    }

    /// Corner coordinates under `parent` (identity for top-level nodes).
    pub fn compute_coords(&self, parent: Affine) -> Coords {
        let m = parent * self.transform.affine();
        let hw = self.width as f64 / 2.0;
        let hh = self.height as f64 / 2.0;
        let corners = [(-hw, -hh), (hw, -hh), (hw, hh), (-hw, hh)].map(|(x, y)| {
            let p = m * Point::new(x, y);
            (p.x as f32, p.y as f32)
        });
        Coords { corners }
    }

    /// Write one property. Returns `false` when the property does not apply
    /// to this node's kind (the node is left untouched).
    pub fn set(&mut self, prop: Property) -> bool {
        match prop {
            Property::Left(v) => self.transform.left = v,
            Property::Top(v) => self.transform.top = v,
            Property::ScaleX(v) => self.transform.scale_x = v,
            Property::ScaleY(v) => self.transform.scale_y = v,
            Property::Angle(v) => self.transform.angle = v,
            Property::Opacity(v) => self.opacity = v.clamp(0.0, 1.0),
            Property::Fill(p) => self.fill = p,
            Property::Stroke(c) => self.stroke = c,
            Property::StrokeWidth(w) => self.stroke_width = w.max(0.0),
            Property::PaintOrder(o) => self.paint_order = o,
            Property::Shadow(s) => self.shadow = s,
            Property::Visible(v) => self.visible = v,
            Property::Selectable(v) => self.selectable = v,
            Property::Caching(v) => self.caching = v,
            Property::Text(t) => return self.edit_text(|p| p.content = t),
            Property::FontFamily(f) => return self.edit_text(|p| p.font.family = f),
            Property::FontSize(s) => return self.edit_text(|p| p.font.size = s.max(1.0)),
            Property::FontWeight(w) => return self.edit_text(|p| p.font.weight = w),
            Property::FontStyle(s) => return self.edit_text(|p| p.style = s),
            Property::TextAlign(a) => return self.edit_text(|p| p.align = a),
            Property::Underline(u) => return self.edit_text(|p| p.underline = u),
        }
        self.dirty = true;
        true
    }

    fn edit_text(&mut self, edit: impl FnOnce(&mut TextProps)) -> bool {
        let NodeKind::Text(props) = &mut self.kind else {
            return false;
        };
        edit(props);
        let (w, h) = props.measure();
        self.width = w;
        self.height = h;
        self.dirty = true;
        true
    }

    /// Read one property, or `None` if it does not apply to this kind.
    pub fn get(&self, key: PropertyKey) -> Option<Property> {
        let text = self.text_props();
        Some(match key {
            PropertyKey::Left => Property::Left(self.transform.left),
            PropertyKey::Top => Property::Top(self.transform.top),
            PropertyKey::ScaleX => Property::ScaleX(self.transform.scale_x),
            PropertyKey::ScaleY => Property::ScaleY(self.transform.scale_y),
            PropertyKey::Angle => Property::Angle(self.transform.angle),
            PropertyKey::Opacity => Property::Opacity(self.opacity),
            PropertyKey::Fill => Property::Fill(self.fill),
            PropertyKey::Stroke => Property::Stroke(self.stroke),
            PropertyKey::StrokeWidth => Property::StrokeWidth(self.stroke_width),
            PropertyKey::PaintOrder => Property::PaintOrder(self.paint_order),
            PropertyKey::Shadow => Property::Shadow(self.shadow),
            PropertyKey::Visible => Property::Visible(self.visible),
            PropertyKey::Selectable => Property::Selectable(self.selectable),
            PropertyKey::Caching => Property::Caching(self.caching),
            PropertyKey::Text => Property::Text(text?.content.clone()),
            PropertyKey::FontFamily => Property::FontFamily(text?.font.family.clone()),
            PropertyKey::FontSize => Property::FontSize(text?.font.size),
            PropertyKey::FontWeight => Property::FontWeight(text?.font.weight),
            PropertyKey::FontStyle => Property::FontStyle(text?.style),
            PropertyKey::TextAlign => Property::TextAlign(text?.align),
            PropertyKey::Underline => Property::Underline(text?.underline),
        })
    }
}

// ─── Properties ──────────────────────────────────────────────────────────

/// One settable node property with its typed value.
#[derive(Debug, Clone, PartialEq)]
pub enum Property {
    Left(f32),
    Top(f32),
    ScaleX(f32),
    ScaleY(f32),
    Angle(f32),
    Opacity(f32),
    Fill(Option<Paint>),
    Stroke(Option<Color>),
    StrokeWidth(f32),
    PaintOrder(PaintOrder),
    Shadow(Option<Shadow>),
    Visible(bool),
    Selectable(bool),
    Caching(bool),
    Text(String),
    FontFamily(String),
    FontSize(f32),
    FontWeight(u16),
    FontStyle(FontStyle),
    TextAlign(TextAlign),
    Underline(bool),
}

/// Names a property without a value (for reads).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyKey {
    Left,
    Top,
    ScaleX,
    ScaleY,
    Angle,
    Opacity,
    Fill,
    Stroke,
    StrokeWidth,
    PaintOrder,
    Shadow,
    Visible,
    Selectable,
    Caching,
    Text,
    FontFamily,
    FontSize,
    FontWeight,
    FontStyle,
    TextAlign,
    Underline,
}

impl PropertyKey {
    /// The camelCase name used by the browser UI.
    pub fn name(&self) -> &'static str {
        match self {
            PropertyKey::Left => "left",
            PropertyKey::Top => "top",
            PropertyKey::ScaleX => "scaleX",
            PropertyKey::ScaleY => "scaleY",
            PropertyKey::Angle => "angle",
            PropertyKey::Opacity => "opacity",
            PropertyKey::Fill => "fill",
            PropertyKey::Stroke => "stroke",
            PropertyKey::StrokeWidth => "strokeWidth",
            PropertyKey::PaintOrder => "paintFirst",
            PropertyKey::Shadow => "shadow",
            PropertyKey::Visible => "visible",
            PropertyKey::Selectable => "selectable",
            PropertyKey::Caching => "objectCaching",
            PropertyKey::Text => "text",
            PropertyKey::FontFamily => "fontFamily",
            PropertyKey::FontSize => "fontSize",
            PropertyKey::FontWeight => "fontWeight",
            PropertyKey::FontStyle => "fontStyle",
            PropertyKey::TextAlign => "textAlign",
            PropertyKey::Underline => "underline",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        const ALL: [PropertyKey; 21] = [
            PropertyKey::Left,
            PropertyKey::Top,
            PropertyKey::ScaleX,
            PropertyKey::ScaleY,
            PropertyKey::Angle,
            PropertyKey::Opacity,
            PropertyKey::Fill,
            PropertyKey::Stroke,
            PropertyKey::StrokeWidth,
            PropertyKey::PaintOrder,
            PropertyKey::Shadow,
            PropertyKey::Visible,
            PropertyKey::Selectable,
            PropertyKey::Caching,
            PropertyKey::Text,
            PropertyKey::FontFamily,
            PropertyKey::FontSize,
            PropertyKey::FontWeight,
            PropertyKey::FontStyle,
            PropertyKey::TextAlign,
            PropertyKey::Underline,
        ];
        ALL.into_iter().find(|k| k.name() == name)
    }
}

impl Property {
    pub fn key(&self) -> PropertyKey {
        match self {
            Property::Left(_) => PropertyKey::Left,
            Property::Top(_) => PropertyKey::Top,
            Property::ScaleX(_) => PropertyKey::ScaleX,
            Property::ScaleY(_) => PropertyKey::ScaleY,
            Property::Angle(_) => PropertyKey::Angle,
            Property::Opacity(_) => PropertyKey::Opacity,
            Property::Fill(_) => PropertyKey::Fill,
            Property::Stroke(_) => PropertyKey::Stroke,
            Property::StrokeWidth(_) => PropertyKey::StrokeWidth,
            Property::PaintOrder(_) => PropertyKey::PaintOrder,
            Property::Shadow(_) => PropertyKey::Shadow,
            Property::Visible(_) => PropertyKey::Visible,
            Property::Selectable(_) => PropertyKey::Selectable,
            Property::Caching(_) => PropertyKey::Caching,
            Property::Text(_) => PropertyKey::Text,
            Property::FontFamily(_) => PropertyKey::FontFamily,
            Property::FontSize(_) => PropertyKey::FontSize,
            Property::FontWeight(_) => PropertyKey::FontWeight,
            Property::FontStyle(_) => PropertyKey::FontStyle,
            Property::TextAlign(_) => PropertyKey::TextAlign,
            Property::Underline(_) => PropertyKey::Underline,
        }
    }
}
