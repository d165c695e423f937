//! Parsers for the text formats the editor ingests: SVG path data,
//! CSS color strings, view boxes, and minimal SVG documents.
//!
//! Built on `winnow` 0.7. Path data is normalized to absolute
//! `PathCmd`s on the way in; arcs are flattened to cubic curves.

use crate::catalog::ViewBox;
use crate::geometry;
use crate::model::*;
use kurbo::{Point, SvgArc, Vec2};
use winnow::ascii::multispace0;
use winnow::combinator::{alt, delimited};
use winnow::error::{ContextError, ErrMode};
use winnow::prelude::*;
use winnow::token::{take_till, take_while};

/// Tolerance used when flattening arcs into cubics.
const ARC_TOLERANCE: f64 = 0.1;

// ─── Low-level parsers ──────────────────────────────────────────────────

fn backtrack<T>() -> ModalResult<T> {
    Err(ErrMode::Backtrack(ContextError::new()))
}

/// Consume whitespace and commas between path arguments.
fn skip_separators(input: &mut &str) {
    let _: Result<&str, ErrMode<ContextError>> =
        take_while(0.., |c: char| c.is_whitespace() || c == ',').parse_next(input);
}

fn skip_ws(input: &mut &str) {
    let _: Result<&str, ErrMode<ContextError>> = multispace0.parse_next(input);
}

fn digits<'a>(input: &mut &'a str) -> &'a str {
    let matched: Result<&str, ErrMode<ContextError>> =
        take_while(0.., |c: char| c.is_ascii_digit()).parse_next(input);
    matched.unwrap_or_default()
}

/// SVG number: sign, digits, optional fraction, optional exponent.
/// `.5` and `1.` are both accepted; `1.5.5` parses as `1.5` then `.5`.
fn parse_number(input: &mut &str) -> ModalResult<f32> {
    let start = *input;
    if input.starts_with('-') || input.starts_with('+') {
        *input = &input[1..];
    }
    let int = digits(input);
    let mut frac = "";
    if input.starts_with('.') {
        *input = &input[1..];
        frac = digits(input);
    }
    if int.is_empty() && frac.is_empty() {
        *input = start;
        return backtrack();
    }
    if input.starts_with('e') || input.starts_with('E') {
        let before_exp = *input;
        *input = &input[1..];
        if input.starts_with('-') || input.starts_with('+') {
            *input = &input[1..];
        }
        if digits(input).is_empty() {
            *input = before_exp;
        }
    }
    let matched = &start[..start.len() - input.len()];
    matched.parse::<f32>().or_else(|_| {
        *input = start;
        backtrack()
    })
}

fn arg(input: &mut &str) -> ModalResult<f32> {
    skip_separators(input);
    parse_number(input)
}

fn pair(input: &mut &str) -> ModalResult<(f32, f32)> {
    Ok((arg(input)?, arg(input)?))
}

/// Arc flags are single `0`/`1` characters and may be packed (`a1 1 0 01 5 5`).
fn flag(input: &mut &str) -> ModalResult<bool> {
    skip_separators(input);
    alt(('0'.value(false), '1'.value(true))).parse_next(input)
}

/// Whether another argument group follows (implicit command repetition).
fn starts_number(s: &str) -> bool {
    let s = s.trim_start_matches(|c: char| c.is_whitespace() || c == ',');
    s.starts_with(|c: char| c.is_ascii_digit() || matches!(c, '-' | '+' | '.'))
}

// ─── Path data ──────────────────────────────────────────────────────────

#[derive(Default)]
struct PathState {
    cmds: Vec<PathCmd>,
    current: (f32, f32),
    subpath_start: (f32, f32),
    /// Second control point of the previous cubic (for `S`).
    last_cubic: Option<(f32, f32)>,
    /// Control point of the previous quadratic (for `T`).
    last_quad: Option<(f32, f32)>,
}

impl PathState {
    fn abs(&self, relative: bool, p: (f32, f32)) -> (f32, f32) {
        if relative {
            (self.current.0 + p.0, self.current.1 + p.1)
        } else {
            p
        }
    }

    fn reflect(&self, ctrl: Option<(f32, f32)>) -> (f32, f32) {
        match ctrl {
            Some((cx, cy)) => (2.0 * self.current.0 - cx, 2.0 * self.current.1 - cy),
            None => self.current,
        }
    }

    fn move_to(&mut self, p: (f32, f32)) {
        self.cmds.push(PathCmd::MoveTo(p.0, p.1));
        self.current = p;
        self.subpath_start = p;
    }

    fn line_to(&mut self, p: (f32, f32)) {
        self.cmds.push(PathCmd::LineTo(p.0, p.1));
        self.current = p;
    }

    fn cubic_to(&mut self, c1: (f32, f32), c2: (f32, f32), p: (f32, f32)) {
        self.cmds.push(PathCmd::CubicTo(c1.0, c1.1, c2.0, c2.1, p.0, p.1));
        self.current = p;
        self.last_cubic = Some(c2);
    }

    fn quad_to(&mut self, c: (f32, f32), p: (f32, f32)) {
        self.cmds.push(PathCmd::QuadTo(c.0, c.1, p.0, p.1));
        self.current = p;
        self.last_quad = Some(c);
    }

    fn arc_to(&mut self, radii: (f32, f32), rotation: f32, large: bool, sweep: bool, p: (f32, f32)) {
        let arc = SvgArc {
            from: Point::new(self.current.0 as f64, self.current.1 as f64),
            to: Point::new(p.0 as f64, p.1 as f64),
            radii: Vec2::new(radii.0.abs() as f64, radii.1.abs() as f64),
            x_rotation: (rotation as f64).to_radians(),
            large_arc: large,
            sweep,
        };
        match kurbo::Arc::from_svg_arc(&arc) {
            Some(arc) => {
                arc.to_cubic_beziers(ARC_TOLERANCE, |c1, c2, end| {
                    self.cmds.push(PathCmd::CubicTo(
                        c1.x as f32,
                        c1.y as f32,
                        c2.x as f32,
                        c2.y as f32,
                        end.x as f32,
                        end.y as f32,
                    ));
                });
                self.current = p;
            }
            // Degenerate radii: the arc is a straight line.
            None => self.line_to(p),
        }
    }

    fn close(&mut self) {
        self.cmds.push(PathCmd::Close);
        self.current = self.subpath_start;
    }

    /// Apply one command letter, consuming all of its argument groups.
    fn apply(&mut self, letter: char, input: &mut &str) -> ModalResult<()> {
        let relative = letter.is_ascii_lowercase();
        let mut first = true;
        loop {
            let (keep_cubic, keep_quad) = match letter.to_ascii_uppercase() {
                'M' => {
                    let p = self.abs(relative, pair(input)?);
                    // Extra pairs after a moveto are implicit linetos.
                    if first { self.move_to(p) } else { self.line_to(p) }
                    (false, false)
                }
                'L' => {
                    let p = self.abs(relative, pair(input)?);
                    self.line_to(p);
                    (false, false)
                }
                'H' => {
                    let x = arg(input)?;
                    let x = if relative { self.current.0 + x } else { x };
                    self.line_to((x, self.current.1));
                    (false, false)
                }
                'V' => {
                    let y = arg(input)?;
                    let y = if relative { self.current.1 + y } else { y };
                    self.line_to((self.current.0, y));
                    (false, false)
                }
                'C' => {
                    let c1 = self.abs(relative, pair(input)?);
                    let c2 = self.abs(relative, pair(input)?);
                    let p = self.abs(relative, pair(input)?);
                    self.cubic_to(c1, c2, p);
                    (true, false)
                }
                'S' => {
                    let c1 = self.reflect(self.last_cubic);
                    let c2 = self.abs(relative, pair(input)?);
                    let p = self.abs(relative, pair(input)?);
                    self.cubic_to(c1, c2, p);
                    (true, false)
                }
                'Q' => {
                    let c = self.abs(relative, pair(input)?);
                    let p = self.abs(relative, pair(input)?);
                    self.quad_to(c, p);
                    (false, true)
                }
                'T' => {
                    let c = self.reflect(self.last_quad);
                    let p = self.abs(relative, pair(input)?);
                    self.quad_to(c, p);
                    (false, true)
                }
                'A' => {
                    let radii = pair(input)?;
                    let rotation = arg(input)?;
                    let large = flag(input)?;
                    let sweep = flag(input)?;
                    let p = self.abs(relative, pair(input)?);
                    self.arc_to(radii, rotation, large, sweep, p);
                    (false, false)
                }
                'Z' => {
                    self.close();
                    (false, false)
                }
                _ => return backtrack(),
            };
            if !keep_cubic {
                self.last_cubic = None;
            }
            if !keep_quad {
                self.last_quad = None;
            }
            first = false;
            if letter.eq_ignore_ascii_case(&'Z') || !starts_number(input) {
                return Ok(());
            }
        }
    }
}

/// Parse an SVG path `d` attribute into absolute path commands.
#[must_use = "parsing result should be used"]
pub fn parse_path_data(input: &str) -> Result<Vec<PathCmd>, String> {
    let mut state = PathState::default();
    let mut rest = input;

    skip_separators(&mut rest);
    while let Some(letter) = rest.chars().next() {
        if !letter.is_ascii_alphabetic() {
            return Err(format!("Path parse error: expected command at `{}`", snippet(rest)));
        }
        if state.cmds.is_empty() && !letter.eq_ignore_ascii_case(&'M') {
            return Err(format!("Path parse error: path must start with a moveto, got `{letter}`"));
        }
        rest = &rest[1..];
        state
            .apply(letter, &mut rest)
            .map_err(|e| format!("Path parse error at `{}`: {e}", snippet(rest)))?;
        skip_separators(&mut rest);
    }

    Ok(state.cmds)
}

fn snippet(s: &str) -> &str {
    match s.char_indices().nth(16) {
        Some((i, _)) => &s[..i],
        None => s,
    }
}

// ─── Colors ─────────────────────────────────────────────────────────────

/// Parse a CSS color: hex, `rgb()`, `rgba()`, or a basic named color.
pub fn parse_color(input: &str) -> Option<Color> {
    let s = input.trim();
    if s.starts_with('#') {
        return Color::from_hex(s);
    }
    let lower = s.to_ascii_lowercase();
    if lower.starts_with("rgb") {
        return parse_rgb_function.parse(lower.as_str()).ok();
    }
    named_color(&lower)
}

fn parse_rgb_function(input: &mut &str) -> ModalResult<Color> {
    let _ = alt(("rgba", "rgb")).parse_next(input)?;
    skip_ws(input);
    let _ = '('.parse_next(input)?;
    let mut parts: Vec<(f32, bool)> = Vec::with_capacity(4);
    loop {
        let _: Result<&str, ErrMode<ContextError>> =
            take_while(0.., |c: char| c.is_whitespace() || c == ',' || c == '/')
                .parse_next(input);
        if input.starts_with(')') {
            *input = &input[1..];
            break;
        }
        let value = parse_number(input)?;
        let percent = if input.starts_with('%') {
            *input = &input[1..];
            true
        } else {
            false
        };
        parts.push((value, percent));
    }
    skip_ws(input);

    let channel = |(v, pct): (f32, bool)| if pct { v / 100.0 } else { v / 255.0 };
    let alpha = |(v, pct): (f32, bool)| if pct { v / 100.0 } else { v };
    match parts.as_slice() {
        [r, g, b] => Ok(Color::rgba(channel(*r), channel(*g), channel(*b), 1.0)),
        [r, g, b, a] => Ok(Color::rgba(
            channel(*r).clamp(0.0, 1.0),
            channel(*g).clamp(0.0, 1.0),
            channel(*b).clamp(0.0, 1.0),
            alpha(*a).clamp(0.0, 1.0),
        )),
        _ => backtrack(),
    }
}

fn named_color(name: &str) -> Option<Color> {
    let hex = match name {
        "black" => "#000000",
        "white" => "#ffffff",
        "red" => "#ff0000",
        "green" => "#008000",
        "blue" => "#0000ff",
        "yellow" => "#ffff00",
        "orange" => "#ffa500",
        "purple" => "#800080",
        "gray" | "grey" => "#808080",
        "transparent" => return Some(Color::TRANSPARENT),
        _ => return None,
    };
    Color::from_hex(hex)
}

// ─── View boxes & lengths ───────────────────────────────────────────────

/// Parse `min-x min-y width height` (whitespace or comma separated).
pub fn parse_view_box(input: &str) -> Option<ViewBox> {
    let mut rest = input;
    let min_x = arg(&mut rest).ok()?;
    let min_y = arg(&mut rest).ok()?;
    let width = arg(&mut rest).ok()?;
    let height = arg(&mut rest).ok()?;
    skip_separators(&mut rest);
    if !rest.is_empty() || width < 0.0 || height < 0.0 {
        return None;
    }
    Some(ViewBox {
        min_x,
        min_y,
        width,
        height,
    })
}

/// A user-unit length, optionally suffixed `px`. Percentages are rejected.
fn parse_length(input: &str) -> Option<f32> {
    let mut rest = input.trim();
    let value = parse_number(&mut rest).ok()?;
    match rest.trim() {
        "" | "px" => Some(value),
        _ => None,
    }
}

fn parse_points(input: &str) -> Vec<(f32, f32)> {
    let mut rest = input;
    let mut points = Vec::new();
    while starts_number(rest) {
        match pair(&mut rest) {
            Ok(p) => points.push(p),
            Err(_) => break,
        }
    }
    points
}

// ─── SVG documents ──────────────────────────────────────────────────────

/// One drawable shape from an SVG document, already converted to a path.
#[derive(Debug, Clone, PartialEq)]
pub struct SvgShape {
    pub commands: Vec<PathCmd>,
    /// `None` when the shape is declared `fill="none"`.
    pub fill: Option<Paint>,
    pub stroke: Option<Color>,
    pub stroke_width: f32,
}

/// The subset of an SVG document the editor can place on a canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct SvgDocument {
    pub width: f32,
    pub height: f32,
    pub view_box: Option<ViewBox>,
    pub shapes: Vec<SvgShape>,
}

/// Presentation attributes inherited through `<g>` elements.
#[derive(Debug, Clone, Copy)]
struct InheritedStyle {
    fill: Option<Paint>,
    stroke: Option<Color>,
    stroke_width: f32,
}

impl Default for InheritedStyle {
    fn default() -> Self {
        Self {
            fill: Some(Paint::Solid(Color::BLACK)),
            stroke: None,
            stroke_width: 1.0,
        }
    }
}

#[derive(Debug)]
struct Tag<'a> {
    name: &'a str,
    attrs: Vec<(&'a str, &'a str)>,
    self_closing: bool,
}

impl<'a> Tag<'a> {
    fn attr(&self, name: &str) -> Option<&'a str> {
        self.attrs.iter().find(|(n, _)| *n == name).map(|(_, v)| *v)
    }

    fn length(&self, name: &str) -> f32 {
        self.attr(name).and_then(parse_length).unwrap_or(0.0)
    }

    /// Attribute lookup that also consults the inline `style` declarations.
    fn presentation(&self, name: &str) -> Option<&'a str> {
        let from_style = self.attr("style").and_then(|style| {
            style.split(';').find_map(|decl| {
                let (key, value) = decl.split_once(':')?;
                (key.trim() == name).then(|| value.trim())
            })
        });
        from_style.or_else(|| self.attr(name))
    }

    fn style(&self, parent: InheritedStyle) -> InheritedStyle {
        let mut style = parent;
        if let Some(fill) = self.presentation("fill") {
            style.fill = parse_svg_paint(fill, parent.fill);
        }
        if let Some(opacity) = self.presentation("fill-opacity").and_then(parse_length)
            && let Some(Paint::Solid(c)) = style.fill.as_mut()
        {
            c.a *= opacity.clamp(0.0, 1.0);
        }
        if let Some(stroke) = self.presentation("stroke") {
            style.stroke = parse_svg_paint(stroke, None).map(|p| p.primary_color());
        }
        if let Some(w) = self.presentation("stroke-width").and_then(parse_length) {
            style.stroke_width = w.max(0.0);
        }
        style
    }
}

fn parse_svg_paint(value: &str, inherited: Option<Paint>) -> Option<Paint> {
    let value = value.trim();
    match value {
        "none" => None,
        "inherit" | "currentColor" => inherited,
        _ if value.starts_with("url(") => {
            log::debug!("SVG paint server `{value}` not supported, using black");
            Some(Paint::Solid(Color::BLACK))
        }
        _ => match parse_color(value) {
            Some(c) => Some(Paint::Solid(c)),
            None => {
                log::debug!("unrecognized SVG paint `{value}`, using black");
                Some(Paint::Solid(Color::BLACK))
            }
        },
    }
}

fn parse_tag_name<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    take_while(1.., |c: char| c.is_alphanumeric() || matches!(c, '-' | '_' | ':' | '.'))
        .parse_next(input)
}

fn parse_attribute<'a>(input: &mut &'a str) -> ModalResult<(&'a str, &'a str)> {
    let name = parse_tag_name(input)?;
    skip_ws(input);
    let _ = '='.parse_next(input)?;
    skip_ws(input);
    let value = alt((
        delimited('"', take_till(0.., '"'), '"'),
        delimited('\'', take_till(0.., '\''), '\''),
    ))
    .parse_next(input)?;
    Ok((name, value))
}

/// Parse an opening tag starting at `<`.
fn parse_open_tag<'a>(input: &mut &'a str) -> ModalResult<Tag<'a>> {
    let _ = '<'.parse_next(input)?;
    let name = parse_tag_name(input)?;
    let mut attrs = Vec::new();
    loop {
        skip_ws(input);
        if input.starts_with("/>") {
            *input = &input[2..];
            return Ok(Tag {
                name,
                attrs,
                self_closing: true,
            });
        }
        if input.starts_with('>') {
            *input = &input[1..];
            return Ok(Tag {
                name,
                attrs,
                self_closing: false,
            });
        }
        attrs.push(parse_attribute(input)?);
    }
}

/// Elements whose content is never drawn directly.
fn is_container_without_render(name: &str) -> bool {
    matches!(
        name,
        "defs"
            | "clipPath"
            | "mask"
            | "symbol"
            | "pattern"
            | "marker"
            | "linearGradient"
            | "radialGradient"
            | "style"
            | "title"
            | "desc"
            | "metadata"
    )
}

fn shape_commands(tag: &Tag) -> Result<Option<Vec<PathCmd>>, String> {
    let cmds = match tag.name {
        "path" => match tag.attr("d") {
            Some(d) => parse_path_data(d)?,
            None => return Ok(None),
        },
        "rect" => {
            let (x, y) = (tag.length("x"), tag.length("y"));
            let (w, h) = (tag.length("width"), tag.length("height"));
            if w <= 0.0 || h <= 0.0 {
                return Ok(None);
            }
            let rect = kurbo::Rect::new(x as f64, y as f64, (x + w) as f64, (y + h) as f64);
            geometry::shape_to_commands(&rect)
        }
        "circle" => {
            let r = tag.length("r");
            if r <= 0.0 {
                return Ok(None);
            }
            let center = Point::new(tag.length("cx") as f64, tag.length("cy") as f64);
            geometry::shape_to_commands(&kurbo::Circle::new(center, r as f64))
        }
        "ellipse" => {
            let (rx, ry) = (tag.length("rx"), tag.length("ry"));
            if rx <= 0.0 || ry <= 0.0 {
                return Ok(None);
            }
            let center = Point::new(tag.length("cx") as f64, tag.length("cy") as f64);
            let ellipse = kurbo::Ellipse::new(center, Vec2::new(rx as f64, ry as f64), 0.0);
            geometry::shape_to_commands(&ellipse)
        }
        "line" => vec![
            PathCmd::MoveTo(tag.length("x1"), tag.length("y1")),
            PathCmd::LineTo(tag.length("x2"), tag.length("y2")),
        ],
        "polygon" | "polyline" => {
            let points = parse_points(tag.attr("points").unwrap_or(""));
            let Some((&first, rest)) = points.split_first() else {
                return Ok(None);
            };
            let mut cmds = vec![PathCmd::MoveTo(first.0, first.1)];
            cmds.extend(rest.iter().map(|&(x, y)| PathCmd::LineTo(x, y)));
            if tag.name == "polygon" {
                cmds.push(PathCmd::Close);
            }
            cmds
        }
        _ => return Ok(None),
    };
    Ok((!cmds.is_empty()).then_some(cmds))
}

/// Parse an SVG document into flat, styled shapes.
///
/// Supports `path`, `rect`, `circle`, `ellipse`, `line`, `polygon` and
/// `polyline`, with `fill`/`stroke` inherited through `<g>`. Group
/// transforms, gradients and text are not interpreted.
#[must_use = "parsing result should be used"]
pub fn parse_svg_document(input: &str) -> Result<SvgDocument, String> {
    let mut rest = input;
    let mut doc: Option<SvgDocument> = None;
    let mut styles: Vec<InheritedStyle> = vec![InheritedStyle::default()];
    // Depth inside non-rendering containers like <defs>.
    let mut hidden_depth = 0usize;

    while let Some(pos) = rest.find('<') {
        rest = &rest[pos..];

        if rest.starts_with("<!--") {
            rest = rest.find("-->").map_or("", |end| &rest[end + 3..]);
            continue;
        }
        if rest.starts_with("<?") || rest.starts_with("<!") {
            rest = rest.find('>').map_or("", |end| &rest[end + 1..]);
            continue;
        }
        if let Some(closing) = rest.strip_prefix("</") {
            let name = closing
                .split(|c: char| c == '>' || c.is_whitespace())
                .next()
                .unwrap_or("");
            if hidden_depth > 0 {
                if is_container_without_render(name) {
                    hidden_depth -= 1;
                }
            } else if name == "g" && styles.len() > 1 {
                styles.pop();
            }
            rest = rest.find('>').map_or("", |end| &rest[end + 1..]);
            continue;
        }

        let tag = parse_open_tag
            .parse_next(&mut rest)
            .map_err(|e| format!("SVG parse error at `{}`: {e}", snippet(rest)))?;

        if hidden_depth > 0 {
            if is_container_without_render(tag.name) && !tag.self_closing {
                hidden_depth += 1;
            }
            continue;
        }
        if is_container_without_render(tag.name) {
            if !tag.self_closing {
                hidden_depth = 1;
            }
            continue;
        }

        let inherited = styles.last().copied().unwrap_or_default();
        match tag.name {
            "svg" if doc.is_none() => {
                let view_box = tag.attr("viewBox").and_then(parse_view_box);
                let width = tag.attr("width").and_then(parse_length);
                let height = tag.attr("height").and_then(parse_length);
                doc = Some(SvgDocument {
                    width: width.or(view_box.map(|v| v.width)).unwrap_or(0.0),
                    height: height.or(view_box.map(|v| v.height)).unwrap_or(0.0),
                    view_box,
                    shapes: Vec::new(),
                });
                styles.push(tag.style(inherited));
            }
            "g" => {
                if !tag.self_closing {
                    styles.push(tag.style(inherited));
                }
            }
            _ => {
                let Some(doc) = doc.as_mut() else {
                    continue;
                };
                if tag.presentation("display") == Some("none") {
                    continue;
                }
                if let Some(commands) = shape_commands(&tag)? {
                    let style = tag.style(inherited);
                    doc.shapes.push(SvgShape {
                        commands,
                        fill: style.fill,
                        stroke: style.stroke,
                        stroke_width: if style.stroke.is_some() { style.stroke_width } else { 0.0 },
                    });
                }
            }
        }
    }

    doc.ok_or_else(|| "SVG parse error: no <svg> root element".to_string())
}
