//! JSON edge for node properties.
//!
//! The browser UI speaks `(name, value)` pairs with camelCase names and
//! loosely typed JSON values. They are validated here into typed
//! `Property` values; anything malformed is rejected with `None` so the
//! core only ever sees well-formed input.

use crate::config::TextOptions;
use sd_core::model::*;
use serde::Deserialize;
use serde_json::{Map, Value, json};

/// A shadow as the UI sends it. Missing fields fall back to a black,
/// unblurred, unshifted shadow.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShadowSpec {
    pub color: Option<String>,
    pub blur: Option<f32>,
    pub offset_x: Option<f32>,
    pub offset_y: Option<f32>,
}

impl ShadowSpec {
    /// `None` if the color string does not parse.
    pub fn normalize(&self) -> Option<Shadow> {
        let color = match &self.color {
            Some(c) => Color::parse(c)?,
            None => Color::BLACK,
        };
        Some(Shadow {
            color,
            blur: self.blur.unwrap_or(0.0).max(0.0),
            offset_x: self.offset_x.unwrap_or(0.0),
            offset_y: self.offset_y.unwrap_or(0.0),
        })
    }
}

/// `TextOptions` as the UI sends them.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextOptionsSpec {
    pub fill: Option<Value>,
    pub font_size: Option<f32>,
    pub font_weight: Option<Value>,
    pub shadow: Option<ShadowSpec>,
    pub stroke: Option<String>,
    pub stroke_width: Option<f32>,
}

impl TextOptionsSpec {
    /// Fields that fail to parse are dropped (the default applies).
    pub fn into_options(self) -> TextOptions {
        TextOptions {
            fill: self.fill.as_ref().and_then(paint_from_json).flatten(),
            font_size: self.font_size,
            font_weight: self.font_weight.as_ref().and_then(weight_from_json),
            shadow: self.shadow.as_ref().and_then(ShadowSpec::normalize),
            stroke: self.stroke.as_deref().and_then(Color::parse),
            stroke_width: self.stroke_width,
        }
    }
}

/// Conversion between `Property` and `(name, JSON value)` pairs.
pub trait PropertyJson: Sized {
    fn from_json(name: &str, value: &Value) -> Option<Self>;
    fn to_json(&self) -> Value;
}

impl PropertyJson for Property {
    fn from_json(name: &str, value: &Value) -> Option<Self> {
        let number = || value.as_f64().map(|v| v as f32);
        let flag = || value.as_bool();
        let string = || value.as_str().map(str::to_string);

        Some(match PropertyKey::from_name(name)? {
            PropertyKey::Left => Property::Left(number()?),
            PropertyKey::Top => Property::Top(number()?),
            PropertyKey::ScaleX => Property::ScaleX(number()?),
            PropertyKey::ScaleY => Property::ScaleY(number()?),
            PropertyKey::Angle => Property::Angle(number()?),
            PropertyKey::Opacity => Property::Opacity(number()?),
            PropertyKey::StrokeWidth => Property::StrokeWidth(number()?),
            PropertyKey::FontSize => Property::FontSize(number()?),
            PropertyKey::Fill => Property::Fill(paint_from_json(value)?),
            PropertyKey::Stroke => Property::Stroke(match value {
                Value::Null => None,
                v => Some(Color::parse(v.as_str()?)?),
            }),
            PropertyKey::PaintOrder => Property::PaintOrder(match value.as_str()? {
                "fill" => PaintOrder::Fill,
                "stroke" => PaintOrder::Stroke,
                _ => return None,
            }),
            PropertyKey::Shadow => Property::Shadow(match value {
                Value::Null => None,
                v => Some(ShadowSpec::deserialize(v).ok()?.normalize()?),
            }),
            PropertyKey::Visible => Property::Visible(flag()?),
            PropertyKey::Selectable => Property::Selectable(flag()?),
            PropertyKey::Caching => Property::Caching(flag()?),
            PropertyKey::Underline => Property::Underline(flag()?),
            PropertyKey::Text => Property::Text(string()?),
            PropertyKey::FontFamily => Property::FontFamily(string()?),
            PropertyKey::FontWeight => Property::FontWeight(weight_from_json(value)?),
            PropertyKey::FontStyle => Property::FontStyle(match value.as_str()? {
                "normal" => FontStyle::Normal,
                "italic" => FontStyle::Italic,
                _ => return None,
            }),
            PropertyKey::TextAlign => Property::TextAlign(match value.as_str()? {
                "left" => TextAlign::Left,
                "center" => TextAlign::Center,
                "right" => TextAlign::Right,
                _ => return None,
            }),
        })
    }

    fn to_json(&self) -> Value {
        match self {
            Property::Left(v)
            | Property::Top(v)
            | Property::ScaleX(v)
            | Property::ScaleY(v)
            | Property::Angle(v)
            | Property::Opacity(v)
            | Property::StrokeWidth(v)
            | Property::FontSize(v) => json!(v),
            Property::Fill(paint) => paint.as_ref().map_or(Value::Null, paint_to_json),
            Property::Stroke(color) => color.map_or(Value::Null, |c| json!(c.to_hex())),
            Property::PaintOrder(PaintOrder::Fill) => json!("fill"),
            Property::PaintOrder(PaintOrder::Stroke) => json!("stroke"),
            Property::Shadow(shadow) => shadow.map_or(Value::Null, |s| {
                json!({
                    "color": s.color.to_css(),
                    "blur": s.blur,
                    "offsetX": s.offset_x,
                    "offsetY": s.offset_y,
                })
            }),
            Property::Visible(b)
            | Property::Selectable(b)
            | Property::Caching(b)
            | Property::Underline(b) => json!(b),
            Property::Text(s) | Property::FontFamily(s) => json!(s),
            Property::FontWeight(w) => json!(w),
            Property::FontStyle(FontStyle::Normal) => json!("normal"),
            Property::FontStyle(FontStyle::Italic) => json!("italic"),
            Property::TextAlign(a) => json!(match a {
                TextAlign::Left => "left",
                TextAlign::Center => "center",
                TextAlign::Right => "right",
            }),
        }
    }
}

/// Every property that applies to `node`, keyed by its UI name.
pub fn node_properties(node: &SceneNode) -> Map<String, Value> {
    const KEYS: [PropertyKey; 21] = [
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
    let mut map = Map::new();
    map.insert("id".into(), json!(node.id.as_str()));
    map.insert("type".into(), json!(node.kind.name()));
    for key in KEYS {
        if let Some(prop) = node.get(key) {
            map.insert(key.name().into(), prop.to_json());
        }
    }
    map
}

// ─── Value helpers ─────────────────────────────────────────────────────────

/// `Some(None)` for JSON null, `None` for malformed input.
fn paint_from_json(value: &Value) -> Option<Option<Paint>> {
    match value {
        Value::Null => Some(None),
        Value::String(s) => Some(Some(Paint::Solid(Color::parse(s)?))),
        Value::Object(obj) => {
            let start = Color::parse(obj.get("start")?.as_str()?)?;
            let end = Color::parse(obj.get("end")?.as_str()?)?;
            let angle = obj.get("angle").and_then(Value::as_f64).unwrap_or(0.0) as f32;
            Some(Some(Paint::LinearGradient(LinearGradient::new(start, end, angle))))
        }
        _ => None,
    }
}

fn paint_to_json(paint: &Paint) -> Value {
    match paint {
        Paint::Solid(c) => json!(c.to_hex()),
        Paint::LinearGradient(g) => {
            let coords = g.coords();
            json!({
                "type": "linear",
                "start": g.start.to_hex(),
                "end": g.end.to_hex(),
                "angle": g.angle,
                "coords": { "x1": coords.x1, "y1": coords.y1, "x2": coords.x2, "y2": coords.y2 },
            })
        }
    }
}

/// Numeric weights, or the CSS keywords `normal` and `bold`.
fn weight_from_json(value: &Value) -> Option<u16> {
    match value {
        Value::Number(n) => u16::try_from(n.as_u64()?).ok().filter(|w| (1..=1000).contains(w)),
        Value::String(s) => match s.as_str() {
            "normal" => Some(FONT_WEIGHT_NORMAL),
            "bold" => Some(FONT_WEIGHT_BOLD),
            other => other.parse().ok(),
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_scalar_properties() {
        assert_eq!(
            Property::from_json("scaleX", &json!(1.5)),
            Some(Property::ScaleX(1.5))
        );
        assert_eq!(
            Property::from_json("paintFirst", &json!("stroke")),
            Some(Property::PaintOrder(PaintOrder::Stroke))
        );
        assert_eq!(
            Property::from_json("fontWeight", &json!("bold")),
            Some(Property::FontWeight(FONT_WEIGHT_BOLD))
        );
        assert_eq!(
            Property::from_json("objectCaching", &json!(false)),
            Some(Property::Caching(false))
        );
    }

    #[test]
    fn rejects_malformed_values() {
        assert_eq!(Property::from_json("left", &json!("ten")), None);
        assert_eq!(Property::from_json("fill", &json!("#zzz")), None);
        assert_eq!(Property::from_json("textAlign", &json!("justify")), None);
        assert_eq!(Property::from_json("fontWeight", &json!(0)), None);
        assert_eq!(Property::from_json("nonsense", &json!(1)), None);
        assert_eq!(
            Property::from_json("shadow", &json!({ "color": "not-a-color" })),
            None
        );
    }

    #[test]
    fn shadow_spec_fills_missing_fields() {
        let prop = Property::from_json("shadow", &json!({ "blur": 4, "offsetX": 3 })).unwrap();
        assert_eq!(
            prop,
            Property::Shadow(Some(Shadow {
                color: Color::BLACK,
                blur: 4.0,
                offset_x: 3.0,
                offset_y: 0.0,
            }))
        );
        assert_eq!(
            Property::from_json("shadow", &Value::Null),
            Some(Property::Shadow(None))
        );
    }

    #[test]
    fn gradient_fill_from_object() {
        let prop = Property::from_json(
            "fill",
            &json!({ "start": "#ff0000", "end": "#0000ff", "angle": 90 }),
        )
        .unwrap();
        let Property::Fill(Some(Paint::LinearGradient(g))) = prop else {
            panic!("expected a gradient, got {prop:?}");
        };
        assert_eq!(g.angle, 90.0);
        assert_eq!(prop.to_json()["type"], json!("linear"));
    }

    #[test]
    fn text_options_spec_drops_bad_fields() {
        let spec: TextOptionsSpec = serde_json::from_value(json!({
            "fill": "#00ff00",
            "fontSize": 32,
            "stroke": "bogus",
        }))
        .unwrap();
        let options = spec.into_options();
        assert_eq!(options.fill, Some(Paint::Solid(Color::from_hex("#00ff00").unwrap())));
        assert_eq!(options.font_size, Some(32.0));
        assert_eq!(options.stroke, None);
    }

    #[test]
    fn node_properties_skip_inapplicable_keys() {
        let node = SceneNode::path(PathData::new(vec![
            PathCmd::MoveTo(0.0, 0.0),
            PathCmd::LineTo(4.0, 4.0),
        ]));
        let map = node_properties(&node);
        assert_eq!(map["type"], json!("path"));
        assert_eq!(map["fill"], json!("#000000"));
        assert!(!map.contains_key("fontSize"));
    }
}
