//! Object factory: build nodes, place them in the print area, insert them.
//!
//! Every insert appends a top-most node, selects it, and refreshes the
//! mirror before returning.

use crate::assets::LoadedAsset;
use crate::config::TextOptions;
use crate::sync::Editor;
use sd_core::catalog::find_text_preset;
use sd_core::geometry::{path_bounds, union_bounds};
use sd_core::id::NodeId;
use sd_core::model::*;
use sd_core::parser::{SvgDocument, parse_path_data};
use sd_core::scene::SceneCapability;

impl<S: SceneCapability> Editor<S> {
    /// Add a text node at the print-area center, at natural size.
    pub fn add_text(
        &mut self,
        text: impl Into<String>,
        font_family: &str,
        options: TextOptions,
    ) -> Option<NodeId> {
        if self.scene().is_none() {
            log::debug!("add_text: no scene mounted");
            return None;
        }
        let defaults = &self.config.text;
        let font = FontSpec {
            family: font_family.to_string(),
            weight: options.font_weight.unwrap_or(defaults.font_weight),
            size: options.font_size.unwrap_or(defaults.font_size).max(1.0),
        };
        let mut props = TextProps::new(text, font);
        props.align = defaults.align;
        props.direction = defaults.direction;

        let mut node = SceneNode::text(props);
        node.fill = Some(options.fill.unwrap_or(Paint::Solid(defaults.fill)));
        node.shadow = options.shadow;
        node.stroke = options.stroke;
        node.stroke_width = options.stroke_width.unwrap_or(0.0).max(0.0);
        node.stroke_uniform = defaults.stroke_uniform;
        node.handles = HandleStyle {
            padding: defaults.padding,
            ..self.config.handles
        };

        let (cx, cy) = self.print_area().center();
        node.transform = Transform::at(cx, cy);
        self.insert(node, Vec::new())
    }

    /// Add one of the quick-add text styles with its label as content.
    pub fn add_text_preset(&mut self, preset_id: &str, font_family: &str) -> Option<NodeId> {
        let Some(preset) = find_text_preset(preset_id) else {
            log::warn!("unknown text preset '{preset_id}'");
            return None;
        };
        let options = TextOptions {
            font_size: Some(preset.font_size),
            font_weight: Some(preset.font_weight),
            ..Default::default()
        };
        self.add_text(preset.label, font_family, options)
    }

    /// Add a vector graphic from SVG path data, fitted to the print area.
    pub fn add_graphic(&mut self, path_data: &str) -> Option<NodeId> {
        if self.scene().is_none() {
            return None;
        }
        let commands = match parse_path_data(path_data) {
            Ok(cmds) if !cmds.is_empty() => cmds,
            Ok(_) => {
                log::warn!("add_graphic: empty path data");
                return None;
            }
            Err(e) => {
                log::warn!("add_graphic: {e}");
                return None;
            }
        };
        let mut node = SceneNode::path(PathData::new(commands));
        node.fill = Some(Paint::Solid(self.config.graphic_fill));
        self.fit(&mut node);
        self.insert(node, Vec::new())
    }

    /// Insert a loaded image: rasters become one image node, vector
    /// documents become one group of paths.
    pub fn insert_asset(&mut self, asset: LoadedAsset) -> Option<NodeId> {
        if self.scene().is_none() {
            log::debug!("insert_asset: no scene mounted");
            return None;
        }
        match asset {
            LoadedAsset::Raster(image) => {
                let mut node = SceneNode::image(image);
                self.fit(&mut node);
                self.insert(node, Vec::new())
            }
            LoadedAsset::Vector(doc) => {
                let (mut group, children) = vector_group(&doc)?;
                self.fit(&mut group);
                self.insert(group, children)
            }
        }
    }

    /// Center on the print area and scale uniformly into `fit_ratio` of it.
    fn fit(&self, node: &mut SceneNode) {
        let area = self.print_area();
        let fallback = self.config.fallback_size;
        let scale = area.fit_scale(node.width, node.height, self.config.fit_ratio, fallback);
        let (cx, cy) = area.center();
        node.transform = Transform {
            scale_x: scale,
            scale_y: scale,
            ..Transform::at(cx, cy)
        };
        node.handles = HandleStyle {
            padding: self.config.graphic_padding,
            ..self.config.handles
        };
    }

    fn insert(&mut self, mut node: SceneNode, children: Vec<SceneNode>) -> Option<NodeId> {
        node.caching = false;
        let scene = self.scene_mut()?;
        let id = if children.is_empty() {
            scene.add_node(node)
        } else {
            scene.add_group(node, children)
        };
        scene.set_active_node(Some(id));
        scene.recompute_coordinates(id);
        scene.request_redraw();
        self.reconcile();
        log::debug!("inserted {id}");
        Some(id)
    }
}

/// Build a group node plus its path children from an SVG document.
/// Children are positioned relative to the group center.
fn vector_group(doc: &SvgDocument) -> Option<(SceneNode, Vec<SceneNode>)> {
    let bounds = union_bounds(doc.shapes.iter().filter_map(|s| path_bounds(&s.commands)))?;
    let center = bounds.center();

    let children: Vec<SceneNode> = doc
        .shapes
        .iter()
        .filter(|s| path_bounds(&s.commands).is_some())
        .map(|shape| {
            let data = PathData::new(shape.commands.clone());
            let (ox, oy) = data.offset;
            let mut child = SceneNode::path(data);
            child.transform = Transform::at(ox - center.x as f32, oy - center.y as f32);
            child.fill = shape.fill;
            child.stroke = shape.stroke;
            child.stroke_width = shape.stroke_width;
            child.caching = false;
            child
        })
        .collect();

    let mut group = SceneNode::group(bounds.width() as f32, bounds.height() as f32);
    group.fill = Some(
        children
            .first()
            .and_then(|c| c.fill)
            .unwrap_or(Paint::Solid(Color::BLACK)),
    );
    Some((group, children))
}
