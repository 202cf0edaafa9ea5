//! SVG rendering of scenes.

use std::path::{Path, PathBuf};

use log::{debug, info};
use svg::{Document, Node, node::element as svg_element};

use ligature_core::{
    apply_stroke,
    color::Color,
    geometry::Size,
    marker::Marker,
    route::PathGeometry,
    shape::ShapeGeometry,
    stroke::{LineStyle, StrokeDefinition},
};

use super::{Error, Exporter};
use crate::{
    config::StyleConfig,
    connector::Connector,
    scene::{Handle, Helper, Preview, PreviewElement, Scene, SceneObject, Shape},
};

const HELPER_COLOR: &str = "#cbd5e1";
const SHAPE_STROKE_WIDTH: f32 = 1.5;
const MARKER_STROKE_WIDTH: f32 = 1.0;

/// Builder for [`Svg`] exporters.
#[derive(Debug)]
pub struct SvgBuilder {
    file_name: PathBuf,
    style: StyleConfig,
}

impl SvgBuilder {
    pub fn new(file_name: impl AsRef<Path>) -> Self {
        Self {
            file_name: file_name.as_ref().to_path_buf(),
            style: StyleConfig::default(),
        }
    }

    pub fn with_style(mut self, style: StyleConfig) -> Self {
        self.style = style;
        self
    }

    /// Resolves the configured colors.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Render`] if a configured color cannot be parsed.
    pub fn build(self) -> Result<Svg, Error> {
        let background = self.style.background_color().map_err(Error::Render)?;
        let shape_fill = self.style.shape_fill().map_err(Error::Render)?;
        let shape_stroke = self.style.shape_stroke().map_err(Error::Render)?;
        let helper_color = Color::new(HELPER_COLOR).map_err(Error::Render)?;

        Ok(Svg {
            file_name: self.file_name,
            margin: self.style.margin(),
            background,
            shape_fill,
            shape_stroke: StrokeDefinition::new(shape_stroke, SHAPE_STROKE_WIDTH),
            helper_stroke: {
                let mut stroke = StrokeDefinition::new(helper_color, 1.0);
                stroke.set_style(LineStyle::Dashed);
                stroke
            },
        })
    }
}

/// SVG exporter.
#[derive(Debug)]
pub struct Svg {
    file_name: PathBuf,
    margin: f32,
    background: Option<Color>,
    shape_fill: Color,
    shape_stroke: StrokeDefinition,
    helper_stroke: StrokeDefinition,
}

impl Svg {
    /// Renders every scene object, in scene order, into an SVG document.
    pub fn render_scene(&self, scene: &Scene) -> Document {
        let content_bounds = scene.content_bounds().unwrap_or_default();
        let svg_size = self.calculate_svg_dimensions(content_bounds.to_size());

        let doc = Document::new()
            .set(
                "viewBox",
                format!("0 0 {} {}", svg_size.width(), svg_size.height()),
            )
            .set("width", svg_size.width())
            .set("height", svg_size.height());
        let doc = self.add_background(doc, svg_size);

        let mut main_group = svg_element::Group::new().set(
            "transform",
            format!(
                "translate({}, {})",
                self.margin - content_bounds.min_x(),
                self.margin - content_bounds.min_y()
            ),
        );

        for object in scene.objects() {
            debug!(id:% = object.id(); "Rendering scene object");
            let node: Box<dyn Node> = match object {
                SceneObject::Shape(shape) => Box::new(self.render_shape(shape)),
                SceneObject::Connector(connector) => Box::new(self.render_connector(connector)),
                SceneObject::Helper(helper) => Box::new(self.render_helper(helper)),
                SceneObject::Handle(handle) => Box::new(self.render_handle(handle)),
                SceneObject::Preview(preview) => self.render_preview(preview),
            };
            main_group = main_group.add(node);
        }

        doc.add(main_group)
    }

    fn calculate_svg_dimensions(&self, content_size: Size) -> Size {
        Size::new(
            content_size.width() + self.margin * 2.0,
            content_size.height() + self.margin * 2.0,
        )
    }

    fn add_background(&self, doc: Document, size: Size) -> Document {
        match self.background {
            Some(color) => doc.add(
                svg_element::Rectangle::new()
                    .set("x", 0)
                    .set("y", 0)
                    .set("width", size.width())
                    .set("height", size.height())
                    .set("fill", color.to_string()),
            ),
            None => doc,
        }
    }

    fn render_shape(&self, shape: &Shape) -> svg_element::Rectangle {
        let size = shape.scaled_size();
        let center = shape.center();
        let mut rect = svg_element::Rectangle::new()
            .set("id", shape.id().to_string())
            .set("x", center.x() - size.width() / 2.0)
            .set("y", center.y() - size.height() / 2.0)
            .set("width", size.width())
            .set("height", size.height())
            .set("fill", self.shape_fill.to_string());
        if shape.angle() != 0.0 {
            rect = rect.set(
                "transform",
                format!("rotate({} {} {})", shape.angle(), center.x(), center.y()),
            );
        }
        apply_stroke!(rect, &self.shape_stroke)
    }

    /// A connector is exported as one group holding its path and markers.
    fn render_connector(&self, connector: &Connector) -> svg_element::Group {
        let stroke = connector.stroke();
        let group = svg_element::Group::new()
            .set("id", connector.id().to_string())
            .set("class", "connector")
            .add(render_path(&connector.path(), &stroke));

        connector
            .markers()
            .iter()
            .fold(group, |group, marker| group.add(render_marker(marker)))
    }

    fn render_helper(&self, helper: &Helper) -> svg_element::Rectangle {
        let bounds = helper.bounds();
        let rect = svg_element::Rectangle::new()
            .set("x", bounds.min_x())
            .set("y", bounds.min_y())
            .set("width", bounds.width())
            .set("height", bounds.height())
            .set("fill", "none");
        apply_stroke!(rect, &self.helper_stroke)
    }

    fn render_handle(&self, handle: &Handle) -> svg_element::Circle {
        let stroke = StrokeDefinition::new(handle.color(), 1.0);
        let circle = svg_element::Circle::new()
            .set("cx", handle.center().x())
            .set("cy", handle.center().y())
            .set("r", handle.radius())
            .set("fill", "white");
        apply_stroke!(circle, &stroke)
    }

    fn render_preview(&self, preview: &Preview) -> Box<dyn Node> {
        match preview.element() {
            PreviewElement::Path(path) => {
                let mut stroke = StrokeDefinition::new(preview.color(), preview.width());
                stroke.set_style(LineStyle::Dashed);
                Box::new(render_path(path, &stroke).set("opacity", 0.8))
            }
            PreviewElement::Marker(marker) => Box::new(render_marker(marker)),
        }
    }
}

impl Exporter for Svg {
    fn export_scene(&mut self, scene: &Scene) -> Result<(), Error> {
        let doc = self.render_scene(scene);
        svg::save(&self.file_name, &doc).map_err(Error::Io)?;
        info!(path:? = self.file_name, objects = scene.len(); "SVG exported");
        Ok(())
    }
}

fn render_path(path: &PathGeometry, stroke: &StrokeDefinition) -> svg_element::Path {
    let element = svg_element::Path::new()
        .set("d", path.to_svg_data())
        .set("fill", "none");
    apply_stroke!(element, stroke)
}

fn render_marker(marker: &Marker) -> svg_element::Polygon {
    let stroke = StrokeDefinition::new(marker.stroke(), MARKER_STROKE_WIDTH);
    let polygon = svg_element::Polygon::new()
        .set("points", marker.svg_points())
        .set(
            "fill",
            marker
                .fill()
                .map_or_else(|| "none".to_string(), |fill| fill.to_string()),
        );
    apply_stroke!(polygon, &stroke)
}

#[cfg(test)]
mod tests {
    use ligature_core::{geometry::Point, identifier::Id, marker::MarkerKind};

    use super::*;
    use crate::{
        config::DrawToolConfig,
        connector::{ConnectorOptions, ConnectorStyle, create_connector},
        tool::OrthogonalDrawTool,
    };

    fn exporter() -> Svg {
        SvgBuilder::new("unused.svg").build().unwrap()
    }

    #[test]
    fn test_empty_scene_is_margin_only() {
        let doc = exporter().render_scene(&Scene::new()).to_string();
        assert!(doc.contains(r#"viewBox="0 0 100 100""#));
    }

    #[test]
    fn test_connector_is_one_group() {
        let mut scene = Scene::new();
        scene
            .add(SceneObject::Shape(Shape::new(Id::new("svg-a"), 0.0, 0.0, 40.0, 20.0)))
            .unwrap();
        let style = ConnectorStyle {
            start_marker: MarkerKind::OpenArrow,
            line_style: LineStyle::Dotted,
            ..ConnectorStyle::default()
        };
        create_connector(
            &mut scene,
            ConnectorOptions::new(Point::new(40.0, 10.0), Point::new(140.0, 10.0))
                .with_id(Id::new("svg-line"))
                .with_style(style),
        )
        .unwrap();

        let doc = exporter().render_scene(&scene).to_string();
        assert!(doc.contains(r#"id="svg-a""#));
        assert!(doc.contains(r#"id="svg-line""#));
        assert!(doc.contains(r#"class="connector""#));
        assert!(doc.contains(r#"stroke-dasharray="2,3""#));
        assert_eq!(doc.matches("<polygon").count(), 2);
        // The path and the open arrow are unfilled, the end arrow is filled.
        assert_eq!(doc.matches(r#"fill="none""#).count(), 2);
    }

    #[test]
    fn test_draw_tool_artifacts_are_rendered() {
        let mut scene = Scene::new();
        let mut tool = OrthogonalDrawTool::new(DrawToolConfig::default());
        tool.start(&mut scene);
        tool.add_point(&mut scene, 0.0, 0.0);
        tool.update_preview(&mut scene, 60.0, 40.0);

        let doc = exporter().render_scene(&scene).to_string();
        assert_eq!(doc.matches("<circle").count(), 1);
        assert!(doc.contains(r#"opacity="0.8""#));
    }

    #[test]
    fn test_background_and_rotation() {
        let mut scene = Scene::new();
        scene
            .add(SceneObject::Shape(
                Shape::new(Id::new("svg-rot"), 0.0, 0.0, 20.0, 20.0).with_angle(45.0),
            ))
            .unwrap();
        let style: StyleConfig = toml::from_str(r#"background_color = "white""#).unwrap();
        let svg = SvgBuilder::new("unused.svg").with_style(style).build().unwrap();

        let doc = svg.render_scene(&scene).to_string();
        assert!(doc.contains("rotate(45 10 10)"));
        // Background plus the shape.
        assert_eq!(doc.matches("<rect").count(), 2);
    }

    #[test]
    fn test_invalid_style_color() {
        let style: StyleConfig = toml::from_str(r#"shape_fill = "nope""#).unwrap();
        let err = SvgBuilder::new("unused.svg").with_style(style).build().unwrap_err();
        assert!(matches!(err, Error::Render(_)));
    }

    #[test]
    fn test_export_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.svg");
        let mut scene = Scene::new();
        create_connector(
            &mut scene,
            ConnectorOptions::new(Point::new(0.0, 0.0), Point::new(10.0, 10.0)),
        )
        .unwrap();

        let mut svg = SvgBuilder::new(&path).build().unwrap();
        svg.export_scene(&scene).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("<svg"));
        assert!(written.contains("<path"));
    }
}
