//! A minimal scene container for shapes, connectors and tool artifacts.
//!
//! The scene keeps its objects in insertion order. Connector sync mutates
//! connectors in place, so a rerouted connector keeps both its id and its
//! slot in the order.

use indexmap::IndexMap;
use log::{debug, trace};

use ligature_core::{
    color::Color,
    geometry::{Bounds, Point, Size, Transform},
    identifier::Id,
    marker::Marker,
    route::{Obstacle, PathGeometry},
    shape::ShapeGeometry,
};

use crate::{connector::Connector, error::LigatureError};

/// A rectangular connectable shape.
///
/// `left`/`top` are the unrotated top-left corner, `width`/`height` the
/// unscaled size. Rotation happens around the center of the scaled box.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    id: Id,
    left: f32,
    top: f32,
    width: f32,
    height: f32,
    scale_x: f32,
    scale_y: f32,
    angle: f32,
}

impl Shape {
    pub fn new(id: Id, left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            id,
            left,
            top,
            width,
            height,
            scale_x: 1.0,
            scale_y: 1.0,
            angle: 0.0,
        }
    }

    pub fn with_scale(mut self, scale_x: f32, scale_y: f32) -> Self {
        self.scale_x = scale_x;
        self.scale_y = scale_y;
        self
    }

    pub fn with_angle(mut self, angle: f32) -> Self {
        self.angle = angle;
        self
    }

    /// Moves the shape by `offset`.
    pub fn translate(&mut self, offset: Point) {
        self.left += offset.x();
        self.top += offset.y();
    }

    pub fn set_position(&mut self, left: f32, top: f32) {
        self.left = left;
        self.top = top;
    }

    pub fn set_size(&mut self, size: Size) {
        self.width = size.width();
        self.height = size.height();
    }

    pub fn set_scale(&mut self, scale_x: f32, scale_y: f32) {
        self.scale_x = scale_x;
        self.scale_y = scale_y;
    }

    pub fn set_angle(&mut self, angle: f32) {
        self.angle = angle;
    }
}

impl ShapeGeometry for Shape {
    fn id(&self) -> Id {
        self.id
    }

    fn left(&self) -> f32 {
        self.left
    }

    fn top(&self) -> f32 {
        self.top
    }

    fn width(&self) -> f32 {
        self.width
    }

    fn height(&self) -> f32 {
        self.height
    }

    fn scale_x(&self) -> f32 {
        self.scale_x
    }

    fn scale_y(&self) -> f32 {
        self.scale_y
    }

    fn angle(&self) -> f32 {
        self.angle
    }
}

/// Kinds of non-content helpers. Helpers are never obstacles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HelperKind {
    Grid,
    Ruler,
    Guide,
}

/// A visual aid such as a grid or a guide line.
#[derive(Debug, Clone, PartialEq)]
pub struct Helper {
    id: Id,
    kind: HelperKind,
    bounds: Bounds,
}

impl Helper {
    pub fn new(id: Id, kind: HelperKind, bounds: Bounds) -> Self {
        Self { id, kind, bounds }
    }

    pub fn kind(&self) -> HelperKind {
        self.kind
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }
}

/// A small circle marking a point placed by the draw tool.
#[derive(Debug, Clone, PartialEq)]
pub struct Handle {
    id: Id,
    center: Point,
    radius: f32,
    color: Color,
}

impl Handle {
    pub fn new(id: Id, center: Point, radius: f32, color: Color) -> Self {
        Self {
            id,
            center,
            radius,
            color,
        }
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn color(&self) -> Color {
        self.color
    }
}

/// Content of a live preview object.
#[derive(Debug, Clone, PartialEq)]
pub enum PreviewElement {
    Path(PathGeometry),
    Marker(Marker),
}

/// A temporary object drawn by the draw tool while a line is in progress.
#[derive(Debug, Clone, PartialEq)]
pub struct Preview {
    id: Id,
    element: PreviewElement,
    color: Color,
    width: f32,
}

impl Preview {
    pub fn new(id: Id, element: PreviewElement, color: Color, width: f32) -> Self {
        Self {
            id,
            element,
            color,
            width,
        }
    }

    pub fn element(&self) -> &PreviewElement {
        &self.element
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn width(&self) -> f32 {
        self.width
    }
}

/// An object stored in a [`Scene`].
#[derive(Debug, Clone, PartialEq)]
pub enum SceneObject {
    Shape(Shape),
    Connector(Connector),
    Helper(Helper),
    Handle(Handle),
    Preview(Preview),
}

impl SceneObject {
    pub fn id(&self) -> Id {
        match self {
            Self::Shape(shape) => shape.id,
            Self::Connector(connector) => connector.id(),
            Self::Helper(helper) => helper.id,
            Self::Handle(handle) => handle.id,
            Self::Preview(preview) => preview.id,
        }
    }

    /// Scene-space bounds of the object, `None` for empty geometry.
    pub fn bounds(&self) -> Option<Bounds> {
        match self {
            Self::Shape(shape) => Some(shape.bounding_rect()),
            Self::Connector(connector) => connector.bounds(),
            Self::Helper(helper) => Some(helper.bounds),
            Self::Handle(handle) => Some(
                handle
                    .center
                    .to_bounds(Size::new(handle.radius * 2.0, handle.radius * 2.0)),
            ),
            Self::Preview(preview) => match &preview.element {
                PreviewElement::Path(path) => path.bounds(),
                PreviewElement::Marker(marker) => Some(marker.bounds()),
            },
        }
    }

    pub fn as_shape(&self) -> Option<&Shape> {
        match self {
            Self::Shape(shape) => Some(shape),
            _ => None,
        }
    }

    pub fn as_connector(&self) -> Option<&Connector> {
        match self {
            Self::Connector(connector) => Some(connector),
            _ => None,
        }
    }
}

/// Mouse cursor requested by the active tool.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Cursor {
    #[default]
    Default,
    Crosshair,
}

/// Ordered collection of scene objects plus the interaction flags tools toggle.
#[derive(Debug, Clone)]
pub struct Scene {
    objects: IndexMap<Id, SceneObject>,
    next_generated: usize,
    selection_enabled: bool,
    cursor: Cursor,
    render_requests: usize,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        Self {
            objects: IndexMap::new(),
            next_generated: 0,
            selection_enabled: true,
            cursor: Cursor::Default,
            render_requests: 0,
        }
    }

    /// Adds an object at the end of the scene order.
    ///
    /// # Errors
    ///
    /// Returns [`LigatureError::DuplicateId`] if the object's id is already used.
    pub fn add(&mut self, object: SceneObject) -> Result<Id, LigatureError> {
        let id = object.id();
        if self.objects.contains_key(&id) {
            return Err(LigatureError::DuplicateId(id));
        }
        trace!(id:%; "Adding scene object");
        self.objects.insert(id, object);
        Ok(id)
    }

    /// Removes an object, keeping the order of the remaining ones.
    pub fn remove(&mut self, id: Id) -> Option<SceneObject> {
        self.objects.shift_remove(&id)
    }

    pub fn get(&self, id: Id) -> Option<&SceneObject> {
        self.objects.get(&id)
    }

    pub fn get_mut(&mut self, id: Id) -> Option<&mut SceneObject> {
        self.objects.get_mut(&id)
    }

    pub fn contains(&self, id: Id) -> bool {
        self.objects.contains_key(&id)
    }

    /// All objects in scene order.
    pub fn objects(&self) -> impl Iterator<Item = &SceneObject> {
        self.objects.values()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Position of an object in scene order.
    pub fn index_of(&self, id: Id) -> Option<usize> {
        self.objects.get_index_of(&id)
    }

    pub fn shape(&self, id: Id) -> Option<&Shape> {
        self.get(id).and_then(SceneObject::as_shape)
    }

    pub fn shape_mut(&mut self, id: Id) -> Option<&mut Shape> {
        match self.get_mut(id) {
            Some(SceneObject::Shape(shape)) => Some(shape),
            _ => None,
        }
    }

    pub fn connector(&self, id: Id) -> Option<&Connector> {
        self.get(id).and_then(SceneObject::as_connector)
    }

    pub fn connector_mut(&mut self, id: Id) -> Option<&mut Connector> {
        match self.get_mut(id) {
            Some(SceneObject::Connector(connector)) => Some(connector),
            _ => None,
        }
    }

    /// All connectors in scene order.
    pub fn connectors(&self) -> impl Iterator<Item = &Connector> {
        self.objects().filter_map(SceneObject::as_connector)
    }

    /// Shapes that orthogonal routing should avoid.
    ///
    /// Connectors, helpers and draw tool artifacts are never obstacles.
    pub fn obstacles(&self) -> impl Iterator<Item = Obstacle> + '_ {
        self.objects()
            .filter_map(SceneObject::as_shape)
            .map(|shape| Obstacle::new(shape.id, shape.bounding_rect()))
    }

    /// Replaces the transform of a marker-decorated connector.
    ///
    /// Markers are re-derived from the new transform the next time they are
    /// read. Returns false if `id` is not such a connector.
    pub fn set_transform(&mut self, id: Id, transform: Transform) -> bool {
        let applied = self
            .connector_mut(id)
            .is_some_and(|connector| connector.set_transform(transform));
        if applied {
            self.render_all();
        } else {
            debug!(id:%; "Ignoring transform of an object without a group transform");
        }
        applied
    }

    /// Returns an id of the form `{prefix}-{n}` that is not used in the scene.
    pub fn generate_id(&mut self, prefix: &str) -> Id {
        loop {
            let id = Id::generated(prefix, self.next_generated);
            self.next_generated += 1;
            if !self.contains(id) {
                return id;
            }
        }
    }

    /// Adds an object whose id came from [`generate_id`](Self::generate_id).
    pub(crate) fn add_generated(&mut self, object: SceneObject) -> Id {
        let id = object.id();
        self.objects.insert(id, object);
        id
    }

    /// Requests a re-render of the scene.
    pub fn render_all(&mut self) {
        self.render_requests += 1;
    }

    /// Number of re-render requests received so far.
    pub fn render_requests(&self) -> usize {
        self.render_requests
    }

    pub fn selection_enabled(&self) -> bool {
        self.selection_enabled
    }

    pub fn set_selection_enabled(&mut self, enabled: bool) {
        self.selection_enabled = enabled;
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn set_cursor(&mut self, cursor: Cursor) {
        self.cursor = cursor;
    }

    /// Bounds enclosing every object, `None` for an empty scene.
    pub fn content_bounds(&self) -> Option<Bounds> {
        self.objects()
            .filter_map(SceneObject::bounds)
            .reduce(|acc, bounds| acc.merge(&bounds))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(id: &str, left: f32, top: f32) -> SceneObject {
        SceneObject::Shape(Shape::new(Id::new(id), left, top, 100.0, 50.0))
    }

    #[test]
    fn test_add_and_duplicate() {
        let mut scene = Scene::new();
        let id = scene.add(rect("scene-a", 0.0, 0.0)).unwrap();
        assert_eq!(id, "scene-a");

        let err = scene.add(rect("scene-a", 10.0, 10.0)).unwrap_err();
        assert!(matches!(err, LigatureError::DuplicateId(dup) if dup == id));
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut scene = Scene::new();
        for name in ["order-a", "order-b", "order-c"] {
            scene.add(rect(name, 0.0, 0.0)).unwrap();
        }
        assert!(scene.remove(Id::new("order-b")).is_some());
        let ids: Vec<Id> = scene.objects().map(SceneObject::id).collect();
        assert_eq!(ids, vec![Id::new("order-a"), Id::new("order-c")]);
        assert_eq!(scene.index_of(Id::new("order-c")), Some(1));
    }

    #[test]
    fn test_obstacles_skip_helpers() {
        let mut scene = Scene::new();
        scene.add(rect("obstacle-shape", 0.0, 0.0)).unwrap();
        scene
            .add(SceneObject::Helper(Helper::new(
                Id::new("obstacle-grid"),
                HelperKind::Grid,
                Bounds::from_corners(Point::new(0.0, 0.0), Point::new(1000.0, 1000.0)),
            )))
            .unwrap();

        let obstacles: Vec<Obstacle> = scene.obstacles().collect();
        assert_eq!(obstacles.len(), 1);
        assert_eq!(obstacles[0].id, "obstacle-shape");
        assert_eq!(obstacles[0].bounds.width(), 100.0);
    }

    #[test]
    fn test_generate_id_skips_used() {
        let mut scene = Scene::new();
        scene.add(rect("gen-0", 0.0, 0.0)).unwrap();
        assert_eq!(scene.generate_id("gen"), "gen-1");
        assert_eq!(scene.generate_id("gen"), "gen-2");
    }

    #[test]
    fn test_shape_mutation() {
        let mut scene = Scene::new();
        scene.add(rect("mut-shape", 0.0, 0.0)).unwrap();
        scene
            .shape_mut(Id::new("mut-shape"))
            .unwrap()
            .translate(Point::new(5.0, 7.0));
        let shape = scene.shape(Id::new("mut-shape")).unwrap();
        assert_eq!(shape.left(), 5.0);
        assert_eq!(shape.top(), 7.0);
        assert!(scene.connector(Id::new("mut-shape")).is_none());
    }

    #[test]
    fn test_set_transform_on_shape_is_ignored() {
        let mut scene = Scene::new();
        scene.add(rect("transform-shape", 0.0, 0.0)).unwrap();
        assert!(!scene.set_transform(Id::new("transform-shape"), Transform::identity()));
        assert_eq!(scene.render_requests(), 0);
    }

    #[test]
    fn test_content_bounds() {
        let mut scene = Scene::new();
        assert!(scene.content_bounds().is_none());
        scene.add(rect("bounds-a", 0.0, 0.0)).unwrap();
        scene.add(rect("bounds-b", 200.0, 100.0)).unwrap();
        let bounds = scene.content_bounds().unwrap();
        assert_eq!(bounds.max_x(), 300.0);
        assert_eq!(bounds.max_y(), 150.0);
    }
}
