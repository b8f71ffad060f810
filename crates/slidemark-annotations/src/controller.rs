//! Shape registry for one annotations canvas.
//!
//! Public drawing calls take image-space coordinates. The registry
//! subtracts the canvas offset (half the image size) before building a
//! shape and adds it back when serializing.

use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Arc;

use slidemark_core::{
    AnnotationError, AnnotationEvent, CanvasNotification, EventBus, Point, Result, ShapeStyle,
    Size, StyleOverrides,
};

use crate::adapter::Matrix;
use crate::engine::{Scene, Segment};
use crate::model::{
    Circle, Ellipse, Line, Rectangle, Shape, ShapeJson, ShapeKind, SHAPE_TYPES,
};

/// The deep-zoom viewer hosting the canvas.
pub trait ImageViewer {
    fn image_dimensions(&self) -> Size;
    fn canvas_size(&self) -> Size;
}

/// Viewer with fixed dimensions, for headless use and tests.
#[derive(Debug, Clone, Copy)]
pub struct StaticViewer {
    pub image: Size,
    pub canvas: Size,
}

impl StaticViewer {
    pub fn new(image: Size, canvas: Size) -> Self {
        Self { image, canvas }
    }
}

impl ImageViewer for StaticViewer {
    fn image_dimensions(&self) -> Size {
        self.image
    }

    fn canvas_size(&self) -> Size {
        self.canvas
    }
}

/// Observer of every deletion going through the registry.
///
/// A returned notification is published on the canvas.
pub trait DeletionWatcher {
    fn shape_deleted(&self, shape_id: &str) -> Option<AnnotationEvent>;
}

pub struct AnnotationsController {
    canvas_id: String,
    shapes: HashMap<String, Shape>,
    x_offset: f64,
    y_offset: f64,
    default_style: ShapeStyle,
    scene: Option<Scene>,
    shape_events: bool,
    bus: Arc<EventBus>,
    deletion_watchers: Vec<Rc<dyn DeletionWatcher>>,
}

impl AnnotationsController {
    pub fn new(canvas_id: impl Into<String>, default_style: ShapeStyle) -> Self {
        Self {
            canvas_id: canvas_id.into(),
            shapes: HashMap::new(),
            x_offset: 0.0,
            y_offset: 0.0,
            default_style,
            scene: None,
            shape_events: true,
            bus: Arc::new(EventBus::new()),
            deletion_watchers: Vec::new(),
        }
    }

    pub fn with_defaults(canvas_id: impl Into<String>) -> Self {
        tracing::info!("No configuration provided, using default values for shapes config");
        Self::new(canvas_id, ShapeStyle::default())
    }

    pub fn canvas_id(&self) -> &str {
        &self.canvas_id
    }

    pub fn x_offset(&self) -> f64 {
        self.x_offset
    }

    pub fn y_offset(&self) -> f64 {
        self.y_offset
    }

    pub fn default_style(&self) -> &ShapeStyle {
        &self.default_style
    }

    /// Fixes the offset and the backing-surface size. A second call is a no-op.
    pub fn build_annotations_canvas(&mut self, viewer: &dyn ImageViewer) -> bool {
        if self.scene.is_some() {
            tracing::warn!("Canvas {} already initialized", self.canvas_id);
            return false;
        }
        let image = viewer.image_dimensions();
        self.x_offset = image.width / 2.0;
        self.y_offset = image.height / 2.0;
        self.scene = Some(Scene::new(viewer.canvas_size()));
        tracing::info!(
            "Canvas {} built, offset ({}, {})",
            self.canvas_id,
            self.x_offset,
            self.y_offset
        );
        true
    }

    /// Viewport resize: drops every shape and recomputes the offset.
    pub fn rebuild_canvas(&mut self, viewer: &dyn ImageViewer) {
        self.clear();
        self.scene = None;
        self.build_annotations_canvas(viewer);
    }

    pub fn is_canvas_built(&self) -> bool {
        self.scene.is_some()
    }

    pub fn scene(&self) -> Option<&Scene> {
        self.scene.as_ref()
    }

    pub fn refresh_view(&mut self) {
        match self.scene.as_mut() {
            Some(scene) => scene.redraw(),
            None => tracing::debug!("Canvas {} not built, nothing to refresh", self.canvas_id),
        }
    }

    pub fn redraw_count(&self) -> u64 {
        self.scene.as_ref().map_or(0, |s| s.redraw_count())
    }

    pub fn enable_mouse_events(&mut self) {
        if let Some(scene) = self.scene.as_mut() {
            scene.set_pointer_events(true);
        }
    }

    pub fn disable_mouse_events(&mut self) {
        if let Some(scene) = self.scene.as_mut() {
            scene.set_pointer_events(false);
        }
    }

    pub fn mouse_events_enabled(&self) -> bool {
        self.scene
            .as_ref()
            .is_some_and(|s| s.pointer_events_enabled())
    }

    // ---- coordinates ----

    pub fn to_canvas_point(&self, image_point: Point) -> Point {
        image_point.offset(-self.x_offset, -self.y_offset)
    }

    pub fn to_image_point(&self, canvas_point: Point) -> Point {
        canvas_point.offset(self.x_offset, self.y_offset)
    }

    // ---- notifications ----

    pub fn events(&self) -> Arc<EventBus> {
        Arc::clone(&self.bus)
    }

    pub fn notify(&self, target: &str, event: AnnotationEvent) {
        self.bus.publish(CanvasNotification::new(target, event));
    }

    /// Publishes on the canvas element.
    pub fn notify_canvas(&self, event: AnnotationEvent) {
        self.bus
            .publish(CanvasNotification::new(self.canvas_id.clone(), event));
    }

    pub fn watch_deletions(&mut self, watcher: Rc<dyn DeletionWatcher>) {
        self.deletion_watchers.push(watcher);
    }

    /// Returns false if `watcher` was not registered.
    pub fn unwatch_deletions(&mut self, watcher: &Rc<dyn DeletionWatcher>) -> bool {
        let before = self.deletion_watchers.len();
        self.deletion_watchers
            .retain(|w| !std::ptr::addr_eq(Rc::as_ptr(w), Rc::as_ptr(watcher)));
        self.deletion_watchers.len() != before
    }

    pub fn deletion_watchers_count(&self) -> usize {
        self.deletion_watchers.len()
    }

    // ---- cache ----

    pub fn add_to_cache(&mut self, shape: Shape) -> bool {
        if self.shapes.contains_key(shape.id()) {
            tracing::error!("A shape with ID {} already exists", shape.id());
            return false;
        }
        self.shapes.insert(shape.id().to_string(), shape);
        true
    }

    pub fn get_shape(&self, shape_id: &str) -> Option<&Shape> {
        self.shapes.get(shape_id)
    }

    pub fn get_shape_mut(&mut self, shape_id: &str) -> Option<&mut Shape> {
        self.shapes.get_mut(shape_id)
    }

    pub fn contains_shape(&self, shape_id: &str) -> bool {
        self.shapes.contains_key(shape_id)
    }

    /// Registered IDs, sorted.
    pub fn shape_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.shapes.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn shapes_count(&self) -> usize {
        self.shapes.len()
    }

    /// `prefix_n` for the smallest `n >= 1` not in the cache.
    pub fn get_first_available_label(&self, prefix: &str) -> String {
        let mut index = 1;
        loop {
            let label = format!("{}_{}", prefix, index);
            if !self.shapes.contains_key(&label) {
                return label;
            }
            index += 1;
        }
    }

    // ---- drawing ----

    fn draw_shape(
        &mut self,
        shape: Shape,
        style: &StyleOverrides,
        hidden: bool,
        auto_refresh: bool,
    ) -> Result<()> {
        if self.shapes.contains_key(shape.id()) {
            tracing::error!("A shape with ID {} already exists", shape.id());
            return Err(AnnotationError::DuplicateId {
                shape_id: shape.id().to_string(),
            });
        }
        let mut shape = shape;
        shape.materialize(self.shape_events);
        if let Err(e) = shape.configure(&self.default_style.merged(style)) {
            tracing::error!("Unable to apply style to shape {}: {}", shape.id(), e);
            if let Err(e) = shape.configure(&self.default_style) {
                tracing::error!("Unable to apply default style to {}: {}", shape.id(), e);
            }
        }
        if hidden {
            shape.hide();
        }
        self.add_to_cache(shape);
        if auto_refresh {
            self.refresh_view();
        }
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    pub fn draw_rectangle(
        &mut self,
        shape_id: &str,
        origin_x: f64,
        origin_y: f64,
        width: f64,
        height: f64,
        transform: Option<Matrix>,
        style: &StyleOverrides,
        auto_refresh: bool,
    ) -> Result<()> {
        let origin = self.to_canvas_point(Point::new(origin_x, origin_y));
        let shape = Shape::new(
            shape_id,
            ShapeKind::Rectangle(Rectangle::new(origin, width, height)),
        )
        .with_transform(transform);
        self.draw_shape(shape, style, false, auto_refresh)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn draw_ellipse(
        &mut self,
        shape_id: &str,
        center_x: f64,
        center_y: f64,
        radius_x: f64,
        radius_y: f64,
        transform: Option<Matrix>,
        style: &StyleOverrides,
        auto_refresh: bool,
    ) -> Result<()> {
        let center = self.to_canvas_point(Point::new(center_x, center_y));
        let shape = Shape::new(
            shape_id,
            ShapeKind::Ellipse(Ellipse::new(center, radius_x, radius_y)),
        )
        .with_transform(transform);
        self.draw_shape(shape, style, false, auto_refresh)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn draw_circle(
        &mut self,
        shape_id: &str,
        center_x: f64,
        center_y: f64,
        radius: f64,
        transform: Option<Matrix>,
        style: &StyleOverrides,
        auto_refresh: bool,
    ) -> Result<()> {
        let center = self.to_canvas_point(Point::new(center_x, center_y));
        let shape = Shape::new(shape_id, ShapeKind::Circle(Circle::new(center, radius)))
            .with_transform(transform);
        self.draw_shape(shape, style, false, auto_refresh)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn draw_line(
        &mut self,
        shape_id: &str,
        from_x: f64,
        from_y: f64,
        to_x: f64,
        to_y: f64,
        transform: Option<Matrix>,
        style: &StyleOverrides,
        auto_refresh: bool,
    ) -> Result<()> {
        let from = self.to_canvas_point(Point::new(from_x, from_y));
        let to = self.to_canvas_point(Point::new(to_x, to_y));
        let shape =
            Shape::new(shape_id, ShapeKind::Line(Line::new(from, to))).with_transform(transform);
        self.draw_shape(shape, style, false, auto_refresh)
    }

    fn local_segments(&self, segments: &[Segment]) -> Vec<Segment> {
        segments
            .iter()
            .map(|s| Segment {
                point: self.to_canvas_point(s.point),
                handle_in: s.handle_in,
                handle_out: s.handle_out,
            })
            .collect()
    }

    pub fn draw_polygon(
        &mut self,
        shape_id: &str,
        segments: &[Segment],
        transform: Option<Matrix>,
        style: &StyleOverrides,
        auto_refresh: bool,
    ) -> Result<()> {
        let shape = Shape::new(shape_id, ShapeKind::polygon(self.local_segments(segments)))
            .with_transform(transform);
        self.draw_shape(shape, style, false, auto_refresh)
    }

    pub fn draw_polyline(
        &mut self,
        shape_id: &str,
        segments: &[Segment],
        transform: Option<Matrix>,
        style: &StyleOverrides,
        auto_refresh: bool,
    ) -> Result<()> {
        let shape = Shape::new(shape_id, ShapeKind::polyline(self.local_segments(segments)))
            .with_transform(transform);
        self.draw_shape(shape, style, false, auto_refresh)
    }

    /// Inverse of [`Shape::to_json`] under this canvas' offset.
    pub fn draw_shape_from_json(&mut self, json: &ShapeJson, auto_refresh: bool) -> Result<()> {
        let kind = ShapeKind::from_json(&json.geometry, self.x_offset, self.y_offset);
        let shape = Shape::new(json.shape_id.clone(), kind).with_transform(json.transform);
        self.draw_shape(shape, &json.style, json.hidden, auto_refresh)
    }

    /// Like [`Self::draw_shape_from_json`], rejecting unknown `type` values first.
    pub fn draw_shape_from_value(
        &mut self,
        value: &serde_json::Value,
        auto_refresh: bool,
    ) -> Result<()> {
        let shape_type = value
            .get("type")
            .and_then(|t| t.as_str())
            .unwrap_or_default();
        if !SHAPE_TYPES.contains(&shape_type) {
            tracing::error!("Unknown shape type {}", shape_type);
            return Err(AnnotationError::UnknownShapeType {
                shape_type: shape_type.to_string(),
            });
        }
        let json: ShapeJson = serde_json::from_value(value.clone()).map_err(|e| {
            tracing::error!("Malformed {} JSON: {}", shape_type, e);
            AnnotationError::from(e)
        })?;
        self.draw_shape_from_json(&json, auto_refresh)
    }

    /// Draws a batch; failing entries are logged and skipped.
    ///
    /// Returns the IDs that were drawn. Repaints once at the end.
    pub fn draw_shapes_from_json(
        &mut self,
        values: &[serde_json::Value],
        auto_refresh: bool,
    ) -> Vec<String> {
        let mut drawn = Vec::new();
        for value in values {
            if self.draw_shape_from_value(value, false).is_ok() {
                if let Some(id) = value.get("shape_id").and_then(|v| v.as_str()) {
                    drawn.push(id.to_string());
                }
            }
        }
        if auto_refresh {
            self.refresh_view();
        }
        drawn
    }

    // ---- serialization ----

    pub fn get_shape_json(&self, shape_id: &str) -> Option<ShapeJson> {
        match self.shapes.get(shape_id) {
            Some(shape) => Some(shape.to_json(self.x_offset, self.y_offset)),
            None => {
                tracing::warn!("There is no shape with ID {}", shape_id);
                None
            }
        }
    }

    /// JSON of the given shapes, or of every shape (sorted by ID).
    pub fn get_shapes_json(&self, shape_ids: Option<&[String]>) -> Vec<ShapeJson> {
        self.resolve_ids(shape_ids)
            .iter()
            .filter_map(|id| self.get_shape_json(id))
            .collect()
    }

    /// Center of a shape, in image space.
    pub fn get_shape_center(&self, shape_id: &str) -> Option<Point> {
        let shape = self.lookup(shape_id)?;
        shape.center().map(|c| self.to_image_point(c))
    }

    // ---- selection, visibility, deletion ----

    fn lookup(&self, shape_id: &str) -> Option<&Shape> {
        let shape = self.shapes.get(shape_id);
        if shape.is_none() {
            tracing::warn!("There is no shape with ID {}", shape_id);
        }
        shape
    }

    fn lookup_mut(&mut self, shape_id: &str) -> Option<&mut Shape> {
        let shape = self.shapes.get_mut(shape_id);
        if shape.is_none() {
            tracing::warn!("There is no shape with ID {}", shape_id);
        }
        shape
    }

    fn resolve_ids(&self, shape_ids: Option<&[String]>) -> Vec<String> {
        match shape_ids {
            Some(ids) => ids.to_vec(),
            None => self.shape_ids(),
        }
    }

    fn for_each_shape(&mut self, shape_ids: Option<&[String]>, op: impl Fn(&mut Shape)) {
        for id in self.resolve_ids(shape_ids) {
            if let Some(shape) = self.lookup_mut(&id) {
                op(shape);
            }
        }
        self.refresh_view();
    }

    pub fn select_shape(&mut self, shape_id: &str, auto_refresh: bool) {
        if let Some(shape) = self.lookup_mut(shape_id) {
            shape.select();
            if auto_refresh {
                self.refresh_view();
            }
        }
    }

    pub fn deselect_shape(&mut self, shape_id: &str, auto_refresh: bool) {
        if let Some(shape) = self.lookup_mut(shape_id) {
            shape.deselect();
            if auto_refresh {
                self.refresh_view();
            }
        }
    }

    pub fn show_shape(&mut self, shape_id: &str, auto_refresh: bool) {
        if let Some(shape) = self.lookup_mut(shape_id) {
            shape.show();
            if auto_refresh {
                self.refresh_view();
            }
        }
    }

    pub fn hide_shape(&mut self, shape_id: &str, auto_refresh: bool) {
        if let Some(shape) = self.lookup_mut(shape_id) {
            shape.hide();
            if auto_refresh {
                self.refresh_view();
            }
        }
    }

    pub fn select_shapes(&mut self, shape_ids: Option<&[String]>) {
        self.for_each_shape(shape_ids, |s| s.select());
    }

    pub fn deselect_shapes(&mut self, shape_ids: Option<&[String]>) {
        self.for_each_shape(shape_ids, |s| s.deselect());
    }

    pub fn show_shapes(&mut self, shape_ids: Option<&[String]>) {
        self.for_each_shape(shape_ids, |s| s.show());
    }

    pub fn hide_shapes(&mut self, shape_ids: Option<&[String]>) {
        self.for_each_shape(shape_ids, |s| s.hide());
    }

    /// IDs of the currently selected shapes, sorted.
    pub fn selected_shapes(&self) -> Vec<String> {
        self.shape_ids()
            .into_iter()
            .filter(|id| {
                self.shapes
                    .get(id)
                    .and_then(|s| s.is_selected())
                    .unwrap_or(false)
            })
            .collect()
    }

    /// Returns true if an entry existed and was removed.
    pub fn delete_shape(&mut self, shape_id: &str, auto_refresh: bool) -> bool {
        if self.shapes.remove(shape_id).is_none() {
            tracing::warn!("There is no shape with ID {}", shape_id);
            return false;
        }
        let events: Vec<AnnotationEvent> = self
            .deletion_watchers
            .iter()
            .filter_map(|w| w.shape_deleted(shape_id))
            .collect();
        for event in events {
            self.notify_canvas(event);
        }
        if auto_refresh {
            self.refresh_view();
        }
        true
    }

    pub fn delete_shapes(&mut self, shape_ids: Option<&[String]>) {
        for id in self.resolve_ids(shape_ids) {
            self.delete_shape(&id, false);
        }
        self.refresh_view();
    }

    /// Canvas teardown: deletes every shape.
    pub fn clear(&mut self) {
        self.delete_shapes(None);
    }

    // ---- per-shape interaction ----

    pub fn disable_events_on_shapes(&mut self) {
        self.shape_events = false;
        self.shapes.values_mut().for_each(|s| s.disable_events());
    }

    pub fn enable_events_on_shapes(&mut self) {
        self.shape_events = true;
        self.shapes.values_mut().for_each(|s| s.enable_events());
    }

    /// Pointer drag over a shape. Returns true if the shape moved.
    pub fn drag_shape(&mut self, shape_id: &str, dx: f64, dy: f64) -> bool {
        let moved = self
            .lookup_mut(shape_id)
            .is_some_and(|s| s.drag(dx, dy));
        if moved {
            self.refresh_view();
        }
        moved
    }

    /// Pointer release over a shape: persists the dragged position.
    pub fn release_shape(&mut self, shape_id: &str) {
        if let Some(shape) = self.lookup_mut(shape_id) {
            shape.release();
        }
    }
}

impl std::fmt::Debug for AnnotationsController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnnotationsController")
            .field("canvas_id", &self.canvas_id)
            .field("shapes", &self.shapes.len())
            .field("x_offset", &self.x_offset)
            .field("y_offset", &self.y_offset)
            .finish()
    }
}
