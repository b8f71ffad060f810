//! Annotation shapes.
//!
//! A [`Shape`] pairs logical attributes ([`ShapeKind`]) with an optional
//! rendered [`Primitive`]. Geometric queries need the primitive and report
//! `None`/`false` (with a log line) until [`Shape::materialize`] is called.

use serde::{Deserialize, Serialize};
use slidemark_core::{AnnotationError, BoundingBox, Point, Result, ShapeStyle, Size};

use crate::adapter::{color_to_hex, hex_to_color, Matrix};
use crate::engine::{Geometry, Primitive, Segment};

mod circle;
mod ellipse;
pub mod json;
mod line;
mod path;
mod rectangle;

pub use circle::Circle;
pub use ellipse::Ellipse;
pub use json::{GeometryJson, ShapeJson, SHAPE_TYPES};
pub use line::Line;
pub use path::AnnotationPath;
pub use rectangle::Rectangle;

/// Dash pattern used while previewing a path.
pub const PREVIEW_DASH: [f64; 2] = [100.0, 50.0];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeType {
    Rectangle,
    Ellipse,
    Circle,
    Line,
    Polygon,
    Polyline,
}

/// Variant-specific behaviour behind [`ShapeKind`].
pub trait ShapeGeometry {
    fn shape_type(&self) -> ShapeType;
    /// Geometry of the rendered primitive, in local space.
    fn to_geometry(&self) -> Geometry;
    /// Drag-release hook: copy the primitive's geometry back.
    fn update_from(&mut self, geometry: &Geometry);
    /// Points tested by [`Shape::contains_shape`].
    fn sample_points(&self) -> Vec<Point>;
    fn to_json_geometry(&self, x_offset: f64, y_offset: f64) -> GeometryJson;

    fn has_area(&self) -> bool {
        true
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ShapeKind {
    Rectangle(Rectangle),
    Ellipse(Ellipse),
    Circle(Circle),
    Line(Line),
    Polygon(AnnotationPath),
    Polyline(AnnotationPath),
}

impl ShapeKind {
    fn inner(&self) -> &dyn ShapeGeometry {
        match self {
            ShapeKind::Rectangle(s) => s,
            ShapeKind::Ellipse(s) => s,
            ShapeKind::Circle(s) => s,
            ShapeKind::Line(s) => s,
            ShapeKind::Polygon(s) | ShapeKind::Polyline(s) => s,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn ShapeGeometry {
        match self {
            ShapeKind::Rectangle(s) => s,
            ShapeKind::Ellipse(s) => s,
            ShapeKind::Circle(s) => s,
            ShapeKind::Line(s) => s,
            ShapeKind::Polygon(s) | ShapeKind::Polyline(s) => s,
        }
    }

    pub fn polygon(segments: Vec<Segment>) -> Self {
        ShapeKind::Polygon(AnnotationPath::polygon(segments))
    }

    pub fn polyline(segments: Vec<Segment>) -> Self {
        ShapeKind::Polyline(AnnotationPath::polyline(segments))
    }

    /// Builds the kind from image-space JSON, moving it into canvas space.
    pub fn from_json(geometry: &GeometryJson, x_offset: f64, y_offset: f64) -> Self {
        let local = |x: f64, y: f64| Point::new(x - x_offset, y - y_offset);
        let shift = |segments: &[Segment]| -> Vec<Segment> {
            segments
                .iter()
                .map(|s| Segment {
                    point: local(s.point.x, s.point.y),
                    handle_in: s.handle_in,
                    handle_out: s.handle_out,
                })
                .collect()
        };
        match geometry {
            GeometryJson::Rectangle {
                origin_x,
                origin_y,
                width,
                height,
            } => ShapeKind::Rectangle(Rectangle::new(local(*origin_x, *origin_y), *width, *height)),
            GeometryJson::Ellipse {
                center_x,
                center_y,
                radius_x,
                radius_y,
            } => ShapeKind::Ellipse(Ellipse::new(local(*center_x, *center_y), *radius_x, *radius_y)),
            GeometryJson::Circle {
                center_x,
                center_y,
                radius,
            } => ShapeKind::Circle(Circle::new(local(*center_x, *center_y), *radius)),
            GeometryJson::Line {
                from_x,
                from_y,
                to_x,
                to_y,
            } => ShapeKind::Line(Line::new(local(*from_x, *from_y), local(*to_x, *to_y))),
            GeometryJson::Polygon { segments } => ShapeKind::polygon(shift(segments)),
            GeometryJson::Polyline { segments } => ShapeKind::polyline(shift(segments)),
        }
    }

    pub fn shape_type(&self) -> ShapeType {
        self.inner().shape_type()
    }

    pub fn has_area(&self) -> bool {
        self.inner().has_area()
    }

    fn path(&self) -> Option<&AnnotationPath> {
        match self {
            ShapeKind::Polygon(p) | ShapeKind::Polyline(p) => Some(p),
            _ => None,
        }
    }

    fn path_mut(&mut self) -> Option<&mut AnnotationPath> {
        match self {
            ShapeKind::Polygon(p) | ShapeKind::Polyline(p) => Some(p),
            _ => None,
        }
    }
}

fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

#[derive(Debug, Clone)]
pub struct Shape {
    id: String,
    kind: ShapeKind,
    style: ShapeStyle,
    transform: Option<Matrix>,
    primitive: Option<Primitive>,
}

impl Shape {
    pub fn new(id: impl Into<String>, kind: ShapeKind) -> Self {
        Self {
            id: id.into(),
            kind,
            style: ShapeStyle::default(),
            transform: None,
            primitive: None,
        }
    }

    pub fn with_transform(mut self, transform: Option<Matrix>) -> Self {
        self.transform = transform;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> &ShapeKind {
        &self.kind
    }

    pub fn shape_type(&self) -> ShapeType {
        self.kind.shape_type()
    }

    pub fn style(&self) -> &ShapeStyle {
        &self.style
    }

    pub fn transform(&self) -> Option<Matrix> {
        self.transform
    }

    pub fn primitive(&self) -> Option<&Primitive> {
        self.primitive.as_ref()
    }

    pub fn is_materialized(&self) -> bool {
        self.primitive.is_some()
    }

    fn rendered(&self) -> Result<&Primitive> {
        self.primitive.as_ref().ok_or_else(|| {
            tracing::info!("Shape {} not initialized", self.id);
            AnnotationError::NotInitialized {
                shape_id: self.id.clone(),
            }
        })
    }

    /// Creates the rendered primitive, applying the original transform once.
    pub fn materialize(&mut self, activate_events: bool) {
        let mut primitive = Primitive::new(self.id.clone(), self.kind.inner().to_geometry());
        if let Some(matrix) = self.transform {
            primitive.apply_matrix(matrix);
        }
        primitive.set_drag_enabled(activate_events);
        self.primitive = Some(primitive);
    }

    /// Applies fill, stroke and width to the primitive.
    pub fn configure(&mut self, style: &ShapeStyle) -> Result<()> {
        let id = self.id.clone();
        let Some(primitive) = self.primitive.as_mut() else {
            tracing::info!("Shape {} not initialized, skipping configuration", id);
            return Err(AnnotationError::NotInitialized { shape_id: id });
        };
        let fill = hex_to_color(&style.fill_color, Some(style.fill_alpha))?;
        let stroke = hex_to_color(&style.stroke_color, Some(style.stroke_alpha))?;

        primitive.set_fill_color(fill);
        primitive.set_stroke_color(stroke);
        primitive.set_stroke_width(style.stroke_width);

        let fill_hex = color_to_hex(&fill);
        let stroke_hex = color_to_hex(&stroke);
        self.style = ShapeStyle {
            fill_color: fill_hex.hex_color,
            fill_alpha: fill_hex.alpha,
            stroke_color: stroke_hex.hex_color,
            stroke_alpha: stroke_hex.alpha,
            stroke_width: style.stroke_width,
        };
        Ok(())
    }

    // ---- interaction ----

    pub fn enable_events(&mut self) {
        if let Some(p) = self.primitive.as_mut() {
            p.set_drag_enabled(true);
        }
    }

    pub fn disable_events(&mut self) {
        if let Some(p) = self.primitive.as_mut() {
            p.set_drag_enabled(false);
        }
    }

    /// Returns false when dragging is disabled or the shape is not materialized.
    pub fn drag(&mut self, dx: f64, dy: f64) -> bool {
        match self.primitive.as_mut() {
            Some(p) if p.drag_enabled() => {
                p.translate(dx, dy);
                true
            }
            _ => false,
        }
    }

    /// Drag-release: persist the primitive's position into the attributes.
    pub fn release(&mut self) {
        self.update_shape_details();
    }

    pub fn update_shape_details(&mut self) {
        if let Some(p) = self.primitive.as_ref() {
            self.kind.inner_mut().update_from(p.geometry());
        }
    }

    pub fn select(&mut self) {
        if let Some(p) = self.primitive.as_mut() {
            p.set_selected(true);
        }
    }

    pub fn deselect(&mut self) {
        if let Some(p) = self.primitive.as_mut() {
            p.set_selected(false);
        }
    }

    pub fn is_selected(&self) -> Option<bool> {
        self.primitive.as_ref().map(|p| p.is_selected())
    }

    pub fn show(&mut self) {
        if let Some(p) = self.primitive.as_mut() {
            p.set_visible(true);
        }
    }

    pub fn hide(&mut self) {
        if let Some(p) = self.primitive.as_mut() {
            p.set_visible(false);
        }
    }

    pub fn is_visible(&self) -> Option<bool> {
        self.primitive.as_ref().map(|p| p.is_visible())
    }

    // ---- queries ----

    pub fn center(&self) -> Option<Point> {
        self.rendered().ok().map(|p| p.bounds().center())
    }

    pub fn bounds(&self) -> Option<BoundingBox> {
        self.rendered().ok().map(|p| p.bounds())
    }

    pub fn bounding_box_dimensions(&self) -> Option<Size> {
        self.bounds().map(|b| b.dimensions())
    }

    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        match self.primitive.as_ref() {
            Some(p) => p.contains(Point::new(x, y)),
            None => {
                tracing::warn!("Shape {} not initialized", self.id);
                false
            }
        }
    }

    /// Sample points of this shape in canvas space.
    fn canvas_sample_points(&self) -> Vec<Point> {
        let matrix = self
            .primitive
            .as_ref()
            .map(|p| p.matrix())
            .or(self.transform)
            .unwrap_or_default();
        self.kind
            .inner()
            .sample_points()
            .into_iter()
            .map(|p| matrix.transform_point(p))
            .collect()
    }

    /// Every sample point of `other` lies inside this shape.
    ///
    /// Approximate: curves bulging between sample points are not checked.
    pub fn contains_shape(&self, other: &Shape) -> bool {
        if !self.kind.has_area() {
            return false;
        }
        let Ok(primitive) = self.rendered() else {
            return false;
        };
        let points = other.canvas_sample_points();
        !points.is_empty() && points.iter().all(|p| primitive.contains(*p))
    }

    pub fn intersects_shape(&self, other: &Shape) -> bool {
        match (self.rendered(), other.rendered()) {
            (Ok(a), Ok(b)) => a.intersects(b),
            _ => false,
        }
    }

    /// Boolean intersection with `other`, detached from the registry.
    pub fn get_intersection(&self, other: &Shape) -> Option<Primitive> {
        let (a, b) = (self.rendered().ok()?, other.rendered().ok()?);
        Some(a.intersect(b))
    }

    /// Share of this shape's area covered by `other`, in percent.
    pub fn get_coverage_percentage(&self, other: &Shape) -> Option<f64> {
        if !self.kind.has_area() || !other.kind.has_area() {
            tracing::info!(
                "Coverage between {} and {} is undefined: both shapes need an area",
                self.id,
                other.id
            );
            return None;
        }
        let area = self.rendered().ok()?.area().abs();
        if area == 0.0 {
            return None;
        }
        let intersection = self.get_intersection(other)?;
        Some(intersection.area().abs() / area * 100.0)
    }

    /// Area in physical units (`|area| * pixel_size²`).
    pub fn get_area(&self, pixel_size: f64, decimals: u32) -> Option<f64> {
        if !self.kind.has_area() {
            return None;
        }
        let area = self.rendered().ok()?.area().abs();
        Some(round_to(area * pixel_size * pixel_size, decimals))
    }

    pub fn get_perimeter(&self, pixel_size: f64, decimals: u32) -> Option<f64> {
        let length = self.rendered().ok()?.length();
        Some(round_to(length * pixel_size, decimals))
    }

    // ---- path editing ----

    pub fn segments(&self) -> Option<&[Segment]> {
        self.kind.path().map(|p| p.segments.as_slice())
    }

    pub fn point_count(&self) -> usize {
        self.segments().map_or(0, |s| s.len())
    }

    /// Appends a vertex. Returns false for non-path shapes.
    pub fn add_point(&mut self, x: f64, y: f64) -> bool {
        let segment = Segment::new(Point::new(x, y));
        let Some(path) = self.kind.path_mut() else {
            tracing::warn!("Shape {} is not a path", self.id);
            return false;
        };
        path.segments.push(segment);
        if let Some(p) = self.primitive.as_mut() {
            p.add_segment(segment);
        }
        true
    }

    /// Removes the vertex at `index`, or the most recently added one.
    ///
    /// Fails with `EmptyPath` when there is nothing to remove.
    pub fn remove_point(&mut self, index: Option<usize>) -> Result<Option<Segment>> {
        let empty = || AnnotationError::EmptyPath {
            shape_id: self.id.clone(),
        };
        let count = self.point_count();
        if count == 0 {
            return Err(empty());
        }
        if let Some(i) = index {
            if i >= count {
                tracing::warn!("Path {} has no point at index {}", self.id, i);
                return Ok(None);
            }
        }
        let removed = self.kind.path_mut().and_then(|path| match index {
            Some(i) => Some(path.segments.remove(i)),
            None => path.segments.pop(),
        });
        if let Some(p) = self.primitive.as_mut() {
            p.remove_segment(index);
        }
        Ok(removed)
    }

    /// Lossy vertex reduction; the segment list is re-read from the primitive.
    pub fn simplify_path(&mut self, tolerance: f64) {
        let Some(primitive) = self.primitive.as_mut() else {
            tracing::warn!("Shape {} not initialized, cannot simplify", self.id);
            return;
        };
        primitive.simplify(tolerance);
        if let (Some(path), Some(rendered)) = (self.kind.path_mut(), primitive.path()) {
            path.segments = rendered.segments.clone();
        }
    }

    /// Polygons need 3 points, polylines 2; other shapes are always valid.
    pub fn is_valid(&self) -> bool {
        self.kind.path().is_none_or(|p| p.is_valid())
    }

    pub fn open_path(&mut self) {
        if let Some(p) = self.primitive.as_mut() {
            p.set_closed(false);
        }
    }

    /// Restores the rendered closure to the shape's own (polylines stay open).
    pub fn close_path(&mut self) {
        let closed = self.kind.path().is_some_and(|p| p.closed);
        if let Some(p) = self.primitive.as_mut() {
            p.set_closed(closed);
        }
    }

    pub fn enable_dashed_border(&mut self, dash: f64, gap: f64) {
        if let Some(p) = self.primitive.as_mut() {
            p.set_dash_array(Some([dash, gap]));
        }
    }

    pub fn disable_dashed_border(&mut self) {
        if let Some(p) = self.primitive.as_mut() {
            p.set_dash_array(None);
        }
    }

    // ---- serialization ----

    /// Image-space JSON: local geometry plus `(x_offset, y_offset)`.
    pub fn to_json(&self, x_offset: f64, y_offset: f64) -> ShapeJson {
        ShapeJson {
            shape_id: self.id.clone(),
            geometry: self.kind.inner().to_json_geometry(x_offset, y_offset),
            style: self.style.clone().into(),
            hidden: self.is_visible() == Some(false),
            transform: self.transform,
        }
    }
}
