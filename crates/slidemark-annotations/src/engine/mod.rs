//! Render-engine primitives.
//!
//! A [`Primitive`] is what a shape becomes once materialized: local
//! geometry, an affine matrix placing it on the canvas, paint, and the
//! interaction flags. Geometric queries run on the lyon path built from it.

mod boolean;
pub mod geometry;
mod scene;

use lyon::math::point;
use lyon::path::iterator::*;
use lyon::path::Path;
use serde::{Deserialize, Serialize};
use slidemark_core::{BoundingBox, Point, Size};

use crate::adapter::{Color, Matrix};
use geometry::{point_in_rings, ring_length, segments_cross, signed_area, simplify_rdp};

pub use scene::Scene;

/// Bezier approximation constant for quarter ellipses.
const KAPPA: f64 = 0.552_284_749_8;

/// Flattening tolerance for geometric queries, in canvas units.
const FLATTEN_TOLERANCE: f32 = 0.05;

/// A path vertex with optional bezier handles, relative to `point`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub point: Point,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handle_in: Option<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handle_out: Option<Point>,
}

impl Segment {
    pub fn new(point: Point) -> Self {
        Self {
            point,
            handle_in: None,
            handle_out: None,
        }
    }

    pub fn has_handles(&self) -> bool {
        self.handle_in.is_some() || self.handle_out.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PathGeometry {
    pub segments: Vec<Segment>,
    pub closed: bool,
}

impl PathGeometry {
    pub fn new(segments: Vec<Segment>, closed: bool) -> Self {
        Self { segments, closed }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Rectangle { origin: Point, size: Size },
    Ellipse { center: Point, radius_x: f64, radius_y: f64 },
    Circle { center: Point, radius: f64 },
    Path(PathGeometry),
    /// Result of a boolean operation: exteriors wind positive, holes negative.
    Compound(Vec<PathGeometry>),
}

/// A flattened outline in canvas space.
#[derive(Debug, Clone, PartialEq)]
pub struct Ring {
    pub points: Vec<Point>,
    pub closed: bool,
}

#[derive(Debug, Clone)]
pub struct Primitive {
    owner: String,
    geometry: Geometry,
    matrix: Matrix,
    fill_color: Option<Color>,
    stroke_color: Option<Color>,
    stroke_width: f64,
    selected: bool,
    visible: bool,
    dash_array: Option<[f64; 2]>,
    drag_enabled: bool,
}

impl Primitive {
    pub fn new(owner: impl Into<String>, geometry: Geometry) -> Self {
        Self {
            owner: owner.into(),
            geometry,
            matrix: Matrix::identity(),
            fill_color: None,
            stroke_color: None,
            stroke_width: 1.0,
            selected: false,
            visible: true,
            dash_array: None,
            drag_enabled: false,
        }
    }

    /// ID of the shape wrapping this primitive.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn set_owner(&mut self, owner: impl Into<String>) {
        self.owner = owner.into();
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn matrix(&self) -> Matrix {
        self.matrix
    }

    pub fn apply_matrix(&mut self, matrix: Matrix) {
        self.matrix = matrix;
    }

    pub fn fill_color(&self) -> Option<Color> {
        self.fill_color
    }

    pub fn set_fill_color(&mut self, color: Color) {
        self.fill_color = Some(color);
    }

    pub fn stroke_color(&self) -> Option<Color> {
        self.stroke_color
    }

    pub fn set_stroke_color(&mut self, color: Color) {
        self.stroke_color = Some(color);
    }

    pub fn stroke_width(&self) -> f64 {
        self.stroke_width
    }

    pub fn set_stroke_width(&mut self, width: f64) {
        self.stroke_width = width;
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn dash_array(&self) -> Option<[f64; 2]> {
        self.dash_array
    }

    pub fn set_dash_array(&mut self, dash: Option<[f64; 2]>) {
        self.dash_array = dash;
    }

    pub fn drag_enabled(&self) -> bool {
        self.drag_enabled
    }

    pub fn set_drag_enabled(&mut self, enabled: bool) {
        self.drag_enabled = enabled;
    }

    fn copy_paint(&self, target: &mut Primitive) {
        target.fill_color = self.fill_color;
        target.stroke_color = self.stroke_color;
        target.stroke_width = self.stroke_width;
    }

    // ---- path editing ----

    pub fn path(&self) -> Option<&PathGeometry> {
        match &self.geometry {
            Geometry::Path(path) => Some(path),
            _ => None,
        }
    }

    fn path_mut(&mut self) -> Option<&mut PathGeometry> {
        match &mut self.geometry {
            Geometry::Path(path) => Some(path),
            _ => None,
        }
    }

    /// Returns false when the primitive is not a path.
    pub fn add_segment(&mut self, segment: Segment) -> bool {
        match self.path_mut() {
            Some(path) => {
                path.segments.push(segment);
                true
            }
            None => false,
        }
    }

    /// Removes the segment at `index`, or the last one.
    pub fn remove_segment(&mut self, index: Option<usize>) -> Option<Segment> {
        let path = self.path_mut()?;
        match index {
            Some(i) if i < path.segments.len() => Some(path.segments.remove(i)),
            Some(_) => None,
            None => path.segments.pop(),
        }
    }

    pub fn set_closed(&mut self, closed: bool) {
        if let Some(path) = self.path_mut() {
            path.closed = closed;
        }
    }

    pub fn replace_segments(&mut self, segments: Vec<Segment>) {
        if let Some(path) = self.path_mut() {
            path.segments = segments;
        }
    }

    // ---- rendering ----

    fn local_path(&self) -> Path {
        let mut builder = Path::builder();
        let p = |pt: Point| point(pt.x as f32, pt.y as f32);

        match &self.geometry {
            Geometry::Rectangle { origin, size } => {
                builder.begin(p(*origin));
                builder.line_to(p(origin.offset(size.width, 0.0)));
                builder.line_to(p(origin.offset(size.width, size.height)));
                builder.line_to(p(origin.offset(0.0, size.height)));
                builder.close();
            }
            Geometry::Ellipse {
                center,
                radius_x,
                radius_y,
            } => add_ellipse(&mut builder, *center, *radius_x, *radius_y),
            Geometry::Circle { center, radius } => {
                add_ellipse(&mut builder, *center, *radius, *radius)
            }
            Geometry::Path(path) => add_path(&mut builder, path),
            Geometry::Compound(children) => {
                for child in children {
                    add_path(&mut builder, child);
                }
            }
        }
        builder.build()
    }

    /// The primitive as a lyon path in canvas space.
    pub fn to_path(&self) -> Path {
        let path = self.local_path();
        if self.matrix.is_identity() {
            path
        } else {
            path.transformed(&self.matrix.to_transform())
        }
    }

    /// Flattened outlines in canvas space.
    pub fn rings(&self) -> Vec<Ring> {
        flatten(&self.to_path())
    }

    /// The first flattened outline in local space, as plain segments.
    pub fn outline_segments(&self) -> Vec<Segment> {
        flatten(&self.local_path())
            .into_iter()
            .next()
            .map(|ring| ring.points.into_iter().map(Segment::new).collect())
            .unwrap_or_default()
    }

    pub fn bounds(&self) -> BoundingBox {
        let path = self.to_path();
        if path.iter().next().is_none() {
            return BoundingBox::default();
        }
        let bb = lyon::algorithms::aabb::bounding_box(path.iter());
        BoundingBox::new(
            Point::new(bb.min.x as f64, bb.min.y as f64),
            Point::new(bb.max.x as f64, bb.max.y as f64),
        )
    }

    /// Signed area; for compound results holes subtract.
    pub fn area(&self) -> f64 {
        self.rings().iter().map(|r| signed_area(&r.points)).sum()
    }

    /// Total outline length.
    pub fn length(&self) -> f64 {
        self.rings()
            .iter()
            .map(|r| ring_length(&r.points, r.closed))
            .sum()
    }

    /// Even-odd fill test; open paths are treated as implicitly closed.
    pub fn contains(&self, p: Point) -> bool {
        let rings: Vec<Vec<Point>> = self
            .rings()
            .into_iter()
            .filter(|r| r.points.len() >= 3)
            .map(|r| r.points)
            .collect();
        point_in_rings(p, &rings)
    }

    /// True when the outlines of the two primitives cross.
    pub fn intersects(&self, other: &Primitive) -> bool {
        if !self.bounds().overlaps(&other.bounds()) {
            return false;
        }
        let edges_a = edges(&self.rings());
        let edges_b = edges(&other.rings());
        edges_a
            .iter()
            .any(|(a1, a2)| edges_b.iter().any(|(b1, b2)| segments_cross(*a1, *a2, *b1, *b2)))
    }

    /// Boolean intersection of the filled areas. The result is detached
    /// (no owner) and inherits this primitive's paint.
    pub fn intersect(&self, other: &Primitive) -> Primitive {
        let mut result = Primitive::new("", Geometry::Compound(boolean::intersection(self, other)));
        self.copy_paint(&mut result);
        result
    }

    /// Moves the primitive by a canvas-space delta.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        let (ldx, ldy) = self.matrix.inverse_delta(dx, dy);
        let shift_path = |path: &mut PathGeometry| {
            for segment in path.segments.iter_mut() {
                segment.point = segment.point.offset(ldx, ldy);
            }
        };
        match &mut self.geometry {
            Geometry::Rectangle { origin, .. } => *origin = origin.offset(ldx, ldy),
            Geometry::Ellipse { center, .. } | Geometry::Circle { center, .. } => {
                *center = center.offset(ldx, ldy)
            }
            Geometry::Path(path) => shift_path(path),
            Geometry::Compound(children) => children.iter_mut().for_each(shift_path),
        }
    }

    /// Reduces a path's vertices. Handles are dropped from the result.
    pub fn simplify(&mut self, tolerance: f64) {
        let Some(path) = self.path_mut() else {
            return;
        };
        if path.segments.len() <= 2 {
            return;
        }
        let mut points: Vec<Point> = path.segments.iter().map(|s| s.point).collect();
        let simplified = if path.closed {
            points.push(points[0]);
            let mut reduced = simplify_rdp(&points, tolerance);
            reduced.pop();
            if reduced.len() < 3 {
                return;
            }
            reduced
        } else {
            simplify_rdp(&points, tolerance)
        };
        tracing::debug!(
            "Simplified path of {} from {} to {} points",
            self.owner,
            points.len(),
            simplified.len()
        );
        if let Some(path) = self.path_mut() {
            path.segments = simplified.into_iter().map(Segment::new).collect();
        }
    }
}

fn add_ellipse(builder: &mut lyon::path::path::Builder, c: Point, rx: f64, ry: f64) {
    let p = |x: f64, y: f64| point(x as f32, y as f32);
    let (kx, ky) = (rx * KAPPA, ry * KAPPA);
    builder.begin(p(c.x + rx, c.y));
    builder.cubic_bezier_to(p(c.x + rx, c.y + ky), p(c.x + kx, c.y + ry), p(c.x, c.y + ry));
    builder.cubic_bezier_to(p(c.x - kx, c.y + ry), p(c.x - rx, c.y + ky), p(c.x - rx, c.y));
    builder.cubic_bezier_to(p(c.x - rx, c.y - ky), p(c.x - kx, c.y - ry), p(c.x, c.y - ry));
    builder.cubic_bezier_to(p(c.x + kx, c.y - ry), p(c.x + rx, c.y - ky), p(c.x + rx, c.y));
    builder.close();
}

fn add_path(builder: &mut lyon::path::path::Builder, path: &PathGeometry) {
    let Some(first) = path.segments.first() else {
        return;
    };
    let p = |pt: Point| point(pt.x as f32, pt.y as f32);
    let curve = |builder: &mut lyon::path::path::Builder, from: &Segment, to: &Segment| {
        if from.handle_out.is_some() || to.handle_in.is_some() {
            let ctrl1 = from.point.offset(
                from.handle_out.map_or(0.0, |h| h.x),
                from.handle_out.map_or(0.0, |h| h.y),
            );
            let ctrl2 = to.point.offset(
                to.handle_in.map_or(0.0, |h| h.x),
                to.handle_in.map_or(0.0, |h| h.y),
            );
            builder.cubic_bezier_to(p(ctrl1), p(ctrl2), p(to.point));
        } else {
            builder.line_to(p(to.point));
        }
    };

    builder.begin(p(first.point));
    for pair in path.segments.windows(2) {
        curve(builder, &pair[0], &pair[1]);
    }
    if path.closed && path.segments.len() > 1 {
        if let Some(last) = path.segments.last() {
            if last.has_handles() || first.has_handles() {
                curve(builder, last, first);
            }
        }
    }
    builder.end(path.closed);
}

fn flatten(path: &Path) -> Vec<Ring> {
    let mut rings = Vec::new();
    let mut current: Vec<Point> = Vec::new();
    for event in path.iter().flattened(FLATTEN_TOLERANCE) {
        match event {
            lyon::path::Event::Begin { at } => {
                current.clear();
                current.push(Point::new(at.x as f64, at.y as f64));
            }
            lyon::path::Event::Line { to, .. } => {
                current.push(Point::new(to.x as f64, to.y as f64));
            }
            lyon::path::Event::End { close, .. } => {
                if close && current.len() > 1 && current.first() == current.last() {
                    current.pop();
                }
                rings.push(Ring {
                    points: std::mem::take(&mut current),
                    closed: close,
                });
            }
            _ => {}
        }
    }
    rings
}

fn edges(rings: &[Ring]) -> Vec<(Point, Point)> {
    let mut out = Vec::new();
    for ring in rings {
        for pair in ring.points.windows(2) {
            out.push((pair[0], pair[1]));
        }
        if ring.closed && ring.points.len() > 2 {
            if let (Some(first), Some(last)) = (ring.points.first(), ring.points.last()) {
                out.push((*last, *first));
            }
        }
    }
    out
}
