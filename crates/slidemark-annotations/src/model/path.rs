use serde::{Deserialize, Serialize};
use slidemark_core::Point;

use super::{GeometryJson, ShapeGeometry, ShapeType};
use crate::engine::{Geometry, PathGeometry, Segment};

/// Segment list shared by polygons (closed) and polylines (open).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationPath {
    pub segments: Vec<Segment>,
    pub closed: bool,
}

impl AnnotationPath {
    pub fn polygon(segments: Vec<Segment>) -> Self {
        Self {
            segments,
            closed: true,
        }
    }

    pub fn polyline(segments: Vec<Segment>) -> Self {
        Self {
            segments,
            closed: false,
        }
    }

    pub fn from_points(points: &[Point], closed: bool) -> Self {
        Self {
            segments: points.iter().copied().map(Segment::new).collect(),
            closed,
        }
    }

    /// Minimum vertex count for a drawable path.
    pub fn min_points(&self) -> usize {
        if self.closed {
            3
        } else {
            2
        }
    }

    pub fn is_valid(&self) -> bool {
        self.segments.len() >= self.min_points()
    }
}

impl ShapeGeometry for AnnotationPath {
    fn shape_type(&self) -> ShapeType {
        if self.closed {
            ShapeType::Polygon
        } else {
            ShapeType::Polyline
        }
    }

    fn to_geometry(&self) -> Geometry {
        Geometry::Path(PathGeometry::new(self.segments.clone(), self.closed))
    }

    fn update_from(&mut self, geometry: &Geometry) {
        if let Geometry::Path(path) = geometry {
            self.segments = path.segments.clone();
        }
    }

    fn sample_points(&self) -> Vec<Point> {
        self.segments.iter().map(|s| s.point).collect()
    }

    fn to_json_geometry(&self, x_offset: f64, y_offset: f64) -> GeometryJson {
        let segments = self
            .segments
            .iter()
            .map(|s| Segment {
                point: s.point.offset(x_offset, y_offset),
                handle_in: s.handle_in,
                handle_out: s.handle_out,
            })
            .collect();
        if self.closed {
            GeometryJson::Polygon { segments }
        } else {
            GeometryJson::Polyline { segments }
        }
    }

    fn has_area(&self) -> bool {
        self.closed
    }
}
