use serde::{Deserialize, Serialize};
use slidemark_core::Point;

use super::{GeometryJson, ShapeGeometry, ShapeType};
use crate::engine::{Geometry, PathGeometry, Segment};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub from: Point,
    pub to: Point,
}

impl Line {
    pub fn new(from: Point, to: Point) -> Self {
        Self { from, to }
    }
}

impl ShapeGeometry for Line {
    fn shape_type(&self) -> ShapeType {
        ShapeType::Line
    }

    fn to_geometry(&self) -> Geometry {
        Geometry::Path(PathGeometry::new(
            vec![Segment::new(self.from), Segment::new(self.to)],
            false,
        ))
    }

    fn update_from(&mut self, geometry: &Geometry) {
        if let Geometry::Path(path) = geometry {
            if let [from, to] = path.segments.as_slice() {
                self.from = from.point;
                self.to = to.point;
            }
        }
    }

    fn sample_points(&self) -> Vec<Point> {
        vec![self.from, self.to]
    }

    fn to_json_geometry(&self, x_offset: f64, y_offset: f64) -> GeometryJson {
        GeometryJson::Line {
            from_x: self.from.x + x_offset,
            from_y: self.from.y + y_offset,
            to_x: self.to.x + x_offset,
            to_y: self.to.y + y_offset,
        }
    }

    fn has_area(&self) -> bool {
        false
    }
}
