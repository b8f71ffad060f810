use serde::{Deserialize, Serialize};
use slidemark_core::Point;

use super::{GeometryJson, ShapeGeometry, ShapeType};
use crate::engine::Geometry;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Point,
    pub radius: f64,
}

impl Circle {
    pub fn new(center: Point, radius: f64) -> Self {
        Self { center, radius }
    }
}

impl ShapeGeometry for Circle {
    fn shape_type(&self) -> ShapeType {
        ShapeType::Circle
    }

    fn to_geometry(&self) -> Geometry {
        Geometry::Circle {
            center: self.center,
            radius: self.radius,
        }
    }

    fn update_from(&mut self, geometry: &Geometry) {
        if let Geometry::Circle { center, radius } = geometry {
            self.center = *center;
            self.radius = *radius;
        }
    }

    fn sample_points(&self) -> Vec<Point> {
        vec![
            self.center.offset(self.radius, 0.0),
            self.center.offset(0.0, self.radius),
            self.center.offset(-self.radius, 0.0),
            self.center.offset(0.0, -self.radius),
        ]
    }

    fn to_json_geometry(&self, x_offset: f64, y_offset: f64) -> GeometryJson {
        GeometryJson::Circle {
            center_x: self.center.x + x_offset,
            center_y: self.center.y + y_offset,
            radius: self.radius,
        }
    }
}
