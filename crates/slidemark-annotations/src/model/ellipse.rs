use serde::{Deserialize, Serialize};
use slidemark_core::Point;

use super::{GeometryJson, ShapeGeometry, ShapeType};
use crate::engine::Geometry;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ellipse {
    pub center: Point,
    pub radius_x: f64,
    pub radius_y: f64,
}

impl Ellipse {
    pub fn new(center: Point, radius_x: f64, radius_y: f64) -> Self {
        Self {
            center,
            radius_x,
            radius_y,
        }
    }
}

impl ShapeGeometry for Ellipse {
    fn shape_type(&self) -> ShapeType {
        ShapeType::Ellipse
    }

    fn to_geometry(&self) -> Geometry {
        Geometry::Ellipse {
            center: self.center,
            radius_x: self.radius_x,
            radius_y: self.radius_y,
        }
    }

    fn update_from(&mut self, geometry: &Geometry) {
        if let Geometry::Ellipse {
            center,
            radius_x,
            radius_y,
        } = geometry
        {
            self.center = *center;
            self.radius_x = *radius_x;
            self.radius_y = *radius_y;
        }
    }

    fn sample_points(&self) -> Vec<Point> {
        vec![
            self.center.offset(self.radius_x, 0.0),
            self.center.offset(0.0, self.radius_y),
            self.center.offset(-self.radius_x, 0.0),
            self.center.offset(0.0, -self.radius_y),
        ]
    }

    fn to_json_geometry(&self, x_offset: f64, y_offset: f64) -> GeometryJson {
        GeometryJson::Ellipse {
            center_x: self.center.x + x_offset,
            center_y: self.center.y + y_offset,
            radius_x: self.radius_x,
            radius_y: self.radius_y,
        }
    }
}
