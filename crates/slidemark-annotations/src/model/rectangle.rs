use serde::{Deserialize, Serialize};
use slidemark_core::{Point, Size};

use super::{GeometryJson, ShapeGeometry, ShapeType};
use crate::engine::Geometry;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    pub origin: Point,
    pub width: f64,
    pub height: f64,
}

impl Rectangle {
    pub fn new(origin: Point, width: f64, height: f64) -> Self {
        Self {
            origin,
            width,
            height,
        }
    }
}

impl ShapeGeometry for Rectangle {
    fn shape_type(&self) -> ShapeType {
        ShapeType::Rectangle
    }

    fn to_geometry(&self) -> Geometry {
        Geometry::Rectangle {
            origin: self.origin,
            size: Size::new(self.width, self.height),
        }
    }

    fn update_from(&mut self, geometry: &Geometry) {
        if let Geometry::Rectangle { origin, size } = geometry {
            self.origin = *origin;
            self.width = size.width;
            self.height = size.height;
        }
    }

    fn sample_points(&self) -> Vec<Point> {
        vec![
            self.origin,
            self.origin.offset(self.width, 0.0),
            self.origin.offset(self.width, self.height),
            self.origin.offset(0.0, self.height),
        ]
    }

    fn to_json_geometry(&self, x_offset: f64, y_offset: f64) -> GeometryJson {
        GeometryJson::Rectangle {
            origin_x: self.origin.x + x_offset,
            origin_y: self.origin.y + y_offset,
            width: self.width,
            height: self.height,
        }
    }
}
