//! Image-space JSON form of a shape.

use serde::{Deserialize, Serialize};
use slidemark_core::StyleOverrides;

use crate::adapter::Matrix;
use crate::engine::Segment;

pub const SHAPE_TYPES: [&str; 6] = [
    "rectangle",
    "ellipse",
    "circle",
    "line",
    "polygon",
    "polyline",
];

/// `{shape_id, type, <style>, hidden, transform?, <geometry>}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeJson {
    pub shape_id: String,
    #[serde(flatten)]
    pub geometry: GeometryJson,
    #[serde(flatten)]
    pub style: StyleOverrides,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<Matrix>,
}

impl ShapeJson {
    pub fn shape_type(&self) -> &'static str {
        self.geometry.type_name()
    }

    /// Segments of polygon/polyline JSON.
    pub fn segments(&self) -> Option<&[Segment]> {
        match &self.geometry {
            GeometryJson::Polygon { segments } | GeometryJson::Polyline { segments } => {
                Some(segments)
            }
            _ => None,
        }
    }

    /// Replaces the segments of polygon/polyline JSON; ignored otherwise.
    pub fn set_segments(&mut self, new_segments: Vec<Segment>) {
        if let GeometryJson::Polygon { segments } | GeometryJson::Polyline { segments } =
            &mut self.geometry
        {
            *segments = new_segments;
        }
    }

    pub fn to_value(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum GeometryJson {
    Rectangle {
        origin_x: f64,
        origin_y: f64,
        width: f64,
        height: f64,
    },
    Ellipse {
        center_x: f64,
        center_y: f64,
        radius_x: f64,
        radius_y: f64,
    },
    Circle {
        center_x: f64,
        center_y: f64,
        radius: f64,
    },
    Line {
        from_x: f64,
        from_y: f64,
        to_x: f64,
        to_y: f64,
    },
    Polygon {
        segments: Vec<Segment>,
    },
    Polyline {
        segments: Vec<Segment>,
    },
}

impl GeometryJson {
    pub fn type_name(&self) -> &'static str {
        match self {
            GeometryJson::Rectangle { .. } => "rectangle",
            GeometryJson::Ellipse { .. } => "ellipse",
            GeometryJson::Circle { .. } => "circle",
            GeometryJson::Line { .. } => "line",
            GeometryJson::Polygon { .. } => "polygon",
            GeometryJson::Polyline { .. } => "polyline",
        }
    }
}
