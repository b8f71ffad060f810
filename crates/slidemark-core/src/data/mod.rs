//! Plain data shared across the annotation layer.

mod geometry;
mod style;

pub use geometry::{BoundingBox, Point, Size};
pub use style::{is_hex_color, ShapeStyle, StyleOverrides};
