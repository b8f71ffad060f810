//! Conversions between plain data and the render engine's primitives.
//!
//! Colors travel as hex strings plus an alpha channel, transforms as the
//! six coefficients of a 2D affine matrix, and paths as segment lists.

use lyon::math::Transform;
use serde::{Deserialize, Serialize};
use slidemark_core::{is_hex_color, AnnotationError, Point, Result};

use crate::engine::{Geometry, Primitive, Segment};

/// RGBA color with channels in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Color {
    pub fn new(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }
}

/// Hex form of a [`Color`], as stored in shape JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HexColor {
    pub hex_color: String,
    pub alpha: f64,
}

/// Parses `#rgb` or `#rrggbb`. A missing alpha means fully opaque.
pub fn hex_to_color(hex: &str, alpha: Option<f64>) -> Result<Color> {
    if !is_hex_color(hex) {
        tracing::error!("{} is not a valid HEX color string", hex);
        return Err(AnnotationError::InvalidColor {
            value: hex.to_string(),
        });
    }
    let digits = &hex[1..];
    let channel = |s: &str| -> Result<f64> {
        u8::from_str_radix(s, 16)
            .map(|v| v as f64 / 255.0)
            .map_err(|_| AnnotationError::InvalidColor {
                value: hex.to_string(),
            })
    };
    let (red, green, blue) = if digits.len() == 6 {
        (
            channel(&digits[0..2])?,
            channel(&digits[2..4])?,
            channel(&digits[4..6])?,
        )
    } else {
        let expand = |i: usize| digits[i..i + 1].repeat(2);
        (channel(&expand(0))?, channel(&expand(1))?, channel(&expand(2))?)
    };
    Ok(Color::new(red, green, blue, alpha.unwrap_or(1.0)))
}

/// Inverse of [`hex_to_color`], always producing 6 lowercase digits.
pub fn color_to_hex(color: &Color) -> HexColor {
    let byte = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    HexColor {
        hex_color: format!(
            "#{:02x}{:02x}{:02x}",
            byte(color.red),
            byte(color.green),
            byte(color.blue)
        ),
        alpha: color.alpha,
    }
}

/// 2D affine matrix: `x' = a*x + c*y + tx`, `y' = b*x + d*y + ty`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub tx: f64,
    pub ty: f64,
}

impl Default for Matrix {
    fn default() -> Self {
        Self::identity()
    }
}

impl Matrix {
    pub fn identity() -> Self {
        build_matrix(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }

    pub fn transform_point(&self, p: Point) -> Point {
        Point::new(
            self.a * p.x + self.c * p.y + self.tx,
            self.b * p.x + self.d * p.y + self.ty,
        )
    }

    /// Maps a canvas-space displacement back into local space.
    ///
    /// Falls back to the raw delta when the linear part is singular.
    pub fn inverse_delta(&self, dx: f64, dy: f64) -> (f64, f64) {
        let det = self.a * self.d - self.b * self.c;
        if det.abs() < f64::EPSILON {
            return (dx, dy);
        }
        (
            (self.d * dx - self.c * dy) / det,
            (-self.b * dx + self.a * dy) / det,
        )
    }

    pub fn to_transform(&self) -> Transform {
        Transform::new(
            self.a as f32,
            self.b as f32,
            self.c as f32,
            self.d as f32,
            self.tx as f32,
            self.ty as f32,
        )
    }
}

pub fn build_matrix(a: f64, b: f64, c: f64, d: f64, tx: f64, ty: f64) -> Matrix {
    Matrix { a, b, c, d, tx, ty }
}

pub fn translation_matrix(tx: f64, ty: f64) -> Matrix {
    build_matrix(1.0, 0.0, 0.0, 1.0, tx, ty)
}

/// Parses the `matrix(a,b,c,d,tx,ty)` and `translate(tx[,ty])` forms.
pub fn try_parse_transform(spec: &str) -> Result<Matrix> {
    let invalid = || AnnotationError::InvalidTransform {
        spec: spec.to_string(),
    };
    let trimmed = spec.trim();
    let open = trimmed.find('(').ok_or_else(invalid)?;
    let args = trimmed[open + 1..].strip_suffix(')').ok_or_else(invalid)?;
    let values = args
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<f64>().map_err(|_| invalid()))
        .collect::<Result<Vec<f64>>>()?;

    match (trimmed[..open].trim(), values.as_slice()) {
        ("matrix", [a, b, c, d, tx, ty]) => Ok(build_matrix(*a, *b, *c, *d, *tx, *ty)),
        ("translate", [tx]) => Ok(translation_matrix(*tx, 0.0)),
        ("translate", [tx, ty]) => Ok(translation_matrix(*tx, *ty)),
        _ => Err(invalid()),
    }
}

/// Like [`try_parse_transform`], but unknown forms only log a warning.
pub fn parse_external_transform(spec: &str) -> Option<Matrix> {
    match try_parse_transform(spec) {
        Ok(matrix) => Some(matrix),
        Err(e) => {
            tracing::warn!("{}", e);
            None
        }
    }
}

/// Lists a primitive's segments with `(x_offset, y_offset)` added to every point.
///
/// Compound primitives (e.g. boolean results) are decomposed child by child.
pub fn extract_path_segments(primitive: &Primitive, x_offset: f64, y_offset: f64) -> Vec<Segment> {
    let shift = |segment: &Segment| Segment {
        point: segment.point.offset(x_offset, y_offset),
        handle_in: segment.handle_in,
        handle_out: segment.handle_out,
    };
    match primitive.geometry() {
        Geometry::Path(path) => path.segments.iter().map(shift).collect(),
        Geometry::Compound(children) => children
            .iter()
            .flat_map(|child| child.segments.iter().map(shift))
            .collect(),
        _ => {
            tracing::debug!(
                "Primitive of {} has no direct segments, decomposing outline",
                primitive.owner()
            );
            primitive
                .outline_segments()
                .iter()
                .map(shift)
                .collect()
        }
    }
}
