use serde::{Deserialize, Serialize};

/// Checks for a `#` followed by exactly 3 or 6 hex digits.
pub fn is_hex_color(value: &str) -> bool {
    match value.strip_prefix('#') {
        Some(digits) => {
            (digits.len() == 3 || digits.len() == 6)
                && digits.chars().all(|c| c.is_ascii_hexdigit())
        }
        None => false,
    }
}

/// Fully resolved style of a shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeStyle {
    pub fill_color: String,
    pub fill_alpha: f64,
    pub stroke_color: String,
    pub stroke_alpha: f64,
    pub stroke_width: f64,
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            fill_color: "#ffffff".to_string(),
            fill_alpha: 1.0,
            stroke_color: "#000000".to_string(),
            stroke_alpha: 1.0,
            stroke_width: 20.0,
        }
    }
}

impl ShapeStyle {
    /// Merges `overrides` on top of this style, field by field.
    pub fn merged(&self, overrides: &StyleOverrides) -> ShapeStyle {
        ShapeStyle {
            fill_color: overrides
                .fill_color
                .clone()
                .unwrap_or_else(|| self.fill_color.clone()),
            fill_alpha: overrides.fill_alpha.unwrap_or(self.fill_alpha),
            stroke_color: overrides
                .stroke_color
                .clone()
                .unwrap_or_else(|| self.stroke_color.clone()),
            stroke_alpha: overrides.stroke_alpha.unwrap_or(self.stroke_alpha),
            stroke_width: overrides.stroke_width.unwrap_or(self.stroke_width),
        }
    }
}

/// Partial style: unset fields fall back to the registry defaults.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_alpha: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_alpha: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
}

impl StyleOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fill(mut self, color: &str, alpha: f64) -> Self {
        self.fill_color = Some(color.to_string());
        self.fill_alpha = Some(alpha);
        self
    }

    pub fn with_stroke(mut self, color: &str, alpha: f64) -> Self {
        self.stroke_color = Some(color.to_string());
        self.stroke_alpha = Some(alpha);
        self
    }

    pub fn with_stroke_width(mut self, width: f64) -> Self {
        self.stroke_width = Some(width);
        self
    }

    /// Fields set in `other` win; the rest keep their current value.
    pub fn extended(&self, other: &StyleOverrides) -> StyleOverrides {
        StyleOverrides {
            fill_color: other.fill_color.clone().or_else(|| self.fill_color.clone()),
            fill_alpha: other.fill_alpha.or(self.fill_alpha),
            stroke_color: other
                .stroke_color
                .clone()
                .or_else(|| self.stroke_color.clone()),
            stroke_alpha: other.stroke_alpha.or(self.stroke_alpha),
            stroke_width: other.stroke_width.or(self.stroke_width),
        }
    }
}

impl From<ShapeStyle> for StyleOverrides {
    fn from(style: ShapeStyle) -> Self {
        Self {
            fill_color: Some(style.fill_color),
            fill_alpha: Some(style.fill_alpha),
            stroke_color: Some(style.stroke_color),
            stroke_alpha: Some(style.stroke_alpha),
            stroke_width: Some(style.stroke_width),
        }
    }
}
