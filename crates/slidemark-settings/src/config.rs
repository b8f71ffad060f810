//! Annotation settings file.
//!
//! Every section is optional in the file; missing values fall back to the
//! defaults the tools ship with.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use slidemark_annotations::{DragMode, MarkerConfig, PathToolConfig};
use slidemark_core::{is_hex_color, ShapeStyle, StyleOverrides};

use crate::error::{ConfigError, ConfigResult, SettingsError, SettingsResult};

pub type MarkerSettings = MarkerConfig;

/// Per-tool overrides for the path-based tools.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathToolSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label_prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drag_mode: Option<DragMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub simplify_tolerance: Option<f64>,
    pub style: StyleOverrides,
}

impl PathToolSettings {
    /// Layers these settings over a tool's built-in configuration.
    pub fn apply_to(&self, base: PathToolConfig) -> PathToolConfig {
        PathToolConfig {
            style: base.style.extended(&self.style),
            label_prefix: self.label_prefix.clone().unwrap_or(base.label_prefix),
            drag_mode: self.drag_mode.unwrap_or(base.drag_mode),
            simplify_tolerance: self.simplify_tolerance.unwrap_or(base.simplify_tolerance),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Toml,
}

impl Format {
    fn from_path(path: &Path) -> ConfigResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Format::Json),
            Some("toml") => Ok(Format::Toml),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or_default().to_string(),
            )),
        }
    }
}

/// Complete annotation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotationSettings {
    /// Physical pixel size (microns per pixel) used by the rulers.
    pub image_mpp: f64,
    pub default_style: ShapeStyle,
    pub freehand: PathToolSettings,
    pub polygon: PathToolSettings,
    pub area_ruler: PathToolSettings,
    pub ruler: PathToolSettings,
    pub marker: MarkerSettings,
}

impl Default for AnnotationSettings {
    fn default() -> Self {
        Self {
            image_mpp: 1.0,
            default_style: ShapeStyle::default(),
            freehand: PathToolSettings::default(),
            polygon: PathToolSettings::default(),
            area_ruler: PathToolSettings::default(),
            ruler: PathToolSettings::default(),
            marker: MarkerSettings::default(),
        }
    }
}

impl AnnotationSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// `<config dir>/slidemark/settings.toml`
    pub fn default_path() -> SettingsResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("slidemark").join("settings.toml"))
            .ok_or_else(|| {
                SettingsError::ConfigDirectory("no configuration directory".to_string())
            })
    }

    /// Load settings from a `.json` or `.toml` file and validate them.
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = Format::from_path(path)?;
        let content = fs::read_to_string(path)?;
        let settings: Self = match format {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };
        settings.validate()?;
        tracing::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Like [`Self::load_from_file`], but a missing file yields the defaults.
    pub fn load_or_default(path: &Path) -> SettingsResult<Self> {
        if !path.exists() {
            tracing::warn!(
                "Settings file {} not found, using defaults",
                path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_file(path)
    }

    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        let format = Format::from_path(path)?;
        self.validate()?;
        let content = match format {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        tracing::debug!("Saved settings to {}", path.display());
        Ok(())
    }

    pub fn validate(&self) -> ConfigResult<()> {
        positive("image_mpp", self.image_mpp)?;
        validate_style("default_style", &self.default_style.clone().into())?;
        for (name, section) in [
            ("freehand", &self.freehand),
            ("polygon", &self.polygon),
            ("area_ruler", &self.area_ruler),
            ("ruler", &self.ruler),
        ] {
            validate_style(&format!("{}.style", name), &section.style)?;
            if let Some(tolerance) = section.simplify_tolerance {
                non_negative(&format!("{}.simplify_tolerance", name), tolerance)?;
            }
        }
        positive("marker.marker_size", self.marker.marker_size)?;
        validate_style("marker.style", &self.marker.style)?;
        Ok(())
    }

    pub fn freehand_config(&self) -> PathToolConfig {
        self.freehand.apply_to(PathToolConfig::freehand())
    }

    pub fn polygon_config(&self) -> PathToolConfig {
        self.polygon.apply_to(PathToolConfig::polygon())
    }

    pub fn area_ruler_config(&self) -> PathToolConfig {
        self.area_ruler.apply_to(PathToolConfig::area_ruler())
    }

    pub fn ruler_config(&self) -> PathToolConfig {
        self.ruler.apply_to(PathToolConfig::ruler())
    }
}

fn out_of_range(key: &str, value: f64) -> ConfigError {
    ConfigError::ValueOutOfRange {
        key: key.to_string(),
        value: value.to_string(),
    }
}

fn positive(key: &str, value: f64) -> ConfigResult<()> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(out_of_range(key, value))
    }
}

fn non_negative(key: &str, value: f64) -> ConfigResult<()> {
    if value >= 0.0 {
        Ok(())
    } else {
        Err(out_of_range(key, value))
    }
}

fn validate_style(prefix: &str, style: &StyleOverrides) -> ConfigResult<()> {
    for (field, color) in [
        ("fill_color", &style.fill_color),
        ("stroke_color", &style.stroke_color),
    ] {
        if let Some(color) = color {
            if !is_hex_color(color) {
                return Err(ConfigError::InvalidColor {
                    key: format!("{}.{}", prefix, field),
                    value: color.clone(),
                });
            }
        }
    }
    for (field, alpha) in [
        ("fill_alpha", style.fill_alpha),
        ("stroke_alpha", style.stroke_alpha),
    ] {
        if let Some(alpha) = alpha {
            if !(0.0..=1.0).contains(&alpha) {
                return Err(out_of_range(&format!("{}.{}", prefix, field), alpha));
            }
        }
    }
    if let Some(width) = style.stroke_width {
        non_negative(&format!("{}.stroke_width", prefix), width)?;
    }
    Ok(())
}
