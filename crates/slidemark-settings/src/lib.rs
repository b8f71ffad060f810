//! Slidemark Settings Crate
//!
//! Annotation defaults (shape style, per-tool settings, pixel size) and
//! their JSON/TOML persistence.

pub mod config;
pub mod error;

pub use config::{AnnotationSettings, MarkerSettings, PathToolSettings};
pub use error::{ConfigError, ConfigResult, SettingsError, SettingsResult};
