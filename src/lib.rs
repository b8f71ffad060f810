//! # Slidemark
//!
//! Interactive geometric annotations for deep-zoom slide images: point
//! markers, freehand shapes, polygons, and length and area rulers drawn
//! on a canvas overlaid on the image.
//!
//! ## Architecture
//!
//! Slidemark is organized as a workspace with multiple crates:
//!
//! 1. **slidemark-core** - Points, styles, errors, canvas notifications
//! 2. **slidemark-annotations** - Shape model, shape registry, drawing tools, switchboard
//! 3. **slidemark-settings** - Annotation settings files
//! 4. **slidemark** - Session replay binary that integrates all crates

pub mod session;

pub use slidemark_core::{
    AnnotationError, AnnotationEvent, BoundingBox, CanvasNotification, EventBus, Point, Result,
    ShapeStyle, Size, StyleOverrides,
};

pub use slidemark_annotations::{
    AnnotationTool, AnnotationsController, AreaRulerTool, DragMode, ImageViewer, MarkerConfig,
    MarkerTool, PathDrawingTool, PathToolConfig, PointerEvent, RulerOutput, RulerTool, Shape,
    ShapeJson, ShapeType, StaticViewer, ToolSwitchboard,
};

pub use slidemark_settings::{AnnotationSettings, PathToolSettings, SettingsError};

pub use session::{replay, ReplayReport, Session, SessionReplay, Step};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output on stderr (stdout carries the replay report)
/// - RUST_LOG environment variable support, `info` by default
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))?;

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
