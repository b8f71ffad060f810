//! # Slidemark Annotations
//!
//! Geometric annotations drawn over a deep-zoom slide image: the shape
//! model, the per-canvas shape registry, and the interactive drawing tools
//! (freehand, polygon, area and length rulers, markers).
//!
//! Coordinates passed to the registry are in image space; pointer events
//! fed to the tools are in canvas space (origin at the canvas center).

pub mod adapter;
pub mod controller;
pub mod engine;
pub mod model;
pub mod switchboard;
pub mod tools;

pub use adapter::{
    build_matrix, color_to_hex, extract_path_segments, hex_to_color, parse_external_transform,
    translation_matrix, try_parse_transform, Color, HexColor, Matrix,
};
pub use controller::{AnnotationsController, DeletionWatcher, ImageViewer, StaticViewer};
pub use engine::{Geometry, PathGeometry, Primitive, Scene, Segment};
pub use model::{
    AnnotationPath, Circle, Ellipse, GeometryJson, Line, Rectangle, Shape, ShapeGeometry,
    ShapeJson, ShapeKind, ShapeType, SHAPE_TYPES,
};
pub use switchboard::ToolSwitchboard;
pub use tools::{
    AnnotationTool, AreaRulerTool, DragMode, MarkerConfig, MarkerTool, PathDrawingTool,
    PathToolConfig, PointerEvent, RulerOutput, RulerTool, ShapeHistory,
};
