//! Drawing tools.
//!
//! Each tool is a small state machine fed with canvas-space pointer events
//! by the [`crate::switchboard::ToolSwitchboard`]. Tools share the canvas
//! registry through `Shared<AnnotationsController>` and never hold a borrow
//! across calls.

use serde::{Deserialize, Serialize};
use slidemark_core::{Point, StyleOverrides};

mod area_ruler;
mod dummy;
pub mod history;
mod marker;
mod path_session;
mod path_tool;
mod ruler;

pub use area_ruler::AreaRulerTool;
pub use dummy::DummyTool;
pub use history::ShapeHistory;
pub use marker::{MarkerConfig, MarkerTool, MARKER_LABEL_PREFIX};
pub use path_tool::PathDrawingTool;
pub use ruler::{RulerOutput, RulerTool};

pub(crate) use path_session::{PathFamily, PathSession};

pub const DUMMY_TOOL: &str = "dummy_tool";
pub const FREEHAND_DRAWING_TOOL: &str = "freehand_drawer";
pub const POLYGON_DRAWING_TOOL: &str = "polygon_drawer";
pub const AREA_MEASURING_TOOL: &str = "area_measuring_tool";
pub const MEASURING_TOOL: &str = "measuring_tool";
pub const IMAGE_MARKING_TOOL: &str = "image_marker";

/// Default simplification tolerance applied on save, in canvas units.
pub const DEFAULT_SIMPLIFY_TOLERANCE: f64 = 2.5;

/// Pointer input on the drawing surface, in canvas space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PointerEvent {
    Down { x: f64, y: f64 },
    Drag { x: f64, y: f64 },
    Up { x: f64, y: f64 },
    Move { x: f64, y: f64 },
    Enter,
    Leave,
}

/// What a drag does to an active path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragMode {
    /// Every drag position becomes a new vertex.
    Append,
    /// Dragging steers the most recently placed vertex.
    #[default]
    ReplaceLast,
}

/// Settings shared by the path-based tools.
#[derive(Debug, Clone, PartialEq)]
pub struct PathToolConfig {
    pub style: StyleOverrides,
    pub label_prefix: String,
    pub drag_mode: DragMode,
    pub simplify_tolerance: f64,
}

impl PathToolConfig {
    pub fn freehand() -> Self {
        Self {
            style: StyleOverrides::default(),
            label_prefix: "polygon".to_string(),
            drag_mode: DragMode::ReplaceLast,
            simplify_tolerance: DEFAULT_SIMPLIFY_TOLERANCE,
        }
    }

    pub fn polygon() -> Self {
        Self::freehand()
    }

    /// Freehand stroking: every drag position becomes a vertex.
    pub fn freehand_stroke() -> Self {
        Self {
            drag_mode: DragMode::Append,
            ..Self::freehand()
        }
    }

    pub fn area_ruler() -> Self {
        Self {
            label_prefix: "area_ruler".to_string(),
            ..Self::polygon()
        }
    }

    pub fn ruler() -> Self {
        Self {
            label_prefix: "ruler".to_string(),
            ..Self::polygon()
        }
    }
}

/// Event handlers a tool installs on the drawing surface.
///
/// Handlers default to no-ops, which is all the dummy tool needs.
pub trait AnnotationTool {
    fn label(&self) -> &'static str;

    fn on_pointer_down(&mut self, _point: Point) {}
    fn on_pointer_drag(&mut self, _point: Point) {}
    fn on_pointer_up(&mut self, _point: Point) {}
    fn on_pointer_move(&mut self, _point: Point) {}
    fn on_pointer_enter(&mut self) {}
    fn on_pointer_leave(&mut self) {}

    /// A UI switch was clicked; tools ignore switches they did not bind.
    fn switch_pressed(&mut self, _switch_id: &str) {}

    fn handle(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Down { x, y } => self.on_pointer_down(Point::new(x, y)),
            PointerEvent::Drag { x, y } => self.on_pointer_drag(Point::new(x, y)),
            PointerEvent::Up { x, y } => self.on_pointer_up(Point::new(x, y)),
            PointerEvent::Move { x, y } => self.on_pointer_move(Point::new(x, y)),
            PointerEvent::Enter => self.on_pointer_enter(),
            PointerEvent::Leave => self.on_pointer_leave(),
        }
    }
}
