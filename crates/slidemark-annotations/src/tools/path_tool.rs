//! Freehand and polygon drawing.

use slidemark_core::{AnnotationError, Point, Shared, StyleOverrides};

use crate::controller::AnnotationsController;
use crate::tools::{
    AnnotationTool, PathFamily, PathSession, PathToolConfig, FREEHAND_DRAWING_TOOL,
    POLYGON_DRAWING_TOOL,
};

/// Multi-click path tool with pause/resume, preview and undo/redo.
///
/// The freehand flavour appends a vertex per drag event by default; the
/// polygon flavour steers the last vertex instead.
pub struct PathDrawingTool {
    session: PathSession,
    save_switch: Option<String>,
}

impl PathDrawingTool {
    pub fn freehand(controller: Shared<AnnotationsController>, config: PathToolConfig) -> Self {
        Self {
            session: PathSession::new(PathFamily::Freehand, controller, config),
            save_switch: None,
        }
    }

    pub fn polygon(controller: Shared<AnnotationsController>, config: PathToolConfig) -> Self {
        Self {
            session: PathSession::new(PathFamily::Polygon, controller, config),
            save_switch: None,
        }
    }

    /// Registry ID of the in-progress shape.
    pub fn temporary_id(&self) -> &'static str {
        self.session.shape_id()
    }

    pub fn config(&self) -> &PathToolConfig {
        self.session.config()
    }

    pub fn update_config(&mut self, style: StyleOverrides) {
        self.session.update_config(style);
    }

    pub fn extend_config(&mut self, style: &StyleOverrides) {
        self.session.extend_config(style);
    }

    pub fn set_label_prefix(&mut self, prefix: Option<&str>) {
        self.session.set_label_prefix(prefix);
    }

    /// Clicking `switch_id` saves the current shape.
    pub fn bind_save_switch(&mut self, switch_id: impl Into<String>) {
        self.save_switch = Some(switch_id.into());
    }

    pub fn shape_exists(&self) -> bool {
        self.session.exists()
    }

    pub fn shape_is_valid(&self) -> bool {
        self.session.is_valid()
    }

    pub fn activate_preview_mode(&mut self) {
        self.session.activate_preview();
    }

    pub fn deactivate_preview_mode(&mut self) {
        self.session.deactivate_preview();
    }

    pub fn preview_mode_active(&self) -> bool {
        self.session.preview_active()
    }

    pub fn can_undo(&self) -> bool {
        self.session.history().can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.session.history().can_redo()
    }

    pub fn rollback(&mut self) {
        self.session.rollback();
    }

    pub fn restore(&mut self) {
        self.session.restore();
    }

    /// Removing from an empty path discards the whole shape.
    pub fn remove_last_point(&mut self) {
        match self.session.remove_last_point() {
            Ok(()) => {}
            Err(AnnotationError::EmptyPath { .. }) => self.session.clear(),
            Err(e) => tracing::warn!("Unable to remove point: {}", e),
        }
    }

    /// Returns the label of the saved shape.
    pub fn save(&mut self) -> Option<String> {
        self.session.save()
    }

    pub fn clear(&mut self) {
        self.session.clear();
    }
}

impl AnnotationTool for PathDrawingTool {
    fn label(&self) -> &'static str {
        match self.session.family() {
            PathFamily::Freehand => FREEHAND_DRAWING_TOOL,
            _ => POLYGON_DRAWING_TOOL,
        }
    }

    fn on_pointer_down(&mut self, point: Point) {
        self.session.pointer_down(point);
    }

    fn on_pointer_drag(&mut self, point: Point) {
        self.session.pointer_drag(point);
    }

    fn on_pointer_up(&mut self, _point: Point) {
        self.session.pointer_up();
    }

    fn on_pointer_move(&mut self, point: Point) {
        self.session.pointer_move(point);
    }

    fn on_pointer_enter(&mut self) {
        self.session.pointer_enter();
    }

    fn on_pointer_leave(&mut self) {
        self.session.pointer_leave();
    }

    fn switch_pressed(&mut self, switch_id: &str) {
        if self.save_switch.as_deref() == Some(switch_id) {
            self.save();
        }
    }
}
