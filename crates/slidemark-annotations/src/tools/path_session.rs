//! Gesture core shared by the freehand, polygon and ruler tools.
//!
//! The in-progress shape lives in the registry under a reserved temporary
//! ID. Undo and redo checkpoints are full image-space JSON snapshots.

use slidemark_core::{AnnotationEvent, Point, Result, Shared, StyleOverrides};

use crate::controller::AnnotationsController;
use crate::model::{Shape, ShapeJson, PREVIEW_DASH};
use crate::tools::{DragMode, PathToolConfig, ShapeHistory};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PathFamily {
    Freehand,
    Polygon,
    AreaRuler,
    Ruler,
}

impl PathFamily {
    pub fn temporary_id(self) -> &'static str {
        match self {
            PathFamily::Freehand => "tmp_freehand_path",
            PathFamily::Polygon => "tmp_polygon",
            PathFamily::AreaRuler => "tmp_area_ruler",
            PathFamily::Ruler => "ruler",
        }
    }

    fn closed(self) -> bool {
        self != PathFamily::Ruler
    }

    fn created(self, point: Point) -> Option<AnnotationEvent> {
        match self {
            PathFamily::Freehand => Some(AnnotationEvent::FreehandPolygonCreated { point }),
            PathFamily::Polygon => Some(AnnotationEvent::PolygonCreated { point }),
            PathFamily::AreaRuler => Some(AnnotationEvent::AreaRulerCreated { point }),
            PathFamily::Ruler => Some(AnnotationEvent::RulerCreated),
        }
    }

    fn point_added(self, point: Point) -> Option<AnnotationEvent> {
        match self {
            PathFamily::Freehand => Some(AnnotationEvent::FreehandPolygonUpdated { point }),
            PathFamily::Polygon => Some(AnnotationEvent::PolygonAddPoint { point }),
            _ => None,
        }
    }

    fn paused(self, shape_id: &str) -> Option<AnnotationEvent> {
        let shape_id = shape_id.to_string();
        match self {
            PathFamily::Freehand => Some(AnnotationEvent::FreehandPolygonPaused { shape_id }),
            PathFamily::Polygon => Some(AnnotationEvent::PolygonPaused { shape_id }),
            _ => None,
        }
    }

    fn restored(self, shape_id: &str) -> Option<AnnotationEvent> {
        let shape_id = shape_id.to_string();
        match self {
            PathFamily::Freehand => Some(AnnotationEvent::FreehandPolygonRestored { shape_id }),
            PathFamily::Polygon => Some(AnnotationEvent::PolygonRestored { shape_id }),
            _ => None,
        }
    }

    pub fn saved(self, shape_id: &str) -> Option<AnnotationEvent> {
        let shape_id = shape_id.to_string();
        match self {
            PathFamily::Freehand => Some(AnnotationEvent::FreehandPolygonSaved { shape_id }),
            PathFamily::Polygon => Some(AnnotationEvent::PolygonSaved { shape_id }),
            _ => None,
        }
    }

    pub fn cleared(self) -> Option<AnnotationEvent> {
        match self {
            PathFamily::Freehand => Some(AnnotationEvent::FreehandPolygonCleared),
            PathFamily::Polygon => Some(AnnotationEvent::PolygonCleared),
            _ => None,
        }
    }
}

pub(crate) struct PathSession {
    family: PathFamily,
    controller: Shared<AnnotationsController>,
    config: PathToolConfig,
    history: ShapeHistory,
    /// Element notifications are published on; the canvas when unset.
    target: Option<String>,
    preview_on: bool,
    updated_by_preview: bool,
    hovering: bool,
}

impl PathSession {
    pub fn new(
        family: PathFamily,
        controller: Shared<AnnotationsController>,
        config: PathToolConfig,
    ) -> Self {
        Self {
            family,
            controller,
            config,
            history: ShapeHistory::new(),
            target: None,
            preview_on: false,
            updated_by_preview: false,
            hovering: true,
        }
    }

    pub fn family(&self) -> PathFamily {
        self.family
    }

    pub fn controller(&self) -> &Shared<AnnotationsController> {
        &self.controller
    }

    pub fn shape_id(&self) -> &'static str {
        self.family.temporary_id()
    }

    pub fn config(&self) -> &PathToolConfig {
        &self.config
    }

    pub fn history(&self) -> &ShapeHistory {
        &self.history
    }

    pub fn update_config(&mut self, style: StyleOverrides) {
        self.config.style = style;
    }

    pub fn extend_config(&mut self, style: &StyleOverrides) {
        self.config.style = self.config.style.extended(style);
    }

    pub fn set_label_prefix(&mut self, prefix: Option<&str>) {
        if let Some(prefix) = prefix {
            self.config.label_prefix = prefix.to_string();
        }
    }

    pub fn set_target(&mut self, target: Option<String>) {
        self.target = target;
    }

    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    pub fn preview_active(&self) -> bool {
        self.preview_on
    }

    pub fn exists(&self) -> bool {
        self.controller.borrow().contains_shape(self.shape_id())
    }

    pub fn is_valid(&self) -> bool {
        self.with_shape(Shape::is_valid).unwrap_or(false)
    }

    pub fn with_shape<R>(&self, f: impl FnOnce(&Shape) -> R) -> Option<R> {
        self.controller.borrow().get_shape(self.shape_id()).map(f)
    }

    fn with_shape_mut<R>(&self, f: impl FnOnce(&mut Shape) -> R) -> Option<R> {
        self.controller
            .borrow_mut()
            .get_shape_mut(self.shape_id())
            .map(f)
    }

    /// Image-space JSON of the temporary shape.
    pub fn snapshot(&self) -> Option<ShapeJson> {
        let controller = self.controller.borrow();
        controller
            .get_shape(self.shape_id())
            .map(|shape| shape.to_json(controller.x_offset(), controller.y_offset()))
    }

    pub fn refresh(&self) {
        self.controller.borrow_mut().refresh_view();
    }

    pub fn notify(&self, event: Option<AnnotationEvent>) {
        let Some(event) = event else {
            return;
        };
        let controller = self.controller.borrow();
        match &self.target {
            Some(target) => controller.notify(target, event),
            None => controller.notify_canvas(event),
        }
    }

    fn drawing_style(&self) -> StyleOverrides {
        let mut style = self.config.style.clone();
        if self.family == PathFamily::Ruler {
            style.fill_alpha = Some(0.0);
        }
        style
    }

    fn drop_tentative_point(&mut self) {
        if self.updated_by_preview {
            self.with_shape_mut(|shape| shape.remove_point(None).ok());
            self.updated_by_preview = false;
        }
    }

    // ---- pointer handlers ----

    /// A click ends the preview; the collaborator re-enables it on hover.
    pub fn pointer_down(&mut self, point: Point) {
        self.deactivate_preview();
        if self.exists() {
            if let Some(snapshot) = self.snapshot() {
                self.history.checkpoint(snapshot);
            }
            self.with_shape_mut(|shape| {
                shape.select();
                shape.add_point(point.x, point.y);
            });
            self.refresh();
            self.notify(self.family.point_added(point));
        } else {
            self.create(point);
        }
        self.updated_by_preview = false;
    }

    fn create(&mut self, point: Point) {
        self.history.clear();
        let style = self.drawing_style();
        let id = self.shape_id();
        {
            let mut controller = self.controller.borrow_mut();
            let drawn = if self.family.closed() {
                controller.draw_polygon(id, &[], None, &style, false)
            } else {
                controller.draw_polyline(id, &[], None, &style, false)
            };
            if let Err(e) = drawn {
                tracing::warn!("Unable to start {}: {}", id, e);
                return;
            }
            if let Some(shape) = controller.get_shape_mut(id) {
                shape.select();
                shape.add_point(point.x, point.y);
            }
            controller.refresh_view();
        }
        tracing::debug!("Created {} at ({}, {})", id, point.x, point.y);
        self.notify(self.family.created(point));
    }

    pub fn pointer_drag(&mut self, point: Point) {
        let mode = self.config.drag_mode;
        let steered = self.with_shape_mut(|shape| {
            if mode == DragMode::ReplaceLast {
                shape.remove_point(None).ok();
            }
            shape.add_point(point.x, point.y);
        });
        if steered.is_some() {
            self.refresh();
        }
    }

    pub fn pointer_up(&mut self) {
        if self.exists() {
            self.notify(self.family.paused(self.shape_id()));
        }
    }

    pub fn pointer_move(&mut self, point: Point) {
        if !self.preview_on || !self.hovering {
            return;
        }
        let replace = self.updated_by_preview;
        let moved = self.with_shape_mut(|shape| {
            if replace {
                shape.remove_point(None).ok();
            }
            shape.add_point(point.x, point.y);
        });
        if moved.is_some() {
            self.updated_by_preview = true;
            self.refresh();
        }
    }

    pub fn pointer_enter(&mut self) {
        self.hovering = true;
        if !self.preview_on {
            return;
        }
        let entered = self.with_shape_mut(|shape| {
            shape.open_path();
            shape.deselect();
            shape.enable_dashed_border(PREVIEW_DASH[0], PREVIEW_DASH[1]);
        });
        if entered.is_some() {
            self.refresh();
        }
    }

    pub fn pointer_leave(&mut self) {
        self.hovering = false;
        if !self.preview_on || !self.exists() {
            return;
        }
        self.drop_tentative_point();
        self.solid_appearance();
        self.refresh();
    }

    fn solid_appearance(&self) {
        self.with_shape_mut(|shape| {
            shape.close_path();
            shape.select();
            shape.disable_dashed_border();
        });
    }

    // ---- preview ----

    pub fn activate_preview(&mut self) {
        self.preview_on = true;
    }

    pub fn deactivate_preview(&mut self) {
        if !self.preview_on {
            return;
        }
        self.drop_tentative_point();
        if self.exists() {
            self.solid_appearance();
            self.refresh();
        }
        self.preview_on = false;
    }

    // ---- history ----

    /// Undo: the current state goes to the redo stack.
    pub fn rollback(&mut self) {
        if !self.exists() {
            return;
        }
        self.drop_tentative_point();
        if let Some(snapshot) = self.snapshot() {
            self.history.push_redo(snapshot);
        }
        let previous = self.history.pop_undo();
        let id = self.shape_id();
        let mut controller = self.controller.borrow_mut();
        controller.delete_shape(id, false);
        if let Some(json) = previous {
            if controller.draw_shape_from_json(&json, false).is_ok() {
                controller.select_shape(id, false);
            }
        }
        controller.refresh_view();
    }

    /// Redo: replays the newest redo checkpoint.
    pub fn restore(&mut self) {
        if !self.history.can_redo() {
            return;
        }
        self.drop_tentative_point();
        if let Some(snapshot) = self.snapshot() {
            self.history.push_undo(snapshot);
        }
        let Some(next) = self.history.pop_redo() else {
            return;
        };
        let id = self.shape_id();
        let restored = {
            let mut controller = self.controller.borrow_mut();
            if controller.contains_shape(id) {
                controller.delete_shape(id, false);
            }
            let restored = controller.draw_shape_from_json(&next, false).is_ok();
            if restored {
                controller.select_shape(id, false);
            }
            controller.refresh_view();
            restored
        };
        if restored {
            self.notify(self.family.restored(id));
        }
    }

    // ---- editing ----

    /// Removes the most recent vertex, checkpointing the previous state.
    ///
    /// `EmptyPath` is returned untouched; callers treat it as "clear".
    pub fn remove_last_point(&mut self) -> Result<()> {
        let Some(before) = self.snapshot() else {
            return Ok(());
        };
        self.drop_tentative_point();
        let removed = self.with_shape_mut(|shape| shape.remove_point(None));
        match removed {
            Some(Ok(_)) => {
                self.history.checkpoint(before);
                self.refresh();
                Ok(())
            }
            Some(Err(e)) => Err(e),
            None => Ok(()),
        }
    }

    pub fn simplify(&mut self) {
        let tolerance = self.config.simplify_tolerance;
        if tolerance > 0.0 {
            self.with_shape_mut(|shape| shape.simplify_path(tolerance));
        }
    }

    /// Leaves preview, simplifies and returns the final snapshot.
    pub fn finish(&mut self) -> Option<ShapeJson> {
        if !self.exists() {
            tracing::warn!("There is no {} to save", self.shape_id());
            return None;
        }
        self.deactivate_preview();
        self.simplify();
        self.snapshot()
    }

    /// Deletes the temporary shape and forgets its history.
    ///
    /// Returns true if there was a shape to delete.
    pub fn discard(&mut self) -> bool {
        self.history.clear();
        self.preview_on = false;
        self.updated_by_preview = false;
        let mut controller = self.controller.borrow_mut();
        if controller.contains_shape(self.shape_id()) {
            controller.delete_shape(self.shape_id(), true);
            true
        } else {
            false
        }
    }

    /// Commits the temporary shape as a permanent one under a fresh label.
    pub fn save(&mut self) -> Option<String> {
        let mut json = self.finish()?;
        self.discard();
        let label = {
            let mut controller = self.controller.borrow_mut();
            let label = controller.get_first_available_label(&self.config.label_prefix);
            json.shape_id = label.clone();
            if let Err(e) = controller.draw_shape_from_json(&json, true) {
                tracing::error!("Unable to save {}: {}", label, e);
                return None;
            }
            label
        };
        tracing::info!("Saved {} as {}", self.shape_id(), label);
        self.notify(self.family.saved(&label));
        Some(label)
    }

    pub fn clear(&mut self) {
        self.discard();
        self.notify(self.family.cleared());
    }
}
