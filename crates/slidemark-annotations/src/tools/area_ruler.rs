//! Area ruler, optionally clipped to another shape on save.

use std::collections::HashMap;

use slidemark_core::{AnnotationError, AnnotationEvent, Point, Result, Shared, StyleOverrides};

use crate::adapter::extract_path_segments;
use crate::controller::AnnotationsController;
use crate::engine::Segment;
use crate::model::ShapeJson;
use crate::tools::ruler::{RulerOutput, OUTPUT_DECIMALS};
use crate::tools::{AnnotationTool, PathFamily, PathSession, PathToolConfig, AREA_MEASURING_TOOL};

enum Adaptation {
    Unchanged,
    Replace(Vec<Segment>),
    Empty,
}

/// Polygon ruler measuring its area in physical units.
pub struct AreaRulerTool {
    session: PathSession,
    image_mpp: f64,
    /// Start switch ID to output ID.
    switches: HashMap<String, String>,
    output: Option<RulerOutput>,
    bound_shape: Option<String>,
}

impl AreaRulerTool {
    pub fn new(
        controller: Shared<AnnotationsController>,
        config: PathToolConfig,
        image_mpp: f64,
    ) -> Self {
        Self {
            session: PathSession::new(PathFamily::AreaRuler, controller, config),
            image_mpp,
            switches: HashMap::new(),
            output: None,
            bound_shape: None,
        }
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

    pub fn bind(&mut self, switch_id: &str, output_id: Option<&str>) -> Result<()> {
        let Some(output_id) = output_id else {
            return Err(AnnotationError::MissingRequiredBinding {
                tool: AREA_MEASURING_TOOL.to_string(),
                binding: "output".to_string(),
            });
        };
        self.switches.insert(switch_id.to_string(), output_id.to_string());
        Ok(())
    }

    pub fn start(&mut self, output_id: &str) {
        self.output = Some(RulerOutput::new(output_id));
        self.session.set_target(Some(output_id.to_string()));
        self.session.notify(Some(AnnotationEvent::StartNewAreaRuler));
    }

    pub fn output(&self) -> Option<&RulerOutput> {
        self.output.as_ref()
    }

    /// Clip the ruler to `shape_id` when saving.
    pub fn bind_to_shape(&mut self, shape_id: &str) {
        self.bound_shape = Some(shape_id.to_string());
    }

    pub fn unbind_shape(&mut self) {
        self.bound_shape = None;
    }

    pub fn bound_shape(&self) -> Option<&str> {
        self.bound_shape.as_deref()
    }

    pub fn ruler_exists(&self) -> bool {
        self.session.exists()
    }

    pub fn rollback(&mut self) {
        self.session.rollback();
    }

    pub fn restore(&mut self) {
        self.session.restore();
    }

    pub fn remove_last_point(&mut self) {
        match self.session.remove_last_point() {
            Ok(()) => {}
            Err(AnnotationError::EmptyPath { .. }) => self.clear_ruler(false),
            Err(e) => tracing::warn!("Unable to remove point: {}", e),
        }
    }

    /// Area times the squared image pixel size.
    pub fn get_area_ruler_measure(&self, decimals: u32) -> Option<f64> {
        self.session
            .with_shape(|shape| shape.get_area(self.image_mpp, decimals))
            .flatten()
    }

    fn update_output_measure(&mut self) -> Option<f64> {
        let measure = self.get_area_ruler_measure(OUTPUT_DECIMALS);
        if let Some(output) = self.output.as_mut() {
            output.measure = measure;
        }
        measure
    }

    fn adaptation(&self, target_id: &str) -> Option<Adaptation> {
        let controller = self.session.controller().borrow();
        let target = controller.get_shape(target_id)?;
        let ruler = controller.get_shape(self.session.shape_id())?;
        if target.contains_shape(ruler) {
            return Some(Adaptation::Unchanged);
        }
        if !target.intersects_shape(ruler) && !ruler.contains_shape(target) {
            return Some(Adaptation::Empty);
        }
        let segments = target
            .get_intersection(ruler)
            .map(|clip| extract_path_segments(&clip, controller.x_offset(), controller.y_offset()))
            .unwrap_or_default();
        if segments.len() < 3 {
            Some(Adaptation::Empty)
        } else {
            Some(Adaptation::Replace(segments))
        }
    }

    /// Replaces the ruler by its overlap with the bound shape.
    ///
    /// Returns false when no overlap is left and the ruler was deleted.
    fn adapt_to_bound_shape(&mut self) -> bool {
        let Some(target_id) = self.bound_shape.clone() else {
            return true;
        };
        let id = self.session.shape_id();
        match self.adaptation(&target_id) {
            None => {
                tracing::warn!("Bound shape {} not found, keeping {} as drawn", target_id, id);
                true
            }
            Some(Adaptation::Unchanged) => true,
            Some(Adaptation::Empty) => {
                tracing::info!("{} does not overlap {}", id, target_id);
                self.session.controller().borrow_mut().delete_shape(id, true);
                self.session
                    .notify(Some(AnnotationEvent::AreaRulerEmptyIntersection));
                false
            }
            Some(Adaptation::Replace(segments)) => {
                let Some(mut json) = self.session.snapshot() else {
                    return false;
                };
                json.set_segments(segments);
                let mut controller = self.session.controller().borrow_mut();
                controller.delete_shape(id, false);
                if let Err(e) = controller.draw_shape_from_json(&json, true) {
                    tracing::error!("Unable to adapt {} to {}: {}", id, target_id, e);
                    return false;
                }
                true
            }
        }
    }

    /// Simplify, clip to the bound shape, store on the output, then clear.
    pub fn save(&mut self) -> Option<ShapeJson> {
        self.session.finish()?;
        let stored = if self.adapt_to_bound_shape() {
            self.session.snapshot().map(|mut json| {
                json.shape_id = self
                    .session
                    .controller()
                    .borrow()
                    .get_first_available_label(&self.session.config().label_prefix);
                json
            })
        } else {
            None
        };
        if let (Some(output), Some(json)) = (self.output.as_mut(), stored.as_ref()) {
            output.ruler_json = Some(json.clone());
        }
        self.update_output_measure();
        self.clear_ruler(stored.is_some());
        stored
    }

    pub fn clear(&mut self) {
        self.clear_ruler(false);
    }

    fn clear_ruler(&mut self, saved: bool) {
        self.session.discard();
        self.session.notify(Some(AnnotationEvent::AreaRulerCleared { saved }));
    }
}

impl AnnotationTool for AreaRulerTool {
    fn label(&self) -> &'static str {
        AREA_MEASURING_TOOL
    }

    fn on_pointer_down(&mut self, point: Point) {
        self.session.pointer_down(point);
    }

    fn on_pointer_drag(&mut self, point: Point) {
        self.session.pointer_drag(point);
    }

    fn on_pointer_up(&mut self, _point: Point) {
        if !self.session.exists() {
            return;
        }
        let measure = self.update_output_measure();
        self.session.notify(Some(AnnotationEvent::AreaRulerUpdated { measure }));
    }

    fn switch_pressed(&mut self, switch_id: &str) {
        if let Some(output_id) = self.switches.get(switch_id).cloned() {
            self.start(&output_id);
        }
    }
}
