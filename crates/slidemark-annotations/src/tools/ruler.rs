//! Length ruler.

use std::collections::HashMap;

use serde::Serialize;
use slidemark_core::{AnnotationError, AnnotationEvent, Point, Result, Shared, StyleOverrides};

use crate::controller::AnnotationsController;
use crate::model::ShapeJson;
use crate::tools::{AnnotationTool, PathFamily, PathSession, PathToolConfig, MEASURING_TOOL};

/// Decimals used for the live measure stored on the output.
pub(crate) const OUTPUT_DECIMALS: u32 = 2;

/// The UI element a ruler reports to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RulerOutput {
    pub element_id: String,
    pub measure: Option<f64>,
    pub ruler_json: Option<ShapeJson>,
}

impl RulerOutput {
    pub fn new(element_id: impl Into<String>) -> Self {
        Self {
            element_id: element_id.into(),
            measure: None,
            ruler_json: None,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct RulerSwitch {
    pub output_id: String,
    /// Saves the ruler when clicked.
    pub switch_off: Option<String>,
}

/// Polyline ruler measuring its length in physical units.
pub struct RulerTool {
    session: PathSession,
    image_mpp: f64,
    switches: HashMap<String, RulerSwitch>,
    output: Option<RulerOutput>,
}

impl RulerTool {
    pub fn new(
        controller: Shared<AnnotationsController>,
        config: PathToolConfig,
        image_mpp: f64,
    ) -> Self {
        Self {
            session: PathSession::new(PathFamily::Ruler, controller, config),
            image_mpp,
            switches: HashMap::new(),
            output: None,
        }
    }

    pub fn config(&self) -> &PathToolConfig {
        self.session.config()
    }

    /// The fill alpha stays forced to 0 whatever the overrides say.
    pub fn update_config(&mut self, style: StyleOverrides) {
        self.session.update_config(style);
    }

    pub fn extend_config(&mut self, style: &StyleOverrides) {
        self.session.extend_config(style);
    }

    pub fn set_label_prefix(&mut self, prefix: Option<&str>) {
        self.session.set_label_prefix(prefix);
    }

    pub fn image_mpp(&self) -> f64 {
        self.image_mpp
    }

    /// Wires a start switch (and optionally a save switch) to an output.
    pub fn bind(
        &mut self,
        switch_on_id: &str,
        switch_off_id: Option<&str>,
        output_id: Option<&str>,
    ) -> Result<()> {
        let Some(output_id) = output_id else {
            return Err(AnnotationError::MissingRequiredBinding {
                tool: MEASURING_TOOL.to_string(),
                binding: "output".to_string(),
            });
        };
        self.switches.insert(
            switch_on_id.to_string(),
            RulerSwitch {
                output_id: output_id.to_string(),
                switch_off: switch_off_id.map(str::to_string),
            },
        );
        Ok(())
    }

    /// Starts reporting to `output_id`.
    pub fn start(&mut self, output_id: &str) {
        self.output = Some(RulerOutput::new(output_id));
        self.session.set_target(Some(output_id.to_string()));
        self.session.notify(Some(AnnotationEvent::StartNewRuler));
    }

    pub fn output(&self) -> Option<&RulerOutput> {
        self.output.as_ref()
    }

    pub fn ruler_exists(&self) -> bool {
        self.session.exists()
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

    pub fn remove_last_point(&mut self) {
        match self.session.remove_last_point() {
            Ok(()) => {}
            Err(AnnotationError::EmptyPath { .. }) => self.clear_ruler(false),
            Err(e) => tracing::warn!("Unable to remove point: {}", e),
        }
    }

    /// Perimeter times the image pixel size.
    pub fn get_ruler_measure(&self, decimals: u32) -> Option<f64> {
        self.session
            .with_shape(|shape| shape.get_perimeter(self.image_mpp, decimals))
            .flatten()
    }

    fn update_output_measure(&mut self) -> Option<f64> {
        let measure = self.get_ruler_measure(OUTPUT_DECIMALS);
        if let Some(output) = self.output.as_mut() {
            output.measure = measure;
        }
        measure
    }

    /// Stores the ruler JSON on the output under a fresh label and clears it.
    pub fn save(&mut self) -> Option<ShapeJson> {
        let mut json = self.session.finish()?;
        json.shape_id = self
            .session
            .controller()
            .borrow()
            .get_first_available_label(&self.session.config().label_prefix);
        self.update_output_measure();
        if let Some(output) = self.output.as_mut() {
            output.ruler_json = Some(json.clone());
        }
        self.clear_ruler(true);
        Some(json)
    }

    pub fn clear(&mut self) {
        self.clear_ruler(false);
    }

    fn clear_ruler(&mut self, saved: bool) {
        self.session.discard();
        self.session.notify(Some(AnnotationEvent::RulerCleared { saved }));
    }
}

impl AnnotationTool for RulerTool {
    fn label(&self) -> &'static str {
        MEASURING_TOOL
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
        self.session.notify(Some(AnnotationEvent::RulerUpdated { measure }));
    }

    fn switch_pressed(&mut self, switch_id: &str) {
        if let Some(binding) = self.switches.get(switch_id).cloned() {
            self.start(&binding.output_id);
            return;
        }
        let saves = self
            .switches
            .values()
            .any(|b| b.switch_off.as_deref() == Some(switch_id));
        if saves {
            self.save();
        }
    }
}
