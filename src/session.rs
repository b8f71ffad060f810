//! Scripted annotation sessions.
//!
//! A session file describes the viewer, the tools to set up and a list of
//! steps (tool activation, pointer input, tool actions, shape batches).
//! Replaying it drives the annotation tools exactly as a UI would and
//! reports the resulting shapes, ruler outputs and notifications.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use slidemark_annotations::{
    AnnotationsController, PointerEvent, RulerOutput, ShapeJson, StaticViewer, ToolSwitchboard,
};
use slidemark_core::{shared, CanvasNotification, Shared, Size};
use slidemark_settings::AnnotationSettings;

fn default_canvas_id() -> String {
    "annotations_canvas".to_string()
}

/// Viewer geometry the annotation canvas is built against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewerDimensions {
    pub image: Size,
    pub canvas: Size,
}

/// A tool to initialize, with its UI bindings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "tool", rename_all = "snake_case")]
pub enum ToolSetup {
    Freehand {
        #[serde(default)]
        switch: Option<String>,
    },
    Polygon {
        #[serde(default)]
        switch: Option<String>,
        #[serde(default)]
        save_switch: Option<String>,
    },
    AreaRuler {
        #[serde(default)]
        switch: Option<String>,
        #[serde(default)]
        output: Option<String>,
    },
    Ruler {
        #[serde(default)]
        switch_on: Option<String>,
        #[serde(default)]
        switch_off: Option<String>,
        #[serde(default)]
        output: Option<String>,
    },
    Marker {
        #[serde(default)]
        switch: Option<String>,
    },
}

/// Tool addressed by an action step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    Freehand,
    Polygon,
    AreaRuler,
    Ruler,
    Marker,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolAction {
    Save,
    Clear,
    Rollback,
    Restore,
    RemoveLastPoint,
    PreviewOn,
    PreviewOff,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum Step {
    Activate {
        tool: String,
        #[serde(default)]
        disable_events_on_shapes: bool,
    },
    Pointer {
        event: PointerEvent,
    },
    PressSwitch {
        switch: String,
    },
    Action {
        tool: ToolKind,
        action: ToolAction,
    },
    DrawShapes {
        shapes: Vec<serde_json::Value>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default = "default_canvas_id")]
    pub canvas_id: String,
    pub viewer: ViewerDimensions,
    #[serde(default)]
    pub tools: Vec<ToolSetup>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Session {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read session {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse session {}", path.display()))
    }
}

/// Outcome of a replay.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplayReport {
    /// Registered shapes, in image space.
    pub shapes: Vec<ShapeJson>,
    pub rulers: Vec<RulerOutput>,
    pub notifications: Vec<CanvasNotification>,
}

/// A live annotation canvas driven by session steps.
#[derive(Debug)]
pub struct SessionReplay {
    controller: Shared<AnnotationsController>,
    switchboard: ToolSwitchboard,
}

impl SessionReplay {
    pub fn new(session: &Session, settings: &AnnotationSettings) -> Result<Self> {
        let mut controller =
            AnnotationsController::new(session.canvas_id.clone(), settings.default_style.clone());
        controller.build_annotations_canvas(&StaticViewer::new(
            session.viewer.image,
            session.viewer.canvas,
        ));
        let controller = shared(controller);
        let mut switchboard = ToolSwitchboard::new(controller.clone());
        for setup in &session.tools {
            Self::initialize(&mut switchboard, setup, settings)?;
        }
        Ok(Self {
            controller,
            switchboard,
        })
    }

    fn initialize(
        switchboard: &mut ToolSwitchboard,
        setup: &ToolSetup,
        settings: &AnnotationSettings,
    ) -> Result<()> {
        match setup {
            ToolSetup::Freehand { switch } => {
                switchboard
                    .initialize_freehand_drawing_tool(settings.freehand_config(), switch.as_deref());
            }
            ToolSetup::Polygon {
                switch,
                save_switch,
            } => {
                switchboard.initialize_polygon_drawing_tool(
                    settings.polygon_config(),
                    switch.as_deref(),
                    save_switch.as_deref(),
                );
            }
            ToolSetup::AreaRuler { switch, output } => {
                switchboard
                    .initialize_area_measuring_tool(settings.area_ruler_config(), settings.image_mpp);
                if let Some(switch) = switch {
                    switchboard
                        .bind_to_area_ruler(switch, output.as_deref())
                        .context("Failed to bind area ruler")?;
                }
            }
            ToolSetup::Ruler {
                switch_on,
                switch_off,
                output,
            } => {
                switchboard.initialize_measuring_tool(settings.ruler_config(), settings.image_mpp);
                if let Some(switch_on) = switch_on {
                    switchboard
                        .bind_to_ruler(switch_on, switch_off.as_deref(), output.as_deref())
                        .context("Failed to bind ruler")?;
                }
            }
            ToolSetup::Marker { switch } => {
                switchboard.initialize_image_marking_tool(settings.marker.clone(), switch.as_deref());
            }
        }
        Ok(())
    }

    pub fn switchboard(&self) -> &ToolSwitchboard {
        &self.switchboard
    }

    pub fn apply(&mut self, step: &Step) {
        match step {
            Step::Activate {
                tool,
                disable_events_on_shapes,
            } => {
                self.switchboard.activate_tool(tool, *disable_events_on_shapes);
            }
            Step::Pointer { event } => {
                if !self.switchboard.dispatch(*event) {
                    tracing::debug!("Pointer event {:?} dropped", event);
                }
            }
            Step::PressSwitch { switch } => self.switchboard.press_switch(switch),
            Step::Action { tool, action } => self.run_action(*tool, *action),
            Step::DrawShapes { shapes } => {
                let drawn = self
                    .controller
                    .borrow_mut()
                    .draw_shapes_from_json(shapes, true);
                tracing::debug!("Drew {} of {} shapes", drawn.len(), shapes.len());
            }
        }
    }

    fn run_action(&mut self, kind: ToolKind, action: ToolAction) {
        let unsupported = || tracing::warn!("Action {:?} not supported by {:?}", action, kind);
        match kind {
            ToolKind::Freehand | ToolKind::Polygon => {
                let tool = if kind == ToolKind::Freehand {
                    self.switchboard.freehand_tool()
                } else {
                    self.switchboard.polygon_tool()
                };
                let Some(tool) = tool else {
                    tracing::warn!("Tool {:?} not initialized", kind);
                    return;
                };
                let mut tool = tool.borrow_mut();
                match action {
                    ToolAction::Save => {
                        tool.save();
                    }
                    ToolAction::Clear => tool.clear(),
                    ToolAction::Rollback => tool.rollback(),
                    ToolAction::Restore => tool.restore(),
                    ToolAction::RemoveLastPoint => tool.remove_last_point(),
                    ToolAction::PreviewOn => tool.activate_preview_mode(),
                    ToolAction::PreviewOff => tool.deactivate_preview_mode(),
                }
            }
            ToolKind::AreaRuler => {
                let Some(tool) = self.switchboard.area_ruler_tool() else {
                    tracing::warn!("Tool {:?} not initialized", kind);
                    return;
                };
                let mut tool = tool.borrow_mut();
                match action {
                    ToolAction::Save => {
                        tool.save();
                    }
                    ToolAction::Clear => tool.clear(),
                    ToolAction::Rollback => tool.rollback(),
                    ToolAction::Restore => tool.restore(),
                    ToolAction::RemoveLastPoint => tool.remove_last_point(),
                    ToolAction::PreviewOn | ToolAction::PreviewOff => unsupported(),
                }
            }
            ToolKind::Ruler => {
                let Some(tool) = self.switchboard.ruler_tool() else {
                    tracing::warn!("Tool {:?} not initialized", kind);
                    return;
                };
                let mut tool = tool.borrow_mut();
                match action {
                    ToolAction::Save => {
                        tool.save();
                    }
                    ToolAction::Clear => tool.clear(),
                    ToolAction::Rollback => tool.rollback(),
                    ToolAction::Restore => tool.restore(),
                    ToolAction::RemoveLastPoint => tool.remove_last_point(),
                    ToolAction::PreviewOn | ToolAction::PreviewOff => unsupported(),
                }
            }
            ToolKind::Marker => {
                let Some(tool) = self.switchboard.marker_tool() else {
                    tracing::warn!("Tool {:?} not initialized", kind);
                    return;
                };
                match action {
                    ToolAction::Clear => tool.borrow_mut().clear_markers(),
                    _ => unsupported(),
                }
            }
        }
    }

    pub fn report(&self) -> ReplayReport {
        let controller = self.controller.borrow();
        let mut rulers = Vec::new();
        if let Some(tool) = self.switchboard.area_ruler_tool() {
            rulers.extend(tool.borrow().output().cloned());
        }
        if let Some(tool) = self.switchboard.ruler_tool() {
            rulers.extend(tool.borrow().output().cloned());
        }
        ReplayReport {
            shapes: controller.get_shapes_json(None),
            rulers,
            notifications: controller.events().history(),
        }
    }
}

/// Replays every step of `session` and reports the final state.
pub fn replay(session: &Session, settings: &AnnotationSettings) -> Result<ReplayReport> {
    let mut replay = SessionReplay::new(session, settings)?;
    for step in &session.steps {
        replay.apply(step);
    }
    let report = replay.report();
    tracing::info!(
        "Replayed {} steps: {} shapes",
        session.steps.len(),
        report.shapes.len()
    );
    Ok(report)
}
