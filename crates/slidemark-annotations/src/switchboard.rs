//! Exclusive tool activation.
//!
//! Only the active tool sees pointer events. Every real tool is preceded
//! by the dummy tool, so the surface always has a handler to fall back on.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use slidemark_core::{shared, Result, Shared};

use crate::controller::AnnotationsController;
use crate::tools::{
    AnnotationTool, AreaRulerTool, DummyTool, MarkerConfig, MarkerTool, PathDrawingTool,
    PathToolConfig, PointerEvent, RulerTool, AREA_MEASURING_TOOL, DUMMY_TOOL,
    FREEHAND_DRAWING_TOOL, IMAGE_MARKING_TOOL, MEASURING_TOOL, POLYGON_DRAWING_TOOL,
};

type ToolHandle = Rc<RefCell<dyn AnnotationTool>>;

pub struct ToolSwitchboard {
    controller: Shared<AnnotationsController>,
    tools: HashMap<&'static str, ToolHandle>,
    active_tool: Option<&'static str>,
    /// Switch ID to the label of the tool it activates.
    switches: HashMap<String, &'static str>,
    freehand: Option<Shared<PathDrawingTool>>,
    polygon: Option<Shared<PathDrawingTool>>,
    area_ruler: Option<Shared<AreaRulerTool>>,
    ruler: Option<Shared<RulerTool>>,
    marker: Option<Shared<MarkerTool>>,
}

impl ToolSwitchboard {
    pub fn new(controller: Shared<AnnotationsController>) -> Self {
        Self {
            controller,
            tools: HashMap::new(),
            active_tool: None,
            switches: HashMap::new(),
            freehand: None,
            polygon: None,
            area_ruler: None,
            ruler: None,
            marker: None,
        }
    }

    pub fn controller(&self) -> &Shared<AnnotationsController> {
        &self.controller
    }

    fn register(&mut self, tool: ToolHandle) {
        let label = tool.borrow().label();
        tracing::debug!("Initialized tool {}", label);
        self.tools.insert(label, tool);
    }

    fn already_initialized(label: &str) {
        tracing::warn!("Tool {} already initialized", label);
    }

    pub fn initialize_dummy_tool(&mut self) {
        if !self.tools.contains_key(DUMMY_TOOL) {
            self.register(shared(DummyTool));
        }
    }

    pub fn initialize_freehand_drawing_tool(
        &mut self,
        config: PathToolConfig,
        switch_id: Option<&str>,
    ) -> Shared<PathDrawingTool> {
        self.initialize_dummy_tool();
        if let Some(tool) = &self.freehand {
            Self::already_initialized(FREEHAND_DRAWING_TOOL);
            return Rc::clone(tool);
        }
        let tool = shared(PathDrawingTool::freehand(Rc::clone(&self.controller), config));
        self.register(tool.clone());
        if let Some(switch_id) = switch_id {
            self.bind_switch(switch_id, FREEHAND_DRAWING_TOOL);
        }
        self.freehand = Some(Rc::clone(&tool));
        tool
    }

    pub fn initialize_polygon_drawing_tool(
        &mut self,
        config: PathToolConfig,
        switch_id: Option<&str>,
        save_switch_id: Option<&str>,
    ) -> Shared<PathDrawingTool> {
        self.initialize_dummy_tool();
        if let Some(tool) = &self.polygon {
            Self::already_initialized(POLYGON_DRAWING_TOOL);
            return Rc::clone(tool);
        }
        let mut polygon = PathDrawingTool::polygon(Rc::clone(&self.controller), config);
        if let Some(save_switch_id) = save_switch_id {
            polygon.bind_save_switch(save_switch_id);
        }
        let tool = shared(polygon);
        self.register(tool.clone());
        if let Some(switch_id) = switch_id {
            self.bind_switch(switch_id, POLYGON_DRAWING_TOOL);
        }
        self.polygon = Some(Rc::clone(&tool));
        tool
    }

    pub fn initialize_area_measuring_tool(
        &mut self,
        config: PathToolConfig,
        image_mpp: f64,
    ) -> Shared<AreaRulerTool> {
        self.initialize_dummy_tool();
        if let Some(tool) = &self.area_ruler {
            Self::already_initialized(AREA_MEASURING_TOOL);
            return Rc::clone(tool);
        }
        let tool = shared(AreaRulerTool::new(
            Rc::clone(&self.controller),
            config,
            image_mpp,
        ));
        self.register(tool.clone());
        self.area_ruler = Some(Rc::clone(&tool));
        tool
    }

    pub fn initialize_measuring_tool(
        &mut self,
        config: PathToolConfig,
        image_mpp: f64,
    ) -> Shared<RulerTool> {
        self.initialize_dummy_tool();
        if let Some(tool) = &self.ruler {
            Self::already_initialized(MEASURING_TOOL);
            return Rc::clone(tool);
        }
        let tool = shared(RulerTool::new(Rc::clone(&self.controller), config, image_mpp));
        self.register(tool.clone());
        self.ruler = Some(Rc::clone(&tool));
        tool
    }

    pub fn initialize_image_marking_tool(
        &mut self,
        config: MarkerConfig,
        switch_id: Option<&str>,
    ) -> Shared<MarkerTool> {
        self.initialize_dummy_tool();
        if let Some(tool) = &self.marker {
            Self::already_initialized(IMAGE_MARKING_TOOL);
            return Rc::clone(tool);
        }
        let tool = shared(MarkerTool::new(Rc::clone(&self.controller), config));
        self.register(tool.clone());
        if let Some(switch_id) = switch_id {
            self.bind_switch(switch_id, IMAGE_MARKING_TOOL);
        }
        self.marker = Some(Rc::clone(&tool));
        tool
    }

    pub fn freehand_tool(&self) -> Option<Shared<PathDrawingTool>> {
        self.freehand.clone()
    }

    pub fn polygon_tool(&self) -> Option<Shared<PathDrawingTool>> {
        self.polygon.clone()
    }

    pub fn area_ruler_tool(&self) -> Option<Shared<AreaRulerTool>> {
        self.area_ruler.clone()
    }

    pub fn ruler_tool(&self) -> Option<Shared<RulerTool>> {
        self.ruler.clone()
    }

    pub fn marker_tool(&self) -> Option<Shared<MarkerTool>> {
        self.marker.clone()
    }

    pub fn is_tool_initialized(&self, label: &str) -> bool {
        self.tools.contains_key(label)
    }

    /// Labels of the initialized tools, sorted.
    pub fn tool_labels(&self) -> Vec<&'static str> {
        let mut labels: Vec<&'static str> = self.tools.keys().copied().collect();
        labels.sort_unstable();
        labels
    }

    pub fn active_tool(&self) -> Option<&'static str> {
        self.active_tool
    }

    /// Installs `label` as the only tool receiving pointer events.
    ///
    /// Returns false (with a warning) for tools that were never initialized.
    pub fn activate_tool(&mut self, label: &str, disable_events_on_shapes: bool) -> bool {
        let Some((&label, _)) = self.tools.get_key_value(label) else {
            tracing::warn!("Tool {} not initialized", label);
            return false;
        };
        {
            let mut controller = self.controller.borrow_mut();
            if disable_events_on_shapes {
                controller.disable_events_on_shapes();
            }
            controller.enable_mouse_events();
        }
        if let Some(previous) = self.active_tool.replace(label) {
            tracing::debug!("Switching tool {} -> {}", previous, label);
        }
        true
    }

    /// Routes a pointer event to the active tool.
    ///
    /// Dropped (returns false) without an active tool or while the surface
    /// ignores pointer events.
    pub fn dispatch(&self, event: PointerEvent) -> bool {
        if !self.controller.borrow().mouse_events_enabled() {
            return false;
        }
        let Some(tool) = self.active_tool.and_then(|label| self.tools.get(label)) else {
            return false;
        };
        tool.borrow_mut().handle(event);
        true
    }

    pub fn bind_switch(&mut self, switch_id: &str, label: &'static str) {
        self.switches.insert(switch_id.to_string(), label);
    }

    /// Wires the length ruler to its start/save switches and output.
    pub fn bind_to_ruler(
        &mut self,
        switch_on_id: &str,
        switch_off_id: Option<&str>,
        output_id: Option<&str>,
    ) -> Result<()> {
        let Some(ruler) = self.ruler.clone() else {
            tracing::warn!("Tool {} not initialized", MEASURING_TOOL);
            return Ok(());
        };
        ruler
            .borrow_mut()
            .bind(switch_on_id, switch_off_id, output_id)?;
        self.bind_switch(switch_on_id, MEASURING_TOOL);
        Ok(())
    }

    pub fn bind_to_area_ruler(&mut self, switch_id: &str, output_id: Option<&str>) -> Result<()> {
        let Some(area_ruler) = self.area_ruler.clone() else {
            tracing::warn!("Tool {} not initialized", AREA_MEASURING_TOOL);
            return Ok(());
        };
        area_ruler.borrow_mut().bind(switch_id, output_id)?;
        self.bind_switch(switch_id, AREA_MEASURING_TOOL);
        Ok(())
    }

    /// Simulates a click on a bound UI switch.
    pub fn press_switch(&mut self, switch_id: &str) {
        if let Some(label) = self.switches.get(switch_id).copied() {
            self.activate_tool(label, true);
        }
        for tool in self.tools.values() {
            tool.borrow_mut().switch_pressed(switch_id);
        }
    }
}

impl std::fmt::Debug for ToolSwitchboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolSwitchboard")
            .field("tools", &self.tool_labels())
            .field("active_tool", &self.active_tool)
            .field("switches", &self.switches)
            .finish()
    }
}
