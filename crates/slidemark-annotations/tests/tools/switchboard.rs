use std::rc::Rc;

use slidemark_annotations::tools::{
    AREA_MEASURING_TOOL, DUMMY_TOOL, FREEHAND_DRAWING_TOOL, IMAGE_MARKING_TOOL, MEASURING_TOOL,
    POLYGON_DRAWING_TOOL,
};
use slidemark_annotations::{MarkerConfig, PathToolConfig, PointerEvent, ToolSwitchboard};
use slidemark_core::{AnnotationError, StyleOverrides};

use crate::common::canvas;

fn down(x: f64, y: f64) -> PointerEvent {
    PointerEvent::Down { x, y }
}

#[test]
fn test_dummy_tool_comes_first() {
    let mut board = ToolSwitchboard::new(canvas());
    assert!(board.tool_labels().is_empty());

    board.initialize_polygon_drawing_tool(PathToolConfig::polygon(), None, None);
    assert_eq!(board.tool_labels(), vec![DUMMY_TOOL, POLYGON_DRAWING_TOOL]);
}

#[test]
fn test_initialization_is_idempotent() {
    let mut board = ToolSwitchboard::new(canvas());
    let first = board.initialize_freehand_drawing_tool(PathToolConfig::freehand(), None);
    let second = board.initialize_freehand_drawing_tool(PathToolConfig::polygon(), None);
    assert!(Rc::ptr_eq(&first, &second));
    assert_eq!(board.tool_labels(), vec![DUMMY_TOOL, FREEHAND_DRAWING_TOOL]);
}

#[test]
fn test_activate_unknown_tool() {
    let mut board = ToolSwitchboard::new(canvas());
    assert!(!board.activate_tool(IMAGE_MARKING_TOOL, true));
    assert_eq!(board.active_tool(), None);
    assert!(!board.dispatch(down(0.0, 0.0)));
}

#[test]
fn test_only_active_tool_receives_events() {
    let controller = canvas();
    let mut board = ToolSwitchboard::new(controller.clone());
    let polygon = board.initialize_polygon_drawing_tool(PathToolConfig::polygon(), None, None);
    let marker = board.initialize_image_marking_tool(MarkerConfig::default(), None);

    assert!(board.activate_tool(POLYGON_DRAWING_TOOL, true));
    assert!(board.dispatch(down(0.0, 0.0)));
    assert!(polygon.borrow().shape_exists());
    assert!(marker.borrow().get_markers_id().is_empty());

    assert!(board.activate_tool(IMAGE_MARKING_TOOL, true));
    board.dispatch(down(50.0, 50.0));
    assert_eq!(marker.borrow().get_markers_id().len(), 1);
    assert_eq!(board.active_tool(), Some(IMAGE_MARKING_TOOL));

    board.activate_tool(DUMMY_TOOL, true);
    board.dispatch(down(60.0, 60.0));
    assert_eq!(marker.borrow().get_markers_id().len(), 1);
    assert_eq!(controller.borrow().shapes_count(), 2);
}

#[test]
fn test_activation_controls_surface_and_shape_drag() {
    let controller = canvas();
    controller
        .borrow_mut()
        .draw_rectangle("r1", 0.0, 0.0, 10.0, 10.0, None, &StyleOverrides::default(), false)
        .unwrap();
    controller.borrow_mut().disable_mouse_events();

    let mut board = ToolSwitchboard::new(controller.clone());
    board.initialize_dummy_tool();
    assert!(!board.dispatch(down(0.0, 0.0)));

    board.activate_tool(DUMMY_TOOL, false);
    assert!(controller.borrow().mouse_events_enabled());
    assert!(controller.borrow_mut().drag_shape("r1", 1.0, 1.0));

    board.activate_tool(DUMMY_TOOL, true);
    assert!(!controller.borrow_mut().drag_shape("r1", 1.0, 1.0));
}

#[test]
fn test_switches() {
    let controller = canvas();
    let mut board = ToolSwitchboard::new(controller.clone());
    board.initialize_polygon_drawing_tool(
        PathToolConfig::polygon(),
        Some("polygon_on"),
        Some("polygon_save"),
    );
    let ruler = board.initialize_measuring_tool(PathToolConfig::ruler(), 1.0);

    assert!(matches!(
        board.bind_to_ruler("ruler_on", Some("ruler_off"), None),
        Err(AnnotationError::MissingRequiredBinding { .. })
    ));
    board
        .bind_to_ruler("ruler_on", Some("ruler_off"), Some("ruler_output"))
        .unwrap();

    board.press_switch("polygon_on");
    assert_eq!(board.active_tool(), Some(POLYGON_DRAWING_TOOL));
    for (x, y) in [(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)] {
        board.dispatch(down(x, y));
    }
    board.press_switch("polygon_save");
    assert!(controller.borrow().contains_shape("polygon_1"));

    board.press_switch("ruler_on");
    assert_eq!(board.active_tool(), Some(MEASURING_TOOL));
    assert!(ruler.borrow().output().is_some());
    board.dispatch(down(0.0, 0.0));
    board.dispatch(down(3.0, 4.0));
    board.press_switch("ruler_off");

    let ruler = ruler.borrow();
    let output = ruler.output().unwrap();
    assert_eq!(output.ruler_json.as_ref().map(|j| j.shape_id.as_str()), Some("ruler_1"));
    assert_eq!(output.measure, Some(5.0));
    assert_eq!(board.active_tool(), Some(MEASURING_TOOL));
}

#[test]
fn test_area_ruler_binding_without_tool() {
    let mut board = ToolSwitchboard::new(canvas());
    assert!(board.bind_to_area_ruler("area_on", Some("out")).is_ok());
    assert!(!board.is_tool_initialized(AREA_MEASURING_TOOL));

    board.initialize_area_measuring_tool(PathToolConfig::area_ruler(), 1.0);
    board.bind_to_area_ruler("area_on", Some("out")).unwrap();
    board.press_switch("area_on");
    assert_eq!(board.active_tool(), Some(AREA_MEASURING_TOOL));
}
