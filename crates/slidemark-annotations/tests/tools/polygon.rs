use slidemark_annotations::{AnnotationTool, PathDrawingTool, PathToolConfig, PointerEvent};
use slidemark_core::{AnnotationEvent, Shared};

use crate::common::{canvas, event_names, p, points};

const TMP: &str = "tmp_polygon";

fn polygon_tool() -> (Shared<slidemark_annotations::AnnotationsController>, PathDrawingTool) {
    let controller = canvas();
    let tool = PathDrawingTool::polygon(controller.clone(), PathToolConfig::polygon());
    (controller, tool)
}

#[test]
fn test_first_click_creates_temporary_polygon() {
    let (controller, mut tool) = polygon_tool();
    tool.on_pointer_down(p(10.0, 10.0));

    assert!(tool.shape_exists());
    assert_eq!(points(&controller, TMP), vec![p(10.0, 10.0)]);
    assert_eq!(
        controller.borrow().get_shape(TMP).unwrap().is_selected(),
        Some(true)
    );
    assert!(!tool.can_undo());

    let history = controller.borrow().events().history();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].target, "annotations_canvas");
    assert_eq!(
        history[0].event,
        AnnotationEvent::PolygonCreated { point: p(10.0, 10.0) }
    );
}

#[test]
fn test_click_adds_and_drag_steers_last_point() {
    let (controller, mut tool) = polygon_tool();
    tool.handle(PointerEvent::Down { x: 0.0, y: 0.0 });
    tool.handle(PointerEvent::Up { x: 0.0, y: 0.0 });
    tool.handle(PointerEvent::Down { x: 10.0, y: 0.0 });
    tool.handle(PointerEvent::Drag { x: 12.0, y: 3.0 });
    tool.handle(PointerEvent::Drag { x: 15.0, y: 5.0 });
    tool.handle(PointerEvent::Up { x: 15.0, y: 5.0 });

    assert_eq!(points(&controller, TMP), vec![p(0.0, 0.0), p(15.0, 5.0)]);
    assert_eq!(
        event_names(&controller),
        vec![
            "polygon_created",
            "polygon_paused",
            "polygon_add_point",
            "polygon_paused"
        ]
    );
}

#[test]
fn test_rollback_then_restore() {
    let (controller, mut tool) = polygon_tool();
    tool.on_pointer_down(p(1.0, 1.0));
    tool.on_pointer_down(p(2.0, 2.0));
    let before = controller.borrow().get_shape_json(TMP).unwrap();

    tool.rollback();
    assert_eq!(points(&controller, TMP), vec![p(1.0, 1.0)]);
    assert!(tool.can_redo());
    assert_eq!(
        controller.borrow().get_shape(TMP).unwrap().is_selected(),
        Some(true)
    );

    tool.restore();
    assert_eq!(points(&controller, TMP), vec![p(1.0, 1.0), p(2.0, 2.0)]);
    assert_eq!(controller.borrow().get_shape_json(TMP).unwrap(), before);
    assert!(!tool.can_redo());
    assert!(event_names(&controller).contains(&"polygon_restored"));
}

#[test]
fn test_rollback_past_first_point_removes_shape() {
    let (controller, mut tool) = polygon_tool();
    tool.on_pointer_down(p(1.0, 1.0));
    tool.rollback();
    assert!(!tool.shape_exists());

    tool.restore();
    assert_eq!(points(&controller, TMP), vec![p(1.0, 1.0)]);
}

#[test]
fn test_new_click_drops_redo_history() {
    let (_controller, mut tool) = polygon_tool();
    tool.on_pointer_down(p(1.0, 1.0));
    tool.on_pointer_down(p(2.0, 2.0));
    tool.rollback();
    assert!(tool.can_redo());

    tool.on_pointer_down(p(3.0, 3.0));
    assert!(!tool.can_redo());
}

#[test]
fn test_rollback_without_shape_is_noop() {
    let (controller, mut tool) = polygon_tool();
    tool.rollback();
    tool.restore();
    assert_eq!(controller.borrow().shapes_count(), 0);
    assert!(event_names(&controller).is_empty());
}

#[test]
fn test_remove_last_point_on_empty_path_clears() {
    let (controller, mut tool) = polygon_tool();
    tool.on_pointer_down(p(1.0, 1.0));

    tool.remove_last_point();
    assert!(tool.shape_exists());
    assert!(points(&controller, TMP).is_empty());

    tool.remove_last_point();
    assert!(!tool.shape_exists());
    assert_eq!(event_names(&controller).last(), Some(&"polygon_cleared"));
}

#[test]
fn test_save_registers_labelled_polygon() {
    let (controller, mut tool) = polygon_tool();
    for (x, y) in [(0.0, 0.0), (100.0, 0.0), (100.0, 100.0), (0.0, 100.0)] {
        tool.on_pointer_down(p(x, y));
    }
    assert!(tool.shape_is_valid());

    let label = tool.save().unwrap();
    assert_eq!(label, "polygon_1");
    assert!(!tool.shape_exists());
    assert!(!tool.can_undo());

    let json = controller.borrow().get_shape_json("polygon_1").unwrap();
    assert_eq!(json.shape_type(), "polygon");
    let vertices: Vec<_> = json.segments().unwrap().iter().map(|s| s.point).collect();
    assert_eq!(
        vertices,
        vec![p(200.0, 200.0), p(300.0, 200.0), p(300.0, 300.0), p(200.0, 300.0)]
    );

    let history = controller.borrow().events().history();
    assert_eq!(
        history.last().map(|n| n.event.clone()),
        Some(AnnotationEvent::PolygonSaved {
            shape_id: "polygon_1".to_string()
        })
    );

    tool.on_pointer_down(p(5.0, 5.0));
    tool.on_pointer_down(p(50.0, 5.0));
    tool.on_pointer_down(p(50.0, 50.0));
    assert_eq!(tool.save().as_deref(), Some("polygon_2"));
}

#[test]
fn test_save_without_shape() {
    let (_controller, mut tool) = polygon_tool();
    assert_eq!(tool.save(), None);
}

#[test]
fn test_label_prefix_and_style_config() {
    let (controller, mut tool) = polygon_tool();
    tool.set_label_prefix(Some("roi"));
    tool.set_label_prefix(None);
    tool.update_config(slidemark_core::StyleOverrides::new().with_fill("#123456", 0.5));
    tool.extend_config(&slidemark_core::StyleOverrides::new().with_stroke_width(3.0));
    assert_eq!(tool.config().style.fill_alpha, Some(0.5));
    assert_eq!(tool.config().style.stroke_width, Some(3.0));

    for (x, y) in [(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)] {
        tool.on_pointer_down(p(x, y));
    }
    assert_eq!(tool.save().as_deref(), Some("roi_1"));
    let style = controller.borrow().get_shape("roi_1").unwrap().style().clone();
    assert_eq!(style.fill_color, "#123456");
    assert_eq!(style.stroke_width, 3.0);
}

#[test]
fn test_clear_discards_everything() {
    let (controller, mut tool) = polygon_tool();
    tool.on_pointer_down(p(1.0, 1.0));
    tool.on_pointer_down(p(2.0, 2.0));
    tool.clear();

    assert!(!tool.shape_exists());
    assert!(!tool.can_undo());
    assert!(!tool.can_redo());
    assert_eq!(event_names(&controller).last(), Some(&"polygon_cleared"));
}
