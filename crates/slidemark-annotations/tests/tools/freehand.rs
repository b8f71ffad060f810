use slidemark_annotations::{AnnotationTool, DragMode, PathDrawingTool, PathToolConfig};
use slidemark_core::{AnnotationEvent, Shared};

use crate::common::{canvas, event_names, p, points};

const TMP: &str = "tmp_freehand_path";

fn freehand_tool() -> (Shared<slidemark_annotations::AnnotationsController>, PathDrawingTool) {
    let controller = canvas();
    let tool = PathDrawingTool::freehand(controller.clone(), PathToolConfig::freehand());
    (controller, tool)
}

fn dash(controller: &Shared<slidemark_annotations::AnnotationsController>) -> Option<[f64; 2]> {
    controller
        .borrow()
        .get_shape(TMP)
        .and_then(|s| s.primitive().and_then(|prim| prim.dash_array()))
}

#[test]
fn test_drag_steers_last_point() {
    let (controller, mut tool) = freehand_tool();
    assert_eq!(tool.config().drag_mode, DragMode::ReplaceLast);

    tool.on_pointer_down(p(0.0, 0.0));
    tool.on_pointer_drag(p(5.0, 0.0));
    tool.on_pointer_drag(p(10.0, 5.0));
    tool.on_pointer_up(p(10.0, 5.0));

    assert_eq!(points(&controller, TMP), vec![p(10.0, 5.0)]);
    let history = controller.borrow().events().history();
    assert_eq!(
        history.last().map(|n| n.event.clone()),
        Some(AnnotationEvent::FreehandPolygonPaused {
            shape_id: TMP.to_string()
        })
    );
}

#[test]
fn test_stroke_mode_appends_drag_positions() {
    let controller = canvas();
    let mut tool = PathDrawingTool::freehand(controller.clone(), PathToolConfig::freehand_stroke());

    tool.on_pointer_down(p(0.0, 0.0));
    tool.on_pointer_drag(p(5.0, 0.0));
    tool.on_pointer_drag(p(10.0, 5.0));

    assert_eq!(
        points(&controller, TMP),
        vec![p(0.0, 0.0), p(5.0, 0.0), p(10.0, 5.0)]
    );
}

#[test]
fn test_pause_and_resume() {
    let (controller, mut tool) = freehand_tool();
    tool.on_pointer_down(p(0.0, 0.0));
    tool.on_pointer_drag(p(20.0, 0.0));
    tool.on_pointer_up(p(20.0, 0.0));
    tool.on_pointer_down(p(20.0, 20.0));

    assert_eq!(points(&controller, TMP), vec![p(20.0, 0.0), p(20.0, 20.0)]);
    assert_eq!(
        event_names(&controller),
        vec![
            "freehand_polygon_created",
            "freehand_polygon_paused",
            "freehand_polygon_updated"
        ]
    );

    tool.rollback();
    assert_eq!(points(&controller, TMP), vec![p(20.0, 0.0)]);
}

#[test]
fn test_preview_tracks_pointer_without_checkpoints() {
    let (controller, mut tool) = freehand_tool();
    tool.on_pointer_down(p(0.0, 0.0));
    tool.activate_preview_mode();

    tool.on_pointer_move(p(10.0, 0.0));
    tool.on_pointer_move(p(20.0, 0.0));
    assert_eq!(points(&controller, TMP), vec![p(0.0, 0.0), p(20.0, 0.0)]);
    assert!(!tool.can_undo());

    tool.on_pointer_leave();
    assert_eq!(points(&controller, TMP), vec![p(0.0, 0.0)]);
    assert_eq!(dash(&controller), None);
    assert_eq!(
        controller.borrow().get_shape(TMP).unwrap().is_selected(),
        Some(true)
    );

    // Ignored while the pointer is outside the canvas.
    tool.on_pointer_move(p(40.0, 0.0));
    assert_eq!(points(&controller, TMP).len(), 1);

    tool.on_pointer_enter();
    assert_eq!(dash(&controller), Some([100.0, 50.0]));
    assert_eq!(
        controller.borrow().get_shape(TMP).unwrap().is_selected(),
        Some(false)
    );
}

#[test]
fn test_click_promotes_tentative_point() {
    let (controller, mut tool) = freehand_tool();
    tool.on_pointer_down(p(0.0, 0.0));
    tool.activate_preview_mode();
    tool.on_pointer_move(p(30.0, 0.0));
    tool.on_pointer_down(p(30.0, 0.0));

    assert_eq!(points(&controller, TMP), vec![p(0.0, 0.0), p(30.0, 0.0)]);
    assert!(!tool.preview_mode_active());

    tool.rollback();
    assert_eq!(points(&controller, TMP), vec![p(0.0, 0.0)]);
}

#[test]
fn test_click_ends_preview_before_history_moves() {
    let (controller, mut tool) = freehand_tool();
    tool.on_pointer_down(p(0.0, 0.0));
    tool.activate_preview_mode();
    tool.on_pointer_enter();
    tool.on_pointer_move(p(10.0, 0.0));
    tool.on_pointer_down(p(10.0, 0.0));
    assert!(!tool.preview_mode_active());
    assert_eq!(dash(&controller), None);

    tool.rollback();
    tool.restore();
    assert_eq!(points(&controller, TMP), vec![p(0.0, 0.0), p(10.0, 0.0)]);

    // No rubber band on a shape that is drawn solid.
    tool.on_pointer_move(p(20.0, 20.0));
    assert_eq!(points(&controller, TMP).len(), 2);
    assert_eq!(dash(&controller), None);
}

#[test]
fn test_leave_without_tentative_point_keeps_vertices() {
    let (controller, mut tool) = freehand_tool();
    tool.on_pointer_down(p(0.0, 0.0));
    tool.on_pointer_down(p(10.0, 0.0));
    tool.activate_preview_mode();
    tool.on_pointer_leave();
    assert_eq!(points(&controller, TMP).len(), 2);
}

#[test]
fn test_deactivating_preview_drops_tentative_point() {
    let (controller, mut tool) = freehand_tool();
    tool.on_pointer_down(p(0.0, 0.0));
    tool.activate_preview_mode();
    tool.on_pointer_enter();
    tool.on_pointer_move(p(5.0, 5.0));
    assert!(tool.preview_mode_active());

    tool.deactivate_preview_mode();
    assert!(!tool.preview_mode_active());
    assert_eq!(points(&controller, TMP), vec![p(0.0, 0.0)]);
    assert_eq!(dash(&controller), None);
}

#[test]
fn test_save_simplifies_and_relabels() {
    let controller = canvas();
    let mut tool = PathDrawingTool::freehand(controller.clone(), PathToolConfig::freehand_stroke());
    tool.on_pointer_down(p(0.0, 0.0));
    for x in 1..=50 {
        tool.on_pointer_drag(p(x as f64, 0.0));
    }
    tool.on_pointer_drag(p(50.0, 50.0));
    tool.on_pointer_drag(p(0.0, 50.0));
    tool.on_pointer_up(p(0.0, 50.0));

    let label = tool.save().unwrap();
    assert_eq!(label, "polygon_1");
    assert!(!controller.borrow().contains_shape(TMP));

    let saved = points(&controller, &label);
    assert_eq!(saved.len(), 4);
    assert_eq!(
        event_names(&controller).last(),
        Some(&"freehand_polygon_saved")
    );
}

#[test]
fn test_clear_emits_cleared() {
    let (controller, mut tool) = freehand_tool();
    tool.on_pointer_down(p(0.0, 0.0));
    tool.clear();
    assert!(!tool.shape_exists());
    assert_eq!(
        event_names(&controller).last(),
        Some(&"freehand_polygon_cleared")
    );
}
