use slidemark_annotations::{AnnotationTool, MarkerConfig, MarkerTool, ShapeKind};
use slidemark_core::{AnnotationEvent, StyleOverrides};

use crate::common::{canvas, event_names, p};

fn limited(limit: usize) -> MarkerConfig {
    MarkerConfig {
        limit,
        ..MarkerConfig::default()
    }
}

#[test]
fn test_limit_rejects_extra_markers() {
    let controller = canvas();
    let mut tool = MarkerTool::new(controller.clone(), limited(2));

    tool.on_pointer_down(p(0.0, 0.0));
    tool.on_pointer_down(p(10.0, 10.0));
    assert_eq!(tool.add_marker(p(20.0, 20.0)), None);

    assert_eq!(
        tool.get_markers_id(),
        vec!["marker_1".to_string(), "marker_2".to_string()]
    );
    assert_eq!(controller.borrow().shapes_count(), 2);
    assert_eq!(
        event_names(&controller),
        vec!["marker_created", "marker_created"]
    );
}

#[test]
fn test_zero_limit_is_unlimited() {
    let controller = canvas();
    let mut tool = MarkerTool::new(controller.clone(), limited(0));
    for i in 0..5 {
        tool.on_pointer_down(p(i as f64 * 10.0, 0.0));
    }
    assert_eq!(tool.get_markers_id().len(), 5);
}

#[test]
fn test_marker_geometry() {
    let controller = canvas();
    let config = MarkerConfig {
        marker_size: 16.0,
        ..MarkerConfig::default()
    };
    let mut tool = MarkerTool::new(controller.clone(), config);
    let id = tool.add_marker(p(-50.0, 25.0)).unwrap();

    let json = controller.borrow().get_shape_json(&id).unwrap().to_value().unwrap();
    assert_eq!(json["type"], "circle");
    assert_eq!(json["center_x"], 150.0);
    assert_eq!(json["center_y"], 225.0);
    assert_eq!(json["radius"], 8.0);
}

#[test]
fn test_generic_deletion_updates_markers() {
    let controller = canvas();
    let mut tool = MarkerTool::new(controller.clone(), MarkerConfig::default());
    tool.on_pointer_down(p(0.0, 0.0));
    tool.on_pointer_down(p(10.0, 0.0));

    assert!(controller.borrow_mut().delete_shape("marker_1", true));
    assert_eq!(tool.get_markers_id(), vec!["marker_2".to_string()]);

    let history = controller.borrow().events().history();
    let last = history.last().unwrap();
    assert_eq!(last.target, "annotations_canvas");
    assert_eq!(
        last.event,
        AnnotationEvent::MarkerDeleted {
            shape_id: "marker_1".to_string()
        }
    );
}

#[test]
fn test_limit_frees_up_after_deletion() {
    let controller = canvas();
    let mut tool = MarkerTool::new(controller.clone(), limited(1));
    tool.on_pointer_down(p(0.0, 0.0));
    assert!(tool.add_marker(p(5.0, 5.0)).is_none());

    tool.remove_marker("marker_1");
    assert_eq!(tool.add_marker(p(5.0, 5.0)).as_deref(), Some("marker_1"));
}

#[test]
fn test_remove_and_clear_markers() {
    let controller = canvas();
    controller
        .borrow_mut()
        .draw_rectangle("r1", 0.0, 0.0, 5.0, 5.0, None, &StyleOverrides::default(), false)
        .unwrap();
    let mut tool = MarkerTool::new(controller.clone(), MarkerConfig::default());
    for i in 0..3 {
        tool.on_pointer_down(p(i as f64, 0.0));
    }

    tool.remove_marker("r1");
    assert!(controller.borrow().contains_shape("r1"));

    tool.clear_markers();
    assert!(tool.get_markers_id().is_empty());
    assert_eq!(controller.borrow().shape_ids(), vec!["r1".to_string()]);
}

#[test]
fn test_shape_to_marker_converts_circles_only() {
    let controller = canvas();
    {
        let mut c = controller.borrow_mut();
        let style = StyleOverrides::default();
        c.draw_circle("c1", 100.0, 100.0, 30.0, None, &style, false).unwrap();
        c.draw_rectangle("r1", 0.0, 0.0, 5.0, 5.0, None, &style, false).unwrap();
    }
    let mut tool = MarkerTool::new(controller.clone(), MarkerConfig::default());

    tool.shapes_to_markers(&["c1".to_string(), "r1".to_string(), "missing".to_string()]);
    assert_eq!(tool.get_markers_id(), vec!["c1".to_string()]);
    assert!(!tool.shape_to_marker("c1"));

    let c = controller.borrow();
    let marker = c.get_shape("c1").unwrap();
    match marker.kind() {
        ShapeKind::Circle(circle) => assert_eq!(circle.radius, 5.0),
        other => panic!("unexpected kind {:?}", other),
    }
    assert!(c.contains_shape("r1"));
}

#[test]
fn test_update_markers_config() {
    let controller = canvas();
    let mut tool = MarkerTool::new(controller.clone(), MarkerConfig::default());
    tool.update_markers_config(StyleOverrides::new().with_fill("#0000ff", 0.8));
    let id = tool.add_marker(p(0.0, 0.0)).unwrap();
    let style = controller.borrow().get_shape(&id).unwrap().style().clone();
    assert_eq!(style.fill_color, "#0000ff");
    assert_eq!(style.fill_alpha, 0.8);
}

#[test]
fn test_markers_are_per_canvas() {
    let first = canvas();
    let second = canvas();
    let mut a = MarkerTool::new(first.clone(), limited(1));
    let mut b = MarkerTool::new(second.clone(), limited(1));
    a.on_pointer_down(p(0.0, 0.0));
    b.on_pointer_down(p(0.0, 0.0));
    assert_eq!(a.get_markers_id().len(), 1);
    assert_eq!(b.get_markers_id().len(), 1);
}

#[test]
fn test_dropped_tool_stops_watching_deletions() {
    let controller = canvas();
    let first = MarkerTool::new(controller.clone(), MarkerConfig::default());
    let mut second = MarkerTool::new(controller.clone(), MarkerConfig::default());
    assert_eq!(controller.borrow().deletion_watchers_count(), 2);

    let id = second.add_marker(p(0.0, 0.0)).unwrap();
    drop(second);
    assert_eq!(controller.borrow().deletion_watchers_count(), 1);

    // The remaining tool never tracked the marker, so no deletion event.
    assert!(controller.borrow_mut().delete_shape(&id, true));
    assert_eq!(event_names(&controller), vec!["marker_created"]);

    drop(first);
    assert_eq!(controller.borrow().deletion_watchers_count(), 0);
}
