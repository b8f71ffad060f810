use slidemark_annotations::{AnnotationTool, PathToolConfig, RulerTool};
use slidemark_core::{AnnotationError, AnnotationEvent, StyleOverrides};

use crate::common::{canvas, event_names, p, points};

#[test]
fn test_bind_requires_output() {
    let mut ruler = RulerTool::new(canvas(), PathToolConfig::ruler(), 1.0);
    let err = ruler.bind("ruler_on", Some("ruler_off"), None).unwrap_err();
    match err {
        AnnotationError::MissingRequiredBinding { tool, binding } => {
            assert_eq!(tool, "measuring_tool");
            assert_eq!(binding, "output");
        }
        other => panic!("unexpected error {:?}", other),
    }
    assert!(ruler.bind("ruler_on", Some("ruler_off"), Some("ruler_output")).is_ok());
}

#[test]
fn test_measure_on_pointer_up() {
    let controller = canvas();
    let mut ruler = RulerTool::new(controller.clone(), PathToolConfig::ruler(), 0.5);
    ruler.bind("ruler_on", None, Some("ruler_output")).unwrap();
    ruler.switch_pressed("ruler_on");
    assert_eq!(ruler.output().unwrap().element_id, "ruler_output");

    ruler.on_pointer_down(p(0.0, 0.0));
    ruler.on_pointer_down(p(20.0, 0.0));
    ruler.on_pointer_drag(p(30.0, 40.0));
    ruler.on_pointer_up(p(30.0, 40.0));

    assert_eq!(points(&controller, "ruler"), vec![p(0.0, 0.0), p(30.0, 40.0)]);
    assert_eq!(ruler.get_ruler_measure(2), Some(25.0));
    assert_eq!(ruler.output().unwrap().measure, Some(25.0));

    let history = controller.borrow().events().history();
    assert!(history.iter().all(|n| n.target == "ruler_output"));
    assert_eq!(
        event_names(&controller),
        vec!["start_new_ruler", "ruler_created", "ruler_updated"]
    );
    assert_eq!(
        history.last().map(|n| n.event.clone()),
        Some(AnnotationEvent::RulerUpdated { measure: Some(25.0) })
    );
}

#[test]
fn test_fill_is_always_transparent() {
    let controller = canvas();
    let mut ruler = RulerTool::new(controller.clone(), PathToolConfig::ruler(), 1.0);
    ruler.update_config(StyleOverrides::new().with_fill("#ff0000", 1.0));
    ruler.on_pointer_down(p(0.0, 0.0));

    let style = controller.borrow().get_shape("ruler").unwrap().style().clone();
    assert_eq!(style.fill_alpha, 0.0);
    assert_eq!(style.fill_color, "#ff0000");
}

#[test]
fn test_save_stores_json_and_clears() {
    let controller = canvas();
    let mut ruler = RulerTool::new(controller.clone(), PathToolConfig::ruler(), 1.0);
    ruler.bind("ruler_on", Some("ruler_off"), Some("ruler_output")).unwrap();
    ruler.switch_pressed("ruler_on");
    ruler.on_pointer_down(p(0.0, 0.0));
    ruler.on_pointer_down(p(0.0, 10.0));
    ruler.on_pointer_up(p(0.0, 10.0));

    ruler.switch_pressed("ruler_off");

    assert!(!ruler.ruler_exists());
    let output = ruler.output().unwrap();
    let json = output.ruler_json.as_ref().unwrap();
    assert_eq!(json.shape_id, "ruler_1");
    assert_eq!(json.shape_type(), "polyline");
    assert_eq!(json.segments().unwrap().len(), 2);
    assert_eq!(output.measure, Some(10.0));

    let history = controller.borrow().events().history();
    assert_eq!(
        history.last().map(|n| n.event.clone()),
        Some(AnnotationEvent::RulerCleared { saved: true })
    );
}

#[test]
fn test_remove_last_point_then_clear() {
    let controller = canvas();
    let mut ruler = RulerTool::new(controller.clone(), PathToolConfig::ruler(), 1.0);
    ruler.on_pointer_down(p(0.0, 0.0));
    ruler.remove_last_point();
    assert!(ruler.ruler_exists());
    ruler.remove_last_point();
    assert!(!ruler.ruler_exists());
    assert_eq!(event_names(&controller).last(), Some(&"ruler_cleared"));
}
