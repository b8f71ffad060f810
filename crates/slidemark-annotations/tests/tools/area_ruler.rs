use slidemark_annotations::{AnnotationTool, AreaRulerTool, PathToolConfig};
use slidemark_core::{AnnotationError, AnnotationEvent, Shared, StyleOverrides};

use crate::common::{canvas, event_names, p};

type Controller = Shared<slidemark_annotations::AnnotationsController>;

fn started_ruler(controller: &Controller, mpp: f64) -> AreaRulerTool {
    let mut ruler = AreaRulerTool::new(controller.clone(), PathToolConfig::area_ruler(), mpp);
    ruler.bind("area_on", Some("area_output")).unwrap();
    ruler.switch_pressed("area_on");
    ruler
}

/// Square drawn through pointer events, canvas-space corner `(x, y)`.
fn draw_square(ruler: &mut AreaRulerTool, x: f64, y: f64, side: f64) {
    for (dx, dy) in [(0.0, 0.0), (side, 0.0), (side, side), (0.0, side)] {
        ruler.on_pointer_down(p(x + dx, y + dy));
        ruler.on_pointer_up(p(x + dx, y + dy));
    }
}

/// Target rectangle with the given canvas-space corner.
fn target(controller: &Controller, x: f64, y: f64, side: f64) {
    controller
        .borrow_mut()
        .draw_rectangle(
            "target",
            x + 200.0,
            y + 200.0,
            side,
            side,
            None,
            &StyleOverrides::default(),
            true,
        )
        .unwrap();
}

#[test]
fn test_bind_requires_output() {
    let mut ruler = AreaRulerTool::new(canvas(), PathToolConfig::area_ruler(), 1.0);
    assert!(matches!(
        ruler.bind("area_on", None),
        Err(AnnotationError::MissingRequiredBinding { .. })
    ));
}

#[test]
fn test_measure_updates_on_pointer_up() {
    let controller = canvas();
    let mut ruler = started_ruler(&controller, 0.5);
    draw_square(&mut ruler, 0.0, 0.0, 20.0);

    assert_eq!(ruler.get_area_ruler_measure(2), Some(100.0));
    assert_eq!(ruler.output().unwrap().measure, Some(100.0));
    let names = event_names(&controller);
    assert_eq!(names[0], "start_new_area_ruler");
    assert_eq!(names[1], "area_ruler_created");
    assert_eq!(names.last(), Some(&"area_ruler_updated"));
}

#[test]
fn test_save_unbound() {
    let controller = canvas();
    let mut ruler = started_ruler(&controller, 1.0);
    draw_square(&mut ruler, 0.0, 0.0, 10.0);

    let json = ruler.save().unwrap();
    assert_eq!(json.shape_id, "area_ruler_1");
    assert_eq!(json.segments().unwrap().len(), 4);
    assert!(!ruler.ruler_exists());

    let output = ruler.output().unwrap();
    assert_eq!(output.ruler_json.as_ref(), Some(&json));
    assert_eq!(output.measure, Some(100.0));

    let history = controller.borrow().events().history();
    assert_eq!(
        history.last().map(|n| n.event.clone()),
        Some(AnnotationEvent::AreaRulerCleared { saved: true })
    );
}

#[test]
fn test_empty_intersection_discards_ruler() {
    let controller = canvas();
    target(&controller, -150.0, -150.0, 50.0);
    let mut ruler = started_ruler(&controller, 1.0);
    draw_square(&mut ruler, 50.0, 50.0, 40.0);
    ruler.bind_to_shape("target");

    assert_eq!(ruler.save(), None);
    assert!(!ruler.ruler_exists());
    assert!(controller.borrow().contains_shape("target"));

    let output = ruler.output().unwrap();
    assert_eq!(output.ruler_json, None);
    assert_eq!(output.measure, None);

    let names = event_names(&controller);
    assert!(names.contains(&"area_ruler_empty_intersection"));
    let history = controller.borrow().events().history();
    assert_eq!(
        history.last().map(|n| n.event.clone()),
        Some(AnnotationEvent::AreaRulerCleared { saved: false })
    );
}

#[test]
fn test_partial_overlap_is_clipped() {
    let controller = canvas();
    target(&controller, 0.0, 0.0, 100.0);
    let mut ruler = started_ruler(&controller, 1.0);
    draw_square(&mut ruler, 50.0, 50.0, 100.0);
    ruler.bind_to_shape("target");

    let json = ruler.save().unwrap();
    let xs: Vec<f64> = json.segments().unwrap().iter().map(|s| s.point.x).collect();
    assert!(xs.iter().all(|x| (250.0 - 1e-6..=300.0 + 1e-6).contains(x)));

    let measure = ruler.output().unwrap().measure.unwrap();
    assert!((measure - 2500.0).abs() < 1.0, "measure was {}", measure);
}

#[test]
fn test_ruler_inside_target_is_kept() {
    let controller = canvas();
    target(&controller, -100.0, -100.0, 300.0);
    let mut ruler = started_ruler(&controller, 1.0);
    draw_square(&mut ruler, 0.0, 0.0, 10.0);
    ruler.bind_to_shape("target");
    assert_eq!(ruler.bound_shape(), Some("target"));

    let json = ruler.save().unwrap();
    let vertices: Vec<_> = json.segments().unwrap().iter().map(|s| s.point).collect();
    assert_eq!(
        vertices,
        vec![p(200.0, 200.0), p(210.0, 200.0), p(210.0, 210.0), p(200.0, 210.0)]
    );
}

#[test]
fn test_unbind_shape() {
    let controller = canvas();
    target(&controller, -150.0, -150.0, 50.0);
    let mut ruler = started_ruler(&controller, 1.0);
    draw_square(&mut ruler, 50.0, 50.0, 40.0);
    ruler.bind_to_shape("target");
    ruler.unbind_shape();

    assert!(ruler.save().is_some());
    assert!(!event_names(&controller).contains(&"area_ruler_empty_intersection"));
}
