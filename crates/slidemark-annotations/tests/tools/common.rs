#![allow(dead_code)]

use slidemark_annotations::{AnnotationsController, StaticViewer};
use slidemark_core::{shared, Point, Shared, Size};

pub const CANVAS_ID: &str = "annotations_canvas";

/// 400x400 image: canvas offset (200, 200).
pub fn canvas() -> Shared<AnnotationsController> {
    let mut controller = AnnotationsController::with_defaults(CANVAS_ID);
    controller.build_annotations_canvas(&StaticViewer::new(
        Size::new(400.0, 400.0),
        Size::new(800.0, 600.0),
    ));
    shared(controller)
}

pub fn event_names(controller: &Shared<AnnotationsController>) -> Vec<&'static str> {
    controller.borrow().events().history_names()
}

/// Local (canvas-space) vertices of a registered path.
pub fn points(controller: &Shared<AnnotationsController>, shape_id: &str) -> Vec<Point> {
    controller
        .borrow()
        .get_shape(shape_id)
        .and_then(|s| s.segments().map(|segs| segs.iter().map(|seg| seg.point).collect()))
        .unwrap_or_default()
}

pub fn p(x: f64, y: f64) -> Point {
    Point::new(x, y)
}
