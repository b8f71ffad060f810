use proptest::prelude::*;
use slidemark_annotations::{Circle, Geometry, Rectangle, Segment, Shape, ShapeKind};
use slidemark_core::Point;

fn segments(points: &[(f64, f64)]) -> Vec<Segment> {
    points
        .iter()
        .map(|&(x, y)| Segment::new(Point::new(x, y)))
        .collect()
}

fn polygon(id: &str, points: &[(f64, f64)]) -> Shape {
    let mut shape = Shape::new(id, ShapeKind::polygon(segments(points)));
    shape.materialize(false);
    shape
}

fn polyline(id: &str, points: &[(f64, f64)]) -> Shape {
    let mut shape = Shape::new(id, ShapeKind::polyline(segments(points)));
    shape.materialize(false);
    shape
}

fn square(id: &str, x: f64, y: f64, side: f64) -> Shape {
    let mut shape = Shape::new(
        id,
        ShapeKind::Rectangle(Rectangle::new(Point::new(x, y), side, side)),
    );
    shape.materialize(false);
    shape
}

#[test]
fn test_polygon_area_ignores_orientation() {
    let clockwise = polygon("cw", &[(0.0, 0.0), (0.0, 10.0), (10.0, 10.0), (10.0, 0.0)]);
    let counter = polygon("ccw", &[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]);
    assert_eq!(clockwise.get_area(1.0, 2), Some(100.0));
    assert_eq!(counter.get_area(1.0, 2), Some(100.0));
    assert_eq!(counter.get_area(0.5, 2), Some(25.0));
}

#[test]
fn test_perimeter_of_open_and_closed_paths() {
    let line = polyline("l", &[(0.0, 0.0), (30.0, 40.0)]);
    assert_eq!(line.get_perimeter(1.0, 2), Some(50.0));

    let triangle = polygon("t", &[(0.0, 0.0), (30.0, 0.0), (30.0, 40.0)]);
    assert_eq!(triangle.get_perimeter(2.0, 2), Some(240.0));
}

#[test]
fn test_polyline_has_no_area() {
    let line = polyline("l", &[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]);
    let target = square("s", -5.0, -5.0, 30.0);
    assert_eq!(line.get_area(1.0, 2), None);
    assert_eq!(line.get_coverage_percentage(&target), None);
    assert!(!line.contains_shape(&target));
}

#[test]
fn test_coverage_and_intersection() {
    let a = square("a", 0.0, 0.0, 10.0);
    let b = square("b", 5.0, 0.0, 10.0);
    let far = square("far", 100.0, 100.0, 10.0);

    assert!(a.intersects_shape(&b));
    assert!(!a.intersects_shape(&far));

    let coverage = a.get_coverage_percentage(&b).unwrap();
    assert!((coverage - 50.0).abs() < 0.5, "coverage was {}", coverage);

    let clip = a.get_intersection(&b).unwrap();
    assert!(matches!(clip.geometry(), Geometry::Compound(children) if !children.is_empty()));
    assert!((clip.area().abs() - 50.0).abs() < 0.5);
    assert_eq!(clip.owner(), "");
}

#[test]
fn test_contains_shape_uses_sample_points() {
    let outer = square("outer", 0.0, 0.0, 100.0);
    let inner = Shape::new("inner", ShapeKind::Circle(Circle::new(Point::new(50.0, 50.0), 10.0)));
    let mut inner = inner;
    inner.materialize(false);

    assert!(outer.contains_shape(&inner));
    assert!(!inner.contains_shape(&outer));
}

#[test]
fn test_simplify_is_lossy() {
    let mut shape = polygon(
        "p",
        &[
            (0.0, 0.0),
            (5.0, 0.1),
            (10.0, 0.0),
            (10.0, 10.0),
            (0.0, 10.0),
        ],
    );
    shape.simplify_path(2.5);
    assert_eq!(shape.point_count(), 4);
    assert!(shape.is_valid());
}

#[test]
fn test_transform_survives_materialize() {
    let matrix = slidemark_annotations::translation_matrix(10.0, 20.0);
    let mut shape = Shape::new(
        "moved",
        ShapeKind::Rectangle(Rectangle::new(Point::new(0.0, 0.0), 10.0, 10.0)),
    )
    .with_transform(Some(matrix));
    shape.materialize(false);

    let center = shape.center().unwrap();
    assert!((center.x - 15.0).abs() < 1e-3);
    assert!((center.y - 25.0).abs() < 1e-3);
    assert!(shape.contains_point(15.0, 25.0));
    assert!(!shape.contains_point(5.0, 5.0));
}

proptest! {
    #[test]
    fn prop_polyline_never_reports_area(
        points in proptest::collection::vec((-500.0f64..500.0, -500.0f64..500.0), 2..12)
    ) {
        let line = polyline("l", &points);
        let target = square("s", -600.0, -600.0, 1200.0);
        prop_assert_eq!(line.get_area(1.0, 2), None);
        prop_assert_eq!(line.get_coverage_percentage(&target), None);
    }

    #[test]
    fn prop_closed_areas_are_non_negative(
        x in -500.0f64..500.0,
        y in -500.0f64..500.0,
        side in 1.0f64..200.0,
    ) {
        let shape = square("s", x, y, side);
        prop_assert!(shape.get_area(1.0, 2).unwrap() >= 0.0);
    }
}
