use csgrs::sketch::Sketch;
use csgrs::traits::CSG;
use slidemark_core::Point;

use super::geometry::signed_area;
use super::{Geometry, PathGeometry, Primitive, Segment};

/// Filled area of a primitive as a csgrs sketch.
///
/// Compound primitives carry winding: negative rings are cut out.
fn as_csg(primitive: &Primitive) -> Sketch<()> {
    let compound = matches!(primitive.geometry(), Geometry::Compound(_));
    let mut filled = Sketch::new();
    let mut holes = Sketch::new();
    let mut has_holes = false;

    for ring in primitive.rings() {
        if ring.points.len() < 3 {
            continue;
        }
        let pts: Vec<[f64; 2]> = ring.points.iter().map(|p| [p.x, p.y]).collect();
        let s = Sketch::polygon(&pts, None);
        if compound && signed_area(&ring.points) < 0.0 {
            holes = holes.union(&s);
            has_holes = true;
        } else {
            filled = filled.union(&s);
        }
    }

    if has_holes {
        filled.difference(&holes)
    } else {
        filled
    }
}

fn oriented(coords: &[Point], positive: bool) -> PathGeometry {
    let mut points = coords.to_vec();
    if points.len() > 1 && points.first() == points.last() {
        points.pop();
    }
    if (signed_area(&points) > 0.0) != positive {
        points.reverse();
    }
    PathGeometry::new(points.into_iter().map(Segment::new).collect(), true)
}

/// Intersection of two filled areas, as compound children.
pub(super) fn intersection(a: &Primitive, b: &Primitive) -> Vec<PathGeometry> {
    let result = as_csg(a).intersection(&as_csg(b));
    let mp = result.to_multipolygon();

    let mut children = Vec::new();
    for poly in mp.0 {
        let exterior: Vec<Point> = poly
            .exterior()
            .0
            .iter()
            .map(|c| Point::new(c.x, c.y))
            .collect();
        if exterior.len() < 3 {
            continue;
        }
        children.push(oriented(&exterior, true));

        for interior in poly.interiors() {
            let hole: Vec<Point> = interior.0.iter().map(|c| Point::new(c.x, c.y)).collect();
            if hole.len() >= 3 {
                children.push(oriented(&hole, false));
            }
        }
    }
    children
}
