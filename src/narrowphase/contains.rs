use glam::Vec2;

use super::segment::{point_on_segment, segments_overlap};
use crate::shapes::{Circle, Polygon, Primitive, Rect, Segment};

/// Strict containment of `b` inside `a`. Shapes without area contain nothing
/// except a segment containing a point lying on it.
pub(crate) fn contains(a: &Primitive, b: &Primitive) -> bool {
    use Primitive as P;
    match (a, b) {
        (P::Point(_), _) => false,
        (P::Segment(s), P::Point(p)) => point_on_segment(*p, s),
        (P::Segment(_), _) => false,

        (P::Circle(c), P::Point(p)) => circle_point(c, *p),
        (P::Circle(c), P::Circle(other)) => c.center.distance(other.center) + other.radius() < c.radius(),
        (P::Circle(c), P::Segment(_) | P::Rect(_) | P::Polygon(_)) => {
            let corners = b.vertices();
            !corners.is_empty() && corners.iter().all(|&v| circle_point(c, v))
        }

        (P::Rect(r), P::Point(p)) => rect_point(r, *p),
        (P::Rect(r), P::Circle(c)) => {
            rect_point(r, c.center - Vec2::splat(c.radius())) && rect_point(r, c.center + Vec2::splat(c.radius()))
        }
        (P::Rect(r), P::Segment(_) | P::Rect(_) | P::Polygon(_)) => {
            let corners = b.vertices();
            !corners.is_empty() && corners.iter().all(|&v| rect_point(r, v))
        }

        (P::Polygon(poly), P::Point(p)) => poly.contains_point(*p),
        (P::Polygon(poly), P::Circle(c)) => polygon_circle(poly, c),
        (P::Polygon(poly), P::Segment(_) | P::Rect(_) | P::Polygon(_)) => polygon_edges(poly, b),
    }
}

fn circle_point(c: &Circle, p: Vec2) -> bool {
    p.distance_squared(c.center) < c.radius_sq()
}

fn rect_point(r: &Rect, p: Vec2) -> bool {
    let min = r.min();
    let max = r.max();
    p.x > min.x && p.x < max.x && p.y > min.y && p.y < max.y
}

/// Center inside and no edge touching the rim.
fn polygon_circle(poly: &Polygon, c: &Circle) -> bool {
    if !poly.contains_point(c.center) {
        return false;
    }
    poly.edges().all(|e: Segment| e.closest_point(c.center).distance_squared(c.center) > c.radius_sq())
}

/// Every vertex of `b` inside, and none of `b`'s edges touching the polygon's
/// boundary (a concave polygon can hold all vertices but not the edges).
fn polygon_edges(poly: &Polygon, b: &Primitive) -> bool {
    let vertices = b.vertices();
    if poly.is_degenerate() || vertices.is_empty() {
        return false;
    }
    if !vertices.iter().all(|&v| poly.contains_point(v)) {
        return false;
    }
    let inner = b.edges();
    !poly.edges().any(|pe| inner.iter().any(|ie| segments_overlap(&pe, ie)))
}
