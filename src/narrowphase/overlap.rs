use glam::Vec2;

use super::segment::{point_on_segment, segments_overlap};
use crate::shapes::{Circle, Polygon, Primitive, Rect, Segment};
use crate::types::EPSILON;

pub(crate) fn overlap(a: &Primitive, b: &Primitive) -> bool {
    use Primitive as P;
    match (a, b) {
        (P::Point(p0), P::Point(p1)) => p0.distance_squared(*p1) <= EPSILON * EPSILON,
        (P::Point(p), P::Circle(c)) | (P::Circle(c), P::Point(p)) => point_circle(*p, c),
        (P::Point(p), P::Segment(s)) | (P::Segment(s), P::Point(p)) => point_on_segment(*p, s),
        (P::Point(p), P::Rect(r)) | (P::Rect(r), P::Point(p)) => r.aabb().contains_point(*p),
        (P::Point(p), P::Polygon(poly)) | (P::Polygon(poly), P::Point(p)) => poly.contains_point(*p),

        (P::Circle(c0), P::Circle(c1)) => circle_circle(c0, c1),
        (P::Circle(c), P::Segment(s)) | (P::Segment(s), P::Circle(c)) => circle_segment(c, s),
        (P::Circle(c), P::Rect(r)) | (P::Rect(r), P::Circle(c)) => circle_rect(c, r),
        (P::Circle(c), P::Polygon(poly)) | (P::Polygon(poly), P::Circle(c)) => circle_polygon(c, poly),

        (P::Segment(s0), P::Segment(s1)) => segments_overlap(s0, s1),
        (P::Segment(s), P::Rect(r)) | (P::Rect(r), P::Segment(s)) => segment_edges(s, &r.edges(), |p| r.aabb().contains_point(p)),
        (P::Segment(s), P::Polygon(poly)) | (P::Polygon(poly), P::Segment(s)) => {
            !poly.is_degenerate() && segment_edges(s, &poly.edges().collect::<Vec<_>>(), |p| poly.contains_point(p))
        }

        (P::Rect(r0), P::Rect(r1)) => r0.aabb().overlaps(&r1.aabb()),
        (P::Rect(r), P::Polygon(poly)) | (P::Polygon(poly), P::Rect(r)) => polygon_polygon(&Polygon::from_rect(r), poly),

        (P::Polygon(p0), P::Polygon(p1)) => polygon_polygon(p0, p1),
    }
}

fn point_circle(p: Vec2, c: &Circle) -> bool {
    p.distance_squared(c.center) <= c.radius_sq()
}

/// Touching circles do not overlap. Coincident centers always do, so a
/// zero-radius circle behaves like a point.
fn circle_circle(c0: &Circle, c1: &Circle) -> bool {
    let rsum = c0.radius() + c1.radius();
    let d_sq = c0.center.distance_squared(c1.center);
    d_sq < rsum * rsum || d_sq <= EPSILON * EPSILON
}

/// Clamp the center's projection onto the segment, then compare to the radius.
/// A zero-length segment degenerates to a point test.
fn circle_segment(c: &Circle, s: &Segment) -> bool {
    if s.is_degenerate() {
        return point_circle(s.origin, c);
    }
    let t = s.project(c.center).clamp(0.0, s.len());
    s.at(t).distance_squared(c.center) <= c.radius_sq()
}

pub(crate) fn circle_rect(c: &Circle, r: &Rect) -> bool {
    let closest = c.center.clamp(r.min(), r.max());
    closest.distance_squared(c.center) <= c.radius_sq()
}

fn circle_polygon(c: &Circle, poly: &Polygon) -> bool {
    if poly.is_degenerate() {
        return false;
    }
    poly.contains_point(c.center) || poly.edges().any(|e| circle_segment(c, &e))
}

/// A segment touches an edge-bounded region when an endpoint is inside or it
/// crosses one of the edges.
fn segment_edges(s: &Segment, edges: &[Segment], inside: impl Fn(Vec2) -> bool) -> bool {
    inside(s.start()) || inside(s.end()) || edges.iter().any(|e| segments_overlap(s, e))
}

pub(crate) fn polygon_polygon(a: &Polygon, b: &Polygon) -> bool {
    if a.is_degenerate() || b.is_degenerate() {
        return false;
    }
    if a.is_convex() && b.is_convex() {
        return convex_sat(a, b);
    }
    if a.vertices.iter().any(|&v| b.contains_point(v)) || b.vertices.iter().any(|&v| a.contains_point(v)) {
        return true;
    }
    a.edges().any(|ea| b.edges().any(|eb| segments_overlap(&ea, &eb)))
}

/// Separating-axis test over the edge normals of both convex polygons.
fn convex_sat(a: &Polygon, b: &Polygon) -> bool {
    let project = |poly: &Polygon, axis: Vec2| {
        poly.vertices
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), v| {
                let d = v.dot(axis);
                (lo.min(d), hi.max(d))
            })
    };
    for edge in a.edges().chain(b.edges()) {
        if edge.is_degenerate() {
            continue;
        }
        let axis = edge.dir().perp();
        let (a_lo, a_hi) = project(a, axis);
        let (b_lo, b_hi) = project(b, axis);
        if a_hi < b_lo - EPSILON || b_hi < a_lo - EPSILON {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(min: Vec2, side: f32) -> Polygon {
        Polygon::new(vec![
            min,
            min + Vec2::new(side, 0.0),
            min + Vec2::new(side, side),
            min + Vec2::new(0.0, side),
        ])
    }

    #[test]
    fn test_circle_circle_strict() {
        let a = Circle::new(Vec2::ZERO, 5.0);
        assert!(circle_circle(&a, &Circle::new(Vec2::new(8.0, 0.0), 5.0)));
        // Exactly touching is not an overlap.
        assert!(!circle_circle(&a, &Circle::new(Vec2::new(10.0, 0.0), 5.0)));
    }

    #[test]
    fn test_zero_radius_circles_behave_like_points() {
        let p = Vec2::new(3.0, -2.0);
        let dot = Circle::new(p, 0.0);
        assert!(circle_circle(&dot, &dot));
        assert_eq!(circle_circle(&dot, &dot), point_circle(p, &dot));
        assert!(overlap(&Primitive::Circle(dot), &Primitive::point(p)));
        assert!(!circle_circle(&dot, &Circle::new(p + Vec2::X, 0.0)));
    }

    #[test]
    fn test_circle_degenerate_segment() {
        let c = Circle::new(Vec2::ZERO, 1.0);
        let s = Segment::new(Vec2::new(0.5, 0.0), Vec2::ZERO, 3.0);
        assert!(circle_segment(&c, &s));
        let far = Segment::new(Vec2::new(1.5, 0.0), Vec2::ZERO, 3.0);
        assert!(!circle_segment(&c, &far));
    }

    #[test]
    fn test_sat_agrees_with_parity_path() {
        let a = square(Vec2::ZERO, 2.0);
        let b = square(Vec2::new(1.0, 1.0), 2.0);
        let c = square(Vec2::new(3.0, 0.0), 1.0);
        assert!(convex_sat(&a, &b));
        assert!(!convex_sat(&a, &c));
        // Same answer through the general path with a concave stand-in.
        let concave = Polygon::new(vec![
            Vec2::new(1.0, 1.0),
            Vec2::new(3.0, 1.0),
            Vec2::new(2.0, 2.0),
            Vec2::new(3.0, 3.0),
            Vec2::new(1.0, 3.0),
        ]);
        assert!(polygon_polygon(&a, &concave));
    }

    #[test]
    fn test_polygon_containing_polygon_overlaps() {
        let outer = Polygon::new(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(5.0, 5.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(0.0, 10.0),
        ]);
        let inner = square(Vec2::new(1.0, 4.0), 1.0);
        assert!(polygon_polygon(&outer, &inner));
        assert!(polygon_polygon(&inner, &outer));
    }
}
