use glam::Vec2;

use super::edges_of;
use super::segment::closest_points_segments;
use crate::shapes::{Circle, Primitive, Rect, Segment};

/// Point on `b` closest to `a`.
pub(crate) fn closest_point(a: &Primitive, b: &Primitive) -> Option<Vec2> {
    use Primitive as P;
    match (a, b) {
        (_, P::Point(p)) => Some(*p),

        (P::Point(p), P::Circle(c)) => Some(circle_towards(c, *p)),
        (P::Point(p), P::Segment(s)) => Some(s.closest_point(*p)),
        (P::Point(p), P::Rect(r)) => Some(rect_point(r, *p)),
        (P::Point(p), P::Polygon(_)) => point_edges(*p, &edges_of(b)?),

        (P::Circle(c), P::Circle(other)) => Some(circle_towards(other, c.center)),
        (P::Circle(c), P::Segment(s)) => Some(s.closest_point(c.center)),
        (P::Circle(c), P::Rect(r)) => Some(rect_point(r, c.center)),
        (P::Circle(c), P::Polygon(_)) => point_edges(c.center, &edges_of(b)?),

        (P::Segment(_) | P::Rect(_) | P::Polygon(_), P::Circle(c)) => {
            let on_a = point_edges(c.center, &edges_of(a)?)?;
            Some(circle_towards(c, on_a))
        }
        (P::Segment(_) | P::Rect(_) | P::Polygon(_), P::Segment(_) | P::Rect(_) | P::Polygon(_)) => {
            edges_edges(&edges_of(a)?, &edges_of(b)?)
        }
    }
}

/// Rim point of `c` in the direction of `p`. A point at the center picks +x.
fn circle_towards(c: &Circle, p: Vec2) -> Vec2 {
    let dir = (p - c.center).normalize_or_zero();
    let dir = if dir == Vec2::ZERO { Vec2::X } else { dir };
    c.center + dir * c.radius()
}

/// Outside: clamp each axis. Inside: the rect's diagonals split it into four
/// regions, each nearest to one edge; snap to that edge.
fn rect_point(r: &Rect, p: Vec2) -> Vec2 {
    let min = r.min();
    let max = r.max();
    let inside = p.x > min.x && p.x < max.x && p.y > min.y && p.y < max.y;
    if !inside {
        return p.clamp(min, max);
    }
    let center = r.center();
    let half = r.half_extents();
    let u = (p.x - center.x) / half.x;
    let v = (p.y - center.y) / half.y;
    if u.abs() >= v.abs() {
        let x = if u >= 0.0 { max.x } else { min.x };
        Vec2::new(x, p.y)
    } else {
        let y = if v >= 0.0 { max.y } else { min.y };
        Vec2::new(p.x, y)
    }
}

fn point_edges(p: Vec2, edges: &[Segment]) -> Option<Vec2> {
    edges
        .iter()
        .map(|e| e.closest_point(p))
        .min_by(|x, y| x.distance_squared(p).total_cmp(&y.distance_squared(p)))
}

/// Every edge pair reduces to the segment/segment closest-point routine.
fn edges_edges(a: &[Segment], b: &[Segment]) -> Option<Vec2> {
    let mut best: Option<(f32, Vec2)> = None;
    for ea in a {
        for eb in b {
            let (pa, pb) = closest_points_segments(ea, eb);
            let d = pa.distance_squared(pb);
            if best.is_none_or(|(bd, _)| d < bd) {
                best = Some((d, pb));
            }
        }
    }
    best.map(|(_, p)| p)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::Alignment;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_point_segment_clamps() {
        let s = Primitive::segment(Vec2::ZERO, Vec2::new(10.0, 0.0));
        let before = closest_point(&Primitive::point(Vec2::new(-3.0, 2.0)), &s).unwrap();
        assert_eq!(before, Vec2::ZERO);
        let mid = closest_point(&Primitive::point(Vec2::new(4.0, 2.0)), &s).unwrap();
        assert_eq!(mid, Vec2::new(4.0, 0.0));
    }

    #[test]
    fn test_rect_point_inside_uses_diagonal_regions() {
        let r = Rect::new(Vec2::ZERO, Vec2::new(10.0, 4.0), Alignment::TopLeft);
        // Near the right edge horizontally, vertically centred.
        assert_eq!(rect_point(&r, Vec2::new(9.0, 2.0)), Vec2::new(10.0, 2.0));
        // Close to the top edge.
        assert_eq!(rect_point(&r, Vec2::new(5.0, 0.5)), Vec2::new(5.0, 0.0));
        // Outside: per-axis clamp.
        assert_eq!(rect_point(&r, Vec2::new(12.0, -3.0)), Vec2::new(10.0, 0.0));
    }

    #[test]
    fn test_circle_to_circle() {
        let a = Primitive::circle(Vec2::ZERO, 1.0);
        let b = Primitive::circle(Vec2::new(10.0, 0.0), 2.0);
        let p = closest_point(&a, &b).unwrap();
        assert_abs_diff_eq!(p.x, 8.0, epsilon = 1e-5);
    }

    #[test]
    fn test_polygon_to_polygon() {
        let a = Primitive::rect(Vec2::ZERO, Vec2::splat(2.0), Alignment::TopLeft);
        let b = Primitive::polygon(vec![Vec2::new(5.0, 0.0), Vec2::new(7.0, 1.0), Vec2::new(5.0, 2.0)]);
        let p = closest_point(&a, &b).unwrap();
        assert_abs_diff_eq!(p.x, 5.0, epsilon = 1e-5);
    }

    #[test]
    fn test_segment_crossing_polygon_is_zero_distance() {
        let s = Primitive::segment(Vec2::new(-5.0, 1.0), Vec2::new(5.0, 1.0));
        let r = Primitive::rect(Vec2::ZERO, Vec2::splat(4.0), Alignment::Center);
        let p = closest_point(&s, &r).unwrap();
        assert_abs_diff_eq!(p.y, 1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(p.x.abs(), 2.0, epsilon = 1e-5);
    }

    #[test]
    fn test_degenerate_polygon() {
        let a = Primitive::point(Vec2::ZERO);
        assert!(closest_point(&a, &Primitive::polygon(vec![])).is_none());
    }
}
