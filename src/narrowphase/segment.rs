//! Segment-level building blocks shared by the predicate families.

use glam::Vec2;

use crate::shapes::Segment;
use crate::types::EPSILON;

/// Signed side of `p` relative to the line through `seg` (positive = left of `dir`).
fn side(seg: &Segment, p: Vec2) -> f32 {
    seg.dir().perp_dot(p - seg.origin)
}

/// Both endpoints of `other` lie strictly on the same side of `seg`'s line.
fn one_sided(seg: &Segment, other: &Segment) -> bool {
    let s0 = side(seg, other.start());
    let s1 = side(seg, other.end());
    (s0 > EPSILON && s1 > EPSILON) || (s0 < -EPSILON && s1 < -EPSILON)
}

pub(crate) fn point_on_segment(p: Vec2, seg: &Segment) -> bool {
    seg.closest_point(p).distance_squared(p) <= EPSILON * EPSILON
}

/// Boolean segment/segment overlap, collinear overlaps included.
pub(crate) fn segments_overlap(a: &Segment, b: &Segment) -> bool {
    if a.is_degenerate() {
        return point_on_segment(a.origin, b);
    }
    if b.is_degenerate() {
        return point_on_segment(b.origin, a);
    }
    if one_sided(a, b) || one_sided(b, a) {
        return false;
    }
    if a.dir().perp_dot(b.dir()).abs() <= EPSILON {
        // Parallel and not separated: collinear, compare ranges along `a`.
        let t0 = a.project(b.start());
        let t1 = a.project(b.end());
        return t0.max(t1) >= -EPSILON && t0.min(t1) <= a.len() + EPSILON;
    }
    true
}

/// Single crossing point of two segments. Parallel or collinear pairs have no
/// unique crossing and yield `None`.
pub(crate) fn segment_intersection(a: &Segment, b: &Segment) -> Option<Vec2> {
    if a.is_degenerate() {
        return point_on_segment(a.origin, b).then_some(a.origin);
    }
    if b.is_degenerate() {
        return point_on_segment(b.origin, a).then_some(b.origin);
    }
    let r = a.delta();
    let s = b.delta();
    let denom = r.perp_dot(s);
    if denom.abs() <= EPSILON * r.length() * s.length() {
        return None;
    }
    let qp = b.origin - a.origin;
    let t = qp.perp_dot(s) / denom;
    let u = qp.perp_dot(r) / denom;
    const SLACK: f32 = 1e-6;
    if (-SLACK..=1.0 + SLACK).contains(&t) && (-SLACK..=1.0 + SLACK).contains(&u) {
        Some(a.origin + r * t.clamp(0.0, 1.0))
    } else {
        None
    }
}

/// Segment parameter (as a fraction of its length) of the boundary crossings
/// with a circle, sorted ascending. Tangency yields a single crossing.
pub(crate) fn segment_circle_fractions(seg: &Segment, center: Vec2, radius: f32) -> Vec<f32> {
    let d = seg.delta();
    let a = d.length_squared();
    if a <= EPSILON * EPSILON {
        let on_rim = (seg.origin.distance(center) - radius).abs() <= EPSILON;
        return if on_rim { vec![0.0] } else { Vec::new() };
    }

    // Nearest point of the infinite line, compared to the radius first.
    let m = seg.origin - center;
    let t_near = -m.dot(d) / a;
    let near = seg.origin + d * t_near;
    let near_dist = near.distance(center);
    if near_dist > radius + EPSILON {
        return Vec::new();
    }
    if (near_dist - radius).abs() <= EPSILON {
        return if (0.0..=1.0).contains(&t_near) { vec![t_near] } else { Vec::new() };
    }

    let b = 2.0 * m.dot(d);
    let c = m.length_squared() - radius * radius;
    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return Vec::new();
    }
    let sqrt_disc = disc.sqrt();
    let t0 = (-b - sqrt_disc) / (2.0 * a);
    let t1 = (-b + sqrt_disc) / (2.0 * a);
    [t0, t1].into_iter().filter(|t| (0.0..=1.0).contains(t)).collect()
}

/// Boundary crossings of a segment with a circle, in segment order.
pub(crate) fn segment_circle_points(seg: &Segment, center: Vec2, radius: f32) -> Vec<Vec2> {
    let d = seg.delta();
    segment_circle_fractions(seg, center, radius)
        .into_iter()
        .map(|t| seg.origin + d * t)
        .collect()
}

/// Closest pair of points between two segments: `(on_a, on_b)`.
///
/// A true crossing returns the crossing point (measured along `b`) twice;
/// otherwise the best of the four endpoint-to-segment projections wins.
pub(crate) fn closest_points_segments(a: &Segment, b: &Segment) -> (Vec2, Vec2) {
    if let Some(p) = segment_intersection(b, a) {
        return (p, p);
    }
    let candidates = [
        (a.start(), b.closest_point(a.start())),
        (a.end(), b.closest_point(a.end())),
        (a.closest_point(b.start()), b.start()),
        (a.closest_point(b.end()), b.end()),
    ];
    let mut best = candidates[0];
    let mut best_d = best.0.distance_squared(best.1);
    for &(pa, pb) in &candidates[1..] {
        let d = pa.distance_squared(pb);
        if d < best_d {
            best = (pa, pb);
            best_d = d;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(a: (f32, f32), b: (f32, f32)) -> Segment {
        Segment::from_points(Vec2::new(a.0, a.1), Vec2::new(b.0, b.1))
    }

    #[test]
    fn test_crossing_segments() {
        let a = seg((0.0, 0.0), (2.0, 2.0));
        let b = seg((0.0, 2.0), (2.0, 0.0));
        assert!(segments_overlap(&a, &b));
        let p = segment_intersection(&a, &b).unwrap();
        assert!((p - Vec2::ONE).length() < 1e-5);
    }

    #[test]
    fn test_parallel_segments() {
        let a = seg((0.0, 0.0), (2.0, 0.0));
        let above = seg((0.0, 1.0), (2.0, 1.0));
        assert!(!segments_overlap(&a, &above));
        let collinear = seg((1.0, 0.0), (3.0, 0.0));
        assert!(segments_overlap(&a, &collinear));
        assert!(segment_intersection(&a, &collinear).is_none());
        let apart = seg((2.5, 0.0), (3.0, 0.0));
        assert!(!segments_overlap(&a, &apart));
    }

    #[test]
    fn test_t_junction_touches() {
        let a = seg((0.0, 0.0), (2.0, 0.0));
        let b = seg((1.0, 0.0), (1.0, 1.0));
        assert!(segments_overlap(&a, &b));
        assert!(segment_intersection(&a, &b).is_some());
    }

    #[test]
    fn test_segment_circle_counts() {
        let through = seg((-2.0, 0.0), (2.0, 0.0));
        assert_eq!(segment_circle_points(&through, Vec2::ZERO, 1.0).len(), 2);
        let tangent = seg((-2.0, 1.0), (2.0, 1.0));
        assert_eq!(segment_circle_points(&tangent, Vec2::ZERO, 1.0).len(), 1);
        let inside = seg((-0.5, 0.0), (0.5, 0.0));
        assert!(segment_circle_points(&inside, Vec2::ZERO, 1.0).is_empty());
        let half = seg((0.0, 0.0), (2.0, 0.0));
        let pts = segment_circle_points(&half, Vec2::ZERO, 1.0);
        assert_eq!(pts.len(), 1);
        assert!((pts[0] - Vec2::X).length() < 1e-5);
    }

    #[test]
    fn test_closest_points_disjoint() {
        let a = seg((0.0, 0.0), (2.0, 0.0));
        let b = seg((3.0, 1.0), (3.0, 5.0));
        let (pa, pb) = closest_points_segments(&a, &b);
        assert_eq!(pa, Vec2::new(2.0, 0.0));
        assert_eq!(pb, Vec2::new(3.0, 1.0));
    }
}
