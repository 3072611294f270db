//! Continuous collision: time of impact between two moving primitives.

use glam::Vec2;

use crate::api::{NarrowphaseApi, SweepApi};
use crate::narrowphase::{Narrowphase, edges_of};
use crate::shapes::{Primitive, Segment};
use crate::types::{CastResult, EPSILON, SweepOutcome};

/// Analytic sweep caster.
///
/// The second shape is held still and the first moves by the relative
/// displacement `(vel_a - vel_b) * dt`; every result is reported in that frame.
pub struct Sweep;

/// First contact found by one of the pair routines.
#[derive(Copy, Clone, Debug)]
struct Toi {
    t: f32,
    /// Touched point on the stationary shape.
    point: Vec2,
    /// From the stationary shape towards the moving one.
    normal: Vec2,
}

impl SweepApi for Sweep {
    fn cast_shapes(a: &Primitive, vel_a: Vec2, b: &Primitive, vel_b: Vec2, dt: f32) -> SweepOutcome {
        if Narrowphase::overlap(a, b) {
            return SweepOutcome::Overlapping;
        }
        let v = (vel_a - vel_b) * dt;
        if v.length_squared() <= EPSILON * EPSILON {
            return SweepOutcome::Stationary;
        }
        let Some(hit) = first_contact(a, b, v) else {
            return SweepOutcome::Miss;
        };

        let remaining = v * (1.0 - hit.t);
        SweepOutcome::Impact(CastResult {
            toi: hit.t,
            intersection_point: a.center() + v * hit.t,
            collision_point: hit.point,
            normal: hit.normal,
            reflect: remaining - 2.0 * remaining.dot(hit.normal) * hit.normal,
            velocity_a: vel_a,
            velocity_b: vel_b,
        })
    }
}

fn first_contact(a: &Primitive, b: &Primitive, v: Vec2) -> Option<Toi> {
    use Primitive as P;
    match (a, b) {
        (P::Point(_), P::Point(_)) => None,
        (P::Point(p), P::Circle(c)) => round_round(*p, 0.0, c.center, c.radius(), v),
        (P::Circle(c), P::Point(q)) => round_round(c.center, c.radius(), *q, 0.0, v),
        (P::Circle(c0), P::Circle(c1)) => round_round(c0.center, c0.radius(), c1.center, c1.radius(), v),

        (P::Point(p), P::Segment(_) | P::Rect(_) | P::Polygon(_)) => round_edges(*p, 0.0, &edges_of(b)?, v),
        (P::Circle(c), P::Segment(_) | P::Rect(_) | P::Polygon(_)) => {
            round_edges(c.center, c.radius(), &edges_of(b)?, v)
        }

        // Mirrored: let the round shape move against the edges instead.
        (P::Segment(_) | P::Rect(_) | P::Polygon(_), P::Point(q)) => {
            round_edges(*q, 0.0, &edges_of(a)?, -v).map(|h| flip(h, *q, 0.0))
        }
        (P::Segment(_) | P::Rect(_) | P::Polygon(_), P::Circle(c)) => {
            round_edges(c.center, c.radius(), &edges_of(a)?, -v).map(|h| flip(h, c.center, c.radius()))
        }

        (P::Segment(_) | P::Rect(_) | P::Polygon(_), P::Segment(_) | P::Rect(_) | P::Polygon(_)) => {
            edges_edges(a, b, v)
        }
    }
}

/// Turn a contact found with `b` (a round shape of radius `r` at `center`)
/// as the mover back into `b`'s frame.
fn flip(hit: Toi, center: Vec2, r: f32) -> Toi {
    Toi {
        t: hit.t,
        point: center - hit.normal * r,
        normal: -hit.normal,
    }
}

fn keep_earliest(best: &mut Option<Toi>, candidate: Option<Toi>) {
    if let Some(c) = candidate {
        if best.is_none_or(|b| c.t < b.t) {
            *best = Some(c);
        }
    }
}

/// Swept sphere: solve `|p + v*t - c|^2 = (rp + rc)^2`, smaller root in `[0,1]`.
fn round_round(p: Vec2, rp: f32, c: Vec2, rc: f32, v: Vec2) -> Option<Toi> {
    let radius = rp + rc;
    if radius <= 0.0 {
        return None;
    }
    let m = p - c;
    let a = v.length_squared();
    let b = m.dot(v);
    let cc = m.length_squared() - radius * radius;
    let disc = b * b - a * cc;
    if disc < 0.0 {
        return None;
    }
    let t = (-b - disc.sqrt()) / a;
    if !(0.0..=1.0).contains(&t) {
        return None;
    }
    let normal = (p + v * t - c).normalize_or_zero();
    Some(Toi {
        t,
        point: c + normal * rc,
        normal,
    })
}

/// Point or circle against a set of edges: the straight part of each edge
/// offset by `r`, plus rounded caps at both endpoints.
fn round_edges(p: Vec2, r: f32, edges: &[Segment], v: Vec2) -> Option<Toi> {
    let mut best = None;
    for e in edges {
        keep_earliest(&mut best, straight_edge(p, r, e, v));
        if r > 0.0 {
            keep_earliest(&mut best, round_round(p, r, e.start(), 0.0, v));
            keep_earliest(&mut best, round_round(p, r, e.end(), 0.0, v));
        }
    }
    best
}

fn straight_edge(p: Vec2, r: f32, e: &Segment, v: Vec2) -> Option<Toi> {
    if e.is_degenerate() {
        return None;
    }
    let n = e.normal_towards(p);
    let d0 = n.dot(p - e.origin);
    let approach = n.dot(v);
    if approach.abs() <= EPSILON * v.length() {
        // Parallel motion only reaches the edge when travelling along its line.
        return if r <= 0.0 && d0.abs() <= EPSILON {
            slide_along(p, e, v)
        } else {
            None
        };
    }
    if approach > 0.0 {
        return None;
    }
    let t = (r - d0) / approach;
    if !(0.0..=1.0).contains(&t) {
        return None;
    }
    let s = e.project(p + v * t);
    if s < -EPSILON || s > e.len() + EPSILON {
        return None;
    }
    Some(Toi {
        t,
        point: e.at(s.clamp(0.0, e.len())),
        normal: n,
    })
}

/// A point on the edge's line moving along it hits the nearer endpoint.
fn slide_along(p: Vec2, e: &Segment, v: Vec2) -> Option<Toi> {
    let s0 = e.project(p);
    let ds = e.dir().dot(v);
    let (t, point) = if s0 < 0.0 && ds > 0.0 {
        (-s0 / ds, e.start())
    } else if s0 > e.len() && ds < 0.0 {
        ((e.len() - s0) / ds, e.end())
    } else {
        return None;
    };
    if !(0.0..=1.0).contains(&t) {
        return None;
    }
    Some(Toi {
        t,
        point,
        normal: -v.normalize_or_zero(),
    })
}

/// Every vertex of `a` against `b`'s edges, then every vertex of `b` against
/// `a`'s edges with the motion reversed.
fn edges_edges(a: &Primitive, b: &Primitive, v: Vec2) -> Option<Toi> {
    let edges_a = edges_of(a)?;
    let edges_b = edges_of(b)?;
    let mut best = None;
    for q in a.vertices() {
        keep_earliest(&mut best, round_edges(q, 0.0, &edges_b, v));
    }
    for q in b.vertices() {
        keep_earliest(&mut best, round_edges(q, 0.0, &edges_a, -v).map(|h| flip(h, q, 0.0)));
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collider::Collider;
    use crate::shapes::Alignment;
    use approx::assert_abs_diff_eq;

    fn impact(outcome: SweepOutcome) -> CastResult {
        match outcome {
            SweepOutcome::Impact(hit) => hit,
            other => panic!("expected impact, got {other:?}"),
        }
    }

    #[test]
    fn test_circle_circle_head_on() {
        let a = Primitive::circle(Vec2::new(-2.0, 0.0), 0.5);
        let b = Primitive::circle(Vec2::ZERO, 0.5);
        let hit = impact(Sweep::cast_shapes(&a, Vec2::new(4.0, 0.0), &b, Vec2::ZERO, 1.0));
        assert_abs_diff_eq!(hit.toi, 0.25, epsilon = 1e-5);
        assert_abs_diff_eq!(hit.normal.x, -1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(hit.intersection_point.x, -1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(hit.collision_point.x, -0.5, epsilon = 1e-5);
        // Remaining 3 units of travel bounce straight back.
        assert_abs_diff_eq!(hit.reflect.x, -3.0, epsilon = 1e-4);
        assert_abs_diff_eq!(hit.reflect.y, 0.0, epsilon = 1e-4);
        assert_eq!(hit.velocity_a, Vec2::new(4.0, 0.0));
    }

    #[test]
    fn test_both_moving_uses_relative_velocity() {
        let a = Primitive::circle(Vec2::new(-2.0, 0.0), 0.5);
        let b = Primitive::circle(Vec2::ZERO, 0.5);
        let hit = impact(Sweep::cast_shapes(&a, Vec2::new(2.0, 0.0), &b, Vec2::new(-2.0, 0.0), 1.0));
        assert_abs_diff_eq!(hit.toi, 0.25, epsilon = 1e-5);
        assert_eq!(hit.velocity_b, Vec2::new(-2.0, 0.0));
    }

    #[test]
    fn test_overlapping_stationary_and_miss() {
        let a = Primitive::circle(Vec2::ZERO, 1.0);
        let near = Primitive::circle(Vec2::new(1.5, 0.0), 1.0);
        let far = Primitive::circle(Vec2::new(10.0, 0.0), 1.0);
        let v = Vec2::new(1.0, 0.0);
        assert_eq!(Sweep::cast_shapes(&a, v, &near, Vec2::ZERO, 1.0), SweepOutcome::Overlapping);
        assert_eq!(Sweep::cast_shapes(&a, v, &far, v, 1.0), SweepOutcome::Stationary);
        assert_eq!(Sweep::cast_shapes(&a, -v, &far, Vec2::ZERO, 1.0), SweepOutcome::Miss);
        let p = Primitive::point(Vec2::ZERO);
        let q = Primitive::point(Vec2::X);
        assert_eq!(Sweep::cast_shapes(&p, v * 5.0, &q, Vec2::ZERO, 1.0), SweepOutcome::Miss);
    }

    #[test]
    fn test_point_through_segment() {
        let p = Primitive::point(Vec2::new(0.0, -5.0));
        let s = Primitive::segment(Vec2::new(-1.0, 0.0), Vec2::new(1.0, 0.0));
        let hit = impact(Sweep::cast_shapes(&p, Vec2::new(0.0, 10.0), &s, Vec2::ZERO, 1.0));
        assert_abs_diff_eq!(hit.toi, 0.5, epsilon = 1e-5);
        assert_abs_diff_eq!(hit.normal.y, -1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(hit.collision_point.x, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn test_circle_hits_segment_endpoint_cap() {
        let c = Primitive::circle(Vec2::new(-5.0, 0.0), 1.0);
        let s = Primitive::segment(Vec2::ZERO, Vec2::new(5.0, 0.0));
        let hit = impact(Sweep::cast_shapes(&c, Vec2::new(10.0, 0.0), &s, Vec2::ZERO, 1.0));
        assert_abs_diff_eq!(hit.toi, 0.4, epsilon = 1e-5);
        assert_eq!(hit.collision_point, Vec2::ZERO);
        assert_abs_diff_eq!(hit.normal.x, -1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_rect_into_circle_is_mirrored() {
        let r = Primitive::rect(Vec2::ZERO, Vec2::splat(2.0), Alignment::Center);
        let c = Primitive::circle(Vec2::new(5.0, 0.0), 1.0);
        let hit = impact(Sweep::cast_shapes(&r, Vec2::new(10.0, 0.0), &c, Vec2::ZERO, 1.0));
        assert_abs_diff_eq!(hit.toi, 0.3, epsilon = 1e-5);
        assert_abs_diff_eq!(hit.normal.x, -1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(hit.collision_point.x, 4.0, epsilon = 1e-5);
        assert_abs_diff_eq!(hit.intersection_point.x, 3.0, epsilon = 1e-5);
    }

    #[test]
    fn test_rect_slides_into_rect() {
        let a = Primitive::rect(Vec2::ZERO, Vec2::splat(2.0), Alignment::TopLeft);
        let b = Primitive::rect(Vec2::new(5.0, 0.0), Vec2::splat(2.0), Alignment::TopLeft);
        let hit = impact(Sweep::cast_shapes(&a, Vec2::new(10.0, 0.0), &b, Vec2::ZERO, 1.0));
        assert_abs_diff_eq!(hit.toi, 0.3, epsilon = 1e-5);
        assert_abs_diff_eq!(hit.normal.x, -1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(hit.collision_point.x, 5.0, epsilon = 1e-5);
    }

    #[test]
    fn test_vertex_of_stationary_shape_hits_moving_edge() {
        let wall = Primitive::segment(Vec2::new(0.0, -5.0), Vec2::new(0.0, 5.0));
        let tip = Primitive::polygon(vec![Vec2::new(5.0, 0.0), Vec2::new(8.0, -2.0), Vec2::new(8.0, 2.0)]);
        let hit = impact(Sweep::cast_shapes(&wall, Vec2::new(10.0, 0.0), &tip, Vec2::ZERO, 1.0));
        assert_abs_diff_eq!(hit.toi, 0.5, epsilon = 1e-5);
        assert_abs_diff_eq!(hit.normal.x, -1.0, epsilon = 1e-5);
        assert_eq!(hit.collision_point, Vec2::new(5.0, 0.0));
    }

    #[test]
    fn test_shorter_tick_keeps_contact_point() {
        let a = Primitive::circle(Vec2::ZERO, 1.0);
        let b = Primitive::circle(Vec2::new(5.0, 0.0), 1.0);
        let v = Vec2::new(10.0, 0.0);
        let full = impact(Sweep::cast_shapes(&a, v, &b, Vec2::ZERO, 1.0));
        let half = impact(Sweep::cast_shapes(&a, v, &b, Vec2::ZERO, 0.5));
        assert!(half.toi > full.toi);
        assert_abs_diff_eq!(full.intersection_point.x, 3.0, epsilon = 1e-5);
        assert_abs_diff_eq!(half.intersection_point.x, 3.0, epsilon = 1e-5);
        assert_eq!(Sweep::cast_shapes(&a, v, &b, Vec2::ZERO, 0.25), SweepOutcome::Miss);
    }

    #[test]
    fn test_cast_reads_collider_motion() {
        let a = Collider::new(Primitive::point(Vec2::new(0.0, -5.0))).with_velocity(Vec2::new(0.0, 20.0));
        let b = Collider::new(Primitive::rect(Vec2::ZERO, Vec2::splat(2.0), Alignment::Center));
        let hit = impact(Sweep::cast(&a, &b, 0.5));
        // Reaches the top edge (y = -1) after 4 of its 10 units.
        assert_abs_diff_eq!(hit.toi, 0.4, epsilon = 1e-5);
        assert_abs_diff_eq!(hit.normal.y, -1.0, epsilon = 1e-5);
    }
}
