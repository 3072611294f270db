use glam::Vec2;

use super::segment::{point_on_segment, segment_intersection};
use crate::shapes::{Circle, Polygon, Primitive, Segment};
use crate::types::{Aabb, EPSILON, RayHit};

pub(crate) fn raycast(ray: &Segment, shape: &Primitive) -> Option<RayHit> {
    match shape {
        Primitive::Point(p) => {
            if !point_on_segment(*p, ray) {
                return None;
            }
            let s = ray.project(*p).clamp(0.0, ray.len());
            Some(hit(ray, s, -ray.dir()))
        }
        Primitive::Circle(c) => ray_circle(ray, c),
        Primitive::Segment(s) => ray_edge(ray, s),
        Primitive::Rect(r) => ray_aabb(ray, &r.aabb()),
        Primitive::Polygon(poly) => ray_polygon(ray, poly),
    }
}

fn hit(ray: &Segment, distance: f32, normal: Vec2) -> RayHit {
    let fraction = if ray.len() > 0.0 { distance / ray.len() } else { 0.0 };
    RayHit {
        fraction,
        distance,
        point: ray.at(distance),
        normal,
    }
}

/// Solve `|o + s*dir - c|^2 = r^2` for the smallest `s` in `[0, len]`.
fn ray_circle(ray: &Segment, c: &Circle) -> Option<RayHit> {
    let m = ray.origin - c.center;
    let b = m.dot(ray.dir());
    let cc = m.length_squared() - c.radius_sq();
    if ray.is_degenerate() {
        return (cc <= 0.0).then(|| hit(ray, 0.0, Vec2::ZERO));
    }
    let disc = b * b - cc;
    if disc < 0.0 {
        return None;
    }
    let sqrt_disc = disc.sqrt();
    let s = [-b - sqrt_disc, -b + sqrt_disc]
        .into_iter()
        .find(|s| (0.0..=ray.len()).contains(s))?;
    let point = ray.at(s);
    Some(hit(ray, s, (point - c.center).normalize_or_zero()))
}

fn ray_edge(ray: &Segment, edge: &Segment) -> Option<RayHit> {
    let point = segment_intersection(ray, edge)?;
    let s = ray.project(point).clamp(0.0, ray.len());
    Some(hit(ray, s, edge.normal_towards(ray.origin)))
}

/// Slab test clamped to the segment; a start inside reports `s = 0` with no normal.
fn ray_aabb(ray: &Segment, aabb: &Aabb) -> Option<RayHit> {
    let d = ray.delta();
    let mut tmin = 0.0f32;
    let mut tmax = 1.0f32;
    let mut n_enter = Vec2::ZERO;

    for axis in 0..2 {
        let (o, dir, lo, hi) = (ray.origin[axis], d[axis], aabb.min[axis], aabb.max[axis]);
        if dir.abs() < EPSILON {
            if o < lo || o > hi {
                return None;
            }
            continue;
        }
        let inv = 1.0 / dir;
        let mut t1 = (lo - o) * inv;
        let mut t2 = (hi - o) * inv;
        let mut n = -1.0;
        if t1 > t2 {
            core::mem::swap(&mut t1, &mut t2);
            n = 1.0;
        }
        if t1 > tmin {
            tmin = t1;
            n_enter = if axis == 0 { Vec2::new(n, 0.0) } else { Vec2::new(0.0, n) };
        }
        if t2 < tmax {
            tmax = t2;
        }
        if tmin > tmax {
            return None;
        }
    }

    let normal = if tmin == 0.0 && aabb.contains_point(ray.origin) {
        Vec2::ZERO
    } else {
        n_enter
    };
    Some(hit(ray, tmin * ray.len(), normal))
}

fn ray_polygon(ray: &Segment, poly: &Polygon) -> Option<RayHit> {
    if poly.is_degenerate() {
        return None;
    }
    poly.edges()
        .filter_map(|e| ray_edge(ray, &e))
        .min_by(|a, b| a.distance.total_cmp(&b.distance))
}
