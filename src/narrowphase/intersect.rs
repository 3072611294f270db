use glam::Vec2;

use super::edges_of;
use super::overlap::overlap;
use super::segment::{segment_circle_points, segment_intersection};
use crate::shapes::{Circle, Primitive, Segment};
use crate::types::{Contact, ContactManifold, EPSILON};

pub(crate) fn intersect(a: &Primitive, b: &Primitive, reference: Vec2) -> Option<ContactManifold> {
    use Primitive as P;
    let contacts = match (a, b) {
        (P::Point(p), _) => point_contact(a, b, *p, b.center(), reference)?,
        (_, P::Point(p)) => point_contact(a, b, *p, *p, reference)?,

        (P::Circle(c0), P::Circle(c1)) => circle_circle(c0, c1)?,
        (P::Circle(c), P::Segment(_) | P::Rect(_) | P::Polygon(_)) => circle_edges(c, &edges_of(b)?, reference),
        (P::Segment(_) | P::Rect(_) | P::Polygon(_), P::Circle(c)) => edges_circle(&edges_of(a)?, c),

        (P::Segment(_) | P::Rect(_) | P::Polygon(_), P::Segment(_) | P::Rect(_) | P::Polygon(_)) => {
            edges_edges(&edges_of(a)?, &edges_of(b)?, reference)
        }
    };
    ContactManifold::from_contacts(contacts, reference)
}

/// A point has no boundary: it "intersects" when it lies in the other shape,
/// and the normal points from `from` towards the reference.
fn point_contact(a: &Primitive, b: &Primitive, p: Vec2, from: Vec2, reference: Vec2) -> Option<Vec<Contact>> {
    if !overlap(a, b) {
        return None;
    }
    let mut normal = (reference - from).normalize_or_zero();
    if normal == Vec2::ZERO {
        normal = (p - b.center()).normalize_or_zero();
    }
    Some(vec![Contact { point: p, normal }])
}

/// Two-circle construction: offset `a` of the chord from `c0` along the center
/// line and half-chord `h`.
fn circle_circle(c0: &Circle, c1: &Circle) -> Option<Vec<Contact>> {
    let r0 = c0.radius();
    let r1 = c1.radius();
    let delta = c1.center - c0.center;
    let d = delta.length();
    if d > r0 + r1 + EPSILON {
        return None;
    }
    if d < (r0 - r1).abs() - EPSILON {
        return None;
    }
    if d <= EPSILON {
        return None;
    }
    let a = (r0 * r0 - r1 * r1 + d * d) / (2.0 * d);
    let h_sq = r0 * r0 - a * a;
    let axis = delta / d;
    let mid = c0.center + axis * a;
    let outward = |p: Vec2| (p - c1.center).normalize_or_zero();

    // Tangency is judged on the center distance, relative to the radii.
    let tol = f32::EPSILON * 4.0 * (r0 + r1).max(1.0);
    let tangent = (d - (r0 + r1)).abs() <= tol || (d - (r0 - r1).abs()).abs() <= tol;
    if tangent || h_sq <= 0.0 {
        return Some(vec![Contact {
            point: mid,
            normal: outward(mid),
        }]);
    }
    let offset = axis.perp() * h_sq.sqrt();
    Some(
        [mid + offset, mid - offset]
            .into_iter()
            .map(|point| Contact {
                point,
                normal: outward(point),
            })
            .collect(),
    )
}

/// Circle `a` against the edges of `b`: normals are the edge normals turned
/// towards the reference.
fn circle_edges(c: &Circle, edges: &[Segment], reference: Vec2) -> Vec<Contact> {
    let mut out = Vec::new();
    for e in edges {
        let normal = e.normal_towards(reference);
        for point in segment_circle_points(e, c.center, c.radius()) {
            push_unique(&mut out, Contact { point, normal });
        }
    }
    out
}

/// Edges of `a` against circle `b`: normals point out of the circle.
fn edges_circle(edges: &[Segment], c: &Circle) -> Vec<Contact> {
    let mut out = Vec::new();
    for e in edges {
        for point in segment_circle_points(e, c.center, c.radius()) {
            let normal = (point - c.center).normalize_or_zero();
            push_unique(&mut out, Contact { point, normal });
        }
    }
    out
}

fn edges_edges(a: &[Segment], b: &[Segment], reference: Vec2) -> Vec<Contact> {
    let mut out = Vec::new();
    for ea in a {
        for eb in b {
            if let Some(point) = segment_intersection(ea, eb) {
                push_unique(
                    &mut out,
                    Contact {
                        point,
                        normal: eb.normal_towards(reference),
                    },
                );
            }
        }
    }
    out
}

/// Shared polygon vertices are found once per adjacent edge; keep the first.
fn push_unique(out: &mut Vec<Contact>, contact: Contact) {
    if !out
        .iter()
        .any(|c| c.point.distance_squared(contact.point) <= EPSILON * EPSILON)
    {
        out.push(contact);
    }
}
