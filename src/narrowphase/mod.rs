//! Stateless narrowphase predicates: overlap, intersection manifold, closest
//! point, containment and raycasts over every [`Primitive`] pair.

use glam::Vec2;

use crate::api::NarrowphaseApi;
use crate::shapes::{Primitive, Segment};
use crate::types::*;

mod closest;
mod contains;
mod intersect;
mod overlap;
mod raycast;
pub(crate) mod segment;

/// Narrowphase primitive tests.
pub struct Narrowphase;

impl NarrowphaseApi for Narrowphase {
    fn overlap(a: &Primitive, b: &Primitive) -> bool {
        overlap::overlap(a, b)
    }

    fn intersect_with_reference(a: &Primitive, b: &Primitive, reference: Vec2) -> Option<ContactManifold> {
        intersect::intersect(a, b, reference)
    }

    fn closest_point(a: &Primitive, b: &Primitive) -> Option<Vec2> {
        closest::closest_point(a, b)
    }

    fn contains(a: &Primitive, b: &Primitive) -> bool {
        contains::contains(a, b)
    }

    fn raycast(ray: &Segment, shape: &Primitive) -> Option<RayHit> {
        raycast::raycast(ray, shape)
    }
}

/// Edge list of an edge-shaped primitive; `None` when it encloses nothing usable.
pub(crate) fn edges_of(shape: &Primitive) -> Option<Vec<Segment>> {
    match shape {
        Primitive::Polygon(poly) if poly.is_degenerate() => None,
        _ => Some(shape.edges()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::Alignment;
    use rstest::rstest;

    /// One representative of every variant, clustered so that most pairs touch.
    fn zoo() -> Vec<Primitive> {
        vec![
            Primitive::point(Vec2::new(1.0, 1.0)),
            Primitive::circle(Vec2::new(0.0, 0.0), 2.0),
            Primitive::segment(Vec2::new(-3.0, 1.0), Vec2::new(3.0, 1.0)),
            Primitive::rect(Vec2::new(0.5, 0.5), Vec2::new(2.0, 2.0), Alignment::TopLeft),
            Primitive::polygon(vec![Vec2::new(0.0, -1.0), Vec2::new(2.0, 0.0), Vec2::new(0.0, 3.0)]),
        ]
    }

    /// The same variants spread out so that nothing touches.
    fn apart() -> Vec<Primitive> {
        vec![
            Primitive::point(Vec2::new(100.0, 0.0)),
            Primitive::circle(Vec2::new(0.0, 100.0), 2.0),
            Primitive::segment(Vec2::new(-50.0, -50.0), Vec2::new(-40.0, -50.0)),
            Primitive::rect(Vec2::new(60.0, 60.0), Vec2::new(2.0, 2.0), Alignment::TopLeft),
            Primitive::polygon(vec![Vec2::new(-80.0, 80.0), Vec2::new(-78.0, 80.0), Vec2::new(-79.0, 83.0)]),
        ]
    }

    #[rstest]
    fn test_overlap_is_symmetric(#[values(0, 1, 2, 3, 4)] i: usize, #[values(0, 1, 2, 3, 4)] j: usize) {
        for set in [zoo(), apart()] {
            let (a, b) = (&set[i], &set[j]);
            assert_eq!(Narrowphase::overlap(a, b), Narrowphase::overlap(b, a), "{a:?} vs {b:?}");
        }
    }

    #[rstest]
    fn test_clustered_shapes_overlap(#[values(0, 1, 2, 3, 4)] i: usize, #[values(0, 1, 2, 3, 4)] j: usize) {
        let set = zoo();
        assert!(Narrowphase::overlap(&set[i], &set[j]), "{:?} vs {:?}", set[i], set[j]);
    }

    #[rstest]
    fn test_spread_shapes_are_apart(#[values(0, 1, 2, 3, 4)] i: usize, #[values(0, 1, 2, 3, 4)] j: usize) {
        if i == j {
            return;
        }
        let set = apart();
        assert!(!Narrowphase::overlap(&set[i], &set[j]));
        assert!(Narrowphase::intersect(&set[i], &set[j]).is_none());
        assert!(!Narrowphase::contains(&set[i], &set[j]));
    }

    #[rstest]
    fn test_containment_implies_overlap(#[values(0, 1, 2, 3, 4)] i: usize, #[values(0, 1, 2, 3, 4)] j: usize) {
        let outer = [
            Primitive::point(Vec2::ZERO),
            Primitive::circle(Vec2::ZERO, 10.0),
            Primitive::segment(Vec2::new(-10.0, 0.0), Vec2::new(10.0, 0.0)),
            Primitive::rect(Vec2::ZERO, Vec2::splat(20.0), Alignment::Center),
            Primitive::polygon(vec![Vec2::new(-9.0, -9.0), Vec2::new(9.0, -9.0), Vec2::new(0.0, 9.0)]),
        ];
        let inner = [
            Primitive::point(Vec2::new(0.5, 0.0)),
            Primitive::circle(Vec2::ZERO, 1.0),
            Primitive::segment(Vec2::new(-1.0, 0.0), Vec2::new(1.0, 0.0)),
            Primitive::rect(Vec2::ZERO, Vec2::splat(2.0), Alignment::Center),
            Primitive::polygon(vec![Vec2::new(-1.0, -1.0), Vec2::new(1.0, -1.0), Vec2::new(0.0, 1.0)]),
        ];
        let (a, b) = (&outer[i], &inner[j]);
        if Narrowphase::contains(a, b) {
            assert!(Narrowphase::overlap(a, b), "{a:?} contains {b:?} but does not overlap it");
        }
    }

    #[test]
    fn test_closest_point_lies_on_other_shape() {
        let set = zoo();
        for a in &set {
            for b in &set {
                let p = Narrowphase::closest_point(a, b).unwrap();
                // Re-projecting a boundary point onto `b` must not move it.
                let q = Narrowphase::closest_point(&Primitive::point(p), b).unwrap();
                assert!(q.distance(p) < 1e-4, "{a:?} -> {b:?}: {p} vs {q}");
            }
        }
    }
}
