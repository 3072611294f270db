use glam::Vec2;

use crate::collider::Collider;
use crate::registry::{CollisionEvent, RegistryCommands};
use crate::shapes::{Primitive, Segment};
use crate::types::*;

/// Narrowphase predicates over the closed [`Primitive`] set.
///
/// Every entry point dispatches on the concrete variant pair; mirrored pairs
/// share one implementation.
pub trait NarrowphaseApi {
    /// Boolean overlap test.
    fn overlap(a: &Primitive, b: &Primitive) -> bool;

    /// Boundary intersection manifold, normals oriented towards `a`'s center.
    fn intersect(a: &Primitive, b: &Primitive) -> Option<ContactManifold> {
        Self::intersect_with_reference(a, b, a.center())
    }

    /// Boundary intersection manifold, normals oriented towards `reference`.
    fn intersect_with_reference(a: &Primitive, b: &Primitive, reference: Vec2) -> Option<ContactManifold>;

    /// Point on `b` closest to `a`. `None` for degenerate input.
    fn closest_point(a: &Primitive, b: &Primitive) -> Option<Vec2>;

    /// Strict containment of `b` inside `a`.
    fn contains(a: &Primitive, b: &Primitive) -> bool;

    /// First boundary hit of `ray` against `shape`.
    fn raycast(ray: &Segment, shape: &Primitive) -> Option<RayHit>;
}

/// Continuous (swept) collision between moving primitives.
pub trait SweepApi {
    /// Cast `a` against `b` over one tick of length `dt`.
    fn cast_shapes(a: &Primitive, vel_a: Vec2, b: &Primitive, vel_b: Vec2, dt: f32) -> SweepOutcome;

    /// Cast two colliders using their own shapes and velocities.
    fn cast(a: &Collider, b: &Collider, dt: f32) -> SweepOutcome {
        Self::cast_shapes(&a.shape, a.velocity, &b.shape, b.velocity, dt)
    }
}

/// Capability contract for objects managed by [`crate::registry::CollisionRegistry`].
///
/// The callbacks run after the whole detection pass of a tick has finished.
/// Additions and removals queued through `commands` apply on the next tick.
pub trait Collidable: Sized {
    fn collider(&self) -> &Collider;

    fn position(&self) -> Vec2 {
        self.collider().position()
    }

    fn collision_layer(&self) -> Layer {
        self.collider().layer
    }

    fn collision_mask(&self) -> LayerMask {
        self.collider().mask
    }

    /// A new overlap episode started.
    fn on_collision(&mut self, _event: &CollisionEvent, _commands: &mut RegistryCommands<Self>) {}

    /// An overlap episode continued for another tick.
    fn on_overlap(&mut self, _event: &CollisionEvent, _commands: &mut RegistryCommands<Self>) {}

    /// An overlap episode ended.
    fn on_overlap_ended(&mut self, _other: ColliderId, _commands: &mut RegistryCommands<Self>) {}
}

impl Collidable for Collider {
    fn collider(&self) -> &Collider {
        self
    }
}

/// Capability contract for objects managed by [`crate::grid::GridCollisionSystem`].
pub trait CellCollider {
    /// Caller-defined kind tag, echoed in grid events.
    fn type_tag(&self) -> u32;

    fn collision_layer(&self) -> Layer;

    fn collision_mask(&self) -> LayerMask;

    /// Disabled objects are neither advanced nor kept in a cell.
    fn is_enabled(&self) -> bool {
        true
    }

    /// Advance one tick and report the new world position.
    fn update(&mut self, dt: f32) -> Vec2;

    fn on_enter_cell(&mut self, _coord: CellCoord) {}

    fn on_exit_cell(&mut self, _coord: CellCoord) {}

    fn on_collision_started(&mut self, _other: ColliderId) {}

    fn on_collision_ended(&mut self, _other: ColliderId) {}
}

/// Sink for the informational debug view of either orchestrator.
pub trait DebugDraw {
    /// One grid cell and how many objects it holds.
    fn draw_cell(&mut self, bounds: Aabb, occupants: usize);
}
