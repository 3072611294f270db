use glam::Vec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::shapes::Primitive;
use crate::types::{Aabb, Layer, LayerMask};

/// Extra narrowphase work an object asks for beyond the boolean overlap.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct QueryFlags {
    /// Attach a contact manifold to collision events.
    pub intersection: bool,
    /// Attach the closest point on the other shape to collision events.
    pub closest_point: bool,
}

/// Collision state owned by a simulation object: one primitive plus the
/// motion and filtering data the orchestrators read each tick.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Collider {
    pub shape: Primitive,
    /// Units per second; the sweep caster scales by `dt`.
    pub velocity: Vec2,
    /// Only carried for impulse bookkeeping by the caller.
    pub mass: f32,
    pub enabled: bool,
    /// When false the object is neither indexed nor tested.
    pub checks_collisions: bool,
    pub layer: Layer,
    pub mask: LayerMask,
    pub queries: QueryFlags,
}

impl Collider {
    pub fn new(shape: Primitive) -> Self {
        Self {
            shape,
            velocity: Vec2::ZERO,
            mass: 1.0,
            enabled: true,
            checks_collisions: true,
            layer: Layer::default(),
            mask: LayerMask::EMPTY,
            queries: QueryFlags::default(),
        }
    }

    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_mass(mut self, mass: f32) -> Self {
        self.mass = mass;
        self
    }

    pub fn with_layer(mut self, layer: Layer) -> Self {
        self.layer = layer;
        self
    }

    pub fn with_mask(mut self, mask: LayerMask) -> Self {
        self.mask = mask;
        self
    }

    pub fn with_queries(mut self, queries: QueryFlags) -> Self {
        self.queries = queries;
        self
    }

    pub fn position(&self) -> Vec2 {
        self.shape.position()
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.shape.set_position(position);
    }

    /// Advance the shape by `velocity * dt`.
    pub fn integrate(&mut self, dt: f32) {
        self.shape.translate(self.velocity * dt);
    }

    pub fn bounds(&self) -> Aabb {
        self.shape.bounds()
    }

    /// Enabled and collision-checking: eligible for indexing this tick.
    pub fn is_active(&self) -> bool {
        self.enabled && self.checks_collisions
    }

    /// Registry rule: one-sided mask test, empty mask accepts everything.
    pub fn accepts(&self, other: &Collider) -> bool {
        self.mask.accepts(other.layer)
    }
}
