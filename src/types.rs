use glam::Vec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Tolerance used by the geometry kernel for parallel / degenerate checks.
pub const EPSILON: f32 = 1e-5;

/// Stable handle for an object registered with one of the orchestrators.
///
/// Ids are handed out monotonically and never reused by the same orchestrator,
/// so ordering by id is insertion order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ColliderId(pub u64);

/// A single collision category. Only indices `0..32` map onto a [`LayerMask`] bit.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Layer(pub u8);

impl Layer {
    /// Bit of this layer inside a [`LayerMask`] (zero for out-of-range indices).
    pub fn bit(self) -> u32 {
        1u32.checked_shl(u32::from(self.0)).unwrap_or(0)
    }
}

/// Set of layers an object tests against.
///
/// The empty mask means "collide with everything".
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LayerMask(pub u32);

impl LayerMask {
    pub const EMPTY: LayerMask = LayerMask(0);
    pub const ALL: LayerMask = LayerMask(u32::MAX);

    /// Convenience constructor from a list of layers.
    pub fn of(layers: &[Layer]) -> Self {
        Self(layers.iter().fold(0, |acc, l| acc | l.bit()))
    }

    pub fn with(self, layer: Layer) -> Self {
        Self(self.0 | layer.bit())
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn contains(self, layer: Layer) -> bool {
        (self.0 & layer.bit()) != 0
    }

    /// Registry filtering rule: an empty mask accepts every layer,
    /// otherwise the other object's layer must be in the mask.
    pub fn accepts(self, layer: Layer) -> bool {
        self.is_empty() || self.contains(layer)
    }
}

/// Axis-aligned bounding box given by its min and max corners.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    pub fn from_center(center: Vec2, half_extents: Vec2) -> Self {
        Self::new(center - half_extents, center + half_extents)
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Inclusive overlap: touching edges count.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }

    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Grow the box to also cover itself translated by `delta` (swept bounds).
    pub fn swept(&self, delta: Vec2) -> Aabb {
        self.union(&Aabb {
            min: self.min + delta,
            max: self.max + delta,
        })
    }

    pub fn expand(&self, amount: f32) -> Aabb {
        Aabb::new(self.min - Vec2::splat(amount), self.max + Vec2::splat(amount))
    }
}

/// One raw contact: a point and the outward normal at that point.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Contact {
    pub point: Vec2,
    pub normal: Vec2,
}

/// Result of an intersection query.
///
/// Normals point out of the second operand, towards the reference point the
/// query was made with (by default the first operand's center).
#[derive(Clone, Debug, PartialEq)]
pub struct ContactManifold {
    /// Representative contact point.
    pub point: Vec2,
    /// Representative outward normal.
    pub normal: Vec2,
    /// Raw contacts in discovery order.
    pub contacts: Vec<Contact>,
}

impl ContactManifold {
    /// Fold raw contacts into a manifold.
    ///
    /// One contact is its own representative. Two contacts are summarised by
    /// their midpoint and the chord normal turned towards `reference`. With
    /// more than two, the first contact stands for the whole set.
    pub fn from_contacts(contacts: Vec<Contact>, reference: Vec2) -> Option<Self> {
        let (point, normal) = match contacts.as_slice() {
            [] => return None,
            [only] => (only.point, only.normal),
            [c0, c1] => {
                let mid = (c0.point + c1.point) * 0.5;
                let chord = c1.point - c0.point;
                let mut normal = chord.perp().normalize_or_zero();
                if normal == Vec2::ZERO {
                    normal = (c0.normal + c1.normal).normalize_or_zero();
                } else if normal.dot(reference - mid) < 0.0 {
                    normal = -normal;
                }
                (mid, normal)
            }
            [first, ..] => (first.point, first.normal),
        };
        Some(Self {
            point,
            normal,
            contacts,
        })
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }
}

/// Time-of-impact result of a continuous cast.
///
/// Positions are expressed in the frame of the second shape, which is treated
/// as stationary while the first moves by the relative displacement.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CastResult {
    /// Fraction in `[0,1]` of the tick's relative displacement at first contact.
    pub toi: f32,
    /// Where the first shape's reference point (center / origin) is at impact.
    pub intersection_point: Vec2,
    /// Touched point on the second shape's boundary.
    pub collision_point: Vec2,
    /// Contact normal, pointing from the second shape towards the first.
    pub normal: Vec2,
    /// Remaining relative displacement mirrored about `normal`.
    pub reflect: Vec2,
    /// Pre-impact velocity of the first shape.
    pub velocity_a: Vec2,
    /// Pre-impact velocity of the second shape.
    pub velocity_b: Vec2,
}

/// Outcome of a continuous cast between two moving primitives.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum SweepOutcome {
    /// The shapes already overlap at the start of the tick.
    Overlapping,
    /// The relative velocity is zero and the shapes are apart.
    Stationary,
    /// Relative motion does not bring the shapes together within the tick.
    Miss,
    /// First contact within the tick.
    Impact(CastResult),
}

impl SweepOutcome {
    pub fn impact(&self) -> Option<&CastResult> {
        match self {
            SweepOutcome::Impact(hit) => Some(hit),
            _ => None,
        }
    }
}

/// First boundary hit of a ray or line segment.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RayHit {
    /// Fraction along the cast segment in `[0,1]`.
    pub fraction: f32,
    /// Distance from the segment start.
    pub distance: f32,
    pub point: Vec2,
    /// Surface normal at the hit; zero when the ray starts inside a rect.
    pub normal: Vec2,
}

/// Debug/performance statistics for a built spatial hash.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct HashStats {
    pub entries: usize,
    /// Cells holding at least one entry.
    pub occupied_cells: usize,
    /// Sum of per-cell pair counts (n*(n-1)/2), counts duplicates across cells.
    pub candidate_pairs: usize,
}

/// Integer coordinate of a world-grid cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CellCoord {
    pub x: i32,
    pub y: i32,
}

impl CellCoord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Cell containing world position `p` for square cells of `cell_size`.
    pub fn containing(p: Vec2, cell_size: f32) -> Self {
        Self {
            x: (p.x / cell_size).floor() as i32,
            y: (p.y / cell_size).floor() as i32,
        }
    }

    /// World rectangle covered by this cell.
    pub fn bounds(self, cell_size: f32) -> Aabb {
        let min = Vec2::new(self.x as f32, self.y as f32) * cell_size;
        Aabb {
            min,
            max: min + Vec2::splat(cell_size),
        }
    }
}
