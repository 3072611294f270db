//! List-based collision lifecycle tracker.
//!
//! Every tick the registry rebuilds its [`SpatialHash`] from the active
//! objects, re-tests every object against its neighbours and diffs the result
//! against the previous tick to classify each ordered pair `(this, other)` as
//! started, ongoing or ended. Detection for the whole tick finishes before any
//! callback runs.
//!
//! Objects are kept in id order, so event and callback order is deterministic.

use std::collections::{BTreeMap, BTreeSet};

use glam::Vec2;
use log::{debug, trace, warn};

use crate::api::{Collidable, DebugDraw, NarrowphaseApi};
use crate::config::{ConfigError, HashConfig};
use crate::narrowphase::Narrowphase;
use crate::shapes::{Primitive, Segment};
use crate::spatial_hash::SpatialHash;
use crate::types::{ColliderId, ContactManifold, HashStats, LayerMask, RayHit};

/// Transition of an ordered pair between two ticks.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CollisionPhase {
    /// Overlapping now, not on the previous tick.
    Started,
    /// Overlapping now and on the previous tick.
    Ongoing,
    /// Overlapping on the previous tick, not now.
    Ended,
}

/// One pair transition as seen from `this`.
#[derive(Clone, Debug, PartialEq)]
pub struct CollisionEvent {
    pub phase: CollisionPhase,
    pub this: ColliderId,
    pub other: ColliderId,
    /// Present when `this` opted into intersection queries and the boundaries cross.
    pub manifold: Option<ContactManifold>,
    /// Present when `this` opted into closest-point queries.
    pub closest_point: Option<Vec2>,
}

/// Counters for the most recent tick.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RegistryStats {
    pub tick: u64,
    pub objects: usize,
    /// Objects indexed this tick (enabled and collision-checking).
    pub active: usize,
    /// Narrowphase overlap tests run.
    pub tests: usize,
    /// Ordered pairs found overlapping.
    pub overlapping: usize,
    pub events: usize,
    pub hash: HashStats,
}

/// Additions and removals waiting for the start of the next tick.
///
/// Callbacks receive the registry's queue so they can spawn or despawn
/// objects while the current tick is still being dispatched.
pub struct RegistryCommands<T> {
    next_id: u64,
    add: Vec<(ColliderId, T)>,
    remove: Vec<ColliderId>,
}

impl<T> RegistryCommands<T> {
    fn new() -> Self {
        Self {
            next_id: 0,
            add: Vec::new(),
            remove: Vec::new(),
        }
    }

    /// Queue `object` for insertion; the id is valid immediately.
    pub fn add(&mut self, object: T) -> ColliderId {
        let id = ColliderId(self.next_id);
        self.next_id += 1;
        self.add.push((id, object));
        id
    }

    pub fn remove(&mut self, id: ColliderId) {
        self.remove.push(id);
    }

    pub fn is_empty(&self) -> bool {
        self.add.is_empty() && self.remove.is_empty()
    }
}

pub struct CollisionRegistry<T: Collidable> {
    hash: SpatialHash,
    objects: BTreeMap<ColliderId, T>,
    pending: RegistryCommands<T>,
    /// Partners each object overlapped on the previous tick.
    overlaps: BTreeMap<ColliderId, BTreeSet<ColliderId>>,
    events: Vec<CollisionEvent>,
    stats: RegistryStats,
}

impl<T: Collidable> CollisionRegistry<T> {
    pub fn new(cfg: HashConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            hash: SpatialHash::new(cfg)?,
            objects: BTreeMap::new(),
            pending: RegistryCommands::new(),
            overlaps: BTreeMap::new(),
            events: Vec::new(),
            stats: RegistryStats::default(),
        })
    }

    /// Queue `object` for insertion at the start of the next tick.
    pub fn add(&mut self, object: T) -> ColliderId {
        self.pending.add(object)
    }

    /// Queue `id` for removal at the start of the next tick. Partners that
    /// were overlapping it see the episode end on that tick.
    pub fn remove(&mut self, id: ColliderId) {
        self.pending.remove(id);
    }

    pub fn get(&self, id: ColliderId) -> Option<&T> {
        self.objects.get(&id)
    }

    pub fn get_mut(&mut self, id: ColliderId) -> Option<&mut T> {
        self.objects.get_mut(&id)
    }

    /// Registered objects, pending additions excluded.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ColliderId, &T)> {
        self.objects.iter().map(|(id, o)| (*id, o))
    }

    /// Partners `id` overlapped during the last tick.
    pub fn overlapping(&self, id: ColliderId) -> impl Iterator<Item = ColliderId> + '_ {
        self.overlaps.get(&id).into_iter().flatten().copied()
    }

    /// Run one detection pass and dispatch its callbacks.
    pub fn tick(&mut self) {
        self.events.clear();
        self.flush_pending();

        self.hash.clear();
        let mut active = 0;
        for (id, obj) in &self.objects {
            let collider = obj.collider();
            if collider.is_active() {
                self.hash.add(*id, collider.bounds());
                active += 1;
            }
        }

        let mut tests = 0;
        let mut current: BTreeMap<ColliderId, BTreeSet<ColliderId>> = BTreeMap::new();
        for (id, obj) in &self.objects {
            let collider = obj.collider();
            if !collider.is_active() {
                continue;
            }
            let mask = obj.collision_mask();
            for other_id in self.hash.query(collider.bounds()) {
                if other_id == *id {
                    continue;
                }
                let Some(other) = self.objects.get(&other_id) else {
                    continue;
                };
                if !mask.accepts(other.collision_layer()) {
                    continue;
                }
                tests += 1;
                if Narrowphase::overlap(&collider.shape, &other.collider().shape) {
                    current.entry(*id).or_default().insert(other_id);
                }
            }
        }

        self.classify(&current);
        self.stats = RegistryStats {
            tick: self.stats.tick + 1,
            objects: self.objects.len(),
            active,
            tests,
            overlapping: current.values().map(BTreeSet::len).sum(),
            events: self.events.len(),
            hash: self.hash.stats(),
        };
        self.overlaps = current;

        debug!(
            "registry tick {}: {} active of {}, {} tests, {} overlapping, {} events",
            self.stats.tick, active, self.stats.objects, tests, self.stats.overlapping, self.stats.events
        );
        self.dispatch();
    }

    /// Events of the last tick, in id order of `this` then `other`.
    pub fn drain_events(&mut self) -> Vec<CollisionEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn stats(&self) -> RegistryStats {
        self.stats
    }

    /// Nearest object whose shape the segment `start..end` hits, among those
    /// indexed by the last tick. An empty `mask` accepts every layer.
    pub fn linecast(&self, start: Vec2, end: Vec2, mask: LayerMask) -> Option<(ColliderId, RayHit)> {
        let ray = Segment::from_points(start, end);
        self.hash
            .linecast(start, end)
            .into_iter()
            .filter_map(|id| {
                let obj = self.objects.get(&id)?;
                if !obj.collider().is_active() || !mask.accepts(obj.collision_layer()) {
                    return None;
                }
                Narrowphase::raycast(&ray, &obj.collider().shape).map(|hit| (id, hit))
            })
            .min_by(|(_, a), (_, b)| a.distance.total_cmp(&b.distance))
    }

    /// Active objects overlapping `region`, in id order.
    pub fn overlap_region(&self, region: &Primitive, mask: LayerMask) -> Vec<ColliderId> {
        self.hash
            .query(region.bounds())
            .into_iter()
            .filter(|id| {
                self.objects.get(id).is_some_and(|obj| {
                    obj.collider().is_active()
                        && mask.accepts(obj.collision_layer())
                        && Narrowphase::overlap(region, &obj.collider().shape)
                })
            })
            .collect()
    }

    /// Occupied hash cells of the last tick.
    pub fn debug_draw(&self, sink: &mut impl DebugDraw) {
        for (bounds, occupants) in self.hash.occupied() {
            sink.draw_cell(bounds, occupants);
        }
    }

    fn flush_pending(&mut self) {
        for (id, obj) in self.pending.add.drain(..) {
            self.objects.insert(id, obj);
        }
        for id in self.pending.remove.drain(..) {
            if self.objects.remove(&id).is_none() {
                warn!("remove of unknown collider {:?}", id);
            }
            self.overlaps.remove(&id);
        }
    }

    fn classify(&mut self, current: &BTreeMap<ColliderId, BTreeSet<ColliderId>>) {
        let empty = BTreeSet::new();
        let ids: BTreeSet<ColliderId> = self.overlaps.keys().chain(current.keys()).copied().collect();
        for id in ids {
            let Some(obj) = self.objects.get(&id) else {
                continue;
            };
            let before = self.overlaps.get(&id).unwrap_or(&empty);
            let now = current.get(&id).unwrap_or(&empty);

            for &other in now {
                let phase = if before.contains(&other) {
                    CollisionPhase::Ongoing
                } else {
                    CollisionPhase::Started
                };
                let event = self.describe(obj, id, other, phase);
                self.events.push(event);
            }
            for &other in before.difference(now) {
                self.events.push(CollisionEvent {
                    phase: CollisionPhase::Ended,
                    this: id,
                    other,
                    manifold: None,
                    closest_point: None,
                });
            }
        }
    }

    fn describe(&self, obj: &T, id: ColliderId, other: ColliderId, phase: CollisionPhase) -> CollisionEvent {
        let queries = obj.collider().queries;
        let shape = &obj.collider().shape;
        let other_shape = self.objects.get(&other).map(|o| &o.collider().shape);
        CollisionEvent {
            phase,
            this: id,
            other,
            manifold: other_shape
                .filter(|_| queries.intersection)
                .and_then(|b| Narrowphase::intersect(shape, b)),
            closest_point: other_shape
                .filter(|_| queries.closest_point)
                .and_then(|b| Narrowphase::closest_point(shape, b)),
        }
    }

    fn dispatch(&mut self) {
        for event in &self.events {
            trace!("{:?} {:?} -> {:?}", event.phase, event.this, event.other);
            let Some(obj) = self.objects.get_mut(&event.this) else {
                continue;
            };
            match event.phase {
                CollisionPhase::Started => obj.on_collision(event, &mut self.pending),
                CollisionPhase::Ongoing => obj.on_overlap(event, &mut self.pending),
                CollisionPhase::Ended => obj.on_overlap_ended(event.other, &mut self.pending),
            }
        }
    }
}
