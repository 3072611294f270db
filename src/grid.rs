//! Cell-occupancy collision tracker.
//!
//! Every object lives in exactly one square cell of an unbounded world grid.
//! Collisions are only evaluated when an object changes cell: leaving a cell
//! ends its collisions with the occupants left behind, entering a cell starts
//! collisions with the occupants already there. Objects that stay put are not
//! re-tested. Pairs on the same layer never collide. Disabled objects hold no
//! cell until they are enabled again.

use std::collections::{BTreeMap, HashMap};

use log::{debug, trace, warn};

use crate::api::{CellCollider, DebugDraw};
use crate::config::{ConfigError, GridConfig};
use crate::types::{CellCoord, ColliderId};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum GridEventKind {
    EnteredCell(CellCoord),
    ExitedCell(CellCoord),
    CollisionStarted(ColliderId),
    CollisionEnded(ColliderId),
}

/// One notification for object `id`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct GridEvent {
    pub id: ColliderId,
    /// The object's [`CellCollider::type_tag`].
    pub type_tag: u32,
    pub kind: GridEventKind,
}

/// Counters for the most recent tick.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct GridStats {
    pub tick: u64,
    pub objects: usize,
    /// Objects that changed cell.
    pub moves: usize,
    pub live_cells: usize,
    /// Released cells waiting for reuse.
    pub free_cells: usize,
    pub events: usize,
}

/// Arena of cell occupant lists with a freelist. A cell is rented when its
/// first occupant arrives and returned when the last one leaves.
#[derive(Debug, Default)]
pub struct CellPool {
    slots: Vec<Vec<ColliderId>>,
    free: Vec<usize>,
    live: HashMap<CellCoord, usize>,
}

impl CellPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, coord: CellCoord, id: ColliderId) {
        let slot = match self.live.get(&coord) {
            Some(&slot) => slot,
            None => {
                let slot = self.rent();
                self.live.insert(coord, slot);
                slot
            }
        };
        self.slots[slot].push(id);
    }

    /// Returns false when `id` was not in `coord`.
    pub fn remove(&mut self, coord: CellCoord, id: ColliderId) -> bool {
        let Some(&slot) = self.live.get(&coord) else {
            return false;
        };
        let occupants = &mut self.slots[slot];
        let Some(pos) = occupants.iter().position(|&o| o == id) else {
            return false;
        };
        occupants.remove(pos);
        if occupants.is_empty() {
            self.live.remove(&coord);
            self.free.push(slot);
        }
        true
    }

    /// Occupants in arrival order.
    pub fn occupants(&self, coord: CellCoord) -> &[ColliderId] {
        match self.live.get(&coord) {
            Some(&slot) => &self.slots[slot],
            None => &[],
        }
    }

    pub fn live_cells(&self) -> usize {
        self.live.len()
    }

    pub fn free_cells(&self) -> usize {
        self.free.len()
    }

    /// Slots ever allocated, live or free.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, &[ColliderId])> {
        self.live.iter().map(|(coord, &slot)| (*coord, self.slots[slot].as_slice()))
    }

    fn rent(&mut self) -> usize {
        match self.free.pop() {
            Some(slot) => slot,
            None => {
                self.slots.push(Vec::new());
                self.slots.len() - 1
            }
        }
    }
}

struct Entry<T> {
    object: T,
    /// Cell after the last tick; `None` before the first tick and while disabled.
    cell: Option<CellCoord>,
}

pub struct GridCollisionSystem<T: CellCollider> {
    cfg: GridConfig,
    next_id: u64,
    objects: BTreeMap<ColliderId, Entry<T>>,
    pending_add: Vec<(ColliderId, T)>,
    pending_remove: Vec<ColliderId>,
    pool: CellPool,
    events: Vec<GridEvent>,
    stats: GridStats,
}

impl<T: CellCollider> GridCollisionSystem<T> {
    pub fn new(cfg: GridConfig) -> Result<Self, ConfigError> {
        cfg.validate()?;
        Ok(Self {
            cfg,
            next_id: 0,
            objects: BTreeMap::new(),
            pending_add: Vec::new(),
            pending_remove: Vec::new(),
            pool: CellPool::new(),
            events: Vec::new(),
            stats: GridStats::default(),
        })
    }

    pub fn config(&self) -> &GridConfig {
        &self.cfg
    }

    /// Queue `object` for insertion at the start of the next tick.
    pub fn add(&mut self, object: T) -> ColliderId {
        let id = ColliderId(self.next_id);
        self.next_id += 1;
        self.pending_add.push((id, object));
        id
    }

    /// Queue `id` for removal at the start of the next tick.
    pub fn remove(&mut self, id: ColliderId) {
        self.pending_remove.push(id);
    }

    pub fn get(&self, id: ColliderId) -> Option<&T> {
        self.objects.get(&id).map(|e| &e.object)
    }

    pub fn get_mut(&mut self, id: ColliderId) -> Option<&mut T> {
        self.objects.get_mut(&id).map(|e| &mut e.object)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn cell_of(&self, id: ColliderId) -> Option<CellCoord> {
        self.objects.get(&id).and_then(|e| e.cell)
    }

    pub fn occupants(&self, coord: CellCoord) -> &[ColliderId] {
        self.pool.occupants(coord)
    }

    pub fn pool(&self) -> &CellPool {
        &self.pool
    }

    /// Advance every object by `dt`, move the ones that changed cell and
    /// dispatch the resulting callbacks.
    pub fn tick(&mut self, dt: f32) {
        self.events.clear();
        self.flush_pending();

        let ids: Vec<ColliderId> = self.objects.keys().copied().collect();
        let mut moves = 0;
        for id in ids {
            let Some(entry) = self.objects.get_mut(&id) else {
                continue;
            };
            if !entry.object.is_enabled() {
                if let Some(old) = entry.cell.take() {
                    trace!("{:?} disabled, leaving {:?}", id, old);
                    self.leave(id, old);
                }
                continue;
            }
            let coord = CellCoord::containing(entry.object.update(dt), self.cfg.cell_size);
            let previous = entry.cell;
            if previous == Some(coord) {
                continue;
            }
            entry.cell = Some(coord);
            moves += 1;

            if let Some(old) = previous {
                self.leave(id, old);
            }
            self.enter(id, coord);
        }

        self.stats = GridStats {
            tick: self.stats.tick + 1,
            objects: self.objects.len(),
            moves,
            live_cells: self.pool.live_cells(),
            free_cells: self.pool.free_cells(),
            events: self.events.len(),
        };
        debug!(
            "grid tick {}: {} objects, {} moved, {} live cells, {} events",
            self.stats.tick, self.stats.objects, moves, self.stats.live_cells, self.stats.events
        );
        self.dispatch();
    }

    pub fn drain_events(&mut self) -> Vec<GridEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn stats(&self) -> GridStats {
        self.stats
    }

    /// Live cells and their occupant counts.
    pub fn debug_draw(&self, sink: &mut impl DebugDraw) {
        for (coord, occupants) in self.pool.iter() {
            sink.draw_cell(coord.bounds(self.cfg.cell_size), occupants.len());
        }
    }

    fn leave(&mut self, id: ColliderId, old: CellCoord) {
        self.pool.remove(old, id);
        self.push(id, GridEventKind::ExitedCell(old));
        let left_behind = self.pool.occupants(old).to_vec();
        self.pair_events(id, &left_behind, GridEventKind::CollisionEnded);
    }

    fn enter(&mut self, id: ColliderId, coord: CellCoord) {
        self.push(id, GridEventKind::EnteredCell(coord));
        let residents = self.pool.occupants(coord).to_vec();
        self.pair_events(id, &residents, GridEventKind::CollisionStarted);
        self.pool.insert(coord, id);
    }

    /// `a` reacts to `b`: different layers and `b`'s layer in `a`'s mask.
    fn can_collide(&self, a: ColliderId, b: ColliderId) -> bool {
        match (self.objects.get(&a), self.objects.get(&b)) {
            (Some(a), Some(b)) => {
                let layer = b.object.collision_layer();
                a.object.collision_layer() != layer && a.object.collision_mask().accepts(layer)
            }
            _ => false,
        }
    }

    /// Collision notifications between `id` and each of `others`, for
    /// whichever side of each pair reacts.
    fn pair_events(&mut self, id: ColliderId, others: &[ColliderId], kind: fn(ColliderId) -> GridEventKind) {
        for &other in others {
            if other == id {
                continue;
            }
            if self.can_collide(id, other) {
                self.push(id, kind(other));
            }
            if self.can_collide(other, id) {
                self.push(other, kind(id));
            }
        }
    }

    fn push(&mut self, id: ColliderId, kind: GridEventKind) {
        let type_tag = self.objects.get(&id).map_or(0, |e| e.object.type_tag());
        self.events.push(GridEvent { id, type_tag, kind });
    }

    /// Removed objects leave their cell without an exit notification; the
    /// occupants they shared it with see the collision end.
    fn flush_pending(&mut self) {
        for (id, object) in self.pending_add.drain(..) {
            self.objects.insert(id, Entry { object, cell: None });
        }
        let removals = std::mem::take(&mut self.pending_remove);
        for id in removals {
            let Some(cell) = self.objects.get(&id).map(|e| e.cell) else {
                warn!("remove of unknown grid object {:?}", id);
                continue;
            };
            if let Some(coord) = cell {
                self.pool.remove(coord, id);
                let left_behind = self.pool.occupants(coord).to_vec();
                for other in left_behind {
                    if self.can_collide(other, id) {
                        self.push(other, GridEventKind::CollisionEnded(id));
                    }
                }
            }
            self.objects.remove(&id);
        }
    }

    fn dispatch(&mut self) {
        for event in &self.events {
            trace!("{:?} {:?}", event.id, event.kind);
            let Some(entry) = self.objects.get_mut(&event.id) else {
                continue;
            };
            let object = &mut entry.object;
            match event.kind {
                GridEventKind::EnteredCell(coord) => object.on_enter_cell(coord),
                GridEventKind::ExitedCell(coord) => object.on_exit_cell(coord),
                GridEventKind::CollisionStarted(other) => object.on_collision_started(other),
                GridEventKind::CollisionEnded(other) => object.on_collision_ended(other),
            }
        }
    }
}
