//! Uniform-grid broadphase over a fixed world rectangle.
//!
//! The grid is rebuilt from scratch every tick: [`SpatialHash::clear`] keeps
//! the bucket allocations, [`SpatialHash::add`] files an id under every cell
//! its bounds touch. Bounds reaching past the grid are clamped into the
//! border cells so nothing is ever dropped.

use std::collections::HashSet;

use glam::Vec2;
use log::warn;

use crate::config::{ConfigError, HashConfig};
use crate::types::{Aabb, ColliderId, HashStats};

/// Upper bound on DDA steps for one in-grid stretch of a linecast.
const MAX_LINECAST_STEPS: usize = 10_000;

pub struct SpatialHash {
    cfg: HashConfig,
    /// Row-major, `rows * columns` buckets.
    buckets: Vec<Vec<ColliderId>>,
    entries: usize,
}

impl SpatialHash {
    pub fn new(cfg: HashConfig) -> Result<Self, ConfigError> {
        cfg.validate()?;
        let cells = cfg.columns as usize * cfg.rows as usize;
        Ok(Self {
            cfg,
            buckets: vec![Vec::new(); cells],
            entries: 0,
        })
    }

    pub fn config(&self) -> &HashConfig {
        &self.cfg
    }

    /// Number of `add` calls since the last clear.
    pub fn len(&self) -> usize {
        self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries == 0
    }

    pub fn clear(&mut self) {
        for bucket in &mut self.buckets {
            bucket.clear();
        }
        self.entries = 0;
    }

    /// File `id` under every cell overlapped by `bounds`.
    pub fn add(&mut self, id: ColliderId, bounds: Aabb) {
        if !bounds.overlaps(&self.cfg.bounds()) {
            warn!("collider {:?} at {:?} lies outside the spatial hash, clamping to border cells", id, bounds);
        }
        let (c0, r0, c1, r1) = self.cell_span(&bounds);
        for row in r0..=r1 {
            for col in c0..=c1 {
                let idx = self.index(col, row);
                self.buckets[idx].push(id);
            }
        }
        self.entries += 1;
    }

    /// Every id filed in a cell touched by `region`, sorted and deduplicated.
    pub fn query(&self, region: Aabb) -> Vec<ColliderId> {
        let (c0, r0, c1, r1) = self.cell_span(&region);
        let mut out = Vec::new();
        for row in r0..=r1 {
            for col in c0..=c1 {
                out.extend_from_slice(&self.buckets[self.index(col, row)]);
            }
        }
        out.sort_unstable();
        out.dedup();
        out
    }

    /// Like [`SpatialHash::query`], skipping cells the circle does not reach.
    pub fn query_circle(&self, center: Vec2, radius: f32) -> Vec<ColliderId> {
        let region = Aabb::from_center(center, Vec2::splat(radius));
        let (c0, r0, c1, r1) = self.cell_span(&region);
        let mut out = Vec::new();
        for row in r0..=r1 {
            for col in c0..=c1 {
                let cell = self.cell_bounds(col, row);
                let nearest = center.clamp(cell.min, cell.max);
                // Clamped border cells also hold out-of-grid entries.
                let border = col == 0 || row == 0 || col + 1 == self.columns() || row + 1 == self.rows();
                if border || nearest.distance_squared(center) <= radius * radius {
                    out.extend_from_slice(&self.buckets[self.index(col, row)]);
                }
            }
        }
        out.sort_unstable();
        out.dedup();
        out
    }

    /// Ids filed in the single cell containing `p`.
    pub fn query_point(&self, p: Vec2) -> &[ColliderId] {
        let (col, row) = self.cell_of(p);
        &self.buckets[self.index(col, row)]
    }

    /// Candidates along the segment `start..end`, in the order a DDA walk
    /// first reaches them. Each id is reported once.
    ///
    /// Stretches of the segment outside the grid are walked along their
    /// clamped image on the border ring, so a far-away start costs no more
    /// than one crossing of the grid.
    pub fn linecast(&self, start: Vec2, end: Vec2) -> Vec<ColliderId> {
        let bounds = self.cfg.bounds();
        let dir = end - start;
        // Clamping is linear between the parameters where an axis crosses a
        // grid edge.
        let mut cuts = vec![0.0, 1.0];
        for (p, d, lo, hi) in [
            (start.x, dir.x, bounds.min.x, bounds.max.x),
            (start.y, dir.y, bounds.min.y, bounds.max.y),
        ] {
            if d != 0.0 {
                cuts.extend([(lo - p) / d, (hi - p) / d].into_iter().filter(|t| *t > 0.0 && *t < 1.0));
            }
        }
        cuts.sort_by(f32::total_cmp);

        let clamped = |t: f32| (start + dir * t).clamp(bounds.min, bounds.max);
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for span in cuts.windows(2) {
            self.walk(clamped(span[0]), clamped(span[1]), &mut seen, &mut out);
        }
        out
    }

    /// DDA over the cells between two points inside the grid.
    fn walk(&self, start: Vec2, end: Vec2, seen: &mut HashSet<ColliderId>, out: &mut Vec<ColliderId>) {
        let cs = self.cfg.cell_size;
        let local = start - self.cfg.origin;
        let dir = end - start;
        let mut cell = (local / cs).floor();
        let last = ((end - self.cfg.origin) / cs).floor();

        let step = |d: f32| if d > 0.0 { 1.0 } else if d < 0.0 { -1.0 } else { 0.0 };
        let step_x = step(dir.x);
        let step_y = step(dir.y);
        let next_boundary = |c: f32, step: f32, size: f32| if step > 0.0 { (c + 1.0) * size } else { c * size };
        let mut t_max_x = if step_x != 0.0 {
            (next_boundary(cell.x, step_x, cs.x) - local.x) / dir.x
        } else {
            f32::INFINITY
        };
        let mut t_max_y = if step_y != 0.0 {
            (next_boundary(cell.y, step_y, cs.y) - local.y) / dir.y
        } else {
            f32::INFINITY
        };
        let t_delta_x = if step_x != 0.0 { cs.x / dir.x.abs() } else { f32::INFINITY };
        let t_delta_y = if step_y != 0.0 { cs.y / dir.y.abs() } else { f32::INFINITY };

        let steps = ((last.x - cell.x).abs() + (last.y - cell.y).abs()) as usize;
        for _ in 0..=steps.min(MAX_LINECAST_STEPS) {
            let col = clamp_index(cell.x, self.cfg.columns);
            let row = clamp_index(cell.y, self.cfg.rows);
            for &id in &self.buckets[self.index(col, row)] {
                if seen.insert(id) {
                    out.push(id);
                }
            }
            if t_max_x < t_max_y {
                cell.x += step_x;
                t_max_x += t_delta_x;
            } else {
                cell.y += step_y;
                t_max_y += t_delta_y;
            }
        }
    }

    /// Column and row of the cell containing `p`, clamped to the grid.
    pub fn cell_of(&self, p: Vec2) -> (usize, usize) {
        let local = (p - self.cfg.origin) / self.cfg.cell_size;
        (clamp_index(local.x.floor(), self.cfg.columns), clamp_index(local.y.floor(), self.cfg.rows))
    }

    pub fn cell_bounds(&self, col: usize, row: usize) -> Aabb {
        let min = self.cfg.origin + self.cfg.cell_size * Vec2::new(col as f32, row as f32);
        Aabb {
            min,
            max: min + self.cfg.cell_size,
        }
    }

    /// Occupied cells with their occupant counts.
    pub fn occupied(&self) -> impl Iterator<Item = (Aabb, usize)> + '_ {
        self.buckets.iter().enumerate().filter(|(_, b)| !b.is_empty()).map(|(idx, b)| {
            let columns = self.columns();
            (self.cell_bounds(idx % columns, idx / columns), b.len())
        })
    }

    pub fn stats(&self) -> HashStats {
        let mut stats = HashStats {
            entries: self.entries,
            ..Default::default()
        };
        for bucket in &self.buckets {
            let n = bucket.len();
            if n > 0 {
                stats.occupied_cells += 1;
            }
            if n >= 2 {
                stats.candidate_pairs += n * (n - 1) / 2;
            }
        }
        stats
    }

    fn columns(&self) -> usize {
        self.cfg.columns as usize
    }

    fn rows(&self) -> usize {
        self.cfg.rows as usize
    }

    fn index(&self, col: usize, row: usize) -> usize {
        row * self.columns() + col
    }

    fn cell_span(&self, region: &Aabb) -> (usize, usize, usize, usize) {
        let (c0, r0) = self.cell_of(region.min);
        let (c1, r1) = self.cell_of(region.max);
        (c0, r0, c1, r1)
    }
}

fn clamp_index(cell: f32, count: u32) -> usize {
    // NaN falls through `as` to 0.
    cell.clamp(0.0, (count - 1) as f32) as usize
}
