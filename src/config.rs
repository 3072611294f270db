//! Construction-time configuration for the broadphase structures.

use glam::Vec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::types::Aabb;

/// Configuration errors
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Cell dimensions must be finite and strictly positive.
    #[error("invalid cell size {0:?}: must be finite and positive")]
    InvalidCellSize(Vec2),

    /// The hash must have at least one cell.
    #[error("grid of {columns}x{rows} cells is empty")]
    EmptyGrid { columns: u32, rows: u32 },

    /// Origin must be finite.
    #[error("invalid grid origin {0:?}")]
    InvalidOrigin(Vec2),
}

/// Fixed-size uniform grid laid over a world rectangle.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HashConfig {
    /// World position of the min corner of cell (0,0).
    pub origin: Vec2,
    /// Cell width and height.
    pub cell_size: Vec2,
    pub columns: u32,
    pub rows: u32,
}

impl HashConfig {
    /// Square cells just large enough in number to cover `bounds`.
    pub fn covering(bounds: Aabb, cell_size: f32) -> Self {
        let size = bounds.size();
        let cs = if cell_size.is_finite() && cell_size > 0.0 { cell_size } else { 1.0 };
        Self {
            origin: bounds.min,
            cell_size: Vec2::splat(cell_size),
            columns: ((size.x / cs).ceil() as u32).max(1),
            rows: ((size.y / cs).ceil() as u32).max(1),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let cs = self.cell_size;
        if !(cs.is_finite() && cs.x > 0.0 && cs.y > 0.0) {
            return Err(ConfigError::InvalidCellSize(cs));
        }
        if self.columns == 0 || self.rows == 0 {
            return Err(ConfigError::EmptyGrid {
                columns: self.columns,
                rows: self.rows,
            });
        }
        if !self.origin.is_finite() {
            return Err(ConfigError::InvalidOrigin(self.origin));
        }
        Ok(())
    }

    /// World rectangle covered by the grid.
    pub fn bounds(&self) -> Aabb {
        let extent = self.cell_size * Vec2::new(self.columns as f32, self.rows as f32);
        Aabb {
            min: self.origin,
            max: self.origin + extent,
        }
    }
}

/// Cell size of the unbounded occupancy grid used by [`crate::grid::GridCollisionSystem`].
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GridConfig {
    pub cell_size: f32,
}

impl GridConfig {
    pub fn new(cell_size: f32) -> Self {
        Self { cell_size }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cell_size.is_finite() && self.cell_size > 0.0 {
            Ok(())
        } else {
            Err(ConfigError::InvalidCellSize(Vec2::splat(self.cell_size)))
        }
    }
}
