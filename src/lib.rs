//! scuff2d: 2D collision detection for tick-driven simulations.
//!
//! - [`narrowphase`]: overlap, intersection manifold, closest point,
//!   containment and raycasts over the five [`Primitive`] variants
//! - [`sweep`]: time of impact and bounce vector for moving primitives
//! - [`spatial_hash`]: fixed uniform-grid broadphase
//! - [`registry`]: per-tick started / ongoing / ended overlap events
//! - [`grid`]: cell-occupancy tracker that only re-tests on cell changes
//!
//! Detection only; resolving collisions is left to the caller.

pub mod api;
pub mod collider;
pub mod config;
pub mod grid;
pub mod narrowphase;
pub mod registry;
pub mod shapes;
pub mod spatial_hash;
pub mod sweep;
pub mod types;

pub use crate::api::*;
pub use crate::collider::{Collider, QueryFlags};
pub use crate::config::{ConfigError, GridConfig, HashConfig};
pub use crate::grid::{CellPool, GridCollisionSystem, GridEvent, GridEventKind, GridStats};
pub use crate::narrowphase::Narrowphase;
pub use crate::registry::{CollisionEvent, CollisionPhase, CollisionRegistry, RegistryCommands, RegistryStats};
pub use crate::shapes::{Alignment, Circle, Polygon, Primitive, Rect, Segment};
pub use crate::spatial_hash::SpatialHash;
pub use crate::sweep::Sweep;
pub use crate::types::*;
