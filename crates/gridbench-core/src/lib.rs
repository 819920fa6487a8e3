//! **gridbench-core**: core types shared by the gridbench crates.
//!
//! This crate provides the geometry primitives and the immutable
//! [`OccupancyGrid`] that every search reads from.

pub mod geom;
pub mod grid;

pub use geom::{Direction, Point, Range};
pub use grid::{GridError, OccupancyGrid, Terrain};
