//! Shortest-path search on 8-connected occupancy grids.
//!
//! This crate provides three interchangeable searches that agree on path
//! cost for the same [`GridMoves`]:
//!
//! - **A\*** with the octile heuristic ([`SearchSpace::astar`])
//! - **Jump Point Search** ([`SearchSpace::jps`])
//! - **Dijkstra**, stopping at the goal ([`SearchSpace::dijkstra`])
//!
//! plus multi-source distance maps ([`SearchSpace::distance_map`]) and
//! connected-component labelling ([`SearchSpace::label_components`]).
//!
//! All searches run through [`SearchSpace`], which owns and reuses internal
//! caches so that repeated queries incur zero allocations after warm-up.
//! [`SearchSpace::search`] dispatches on an [`Algorithm`] tag.
//!
//! # Trait hierarchy
//!
//! | Trait | Required for |
//! |---|---|
//! | [`Pather`] | connected components |
//! | [`WeightedPather`] : [`Pather`] | Dijkstra, distance maps |
//! | [`AstarPather`] : [`WeightedPather`] | A* |
//!
//! JPS needs the grid itself and works on [`GridMoves`] directly.

mod astar;
mod cc;
mod dijkstra;
mod distance;
mod error;
mod jps;
mod moves;
mod search;
mod space;
mod traits;

pub use distance::octile;
pub use error::{QueryFault, SearchError};
pub use moves::{Corners, GridMoves, ParseCornersError};
pub use search::{Algorithm, ParseAlgorithmError, SearchResult};
pub use space::SearchSpace;
pub use traits::{AstarPather, Pather, WeightedPather};
