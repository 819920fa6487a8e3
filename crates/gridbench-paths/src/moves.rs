//! The 8-connected movement model over an [`OccupancyGrid`].

use std::f64::consts::SQRT_2;
use std::fmt;
use std::str::FromStr;

use gridbench_core::{Direction, OccupancyGrid, Point};

use crate::distance;
use crate::traits::{AstarPather, Pather, WeightedPather};

/// Whether a diagonal move may clip the corner of a blocked cell.
///
/// Every algorithm variant honours the same policy, so their costs are
/// directly comparable.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum Corners {
    /// A diagonal step needs both orthogonal cells it passes to be passable.
    #[default]
    Forbid,
    /// A diagonal step only needs its destination to be passable.
    Allow,
}

impl Corners {
    /// Name used on the command line and in config files.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Forbid => "forbid",
            Self::Allow => "allow",
        }
    }
}

impl fmt::Display for Corners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown corner policy name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown corner policy \"{0}\" (expected forbid or allow)")]
pub struct ParseCornersError(pub String);

impl FromStr for Corners {
    type Err = ParseCornersError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "forbid" => Ok(Self::Forbid),
            "allow" => Ok(Self::Allow),
            other => Err(ParseCornersError(other.to_string())),
        }
    }
}

/// Movement over a grid: 8 directions, unit straight cost, `SQRT_2`
/// diagonal cost, diagonals restricted by a [`Corners`] policy.
#[derive(Copy, Clone, Debug)]
pub struct GridMoves<'a> {
    grid: &'a OccupancyGrid,
    corners: Corners,
}

impl<'a> GridMoves<'a> {
    /// Create the movement model for `grid`.
    pub fn new(grid: &'a OccupancyGrid, corners: Corners) -> Self {
        Self { grid, corners }
    }

    /// The underlying grid.
    #[inline]
    pub fn grid(&self) -> &'a OccupancyGrid {
        self.grid
    }

    /// The corner policy.
    #[inline]
    pub fn corners(&self) -> Corners {
        self.corners
    }

    /// Whether a single step by `d` (a unit offset) from `p` is legal.
    /// `p` itself is assumed passable.
    #[inline]
    pub fn can_step(&self, p: Point, d: Point) -> bool {
        if !self.grid.is_passable(p + d) {
            return false;
        }
        if d.x != 0 && d.y != 0 && self.corners == Corners::Forbid {
            return self.grid.is_passable(p.shift(d.x, 0)) && self.grid.is_passable(p.shift(0, d.y));
        }
        true
    }
}

impl Pather for GridMoves<'_> {
    #[inline]
    fn passable(&self, p: Point) -> bool {
        self.grid.is_passable(p)
    }

    fn neighbors(&self, p: Point, buf: &mut Vec<Point>) {
        for dir in Direction::ALL {
            let d = dir.delta();
            if self.can_step(p, d) {
                buf.push(p + d);
            }
        }
    }
}

impl WeightedPather for GridMoves<'_> {
    #[inline]
    fn cost(&self, from: Point, to: Point) -> f64 {
        if from.x != to.x && from.y != to.y {
            SQRT_2
        } else {
            1.0
        }
    }
}

impl AstarPather for GridMoves<'_> {
    #[inline]
    fn estimate(&self, from: Point, to: Point) -> f64 {
        distance::octile(from, to)
    }
}
