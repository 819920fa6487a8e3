//! The [`OccupancyGrid`] type: a frozen 2D map of [`Terrain`] cells.
//!
//! Unlike a drawing grid, an occupancy grid has no mutation API. It is built
//! once (usually by the map loader) and then shared by reference, so any
//! number of searches may read it concurrently.

use std::fmt;

use crate::geom::{Point, Range};

// ---------------------------------------------------------------------------
// Terrain
// ---------------------------------------------------------------------------

/// The terrain of a single map cell.
///
/// Each variant corresponds to exactly one map file character, so a grid can
/// be written back out unchanged.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Terrain {
    /// `.`
    #[default]
    Ground,
    /// `G`
    Grass,
    /// `S`
    Swamp,
    /// `W`
    Water,
    /// `@`
    OutOfBounds,
    /// `O`
    Obstacle,
    /// `T`
    Tree,
}

impl Terrain {
    /// Characters of passable terrain.
    pub const PASSABLE_CHARS: &'static str = ".GSW";
    /// Characters of blocked terrain.
    pub const BLOCKED_CHARS: &'static str = "@OT";

    /// Decode a map character. Returns `None` outside the alphabet.
    pub const fn from_char(ch: char) -> Option<Self> {
        Some(match ch {
            '.' => Self::Ground,
            'G' => Self::Grass,
            'S' => Self::Swamp,
            'W' => Self::Water,
            '@' => Self::OutOfBounds,
            'O' => Self::Obstacle,
            'T' => Self::Tree,
            _ => return None,
        })
    }

    /// The map character for this terrain.
    pub const fn as_char(self) -> char {
        match self {
            Self::Ground => '.',
            Self::Grass => 'G',
            Self::Swamp => 'S',
            Self::Water => 'W',
            Self::OutOfBounds => '@',
            Self::Obstacle => 'O',
            Self::Tree => 'T',
        }
    }

    /// Whether a unit may stand on this terrain.
    #[inline]
    pub const fn is_passable(self) -> bool {
        matches!(self, Self::Ground | Self::Grass | Self::Swamp | Self::Water)
    }
}

impl fmt::Display for Terrain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

// ---------------------------------------------------------------------------
// OccupancyGrid
// ---------------------------------------------------------------------------

/// Errors from building an [`OccupancyGrid`] out of raw cells.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    /// Width or height is not strictly positive.
    #[error("grid dimensions must be positive, got {width}x{height}")]
    InvalidDimensions { width: i32, height: i32 },
    /// The cell buffer does not hold exactly `width * height` cells.
    #[error("expected {expected} cells for the grid, got {actual}")]
    CellCount { expected: usize, actual: usize },
}

/// A dense, immutable `width × height` map of terrain cells.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "RawGrid")
)]
pub struct OccupancyGrid {
    width: i32,
    height: i32,
    cells: Box<[Terrain]>,
}

/// Unchecked serialized form, validated by [`OccupancyGrid::from_cells`].
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawGrid {
    width: i32,
    height: i32,
    cells: Vec<Terrain>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawGrid> for OccupancyGrid {
    type Error = GridError;

    fn try_from(raw: RawGrid) -> Result<Self, GridError> {
        OccupancyGrid::from_cells(raw.width, raw.height, raw.cells)
    }
}

impl OccupancyGrid {
    /// Build a grid from row-major cells.
    pub fn from_cells(width: i32, height: i32, cells: Vec<Terrain>) -> Result<Self, GridError> {
        if width <= 0 || height <= 0 {
            return Err(GridError::InvalidDimensions { width, height });
        }
        let expected = width as usize * height as usize;
        if cells.len() != expected {
            return Err(GridError::CellCount {
                expected,
                actual: cells.len(),
            });
        }
        Ok(Self {
            width,
            height,
            cells: cells.into_boxed_slice(),
        })
    }

    /// Build a grid by evaluating `f` at every position in row-major order.
    ///
    /// Non-positive dimensions are clamped to an empty grid.
    pub fn from_fn(width: i32, height: i32, mut f: impl FnMut(Point) -> Terrain) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        let cells = Range::new(0, 0, width, height).iter().map(&mut f).collect();
        Self {
            width,
            height,
            cells,
        }
    }

    /// A grid where every cell has the same terrain.
    pub fn filled(width: i32, height: i32, terrain: Terrain) -> Self {
        Self::from_fn(width, height, |_| terrain)
    }

    /// Width in cells.
    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Height in cells.
    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    /// The grid rectangle, anchored at the origin.
    #[inline]
    pub fn bounds(&self) -> Range {
        Range::new(0, 0, self.width, self.height)
    }

    /// Whether `p` lies inside the grid.
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= 0 && p.y >= 0 && p.x < self.width && p.y < self.height
    }

    /// Flat row-major index of `p`, or `None` if out of bounds.
    #[inline]
    pub fn index(&self, p: Point) -> Option<usize> {
        if self.contains(p) {
            Some(p.y as usize * self.width as usize + p.x as usize)
        } else {
            None
        }
    }

    /// Terrain at `p`, or `None` if out of bounds.
    #[inline]
    pub fn terrain(&self, p: Point) -> Option<Terrain> {
        self.index(p).map(|i| self.cells[i])
    }

    /// Whether `p` is inside the grid and passable. Everything outside the
    /// grid counts as blocked.
    #[inline]
    pub fn is_passable(&self, p: Point) -> bool {
        match self.index(p) {
            Some(i) => self.cells[i].is_passable(),
            None => false,
        }
    }

    /// Number of passable cells.
    pub fn passable_count(&self) -> usize {
        self.cells.iter().filter(|t| t.is_passable()).count()
    }

    /// Row-major iterator over `(Point, Terrain)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Point, Terrain)> + '_ {
        self.bounds().iter().zip(self.cells.iter().copied())
    }

    /// One string per row, using the map character of each cell.
    pub fn rows(&self) -> impl Iterator<Item = String> + '_ {
        self.cells
            .chunks(self.width.max(1) as usize)
            .map(|row| row.iter().map(|t| t.as_char()).collect())
    }
}

/// Writes the character grid, one row per line, without the file header.
impl fmt::Display for OccupancyGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            writeln!(f, "{row}")?;
        }
        Ok(())
    }
}
