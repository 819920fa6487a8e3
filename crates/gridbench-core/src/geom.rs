//! Geometry primitives: [`Point`], [`Range`] and [`Direction`].
//!
//! Coordinates follow the map file convention: X grows right (column), Y
//! grows down (row).

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Sub};

// ---------------------------------------------------------------------------
// Point
// ---------------------------------------------------------------------------

/// A cell coordinate. May lie outside any particular grid.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const ZERO: Point = Point::new(0, 0);

    #[inline]
    pub const fn new(x: i32, y: i32) -> Point {
        Point { x, y }
    }

    /// `self` moved by `dx` columns and `dy` rows.
    #[inline]
    pub const fn shift(self, dx: i32, dy: i32) -> Point {
        Point::new(self.x + dx, self.y + dy)
    }

    /// Component-wise sign: the unit step pointing from the origin towards
    /// `self`.
    #[inline]
    pub const fn signum(self) -> Point {
        Point::new(self.x.signum(), self.y.signum())
    }
}

/// Row-major order, matching the cell index order of a grid.
impl Ord for Point {
    fn cmp(&self, rhs: &Point) -> Ordering {
        (self.y, self.x).cmp(&(rhs.y, rhs.x))
    }
}

impl PartialOrd for Point {
    fn partial_cmp(&self, rhs: &Point) -> Option<Ordering> {
        Some(self.cmp(rhs))
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl Add for Point {
    type Output = Point;
    #[inline]
    fn add(self, d: Point) -> Point {
        self.shift(d.x, d.y)
    }
}

impl Sub for Point {
    type Output = Point;
    #[inline]
    fn sub(self, d: Point) -> Point {
        self.shift(-d.x, -d.y)
    }
}

// ---------------------------------------------------------------------------
// Direction
// ---------------------------------------------------------------------------

/// The eight moves of an 8-connected grid.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Direction {
    /// Clockwise from north. Searches expand successors in this order.
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
    ];

    #[inline]
    pub const fn delta(self) -> Point {
        let (dx, dy) = match self {
            Direction::North => (0, -1),
            Direction::NorthEast => (1, -1),
            Direction::East => (1, 0),
            Direction::SouthEast => (1, 1),
            Direction::South => (0, 1),
            Direction::SouthWest => (-1, 1),
            Direction::West => (-1, 0),
            Direction::NorthWest => (-1, -1),
        };
        Point::new(dx, dy)
    }
}

// ---------------------------------------------------------------------------
// Range
// ---------------------------------------------------------------------------

/// Axis-aligned rectangle of cells, `min` included and `max` excluded.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Range {
    pub min: Point,
    pub max: Point,
}

impl Range {
    /// The rectangle spanned by corners `(x0, y0)` and `(x1, y1)`, in any
    /// order.
    #[inline]
    pub fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        let (lo_x, hi_x) = if x0 <= x1 { (x0, x1) } else { (x1, x0) };
        let (lo_y, hi_y) = if y0 <= y1 { (y0, y1) } else { (y1, y0) };
        Range {
            min: Point::new(lo_x, lo_y),
            max: Point::new(hi_x, hi_y),
        }
    }

    #[inline]
    pub fn width(self) -> i32 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(self) -> i32 {
        self.max.y - self.min.y
    }

    /// Number of cells.
    #[inline]
    pub fn len(self) -> usize {
        if self.is_empty() {
            0
        } else {
            self.width() as usize * self.height() as usize
        }
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }

    #[inline]
    pub fn contains(self, p: Point) -> bool {
        (self.min.x..self.max.x).contains(&p.x) && (self.min.y..self.max.y).contains(&p.y)
    }

    /// Every cell, row by row.
    #[inline]
    pub fn iter(self) -> RangeIter {
        RangeIter {
            range: self,
            next: 0,
            end: self.len(),
        }
    }
}

impl IntoIterator for Range {
    type Item = Point;
    type IntoIter = RangeIter;

    fn into_iter(self) -> RangeIter {
        self.iter()
    }
}

/// Row-major cells of a [`Range`].
#[derive(Clone, Debug)]
pub struct RangeIter {
    range: Range,
    next: usize,
    end: usize,
}

impl Iterator for RangeIter {
    type Item = Point;

    #[inline]
    fn next(&mut self) -> Option<Point> {
        if self.next >= self.end {
            return None;
        }
        let w = self.range.width() as usize;
        let p = self
            .range
            .min
            .shift((self.next % w) as i32, (self.next / w) as i32);
        self.next += 1;
        Some(p)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.end - self.next;
        (n, Some(n))
    }
}

impl ExactSizeIterator for RangeIter {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_and_signs() {
        let p = Point::new(5, 2);
        assert_eq!(p + Point::new(-1, 1), Point::new(4, 3));
        assert_eq!(p - Point::new(5, 5), Point::new(0, -3));
        assert_eq!((Point::new(2, 9) - p).signum(), Point::new(-1, 1));
        assert_eq!(p.shift(0, -2), Point::new(5, 0));
    }

    #[test]
    fn direction_steps() {
        let steps: Vec<Point> = Direction::ALL.iter().map(|d| d.delta()).collect();
        for (i, a) in steps.iter().enumerate() {
            assert!(a.x.abs() <= 1 && a.y.abs() <= 1 && *a != Point::ZERO);
            assert!(steps[i + 1..].iter().all(|b| b != a));
        }
        assert_eq!(Direction::North.delta(), Point::new(0, -1));
    }

    #[test]
    fn points_sort_like_cells() {
        let mut pts = vec![Point::new(1, 1), Point::new(9, 0), Point::new(0, 1)];
        pts.sort();
        assert_eq!(pts, vec![Point::new(9, 0), Point::new(0, 1), Point::new(1, 1)]);
        assert_eq!(Point::new(-3, 4).to_string(), "(-3, 4)");
    }

    #[test]
    fn corners_in_any_order() {
        let r = Range::new(4, 1, 1, 3);
        assert_eq!(r, Range::new(1, 1, 4, 3));
        assert_eq!((r.width(), r.height(), r.len()), (3, 2, 6));
        assert!(r.contains(Point::new(1, 1)));
        assert!(r.contains(Point::new(3, 2)));
        assert!(!r.contains(Point::new(4, 2)));
        assert!(!r.contains(Point::new(2, 3)));
        assert!(!r.contains(Point::new(0, 1)));
    }

    #[test]
    fn iterates_row_major() {
        let r = Range::new(1, 1, 4, 3);
        let cells: Vec<Point> = r.into_iter().collect();
        assert_eq!(r.iter().len(), 6);
        assert_eq!(cells.first(), Some(&Point::new(1, 1)));
        assert_eq!(cells[3], Point::new(1, 2));
        assert_eq!(cells.last(), Some(&Point::new(3, 2)));
        assert!(cells.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn flat_range_is_empty() {
        let r = Range::new(2, 0, 2, 5);
        assert!(r.is_empty());
        assert_eq!(r.len(), 0);
        assert_eq!(r.iter().next(), None);
    }
}
