use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::{Duration, Instant};

use gridbench_core::{OccupancyGrid, Point, Range};

use crate::cc::UNLABELLED;
use crate::error::{QueryFault, SearchError};
use crate::traits::Pather;

/// Parent index of a node with no parent.
pub(crate) const NO_PARENT: usize = usize::MAX;

/// Expansions between two deadline checks.
const DEADLINE_INTERVAL: u64 = 1024;

// ---------------------------------------------------------------------------
// Internal node for the priority-queue searches
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub(crate) struct Node {
    pub(crate) g: f64,
    pub(crate) parent: usize,
    pub(crate) generation: u32,
    pub(crate) open: bool,
}

impl Default for Node {
    fn default() -> Self {
        Self {
            g: 0.0,
            parent: NO_PARENT,
            generation: 0,
            open: false,
        }
    }
}

/// Open list entry. The max-heap pops the smallest `f` first, then the
/// largest `g`, then the smallest cell index, so searches are deterministic.
#[derive(Clone, Copy, Debug)]
pub(crate) struct NodeRef {
    pub(crate) idx: usize,
    pub(crate) f: f64,
    pub(crate) g: f64,
}

impl Ord for NodeRef {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .total_cmp(&self.f)
            .then(self.g.total_cmp(&other.g))
            .then(other.idx.cmp(&self.idx))
    }
}

impl PartialOrd for NodeRef {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for NodeRef {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for NodeRef {}

// ---------------------------------------------------------------------------
// SearchSpace
// ---------------------------------------------------------------------------

/// Reusable scratch state for searches over one grid rectangle.
///
/// `SearchSpace` owns the node array, the open list and the other caches so
/// that repeated queries allocate nothing after the first one. Nodes are
/// invalidated lazily by bumping a generation counter. A space is not shared
/// between threads: each worker owns one.
pub struct SearchSpace {
    pub(crate) rng: Range,
    pub(crate) width: usize,
    pub(crate) nodes: Vec<Node>,
    pub(crate) generation: u32,
    pub(crate) open: BinaryHeap<NodeRef>,
    pub(crate) expanded: u64,
    deadline: Option<(Instant, Duration)>,
    /// Start and goal of the last successful search, for path queries.
    pub(crate) solved: Option<(usize, usize)>,
    // distance map caches
    pub(crate) dist_map: Vec<f64>,
    // component labels and flood-fill stack
    pub(crate) labels: Vec<u32>,
    pub(crate) flood: Vec<usize>,
    // shared scratch buffer for neighbor and direction queries
    pub(crate) nbuf: Vec<Point>,
}

impl SearchSpace {
    /// Create a `SearchSpace` for the given rectangle.
    pub fn new(rng: Range) -> Self {
        let len = rng.len();
        Self {
            rng,
            width: rng.width().max(0) as usize,
            nodes: vec![Node::default(); len],
            generation: 0,
            open: BinaryHeap::new(),
            expanded: 0,
            deadline: None,
            solved: None,
            dist_map: vec![f64::INFINITY; len],
            labels: vec![UNLABELLED; len],
            flood: Vec::new(),
            nbuf: Vec::with_capacity(8),
        }
    }

    /// Create a `SearchSpace` covering the whole of `grid`.
    pub fn for_grid(grid: &OccupancyGrid) -> Self {
        Self::new(grid.bounds())
    }

    /// Replace the underlying range.
    ///
    /// Caches are kept when the new range fits in the current capacity and
    /// reallocated otherwise.
    pub fn set_range(&mut self, rng: Range) {
        let new_len = rng.len();
        self.rng = rng;
        self.width = rng.width().max(0) as usize;
        self.solved = None;

        if new_len <= self.nodes.len() {
            self.bump_generation();
            return;
        }

        self.nodes.clear();
        self.nodes.resize(new_len, Node::default());
        self.generation = 0;
        self.dist_map.clear();
        self.dist_map.resize(new_len, f64::INFINITY);
        self.labels.clear();
        self.labels.resize(new_len, UNLABELLED);
        self.flood.clear();
    }

    /// Make sure the space covers exactly `grid`.
    pub fn fit(&mut self, grid: &OccupancyGrid) {
        if self.rng != grid.bounds() {
            self.set_range(grid.bounds());
        }
    }

    /// The rectangle being searched.
    #[inline]
    pub fn range(&self) -> Range {
        self.rng
    }

    /// Nodes expanded by the last search.
    #[inline]
    pub fn expanded(&self) -> u64 {
        self.expanded
    }

    /// The cell-by-cell path found by the last successful search, from start
    /// to goal inclusive. Jump segments are filled in with unit steps.
    ///
    /// Returns `None` if the last search failed, timed out or found no path.
    pub fn path(&self) -> Option<Vec<Point>> {
        let (start, goal) = self.solved?;
        let mut waypoints = Vec::new();
        let mut ci = goal;
        while ci != NO_PARENT {
            waypoints.push(self.point(ci));
            if ci == start {
                break;
            }
            ci = self.nodes[ci].parent;
        }
        waypoints.reverse();

        let mut path = Vec::with_capacity(waypoints.len());
        for pair in waypoints.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let step = (b - a).signum();
            let mut c = a;
            while c != b {
                path.push(c);
                c = c + step;
            }
        }
        path.extend(waypoints.last().copied());
        Some(path)
    }

    // -----------------------------------------------------------------------
    // Coordinate helpers
    // -----------------------------------------------------------------------

    /// Convert a `Point` to a flat index. Returns `None` if out of range.
    #[inline]
    pub(crate) fn idx(&self, p: Point) -> Option<usize> {
        if !self.rng.contains(p) {
            return None;
        }
        let x = (p.x - self.rng.min.x) as usize;
        let y = (p.y - self.rng.min.y) as usize;
        Some(y * self.width + x)
    }

    /// Convert a flat index back to a `Point`.
    #[inline]
    pub(crate) fn point(&self, idx: usize) -> Point {
        let x = (idx % self.width) as i32 + self.rng.min.x;
        let y = (idx / self.width) as i32 + self.rng.min.y;
        Point::new(x, y)
    }

    // -----------------------------------------------------------------------
    // Shared search loop pieces
    // -----------------------------------------------------------------------

    pub(crate) fn bump_generation(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        if self.generation == 0 {
            for n in self.nodes.iter_mut() {
                n.generation = 0;
            }
            self.generation = 1;
        }
    }

    /// Validate both endpoints against the range and `pather`.
    pub(crate) fn endpoints<P: Pather>(
        &self,
        pather: &P,
        from: Point,
        to: Point,
    ) -> Result<(usize, usize), SearchError> {
        let check = |pos: Point| {
            let Some(i) = self.idx(pos) else {
                return Err(SearchError::InvalidQuery {
                    pos,
                    reason: QueryFault::OutOfBounds,
                });
            };
            if !pather.passable(pos) {
                return Err(SearchError::InvalidQuery {
                    pos,
                    reason: QueryFault::Blocked,
                });
            }
            Ok(i)
        };
        Ok((check(from)?, check(to)?))
    }

    /// Reset per-search state and push the start node.
    pub(crate) fn begin(&mut self, start: usize, h: f64, budget: Option<Duration>) {
        self.bump_generation();
        self.open.clear();
        self.expanded = 0;
        self.solved = None;
        self.deadline = budget.map(|b| (Instant::now(), b));

        let generation = self.generation;
        let n = &mut self.nodes[start];
        n.g = 0.0;
        n.parent = NO_PARENT;
        n.generation = generation;
        n.open = true;
        self.open.push(NodeRef {
            idx: start,
            f: h,
            g: 0.0,
        });
    }

    /// Pop the best open node and close it. Stale heap entries are skipped.
    pub(crate) fn pop_open(&mut self) -> Option<usize> {
        while let Some(cur) = self.open.pop() {
            let n = &mut self.nodes[cur.idx];
            if n.generation != self.generation || !n.open {
                continue;
            }
            n.open = false;
            return Some(cur.idx);
        }
        None
    }

    /// Count one expansion, checking the time budget every
    /// `DEADLINE_INTERVAL` expansions starting with the first.
    pub(crate) fn tick(&mut self) -> Result<(), SearchError> {
        if self.expanded % DEADLINE_INTERVAL == 0 {
            if let Some((started, budget)) = self.deadline {
                if started.elapsed() >= budget {
                    return Err(SearchError::Timeout { budget });
                }
            }
        }
        self.expanded += 1;
        Ok(())
    }

    /// Offer cost `g` for node `ni` via `parent`. Closed nodes and
    /// non-improving costs are ignored. Returns whether the node was updated.
    pub(crate) fn relax(&mut self, ni: usize, parent: usize, g: f64, h: f64) -> bool {
        let generation = self.generation;
        let n = &mut self.nodes[ni];
        if n.generation == generation {
            if !n.open || g >= n.g {
                return false;
            }
        } else {
            n.generation = generation;
        }
        n.g = g;
        n.parent = parent;
        n.open = true;
        self.open.push(NodeRef { idx: ni, f: g + h, g });
        true
    }

    /// Record a successful search and return the goal cost.
    pub(crate) fn reached(&mut self, start: usize, goal: usize) -> f64 {
        self.solved = Some((start, goal));
        self.nodes[goal].g
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for SearchSpace {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.rng.serialize(serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for SearchSpace {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let range = Range::deserialize(deserializer)?;
        Ok(SearchSpace::new(range))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_ref_order() {
        let mut heap = BinaryHeap::new();
        heap.push(NodeRef { idx: 3, f: 5.0, g: 1.0 });
        heap.push(NodeRef { idx: 1, f: 4.0, g: 1.0 });
        heap.push(NodeRef { idx: 7, f: 5.0, g: 3.0 });
        heap.push(NodeRef { idx: 2, f: 5.0, g: 3.0 });
        let order: Vec<usize> = std::iter::from_fn(|| heap.pop().map(|n| n.idx)).collect();
        // lowest f, then highest g, then lowest index
        assert_eq!(order, vec![1, 2, 7, 3]);
    }

    #[test]
    fn idx_point_round_trip() {
        let sp = SearchSpace::new(Range::new(2, 3, 7, 6));
        for p in sp.range() {
            let i = sp.idx(p).unwrap();
            assert_eq!(sp.point(i), p);
        }
        assert_eq!(sp.idx(Point::new(0, 0)), None);
        assert_eq!(sp.idx(Point::new(7, 3)), None);
    }

    #[test]
    fn set_range_smaller_preserves_capacity() {
        let mut sp = SearchSpace::new(Range::new(0, 0, 20, 20));
        let cap = sp.nodes.len();
        let small = Range::new(0, 0, 5, 5);
        sp.set_range(small);
        assert_eq!(sp.range(), small);
        assert_eq!(sp.nodes.len(), cap);
        assert_eq!(sp.width, 5);
        assert!(sp.generation > 0);
    }

    #[test]
    fn set_range_larger_reallocates() {
        let mut sp = SearchSpace::new(Range::new(0, 0, 5, 5));
        let big = Range::new(0, 0, 20, 20);
        sp.set_range(big);
        assert_eq!(sp.range(), big);
        assert_eq!(sp.nodes.len(), 400);
        assert_eq!(sp.labels.len(), 400);
    }

    #[test]
    fn generation_wrap_resets_nodes() {
        let mut sp = SearchSpace::new(Range::new(0, 0, 2, 2));
        sp.generation = u32::MAX;
        sp.nodes[1].generation = 5;
        sp.bump_generation();
        assert_eq!(sp.generation, 1);
        assert!(sp.nodes.iter().all(|n| n.generation == 0));
    }

    #[test]
    fn zero_budget_times_out_on_first_tick() {
        let mut sp = SearchSpace::new(Range::new(0, 0, 2, 2));
        sp.begin(0, 0.0, Some(Duration::ZERO));
        assert_eq!(
            sp.tick(),
            Err(SearchError::Timeout {
                budget: Duration::ZERO
            })
        );
        sp.begin(0, 0.0, None);
        assert_eq!(sp.tick(), Ok(()));
        assert_eq!(sp.expanded(), 1);
    }

    #[test]
    fn path_is_empty_before_any_search() {
        let sp = SearchSpace::new(Range::new(0, 0, 3, 3));
        assert_eq!(sp.path(), None);
    }
}
