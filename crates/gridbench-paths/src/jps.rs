//! Jump Point Search (JPS) on 8-connected uniform-cost grids.
//!
//! JPS is an optimised A* variant: it "jumps" along straight and diagonal
//! lines and only adds nodes to the open list at *jump points*, cells where
//! an optimal path may have to turn. Both corner policies are supported:
//!
//! - [`Corners::Forbid`]: a straight jump stops at a cell whose side
//!   neighbour is free while the cell behind that neighbour is blocked.
//!   Diagonal moves have no forced neighbours.
//! - [`Corners::Allow`]: the classic rules, where a straight jump stops
//!   beside a blocked cell whose diagonal successor is free.
//!
//! A diagonal jump also stops wherever one of its two straight sub-jumps
//! finds a jump point.

use std::f64::consts::SQRT_2;
use std::time::{Duration, Instant};

use gridbench_core::{Direction, Point};

use crate::distance;
use crate::error::SearchError;
use crate::moves::{Corners, GridMoves};
use crate::search::SearchResult;
use crate::space::{NO_PARENT, SearchSpace};

impl SearchSpace {
    /// Compute the least cost from `from` to `to` using Jump Point Search.
    ///
    /// Costs match [`astar`](Self::astar) under the same [`GridMoves`].
    pub fn jps(
        &mut self,
        moves: &GridMoves<'_>,
        from: Point,
        to: Point,
        budget: Option<Duration>,
    ) -> Result<SearchResult, SearchError> {
        let started = Instant::now();
        let (start_idx, goal_idx) = self.endpoints(moves, from, to)?;
        self.begin(start_idx, distance::octile(from, to), budget);

        let mut dirs = std::mem::take(&mut self.nbuf);

        let outcome = loop {
            let Some(ci) = self.pop_open() else {
                break Ok(f64::INFINITY);
            };
            if ci == goal_idx {
                break Ok(self.reached(start_idx, goal_idx));
            }
            if let Err(e) = self.tick() {
                break Err(e);
            }

            let cp = self.point(ci);
            let cur_g = self.nodes[ci].g;

            dirs.clear();
            let parent = self.nodes[ci].parent;
            if parent == NO_PARENT {
                for dir in Direction::ALL {
                    if moves.can_step(cp, dir.delta()) {
                        dirs.push(dir.delta());
                    }
                }
            } else {
                let d = (cp - self.point(parent)).signum();
                prune(moves, cp, d, &mut dirs);
            }

            for &dir in dirs.iter() {
                let jumped = if dir.x != 0 && dir.y != 0 {
                    jump_diagonal(moves, cp, dir, to)
                } else {
                    jump_straight(moves, cp, dir, to)
                };
                let Some((jp, steps)) = jumped else {
                    continue;
                };
                let Some(ji) = self.idx(jp) else {
                    continue;
                };
                let step_cost = if dir.x != 0 && dir.y != 0 { SQRT_2 } else { 1.0 };
                let tentative_g = cur_g + step_cost * steps as f64;
                self.relax(ji, ci, tentative_g, distance::octile(jp, to));
            }
        };

        self.nbuf = dirs;
        let cost = outcome?;
        Ok(SearchResult {
            cost,
            expanded: self.expanded,
            elapsed: started.elapsed(),
        })
    }
}

/// The two unit offsets perpendicular to the straight direction `d`.
#[inline]
fn sides(d: Point) -> [Point; 2] {
    [Point::new(d.y, d.x), Point::new(-d.y, -d.x)]
}

/// Pruned successor directions of `p`, reached by moving in direction `d`.
fn prune(m: &GridMoves<'_>, p: Point, d: Point, dirs: &mut Vec<Point>) {
    let grid = m.grid();
    if d.x != 0 && d.y != 0 {
        for s in [Point::new(d.x, 0), Point::new(0, d.y), d] {
            if m.can_step(p, s) {
                dirs.push(s);
            }
        }
        if m.corners() == Corners::Allow {
            let back_x = Point::new(-d.x, d.y);
            if !grid.is_passable(p.shift(-d.x, 0)) && m.can_step(p, back_x) {
                dirs.push(back_x);
            }
            let back_y = Point::new(d.x, -d.y);
            if !grid.is_passable(p.shift(0, -d.y)) && m.can_step(p, back_y) {
                dirs.push(back_y);
            }
        }
        return;
    }

    if m.can_step(p, d) {
        dirs.push(d);
    }
    for s in sides(d) {
        match m.corners() {
            Corners::Forbid => {
                if !grid.is_passable(p - d + s) && grid.is_passable(p + s) {
                    dirs.push(s);
                    if m.can_step(p, d + s) {
                        dirs.push(d + s);
                    }
                }
            }
            Corners::Allow => {
                if !grid.is_passable(p + s) && grid.is_passable(p + d + s) {
                    dirs.push(d + s);
                }
            }
        }
    }
}

/// Whether the cell `n`, reached by a straight step `d`, has a forced
/// neighbour.
#[inline]
fn forced_straight(m: &GridMoves<'_>, n: Point, d: Point) -> bool {
    let grid = m.grid();
    sides(d).into_iter().any(|s| match m.corners() {
        Corners::Forbid => !grid.is_passable(n - d + s) && grid.is_passable(n + s),
        Corners::Allow => !grid.is_passable(n + s) && grid.is_passable(n + d + s),
    })
}

/// Whether the cell `n`, reached by a diagonal step `d`, has a forced
/// neighbour. Never true when corner cutting is forbidden.
#[inline]
fn forced_diagonal(m: &GridMoves<'_>, n: Point, d: Point) -> bool {
    if m.corners() == Corners::Forbid {
        return false;
    }
    let grid = m.grid();
    (!grid.is_passable(n.shift(-d.x, 0)) && grid.is_passable(n.shift(-d.x, d.y)))
        || (!grid.is_passable(n.shift(0, -d.y)) && grid.is_passable(n.shift(d.x, -d.y)))
}

/// Jump from `p` along straight direction `d`. Returns the jump point and
/// the number of steps taken.
fn jump_straight(m: &GridMoves<'_>, p: Point, d: Point, goal: Point) -> Option<(Point, u32)> {
    let mut n = p;
    let mut steps = 0;
    loop {
        if !m.can_step(n, d) {
            return None;
        }
        n = n + d;
        steps += 1;
        if n == goal || forced_straight(m, n, d) {
            return Some((n, steps));
        }
    }
}

/// Jump from `p` along diagonal direction `d`.
fn jump_diagonal(m: &GridMoves<'_>, p: Point, d: Point, goal: Point) -> Option<(Point, u32)> {
    let mut n = p;
    let mut steps = 0;
    loop {
        if !m.can_step(n, d) {
            return None;
        }
        n = n + d;
        steps += 1;
        if n == goal
            || forced_diagonal(m, n, d)
            || jump_straight(m, n, Point::new(d.x, 0), goal).is_some()
            || jump_straight(m, n, Point::new(0, d.y), goal).is_some()
        {
            return Some((n, steps));
        }
    }
}
