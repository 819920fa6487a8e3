use gridbench_core::Point;

use crate::space::{NO_PARENT, NodeRef, SearchSpace};
use crate::traits::WeightedPather;

impl SearchSpace {
    /// Compute a multi-source distance map.
    ///
    /// Every passable source starts at cost 0. Expansion stops once the
    /// cumulative cost exceeds `max_cost`. Query the result with
    /// [`distance_at`](Self::distance_at).
    pub fn distance_map<P: WeightedPather>(
        &mut self,
        pather: &P,
        sources: &[Point],
        max_cost: f64,
    ) {
        for v in self.dist_map.iter_mut() {
            *v = f64::INFINITY;
        }
        self.solved = None;
        self.open.clear();
        self.bump_generation();
        let cur_gen = self.generation;

        for &src in sources {
            let Some(si) = self.idx(src) else {
                continue;
            };
            if !pather.passable(src) {
                continue;
            }
            let n = &mut self.nodes[si];
            n.g = 0.0;
            n.parent = NO_PARENT;
            n.generation = cur_gen;
            n.open = true;
            self.dist_map[si] = 0.0;
            self.open.push(NodeRef {
                idx: si,
                f: 0.0,
                g: 0.0,
            });
        }

        let mut nbuf = std::mem::take(&mut self.nbuf);

        while let Some(ci) = self.pop_open() {
            let current_g = self.nodes[ci].g;
            let cp = self.point(ci);

            nbuf.clear();
            pather.neighbors(cp, &mut nbuf);

            for &np in nbuf.iter() {
                let Some(ni) = self.idx(np) else {
                    continue;
                };
                let tentative = current_g + pather.cost(cp, np);
                if tentative > max_cost {
                    continue;
                }
                if self.relax(ni, ci, tentative, 0.0) {
                    self.dist_map[ni] = tentative;
                }
            }
        }

        self.nbuf = nbuf;
    }

    /// Cost at `p` from the last [`distance_map`](Self::distance_map) call,
    /// or infinity if `p` was not reached or lies outside the range.
    pub fn distance_at(&self, p: Point) -> f64 {
        match self.idx(p) {
            Some(i) => self.dist_map[i],
            None => f64::INFINITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::SQRT_2;

    use gridbench_core::{OccupancyGrid, Terrain};

    use super::*;
    use crate::moves::{Corners, GridMoves};

    #[test]
    fn distance_map_single_source() {
        let g = OccupancyGrid::filled(5, 5, Terrain::Ground);
        let m = GridMoves::new(&g, Corners::Forbid);
        let mut sp = SearchSpace::for_grid(&g);
        sp.distance_map(&m, &[Point::new(0, 0)], f64::INFINITY);
        assert_eq!(sp.distance_at(Point::new(0, 0)), 0.0);
        assert_eq!(sp.distance_at(Point::new(4, 0)), 4.0);
        assert!((sp.distance_at(Point::new(2, 2)) - 2.0 * SQRT_2).abs() < 1e-9);
        assert!((sp.distance_at(Point::new(4, 2)) - (2.0 + 2.0 * SQRT_2)).abs() < 1e-9);
        assert_eq!(sp.distance_at(Point::new(9, 9)), f64::INFINITY);
    }

    #[test]
    fn distance_map_multi_source_and_limit() {
        let g = OccupancyGrid::filled(7, 1, Terrain::Ground);
        let m = GridMoves::new(&g, Corners::Forbid);
        let mut sp = SearchSpace::for_grid(&g);
        sp.distance_map(&m, &[Point::new(0, 0), Point::new(6, 0)], 2.0);
        assert_eq!(sp.distance_at(Point::new(1, 0)), 1.0);
        assert_eq!(sp.distance_at(Point::new(5, 0)), 1.0);
        assert_eq!(sp.distance_at(Point::new(4, 0)), 2.0);
        assert_eq!(sp.distance_at(Point::new(3, 0)), f64::INFINITY);
    }

    #[test]
    fn distance_map_respects_walls() {
        // . @ .
        // . @ .
        let g = OccupancyGrid::from_fn(3, 2, |p| {
            if p.x == 1 {
                Terrain::Obstacle
            } else {
                Terrain::Ground
            }
        });
        let m = GridMoves::new(&g, Corners::Allow);
        let mut sp = SearchSpace::for_grid(&g);
        sp.distance_map(&m, &[Point::new(0, 0)], f64::INFINITY);
        assert_eq!(sp.distance_at(Point::new(0, 1)), 1.0);
        assert_eq!(sp.distance_at(Point::new(2, 0)), f64::INFINITY);
    }
}
