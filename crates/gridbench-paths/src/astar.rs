use std::time::{Duration, Instant};

use gridbench_core::Point;

use crate::error::SearchError;
use crate::search::SearchResult;
use crate::space::SearchSpace;
use crate::traits::{AstarPather, WeightedPather};

impl SearchSpace {
    /// Compute the least cost from `from` to `to` using A*.
    ///
    /// An unreachable goal yields an infinite cost. After a successful
    /// search, [`path`](Self::path) returns the route.
    pub fn astar<P: AstarPather>(
        &mut self,
        pather: &P,
        from: Point,
        to: Point,
        budget: Option<Duration>,
    ) -> Result<SearchResult, SearchError> {
        self.best_first(pather, from, to, budget, |p| pather.estimate(p, to))
    }

    /// Compute the least cost from `from` to `to` using Dijkstra's
    /// algorithm, stopping as soon as the goal is settled.
    pub fn dijkstra<P: WeightedPather>(
        &mut self,
        pather: &P,
        from: Point,
        to: Point,
        budget: Option<Duration>,
    ) -> Result<SearchResult, SearchError> {
        self.best_first(pather, from, to, budget, |_| 0.0)
    }

    fn best_first<P: WeightedPather>(
        &mut self,
        pather: &P,
        from: Point,
        to: Point,
        budget: Option<Duration>,
        h: impl Fn(Point) -> f64,
    ) -> Result<SearchResult, SearchError> {
        let started = Instant::now();
        let (start_idx, goal_idx) = self.endpoints(pather, from, to)?;
        self.begin(start_idx, h(from), budget);

        let mut nbuf = std::mem::take(&mut self.nbuf);

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

            let current_g = self.nodes[ci].g;
            let current_point = self.point(ci);

            nbuf.clear();
            pather.neighbors(current_point, &mut nbuf);

            for &np in nbuf.iter() {
                let Some(ni) = self.idx(np) else {
                    continue;
                };
                let tentative_g = current_g + pather.cost(current_point, np);
                self.relax(ni, ci, tentative_g, h(np));
            }
        };

        self.nbuf = nbuf;
        let cost = outcome?;
        Ok(SearchResult {
            cost,
            expanded: self.expanded,
            elapsed: started.elapsed(),
        })
    }
}
