use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use gridbench_core::Point;

use crate::error::SearchError;
use crate::moves::GridMoves;
use crate::space::SearchSpace;

/// Search algorithm variant.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Algorithm {
    AStar,
    Jps,
    Dijkstra,
}

impl Algorithm {
    /// Every variant, in the order benchmarks report them.
    pub const ALL: [Algorithm; 3] = [Self::Jps, Self::AStar, Self::Dijkstra];

    /// Command-line name, also the first token of a result line.
    pub const fn name(self) -> &'static str {
        match self {
            Self::AStar => "astar",
            Self::Jps => "jps",
            Self::Dijkstra => "dijkstra",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown algorithm name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown algorithm \"{0}\" (expected jps, astar or dijkstra)")]
pub struct ParseAlgorithmError(pub String);

impl FromStr for Algorithm {
    type Err = ParseAlgorithmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "astar" => Ok(Self::AStar),
            "jps" => Ok(Self::Jps),
            "dijkstra" => Ok(Self::Dijkstra),
            other => Err(ParseAlgorithmError(other.to_string())),
        }
    }
}

/// Outcome of one search.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SearchResult {
    /// Path cost, or infinity when the goal is unreachable.
    pub cost: f64,
    /// Nodes expanded, not counting the goal.
    pub expanded: u64,
    pub elapsed: Duration,
}

impl SearchResult {
    /// Whether a path was found.
    #[inline]
    pub fn is_reachable(&self) -> bool {
        self.cost.is_finite()
    }
}

impl SearchSpace {
    /// Run `algorithm` from `from` to `to` over `moves`, resizing the space
    /// to the grid first if needed.
    pub fn search(
        &mut self,
        moves: &GridMoves<'_>,
        algorithm: Algorithm,
        from: Point,
        to: Point,
        budget: Option<Duration>,
    ) -> Result<SearchResult, SearchError> {
        self.fit(moves.grid());
        match algorithm {
            Algorithm::AStar => self.astar(moves, from, to, budget),
            Algorithm::Jps => self.jps(moves, from, to, budget),
            Algorithm::Dijkstra => self.dijkstra(moves, from, to, budget),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::SQRT_2;

    use gridbench_core::{OccupancyGrid, Terrain};
    use rand::rngs::StdRng;
    use rand::{RngExt, SeedableRng};

    use super::*;
    use crate::moves::Corners;

    const EPS: f64 = 1e-6;

    fn run_all(
        g: &OccupancyGrid,
        corners: Corners,
        from: Point,
        to: Point,
    ) -> Vec<(Algorithm, SearchResult)> {
        let m = GridMoves::new(g, corners);
        let mut sp = SearchSpace::for_grid(g);
        Algorithm::ALL
            .iter()
            .map(|&a| (a, sp.search(&m, a, from, to, None).unwrap()))
            .collect()
    }

    fn random_grid(rng: &mut StdRng, w: i32, h: i32, density: f64) -> OccupancyGrid {
        OccupancyGrid::from_fn(w, h, |_| {
            if rng.random_range(0.0..1.0) < density {
                Terrain::OutOfBounds
            } else {
                Terrain::Ground
            }
        })
    }

    #[test]
    fn algorithm_names() {
        for a in Algorithm::ALL {
            assert_eq!(a.name().parse::<Algorithm>(), Ok(a));
            assert_eq!(a.to_string(), a.name());
        }
        assert!("bfs".parse::<Algorithm>().is_err());
    }

    #[test]
    fn open_4x4_diagonal() {
        let g = OccupancyGrid::filled(4, 4, Terrain::Ground);
        for corners in [Corners::Forbid, Corners::Allow] {
            for (a, r) in run_all(&g, corners, Point::new(0, 0), Point::new(3, 3)) {
                assert!((r.cost - 3.0 * SQRT_2).abs() < EPS, "{a}: {}", r.cost);
                assert!((r.cost - 4.2426).abs() < 1e-4);
            }
        }
    }

    #[test]
    fn wall_with_single_opening() {
        // column 2 is blocked except at row 0
        let g = OccupancyGrid::from_fn(4, 4, |p| {
            if p.x == 2 && p.y != 0 {
                Terrain::OutOfBounds
            } else {
                Terrain::Ground
            }
        });
        let expected = [(Corners::Forbid, 6.0), (Corners::Allow, 4.0 + SQRT_2)];
        for (corners, want) in expected {
            for (a, r) in run_all(&g, corners, Point::new(0, 0), Point::new(3, 3)) {
                assert!(
                    (r.cost - want).abs() < EPS,
                    "{a}/{corners}: got {}, want {want}",
                    r.cost
                );
            }
        }
    }

    #[test]
    fn unreachable_goal_is_infinite() {
        let g = OccupancyGrid::from_fn(5, 3, |p| {
            if p.x == 2 {
                Terrain::Tree
            } else {
                Terrain::Ground
            }
        });
        for corners in [Corners::Forbid, Corners::Allow] {
            for (a, r) in run_all(&g, corners, Point::new(0, 1), Point::new(4, 1)) {
                assert_eq!(r.cost, f64::INFINITY, "{a}");
                assert!(!r.is_reachable());
                assert!(r.expanded > 0);
            }
        }
    }

    #[test]
    fn start_equals_goal_for_every_variant() {
        let g = OccupancyGrid::filled(3, 3, Terrain::Swamp);
        for (a, r) in run_all(&g, Corners::Forbid, Point::new(2, 1), Point::new(2, 1)) {
            assert_eq!(r.cost, 0.0, "{a}");
            assert_eq!(r.expanded, 0, "{a}");
        }
    }

    #[test]
    fn search_fits_the_space_to_the_grid() {
        let g = OccupancyGrid::filled(6, 2, Terrain::Ground);
        let m = GridMoves::new(&g, Corners::Forbid);
        let mut sp = SearchSpace::new(gridbench_core::Range::new(0, 0, 2, 2));
        let r = sp
            .search(&m, Algorithm::Jps, Point::new(0, 0), Point::new(5, 0), None)
            .unwrap();
        assert_eq!(r.cost, 5.0);
        assert_eq!(sp.range(), g.bounds());
    }

    #[test]
    fn random_grids_all_variants_agree() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for round in 0..40 {
            let w = rng.random_range(4..24);
            let h = rng.random_range(4..24);
            let density = [0.1, 0.25, 0.35][round % 3];
            let g = random_grid(&mut rng, w, h, density);
            for corners in [Corners::Forbid, Corners::Allow] {
                let m = GridMoves::new(&g, corners);
                let mut sp = SearchSpace::for_grid(&g);
                let mut oracle = SearchSpace::for_grid(&g);
                for _ in 0..10 {
                    let from = Point::new(rng.random_range(0..w), rng.random_range(0..h));
                    let to = Point::new(rng.random_range(0..w), rng.random_range(0..h));
                    if !g.is_passable(from) || !g.is_passable(to) {
                        continue;
                    }
                    oracle.distance_map(&m, &[from], f64::INFINITY);
                    let want = oracle.distance_at(to);
                    for a in Algorithm::ALL {
                        let r = sp.search(&m, a, from, to, None).unwrap();
                        if want.is_infinite() {
                            assert!(r.cost.is_infinite(), "{a}/{corners} {from}->{to}");
                        } else {
                            assert!(
                                (r.cost - want).abs() < EPS,
                                "{a}/{corners} {from}->{to}: got {}, want {want}\n{g}",
                                r.cost
                            );
                            let path = sp.path().unwrap();
                            assert_eq!(path.first(), Some(&from));
                            assert_eq!(path.last(), Some(&to));
                            let walked: f64 = path
                                .windows(2)
                                .map(|w| {
                                    assert!(m.can_step(w[0], w[1] - w[0]), "{a}: bad step");
                                    if w[0].x != w[1].x && w[0].y != w[1].y {
                                        SQRT_2
                                    } else {
                                        1.0
                                    }
                                })
                                .sum();
                            assert!((walked - want).abs() < EPS);
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn repeated_searches_are_deterministic() {
        let mut rng = StdRng::seed_from_u64(7);
        let g = random_grid(&mut rng, 32, 32, 0.3);
        let m = GridMoves::new(&g, Corners::Forbid);
        let queries: Vec<(Point, Point)> = (0..20)
            .map(|_| {
                (
                    Point::new(rng.random_range(0..32), rng.random_range(0..32)),
                    Point::new(rng.random_range(0..32), rng.random_range(0..32)),
                )
            })
            .filter(|(a, b)| g.is_passable(*a) && g.is_passable(*b))
            .collect();
        for a in Algorithm::ALL {
            let mut first = SearchSpace::for_grid(&g);
            let mut second = SearchSpace::for_grid(&g);
            for &(from, to) in &queries {
                let x = first.search(&m, a, from, to, None).unwrap();
                let y = second.search(&m, a, from, to, None).unwrap();
                assert_eq!(x.cost.to_bits(), y.cost.to_bits());
                assert_eq!(x.expanded, y.expanded);
                assert_eq!(first.path(), second.path());
            }
        }
    }
}

#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn algorithm_uses_its_name() {
        for a in Algorithm::ALL {
            let json = serde_json::to_string(&a).unwrap();
            assert_eq!(json, format!("\"{a}\""));
            assert_eq!(serde_json::from_str::<Algorithm>(&json).unwrap(), a);
        }
        assert!(serde_json::from_str::<Algorithm>("\"bfs\"").is_err());
    }
}
