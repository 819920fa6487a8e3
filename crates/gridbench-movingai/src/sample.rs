use gridbench_core::{OccupancyGrid, Point};
use gridbench_paths::{Corners, GridMoves, SearchSpace};
use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};

use crate::scen::Scenario;

/// How many queries to draw and from which seed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SampleSpec {
    pub count: usize,
    pub seed: u64,
    /// Only pair cells that are connected under the movement model.
    pub reachable_only: bool,
}

impl Default for SampleSpec {
    fn default() -> Self {
        Self {
            count: 1000,
            seed: 0,
            reachable_only: false,
        }
    }
}

/// Random start/goal pairs over the passable cells of a grid.
///
/// Every call to [`iter`](Self::iter) reseeds the generator, so each pass
/// yields the same sequence.
#[derive(Debug)]
pub struct Sampler {
    spec: SampleSpec,
    passable: Vec<Point>,
    /// Cells of each connected component, when sampling reachable pairs.
    components: Vec<Vec<Point>>,
    /// Component index of each entry of `passable`.
    component_of: Vec<usize>,
}

impl Sampler {
    /// Prepare a sampler for `grid` under the given corner policy.
    pub fn new(grid: &OccupancyGrid, corners: Corners, spec: SampleSpec) -> Self {
        let passable: Vec<Point> = grid
            .iter()
            .filter(|(_, t)| t.is_passable())
            .map(|(p, _)| p)
            .collect();

        let mut components = Vec::new();
        let mut component_of = Vec::new();
        if spec.reachable_only {
            let mut space = SearchSpace::for_grid(grid);
            let count = space.label_components(&GridMoves::new(grid, corners));
            components = vec![Vec::new(); count];
            for &p in &passable {
                let label = space.component(p).unwrap_or(0);
                components[label].push(p);
                component_of.push(label);
            }
            log::debug!("sampling over {count} connected components");
        }
        if passable.is_empty() {
            log::warn!("grid has no passable cells, sampling yields no scenarios");
        }

        Self {
            spec,
            passable,
            components,
            component_of,
        }
    }

    /// The sampling parameters.
    pub fn spec(&self) -> SampleSpec {
        self.spec
    }

    /// Start a fresh pass.
    pub fn iter(&self) -> SampleIter<'_> {
        SampleIter {
            sampler: self,
            rng: StdRng::seed_from_u64(self.spec.seed),
            remaining: if self.passable.is_empty() {
                0
            } else {
                self.spec.count
            },
        }
    }

    fn draw(&self, rng: &mut StdRng) -> Scenario {
        let i = rng.random_range(0..self.passable.len());
        let start = self.passable[i];
        let goal = if self.spec.reachable_only {
            let members = &self.components[self.component_of[i]];
            members[rng.random_range(0..members.len())]
        } else {
            self.passable[rng.random_range(0..self.passable.len())]
        };
        Scenario {
            bucket: 0,
            start,
            goal,
            expected: None,
        }
    }
}

/// One pass over a [`Sampler`].
pub struct SampleIter<'a> {
    sampler: &'a Sampler,
    rng: StdRng,
    remaining: usize,
}

impl Iterator for SampleIter<'_> {
    type Item = Scenario;

    fn next(&mut self) -> Option<Scenario> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        Some(self.sampler.draw(&mut self.rng))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for SampleIter<'_> {}
