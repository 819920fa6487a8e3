//! Benchmarking one map with one algorithm.
//!
//! Scenarios are searched in parallel on a rayon pool, one [`SearchSpace`]
//! per worker. Outcomes are collected in scenario order and summed on the
//! calling thread, so totals do not depend on the number of workers.

use std::path::Path;
use std::time::{Duration, Instant};

use gridbench_core::OccupancyGrid;
use gridbench_movingai::{Scenario, ScenarioSource, load_map};
use gridbench_paths::{Algorithm, GridMoves, SearchError, SearchResult, SearchSpace};
use rayon::prelude::*;

use crate::config::BenchConfig;
use crate::error::BenchError;
use crate::report::{MapReport, Statistics};

/// What happened to one scenario.
#[derive(Clone, Debug, PartialEq)]
enum Outcome {
    Solved { cost: f64, expanded: u64 },
    Unreachable { expanded: u64 },
    Skipped(SearchError),
}

impl From<Result<SearchResult, SearchError>> for Outcome {
    fn from(r: Result<SearchResult, SearchError>) -> Self {
        match r {
            Ok(res) if res.is_reachable() => Outcome::Solved {
                cost: res.cost,
                expanded: res.expanded,
            },
            Ok(res) => Outcome::Unreachable {
                expanded: res.expanded,
            },
            Err(e) => Outcome::Skipped(e),
        }
    }
}

/// Runs benchmarks under a fixed [`BenchConfig`].
pub struct Runner {
    config: BenchConfig,
    pool: rayon::ThreadPool,
}

impl Runner {
    /// Validate `config` and start its worker pool.
    pub fn new(config: BenchConfig) -> Result<Self, BenchError> {
        config.validate()?;
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.threads)
            .thread_name(|i| format!("gridbench-{i}"))
            .build()?;
        log::debug!("search pool has {} workers", pool.current_num_threads());
        Ok(Self { config, pool })
    }

    pub fn config(&self) -> &BenchConfig {
        &self.config
    }

    /// Load the map at `path` and benchmark `algorithm` on its scenarios.
    pub fn run_map(&self, path: &Path, algorithm: Algorithm) -> Result<MapReport, BenchError> {
        let grid = load_map(path)?;
        self.run_grid(path, &grid, algorithm)
    }

    /// Benchmark `algorithm` on an already loaded grid. `path` locates the
    /// scenario file and labels the report.
    pub fn run_grid(
        &self,
        path: &Path,
        grid: &OccupancyGrid,
        algorithm: Algorithm,
    ) -> Result<MapReport, BenchError> {
        let c = &self.config;
        let source = ScenarioSource::open(path, grid, c.corners, c.scenarios, c.sample_spec())?;
        let scenarios: Vec<Scenario> = source.scenarios()?.collect::<Result<_, _>>()?;
        let moves = GridMoves::new(grid, c.corners);

        let mut times = Vec::with_capacity(c.samples);
        let mut outcomes = Vec::new();
        for pass in 0..c.samples {
            let started = Instant::now();
            let batch = self.run_pass(&moves, algorithm, &scenarios);
            let elapsed = started.elapsed();
            log::debug!("{} {algorithm} pass {pass}: {elapsed:?}", path.display());
            times.push(elapsed);
            if pass == 0 {
                outcomes = batch;
            }
        }

        let report = self.summarize(path, algorithm, &scenarios, &outcomes, &times);
        log::info!(
            "{}: {} solved={} unreachable={} skipped={} in {:.3}ms",
            path.display(),
            algorithm,
            report.solved,
            report.unreachable,
            report.skipped,
            report.time.mean_ms
        );
        Ok(report)
    }

    fn run_pass(
        &self,
        moves: &GridMoves<'_>,
        algorithm: Algorithm,
        scenarios: &[Scenario],
    ) -> Vec<Outcome> {
        let budget = self.config.time_budget();
        self.pool.install(|| {
            scenarios
                .par_iter()
                .map_init(
                    || SearchSpace::for_grid(moves.grid()),
                    |space, sc| {
                        let result = space.search(moves, algorithm, sc.start, sc.goal, budget);
                        Outcome::from(result)
                    },
                )
                .collect()
        })
    }

    fn summarize(
        &self,
        path: &Path,
        algorithm: Algorithm,
        scenarios: &[Scenario],
        outcomes: &[Outcome],
        times: &[Duration],
    ) -> MapReport {
        let mut report = MapReport {
            map: path.to_path_buf(),
            algorithm,
            total_cost: 0.0,
            solved: 0,
            unreachable: 0,
            skipped: 0,
            expanded: 0,
            mismatches: 0,
            time: Statistics::from_times(times),
            passes: times.to_vec(),
        };
        for (i, (sc, outcome)) in scenarios.iter().zip(outcomes).enumerate() {
            match outcome {
                Outcome::Solved { cost, expanded } => {
                    report.solved += 1;
                    report.total_cost += cost;
                    report.expanded += expanded;
                    if self.config.verify && self.mismatch(sc, *cost) {
                        report.mismatches += 1;
                        log::warn!(
                            "{} scenario {i}: cost {cost:.8} differs from expected {:.8}",
                            path.display(),
                            sc.expected.unwrap_or_default()
                        );
                    }
                }
                Outcome::Unreachable { expanded } => {
                    report.unreachable += 1;
                    report.expanded += expanded;
                }
                Outcome::Skipped(e) => {
                    report.skipped += 1;
                    log::warn!("{} scenario {i} skipped: {e}", path.display());
                }
            }
        }
        report
    }

    fn mismatch(&self, sc: &Scenario, cost: f64) -> bool {
        match sc.expected {
            Some(expected) => (cost - expected).abs() > self.config.tolerance,
            None => false,
        }
    }
}
