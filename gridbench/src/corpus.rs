//! Benchmarking every map under a directory.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use gridbench_paths::Algorithm;
use serde::Serialize;
use walkdir::WalkDir;

use crate::error::BenchError;
use crate::report::{MapReport, Statistics};
use crate::runner::Runner;

/// Extension of map files picked up by [`discover_maps`].
pub const MAP_EXTENSION: &str = "map";

/// All `*.map` files under `root`, sorted by path.
///
/// An unreadable root is an error; unreadable entries below it are logged
/// and skipped.
pub fn discover_maps(root: &Path) -> Result<Vec<PathBuf>, BenchError> {
    let mut maps = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(e) => e,
            Err(e) if e.depth() == 0 => return Err(e.into()),
            Err(e) => {
                log::warn!("skipping unreadable entry: {e}");
                continue;
            }
        };
        let is_map = entry.path().extension().is_some_and(|ext| ext == MAP_EXTENSION);
        if entry.file_type().is_file() && is_map {
            maps.push(entry.into_path());
        }
    }
    log::debug!("found {} maps under {}", maps.len(), root.display());
    Ok(maps)
}

/// Sums of per-map reports over a corpus.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct CorpusTotals {
    pub total_cost: f64,
    pub maps_ok: usize,
    pub maps_failed: usize,
    pub solved: usize,
    pub unreachable: usize,
    pub skipped: usize,
    pub expanded: u64,
    pub mismatches: usize,
    /// Sum of the per-map mean pass times.
    pub time_ms: f64,
    /// Pass `i` summed over every map.
    #[serde(skip)]
    pub passes: Vec<Duration>,
}

impl CorpusTotals {
    pub fn add(&mut self, report: &MapReport) {
        self.maps_ok += 1;
        self.total_cost += report.total_cost;
        self.solved += report.solved;
        self.unreachable += report.unreachable;
        self.skipped += report.skipped;
        self.expanded += report.expanded;
        self.mismatches += report.mismatches;
        self.time_ms += report.time.mean_ms;
        if self.passes.len() < report.passes.len() {
            self.passes.resize(report.passes.len(), Duration::ZERO);
        }
        for (sum, t) in self.passes.iter_mut().zip(&report.passes) {
            *sum += *t;
        }
    }

    /// Timing of whole-corpus passes.
    pub fn time(&self) -> Statistics {
        Statistics::from_times(&self.passes)
    }

    /// Record a map that could not be benchmarked.
    pub fn fail(&mut self) {
        self.maps_failed += 1;
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

impl fmt::Display for CorpusTotals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "total {:.4} {} {} {} {} {} {} {:.3}",
            self.total_cost,
            self.maps_ok,
            self.maps_failed,
            self.solved,
            self.unreachable,
            self.skipped,
            self.expanded,
            self.time_ms
        )
    }
}

/// Benchmark `algorithm` on every map under `root`, handing each report to
/// `emit` as it completes. Maps that fail to load are logged and counted.
pub fn run_corpus(
    runner: &Runner,
    root: &Path,
    algorithm: Algorithm,
    mut emit: impl FnMut(&MapReport),
) -> Result<CorpusTotals, BenchError> {
    let mut totals = CorpusTotals::default();
    for path in discover_maps(root)? {
        match runner.run_map(&path, algorithm) {
            Ok(report) => {
                emit(&report);
                totals.add(&report);
            }
            Err(e) => {
                log::warn!("{}: {e}", path.display());
                totals.fail();
            }
        }
    }
    log::info!(
        "{algorithm}: {} maps benchmarked, {} failed",
        totals.maps_ok,
        totals.maps_failed
    );
    Ok(totals)
}
