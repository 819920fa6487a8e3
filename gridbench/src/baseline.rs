//! Saved timings, and comparing a run with them.
//!
//! A baseline maps entry names (`"<algorithm> <map>"`, plus one
//! `"<algorithm> total"` row per run) to the [`Statistics`] of their passes.
//! Two runs are compared entry by entry: the difference of the means is
//! divided by its standard error, and `|z| > 2` counts as significant.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

use gridbench_paths::Algorithm;
use serde::{Deserialize, Serialize};

use crate::config::BenchConfig;
use crate::error::BenchError;
use crate::report::{MapReport, Statistics};

/// Name of the row that covers a whole run.
pub const TOTAL: &str = "total";

/// z-score above which a change is reported as significant.
pub const SIGNIFICANT_Z: f64 = 2.0;

/// Named timings of one run.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Baseline {
    entries: BTreeMap<String, Statistics>,
}

impl Baseline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entry_name(algorithm: Algorithm, map: &Path) -> String {
        format!("{algorithm} {}", map.display())
    }

    pub fn total_name(algorithm: Algorithm) -> String {
        format!("{algorithm} {TOTAL}")
    }

    pub fn record(&mut self, name: impl Into<String>, time: Statistics) {
        self.entries.insert(name.into(), time);
    }

    pub fn record_report(&mut self, report: &MapReport) {
        self.record(Self::entry_name(report.algorithm, &report.map), report.time);
    }

    pub fn record_total(&mut self, algorithm: Algorithm, time: Statistics) {
        self.record(Self::total_name(algorithm), time);
    }

    pub fn get(&self, name: &str) -> Option<&Statistics> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Read a baseline written by [`save`](Self::save).
    pub fn load(path: &Path) -> Result<Self, BenchError> {
        let text = fs::read_to_string(path).map_err(|source| BenchError::BaselineIo {
            path: path.to_path_buf(),
            source,
        })?;
        let baseline: Self =
            serde_json::from_str(&text).map_err(|source| BenchError::BaselineFormat {
                path: path.to_path_buf(),
                source,
            })?;
        log::info!("loaded {} baseline entries from {}", baseline.len(), path.display());
        Ok(baseline)
    }

    /// Write the baseline as JSON, replacing any existing file.
    pub fn save(&self, path: &Path) -> Result<(), BenchError> {
        let text =
            serde_json::to_string_pretty(self).map_err(|source| BenchError::BaselineFormat {
                path: path.to_path_buf(),
                source,
            })?;
        fs::write(path, text).map_err(|source| BenchError::BaselineIo {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("saved {} baseline entries to {}", self.len(), path.display());
        Ok(())
    }

    /// Compare `measured` with `self`, for every entry present in both, in
    /// name order.
    pub fn compare(&self, measured: &Baseline) -> Vec<Comparison> {
        self.entries
            .iter()
            .filter_map(|(name, base)| {
                let now = measured.entries.get(name)?;
                Some(Comparison::new(name, base, now))
            })
            .collect()
    }
}

/// Change of one entry's mean time between two runs.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Comparison {
    pub name: String,
    pub base_ms: f64,
    pub measured_ms: f64,
    /// Change of the mean relative to the baseline, in percent. 0 when the
    /// baseline mean is 0.
    pub change_pct: f64,
    /// Difference of the means over its standard error. Infinite when both
    /// runs are noiseless but differ.
    pub z: f64,
    pub significant: bool,
}

impl Comparison {
    pub fn new(name: impl Into<String>, base: &Statistics, measured: &Statistics) -> Self {
        let diff = measured.mean_ms - base.mean_ms;
        let err = base.sample_mean_stdev_ms.hypot(measured.sample_mean_stdev_ms);
        let z = if err > 0.0 {
            diff / err
        } else if diff == 0.0 {
            0.0
        } else {
            f64::INFINITY.copysign(diff)
        };
        let change_pct = if base.mean_ms > 0.0 {
            diff / base.mean_ms * 100.0
        } else {
            0.0
        };
        Self {
            name: name.into(),
            base_ms: base.mean_ms,
            measured_ms: measured.mean_ms,
            change_pct,
            z,
            significant: z.abs() > SIGNIFICANT_Z,
        }
    }

    /// Faster than the baseline, significantly.
    pub fn improved(&self) -> bool {
        self.significant && self.z < 0.0
    }

    /// Slower than the baseline, significantly.
    pub fn regressed(&self) -> bool {
        self.significant && self.z > 0.0
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// `<name>: <base_ms> -> <measured_ms> <change>% z=<z>`, with a trailing
/// `*` when significant.
impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {:.3} -> {:.3} {:+.2}% z={:.1}",
            self.name, self.base_ms, self.measured_ms, self.change_pct, self.z
        )?;
        if self.significant {
            f.write_str(" *")?;
        }
        Ok(())
    }
}

/// Save `measured` and compare it with the saved baseline, as `config`
/// asks. Saving happens first, so both may name the same file. With fewer
/// than two samples nothing is saved or compared.
pub fn settle_baseline(
    config: &BenchConfig,
    measured: &Baseline,
) -> Result<Vec<Comparison>, BenchError> {
    if config.baseline.is_none() && config.save_baseline.is_none() {
        return Ok(Vec::new());
    }
    if config.samples < 2 {
        log::warn!(
            "baselines need at least 2 samples, got {}; not saving or comparing",
            config.samples
        );
        return Ok(Vec::new());
    }
    if let Some(path) = &config.save_baseline {
        measured.save(path)?;
    }
    match &config.baseline {
        Some(path) => Ok(Baseline::load(path)?.compare(measured)),
        None => Ok(Vec::new()),
    }
}
