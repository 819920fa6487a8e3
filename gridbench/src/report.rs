use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use gridbench_paths::Algorithm;
use serde::{Deserialize, Serialize};

/// Timing of repeated passes over one map.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub samples: usize,
    pub mean_ms: f64,
    pub min_ms: f64,
    pub stdev_ms: f64,
    /// Standard error of `mean_ms`.
    pub sample_mean_stdev_ms: f64,
}

impl Statistics {
    /// Summarize pass times. An empty slice gives all zeros.
    pub fn from_times(times: &[Duration]) -> Self {
        if times.is_empty() {
            return Self::default();
        }
        let ms: Vec<f64> = times.iter().map(|t| t.as_secs_f64() * 1e3).collect();
        let n = ms.len() as f64;
        let mean = ms.iter().sum::<f64>() / n;
        let min = ms.iter().copied().fold(f64::INFINITY, f64::min);
        let variance = ms.iter().map(|t| (t - mean) * (t - mean)).sum::<f64>() / n;
        let stdev = variance.sqrt();
        Self {
            samples: ms.len(),
            mean_ms: mean,
            min_ms: min,
            stdev_ms: stdev,
            sample_mean_stdev_ms: stdev / n.sqrt(),
        }
    }
}

/// Result of benchmarking one algorithm on one map.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MapReport {
    pub map: PathBuf,
    #[serde(serialize_with = "algorithm_name")]
    pub algorithm: Algorithm,
    /// Sum of path costs over solved scenarios.
    pub total_cost: f64,
    pub solved: usize,
    pub unreachable: usize,
    /// Scenarios with an invalid endpoint or that ran out of time.
    pub skipped: usize,
    /// Nodes expanded over solved and unreachable scenarios.
    pub expanded: u64,
    /// Solved costs that disagree with the scenario file, when verifying.
    pub mismatches: usize,
    pub time: Statistics,
    /// Wall time of each pass, in order.
    #[serde(skip)]
    pub passes: Vec<Duration>,
}

fn algorithm_name<S: serde::Serializer>(a: &Algorithm, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(a.name())
}

impl MapReport {
    /// The report as a single-line JSON object.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// `<algorithm> <total_cost> <solved> <unreachable> <skipped> <expanded> <time_ms>`
impl fmt::Display for MapReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:.4} {} {} {} {} {:.3}",
            self.algorithm,
            self.total_cost,
            self.solved,
            self.unreachable,
            self.skipped,
            self.expanded,
            self.time.mean_ms
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> MapReport {
        MapReport {
            map: PathBuf::from("maps/dao/arena.map"),
            algorithm: Algorithm::Jps,
            total_cost: 12.345678,
            solved: 3,
            unreachable: 1,
            skipped: 2,
            expanded: 99,
            mismatches: 0,
            time: Statistics::from_times(&[Duration::from_millis(4)]),
            passes: vec![Duration::from_millis(4)],
        }
    }

    #[test]
    fn text_line_columns() {
        let line = report().to_string();
        let cols: Vec<&str> = line.split_whitespace().collect();
        assert_eq!(cols, vec!["jps", "12.3457", "3", "1", "2", "99", "4.000"]);
    }

    #[test]
    fn json_line() {
        let v: serde_json::Value = serde_json::from_str(&report().to_json()).unwrap();
        assert_eq!(v["algorithm"], "jps");
        assert_eq!(v["map"], "maps/dao/arena.map");
        assert_eq!(v["solved"], 3);
        assert_eq!(v["time"]["samples"], 1);
        assert!(v.get("passes").is_none());
        assert!(!report().to_json().contains('\n'));
    }

    #[test]
    fn statistics() {
        let s = Statistics::from_times(&[
            Duration::from_millis(2),
            Duration::from_millis(4),
            Duration::from_millis(6),
        ]);
        assert_eq!(s.samples, 3);
        assert!((s.mean_ms - 4.0).abs() < 1e-9);
        assert!((s.min_ms - 2.0).abs() < 1e-9);
        assert!((s.stdev_ms - (8.0f64 / 3.0).sqrt()).abs() < 1e-9);
        assert!((s.sample_mean_stdev_ms - (8.0f64 / 9.0).sqrt()).abs() < 1e-9);
        let one = Statistics::from_times(&[Duration::from_millis(3)]);
        assert_eq!((one.stdev_ms, one.sample_mean_stdev_ms), (0.0, 0.0));
        assert_eq!(Statistics::from_times(&[]), Statistics::default());
    }
}
