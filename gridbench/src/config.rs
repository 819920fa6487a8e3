//! Benchmark settings.
//!
//! Settings come from an optional TOML file and are then overridden by
//! command-line flags. Every field has a default, so an empty file (or no
//! file at all) is valid:
//!
//! ```toml
//! corners = "forbid"        # or "allow"
//! threads = 0               # 0 = one worker per core
//! time_budget_ms = 5000     # per search; omit for no limit
//! samples = 1
//! scenarios = "file-or-sample"
//! sample_count = 1000
//! seed = 0
//! reachable_only = false
//! verify = false
//! tolerance = 0.001
//! format = "text"           # or "json"
//! baseline = "base.json"    # compare timings with a saved run
//! save_baseline = "base.json"
//! ```

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use gridbench_movingai::{SampleSpec, ScenarioPolicy};
use gridbench_paths::Corners;
use serde::Deserialize;

use crate::error::BenchError;

/// Config file read from the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "gridbench.toml";

/// How reports are written to stdout.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One whitespace-separated line per report.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

/// Error returned when parsing an unknown output format.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown output format \"{0}\" (expected text or json)")]
pub struct ParseFormatError(pub String);

impl FromStr for OutputFormat {
    type Err = ParseFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(ParseFormatError(other.to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Text => "text",
            Self::Json => "json",
        })
    }
}

/// All benchmark settings.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BenchConfig {
    pub corners: Corners,
    /// Worker threads per map; 0 lets rayon pick.
    pub threads: usize,
    pub time_budget_ms: Option<u64>,
    /// Timed passes over each map's scenarios.
    pub samples: usize,
    pub scenarios: ScenarioPolicy,
    pub sample_count: usize,
    pub seed: u64,
    pub reachable_only: bool,
    /// Compare solved costs with the scenario file's optimal lengths.
    pub verify: bool,
    pub tolerance: f64,
    pub format: OutputFormat,
    /// Saved timings to compare this run with. Needs `samples >= 2`.
    pub baseline: Option<PathBuf>,
    /// Where to save this run's timings. Needs `samples >= 2`.
    pub save_baseline: Option<PathBuf>,
}

impl Default for BenchConfig {
    fn default() -> Self {
        let spec = SampleSpec::default();
        Self {
            corners: Corners::default(),
            threads: 0,
            time_budget_ms: None,
            samples: 1,
            scenarios: ScenarioPolicy::default(),
            sample_count: spec.count,
            seed: spec.seed,
            reachable_only: spec.reachable_only,
            verify: false,
            tolerance: 1e-3,
            format: OutputFormat::default(),
            baseline: None,
            save_baseline: None,
        }
    }
}

impl BenchConfig {
    /// Parse and validate TOML text. `path` only labels errors.
    pub fn from_toml_str(path: &Path, text: &str) -> Result<Self, BenchError> {
        let config: Self = toml::from_str(text).map_err(|source| BenchError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load the config file at `path`.
    pub fn load(path: &Path) -> Result<Self, BenchError> {
        let text = fs::read_to_string(path).map_err(|source| BenchError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(path, &text)?;
        log::info!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Load `explicit` if given, else [`DEFAULT_CONFIG_FILE`] from the
    /// working directory if it exists, else the defaults.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, BenchError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
        if fallback.is_file() {
            return Self::load(&fallback);
        }
        Ok(Self::default())
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), BenchError> {
        if self.samples == 0 {
            return Err(BenchError::InvalidSetting("samples must be at least 1".into()));
        }
        if self.tolerance.is_nan() || self.tolerance < 0.0 {
            return Err(BenchError::InvalidSetting(format!(
                "tolerance must be a non-negative number, got {}",
                self.tolerance
            )));
        }
        Ok(())
    }

    /// Per-search time budget.
    pub fn time_budget(&self) -> Option<Duration> {
        self.time_budget_ms.map(Duration::from_millis)
    }

    /// Sampling parameters for maps without a scenario file.
    pub fn sample_spec(&self) -> SampleSpec {
        SampleSpec {
            count: self.sample_count,
            seed: self.seed,
            reachable_only: self.reachable_only,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<BenchConfig, BenchError> {
        BenchConfig::from_toml_str(Path::new("test.toml"), text)
    }

    #[test]
    fn empty_file_gives_defaults() {
        let c = parse("").unwrap();
        assert_eq!(c, BenchConfig::default());
        assert_eq!(c.corners, Corners::Forbid);
        assert_eq!(c.samples, 1);
        assert_eq!(c.tolerance, 1e-3);
        assert_eq!(c.time_budget(), None);
    }

    #[test]
    fn reads_every_field() {
        let c = parse(
            r#"
            corners = "allow"
            threads = 4
            time_budget_ms = 250
            samples = 3
            scenarios = "sample"
            sample_count = 64
            seed = 17
            reachable_only = true
            verify = true
            tolerance = 0.01
            format = "json"
            baseline = "old.json"
            save_baseline = "new.json"
            "#,
        )
        .unwrap();
        assert_eq!(c.corners, Corners::Allow);
        assert_eq!(c.threads, 4);
        assert_eq!(c.time_budget(), Some(Duration::from_millis(250)));
        assert_eq!(c.samples, 3);
        assert_eq!(c.scenarios, ScenarioPolicy::Sample);
        assert_eq!(
            c.sample_spec(),
            SampleSpec {
                count: 64,
                seed: 17,
                reachable_only: true
            }
        );
        assert!(c.verify);
        assert_eq!(c.tolerance, 0.01);
        assert_eq!(c.format, OutputFormat::Json);
        assert_eq!(c.baseline, Some(PathBuf::from("old.json")));
        assert_eq!(c.save_baseline, Some(PathBuf::from("new.json")));
    }

    #[test]
    fn rejects_unknown_keys_and_bad_values() {
        assert!(matches!(
            parse("corner = \"allow\""),
            Err(BenchError::ConfigParse { .. })
        ));
        assert!(matches!(
            parse("corners = \"sometimes\""),
            Err(BenchError::ConfigParse { .. })
        ));
        assert!(matches!(
            parse("samples = 0"),
            Err(BenchError::InvalidSetting(_))
        ));
        assert!(matches!(
            parse("tolerance = -1.0"),
            Err(BenchError::InvalidSetting(_))
        ));
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = BenchConfig::load(&dir.path().join("none.toml")).unwrap_err();
        assert!(matches!(err, BenchError::ConfigIo { .. }));
    }

    #[test]
    fn discover_prefers_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bench.toml");
        fs::write(&path, "seed = 5\n").unwrap();
        assert_eq!(BenchConfig::discover(Some(&path)).unwrap().seed, 5);
    }

    #[test]
    fn output_format_names() {
        assert_eq!("json".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert_eq!(OutputFormat::Text.to_string(), "text");
        assert!("yaml".parse::<OutputFormat>().is_err());
    }
}
