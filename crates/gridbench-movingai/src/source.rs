use std::fmt;
use std::path::Path;
use std::str::FromStr;

use gridbench_core::OccupancyGrid;
use gridbench_paths::Corners;

use crate::error::LoadError;
use crate::sample::{SampleIter, SampleSpec, Sampler};
use crate::scen::{Scenario, ScenarioFile, ScenarioIter, scen_path};

/// Where the queries for a map come from.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum ScenarioPolicy {
    /// The map's scenario file; a missing file is an error.
    File,
    /// The scenario file if it can be opened, random sampling otherwise.
    #[default]
    FileOrSample,
    /// Random sampling only.
    Sample,
}

impl ScenarioPolicy {
    pub const fn name(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::FileOrSample => "file-or-sample",
            Self::Sample => "sample",
        }
    }
}

impl fmt::Display for ScenarioPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown scenario policy name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown scenario policy \"{0}\" (expected file, file-or-sample or sample)")]
pub struct ParsePolicyError(pub String);

impl FromStr for ScenarioPolicy {
    type Err = ParsePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "file" => Ok(Self::File),
            "file-or-sample" => Ok(Self::FileOrSample),
            "sample" => Ok(Self::Sample),
            other => Err(ParsePolicyError(other.to_string())),
        }
    }
}

/// The query sequence for one map, resolved from a [`ScenarioPolicy`].
#[derive(Debug)]
pub enum ScenarioSource {
    File(ScenarioFile),
    Sampled(Sampler),
}

impl ScenarioSource {
    /// Resolve the queries for the map at `map_path`.
    ///
    /// Under [`ScenarioPolicy::FileOrSample`] only an unreadable scenario
    /// file falls back to sampling; a malformed one is still an error.
    pub fn open(
        map_path: &Path,
        grid: &OccupancyGrid,
        corners: Corners,
        policy: ScenarioPolicy,
        spec: SampleSpec,
    ) -> Result<Self, LoadError> {
        let path = scen_path(map_path);
        match policy {
            ScenarioPolicy::File => Ok(Self::File(ScenarioFile::open(&path, grid)?)),
            ScenarioPolicy::Sample => Ok(Self::Sampled(Sampler::new(grid, corners, spec))),
            ScenarioPolicy::FileOrSample => match ScenarioFile::open(&path, grid) {
                Ok(file) => Ok(Self::File(file)),
                Err(e) if e.is_io() => {
                    log::info!("{e}; sampling {} queries instead", spec.count);
                    Ok(Self::Sampled(Sampler::new(grid, corners, spec)))
                }
                Err(e) => Err(e),
            },
        }
    }

    /// Whether queries come from a scenario file.
    pub fn is_file(&self) -> bool {
        matches!(self, Self::File(_))
    }

    /// Start a fresh pass over the queries, in source order.
    pub fn scenarios(&self) -> Result<Scenarios<'_>, LoadError> {
        Ok(match self {
            Self::File(f) => Scenarios::File(f.iter()?),
            Self::Sampled(s) => Scenarios::Sampled(s.iter()),
        })
    }
}

/// One pass over a [`ScenarioSource`].
pub enum Scenarios<'a> {
    File(ScenarioIter<'a>),
    Sampled(SampleIter<'a>),
}

impl Iterator for Scenarios<'_> {
    type Item = Result<Scenario, LoadError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Self::File(it) => it.next(),
            Self::Sampled(it) => it.next().map(Ok),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridbench_core::Terrain;
    use std::fs;

    fn spec() -> SampleSpec {
        SampleSpec {
            count: 5,
            seed: 11,
            reachable_only: false,
        }
    }

    #[test]
    fn policy_names() {
        for p in [
            ScenarioPolicy::File,
            ScenarioPolicy::FileOrSample,
            ScenarioPolicy::Sample,
        ] {
            assert_eq!(p.to_string().parse::<ScenarioPolicy>(), Ok(p));
        }
        assert!("random".parse::<ScenarioPolicy>().is_err());
    }

    #[test]
    fn file_policy_requires_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let map = dir.path().join("a.map");
        let g = OccupancyGrid::filled(3, 3, Terrain::Ground);
        let err = ScenarioSource::open(&map, &g, Corners::Forbid, ScenarioPolicy::File, spec())
            .unwrap_err();
        assert!(err.is_io());
    }

    #[test]
    fn falls_back_to_sampling_when_file_is_missing() {
        let dir = tempfile::tempdir().unwrap();
        let map = dir.path().join("a.map");
        let g = OccupancyGrid::filled(3, 3, Terrain::Ground);
        let src = ScenarioSource::open(
            &map,
            &g,
            Corners::Forbid,
            ScenarioPolicy::FileOrSample,
            spec(),
        )
        .unwrap();
        assert!(!src.is_file());
        assert_eq!(src.scenarios().unwrap().count(), 5);
    }

    #[test]
    fn prefers_the_file_when_present() {
        let dir = tempfile::tempdir().unwrap();
        let map = dir.path().join("a.map");
        fs::write(dir.path().join("a.map.scen"), "version 1\n0 a.map 3 3 0 0 2 2 2.83\n").unwrap();
        let g = OccupancyGrid::filled(3, 3, Terrain::Ground);
        let src = ScenarioSource::open(
            &map,
            &g,
            Corners::Forbid,
            ScenarioPolicy::FileOrSample,
            spec(),
        )
        .unwrap();
        assert!(src.is_file());
        let all: Vec<_> = src.scenarios().unwrap().collect::<Result<_, _>>().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].expected, Some(2.83));
    }

    #[test]
    fn malformed_file_does_not_fall_back() {
        let dir = tempfile::tempdir().unwrap();
        let map = dir.path().join("a.map");
        let g = OccupancyGrid::filled(3, 3, Terrain::Ground);
        for header in [&b"vers 1\n"[..], &b"vers\xff 1\n"[..]] {
            fs::write(dir.path().join("a.map.scen"), header).unwrap();
            let err = ScenarioSource::open(
                &map,
                &g,
                Corners::Forbid,
                ScenarioPolicy::FileOrSample,
                spec(),
            )
            .unwrap_err();
            assert!(!err.is_io(), "{err}");
        }
    }
}
