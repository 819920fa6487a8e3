//! Scenario files.
//!
//! A scenario file sits next to its map as `<name>.map.scen`. The first line
//! is `version 1` (or `version 1.0`); every other non-blank line is one query
//! of nine whitespace-separated fields:
//!
//! ```text
//! bucket  map  map_width  map_height  start_x  start_y  goal_x  goal_y  optimal_length
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader, Split};
use std::path::{Path, PathBuf};

use gridbench_core::{OccupancyGrid, Point};

use crate::error::LoadError;
use crate::map::{decode, fields};

/// A single start/goal query.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Scenario {
    /// Difficulty bucket from the scenario file; 0 for sampled queries.
    pub bucket: u32,
    pub start: Point,
    pub goal: Point,
    /// Known optimal cost, if the source provides one.
    pub expected: Option<f64>,
}

/// The scenario file that belongs to the map at `map`.
pub fn scen_path(map: &Path) -> PathBuf {
    let mut name = map.as_os_str().to_owned();
    name.push(".scen");
    PathBuf::from(name)
}

/// A validated scenario file.
///
/// Records are not read up front: each call to [`iter`](Self::iter) reopens
/// the file and yields records lazily in file order.
#[derive(Clone, Debug)]
pub struct ScenarioFile {
    path: PathBuf,
    width: i32,
    height: i32,
}

impl ScenarioFile {
    /// Open the scenario file at `path` for a map of `grid`'s size and check
    /// its version header.
    pub fn open(path: &Path, grid: &OccupancyGrid) -> Result<Self, LoadError> {
        let file = Self {
            path: path.to_path_buf(),
            width: grid.width(),
            height: grid.height(),
        };
        file.iter()?;
        Ok(file)
    }

    /// Path of the file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Start a fresh pass over the records.
    pub fn iter(&self) -> Result<ScenarioIter<'_>, LoadError> {
        let reader = File::open(&self.path).map_err(|e| LoadError::io(&self.path, e))?;
        let mut lines = BufReader::new(reader).split(b'\n');
        let header = match lines.next() {
            Some(l) => l.map_err(|e| LoadError::io(&self.path, e))?,
            None => return Err(LoadError::format(&self.path, 1, "missing version line")),
        };
        let header = decode(&self.path, 1, header)?;
        match fields(header.trim_end_matches('\r')).as_slice() {
            ["version", "1" | "1.0"] => {}
            _ => return Err(LoadError::format(&self.path, 1, "expected \"version 1\"")),
        }
        Ok(ScenarioIter {
            file: self,
            lines,
            line: 1,
            failed: false,
        })
    }

    fn parse_record(&self, line: usize, text: &str) -> Result<Scenario, LoadError> {
        let bad = |reason: String| LoadError::format(&self.path, line, reason);
        let f = fields(text);
        let [bucket, _map, w, h, sx, sy, gx, gy, opt] = f.as_slice() else {
            return Err(bad(format!("expected 9 fields, found {}", f.len())));
        };
        let int = |name: &str, v: &str| {
            v.parse::<i32>()
                .map_err(|_| bad(format!("{name} is not an integer: {v:?}")))
        };
        let (w, h) = (int("map width", *w)?, int("map height", *h)?);
        if w != self.width || h != self.height {
            return Err(bad(format!(
                "scenario is for a {w}x{h} map, map is {}x{}",
                self.width, self.height
            )));
        }
        let bucket = bucket
            .parse::<u32>()
            .map_err(|_| bad(format!("bucket is not an integer: {bucket:?}")))?;
        let start = Point::new(int("start x", *sx)?, int("start y", *sy)?);
        let goal = Point::new(int("goal x", *gx)?, int("goal y", *gy)?);
        let expected = opt
            .parse::<f64>()
            .map_err(|_| bad(format!("optimal length is not a number: {opt:?}")))?;
        Ok(Scenario {
            bucket,
            start,
            goal,
            expected: Some(expected),
        })
    }
}

/// Lazy pass over a [`ScenarioFile`]. Stops after the first error.
pub struct ScenarioIter<'a> {
    file: &'a ScenarioFile,
    lines: Split<BufReader<File>>,
    line: usize,
    failed: bool,
}

impl Iterator for ScenarioIter<'_> {
    type Item = Result<Scenario, LoadError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        loop {
            let bytes = match self.lines.next()? {
                Ok(b) => b,
                Err(e) => {
                    self.failed = true;
                    return Some(Err(LoadError::io(&self.file.path, e)));
                }
            };
            self.line += 1;
            let text = match decode(&self.file.path, self.line, bytes) {
                Ok(t) => t,
                Err(e) => {
                    self.failed = true;
                    return Some(Err(e));
                }
            };
            let text = text.trim_end_matches('\r');
            if text.trim().is_empty() {
                continue;
            }
            let record = self.file.parse_record(self.line, text);
            self.failed = record.is_err();
            return Some(record);
        }
    }
}


#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn scenario_round_trip() {
        let sc = Scenario {
            bucket: 4,
            start: Point::new(1, 2),
            goal: Point::new(30, 7),
            expected: Some(31.41421356),
        };
        let json = serde_json::to_string(&sc).unwrap();
        assert_eq!(serde_json::from_str::<Scenario>(&json).unwrap(), sc);

        let sampled = r#"{"bucket":0,"start":{"x":0,"y":0},"goal":{"x":1,"y":1},"expected":null}"#;
        let sc: Scenario = serde_json::from_str(sampled).unwrap();
        assert_eq!(sc.expected, None);
        assert_eq!(sc.goal, Point::new(1, 1));
    }
}
