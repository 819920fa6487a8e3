//! Octile map files.
//!
//! ```text
//! type octile
//! height 3
//! width 4
//! map
//! ..@.
//! .T..
//! ....
//! ```
//!
//! The header is exactly the four lines shown, in that order. It is followed
//! by `height` rows of `width` terrain characters each. Maps larger than
//! [`MAX_CELLS`] are rejected.

use std::fs;
use std::path::Path;

use gridbench_core::{OccupancyGrid, Terrain};

use crate::error::LoadError;

/// Largest accepted map, in cells.
pub const MAX_CELLS: usize = 1 << 28;

/// Load and parse the map file at `path`.
pub fn load_map(path: &Path) -> Result<OccupancyGrid, LoadError> {
    let bytes = fs::read(path).map_err(|e| LoadError::io(path, e))?;
    let text = decode(path, 1, bytes)?;
    let grid = parse_map(path, &text)?;
    log::debug!(
        "loaded map {} ({}x{}, {} passable cells)",
        path.display(),
        grid.width(),
        grid.height(),
        grid.passable_count()
    );
    Ok(grid)
}

/// Parse map text. `path` is only used to label errors.
pub fn parse_map(path: &Path, text: &str) -> Result<OccupancyGrid, LoadError> {
    let mut lines = Lines::new(path, text);

    let (n, l) = lines.next_required("type line")?;
    if fields(l) != ["type", "octile"] {
        return Err(LoadError::format(path, n, "expected \"type octile\""));
    }
    let height = lines.dimension("height")?;
    let width = lines.dimension("width")?;
    // every cell takes at least one byte of text
    let area = width as usize * height as usize;
    if area > MAX_CELLS || area > text.len() {
        return Err(LoadError::format(
            path,
            lines.line,
            format!("{width}x{height} map is larger than its file or the {MAX_CELLS} cell limit"),
        ));
    }
    let (n, l) = lines.next_required("map line")?;
    if fields(l) != ["map"] {
        return Err(LoadError::format(path, n, "expected \"map\""));
    }

    let mut cells = Vec::with_capacity(area);
    for y in 0..height {
        let Some((n, row)) = lines.next() else {
            return Err(LoadError::format(
                path,
                lines.line + 1,
                format!("expected {height} rows, found {y}"),
            ));
        };
        let before = cells.len();
        for (x, ch) in row.chars().enumerate() {
            let Some(t) = Terrain::from_char(ch) else {
                return Err(LoadError::format(
                    path,
                    n,
                    format!("unrecognized character {ch:?} at row {y}, column {x}"),
                ));
            };
            cells.push(t);
        }
        let found = cells.len() - before;
        if found != width as usize {
            return Err(LoadError::format(
                path,
                n,
                format!("row {y} has {found} cells, expected {width}"),
            ));
        }
    }

    for (n, l) in lines.by_ref() {
        if !l.trim().is_empty() {
            return Err(LoadError::format(path, n, "unexpected data after the last row"));
        }
    }

    OccupancyGrid::from_cells(width, height, cells)
        .map_err(|e| LoadError::format(path, 1, e.to_string()))
}

/// Serialize a grid back into map file text.
pub fn to_map_string(grid: &OccupancyGrid) -> String {
    format!(
        "type octile\nheight {}\nwidth {}\nmap\n{grid}",
        grid.height(),
        grid.width()
    )
}

/// Write `grid` as a map file at `path`.
pub fn save_map(path: &Path, grid: &OccupancyGrid) -> Result<(), LoadError> {
    fs::write(path, to_map_string(grid)).map_err(|e| LoadError::io(path, e))
}

/// Decode file bytes, reporting invalid UTF-8 as a format error on the line
/// it occurs in. `first_line` is the line number of the first byte.
pub(crate) fn decode(path: &Path, first_line: usize, bytes: Vec<u8>) -> Result<String, LoadError> {
    String::from_utf8(bytes).map_err(|e| {
        let valid = &e.as_bytes()[..e.utf8_error().valid_up_to()];
        let line = first_line + valid.iter().filter(|&&b| b == b'\n').count();
        LoadError::format(path, line, "invalid UTF-8")
    })
}

pub(crate) fn fields(line: &str) -> Vec<&str> {
    line.split_whitespace().collect()
}

/// Numbered lines with `\r` line endings stripped.
struct Lines<'a> {
    path: &'a Path,
    inner: std::str::Split<'a, char>,
    line: usize,
}

impl<'a> Lines<'a> {
    fn new(path: &'a Path, text: &'a str) -> Self {
        Self {
            path,
            inner: text.split('\n'),
            line: 0,
        }
    }

    fn next_required(&mut self, what: &str) -> Result<(usize, &'a str), LoadError> {
        self.next()
            .ok_or_else(|| LoadError::format(self.path, self.line + 1, format!("missing {what}")))
    }

    fn dimension(&mut self, key: &str) -> Result<i32, LoadError> {
        let (n, l) = self.next_required(key)?;
        let bad = || {
            let reason = format!("expected \"{key} <positive integer>\"");
            LoadError::format(self.path, n, reason)
        };
        match fields(l).as_slice() {
            [k, v] if *k == key => match v.parse::<i32>() {
                Ok(d) if d > 0 => Ok(d),
                _ => Err(bad()),
            },
            _ => Err(bad()),
        }
    }
}

impl<'a> Iterator for Lines<'a> {
    type Item = (usize, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        let l = self.inner.next()?;
        self.line += 1;
        Some((self.line, l.strip_suffix('\r').unwrap_or(l)))
    }
}
