//! Plain-text grid files.
//!
//! The header `# wirefield grid <m> <n>` is followed by `m * n` lines of
//! `x y z fx fy fz` in the grid's row-major storage order.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use tracing::debug;

use super::parse_record;
use crate::errors::{FieldError, ResourceError};
use crate::grid::Grid;
use crate::math::vector;

const HEADER: &str = "# wirefield grid";

/// Writes `grid` to `writer`.
pub fn write_grid<W: Write>(grid: &Grid, mut writer: W) -> Result<(), FieldError> {
    writeln!(writer, "{HEADER} {} {}", grid.rows(), grid.cols())?;
    for (p, f) in grid.points().iter().zip(grid.fields()) {
        writeln!(
            writer,
            "{:e} {:e} {:e} {:e} {:e} {:e}",
            p.x, p.y, p.z, f.x, f.y, f.z
        )?;
    }
    writer.flush()?;
    Ok(())
}

/// Reads a grid written by [`write_grid`].
pub fn read_grid<R: BufRead>(reader: R) -> Result<Grid, FieldError> {
    let mut lines = reader.lines();
    let header = lines.next().transpose()?.unwrap_or_default();
    let (rows, cols) = parse_header(&header)?;

    let mut xyz = Vec::new();
    let mut f = Vec::new();
    for (idx, line) in lines.enumerate() {
        let line_no = idx + 2;
        let Some(v) = parse_record(&line?, line_no)? else {
            continue;
        };
        if v.len() != 6 {
            return Err(ResourceError::Format {
                line: line_no,
                reason: format!("expected 6 numbers, found {}", v.len()),
            }
            .into());
        }
        xyz.push(vector(v[0], v[1], v[2]));
        f.push(vector(v[3], v[4], v[5]));
    }

    Grid::from_parts(rows, cols, xyz, f).map_err(|err| {
        ResourceError::Format {
            line: 1,
            reason: err.to_string(),
        }
        .into()
    })
}

fn parse_header(header: &str) -> Result<(usize, usize), ResourceError> {
    let bad = || ResourceError::Format {
        line: 1,
        reason: format!("expected `{HEADER} <m> <n>`, found `{header}`"),
    };
    let dims = header.strip_prefix(HEADER).ok_or_else(bad)?;
    let mut it = dims.split_whitespace().map(str::parse::<usize>);
    match (it.next(), it.next(), it.next()) {
        (Some(Ok(m)), Some(Ok(n)), None) => Ok((m, n)),
        _ => Err(bad()),
    }
}

impl Grid {
    /// Writes the grid to `path`, replacing any existing file.
    pub fn write(&self, path: impl AsRef<Path>) -> Result<(), FieldError> {
        let path = path.as_ref();
        debug!(path = %path.display(), rows = self.rows(), cols = self.cols(), "writing grid");
        write_grid(self, BufWriter::new(File::create(path)?))
    }

    /// Reads a grid file from `path`.
    pub fn read(path: impl AsRef<Path>) -> Result<Self, FieldError> {
        read_grid(BufReader::new(File::open(path)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Axis;
    use crate::wires::WireList;

    #[test]
    fn grid_file_preserves_layout() {
        let mut wires = WireList::new();
        wires
            .append(vector(-1.0, 0.0, 0.0), vector(1.0, 0.0, 0.0), 4.0)
            .unwrap();
        let grid = Grid::surface(2, 3, vector(0.0, 0.0, 0.5), 1.0, 2.0, Axis::Z, &wires).unwrap();

        let mut buf = Vec::new();
        write_grid(&grid, &mut buf).unwrap();
        let text = String::from_utf8(buf.clone()).unwrap();
        assert!(text.starts_with("# wirefield grid 2 3\n"));
        assert_eq!(text.lines().count(), 7);

        let back = read_grid(buf.as_slice()).unwrap();
        assert_eq!(back, grid);
    }

    #[test]
    fn point_count_must_match_header() {
        let text = "# wirefield grid 2 2\n0 0 0 0 0 0\n";
        let err = read_grid(text.as_bytes()).unwrap_err();
        assert!(matches!(err, FieldError::Resource(ResourceError::Format { .. })));

        let err = read_grid("# something else\n".as_bytes()).unwrap_err();
        assert!(matches!(err, FieldError::Resource(ResourceError::Format { line: 1, .. })));
    }
}
