//! VTK legacy ASCII export of field grids.
//!
//! Grids are written as `STRUCTURED_GRID` datasets with the field attached as
//! point data, which ParaView and VisIt load directly.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::errors::FieldError;
use crate::grid::Grid;

/// Writes the VTK legacy file header.
pub fn write_vtk_header<W: Write>(mut writer: W, title: &str) -> io::Result<()> {
    writeln!(writer, "# vtk DataFile Version 3.0")?;
    // The title line is limited to 256 characters and must not contain newlines.
    let title: String = title.lines().next().unwrap_or("").chars().take(255).collect();
    writeln!(writer, "{title}")?;
    writeln!(writer, "ASCII")?;
    Ok(())
}

/// Writes `grid` as a structured grid with a `B` vector array in tesla.
///
/// VTK orders points with the first dimension fastest, so the grid's columns
/// map to the VTK `i` index and its rows to `j`.
pub fn write_grid_vtk<W: Write>(grid: &Grid, title: &str, mut writer: W) -> io::Result<()> {
    write_vtk_header(&mut writer, title)?;
    writeln!(writer, "DATASET STRUCTURED_GRID")?;
    writeln!(writer, "DIMENSIONS {} {} 1", grid.cols(), grid.rows())?;
    writeln!(writer, "POINTS {} double", grid.len())?;
    for p in grid.points() {
        writeln!(writer, "{:e} {:e} {:e}", p.x, p.y, p.z)?;
    }
    writeln!(writer, "POINT_DATA {}", grid.len())?;
    writeln!(writer, "VECTORS B double")?;
    for f in grid.fields() {
        writeln!(writer, "{:e} {:e} {:e}", f.x, f.y, f.z)?;
    }
    writer.flush()
}

impl Grid {
    /// Exports the grid to a `.vtk` file at `path`.
    pub fn write_vtk(&self, path: impl AsRef<Path>, title: &str) -> Result<(), FieldError> {
        write_grid_vtk(self, title, BufWriter::new(File::create(path)?))?;
        Ok(())
    }
}
