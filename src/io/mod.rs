//! Text persistence for wire lists and grids, and VTK export.

pub mod grid;
pub mod vtk;
pub mod wires;

pub use grid::{read_grid, write_grid};
pub use vtk::{write_grid_vtk, write_vtk_header};
pub use wires::{read_wires, write_wires};

use crate::errors::ResourceError;

/// Splits a data line into numbers, returning `None` for blank and comment lines.
fn parse_record(line: &str, line_no: usize) -> Result<Option<Vec<f64>>, ResourceError> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }
    trimmed
        .split_whitespace()
        .map(|tok| {
            tok.parse::<f64>().map_err(|_| ResourceError::Format {
                line: line_no,
                reason: format!("`{tok}` is not a number"),
            })
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}
