//! Interpreter state for the command language.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::command::{CoilArgs, Command, ParseError};
use crate::errors::FieldError;
use crate::grid::Grid;
use crate::inductance::mutual_inductance;
use crate::math::{is_finite, Scalar, R3};
use crate::shapes::{self, Winding};
use crate::wires::WireList;

/// Errors raised while running a command.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The line could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// The command was rejected or failed.
    #[error(transparent)]
    Field(#[from] FieldError),
}

impl SessionError {
    /// True when the session cannot usefully continue.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        match self {
            Self::Parse(_) => false,
            Self::Field(err) => err.is_fatal(),
        }
    }
}

/// What the caller should do after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Keep reading commands.
    Continue,
    /// The script asked to terminate.
    End,
}

/// Pen position, current value, active wire list and output file of one
/// interpreter run.
#[derive(Debug, Clone)]
pub struct Session {
    pen: R3,
    current: Scalar,
    wires: WireList,
    output: Option<PathBuf>,
    verbose: bool,
    inductance: Option<Scalar>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Empty session with the pen at the origin and a current of 1 A.
    #[must_use]
    pub fn new() -> Self {
        Self {
            pen: R3::zeros(),
            current: 1.0,
            wires: WireList::new(),
            output: None,
            verbose: false,
            inductance: None,
        }
    }

    /// Active wire list.
    #[must_use]
    pub const fn wires(&self) -> &WireList {
        &self.wires
    }

    /// Pen position.
    #[must_use]
    pub const fn pen(&self) -> R3 {
        self.pen
    }

    /// Current used for new wires (A).
    #[must_use]
    pub const fn current(&self) -> Scalar {
        self.current
    }

    /// Open wire output file, if any.
    #[must_use]
    pub fn output(&self) -> Option<&Path> {
        self.output.as_deref()
    }

    /// Whether `verbose` is in effect.
    #[must_use]
    pub const fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Most recent `inductance` result (H).
    #[must_use]
    pub const fn last_inductance(&self) -> Option<Scalar> {
        self.inductance
    }

    /// Parses and runs one line. Blank and comment lines do nothing.
    pub fn run_line(&mut self, line: &str) -> Result<Flow, SessionError> {
        match Command::parse(line)? {
            Some(command) => self.execute(command),
            None => Ok(Flow::Continue),
        }
    }

    /// Runs one command.
    ///
    /// A rejected command leaves the session unchanged.
    pub fn execute(&mut self, command: Command) -> Result<Flow, SessionError> {
        debug!(command = command.name(), "executing");
        match command {
            Command::Current(current) => {
                if !current.is_finite() {
                    return Err(FieldError::parameter(format!(
                        "current must be finite, got {current}"
                    ))
                    .into());
                }
                self.current = current;
            }
            Command::File(path) => {
                self.close_output()?;
                info!(path = %path.display(), "wire output opened");
                self.output = Some(path);
            }
            Command::NoFile => {
                if self.output.is_none() {
                    warn!("nofile without an open wire file");
                }
                self.close_output()?;
            }
            Command::MoveTo(point) => {
                if !is_finite(&point) {
                    return Err(FieldError::parameter("pen position must be finite").into());
                }
                self.pen = point;
            }
            Command::LineTo(point) => {
                self.wires.append(self.pen, point, self.current)?;
                self.pen = point;
            }
            Command::Circle {
                origin,
                radius,
                segments,
                orientation,
            } => {
                let winding = Winding::new(segments, orientation, self.current);
                shapes::circle(&mut self.wires, origin, radius, &winding)?;
            }
            Command::Arc {
                origin,
                radius,
                t1,
                t2,
                segments,
                orientation,
            } => {
                let winding = Winding::new(segments, orientation, self.current);
                shapes::arc(&mut self.wires, origin, radius, t1, t2, &winding)?;
            }
            Command::Solenoid(coil) => self.coil(&coil, shapes::helix)?,
            Command::Helmholtz(coil) => self.coil(&coil, shapes::helmholtz)?,
            Command::Maxwell(coil) => self.coil(&coil, shapes::maxwell)?,
            Command::Golay {
                origin,
                geometry,
                segments,
                orientation,
            } => {
                let winding = Winding::new(segments, orientation, self.current);
                shapes::golay(&mut self.wires, origin, &geometry, &winding)?;
            }
            Command::SquareSpiral {
                origin,
                width,
                pitch,
                turns,
            } => {
                shapes::square_spiral(&mut self.wires, origin, width, pitch, turns, self.current)?;
            }
            Command::Traj {
                points,
                start,
                end,
                output,
            } => {
                let grid = Grid::segment(points, start, end, &self.wires)?;
                write_grid(&grid, &output)?;
            }
            Command::Grid {
                rows,
                cols,
                origin,
                u,
                v,
                axis,
                output,
            } => {
                let grid = Grid::surface(rows, cols, origin, u, v, axis, &self.wires)?;
                write_grid(&grid, &output)?;
            }
            Command::Wires(path) => {
                let loaded = WireList::load(&path)?;
                self.wires.extend_from(&loaded)?;
                info!(
                    path = %path.display(),
                    loaded = loaded.len(),
                    total = self.wires.len(),
                    "wires loaded"
                );
            }
            Command::Inductance(path) => {
                let other = WireList::load(&path)?;
                let m = mutual_inductance(&self.wires, &other)?;
                info!(path = %path.display(), henries = m, "mutual inductance");
                self.inductance = Some(m);
            }
            Command::Clear => {
                debug!(discarded = self.wires.len(), "wires cleared");
                self.wires = WireList::new();
            }
            Command::Verbose => self.verbose = true,
            Command::Quiet => self.verbose = false,
            Command::End => {
                self.close_output()?;
                return Ok(Flow::End);
            }
        }
        Ok(Flow::Continue)
    }

    /// Saves the active wires to the open output file and closes it.
    pub fn close_output(&mut self) -> Result<(), FieldError> {
        if let Some(path) = &self.output {
            self.wires.save(path)?;
            info!(path = %path.display(), segments = self.wires.len(), "wires saved");
        }
        self.output = None;
        Ok(())
    }

    fn coil(
        &mut self,
        coil: &CoilArgs,
        build: fn(&mut WireList, R3, Scalar, Scalar, Scalar, &Winding) -> Result<(), FieldError>,
    ) -> Result<(), FieldError> {
        let winding = Winding::new(coil.segments, coil.orientation, self.current);
        build(
            &mut self.wires,
            coil.origin,
            coil.radius,
            coil.pitch,
            coil.turns,
            &winding,
        )
    }
}

/// Writes `grid` as VTK when `path` ends in `.vtk`, as a plain grid file
/// otherwise.
fn write_grid(grid: &Grid, path: &Path) -> Result<(), FieldError> {
    let vtk = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("vtk"));
    if vtk {
        grid.write_vtk(path, "wirefield magnetic flux density")?;
    } else {
        grid.write(path)?;
    }
    info!(
        path = %path.display(),
        rows = grid.rows(),
        cols = grid.cols(),
        peak_tesla = grid.max_magnitude(),
        "grid written"
    );
    Ok(())
}
