//! Typed command language for driving a [`Session`](crate::session::Session).
//!
//! One line holds one command: a keyword followed by whitespace-separated
//! arguments. Blank lines and lines starting with `#` carry no command.
//!
//! | command | arguments |
//! |---|---|
//! | `current` | `I` |
//! | `file` | `path` |
//! | `nofile` | |
//! | `moveto`, `lineto` | `x y z` |
//! | `circle` | `ox oy oz r n dir` |
//! | `arc` | `ox oy oz r t1 t2 n dir` |
//! | `solenoid`, `helmholtz`, `maxwell` | `ox oy oz r pitch turns n dir` |
//! | `golay` | `ox oy oz a b c theta r pitch turns n dir` |
//! | `squarespiral` | `ox oy oz width pitch turns` |
//! | `traj` | `n ax ay az bx by bz path` |
//! | `grid` | `m n ox oy oz u v dim path` |
//! | `wires`, `inductance` | `path` |
//! | `clear`, `verbose`, `quiet`, `end` | |
//!
//! Angles are in radians, `dir` is an [`Orientation`] such as `+z` or `-x`,
//! and `dim` is the grid plane normal `x`, `y` or `z`.

use std::path::PathBuf;
use std::str::{FromStr, SplitWhitespace};

use thiserror::Error;

use crate::math::{vector, Axis, Scalar, R3};
use crate::shapes::{GolayGeometry, Orientation};

/// Errors raised while parsing a command line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The line holds no command.
    #[error("empty command")]
    Empty,
    /// The keyword is not a known command.
    #[error("unknown command `{0}`")]
    UnknownCommand(String),
    /// An argument is missing.
    #[error("{command}: missing argument `{name}`")]
    MissingArgument {
        /// Command keyword.
        command: &'static str,
        /// Argument name.
        name: &'static str,
    },
    /// An argument is not a valid number.
    #[error("{command}: `{token}` is not a valid value for `{name}`")]
    InvalidNumber {
        /// Command keyword.
        command: &'static str,
        /// Argument name.
        name: &'static str,
        /// Offending token.
        token: String,
    },
    /// An axis or direction argument is not recognized.
    #[error("{command}: `{token}` is not a valid direction")]
    InvalidDirection {
        /// Command keyword.
        command: &'static str,
        /// Offending token.
        token: String,
    },
    /// More arguments were supplied than the command takes.
    #[error("{command}: unexpected trailing arguments `{extra}`")]
    TrailingArguments {
        /// Command keyword.
        command: &'static str,
        /// The surplus arguments.
        extra: String,
    },
}

/// Helical coil parameters shared by `solenoid`, `helmholtz` and `maxwell`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoilArgs {
    /// Coil center.
    pub origin: R3,
    /// Coil radius.
    pub radius: Scalar,
    /// Axial advance per turn.
    pub pitch: Scalar,
    /// Number of turns.
    pub turns: Scalar,
    /// Segments per turn.
    pub segments: u32,
    /// Coil axis and winding sense.
    pub orientation: Orientation,
}

/// One interpreter command with its parsed arguments.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Sets the current used by subsequent wires.
    Current(Scalar),
    /// Opens the wire output file.
    File(PathBuf),
    /// Saves the active wires to the output file and closes it.
    NoFile,
    /// Moves the pen without drawing.
    MoveTo(R3),
    /// Draws a straight segment from the pen to the point.
    LineTo(R3),
    /// Closed circular loop.
    Circle {
        /// Loop center.
        origin: R3,
        /// Loop radius.
        radius: Scalar,
        /// Number of segments.
        segments: u32,
        /// Loop axis and winding sense.
        orientation: Orientation,
    },
    /// Circular arc between two angles.
    Arc {
        /// Arc center.
        origin: R3,
        /// Arc radius.
        radius: Scalar,
        /// Start angle (rad).
        t1: Scalar,
        /// End angle (rad).
        t2: Scalar,
        /// Number of segments.
        segments: u32,
        /// Arc axis and winding sense.
        orientation: Orientation,
    },
    /// Helical solenoid.
    Solenoid(CoilArgs),
    /// Helmholtz pair.
    Helmholtz(CoilArgs),
    /// Maxwell coil.
    Maxwell(CoilArgs),
    /// Golay saddle gradient coil.
    Golay {
        /// Coil center.
        origin: R3,
        /// Saddle geometry.
        geometry: GolayGeometry,
        /// Segments per arc.
        segments: u32,
        /// Cylinder axis and winding sense.
        orientation: Orientation,
    },
    /// Planar square spiral.
    SquareSpiral {
        /// Spiral center.
        origin: R3,
        /// Outer side length.
        width: Scalar,
        /// Side reduction per turn.
        pitch: Scalar,
        /// Number of turns.
        turns: u32,
    },
    /// Samples the field along a line and writes the grid to a file.
    Traj {
        /// Number of points.
        points: usize,
        /// Line start.
        start: R3,
        /// Line end.
        end: R3,
        /// Output file.
        output: PathBuf,
    },
    /// Samples the field over a plane and writes the grid to a file.
    Grid {
        /// Points along the first in-plane axis.
        rows: usize,
        /// Points along the second in-plane axis.
        cols: usize,
        /// Plane center.
        origin: R3,
        /// Extent along the first in-plane axis.
        u: Scalar,
        /// Extent along the second in-plane axis.
        v: Scalar,
        /// Plane normal.
        axis: Axis,
        /// Output file.
        output: PathBuf,
    },
    /// Loads a wire file, appending its segments.
    Wires(PathBuf),
    /// Mutual inductance between the active wires and a wire file.
    Inductance(PathBuf),
    /// Replaces the active wires with an empty list.
    Clear,
    /// Enables verbose logging.
    Verbose,
    /// Restricts logging to warnings and errors.
    Quiet,
    /// Terminates the session.
    End,
}

/// Cursor over the arguments of one command.
struct Args<'a> {
    command: &'static str,
    tokens: SplitWhitespace<'a>,
}

impl<'a> Args<'a> {
    fn token(&mut self, name: &'static str) -> Result<&'a str, ParseError> {
        self.tokens.next().ok_or(ParseError::MissingArgument {
            command: self.command,
            name,
        })
    }

    fn number<T: FromStr>(&mut self, name: &'static str) -> Result<T, ParseError> {
        let token = self.token(name)?;
        token.parse().map_err(|_| ParseError::InvalidNumber {
            command: self.command,
            name,
            token: token.to_owned(),
        })
    }

    fn scalar(&mut self, name: &'static str) -> Result<Scalar, ParseError> {
        self.number(name)
    }

    fn point(&mut self, names: [&'static str; 3]) -> Result<R3, ParseError> {
        Ok(vector(
            self.scalar(names[0])?,
            self.scalar(names[1])?,
            self.scalar(names[2])?,
        ))
    }

    fn origin(&mut self) -> Result<R3, ParseError> {
        self.point(["ox", "oy", "oz"])
    }

    fn path(&mut self, name: &'static str) -> Result<PathBuf, ParseError> {
        self.token(name).map(PathBuf::from)
    }

    fn orientation(&mut self) -> Result<Orientation, ParseError> {
        let token = self.token("dir")?;
        token.parse().map_err(|_| ParseError::InvalidDirection {
            command: self.command,
            token: token.to_owned(),
        })
    }

    fn axis(&mut self) -> Result<Axis, ParseError> {
        let token = self.token("dim")?;
        let mut chars = token.chars();
        match (chars.next().and_then(Axis::from_char), chars.next()) {
            (Some(axis), None) => Ok(axis),
            _ => Err(ParseError::InvalidDirection {
                command: self.command,
                token: token.to_owned(),
            }),
        }
    }

    fn coil(&mut self) -> Result<CoilArgs, ParseError> {
        Ok(CoilArgs {
            origin: self.origin()?,
            radius: self.scalar("radius")?,
            pitch: self.scalar("pitch")?,
            turns: self.scalar("turns")?,
            segments: self.number("n")?,
            orientation: self.orientation()?,
        })
    }

    fn finish(mut self, command: Command) -> Result<Command, ParseError> {
        let extra: Vec<&str> = self.tokens.by_ref().collect();
        if extra.is_empty() {
            Ok(command)
        } else {
            Err(ParseError::TrailingArguments {
                command: self.command,
                extra: extra.join(" "),
            })
        }
    }
}

const KEYWORDS: [&str; 20] = [
    "current",
    "file",
    "nofile",
    "moveto",
    "lineto",
    "circle",
    "arc",
    "solenoid",
    "helmholtz",
    "maxwell",
    "golay",
    "squarespiral",
    "traj",
    "grid",
    "wires",
    "inductance",
    "clear",
    "verbose",
    "quiet",
    "end",
];

impl Command {
    /// Parses one line. Blank and comment lines yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Self>, ParseError> {
        let mut tokens = line.split_whitespace();
        let Some(word) = tokens.next() else {
            return Ok(None);
        };
        if word.starts_with('#') {
            return Ok(None);
        }
        let command = KEYWORDS
            .iter()
            .copied()
            .find(|k| k.eq_ignore_ascii_case(word))
            .ok_or_else(|| ParseError::UnknownCommand(word.to_owned()))?;
        let mut args = Args { command, tokens };

        let parsed = match command {
            "current" => Self::Current(args.scalar("I")?),
            "file" => Self::File(args.path("path")?),
            "nofile" => Self::NoFile,
            "moveto" => Self::MoveTo(args.point(["x", "y", "z"])?),
            "lineto" => Self::LineTo(args.point(["x", "y", "z"])?),
            "circle" => Self::Circle {
                origin: args.origin()?,
                radius: args.scalar("radius")?,
                segments: args.number("n")?,
                orientation: args.orientation()?,
            },
            "arc" => Self::Arc {
                origin: args.origin()?,
                radius: args.scalar("radius")?,
                t1: args.scalar("t1")?,
                t2: args.scalar("t2")?,
                segments: args.number("n")?,
                orientation: args.orientation()?,
            },
            "solenoid" => Self::Solenoid(args.coil()?),
            "helmholtz" => Self::Helmholtz(args.coil()?),
            "maxwell" => Self::Maxwell(args.coil()?),
            "golay" => {
                let origin = args.origin()?;
                let geometry = GolayGeometry {
                    a: args.scalar("a")?,
                    b: args.scalar("b")?,
                    c: args.scalar("c")?,
                    theta: args.scalar("theta")?,
                    radius: args.scalar("radius")?,
                    pitch: args.scalar("pitch")?,
                    turns: args.number("turns")?,
                };
                Self::Golay {
                    origin,
                    geometry,
                    segments: args.number("n")?,
                    orientation: args.orientation()?,
                }
            }
            "squarespiral" => Self::SquareSpiral {
                origin: args.origin()?,
                width: args.scalar("width")?,
                pitch: args.scalar("pitch")?,
                turns: args.number("turns")?,
            },
            "traj" => Self::Traj {
                points: args.number("n")?,
                start: args.point(["ax", "ay", "az"])?,
                end: args.point(["bx", "by", "bz"])?,
                output: args.path("path")?,
            },
            "grid" => Self::Grid {
                rows: args.number("m")?,
                cols: args.number("n")?,
                origin: args.origin()?,
                u: args.scalar("u")?,
                v: args.scalar("v")?,
                axis: args.axis()?,
                output: args.path("path")?,
            },
            "wires" => Self::Wires(args.path("path")?),
            "inductance" => Self::Inductance(args.path("path")?),
            "clear" => Self::Clear,
            "verbose" => Self::Verbose,
            "quiet" => Self::Quiet,
            "end" => Self::End,
            other => return Err(ParseError::UnknownCommand(other.to_owned())),
        };
        args.finish(parsed).map(Some)
    }

    /// Command keyword.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Current(_) => "current",
            Self::File(_) => "file",
            Self::NoFile => "nofile",
            Self::MoveTo(_) => "moveto",
            Self::LineTo(_) => "lineto",
            Self::Circle { .. } => "circle",
            Self::Arc { .. } => "arc",
            Self::Solenoid(_) => "solenoid",
            Self::Helmholtz(_) => "helmholtz",
            Self::Maxwell(_) => "maxwell",
            Self::Golay { .. } => "golay",
            Self::SquareSpiral { .. } => "squarespiral",
            Self::Traj { .. } => "traj",
            Self::Grid { .. } => "grid",
            Self::Wires(_) => "wires",
            Self::Inductance(_) => "inductance",
            Self::Clear => "clear",
            Self::Verbose => "verbose",
            Self::Quiet => "quiet",
            Self::End => "end",
        }
    }
}

impl FromStr for Command {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)?.ok_or(ParseError::Empty)
    }
}
