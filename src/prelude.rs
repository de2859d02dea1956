//! Convenience re-exports for building coil geometries and field maps.

pub use crate::command::{Command, ParseError};
pub use crate::constants::*;
pub use crate::errors::{FieldError, ResourceError};
pub use crate::fields::{segment_field, MagneticField};
pub use crate::grid::Grid;
pub use crate::inductance::mutual_inductance;
pub use crate::math::{vector, Axis, Scalar, R3};
pub use crate::session::{Flow, Session, SessionError};
pub use crate::shapes::{
    arc, circle, golay, helix, helmholtz, maxwell, square_spiral, GolayGeometry, Orientation,
    Winding,
};
pub use crate::wires::{WireList, WireSegment};
