#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![warn(clippy::all, clippy::cargo, clippy::nursery, missing_docs)]
#![doc = include_str!("../README.md")]

/// Fundamental physical constants and numerical tolerances.
pub mod constants;
/// Shared mathematical utilities (vectors, axes, interpolation).
pub mod math;
/// Biot-Savart field kernels and field descriptors.
pub mod fields;
/// Append-only wire segment lists.
pub mod wires;
/// Coil and path generators that append segments to a wire list.
pub mod shapes;
/// Field sampling over line and plane lattices.
pub mod grid;
/// Mutual inductance between wire lists.
pub mod inductance;
/// File formats for wires and grids.
pub mod io;
/// Error types shared between modules.
pub mod errors;
/// Line-oriented command language.
pub mod command;
/// Command interpreter state.
pub mod session;

/// Common exports for downstream crates.
pub mod prelude;
