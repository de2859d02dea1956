//! Magnetostatic field kernels and field descriptors.

mod magnetic;
mod segment;

pub use magnetic::MagneticField;
pub use segment::segment_field;
