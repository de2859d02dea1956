//! Physical constants and numerical tolerances.
//!
//! ## Accuracy
//!
//! μ₀ is measured (no longer exact after the 2019 SI redefinition) and is given
//! with 12 significant figures, which is well beyond the discretization error of
//! any segmented coil model.
//!
//! ## References
//!
//! - NIST Reference on Constants, Units, and Uncertainty: <https://physics.nist.gov/cuu/Constants/>
//! - CODATA 2018 values published May 20, 2019 (following 2019 SI redefinition)

use std::f64::consts::PI;

use crate::math::Scalar;

/// Vacuum permeability μ₀ in henries per meter (H/m).
/// Approximate value: 1.25663706212 × 10⁻⁶ H/m (12 significant figures).
/// Note: CODATA 2022 value is 1.25663706127 × 10⁻⁶ H/m with relative uncertainty ~10⁻¹⁰.
pub const VACUUM_PERMEABILITY: Scalar = 1.256_637_062_12e-6;

/// Biot-Savart prefactor μ₀/4π in H/m.
pub const MU0_OVER_4PI: Scalar = VACUUM_PERMEABILITY / (4.0 * PI);

/// Absolute tolerance (m) below which two points are considered coincident.
pub const GEOMETRY_TOLERANCE: Scalar = 1.0e-12;

/// Relative tolerance on the perpendicular distance to a segment's line, as a
/// fraction of the segment length, below which the field contribution is zero.
pub const SINGULAR_TOLERANCE: Scalar = 1.0e-9;

/// Field magnitude at the center of an ideal circular loop, `μ₀ I / 2R`.
#[inline]
#[must_use]
pub fn loop_center_field(current: Scalar, radius: Scalar) -> Scalar {
    VACUUM_PERMEABILITY * current / (2.0 * radius)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn biot_savart_prefactor_is_close_to_1e_minus_7() {
        assert_relative_eq!(MU0_OVER_4PI, 1.0e-7, max_relative = 1.0e-9);
    }

    #[test]
    fn loop_center_field_matches_reference() {
        // 1 A through a 1 m loop: μ₀/2.
        assert_relative_eq!(loop_center_field(1.0, 1.0), 6.283_185_310_6e-7, max_relative = 1.0e-9);
    }
}
