use crate::constants::{MU0_OVER_4PI, SINGULAR_TOLERANCE};
use crate::math::{R3, Scalar};

/// Magnetic flux density (T) at `m` from the finite straight filament `a → b`
/// carrying `current` amperes.
///
/// Closed form of the Biot-Savart integral along the segment:
///
/// ```text
/// B = μ₀ I / (4π d) · (cos θ₁ − cos θ₂) · (û × ρ̂)
/// ```
///
/// where `û` is the unit direction `a → b`, `ρ` the perpendicular offset of
/// `m` from the line through the segment, `d = |ρ|`, and `θ₁`, `θ₂` the angles
/// between `û` and the vectors from each endpoint to `m`.
///
/// Points on the line through the segment (including its extension) receive no
/// contribution, as does a degenerate segment with `a == b`.
#[must_use]
pub fn segment_field(a: &R3, b: &R3, m: &R3, current: Scalar) -> R3 {
    let l = b - a;
    let length = l.norm();
    if length == 0.0 {
        return R3::zeros();
    }
    let u = l / length;

    let r1 = m - a;
    let r2 = m - b;
    let rho = r1 - u * r1.dot(&u);
    let d = rho.norm();
    if d <= SINGULAR_TOLERANCE * length {
        return R3::zeros();
    }

    // Both endpoint distances are at least d, so neither division can blow up.
    let cos1 = u.dot(&r1) / r1.norm();
    let cos2 = u.dot(&r2) / r2.norm();

    u.cross(&rho) * (MU0_OVER_4PI * current * (cos1 - cos2) / (d * d))
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    use super::*;
    use crate::math::vector;

    #[test]
    fn single_segment_matches_closed_form() {
        let a = vector(0.0, 0.0, 0.0);
        let b = vector(1.0, 0.0, 0.0);
        let m = vector(0.5, 1.0, 0.0);
        let field = segment_field(&a, &b, &m, 1.0);

        // Perpendicular to both the wire and the radial offset.
        assert_relative_eq!(field.dot(&(b - a)), 0.0, epsilon = 1.0e-24);
        assert_relative_eq!(field.dot(&vector(0.0, 1.0, 0.0)), 0.0, epsilon = 1.0e-24);

        // cos θ₁ − cos θ₂ = 2 · 0.5 / √1.25 at d = 1.
        let expected = MU0_OVER_4PI * 1.0 / 1.25_f64.sqrt();
        assert_relative_eq!(field.z, expected, max_relative = 1.0e-12);
        assert!(field.z > 0.0, "right-hand rule puts +x current's field along +z at +y");
    }

    #[test]
    fn long_segment_approaches_infinite_wire() {
        let a = vector(0.0, 0.0, -1.0e4);
        let b = vector(0.0, 0.0, 1.0e4);
        let m = vector(0.1, 0.0, 0.0);
        let field = segment_field(&a, &b, &m, 2.0);
        // μ₀ I / (2π d)
        let expected = 2.0 * MU0_OVER_4PI * 2.0 / 0.1;
        assert_relative_eq!(field.y, expected, max_relative = 1.0e-6);
    }

    #[test]
    fn points_on_the_line_get_no_contribution() {
        let a = vector(0.0, 0.0, 0.0);
        let b = vector(0.0, 2.0, 0.0);
        for m in [vector(0.0, 1.0, 0.0), vector(0.0, 5.0, 0.0), vector(0.0, -3.0, 0.0), a, b] {
            assert_eq!(segment_field(&a, &b, &m, 1.0), R3::zeros());
        }
    }

    #[test]
    fn degenerate_segment_contributes_nothing() {
        let a = vector(1.0, 1.0, 1.0);
        assert_eq!(segment_field(&a, &a, &vector(0.0, 0.0, 0.0), 1.0), R3::zeros());
    }

    fn coord() -> impl Strategy<Value = Scalar> {
        -10.0..10.0_f64
    }

    fn point() -> impl Strategy<Value = R3> {
        (coord(), coord(), coord()).prop_map(|(x, y, z)| vector(x, y, z))
    }

    proptest! {
        #[test]
        fn field_is_linear_in_current(a in point(), b in point(), m in point(), i in -100.0..100.0_f64) {
            prop_assume!((b - a).norm() > 1.0e-3);
            let once = segment_field(&a, &b, &m, i);
            let twice = segment_field(&a, &b, &m, 2.0 * i);
            prop_assert!((twice - once * 2.0).norm() <= 1.0e-12 * (1.0 + twice.norm()));
        }

        #[test]
        fn reversing_endpoints_negates_field(a in point(), b in point(), m in point(), i in -100.0..100.0_f64) {
            prop_assume!((b - a).norm() > 1.0e-3);
            let forward = segment_field(&a, &b, &m, i);
            let backward = segment_field(&b, &a, &m, i);
            prop_assert!((forward + backward).norm() <= 1.0e-9 * (1.0 + forward.norm()));
        }
    }
}
