//! Shared numerical primitives anchored on `nalgebra`.
//!
//! Addition, subtraction, scaling, dot and cross products and the Euclidean
//! norm come straight from [`nalgebra::Vector3`]; this module only adds the
//! operations with a failure mode or a tolerance attached.

use std::fmt;

use nalgebra::Vector3;

use crate::constants::GEOMETRY_TOLERANCE;

/// Primary scalar type used across the crate.
pub type Scalar = f64;
/// Convenient alias for three-dimensional real vectors.
pub type R3 = Vector3<Scalar>;

/// Builds a vector from its components.
#[inline]
#[must_use]
pub fn vector(x: Scalar, y: Scalar, z: Scalar) -> R3 {
    R3::new(x, y, z)
}

/// Tolerance comparison of two vectors.
///
/// Components are compared with an absolute floor of [`GEOMETRY_TOLERANCE`]
/// and a relative tolerance of `1e-9`, so both millimetre coils and kilometre
/// lines compare sensibly.
#[must_use]
pub fn approx_eq(a: &R3, b: &R3) -> bool {
    approx::relative_eq!(*a, *b, epsilon = GEOMETRY_TOLERANCE, max_relative = 1.0e-9)
}

/// Unit vector along `v`, or `None` when `v` has zero length.
#[must_use]
pub fn unit(v: &R3) -> Option<R3> {
    v.try_normalize(0.0)
}

/// Vector projection of `v` onto `u`, or `None` when `u` has zero length.
#[must_use]
pub fn proj(v: &R3, u: &R3) -> Option<R3> {
    let uu = u.dot(u);
    if uu == 0.0 {
        return None;
    }
    Some(u * (v.dot(u) / uu))
}

/// Linear interpolation `a + t (b - a)`. `t` is not clamped.
#[inline]
#[must_use]
pub fn vinterp(a: &R3, b: &R3, t: Scalar) -> R3 {
    a + (b - a) * t
}

/// True when every component is finite.
#[inline]
#[must_use]
pub fn is_finite(v: &R3) -> bool {
    v.iter().all(|c| c.is_finite())
}

/// Principal coordinate axis.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// The x axis.
    X,
    /// The y axis.
    Y,
    /// The z axis.
    Z,
}

impl Axis {
    /// Unit vector along the axis.
    #[must_use]
    pub fn unit(self) -> R3 {
        match self {
            Self::X => R3::x(),
            Self::Y => R3::y(),
            Self::Z => R3::z(),
        }
    }

    /// In-plane basis `(e1, e2)` such that `(e1, e2, axis)` is right-handed.
    #[must_use]
    pub fn plane_basis(self) -> (R3, R3) {
        match self {
            Self::X => (R3::y(), R3::z()),
            Self::Y => (R3::z(), R3::x()),
            Self::Z => (R3::x(), R3::y()),
        }
    }

    /// Parses `x`, `y` or `z` (case-insensitive).
    #[must_use]
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'x' => Some(Self::X),
            'y' => Some(Self::Y),
            'z' => Some(Self::Z),
            _ => None,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            Self::X => 'x',
            Self::Y => 'y',
            Self::Z => 'z',
        };
        write!(f, "{c}")
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn unit_of_zero_vector_is_none() {
        assert!(unit(&R3::zeros()).is_none());
        let u = unit(&vector(0.0, 3.0, 4.0)).unwrap();
        assert_relative_eq!(u.norm(), 1.0, epsilon = 1.0e-12);
        assert_relative_eq!(u.y, 0.6, epsilon = 1.0e-12);
    }

    #[test]
    fn projection_keeps_parallel_component() {
        let v = vector(2.0, 5.0, -1.0);
        let p = proj(&v, &vector(0.0, 10.0, 0.0)).unwrap();
        assert_relative_eq!(p, vector(0.0, 5.0, 0.0), epsilon = 1.0e-12);
        assert!(proj(&v, &R3::zeros()).is_none());
    }

    #[test]
    fn interpolation_is_not_clamped() {
        let a = vector(0.0, 0.0, 0.0);
        let b = vector(1.0, 2.0, 3.0);
        assert_relative_eq!(vinterp(&a, &b, 0.5), vector(0.5, 1.0, 1.5), epsilon = 1.0e-12);
        assert_relative_eq!(vinterp(&a, &b, 2.0), vector(2.0, 4.0, 6.0), epsilon = 1.0e-12);
    }

    #[test]
    fn plane_basis_is_right_handed() {
        for axis in [Axis::X, Axis::Y, Axis::Z] {
            let (e1, e2) = axis.plane_basis();
            assert_relative_eq!(e1.cross(&e2), axis.unit(), epsilon = 1.0e-15);
        }
        assert_eq!(Axis::from_char('Y'), Some(Axis::Y));
        assert_eq!(Axis::from_char('w'), None);
    }

    #[test]
    fn approx_eq_uses_tolerance() {
        let a = vector(1.0, 2.0, 3.0);
        assert!(approx_eq(&a, &(a + vector(1.0e-13, 0.0, 0.0))));
        assert!(!approx_eq(&a, &(a + vector(1.0e-6, 0.0, 0.0))));
    }
}
