use std::fmt;

use crate::math::{R3, Scalar};

/// Tesla to gauss.
const GAUSS_PER_TESLA: Scalar = 1.0e4;

/// Magnetic flux density sample split into magnitude (T) and direction.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MagneticField {
    /// Magnetic flux density magnitude (T).
    pub magnitude: Scalar,
    /// Unit direction vector; zero when the field vanishes.
    pub direction: R3,
}

impl MagneticField {
    /// Constructs a magnetic field from a vector representation.
    #[must_use]
    pub fn from_vector(vector: R3) -> Self {
        let magnitude = vector.norm();
        let direction = if magnitude == 0.0 {
            R3::zeros()
        } else {
            vector / magnitude
        };

        Self {
            magnitude,
            direction,
        }
    }

    /// Reassembles the field vector (T).
    #[must_use]
    pub fn vector(&self) -> R3 {
        self.direction * self.magnitude
    }

    /// Magnitude in gauss.
    #[must_use]
    pub fn gauss(&self) -> Scalar {
        self.magnitude * GAUSS_PER_TESLA
    }
}

impl fmt::Display for MagneticField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.6e} T along ({:.4}, {:.4}, {:.4})",
            self.magnitude, self.direction.x, self.direction.y, self.direction.z
        )
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn from_vector_splits_magnitude_and_direction() {
        let field = MagneticField::from_vector(R3::new(1.0e-4, 2.0e-4, 2.0e-4));
        assert_relative_eq!(field.magnitude, 3.0e-4, epsilon = 1.0e-16);
        assert_relative_eq!(field.direction.norm(), 1.0, epsilon = 1.0e-12);
        assert_relative_eq!(field.gauss(), 3.0, epsilon = 1.0e-12);
        assert_relative_eq!(field.vector(), R3::new(1.0e-4, 2.0e-4, 2.0e-4), epsilon = 1.0e-16);
    }

    #[test]
    fn zero_field_has_zero_direction() {
        let field = MagneticField::from_vector(R3::zeros());
        assert_eq!(field.direction, R3::zeros());
        assert!(field.to_string().starts_with("0.000000e0 T"));
    }
}
