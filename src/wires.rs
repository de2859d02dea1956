//! Ordered, append-only lists of straight current-carrying segments.

use crate::constants::GEOMETRY_TOLERANCE;
use crate::errors::{FieldError, ResourceError};
use crate::fields::segment_field;
use crate::math::{is_finite, R3, Scalar};

/// Finite straight conductor from `start` to `end` carrying `current` amperes.
///
/// The direction `start → end` together with the sign of `current` gives the
/// direction of current flow.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WireSegment {
    /// Start point A in meters.
    pub start: R3,
    /// End point B in meters.
    pub end: R3,
    /// Signed current in amperes.
    pub current: Scalar,
}

impl WireSegment {
    /// Segment vector `B − A`.
    #[must_use]
    pub fn vector(&self) -> R3 {
        self.end - self.start
    }

    /// Segment length in meters.
    #[must_use]
    pub fn length(&self) -> Scalar {
        self.vector().norm()
    }

    /// Midpoint of the segment.
    #[must_use]
    pub fn midpoint(&self) -> R3 {
        (self.start + self.end) * 0.5
    }

    /// Field contribution (T) of this segment at `point`.
    #[must_use]
    pub fn field_at(&self, point: &R3) -> R3 {
        segment_field(&self.start, &self.end, point, self.current)
    }
}

/// Ordered list of wire segments stored as parallel arrays.
///
/// Segments can only be appended; an edited geometry is a new list.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WireList {
    starts: Vec<R3>,
    ends: Vec<R3>,
    currents: Vec<Scalar>,
}

impl WireList {
    /// Creates an empty wire list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.currents.len()
    }

    /// True if no segments have been appended.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.currents.is_empty()
    }

    /// Segment start points.
    #[must_use]
    pub fn starts(&self) -> &[R3] {
        &self.starts
    }

    /// Segment end points.
    #[must_use]
    pub fn ends(&self) -> &[R3] {
        &self.ends
    }

    /// Segment currents.
    #[must_use]
    pub fn currents(&self) -> &[Scalar] {
        &self.currents
    }

    /// Returns segment `index`, if present.
    #[must_use]
    pub fn segment(&self, index: usize) -> Option<WireSegment> {
        Some(WireSegment {
            start: *self.starts.get(index)?,
            end: self.ends[index],
            current: self.currents[index],
        })
    }

    /// Iterates over the segments in insertion order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = WireSegment> + '_ {
        self.starts
            .iter()
            .zip(&self.ends)
            .zip(&self.currents)
            .map(|((&start, &end), &current)| WireSegment { start, end, current })
    }

    /// Reserves room for `additional` segments in every backing array.
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), FieldError> {
        let elements = self.len().saturating_add(additional);
        let alloc = |_| ResourceError::Allocation { elements };
        self.starts.try_reserve(additional).map_err(alloc)?;
        self.ends.try_reserve(additional).map_err(alloc)?;
        self.currents.try_reserve(additional).map_err(alloc)?;
        Ok(())
    }

    /// Appends the segment `start → end` carrying `current` amperes.
    ///
    /// Fails with [`FieldError::InvalidGeometry`] when the endpoints coincide
    /// and with [`FieldError::InvalidParameter`] for non-finite input.
    pub fn append(&mut self, start: R3, end: R3, current: Scalar) -> Result<(), FieldError> {
        if !is_finite(&start) || !is_finite(&end) || !current.is_finite() {
            return Err(FieldError::parameter(format!(
                "non-finite segment {start:?} -> {end:?} carrying {current} A"
            )));
        }
        if (end - start).norm() <= GEOMETRY_TOLERANCE {
            return Err(FieldError::geometry(format!(
                "zero-length segment at ({}, {}, {})",
                start.x, start.y, start.z
            )));
        }
        self.try_reserve(1)?;
        self.starts.push(start);
        self.ends.push(end);
        self.currents.push(current);
        Ok(())
    }

    /// Appends a copy of every segment of `other`, preserving order.
    pub fn extend_from(&mut self, other: &Self) -> Result<(), FieldError> {
        self.try_reserve(other.len())?;
        self.starts.extend_from_slice(&other.starts);
        self.ends.extend_from_slice(&other.ends);
        self.currents.extend_from_slice(&other.currents);
        Ok(())
    }

    /// Superposed field (T) of every segment at `point`.
    #[must_use]
    pub fn field_at(&self, point: &R3) -> R3 {
        self.iter()
            .fold(R3::zeros(), |acc, segment| acc + segment.field_at(point))
    }

    /// Total conductor length in meters.
    #[must_use]
    pub fn total_length(&self) -> Scalar {
        self.iter().map(|s| s.length()).sum()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::math::vector;

    #[test]
    fn append_keeps_parallel_arrays_aligned() {
        let mut wires = WireList::new();
        assert!(wires.is_empty());
        wires.append(vector(0.0, 0.0, 0.0), vector(1.0, 0.0, 0.0), 2.0).unwrap();
        wires.append(vector(1.0, 0.0, 0.0), vector(1.0, 1.0, 0.0), -2.0).unwrap();

        assert_eq!(wires.len(), 2);
        assert_eq!(wires.starts().len(), 2);
        assert_eq!(wires.ends().len(), 2);
        assert_eq!(wires.currents(), &[2.0, -2.0]);
        let second = wires.segment(1).unwrap();
        assert_eq!(second.end, vector(1.0, 1.0, 0.0));
        assert!(wires.segment(2).is_none());
        assert_relative_eq!(wires.total_length(), 2.0, epsilon = 1.0e-12);
    }

    #[test]
    fn coincident_endpoints_are_rejected() {
        let mut wires = WireList::new();
        let p = vector(0.3, 0.2, 0.1);
        let err = wires.append(p, p, 1.0).unwrap_err();
        assert!(matches!(err, FieldError::InvalidGeometry(_)));
        assert!(wires.is_empty());
    }

    #[test]
    fn non_finite_input_is_rejected() {
        let mut wires = WireList::new();
        let err = wires
            .append(vector(0.0, 0.0, 0.0), vector(1.0, 0.0, 0.0), f64::NAN)
            .unwrap_err();
        assert!(matches!(err, FieldError::InvalidParameter(_)));
        let err = wires
            .append(vector(f64::INFINITY, 0.0, 0.0), vector(1.0, 0.0, 0.0), 1.0)
            .unwrap_err();
        assert!(matches!(err, FieldError::InvalidParameter(_)));
    }

    #[test]
    fn field_superposes_segment_contributions() {
        let mut wires = WireList::new();
        let a = vector(0.0, 0.0, 0.0);
        let b = vector(1.0, 0.0, 0.0);
        wires.append(a, b, 1.0).unwrap();
        wires.append(a, b, 1.0).unwrap();
        let p = vector(0.5, 1.0, 0.0);
        let single = segment_field(&a, &b, &p, 1.0);
        assert_relative_eq!(wires.field_at(&p), single * 2.0, epsilon = 1.0e-20);
    }

    #[test]
    fn extend_preserves_order() {
        let mut first = WireList::new();
        first.append(vector(0.0, 0.0, 0.0), vector(0.0, 0.0, 1.0), 1.0).unwrap();
        let mut second = WireList::new();
        second.append(vector(5.0, 0.0, 0.0), vector(6.0, 0.0, 0.0), 3.0).unwrap();
        first.extend_from(&second).unwrap();
        let currents: Vec<_> = first.iter().map(|s| s.current).collect();
        assert_eq!(currents, vec![1.0, 3.0]);
    }
}
