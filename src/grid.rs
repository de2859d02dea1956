//! Structured sampling lattices populated with the superposed Biot-Savart field.
//!
//! A [`Grid`] is born populated: both constructors build the lattice and then
//! evaluate every point against a borrowed [`WireList`]. Each lattice point is
//! an independent fold over the segment list, so with the `parallel` feature
//! the points are distributed over the rayon thread pool; results are identical
//! either way.

use std::time::Instant;

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::debug;

use crate::errors::{FieldError, ResourceError};
use crate::fields::MagneticField;
use crate::math::{is_finite, vinterp, Axis, Scalar, R3};
use crate::wires::WireList;

/// m×n lattice of sample points with the field evaluated at each point.
///
/// Storage is row-major: index `k = i * cols + j`. `fields()[k]` is the field
/// at `points()[k]`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    xyz: Vec<R3>,
    f: Vec<R3>,
}

impl Grid {
    /// Samples `n` evenly spaced points on the line from `a` to `b` (both
    /// inclusive) as a 1×n grid. A single point sits at `a`.
    pub fn segment(n: usize, a: R3, b: R3, wires: &WireList) -> Result<Self, FieldError> {
        if n == 0 {
            return Err(FieldError::parameter("segment grid needs at least one point"));
        }
        if !is_finite(&a) || !is_finite(&b) {
            return Err(FieldError::parameter("segment grid endpoints must be finite"));
        }

        let mut xyz = reserve(n)?;
        let last = n - 1;
        xyz.extend((0..n).map(|k| match k {
            0 => a,
            k if k == last => b,
            k => vinterp(&a, &b, k as Scalar / last as Scalar),
        }));

        Self::sample(1, n, xyz, wires)
    }

    /// Samples an `m`×`n` lattice on the plane through `origin` normal to
    /// `axis`, spanning `±u/2` along the first in-plane axis and `±v/2` along
    /// the second (see [`Axis::plane_basis`]).
    ///
    /// A dimension of one collapses onto the center line of that direction.
    #[allow(clippy::too_many_arguments)]
    pub fn surface(
        m: usize,
        n: usize,
        origin: R3,
        u: Scalar,
        v: Scalar,
        axis: Axis,
        wires: &WireList,
    ) -> Result<Self, FieldError> {
        if m == 0 || n == 0 {
            return Err(FieldError::parameter(format!(
                "surface grid dimensions must be positive, got {m}x{n}"
            )));
        }
        if !is_finite(&origin) {
            return Err(FieldError::parameter("surface grid origin must be finite"));
        }
        for (name, extent) in [("u", u), ("v", v)] {
            if !extent.is_finite() || extent < 0.0 {
                return Err(FieldError::parameter(format!(
                    "surface grid extent {name} must be finite and non-negative, got {extent}"
                )));
            }
        }
        let len = m.checked_mul(n).ok_or(ResourceError::Allocation { elements: usize::MAX })?;

        let (e1, e2) = axis.plane_basis();
        let mut xyz = reserve(len)?;
        for i in 0..m {
            let s = offset(i, m, u);
            for j in 0..n {
                let t = offset(j, n, v);
                xyz.push(origin + e1 * s + e2 * t);
            }
        }

        Self::sample(m, n, xyz, wires)
    }

    /// Reassembles a grid from stored points and fields.
    pub(crate) fn from_parts(
        rows: usize,
        cols: usize,
        xyz: Vec<R3>,
        f: Vec<R3>,
    ) -> Result<Self, FieldError> {
        let expected = rows.checked_mul(cols);
        if rows == 0 || cols == 0 || expected != Some(xyz.len()) || xyz.len() != f.len() {
            return Err(FieldError::parameter(format!(
                "grid {rows}x{cols} does not match {} points and {} field values",
                xyz.len(),
                f.len()
            )));
        }
        Ok(Self { rows, cols, xyz, f })
    }

    fn sample(rows: usize, cols: usize, xyz: Vec<R3>, wires: &WireList) -> Result<Self, FieldError> {
        debug!(rows, cols, segments = wires.len(), "sampling field grid");
        let started = Instant::now();
        let f = evaluate(&xyz, wires)?;
        debug!(
            points = xyz.len(),
            elapsed_ms = started.elapsed().as_secs_f64() * 1.0e3,
            "field grid populated"
        );
        Ok(Self { rows, cols, xyz, f })
    }

    /// Number of rows (m).
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns (n).
    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total number of lattice points, `m * n`.
    #[must_use]
    pub fn len(&self) -> usize {
        self.xyz.len()
    }

    /// Always false for a constructed grid; provided for API symmetry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.xyz.is_empty()
    }

    /// Lattice coordinates in storage order.
    #[must_use]
    pub fn points(&self) -> &[R3] {
        &self.xyz
    }

    /// Field values (T) in storage order.
    #[must_use]
    pub fn fields(&self) -> &[R3] {
        &self.f
    }

    /// Point and field at row `i`, column `j`.
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> Option<(R3, R3)> {
        if i >= self.rows || j >= self.cols {
            return None;
        }
        let k = i * self.cols + j;
        Some((self.xyz[k], self.f[k]))
    }

    /// Point with the strongest field and that field.
    #[must_use]
    pub fn peak(&self) -> Option<(R3, MagneticField)> {
        self.xyz
            .iter()
            .zip(&self.f)
            .max_by(|(_, a), (_, b)| a.norm_squared().total_cmp(&b.norm_squared()))
            .map(|(p, f)| (*p, MagneticField::from_vector(*f)))
    }

    /// Largest field magnitude on the grid (T).
    #[must_use]
    pub fn max_magnitude(&self) -> Scalar {
        self.peak().map_or(0.0, |(_, field)| field.magnitude)
    }
}

/// Signed offset of sample `index` of `count` across an extent centered on zero.
fn offset(index: usize, count: usize, extent: Scalar) -> Scalar {
    if count == 1 {
        0.0
    } else {
        -0.5 * extent + extent * index as Scalar / (count - 1) as Scalar
    }
}

fn reserve(len: usize) -> Result<Vec<R3>, ResourceError> {
    let mut out = Vec::new();
    out.try_reserve_exact(len)
        .map_err(|_| ResourceError::Allocation { elements: len })?;
    Ok(out)
}

/// Folds the wire list through the segment kernel at every point.
fn evaluate(points: &[R3], wires: &WireList) -> Result<Vec<R3>, ResourceError> {
    let mut f = reserve(points.len())?;

    #[cfg(feature = "parallel")]
    points
        .par_iter()
        .map(|p| wires.field_at(p))
        .collect_into_vec(&mut f);

    #[cfg(not(feature = "parallel"))]
    f.extend(points.iter().map(|p| wires.field_at(p)));

    Ok(f)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::constants::MU0_OVER_4PI;
    use crate::math::vector;

    #[test]
    fn segment_grid_without_wires_is_linear_and_zero() {
        let a = vector(-1.0, 0.5, 2.0);
        let b = vector(3.0, -0.5, 0.0);
        let grid = Grid::segment(5, a, b, &WireList::new()).unwrap();

        assert_eq!((grid.rows(), grid.cols(), grid.len()), (1, 5, 5));
        assert_eq!(grid.points()[0], a);
        assert_eq!(grid.points()[4], b);
        for (k, p) in grid.points().iter().enumerate() {
            assert_relative_eq!(*p, a + (b - a) * (k as f64 / 4.0), epsilon = 1.0e-12);
        }
        assert!(grid.fields().iter().all(|f| *f == R3::zeros()));
        assert_eq!(grid.max_magnitude(), 0.0);
    }

    #[test]
    fn single_point_segment_grid_sits_at_start() {
        let a = vector(1.0, 2.0, 3.0);
        let grid = Grid::segment(1, a, vector(4.0, 5.0, 6.0), &WireList::new()).unwrap();
        assert_eq!(grid.points(), &[a]);
    }

    #[test]
    fn zero_dimensions_are_rejected() {
        let wires = WireList::new();
        let o = R3::zeros();
        assert!(matches!(
            Grid::segment(0, o, R3::x(), &wires),
            Err(FieldError::InvalidParameter(_))
        ));
        assert!(matches!(
            Grid::surface(0, 3, o, 1.0, 1.0, Axis::Z, &wires),
            Err(FieldError::InvalidParameter(_))
        ));
        assert!(matches!(
            Grid::surface(3, 0, o, 1.0, 1.0, Axis::Z, &wires),
            Err(FieldError::InvalidParameter(_))
        ));
        assert!(matches!(
            Grid::surface(3, 3, o, -1.0, 1.0, Axis::Z, &wires),
            Err(FieldError::InvalidParameter(_))
        ));
    }

    #[test]
    fn surface_grid_is_centered_and_row_major() {
        let origin = vector(0.0, 0.0, 2.0);
        let grid = Grid::surface(3, 2, origin, 2.0, 4.0, Axis::Z, &WireList::new()).unwrap();
        assert_eq!((grid.rows(), grid.cols()), (3, 2));
        assert_eq!(grid.len(), 6);

        let (p00, _) = grid.get(0, 0).unwrap();
        let (p01, _) = grid.get(0, 1).unwrap();
        let (p21, _) = grid.get(2, 1).unwrap();
        assert_relative_eq!(p00, vector(-1.0, -2.0, 2.0), epsilon = 1.0e-12);
        assert_relative_eq!(p01, vector(-1.0, 2.0, 2.0), epsilon = 1.0e-12);
        assert_relative_eq!(p21, vector(1.0, 2.0, 2.0), epsilon = 1.0e-12);
        assert!(grid.get(3, 0).is_none());

        let centroid = grid.points().iter().fold(R3::zeros(), |acc, p| acc + p) / 6.0;
        assert_relative_eq!(centroid, origin, epsilon = 1.0e-12);
    }

    #[test]
    fn surface_plane_follows_axis_basis() {
        let grid = Grid::surface(2, 2, R3::zeros(), 2.0, 2.0, Axis::X, &WireList::new()).unwrap();
        assert!(grid.points().iter().all(|p| p.x == 0.0));
        // First in-plane axis of X is y, second is z.
        assert_relative_eq!(grid.points()[0], vector(0.0, -1.0, -1.0), epsilon = 1.0e-12);
        assert_relative_eq!(grid.points()[1], vector(0.0, -1.0, 1.0), epsilon = 1.0e-12);
    }

    #[test]
    fn fields_match_direct_superposition() {
        let mut wires = WireList::new();
        wires.append(vector(0.0, 0.0, -1.0), vector(0.0, 0.0, 1.0), 3.0).unwrap();
        let grid = Grid::surface(4, 4, R3::zeros(), 2.0, 2.0, Axis::Z, &wires).unwrap();
        for (p, f) in grid.points().iter().zip(grid.fields()) {
            assert_eq!(*f, wires.field_at(p));
        }

        let (point, peak) = grid.peak().unwrap();
        let rho = point.xy().norm();
        // Corner-most points are the farthest; the peak is on the inner ring.
        assert_relative_eq!(rho, (2.0_f64 / 9.0).sqrt(), epsilon = 1.0e-12);
        let cos = 1.0 / (1.0 + rho * rho).sqrt();
        assert_relative_eq!(peak.magnitude, MU0_OVER_4PI * 3.0 * 2.0 * cos / rho, max_relative = 1.0e-9);
    }
}
