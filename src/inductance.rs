//! Mutual inductance of two wire lists from a discretized Neumann double sum.
//!
//! ```text
//! M = μ₀/4π · Σᵢ Σⱼ (dlᵢ · dlⱼ) / |midᵢ − midⱼ|
//! ```
//!
//! `dl` is the segment vector `B − A`, reversed when the segment carries a
//! negative current, and `mid` its midpoint. Current magnitudes do not enter:
//! each list is read as one path carrying unit current in the direction its
//! currents flow, and segments carrying no current are left out. The midpoint
//! rule converges as segments shrink relative to the separation between the
//! two paths. Self inductance is out of reach of this discretization: a pair
//! of segments whose midpoints lie within half a segment length of each other
//! means the two lists share conductor, and is rejected rather than clamped.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::debug;

use crate::constants::{GEOMETRY_TOLERANCE, MU0_OVER_4PI};
use crate::errors::{FieldError, ResourceError};
use crate::math::{Scalar, R3};
use crate::wires::WireList;

/// Oriented segment vector and midpoint.
type Element = (R3, R3);

/// Midpoint separation, as a fraction of the longer segment, below which two
/// segments are taken to be the same piece of conductor.
const OVERLAP_FRACTION: Scalar = 0.5;

fn buffer<T>(len: usize) -> Result<Vec<T>, ResourceError> {
    let mut out = Vec::new();
    out.try_reserve_exact(len)
        .map_err(|_| ResourceError::Allocation { elements: len })?;
    Ok(out)
}

fn elements(wires: &WireList) -> Result<Vec<Element>, ResourceError> {
    let mut out = buffer(wires.len())?;
    out.extend(
        wires
            .iter()
            .filter(|s| s.current != 0.0)
            .map(|s| (s.vector() * s.current.signum(), s.midpoint())),
    );
    Ok(out)
}

/// Sum of the Neumann terms of one element of the first list against every
/// element of the second.
fn row_sum(&(dl_a, mid_a): &Element, others: &[Element]) -> Result<Scalar, FieldError> {
    others.iter().try_fold(0.0, |acc, &(dl_b, mid_b)| {
        let dist = (mid_a - mid_b).norm();
        let reach = OVERLAP_FRACTION * dl_a.norm().max(dl_b.norm());
        if dist <= GEOMETRY_TOLERANCE || dist < reach {
            return Err(FieldError::geometry(format!(
                "wire lists overlap at ({}, {}, {})",
                mid_a.x, mid_a.y, mid_a.z
            )));
        }
        Ok(acc + dl_a.dot(&dl_b) / dist)
    })
}

/// Mutual inductance (H) between `wa` and `wb`.
///
/// Symmetric in its arguments. Returns [`FieldError::InvalidGeometry`] when a
/// segment midpoint of one list lies within half a segment length of a
/// midpoint of the other, which is the case whenever the lists overlap, even
/// at different resolutions.
pub fn mutual_inductance(wa: &WireList, wb: &WireList) -> Result<Scalar, FieldError> {
    let a = elements(wa)?;
    let b = elements(wb)?;
    let mut rows = buffer(a.len())?;

    #[cfg(feature = "parallel")]
    a.par_iter()
        .map(|e| row_sum(e, &b))
        .collect_into_vec(&mut rows);

    #[cfg(not(feature = "parallel"))]
    rows.extend(a.iter().map(|e| row_sum(e, &b)));

    // Summing rows in order keeps the result independent of thread scheduling.
    let total = rows
        .into_iter()
        .try_fold(0.0, |acc, row| row.map(|r| acc + r))?;
    let m = MU0_OVER_4PI * total;
    debug!(segments_a = wa.len(), segments_b = wb.len(), henries = m, "mutual inductance");
    Ok(m)
}
