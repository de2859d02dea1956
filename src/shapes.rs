//! Coil generators that discretize ideal current paths into straight segments.
//!
//! Every generator samples points along its curve, joins consecutive samples
//! and gives each segment the same signed current. Shapes are staged in a
//! scratch list and only copied into the caller's [`WireList`] once complete,
//! so a rejected shape leaves the target untouched.
//!
//! ## Orientation convention
//!
//! An [`Orientation`] names the coil axis and a sign. For axis `a` the
//! in-plane basis `(e1, e2)` is taken from [`Axis::plane_basis`], curves are
//! traced with increasing angle `t` as `origin + r (cos t e1 + sin t e2)`, and a
//! negative orientation negates the current. A positive current on a `+axis`
//! loop therefore produces a field along `+axis` at its center.

use std::f64::consts::{PI, TAU};
use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::errors::{FieldError, ResourceError};
use crate::math::{is_finite, Axis, Scalar, R3};
use crate::wires::WireList;

/// Coil axis with winding sense, the `dir` argument of the shape commands.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Orientation {
    /// Coil axis.
    pub axis: Axis,
    /// Reverses the winding sense (negates the current).
    pub reversed: bool,
}

impl Orientation {
    /// Positive winding about `axis`.
    #[must_use]
    pub const fn new(axis: Axis) -> Self {
        Self { axis, reversed: false }
    }

    /// Negative winding about `axis`.
    #[must_use]
    pub const fn reversed(axis: Axis) -> Self {
        Self { axis, reversed: true }
    }

    /// `+1` or `-1`.
    #[must_use]
    pub const fn sign(self) -> Scalar {
        if self.reversed {
            -1.0
        } else {
            1.0
        }
    }

    /// Point at angle `t`, radius `r` and axial offset `h` around `origin`.
    fn point(self, origin: &R3, r: Scalar, t: Scalar, h: Scalar) -> R3 {
        let (e1, e2) = self.axis.plane_basis();
        origin + e1 * (r * t.cos()) + e2 * (r * t.sin()) + self.axis.unit() * h
    }
}

impl Default for Orientation {
    fn default() -> Self {
        Self::new(Axis::Z)
    }
}

impl FromStr for Orientation {
    type Err = FieldError;

    /// Accepts `x`, `+x`, `-x` and likewise for `y` and `z`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || FieldError::parameter(format!("unrecognized direction `{s}`"));
        let (reversed, rest) = match s.as_bytes().first() {
            Some(b'-') => (true, &s[1..]),
            Some(b'+') => (false, &s[1..]),
            _ => (false, s),
        };
        let mut chars = rest.chars();
        match (chars.next().and_then(Axis::from_char), chars.next()) {
            (Some(axis), None) => Ok(Self { axis, reversed }),
            _ => Err(bad()),
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.reversed { '-' } else { '+' };
        write!(f, "{sign}{}", self.axis)
    }
}

/// Winding parameters shared by the curved generators.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Winding {
    /// Segments per arc or per full turn.
    pub segments: u32,
    /// Coil axis and winding sense.
    pub orientation: Orientation,
    /// Current magnitude in amperes, before the orientation sign.
    pub current: Scalar,
}

impl Winding {
    /// Creates winding parameters.
    #[must_use]
    pub const fn new(segments: u32, orientation: Orientation, current: Scalar) -> Self {
        Self {
            segments,
            orientation,
            current,
        }
    }

    fn signed_current(&self) -> Scalar {
        self.current * self.orientation.sign()
    }

    fn validate(&self, min_segments: u32) -> Result<(), FieldError> {
        if self.segments < min_segments {
            return Err(FieldError::parameter(format!(
                "resolution must be at least {min_segments}, got {}",
                self.segments
            )));
        }
        finite("current", self.current)
    }
}

/// Saddle geometry of a Golay gradient coil.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GolayGeometry {
    /// Axial position of the inner arcs.
    pub a: Scalar,
    /// Axial position of the outer arcs.
    pub b: Scalar,
    /// Angular extent of each arc (rad).
    pub c: Scalar,
    /// Rotation of the coil about its axis (rad).
    pub theta: Scalar,
    /// Radius of the innermost turn.
    pub radius: Scalar,
    /// Radial step between turns.
    pub pitch: Scalar,
    /// Concentric turns per saddle.
    pub turns: u32,
}

fn finite(name: &str, value: Scalar) -> Result<(), FieldError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(FieldError::parameter(format!("{name} must be finite, got {value}")))
    }
}

fn positive(name: &str, value: Scalar) -> Result<(), FieldError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(FieldError::parameter(format!("{name} must be positive, got {value}")))
    }
}

fn non_negative(name: &str, value: Scalar) -> Result<(), FieldError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(FieldError::parameter(format!(
            "{name} must be non-negative, got {value}"
        )))
    }
}

fn finite_origin(origin: &R3) -> Result<(), FieldError> {
    if is_finite(origin) {
        Ok(())
    } else {
        Err(FieldError::parameter("origin must be finite"))
    }
}

/// Empty point buffer with room for `len` samples.
fn path_buffer(len: usize) -> Result<Vec<R3>, FieldError> {
    let mut path = Vec::new();
    path.try_reserve_exact(len)
        .map_err(|_| ResourceError::Allocation { elements: len })?;
    Ok(path)
}

/// Joins consecutive points of `path` into segments carrying `current`.
fn trace(staged: &mut WireList, path: &[R3], current: Scalar) -> Result<(), FieldError> {
    staged.try_reserve(path.len().saturating_sub(1))?;
    for pair in path.windows(2) {
        staged.append(pair[0], pair[1], current)?;
    }
    Ok(())
}

/// Copies a finished shape into `wires`.
fn commit(wires: &mut WireList, staged: &WireList, shape: &str) -> Result<(), FieldError> {
    wires.extend_from(staged)?;
    debug!(shape, segments = staged.len(), total = wires.len(), "appended shape");
    Ok(())
}

fn arc_path(
    origin: &R3,
    radius: Scalar,
    t1: Scalar,
    t2: Scalar,
    winding: &Winding,
) -> Result<Vec<R3>, FieldError> {
    let n = winding.segments;
    let mut path = path_buffer((n as usize).saturating_add(1))?;
    path.extend((0..=n).map(|k| {
        let t = t1 + (t2 - t1) * Scalar::from(k) / Scalar::from(n);
        winding.orientation.point(origin, radius, t, 0.0)
    }));
    Ok(path)
}

/// Circular arc of `radius` about `origin` from angle `t1` to `t2` (rad).
pub fn arc(
    wires: &mut WireList,
    origin: R3,
    radius: Scalar,
    t1: Scalar,
    t2: Scalar,
    winding: &Winding,
) -> Result<(), FieldError> {
    finite_origin(&origin)?;
    positive("radius", radius)?;
    finite("start angle", t1)?;
    finite("end angle", t2)?;
    if t1 == t2 {
        return Err(FieldError::parameter("arc start and end angles coincide"));
    }
    winding.validate(1)?;

    let mut staged = WireList::new();
    trace(
        &mut staged,
        &arc_path(&origin, radius, t1, t2, winding)?,
        winding.signed_current(),
    )?;
    commit(wires, &staged, "arc")
}

/// Closed circular loop of `radius` about `origin`.
///
/// Needs at least three segments; the last sample reuses the first exactly.
pub fn circle(
    wires: &mut WireList,
    origin: R3,
    radius: Scalar,
    winding: &Winding,
) -> Result<(), FieldError> {
    finite_origin(&origin)?;
    positive("radius", radius)?;
    winding.validate(3)?;

    let mut path = arc_path(&origin, radius, 0.0, TAU, winding)?;
    let first = path[0];
    if let Some(last) = path.last_mut() {
        *last = first;
    }

    let mut staged = WireList::new();
    trace(&mut staged, &path, winding.signed_current())?;
    commit(wires, &staged, "circle")
}

fn helix_path(
    origin: &R3,
    radius: Scalar,
    pitch: Scalar,
    turns: Scalar,
    winding: &Winding,
) -> Result<Vec<R3>, FieldError> {
    let n = Scalar::from(winding.segments);
    let total = (turns * n).round();
    if total < 1.0 || total > Scalar::from(u32::MAX) {
        return Err(FieldError::parameter(format!(
            "{turns} turns at {n} segments per turn gives no usable winding"
        )));
    }
    let total = total as u32;
    let centre = 0.5 * pitch * Scalar::from(total) / n;
    let mut path = path_buffer((total as usize).saturating_add(1))?;
    path.extend((0..=total).map(|k| {
        let frac = Scalar::from(k) / n;
        winding
            .orientation
            .point(origin, radius, TAU * frac, pitch * frac - centre)
    }));
    Ok(path)
}

fn helix_checked(
    staged: &mut WireList,
    origin: R3,
    radius: Scalar,
    pitch: Scalar,
    turns: Scalar,
    winding: &Winding,
) -> Result<(), FieldError> {
    let path = helix_path(&origin, radius, pitch, turns, winding)?;
    trace(staged, &path, winding.signed_current())
}

fn validate_helix(
    origin: &R3,
    radius: Scalar,
    pitch: Scalar,
    turns: Scalar,
    winding: &Winding,
) -> Result<(), FieldError> {
    finite_origin(origin)?;
    positive("radius", radius)?;
    non_negative("pitch", pitch)?;
    positive("turns", turns)?;
    winding.validate(3)
}

/// Helical winding centered axially on `origin`.
///
/// Each of the `round(turns * n)` segments advances the angle by `2π/n` and
/// the axial position by `pitch/n`; the winding spans `±pitch·turns/2`.
pub fn helix(
    wires: &mut WireList,
    origin: R3,
    radius: Scalar,
    pitch: Scalar,
    turns: Scalar,
    winding: &Winding,
) -> Result<(), FieldError> {
    validate_helix(&origin, radius, pitch, turns, winding)?;
    let mut staged = WireList::new();
    helix_checked(&mut staged, origin, radius, pitch, turns, winding)?;
    commit(wires, &staged, "helix")
}

/// Helmholtz pair: two identical helical coils at `±radius/2` along the
/// axis, wound in the same sense.
pub fn helmholtz(
    wires: &mut WireList,
    origin: R3,
    radius: Scalar,
    pitch: Scalar,
    turns: Scalar,
    winding: &Winding,
) -> Result<(), FieldError> {
    validate_helix(&origin, radius, pitch, turns, winding)?;
    let axis = winding.orientation.axis.unit();

    let mut staged = WireList::new();
    for side in [-0.5, 0.5] {
        let centre = origin + axis * (side * radius);
        helix_checked(&mut staged, centre, radius, pitch, turns, winding)?;
    }
    commit(wires, &staged, "helmholtz")
}

/// Turn ratio of each outer coil to the center coil of a Maxwell coil.
const MAXWELL_OUTER_RATIO: Scalar = 49.0 / 64.0;

/// Maxwell coil: a center coil of `radius` plus two outer coils of radius
/// `radius·√(4/7)` at `±radius·√(3/7)`, all on a common sphere.
///
/// The outer coils wind `turns·49/64` turns at the same current as the center
/// coil. With `n` segments per turn each outer coil gets `round(turns·49/64·n)`
/// segments, so the ratio is exact when `turns` is a multiple of 64.
pub fn maxwell(
    wires: &mut WireList,
    origin: R3,
    radius: Scalar,
    pitch: Scalar,
    turns: Scalar,
    winding: &Winding,
) -> Result<(), FieldError> {
    validate_helix(&origin, radius, pitch, turns, winding)?;
    let axis = winding.orientation.axis.unit();
    let outer_radius = radius * (4.0_f64 / 7.0).sqrt();
    let offset = radius * (3.0_f64 / 7.0).sqrt();
    let outer_turns = turns * MAXWELL_OUTER_RATIO;

    let mut staged = WireList::new();
    helix_checked(&mut staged, origin, radius, pitch, turns, winding)?;
    for side in [-1.0, 1.0] {
        helix_checked(
            &mut staged,
            origin + axis * (side * offset),
            outer_radius,
            pitch,
            outer_turns,
            winding,
        )?;
    }
    commit(wires, &staged, "maxwell")
}

/// Golay transverse-gradient coil: four saddle loops on a cylinder about the
/// orientation axis.
///
/// Saddles span the axial intervals `[a, b]` and `[-b, -a]` and the angular
/// intervals `φ₀ ± c/2` for `φ₀ ∈ {θ, θ + π}`. Each saddle is an arc at the
/// inner axial position, an axial connector, the return arc at the outer
/// position and a connector back. The `θ + π` saddles carry the opposite
/// current, which makes the axial field odd across the plane through the axis
/// perpendicular to `θ`, so it vanishes at `origin`. Each saddle has `turns`
/// concentric loops whose radius grows by `pitch`; `n` segments per arc.
pub fn golay(
    wires: &mut WireList,
    origin: R3,
    geometry: &GolayGeometry,
    winding: &Winding,
) -> Result<(), FieldError> {
    let GolayGeometry {
        a,
        b,
        c,
        theta,
        radius,
        pitch,
        turns,
    } = *geometry;
    finite_origin(&origin)?;
    non_negative("inner axial position a", a)?;
    positive("outer axial position b", b)?;
    if b <= a {
        return Err(FieldError::parameter(format!(
            "outer axial position b ({b}) must exceed inner position a ({a})"
        )));
    }
    positive("arc extent c", c)?;
    if c >= TAU {
        return Err(FieldError::parameter(format!(
            "arc extent c must be below 2π, got {c}"
        )));
    }
    finite("rotation", theta)?;
    positive("radius", radius)?;
    non_negative("pitch", pitch)?;
    if turns == 0 {
        return Err(FieldError::parameter("turns must be positive"));
    }
    winding.validate(1)?;

    let orient = winding.orientation;
    let n = winding.segments;
    let current = winding.signed_current();
    let mut path = path_buffer((n as usize).saturating_mul(2).saturating_add(3))?;
    let mut staged = WireList::new();

    for (phi0, sign) in [(theta, 1.0), (theta + PI, -1.0)] {
        for side in [1.0, -1.0] {
            let (inner, outer) = (side * a, side * b);
            for turn in 0..turns {
                let r = radius + pitch * Scalar::from(turn);
                path.clear();
                path.extend((0..=n).map(|k| {
                    let t = phi0 - 0.5 * c + c * Scalar::from(k) / Scalar::from(n);
                    orient.point(&origin, r, t, inner)
                }));
                path.extend((0..=n).map(|k| {
                    let t = phi0 + 0.5 * c - c * Scalar::from(k) / Scalar::from(n);
                    orient.point(&origin, r, t, outer)
                }));
                path.push(path[0]);
                trace(&mut staged, &path, current * sign)?;
            }
        }
    }
    commit(wires, &staged, "golay")
}

/// Planar square spiral in the xy plane about `origin`, counterclockwise
/// seen from `+z`.
///
/// Turn `k` starts at corner `origin + (−w/2 + k·p/2, −w/2 + k·p/2)` with side
/// `w − k·p` and emits four segments: right, up, left, then down to the next
/// turn's start corner.
pub fn square_spiral(
    wires: &mut WireList,
    origin: R3,
    width: Scalar,
    pitch: Scalar,
    turns: u32,
    current: Scalar,
) -> Result<(), FieldError> {
    finite_origin(&origin)?;
    positive("width", width)?;
    non_negative("pitch", pitch)?;
    finite("current", current)?;
    if turns == 0 {
        return Err(FieldError::parameter("turns must be positive"));
    }
    let last_side = width - pitch * Scalar::from(turns - 1);
    if last_side <= 0.0 {
        return Err(FieldError::parameter(format!(
            "{turns} turns at pitch {pitch} do not fit in width {width}"
        )));
    }

    let corner = |k: u32| {
        let inset = -0.5 * width + 0.5 * pitch * Scalar::from(k);
        origin + R3::new(inset, inset, 0.0)
    };
    let mut path = path_buffer((turns as usize).saturating_mul(4).saturating_add(1))?;
    for k in 0..turns {
        let c = corner(k);
        let s = width - pitch * Scalar::from(k);
        path.push(c);
        path.push(c + R3::new(s, 0.0, 0.0));
        path.push(c + R3::new(s, s, 0.0));
        path.push(c + R3::new(0.0, s, 0.0));
    }
    path.push(corner(turns));

    let mut staged = WireList::new();
    trace(&mut staged, &path, current)?;
    commit(wires, &staged, "square spiral")
}
