//! Direction ↔ cube-face chart projection.
//!
//! Face-local coordinates span `[-scale, scale]` on both axes with the face
//! centre at the origin. Positions that fall past a face edge are folded
//! back with a `2 - ratio` correction so that points beyond the neighbouring
//! face's far corner wrap smoothly instead of running off to infinity.

use std::f64::consts::FRAC_1_SQRT_2;

use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};

use crate::CubeFace;

/// Smallest component along a face normal (in world units) that still
/// projects onto that face.
pub const MIN_FACE_DEPTH: f64 = 1.0;

/// Orientation of the cube the face charts are cut from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ChartFrame {
    /// Faces aligned with the planet axes.
    #[default]
    Aligned,
    /// Faces rotated 45° about the polar (Y) axis, putting the
    /// equatorial seams through face centres.
    Rotated45,
}

impl ChartFrame {
    /// Express a planet-local direction in this frame's cube coordinates.
    #[inline]
    #[must_use]
    pub fn to_chart(self, dir: DVec3) -> DVec3 {
        match self {
            ChartFrame::Aligned => dir,
            ChartFrame::Rotated45 => DVec3::new(
                (dir.x - dir.z) * FRAC_1_SQRT_2,
                dir.y,
                (dir.z + dir.x) * FRAC_1_SQRT_2,
            ),
        }
    }

    /// Inverse of [`ChartFrame::to_chart`].
    #[inline]
    #[must_use]
    pub fn from_chart(self, dir: DVec3) -> DVec3 {
        match self {
            ChartFrame::Aligned => dir,
            ChartFrame::Rotated45 => DVec3::new(
                (dir.x + dir.z) * FRAC_1_SQRT_2,
                dir.y,
                (dir.z - dir.x) * FRAC_1_SQRT_2,
            ),
        }
    }
}

/// Select the face a direction falls on.
///
/// The dominant axis wins. Ties go to the equatorial faces over the poles
/// and to the Z faces over the X faces.
fn select_face(c: DVec3) -> CubeFace {
    let xz_max = c.x.abs().max(c.z.abs());
    if c.y > xz_max {
        CubeFace::Up
    } else if c.y < -xz_max {
        CubeFace::Down
    } else if c.x.abs() > c.z.abs() {
        if c.x > 0.0 { CubeFace::Left } else { CubeFace::Right }
    } else if c.z > 0.0 {
        CubeFace::Back
    } else {
        CubeFace::Front
    }
}

/// Perspective-divide `c` onto `face` and apply the edge fold.
fn divide_and_fold(c: DVec3, face: CubeFace, depth: f64, scale: f64) -> DVec2 {
    let div = scale / depth;
    let mut x = c.dot(face.tangent()) * div;
    let mut y = c.dot(face.bitangent()) * div;

    if x.abs() > scale {
        let ratio = scale / x.abs();
        x = scale * (2.0 - ratio) * x.signum();
        y *= ratio;
    }
    if y.abs() > scale {
        let ratio = scale / y.abs();
        x *= ratio;
        y = scale * (2.0 - ratio) * y.signum();
    }

    DVec2::new(x, y)
}

/// Project a planet-local direction onto whichever face of `frame` it hits.
///
/// Returns `None` for a zero or non-finite direction. Both returned
/// components lie in `[-scale, scale]`.
#[must_use]
pub fn project_to_cube(dir: DVec3, scale: f64, frame: ChartFrame) -> Option<(CubeFace, DVec2)> {
    if !dir.is_finite() || dir == DVec3::ZERO {
        return None;
    }
    let c = frame.to_chart(dir);
    let face = select_face(c);
    let depth = c.dot(face.normal());
    Some((face, divide_and_fold(c, face, depth, scale)))
}

/// Project a planet-local position onto a fixed face of `frame`.
///
/// Returns `None` when the position lies within [`MIN_FACE_DEPTH`] of the
/// face's back plane (the wrong hemisphere of the cube). Positions off the
/// face edge are folded, so results can reach `±2 * scale`.
#[must_use]
pub fn project_to_face(dir: DVec3, face: CubeFace, scale: f64, frame: ChartFrame) -> Option<DVec2> {
    if !dir.is_finite() {
        return None;
    }
    let c = frame.to_chart(dir);
    let depth = c.dot(face.normal());
    if depth <= MIN_FACE_DEPTH {
        return None;
    }
    Some(divide_and_fold(c, face, depth, scale))
}

/// Map a face-local coordinate back to a planet-local direction.
///
/// The result lies on the cube of half-size `scale`; normalise it if a
/// unit direction is needed.
#[inline]
#[must_use]
pub fn unproject_face(face: CubeFace, x: f64, y: f64, scale: f64, frame: ChartFrame) -> DVec3 {
    let c = face.normal() * scale + face.tangent() * x + face.bitangent() * y;
    frame.from_chart(c)
}
