//! Point and vector helpers.

use rcbar_core::{RcbarError, Result};

use crate::plane::Plane;
use crate::{Point3, Vector3};

/// `b - a`, not normalized.
pub fn vector_between(a: Point3, b: Point3) -> Vector3 {
    b - a
}

/// `p + dir * distance` with `dir` used as given.
///
/// Use [`offset`] when `distance` is a literal length.
pub fn translate(p: Point3, dir: Vector3, distance: f64) -> Point3 {
    p + dir * distance
}

/// Move `p` by exactly `distance` along `dir`.
pub fn offset(p: Point3, dir: Vector3, distance: f64) -> Result<Point3> {
    let unit = dir
        .try_normalize()
        .ok_or_else(|| RcbarError::degenerate("cannot offset along a zero-length vector"))?;
    Ok(p + unit * distance)
}

/// Unit vector from `a` towards `b`.
pub fn direction(a: Point3, b: Point3) -> Result<Vector3> {
    vector_between(a, b)
        .try_normalize()
        .ok_or_else(|| RcbarError::degenerate(format!("coincident points {a} and {b}")))
}

pub fn distance(a: Point3, b: Point3) -> f64 {
    (b - a).length()
}

pub fn project_to_plane(p: Point3, plane: &Plane) -> Point3 {
    plane.project_point(p)
}

/// Unit normal of a closed polygon (Newell's method).
///
/// The normal follows the winding: a polygon listed counter-clockwise when
/// seen from the tip of the normal. `None` for polygons without area.
pub fn polygon_normal(points: &[Point3]) -> Option<Vector3> {
    let n = points.len();
    if n < 3 {
        return None;
    }
    let mut normal = Vector3::ZERO;
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        normal.x += (a.y - b.y) * (a.z + b.z);
        normal.y += (a.z - b.z) * (a.x + b.x);
        normal.z += (a.x - b.x) * (a.y + b.y);
    }
    normal.try_normalize()
}

/// Point at fraction `t` between `a` and `b`.
pub fn lerp(a: Point3, b: Point3, t: f64) -> Point3 {
    a + (b - a) * t
}
