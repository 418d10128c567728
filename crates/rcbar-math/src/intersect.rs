//! Line-plane intersections.
//!
//! Profile edges are frequently almost, but not exactly, parallel to the
//! construction planes they are cut with, because upstream dimensions are
//! rounded. [`extended_intersect`] relaxes the parallelism threshold step by
//! step for those call sites; [`intersect_line_plane`] never does.

use rcbar_core::{RcbarError, Result, Tolerance};

use crate::line::Line;
use crate::plane::Plane;
use crate::Point3;

/// Exact line-plane intersection.
///
/// Fails with `DegenerateGeometry` when the line direction is orthogonal to
/// the plane normal within `tol.angular`, or when the line has no length.
pub fn intersect_line_plane(line: &Line, plane: &Plane, tol: Tolerance) -> Result<Point3> {
    let cos = direction_cosine(line, plane)?;
    if cos.abs() < tol.angular {
        return Err(RcbarError::degenerate(format!(
            "line {} -> {} is parallel to plane at {}",
            line.a, line.b, plane.origin
        )));
    }
    solve(line, plane)
}

/// Line-plane intersection that tolerates near-parallel configurations.
///
/// The angular threshold is relaxed by [`Tolerance::RELAXATION`] per step, for
/// at most `max_iterations` steps, before giving up.
pub fn extended_intersect(
    line: &Line,
    plane: &Plane,
    max_iterations: u32,
    tol: Tolerance,
) -> Result<Point3> {
    let cos = direction_cosine(line, plane)?;
    for step in 0..=max_iterations {
        if cos.abs() >= tol.relaxed(step).angular {
            return solve(line, plane);
        }
    }
    Err(RcbarError::degenerate(format!(
        "line {} -> {} stays parallel to plane at {} after {} relaxation steps",
        line.a, line.b, plane.origin, max_iterations
    )))
}

fn direction_cosine(line: &Line, plane: &Plane) -> Result<f64> {
    let unit = line
        .direction()
        .try_normalize()
        .ok_or_else(|| RcbarError::degenerate("intersection line has zero length"))?;
    Ok(unit.dot(plane.normal))
}

fn solve(line: &Line, plane: &Plane) -> Result<Point3> {
    let dir = line.direction();
    let t = -plane.signed_distance(line.a) / dir.dot(plane.normal);
    let point = line.at(t);
    if !point.is_finite() {
        return Err(RcbarError::degenerate("intersection is not finite"));
    }
    Ok(point)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Vector3;
    use approx::assert_relative_eq;
    use glam::dvec3;

    #[test]
    fn test_intersect_axis_line() {
        let plane = Plane::from_normal(dvec3(0.0, 0.0, 5.0), Vector3::Z).unwrap();
        let line = Line::new(dvec3(1.0, 2.0, 0.0), dvec3(1.0, 2.0, 1.0));
        let p = intersect_line_plane(&line, &plane, Tolerance::default()).unwrap();
        assert_relative_eq!(p.z, 5.0);
        assert_relative_eq!(p.x, 1.0);
        assert_relative_eq!(p.y, 2.0);
    }

    #[test]
    fn test_intersection_through_origin_is_origin() {
        let origin = dvec3(120.0, -340.0, 75.0);
        let plane = Plane::from_normal(origin, dvec3(0.3, 1.0, -0.2)).unwrap();
        let line = Line::new(origin - dvec3(5.0, 7.0, 1.0), origin + dvec3(5.0, 7.0, 1.0));
        let p = intersect_line_plane(&line, &plane, Tolerance::default()).unwrap();
        assert!((p - origin).length() < 1e-9);
    }

    #[test]
    fn test_parallel_line_is_degenerate() {
        let plane = Plane::from_normal(Point3::ZERO, Vector3::Z).unwrap();
        let line = Line::new(dvec3(0.0, 0.0, 1.0), dvec3(1.0, 0.0, 1.0));
        assert!(matches!(
            intersect_line_plane(&line, &plane, Tolerance::default()),
            Err(RcbarError::DegenerateGeometry(_))
        ));
        assert!(extended_intersect(&line, &plane, 5, Tolerance::default()).is_err());
    }

    #[test]
    fn test_extended_accepts_nearly_parallel() {
        let plane = Plane::from_normal(Point3::ZERO, Vector3::Z).unwrap();
        // cos ~ 1e-10: below the default threshold, above it after two steps.
        let line = Line::new(dvec3(0.0, 0.0, 1.0), dvec3(1.0, 0.0, 1.0 - 1e-10));
        assert!(intersect_line_plane(&line, &plane, Tolerance::default()).is_err());
        let p = extended_intersect(&line, &plane, 2, Tolerance::default()).unwrap();
        assert!(p.z.abs() < 1e-6);
        assert!(extended_intersect(&line, &plane, 0, Tolerance::default()).is_err());
    }
}
