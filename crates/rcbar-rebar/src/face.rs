//! Generating faces.

use rcbar_core::{RcbarError, Result, Tolerance, Validate};
use rcbar_math::{polygon_normal, Line, Point3, Transform, Vector3};
use serde::{Deserialize, Serialize};

/// Closed polygon defining one leg of a bent bar.
///
/// A face is a snapshot: it is copied into the group that uses it and never
/// follows later profile changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratingFace {
    points: Vec<Point3>,
}

impl GeneratingFace {
    pub fn new(points: Vec<Point3>) -> Result<Self> {
        let face = Self { points };
        face.validate()?;
        Ok(face)
    }

    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Unit normal following the winding.
    pub fn normal(&self) -> Option<Vector3> {
        polygon_normal(&self.points)
    }

    /// Closed edge loop, last vertex back to the first.
    pub fn edges(&self) -> impl Iterator<Item = Line> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| Line::new(self.points[i], self.points[(i + 1) % n]))
    }

    pub fn area(&self) -> f64 {
        let n = self.points.len();
        let mut cross = Vector3::ZERO;
        for i in 0..n {
            cross += self.points[i].cross(self.points[(i + 1) % n]);
        }
        cross.length() * 0.5
    }

    pub fn is_planar(&self, tol: Tolerance) -> bool {
        let Some(normal) = self.normal() else {
            return false;
        };
        let origin = self.points[0];
        self.points
            .iter()
            .all(|p| (*p - origin).dot(normal).abs() <= tol.linear * (1.0 + p.abs().max_element()))
    }

    pub fn reversed(&self) -> Self {
        let mut points = self.points.clone();
        points.reverse();
        Self { points }
    }

    /// Transformed face; a reflection reverses the vertex order so that the
    /// winding stays consistent.
    pub fn transformed(&self, transform: &Transform) -> Self {
        let mut points: Vec<Point3> = self
            .points
            .iter()
            .map(|&p| transform.transform_point(p))
            .collect();
        if transform.is_reflection() {
            points.reverse();
        }
        Self { points }
    }
}

impl Validate for GeneratingFace {
    fn validate(&self) -> Result<()> {
        if self.points.len() < 3 {
            return Err(RcbarError::degenerate(format!(
                "generating face needs at least 3 points, got {}",
                self.points.len()
            )));
        }
        if self.normal().is_none() {
            return Err(RcbarError::degenerate(format!(
                "generating face at {} has no area",
                self.points[0]
            )));
        }
        Ok(())
    }
}
