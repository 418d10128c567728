use rcbar_core::{RcbarError, Result};
use serde::{Deserialize, Serialize};

use crate::{Point3, Vector3};

/// A plane in 3D space defined by a point and unit normal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Plane {
    pub origin: Point3,
    pub normal: Vector3,
}

impl Plane {
    /// Plane through `origin` with the given normal.
    pub fn from_normal(origin: Point3, normal: Vector3) -> Result<Self> {
        let normal = normal
            .try_normalize()
            .ok_or_else(|| RcbarError::degenerate("plane normal has zero length"))?;
        Ok(Self { origin, normal })
    }

    /// Plane through `origin` spanned by two in-plane directions.
    pub fn from_directions(origin: Point3, u: Vector3, v: Vector3) -> Result<Self> {
        let normal = u.cross(v);
        if normal.length_squared() == 0.0 {
            return Err(RcbarError::degenerate(format!(
                "plane directions {u} and {v} are parallel"
            )));
        }
        Self::from_normal(origin, normal)
    }

    pub fn from_points(a: Point3, b: Point3, c: Point3) -> Result<Self> {
        Self::from_directions(a, b - a, c - a)
    }

    pub fn yz_at(x: f64) -> Self {
        Self {
            origin: Point3::new(x, 0.0, 0.0),
            normal: Vector3::X,
        }
    }

    /// Signed distance from a point to this plane.
    pub fn signed_distance(&self, point: Point3) -> f64 {
        (point - self.origin).dot(self.normal)
    }

    /// Project a point onto this plane.
    pub fn project_point(&self, point: Point3) -> Point3 {
        point - self.normal * self.signed_distance(point)
    }

    /// The same plane moved by `distance` along its normal.
    pub fn offset(&self, distance: f64) -> Self {
        Self {
            origin: self.origin + self.normal * distance,
            normal: self.normal,
        }
    }

    /// Flip the normal so that `point` lies on the positive side.
    pub fn facing(self, point: Point3) -> Self {
        if self.signed_distance(point) < 0.0 {
            Self {
                origin: self.origin,
                normal: -self.normal,
            }
        } else {
            self
        }
    }
}
