use crate::{DMat4, Point3, Vector3};
use serde::{Deserialize, Serialize};

/// Affine transform applied to profile stations.
///
/// Only translations and the lateral mirror are ever built, so the inverse is
/// always defined.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Transform {
    pub matrix: [f64; 16],
}

impl Transform {
    pub fn identity() -> Self {
        Self::from_mat4(DMat4::IDENTITY)
    }

    pub fn from_translation(t: Vector3) -> Self {
        Self::from_mat4(DMat4::from_translation(t))
    }

    /// Mirror across the XY plane (Z -> -Z).
    pub fn mirror_z() -> Self {
        Self::from_mat4(DMat4::from_scale(Vector3::new(1.0, 1.0, -1.0)))
    }

    pub fn from_mat4(m: DMat4) -> Self {
        Self {
            matrix: m.to_cols_array(),
        }
    }

    pub fn to_mat4(&self) -> DMat4 {
        DMat4::from_cols_array(&self.matrix)
    }

    pub fn transform_point(&self, p: Point3) -> Point3 {
        self.to_mat4().transform_point3(p)
    }

    /// `self` followed by `other`.
    pub fn then(&self, other: &Transform) -> Transform {
        Self::from_mat4(other.to_mat4() * self.to_mat4())
    }

    /// Whether the transform flips handedness (reverses polygon winding).
    pub fn is_reflection(&self) -> bool {
        self.to_mat4().determinant() < 0.0
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::dvec3;

    #[test]
    fn test_translation() {
        let t = Transform::from_translation(dvec3(6000.0, 0.0, 0.0));
        let p = dvec3(0.0, -1000.0, 650.0);
        assert_eq!(t.transform_point(p), dvec3(6000.0, -1000.0, 650.0));
    }

    #[test]
    fn test_mirror_then_translate() {
        let t = Transform::mirror_z().then(&Transform::from_translation(dvec3(0.0, 0.0, 10.0)));
        let p = t.transform_point(dvec3(1.0, 2.0, 3.0));
        assert!((p - dvec3(1.0, 2.0, 7.0)).length() < 1e-12);
        assert!(t.is_reflection());
        assert!(!Transform::identity().is_reflection());
    }
}
