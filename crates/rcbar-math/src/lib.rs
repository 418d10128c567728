//! RCBar geometry kernel.
//!
//! Everything here is a pure function of its inputs.

pub mod intersect;
pub mod line;
pub mod ops;
pub mod plane;
pub mod transform;

pub use glam::{dvec3, DMat4, DVec3};

pub use intersect::{extended_intersect, intersect_line_plane};
pub use line::Line;
pub use ops::{
    direction, distance, lerp, offset, polygon_normal, project_to_plane, translate, vector_between,
};
pub use plane::Plane;
pub use transform::Transform;

pub type Point3 = DVec3;
pub type Vector3 = DVec3;
