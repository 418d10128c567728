use crate::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// An infinite line through two points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub a: Point3,
    pub b: Point3,
}

impl Line {
    pub fn new(a: Point3, b: Point3) -> Self {
        Self { a, b }
    }

    /// Unnormalized direction `b - a`.
    pub fn direction(&self) -> Vector3 {
        self.b - self.a
    }

    /// Point at parameter `t`, with `t = 0` at `a` and `t = 1` at `b`.
    pub fn at(&self, t: f64) -> Point3 {
        self.a + self.direction() * t
    }

    pub fn length(&self) -> f64 {
        self.direction().length()
    }

    /// Closest point on the infinite line.
    pub fn closest_point(&self, point: Point3) -> Point3 {
        let d = self.direction();
        let len2 = d.length_squared();
        if len2 == 0.0 {
            return self.a;
        }
        let t = (point - self.a).dot(d) / len2;
        self.at(t)
    }

    pub fn distance_to_point(&self, point: Point3) -> f64 {
        (point - self.closest_point(point)).length()
    }

    pub fn reversed(&self) -> Self {
        Self::new(self.b, self.a)
    }
}
