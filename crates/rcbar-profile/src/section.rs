//! One longitudinal station of a profile.

use std::ops::Index;

use rcbar_math::{Line, Point3, Transform, Vector3};
use serde::{Deserialize, Serialize};

/// Ordered vertex list of one station.
///
/// Vertex `k` of one station corresponds topologically to vertex `k` of every
/// other station of the same profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossSection {
    points: Vec<Point3>,
}

impl CrossSection {
    pub fn new(points: Vec<Point3>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    pub fn get(&self, index: usize) -> Option<Point3> {
        self.points.get(index).copied()
    }

    /// Longitudinal coordinate of the station (X of vertex 0).
    pub fn x(&self) -> f64 {
        self.points.first().map_or(0.0, |p| p.x)
    }

    /// Edge from vertex `from` to vertex `to` as an infinite line.
    pub fn edge(&self, from: usize, to: usize) -> Line {
        Line::new(self.points[from], self.points[to])
    }

    /// Every vertex moved by `delta`.
    pub fn translated(&self, delta: Vector3) -> Self {
        Self {
            points: self.points.iter().map(|&p| p + delta).collect(),
        }
    }

    pub fn transformed(&self, transform: &Transform) -> Self {
        Self {
            points: self
                .points
                .iter()
                .map(|&p| transform.transform_point(p))
                .collect(),
        }
    }

    /// Shear the station so that each vertex sits at `x + z * ratio`.
    pub fn skewed(&self, ratio: f64) -> Self {
        Self {
            points: self
                .points
                .iter()
                .map(|&p| Point3::new(p.x + p.z * ratio, p.y, p.z))
                .collect(),
        }
    }

    /// Vertical extent of the station.
    pub fn height(&self) -> f64 {
        let (lo, hi) = self
            .points
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
                (lo.min(p.y), hi.max(p.y))
            });
        if lo.is_finite() {
            hi - lo
        } else {
            0.0
        }
    }

    /// Lateral extent of the station.
    pub fn width(&self) -> f64 {
        let (lo, hi) = self
            .points
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
                (lo.min(p.z), hi.max(p.z))
            });
        if lo.is_finite() {
            hi - lo
        } else {
            0.0
        }
    }
}

impl Index<usize> for CrossSection {
    type Output = Point3;

    fn index(&self, index: usize) -> &Point3 {
        &self.points[index]
    }
}
