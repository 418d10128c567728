//! Vertex chains.
//!
//! A station is built by walking its boundary: each vertex is the previous
//! one plus a signed offset taken from one input dimension. A few vertices are
//! pinned to absolute coordinates (the top and bottom faces) instead.

use rcbar_core::{RcbarError, Result};
use rcbar_math::Point3;

use crate::section::CrossSection;

#[derive(Debug, Clone)]
pub struct Chain {
    points: Vec<Point3>,
}

impl Chain {
    pub fn start(y: f64, z: f64) -> Self {
        Self {
            points: vec![Point3::new(0.0, y, z)],
        }
    }

    pub fn last(&self) -> Point3 {
        // A chain always holds its start point.
        self.points[self.points.len() - 1]
    }

    /// Next vertex `dy` above the previous one.
    pub fn rise(self, dy: f64) -> Self {
        self.step(dy, 0.0)
    }

    /// Next vertex `dz` across from the previous one.
    pub fn across(self, dz: f64) -> Self {
        self.step(0.0, dz)
    }

    pub fn step(mut self, dy: f64, dz: f64) -> Self {
        let p = self.last();
        self.points.push(Point3::new(p.x, p.y + dy, p.z + dz));
        self
    }

    /// Next vertex at absolute height `y`, same lateral position.
    pub fn up_to(mut self, y: f64) -> Self {
        let p = self.last();
        self.points.push(Point3::new(p.x, y, p.z));
        self
    }

    /// Next vertex at an absolute position.
    pub fn to(mut self, y: f64, z: f64) -> Self {
        let p = self.last();
        self.points.push(Point3::new(p.x, y, z));
        self
    }

    /// Close the chain, checking the family cardinality.
    pub fn finish(self, cardinality: usize) -> Result<CrossSection> {
        if self.points.len() != cardinality {
            return Err(RcbarError::InvalidState(format!(
                "chain produced {} vertices, expected {cardinality}",
                self.points.len()
            )));
        }
        Ok(CrossSection::new(self.points))
    }
}
