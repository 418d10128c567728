use std::collections::BTreeMap;

use rcbar_core::{RcbarError, Result, Validate};
use rcbar_math::Transform;
use serde::{Deserialize, Serialize};

use crate::face::GeneratingFace;
use crate::guideline::PlacementGuideline;
use crate::modifier::Modifier;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarProperties {
    pub diameter: f64,
    pub grade: String,
    pub bending_radius: f64,
}

impl BarProperties {
    pub fn new(diameter: f64, grade: impl Into<String>, bending_radius: f64) -> Self {
        Self {
            diameter,
            grade: grade.into(),
            bending_radius,
        }
    }
}

/// A set of bent bars: faces, a guideline and the modifiers applied after
/// insertion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReinforcementGroup {
    pub name: String,
    pub faces: Vec<GeneratingFace>,
    pub guideline: PlacementGuideline,
    pub modifiers: Vec<Modifier>,
    pub properties: BarProperties,
    pub layer_order: u32,
    /// Display layer per face index.
    pub layers: BTreeMap<usize, u32>,
}

impl ReinforcementGroup {
    pub fn new(
        name: impl Into<String>,
        properties: BarProperties,
        guideline: PlacementGuideline,
    ) -> Self {
        Self {
            name: name.into(),
            faces: Vec::new(),
            guideline,
            modifiers: Vec::new(),
            properties,
            layer_order: 0,
            layers: BTreeMap::new(),
        }
    }

    /// Append a face on display layer `layer`.
    pub fn with_face(mut self, face: GeneratingFace, layer: u32) -> Self {
        self.layers.insert(self.faces.len(), layer);
        self.faces.push(face);
        self
    }

    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.modifiers.push(modifier);
        self
    }

    pub fn with_layer_order(mut self, layer_order: u32) -> Self {
        self.layer_order = layer_order;
        self
    }

    pub fn diameter(&self) -> f64 {
        self.properties.diameter
    }

    /// Replace every face, keeping each index's display layer where the
    /// index still exists.
    pub fn replace_faces(&mut self, faces: Vec<GeneratingFace>) {
        let fallback = self.layers.get(&0).copied().unwrap_or(0);
        self.layers = (0..faces.len())
            .map(|i| (i, self.layers.get(&i).copied().unwrap_or(fallback)))
            .collect();
        self.faces = faces;
    }

    /// Layer of each face in face order.
    pub fn face_layers(&self) -> Vec<u32> {
        (0..self.faces.len())
            .map(|i| self.layers.get(&i).copied().unwrap_or(0))
            .collect()
    }

    pub fn transformed(&self, transform: &Transform) -> Self {
        Self {
            faces: self.faces.iter().map(|f| f.transformed(transform)).collect(),
            guideline: self.guideline.transformed(transform),
            modifiers: self.modifiers.iter().map(|m| m.transformed(transform)).collect(),
            ..self.clone()
        }
    }
}

impl Validate for ReinforcementGroup {
    fn validate(&self) -> Result<()> {
        if self.faces.is_empty() {
            return Err(RcbarError::degenerate(format!("group {} has no faces", self.name)));
        }
        if !(self.properties.diameter > 0.0) {
            return Err(RcbarError::parameter(format!(
                "group {}: diameter {} must be positive",
                self.name, self.properties.diameter
            )));
        }
        if self.properties.bending_radius < 0.0 {
            return Err(RcbarError::parameter(format!(
                "group {}: bending radius must not be negative",
                self.name
            )));
        }
        if let Some(index) = self.layers.keys().find(|&&i| i >= self.faces.len()) {
            return Err(RcbarError::InvalidState(format!(
                "group {}: layer entry for missing face {index}",
                self.name
            )));
        }
        for face in &self.faces {
            face.validate()?;
        }
        for modifier in &self.modifiers {
            modifier.validate()?;
        }
        self.guideline.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spacing::SpacingRule;
    use rcbar_math::dvec3;

    fn face(z: f64) -> GeneratingFace {
        GeneratingFace::new(vec![
            dvec3(0.0, 0.0, z),
            dvec3(0.0, 400.0, z),
            dvec3(6000.0, 400.0, z),
            dvec3(6000.0, 0.0, z),
        ])
        .unwrap()
    }

    fn group() -> ReinforcementGroup {
        let guideline = PlacementGuideline::new(
            dvec3(0.0, 0.0, 0.0),
            dvec3(6000.0, 0.0, 0.0),
            SpacingRule::exact(200.0),
        )
        .unwrap();
        ReinforcementGroup::new("OuterVertical", BarProperties::new(16.0, "B500B", 32.0), guideline)
            .with_face(face(0.0), 2)
            .with_face(face(300.0), 3)
    }

    #[test]
    fn test_layers_follow_faces() {
        let mut g = group();
        g.validate().unwrap();
        assert_eq!(g.face_layers(), vec![2, 3]);
        g.replace_faces(vec![face(10.0), face(20.0), face(30.0)]);
        assert_eq!(g.face_layers(), vec![2, 3, 2]);
        g.replace_faces(vec![face(10.0)]);
        assert_eq!(g.face_layers(), vec![2]);
        g.validate().unwrap();
    }

    #[test]
    fn test_invalid_group() {
        let mut g = group();
        g.properties.diameter = 0.0;
        assert!(g.validate().is_err());
        let mut g = group();
        g.faces.clear();
        assert!(g.validate().is_err());
    }
}
