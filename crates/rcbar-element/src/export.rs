//! Element report: created groups, their display layers and failures, as JSON.

use std::path::Path;

use log::debug;
use rcbar_core::{ElementId, RcbarError, Result};
use rcbar_model::{GroupId, HostModel};
use rcbar_profile::ProfileFamily;
use serde::{Deserialize, Serialize};

use crate::assembler::GroupFailure;
use crate::element::{Element, ElementState};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupEntry {
    pub id: GroupId,
    pub method: String,
}

/// Display layer of every face of one group, in face order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerEntry {
    pub group: GroupId,
    pub layers: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementReport {
    pub element: ElementId,
    pub family: ProfileFamily,
    pub state: ElementState,
    pub groups: Vec<GroupEntry>,
    pub layers: Vec<LayerEntry>,
    pub failures: Vec<GroupFailure>,
}

impl ElementReport {
    /// Snapshot of `element` as the host currently stores its groups.
    ///
    /// Groups the host no longer knows are left out.
    pub fn collect<M: HostModel>(element: &Element, model: &M) -> Self {
        let mut groups = Vec::new();
        let mut layers = Vec::new();
        for &(kind, id) in element.groups() {
            let Some(group) = model.group(id) else {
                continue;
            };
            groups.push(GroupEntry {
                id,
                method: kind.method_name(),
            });
            layers.push(LayerEntry {
                group: id,
                layers: group.face_layers(),
            });
        }
        Self {
            element: element.id(),
            family: element.config().family(),
            state: element.state(),
            groups,
            layers,
            failures: element.failures().to_vec(),
        }
    }

    pub fn layers_of(&self, id: GroupId) -> Option<&[u32]> {
        self.layers
            .iter()
            .find(|entry| entry.group == id)
            .map(|entry| entry.layers.as_slice())
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| RcbarError::Parse(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| RcbarError::Parse(e.to_string()))
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_json()?)?;
        debug!("{}: report written to {}", self.element, path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synth::fixtures;
    use rcbar_model::MemoryModel;

    fn footing_report() -> (ElementReport, MemoryModel) {
        let map = fixtures::footing_map().with("FTT_Layer", 3);
        let mut element = Element::new(fixtures::config(ProfileFamily::Footing, map));
        let mut model = MemoryModel::new();
        element.build_profile().unwrap();
        let report = element.assemble(&mut model).unwrap();
        (report, model)
    }

    #[test]
    fn test_layers_per_face() {
        let (report, model) = footing_report();
        assert_eq!(report.family, ProfileFamily::Footing);
        assert_eq!(report.groups.len(), report.layers.len());
        let top = report
            .groups
            .iter()
            .find(|g| g.method == "FootingTopTransverse_0")
            .unwrap();
        assert_eq!(report.layers_of(top.id), Some(&[3, 3, 3][..]));
        for entry in &report.layers {
            assert_eq!(entry.layers.len(), model.group(entry.group).unwrap().faces.len());
        }
    }

    #[test]
    fn test_json_file() {
        let (report, _) = footing_report();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        report.write_json(&path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("FootingBottomTransverse_0"));
        assert_eq!(ElementReport::from_json(&text).unwrap(), report);
    }

    #[test]
    fn test_bad_json() {
        assert!(matches!(
            ElementReport::from_json("{\"element\": 1"),
            Err(RcbarError::Parse(_))
        ));
    }
}
