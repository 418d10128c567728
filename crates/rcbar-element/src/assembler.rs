//! Registers synthesized groups with a host model.
//!
//! Every group is inserted and committed before its modifiers are attached,
//! and every modifier insert is committed on its own, so modifiers always
//! refer to a persisted group.

use log::error;
use rcbar_core::{ElementId, RcbarError, Result};
use rcbar_model::{GroupId, HostModel, CREATING_METHOD, PARENT_ELEMENT};
use rcbar_rebar::{Modifier, ReinforcementGroup};
use serde::{Deserialize, Serialize};

use crate::kind::GroupKind;

/// A group that could not be created, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupFailure {
    pub method: String,
    pub reason: String,
}

impl GroupFailure {
    pub fn new(kind: GroupKind, err: &RcbarError) -> Self {
        Self {
            method: kind.method_name(),
            reason: err.to_string(),
        }
    }
}

pub struct Assembler<'m, M: HostModel> {
    model: &'m mut M,
    element: ElementId,
}

impl<'m, M: HostModel> Assembler<'m, M> {
    pub fn new(model: &'m mut M, element: ElementId) -> Self {
        Self { model, element }
    }

    /// Insert `group` as `kind` of this element, tag it and attach its
    /// modifiers.
    ///
    /// A rejected group insert fails with `InsertFailed`. A rejected modifier
    /// removes the half-built group again and fails the same way.
    pub fn assemble(&mut self, kind: GroupKind, group: &ReinforcementGroup) -> Result<GroupId> {
        let method = kind.method_name();
        let Some(id) = self.model.insert(group) else {
            error!("{}: host rejected group {method}", self.element);
            return Err(RcbarError::InsertFailed(method));
        };
        self.model.commit();
        self.model
            .set_user_property(id, PARENT_ELEMENT, self.element.into());
        self.model
            .set_user_property(id, CREATING_METHOD, method.as_str().into());

        for modifier in &group.modifiers {
            if !self.model.insert_modifier(id, modifier) {
                error!(
                    "{}: host rejected {} modifier of {method}",
                    self.element,
                    modifier.kind_name()
                );
                self.model.delete(id);
                self.model.commit();
                return Err(RcbarError::InsertFailed(format!(
                    "{method} ({} modifier)",
                    modifier.kind_name()
                )));
            }
            self.model.commit();
        }
        Ok(id)
    }

    /// Replace the stored group `id`, modifiers included.
    pub fn replace(&mut self, id: GroupId, group: &ReinforcementGroup) -> Result<()> {
        if !self.model.modify(id, group) {
            error!("{}: host rejected edit of {}", self.element, group.name);
            return Err(RcbarError::InsertFailed(format!("modify {}", group.name)));
        }
        self.model.commit();
        Ok(())
    }

    /// Attach one more modifier to an existing group.
    pub fn add_modifier(&mut self, id: GroupId, modifier: &Modifier) -> Result<()> {
        if !self.model.insert_modifier(id, modifier) {
            error!("{}: host rejected {} modifier", self.element, modifier.kind_name());
            return Err(RcbarError::InsertFailed(modifier.kind_name().to_string()));
        }
        self.model.commit();
        Ok(())
    }

    pub fn remove(&mut self, id: GroupId) -> bool {
        let removed = self.model.delete(id);
        if removed {
            self.model.commit();
        }
        removed
    }

    /// This element's group created by `kind`, if any.
    pub fn find(&self, kind: GroupKind) -> Option<GroupId> {
        self.model.find_method(self.element, &kind.method_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::AbutmentGroup;
    use rcbar_math::dvec3;
    use rcbar_model::{MemoryModel, Transaction};
    use rcbar_rebar::{
        BarProperties, GeneratingFace, HookShape, PlacementGuideline, ReferenceCurve, SpacingRule,
    };

    fn group(name: &str) -> ReinforcementGroup {
        let face = GeneratingFace::new(vec![
            dvec3(0.0, -1000.0, 650.0),
            dvec3(0.0, -600.0, 650.0),
            dvec3(6000.0, -600.0, 650.0),
            dvec3(6000.0, -1000.0, 650.0),
        ])
        .unwrap();
        let guideline = PlacementGuideline::new(
            dvec3(0.0, -1000.0, 650.0),
            dvec3(6000.0, -1000.0, 650.0),
            SpacingRule::exact(200.0),
        )
        .unwrap();
        let top = ReferenceCurve::segment(dvec3(0.0, -600.0, 650.0), dvec3(6000.0, -600.0, 650.0))
            .unwrap();
        ReinforcementGroup::new(name, BarProperties::new(16.0, "B500B", 32.0), guideline)
            .with_face(face, 0)
            .with_modifier(Modifier::hook(HookShape::Deg90, top.clone()))
            .with_modifier(Modifier::leg_length(-50.0, top))
    }

    const OVR: GroupKind = GroupKind::Abutment(AbutmentGroup::OuterVertical);

    #[test]
    fn test_insert_commit_then_modifiers() {
        let mut model = MemoryModel::new();
        let element = ElementId::new();
        let id = Assembler::new(&mut model, element)
            .assemble(OVR, &group("OuterVertical"))
            .unwrap();

        let journal = model.journal();
        assert!(matches!(journal[0], Transaction::Insert { .. }));
        assert_eq!(journal[1], Transaction::Commit);
        assert!(matches!(journal[4], Transaction::InsertModifier { ref kind, .. } if kind == "Hook"));
        assert_eq!(journal[5], Transaction::Commit);
        assert!(matches!(journal[6], Transaction::InsertModifier { ref kind, .. } if kind == "LegLength"));
        assert_eq!(journal[7], Transaction::Commit);
        assert_eq!(model.commit_count(), 3);
        assert_eq!(model.find_method(element, "OuterVertical"), Some(id));
    }

    #[test]
    fn test_rejected_insert() {
        let mut model = MemoryModel::new();
        model.reject_inserts_of("OuterVertical");
        let err = Assembler::new(&mut model, ElementId::new())
            .assemble(OVR, &group("OuterVertical"))
            .unwrap_err();
        assert!(matches!(err, RcbarError::InsertFailed(ref m) if m == "OuterVertical"));
        assert_eq!(model.commit_count(), 0);
        assert!(model.is_empty());
    }

    #[test]
    fn test_find_and_remove() {
        let mut model = MemoryModel::new();
        let element = ElementId::new();
        let mut assembler = Assembler::new(&mut model, element);
        let id = assembler.assemble(OVR, &group("OuterVertical")).unwrap();
        assert_eq!(assembler.find(OVR), Some(id));
        assert!(assembler.remove(id));
        assert_eq!(assembler.find(OVR), None);
        assert!(!assembler.remove(id));
    }
}
