//! Element orchestration: profile, then every group of the family in order.

use log::{error, info, warn};
use rcbar_core::{ElementId, RcbarError, Result};
use rcbar_model::{GroupId, HostModel};
use rcbar_profile::ProfileModel;
use serde::{Deserialize, Serialize};

use crate::assembler::{Assembler, GroupFailure};
use crate::config::ElementConfig;
use crate::export::ElementReport;
use crate::kind::GroupKind;
use crate::synth::SynthContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElementState {
    Uninitialized,
    ProfileBuilt,
    Assembled,
}

/// One structural element and the groups it created on a host model.
#[derive(Debug, Clone)]
pub struct Element {
    id: ElementId,
    config: ElementConfig,
    state: ElementState,
    profile: Option<ProfileModel>,
    groups: Vec<(GroupKind, GroupId)>,
    failures: Vec<GroupFailure>,
}

impl Element {
    pub fn new(config: ElementConfig) -> Self {
        Self::with_id(ElementId::new(), config)
    }

    pub fn with_id(id: ElementId, config: ElementConfig) -> Self {
        Self {
            id,
            config,
            state: ElementState::Uninitialized,
            profile: None,
            groups: Vec::new(),
            failures: Vec::new(),
        }
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn state(&self) -> ElementState {
        self.state
    }

    pub fn config(&self) -> &ElementConfig {
        &self.config
    }

    pub fn profile(&self) -> Result<&ProfileModel> {
        self.profile
            .as_ref()
            .ok_or_else(|| RcbarError::InvalidState(format!("{} has no profile yet", self.id)))
    }

    /// Groups created so far, in creation order.
    pub fn groups(&self) -> &[(GroupKind, GroupId)] {
        &self.groups
    }

    pub fn failures(&self) -> &[GroupFailure] {
        &self.failures
    }

    fn require(&self, state: ElementState, action: &str) -> Result<()> {
        if self.state != state {
            return Err(RcbarError::InvalidState(format!(
                "{} cannot {action} while {:?}",
                self.id, self.state
            )));
        }
        Ok(())
    }

    /// `Uninitialized -> ProfileBuilt`.
    pub fn build_profile(&mut self) -> Result<&ProfileModel> {
        self.require(ElementState::Uninitialized, "build its profile")?;
        let profile = self.config.build_profile()?;
        self.state = ElementState::ProfileBuilt;
        Ok(self.profile.insert(profile))
    }

    /// `ProfileBuilt -> Assembled`: synthesize and insert every enabled group
    /// of the family's sequence.
    ///
    /// A group that cannot be built or inserted is recorded as a failure and
    /// the remaining groups continue.
    pub fn assemble<M: HostModel>(&mut self, model: &mut M) -> Result<ElementReport> {
        self.require(ElementState::ProfileBuilt, "assemble")?;
        let profile = self.profile()?.clone();
        let ctx = SynthContext::new(&profile, &self.config);
        let mut assembler = Assembler::new(model, self.id);

        for kind in GroupKind::sequence(&profile) {
            if !ctx.settings(kind)?.enabled {
                warn!("{}: {kind} disabled, skipped", self.id);
                continue;
            }
            let created = kind
                .rebuild(&ctx)
                .and_then(|group| assembler.assemble(kind, &group));
            match created {
                Ok(id) => self.groups.push((kind, id)),
                Err(e) => {
                    if !matches!(e, RcbarError::InsertFailed(_)) {
                        error!("{}: {kind} not built: {e}", self.id);
                    }
                    self.failures.push(GroupFailure::new(kind, &e));
                }
            }
        }

        self.state = ElementState::Assembled;
        info!(
            "{}: assembled {} {} groups, {} failed",
            self.id,
            self.groups.len(),
            profile.family(),
            self.failures.len()
        );
        Ok(self.report(&*model))
    }

    /// Re-run exactly one group's creation, replacing whatever that group
    /// created before.
    pub fn create_single_group<M: HostModel>(
        &mut self,
        kind: GroupKind,
        model: &mut M,
    ) -> Result<GroupId> {
        self.require(ElementState::Assembled, "create a single group")?;
        let profile = self.profile()?;
        if !kind.fits(profile.family()) {
            return Err(RcbarError::UnsupportedConfiguration(format!(
                "{kind} does not apply to a {} element",
                profile.family()
            )));
        }
        let group = kind.rebuild(&SynthContext::new(profile, &self.config))?;

        let mut assembler = Assembler::new(model, self.id);
        if let Some(previous) = assembler.find(kind) {
            assembler.remove(previous);
        }
        self.groups.retain(|(k, _)| *k != kind);
        self.failures.retain(|f| f.method != kind.method_name());

        let id = assembler.assemble(kind, &group)?;
        self.groups.push((kind, id));
        Ok(id)
    }

    /// Check that the element can be edited by a variant flow.
    pub fn reopen(&self) -> Result<&ProfileModel> {
        self.require(ElementState::Assembled, "be reopened")?;
        self.profile()
    }

    /// Swap in a corrected profile after a variant edit.
    pub(crate) fn set_profile(&mut self, profile: ProfileModel) {
        self.profile = Some(profile);
    }

    pub(crate) fn forget(&mut self, id: GroupId) {
        self.groups.retain(|(_, g)| *g != id);
    }

    pub fn report<M: HostModel>(&self, model: &M) -> ElementReport {
        ElementReport::collect(self, model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::{AbutmentGroup, FootingGroup};
    use crate::synth::fixtures;
    use rcbar_model::MemoryModel;
    use rcbar_profile::ProfileFamily;

    fn abutment() -> Element {
        Element::new(fixtures::config(ProfileFamily::Abutment, fixtures::abutment_map()))
    }

    #[test]
    fn test_state_machine() {
        let mut model = MemoryModel::new();
        let mut element = abutment();
        assert!(matches!(element.assemble(&mut model), Err(RcbarError::InvalidState(_))));
        assert!(element.profile().is_err());

        element.build_profile().unwrap();
        assert_eq!(element.state(), ElementState::ProfileBuilt);
        assert!(element.build_profile().is_err());

        let report = element.assemble(&mut model).unwrap();
        assert_eq!(element.state(), ElementState::Assembled);
        assert_eq!(report.groups.len(), 11);
        assert!(report.failures.is_empty());
        assert!(element.assemble(&mut model).is_err());
    }

    #[test]
    fn test_disabled_group_skipped() {
        let map = fixtures::bars(ProfileFamily::Abutment, fixtures::abutment_map())
            .with("SSR_Enabled", 0);
        let config = ElementConfig::load(ProfileFamily::Abutment, &map).unwrap();
        let mut element = Element::new(config);
        let mut model = MemoryModel::new();
        element.build_profile().unwrap();
        let report = element.assemble(&mut model).unwrap();
        assert_eq!(report.groups.len(), 10);
        assert!(report.groups.iter().all(|g| g.method != "SeatSkew"));
    }

    #[test]
    fn test_create_single_group_replaces_previous() {
        let mut model = MemoryModel::new();
        let mut element = abutment();
        let kind = GroupKind::Abutment(AbutmentGroup::InnerVertical);
        assert!(element.create_single_group(kind, &mut model).is_err());

        element.build_profile().unwrap();
        element.assemble(&mut model).unwrap();
        let before = model.find_method(element.id(), "InnerVertical").unwrap();
        let count = model.len();

        let after = element.create_single_group(kind, &mut model).unwrap();
        assert_ne!(before, after);
        assert_eq!(model.len(), count);
        assert_eq!(model.find_method(element.id(), "InnerVertical"), Some(after));
        assert_eq!(element.groups().iter().filter(|(k, _)| *k == kind).count(), 1);

        let wrong = GroupKind::Footing(FootingGroup::SlopeLongitudinal);
        assert!(matches!(
            element.create_single_group(wrong, &mut model),
            Err(RcbarError::UnsupportedConfiguration(_))
        ));
    }
}
