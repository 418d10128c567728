//! Group synthesis per profile family.
//!
//! Each family module maps its group kinds to faces, a guideline and
//! modifiers built from profile vertices with the helpers of
//! [`rcbar_rebar::construct`].

pub mod abutment;
pub mod footing;
pub mod wall;
pub mod wing;

use log::debug;
use rcbar_core::Result;
use rcbar_math::{Point3, Vector3};
use rcbar_profile::ProfileModel;
use rcbar_rebar::{
    splitter_pair, GeneratingFace, PlacementGuideline, ReferenceCurve, ReinforcementGroup,
    SpacingRule,
};

use crate::config::ElementConfig;
use crate::kind::GroupKind;
use crate::settings::GroupSettings;

/// Straight anchorage length in bar diameters.
pub const ANCHORAGE_DIAMETERS: f64 = 12.0;

/// Leg length of closing and cap bars in bar diameters.
pub const LEG_DIAMETERS: f64 = 40.0;

/// Downturn length of seat bars in bar diameters.
pub const DOWNTURN_DIAMETERS: f64 = 10.0;

/// What a group builder reads: the profile and the validated configuration.
#[derive(Debug, Clone, Copy)]
pub struct SynthContext<'a> {
    pub profile: &'a ProfileModel,
    pub config: &'a ElementConfig,
}

impl<'a> SynthContext<'a> {
    pub fn new(profile: &'a ProfileModel, config: &'a ElementConfig) -> Self {
        Self { profile, config }
    }

    pub fn settings(&self, kind: GroupKind) -> Result<&'a GroupSettings> {
        self.config.settings(kind.prefix())
    }

    pub fn cover(&self) -> f64 {
        self.config.cover()
    }

    pub fn at(&self, vertex: usize, station: usize) -> Point3 {
        self.profile.at(vertex, station)
    }

    /// Index of the last station.
    pub fn last(&self) -> usize {
        self.profile.station_count() - 1
    }

    /// Edge of vertex `vertex` running from the first to the last station.
    pub fn edge(&self, vertex: usize) -> Result<ReferenceCurve> {
        ReferenceCurve::segment(self.at(vertex, 0), self.at(vertex, self.last()))
    }

    /// Diameter of `kind`'s bars.
    pub fn diameter(&self, kind: GroupKind) -> Result<f64> {
        Ok(self.settings(kind)?.diameter)
    }

    pub fn guideline(
        &self,
        kind: GroupKind,
        start: Point3,
        end: Point3,
    ) -> Result<PlacementGuideline> {
        PlacementGuideline::new(start, end, self.settings(kind)?.spacing_rule())
    }

    /// Guideline whose leftover length is split between both ends.
    pub fn centered_guideline(
        &self,
        kind: GroupKind,
        start: Point3,
        end: Point3,
    ) -> Result<PlacementGuideline> {
        let rule: SpacingRule = self.settings(kind)?.spacing_rule().centered();
        PlacementGuideline::new(start, end, rule)
    }

    /// Group named after `kind` with the configured bar properties, every
    /// face on the configured display layer.
    pub fn group(
        &self,
        kind: GroupKind,
        faces: Vec<GeneratingFace>,
        guideline: PlacementGuideline,
    ) -> Result<ReinforcementGroup> {
        let settings = self.settings(kind)?;
        let order = GroupKind::sequence(self.profile)
            .iter()
            .position(|k| *k == kind)
            .unwrap_or(0);
        let group = faces.into_iter().fold(
            ReinforcementGroup::new(kind.method_name(), settings.properties(), guideline)
                .with_layer_order(order as u32),
            |group, face| group.with_face(face, settings.layer),
        );
        debug!(
            "synthesized {kind}: {} faces, guideline {:.1}",
            group.faces.len(),
            group.guideline.length()
        );
        Ok(group)
    }

    /// Add the staggered splitter pair along `edge` when `kind` asks for it.
    pub fn with_splitters(
        &self,
        kind: GroupKind,
        mut group: ReinforcementGroup,
        edge: &ReferenceCurve,
        dir: Vector3,
    ) -> Result<ReinforcementGroup> {
        let settings = self.settings(kind)?;
        if settings.add_splitter {
            group
                .modifiers
                .extend(splitter_pair(edge, dir, settings.splitter_offset, settings.diameter)?);
        }
        Ok(group)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use rcbar_profile::wall::HEEL_BOTTOM;
    use rcbar_profile::ProfileFamily;

    #[test]
    fn test_edge_runs_first_to_last_station() {
        let map = fixtures::wall_map().with("SkewRatio", 0.2);
        let config = fixtures::config(ProfileFamily::WingWall, map);
        let profile = config.build_profile().unwrap();
        let ctx = SynthContext::new(&profile, &config);
        let edge = ctx.edge(HEEL_BOTTOM).unwrap();
        assert_eq!(edge.points().len(), 2);
        assert_eq!(edge.start(), profile.at(HEEL_BOTTOM, 0));
        assert_eq!(edge.end(), profile.at(HEEL_BOTTOM, ctx.last()));
    }
}
