//! Variant flows: edit an already assembled element in place from a
//! corrected copy of its profile.

use log::{info, warn};
use rcbar_core::{ElementId, RcbarError, Result, Tolerance};
use rcbar_math::{Line, Point3, Transform, Vector3};
use rcbar_model::{GroupId, HostModel};
use rcbar_profile::abutment::{
    BACKWALL_BACK_BOTTOM, CANTILEVER_ROOT, CANTILEVER_TIP_BOTTOM, FRONT_TOP, TOE_BOTTOM,
};
use rcbar_profile::{ProfileFamily, ProfileModel};
use rcbar_rebar::{LengthAdjustment, Modifier, ReferenceCurve};
use serde::{Deserialize, Serialize};

use crate::assembler::{Assembler, GroupFailure};
use crate::element::Element;
use crate::kind::{AbutmentGroup, End, GroupKind, WallGroup};
use crate::synth::SynthContext;

/// What a variant flow did to the element's groups.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantReport {
    pub edited: Vec<String>,
    pub deleted: Vec<String>,
    pub skipped: Vec<String>,
    /// Edits the host rejected. Those groups keep their previous geometry.
    pub failures: Vec<GroupFailure>,
}

impl VariantReport {
    fn warn_failures(&self, owner: ElementId) {
        for failure in &self.failures {
            warn!("{owner}: {} kept its previous geometry: {}", failure.method, failure.reason);
        }
    }
}

/// Find the group of `element` created by `method`.
///
/// Unknown method names and groups that were never created are a no-op.
pub fn lookup<M: HostModel>(
    model: &M,
    element: ElementId,
    method: &str,
) -> Option<(GroupKind, GroupId)> {
    let kind = match GroupKind::from_method_name(method) {
        Ok(kind) => kind,
        Err(e) => {
            warn!("{element}: {e}, nothing to edit");
            return None;
        }
    };
    match model.find_method(element, method) {
        Some(id) => Some((kind, id)),
        None => {
            warn!("{element}: no {method} group to edit");
            None
        }
    }
}

fn require_family(profile: &ProfileModel, family: ProfileFamily, variant: &str) -> Result<()> {
    if profile.family() != family {
        return Err(RcbarError::UnsupportedConfiguration(format!(
            "{variant} applies to a {family}, not a {}",
            profile.family()
        )));
    }
    Ok(())
}

/// A wing wall attached to one end of an abutment.
///
/// The attached station moves outward by `overlap` and sideways by
/// `offset_z`; longitudinal groups run into the wing and stop one cover
/// short of the moved station, and the closing bars at that end go away.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WingAttachment {
    pub side: End,
    pub overlap: f64,
    pub offset_z: f64,
}

impl WingAttachment {
    const LONGITUDINAL: [(AbutmentGroup, usize, usize); 3] = [
        (
            AbutmentGroup::CantileverLongitudinal,
            CANTILEVER_TIP_BOTTOM,
            CANTILEVER_ROOT,
        ),
        (AbutmentGroup::FrontLongitudinal, TOE_BOTTOM, FRONT_TOP),
        (
            AbutmentGroup::BackLongitudinal,
            BACKWALL_BACK_BOTTOM,
            CANTILEVER_ROOT,
        ),
    ];

    pub fn corrected(&self, profile: &ProfileModel) -> Result<ProfileModel> {
        if !(self.overlap >= 0.0) {
            return Err(RcbarError::parameter(format!(
                "wing overlap must be non-negative, got {}",
                self.overlap
            )));
        }
        let s = self.side.station(profile);
        let outward = match self.side {
            End::Start => -self.overlap,
            End::End => self.overlap,
        };
        let mut stations = profile.stations().to_vec();
        stations[s] = stations[s].translated(Vector3::new(outward, 0.0, self.offset_z));
        profile.with_stations(stations)
    }

    /// Edit the longitudinal groups and drop the closing bars at `side`.
    ///
    /// Every replacement is computed before the host sees any edit, so a
    /// geometry error leaves the element untouched. Edits the host rejects
    /// are reported as failures; the rest still go through.
    pub fn apply<M: HostModel>(&self, element: &mut Element, model: &mut M) -> Result<VariantReport> {
        let profile = element.reopen()?;
        require_family(profile, ProfileFamily::Abutment, "wing attachment")?;
        let corrected = self.corrected(profile)?;
        let s = self.side.station(&corrected);
        let owner = element.id();
        let mut report = VariantReport::default();

        let mut edits = Vec::new();
        let ctx = SynthContext::new(&corrected, element.config());
        for (group, a, b) in Self::LONGITUDINAL {
            let kind = GroupKind::Abutment(group);
            let method = kind.method_name();
            let Some((_, id)) = lookup(&*model, owner, &method) else {
                report.skipped.push(method);
                continue;
            };
            let Some(mut stored) = model.group(id).cloned() else {
                report.skipped.push(method);
                continue;
            };
            stored.replace_faces(kind.rebuild(&ctx)?.faces);
            let edge = corrected.station(s).edge(a, b);
            let curve = ReferenceCurve::segment(edge.a, edge.b)?;
            let end_offset = Modifier::end_offset(ctx.cover(), curve);

            // A wing already attached at this side left its end offset on
            // the station it moved; that one follows the station again.
            let previous = profile.station(s).edge(a, b);
            let added = match stored.modifiers.iter().position(|m| is_end_offset_at(m, &previous)) {
                Some(i) => {
                    stored.modifiers[i] = end_offset;
                    None
                }
                None => Some(end_offset),
            };
            edits.push((kind, id, stored, added));
        }
        let closing = GroupKind::Abutment(AbutmentGroup::EndClosing(self.side));
        let closing_id = lookup(&*model, owner, &closing.method_name()).map(|(_, id)| id);

        let mut assembler = Assembler::new(model, owner);
        for (kind, id, stored, added) in edits {
            let written = assembler.replace(id, &stored).and_then(|()| match &added {
                Some(modifier) => assembler.add_modifier(id, modifier),
                None => Ok(()),
            });
            match written {
                Ok(()) => report.edited.push(kind.method_name()),
                Err(e) => report.failures.push(GroupFailure::new(kind, &e)),
            }
        }
        let removed = match closing_id {
            Some(id) if assembler.remove(id) => {
                report.deleted.push(closing.method_name());
                Some(id)
            }
            _ => {
                report.skipped.push(closing.method_name());
                None
            }
        };

        if let Some(id) = removed {
            element.forget(id);
        }
        element.set_profile(corrected);
        info!(
            "{owner}: wing attached at {} end, {} groups edited, {} deleted",
            self.side.name(),
            report.edited.len(),
            report.deleted.len()
        );
        report.warn_failures(owner);
        Ok(report)
    }
}

/// Whether `modifier` is an end offset along `edge`.
fn is_end_offset_at(modifier: &Modifier, edge: &Line) -> bool {
    let tol = Tolerance::default();
    let near =
        |p: Point3, q: Point3| (p - q).length() <= tol.linear * (1.0 + q.abs().max_element());
    matches!(
        modifier,
        Modifier::LengthAdjustment { kind: LengthAdjustment::EndOffset, curve, .. }
            if near(curve.start(), edge.a) && near(curve.end(), edge.b)
    )
}

/// The mirror image of a wing wall on the other side of the abutment,
/// optionally with its skewed free end squared off.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MirroredWing {
    pub offset_z: f64,
    pub offset_y: f64,
    pub square_end: bool,
}

impl MirroredWing {
    pub fn transform(&self) -> Transform {
        Transform::mirror_z().then(&Transform::from_translation(Vector3::new(
            0.0,
            self.offset_y,
            self.offset_z,
        )))
    }

    pub fn corrected(&self, profile: &ProfileModel) -> Result<ProfileModel> {
        let mut stations = profile.stations().to_vec();
        if self.square_end {
            let ratio = profile.params().as_wall().map_or(0.0, |p| p.skew_ratio);
            if let Some(last) = stations.last_mut() {
                *last = last.skewed(-ratio);
            }
        }
        let transform = self.transform();
        profile.with_stations(stations.iter().map(|s| s.transformed(&transform)).collect())
    }

    /// Rebuild every group of the element from the mirrored profile.
    ///
    /// Like [`WingAttachment::apply`], all groups are rebuilt before the
    /// first edit reaches the host.
    pub fn apply<M: HostModel>(&self, element: &mut Element, model: &mut M) -> Result<VariantReport> {
        let profile = element.reopen()?;
        require_family(profile, ProfileFamily::WingWall, "mirrored wing")?;
        let corrected = self.corrected(profile)?;
        let owner = element.id();
        let skew_closing = GroupKind::Wall(WallGroup::SkewEndClosing);
        let mut report = VariantReport::default();

        let mut edits = Vec::new();
        let mut removals = Vec::new();
        let ctx = SynthContext::new(&corrected, element.config());
        for &(kind, _) in element.groups() {
            let method = kind.method_name();
            let Some((_, id)) = lookup(&*model, owner, &method) else {
                report.skipped.push(method);
                continue;
            };
            if self.square_end && kind == skew_closing {
                removals.push((kind, id));
            } else {
                edits.push((kind, id, kind.rebuild(&ctx)?));
            }
        }

        let mut assembler = Assembler::new(model, owner);
        for (kind, id, group) in edits {
            match assembler.replace(id, &group) {
                Ok(()) => report.edited.push(kind.method_name()),
                Err(e) => report.failures.push(GroupFailure::new(kind, &e)),
            }
        }
        let mut removed = Vec::new();
        for (kind, id) in removals {
            if assembler.remove(id) {
                removed.push(id);
                report.deleted.push(kind.method_name());
            }
        }

        for id in removed {
            element.forget(id);
        }
        element.set_profile(corrected);
        info!(
            "{owner}: mirrored wing, {} groups edited, {} deleted",
            report.edited.len(),
            report.deleted.len()
        );
        report.warn_failures(owner);
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synth::fixtures;
    use approx::assert_relative_eq;
    use rcbar_model::{MemoryModel, Transaction};
    use rcbar_profile::wall::STEM_FRONT_BOTTOM;

    fn assembled(family: ProfileFamily, map: rcbar_core::ParameterMap) -> (Element, MemoryModel) {
        let mut element = Element::new(fixtures::config(family, map));
        let mut model = MemoryModel::new();
        element.build_profile().unwrap();
        element.assemble(&mut model).unwrap();
        (element, model)
    }

    #[test]
    fn test_lookup_unknown_name_is_noop() {
        let (element, model) = assembled(ProfileFamily::Abutment, fixtures::abutment_map());
        assert!(lookup(&model, element.id(), "NoSuchRebar").is_none());
        assert!(lookup(&model, element.id(), "FootingSlopeLongitudinal").is_none());
        assert!(lookup(&model, element.id(), "SeatSkew").is_some());
    }

    #[test]
    fn test_wing_attachment_moves_end_station() {
        let (element, _) = assembled(ProfileFamily::Abutment, fixtures::abutment_map());
        let wing = WingAttachment {
            side: End::End,
            overlap: 400.0,
            offset_z: 25.0,
        };
        let before = element.profile().unwrap();
        let after = wing.corrected(before).unwrap();
        let delta = after.at(TOE_BOTTOM, 1) - before.at(TOE_BOTTOM, 1);
        assert_relative_eq!(delta.x, 400.0, epsilon = 1e-9);
        assert_relative_eq!(delta.z, 25.0, epsilon = 1e-9);
        assert_eq!(after.at(TOE_BOTTOM, 0), before.at(TOE_BOTTOM, 0));
    }

    #[test]
    fn test_wing_attachment_edits_in_place() {
        let (mut element, mut model) = assembled(ProfileFamily::Abutment, fixtures::abutment_map());
        let front = model.find_method(element.id(), "FrontLongitudinal").unwrap();
        let count = model.len();

        let report = WingAttachment {
            side: End::Start,
            overlap: 400.0,
            offset_z: 0.0,
        }
        .apply(&mut element, &mut model)
        .unwrap();

        assert_eq!(
            report.edited,
            ["CantileverLongitudinal", "FrontLongitudinal", "BackLongitudinal"]
        );
        assert_eq!(report.deleted, ["EndClosingStart"]);
        assert_eq!(model.len(), count - 1);
        assert!(model.find_method(element.id(), "EndClosingStart").is_none());
        assert!(model.find_method(element.id(), "EndClosingEnd").is_some());

        let group = model.group(front).unwrap();
        assert_relative_eq!(group.faces[0].points()[0].x, -400.0, epsilon = 1e-9);
        let Some(Modifier::LengthAdjustment {
            kind: LengthAdjustment::EndOffset,
            length,
            ..
        }) = group.modifiers.last()
        else {
            panic!("expected an end offset, got {:?}", group.modifiers);
        };
        assert_relative_eq!(*length, 50.0);
        assert!(model.journal().iter().any(
            |t| matches!(t, Transaction::InsertModifier { id, kind } if *id == front && kind == "EndOffset")
        ));
        assert_relative_eq!(element.profile().unwrap().first().x(), -400.0, epsilon = 1e-9);
    }

    #[test]
    fn test_repeated_attachment_keeps_one_end_offset_per_side() {
        let (mut element, mut model) = assembled(ProfileFamily::Abutment, fixtures::abutment_map());
        let front = model.find_method(element.id(), "FrontLongitudinal").unwrap();
        for (side, overlap) in [(End::End, 400.0), (End::End, 200.0), (End::Start, 300.0)] {
            WingAttachment {
                side,
                overlap,
                offset_z: 0.0,
            }
            .apply(&mut element, &mut model)
            .unwrap();
        }

        let group = model.group(front).unwrap();
        let mut ends: Vec<f64> = group
            .modifiers
            .iter()
            .filter(|m| m.kind_name() == "EndOffset")
            .map(|m| m.curve().start().x)
            .collect();
        ends.sort_by(f64::total_cmp);
        assert_eq!(ends.len(), 2);
        assert_relative_eq!(ends[0], -300.0, epsilon = 1e-9);
        assert_relative_eq!(ends[1], 6600.0, epsilon = 1e-9);
    }

    #[test]
    fn test_rejected_edit_is_reported_and_profile_still_moves() {
        let (mut element, mut model) = assembled(ProfileFamily::Abutment, fixtures::abutment_map());
        let front = model.find_method(element.id(), "FrontLongitudinal").unwrap();
        let faces = model.group(front).unwrap().faces.clone();
        model.reject_edits_of("FrontLongitudinal");

        let report = WingAttachment {
            side: End::End,
            overlap: 500.0,
            offset_z: 0.0,
        }
        .apply(&mut element, &mut model)
        .unwrap();

        assert_eq!(report.edited, ["CantileverLongitudinal", "BackLongitudinal"]);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].method, "FrontLongitudinal");
        assert_eq!(report.deleted, ["EndClosingEnd"]);
        assert_eq!(model.group(front).unwrap().faces, faces);
        assert!(model.group(front).unwrap().modifiers.iter().all(|m| m.kind_name() != "EndOffset"));
        assert_relative_eq!(element.profile().unwrap().last().x(), 6500.0, epsilon = 1e-9);
    }

    #[test]
    fn test_mirrored_wing_reports_rejected_edit() {
        let (mut element, mut model) = assembled(ProfileFamily::WingWall, fixtures::wall_map());
        let before = model.len();
        model.reject_edits_of("StemCap");
        let report = MirroredWing {
            offset_z: 3000.0,
            offset_y: 0.0,
            square_end: false,
        }
        .apply(&mut element, &mut model)
        .unwrap();
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].method, "StemCap");
        assert_eq!(report.edited.len(), before - 1);
        assert!(element.profile().unwrap().first().points()[0].z > 1000.0);
    }

    #[test]
    fn test_wing_attachment_needs_abutment() {
        let (mut element, mut model) = assembled(ProfileFamily::WingWall, fixtures::wall_map());
        let wing = WingAttachment {
            side: End::End,
            overlap: 400.0,
            offset_z: 0.0,
        };
        assert!(matches!(
            wing.apply(&mut element, &mut model),
            Err(RcbarError::UnsupportedConfiguration(_))
        ));
    }

    #[test]
    fn test_mirrored_wing_squares_end() {
        let map = fixtures::wall_map().with("SkewRatio", 0.25);
        let (mut element, mut model) = assembled(ProfileFamily::WingWall, map);
        let original = element.profile().unwrap().clone();
        let stem = model.find_method(element.id(), "StemFront").unwrap();

        let mirror = MirroredWing {
            offset_z: 0.0,
            offset_y: 100.0,
            square_end: true,
        };
        let report = mirror.apply(&mut element, &mut model).unwrap();
        assert_eq!(report.deleted, ["SkewEndClosing"]);
        assert!(report.skipped.is_empty());
        assert!(model.find_method(element.id(), "SkewEndClosing").is_none());

        let corrected = element.profile().unwrap();
        let p = original.at(STEM_FRONT_BOTTOM, 0);
        let q = corrected.at(STEM_FRONT_BOTTOM, 0);
        assert_relative_eq!(q.z, -p.z, epsilon = 1e-9);
        assert_relative_eq!(q.y, p.y + 100.0, epsilon = 1e-9);
        // Squared end: every vertex of the last station shares one X.
        let last = corrected.last();
        for point in last.points() {
            assert_relative_eq!(point.x, last.points()[0].x, epsilon = 1e-9);
        }

        let group = model.group(stem).unwrap();
        assert!(group.faces[0].points().iter().all(|pt| pt.z * p.z <= 0.0));
        assert!(matches!(group.modifiers[0], Modifier::PropertyOverride { .. }));
    }

    #[test]
    fn test_mirrored_wing_needs_assembled_element() {
        let mut element = Element::new(fixtures::config(ProfileFamily::WingWall, fixtures::wall_map()));
        let mut model = MemoryModel::new();
        let mirror = MirroredWing {
            offset_z: 0.0,
            offset_y: 0.0,
            square_end: false,
        };
        assert!(matches!(
            mirror.apply(&mut element, &mut model),
            Err(RcbarError::InvalidState(_))
        ));
    }
}
