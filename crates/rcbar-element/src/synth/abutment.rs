//! Abutment groups.

use rcbar_core::Result;
use rcbar_math::{direction, dvec3, Plane};
use rcbar_profile::abutment::{
    BACKWALL_BACK_BOTTOM, BACKWALL_FRONT_TOP, CANTILEVER_ROOT, CANTILEVER_TIP_BOTTOM,
    CANTILEVER_TIP_TOP, FRONT_TOP, HEEL_BOTTOM, HEEL_TOP, SEAT_REAR, TOE_BOTTOM,
};
use rcbar_profile::Extremum;
use rcbar_rebar::construct::{face, offset_corner, plane_cut, sweep};
use rcbar_rebar::{GeneratingFace, HookShape, Modifier, ReinforcementGroup};

use super::{SynthContext, ANCHORAGE_DIAMETERS, DOWNTURN_DIAMETERS, LEG_DIAMETERS};
use crate::kind::{AbutmentGroup, End, GroupKind};

pub fn build(ctx: &SynthContext<'_>, group: AbutmentGroup) -> Result<ReinforcementGroup> {
    let kind = GroupKind::Abutment(group);
    match group {
        AbutmentGroup::OuterVertical => outer_vertical(ctx, kind),
        AbutmentGroup::InnerVertical => inner_vertical(ctx, kind),
        AbutmentGroup::BottomTransverse => bottom_transverse(ctx, kind),
        AbutmentGroup::ShelfTransverse => shelf_transverse(ctx, kind),
        AbutmentGroup::BackwallStirrup => backwall_stirrup(ctx, kind),
        AbutmentGroup::CantileverLongitudinal => cantilever_longitudinal(ctx, kind),
        AbutmentGroup::SeatSkew => seat_skew(ctx, kind),
        AbutmentGroup::FrontLongitudinal => front_longitudinal(ctx, kind),
        AbutmentGroup::BackLongitudinal => back_longitudinal(ctx, kind),
        AbutmentGroup::EndClosing(end) => end_closing(ctx, kind, end),
    }
}

/// Front face bars, anchored into the base towards the heel.
fn outer_vertical(ctx: &SynthContext<'_>, kind: GroupKind) -> Result<ReinforcementGroup> {
    let last = ctx.last();
    let d = ctx.diameter(kind)?;
    let main = sweep(ctx.profile, (TOE_BOTTOM, FRONT_TOP), 0, last)?;

    let anchor = |s: usize| {
        let toe = ctx.at(TOE_BOTTOM, s);
        offset_corner(toe, ctx.at(HEEL_BOTTOM, s) - toe, ANCHORAGE_DIAMETERS * d)
    };
    let anchorage = GeneratingFace::new(vec![
        anchor(0)?,
        ctx.at(TOE_BOTTOM, 0),
        ctx.at(TOE_BOTTOM, last),
        anchor(last)?,
    ])?;

    let guideline = ctx.guideline(kind, ctx.at(TOE_BOTTOM, 0), ctx.at(TOE_BOTTOM, last))?;
    let group = ctx
        .group(kind, vec![main, anchorage], guideline)?
        .with_modifier(Modifier::hook(HookShape::Deg90, ctx.edge(FRONT_TOP)?));
    let up = ctx.at(FRONT_TOP, 0) - ctx.at(TOE_BOTTOM, 0);
    ctx.with_splitters(kind, group, &ctx.edge(TOE_BOTTOM)?, up)
}

/// Heel top and backwall back face, trimmed under the cantilever.
fn inner_vertical(ctx: &SynthContext<'_>, kind: GroupKind) -> Result<ReinforcementGroup> {
    let last = ctx.last();
    let faces = vec![
        sweep(ctx.profile, (HEEL_TOP, BACKWALL_BACK_BOTTOM), 0, last)?,
        sweep(ctx.profile, (BACKWALL_BACK_BOTTOM, CANTILEVER_ROOT), 0, last)?,
    ];
    let guideline = ctx.guideline(
        kind,
        ctx.at(BACKWALL_BACK_BOTTOM, 0),
        ctx.at(BACKWALL_BACK_BOTTOM, last),
    )?;
    // The top leg stops short of the cantilever soffit.
    Ok(ctx
        .group(kind, faces, guideline)?
        .with_modifier(Modifier::leg_length(-ctx.cover(), ctx.edge(CANTILEVER_ROOT)?)))
}

fn bottom_transverse(ctx: &SynthContext<'_>, kind: GroupKind) -> Result<ReinforcementGroup> {
    let last = ctx.last();
    let d = ctx.diameter(kind)?;
    let upturn = |corner: usize, toward: usize, s: usize| {
        let p = ctx.at(corner, s);
        offset_corner(p, ctx.at(toward, s) - p, ANCHORAGE_DIAMETERS * d)
    };
    let heel = GeneratingFace::new(vec![
        upturn(HEEL_BOTTOM, HEEL_TOP, 0)?,
        ctx.at(HEEL_BOTTOM, 0),
        ctx.at(HEEL_BOTTOM, last),
        upturn(HEEL_BOTTOM, HEEL_TOP, last)?,
    ])?;
    let bottom = sweep(ctx.profile, (HEEL_BOTTOM, TOE_BOTTOM), 0, last)?;
    let toe = GeneratingFace::new(vec![
        ctx.at(TOE_BOTTOM, 0),
        upturn(TOE_BOTTOM, FRONT_TOP, 0)?,
        upturn(TOE_BOTTOM, FRONT_TOP, last)?,
        ctx.at(TOE_BOTTOM, last),
    ])?;
    let guideline = ctx.guideline(kind, ctx.at(HEEL_BOTTOM, 0), ctx.at(HEEL_BOTTOM, last))?;
    let group = ctx.group(kind, vec![heel, bottom, toe], guideline)?;
    let across = ctx.at(TOE_BOTTOM, 0) - ctx.at(HEEL_BOTTOM, 0);
    ctx.with_splitters(kind, group, &ctx.edge(HEEL_BOTTOM)?, across)
}

fn shelf_transverse(ctx: &SynthContext<'_>, kind: GroupKind) -> Result<ReinforcementGroup> {
    let last = ctx.last();
    let faces = vec![
        sweep(ctx.profile, (HEEL_BOTTOM, HEEL_TOP), 0, last)?,
        sweep(ctx.profile, (HEEL_TOP, BACKWALL_BACK_BOTTOM), 0, last)?,
    ];
    let guideline = ctx.guideline(kind, ctx.at(HEEL_TOP, 0), ctx.at(HEEL_TOP, last))?;
    ctx.group(kind, faces, guideline)
}

/// Closed stirrups around the backwall top and the cantilever.
fn backwall_stirrup(ctx: &SynthContext<'_>, kind: GroupKind) -> Result<ReinforcementGroup> {
    let last = ctx.last();
    let faces = vec![
        sweep(ctx.profile, (SEAT_REAR, BACKWALL_FRONT_TOP), 0, last)?,
        sweep(ctx.profile, (BACKWALL_FRONT_TOP, CANTILEVER_TIP_TOP), 0, last)?,
        sweep(ctx.profile, (CANTILEVER_TIP_TOP, CANTILEVER_TIP_BOTTOM), 0, last)?,
    ];
    let guideline = ctx.guideline(
        kind,
        ctx.at(BACKWALL_FRONT_TOP, 0),
        ctx.at(BACKWALL_FRONT_TOP, last),
    )?;
    Ok(ctx
        .group(kind, faces, guideline)?
        .with_modifier(Modifier::hook(HookShape::Deg135, ctx.edge(SEAT_REAR)?))
        .with_modifier(Modifier::hook(HookShape::Deg135, ctx.edge(CANTILEVER_TIP_BOTTOM)?)))
}

fn cantilever_longitudinal(ctx: &SynthContext<'_>, kind: GroupKind) -> Result<ReinforcementGroup> {
    let face = sweep(ctx.profile, (CANTILEVER_TIP_BOTTOM, CANTILEVER_ROOT), 0, ctx.last())?;
    let guideline = ctx.guideline(
        kind,
        ctx.at(CANTILEVER_TIP_BOTTOM, 0),
        ctx.at(CANTILEVER_ROOT, 0),
    )?;
    ctx.group(kind, vec![face], guideline)
}

/// Bars on the sloped bearing seat, turned down the front face.
///
/// The far seat corner is cut from the backwall front edge with the seat
/// plane, so the face stays planar when the stations are tapered.
fn seat_skew(ctx: &SynthContext<'_>, kind: GroupKind) -> Result<ReinforcementGroup> {
    let last = ctx.last();
    let d = ctx.diameter(kind)?;
    let seat_plane = Plane::from_points(
        ctx.at(FRONT_TOP, 0),
        ctx.at(SEAT_REAR, 0),
        ctx.at(FRONT_TOP, last),
    )?;
    let far_rear = plane_cut(
        &ctx.profile.station(last).edge(SEAT_REAR, BACKWALL_FRONT_TOP),
        &seat_plane,
    )?;
    let seat = GeneratingFace::new(vec![
        ctx.at(FRONT_TOP, 0),
        ctx.at(SEAT_REAR, 0),
        far_rear,
        ctx.at(FRONT_TOP, last),
    ])?;

    let down = |s: usize| {
        let p = ctx.at(FRONT_TOP, s);
        offset_corner(p, ctx.at(TOE_BOTTOM, s) - p, DOWNTURN_DIAMETERS * d)
    };
    let downturn = GeneratingFace::new(vec![
        down(0)?,
        ctx.at(FRONT_TOP, 0),
        ctx.at(FRONT_TOP, last),
        down(last)?,
    ])?;

    let guideline = ctx.guideline(kind, ctx.at(FRONT_TOP, 0), ctx.at(FRONT_TOP, last))?;
    ctx.group(kind, vec![seat, downturn], guideline)
}

fn front_longitudinal(ctx: &SynthContext<'_>, kind: GroupKind) -> Result<ReinforcementGroup> {
    let face = sweep(ctx.profile, (TOE_BOTTOM, FRONT_TOP), 0, ctx.last())?;
    let guideline = ctx.guideline(kind, ctx.at(TOE_BOTTOM, 0), ctx.at(FRONT_TOP, 0))?;
    ctx.group(kind, vec![face], guideline)
}

/// Longitudinal bars on the backwall back face, counted at the tallest
/// station.
fn back_longitudinal(ctx: &SynthContext<'_>, kind: GroupKind) -> Result<ReinforcementGroup> {
    let s = ctx.profile.governing_station(Extremum::Largest);
    let face = sweep(ctx.profile, (BACKWALL_BACK_BOTTOM, CANTILEVER_ROOT), 0, ctx.last())?;
    let guideline = ctx.guideline(
        kind,
        ctx.at(BACKWALL_BACK_BOTTOM, s),
        ctx.at(CANTILEVER_ROOT, s),
    )?;
    ctx.group(kind, vec![face], guideline)
}

/// U-bars closing one end: the station polygon plus straight legs running
/// into the element along the front and heel faces.
fn end_closing(ctx: &SynthContext<'_>, kind: GroupKind, end: End) -> Result<ReinforcementGroup> {
    let s = end.station(ctx.profile);
    let inner = end.inner_station(ctx.profile);
    let d = ctx.diameter(kind)?;
    let corners: Vec<_> = (0..ctx.profile.station(s).len()).map(|v| (v, s)).collect();
    let polygon = face(ctx.profile, &corners)?;

    let inward = direction(ctx.at(TOE_BOTTOM, s), ctx.at(TOE_BOTTOM, inner))?;
    let strip = |a: usize, b: usize| -> Result<GeneratingFace> {
        let (pa, pb) = (ctx.at(a, s), ctx.at(b, s));
        GeneratingFace::new(vec![
            pa,
            pb,
            offset_corner(pb, inward, LEG_DIAMETERS * d)?,
            offset_corner(pa, inward, LEG_DIAMETERS * d)?,
        ])
    };
    let faces = vec![polygon, strip(TOE_BOTTOM, FRONT_TOP)?, strip(HEEL_TOP, HEEL_BOTTOM)?];

    let bottom = ctx.at(TOE_BOTTOM, s);
    let top = ctx.at(BACKWALL_FRONT_TOP, s);
    let guideline = ctx.centered_guideline(kind, bottom, dvec3(bottom.x, top.y, bottom.z))?;
    ctx.group(kind, faces, guideline)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synth::fixtures;
    use approx::assert_relative_eq;
    use crate::config::ElementConfig;
    use rcbar_core::{ParameterMap, Tolerance, Validate};
    use rcbar_profile::{ProfileFamily, ProfileModel};
    use rcbar_rebar::realize;

    fn fixture(map: ParameterMap) -> (ProfileModel, ElementConfig) {
        let config = fixtures::config(ProfileFamily::Abutment, map);
        (config.build_profile().unwrap(), config)
    }

    #[test]
    fn test_outer_vertical_main_face_order() {
        let (profile, config) = fixture(fixtures::abutment_map());
        let ctx = SynthContext::new(&profile, &config);
        let group = build(&ctx, AbutmentGroup::OuterVertical).unwrap();
        assert_eq!(group.name, "OuterVertical");
        let main = group.faces[0].points();
        assert_eq!(main[0], profile.at(TOE_BOTTOM, 0));
        assert_eq!(main[1], profile.at(FRONT_TOP, 0));
        assert_eq!(main[2], profile.at(FRONT_TOP, 1));
        assert_eq!(main[3], profile.at(TOE_BOTTOM, 1));
        // Anchorage reaches 12 d towards the heel.
        assert_relative_eq!(group.faces[1].points()[0].z, 650.0 - 12.0 * 16.0, epsilon = 1e-9);
        assert_eq!(group.modifiers.len(), 1);
    }

    #[test]
    fn test_every_group_validates() {
        let (profile, config) = fixture(fixtures::abutment_map().with("HeightEnd", 2400));
        let ctx = SynthContext::new(&profile, &config);
        for kind in GroupKind::sequence(&profile) {
            let group = kind.rebuild(&ctx).unwrap();
            group.validate().unwrap();
            assert!(!realize(&group).unwrap().is_empty(), "{kind} places no bars");
        }
    }

    #[test]
    fn test_seat_corner_on_tapered_station() {
        let (profile, config) = fixture(fixtures::abutment_map().with("HeightEnd", 2400));
        let ctx = SynthContext::new(&profile, &config);
        let group = build(&ctx, AbutmentGroup::SeatSkew).unwrap();
        let far = group.faces[0].points()[2];
        assert_relative_eq!(far.x, 6000.0, epsilon = 1e-6);
        assert_relative_eq!(far.y, profile.at(SEAT_REAR, 1).y, epsilon = 1e-6);
        assert!(group.faces[0].is_planar(Tolerance::loose()));
    }

    #[test]
    fn test_end_closing_guideline_is_vertical() {
        let (profile, config) = fixture(fixtures::abutment_map());
        let ctx = SynthContext::new(&profile, &config);
        let group = build(&ctx, AbutmentGroup::EndClosing(End::End)).unwrap();
        let axis = group.guideline.direction().unwrap();
        assert_relative_eq!(axis.y, 1.0, epsilon = 1e-12);
        assert_eq!(group.faces.len(), 3);
        assert!(group.guideline.spacing.centered);
        assert_eq!(group.name, "EndClosingEnd");
    }
}
