//! Retaining wall groups, shared by wing walls.

use rcbar_core::Result;
use rcbar_math::{dvec3, Plane};
use rcbar_profile::wall::{
    HEEL_BOTTOM, HEEL_TOP, STEM_BACK_BOTTOM, STEM_BACK_TOP, STEM_FRONT_BOTTOM, STEM_FRONT_TOP,
    TOE_BOTTOM, TOE_TOP,
};
use rcbar_profile::{Extremum, ProfileFamily};
use rcbar_rebar::construct::{face, offset_corner, plane_cut, sweep};
use rcbar_rebar::{GeneratingFace, Modifier, ReferenceCurve, ReinforcementGroup};

use super::{wing, SynthContext, ANCHORAGE_DIAMETERS, LEG_DIAMETERS};
use crate::kind::{End, GroupKind, WallGroup};

pub fn build(ctx: &SynthContext<'_>, group: WallGroup) -> Result<ReinforcementGroup> {
    let kind = GroupKind::Wall(group);
    match group {
        WallGroup::StemFront => stem_front(ctx, kind),
        WallGroup::StemBack => stem_back(ctx, kind),
        WallGroup::StemFrontLongitudinal => {
            stem_longitudinal(ctx, kind, STEM_FRONT_BOTTOM, STEM_FRONT_TOP)
        }
        WallGroup::StemBackLongitudinal => {
            stem_longitudinal(ctx, kind, STEM_BACK_BOTTOM, STEM_BACK_TOP)
        }
        WallGroup::BaseBottom => base_bottom(ctx, kind),
        WallGroup::BaseTop => base_top(ctx, kind),
        WallGroup::BaseLongitudinal => base_longitudinal(ctx, kind),
        WallGroup::StemCap => stem_cap(ctx, kind),
        WallGroup::EndClosing(end) => end_closing(ctx, kind, end),
        WallGroup::SkewEndClosing => wing::skew_end_closing(ctx, kind),
    }
}

/// Stem front bars anchored down into the base.
fn stem_front(ctx: &SynthContext<'_>, kind: GroupKind) -> Result<ReinforcementGroup> {
    let last = ctx.last();
    let d = ctx.diameter(kind)?;
    let anchor = |s: usize| {
        let p = ctx.at(STEM_FRONT_BOTTOM, s);
        offset_corner(p, dvec3(0.0, -1.0, 0.0), ANCHORAGE_DIAMETERS * d)
    };
    let anchorage = GeneratingFace::new(vec![
        anchor(0)?,
        ctx.at(STEM_FRONT_BOTTOM, 0),
        ctx.at(STEM_FRONT_BOTTOM, last),
        anchor(last)?,
    ])?;
    let main = sweep(ctx.profile, (STEM_FRONT_BOTTOM, STEM_FRONT_TOP), 0, last)?;
    let guideline = ctx.guideline(
        kind,
        ctx.at(STEM_FRONT_BOTTOM, 0),
        ctx.at(STEM_FRONT_BOTTOM, last),
    )?;
    let group = ctx.group(kind, vec![main, anchorage], guideline)?;
    let group = if ctx.profile.family() == ProfileFamily::WingWall {
        wing::with_free_end_override(ctx, kind, group)?
    } else {
        group
    };
    let up = ctx.at(STEM_FRONT_TOP, 0) - ctx.at(STEM_FRONT_BOTTOM, 0);
    ctx.with_splitters(kind, group, &ctx.edge(STEM_FRONT_BOTTOM)?, up)
}

/// Stem back bars. The far top corner is cut from the end station's top edge
/// with the back face plane, which keeps the face planar under taper and
/// skew.
fn stem_back(ctx: &SynthContext<'_>, kind: GroupKind) -> Result<ReinforcementGroup> {
    let last = ctx.last();
    let back_plane = Plane::from_points(
        ctx.at(STEM_BACK_BOTTOM, 0),
        ctx.at(STEM_BACK_TOP, 0),
        ctx.at(STEM_BACK_BOTTOM, last),
    )?;
    let far_top = plane_cut(
        &ctx.profile.station(last).edge(STEM_FRONT_TOP, STEM_BACK_TOP),
        &back_plane,
    )?;
    let main = GeneratingFace::new(vec![
        ctx.at(STEM_BACK_BOTTOM, 0),
        ctx.at(STEM_BACK_TOP, 0),
        far_top,
        ctx.at(STEM_BACK_BOTTOM, last),
    ])?;
    let guideline = ctx.guideline(
        kind,
        ctx.at(STEM_BACK_BOTTOM, 0),
        ctx.at(STEM_BACK_BOTTOM, last),
    )?;
    let top = ReferenceCurve::segment(ctx.at(STEM_BACK_TOP, 0), far_top)?;
    let group = ctx
        .group(kind, vec![main], guideline)?
        .with_modifier(Modifier::leg_length(-ctx.cover(), top));
    let up = ctx.at(STEM_BACK_TOP, 0) - ctx.at(STEM_BACK_BOTTOM, 0);
    ctx.with_splitters(kind, group, &ctx.edge(STEM_BACK_BOTTOM)?, up)
}

/// Longitudinal bars on one stem face, counted at the tallest station.
fn stem_longitudinal(
    ctx: &SynthContext<'_>,
    kind: GroupKind,
    bottom: usize,
    top: usize,
) -> Result<ReinforcementGroup> {
    let s = ctx.profile.governing_station(Extremum::Largest);
    let face = sweep(ctx.profile, (bottom, top), 0, ctx.last())?;
    let guideline = ctx.guideline(kind, ctx.at(bottom, s), ctx.at(top, s))?;
    ctx.group(kind, vec![face], guideline)
}

fn base_bottom(ctx: &SynthContext<'_>, kind: GroupKind) -> Result<ReinforcementGroup> {
    let last = ctx.last();
    let faces = vec![
        sweep(ctx.profile, (HEEL_TOP, HEEL_BOTTOM), 0, last)?,
        sweep(ctx.profile, (HEEL_BOTTOM, TOE_BOTTOM), 0, last)?,
        sweep(ctx.profile, (TOE_BOTTOM, TOE_TOP), 0, last)?,
    ];
    let guideline = ctx.guideline(kind, ctx.at(HEEL_BOTTOM, 0), ctx.at(HEEL_BOTTOM, last))?;
    let group = ctx.group(kind, faces, guideline)?;
    let across = ctx.at(TOE_BOTTOM, 0) - ctx.at(HEEL_BOTTOM, 0);
    ctx.with_splitters(kind, group, &ctx.edge(HEEL_BOTTOM)?, across)
}

/// Heel top bars turned down at the back of the base.
fn base_top(ctx: &SynthContext<'_>, kind: GroupKind) -> Result<ReinforcementGroup> {
    let last = ctx.last();
    let d = ctx.diameter(kind)?;
    let down = |s: usize| {
        let p = ctx.at(HEEL_TOP, s);
        offset_corner(p, ctx.at(HEEL_BOTTOM, s) - p, ANCHORAGE_DIAMETERS * d)
    };
    let top = sweep(ctx.profile, (STEM_BACK_BOTTOM, HEEL_TOP), 0, last)?;
    let downturn = GeneratingFace::new(vec![
        ctx.at(HEEL_TOP, 0),
        down(0)?,
        down(last)?,
        ctx.at(HEEL_TOP, last),
    ])?;
    let guideline = ctx.guideline(kind, ctx.at(HEEL_TOP, 0), ctx.at(HEEL_TOP, last))?;
    ctx.group(kind, vec![top, downturn], guideline)
}

fn base_longitudinal(ctx: &SynthContext<'_>, kind: GroupKind) -> Result<ReinforcementGroup> {
    let face = sweep(ctx.profile, (HEEL_BOTTOM, TOE_BOTTOM), 0, ctx.last())?;
    let guideline = ctx.guideline(kind, ctx.at(HEEL_BOTTOM, 0), ctx.at(TOE_BOTTOM, 0))?;
    ctx.group(kind, vec![face], guideline)
}

/// Caps over the stem top with legs down both faces.
fn stem_cap(ctx: &SynthContext<'_>, kind: GroupKind) -> Result<ReinforcementGroup> {
    let last = ctx.last();
    let leg = LEG_DIAMETERS * ctx.diameter(kind)?;
    let down = |from: usize, toward: usize, s: usize| {
        let p = ctx.at(from, s);
        offset_corner(p, ctx.at(toward, s) - p, leg)
    };
    let front = GeneratingFace::new(vec![
        down(STEM_FRONT_TOP, STEM_FRONT_BOTTOM, 0)?,
        ctx.at(STEM_FRONT_TOP, 0),
        ctx.at(STEM_FRONT_TOP, last),
        down(STEM_FRONT_TOP, STEM_FRONT_BOTTOM, last)?,
    ])?;
    let top = sweep(ctx.profile, (STEM_FRONT_TOP, STEM_BACK_TOP), 0, last)?;
    let back = GeneratingFace::new(vec![
        ctx.at(STEM_BACK_TOP, 0),
        down(STEM_BACK_TOP, STEM_BACK_BOTTOM, 0)?,
        down(STEM_BACK_TOP, STEM_BACK_BOTTOM, last)?,
        ctx.at(STEM_BACK_TOP, last),
    ])?;
    let guideline = ctx.guideline(kind, ctx.at(STEM_FRONT_TOP, 0), ctx.at(STEM_FRONT_TOP, last))?;
    ctx.group(kind, vec![front, top, back], guideline)
}

/// Closing bars in the end station polygon, stacked up the wall.
fn end_closing(ctx: &SynthContext<'_>, kind: GroupKind, end: End) -> Result<ReinforcementGroup> {
    let s = end.station(ctx.profile);
    let corners: Vec<_> = (0..ctx.profile.station(s).len()).map(|v| (v, s)).collect();
    let polygon = face(ctx.profile, &corners)?;

    // Vertical through the stem, from the base underside to the stem top.
    let stem = ctx.at(STEM_FRONT_TOP, s);
    let bottom = dvec3(stem.x, ctx.at(TOE_BOTTOM, s).y, stem.z);
    let guideline = ctx.centered_guideline(kind, bottom, stem)?;
    ctx.group(kind, vec![polygon], guideline)
}
