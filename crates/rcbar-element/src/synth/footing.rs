//! Footing groups. Transverse and bottom longitudinal groups are built per
//! span of the chain.

use rcbar_core::{RcbarError, Result};
use rcbar_math::{direction, Line, Plane, Point3, Vector3};
use rcbar_profile::footing::{
    BACK_BOTTOM, BACK_EDGE_TOP, FRONT_BOTTOM, FRONT_EDGE_TOP, TOP_BACK, TOP_FRONT,
};
use rcbar_rebar::construct::{face, offset_corner, plane_cut, sweep};
use rcbar_rebar::{GeneratingFace, ReferenceCurve, ReinforcementGroup};

use super::{SynthContext, LEG_DIAMETERS};
use crate::kind::{End, FootingGroup, GroupKind};

pub fn build(ctx: &SynthContext<'_>, group: FootingGroup) -> Result<ReinforcementGroup> {
    let kind = GroupKind::Footing(group);
    match group {
        FootingGroup::BottomTransverse(span) => bottom_transverse(ctx, kind, span),
        FootingGroup::TopTransverse(span) => top_transverse(ctx, kind, span),
        FootingGroup::BottomLongitudinal(span) => bottom_longitudinal(ctx, kind, span),
        FootingGroup::SkewEdge(span) => skew_edge(ctx, kind, span),
        FootingGroup::EndClosing(end) => end_closing(ctx, kind, end),
        FootingGroup::SlopeLongitudinal => slope_longitudinal(ctx, kind),
    }
}

/// Station pair bounding `span`.
fn stations(ctx: &SynthContext<'_>, span: usize) -> Result<(usize, usize)> {
    if span >= ctx.profile.span_count() {
        return Err(RcbarError::InvalidState(format!(
            "footing has {} spans, no span {span}",
            ctx.profile.span_count()
        )));
    }
    Ok((span, span + 1))
}

fn bottom_transverse(
    ctx: &SynthContext<'_>,
    kind: GroupKind,
    span: usize,
) -> Result<ReinforcementGroup> {
    let (s0, s1) = stations(ctx, span)?;
    let faces = vec![
        sweep(ctx.profile, (BACK_EDGE_TOP, BACK_BOTTOM), s0, s1)?,
        sweep(ctx.profile, (BACK_BOTTOM, FRONT_BOTTOM), s0, s1)?,
        sweep(ctx.profile, (FRONT_BOTTOM, FRONT_EDGE_TOP), s0, s1)?,
    ];
    let guideline = ctx.guideline(kind, ctx.at(FRONT_BOTTOM, s0), ctx.at(FRONT_BOTTOM, s1))?;
    let group = ctx.group(kind, faces, guideline)?;
    let edge = ReferenceCurve::segment(ctx.at(BACK_BOTTOM, s0), ctx.at(BACK_BOTTOM, s1))?;
    let across = ctx.at(FRONT_BOTTOM, s0) - ctx.at(BACK_BOTTOM, s0);
    ctx.with_splitters(kind, group, &edge, across)
}

/// Top bars over the slopes and the crown. The back edge is a secondary
/// guideline so that bars follow skewed stations.
///
/// When the thickness changes along the span, the slopes keep the plane of
/// the thinner station's slope and the span's edge line. At the thicker
/// station they stop where that plane meets the vertical through the crest,
/// which keeps every face planar and under the top surface.
fn top_transverse(
    ctx: &SynthContext<'_>,
    kind: GroupKind,
    span: usize,
) -> Result<ReinforcementGroup> {
    let (s0, s1) = stations(ctx, span)?;
    let height = |s: usize| ctx.profile.station(s).height();
    let (thin, thick) = if height(s0) <= height(s1) {
        (s0, s1)
    } else {
        (s1, s0)
    };
    let crest_cut = |edge: usize, crest: usize| -> Result<Point3> {
        let plane =
            Plane::from_points(ctx.at(edge, thin), ctx.at(crest, thin), ctx.at(edge, thick))?;
        let p = ctx.at(crest, thick);
        plane_cut(&Line::new(p, p + Vector3::Y), &plane)
    };
    let front = crest_cut(FRONT_EDGE_TOP, TOP_FRONT)?;
    let back = crest_cut(BACK_EDGE_TOP, TOP_BACK)?;
    let crest = |vertex: usize, s: usize| match (s == thick, vertex) {
        (true, TOP_FRONT) => front,
        (true, TOP_BACK) => back,
        _ => ctx.at(vertex, s),
    };

    let faces = vec![
        GeneratingFace::new(vec![
            ctx.at(FRONT_EDGE_TOP, s0),
            crest(TOP_FRONT, s0),
            crest(TOP_FRONT, s1),
            ctx.at(FRONT_EDGE_TOP, s1),
        ])?,
        GeneratingFace::new(vec![
            crest(TOP_FRONT, s0),
            crest(TOP_BACK, s0),
            crest(TOP_BACK, s1),
            crest(TOP_FRONT, s1),
        ])?,
        GeneratingFace::new(vec![
            crest(TOP_BACK, s0),
            ctx.at(BACK_EDGE_TOP, s0),
            ctx.at(BACK_EDGE_TOP, s1),
            crest(TOP_BACK, s1),
        ])?,
    ];
    let guideline = ctx
        .guideline(kind, ctx.at(FRONT_EDGE_TOP, s0), ctx.at(FRONT_EDGE_TOP, s1))?
        .with_secondary(ctx.at(BACK_EDGE_TOP, s0), ctx.at(BACK_EDGE_TOP, s1))?;
    ctx.group(kind, faces, guideline)
}

fn bottom_longitudinal(
    ctx: &SynthContext<'_>,
    kind: GroupKind,
    span: usize,
) -> Result<ReinforcementGroup> {
    let (s0, s1) = stations(ctx, span)?;
    let face = sweep(ctx.profile, (BACK_BOTTOM, FRONT_BOTTOM), s0, s1)?;
    let guideline = ctx.guideline(kind, ctx.at(BACK_BOTTOM, s0), ctx.at(FRONT_BOTTOM, s0))?;
    ctx.group(kind, vec![face], guideline)
}

/// Hairpins along the front edge of a skewed span: a leg on the top slope,
/// the front face, and a leg under the bottom.
fn skew_edge(ctx: &SynthContext<'_>, kind: GroupKind, span: usize) -> Result<ReinforcementGroup> {
    let (s0, s1) = stations(ctx, span)?;
    let leg = LEG_DIAMETERS * ctx.diameter(kind)?;
    let toward = |from: usize, to: usize, s: usize| {
        let p = ctx.at(from, s);
        offset_corner(p, ctx.at(to, s) - p, leg)
    };
    let top = GeneratingFace::new(vec![
        toward(FRONT_EDGE_TOP, TOP_FRONT, s0)?,
        ctx.at(FRONT_EDGE_TOP, s0),
        ctx.at(FRONT_EDGE_TOP, s1),
        toward(FRONT_EDGE_TOP, TOP_FRONT, s1)?,
    ])?;
    let front = sweep(ctx.profile, (FRONT_EDGE_TOP, FRONT_BOTTOM), s0, s1)?;
    let bottom = GeneratingFace::new(vec![
        ctx.at(FRONT_BOTTOM, s0),
        toward(FRONT_BOTTOM, BACK_BOTTOM, s0)?,
        toward(FRONT_BOTTOM, BACK_BOTTOM, s1)?,
        ctx.at(FRONT_BOTTOM, s1),
    ])?;
    let guideline = ctx.guideline(kind, ctx.at(FRONT_BOTTOM, s0), ctx.at(FRONT_BOTTOM, s1))?;
    ctx.group(kind, vec![top, front, bottom], guideline)
}

/// U-bars around one end: the station polygon plus legs running into the
/// footing along its top and bottom.
fn end_closing(ctx: &SynthContext<'_>, kind: GroupKind, end: End) -> Result<ReinforcementGroup> {
    let s = end.station(ctx.profile);
    let inner = end.inner_station(ctx.profile);
    let leg = LEG_DIAMETERS * ctx.diameter(kind)?;
    let corners: Vec<_> = (0..ctx.profile.station(s).len()).map(|v| (v, s)).collect();
    let polygon = face(ctx.profile, &corners)?;

    let inward = direction(ctx.at(FRONT_BOTTOM, s), ctx.at(FRONT_BOTTOM, inner))?;
    let strip = |a: usize, b: usize| -> Result<GeneratingFace> {
        let (pa, pb) = (ctx.at(a, s), ctx.at(b, s));
        GeneratingFace::new(vec![
            pa,
            pb,
            offset_corner(pb, inward, leg)?,
            offset_corner(pa, inward, leg)?,
        ])
    };
    let faces = vec![
        polygon,
        strip(BACK_BOTTOM, FRONT_BOTTOM)?,
        strip(TOP_FRONT, TOP_BACK)?,
    ];
    let guideline =
        ctx.centered_guideline(kind, ctx.at(BACK_BOTTOM, s), ctx.at(FRONT_BOTTOM, s))?;
    ctx.group(kind, faces, guideline)
}

/// Longitudinal bars on the front slope. Only single-span footings have one
/// continuous slope to place them on.
fn slope_longitudinal(ctx: &SynthContext<'_>, kind: GroupKind) -> Result<ReinforcementGroup> {
    ctx.profile.require_single_span("footing slope bars")?;
    let face = sweep(ctx.profile, (FRONT_EDGE_TOP, TOP_FRONT), 0, 1)?;
    let guideline = ctx.guideline(kind, ctx.at(FRONT_EDGE_TOP, 0), ctx.at(TOP_FRONT, 0))?;
    ctx.group(kind, vec![face], guideline)
}
