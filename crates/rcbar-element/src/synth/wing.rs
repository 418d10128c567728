//! Wing wall additions: the reduced diameter towards the free end and the
//! closing bars parallel to a skewed free end.

use log::debug;
use rcbar_core::{RcbarError, Result};
use rcbar_math::{lerp, Line};
use rcbar_profile::wall::{STEM_BACK_BOTTOM, STEM_BACK_TOP, STEM_FRONT_BOTTOM, STEM_FRONT_TOP};
use rcbar_profile::{ProfileFamily, ProfileModel};
use rcbar_rebar::construct::{plane_cut, station_plane};
use rcbar_rebar::{GeneratingFace, Modifier, ReferenceCurve, ReinforcementGroup};

use super::SynthContext;
use crate::kind::GroupKind;
use crate::settings::{key, GroupSettings};

/// Standard bar diameters in ascending order.
pub const BAR_DIAMETERS: [f64; 10] = [8.0, 10.0, 12.0, 14.0, 16.0, 20.0, 25.0, 28.0, 32.0, 40.0];

/// The standard diameter just below `d`.
pub fn next_smaller(d: f64) -> Option<f64> {
    BAR_DIAMETERS.iter().rev().copied().find(|&s| s < d)
}

/// Diameter and start distance of the reduced free-end region on a guideline
/// of `length`.
pub fn free_end_override(settings: &GroupSettings, length: f64) -> Result<(f64, f64)> {
    let diameter = match settings.override_diameter {
        Some(d) => d,
        None => next_smaller(settings.diameter).ok_or_else(|| {
            RcbarError::parameter(format!(
                "{} is required below {} mm bars",
                key(&settings.prefix, "OverrideDiameter"),
                settings.diameter
            ))
        })?,
    };
    let from = settings.override_from.unwrap_or(length / 2.0);
    if !(from > 0.0 && from < length) {
        return Err(RcbarError::parameter(format!(
            "{} = {from} lies outside the guideline (0, {length})",
            key(&settings.prefix, "OverrideFrom")
        )));
    }
    Ok((diameter, from))
}

/// Length of the stem front guideline, along which the override is measured.
pub fn stem_front_length(profile: &ProfileModel) -> f64 {
    let last = profile.station_count() - 1;
    (profile.at(STEM_FRONT_BOTTOM, last) - profile.at(STEM_FRONT_BOTTOM, 0)).length()
}

/// Reduce the diameter of `group` from the configured transition to the free
/// end of its guideline.
pub fn with_free_end_override(
    ctx: &SynthContext<'_>,
    kind: GroupKind,
    mut group: ReinforcementGroup,
) -> Result<ReinforcementGroup> {
    let guideline = &group.guideline;
    let length = guideline.length();
    let (diameter, from) = free_end_override(ctx.settings(kind)?, length)?;

    // The curve covers exactly the reduced region.
    let curve = ReferenceCurve::segment(
        lerp(guideline.start, guideline.end, from / length),
        guideline.end,
    )?;
    debug!("{kind}: {diameter} mm from {from:.1} to the free end");
    group.modifiers.push(Modifier::PropertyOverride {
        diameter: Some(diameter),
        grade: None,
        curve,
    });
    Ok(group)
}

/// Closing bars in a stem section parallel to the skewed free end, one cover
/// inside it.
pub fn skew_end_closing(ctx: &SynthContext<'_>, kind: GroupKind) -> Result<ReinforcementGroup> {
    let skewed = ctx.profile.params().as_wall().is_some_and(|p| p.is_skewed());
    if ctx.profile.family() != ProfileFamily::WingWall || !skewed {
        return Err(RcbarError::UnsupportedConfiguration(format!(
            "{kind} needs a wing wall with a skewed free end"
        )));
    }

    let last = ctx.last();
    let plane = station_plane(ctx.profile, last)?
        .facing(ctx.at(STEM_FRONT_BOTTOM, 0))
        .offset(ctx.cover());
    let cut = |vertex: usize| {
        plane_cut(&Line::new(ctx.at(vertex, 0), ctx.at(vertex, last)), &plane)
    };
    let section = GeneratingFace::new(vec![
        cut(STEM_FRONT_BOTTOM)?,
        cut(STEM_FRONT_TOP)?,
        cut(STEM_BACK_TOP)?,
        cut(STEM_BACK_BOTTOM)?,
    ])?;
    let guideline = ctx.guideline(kind, section.points()[0], section.points()[1])?;
    ctx.group(kind, vec![section], guideline)
}
