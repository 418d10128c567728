//! The closed set of reinforcement group kinds.
//!
//! Each kind has a configuration prefix, a method name persisted on the host
//! as the group's creating method, and a rebuild function producing the
//! group from a profile.

use std::fmt;

use rcbar_core::{RcbarError, Result};
use rcbar_profile::{ProfileFamily, ProfileModel};
use rcbar_rebar::ReinforcementGroup;
use serde::{Deserialize, Serialize};

use crate::synth::{self, SynthContext};

/// Which end station of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum End {
    Start,
    End,
}

impl End {
    pub fn name(self) -> &'static str {
        match self {
            End::Start => "Start",
            End::End => "End",
        }
    }

    /// Station index of this end in `profile`.
    pub fn station(self, profile: &ProfileModel) -> usize {
        match self {
            End::Start => 0,
            End::End => profile.station_count() - 1,
        }
    }

    /// Station index one step inside the element.
    pub fn inner_station(self, profile: &ProfileModel) -> usize {
        match self {
            End::Start => 1,
            End::End => profile.station_count() - 2,
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "Start" => Some(End::Start),
            "End" => Some(End::End),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AbutmentGroup {
    OuterVertical,
    InnerVertical,
    BottomTransverse,
    ShelfTransverse,
    BackwallStirrup,
    CantileverLongitudinal,
    SeatSkew,
    FrontLongitudinal,
    BackLongitudinal,
    EndClosing(End),
}

/// Footing kinds; indexed kinds belong to one span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FootingGroup {
    BottomTransverse(usize),
    TopTransverse(usize),
    BottomLongitudinal(usize),
    SkewEdge(usize),
    EndClosing(End),
    SlopeLongitudinal,
}

/// Retaining wall and wing wall kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WallGroup {
    StemFront,
    StemBack,
    StemFrontLongitudinal,
    StemBackLongitudinal,
    BaseBottom,
    BaseTop,
    BaseLongitudinal,
    StemCap,
    EndClosing(End),
    SkewEndClosing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum GroupKind {
    Abutment(AbutmentGroup),
    Footing(FootingGroup),
    Wall(WallGroup),
}

const ABUTMENT_PREFIXES: &[&str] = &[
    "OVR", "IVR", "BTR", "STR", "BWS", "CLR", "SSR", "FLR", "BLR", "ECR",
];
const FOOTING_PREFIXES: &[&str] = &["FBT", "FTT", "FBL", "FSE", "FEC", "FSL"];
const WALL_PREFIXES: &[&str] = &["WSF", "WSB", "WFL", "WBL", "WBB", "WBT", "WLB", "WSC", "WEC"];
const WING_PREFIXES: &[&str] = &[
    "WSF", "WSB", "WFL", "WBL", "WBB", "WBT", "WLB", "WSC", "WEC", "WSK",
];

impl GroupKind {
    /// Configuration prefix of the kind's `{prefix}_{key}` entries.
    pub fn prefix(&self) -> &'static str {
        match self {
            GroupKind::Abutment(g) => match g {
                AbutmentGroup::OuterVertical => "OVR",
                AbutmentGroup::InnerVertical => "IVR",
                AbutmentGroup::BottomTransverse => "BTR",
                AbutmentGroup::ShelfTransverse => "STR",
                AbutmentGroup::BackwallStirrup => "BWS",
                AbutmentGroup::CantileverLongitudinal => "CLR",
                AbutmentGroup::SeatSkew => "SSR",
                AbutmentGroup::FrontLongitudinal => "FLR",
                AbutmentGroup::BackLongitudinal => "BLR",
                AbutmentGroup::EndClosing(_) => "ECR",
            },
            GroupKind::Footing(g) => match g {
                FootingGroup::BottomTransverse(_) => "FBT",
                FootingGroup::TopTransverse(_) => "FTT",
                FootingGroup::BottomLongitudinal(_) => "FBL",
                FootingGroup::SkewEdge(_) => "FSE",
                FootingGroup::EndClosing(_) => "FEC",
                FootingGroup::SlopeLongitudinal => "FSL",
            },
            GroupKind::Wall(g) => match g {
                WallGroup::StemFront => "WSF",
                WallGroup::StemBack => "WSB",
                WallGroup::StemFrontLongitudinal => "WFL",
                WallGroup::StemBackLongitudinal => "WBL",
                WallGroup::BaseBottom => "WBB",
                WallGroup::BaseTop => "WBT",
                WallGroup::BaseLongitudinal => "WLB",
                WallGroup::StemCap => "WSC",
                WallGroup::EndClosing(_) => "WEC",
                WallGroup::SkewEndClosing => "WSK",
            },
        }
    }

    /// Name stored on the host as the group's creating method.
    pub fn method_name(&self) -> String {
        match self {
            GroupKind::Abutment(g) => match g {
                AbutmentGroup::EndClosing(end) => format!("EndClosing{}", end.name()),
                other => format!("{other:?}"),
            },
            GroupKind::Footing(g) => match g {
                FootingGroup::BottomTransverse(i) => format!("FootingBottomTransverse_{i}"),
                FootingGroup::TopTransverse(i) => format!("FootingTopTransverse_{i}"),
                FootingGroup::BottomLongitudinal(i) => format!("FootingBottomLongitudinal_{i}"),
                FootingGroup::SkewEdge(i) => format!("FootingSkewEdge_{i}"),
                FootingGroup::EndClosing(end) => format!("FootingEndClosing{}", end.name()),
                FootingGroup::SlopeLongitudinal => "FootingSlopeLongitudinal".to_string(),
            },
            GroupKind::Wall(g) => match g {
                WallGroup::EndClosing(end) => format!("WallEndClosing{}", end.name()),
                other => format!("{other:?}"),
            },
        }
    }

    /// Inverse of [`method_name`](Self::method_name).
    pub fn from_method_name(name: &str) -> Result<Self> {
        let unknown = || RcbarError::UnknownGroupName(name.to_string());

        if let Some((base, index)) = name.rsplit_once('_') {
            let i: usize = index.parse().map_err(|_| unknown())?;
            let g = match base {
                "FootingBottomTransverse" => FootingGroup::BottomTransverse(i),
                "FootingTopTransverse" => FootingGroup::TopTransverse(i),
                "FootingBottomLongitudinal" => FootingGroup::BottomLongitudinal(i),
                "FootingSkewEdge" => FootingGroup::SkewEdge(i),
                _ => return Err(unknown()),
            };
            return Ok(GroupKind::Footing(g));
        }

        let ended = |stem: &str| name.strip_prefix(stem).and_then(End::parse);
        if let Some(end) = ended("FootingEndClosing") {
            return Ok(GroupKind::Footing(FootingGroup::EndClosing(end)));
        }
        if let Some(end) = ended("WallEndClosing") {
            return Ok(GroupKind::Wall(WallGroup::EndClosing(end)));
        }
        if let Some(end) = ended("EndClosing") {
            return Ok(GroupKind::Abutment(AbutmentGroup::EndClosing(end)));
        }

        let kind = match name {
            "OuterVertical" => GroupKind::Abutment(AbutmentGroup::OuterVertical),
            "InnerVertical" => GroupKind::Abutment(AbutmentGroup::InnerVertical),
            "BottomTransverse" => GroupKind::Abutment(AbutmentGroup::BottomTransverse),
            "ShelfTransverse" => GroupKind::Abutment(AbutmentGroup::ShelfTransverse),
            "BackwallStirrup" => GroupKind::Abutment(AbutmentGroup::BackwallStirrup),
            "CantileverLongitudinal" => GroupKind::Abutment(AbutmentGroup::CantileverLongitudinal),
            "SeatSkew" => GroupKind::Abutment(AbutmentGroup::SeatSkew),
            "FrontLongitudinal" => GroupKind::Abutment(AbutmentGroup::FrontLongitudinal),
            "BackLongitudinal" => GroupKind::Abutment(AbutmentGroup::BackLongitudinal),
            "FootingSlopeLongitudinal" => GroupKind::Footing(FootingGroup::SlopeLongitudinal),
            "StemFront" => GroupKind::Wall(WallGroup::StemFront),
            "StemBack" => GroupKind::Wall(WallGroup::StemBack),
            "StemFrontLongitudinal" => GroupKind::Wall(WallGroup::StemFrontLongitudinal),
            "StemBackLongitudinal" => GroupKind::Wall(WallGroup::StemBackLongitudinal),
            "BaseBottom" => GroupKind::Wall(WallGroup::BaseBottom),
            "BaseTop" => GroupKind::Wall(WallGroup::BaseTop),
            "BaseLongitudinal" => GroupKind::Wall(WallGroup::BaseLongitudinal),
            "StemCap" => GroupKind::Wall(WallGroup::StemCap),
            "SkewEndClosing" => GroupKind::Wall(WallGroup::SkewEndClosing),
            _ => return Err(unknown()),
        };
        Ok(kind)
    }

    /// Whether the kind belongs to `family`.
    pub fn fits(&self, family: ProfileFamily) -> bool {
        match self {
            GroupKind::Abutment(_) => family == ProfileFamily::Abutment,
            GroupKind::Footing(_) => family == ProfileFamily::Footing,
            GroupKind::Wall(WallGroup::SkewEndClosing) => family == ProfileFamily::WingWall,
            GroupKind::Wall(_) => {
                matches!(family, ProfileFamily::RetainingWall | ProfileFamily::WingWall)
            }
        }
    }

    /// Configuration prefixes used by `family`.
    pub fn prefixes(family: ProfileFamily) -> &'static [&'static str] {
        match family {
            ProfileFamily::Abutment => ABUTMENT_PREFIXES,
            ProfileFamily::Footing => FOOTING_PREFIXES,
            ProfileFamily::RetainingWall => WALL_PREFIXES,
            ProfileFamily::WingWall => WING_PREFIXES,
        }
    }

    /// The family's ordered group sequence for `profile`.
    ///
    /// Kinds that do not apply to this particular profile (skew groups on
    /// square elements, slope bars on multi-span footings) are left out.
    pub fn sequence(profile: &ProfileModel) -> Vec<GroupKind> {
        match profile.family() {
            ProfileFamily::Abutment => [
                AbutmentGroup::OuterVertical,
                AbutmentGroup::InnerVertical,
                AbutmentGroup::BottomTransverse,
                AbutmentGroup::ShelfTransverse,
                AbutmentGroup::BackwallStirrup,
                AbutmentGroup::CantileverLongitudinal,
                AbutmentGroup::SeatSkew,
                AbutmentGroup::FrontLongitudinal,
                AbutmentGroup::BackLongitudinal,
                AbutmentGroup::EndClosing(End::Start),
                AbutmentGroup::EndClosing(End::End),
            ]
            .into_iter()
            .map(GroupKind::Abutment)
            .collect(),
            ProfileFamily::Footing => {
                let params = profile.params().as_footing();
                let mut kinds = Vec::new();
                for span in 0..profile.span_count() {
                    kinds.push(FootingGroup::BottomTransverse(span));
                    kinds.push(FootingGroup::TopTransverse(span));
                    kinds.push(FootingGroup::BottomLongitudinal(span));
                    if params.is_some_and(|p| p.is_skewed(span)) {
                        kinds.push(FootingGroup::SkewEdge(span));
                    }
                }
                kinds.push(FootingGroup::EndClosing(End::Start));
                kinds.push(FootingGroup::EndClosing(End::End));
                if profile.span_count() == 1 {
                    kinds.push(FootingGroup::SlopeLongitudinal);
                }
                kinds.into_iter().map(GroupKind::Footing).collect()
            }
            family @ (ProfileFamily::RetainingWall | ProfileFamily::WingWall) => {
                let mut kinds = vec![
                    WallGroup::StemFront,
                    WallGroup::StemBack,
                    WallGroup::StemFrontLongitudinal,
                    WallGroup::StemBackLongitudinal,
                    WallGroup::BaseBottom,
                    WallGroup::BaseTop,
                    WallGroup::BaseLongitudinal,
                    WallGroup::StemCap,
                    WallGroup::EndClosing(End::Start),
                    WallGroup::EndClosing(End::End),
                ];
                let skewed = profile.params().as_wall().is_some_and(|p| p.is_skewed());
                if family == ProfileFamily::WingWall && skewed {
                    kinds.push(WallGroup::SkewEndClosing);
                }
                kinds.into_iter().map(GroupKind::Wall).collect()
            }
        }
    }

    /// Build the group of this kind from `ctx`.
    pub fn rebuild(&self, ctx: &SynthContext<'_>) -> Result<ReinforcementGroup> {
        if !self.fits(ctx.profile.family()) {
            return Err(RcbarError::UnsupportedConfiguration(format!(
                "{self} does not apply to a {} profile",
                ctx.profile.family()
            )));
        }
        match *self {
            GroupKind::Abutment(g) => synth::abutment::build(ctx, g),
            GroupKind::Footing(g) => synth::footing::build(ctx, g),
            GroupKind::Wall(g) => synth::wall::build(ctx, g),
        }
    }
}

impl fmt::Display for GroupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.method_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_names_round_trip() {
        let kinds = [
            GroupKind::Abutment(AbutmentGroup::OuterVertical),
            GroupKind::Abutment(AbutmentGroup::EndClosing(End::End)),
            GroupKind::Footing(FootingGroup::TopTransverse(2)),
            GroupKind::Footing(FootingGroup::EndClosing(End::Start)),
            GroupKind::Footing(FootingGroup::SlopeLongitudinal),
            GroupKind::Wall(WallGroup::EndClosing(End::Start)),
            GroupKind::Wall(WallGroup::SkewEndClosing),
        ];
        for kind in kinds {
            assert_eq!(GroupKind::from_method_name(&kind.method_name()).unwrap(), kind);
        }
        assert_eq!(
            GroupKind::Abutment(AbutmentGroup::EndClosing(End::Start)).method_name(),
            "EndClosingStart"
        );
        assert_eq!(
            GroupKind::Footing(FootingGroup::BottomTransverse(1)).method_name(),
            "FootingBottomTransverse_1"
        );
    }

    #[test]
    fn test_unknown_names() {
        for name in ["InnerVerticalRebar", "FootingSkewEdge_x", "Mystery_3", "EndClosingMiddle"] {
            assert!(matches!(
                GroupKind::from_method_name(name),
                Err(RcbarError::UnknownGroupName(_))
            ));
        }
    }

    #[test]
    fn test_prefixes_cover_kinds() {
        let kind = GroupKind::Wall(WallGroup::SkewEndClosing);
        assert!(GroupKind::prefixes(ProfileFamily::WingWall).contains(&kind.prefix()));
        assert!(!GroupKind::prefixes(ProfileFamily::RetainingWall).contains(&kind.prefix()));
        assert!(!kind.fits(ProfileFamily::RetainingWall));
        assert!(GroupKind::Wall(WallGroup::StemCap).fits(ProfileFamily::WingWall));
    }
}
