//! Abutment profile, 10 vertices per station.
//!
//! ```text
//!                 v4 ______________ v3
//!                   |              |
//!               v5  \__            |   backwall
//!                      \ v6        |
//!                       |          |
//!                       |          |
//!                       |          |  v2
//!          heel  v7 ____|          \_______ v1   bearing seat
//!        v8 ____/                          |
//!          |                               |  front face
//!        v9 |_______________________________| v0
//!
//!     -Z  <--------------------------------------->  +Z
//! ```
//!
//! `FullWidth = Width + BackwallWidth + ShelfWidth`; vertex 0 sits at
//! `(0, -Height/2, FullWidth/2)`.

use rcbar_core::Result;

use crate::chain::Chain;
use crate::params::{AbutmentParams, ProfileParams};
use crate::section::CrossSection;
use crate::stations::StationPlan;
use crate::ProfileModel;

pub const TOE_BOTTOM: usize = 0;
pub const FRONT_TOP: usize = 1;
pub const SEAT_REAR: usize = 2;
pub const BACKWALL_FRONT_TOP: usize = 3;
pub const CANTILEVER_TIP_TOP: usize = 4;
pub const CANTILEVER_TIP_BOTTOM: usize = 5;
pub const CANTILEVER_ROOT: usize = 6;
pub const BACKWALL_BACK_BOTTOM: usize = 7;
pub const HEEL_TOP: usize = 8;
pub const HEEL_BOTTOM: usize = 9;

pub const CARDINALITY: usize = 10;

/// One station for the given overall height.
pub fn section(p: &AbutmentParams, height: f64) -> Result<CrossSection> {
    let half_width = p.full_width() / 2.0;
    let half_height = height / 2.0;
    Chain::start(-half_height, half_width)
        .rise(p.front_height)
        .step(p.skew_height, -p.width)
        .up_to(half_height)
        .across(-(p.backwall_width + p.cantilever_width))
        .rise(-p.backwall_top_height)
        .to(
            half_height - p.cantilever_height,
            half_width - p.width - p.backwall_width,
        )
        .up_to(-half_height + p.backwall_bottom_height + p.shelf_height)
        .step(-p.shelf_height, -p.shelf_width)
        .up_to(-half_height)
        .finish(CARDINALITY)
}

pub fn build(p: &AbutmentParams) -> Result<ProfileModel> {
    let plan = StationPlan::new(vec![p.length])?
        .with_governing(vec![p.height, p.height_end])?
        .with_offsets(vec![p.horizontal_offset], vec![p.vertical_offset])?;
    let stations = plan.build(|height| section(p, height))?;
    ProfileModel::new(ProfileParams::Abutment(p.clone()), plan.spans().to_vec(), stations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rcbar_core::ParameterMap;
    use rcbar_math::dvec3;

    fn params() -> AbutmentParams {
        let map = ParameterMap::new()
            .with("Width", 300)
            .with("Height", 2000)
            .with("FrontHeight", 400)
            .with("ShelfHeight", 250)
            .with("ShelfWidth", 600)
            .with("BackwallWidth", 400)
            .with("CantileverWidth", 300)
            .with("BackwallTopHeight", 300)
            .with("CantileverHeight", 600)
            .with("BackwallBottomHeight", 300)
            .with("SkewHeight", 200)
            .with("Length", 6000);
        AbutmentParams::from_map(&map).unwrap()
    }

    #[test]
    fn test_section_vertices() {
        let s = section(&params(), 2000.0).unwrap();
        assert_eq!(s[TOE_BOTTOM], dvec3(0.0, -1000.0, 650.0));
        assert_eq!(s[FRONT_TOP], dvec3(0.0, -600.0, 650.0));
        assert_eq!(s[SEAT_REAR], dvec3(0.0, -400.0, 350.0));
        assert_eq!(s[BACKWALL_FRONT_TOP], dvec3(0.0, 1000.0, 350.0));
        assert_eq!(s[CANTILEVER_TIP_TOP], dvec3(0.0, 1000.0, -350.0));
        assert_eq!(s[CANTILEVER_TIP_BOTTOM], dvec3(0.0, 700.0, -350.0));
        assert_eq!(s[CANTILEVER_ROOT], dvec3(0.0, 400.0, -50.0));
        assert_eq!(s[BACKWALL_BACK_BOTTOM], dvec3(0.0, -450.0, -50.0));
        assert_eq!(s[HEEL_TOP], dvec3(0.0, -700.0, -650.0));
        assert_eq!(s[HEEL_BOTTOM], dvec3(0.0, -1000.0, -650.0));
    }

    #[test]
    fn test_tapered_end_station() {
        let mut p = params();
        p.height_end = 2400.0;
        let model = build(&p).unwrap();
        assert_eq!(model.at(TOE_BOTTOM, 1).y, -1200.0);
        assert_eq!(model.at(BACKWALL_FRONT_TOP, 1).y, 1200.0);
        assert_eq!(model.at(TOE_BOTTOM, 0).y, -1000.0);
    }
}
