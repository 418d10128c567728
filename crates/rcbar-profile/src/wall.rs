//! Retaining wall and wing wall profiles, 8 vertices per station.
//!
//! ```text
//!                  v4 __ v3
//!                    |  |
//!                    |  |      stem
//!                    |  |
//!      v6 __________/    \__ v2
//!        |                   \__ v1   toe
//!      v7|______________________| v0
//! ```
//!
//! Wing walls share the topology and add a skewed free end: the last station
//! is sheared so that each vertex sits at `x = L + z * SkewRatio`.

use log::debug;
use rcbar_core::Result;

use crate::chain::Chain;
use crate::family::ProfileFamily;
use crate::params::{ProfileParams, WallParams};
use crate::section::CrossSection;
use crate::stations::StationPlan;
use crate::ProfileModel;

pub const TOE_BOTTOM: usize = 0;
pub const TOE_TOP: usize = 1;
pub const STEM_FRONT_BOTTOM: usize = 2;
pub const STEM_FRONT_TOP: usize = 3;
pub const STEM_BACK_TOP: usize = 4;
pub const STEM_BACK_BOTTOM: usize = 5;
pub const HEEL_TOP: usize = 6;
pub const HEEL_BOTTOM: usize = 7;

pub const CARDINALITY: usize = 8;

pub fn section(p: &WallParams, height: f64) -> Result<CrossSection> {
    let half_base = p.base_width / 2.0;
    let half_height = height / 2.0;
    let stem_front_z = half_base - p.toe_width;
    Chain::start(-half_height, half_base)
        .rise(p.toe_height)
        .step(p.base_height - p.toe_height, -p.toe_width)
        .up_to(half_height)
        .across(-p.stem_width_top)
        .to(-half_height + p.base_height, stem_front_z - p.stem_width_bottom)
        .to(-half_height + p.base_height, -half_base)
        .up_to(-half_height)
        .finish(CARDINALITY)
}

pub fn build(p: &WallParams, family: ProfileFamily) -> Result<ProfileModel> {
    let plan = StationPlan::new(vec![p.length])?
        .with_governing(vec![p.height, p.height_end])?
        .with_offsets(vec![p.horizontal_offset], vec![p.vertical_offset])?;
    let mut stations = plan.build(|height| section(p, height))?;

    let params = match family {
        ProfileFamily::WingWall => {
            if p.is_skewed() {
                debug!("wing wall free end skewed by {}", p.skew_ratio);
                let last = stations.len() - 1;
                stations[last] = stations[last].skewed(p.skew_ratio);
            }
            ProfileParams::WingWall(p.clone())
        }
        _ => ProfileParams::RetainingWall(p.clone()),
    };
    ProfileModel::new(params, plan.spans().to_vec(), stations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rcbar_core::ParameterMap;
    use rcbar_math::dvec3;

    fn map() -> ParameterMap {
        ParameterMap::new()
            .with("Height", 3000)
            .with("BaseWidth", 2000)
            .with("BaseHeight", 400)
            .with("ToeWidth", 500)
            .with("ToeHeight", 300)
            .with("StemWidthTop", 250)
            .with("StemWidthBottom", 400)
            .with("Length", 8000)
    }

    #[test]
    fn test_section_vertices() {
        let p = WallParams::from_map(&map(), ProfileFamily::RetainingWall).unwrap();
        let s = section(&p, 3000.0).unwrap();
        assert_eq!(s[TOE_BOTTOM], dvec3(0.0, -1500.0, 1000.0));
        assert_eq!(s[TOE_TOP], dvec3(0.0, -1200.0, 1000.0));
        assert_eq!(s[STEM_FRONT_BOTTOM], dvec3(0.0, -1100.0, 500.0));
        assert_eq!(s[STEM_FRONT_TOP], dvec3(0.0, 1500.0, 500.0));
        assert_eq!(s[STEM_BACK_TOP], dvec3(0.0, 1500.0, 250.0));
        assert_eq!(s[STEM_BACK_BOTTOM], dvec3(0.0, -1100.0, 100.0));
        assert_eq!(s[HEEL_TOP], dvec3(0.0, -1100.0, -1000.0));
        assert_eq!(s[HEEL_BOTTOM], dvec3(0.0, -1500.0, -1000.0));
    }

    #[test]
    fn test_wing_skew_shears_last_station() {
        let map = map().with("SkewRatio", 0.25);
        let p = WallParams::from_map(&map, ProfileFamily::WingWall).unwrap();
        let model = build(&p, ProfileFamily::WingWall).unwrap();
        assert_eq!(model.at(TOE_BOTTOM, 1).x, 8000.0 + 1000.0 * 0.25);
        assert_eq!(model.at(HEEL_BOTTOM, 1).x, 8000.0 - 1000.0 * 0.25);
        assert_eq!(model.at(TOE_BOTTOM, 0).x, 0.0);
    }
}
