//! Footing profile, 6 vertices per station.
//!
//! ```text
//!                 v3 ________ v2
//!                   /        \
//!         v4 ______/          \______ v1
//!           |                        |
//!         v5|________________________| v0
//! ```
//!
//! Footings are the only family built as chains of more than two stations:
//! each span may carry its own lateral and vertical offset (skewed or stepped
//! footings) and each station its own thickness.

use rcbar_core::Result;

use crate::chain::Chain;
use crate::params::{FootingParams, ProfileParams};
use crate::section::CrossSection;
use crate::stations::StationPlan;
use crate::ProfileModel;

pub const FRONT_BOTTOM: usize = 0;
pub const FRONT_EDGE_TOP: usize = 1;
pub const TOP_FRONT: usize = 2;
pub const TOP_BACK: usize = 3;
pub const BACK_EDGE_TOP: usize = 4;
pub const BACK_BOTTOM: usize = 5;

pub const CARDINALITY: usize = 6;

pub fn section(p: &FootingParams, height: f64) -> Result<CrossSection> {
    let half_width = p.width / 2.0;
    let half_height = height / 2.0;
    Chain::start(-half_height, half_width)
        .rise(p.edge_height)
        .to(half_height, p.top_width / 2.0)
        .across(-p.top_width)
        .to(-half_height + p.edge_height, -half_width)
        .up_to(-half_height)
        .finish(CARDINALITY)
}

pub fn build(p: &FootingParams) -> Result<ProfileModel> {
    let plan = StationPlan::new(p.lengths.clone())?
        .with_governing(p.heights.clone())?
        .with_offsets(p.horizontal_offsets.clone(), p.vertical_offsets.clone())?;
    let stations = plan.build(|height| section(p, height))?;
    ProfileModel::new(ProfileParams::Footing(p.clone()), plan.spans().to_vec(), stations)
}
