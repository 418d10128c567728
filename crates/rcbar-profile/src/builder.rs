//! Family dispatch for the profile builder.

use log::debug;
use rcbar_core::{ParameterMap, Result};

use crate::family::ProfileFamily;
use crate::model::ProfileModel;
use crate::params::ProfileParams;
use crate::{abutment, footing, wall};

pub struct ProfileBuilder;

impl ProfileBuilder {
    /// Parse the family's parameters from `map` and build its profile.
    pub fn build(family: ProfileFamily, map: &ParameterMap) -> Result<ProfileModel> {
        let params = ProfileParams::from_map(family, map)?;
        Self::from_params(&params)
    }

    /// Same as [`build`](Self::build) with the family given by name.
    pub fn build_named(family: &str, map: &ParameterMap) -> Result<ProfileModel> {
        Self::build(family.parse()?, map)
    }

    pub fn from_params(params: &ProfileParams) -> Result<ProfileModel> {
        let model = match params {
            ProfileParams::Abutment(p) => abutment::build(p)?,
            ProfileParams::Footing(p) => footing::build(p)?,
            ProfileParams::RetainingWall(p) => wall::build(p, ProfileFamily::RetainingWall)?,
            ProfileParams::WingWall(p) => wall::build(p, ProfileFamily::WingWall)?,
        };
        debug!(
            "built {} profile: {} stations of {} vertices, length {}",
            model.family(),
            model.station_count(),
            model.family().cardinality(),
            model.length()
        );
        Ok(model)
    }
}
