//! RCBar profile builder.
//!
//! Maps a family's named scalar dimensions and span lengths to a
//! [`ProfileModel`]: ordered stations whose vertex lists share one topology.

pub mod abutment;
pub mod builder;
pub mod chain;
pub mod family;
pub mod footing;
pub mod model;
pub mod params;
pub mod section;
pub mod stations;
pub mod wall;

pub use builder::ProfileBuilder;
pub use family::ProfileFamily;
pub use model::{Extremum, ProfileModel};
pub use params::{AbutmentParams, FootingParams, ProfileParams, WallParams};
pub use section::CrossSection;
pub use stations::{station_offsets, StationPlan};
