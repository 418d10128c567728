//! Construction helpers shared by every family's group builders.
//!
//! Faces and guideline endpoints come from one of three patterns:
//!
//! 1. static polygons picked from a topology table of `(vertex, station)`
//!    corners ([`face`], [`quad`], [`sweep`]);
//! 2. offset corners, profile points moved by a literal distance, usually a
//!    multiple of the bar diameter ([`offset_corner`]);
//! 3. plane cuts, an edge intersected with a construction plane built from
//!    another station ([`plane_cut`], [`station_plane`]).

use rcbar_core::{RcbarError, Result, Tolerance};
use rcbar_math::{extended_intersect, offset, polygon_normal, Line, Plane, Point3, Vector3};
use rcbar_profile::{CrossSection, ProfileModel};

use crate::face::GeneratingFace;

/// `(vertex, station)` of a profile.
pub type Corner = (usize, usize);

/// Relaxation steps allowed for plane cuts.
pub const MAX_RELAXATION: u32 = 6;

pub fn corner(profile: &ProfileModel, (vertex, station): Corner) -> Result<Point3> {
    profile
        .stations()
        .get(station)
        .and_then(|s| s.get(vertex))
        .ok_or_else(|| {
            RcbarError::InvalidState(format!(
                "{} profile has no vertex {vertex} at station {station}",
                profile.family()
            ))
        })
}

/// Closed polygon through `corners` in the given cyclic order.
pub fn face(profile: &ProfileModel, corners: &[Corner]) -> Result<GeneratingFace> {
    let points = corners
        .iter()
        .map(|&c| corner(profile, c))
        .collect::<Result<Vec<_>>>()?;
    GeneratingFace::new(points)
}

pub fn quad(profile: &ProfileModel, corners: [Corner; 4]) -> Result<GeneratingFace> {
    face(profile, &corners)
}

/// Edge `from -> to` swept between two stations:
/// `[from@s0, to@s0, to@s1, from@s1]`.
pub fn sweep(
    profile: &ProfileModel,
    (from, to): (usize, usize),
    s0: usize,
    s1: usize,
) -> Result<GeneratingFace> {
    quad(profile, [(from, s0), (to, s0), (to, s1), (from, s1)])
}

/// Profile point moved by exactly `distance` along `dir`.
pub fn offset_corner(point: Point3, dir: Vector3, distance: f64) -> Result<Point3> {
    offset(point, dir, distance)
}

/// Intersection of `edge` with `plane`, relaxing the parallelism threshold
/// for edges that are only nearly coplanar.
pub fn plane_cut(edge: &Line, plane: &Plane) -> Result<Point3> {
    extended_intersect(edge, plane, MAX_RELAXATION, Tolerance::default())
}

/// Normal of a station polygon, following its winding.
pub fn section_normal(section: &CrossSection) -> Result<Vector3> {
    polygon_normal(section.points())
        .ok_or_else(|| RcbarError::degenerate(format!("station at x = {} has no area", section.x())))
}

/// Plane of one station, for stations that are not square to the axis.
pub fn station_plane(profile: &ProfileModel, station: usize) -> Result<Plane> {
    let section = profile.station(station);
    Plane::from_normal(section[0], section_normal(section)?)
}
