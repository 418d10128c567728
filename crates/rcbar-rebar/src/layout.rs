//! Bar layout: placed instances of a group.
//!
//! Each instance sits at one spacing position on the guideline. Its legs are
//! the segments cut out of every generating face by the plane through the
//! instance, normal to the guideline. With a secondary guideline the cutting
//! plane also passes through the matching secondary point.

use log::trace;
use rcbar_core::{Result, Tolerance};
use rcbar_math::{Plane, Point3, Vector3};
use serde::{Deserialize, Serialize};

use crate::face::GeneratingFace;
use crate::group::ReinforcementGroup;
use crate::modifier::Modifier;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedBar {
    /// 1-based bar number along the guideline.
    pub number: u32,
    pub position: Point3,
    /// One segment per face the cutting plane crosses.
    pub legs: Vec<(Point3, Point3)>,
    pub diameter: f64,
    /// Guideline-relative offsets of the splitters cutting this bar.
    pub splices: Vec<f64>,
}

impl PlacedBar {
    pub fn length(&self) -> f64 {
        self.legs.iter().map(|(a, b)| (*b - *a).length()).sum()
    }
}

pub fn realize(group: &ReinforcementGroup) -> Result<Vec<PlacedBar>> {
    let guideline = &group.guideline;
    let axis = guideline.direction()?;
    let points = guideline.instance_points()?;
    let secondary = guideline.secondary_points()?;

    let mut bars = Vec::with_capacity(points.len());
    for (i, &position) in points.iter().enumerate() {
        let normal = match &secondary {
            Some(others) => cutting_normal(axis, others[i] - position),
            None => axis,
        };
        let plane = Plane::from_normal(position, normal)?;
        let legs = group
            .faces
            .iter()
            .filter_map(|face| slice(face, &plane))
            .collect();
        let number = i as u32 + 1;
        let t = (position - guideline.start).dot(axis);
        bars.push(PlacedBar {
            number,
            position,
            legs,
            diameter: diameter_at(group, t, axis),
            splices: splices_of(group, number),
        });
    }
    trace!("{}: realized {} bars", group.name, bars.len());
    Ok(bars)
}

/// Normal closest to the axis among planes containing `span`.
fn cutting_normal(axis: Vector3, span: Vector3) -> Vector3 {
    let Some(u) = span.try_normalize() else {
        return axis;
    };
    let n = axis - u * axis.dot(u);
    if n.length_squared() < Tolerance::DEFAULT_LINEAR {
        axis
    } else {
        n
    }
}

/// Segment of `face` on `plane`, between its two extreme crossings.
fn slice(face: &GeneratingFace, plane: &Plane) -> Option<(Point3, Point3)> {
    let points = face.points();
    let n = points.len();
    let eps = Tolerance::DEFAULT_LINEAR * (1.0 + plane.origin.abs().max_element());
    let dist: Vec<f64> = points.iter().map(|&p| plane.signed_distance(p)).collect();
    if dist.iter().all(|d| d.abs() <= eps) {
        return None;
    }

    let mut hits: Vec<Point3> = Vec::new();
    for i in 0..n {
        let j = (i + 1) % n;
        let (di, dj) = (dist[i], dist[j]);
        if di.abs() <= eps {
            hits.push(points[i]);
        } else if dj.abs() > eps && (di < 0.0) != (dj < 0.0) {
            let t = di / (di - dj);
            hits.push(points[i] + (points[j] - points[i]) * t);
        }
    }

    let mut best: Option<(Point3, Point3)> = None;
    let mut best_len = eps;
    for (k, &a) in hits.iter().enumerate() {
        for &b in &hits[k + 1..] {
            let len = (b - a).length();
            if len > best_len {
                best_len = len;
                best = Some((a, b));
            }
        }
    }
    best
}

/// Diameter at guideline distance `t`, after property overrides.
fn diameter_at(group: &ReinforcementGroup, t: f64, axis: Vector3) -> f64 {
    let start = group.guideline.start;
    group
        .modifiers
        .iter()
        .filter_map(|m| match m {
            Modifier::PropertyOverride {
                diameter: Some(d),
                curve,
                ..
            } => {
                let a = (curve.start() - start).dot(axis);
                let b = (curve.end() - start).dot(axis);
                let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
                (lo <= t && t <= hi).then_some(*d)
            }
            _ => None,
        })
        .last()
        .unwrap_or(group.properties.diameter)
}

fn splices_of(group: &ReinforcementGroup, number: u32) -> Vec<f64> {
    group
        .modifiers
        .iter()
        .filter_map(|m| match m {
            Modifier::Splitter { bars, offset, .. } if bars.contains(number) => Some(*offset),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::BarProperties;
    use crate::guideline::PlacementGuideline;
    use crate::modifier::{splitter_pair, ReferenceCurve};
    use crate::spacing::SpacingRule;
    use approx::assert_relative_eq;
    use rcbar_math::dvec3;

    /// Vertical face at z = 650 running 6 m along X, 400 high.
    fn wall_group() -> ReinforcementGroup {
        let face = GeneratingFace::new(vec![
            dvec3(0.0, -1000.0, 650.0),
            dvec3(0.0, -600.0, 650.0),
            dvec3(6000.0, -600.0, 650.0),
            dvec3(6000.0, -1000.0, 650.0),
        ])
        .unwrap();
        let guideline = PlacementGuideline::new(
            dvec3(0.0, -1000.0, 650.0),
            dvec3(6000.0, -1000.0, 650.0),
            SpacingRule::exact(200.0).with_offsets(50.0, 50.0),
        )
        .unwrap();
        ReinforcementGroup::new("OuterVertical", BarProperties::new(16.0, "B500B", 32.0), guideline)
            .with_face(face, 0)
    }

    #[test]
    fn test_legs_span_face() {
        let bars = realize(&wall_group()).unwrap();
        assert_eq!(bars.len(), 29);
        for bar in &bars {
            assert_eq!(bar.legs.len(), 1);
            assert_relative_eq!(bar.length(), 400.0, epsilon = 1e-9);
            assert_relative_eq!(bar.legs[0].0.x, bar.position.x, epsilon = 1e-9);
        }
        assert_eq!(bars[0].number, 1);
    }

    #[test]
    fn test_adjacent_bars_splice_apart() {
        let mut group = wall_group();
        let edge = ReferenceCurve::segment(dvec3(0.0, -1000.0, 650.0), dvec3(6000.0, -1000.0, 650.0))
            .unwrap();
        for m in splitter_pair(&edge, dvec3(0.0, 1.0, 0.0), 1000.0, 16.0).unwrap() {
            group.modifiers.push(m);
        }
        let bars = realize(&group).unwrap();
        for pair in bars.windows(2) {
            assert_eq!(pair[0].splices.len(), 1);
            assert_ne!(pair[0].splices, pair[1].splices);
        }
    }

    #[test]
    fn test_property_override_bounds_region() {
        let mut group = wall_group();
        group.modifiers.push(Modifier::PropertyOverride {
            diameter: Some(12.0),
            grade: None,
            curve: ReferenceCurve::segment(dvec3(3000.0, -1000.0, 650.0), dvec3(6000.0, -1000.0, 650.0))
                .unwrap(),
        });
        let bars = realize(&group).unwrap();
        for bar in &bars {
            let expected = if bar.position.x >= 3000.0 { 12.0 } else { 16.0 };
            assert_eq!(bar.diameter, expected);
        }
        assert!(bars.iter().any(|b| b.diameter == 12.0));
        assert!(bars.iter().any(|b| b.diameter == 16.0));
    }

    #[test]
    fn test_face_missed_by_plane_has_no_leg() {
        let mut group = wall_group();
        let short = GeneratingFace::new(vec![
            dvec3(0.0, 0.0, 0.0),
            dvec3(0.0, 100.0, 0.0),
            dvec3(100.0, 100.0, 0.0),
        ])
        .unwrap();
        group = group.with_face(short, 1);
        let bars = realize(&group).unwrap();
        assert_eq!(bars[0].legs.len(), 1);
        assert_relative_eq!(bars[0].position.x, 150.0, epsilon = 1e-9);
        assert_eq!(bars[10].legs.len(), 1);
    }
}
