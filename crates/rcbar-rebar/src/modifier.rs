//! End-detail modifiers attached to an inserted group.
//!
//! Every modifier carries a reference curve: a short polyline that selects
//! which end or segment of each placed bar it applies to.

use rcbar_core::{RcbarError, Result, Validate};
use rcbar_math::{offset, Point3, Transform, Vector3};
use serde::{Deserialize, Serialize};

/// Minimum stagger between paired splitters, in lap lengths.
pub const STAGGER_FACTOR: f64 = 1.3;

/// Lap length in bar diameters.
pub const LAP_DIAMETERS: f64 = 40.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceCurve {
    points: Vec<Point3>,
}

impl ReferenceCurve {
    pub fn new(points: Vec<Point3>) -> Result<Self> {
        let curve = Self { points };
        curve.validate()?;
        Ok(curve)
    }

    pub fn segment(a: Point3, b: Point3) -> Result<Self> {
        Self::new(vec![a, b])
    }

    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    pub fn start(&self) -> Point3 {
        self.points[0]
    }

    pub fn end(&self) -> Point3 {
        self.points[self.points.len() - 1]
    }

    /// Every point moved by exactly `distance` along `dir`.
    pub fn offset(&self, dir: Vector3, distance: f64) -> Result<Self> {
        let points = self
            .points
            .iter()
            .map(|&p| offset(p, dir, distance))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { points })
    }

    pub fn transformed(&self, transform: &Transform) -> Self {
        Self {
            points: self
                .points
                .iter()
                .map(|&p| transform.transform_point(p))
                .collect(),
        }
    }
}

impl Validate for ReferenceCurve {
    fn validate(&self) -> Result<()> {
        if self.points.len() < 2 {
            return Err(RcbarError::degenerate("reference curve needs at least 2 points"));
        }
        if self.points.windows(2).any(|w| w[0] == w[1]) {
            return Err(RcbarError::degenerate(format!(
                "reference curve repeats point {}",
                self.points[0]
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LengthAdjustment {
    /// Shorten or extend the selected leg along its own direction.
    LegLength,
    /// Shift the bar end instead of changing the leg.
    EndOffset,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum HookShape {
    Deg90,
    Deg135,
    Deg180,
    Custom { angle: f64, length: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LapPlacement {
    Left,
    Middle,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LapSide {
    Left,
    Right,
}

/// Every `every_nth` bar, counting from bar number `first` (1-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarSubset {
    pub every_nth: u32,
    pub first: u32,
}

impl BarSubset {
    pub const ALL: BarSubset = BarSubset {
        every_nth: 1,
        first: 1,
    };

    pub fn new(every_nth: u32, first: u32) -> Self {
        Self { every_nth, first }
    }

    /// Whether 1-based bar `number` is selected.
    pub fn contains(&self, number: u32) -> bool {
        number >= self.first && (number - self.first) % self.every_nth.max(1) == 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Modifier {
    LengthAdjustment {
        kind: LengthAdjustment,
        length: f64,
        curve: ReferenceCurve,
    },
    Hook {
        shape: HookShape,
        rotation: f64,
        curve: ReferenceCurve,
    },
    Splitter {
        placement: LapPlacement,
        side: LapSide,
        bars: BarSubset,
        offset: f64,
        lap_length: f64,
        curve: ReferenceCurve,
    },
    PropertyOverride {
        diameter: Option<f64>,
        grade: Option<String>,
        curve: ReferenceCurve,
    },
}

impl Modifier {
    pub fn leg_length(length: f64, curve: ReferenceCurve) -> Self {
        Self::LengthAdjustment {
            kind: LengthAdjustment::LegLength,
            length,
            curve,
        }
    }

    pub fn end_offset(length: f64, curve: ReferenceCurve) -> Self {
        Self::LengthAdjustment {
            kind: LengthAdjustment::EndOffset,
            length,
            curve,
        }
    }

    pub fn hook(shape: HookShape, curve: ReferenceCurve) -> Self {
        Self::Hook {
            shape,
            rotation: 0.0,
            curve,
        }
    }

    pub fn curve(&self) -> &ReferenceCurve {
        match self {
            Self::LengthAdjustment { curve, .. }
            | Self::Hook { curve, .. }
            | Self::Splitter { curve, .. }
            | Self::PropertyOverride { curve, .. } => curve,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::LengthAdjustment {
                kind: LengthAdjustment::LegLength,
                ..
            } => "LegLength",
            Self::LengthAdjustment {
                kind: LengthAdjustment::EndOffset,
                ..
            } => "EndOffset",
            Self::Hook { .. } => "Hook",
            Self::Splitter { .. } => "Splitter",
            Self::PropertyOverride { .. } => "PropertyOverride",
        }
    }

    pub fn transformed(&self, transform: &Transform) -> Self {
        let mut out = self.clone();
        let curve = match &mut out {
            Self::LengthAdjustment { curve, .. }
            | Self::Hook { curve, .. }
            | Self::Splitter { curve, .. }
            | Self::PropertyOverride { curve, .. } => curve,
        };
        *curve = curve.transformed(transform);
        out
    }
}

impl Validate for Modifier {
    fn validate(&self) -> Result<()> {
        self.curve().validate()?;
        match self {
            Self::Splitter {
                bars, lap_length, ..
            } => {
                if bars.every_nth == 0 || bars.first == 0 {
                    return Err(RcbarError::parameter("splitter bar subset is 1-based"));
                }
                if *lap_length <= 0.0 {
                    return Err(RcbarError::parameter("splitter lap length must be positive"));
                }
            }
            Self::PropertyOverride {
                diameter, grade, ..
            } => {
                if diameter.is_none() && grade.is_none() {
                    return Err(RcbarError::parameter("property override changes nothing"));
                }
                if diameter.is_some_and(|d| d <= 0.0) {
                    return Err(RcbarError::parameter("override diameter must be positive"));
                }
            }
            _ => {}
        }
        Ok(())
    }
}

/// Staggered splitter pair for bars of diameter `diameter`.
///
/// The first splitter sits at `offset` from `edge` along `dir` and cuts every
/// second bar from bar 1; the top splitter sits `1.3 * 40 * d` further and
/// cuts every second bar from bar 2, so adjacent bars never splice at the
/// same station.
pub fn splitter_pair(
    edge: &ReferenceCurve,
    dir: Vector3,
    offset: f64,
    diameter: f64,
) -> Result<[Modifier; 2]> {
    let lap_length = LAP_DIAMETERS * diameter;
    let top_offset = offset + STAGGER_FACTOR * lap_length;
    let splitter = |at: f64, first: u32| -> Result<Modifier> {
        Ok(Modifier::Splitter {
            placement: LapPlacement::Middle,
            side: LapSide::Left,
            bars: BarSubset::new(2, first),
            offset: at,
            lap_length,
            curve: edge.offset(dir, at)?,
        })
    };
    Ok([splitter(offset, 1)?, splitter(top_offset, 2)?])
}
