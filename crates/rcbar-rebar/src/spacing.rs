//! Spacing rules and the instance-count arithmetic.
//!
//! Instances occupy pitch-wide cells along the guideline and sit at the cell
//! centres. A rule splits the length between its offsets into zones; each
//! zone is filled independently.
//!
//! * EXACT pitch: `count = floor(available / pitch)`. The leftover goes to
//!   the end, or is split evenly when the rule is centered.
//! * TARGET pitch: `count = ceil(available / target)` and the actual pitch is
//!   `available / count`, so the cells fill the zone exactly.
//! * MINIMUM offsets may shrink when that lets extra cells fit; EXACT offsets
//!   never do. Leftover next to a MINIMUM offset is given to that offset.

use rcbar_core::{RcbarError, Result, Validate};
use serde::{Deserialize, Serialize};

/// Slack for float ratios that should be integral (1800 / 200 must be 9).
const COUNT_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PitchType {
    Exact,
    Target,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExtentType {
    Absolute,
    /// Fraction of the length between the offsets.
    Relative,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OffsetType {
    Exact,
    Minimum,
}

impl std::str::FromStr for PitchType {
    type Err = RcbarError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "EXACT" => Ok(Self::Exact),
            "TARGET" => Ok(Self::Target),
            other => Err(RcbarError::parameter(format!("unknown pitch type '{other}'"))),
        }
    }
}

impl std::str::FromStr for OffsetType {
    type Err = RcbarError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "EXACT" => Ok(Self::Exact),
            "MINIMUM" => Ok(Self::Minimum),
            other => Err(RcbarError::parameter(format!("unknown offset type '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpacingZone {
    pub pitch: f64,
    pub pitch_type: PitchType,
    pub extent: f64,
    pub extent_type: ExtentType,
}

impl SpacingZone {
    pub fn new(pitch: f64, pitch_type: PitchType) -> Self {
        Self {
            pitch,
            pitch_type,
            extent: 1.0,
            extent_type: ExtentType::Relative,
        }
    }

    pub fn exact(pitch: f64) -> Self {
        Self::new(pitch, PitchType::Exact)
    }

    pub fn target(pitch: f64) -> Self {
        Self::new(pitch, PitchType::Target)
    }

    pub fn with_extent(mut self, extent: f64, extent_type: ExtentType) -> Self {
        self.extent = extent;
        self.extent_type = extent_type;
        self
    }
}

/// Zones plus start/end offsets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpacingRule {
    pub zones: Vec<SpacingZone>,
    pub start_offset: f64,
    pub start_offset_type: OffsetType,
    pub end_offset: f64,
    pub end_offset_type: OffsetType,
    pub centered: bool,
}

/// Cells of one zone, in guideline coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoneLayout {
    /// Start of the first cell.
    pub start: f64,
    pub count: usize,
    pub pitch: f64,
}

impl ZoneLayout {
    pub fn end(&self) -> f64 {
        self.start + self.count as f64 * self.pitch
    }
}

/// Result of laying a rule out along a given length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpacingLayout {
    pub length: f64,
    pub zones: Vec<ZoneLayout>,
    /// Instance distances from the guideline start.
    pub positions: Vec<f64>,
    /// Offsets actually left free at each end.
    pub start_offset: f64,
    pub end_offset: f64,
}

impl SpacingLayout {
    pub fn count(&self) -> usize {
        self.positions.len()
    }

    /// Positions as fractions of the guideline length.
    pub fn normalized(&self) -> Vec<f64> {
        self.positions.iter().map(|p| p / self.length).collect()
    }
}

/// `floor((available - start - end) / pitch)`, never negative.
pub fn exact_count(available: f64, pitch: f64, start: f64, end: f64) -> usize {
    let ratio = (available - start - end) / pitch;
    if ratio <= 0.0 || !ratio.is_finite() {
        return 0;
    }
    (ratio + COUNT_EPSILON).floor() as usize
}

/// `(ceil(available / target), available / count)`.
pub fn target_pitch(available: f64, target: f64) -> (usize, f64) {
    let ratio = available / target;
    if ratio <= 0.0 || !ratio.is_finite() {
        return (0, target);
    }
    let count = if (ratio - ratio.round()).abs() < COUNT_EPSILON {
        ratio.round()
    } else {
        ratio.ceil()
    };
    let count = (count as usize).max(1);
    (count, available / count as f64)
}

impl SpacingRule {
    /// Single-zone rule with zero EXACT offsets.
    pub fn new(zone: SpacingZone) -> Self {
        Self {
            zones: vec![zone],
            start_offset: 0.0,
            start_offset_type: OffsetType::Exact,
            end_offset: 0.0,
            end_offset_type: OffsetType::Exact,
            centered: false,
        }
    }

    pub fn exact(pitch: f64) -> Self {
        Self::new(SpacingZone::exact(pitch))
    }

    pub fn target(pitch: f64) -> Self {
        Self::new(SpacingZone::target(pitch))
    }

    pub fn with_zone(mut self, zone: SpacingZone) -> Self {
        self.zones.push(zone);
        self
    }

    pub fn with_offsets(mut self, start: f64, end: f64) -> Self {
        self.start_offset = start;
        self.end_offset = end;
        self
    }

    pub fn with_offset_types(mut self, start: OffsetType, end: OffsetType) -> Self {
        self.start_offset_type = start;
        self.end_offset_type = end;
        self
    }

    pub fn centered(mut self) -> Self {
        self.centered = true;
        self
    }

    /// Lay the rule out along a guideline of `length`.
    pub fn layout(&self, length: f64) -> Result<SpacingLayout> {
        self.validate()?;
        let available = length - self.start_offset - self.end_offset;
        if available <= 0.0 {
            return Err(RcbarError::parameter(format!(
                "offsets {} + {} leave no room on a guideline of {length}",
                self.start_offset, self.end_offset
            )));
        }

        let extents = self.zone_extents(available)?;
        let last = extents.len() - 1;
        let mut zones = Vec::with_capacity(extents.len());
        let mut cursor = self.start_offset;
        for (i, (zone, extent)) in self.zones.iter().zip(&extents).enumerate() {
            let slack_start = if i == 0 {
                self.slack(self.start_offset_type, self.start_offset)
            } else {
                0.0
            };
            let slack_end = if i == last {
                self.slack(self.end_offset_type, self.end_offset)
            } else {
                0.0
            };
            zones.push(self.fill_zone(zone, cursor, *extent, slack_start, slack_end));
            cursor += extent;
        }

        let positions: Vec<f64> = zones
            .iter()
            .flat_map(|z| (0..z.count).map(move |k| z.start + (k as f64 + 0.5) * z.pitch))
            .collect();
        if positions.is_empty() {
            return Err(RcbarError::parameter(format!(
                "spacing leaves no room for a bar on a guideline of {length}"
            )));
        }

        let start_offset = zones.iter().find(|z| z.count > 0).map_or(0.0, |z| z.start);
        let end_offset = zones
            .iter()
            .rev()
            .find(|z| z.count > 0)
            .map_or(0.0, |z| length - z.end());
        Ok(SpacingLayout {
            length,
            zones,
            positions,
            start_offset,
            end_offset,
        })
    }

    fn slack(&self, kind: OffsetType, offset: f64) -> f64 {
        match kind {
            OffsetType::Minimum => offset,
            OffsetType::Exact => 0.0,
        }
    }

    /// Zone lengths; the last zone absorbs whatever the others leave.
    fn zone_extents(&self, available: f64) -> Result<Vec<f64>> {
        let mut extents = Vec::with_capacity(self.zones.len());
        let mut used = 0.0;
        for zone in &self.zones[..self.zones.len() - 1] {
            let extent = match zone.extent_type {
                ExtentType::Absolute => zone.extent,
                ExtentType::Relative => zone.extent * available,
            };
            used += extent;
            extents.push(extent);
        }
        let rest = available - used;
        if rest <= 0.0 {
            return Err(RcbarError::parameter(format!(
                "spacing zones need {used}, only {available} available"
            )));
        }
        extents.push(rest);
        Ok(extents)
    }

    fn fill_zone(
        &self,
        zone: &SpacingZone,
        start: f64,
        extent: f64,
        slack_start: f64,
        slack_end: f64,
    ) -> ZoneLayout {
        if zone.pitch_type == PitchType::Target {
            let (count, pitch) = target_pitch(extent, zone.pitch);
            return ZoneLayout { start, count, pitch };
        }

        let pitch = zone.pitch;
        let count = exact_count(extent, pitch, 0.0, 0.0);
        let relaxed = exact_count(extent + slack_start + slack_end, pitch, 0.0, 0.0);
        if relaxed > count {
            let needed = relaxed as f64 * pitch - extent;
            let borrow_start = match (slack_start > 0.0, slack_end > 0.0) {
                (true, true) => {
                    let half = (needed / 2.0).min(slack_start);
                    half.max(needed - slack_end)
                }
                (true, false) => needed,
                _ => 0.0,
            };
            return ZoneLayout {
                start: start - borrow_start,
                count: relaxed,
                pitch,
            };
        }

        let leftover = extent - count as f64 * pitch;
        let shift = match (slack_start > 0.0, slack_end > 0.0) {
            (true, true) => leftover / 2.0,
            (true, false) => leftover,
            (false, true) => 0.0,
            (false, false) if self.centered => leftover / 2.0,
            (false, false) => 0.0,
        };
        ZoneLayout {
            start: start + shift,
            count,
            pitch,
        }
    }
}

impl Validate for SpacingRule {
    fn validate(&self) -> Result<()> {
        if self.zones.is_empty() {
            return Err(RcbarError::parameter("spacing rule has no zones"));
        }
        for zone in &self.zones {
            if !(zone.pitch > 0.0 && zone.pitch.is_finite()) {
                return Err(RcbarError::parameter(format!("pitch {} must be positive", zone.pitch)));
            }
            let bad_extent = match zone.extent_type {
                ExtentType::Absolute => zone.extent < 0.0,
                ExtentType::Relative => !(0.0..=1.0).contains(&zone.extent),
            };
            if bad_extent {
                return Err(RcbarError::parameter(format!("zone extent {} out of range", zone.extent)));
            }
        }
        if self.start_offset < 0.0 || self.end_offset < 0.0 {
            return Err(RcbarError::parameter("spacing offsets must not be negative"));
        }
        Ok(())
    }
}
