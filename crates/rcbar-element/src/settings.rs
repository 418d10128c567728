//! Per-group bar settings read from `{prefix}_{key}` entries.

use rcbar_core::{ParameterMap, RcbarError, Result};
use rcbar_rebar::{BarProperties, OffsetType, PitchType, SpacingRule, SpacingZone};
use serde::{Deserialize, Serialize};

pub const DEFAULT_GRADE: &str = "B500B";
pub const DEFAULT_SPLITTER_OFFSET: f64 = 1000.0;

/// Bending radius in bar diameters when none is configured.
pub const BENDING_RADIUS_DIAMETERS: f64 = 2.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSettings {
    pub prefix: String,
    pub enabled: bool,
    pub diameter: f64,
    pub spacing: f64,
    pub spacing_type: PitchType,
    pub grade: String,
    pub bending_radius: f64,
    pub start_offset: f64,
    pub end_offset: f64,
    pub offset_type: OffsetType,
    pub add_splitter: bool,
    pub splitter_offset: f64,
    pub layer: u32,
    /// Diameter of the region covered by a property override, where the
    /// group has one.
    pub override_diameter: Option<f64>,
    /// Guideline distance at which that region starts.
    pub override_from: Option<f64>,
}

pub fn key(prefix: &str, name: &str) -> String {
    format!("{prefix}_{name}")
}

impl GroupSettings {
    /// Read the settings of `prefix`. Diameter and spacing are only required
    /// for enabled groups.
    pub fn from_map(prefix: &str, map: &ParameterMap, cover: f64) -> Result<Self> {
        let k = |name: &str| key(prefix, name);
        let enabled = map.flag(&k("Enabled"), true)?;
        let (diameter, spacing) = if enabled {
            (map.positive(&k("Diameter"))?, map.positive(&k("Spacing"))?)
        } else {
            (
                map.non_negative_or(&k("Diameter"), 0.0)?,
                map.non_negative_or(&k("Spacing"), 0.0)?,
            )
        };

        let layer = map.non_negative_or(&k("Layer"), 0.0)?;
        if layer.fract() != 0.0 {
            return Err(RcbarError::parameter(format!("{} must be an integer", k("Layer"))));
        }

        let override_diameter = map.opt_f64(&k("OverrideDiameter"))?;
        if override_diameter.is_some_and(|d| d <= 0.0) {
            return Err(RcbarError::parameter(format!(
                "{} must be positive",
                k("OverrideDiameter")
            )));
        }

        Ok(Self {
            prefix: prefix.to_string(),
            enabled,
            diameter,
            spacing,
            spacing_type: map.string_or(&k("SpacingType"), "EXACT").parse()?,
            grade: map.string_or(&k("Grade"), DEFAULT_GRADE),
            bending_radius: map
                .non_negative_or(&k("BendingRadius"), BENDING_RADIUS_DIAMETERS * diameter)?,
            start_offset: map.non_negative_or(&k("StartOffset"), cover)?,
            end_offset: map.non_negative_or(&k("EndOffset"), cover)?,
            offset_type: map.string_or(&k("OffsetType"), "EXACT").parse()?,
            add_splitter: map.flag(&k("AddSplitter"), false)?,
            splitter_offset: map.non_negative_or(&k("SplitterOffset"), DEFAULT_SPLITTER_OFFSET)?,
            layer: layer as u32,
            override_diameter,
            override_from: map.opt_f64(&k("OverrideFrom"))?,
        })
    }

    pub fn properties(&self) -> BarProperties {
        BarProperties::new(self.diameter, self.grade.clone(), self.bending_radius)
    }

    pub fn spacing_rule(&self) -> SpacingRule {
        SpacingRule::new(SpacingZone::new(self.spacing, self.spacing_type))
            .with_offsets(self.start_offset, self.end_offset)
            .with_offset_types(self.offset_type, self.offset_type)
    }
}
