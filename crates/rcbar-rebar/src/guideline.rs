//! Placement guidelines.

use rcbar_core::{RcbarError, Result, Validate};
use rcbar_math::{direction, distance, lerp, Point3, Transform, Vector3};
use serde::{Deserialize, Serialize};

use crate::spacing::{SpacingLayout, SpacingRule};

/// Second axis that reuses the primary spacing, at the same normalized
/// stations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecondaryGuideline {
    pub start: Point3,
    pub end: Point3,
}

/// Axis plus spacing rule controlling where bar instances go.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementGuideline {
    pub start: Point3,
    pub end: Point3,
    pub spacing: SpacingRule,
    pub secondary: Option<SecondaryGuideline>,
}

impl PlacementGuideline {
    pub fn new(start: Point3, end: Point3, spacing: SpacingRule) -> Result<Self> {
        let guideline = Self {
            start,
            end,
            spacing,
            secondary: None,
        };
        guideline.validate()?;
        Ok(guideline)
    }

    pub fn with_secondary(mut self, start: Point3, end: Point3) -> Result<Self> {
        direction(start, end)?;
        self.secondary = Some(SecondaryGuideline { start, end });
        Ok(self)
    }

    pub fn length(&self) -> f64 {
        distance(self.start, self.end)
    }

    pub fn direction(&self) -> Result<Vector3> {
        direction(self.start, self.end)
    }

    pub fn layout(&self) -> Result<SpacingLayout> {
        self.spacing.layout(self.length())
    }

    /// Instance points on the primary axis.
    pub fn instance_points(&self) -> Result<Vec<Point3>> {
        let layout = self.layout()?;
        Ok(layout
            .normalized()
            .into_iter()
            .map(|t| lerp(self.start, self.end, t))
            .collect())
    }

    /// Instance points on the secondary axis, if any.
    pub fn secondary_points(&self) -> Result<Option<Vec<Point3>>> {
        let Some(secondary) = &self.secondary else {
            return Ok(None);
        };
        let layout = self.layout()?;
        Ok(Some(
            layout
                .normalized()
                .into_iter()
                .map(|t| lerp(secondary.start, secondary.end, t))
                .collect(),
        ))
    }

    /// Same guideline running the other way.
    pub fn reversed(&self) -> Self {
        let mut spacing = self.spacing.clone();
        std::mem::swap(&mut spacing.start_offset, &mut spacing.end_offset);
        std::mem::swap(&mut spacing.start_offset_type, &mut spacing.end_offset_type);
        spacing.zones.reverse();
        Self {
            start: self.end,
            end: self.start,
            spacing,
            secondary: self.secondary.as_ref().map(|s| SecondaryGuideline {
                start: s.end,
                end: s.start,
            }),
        }
    }

    pub fn transformed(&self, transform: &Transform) -> Self {
        Self {
            start: transform.transform_point(self.start),
            end: transform.transform_point(self.end),
            spacing: self.spacing.clone(),
            secondary: self.secondary.as_ref().map(|s| SecondaryGuideline {
                start: transform.transform_point(s.start),
                end: transform.transform_point(s.end),
            }),
        }
    }
}

impl Validate for PlacementGuideline {
    fn validate(&self) -> Result<()> {
        if self.length() <= 0.0 {
            return Err(RcbarError::degenerate(format!(
                "guideline at {} has zero length",
                self.start
            )));
        }
        self.spacing.validate()
    }
}
