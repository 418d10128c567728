//! Immutable parameter sets per profile family.
//!
//! Each set is parsed once from a [`ParameterMap`] and then owned by the
//! [`ProfileModel`](crate::ProfileModel) it produced.

use rcbar_core::{ParameterMap, RcbarError, Result};
use serde::{Deserialize, Serialize};

use crate::family::ProfileFamily;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbutmentParams {
    pub width: f64,
    pub height: f64,
    pub height_end: f64,
    pub front_height: f64,
    pub shelf_height: f64,
    pub shelf_width: f64,
    pub backwall_width: f64,
    pub cantilever_width: f64,
    pub backwall_top_height: f64,
    pub cantilever_height: f64,
    pub backwall_bottom_height: f64,
    pub skew_height: f64,
    pub length: f64,
    pub horizontal_offset: f64,
    pub vertical_offset: f64,
}

impl AbutmentParams {
    pub fn from_map(map: &ParameterMap) -> Result<Self> {
        let height = map.positive("Height")?;
        let params = Self {
            width: map.positive("Width")?,
            height,
            height_end: map.f64_or("HeightEnd", height)?,
            front_height: map.positive("FrontHeight")?,
            shelf_height: map.non_negative_or("ShelfHeight", 0.0)?,
            shelf_width: map.positive("ShelfWidth")?,
            backwall_width: map.positive("BackwallWidth")?,
            cantilever_width: map.non_negative_or("CantileverWidth", 0.0)?,
            backwall_top_height: map.positive("BackwallTopHeight")?,
            cantilever_height: map.positive("CantileverHeight")?,
            backwall_bottom_height: map.positive("BackwallBottomHeight")?,
            skew_height: map.non_negative_or("SkewHeight", 0.0)?,
            length: map.positive("Length")?,
            horizontal_offset: map.f64_or("HorizontalOffset", 0.0)?,
            vertical_offset: map.f64_or("VerticalOffset", 0.0)?,
        };
        params.check()?;
        Ok(params)
    }

    pub fn full_width(&self) -> f64 {
        self.width + self.backwall_width + self.shelf_width
    }

    fn check(&self) -> Result<()> {
        if self.backwall_top_height >= self.cantilever_height {
            return Err(RcbarError::parameter(
                "BackwallTopHeight must be smaller than CantileverHeight",
            ));
        }
        for (name, h) in [("Height", self.height), ("HeightEnd", self.height_end)] {
            if self.front_height + self.skew_height >= h {
                return Err(RcbarError::parameter(format!(
                    "FrontHeight + SkewHeight must stay below {name}"
                )));
            }
            if self.backwall_bottom_height + self.shelf_height + self.cantilever_height >= h {
                return Err(RcbarError::parameter(format!(
                    "BackwallBottomHeight + ShelfHeight + CantileverHeight must stay below {name}"
                )));
            }
        }
        if !(self.height_end > 0.0) {
            return Err(RcbarError::parameter("HeightEnd must be positive"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FootingParams {
    pub width: f64,
    /// Thickness at the centre line, one value per station.
    pub heights: Vec<f64>,
    pub edge_height: f64,
    pub top_width: f64,
    pub lengths: Vec<f64>,
    pub horizontal_offsets: Vec<f64>,
    pub vertical_offsets: Vec<f64>,
}

impl FootingParams {
    pub fn from_map(map: &ParameterMap) -> Result<Self> {
        let lengths = match map.list("Lengths")? {
            Some(lengths) => lengths,
            None => vec![map.positive("Length")?],
        };
        let stations = lengths.len() + 1;
        let heights = match map.list("Heights")? {
            Some(heights) => heights,
            None => vec![map.positive("Height")?; stations],
        };
        if heights.len() != stations {
            return Err(RcbarError::parameter(format!(
                "Heights needs {stations} values, got {}",
                heights.len()
            )));
        }
        let span_list = |list: &str, single: &str| -> Result<Vec<f64>> {
            match map.list(list)? {
                Some(values) if values.len() == lengths.len() => Ok(values),
                Some(values) => Err(RcbarError::parameter(format!(
                    "{list} needs {} values, got {}",
                    lengths.len(),
                    values.len()
                ))),
                None if lengths.len() == 1 => Ok(vec![map.f64_or(single, 0.0)?]),
                None => Ok(vec![0.0; lengths.len()]),
            }
        };
        let params = Self {
            width: map.positive("Width")?,
            edge_height: map.positive("EdgeHeight")?,
            top_width: map.positive("TopWidth")?,
            horizontal_offsets: span_list("HorizontalOffsets", "HorizontalOffset")?,
            vertical_offsets: span_list("VerticalOffsets", "VerticalOffset")?,
            heights,
            lengths,
        };
        params.check()?;
        Ok(params)
    }

    fn check(&self) -> Result<()> {
        if self.top_width >= self.width {
            return Err(RcbarError::parameter("TopWidth must be smaller than Width"));
        }
        for (i, &h) in self.heights.iter().enumerate() {
            if !(h > self.edge_height) {
                return Err(RcbarError::parameter(format!(
                    "height of station {i} ({h}) must exceed EdgeHeight"
                )));
            }
        }
        if let Some(bad) = self.lengths.iter().find(|&&l| !(l > 0.0)) {
            return Err(RcbarError::parameter(format!("span length {bad} must be positive")));
        }
        Ok(())
    }

    pub fn is_skewed(&self, span: usize) -> bool {
        self.horizontal_offsets.get(span).is_some_and(|&h| h != 0.0)
    }
}

/// Parameters shared by retaining walls and wing walls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallParams {
    pub height: f64,
    pub height_end: f64,
    pub base_width: f64,
    pub base_height: f64,
    pub toe_width: f64,
    pub toe_height: f64,
    pub stem_width_top: f64,
    pub stem_width_bottom: f64,
    pub length: f64,
    pub horizontal_offset: f64,
    pub vertical_offset: f64,
    /// Free-end cut: X shift per unit of Z at the last station.
    pub skew_ratio: f64,
}

impl WallParams {
    pub fn from_map(map: &ParameterMap, family: ProfileFamily) -> Result<Self> {
        let height = map.positive("Height")?;
        let base_height = map.positive("BaseHeight")?;
        let skew_ratio = match family {
            ProfileFamily::WingWall => map.f64_or("SkewRatio", 0.0)?,
            _ => 0.0,
        };
        let params = Self {
            height,
            height_end: map.f64_or("HeightEnd", height)?,
            base_width: map.positive("BaseWidth")?,
            base_height,
            toe_width: map.positive("ToeWidth")?,
            toe_height: map.f64_or("ToeHeight", base_height)?,
            stem_width_top: map.positive("StemWidthTop")?,
            stem_width_bottom: map.positive("StemWidthBottom")?,
            length: map.positive("Length")?,
            horizontal_offset: map.f64_or("HorizontalOffset", 0.0)?,
            vertical_offset: map.f64_or("VerticalOffset", 0.0)?,
            skew_ratio,
        };
        params.check()?;
        Ok(params)
    }

    fn check(&self) -> Result<()> {
        if !(self.toe_height > 0.0) || self.toe_height > self.base_height {
            return Err(RcbarError::parameter(
                "ToeHeight must be positive and not exceed BaseHeight",
            ));
        }
        if self.toe_width + self.stem_width_bottom >= self.base_width {
            return Err(RcbarError::parameter(
                "ToeWidth + StemWidthBottom must be smaller than BaseWidth",
            ));
        }
        for (name, h) in [("Height", self.height), ("HeightEnd", self.height_end)] {
            if self.base_height >= h {
                return Err(RcbarError::parameter(format!(
                    "BaseHeight must be smaller than {name}"
                )));
            }
        }
        if self.skew_ratio.abs() * self.base_width / 2.0 >= self.length {
            return Err(RcbarError::parameter("SkewRatio cuts through the whole wall"));
        }
        Ok(())
    }

    pub fn is_skewed(&self) -> bool {
        self.skew_ratio != 0.0
    }
}

/// The parameter object owned by one profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ProfileParams {
    Abutment(AbutmentParams),
    Footing(FootingParams),
    RetainingWall(WallParams),
    WingWall(WallParams),
}

impl ProfileParams {
    pub fn from_map(family: ProfileFamily, map: &ParameterMap) -> Result<Self> {
        Ok(match family {
            ProfileFamily::Abutment => Self::Abutment(AbutmentParams::from_map(map)?),
            ProfileFamily::Footing => Self::Footing(FootingParams::from_map(map)?),
            ProfileFamily::RetainingWall => {
                Self::RetainingWall(WallParams::from_map(map, family)?)
            }
            ProfileFamily::WingWall => Self::WingWall(WallParams::from_map(map, family)?),
        })
    }

    pub fn family(&self) -> ProfileFamily {
        match self {
            Self::Abutment(_) => ProfileFamily::Abutment,
            Self::Footing(_) => ProfileFamily::Footing,
            Self::RetainingWall(_) => ProfileFamily::RetainingWall,
            Self::WingWall(_) => ProfileFamily::WingWall,
        }
    }

    pub fn as_abutment(&self) -> Option<&AbutmentParams> {
        match self {
            Self::Abutment(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_footing(&self) -> Option<&FootingParams> {
        match self {
            Self::Footing(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_wall(&self) -> Option<&WallParams> {
        match self {
            Self::RetainingWall(p) | Self::WingWall(p) => Some(p),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_footing_single_span_offsets() {
        let map = ParameterMap::new()
            .with("Width", 3000)
            .with("Height", 800)
            .with("EdgeHeight", 400)
            .with("TopWidth", 600)
            .with("Length", 5000)
            .with("HorizontalOffset", 150);
        let p = FootingParams::from_map(&map).unwrap();
        assert_eq!(p.heights, vec![800.0, 800.0]);
        assert_eq!(p.horizontal_offsets, vec![150.0]);
        assert_eq!(p.vertical_offsets, vec![0.0]);
        assert!(p.is_skewed(0));
    }

    #[test]
    fn test_footing_list_mismatch() {
        let map = ParameterMap::new()
            .with("Width", 3000)
            .with("EdgeHeight", 400)
            .with("Lengths", "5000;4000")
            .with("Heights", "800;900");
        assert!(matches!(
            FootingParams::from_map(&map),
            Err(RcbarError::InvalidParameter(msg)) if msg.contains("Heights")
        ));
    }

    #[test]
    fn test_abutment_height_end_defaults_to_height() {
        let map = ParameterMap::new()
            .with("Width", 300)
            .with("Height", 2000)
            .with("FrontHeight", 400)
            .with("ShelfWidth", 600)
            .with("BackwallWidth", 400)
            .with("BackwallTopHeight", 300)
            .with("CantileverHeight", 600)
            .with("BackwallBottomHeight", 300)
            .with("Length", 6000);
        let params = ProfileParams::from_map(ProfileFamily::Abutment, &map).unwrap();
        assert!(params.as_wall().is_none());
        let p = params.as_abutment().unwrap();
        assert_eq!(p.height_end, 2000.0);
        assert_eq!(p.full_width(), 1300.0);
    }

    #[test]
    fn test_wall_rejects_thick_toe() {
        let map = ParameterMap::new()
            .with("Height", 3000)
            .with("BaseHeight", 400)
            .with("ToeHeight", 500)
            .with("ToeWidth", 500)
            .with("BaseWidth", 2000)
            .with("StemWidthTop", 250)
            .with("StemWidthBottom", 400)
            .with("Length", 8000);
        assert!(WallParams::from_map(&map, ProfileFamily::RetainingWall).is_err());
    }
}
