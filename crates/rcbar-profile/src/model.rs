use rcbar_core::{RcbarError, Result, Validate};
use rcbar_math::{Point3, Transform};
use serde::{Deserialize, Serialize};

use crate::family::ProfileFamily;
use crate::params::ProfileParams;
use crate::section::CrossSection;

/// Which end of a value range governs a choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extremum {
    Largest,
    Smallest,
}

/// Ordered stations of one element plus the parameters that produced them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileModel {
    family: ProfileFamily,
    params: ProfileParams,
    spans: Vec<f64>,
    stations: Vec<CrossSection>,
}

impl ProfileModel {
    pub fn new(params: ProfileParams, spans: Vec<f64>, stations: Vec<CrossSection>) -> Result<Self> {
        let model = Self {
            family: params.family(),
            params,
            spans,
            stations,
        };
        model.validate()?;
        Ok(model)
    }

    pub fn family(&self) -> ProfileFamily {
        self.family
    }

    pub fn params(&self) -> &ProfileParams {
        &self.params
    }

    pub fn spans(&self) -> &[f64] {
        &self.spans
    }

    pub fn span_count(&self) -> usize {
        self.spans.len()
    }

    pub fn stations(&self) -> &[CrossSection] {
        &self.stations
    }

    pub fn station_count(&self) -> usize {
        self.stations.len()
    }

    pub fn station(&self, index: usize) -> &CrossSection {
        &self.stations[index]
    }

    pub fn first(&self) -> &CrossSection {
        &self.stations[0]
    }

    pub fn last(&self) -> &CrossSection {
        &self.stations[self.stations.len() - 1]
    }

    /// Vertex `vertex` of station `station`.
    pub fn at(&self, vertex: usize, station: usize) -> Point3 {
        self.stations[station][vertex]
    }

    /// Total longitudinal length.
    pub fn length(&self) -> f64 {
        self.spans.iter().sum()
    }

    /// Require a single-span profile; several synthesis routines only handle
    /// one segment.
    pub fn require_single_span(&self, what: &str) -> Result<()> {
        if self.span_count() != 1 {
            return Err(RcbarError::UnsupportedConfiguration(format!(
                "{what} handles a single span, profile has {}",
                self.span_count()
            )));
        }
        Ok(())
    }

    /// Index of the extremal value. Ties resolve to the earliest index.
    pub fn governing_index(values: &[f64], extremum: Extremum) -> usize {
        let mut best = 0;
        for (i, &v) in values.iter().enumerate().skip(1) {
            let better = match extremum {
                Extremum::Largest => v > values[best],
                Extremum::Smallest => v < values[best],
            };
            if better {
                best = i;
            }
        }
        best
    }

    /// Station with the extremal vertical extent.
    pub fn governing_station(&self, extremum: Extremum) -> usize {
        let heights: Vec<f64> = self.stations.iter().map(CrossSection::height).collect();
        Self::governing_index(&heights, extremum)
    }

    /// A new profile with the same parameters and replaced stations.
    pub fn with_stations(&self, stations: Vec<CrossSection>) -> Result<Self> {
        Self::new(self.params.clone(), self.spans.clone(), stations)
    }

    /// Every station transformed.
    pub fn transformed(&self, transform: &Transform) -> Result<Self> {
        self.with_stations(self.stations.iter().map(|s| s.transformed(transform)).collect())
    }
}

impl Validate for ProfileModel {
    fn validate(&self) -> Result<()> {
        if self.stations.len() < 2 {
            return Err(RcbarError::InvalidState(format!(
                "profile needs at least two stations, has {}",
                self.stations.len()
            )));
        }
        if self.spans.len() + 1 != self.stations.len() {
            return Err(RcbarError::InvalidState(format!(
                "{} spans do not match {} stations",
                self.spans.len(),
                self.stations.len()
            )));
        }
        let expected = self.family.cardinality();
        for (i, station) in self.stations.iter().enumerate() {
            if station.len() != expected {
                return Err(RcbarError::InvalidState(format!(
                    "{} station {i} has {} vertices, expected {expected}",
                    self.family,
                    station.len()
                )));
            }
        }
        for (i, pair) in self.stations.windows(2).enumerate() {
            if !(pair[1].x() > pair[0].x()) {
                return Err(RcbarError::InvalidState(format!(
                    "station {} is not beyond station {i} along the axis",
                    i + 1
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_governing_index_ties_pick_earliest() {
        let values = [2000.0, 2500.0, 2500.0, 1800.0];
        assert_eq!(ProfileModel::governing_index(&values, Extremum::Largest), 1);
        assert_eq!(ProfileModel::governing_index(&values, Extremum::Smallest), 3);
        assert_eq!(ProfileModel::governing_index(&[5.0, 5.0], Extremum::Smallest), 0);
    }
}
