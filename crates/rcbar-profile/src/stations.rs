//! Station planning: longitudinal positions, governing dimensions and the
//! skew/eccentricity offsets applied to each station.

use log::debug;
use rcbar_core::{RcbarError, Result};
use rcbar_math::Vector3;

use crate::section::CrossSection;

/// Per-station offsets from per-span offsets.
///
/// For a single span the offset is split evenly between both ends with
/// opposite signs. Longer chains accumulate: station 0 sits at `-h0/2`,
/// station 1 at `+h0/2` and every following station adds its span's full
/// offset, so only the first span contributes half.
pub fn station_offsets(span_offsets: &[f64]) -> Vec<f64> {
    let Some((&first, rest)) = span_offsets.split_first() else {
        return vec![0.0];
    };
    let mut offsets = Vec::with_capacity(span_offsets.len() + 1);
    offsets.push(-0.5 * first);
    let mut acc = 0.5 * first;
    offsets.push(acc);
    for &h in rest {
        acc += h;
        offsets.push(acc);
    }
    offsets
}

/// Longitudinal layout of a profile before any vertex is built.
#[derive(Debug, Clone)]
pub struct StationPlan {
    spans: Vec<f64>,
    governing: Vec<f64>,
    lateral: Vec<f64>,
    vertical: Vec<f64>,
}

impl StationPlan {
    pub fn new(spans: Vec<f64>) -> Result<Self> {
        if spans.is_empty() {
            return Err(RcbarError::parameter("at least one span length is required"));
        }
        if let Some(bad) = spans.iter().find(|&&l| !(l > 0.0)) {
            return Err(RcbarError::parameter(format!(
                "span lengths must be positive, got {bad}"
            )));
        }
        let n = spans.len();
        Ok(Self {
            spans,
            governing: vec![0.0; n + 1],
            lateral: vec![0.0; n],
            vertical: vec![0.0; n],
        })
    }

    /// Governing dimension of each station (one value per station).
    pub fn with_governing(mut self, governing: Vec<f64>) -> Result<Self> {
        if governing.len() != self.station_count() {
            return Err(RcbarError::parameter(format!(
                "expected {} governing values, got {}",
                self.station_count(),
                governing.len()
            )));
        }
        self.governing = governing;
        Ok(self)
    }

    /// Lateral (Z) and vertical (Y) offsets, one value per span.
    pub fn with_offsets(mut self, lateral: Vec<f64>, vertical: Vec<f64>) -> Result<Self> {
        if lateral.len() != self.spans.len() || vertical.len() != self.spans.len() {
            return Err(RcbarError::parameter(format!(
                "expected {} span offsets, got {} lateral and {} vertical",
                self.spans.len(),
                lateral.len(),
                vertical.len()
            )));
        }
        self.lateral = lateral;
        self.vertical = vertical;
        Ok(self)
    }

    pub fn station_count(&self) -> usize {
        self.spans.len() + 1
    }

    pub fn spans(&self) -> &[f64] {
        &self.spans
    }

    pub fn governing(&self) -> &[f64] {
        &self.governing
    }

    /// Longitudinal coordinate of each station, starting at zero.
    pub fn positions(&self) -> Vec<f64> {
        let mut xs = Vec::with_capacity(self.station_count());
        xs.push(0.0);
        let mut acc = 0.0;
        for &l in &self.spans {
            acc += l;
            xs.push(acc);
        }
        xs
    }

    /// Build every station.
    ///
    /// `chain` evaluates the vertex chain for one governing value in the local
    /// frame (X = 0). Stations sharing station 0's governing value are copies
    /// of station 0 moved by a pure translation, which keeps them exactly
    /// congruent; the others are re-evaluated.
    pub fn build<F>(&self, chain: F) -> Result<Vec<CrossSection>>
    where
        F: Fn(f64) -> Result<CrossSection>,
    {
        let xs = self.positions();
        let dz = station_offsets(&self.lateral);
        let dy = station_offsets(&self.vertical);

        let base = chain(self.governing[0])?;
        let first = base.translated(Vector3::new(0.0, dy[0], dz[0]));

        let mut stations = Vec::with_capacity(self.station_count());
        for i in 1..self.station_count() {
            let station = if self.governing[i] == self.governing[0] {
                first.translated(Vector3::new(xs[i] - xs[0], dy[i] - dy[0], dz[i] - dz[0]))
            } else {
                debug!(
                    "station {i}: governing value {} differs from {}, re-evaluating chain",
                    self.governing[i], self.governing[0]
                );
                chain(self.governing[i])?.translated(Vector3::new(xs[i], dy[i], dz[i]))
            };
            if station.len() != first.len() {
                return Err(RcbarError::InvalidState(format!(
                    "station {i} has {} vertices, station 0 has {}",
                    station.len(),
                    first.len()
                )));
            }
            stations.push(station);
        }
        stations.insert(0, first);
        Ok(stations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::Chain;
    use approx::assert_relative_eq;

    fn rect(h: f64) -> Result<CrossSection> {
        Chain::start(-h / 2.0, 100.0)
            .up_to(h / 2.0)
            .across(-200.0)
            .up_to(-h / 2.0)
            .finish(4)
    }

    #[test]
    fn test_two_station_offsets_split_evenly() {
        assert_eq!(station_offsets(&[200.0]), vec![-100.0, 100.0]);
    }

    #[test]
    fn test_three_station_offsets_accumulate() {
        let (h0, h1) = (120.0, 70.0);
        let offsets = station_offsets(&[h0, h1]);
        assert_eq!(offsets.len(), 3);
        assert_relative_eq!(offsets[0], -0.5 * h0);
        assert_relative_eq!(offsets[1], 0.5 * h0);
        assert_relative_eq!(offsets[2], 0.5 * h0 + h1);
    }

    #[test]
    fn test_equal_governing_translates() {
        let plan = StationPlan::new(vec![6000.0])
            .unwrap()
            .with_governing(vec![2000.0, 2000.0])
            .unwrap();
        let stations = plan.build(rect).unwrap();
        for k in 0..4 {
            assert_eq!(stations[1][k], stations[0][k] + Vector3::new(6000.0, 0.0, 0.0));
        }
    }

    #[test]
    fn test_tapered_station_is_reevaluated() {
        let plan = StationPlan::new(vec![5000.0])
            .unwrap()
            .with_governing(vec![2000.0, 1500.0])
            .unwrap();
        let stations = plan.build(rect).unwrap();
        assert_relative_eq!(stations[1].height(), 1500.0);
        assert_relative_eq!(stations[1].x(), 5000.0);
    }

    #[test]
    fn test_offsets_are_applied() {
        let plan = StationPlan::new(vec![1000.0, 1000.0])
            .unwrap()
            .with_governing(vec![500.0; 3])
            .unwrap()
            .with_offsets(vec![100.0, 40.0], vec![0.0, -20.0])
            .unwrap();
        let stations = plan.build(rect).unwrap();
        assert_relative_eq!(stations[0][0].z, 100.0 - 50.0);
        assert_relative_eq!(stations[2][0].z, 100.0 + 50.0 + 40.0);
        assert_relative_eq!(stations[2][0].y, -250.0 - 20.0);
    }

    #[test]
    fn test_rejects_bad_lengths() {
        assert!(StationPlan::new(vec![]).is_err());
        assert!(StationPlan::new(vec![1000.0, 0.0]).is_err());
        let plan = StationPlan::new(vec![1000.0]).unwrap();
        assert!(plan.with_governing(vec![1.0]).is_err());
    }
}
