/// Tolerances used by the geometry kernel.
///
/// Model units are millimetres, so the linear tolerance is far coarser than a
/// generic CAD kernel would use.
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
pub struct Tolerance {
    /// Linear tolerance for distance comparisons (in model units)
    pub linear: f64,
    /// Minimum |cos| between a line direction and a plane normal for the
    /// intersection to be considered well defined.
    pub angular: f64,
}

impl Tolerance {
    pub const DEFAULT_LINEAR: f64 = 1e-6;
    pub const DEFAULT_ANGULAR: f64 = 1e-9;

    /// Relaxation factor applied per step by extended intersections.
    pub const RELAXATION: f64 = 10.0;

    pub fn loose() -> Self {
        Self {
            linear: 1e-3,
            angular: 1e-6,
        }
    }

    /// The tolerance after `steps` relaxation steps.
    ///
    /// The angular threshold shrinks so that nearly parallel configurations are
    /// accepted; the linear tolerance grows by the same factor.
    pub fn relaxed(self, steps: u32) -> Self {
        let factor = Self::RELAXATION.powi(steps as i32);
        Self {
            linear: self.linear * factor,
            angular: self.angular / factor,
        }
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            linear: Self::DEFAULT_LINEAR,
            angular: Self::DEFAULT_ANGULAR,
        }
    }
}
