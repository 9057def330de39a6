//! Load cases

use serde::{Deserialize, Serialize};

use crate::error::{DowelError, DowelResult};
use crate::units::Force;

/// How the shear is delivered to the dowel across the joint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadType {
    /// Wheel load concentrated at the joint face
    #[default]
    Concentrated,
    /// Load spread along the bearing width
    Distributed,
}

/// The load carried by a single dowel, in N
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LoadCase {
    magnitude: f64,
    load_type: LoadType,
}

impl LoadCase {
    /// Create a load case. The magnitude must be positive and finite.
    pub fn new(magnitude: Force, load_type: LoadType) -> DowelResult<Self> {
        let n = magnitude.to_newtons();
        if !n.is_finite() || n <= 0.0 {
            return Err(DowelError::invalid("load.magnitude", n, "must be positive"));
        }
        Ok(Self {
            magnitude: n,
            load_type,
        })
    }

    /// Concentrated load in kN
    pub fn concentrated_kn(kn: f64) -> DowelResult<Self> {
        Self::new(Force::kilonewtons(kn), LoadType::Concentrated)
    }

    /// Magnitude in N
    pub fn magnitude(&self) -> f64 {
        self.magnitude
    }

    pub fn load_type(&self) -> LoadType {
        self.load_type
    }

    /// The same load scaled by `factor` (e.g. a seismic amplification)
    pub fn scaled(&self, factor: f64) -> DowelResult<Self> {
        Self::new(
            Force::new(self.magnitude * factor, crate::units::ForceUnit::Newton),
            self.load_type,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::ForceUnit;

    #[test]
    fn test_load_case_units() {
        let lc = LoadCase::new(Force::new(5.0, ForceUnit::Kip), LoadType::Concentrated).unwrap();
        assert!((lc.magnitude() - 22_241.108).abs() < 1e-2);
        assert!((lc.scaled(1.25).unwrap().magnitude() - 1.25 * lc.magnitude()).abs() < 1e-9);
    }

    #[test]
    fn test_non_positive_load_rejected() {
        assert!(LoadCase::concentrated_kn(0.0).is_err());
        assert!(LoadCase::concentrated_kn(-3.0).is_err());
        assert!(LoadCase::concentrated_kn(f64::INFINITY).is_err());
    }
}
