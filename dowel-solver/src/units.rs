//! Unit-tagged quantities
//!
//! Every dimension and load enters the solver with an explicit unit tag and
//! is converted once to the working system: millimetres, newtons and
//! megapascals (N/mm²). Everything downstream of the constructors works in
//! those units only.
//!
//! ```rust
//! use dowel_solver::units::{Force, ForceUnit, Length, LengthUnit};
//!
//! let side = Length::new(5.0, LengthUnit::Inch);
//! assert!((side.to_mm() - 127.0).abs() < 1e-9);
//!
//! let load = Force::new(22.2, ForceUnit::KiloNewton);
//! assert!((load.to_newtons() - 22_200.0).abs() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};

/// Millimetres per inch
pub const MM_PER_INCH: f64 = 25.4;
/// Newtons per pound-force
pub const N_PER_LBF: f64 = 4.448_221_615_260_5;
/// MPa per ksi
pub const MPA_PER_KSI: f64 = 6.894_757_293_168;

// ============================================================================
// Length
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LengthUnit {
    #[default]
    #[serde(alias = "mm")]
    Millimetre,
    #[serde(alias = "in")]
    Inch,
}

impl LengthUnit {
    fn to_mm_factor(self) -> f64 {
        match self {
            Self::Millimetre => 1.0,
            Self::Inch => MM_PER_INCH,
        }
    }
}

/// A length with its unit tag
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Length {
    pub value: f64,
    #[serde(default)]
    pub unit: LengthUnit,
}

impl Length {
    pub fn new(value: f64, unit: LengthUnit) -> Self {
        Self { value, unit }
    }

    pub fn mm(value: f64) -> Self {
        Self::new(value, LengthUnit::Millimetre)
    }

    pub fn inches(value: f64) -> Self {
        Self::new(value, LengthUnit::Inch)
    }

    pub fn to_mm(self) -> f64 {
        self.value * self.unit.to_mm_factor()
    }
}

// ============================================================================
// Force
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForceUnit {
    #[serde(alias = "N")]
    Newton,
    #[default]
    #[serde(alias = "kN")]
    KiloNewton,
    #[serde(alias = "lbf")]
    PoundForce,
    Kip,
}

impl ForceUnit {
    fn to_newton_factor(self) -> f64 {
        match self {
            Self::Newton => 1.0,
            Self::KiloNewton => 1000.0,
            Self::PoundForce => N_PER_LBF,
            Self::Kip => 1000.0 * N_PER_LBF,
        }
    }
}

/// A force with its unit tag
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Force {
    pub value: f64,
    #[serde(default)]
    pub unit: ForceUnit,
}

impl Force {
    pub fn new(value: f64, unit: ForceUnit) -> Self {
        Self { value, unit }
    }

    pub fn kilonewtons(value: f64) -> Self {
        Self::new(value, ForceUnit::KiloNewton)
    }

    pub fn to_newtons(self) -> f64 {
        self.value * self.unit.to_newton_factor()
    }
}

// ============================================================================
// Stress
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StressUnit {
    #[default]
    #[serde(alias = "MPa")]
    MegaPascal,
    #[serde(alias = "GPa")]
    GigaPascal,
    Ksi,
}

impl StressUnit {
    /// Convert a value in this unit to MPa
    pub fn to_mpa(self, value: f64) -> f64 {
        match self {
            Self::MegaPascal => value,
            Self::GigaPascal => value * 1000.0,
            Self::Ksi => value * MPA_PER_KSI,
        }
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_imperial_conversions() {
        assert_relative_eq!(Length::inches(0.5).to_mm(), 12.7, epsilon = 1e-12);
        assert_relative_eq!(
            Force::new(5.0, ForceUnit::Kip).to_newtons(),
            22_241.108,
            epsilon = 1e-3
        );
        assert_relative_eq!(StressUnit::Ksi.to_mpa(36.0), 248.21, epsilon = 1e-2);
        assert_relative_eq!(StressUnit::GigaPascal.to_mpa(200.0), 200_000.0);
    }

    #[test]
    fn test_unit_aliases_deserialize() {
        let len: Length = serde_json::from_str(r#"{"value": 4.0, "unit": "in"}"#).unwrap();
        assert_eq!(len.unit, LengthUnit::Inch);
        let force: Force = serde_json::from_str(r#"{"value": 22.2}"#).unwrap();
        assert_eq!(force.unit, ForceUnit::KiloNewton);
    }
}
