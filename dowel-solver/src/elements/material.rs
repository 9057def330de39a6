//! Material properties

use serde::{Deserialize, Serialize};

use crate::error::{DowelError, DowelResult};

/// Steel grade identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SteelGrade {
    #[serde(rename = "A36")]
    A36,
    #[serde(rename = "A572-50")]
    A572Gr50,
    #[serde(rename = "A588")]
    A588,
    #[serde(rename = "custom")]
    Custom,
}

impl SteelGrade {
    /// Minimum specified yield strength in MPa, if the grade has one
    pub fn minimum_yield(&self) -> Option<f64> {
        match self {
            Self::A36 => Some(250.0),
            Self::A572Gr50 | Self::A588 => Some(345.0),
            Self::Custom => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::A36 => "ASTM A36",
            Self::A572Gr50 => "ASTM A572 Grade 50",
            Self::A588 => "ASTM A588",
            Self::Custom => "Custom",
        }
    }
}

/// Elastic material properties of the dowel. Stresses in MPa.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialProperties {
    /// Modulus of elasticity (MPa)
    pub e: f64,
    /// Poisson's ratio
    pub nu: f64,
    /// Yield strength (MPa)
    pub fy: f64,
    /// Ultimate tensile strength (MPa)
    pub fu: Option<f64>,
    pub grade: SteelGrade,
}

impl MaterialProperties {
    /// Create a custom material.
    ///
    /// Requires `0 < nu < 0.5` and positive, finite `e` and `fy`.
    pub fn custom(e: f64, nu: f64, fy: f64) -> DowelResult<Self> {
        let mat = Self {
            e,
            nu,
            fy,
            fu: None,
            grade: SteelGrade::Custom,
        };
        mat.check()?;
        Ok(mat)
    }

    /// Catalogue material for a named grade
    pub fn from_grade(grade: SteelGrade) -> DowelResult<Self> {
        match grade {
            SteelGrade::A36 => Ok(Self::a36()),
            SteelGrade::A572Gr50 => Ok(Self::a572_50()),
            SteelGrade::A588 => Ok(Self::a588()),
            SteelGrade::Custom => Err(DowelError::MissingParameter(
                "custom material requires e, nu and fy".into(),
            )),
        }
    }

    /// ASTM A36 structural steel
    pub fn a36() -> Self {
        Self {
            e: 200_000.0,
            nu: 0.3,
            fy: 250.0,
            fu: Some(400.0),
            grade: SteelGrade::A36,
        }
    }

    /// ASTM A572 Grade 50 high-strength steel
    pub fn a572_50() -> Self {
        Self {
            e: 200_000.0,
            nu: 0.3,
            fy: 345.0,
            fu: Some(450.0),
            grade: SteelGrade::A572Gr50,
        }
    }

    /// ASTM A588 weathering steel
    pub fn a588() -> Self {
        Self {
            e: 200_000.0,
            nu: 0.3,
            fy: 345.0,
            fu: Some(485.0),
            grade: SteelGrade::A588,
        }
    }

    pub fn with_ultimate_strength(mut self, fu: f64) -> Self {
        self.fu = Some(fu);
        self
    }

    /// Shear modulus G = E / (2(1 + ν))
    pub fn shear_modulus(&self) -> f64 {
        self.e / (2.0 * (1.0 + self.nu))
    }

    /// Check the physical invariants
    pub fn check(&self) -> DowelResult<()> {
        if !(self.e.is_finite() && self.e > 0.0) {
            return Err(DowelError::InvalidMaterial(format!(
                "elastic modulus must be positive, got {}",
                self.e
            )));
        }
        if !(self.nu > 0.0 && self.nu < 0.5) {
            return Err(DowelError::InvalidMaterial(format!(
                "Poisson's ratio must lie in (0, 0.5), got {}",
                self.nu
            )));
        }
        if !(self.fy.is_finite() && self.fy > 0.0) {
            return Err(DowelError::InvalidMaterial(format!(
                "yield strength must be positive, got {}",
                self.fy
            )));
        }
        Ok(())
    }
}

impl Default for MaterialProperties {
    fn default() -> Self {
        Self::a36()
    }
}
