//! Analysis strategies and options
//!
//! Three analyzers share one contract, [`Analyzer::analyze`]: the classical
//! concentration-factor model, the same model with AASHTO component
//! amplification, and a plane-stress finite-element model.

pub mod classical;
pub mod fea;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::elements::MaterialProperties;
use crate::error::{DowelError, DowelResult};
use crate::geometry::DiamondGeometry;
use crate::loads::LoadCase;
use crate::results::StressResult;

pub use classical::ClassicalModel;
pub use fea::FiniteElementModel;

/// Modulus of dowel support for the Winkler foundation (N/mm³), ≈1.5·10⁶ pci
pub const DEFAULT_SUPPORT_MODULUS: f64 = 407.0;

/// Upper bound on `mesh_divisions`
pub const MAX_MESH_DIVISIONS: usize = 200;

/// Which analysis to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisMode {
    /// Closed-form concentration-factor model
    Classical,
    /// Classical model with AASHTO component amplification
    Aashto,
    /// Finite-element model; failures fall back to classical and are tagged
    Fea,
    /// Finite elements when available, classical otherwise
    #[default]
    Auto,
}

impl AnalysisMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Classical => "classical",
            Self::Aashto => "aashto",
            Self::Fea => "fea",
            Self::Auto => "auto",
        }
    }
}

impl fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnalysisMode {
    type Err = DowelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "classical" => Ok(Self::Classical),
            "aashto" => Ok(Self::Aashto),
            "fea" | "fem" => Ok(Self::Fea),
            "auto" => Ok(Self::Auto),
            other => Err(DowelError::UnsupportedMode(other.to_string())),
        }
    }
}

/// Restraint at the dowel tip in the FE model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TipCondition {
    /// Tip node pinned in both directions. The point restraint concentrates
    /// stress at the tip, so such fields usually fail the base-peak check.
    Fixed,
    /// Tip carried by the foundation springs only
    #[default]
    Free,
}

/// Options for stress analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisOptions {
    /// Stations between base and tip used for sampling and meshing
    pub mesh_divisions: usize,
    /// Iteration cap of the FE linear solve
    pub max_iterations: usize,
    /// Relative residual tolerance of the FE linear solve
    pub tolerance: f64,
    /// Modulus of dowel support K (N/mm³)
    pub support_modulus: f64,
    pub tip_condition: TipCondition,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            mesh_divisions: 24,
            max_iterations: 5000,
            tolerance: 1e-10,
            support_modulus: DEFAULT_SUPPORT_MODULUS,
            tip_condition: TipCondition::Free,
        }
    }
}

impl AnalysisOptions {
    /// Map a refinement level 1-5 onto mesh divisions
    pub fn with_refinement(mut self, level: u8) -> Self {
        self.mesh_divisions = 6 * level.clamp(1, 5) as usize;
        self
    }

    pub fn with_divisions(mut self, divisions: usize) -> Self {
        self.mesh_divisions = divisions;
        self
    }

    /// Set maximum iterations
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iterations = max_iter;
        self
    }

    /// Set convergence tolerance
    pub fn with_tolerance(mut self, tol: f64) -> Self {
        self.tolerance = tol;
        self
    }

    pub fn with_support_modulus(mut self, k: f64) -> Self {
        self.support_modulus = k;
        self
    }

    pub fn with_tip(mut self, tip: TipCondition) -> Self {
        self.tip_condition = tip;
        self
    }

    pub fn check(&self) -> DowelResult<()> {
        if self.mesh_divisions == 0 || self.mesh_divisions > MAX_MESH_DIVISIONS {
            return Err(DowelError::invalid(
                "options.mesh_divisions",
                self.mesh_divisions as f64,
                format!("must be between 1 and {MAX_MESH_DIVISIONS}"),
            ));
        }
        if self.max_iterations == 0 {
            return Err(DowelError::invalid("options.max_iterations", 0.0, "must be at least 1"));
        }
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(DowelError::invalid("options.tolerance", self.tolerance, "must be positive"));
        }
        if !(self.support_modulus.is_finite() && self.support_modulus > 0.0) {
            return Err(DowelError::invalid(
                "options.support_modulus",
                self.support_modulus,
                "must be positive",
            ));
        }
        Ok(())
    }
}

/// The closed set of stress field strategies
#[derive(Debug, Clone)]
pub enum Analyzer {
    Classical(ClassicalModel),
    FiniteElement(FiniteElementModel),
}

impl Analyzer {
    /// Strategy for a mode. `Fea` and `Auto` both build the FE model; the
    /// difference lies in how [`crate::model::DowelModel`] treats failures.
    pub fn for_mode(mode: AnalysisMode, options: &AnalysisOptions) -> Self {
        match mode {
            AnalysisMode::Classical => Self::Classical(ClassicalModel::new(options)),
            AnalysisMode::Aashto => Self::Classical(ClassicalModel::aashto(options)),
            AnalysisMode::Fea | AnalysisMode::Auto => {
                Self::FiniteElement(FiniteElementModel::new(options))
            }
        }
    }

    /// Stress field for the given inputs.
    ///
    /// `total_factor` is the combined modifier factor and must be finite and
    /// at least 1.0.
    pub fn analyze(
        &self,
        geometry: &DiamondGeometry,
        load: &LoadCase,
        material: &MaterialProperties,
        total_factor: f64,
    ) -> DowelResult<StressResult> {
        if !total_factor.is_finite() || total_factor < 1.0 {
            return Err(DowelError::invalid(
                "total_factor",
                total_factor,
                "modifier factors must combine to at least 1.0",
            ));
        }
        match self {
            Self::Classical(model) => model.analyze(geometry, load, material, total_factor),
            Self::FiniteElement(model) => model.analyze(geometry, load, material, total_factor),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Classical(model) if model.is_aashto() => "aashto",
            Self::Classical(_) => "classical",
            Self::FiniteElement(_) => "fea",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_parsing() {
        assert_eq!("FEA".parse::<AnalysisMode>().unwrap(), AnalysisMode::Fea);
        assert_eq!(" auto ".parse::<AnalysisMode>().unwrap(), AnalysisMode::Auto);
        assert!(matches!(
            "spectral".parse::<AnalysisMode>(),
            Err(DowelError::UnsupportedMode(_))
        ));
    }

    #[test]
    fn test_options_builders() {
        let opts = AnalysisOptions::default()
            .with_refinement(9)
            .with_max_iter(10)
            .with_tip(TipCondition::Free);
        assert_eq!(opts.mesh_divisions, 30);
        assert_eq!(opts.max_iterations, 10);
        assert!(opts.check().is_ok());
        assert!(AnalysisOptions::default().with_tolerance(0.0).check().is_err());
        assert_eq!(AnalysisOptions::default().tip_condition, TipCondition::Free);
    }

    #[test]
    fn test_mesh_divisions_bounded() {
        assert!(AnalysisOptions::default()
            .with_divisions(MAX_MESH_DIVISIONS)
            .check()
            .is_ok());
        let err = AnalysisOptions::default()
            .with_divisions(usize::MAX)
            .check()
            .unwrap_err();
        assert!(err.to_string().contains("options.mesh_divisions"));

        // The classical strategy refuses oversized layouts even without a check() call
        let g = DiamondGeometry::from_mm(125.0, 12.7, 4.8).unwrap();
        let load = LoadCase::concentrated_kn(22.2).unwrap();
        let opts = AnalysisOptions::default().with_divisions(usize::MAX);
        let analyzer = Analyzer::for_mode(AnalysisMode::Classical, &opts);
        let err = analyzer
            .analyze(&g, &load, &MaterialProperties::a36(), 1.0)
            .unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::InputValidation);
    }

    #[test]
    fn test_rejects_reducing_factor() {
        let g = DiamondGeometry::from_mm(125.0, 12.7, 4.8).unwrap();
        let load = LoadCase::concentrated_kn(22.2).unwrap();
        let mat = MaterialProperties::a36();
        let analyzer = Analyzer::for_mode(AnalysisMode::Classical, &AnalysisOptions::default());
        assert!(analyzer.analyze(&g, &load, &mat, 0.9).is_err());
        assert!(analyzer.analyze(&g, &load, &mat, f64::NAN).is_err());
        assert_eq!(analyzer.name(), "classical");
    }
}
