//! Dowel analysis model
//!
//! [`DowelModel`] is the entry point: it holds validated, immutable inputs and
//! runs the full pipeline (factors, stress field, compliance) on demand.
//! A failed finite-element solve never aborts the analysis; the classical
//! field is returned instead, tagged [`Provenance::Degraded`].

use serde::Serialize;

use crate::analysis::{AnalysisMode, AnalysisOptions, Analyzer, ClassicalModel};
use crate::compliance::{self, ComplianceVerdict, SeismicCheck};
use crate::config::AnalysisConfig;
use crate::elements::MaterialProperties;
use crate::error::{DowelError, DowelResult};
use crate::factors::{ModifierFactors, ServiceParameters};
use crate::geometry::DiamondGeometry;
use crate::loads::LoadCase;
use crate::results::{Provenance, StressResult};
use crate::transfer::LteProfile;
use crate::validation::{self, ValidationReport};

/// Everything one analysis produces
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub mode: AnalysisMode,
    pub factors: ModifierFactors,
    pub stress: StressResult,
    pub verdict: ComplianceVerdict,
    pub seismic: SeismicCheck,
    pub load_transfer: LteProfile,
    /// Validation warnings that did not block the analysis
    pub warnings: Vec<String>,
}

impl AnalysisReport {
    pub fn to_json(&self) -> DowelResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn is_degraded(&self) -> bool {
        self.stress.provenance.is_degraded()
    }
}

/// Validated inputs for one dowel
#[derive(Debug, Clone)]
pub struct DowelModel {
    geometry: DiamondGeometry,
    material: MaterialProperties,
    load: LoadCase,
    service: ServiceParameters,
    mode: AnalysisMode,
    options: AnalysisOptions,
    validation: ValidationReport,
}

impl DowelModel {
    /// Validate and assemble a model. Any validation error refuses the model.
    pub fn new(
        geometry: DiamondGeometry,
        material: MaterialProperties,
        load: LoadCase,
        service: ServiceParameters,
    ) -> DowelResult<Self> {
        let validation = validation::validate_all(&geometry, &material, &load, &service)?;
        Ok(Self {
            geometry,
            material,
            load,
            service,
            mode: AnalysisMode::default(),
            options: AnalysisOptions::default(),
            validation,
        })
    }

    pub fn from_config(config: &AnalysisConfig) -> DowelResult<Self> {
        let geometry = config.geometry.build()?;
        let material = config.material.build()?;
        let load = config.load.build()?;
        config.options.check()?;

        Ok(Self::new(geometry, material, load, config.service.clone())?
            .with_mode(config.mode)
            .with_options(config.options.clone()))
    }

    pub fn with_mode(mut self, mode: AnalysisMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_options(mut self, options: AnalysisOptions) -> Self {
        self.options = options;
        self
    }

    pub fn geometry(&self) -> &DiamondGeometry {
        &self.geometry
    }

    pub fn material(&self) -> &MaterialProperties {
        &self.material
    }

    pub fn load(&self) -> &LoadCase {
        &self.load
    }

    pub fn service(&self) -> &ServiceParameters {
        &self.service
    }

    pub fn mode(&self) -> AnalysisMode {
        self.mode
    }

    pub fn validation(&self) -> &ValidationReport {
        &self.validation
    }

    pub fn modifier_factors(&self) -> ModifierFactors {
        ModifierFactors::compute(&self.service)
    }

    /// Stress field for the configured mode, with FE fallback applied.
    ///
    /// `Fea` and `Auto` both fall back to the classical field when the solve
    /// fails or the crate was built without the `fea` feature; the result is
    /// then tagged [`Provenance::Degraded`].
    pub fn stress_field(&self, total_factor: f64) -> DowelResult<StressResult> {
        self.options.check()?;

        let analyzer = Analyzer::for_mode(self.mode, &self.options);

        match analyzer.analyze(&self.geometry, &self.load, &self.material, total_factor) {
            Ok(result) => Ok(result),
            Err(err) if err.is_numerical() => {
                log::warn!(
                    "{} analysis failed ({err}); falling back to the classical model",
                    analyzer.name()
                );
                let classical = ClassicalModel::new(&self.options)
                    .analyze(&self.geometry, &self.load, &self.material, total_factor)
                    .map_err(|e| DowelError::at_stage("classical fallback", e))?;
                Ok(classical.with_provenance(Provenance::Degraded {
                    requested: self.mode.to_string(),
                    reason: err.to_string(),
                }))
            }
            Err(err) => Err(err),
        }
    }

    /// Run the full pipeline
    pub fn analyze(&self) -> DowelResult<AnalysisReport> {
        log::info!(
            "Analyzing {:.1} x {:.2} mm dowel under {:.2} kN ({} mode)",
            self.geometry.side_length(),
            self.geometry.thickness(),
            self.load.magnitude() / 1000.0,
            self.mode
        );

        let factors = self.modifier_factors();
        let stress = self.stress_field(factors.total)?;
        let verdict = compliance::evaluate(&stress, &self.material)?;
        let seismic = compliance::seismic_check(
            &self.load,
            self.service.seismic_zone,
            verdict.safety_factor,
            &self.material,
        )?;
        let load_transfer = LteProfile::from_result(&stress);

        Ok(AnalysisReport {
            mode: self.mode,
            factors,
            stress,
            verdict,
            seismic,
            load_transfer,
            warnings: self.validation.warning_messages(),
        })
    }
}
