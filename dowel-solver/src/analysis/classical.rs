//! Classical concentration-factor stress model
//!
//! The nominal stress at the joint face comes from Friberg's
//! beam-on-elastic-foundation solution for a dowel loaded at the joint:
//!
//! ```text
//!   β = (K·b / (4·E·I))^¼ = (3K / (E·t³))^¼
//!   M = 0.3224·P/β + P·z/2
//!   σ_nom = M / S
//! ```
//!
//! Over the loaded half the field is the nominal stress, amplified by the
//! modifier factor, decaying as `exp(-0.5ξ)` and shaped by a concentration
//! factor that is high at the loaded edge and low at the free tip. The
//! resulting von Mises field never increases from base to tip.

use std::f64::consts::PI;

use crate::elements::MaterialProperties;
use crate::error::{DowelError, DowelResult};
use crate::geometry::DiamondGeometry;
use crate::loads::LoadCase;
use crate::math::smoothstep;
use crate::results::{Provenance, StressMaxima, StressResult, StressSample, StressState};

use super::{AnalysisOptions, MAX_MESH_DIVISIONS};

/// Peak moment coefficient of a semi-infinite beam on elastic foundation
pub const FRIBERG_MOMENT_COEFFICIENT: f64 = 0.3224;
/// Decay rate α in `exp(-α·ξ)`
pub const DECAY_RATE: f64 = 0.5;
/// ξ below which the contact-edge concentration applies in full
pub const BASE_ZONE_END: f64 = 0.1;
/// ξ above which the tip concentration applies in full
pub const TIP_ZONE_START: f64 = 0.3;
/// σy / σx at the base, fading linearly to zero at the tip
pub const TRANSVERSE_RATIO: f64 = 0.25;
/// Peak τxy / σx, reached at mid-length
pub const SHEAR_RATIO: f64 = 0.15;

/// Component multipliers applied on top of the classical field
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComponentAmplification {
    pub sx: f64,
    pub sy: f64,
    pub txy: f64,
}

impl ComponentAmplification {
    pub const NONE: Self = Self {
        sx: 1.0,
        sy: 1.0,
        txy: 1.0,
    };

    /// AASHTO LRFD adjustments for normal, transverse and shear stress
    pub const AASHTO: Self = Self {
        sx: 1.10,
        sy: 1.15,
        txy: 1.05,
    };
}

/// Friberg nominal bending stress at the joint face (MPa), before modifiers
pub fn nominal_stress(
    geometry: &DiamondGeometry,
    load: &LoadCase,
    material: &MaterialProperties,
    support_modulus: f64,
) -> f64 {
    let p = load.magnitude();
    let t = geometry.thickness();
    let beta = (3.0 * support_modulus / (material.e * t.powi(3))).powf(0.25);
    let moment = FRIBERG_MOMENT_COEFFICIENT * p / beta + p * geometry.joint_opening() / 2.0;
    moment / geometry.section_modulus()
}

/// Stress concentration factor at normalised position (ξ, η)
///
/// Contact-edge value `2.0 + 1.2·η^1.5` (2.0 to 3.2) for ξ ≤ 0.1, tip value
/// `0.3 + 0.2·η` (0.3 to 0.5) for ξ ≥ 0.3, smoothstep blend in between.
pub fn concentration_factor(xi: f64, eta: f64) -> f64 {
    let kt_base = 2.0 + 1.2 * eta.powf(1.5);
    let kt_tip = 0.3 + 0.2 * eta;
    let w = smoothstep(BASE_ZONE_END, TIP_ZONE_START, xi);
    (1.0 - w) * kt_base + w * kt_tip
}

/// Closed-form stress field model
#[derive(Debug, Clone, PartialEq)]
pub struct ClassicalModel {
    support_modulus: f64,
    divisions: usize,
    amplification: ComponentAmplification,
}

impl ClassicalModel {
    pub fn new(options: &AnalysisOptions) -> Self {
        Self {
            support_modulus: options.support_modulus,
            divisions: options.mesh_divisions,
            amplification: ComponentAmplification::NONE,
        }
    }

    /// Classical model with AASHTO component amplification
    pub fn aashto(options: &AnalysisOptions) -> Self {
        Self {
            amplification: ComponentAmplification::AASHTO,
            ..Self::new(options)
        }
    }

    pub fn is_aashto(&self) -> bool {
        self.amplification == ComponentAmplification::AASHTO
    }

    /// Stress state at normalised position (ξ, η) for a given base stress
    pub fn state_at(&self, base_stress: f64, xi: f64, eta: f64) -> StressState {
        let sx = base_stress * (-DECAY_RATE * xi).exp() * concentration_factor(xi, eta);
        let sy = -TRANSVERSE_RATIO * sx * (1.0 - xi);
        let txy = SHEAR_RATIO * sx * (PI * xi).sin();

        let amp = self.amplification;
        StressState::from_components(sx * amp.sx, sy * amp.sy, txy * amp.txy)
    }

    pub fn analyze(
        &self,
        geometry: &DiamondGeometry,
        load: &LoadCase,
        material: &MaterialProperties,
        total_factor: f64,
    ) -> DowelResult<StressResult> {
        if self.divisions > MAX_MESH_DIVISIONS {
            return Err(DowelError::invalid(
                "options.mesh_divisions",
                self.divisions as f64,
                format!("must be at most {MAX_MESH_DIVISIONS}"),
            ));
        }
        let nominal = nominal_stress(geometry, load, material, self.support_modulus);
        let base_stress = nominal * total_factor;
        if !base_stress.is_finite() {
            return Err(DowelError::NonFinite("classical base stress".into()));
        }

        let samples: Vec<StressSample> = geometry
            .mesh_points(self.divisions)
            .into_iter()
            .map(|point| {
                let (xi, eta) = geometry.normalized(point);
                StressSample {
                    point,
                    xi,
                    eta,
                    state: self.state_at(base_stress, xi, eta),
                }
            })
            .collect();

        let maxima = StressMaxima::from_samples(&samples)
            .ok_or_else(|| DowelError::at_stage("classical", "empty sample set"))?;

        log::debug!(
            "Classical field: nominal {nominal:.2} MPa, base {base_stress:.2} MPa, max von Mises {:.2} MPa",
            maxima.von_mises.value
        );

        Ok(StressResult {
            samples,
            maxima,
            base_stress,
            total_factor,
            provenance: if self.is_aashto() {
                Provenance::Aashto
            } else {
                Provenance::Classical
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn scenario() -> (DiamondGeometry, LoadCase, MaterialProperties) {
        (
            DiamondGeometry::from_mm(125.0, 12.7, 4.8).unwrap(),
            LoadCase::concentrated_kn(22.2).unwrap(),
            MaterialProperties::a36(),
        )
    }

    #[test]
    fn test_nominal_stress_scenario() {
        let (g, load, mat) = scenario();
        let sigma = nominal_stress(&g, &load, &mat, 407.0);
        assert_relative_eq!(sigma, 48.79, epsilon = 0.05);
    }

    #[test]
    fn test_concentration_factor_ranges() {
        assert_relative_eq!(concentration_factor(0.0, 0.0), 2.0);
        assert_relative_eq!(concentration_factor(0.05, 1.0), 3.2);
        assert_relative_eq!(concentration_factor(0.5, 0.0), 0.3);
        assert_relative_eq!(concentration_factor(1.0, 1.0), 0.5);
        let mid = concentration_factor(0.2, 0.5);
        assert!(mid < concentration_factor(0.1, 0.5) && mid > concentration_factor(0.3, 0.5));
    }

    #[test]
    fn test_monotone_along_axis() {
        let model = ClassicalModel::new(&AnalysisOptions::default());
        let mut prev = f64::INFINITY;
        for i in 0..=200 {
            let xi = i as f64 / 200.0;
            let vm = model.state_at(100.0, xi, 0.0).von_mises;
            assert!(vm <= prev + 1e-12, "von Mises rose at xi = {xi}");
            prev = vm;
        }
    }

    #[test]
    fn test_peak_at_base_corner() {
        let (g, load, mat) = scenario();
        let model = ClassicalModel::new(&AnalysisOptions::default());
        let result = model.analyze(&g, &load, &mat, 1.0).unwrap();

        let peak = result.maxima.von_mises;
        assert_relative_eq!(peak.xi, 0.0);
        assert_relative_eq!(peak.point.y.abs(), g.diagonal_half(), epsilon = 1e-9);
        assert_relative_eq!(result.maxima.min_von_mises.xi, 1.0);

        let ratio = result.base_to_tip_ratio().unwrap();
        assert!((5.0..=15.0).contains(&ratio), "ratio {ratio}");
    }

    #[test]
    fn test_aashto_amplifies() {
        let (g, load, mat) = scenario();
        let opts = AnalysisOptions::default();
        let plain = ClassicalModel::new(&opts).analyze(&g, &load, &mat, 1.1).unwrap();
        let aashto = ClassicalModel::aashto(&opts).analyze(&g, &load, &mat, 1.1).unwrap();
        assert!(aashto.max_von_mises() > plain.max_von_mises());
        assert_eq!(aashto.provenance, Provenance::Aashto);
    }
}
