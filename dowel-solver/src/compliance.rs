//! Safety and compliance classification
//!
//! Two independent axes are reported together: the strength margin
//! (design state, from the safety factor) and the harshness of the service
//! environment (condition severity, from the combined modifier factor). A
//! design can be approved and still sit in severe conditions.

use serde::{Deserialize, Serialize};

use crate::elements::MaterialProperties;
use crate::error::{DowelError, DowelResult};
use crate::factors::SeismicZone;
use crate::loads::LoadCase;
use crate::results::StressResult;

/// Safety factor at or above which a design is approved
pub const APPROVED_SAFETY_FACTOR: f64 = 2.0;
/// Safety factor at or above which a design goes to review
pub const REVIEW_SAFETY_FACTOR: f64 = 1.5;
/// Total factor above which conditions are severe
pub const SEVERE_TOTAL_FACTOR: f64 = 1.3;
/// Total factor above which conditions are moderate
pub const MODERATE_TOTAL_FACTOR: f64 = 1.15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DesignState {
    Approved,
    Review,
    Rejected,
}

impl DesignState {
    pub fn from_safety_factor(sf: f64) -> Self {
        if sf >= APPROVED_SAFETY_FACTOR {
            Self::Approved
        } else if sf >= REVIEW_SAFETY_FACTOR {
            Self::Review
        } else {
            Self::Rejected
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionSeverity {
    Normal,
    Moderate,
    Severe,
}

impl ConditionSeverity {
    pub fn from_total_factor(total: f64) -> Self {
        if total > SEVERE_TOTAL_FACTOR {
            Self::Severe
        } else if total > MODERATE_TOTAL_FACTOR {
            Self::Moderate
        } else {
            Self::Normal
        }
    }
}

/// Outcome of a compliance check
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComplianceVerdict {
    /// fy / max von Mises
    pub safety_factor: f64,
    pub max_von_mises: f64,
    pub design_state: DesignState,
    pub condition_severity: ConditionSeverity,
    pub total_factor: f64,
}

/// Reduce a stress field and material to a verdict
pub fn evaluate(result: &StressResult, material: &MaterialProperties) -> DowelResult<ComplianceVerdict> {
    let max_vm = result.max_von_mises();
    if !max_vm.is_finite() || max_vm <= 0.0 {
        return Err(DowelError::at_stage(
            "compliance",
            format!("maximum von Mises stress {max_vm} is not positive"),
        ));
    }

    let safety_factor = material.fy / max_vm;
    let verdict = ComplianceVerdict {
        safety_factor,
        max_von_mises: max_vm,
        design_state: DesignState::from_safety_factor(safety_factor),
        condition_severity: ConditionSeverity::from_total_factor(result.total_factor),
        total_factor: result.total_factor,
    };

    log::info!(
        "Compliance: SF {:.3} ({:?}), conditions {:?}",
        verdict.safety_factor,
        verdict.design_state,
        verdict.condition_severity
    );

    Ok(verdict)
}

/// Seismic design check for the dowel's zone
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeismicCheck {
    pub zone: u8,
    pub amplification: f64,
    /// Service load times the zone amplification (N)
    pub design_load: f64,
    /// Minimum safety factor required in this zone
    pub required_safety_factor: f64,
    /// Yield strength reduced by the zone amplification (MPa)
    pub stress_limit: f64,
    pub passes: bool,
}

pub fn seismic_check(
    load: &LoadCase,
    zone: SeismicZone,
    safety_factor: f64,
    material: &MaterialProperties,
) -> DowelResult<SeismicCheck> {
    let amplification = zone.amplification();
    let required = APPROVED_SAFETY_FACTOR * amplification;
    let design_load = load.scaled(amplification)?;
    Ok(SeismicCheck {
        zone: zone.zone(),
        amplification,
        design_load: design_load.magnitude(),
        required_safety_factor: required,
        stress_limit: material.fy / amplification,
        passes: safety_factor >= required,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point2;
    use crate::results::{Extreme, Provenance, StressMaxima, StressSample, StressState};
    use approx::assert_relative_eq;

    fn single_point_result(vm_target: f64, total_factor: f64) -> StressResult {
        let sample = StressSample {
            point: Point2::new(0.0, 0.0),
            xi: 0.0,
            eta: 0.0,
            state: StressState::from_components(vm_target, 0.0, 0.0),
        };
        let maxima = StressMaxima::from_samples(&[sample]).unwrap();
        StressResult {
            samples: vec![sample],
            maxima,
            base_stress: vm_target,
            total_factor,
            provenance: Provenance::Classical,
        }
    }

    #[test]
    fn test_design_state_boundaries() {
        assert_eq!(DesignState::from_safety_factor(2.0), DesignState::Approved);
        assert_eq!(DesignState::from_safety_factor(1.999_999), DesignState::Review);
        assert_eq!(DesignState::from_safety_factor(1.5), DesignState::Review);
        assert_eq!(DesignState::from_safety_factor(1.499_999), DesignState::Rejected);
        assert_eq!(DesignState::from_safety_factor(0.3), DesignState::Rejected);
    }

    #[test]
    fn test_severity_boundaries() {
        assert_eq!(ConditionSeverity::from_total_factor(1.0), ConditionSeverity::Normal);
        assert_eq!(ConditionSeverity::from_total_factor(1.15), ConditionSeverity::Normal);
        assert_eq!(ConditionSeverity::from_total_factor(1.2), ConditionSeverity::Moderate);
        assert_eq!(ConditionSeverity::from_total_factor(1.3), ConditionSeverity::Moderate);
        assert_eq!(ConditionSeverity::from_total_factor(1.31), ConditionSeverity::Severe);
    }

    #[test]
    fn test_safety_factor_is_exact_ratio() {
        let mat = MaterialProperties::a36();
        // 250 / 125 = 2.0 exactly
        let verdict = evaluate(&single_point_result(125.0, 1.4), &mat).unwrap();
        assert_eq!(verdict.safety_factor, 250.0 / 125.0);
        assert_eq!(verdict.design_state, DesignState::Approved);
        assert_eq!(verdict.condition_severity, ConditionSeverity::Severe);

        let verdict = evaluate(&single_point_result(250.0 / 1.5, 1.0), &mat).unwrap();
        assert_eq!(verdict.safety_factor, mat.fy / verdict.max_von_mises);
        assert_relative_eq!(verdict.safety_factor, 1.5, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_stress_refused() {
        let mut result = single_point_result(1.0, 1.0);
        result.maxima.von_mises = Extreme {
            value: 0.0,
            point: Point2::default(),
            xi: 0.0,
        };
        assert!(evaluate(&result, &MaterialProperties::a36()).is_err());
    }

    #[test]
    fn test_seismic_check() {
        let load = LoadCase::concentrated_kn(20.0).unwrap();
        let mat = MaterialProperties::a36();

        let calm = seismic_check(&load, SeismicZone::new(0).unwrap(), 2.0, &mat).unwrap();
        assert!(calm.passes);
        assert_relative_eq!(calm.design_load, load.magnitude());
        assert_relative_eq!(calm.stress_limit, 250.0);

        let severe = seismic_check(&load, SeismicZone::new(4).unwrap(), 3.0, &mat).unwrap();
        assert_relative_eq!(severe.required_safety_factor, 3.2, epsilon = 1e-12);
        assert_relative_eq!(severe.design_load, 32_000.0, epsilon = 1e-9);
        assert!(!severe.passes);
    }
}
