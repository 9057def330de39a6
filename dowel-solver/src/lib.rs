//! Dowel Solver - stress analysis of diamond dowel bars
//!
//! Diamond (square plate rotated 45°) dowels transfer shear across pavement
//! and bridge deck joints. This library evaluates one dowel under a service
//! load and reports:
//! - The plane stress field over the loaded half (von Mises, principal, shear)
//! - Service modifier factors (thermal, environmental, dynamic, fatigue)
//! - An AASHTO LRFD style safety verdict and seismic check
//! - The load transfer efficiency profile across the joint
//!
//! Stress fields come from a closed-form concentration-factor model or, with
//! the `fea` feature, a CST plane-stress model on a Winkler foundation. A
//! failed finite-element solve falls back to the classical field and is
//! flagged as degraded in the report.
//!
//! ## Example
//! ```rust
//! use dowel_solver::prelude::*;
//!
//! let geometry = DiamondGeometry::from_mm(125.0, 12.7, 4.8).unwrap();
//! let load = LoadCase::concentrated_kn(22.2).unwrap();
//!
//! let model = DowelModel::new(
//!     geometry,
//!     MaterialProperties::a36(),
//!     load,
//!     ServiceParameters::benign(),
//! )
//! .unwrap()
//! .with_mode(AnalysisMode::Classical);
//!
//! let report = model.analyze().unwrap();
//! assert!(report.verdict.max_von_mises > 0.0);
//! assert_eq!(report.verdict.design_state, DesignState::Rejected);
//! ```

pub mod analysis;
pub mod compliance;
pub mod config;
pub mod elements;
pub mod error;
pub mod factors;
pub mod geometry;
pub mod loads;
pub mod math;
pub mod mesh;
pub mod model;
pub mod results;
pub mod transfer;
pub mod units;
pub mod validation;

// Re-export common types
pub mod prelude {
    pub use crate::analysis::{AnalysisMode, AnalysisOptions, Analyzer, TipCondition};
    pub use crate::compliance::{ComplianceVerdict, ConditionSeverity, DesignState, SeismicCheck};
    pub use crate::config::AnalysisConfig;
    pub use crate::elements::{MaterialProperties, SteelGrade};
    pub use crate::error::{DowelError, DowelResult, ErrorKind};
    pub use crate::factors::{ExposureClass, ModifierFactors, SeismicZone, ServiceParameters};
    pub use crate::geometry::{DiamondGeometry, Point2, StandardSize, UnitSystem};
    pub use crate::loads::{LoadCase, LoadType};
    pub use crate::model::{AnalysisReport, DowelModel};
    pub use crate::results::{Provenance, StressComponent, StressResult, StressState};
    pub use crate::transfer::LteProfile;
    pub use crate::units::{Force, ForceUnit, Length, LengthUnit, StressUnit};
}
