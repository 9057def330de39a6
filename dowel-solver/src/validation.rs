//! Input range checks run before an analysis
//!
//! Hard violations are errors and stop the analysis. Values that are
//! physically valid but outside AASHTO 14.5.1 practice, or outside typical
//! steel properties, are warnings and are carried into the report.

use serde::Serialize;

use crate::elements::MaterialProperties;
use crate::error::{DowelError, DowelResult};
use crate::factors::ServiceParameters;
use crate::geometry::DiamondGeometry;
use crate::loads::LoadCase;

/// Geometric and load limits for diamond dowels (AASHTO 14.5.1)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeometryLimits {
    pub min_side_mm: f64,
    pub max_side_mm: f64,
    pub min_thickness_mm: f64,
    pub max_thickness_mm: f64,
    /// Maximum joint opening as a fraction of the side length
    pub max_joint_opening_ratio: f64,
    pub max_design_load_kn: f64,
}

impl Default for GeometryLimits {
    fn default() -> Self {
        Self {
            min_side_mm: 100.0,
            max_side_mm: 200.0,
            min_thickness_mm: 6.0,
            max_thickness_mm: 50.0,
            max_joint_opening_ratio: 0.1,
            max_design_load_kn: 1000.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationIssue {
    pub field: String,
    pub severity: Severity,
    pub message: String,
}

/// Collected findings of one validation pass
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationReport {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, field: &str, severity: Severity, message: String) {
        match severity {
            Severity::Error => log::error!("{field}: {message}"),
            Severity::Warning => log::warn!("{field}: {message}"),
            Severity::Info => log::info!("{field}: {message}"),
        }
        self.issues.push(ValidationIssue {
            field: field.to_string(),
            severity,
            message,
        });
    }

    fn check_range(&mut self, field: &str, value: f64, min: f64, max: f64, unit: &str) {
        if !value.is_finite() {
            self.push(field, Severity::Error, format!("{value} is not a finite number"));
        } else if value < min || value > max {
            self.push(
                field,
                Severity::Error,
                format!("{value} {unit} is outside the valid range {min} to {max} {unit}"),
            );
        }
    }

    pub fn has_errors(&self) -> bool {
        self.issues.iter().any(|i| i.severity == Severity::Error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Warning)
    }

    /// Warning messages formatted as `field: message`
    pub fn warning_messages(&self) -> Vec<String> {
        self.warnings()
            .map(|i| format!("{}: {}", i.field, i.message))
            .collect()
    }

    /// Turn error findings into a [`DowelError::Validation`]
    pub fn into_result(self) -> DowelResult<Self> {
        if self.has_errors() {
            let summary = self
                .errors()
                .map(|i| format!("{}: {}", i.field, i.message))
                .collect::<Vec<_>>()
                .join("; ");
            return Err(DowelError::Validation(summary));
        }
        Ok(self)
    }

    pub fn merge(&mut self, other: ValidationReport) {
        self.issues.extend(other.issues);
    }
}

/// Service parameter ranges
pub fn validate_service(service: &ServiceParameters) -> ValidationReport {
    let mut report = ValidationReport::new();

    report.check_range("service.service_temperature", service.service_temperature, -60.0, 80.0, "°C");
    report.check_range("service.max_temperature", service.max_temperature, -60.0, 80.0, "°C");
    report.check_range("service.min_temperature", service.min_temperature, -60.0, 80.0, "°C");
    if service.max_temperature < service.min_temperature {
        report.push(
            "service.max_temperature",
            Severity::Error,
            format!(
                "maximum temperature {} °C is below minimum {} °C",
                service.max_temperature, service.min_temperature
            ),
        );
    }
    if service.service_temperature < service.min_temperature
        || service.service_temperature > service.max_temperature
    {
        report.push(
            "service.service_temperature",
            Severity::Warning,
            "service temperature lies outside the min/max envelope".into(),
        );
    }

    report.check_range("service.humidity", service.humidity, 0.0, 100.0, "%");
    report.check_range("service.wind_speed", service.wind_speed, 0.0, 300.0, "km/h");
    report.check_range("service.impact_factor", service.impact_factor, 1.0, 2.0, "");
    report.check_range("service.distribution_factor", service.distribution_factor, 0.5, 2.0, "");
    report.check_range("service.fatigue_cycles", service.fatigue_cycles, 0.0, 1.0e12, "cycles");

    report
}

/// AASHTO geometry practice limits; never fatal
pub fn validate_geometry(geometry: &DiamondGeometry, limits: &GeometryLimits) -> ValidationReport {
    let mut report = ValidationReport::new();

    let side = geometry.side_length();
    if side < limits.min_side_mm || side > limits.max_side_mm {
        report.push(
            "geometry.side_length",
            Severity::Warning,
            format!(
                "{side:.1} mm is outside the AASHTO range {}-{} mm",
                limits.min_side_mm, limits.max_side_mm
            ),
        );
    }

    let t = geometry.thickness();
    if t < limits.min_thickness_mm || t > limits.max_thickness_mm {
        report.push(
            "geometry.thickness",
            Severity::Warning,
            format!(
                "{t:.2} mm is outside the AASHTO range {}-{} mm",
                limits.min_thickness_mm, limits.max_thickness_mm
            ),
        );
    }

    let max_joint = side * limits.max_joint_opening_ratio;
    if geometry.joint_opening() > max_joint {
        report.push(
            "geometry.joint_opening",
            Severity::Warning,
            format!(
                "{:.2} mm exceeds {max_joint:.1} mm ({:.0}% of side)",
                geometry.joint_opening(),
                limits.max_joint_opening_ratio * 100.0
            ),
        );
    }

    report
}

pub fn validate_load(load: &LoadCase, limits: &GeometryLimits) -> ValidationReport {
    let mut report = ValidationReport::new();
    let kn = load.magnitude() / 1000.0;
    if kn > limits.max_design_load_kn {
        report.push(
            "load.magnitude",
            Severity::Warning,
            format!("{kn:.1} kN exceeds the design limit of {} kN", limits.max_design_load_kn),
        );
    }
    report
}

/// Grade minimums are errors; atypical steel constants are warnings
pub fn validate_material(material: &MaterialProperties) -> ValidationReport {
    let mut report = ValidationReport::new();

    if let Err(err) = material.check() {
        report.push("material", Severity::Error, err.to_string());
        return report;
    }
    if let Some(min_fy) = material.grade.minimum_yield() {
        if material.fy < min_fy {
            report.push(
                "material.fy",
                Severity::Error,
                format!("{} requires fy ≥ {min_fy} MPa, got {}", material.grade.label(), material.fy),
            );
        }
    }
    if !(190_000.0..=210_000.0).contains(&material.e) {
        report.push(
            "material.e",
            Severity::Warning,
            format!("{} MPa is outside the usual 190-210 GPa for steel", material.e),
        );
    }
    if !(0.25..=0.35).contains(&material.nu) {
        report.push(
            "material.nu",
            Severity::Warning,
            format!("{} is outside the usual 0.25-0.35 for steel", material.nu),
        );
    }

    report
}

/// Run every check and fail on the first error class
pub fn validate_all(
    geometry: &DiamondGeometry,
    material: &MaterialProperties,
    load: &LoadCase,
    service: &ServiceParameters,
) -> DowelResult<ValidationReport> {
    let limits = GeometryLimits::default();
    let mut report = validate_service(service);
    report.merge(validate_geometry(geometry, &limits));
    report.merge(validate_load(load, &limits));
    report.merge(validate_material(material));
    report.into_result()
}
