//! JSON analysis configuration
//!
//! One record carries everything an analysis needs. Sections other than
//! geometry and load fall back to defaults when omitted.
//!
//! ```rust
//! use dowel_solver::config::AnalysisConfig;
//!
//! let json = r#"{
//!     "geometry": { "side_length": 125.0, "thickness": 12.7, "joint_opening": 4.8, "unit": "mm" },
//!     "material": { "grade": "A36" },
//!     "load": { "magnitude": 22.2, "unit": "kN" },
//!     "mode": "classical"
//! }"#;
//! let config = AnalysisConfig::from_json_str(json).unwrap();
//! assert_eq!(config.geometry.unit, dowel_solver::units::LengthUnit::Millimetre);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::analysis::{AnalysisMode, AnalysisOptions};
use crate::elements::{MaterialProperties, SteelGrade};
use crate::error::{DowelError, DowelResult};
use crate::factors::ServiceParameters;
use crate::geometry::DiamondGeometry;
use crate::loads::{LoadCase, LoadType};
use crate::units::{Force, ForceUnit, Length, LengthUnit, StressUnit};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryConfig {
    pub side_length: f64,
    pub thickness: f64,
    pub joint_opening: f64,
    #[serde(default)]
    pub unit: LengthUnit,
}

impl GeometryConfig {
    pub fn build(&self) -> DowelResult<DiamondGeometry> {
        DiamondGeometry::build(
            Length::new(self.side_length, self.unit),
            Length::new(self.thickness, self.unit),
            Length::new(self.joint_opening, self.unit),
        )
    }
}

/// A catalogue grade, optionally with overrides, or a fully custom material
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialConfig {
    #[serde(default = "default_grade")]
    pub grade: SteelGrade,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub e: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nu: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fy: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fu: Option<f64>,
    /// Unit of `e`, `fy` and `fu`
    #[serde(default)]
    pub unit: StressUnit,
}

fn default_grade() -> SteelGrade {
    SteelGrade::A36
}

impl Default for MaterialConfig {
    fn default() -> Self {
        Self {
            grade: SteelGrade::A36,
            e: None,
            nu: None,
            fy: None,
            fu: None,
            unit: StressUnit::MegaPascal,
        }
    }
}

impl MaterialConfig {
    pub fn build(&self) -> DowelResult<MaterialProperties> {
        let to_mpa = |v: f64| self.unit.to_mpa(v);

        let mut material = match self.grade {
            SteelGrade::Custom => {
                let missing: Vec<&str> = [("e", self.e), ("nu", self.nu), ("fy", self.fy)]
                    .iter()
                    .filter(|(_, v)| v.is_none())
                    .map(|(name, _)| *name)
                    .collect();
                if !missing.is_empty() {
                    return Err(DowelError::MissingParameter(format!(
                        "custom material requires material.{}",
                        missing.join(", material.")
                    )));
                }
                MaterialProperties::custom(
                    to_mpa(self.e.unwrap_or_default()),
                    self.nu.unwrap_or_default(),
                    to_mpa(self.fy.unwrap_or_default()),
                )?
            }
            grade => {
                let mut material = MaterialProperties::from_grade(grade)?;
                if let Some(e) = self.e {
                    material.e = to_mpa(e);
                }
                if let Some(nu) = self.nu {
                    material.nu = nu;
                }
                if let Some(fy) = self.fy {
                    material.fy = to_mpa(fy);
                }
                material.check()?;
                material
            }
        };
        if let Some(fu) = self.fu {
            material = material.with_ultimate_strength(to_mpa(fu));
        }
        Ok(material)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadConfig {
    pub magnitude: f64,
    #[serde(default)]
    pub unit: ForceUnit,
    #[serde(default)]
    pub load_type: LoadType,
}

impl LoadConfig {
    pub fn build(&self) -> DowelResult<LoadCase> {
        LoadCase::new(Force::new(self.magnitude, self.unit), self.load_type)
    }
}

/// Complete input for one analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub geometry: GeometryConfig,
    #[serde(default)]
    pub material: MaterialConfig,
    pub load: LoadConfig,
    #[serde(default)]
    pub service: ServiceParameters,
    #[serde(default)]
    pub mode: AnalysisMode,
    #[serde(default)]
    pub options: AnalysisOptions,
}

impl AnalysisConfig {
    /// Reference case: medium metric dowel, 22.2 kN, A36
    pub fn reference() -> Self {
        Self {
            geometry: GeometryConfig {
                side_length: 125.0,
                thickness: 12.7,
                joint_opening: 4.8,
                unit: LengthUnit::Millimetre,
            },
            material: MaterialConfig::default(),
            load: LoadConfig {
                magnitude: 22.2,
                unit: ForceUnit::KiloNewton,
                load_type: LoadType::Concentrated,
            },
            service: ServiceParameters::default(),
            mode: AnalysisMode::Auto,
            options: AnalysisOptions::default(),
        }
    }

    pub fn from_json_str(json: &str) -> DowelResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> DowelResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn to_json(&self) -> DowelResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn with_mode(mut self, mode: AnalysisMode) -> Self {
        self.mode = mode;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::factors::ExposureClass;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let json = r#"{
            "geometry": { "side_length": 5.0, "thickness": 0.5, "joint_opening": 0.19, "unit": "in" },
            "load": { "magnitude": 5.0, "unit": "kip" }
        }"#;
        let config = AnalysisConfig::from_json_str(json).unwrap();
        assert_eq!(config.mode, AnalysisMode::Auto);
        assert_eq!(config.material.grade, SteelGrade::A36);
        assert_eq!(config.service, ServiceParameters::default());
        let g = config.geometry.build().unwrap();
        assert!((g.side_length() - 127.0).abs() < 1e-9);
    }

    #[test]
    fn test_service_section_partial() {
        let json = r#"{
            "geometry": { "side_length": 125.0, "thickness": 12.7, "joint_opening": 4.8 },
            "load": { "magnitude": 22.2 },
            "service": { "exposure": "very_severe", "seismic_zone": 4, "humidity": 90.0 },
            "mode": "aashto"
        }"#;
        let config = AnalysisConfig::from_json_str(json).unwrap();
        assert_eq!(config.service.exposure, ExposureClass::VerySevere);
        assert_eq!(config.service.seismic_zone.zone(), 4);
        assert_eq!(config.service.impact_factor, 1.33);
        assert_eq!(config.mode, AnalysisMode::Aashto);
    }

    #[test]
    fn test_custom_material_requires_all_constants() {
        let material = MaterialConfig {
            grade: SteelGrade::Custom,
            e: Some(29_000.0),
            fy: Some(50.0),
            unit: StressUnit::Ksi,
            ..MaterialConfig::default()
        };
        let err = material.build().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert!(err.to_string().contains("material.nu"));

        let complete = MaterialConfig {
            nu: Some(0.3),
            ..material
        };
        let props = complete.build().unwrap();
        assert!((props.fy - 344.74).abs() < 0.01);
    }

    #[test]
    fn test_unknown_mode_is_rejected() {
        let json = r#"{
            "geometry": { "side_length": 125.0, "thickness": 12.7, "joint_opening": 4.8 },
            "load": { "magnitude": 22.2 },
            "mode": "spectral"
        }"#;
        assert!(AnalysisConfig::from_json_str(json).is_err());
    }

    #[test]
    fn test_oversized_mesh_is_refused() {
        let json = r#"{
            "geometry": { "side_length": 125.0, "thickness": 12.7, "joint_opening": 4.8 },
            "load": { "magnitude": 22.2 },
            "mode": "classical",
            "options": { "mesh_divisions": 18446744073709551615 }
        }"#;
        let config = AnalysisConfig::from_json_str(json).unwrap();
        let err = crate::model::DowelModel::from_config(&config).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InputValidation);
        assert!(err.to_string().contains("options.mesh_divisions"));
    }

    #[test]
    fn test_reference_serializes_mode() {
        let json = AnalysisConfig::reference()
            .with_mode(AnalysisMode::Fea)
            .to_json()
            .unwrap();
        assert!(json.contains("\"mode\": \"fea\""));
        assert!(json.contains("\"grade\": \"A36\""));
    }
}
