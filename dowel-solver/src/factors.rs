//! AASHTO service modifier factors
//!
//! Each factor is a pure function of the service parameters and is never
//! below 1.0, so their product can only amplify the nominal stress.
//!
//! ```rust
//! use dowel_solver::factors::{thermal_factor, environmental_factor, ExposureClass};
//!
//! assert_eq!(thermal_factor(45.0, -10.0), 1.10);
//! let env = environmental_factor(ExposureClass::Severe, 85.0, 50.0);
//! assert!((env - 1.2 * 1.05 * 1.03).abs() < 1e-12);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::DowelError;

/// Upper bound of the combined impact/distribution amplification
pub const DYNAMIC_FACTOR_CEILING: f64 = 1.5;
/// Upper bound of the distribution-factor scaling inside [`dynamic_factor`]
pub const DISTRIBUTION_SCALING_CAP: f64 = 1.25;
/// Humidity (%) above which corrosion is amplified
pub const HUMID_THRESHOLD: f64 = 80.0;
/// Wind speed (km/h) above which the environment is treated as exposed
pub const WIND_THRESHOLD: f64 = 40.0;

// ============================================================================
// Service parameters
// ============================================================================

/// Corrosion exposure class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExposureClass {
    Minimal,
    #[default]
    Moderate,
    Severe,
    VerySevere,
}

impl ExposureClass {
    pub fn base_factor(&self) -> f64 {
        match self {
            Self::Minimal => 1.0,
            Self::Moderate => 1.15,
            Self::Severe => 1.2,
            Self::VerySevere => 1.25,
        }
    }
}

/// AASHTO seismic zone 0 (non-seismic) to 4 (very high)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct SeismicZone(u8);

impl SeismicZone {
    pub const MAX: u8 = 4;

    pub fn new(zone: u8) -> Result<Self, DowelError> {
        Self::try_from(zone)
    }

    pub fn zone(&self) -> u8 {
        self.0
    }

    /// Load amplification for the zone
    pub fn amplification(&self) -> f64 {
        match self.0 {
            0 => 1.0,
            1 => 1.1,
            2 => 1.25,
            3 => 1.4,
            _ => 1.6,
        }
    }

    pub fn description(&self) -> &'static str {
        match self.0 {
            0 => "non-seismic",
            1 => "low",
            2 => "moderate",
            3 => "high",
            _ => "very high",
        }
    }
}

impl Default for SeismicZone {
    fn default() -> Self {
        Self(2)
    }
}

impl TryFrom<u8> for SeismicZone {
    type Error = DowelError;

    fn try_from(zone: u8) -> Result<Self, Self::Error> {
        if zone > Self::MAX {
            return Err(DowelError::invalid(
                "service.seismic_zone",
                zone as f64,
                "must be between 0 and 4",
            ));
        }
        Ok(Self(zone))
    }
}

impl From<SeismicZone> for u8 {
    fn from(zone: SeismicZone) -> u8 {
        zone.0
    }
}

/// Environmental and service conditions of the joint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceParameters {
    /// Service temperature (°C)
    pub service_temperature: f64,
    /// Maximum expected temperature (°C)
    pub max_temperature: f64,
    /// Minimum expected temperature (°C)
    pub min_temperature: f64,
    /// Relative humidity (%)
    pub humidity: f64,
    /// Design wind speed (km/h)
    pub wind_speed: f64,
    pub exposure: ExposureClass,
    pub seismic_zone: SeismicZone,
    /// Expected load cycles over the service life
    pub fatigue_cycles: f64,
    /// Dynamic load allowance, IM ≥ 1
    pub impact_factor: f64,
    pub distribution_factor: f64,
}

impl Default for ServiceParameters {
    fn default() -> Self {
        Self {
            service_temperature: 20.0,
            max_temperature: 50.0,
            min_temperature: -20.0,
            humidity: 60.0,
            wind_speed: 130.0,
            exposure: ExposureClass::Moderate,
            seismic_zone: SeismicZone::default(),
            fatigue_cycles: 2.0e6,
            impact_factor: 1.33,
            distribution_factor: 1.2,
        }
    }
}

impl ServiceParameters {
    /// Benign conditions where every factor takes its floor value
    pub fn benign() -> Self {
        Self {
            max_temperature: 30.0,
            min_temperature: 0.0,
            humidity: 50.0,
            wind_speed: 10.0,
            exposure: ExposureClass::Minimal,
            seismic_zone: SeismicZone(0),
            fatigue_cycles: 1.0e5,
            impact_factor: 1.0,
            distribution_factor: 1.0,
            ..Self::default()
        }
    }

    pub fn temperature_range(&self) -> f64 {
        self.max_temperature - self.min_temperature
    }
}

// ============================================================================
// Factor functions
// ============================================================================

/// Thermal factor from the temperature range (°C)
pub fn thermal_factor(temp_max: f64, temp_min: f64) -> f64 {
    let range = temp_max - temp_min;
    if range > 60.0 {
        1.15
    } else if range > 40.0 {
        1.10
    } else {
        1.05
    }
}

/// Environmental factor from exposure, humidity (%) and wind speed (km/h)
pub fn environmental_factor(exposure: ExposureClass, humidity: f64, wind_speed: f64) -> f64 {
    let mut factor = exposure.base_factor();
    if humidity > HUMID_THRESHOLD {
        factor *= 1.05;
    }
    if wind_speed > WIND_THRESHOLD {
        factor *= 1.03;
    }
    factor
}

/// Dynamic amplification from impact and distribution factors.
///
/// The distribution factor enters through a bounded scaling
/// `1 + 0.5·(df − 1)` clamped to `[1, 1.25]`, and the product is clamped to
/// `[1, DYNAMIC_FACTOR_CEILING]`.
pub fn dynamic_factor(impact_factor: f64, distribution_factor: f64) -> f64 {
    let scaling = (1.0 + 0.5 * (distribution_factor - 1.0)).clamp(1.0, DISTRIBUTION_SCALING_CAP);
    let factor = impact_factor.max(1.0) * scaling;
    factor.clamp(1.0, DYNAMIC_FACTOR_CEILING)
}

/// Fatigue factor from the number of load cycles, scaled by the impact factor
pub fn fatigue_factor(cycles: f64, impact_factor: f64) -> f64 {
    let base = if cycles > 1.0e7 {
        1.15
    } else if cycles > 1.0e6 {
        1.10
    } else {
        1.05
    };
    base * (1.0 + (impact_factor - 1.0).max(0.0) * 0.5)
}

// ============================================================================
// Combined factors
// ============================================================================

/// Modifier factors for one analysis
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ModifierFactors {
    pub thermal: f64,
    pub environmental: f64,
    pub dynamic: f64,
    pub fatigue: f64,
    /// thermal × environmental × dynamic × fatigue
    pub total: f64,
    /// Seismic load amplification. Reported only, not part of `total`.
    pub seismic_amplification: f64,
}

impl ModifierFactors {
    pub fn compute(service: &ServiceParameters) -> Self {
        let thermal = thermal_factor(service.max_temperature, service.min_temperature);
        let environmental =
            environmental_factor(service.exposure, service.humidity, service.wind_speed);
        let dynamic = dynamic_factor(service.impact_factor, service.distribution_factor);
        let fatigue = fatigue_factor(service.fatigue_cycles, service.impact_factor);
        let total = thermal * environmental * dynamic * fatigue;

        log::debug!(
            "Modifier factors: thermal {thermal:.3}, environmental {environmental:.3}, \
             dynamic {dynamic:.3}, fatigue {fatigue:.3}, total {total:.4}"
        );

        Self {
            thermal,
            environmental,
            dynamic,
            fatigue,
            total,
            seismic_amplification: service.seismic_zone.amplification(),
        }
    }
}
