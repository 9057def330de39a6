//! Result types for stress analysis

use serde::{Deserialize, Serialize};

use crate::geometry::Point2;
use crate::math::{principal_stresses, von_mises_plane_stress};

/// Plane stress state at a point (MPa)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StressState {
    /// Normal stress in X direction (base to tip)
    pub sx: f64,
    /// Normal stress in Y direction
    pub sy: f64,
    /// Shear stress XY
    pub txy: f64,
    /// Von Mises equivalent stress
    pub von_mises: f64,
    /// Maximum principal stress
    pub s1: f64,
    /// Minimum principal stress
    pub s2: f64,
    /// Maximum in-plane shear stress
    pub max_shear: f64,
}

impl StressState {
    /// Create from stress components
    pub fn from_components(sx: f64, sy: f64, txy: f64) -> Self {
        let (s1, s2, max_shear) = principal_stresses(sx, sy, txy);
        Self {
            sx,
            sy,
            txy,
            von_mises: von_mises_plane_stress(sx, sy, txy),
            s1,
            s2,
            max_shear,
        }
    }

    pub fn is_finite(&self) -> bool {
        [self.sx, self.sy, self.txy, self.von_mises, self.s1, self.s2, self.max_shear]
            .iter()
            .all(|v| v.is_finite())
    }

    pub fn component(&self, component: StressComponent) -> f64 {
        match component {
            StressComponent::NormalX => self.sx,
            StressComponent::NormalY => self.sy,
            StressComponent::ShearXy => self.txy,
            StressComponent::VonMises => self.von_mises,
            StressComponent::PrincipalMax => self.s1,
            StressComponent::PrincipalMin => self.s2,
            StressComponent::MaxShear => self.max_shear,
        }
    }
}

/// Field selector for [`StressResult::field`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StressComponent {
    NormalX,
    NormalY,
    ShearXy,
    VonMises,
    PrincipalMax,
    PrincipalMin,
    MaxShear,
}

/// Stress at one sample point of the loaded half
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StressSample {
    pub point: Point2,
    /// Normalised distance from the base (0) to the tip (1)
    pub xi: f64,
    /// Normalised distance from the central axis
    pub eta: f64,
    pub state: StressState,
}

/// A scalar extreme and where it occurs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extreme {
    pub value: f64,
    pub point: Point2,
    pub xi: f64,
}

/// Scalar maxima of a stress field
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StressMaxima {
    pub von_mises: Extreme,
    /// Smallest von Mises value in the field
    pub min_von_mises: Extreme,
    pub principal_max: Extreme,
    /// Most compressive principal stress
    pub principal_min: Extreme,
    /// Largest |τxy|
    pub shear: Extreme,
    pub max_shear: Extreme,
}

impl StressMaxima {
    /// Reduce samples to maxima; `None` for an empty field
    pub fn from_samples(samples: &[StressSample]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }

        Some(Self {
            von_mises: extreme(samples, |s| s.von_mises, true),
            min_von_mises: extreme(samples, |s| s.von_mises, false),
            principal_max: extreme(samples, |s| s.s1, true),
            principal_min: extreme(samples, |s| s.s2, false),
            shear: extreme(samples, |s| s.txy.abs(), true),
            max_shear: extreme(samples, |s| s.max_shear, true),
        })
    }
}

/// First sample holding the largest (or smallest) key value
fn extreme(samples: &[StressSample], key: impl Fn(&StressState) -> f64, larger: bool) -> Extreme {
    let mut best = Extreme {
        value: key(&samples[0].state),
        point: samples[0].point,
        xi: samples[0].xi,
    };
    for s in &samples[1..] {
        let v = key(&s.state);
        if (larger && v > best.value) || (!larger && v < best.value) {
            best = Extreme {
                value: v,
                point: s.point,
                xi: s.xi,
            };
        }
    }
    best
}

/// Which analysis produced a [`StressResult`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Provenance {
    /// Solved finite-element field
    FiniteElement {
        nodes: usize,
        elements: usize,
        iterations: usize,
    },
    /// Classical concentration-factor model
    Classical,
    /// Classical model with AASHTO component amplification
    Aashto,
    /// Classical field standing in for a failed FE request
    Degraded { requested: String, reason: String },
}

impl Provenance {
    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded { .. })
    }

    pub fn is_finite_element(&self) -> bool {
        matches!(self, Self::FiniteElement { .. })
    }
}

/// Stress field over the loaded half of the dowel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StressResult {
    pub samples: Vec<StressSample>,
    pub maxima: StressMaxima,
    /// Nominal stress including modifier factors (MPa)
    pub base_stress: f64,
    pub total_factor: f64,
    pub provenance: Provenance,
}

impl StressResult {
    pub fn max_von_mises(&self) -> f64 {
        self.maxima.von_mises.value
    }

    /// Values of one component in sample order
    pub fn field(&self, component: StressComponent) -> Vec<f64> {
        self.samples.iter().map(|s| s.state.component(component)).collect()
    }

    /// Samples on the central axis (y = 0), ordered base to tip
    pub fn axis_profile(&self) -> Vec<StressSample> {
        let mut axis: Vec<StressSample> = self
            .samples
            .iter()
            .copied()
            .filter(|s| s.point.y.abs() < 1e-9)
            .collect();
        axis.sort_by(|a, b| a.xi.total_cmp(&b.xi));
        axis
    }

    /// Von Mises ratio between the base and the tip on the central axis
    pub fn base_to_tip_ratio(&self) -> Option<f64> {
        let axis = self.axis_profile();
        let base = axis.first()?.state.von_mises;
        let tip = axis.last()?.state.von_mises;
        if axis.len() < 2 || tip <= 0.0 {
            return None;
        }
        Some(base / tip)
    }

    /// Re-tag the result, e.g. when it stands in for a failed FE solve
    pub fn with_provenance(mut self, provenance: Provenance) -> Self {
        self.provenance = provenance;
        self
    }
}
