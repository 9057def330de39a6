//! Load transfer efficiency (LTE) along the dowel

use serde::Serialize;

use crate::results::StressResult;

pub const MIN_LTE: f64 = 0.25;
pub const MAX_LTE: f64 = 0.98;

/// LTE at normalised position (ξ, η), in [0.25, 0.98]
pub fn lte_at(xi: f64, eta: f64) -> f64 {
    let along = if xi < 0.1 {
        0.95
    } else if xi < 0.3 {
        0.85 * (-2.0 * xi).exp()
    } else if xi < 0.7 {
        0.70 * (-1.5 * xi).exp()
    } else {
        0.40 * (-xi).exp()
    };
    (along * (1.0 - 0.1 * eta)).clamp(MIN_LTE, MAX_LTE)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LtePoint {
    pub xi: f64,
    pub eta: f64,
    pub lte: f64,
}

/// LTE sampled over the dowel
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LteProfile {
    pub points: Vec<LtePoint>,
    pub mean: f64,
    /// LTE at the joint face on the axis
    pub at_joint: f64,
}

impl LteProfile {
    fn from_points(points: Vec<LtePoint>) -> Self {
        let mean = if points.is_empty() {
            0.0
        } else {
            points.iter().map(|p| p.lte).sum::<f64>() / points.len() as f64
        };
        Self {
            points,
            mean,
            at_joint: lte_at(0.0, 0.0),
        }
    }

    /// `n + 1` evenly spaced points on the central axis
    pub fn along_axis(n: usize) -> Self {
        let n = n.max(1);
        let points = (0..=n)
            .map(|i| {
                let xi = i as f64 / n as f64;
                LtePoint {
                    xi,
                    eta: 0.0,
                    lte: lte_at(xi, 0.0),
                }
            })
            .collect();
        Self::from_points(points)
    }

    /// LTE at every sample point of a stress field
    pub fn from_result(result: &StressResult) -> Self {
        let points = result
            .samples
            .iter()
            .map(|s| LtePoint {
                xi: s.xi,
                eta: s.eta,
                lte: lte_at(s.xi, s.eta),
            })
            .collect();
        Self::from_points(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_lte_zones() {
        assert_relative_eq!(lte_at(0.0, 0.0), 0.95);
        assert_relative_eq!(lte_at(0.2, 0.0), 0.85 * (-0.4_f64).exp());
        assert_relative_eq!(lte_at(0.5, 0.0), 0.70 * (-0.75_f64).exp());
        // 0.40·e⁻¹ ≈ 0.147 is clamped
        assert_relative_eq!(lte_at(1.0, 0.0), MIN_LTE);
        assert!(lte_at(0.0, 1.0) < lte_at(0.0, 0.0));
    }

    #[test]
    fn test_axis_profile_bounded_and_non_increasing() {
        let profile = LteProfile::along_axis(100);
        assert_eq!(profile.points.len(), 101);
        assert!(profile
            .points
            .iter()
            .all(|p| (MIN_LTE..=MAX_LTE).contains(&p.lte)));
        assert!(profile.points.windows(2).all(|w| w[1].lte <= w[0].lte + 1e-12));
        assert!(profile.mean > MIN_LTE && profile.mean < profile.at_joint);
    }
}
