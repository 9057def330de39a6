//! Plane-stress constitutive relations and stress invariants

use super::Mat3;

/// Plane-stress constitutive matrix [D] relating (εx, εy, γxy) to (σx, σy, τxy)
///
/// ```text
///            E     | 1   ν   0       |
///   D  =  ------   | ν   1   0       |
///         1 - ν²   | 0   0   (1-ν)/2 |
/// ```
pub fn plane_stress_matrix(e: f64, nu: f64) -> Mat3 {
    let c = e / (1.0 - nu * nu);
    Mat3::new(
        c,      c * nu, 0.0,
        c * nu, c,      0.0,
        0.0,    0.0,    c * (1.0 - nu) / 2.0,
    )
}

/// Von Mises equivalent stress for a plane-stress state
pub fn von_mises_plane_stress(sx: f64, sy: f64, txy: f64) -> f64 {
    (sx * sx - sx * sy + sy * sy + 3.0 * txy * txy).sqrt()
}

/// In-plane principal stresses (σ1 ≥ σ2) and the maximum in-plane shear
pub fn principal_stresses(sx: f64, sy: f64, txy: f64) -> (f64, f64, f64) {
    let avg = (sx + sy) / 2.0;
    let r = (((sx - sy) / 2.0).powi(2) + txy * txy).sqrt();
    (avg + r, avg - r, r)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec3;
    use approx::assert_relative_eq;

    #[test]
    fn test_uniaxial_stress() {
        // Uniaxial strain state that gives σy = 0
        let e = 200_000.0;
        let nu = 0.3;
        let strain = Vec3::new(1e-3, -nu * 1e-3, 0.0);
        let s = plane_stress_matrix(e, nu) * strain;
        assert_relative_eq!(s[0], 200.0, epsilon = 1e-9);
        assert_relative_eq!(s[1], 0.0, epsilon = 1e-9);
        assert_relative_eq!(von_mises_plane_stress(s[0], s[1], s[2]), 200.0, epsilon = 1e-9);
    }

    #[test]
    fn test_pure_shear_invariants() {
        let (s1, s2, tmax) = principal_stresses(0.0, 0.0, 50.0);
        assert_relative_eq!(s1, 50.0);
        assert_relative_eq!(s2, -50.0);
        assert_relative_eq!(tmax, 50.0);
        assert_relative_eq!(von_mises_plane_stress(0.0, 0.0, 50.0), 50.0 * 3.0_f64.sqrt());
    }
}
