//! Mathematical utilities for the plane-stress model

pub mod plane;
#[cfg(feature = "fea")]
pub mod sparse;

use nalgebra::{Matrix3, Matrix6, SMatrix, SVector, Vector3};

#[cfg(feature = "fea")]
pub use sparse::{solve_pcg, PcgOutcome, SparseMatrixBuilder};

pub use plane::{plane_stress_matrix, principal_stresses, von_mises_plane_stress};

pub type Mat3 = Matrix3<f64>;
pub type Mat6 = Matrix6<f64>;
pub type Vec3 = Vector3<f64>;
/// 6-element vector of triangle nodal displacements (u1, v1, u2, v2, u3, v3)
pub type Vec6 = SVector<f64, 6>;
/// Strain-displacement matrix of a constant strain triangle
pub type Mat3x6 = SMatrix<f64, 3, 6>;

/// Hermite smoothstep on [edge0, edge1], 0 below and 1 above
pub fn smoothstep(edge0: f64, edge1: f64, x: f64) -> f64 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}
