//! Constant strain triangle (CST) for plane stress
//!
//! 3 nodes with 2 DOFs per node (DX, DY). Strain is uniform over the element,
//! so a single B matrix gives both the stiffness and the element stress.

use crate::error::{DowelError, DowelResult};
use crate::geometry::Point2;
use crate::math::{plane_stress_matrix, Mat3, Mat3x6, Mat6, Vec3, Vec6};
use crate::mesh::{signed_area, MIN_ELEMENT_AREA};

use super::MaterialProperties;

/// A plane-stress triangle ready for assembly
#[derive(Debug, Clone)]
pub struct CstElement {
    area: f64,
    thickness: f64,
    b: Mat3x6,
    d: Mat3,
}

impl CstElement {
    /// Build from counter-clockwise corner points.
    ///
    /// Fails with [`DowelError::IllConditionedMesh`] for degenerate or
    /// clockwise triangles.
    pub fn new(points: [Point2; 3], thickness: f64, material: &MaterialProperties) -> DowelResult<Self> {
        let [p1, p2, p3] = points;
        let area = signed_area(&p1, &p2, &p3);
        if area.is_nan() || area <= MIN_ELEMENT_AREA {
            return Err(DowelError::IllConditionedMesh(format!(
                "element area {area:e} mm² at ({:.3}, {:.3})",
                p1.x, p1.y
            )));
        }

        // b_i = y_j - y_k, c_i = x_k - x_j (cyclic)
        let b1 = p2.y - p3.y;
        let b2 = p3.y - p1.y;
        let b3 = p1.y - p2.y;
        let c1 = p3.x - p2.x;
        let c2 = p1.x - p3.x;
        let c3 = p2.x - p1.x;

        let inv = 1.0 / (2.0 * area);
        let b = Mat3x6::from_row_slice(&[
            b1, 0.0, b2, 0.0, b3, 0.0,
            0.0, c1, 0.0, c2, 0.0, c3,
            c1, b1, c2, b2, c3, b3,
        ]) * inv;

        Ok(Self {
            area,
            thickness,
            b,
            d: plane_stress_matrix(material.e, material.nu),
        })
    }

    pub fn area(&self) -> f64 {
        self.area
    }

    /// Element stiffness matrix K = t·A·BᵀDB (N/mm)
    pub fn stiffness(&self) -> Mat6 {
        self.b.transpose() * self.d * self.b * (self.thickness * self.area)
    }

    /// Constant stress (σx, σy, τxy) for the given nodal displacements
    pub fn stress(&self, displacements: &Vec6) -> Vec3 {
        self.d * (self.b * displacements)
    }
}
