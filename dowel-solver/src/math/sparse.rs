//! Sparse assembly and iterative solve for the half-diamond stiffness system
//!
//! The stiffness matrix of a triangulated plate is banded and very sparse,
//! so it is assembled as COO triplets and solved with Jacobi-preconditioned
//! conjugate gradients on the CSR form.

use nalgebra::{DMatrix, DVector, SMatrix};
use nalgebra_sparse::{CooMatrix, CsrMatrix};

use crate::error::{DowelError, DowelResult};

/// Sparse matrix builder using COO format
pub struct SparseMatrixBuilder {
    size: usize,
    entries: Vec<(usize, usize, f64)>,
}

impl SparseMatrixBuilder {
    /// Create a new builder for a `size × size` matrix
    pub fn new(size: usize) -> Self {
        // 2 DOFs per node, ~7 neighbouring nodes
        let estimated_nnz = size * 16;
        Self {
            size,
            entries: Vec::with_capacity(estimated_nnz),
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Add a value to the matrix (accumulates if already present)
    #[inline]
    pub fn add(&mut self, row: usize, col: usize, value: f64) {
        if value.abs() > 1e-15 {
            self.entries.push((row, col, value));
        }
    }

    /// Scatter an element matrix. DOFs mapped to `None` are restrained and skipped.
    pub fn add_element_matrix<const N: usize>(
        &mut self,
        dofs: &[Option<usize>; N],
        k_elem: &SMatrix<f64, N, N>,
    ) {
        for (i, di) in dofs.iter().enumerate() {
            let Some(di) = *di else { continue };
            for (j, dj) in dofs.iter().enumerate() {
                let Some(dj) = *dj else { continue };
                self.add(di, dj, k_elem[(i, j)]);
            }
        }
    }

    /// Convert to CSR format; duplicate triplets are summed
    pub fn to_csr(&self) -> CsrMatrix<f64> {
        let mut coo = CooMatrix::new(self.size, self.size);

        for &(row, col, val) in &self.entries {
            coo.push(row, col, val);
        }

        CsrMatrix::from(&coo)
    }

    /// Convert to a dense matrix (for checks on small systems)
    pub fn to_dense(&self) -> DMatrix<f64> {
        let mut mat = DMatrix::zeros(self.size, self.size);

        for &(row, col, val) in &self.entries {
            mat[(row, col)] += val;
        }

        mat
    }

    /// Number of stored triplets (before duplicate summation)
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }
}

/// Converged PCG solution with its statistics
#[derive(Debug, Clone)]
pub struct PcgOutcome {
    pub solution: DVector<f64>,
    pub iterations: usize,
    /// Final residual norm relative to ‖b‖
    pub relative_residual: f64,
}

/// Solve `A x = b` with Jacobi-preconditioned conjugate gradients.
///
/// Converges when `‖r‖ ≤ tol·‖b‖`. Returns [`DowelError::ConvergenceFailed`]
/// when `max_iter` is reached first and [`DowelError::SingularMatrix`] when a
/// non-positive curvature `pᵀAp` shows the matrix is not positive definite.
pub fn solve_pcg(
    csr: &CsrMatrix<f64>,
    b: &DVector<f64>,
    tol: f64,
    max_iter: usize,
) -> DowelResult<PcgOutcome> {
    let n = csr.nrows();

    let b_norm = b.norm();
    if !b_norm.is_finite() {
        return Err(DowelError::NonFinite("load vector".into()));
    }
    if b_norm == 0.0 {
        return Ok(PcgOutcome {
            solution: DVector::zeros(n),
            iterations: 0,
            relative_residual: 0.0,
        });
    }

    // Extract diagonal for Jacobi preconditioner
    let mut diag = DVector::zeros(n);
    for (row, col, &val) in csr.triplet_iter() {
        if row == col {
            diag[row] = val;
        }
    }
    if let Some(i) = diag.iter().position(|d| *d <= 0.0 || !d.is_finite()) {
        log::debug!("PCG: non-positive diagonal at DOF {i}");
        return Err(DowelError::SingularMatrix);
    }

    let mut x = DVector::zeros(n);
    let mut r = b.clone();
    let mut z = r.component_div(&diag);
    let mut p = z.clone();
    let mut r_dot_z = r.dot(&z);

    for iter in 1..=max_iter {
        let ap = sparse_matvec(csr, &p);
        let p_dot_ap = p.dot(&ap);

        if p_dot_ap.is_nan() || p_dot_ap <= 0.0 {
            return Err(DowelError::SingularMatrix);
        }

        let alpha = r_dot_z / p_dot_ap;

        x.axpy(alpha, &p, 1.0);
        r.axpy(-alpha, &ap, 1.0);

        let rel = r.norm() / b_norm;
        if !rel.is_finite() {
            return Err(DowelError::NonFinite("PCG residual".into()));
        }
        if rel <= tol {
            log::debug!("PCG converged in {iter} iterations (residual {rel:e})");
            return Ok(PcgOutcome {
                solution: x,
                iterations: iter,
                relative_residual: rel,
            });
        }

        z = r.component_div(&diag);
        let r_dot_z_new = r.dot(&z);
        let beta = r_dot_z_new / r_dot_z;
        r_dot_z = r_dot_z_new;

        p = &z + beta * &p;
    }

    log::debug!(
        "PCG stopped at {max_iter} iterations (residual {:e})",
        r.norm() / b_norm
    );
    Err(DowelError::ConvergenceFailed(max_iter))
}

/// Sparse matrix-vector multiplication
#[inline]
fn sparse_matvec(csr: &CsrMatrix<f64>, x: &DVector<f64>) -> DVector<f64> {
    let n = csr.nrows();
    let mut y = DVector::zeros(n);

    let row_offsets = csr.row_offsets();
    let col_indices = csr.col_indices();
    let values = csr.values();

    for row in 0..n {
        let mut sum = 0.0;
        for idx in row_offsets[row]..row_offsets[row + 1] {
            sum += values[idx] * x[col_indices[idx]];
        }
        y[row] = sum;
    }

    y
}
