//! regression::linalg — dense least-squares kernels.
//!
//! Purpose
//! -------
//! Small, allocation-light building blocks shared by every linear fit:
//! collinearity screening by modified Gram–Schmidt, and OLS through a
//! Cholesky factorisation of the normal equations (via `nalgebra`).
//!
//! Conventions
//! -----------
//! - Inputs and outputs are `ndarray`; `nalgebra` is used only internally.
//! - Functions return `None` instead of panicking when a matrix is not
//!   positive definite; callers decide which error that becomes.
use nalgebra::{DMatrix, DVector};
use ndarray::{Array1, Array2, ArrayView1};

/// Relative residual-norm tolerance for declaring a column dependent.
pub const COLLINEARITY_TOL: f64 = 1e-10;

/// Minimum squared Cholesky pivot relative to the matching `XᵀX` diagonal.
const PIVOT_TOL: f64 = 1e-13;

/// Least-squares solution with the pieces callers reuse.
#[derive(Debug, Clone, PartialEq)]
pub struct LeastSquares {
    pub beta: Array1<f64>,
    pub residuals: Array1<f64>,
    pub xtx_inv: Array2<f64>,
}

impl LeastSquares {
    /// `e'e`.
    pub fn ssr(&self) -> f64 {
        self.residuals.dot(&self.residuals)
    }
}

/// Indices of columns not spanned by the columns examined before them.
///
/// Columns are visited in `order`; a column whose Gram–Schmidt residual
/// norm is at most `tol` times its own norm (or whose norm is zero) is
/// declared dependent. Returns `(independent, dependent)` in visiting order.
pub fn screen_columns(x: &Array2<f64>, order: &[usize], tol: f64) -> (Vec<usize>, Vec<usize>) {
    let mut basis: Vec<Array1<f64>> = Vec::with_capacity(order.len());
    let mut independent = Vec::new();
    let mut dependent = Vec::new();
    for &j in order {
        let column = x.column(j);
        let norm = column.dot(&column).sqrt();
        if norm == 0.0 || !norm.is_finite() {
            dependent.push(j);
            continue;
        }
        let mut resid = column.to_owned();
        for q in &basis {
            let proj = q.dot(&resid);
            resid.scaled_add(-proj, q);
        }
        let resid_norm = resid.dot(&resid).sqrt();
        if resid_norm <= tol * norm {
            dependent.push(j);
        } else {
            basis.push(resid / resid_norm);
            independent.push(j);
        }
    }
    (independent, dependent)
}

/// [`screen_columns`] in natural order with [`COLLINEARITY_TOL`].
pub fn independent_columns(x: &Array2<f64>) -> Vec<usize> {
    let order: Vec<usize> = (0..x.ncols()).collect();
    screen_columns(x, &order, COLLINEARITY_TOL).0
}

/// OLS of `y` on `x` via Cholesky of `XᵀX`.
///
/// Returns `None` when `XᵀX` is not numerically positive definite or the
/// shapes disagree.
pub fn least_squares(x: &Array2<f64>, y: ArrayView1<'_, f64>) -> Option<LeastSquares> {
    let (n, k) = x.dim();
    if y.len() != n || n == 0 || k == 0 {
        return None;
    }
    let xtx = x.t().dot(x);
    let xty = x.t().dot(&y);
    let chol = to_dmatrix(&xtx).cholesky()?;
    let l = chol.l();
    for j in 0..k {
        if l[(j, j)] * l[(j, j)] <= PIVOT_TOL * xtx[[j, j]] {
            return None;
        }
    }
    let beta_nalg = chol.solve(&DVector::from_iterator(k, xty.iter().copied()));
    let beta = Array1::from_iter(beta_nalg.iter().copied());
    if beta.iter().any(|b| !b.is_finite()) {
        return None;
    }
    let inv = chol.inverse();
    let xtx_inv = Array2::from_shape_fn((k, k), |(i, j)| inv[(i, j)]);
    let residuals = &y - &x.dot(&beta);
    Some(LeastSquares { beta, residuals, xtx_inv })
}

/// Residuals of `y` regressed on `x`, or `y` itself when `x` has no columns.
pub fn residualize(x: &Array2<f64>, y: ArrayView1<'_, f64>) -> Option<Array1<f64>> {
    if x.ncols() == 0 {
        return Some(y.to_owned());
    }
    least_squares(x, y).map(|ls| ls.residuals)
}

pub(crate) fn to_dmatrix(a: &Array2<f64>) -> DMatrix<f64> {
    DMatrix::from_fn(a.nrows(), a.ncols(), |i, j| a[[i, j]])
}

pub(crate) fn from_dmatrix(a: &DMatrix<f64>) -> Array2<f64> {
    Array2::from_shape_fn((a.nrows(), a.ncols()), |(i, j)| a[(i, j)])
}
