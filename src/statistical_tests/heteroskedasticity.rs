//! statistical_tests::heteroskedasticity — White's general test.
//!
//! Purpose
//! -------
//! Regress squared residuals on an intercept, the regressors, their squares
//! and all pairwise cross-products, and compare `LM = n·R²` with a χ²
//! distribution whose degrees of freedom equal the number of surviving
//! auxiliary columns minus one.
//!
//! Key behaviors
//! -------------
//! - Duplicate auxiliary columns (a dummy's square equals the dummy, the
//!   intercept times itself) and otherwise collinear products are pruned by
//!   Gram–Schmidt before the auxiliary fit, so binary controls never make
//!   the test singular.
use crate::{
    regression::linalg::{independent_columns, least_squares},
    statistical_tests::{
        distributions::chi2_sf,
        errors::{TestError, TestResult},
        validation::validate_series,
    },
};
use ndarray::{Array1, Array2};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WhiteTest {
    pub lm: f64,
    pub df: usize,
    pub p_value: f64,
}

impl WhiteTest {
    /// White test for residuals `residuals` from a fit on design `x`.
    ///
    /// Errors
    /// ------
    /// - `TestError::InsufficientData` when the pruned auxiliary design
    ///   leaves no residual degrees of freedom.
    /// - `TestError::DegenerateStatistic` when `e²` is constant or only the
    ///   intercept survives pruning.
    /// - `TestError::SingularRegression` if the auxiliary fit fails.
    pub fn white(residuals: &[f64], x: &Array2<f64>) -> TestResult<Self> {
        validate_series(residuals, 3)?;
        let n = residuals.len();
        if x.nrows() != n {
            return Err(TestError::InsufficientData { required: n, available: x.nrows() });
        }
        let aux = auxiliary_design(x);
        let keep = independent_columns(&aux);
        let rank = keep.len();
        if rank < 2 {
            return Err(TestError::DegenerateStatistic { context: "White auxiliary design" });
        }
        if n <= rank {
            return Err(TestError::InsufficientData { required: rank + 1, available: n });
        }
        let aux = aux.select(ndarray::Axis(1), &keep);
        let e2 = Array1::from_iter(residuals.iter().map(|e| e * e));
        let mean = e2.sum() / n as f64;
        let sst: f64 = e2.iter().map(|v| (v - mean).powi(2)).sum();
        if sst <= 0.0 {
            return Err(TestError::DegenerateStatistic { context: "squared residuals" });
        }
        let fit = least_squares(&aux, e2.view())
            .ok_or(TestError::SingularRegression { context: "White auxiliary regression" })?;
        let r2 = 1.0 - fit.ssr() / sst;
        let lm = n as f64 * r2;
        let df = rank - 1;
        Ok(WhiteTest { lm, df, p_value: chi2_sf(lm, df as f64) })
    }
}

/// `[1, x_i·x_j for i ≤ j]`.
fn auxiliary_design(x: &Array2<f64>) -> Array2<f64> {
    let (n, k) = x.dim();
    let mut columns: Vec<Array1<f64>> = vec![Array1::ones(n)];
    for i in 0..k {
        for j in i..k {
            columns.push(&x.column(i) * &x.column(j));
        }
    }
    Array2::from_shape_fn((n, columns.len()), |(t, c)| columns[c][t])
}
