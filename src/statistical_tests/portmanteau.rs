//! statistical_tests::portmanteau — Ljung–Box residual whiteness test.
//!
//! Purpose
//! -------
//! Test the joint null of zero autocorrelation up to lag `h`:
//!
//! ```text
//! Q = n (n + 2) Σ_{k=1}^{h} r_k² / (n − k),     Q ~ χ²_h under H₀,
//! ```
//!
//! with `r_k` the sample autocorrelation of the demeaned series
//! (autocovariances normalised by `n`).
//!
//! Invariants & assumptions
//! ------------------------
//! - `1 ≤ h < n`; the series is finite and not constant.
//! - No degrees-of-freedom adjustment for fitted ARMA terms is applied.
use crate::statistical_tests::{
    distributions::chi2_sf,
    errors::{TestError, TestResult},
    validation::{validate_lag, validate_series},
};
use serde::Serialize;

/// Ljung–Box statistic at a single lag.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LjungBox {
    pub lags: usize,
    pub statistic: f64,
    pub p_value: f64,
}

impl LjungBox {
    /// Ljung–Box `Q(h)` for `data`.
    ///
    /// Errors
    /// ------
    /// - `TestError::InsufficientData` / `NonFiniteInput` from validation.
    /// - `TestError::InvalidLag` unless `1 ≤ lags < n`.
    /// - `TestError::DegenerateStatistic` for a constant series.
    pub fn ljung_box(data: &[f64], lags: usize) -> TestResult<Self> {
        validate_series(data, 2)?;
        let n = data.len();
        validate_lag(lags, n)?;
        let r = autocorrelations(data, lags)?;
        let nf = n as f64;
        let statistic = nf
            * (nf + 2.0)
            * (1..=lags).map(|k| r[k] * r[k] / (nf - k as f64)).sum::<f64>();
        Ok(LjungBox { lags, statistic, p_value: chi2_sf(statistic, lags as f64) })
    }

    /// Rejects whiteness at level `alpha`.
    pub fn significant_at(&self, alpha: f64) -> bool {
        self.p_value < alpha
    }
}

/// Sample autocorrelations `r_0..=r_max_lag` (with `r_0 = 1`).
///
/// Errors
/// ------
/// - `TestError::DegenerateStatistic` when the series has zero variance.
pub fn autocorrelations(data: &[f64], max_lag: usize) -> TestResult<Vec<f64>> {
    let n = data.len();
    let mean = data.iter().sum::<f64>() / n as f64;
    let centered: Vec<f64> = data.iter().map(|x| x - mean).collect();
    let gamma0: f64 = centered.iter().map(|x| x * x).sum();
    if gamma0 <= 0.0 {
        return Err(TestError::DegenerateStatistic { context: "autocorrelation" });
    }
    Ok((0..=max_lag.min(n - 1))
        .map(|k| centered[k..].iter().zip(&centered).map(|(a, b)| a * b).sum::<f64>() / gamma0)
        .collect())
}
