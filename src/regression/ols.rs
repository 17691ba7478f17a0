//! regression::ols — least-squares fits with classical or HAC covariance.
//!
//! Purpose
//! -------
//! Fit `y = Xβ + e` on a screened [`Design`] and package the result as a
//! [`FittedSpec`], including residual diagnostics.
//!
//! Key behaviors
//! -------------
//! - [`CovarianceChoice::Classical`]: `σ̂²(XᵀX)⁻¹`, `σ̂² = e'e/(n−k)`.
//! - [`CovarianceChoice::Hac`]: `(XᵀX)⁻¹ (n·S̄) (XᵀX)⁻¹ · n/(n−k)` through
//!   [`hac_sandwich`]; the bandwidth actually used is recorded.
//! - R² is centred when the design holds an intercept and uncentred
//!   otherwise (e.g. Prais–Winsten transformed data).
//!
//! Errors
//! ------
//! - `InsufficientDegreesOfFreedom` when `n ≤ k`.
//! - `SingularMatrix` if `XᵀX` fails to factorise after screening.
use crate::{
    errors::EngineResult,
    inference::{
        errors::InferenceError,
        hac::{HACOptions, hac_sandwich},
    },
    panel::series::DatedSeries,
    regression::{
        design::{Design, INTERCEPT},
        fitted::{CovarianceKind, FittedSpec},
        linalg::least_squares,
    },
    statistical_tests::diagnostics::ResidualDiagnostics,
};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CovarianceChoice {
    Classical,
    Hac(HACOptions),
}

/// OLS fit of `design` recorded under `spec`.
pub fn fit_ols(
    spec: &str, design: &Design, covariance: CovarianceChoice, lb_lags: usize,
) -> EngineResult<FittedSpec> {
    let (n, k) = design.x.dim();
    if n <= k {
        return Err(InferenceError::InsufficientDegreesOfFreedom { n, k }.into());
    }
    let ls = least_squares(&design.x, design.y.view())
        .ok_or(InferenceError::SingularMatrix { context: "X'X" })?;
    let ssr = ls.ssr();

    let (cov, kind) = match covariance {
        CovarianceChoice::Classical => {
            let sigma2 = ssr / (n - k) as f64;
            (&ls.xtx_inv * sigma2, CovarianceKind::Classical)
        }
        CovarianceChoice::Hac(opts) => {
            let (cov, bandwidth) = hac_sandwich(&design.x, &ls.residuals, &ls.xtx_inv, &opts)?;
            (cov, CovarianceKind::Hac { bandwidth })
        }
    };

    let centred = design.names.iter().any(|name| name == INTERCEPT);
    let (r_squared, adj_r_squared) = goodness_of_fit(design, ssr, centred);
    let residuals = ls.residuals.to_vec();
    let fitted_values = (&design.y - &ls.residuals).to_vec();
    let diagnostics = ResidualDiagnostics::compute(&residuals, &design.x, lb_lags);
    debug!(spec, n, k, bandwidth = ?kind, "fitted OLS specification");

    Ok(FittedSpec {
        name: spec.to_string(),
        response: design.response_name.clone(),
        regressors: design.names.clone(),
        coefficients: ls.beta,
        covariance: cov,
        covariance_kind: kind,
        residuals: DatedSeries::new(design.dates.clone(), residuals),
        fitted_values,
        n,
        k,
        r_squared,
        adj_r_squared,
        dropped_regressors: design.dropped.clone(),
        diagnostics,
    })
}

fn goodness_of_fit(design: &Design, ssr: f64, centred: bool) -> (f64, f64) {
    let n = design.n() as f64;
    let k = design.k() as f64;
    let tss = if centred {
        let mean = design.y.sum() / n;
        design.y.iter().map(|v| (v - mean).powi(2)).sum::<f64>()
    } else {
        design.y.dot(&design.y)
    };
    if tss <= 0.0 {
        return (f64::NAN, f64::NAN);
    }
    let r2 = 1.0 - ssr / tss;
    let dof_ratio = if centred { (n - 1.0) / (n - k) } else { n / (n - k) };
    (r2, 1.0 - (1.0 - r2) * dof_ratio)
}
