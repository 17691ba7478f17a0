//! inference::hac — HAC score covariance and the OLS sandwich.
//!
//! Purpose
//! -------
//! Build heteroskedasticity-and-autocorrelation-consistent covariance
//! matrices for every linear fit in the crate. The score covariance on the
//! average scale is
//!
//! ```text
//! S̄  =  Γ₀  +  ∑_{k=1}^{L} w_k ( Γ_k + Γ_kᵀ ),
//! Γ₀ = (1/n) UᵀU,      Γ_k = c_k · U_{k:}ᵀ U_{:n−k},
//! ```
//!
//! with `U` the `n×p` score matrix, `w_k = kernel(k/(L+1))`, and
//! `c_k = 1/n` (or `1/(n−k)` with the small-sample correction). For OLS the
//! scores are `u_t = x_t e_t` and the parameter covariance is
//!
//! ```text
//! V = (XᵀX)⁻¹ (n·S̄) (XᵀX)⁻¹ · n/(n−k).
//! ```
//!
//! Key behaviors
//! -------------
//! - [`HACOptions`] carries the kernel, the [`Bandwidth`] policy, centering
//!   and the small-sample flag; it is serializable so it can live in the
//!   estimation config.
//! - [`calculate_avg_scores_cov`] returns `S̄` and the bandwidth used.
//! - [`hac_sandwich`] returns `V` for an OLS fit.
//!
//! Invariants & assumptions
//! ------------------------
//! - The effective bandwidth is always truncated to `n − 1`.
//! - With `L = 0` and the IID kernel the sandwich is White's HC1 estimator.
//!
//! Conventions
//! -----------
//! - Rows index time; columns index parameters.
//! - Inference on the resulting covariance uses the standard normal.
//!
//! Testing notes
//! -------------
//! - Unit tests check symmetry, the OPG reduction at `L = 0`, invariance to
//!   centering for mean-zero scores, a hand-computed Bartlett value, and
//!   the sandwich against closed forms for an intercept-only model.
use crate::inference::{
    errors::{InferenceError, InferenceResult},
    kernel::{KernelType, newey_west_bandwidth},
};
use ndarray::{Array1, Array2, Axis, s};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Lag-truncation policy.
///
/// - `Fixed(L)`: use `L` (truncated to `n − 1`).
/// - `NeweyWest`: `⌊4(n/100)^{2/9}⌋`.
/// - `PlugIn`: Andrews AR(1) plug-in for the chosen kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Bandwidth {
    Fixed(usize),
    NeweyWest,
    PlugIn,
}

/// HACOptions — configuration for HAC covariance estimation.
///
/// Fields
/// ------
/// - `kernel`: taper family, Bartlett by default.
/// - `bandwidth`: [`Bandwidth`] policy, Newey–West rule by default.
/// - `center`: demean score columns before bandwidth selection and
///   aggregation.
/// - `small_sample_correction`: scale lag-`k` autocovariances by
///   `1/(n−k)` instead of `1/n`. Off by default so the OLS sandwich matches
///   the textbook Newey–West estimator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HACOptions {
    pub kernel: KernelType,
    pub bandwidth: Bandwidth,
    pub center: bool,
    pub small_sample_correction: bool,
}

impl HACOptions {
    pub fn new(
        bandwidth: Bandwidth, kernel: KernelType, center: bool, small_sample_correction: bool,
    ) -> HACOptions {
        HACOptions { bandwidth, kernel, center, small_sample_correction }
    }

    /// Bartlett kernel with a forced lag count.
    pub fn bartlett(lags: usize) -> HACOptions {
        HACOptions { bandwidth: Bandwidth::Fixed(lags), ..HACOptions::default() }
    }

    /// Options as carried by the engine configs: a forced lag count takes
    /// precedence over `plug_in`; with neither the Newey–West rule applies.
    pub fn from_policy(lags: Option<usize>, kernel: KernelType, plug_in: bool) -> HACOptions {
        let bandwidth = match (lags, plug_in) {
            (Some(lags), _) => Bandwidth::Fixed(lags),
            (None, true) => Bandwidth::PlugIn,
            (None, false) => Bandwidth::NeweyWest,
        };
        HACOptions { bandwidth, kernel, ..HACOptions::default() }
    }

    /// Effective bandwidth for `scores`, truncated to `n − 1`.
    pub fn resolve_bandwidth(&self, scores: &Array2<f64>) -> usize {
        let n = scores.nrows();
        let requested = match self.bandwidth {
            Bandwidth::Fixed(lags) => lags,
            Bandwidth::NeweyWest => newey_west_bandwidth(n),
            Bandwidth::PlugIn => self.kernel.optimal_bandwidth(scores),
        };
        requested.min(n.saturating_sub(1))
    }
}

impl Default for HACOptions {
    /// Bartlett, Newey–West rule, no centering, no small-sample correction.
    fn default() -> Self {
        Self {
            kernel: KernelType::Bartlett,
            bandwidth: Bandwidth::NeweyWest,
            center: false,
            small_sample_correction: false,
        }
    }
}

/// `p×p` HAC covariance of the average score, plus the bandwidth used.
///
/// Errors
/// ------
/// - `InferenceError::InsufficientDegreesOfFreedom` when `raw_scores` has
///   no rows.
pub fn calculate_avg_scores_cov(
    hac_opts: &HACOptions, raw_scores: &Array2<f64>,
) -> InferenceResult<(Array2<f64>, usize)> {
    let n = raw_scores.nrows();
    let p = raw_scores.ncols();
    if n == 0 {
        return Err(InferenceError::InsufficientDegreesOfFreedom { n, k: p });
    }

    let scores: Cow<'_, Array2<f64>> = if hac_opts.center {
        let col_means = raw_scores.sum_axis(Axis(0)) / n as f64;
        Cow::Owned(raw_scores - &col_means)
    } else {
        Cow::Borrowed(raw_scores)
    };

    let bandwidth = hac_opts.resolve_bandwidth(scores.as_ref());
    let mut avg_scores = Array2::<f64>::zeros((p, p));
    for lag in 0..=bandwidth {
        add_hac_component(&mut avg_scores, scores.as_ref(), lag, bandwidth, hac_opts);
    }
    Ok((avg_scores, bandwidth))
}

/// HAC sandwich covariance for OLS coefficients.
///
/// Parameters
/// ----------
/// - `x`: `n×k` design.
/// - `residuals`: length-`n` OLS residuals.
/// - `xtx_inv`: `(XᵀX)⁻¹`.
/// - `hac_opts`: kernel and bandwidth policy.
///
/// Returns
/// -------
/// `(V, L)`: the `k×k` covariance `(XᵀX)⁻¹ (n·S̄) (XᵀX)⁻¹ · n/(n−k)` and the
/// bandwidth actually used.
///
/// Errors
/// ------
/// - `InferenceError::DimensionMismatch` when shapes disagree.
/// - `InferenceError::InsufficientDegreesOfFreedom` when `n ≤ k`.
pub fn hac_sandwich(
    x: &Array2<f64>, residuals: &Array1<f64>, xtx_inv: &Array2<f64>, hac_opts: &HACOptions,
) -> InferenceResult<(Array2<f64>, usize)> {
    let (n, k) = x.dim();
    if residuals.len() != n {
        return Err(InferenceError::DimensionMismatch {
            context: "residual vector",
            expected: n,
            found: residuals.len(),
        });
    }
    if xtx_inv.dim() != (k, k) {
        return Err(InferenceError::DimensionMismatch {
            context: "bread matrix",
            expected: k,
            found: xtx_inv.nrows(),
        });
    }
    if n <= k {
        return Err(InferenceError::InsufficientDegreesOfFreedom { n, k });
    }
    let scores = x * &residuals.view().insert_axis(Axis(1));
    let (avg_cov, bandwidth) = calculate_avg_scores_cov(hac_opts, &scores)?;
    let meat = avg_cov * n as f64;
    let dof = n as f64 / (n - k) as f64;
    let cov = xtx_inv.dot(&meat).dot(xtx_inv) * dof;
    Ok((cov, bandwidth))
}

// ---- Helper methods ----

/// Add lag `lag`'s contribution to the running `p×p` accumulator.
///
/// Lag 0 adds `(1/n) UᵀU`; lag `k > 0` adds `w_k (Γ_k + Γ_kᵀ)`.
fn add_hac_component(
    avg_scores: &mut Array2<f64>, scores: &Array2<f64>, lag: usize, bandwidth: usize,
    hac_opts: &HACOptions,
) {
    let n = scores.nrows();
    if lag == 0 {
        avg_scores.scaled_add(1.0 / n as f64, &scores.t().dot(scores));
        return;
    }
    let weight = hac_opts.kernel.weight(lag as f64 / (bandwidth + 1) as f64);
    let scale = if hac_opts.small_sample_correction {
        1.0 / (n - lag) as f64
    } else {
        1.0 / n as f64
    };
    let lagged = scores.slice(s![lag.., ..]);
    let leading = scores.slice(s![..n - lag, ..]);
    let gamma_k = lagged.t().dot(&leading) * scale;
    avg_scores.scaled_add(weight, &gamma_k);
    avg_scores.scaled_add(weight, &gamma_k.t());
}
