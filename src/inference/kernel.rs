//! Kernel weights and bandwidth rules for HAC estimation.
//!
//! This module provides:
//! - [`KernelType`], the HAC taper family, with per-lag weights `w(x)` at
//!   `x = k/(L+1)`.
//! - [`newey_west_bandwidth`], the deterministic rule `⌊4(n/100)^{2/9}⌋`, the
//!   default for every regression unless a lag count or the plug-in is
//!   configured.
//! - [`KernelType::optimal_bandwidth`], an Andrews AR(1) plug-in alternative
//!   that pre-fits AR(1) models column-wise with the `arima` crate and falls
//!   back to `round(n^{1/4})` when the plug-in is unstable.
//!
//! Conventions:
//! - Series matrices are `n×p` with rows indexing time.
use crate::{
    inference::errors::{InferenceError, InferenceResult},
    optimization::numerical_stability::transformations::{GENERAL_TOL, STATIONARITY_MARGIN},
};
use arima::estimate;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Automatic lag truncation `⌊4·(n/100)^{2/9}⌋`.
///
/// Non-decreasing in `n`; `0` for `n = 0`.
pub fn newey_west_bandwidth(n: usize) -> usize {
    (4.0 * (n as f64 / 100.0).powf(2.0 / 9.0)).floor() as usize
}

/// HAC taper family.
///
/// - `IID`: only lag 0 contributes.
/// - `Bartlett`: triangular Newey–West kernel; the crate default.
/// - `Parzen`: smoother compact-support kernel.
/// - `QuadraticSpectral`: infinite-support taper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KernelType {
    IID,
    Bartlett,
    Parzen,
    QuadraticSpectral,
}

impl KernelType {
    /// Kernel weight at `input = k/(L+1)`.
    pub fn weight(&self, input: f64) -> f64 {
        let abs_input = input.abs();
        match self {
            KernelType::IID => {
                if input == 0.0 {
                    1.0
                } else {
                    0.0
                }
            }
            KernelType::Bartlett => {
                if abs_input <= 1.0 {
                    1.0 - abs_input
                } else {
                    0.0
                }
            }
            KernelType::Parzen => {
                if abs_input <= 0.5 {
                    let sq = abs_input * abs_input;
                    1.0 - 6.0 * sq + 6.0 * abs_input * sq
                } else if abs_input <= 1.0 {
                    2.0 * (1.0 - abs_input).powi(3)
                } else {
                    0.0
                }
            }
            KernelType::QuadraticSpectral => {
                if input == 0.0 {
                    1.0
                } else {
                    let pi_x = std::f64::consts::PI * input;
                    let arg = 6.0 * pi_x / 5.0;
                    (25.0 / (12.0 * pi_x.powi(2))) * (arg.sin() / arg - arg.cos())
                }
            }
        }
    }

    /// Andrews (1991) AR(1) plug-in bandwidth.
    ///
    /// - `Bartlett`: `1.1447 · (n·α(1))^{1/3}`
    /// - `Parzen`: `2.6614 · (n·α(2))^{1/5}`
    /// - `QuadraticSpectral`: `1.3221 · (n·α(2))^{1/5}`
    /// - `IID`: `0`
    ///
    /// Falls back to `round(n^{1/4})` when the AR(1) pre-fit fails, is
    /// near a unit root, or the denominator vanishes.
    pub fn optimal_bandwidth(&self, series_mat: &Array2<f64>) -> usize {
        let n = series_mat.nrows() as f64;
        let fallback = n.powf(0.25).round() as usize;
        let (ord, constant, exponent) = match self {
            KernelType::IID => return 0,
            KernelType::Bartlett => (1, 1.1447, 1.0 / 3.0),
            KernelType::Parzen => (2, 2.6614, 0.2),
            KernelType::QuadraticSpectral => (2, 1.3221, 0.2),
        };
        match calc_opt_bandwidth_param(series_mat, ord) {
            Ok(alpha) => (constant * (n * alpha).powf(exponent)).round() as usize,
            Err(_) => fallback,
        }
    }
}

/// Andrews `α(q)` aggregated over the columns of `series_mat`.
///
/// Errors
/// ------
/// - `StationarityViolated` when a column's AR(1) coefficient is within
///   `STATIONARITY_MARGIN` of ±1.
/// - `OrderNotSupported` for `ord ∉ {1, 2}`.
/// - `DenominatorTooSmall` when the summed denominator is below `GENERAL_TOL`.
/// - `Anyhow` when the `arima` pre-fit fails.
fn calc_opt_bandwidth_param(series_mat: &Array2<f64>, ord: usize) -> InferenceResult<f64> {
    let mut numerator = 0.0;
    let mut denominator = 0.0;

    for col in series_mat.columns() {
        let col_vec = col.to_vec();
        let coeff = estimate::fit(&col_vec, 1, 0, 0)?;
        let intercept = coeff[0];
        let phi = coeff[1];
        if phi.abs() >= 1.0 - STATIONARITY_MARGIN {
            return Err(InferenceError::StationarityViolated { phi });
        }
        let phi_squared = phi * phi;
        let residuals = estimate::residuals(&col_vec, intercept, Some(&[phi]), None)?;
        let sigma2 = residuals.iter().map(|&e| e * e).sum::<f64>() / ((residuals.len() - 1) as f64);
        let sigma4 = sigma2 * sigma2;
        denominator += sigma4 / (1.0 - phi_squared).powi(4);
        let scaled = 4.0 * phi_squared * sigma4;
        numerator += match ord {
            1 => scaled / ((1.0 - phi).powi(6) * (1.0 + phi) * (1.0 + phi)),
            2 => scaled / (1.0 - phi).powi(8),
            _ => return Err(InferenceError::OrderNotSupported { ord }),
        };
    }
    if denominator < GENERAL_TOL {
        return Err(InferenceError::DenominatorTooSmall { denominator });
    }
    Ok(numerator / denominator)
}
