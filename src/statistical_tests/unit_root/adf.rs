//! Augmented Dickey–Fuller test.
//!
//! Regression (with `Δx_t = x_t − x_{t−1}`):
//!
//! ```text
//! Δx_t = [α + δt] + γ x_{t−1} + Σ_{j=1}^{p} φ_j Δx_{t−j} + ε_t,
//! ```
//!
//! statistic `τ = γ̂ / se(γ̂)` (classical OLS standard error).
//!
//! Lag selection
//! -------------
//! - `max_lag = min(ceil(12(n/100)^{1/4}), ⌊n/2⌋ − terms − 1)`.
//! - Every `p ∈ 0..=max_lag` is fitted on the common sample that `max_lag`
//!   allows; the smallest AIC wins, ties going to the shorter lag.
//! - The chosen `p` is refitted on the longest sample it allows.
use crate::{
    regression::linalg::{LeastSquares, least_squares},
    statistical_tests::{
        errors::{TestError, TestResult},
        unit_root::{
            Deterministic, UnitRootKind, UnitRootTest,
            mackinnon::{mackinnon_critical_values, mackinnon_p_value},
            schwert_max_lag,
        },
        validation::validate_series,
    },
};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

/// How many lagged differences to include.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LagSelection {
    /// Minimise AIC over `0..=max_lag`.
    Aic,
    Fixed(usize),
}

/// ADF test on `series`.
///
/// Errors
/// ------
/// - `TestError::InsufficientData` when the series cannot support even a
///   zero-lag regression with the requested deterministic terms.
/// - `TestError::InvalidLag` for a fixed lag above the admissible maximum.
/// - `TestError::SingularRegression` / `DegenerateStatistic` for a
///   degenerate series (e.g. constant).
pub fn adf(series: &[f64], det: Deterministic, lags: LagSelection) -> TestResult<UnitRootTest> {
    let nobs = series.len();
    let ntrend = det.n_terms();
    let min_len = 2 * (ntrend + 2);
    validate_series(series, min_len)?;
    let cap = (nobs / 2).saturating_sub(ntrend + 1);
    let max_lag = schwert_max_lag(nobs).min(cap);
    let diffs: Vec<f64> = series.windows(2).map(|w| w[1] - w[0]).collect();

    let used_lag = match lags {
        LagSelection::Fixed(lag) if lag > cap => {
            return Err(TestError::InvalidLag { lag, n: nobs });
        }
        LagSelection::Fixed(lag) => lag,
        LagSelection::Aic => select_lag_by_aic(series, &diffs, det, max_lag)?,
    };

    let (y, x) = adf_design(series, &diffs, det, used_lag, used_lag);
    let level_col = ntrend;
    let (_, stat) = t_statistic(&x, &y, level_col, "ADF regression")?;
    let n_used = y.len();
    Ok(UnitRootTest::new(
        UnitRootKind::Adf,
        det,
        stat,
        mackinnon_p_value(stat, det),
        used_lag,
        n_used,
        mackinnon_critical_values(det, n_used),
    ))
}

/// AIC-minimising lag on the common sample implied by `max_lag`.
fn select_lag_by_aic(
    series: &[f64], diffs: &[f64], det: Deterministic, max_lag: usize,
) -> TestResult<usize> {
    let mut best: Option<(f64, usize)> = None;
    for lag in 0..=max_lag {
        let (y, x) = adf_design(series, diffs, det, lag, max_lag);
        let Some(fit) = least_squares(&x, y.view()) else {
            continue;
        };
        let aic = gaussian_aic(fit.ssr(), y.len(), x.ncols());
        if best.map_or(true, |(best_aic, _)| aic < best_aic) {
            best = Some((aic, lag));
        }
    }
    best.map(|(_, lag)| lag).ok_or(TestError::SingularRegression { context: "ADF lag selection" })
}

/// Response `Δx_t` and regressors `[det, x_{t−1}, Δx_{t−1..t−lag}]` for
/// `t` starting `start` differences into the sample (`start ≥ lag`).
fn adf_design(
    series: &[f64], diffs: &[f64], det: Deterministic, lag: usize, start: usize,
) -> (Array1<f64>, Array2<f64>) {
    let rows = diffs.len() - start;
    let ntrend = det.n_terms();
    let det_cols = det.design(rows);
    let x = Array2::from_shape_fn((rows, ntrend + 1 + lag), |(r, c)| {
        let t = start + r;
        if c < ntrend {
            det_cols[[r, c]]
        } else if c == ntrend {
            series[t]
        } else {
            diffs[t - (c - ntrend)]
        }
    });
    let y = Array1::from_iter(diffs[start..].iter().copied());
    (y, x)
}

/// `−2ℓ + 2k` with the concentrated Gaussian log-likelihood.
pub(crate) fn gaussian_aic(ssr: f64, n: usize, k: usize) -> f64 {
    let nf = n as f64;
    let llf = -nf / 2.0 * ((2.0 * std::f64::consts::PI).ln() + (ssr / nf).ln() + 1.0);
    -2.0 * llf + 2.0 * k as f64
}

/// OLS fit and the classical t statistic of column `col`.
pub(crate) fn t_statistic(
    x: &Array2<f64>, y: &Array1<f64>, col: usize, context: &'static str,
) -> TestResult<(LeastSquares, f64)> {
    let (n, k) = x.dim();
    if n <= k {
        return Err(TestError::InsufficientData { required: k + 1, available: n });
    }
    let fit = least_squares(x, y.view()).ok_or(TestError::SingularRegression { context })?;
    let sigma2 = fit.ssr() / (n - k) as f64;
    let se = (sigma2 * fit.xtx_inv[[col, col]]).sqrt();
    if se.is_nan() || se <= 0.0 {
        return Err(TestError::DegenerateStatistic { context });
    }
    let stat = fit.beta[col] / se;
    Ok((fit, stat))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_distr::{Distribution, StandardNormal};
    use rand_xoshiro::Xoshiro256PlusPlus;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Rejection for white noise and non-rejection for a random walk.
    // - The repeated-draw property: levels reject less often than
    //   differences.
    // - Fixed-lag validation and degenerate input.
    // -------------------------------------------------------------------------

    fn random_walk(n: usize, seed: u64) -> Vec<f64> {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        let mut level = 0.0;
        (0..n)
            .map(|_| {
                let e: f64 = StandardNormal.sample(&mut rng);
                level += e;
                level
            })
            .collect()
    }

    #[test]
    // Purpose
    // -------
    // White noise is classified stationary.
    //
    // Given
    // -----
    // - 400 iid N(0,1) draws (differences of a random walk).
    //
    // Expect
    // ------
    // - p < 0.01, τ below the 1% critical value, lag within the cap.
    fn white_noise_rejects_unit_root() {
        // Arrange
        let walk = random_walk(401, 1);
        let noise: Vec<f64> = walk.windows(2).map(|w| w[1] - w[0]).collect();

        // Act
        let test = adf(&noise, Deterministic::Constant, LagSelection::Aic).expect("computable");

        // Assert
        assert!(test.p_value < 0.01, "p = {}", test.p_value);
        assert!(test.statistic < test.critical_values.one);
        assert!(test.stationary);
        assert!(test.lags <= schwert_max_lag(400));
    }

    #[test]
    // Purpose
    // -------
    // Across repeated draws, random-walk levels reject the unit root less
    // often than their first differences.
    //
    // Given
    // -----
    // - 40 random walks of length 300, constant + trend.
    //
    // Expect
    // ------
    // - rejections(levels) < rejections(differences), with differences
    //   rejecting in nearly every draw.
    fn levels_reject_less_often_than_differences() {
        let mut level_rejections = 0;
        let mut diff_rejections = 0;
        for seed in 0..40 {
            let walk = random_walk(300, 100 + seed);
            let diffs: Vec<f64> = walk.windows(2).map(|w| w[1] - w[0]).collect();
            let lv = adf(&walk, Deterministic::ConstantTrend, LagSelection::Aic).expect("ok");
            let df = adf(&diffs, Deterministic::ConstantTrend, LagSelection::Aic).expect("ok");
            level_rejections += usize::from(lv.p_value < 0.05);
            diff_rejections += usize::from(df.p_value < 0.05);
        }
        assert!(level_rejections < diff_rejections);
        assert!(diff_rejections >= 36, "differences rejected {diff_rejections}/40");
        assert!(level_rejections <= 8, "levels rejected {level_rejections}/40");
    }

    #[test]
    fn fixed_lag_above_cap_is_invalid() {
        let walk = random_walk(40, 3);
        let err = adf(&walk, Deterministic::Constant, LagSelection::Fixed(30)).expect_err("too long");
        assert!(matches!(err, TestError::InvalidLag { lag: 30, .. }));
    }

    #[test]
    fn fixed_lag_is_reported_back() {
        let walk = random_walk(200, 4);
        let test = adf(&walk, Deterministic::Constant, LagSelection::Fixed(2)).expect("computable");
        assert_eq!(test.lags, 2);
        assert_eq!(test.nobs, 199 - 2);
    }

    #[test]
    fn constant_series_is_not_computable() {
        assert!(adf(&[1.0; 60], Deterministic::Constant, LagSelection::Aic).is_err());
    }
}
