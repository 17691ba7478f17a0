//! Phillips–Perron `Z_τ` test.
//!
//! Regresses `x_t` on `[x_{t−1}, deterministic]` and corrects the `t`
//! statistic of `ρ − 1` for serial correlation with a Bartlett long-run
//! variance of the residuals:
//!
//! ```text
//! Z_τ = √(γ₀/λ²)·(ρ̂ − 1)/σ̂_ρ − ½·(λ² − γ₀)/λ · n·σ̂_ρ/s
//! ```
//!
//! Lag truncation is the Schwert rule `ceil(12(n/100)^{1/4})`; p-values and
//! critical values come from the MacKinnon surfaces shared with ADF.
use crate::statistical_tests::{
    errors::{TestError, TestResult},
    unit_root::{
        Deterministic, UnitRootKind, UnitRootTest,
        adf::t_statistic,
        kpss::long_run_variance,
        mackinnon::{mackinnon_critical_values, mackinnon_p_value},
        schwert_max_lag,
    },
    validation::validate_series,
};
use ndarray::{Array1, Array2};

/// Phillips–Perron test on `series`.
pub fn phillips_perron(series: &[f64], det: Deterministic) -> TestResult<UnitRootTest> {
    let nobs = series.len();
    let ntrend = det.n_terms();
    validate_series(series, ntrend + 4)?;
    let lags = schwert_max_lag(nobs);

    let n = nobs - 1;
    let det_cols = det.design(n);
    let x = Array2::from_shape_fn((n, ntrend + 1), |(r, c)| {
        if c == 0 { series[r] } else { det_cols[[r, c - 1]] }
    });
    let y = Array1::from_iter(series[1..].iter().copied());
    let (fit, _) = t_statistic(&x, &y, 0, "Phillips-Perron regression")?;

    let k = x.ncols();
    let nf = n as f64;
    let u = fit.residuals.to_vec();
    let ssr = fit.ssr();
    let s2 = ssr / (n - k) as f64;
    let s = s2.sqrt();
    let gamma0 = s2 * (n - k) as f64 / nf;
    let lam2 = long_run_variance(&u, lags);
    if lam2 <= 0.0 || !lam2.is_finite() {
        return Err(TestError::DegenerateStatistic { context: "Phillips-Perron long-run variance" });
    }
    let lam = lam2.sqrt();
    let rho = fit.beta[0];
    let sigma = (s2 * fit.xtx_inv[[0, 0]]).sqrt();

    let stat = (gamma0 / lam2).sqrt() * ((rho - 1.0) / sigma)
        - 0.5 * ((lam2 - gamma0) / lam) * (nf * sigma / s);
    Ok(UnitRootTest::new(
        UnitRootKind::PhillipsPerron,
        det,
        stat,
        mackinnon_p_value(stat, det),
        lags.min(n - 1),
        n,
        mackinnon_critical_values(det, n),
    ))
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
    // Verdicts on AR(1) noise and on a random walk, and the reported lag and
    // sample size.
    // -------------------------------------------------------------------------

    fn ar1(n: usize, phi: f64, seed: u64) -> Vec<f64> {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        let mut x = 0.0;
        (0..n)
            .map(|_| {
                let e: f64 = StandardNormal.sample(&mut rng);
                x = phi * x + e;
                x
            })
            .collect()
    }

    #[test]
    // Purpose
    // -------
    // Serially correlated but stationary data reject the unit root; a walk
    // does not.
    //
    // Given
    // -----
    // - AR(1) with φ = 0.5 and a random walk (φ = 1), n = 400.
    //
    // Expect
    // ------
    // - AR(1): p < 0.01. Walk: p > 0.05.
    fn stationary_ar_rejects_and_walk_does_not() {
        // Arrange
        let stationary = ar1(400, 0.5, 8);
        let walk = ar1(400, 1.0, 9);

        // Act
        let on_ar = phillips_perron(&stationary, Deterministic::Constant).expect("computable");
        let on_walk = phillips_perron(&walk, Deterministic::Constant).expect("computable");

        // Assert
        assert!(on_ar.p_value < 0.01, "p = {}", on_ar.p_value);
        assert!(on_ar.stationary);
        assert!(on_walk.p_value > 0.05, "p = {}", on_walk.p_value);
        assert!(!on_walk.stationary);
    }

    #[test]
    fn reports_schwert_lag_and_effective_sample() {
        let x = ar1(200, 0.3, 10);
        let test = phillips_perron(&x, Deterministic::ConstantTrend).expect("computable");
        assert_eq!(test.lags, schwert_max_lag(200));
        assert_eq!(test.nobs, 199);
        assert_eq!(test.kind, UnitRootKind::PhillipsPerron);
    }

    #[test]
    fn too_short_series_is_insufficient() {
        let err = phillips_perron(&[1.0, 2.0, 0.5], Deterministic::Constant).expect_err("short");
        assert!(matches!(err, TestError::InsufficientData { .. }));
    }
}
