//! levels::arma — regression with ARMA(p, q) errors by conditional MLE.
//!
//! Model
//! -----
//! ```text
//! y_t = x_tᵀβ + u_t,
//! u_t = Σ_{i=1}^{p} φ_i u_{t−i} + e_t + Σ_{j=1}^{q} θ_j e_{t−j},   e_t ~ N(0, σ²).
//! ```
//!
//! Key behaviors
//! -------------
//! - θ = `[β, raw_ar, raw_ma]`; `φ = pacf_to_ar(raw_ar)` is always
//!   stationary and `θ = pacf_to_ma(raw_ma)` always invertible.
//! - The likelihood conditions on the first `p` observations and sets
//!   pre-sample innovations to zero; σ² is concentrated out, so the average
//!   log-likelihood over the `m = n − p` innovations is
//!   `−½(ln 2π + ln σ̂² + 1)`.
//! - Solved with [`maximize_with_retry`]; ARMA(0, 0) is the OLS closed form
//!   and skips the optimizer.
//! - Standard errors of β from the observed information of the average
//!   log-likelihood, divided by `m`.
//!
//! Failure policy
//! --------------
//! Every failure is an [`Outcome`] variant so a grid sweep can continue:
//! too few rows ⇒ `InsufficientData`; optimizer error or iteration cap twice
//! ⇒ `NonConvergent { attempted: "ARMA(p,q)" }`; a singular information
//! matrix or start regression ⇒ `NotComputed`.
use crate::{
    inference::hessian::calc_covariance,
    optimization::{
        errors::{OptError, OptResult},
        loglik_optimizer::{Cost, LogLikelihood, MLEOptions, Theta, maximize_with_retry},
        numerical_stability::transformations::{pacf_to_ar, pacf_to_ma},
    },
    outcome::Outcome,
    panel::series::DatedSeries,
    regression::{
        design::Design,
        fitted::{CovarianceKind, FittedSpec},
        linalg::least_squares,
    },
    statistical_tests::diagnostics::ResidualDiagnostics,
};
use finitediff::FiniteDiff;
use ndarray::{Array1, Array2, s};
use serde::Serialize;
use tracing::{debug, warn};

/// Regression with ARMA(p, q) errors over `k` regressors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArmaErrors {
    pub p: usize,
    pub q: usize,
    pub k: usize,
}

/// Response and regressors of the mean equation.
#[derive(Debug, Clone, PartialEq)]
pub struct ArmaData {
    pub y: Array1<f64>,
    pub x: Array2<f64>,
}

impl ArmaErrors {
    pub fn n_params(&self) -> usize {
        self.k + self.p + self.q
    }

    /// Smallest sample the likelihood accepts.
    pub fn min_obs(&self) -> usize {
        self.p + self.n_params() + 2
    }

    /// Split θ into `(β, φ, θ_ma)`.
    pub fn unpack(&self, theta: &Theta) -> (Array1<f64>, Vec<f64>, Vec<f64>) {
        let beta = theta.slice(s![..self.k]).to_owned();
        let raw = theta.to_vec();
        let ar = pacf_to_ar(&raw[self.k..self.k + self.p]);
        let ma = pacf_to_ma(&raw[self.k + self.p..]);
        (beta, ar, ma)
    }

    /// Innovations `e_p, …, e_{n−1}`.
    pub fn innovations(&self, theta: &Theta, data: &ArmaData) -> OptResult<Vec<f64>> {
        let (beta, ar, ma) = self.unpack(theta);
        let u = &data.y - &data.x.dot(&beta);
        let n = u.len();
        let mut e = vec![0.0; n];
        for t in self.p..n {
            let mut value = u[t];
            for (i, phi) in ar.iter().enumerate() {
                value -= phi * u[t - i - 1];
            }
            for (j, theta_j) in ma.iter().enumerate() {
                if t >= j + 1 + self.p {
                    value -= theta_j * e[t - j - 1];
                }
            }
            if !value.is_finite() {
                return Err(OptError::NonFiniteInnovation { index: t });
            }
            e[t] = value;
        }
        Ok(e.split_off(self.p))
    }
}

impl LogLikelihood for ArmaErrors {
    type Data = ArmaData;

    fn value(&self, theta: &Theta, data: &Self::Data) -> OptResult<Cost> {
        let e = self.innovations(theta, data)?;
        let m = e.len() as f64;
        let sigma2 = e.iter().map(|v| v * v).sum::<f64>() / m;
        if !(sigma2.is_finite() && sigma2 > 0.0) {
            return Err(OptError::DegenerateInnovationVariance { value: sigma2 });
        }
        Ok(-0.5 * ((2.0 * std::f64::consts::PI).ln() + sigma2.ln() + 1.0))
    }

    fn check(&self, theta: &Theta, data: &Self::Data) -> OptResult<()> {
        if theta.len() != self.n_params() {
            return Err(OptError::ThetaLengthMismatch { expected: self.n_params(), actual: theta.len() });
        }
        if let Some((index, &value)) = theta.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(OptError::InvalidThetaInput { index, value });
        }
        if data.y.len() < self.min_obs() {
            return Err(OptError::ArmaSampleTooShort { required: self.min_obs(), available: data.y.len() });
        }
        Ok(())
    }
}

/// One fitted regression with ARMA errors.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArmaFit {
    pub p: usize,
    pub q: usize,
    /// Mean equation; residuals are the innovations `e_t`.
    pub spec: FittedSpec,
    pub ar: Vec<f64>,
    pub ma: Vec<f64>,
    pub sigma2: f64,
    pub log_likelihood: f64,
    pub aic: f64,
    pub bic: f64,
    pub iterations: usize,
}

impl ArmaFit {
    pub fn durbin_watson(&self) -> Option<f64> {
        self.spec.diagnostics.durbin_watson_value()
    }

    pub fn ljung_box_p(&self) -> Option<f64> {
        self.spec.diagnostics.ljung_box_p()
    }
}

fn label(p: usize, q: usize) -> String {
    format!("ARMA({p},{q})")
}

/// Fit `design` with ARMA(`p`, `q`) errors.
pub fn fit_arma_errors(
    spec: &str, design: &Design, p: usize, q: usize, mle: &MLEOptions, lb_lags: usize,
) -> Outcome<ArmaFit> {
    let model = ArmaErrors { p, q, k: design.k() };
    let n = design.n();
    if n < model.min_obs() {
        return Outcome::InsufficientData { required: model.min_obs(), available: n };
    }
    let data = ArmaData { y: design.y.clone(), x: design.x.clone() };
    let Some(start) = least_squares(&data.x, data.y.view()) else {
        return Outcome::not_computed("singular start regression");
    };
    let mut theta0 = Array1::zeros(model.n_params());
    theta0.slice_mut(s![..model.k]).assign(&start.beta);

    let (theta_hat, iterations) = if p + q == 0 {
        (theta0, 0)
    } else {
        match maximize_with_retry(&model, theta0, &data, mle) {
            Ok(out) if out.converged => (out.theta_hat, out.iterations),
            Ok(out) => {
                warn!(spec, p, q, status = %out.status, "ARMA error fit did not converge");
                return Outcome::NonConvergent { attempted: label(p, q), reason: out.status };
            }
            Err(err) => {
                warn!(spec, p, q, error = %err, "ARMA error fit failed");
                return Outcome::NonConvergent { attempted: label(p, q), reason: err.to_string() };
            }
        }
    };

    match assemble(spec, design, &model, &data, theta_hat, iterations, lb_lags) {
        Ok(fit) => {
            debug!(spec, p, q, aic = fit.aic, "fitted ARMA error model");
            Outcome::Fitted(fit)
        }
        Err(err) => Outcome::not_computed(format!("{}: {err}", label(p, q))),
    }
}

fn assemble(
    spec: &str, design: &Design, model: &ArmaErrors, data: &ArmaData, theta_hat: Theta,
    iterations: usize, lb_lags: usize,
) -> OptResult<ArmaFit> {
    let avg_loglik = model.value(&theta_hat, data)?;
    let innovations = model.innovations(&theta_hat, data)?;
    let m = innovations.len();
    let mf = m as f64;

    let gradient = |theta: &Array1<f64>| -> Array1<f64> {
        let objective = |t: &Array1<f64>| model.value(t, data).unwrap_or(f64::NAN);
        theta.central_diff(&objective)
    };
    let cov_theta = calc_covariance(&gradient, &theta_hat, None)? / mf;
    let k = model.k;
    let covariance = cov_theta.slice(s![..k, ..k]).to_owned();

    let (beta, ar, ma) = model.unpack(&theta_hat);
    let mean_fit = data.x.dot(&beta);
    let u = &data.y - &mean_fit;
    let tss = {
        let mean = data.y.sum() / data.y.len() as f64;
        data.y.iter().map(|v| (v - mean).powi(2)).sum::<f64>()
    };
    let r_squared = if tss > 0.0 { 1.0 - u.dot(&u) / tss } else { f64::NAN };
    let nf = data.y.len() as f64;
    let adj_r_squared = 1.0 - (1.0 - r_squared) * (nf - 1.0) / (nf - k as f64);

    let sigma2 = innovations.iter().map(|e| e * e).sum::<f64>() / mf;
    let log_likelihood = avg_loglik * mf;
    let n_free = (model.n_params() + 1) as f64;
    let diagnostics = ResidualDiagnostics::compute(
        &innovations,
        &data.x.slice(s![model.p.., ..]).to_owned(),
        lb_lags,
    );

    Ok(ArmaFit {
        p: model.p,
        q: model.q,
        spec: FittedSpec {
            name: format!("{spec}_{}", label(model.p, model.q)),
            response: design.response_name.clone(),
            regressors: design.names.clone(),
            coefficients: beta,
            covariance,
            covariance_kind: CovarianceKind::ObservedInformation,
            residuals: DatedSeries::new(design.dates[model.p..].to_vec(), innovations),
            fitted_values: mean_fit.to_vec(),
            n: m,
            k,
            r_squared,
            adj_r_squared,
            dropped_regressors: design.dropped.clone(),
            diagnostics,
        },
        ar,
        ma,
        sigma2,
        log_likelihood,
        aic: -2.0 * log_likelihood + 2.0 * n_free,
        bic: -2.0 * log_likelihood + n_free * mf.ln(),
        iterations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regression::design::DesignBuilder;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;
    use rand::SeedableRng;
    use rand_distr::{Distribution, StandardNormal};
    use rand_xoshiro::Xoshiro256PlusPlus;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - ARMA(0,0) reproducing OLS and the closed-form Gaussian likelihood.
    // - Recovery of β and φ under AR(1) errors.
    // - The innovation recursion on a hand-checked example.
    // - The sample-size guard.
    // -------------------------------------------------------------------------

    fn design_with_ar_errors(n: usize, phi: f64, seed: u64) -> Design {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        let start = NaiveDate::from_ymd_opt(2021, 1, 1).expect("valid test date");
        let dates: Vec<NaiveDate> = (0..n).map(|i| start + chrono::Duration::days(i as i64)).collect();
        let mut u = 0.0;
        let mut x = Vec::with_capacity(n);
        let mut y = Vec::with_capacity(n);
        for _ in 0..n {
            let xi: f64 = StandardNormal.sample(&mut rng);
            let e: f64 = StandardNormal.sample(&mut rng);
            u = phi * u + 0.5 * e;
            x.push(xi);
            y.push(1.0 + 0.5 * xi + u);
        }
        DesignBuilder::new(&dates, "y", y).required("x", x).build("arma_test").expect("valid design")
    }

    #[test]
    // Purpose
    // -------
    // With no ARMA terms the fit is OLS and ℓ has the closed form.
    //
    // Given
    // -----
    // - 200 rows, iid errors.
    //
    // Expect
    // ------
    // - β equals the least-squares solution; ℓ = −n/2(ln 2π + ln(SSR/n) + 1).
    fn zero_order_is_ols() {
        // Arrange
        let design = design_with_ar_errors(200, 0.0, 1);
        let ols = least_squares(&design.x, design.y.view()).expect("full rank");

        // Act
        let fit = fit_arma_errors("t", &design, 0, 0, &MLEOptions::default(), 10)
            .into_fitted()
            .expect("fitted");

        // Assert
        assert_eq!(fit.spec.coefficients, ols.beta);
        let n = 200.0;
        let expected = -n / 2.0 * ((2.0 * std::f64::consts::PI).ln() + (ols.ssr() / n).ln() + 1.0);
        assert_relative_eq!(fit.log_likelihood, expected, epsilon = 1e-8);
        assert_relative_eq!(fit.aic, -2.0 * expected + 6.0, epsilon = 1e-8);
        assert_eq!(fit.spec.covariance_kind, CovarianceKind::ObservedInformation);
    }

    #[test]
    // Purpose
    // -------
    // The likelihood recovers the slope and the AR coefficient.
    //
    // Given
    // -----
    // - y = 1 + 0.5x + u, u AR(1) with φ = 0.6, n = 600.
    //
    // Expect
    // ------
    // - ARMA(1,0): φ̂ within 0.1 of 0.6, β̂_x within 0.1 of 0.5, finite SE.
    fn recovers_ar1_errors() {
        // Arrange
        let design = design_with_ar_errors(600, 0.6, 2);

        // Act
        let fit = fit_arma_errors("t", &design, 1, 0, &MLEOptions::default(), 10)
            .into_fitted()
            .expect("fitted");

        // Assert
        assert!((fit.ar[0] - 0.6).abs() < 0.1, "phi = {}", fit.ar[0]);
        let slope = fit.spec.coefficient("x").expect("present");
        assert!((slope.estimate - 0.5).abs() < 0.1);
        assert!(slope.std_error.is_finite() && slope.std_error > 0.0);
        assert_eq!(fit.spec.n, 599);
    }

    #[test]
    fn innovation_recursion_matches_hand_computation() {
        // u = y (no regressors), φ = 0.5 (raw = atanh(0.5/(1−margin))), θ = 0.
        let model = ArmaErrors { p: 1, q: 0, k: 0 };
        let raw = (0.5_f64 / (1.0 - 1e-6)).atanh();
        let data = ArmaData { y: Array1::from(vec![1.0, 2.0, 0.0]), x: Array2::zeros((3, 0)) };
        let e = model.innovations(&Array1::from(vec![raw]), &data).expect("finite");
        assert_relative_eq!(e[0], 1.5, epsilon = 1e-9);
        assert_relative_eq!(e[1], -1.0, epsilon = 1e-9);
    }

    #[test]
    fn short_samples_are_insufficient_data() {
        let design = design_with_ar_errors(8, 0.0, 3);
        let out = fit_arma_errors("t", &design, 3, 2, &MLEOptions::default(), 10);
        assert!(matches!(out, Outcome::InsufficientData { required: 12, available: 8 }));
    }
}
