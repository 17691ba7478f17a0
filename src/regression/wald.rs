//! regression::wald — joint linear restriction tests.
//!
//! `W = (Rb)ᵀ (R V Rᵀ)⁺ (Rb)`, compared with `χ²` on `rows(R)` degrees of
//! freedom. The pseudo-inverse keeps the statistic finite when restricted
//! coefficients are perfectly correlated.
use crate::{
    inference::hessian::symmetric_pinv, outcome::Outcome, regression::fitted::FittedSpec,
    statistical_tests::distributions::chi2_sf,
};
use ndarray::{Array1, Array2};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaldTest {
    pub restrictions: Vec<String>,
    pub statistic: f64,
    pub df: usize,
    pub p_value: f64,
}

impl WaldTest {
    /// Joint test that every named coefficient present in `fit` is zero.
    ///
    /// Names absent from the fit (for example optional columns narrowed away)
    /// are skipped; `NotComputed` when none remain.
    pub fn zero_restrictions(fit: &FittedSpec, names: &[String]) -> Outcome<WaldTest> {
        let present: Vec<(String, usize)> = names
            .iter()
            .filter_map(|name| fit.index_of(name).map(|i| (name.clone(), i)))
            .collect();
        if present.is_empty() {
            return Outcome::not_computed("no restricted coefficient is present in the fit");
        }
        let r = Array2::from_shape_fn((present.len(), fit.k), |(row, col)| {
            if present[row].1 == col { 1.0 } else { 0.0 }
        });
        let statistic = wald_statistic(&fit.coefficients, &fit.covariance, &r);
        if !statistic.is_finite() {
            return Outcome::not_computed("non-finite Wald statistic");
        }
        let df = present.len();
        Outcome::Fitted(WaldTest {
            restrictions: present.into_iter().map(|(name, _)| name).collect(),
            statistic,
            df,
            p_value: chi2_sf(statistic, df as f64),
        })
    }
}

/// `(Rb)ᵀ (R V Rᵀ)⁺ (Rb)`.
pub fn wald_statistic(beta: &Array1<f64>, cov: &Array2<f64>, r: &Array2<f64>) -> f64 {
    let rb = r.dot(beta);
    let middle = symmetric_pinv(&r.dot(cov).dot(&r.t()));
    rb.dot(&middle.dot(&rb))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // With a diagonal covariance the statistic is the sum of squared z's.
    //
    // Given
    // -----
    // - b = (1, 2, −3), V = diag(1, 4, 9), restrict the last two.
    //
    // Expect
    // ------
    // - W = (2/2)² + (−3/3)² = 2.
    fn diagonal_covariance_sums_squared_z_statistics() {
        let beta = array![1.0, 2.0, -3.0];
        let cov = Array2::from_diag(&array![1.0, 4.0, 9.0]);
        let r = array![[0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

        let w = wald_statistic(&beta, &cov, &r);

        assert_relative_eq!(w, 2.0, epsilon = 1e-10);
    }

    #[test]
    fn single_restriction_is_squared_z() {
        let beta = array![0.5, 0.2];
        let cov = array![[0.04, 0.01], [0.01, 0.01]];
        let r = array![[0.0, 1.0]];
        assert_relative_eq!(wald_statistic(&beta, &cov, &r), 4.0, epsilon = 1e-10);
    }
}
