//! Durbin–Watson statistic `Σ(e_t − e_{t−1})² / Σe_t²`.
//!
//! Values near 2 indicate no first-order autocorrelation; values toward 0
//! indicate positive autocorrelation.
use crate::statistical_tests::{
    errors::{TestError, TestResult},
    validation::validate_series,
};

pub fn durbin_watson(residuals: &[f64]) -> TestResult<f64> {
    validate_series(residuals, 2)?;
    let ssr: f64 = residuals.iter().map(|e| e * e).sum();
    if ssr <= 0.0 {
        return Err(TestError::DegenerateStatistic { context: "Durbin-Watson denominator" });
    }
    let diff_sq: f64 = residuals.windows(2).map(|w| (w[1] - w[0]).powi(2)).sum();
    Ok(diff_sq / ssr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn alternating_residuals_push_statistic_toward_four() {
        // Σ(Δe)² = 3·4 = 12, Σe² = 4.
        let dw = durbin_watson(&[1.0, -1.0, 1.0, -1.0]).expect("valid");
        assert_relative_eq!(dw, 3.0, epsilon = 1e-12);
    }

    #[test]
    fn persistent_residuals_push_statistic_toward_zero() {
        let dw = durbin_watson(&[1.0, 1.0, 1.0, 1.0, -1.0]).expect("valid");
        assert_relative_eq!(dw, 4.0 / 5.0, epsilon = 1e-12);
    }

    #[test]
    fn zero_residuals_are_degenerate() {
        assert!(durbin_watson(&[0.0, 0.0, 0.0]).is_err());
    }
}
