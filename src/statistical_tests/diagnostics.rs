//! statistical_tests::diagnostics — post-fit residual checks.
//!
//! Every fitted specification carries a [`ResidualDiagnostics`] bundle:
//! Ljung–Box at a fixed lag, White's heteroskedasticity test, and the
//! Durbin–Watson statistic. Each entry is an independent
//! [`Outcome`]; one failing check never hides the others.
use crate::{
    outcome::Outcome,
    statistical_tests::{
        durbin_watson::durbin_watson, heteroskedasticity::WhiteTest, portmanteau::LjungBox,
    },
};
use ndarray::Array2;
use serde::Serialize;

/// Default Ljung–Box lag for residual diagnostics.
pub const LJUNG_BOX_LAGS: usize = 10;

/// Significance level used for every reported verdict.
pub const SIGNIFICANCE: f64 = 0.05;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResidualDiagnostics {
    pub ljung_box: Outcome<LjungBox>,
    pub white: Outcome<WhiteTest>,
    pub durbin_watson: Outcome<f64>,
}

impl ResidualDiagnostics {
    /// Run all three checks on `residuals` from a fit on `x`.
    pub fn compute(residuals: &[f64], x: &Array2<f64>, lb_lags: usize) -> Self {
        let lags = lb_lags.min(residuals.len().saturating_sub(1)).max(1);
        ResidualDiagnostics {
            ljung_box: LjungBox::ljung_box(residuals, lags).into(),
            white: WhiteTest::white(residuals, x).into(),
            durbin_watson: durbin_watson(residuals).into(),
        }
    }

    /// Ljung–Box p-value, if computed.
    pub fn ljung_box_p(&self) -> Option<f64> {
        self.ljung_box.fitted().map(|lb| lb.p_value)
    }

    pub fn durbin_watson_value(&self) -> Option<f64> {
        self.durbin_watson.fitted().copied()
    }

    /// Residual autocorrelation rejected at [`SIGNIFICANCE`].
    pub fn autocorrelation_detected(&self) -> Option<bool> {
        self.ljung_box.fitted().map(|lb| lb.significant_at(SIGNIFICANCE))
    }
}
