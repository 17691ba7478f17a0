//! statistical_tests::unit_root — ADF, KPSS and Phillips–Perron tests.
//!
//! Purpose
//! -------
//! Classify a series as stationary or not at the 5% level with three
//! complementary tests. ADF and Phillips–Perron test the unit-root null;
//! KPSS tests the stationarity null, so its verdict is reversed.
//!
//! Key behaviors
//! -------------
//! - [`adf`]: augmented Dickey–Fuller with AIC lag selection on a common
//!   sample, then a refit at the chosen lag.
//! - [`kpss`]: KPSS with the Hobijn et al. automatic bandwidth and a
//!   Bartlett long-run variance.
//! - [`phillips_perron`]: `Z_τ` with a Bartlett long-run variance.
//! - [`mackinnon`]: response-surface p-values and critical values shared by
//!   ADF, Phillips–Perron and Engle–Granger.
//!
//! Conventions
//! -----------
//! - Every test returns a [`UnitRootTest`] record with the same fields so a
//!   battery can be tabulated uniformly.
//! - The trend regressor is `1, 2, …, n`.
use crate::statistical_tests::diagnostics::SIGNIFICANCE;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub mod adf;
pub mod kpss;
pub mod mackinnon;
pub mod phillips_perron;

/// Deterministic terms included in the test regression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Deterministic {
    None,
    Constant,
    ConstantTrend,
}

impl Deterministic {
    pub fn n_terms(self) -> usize {
        match self {
            Deterministic::None => 0,
            Deterministic::Constant => 1,
            Deterministic::ConstantTrend => 2,
        }
    }

    /// `n × n_terms` matrix of `[1, t]` columns, `t = 1..=n`.
    pub fn design(self, n: usize) -> Array2<f64> {
        Array2::from_shape_fn((n, self.n_terms()), |(t, j)| if j == 0 { 1.0 } else { (t + 1) as f64 })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CriticalValues {
    pub one: f64,
    pub five: f64,
    pub ten: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitRootKind {
    Adf,
    Kpss,
    PhillipsPerron,
}

impl UnitRootKind {
    /// Stationarity verdict at `alpha` given the test's p-value.
    pub fn stationary_at(self, p_value: f64, alpha: f64) -> bool {
        match self {
            UnitRootKind::Adf | UnitRootKind::PhillipsPerron => p_value < alpha,
            UnitRootKind::Kpss => p_value >= alpha,
        }
    }
}

/// Uniform record for one unit-root test.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitRootTest {
    pub kind: UnitRootKind,
    pub deterministic: Deterministic,
    pub statistic: f64,
    pub p_value: f64,
    pub lags: usize,
    pub nobs: usize,
    pub critical_values: CriticalValues,
    /// Verdict at the 5% level.
    pub stationary: bool,
}

impl UnitRootTest {
    pub(crate) fn new(
        kind: UnitRootKind, deterministic: Deterministic, statistic: f64, p_value: f64,
        lags: usize, nobs: usize, critical_values: CriticalValues,
    ) -> Self {
        UnitRootTest {
            kind,
            deterministic,
            statistic,
            p_value,
            lags,
            nobs,
            critical_values,
            stationary: kind.stationary_at(p_value, SIGNIFICANCE),
        }
    }
}

/// `ceil(12·(n/100)^{1/4})`, the Schwert maximum lag.
pub fn schwert_max_lag(n: usize) -> usize {
    (12.0 * (n as f64 / 100.0).powf(0.25)).ceil() as usize
}

pub mod prelude {
    pub use super::adf::adf;
    pub use super::kpss::kpss;
    pub use super::phillips_perron::phillips_perron;
    pub use super::{CriticalValues, Deterministic, UnitRootKind, UnitRootTest};
}
