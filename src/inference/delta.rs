//! inference::delta — semi-elasticity mapping for log-linear coefficients.
//!
//! A coefficient `β` on a treatment share in a log-outcome regression maps
//! to the percentage effect of a 10-percentage-point treatment increase:
//!
//! ```text
//! g(β)  = 100 · (exp(0.10·β) − 1)
//! g'(β) = 10 · exp(0.10·β)
//! se_g  = g'(β) · se_β
//! ```
//!
//! At `β = 0` the mapping returns exactly `0` and exactly `10·se_β`.
use serde::{Deserialize, Serialize};

/// Treatment step (as a share) the semi-elasticity refers to.
pub const TREATMENT_STEP: f64 = 0.10;

/// Two-sided 95% standard-normal quantile.
pub const Z_95: f64 = 1.959964;

/// `100·(exp(0.10·β) − 1)`.
pub fn semi_elasticity(beta: f64) -> f64 {
    100.0 * ((TREATMENT_STEP * beta).exp() - 1.0)
}

/// `10·exp(0.10·β)`.
pub fn semi_elasticity_derivative(beta: f64) -> f64 {
    10.0 * (TREATMENT_STEP * beta).exp()
}

/// Percentage effect of a 10pp treatment change with delta-method inference.
///
/// - `percent`, `se`: point value and delta-method standard error.
/// - `ci_low`, `ci_high`: the 95% interval of `β` pushed through `g`, which
///   stays asymmetric around `percent`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SemiElasticity {
    pub percent: f64,
    pub se: f64,
    pub ci_low: f64,
    pub ci_high: f64,
}

impl SemiElasticity {
    pub fn from_linear(beta: f64, se_beta: f64) -> SemiElasticity {
        SemiElasticity {
            percent: semi_elasticity(beta),
            se: semi_elasticity_derivative(beta) * se_beta,
            ci_low: semi_elasticity(beta - Z_95 * se_beta),
            ci_high: semi_elasticity(beta + Z_95 * se_beta),
        }
    }

    /// Maps a precomputed `β` interval (for example bootstrap percentiles).
    pub fn with_interval(beta: f64, se_beta: f64, low: f64, high: f64) -> SemiElasticity {
        SemiElasticity {
            ci_low: semi_elasticity(low),
            ci_high: semi_elasticity(high),
            ..SemiElasticity::from_linear(beta, se_beta)
        }
    }
}
