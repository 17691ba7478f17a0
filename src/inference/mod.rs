//! inference — covariance estimators and delta-method transforms.
//!
//! Purpose
//! -------
//! Provide post-estimation uncertainty quantification for every fit in the
//! crate: HAC sandwich covariances for least squares, observed-information
//! covariances for likelihood fits, and the semi-elasticity mapping used to
//! report treatment effects in percent.
//!
//! Key behaviors
//! -------------
//! - [`HACOptions`] / [`Bandwidth`] / [`KernelType`] configure HAC
//!   estimation; [`newey_west_bandwidth`] is the automatic lag rule.
//! - [`calculate_avg_scores_cov`] builds the average-score covariance and
//!   [`hac_sandwich`] turns it into an OLS coefficient covariance.
//! - [`calc_covariance`] inverts the observed information of an average
//!   log-likelihood (optionally as a sandwich).
//! - [`SemiElasticity`] maps a linear coefficient to a percentage effect.
//!
//! Conventions
//! -----------
//! - Rows index time, columns index parameters.
//! - No logging and no I/O; failures are [`InferenceError`] values.

pub mod delta;
pub mod errors;
pub mod hac;
pub mod hessian;
pub mod kernel;

// ---- Re-exports (primary surface) -----------------------------------------

pub use self::delta::{SemiElasticity, TREATMENT_STEP, Z_95, semi_elasticity};
pub use self::errors::{InferenceError, InferenceResult};
pub use self::hac::{Bandwidth, HACOptions, calculate_avg_scores_cov, hac_sandwich};
pub use self::hessian::{calc_covariance, calc_standard_errors, symmetric_pinv};
pub use self::kernel::{KernelType, newey_west_bandwidth};

pub mod prelude {
    pub use super::delta::{SemiElasticity, TREATMENT_STEP, Z_95};
    pub use super::errors::{InferenceError, InferenceResult};
    pub use super::hac::{Bandwidth, HACOptions, calculate_avg_scores_cov, hac_sandwich};
    pub use super::hessian::{calc_covariance, calc_standard_errors};
    pub use super::kernel::{KernelType, newey_west_bandwidth};
}
