//! regression — designs, least squares and fitted-specification records.
//!
//! Purpose
//! -------
//! Shared linear machinery for the levels engine, the error-correction
//! model and every local-projection horizon.
//!
//! Key behaviors
//! -------------
//! - [`DesignBuilder`] assembles named required/optional columns, drops
//!   undefined rows and narrows away collinear optional controls.
//! - [`fit_ols`] fits by Cholesky-factored normal equations with classical
//!   or HAC covariance and attaches residual diagnostics.
//! - [`FittedSpec`] is the immutable output record; [`WaldTest`] tests
//!   joint zero restrictions on it.
//!
//! Conventions
//! -----------
//! - Inference is normal-reference (z statistics).

pub mod design;
pub mod fitted;
pub mod linalg;
pub mod ols;
pub mod wald;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::design::{Design, DesignBuilder, INTERCEPT};
pub use self::fitted::{Coefficient, CovarianceKind, FittedSpec, LinearEstimate};
pub use self::ols::{CovarianceChoice, fit_ols};
pub use self::wald::WaldTest;

pub mod prelude {
    pub use super::design::{Design, DesignBuilder};
    pub use super::fitted::{Coefficient, CovarianceKind, FittedSpec, LinearEstimate};
    pub use super::ols::{CovarianceChoice, fit_ols};
    pub use super::wald::WaldTest;
}
