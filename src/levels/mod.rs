//! levels — contemporaneous and dynamic outcome-on-treatment regressions.
//!
//! Purpose
//! -------
//! Estimate the treatment effect in levels under serially correlated,
//! heteroskedastic errors, and its dynamic variants: distributed lags,
//! geometric (Koyck) lag, ARMA errors, Prais–Winsten FGLS, plus a
//! first-difference robustness check.
//!
//! Key behaviors
//! -------------
//! - [`LevelsEstimator`] borrows a [`Panel`](crate::panel::Panel) and a
//!   [`VariableSelection`], and returns a fresh record per call.
//! - Semi-elasticities of the treatment slope and of long-run effects use
//!   the delta method in [`crate::inference::delta`].
//! - [`arma`] holds the regression-with-ARMA-errors likelihood fitted by the
//!   crate's L-BFGS optimizer.
//!
//! Invariants & assumptions
//! ------------------------
//! - Rows with undefined lags are dropped, never imputed.
//! - A Koyck long run with ρ ≥ 1 is `Derived::Undefined`, not a number.
//! - Only the primary regression of an operation can return `Err`.
//!
//! Testing notes
//! -------------
//! - `estimator` tests run each operation on simulated panels with a known
//!   effect; `arma` tests cover the likelihood and its OLS special case.

pub mod arma;
pub mod estimator;
pub mod options;
pub mod results;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::arma::{ArmaErrors, ArmaFit, fit_arma_errors};
pub use self::estimator::{LevelsEstimator, prais_winsten_transform};
pub use self::options::{ArmaGridOptions, LevelsOptions, VariableSelection};
pub use self::results::{
    ArmaGridCell, ArmaGridResult, DifferenceFit, DistributedLagFit, FglsFit, KoyckFit,
    MainSpecFit, TRANSLATION_NOTE,
};

pub mod prelude {
    pub use super::estimator::LevelsEstimator;
    pub use super::options::{ArmaGridOptions, LevelsOptions, VariableSelection};
    pub use super::results::{
        ArmaGridResult, DifferenceFit, DistributedLagFit, FglsFit, KoyckFit, MainSpecFit,
    };
}
