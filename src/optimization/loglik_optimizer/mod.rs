//! loglik_optimizer — argmin-backed maximization of log-likelihoods.
//!
//! Purpose
//! -------
//! Fit models estimated by maximum likelihood, currently the regression
//! with ARMA(p, q) errors of the levels engine. A model implements
//! [`LogLikelihood`]; [`maximize`] runs L-BFGS and returns an
//! [`OptimOutcome`]; [`maximize_with_retry`] adds the single retry under the
//! alternate line search that the ARMA grid relies on.
//!
//! Key behaviors
//! -------------
//! - [`adapter::ArgMinAdapter`] turns `ℓ(θ)` into the argmin cost `−ℓ(θ)`
//!   and supplies finite-difference gradients when none is implemented.
//! - [`builders`] wire tolerances into More–Thuente or Hager–Zhang L-BFGS.
//! - [`run::run_lbfgs`] applies the iteration cap and normalizes the final
//!   state; reaching the cap is reported as non-convergence.
//! - [`finite_diff::compute_hessian`] feeds observed-information standard
//!   errors in `inference::hessian`.
//!
//! Invariants & assumptions
//! ------------------------
//! - Domain violations inside `ℓ(θ)` are returned as `OptError`, never
//!   panics; the adapter forwards them through argmin unchanged.
//! - `Theta`, `Grad` and `Hessian` are `ndarray` containers over `f64`.
//!
//! Testing notes
//! -------------
//! - Each submodule tests its own concern; `api` runs full solves on
//!   concave quadratics, and the levels engine exercises the stack on
//!   simulated ARMA errors.

pub mod adapter;
pub mod api;
pub mod builders;
pub mod finite_diff;
pub mod run;
pub mod traits;
pub mod types;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::api::{maximize, maximize_with_retry};
pub use self::traits::{
    DEFAULT_MAX_ITER, LineSearcher, LogLikelihood, MLEOptions, OptimOutcome, RETRY_ITER_MULTIPLIER,
    Tolerances,
};
pub use self::types::{Cost, DEFAULT_LBFGS_MEM, FnEvalMap, Grad, Theta};

pub mod prelude {
    pub use super::api::{maximize, maximize_with_retry};
    pub use super::traits::{LineSearcher, LogLikelihood, MLEOptions, OptimOutcome, Tolerances};
    pub use super::types::{Cost, Grad, Theta};
}
