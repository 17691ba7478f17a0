//! optimization — maximum-likelihood stack and its error surface.
//!
//! Purpose
//! -------
//! Provide the L-BFGS log-likelihood maximizer, finite-difference
//! derivatives, and the stationarity-preserving ARMA transforms used by the
//! regression-with-ARMA-errors fit, behind one error type.
//!
//! Key behaviors
//! -------------
//! - `loglik_optimizer`: [`LogLikelihood`](loglik_optimizer::LogLikelihood),
//!   `maximize`, `maximize_with_retry`, options and outcomes.
//! - `numerical_stability`: PACF → AR/MA coefficient maps and tolerances.
//! - `errors`: [`OptError`](errors::OptError) / `OptResult<T>`.
//!
//! Conventions
//! -----------
//! - Solvers maximize `ℓ(θ)` by minimizing `−ℓ(θ)`; user-facing values are
//!   always log-likelihoods.
//! - Optional progress output goes through the `obs_slog` feature and
//!   `tracing`; nothing here prints.

pub mod errors;
pub mod loglik_optimizer;
pub mod numerical_stability;

pub mod prelude {
    pub use super::errors::{OptError, OptResult};
    pub use super::loglik_optimizer::prelude::*;
    pub use super::numerical_stability::prelude::*;
}
