//! Entry points for maximizing a [`LogLikelihood`].
//!
//! [`maximize`] runs one L-BFGS solve with the configured line search.
//! [`maximize_with_retry`] is the bounded-retry wrapper used by the ARMA
//! fitter: when the first solve errors or stops without converging, it
//! re-runs once from the same start with the other line search and a larger
//! iteration cap.
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        OptimOutcome, Theta,
        adapter::ArgMinAdapter,
        builders::{build_optimizer_hager_zhang, build_optimizer_more_thuente},
        run::run_lbfgs,
        traits::{LineSearcher, LogLikelihood, MLEOptions},
    },
};
use tracing::debug;

/// Maximize `ℓ(θ)` starting from `theta0`.
///
/// Errors
/// ------
/// - Anything `f.check` rejects before the solve.
/// - `OptError` from solver construction, the executor, or outcome
///   validation (non-finite θ̂ or ℓ).
pub fn maximize<F: LogLikelihood>(
    f: &F, theta0: Theta, data: &F::Data, opts: &MLEOptions,
) -> OptResult<OptimOutcome> {
    f.check(&theta0, data)?;
    let problem = ArgMinAdapter::new(f, data);
    match opts.line_searcher {
        LineSearcher::MoreThuente => {
            let solver = build_optimizer_more_thuente(opts)?;
            run_lbfgs(theta0, opts, problem, solver)
        }
        LineSearcher::HagerZhang => {
            let solver = build_optimizer_hager_zhang(opts)?;
            run_lbfgs(theta0, opts, problem, solver)
        }
    }
}

/// Maximize with one retry under the alternate line search and
/// [`RETRY_ITER_MULTIPLIER`](super::RETRY_ITER_MULTIPLIER) times the iteration cap.
///
/// Returns the first converged outcome. When neither attempt converges the
/// second attempt's result (outcome or error) is returned so the caller can
/// record the failure.
pub fn maximize_with_retry<F: LogLikelihood>(
    f: &F, theta0: Theta, data: &F::Data, opts: &MLEOptions,
) -> OptResult<OptimOutcome> {
    match maximize(f, theta0.clone(), data, opts) {
        Ok(outcome) if outcome.converged => Ok(outcome),
        first => {
            match &first {
                Ok(outcome) => debug!(status = %outcome.status, "first solve did not converge"),
                Err(err) => debug!(error = %err, "first solve failed"),
            }
            maximize(f, theta0, data, &opts.for_retry())
        }
    }
}
