//! Public API surface for log-likelihood maximization.
//!
//! - [`LogLikelihood`]: trait a model implements (here, the regression with
//!   ARMA errors).
//! - [`MLEOptions`] and [`Tolerances`]: optimizer configuration, serializable
//!   so it can sit inside the crate-level estimation config.
//! - [`LineSearcher`]: choice of line search used by L-BFGS.
//! - [`OptimOutcome`]: normalized result returned by [`maximize`](super::maximize).
//!
//! Convention: we *maximize* `ℓ(θ)` by minimizing the cost `c(θ) = -ℓ(θ)`.
//! An analytic gradient, when provided, is `∇ℓ(θ)`; the adapter flips signs.
use crate::optimization::{
    errors::{OptError, OptResult},
    loglik_optimizer::{
        Cost, FnEvalMap, Grad, Theta,
        validation::{validate_theta_hat, validate_value, verify_tol_cost, verify_tol_grad},
    },
};
use argmin::core::{TerminationReason, TerminationStatus};
use argmin_math::ArgminL2Norm;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Model-side log-likelihood interface.
///
/// Required:
/// - `value(&Theta, &Data) -> OptResult<Cost>`: evaluate `ℓ(θ)`; domain
///   problems are returned as `OptError`, never panics.
/// - `check(&Theta, &Data) -> OptResult<()>`: one-off validation of the
///   starting point and data before the solver runs.
///
/// Optional:
/// - `grad(&Theta, &Data) -> OptResult<Grad>`: analytic `∇ℓ(θ)`. When absent
///   the adapter falls back to finite differences of the cost.
pub trait LogLikelihood {
    type Data: 'static;

    fn value(&self, theta: &Theta, data: &Self::Data) -> OptResult<Cost>;
    fn check(&self, theta: &Theta, data: &Self::Data) -> OptResult<()>;

    fn grad(&self, _theta: &Theta, _data: &Self::Data) -> OptResult<Grad> {
        Err(OptError::GradientNotImplemented)
    }
}

/// Line search paired with L-BFGS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineSearcher {
    MoreThuente,
    HagerZhang,
}

impl FromStr for LineSearcher {
    type Err = OptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "morethuente" => Ok(LineSearcher::MoreThuente),
            "hagerzhang" => Ok(LineSearcher::HagerZhang),
            _ => Err(OptError::InvalidLineSearch {
                name: s.to_string(),
                reason: "Valid options are case insensitive 'MoreThuente' or 'HagerZhang'.",
            }),
        }
    }
}

/// MLEOptions — solver configuration.
///
/// Fields
/// ------
/// - `tols`: stopping rules (gradient norm, cost change, iteration cap).
/// - `line_searcher`: initial line search; the ARMA fitter retries once with
///   the other searcher when the first run does not converge.
/// - `verbose`: attach a terminal observer (only with the `obs_slog` feature).
/// - `lbfgs_mem`: history length, `None` for the crate default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MLEOptions {
    pub tols: Tolerances,
    pub line_searcher: LineSearcher,
    pub verbose: bool,
    pub lbfgs_mem: Option<usize>,
}

impl MLEOptions {
    /// Errors
    /// ------
    /// - `OptError::InvalidLBFGSMem` when `lbfgs_mem == Some(0)`.
    pub fn new(
        tols: Tolerances, line_searcher: LineSearcher, verbose: bool, lbfgs_mem: Option<usize>,
    ) -> OptResult<Self> {
        if let Some(m) = lbfgs_mem {
            if m == 0 {
                return Err(OptError::InvalidLBFGSMem {
                    mem: m,
                    reason: "L-BFGS memory must be greater than zero.",
                });
            }
        }
        Ok(Self { tols, line_searcher, verbose, lbfgs_mem })
    }

    /// Same options with the other line search.
    pub fn with_alternate_line_search(&self) -> Self {
        let line_searcher = match self.line_searcher {
            LineSearcher::MoreThuente => LineSearcher::HagerZhang,
            LineSearcher::HagerZhang => LineSearcher::MoreThuente,
        };
        Self { line_searcher, ..self.clone() }
    }

    /// Options for the second attempt: the other line search and
    /// [`RETRY_ITER_MULTIPLIER`] times the iteration cap.
    pub fn for_retry(&self) -> Self {
        let mut retry = self.with_alternate_line_search();
        retry.tols.max_iter = self.tols.max_iter.map(|m| m.saturating_mul(RETRY_ITER_MULTIPLIER));
        retry
    }
}

/// Default L-BFGS iteration cap.
pub const DEFAULT_MAX_ITER: usize = 2000;

/// Iteration-cap multiplier applied to the retry solve.
pub const RETRY_ITER_MULTIPLIER: usize = 4;

impl Default for MLEOptions {
    /// `tol_grad = 1e-6`, `tol_cost = 1e-12`, `max_iter = 2000`, More–Thuente.
    fn default() -> Self {
        Self {
            tols: Tolerances {
                tol_grad: Some(1e-6),
                tol_cost: Some(1e-12),
                max_iter: Some(DEFAULT_MAX_ITER),
            },
            line_searcher: LineSearcher::MoreThuente,
            verbose: false,
            lbfgs_mem: None,
        }
    }
}

/// Stopping rules; at least one must be set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tolerances {
    pub tol_grad: Option<f64>,
    pub tol_cost: Option<f64>,
    pub max_iter: Option<usize>,
}

impl Tolerances {
    /// Errors
    /// ------
    /// - `OptError::NoTolerancesProvided` when all three are `None`.
    /// - `OptError::InvalidTolGrad` / `InvalidTolCost` for non-finite or
    ///   non-positive tolerances.
    /// - `OptError::InvalidMaxIter` for `max_iter == Some(0)`.
    pub fn new(
        tol_grad: Option<f64>, tol_cost: Option<f64>, max_iter: Option<usize>,
    ) -> OptResult<Self> {
        if tol_grad.is_none() && tol_cost.is_none() && max_iter.is_none() {
            return Err(OptError::NoTolerancesProvided);
        }
        verify_tol_cost(tol_cost)?;
        verify_tol_grad(tol_grad)?;
        if let Some(max_iter) = max_iter {
            if max_iter == 0 {
                return Err(OptError::InvalidMaxIter {
                    max_iter,
                    reason: "Maximum iterations must be greater than zero.",
                });
            }
        }
        Ok(Self { tol_grad, tol_cost, max_iter })
    }
}

/// Normalized solver result.
///
/// `converged` is `false` both when the solver never terminated and when it
/// stopped only because the iteration cap was hit; callers treat either as
/// non-convergence.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimOutcome {
    pub theta_hat: Theta,
    pub value: f64,
    pub converged: bool,
    pub status: String,
    pub iterations: usize,
    pub fn_evals: FnEvalMap,
    pub grad_norm: Option<f64>,
}

impl OptimOutcome {
    pub fn new(
        theta_hat_opt: Option<Theta>, value: f64, termination: TerminationStatus, iterations: u64,
        fn_evals: FnEvalMap, grad: Option<Grad>,
    ) -> OptResult<Self> {
        let theta_hat = validate_theta_hat(theta_hat_opt)?;
        validate_value(value)?;
        let (converged, status) = match &termination {
            TerminationStatus::NotTerminated => (false, "Not terminated".to_string()),
            TerminationStatus::Terminated(TerminationReason::MaxItersReached) => {
                (false, "Maximum iterations reached".to_string())
            }
            other => (true, format!("{other:?}")),
        };
        let iterations = iterations as usize;
        let grad_norm = grad.map(|g| g.l2_norm());
        Ok(Self { theta_hat, value, converged, status, iterations, fn_evals, grad_norm })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    // Scope
    // -----
    // Option validation, serde round trip of the optimizer config, and the
    // convergence flag mapping in `OptimOutcome::new`.

    #[test]
    // Purpose
    // -------
    // Hitting the iteration cap must not be reported as convergence.
    //
    // Given
    // -----
    // - A finite θ̂ and value with `MaxItersReached` termination.
    //
    // Expect
    // ------
    // - `converged == false`; a `SolverConverged` status gives `true`.
    fn optim_outcome_treats_max_iters_as_not_converged() {
        // Arrange
        let theta = array![0.1, -0.2];

        // Act
        let capped = OptimOutcome::new(
            Some(theta.clone()),
            -1.5,
            TerminationStatus::Terminated(TerminationReason::MaxItersReached),
            500,
            FnEvalMap::new(),
            None,
        )
        .expect("valid outcome");
        let converged = OptimOutcome::new(
            Some(theta),
            -1.5,
            TerminationStatus::Terminated(TerminationReason::SolverConverged),
            12,
            FnEvalMap::new(),
            Some(array![3.0, 4.0]),
        )
        .expect("valid outcome");

        // Assert
        assert!(!capped.converged);
        assert!(converged.converged);
        assert_eq!(converged.grad_norm, Some(5.0));
    }

    #[test]
    fn tolerances_reject_empty_and_non_positive_settings() {
        assert_eq!(Tolerances::new(None, None, None), Err(OptError::NoTolerancesProvided));
        assert!(matches!(
            Tolerances::new(Some(-1.0), None, None),
            Err(OptError::InvalidTolGrad { .. })
        ));
        assert!(matches!(
            Tolerances::new(None, None, Some(0)),
            Err(OptError::InvalidMaxIter { .. })
        ));
    }

    #[test]
    fn alternate_line_search_flips_only_the_searcher() {
        let opts = MLEOptions::default();
        let alt = opts.with_alternate_line_search();
        assert_eq!(alt.line_searcher, LineSearcher::HagerZhang);
        assert_eq!(alt.tols, opts.tols);
        assert_eq!("HAGERZHANG".parse::<LineSearcher>(), Ok(LineSearcher::HagerZhang));
    }

    #[test]
    // Purpose
    // -------
    // The retry solve gets a larger budget so a slow but well-posed fit is
    // not abandoned at the first cap.
    //
    // Given
    // -----
    // - Default options (cap 2000) and a capless variant.
    //
    // Expect
    // ------
    // - Retry cap 8000 under the other line search; no cap stays no cap.
    fn retry_options_switch_searcher_and_raise_the_cap() {
        // Arrange
        let opts = MLEOptions::default();
        let capless = MLEOptions {
            tols: Tolerances { max_iter: None, ..opts.tols },
            ..opts.clone()
        };

        // Act
        let retry = opts.for_retry();

        // Assert
        assert_eq!(opts.tols.max_iter, Some(DEFAULT_MAX_ITER));
        assert_eq!(retry.tols.max_iter, Some(DEFAULT_MAX_ITER * RETRY_ITER_MULTIPLIER));
        assert_eq!(retry.line_searcher, LineSearcher::HagerZhang);
        assert_eq!(retry.tols.tol_grad, opts.tols.tol_grad);
        assert_eq!(capless.for_retry().tols.max_iter, None);
    }

    #[test]
    fn options_round_trip_through_json() {
        let opts = MLEOptions::default();
        let json = serde_json::to_string(&opts).expect("serializable");
        let back: MLEOptions = serde_json::from_str(&json).expect("deserializable");
        assert_eq!(back, opts);
    }
}
