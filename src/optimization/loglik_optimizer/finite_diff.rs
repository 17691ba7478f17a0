//! loglik_optimizer::finite_diff — finite-difference gradients and Hessians.
//!
//! Purpose
//! -------
//! Wrap the `finitediff` crate with validation so the optimizer and the
//! observed-information standard errors never see a NaN derivative.
//!
//! Key behaviors
//! -------------
//! - [`run_fd_diff`]: forward-difference gradient; an error captured by the
//!   objective closure takes precedence over the numeric result.
//! - [`compute_hessian`]: central-difference Jacobian of a gradient map,
//!   falling back to forward differences when the central one is not
//!   finite, then symmetrized.
//!
//! Conventions
//! -----------
//! - Derivatives are taken in the unconstrained θ space the optimizer uses
//!   (for ARMA errors: regression coefficients plus raw partial
//!   autocorrelations).
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        Grad, Theta,
        types::Hessian,
        validation::{validate_grad, validate_hessian},
    },
};
use argmin::core::Error;
use finitediff::FiniteDiff;
use std::cell::RefCell;

/// Forward-difference gradient of `func` at `theta`.
///
/// Errors
/// ------
/// - The first error the closure stored in `closure_err`.
/// - `OptError::InvalidGradient` for non-finite entries.
pub fn run_fd_diff<G: Fn(&Theta) -> f64>(
    theta: &Theta, func: &G, closure_err: &RefCell<Option<Error>>,
) -> OptResult<Grad> {
    closure_err.replace(None);
    let fd_grad = theta.forward_diff(func);
    if let Some(err) = closure_err.take() {
        return Err(err.into());
    }
    validate_grad(&fd_grad, theta.len())?;
    Ok(fd_grad)
}

/// Hessian as the finite-difference Jacobian of the gradient map `f`.
///
/// Errors
/// ------
/// - `OptError::HessianDimMismatch` / `OptError::InvalidHessian` when
///   neither the central nor the forward approximation is valid.
pub fn compute_hessian<F: Fn(&Theta) -> Grad>(f: &F, theta: &Theta) -> OptResult<Hessian> {
    let dim = theta.len();
    let mut hess = theta.central_hessian(f);
    if validate_hessian(&hess, dim).is_err() {
        hess = theta.forward_hessian(f);
        validate_hessian(&hess, dim)?;
    }
    symmetrize_hess(&mut hess);
    Ok(hess)
}

fn symmetrize_hess(hess: &mut Hessian) {
    for i in 0..hess.nrows() {
        for j in 0..i {
            let avg = 0.5 * (hess[[i, j]] + hess[[j, i]]);
            hess[[i, j]] = avg;
            hess[[j, i]] = avg;
        }
    }
}
