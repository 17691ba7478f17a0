//! inference::hessian — observed-information covariance for MLE fits.
//!
//! Purpose
//! -------
//! Turn a gradient callback of the **average** log-likelihood into a
//! parameter covariance matrix. The observed information `J(θ̂)` comes from
//! [`compute_hessian`]; it is inverted through a truncated symmetric
//! eigendecomposition, so weakly identified directions inflate variances
//! instead of blowing up.
//!
//! Key behaviors
//! -------------
//! - [`calc_covariance`] returns `J⁺` (classical) or `J⁺ S J⁺` (sandwich,
//!   when an average-score covariance `S` is supplied).
//! - [`calc_standard_errors`] is the square root of its diagonal.
//! - [`symmetric_pinv`] is the shared eigen-truncated pseudo-inverse.
//!
//! Conventions
//! -----------
//! - Everything lives on the average log-likelihood scale; callers holding
//!   a sample of size `m` divide by `m` to obtain sampling variances.
//! - Eigenvalues at or below [`EIGEN_EPS`] are dropped.
use crate::optimization::{
    errors::OptResult, loglik_optimizer::finite_diff::compute_hessian,
    numerical_stability::transformations::EIGEN_EPS,
};
use nalgebra::DMatrix;
use ndarray::{Array1, Array2};

/// Covariance of `θ̂` from the observed information at `theta_hat`.
///
/// Parameters
/// ----------
/// - `f`: gradient map `θ ↦ ∇ℓ̄(θ)` of the average log-likelihood (either
///   sign; the Hessian is negated when its trace is negative so the result
///   is an information matrix).
/// - `theta_hat`: evaluation point.
/// - `scores`: optional `p×p` average-score covariance for the sandwich.
///
/// Errors
/// ------
/// - Propagates `OptError` from [`compute_hessian`].
pub fn calc_covariance<F: Fn(&Array1<f64>) -> Array1<f64>>(
    f: &F, theta_hat: &Array1<f64>, scores: Option<&Array2<f64>>,
) -> OptResult<Array2<f64>> {
    let hessian = compute_hessian(f, theta_hat)?;
    let trace: f64 = hessian.diag().sum();
    let obs_info = if trace < 0.0 { -hessian } else { hessian };
    let bread = symmetric_pinv(&obs_info);
    Ok(match scores {
        Some(s) => bread.dot(s).dot(&bread),
        None => bread,
    })
}

/// Square roots of the diagonal of [`calc_covariance`].
pub fn calc_standard_errors<F: Fn(&Array1<f64>) -> Array1<f64>>(
    f: &F, theta_hat: &Array1<f64>, scores: Option<&Array2<f64>>,
) -> OptResult<Array1<f64>> {
    let cov = calc_covariance(f, theta_hat, scores)?;
    Ok(cov.diag().mapv(|v| v.max(0.0).sqrt()))
}

/// Moore–Penrose inverse of a symmetric matrix via `Q Λ⁺ Qᵀ`.
///
/// Eigenvalues `λ ≤ EIGEN_EPS` are treated as zero. Intended for
/// information matrices, which are positive semi-definite; negative
/// eigenvalues are discarded alongside the near-zero ones.
pub fn symmetric_pinv(matrix: &Array2<f64>) -> Array2<f64> {
    let p = matrix.nrows();
    let nalg = DMatrix::<f64>::from_fn(p, p, |i, j| 0.5 * (matrix[[i, j]] + matrix[[j, i]]));
    let eigen = nalg.symmetric_eigen();
    let q = eigen.eigenvectors;
    let mut pinv = Array2::<f64>::zeros((p, p));
    for (k, &lambda) in eigen.eigenvalues.iter().enumerate() {
        if lambda <= EIGEN_EPS {
            continue;
        }
        for i in 0..p {
            let coeff = q[(i, k)] / lambda;
            for j in 0..p {
                pinv[[i, j]] += coeff * q[(j, k)];
            }
        }
    }
    pinv
}
