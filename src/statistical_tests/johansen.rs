//! statistical_tests::johansen — Johansen trace and maximum-eigenvalue tests.
//!
//! Purpose
//! -------
//! Multivariate check for the number of cointegrating relations among up to
//! three series.
//!
//! Key behaviors
//! -------------
//! - Levels are detrended with a polynomial of order `det_order` in a
//!   `[−1, 1]` grid (`−1` means no detrending); the auxiliary regressions
//!   are demeaned whenever `det_order ≥ 0`.
//! - `R₀` are the residuals of `Δx_t` and `R₁` those of `x_{t−1}` on
//!   `k_ar_diff` lagged differences. With `S_ij = R_iᵀR_j / T` the
//!   eigenvalues solve `|λS₁₁ − S₁₀S₀₀⁻¹S₀₁| = 0`; they are obtained from
//!   the symmetric matrix `L⁻¹ S₁₀S₀₀⁻¹S₀₁ L⁻ᵀ` with `S₁₁ = LLᵀ`.
//! - `trace(r) = −T Σ_{i≥r} ln(1 − λ_i)`, `max_eigen(r) = −T ln(1 − λ_r)`.
//!
//! Invariants & assumptions
//! ------------------------
//! - At least [`JOHANSEN_MIN_OBS`] observations per series; shorter input is
//!   `InsufficientData`, never a partial result.
//! - Eigenvalues are sorted in descending order and lie in `[0, 1)`.
use crate::{
    regression::linalg::{from_dmatrix, residualize, to_dmatrix},
    statistical_tests::{
        errors::{TestError, TestResult},
        validation::validate_series,
    },
};
use nalgebra::{DMatrix, SymmetricEigen};
use ndarray::{Array1, Array2, Axis, s};
use serde::Serialize;

/// Minimum sample size for the test.
pub const JOHANSEN_MIN_OBS: usize = 50;

/// Statistics for the null "rank ≤ r".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JohansenRank {
    pub rank: usize,
    pub trace: f64,
    /// 90/95/99% critical values.
    pub trace_critical: [f64; 3],
    pub max_eigen: f64,
    pub max_eigen_critical: [f64; 3],
}

impl JohansenRank {
    pub fn trace_rejects_95(&self) -> bool {
        self.trace > self.trace_critical[1]
    }

    pub fn max_eigen_rejects_95(&self) -> bool {
        self.max_eigen > self.max_eigen_critical[1]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JohansenResult {
    pub det_order: i32,
    pub k_ar_diff: usize,
    /// Effective sample `T`.
    pub nobs: usize,
    pub eigenvalues: Vec<f64>,
    /// Cointegrating vectors in columns, ordered like `eigenvalues`.
    pub eigenvectors: Array2<f64>,
    pub ranks: Vec<JohansenRank>,
}

impl JohansenResult {
    /// Rank chosen by sequential trace testing at 95%.
    pub fn trace_rank_95(&self) -> usize {
        self.ranks.iter().take_while(|r| r.trace_rejects_95()).count()
    }
}

/// Johansen test on equally long `series`.
///
/// Errors
/// ------
/// - `UnsupportedSystem` outside 1..=3 series; `InvalidDetOrder` outside
///   `{−1, 0, 1}`.
/// - `InsufficientData` below [`JOHANSEN_MIN_OBS`] observations.
/// - `LengthMismatch` / `NonFiniteInput` for malformed input.
/// - `SingularRegression` when a moment matrix is not positive definite.
pub fn johansen(series: &[&[f64]], det_order: i32, k_ar_diff: usize) -> TestResult<JohansenResult> {
    let neqs = series.len();
    if !(1..=3).contains(&neqs) {
        return Err(TestError::UnsupportedSystem { series: neqs });
    }
    if !(-1..=1).contains(&det_order) {
        return Err(TestError::InvalidDetOrder { order: det_order });
    }
    let nobs = series[0].len();
    for s in series {
        if s.len() != nobs {
            return Err(TestError::LengthMismatch { expected: nobs, found: s.len() });
        }
        validate_series(s, JOHANSEN_MIN_OBS.max(k_ar_diff + neqs + 3))?;
    }

    let levels = detrend(&Array2::from_shape_fn((nobs, neqs), |(t, j)| series[j][t]), det_order)?;
    let aux_order = if det_order > -1 { 0 } else { det_order };
    let dx = &levels.slice(s![1.., ..]) - &levels.slice(s![..-1, ..]);

    // rows t = k..n−2 of the differences; lagged levels matched to them
    let t_obs = dx.nrows() - k_ar_diff;
    let z = Array2::from_shape_fn((t_obs, neqs * k_ar_diff), |(r, c)| {
        let lag = c / neqs + 1;
        dx[[r + k_ar_diff - lag, c % neqs]]
    });
    let z = detrend(&z, aux_order)?;
    let dx_now = detrend(&dx.slice(s![k_ar_diff.., ..]).to_owned(), aux_order)?;
    let lagged_levels = detrend(&levels.slice(s![1..nobs - k_ar_diff, ..]).to_owned(), aux_order)?;
    let r0 = residual_matrix(&dx_now, &z)?;
    let rk = residual_matrix(&lagged_levels, &z)?;

    let tf = t_obs as f64;
    let skk = to_dmatrix(&(rk.t().dot(&rk) / tf));
    let sk0 = to_dmatrix(&(rk.t().dot(&r0) / tf));
    let s00 = to_dmatrix(&(r0.t().dot(&r0) / tf));
    let singular = TestError::SingularRegression { context: "Johansen moment matrices" };
    let s00_inv = s00.clone().cholesky().ok_or(singular.clone())?.inverse();
    let sig = &sk0 * s00_inv * sk0.transpose();
    let chol = skk.cholesky().ok_or(singular.clone())?;
    let l = chol.l();
    let a = l.solve_lower_triangular(&sig).ok_or(singular.clone())?;
    let m = l.solve_lower_triangular(&a.transpose()).ok_or(singular.clone())?;
    let m = (&m + m.transpose()) * 0.5;
    let eig = SymmetricEigen::new(m);
    let vectors = l.transpose().solve_upper_triangular(&eig.eigenvectors).ok_or(singular)?;

    let mut order: Vec<usize> = (0..neqs).collect();
    order.sort_by(|&i, &j| eig.eigenvalues[j].total_cmp(&eig.eigenvalues[i]));
    let eigenvalues: Vec<f64> = order.iter().map(|&i| eig.eigenvalues[i].clamp(0.0, 1.0 - 1e-12)).collect();
    let eigenvectors = from_dmatrix(&DMatrix::from_fn(neqs, neqs, |r, c| vectors[(r, order[c])]));

    let log_terms: Vec<f64> = eigenvalues.iter().map(|l| (1.0 - l).ln()).collect();
    let ranks = (0..neqs)
        .map(|r| JohansenRank {
            rank: r,
            trace: -tf * log_terms[r..].iter().sum::<f64>(),
            trace_critical: critical_values(Statistic::Trace, neqs - r, det_order),
            max_eigen: -tf * log_terms[r],
            max_eigen_critical: critical_values(Statistic::MaxEigen, neqs - r, det_order),
        })
        .collect();

    Ok(JohansenResult { det_order, k_ar_diff, nobs: t_obs, eigenvalues, eigenvectors, ranks })
}

/// Residuals of each column of `y` on a polynomial of `order` over a
/// `[−1, 1]` grid; `order = −1` returns `y` unchanged.
fn detrend(y: &Array2<f64>, order: i32) -> TestResult<Array2<f64>> {
    if order < 0 || y.ncols() == 0 {
        return Ok(y.clone());
    }
    let n = y.nrows();
    let step = if n > 1 { 2.0 / (n - 1) as f64 } else { 0.0 };
    let basis = Array2::from_shape_fn((n, order as usize + 1), |(t, p)| (-1.0 + step * t as f64).powi(p as i32));
    residual_matrix(y, &basis)
}

/// Column-wise residuals of `y` on `x` (identity when `x` has no columns).
fn residual_matrix(y: &Array2<f64>, x: &Array2<f64>) -> TestResult<Array2<f64>> {
    if x.ncols() == 0 {
        return Ok(y.clone());
    }
    let mut out = Array2::zeros(y.raw_dim());
    for (j, col) in y.axis_iter(Axis(1)).enumerate() {
        let resid: Array1<f64> = residualize(x, col)
            .ok_or(TestError::SingularRegression { context: "Johansen auxiliary regression" })?;
        out.column_mut(j).assign(&resid);
    }
    Ok(out)
}

#[derive(Clone, Copy)]
enum Statistic {
    Trace,
    MaxEigen,
}

/// Osterwald-Lenum critical values for `free` remaining relations.
fn critical_values(stat: Statistic, free: usize, det_order: i32) -> [f64; 3] {
    const MAX_EIGEN: [[[f64; 3]; 3]; 3] = [
        [[2.9762, 4.1296, 6.9406], [9.4748, 11.2246, 15.0923], [15.7175, 17.7961, 22.2519]],
        [[2.7055, 3.8415, 6.6349], [12.2971, 14.2639, 18.52], [18.8928, 21.1314, 25.865]],
        [[2.7055, 3.8415, 6.6349], [15.0006, 17.1481, 21.7465], [21.8731, 24.2522, 29.2631]],
    ];
    const TRACE: [[[f64; 3]; 3]; 3] = [
        [[2.9762, 4.1296, 6.9406], [10.4741, 12.3212, 16.364], [21.7781, 24.2761, 29.5147]],
        [[2.7055, 3.8415, 6.6349], [13.4294, 15.4943, 19.9349], [27.0669, 29.7961, 35.4628]],
        [[2.7055, 3.8415, 6.6349], [16.1619, 18.3985, 23.1485], [32.0645, 35.0116, 41.0815]],
    ];
    let table = match stat {
        Statistic::Trace => &TRACE,
        Statistic::MaxEigen => &MAX_EIGEN,
    };
    table[(det_order + 1) as usize][free - 1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_distr::{Distribution, StandardNormal};
    use rand_xoshiro::Xoshiro256PlusPlus;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Configuration and sample-size guards.
    // - Detection of one relation in a system built with one common trend
    //   shared by two of three series.
    // - Structural properties: sorted eigenvalues in [0, 1), trace ≥ max
    //   eigen, critical value lookup.
    // -------------------------------------------------------------------------

    fn system(n: usize, seed: u64) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        let mut draw = || -> f64 { StandardNormal.sample(&mut rng) };
        let (mut trend_a, mut trend_b) = (0.0, 0.0);
        let (mut y, mut x, mut w) = (Vec::new(), Vec::new(), Vec::new());
        for _ in 0..n {
            trend_a += draw();
            trend_b += draw();
            x.push(trend_a);
            y.push(0.8 * trend_a + 0.5 * draw());
            w.push(trend_b);
        }
        (y, x, w)
    }

    #[test]
    fn guards_fire_before_any_arithmetic() {
        let short = vec![0.0; 20];
        assert!(matches!(
            johansen(&[&short, &short], 0, 1),
            Err(TestError::InsufficientData { required: 50, available: 20 })
        ));
        let long = vec![0.0; 60];
        assert!(matches!(
            johansen(&[&long, &long, &long, &long], 0, 1),
            Err(TestError::UnsupportedSystem { series: 4 })
        ));
        assert!(matches!(johansen(&[&long], 2, 1), Err(TestError::InvalidDetOrder { order: 2 })));
    }

    #[test]
    // Purpose
    // -------
    // One cointegrating relation is found when exactly one exists.
    //
    // Given
    // -----
    // - y = 0.8·x + noise with x and w independent random walks, n = 500,
    //   det_order = 0, k_ar_diff = 1.
    //
    // Expect
    // ------
    // - r ≤ 0 rejected at 95% by the trace test; r ≤ 1 not rejected.
    fn one_relation_in_a_three_series_system() {
        // Arrange
        let (y, x, w) = system(500, 77);

        // Act
        let res = johansen(&[&y, &x, &w], 0, 1).expect("computable");

        // Assert
        assert!(res.ranks[0].trace_rejects_95(), "trace r<=0 = {}", res.ranks[0].trace);
        assert!(!res.ranks[1].trace_rejects_95(), "trace r<=1 = {}", res.ranks[1].trace);
        assert_eq!(res.trace_rank_95(), 1);
        assert_eq!(res.nobs, 498);
    }

    #[test]
    fn eigenvalues_sorted_and_trace_dominates_max_eigen() {
        let (y, x, w) = system(200, 5);
        let res = johansen(&[&y, &x, &w], 1, 2).expect("computable");
        assert!(res.eigenvalues.windows(2).all(|p| p[0] >= p[1]));
        assert!(res.eigenvalues.iter().all(|&l| (0.0..1.0).contains(&l)));
        for r in &res.ranks {
            assert!(r.trace >= r.max_eigen - 1e-9);
        }
        let last = &res.ranks[2];
        assert_eq!(last.trace, last.max_eigen);
        assert_eq!(res.ranks[0].trace_critical, [32.0645, 35.0116, 41.0815]);
        assert_eq!(res.eigenvectors.dim(), (3, 3));
    }
}
