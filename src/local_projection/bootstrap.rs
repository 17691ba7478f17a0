//! local_projection::bootstrap — moving-block bootstrap of one coefficient.
//!
//! Purpose
//! -------
//! Give a horizon coefficient a percentile interval that does not lean on
//! the HAC asymptotics, by resampling contiguous blocks of rows.
//!
//! Key behaviors
//! -------------
//! - Block length `max(5, round(n^{1/3}))` unless configured; block starts
//!   are uniform on `0..=n − block`; blocks are concatenated and truncated to
//!   `n` rows.
//! - Replication `b` draws from its own `Xoshiro256PlusPlus` stream derived
//!   from `(seed, b)`, so the result is identical whether the replications
//!   run sequentially or on the rayon pool (feature `parallel`).
//! - A resample that drops a column to zero variance keeps the target
//!   coefficient by screening the other columns out first.
//! - Fewer than `max(30, ⌊B/2⌋)` successful replications gives
//!   `Outcome::NotComputed`, never an interval from a thin subsample.
//!
//! Conventions
//! -----------
//! - Percentiles 2.5 / 97.5 use linear interpolation between order
//!   statistics.
use crate::{
    local_projection::options::BootstrapOptions,
    outcome::Outcome,
    panel::data::quantile_sorted,
    regression::{
        design::Design,
        linalg::{COLLINEARITY_TOL, least_squares, screen_columns},
    },
};
use ndarray::Axis;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::Serialize;
use tracing::warn;

/// Percentile interval of a bootstrapped coefficient.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BootstrapInterval {
    pub low: f64,
    pub high: f64,
    pub block_len: usize,
    pub replications: usize,
    pub succeeded: usize,
}

/// `max(5, round(n^{1/3}))`.
pub fn default_block_len(n: usize) -> usize {
    ((n as f64).cbrt().round() as usize).max(5)
}

/// Independent stream for replication `b`.
fn replication_rng(seed: u64, b: usize) -> Xoshiro256PlusPlus {
    Xoshiro256PlusPlus::seed_from_u64(seed ^ (b as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15))
}

/// Row indices of one moving-block resample of length `n`.
fn block_indices<R: Rng>(n: usize, block_len: usize, rng: &mut R) -> Vec<usize> {
    let block_len = block_len.min(n);
    let mut indices = Vec::with_capacity(n + block_len);
    while indices.len() < n {
        let start = rng.gen_range(0..=n - block_len);
        indices.extend(start..start + block_len);
    }
    indices.truncate(n);
    indices
}

/// Coefficient on column `target` after refitting on `rows`.
fn refit(design: &Design, target: usize, rows: &[usize]) -> Option<f64> {
    let x = design.x.select(Axis(0), rows);
    let y = design.y.select(Axis(0), rows);
    let order: Vec<usize> =
        std::iter::once(target).chain((0..x.ncols()).filter(|&j| j != target)).collect();
    let (keep, _) = screen_columns(&x, &order, COLLINEARITY_TOL);
    if keep.first() != Some(&target) {
        return None;
    }
    let ls = least_squares(&x.select(Axis(1), &keep), y.view())?;
    Some(ls.beta[0]).filter(|b| b.is_finite())
}

/// Moving-block bootstrap interval for the coefficient named `target`.
pub fn moving_block_bootstrap(
    design: &Design, target: &str, options: &BootstrapOptions,
) -> Outcome<BootstrapInterval> {
    let Some(target_idx) = design.index_of(target) else {
        return Outcome::not_computed(format!("'{target}' is not in the design"));
    };
    let (n, k) = (design.n(), design.k());
    if n <= k {
        return Outcome::InsufficientData { required: k + 1, available: n };
    }
    let block_len = options.block_len.unwrap_or_else(|| default_block_len(n)).min(n);
    let replicate = |b: usize| -> Option<f64> {
        let mut rng = replication_rng(options.seed, b);
        let rows = block_indices(n, block_len, &mut rng);
        refit(design, target_idx, &rows)
    };

    #[cfg(feature = "parallel")]
    let draws: Vec<Option<f64>> = (0..options.replications).into_par_iter().map(replicate).collect();
    #[cfg(not(feature = "parallel"))]
    let draws: Vec<Option<f64>> = (0..options.replications).map(replicate).collect();

    let mut betas: Vec<f64> = draws.into_iter().flatten().collect();
    let succeeded = betas.len();
    if succeeded < options.min_successes() {
        warn!(succeeded, replications = options.replications, "bootstrap replications failed");
        return Outcome::not_computed(format!(
            "{succeeded} of {} bootstrap replications succeeded; {} required",
            options.replications,
            options.min_successes()
        ));
    }
    betas.sort_by(|a, b| a.total_cmp(b));
    Outcome::Fitted(BootstrapInterval {
        low: quantile_sorted(&betas, 0.025),
        high: quantile_sorted(&betas, 0.975),
        block_len,
        replications: options.replications,
        succeeded,
    })
}
