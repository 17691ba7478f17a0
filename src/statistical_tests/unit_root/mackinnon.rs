//! MacKinnon response-surface p-values and critical values for
//! Dickey–Fuller-type statistics (single series).
//!
//! - p-values: MacKinnon (1994) polynomial in the statistic, mapped through
//!   the standard normal CDF, with separate small- and large-p branches.
//! - critical values: MacKinnon (2010) `c₀ + c₁/T + c₂/T² + c₃/T³`.
use crate::statistical_tests::{
    distributions::normal_cdf,
    unit_root::{CriticalValues, Deterministic},
};

struct PValueSurface {
    small_p: [f64; 3],
    large_p: [f64; 4],
    tau_star: f64,
    tau_min: f64,
    tau_max: f64,
}

fn surface(det: Deterministic) -> PValueSurface {
    match det {
        Deterministic::None => PValueSurface {
            small_p: [0.6344, 1.2378, 0.032496],
            large_p: [0.4797, 0.93557, -0.06999, 0.033066],
            tau_star: -1.04,
            tau_min: -19.04,
            tau_max: f64::INFINITY,
        },
        Deterministic::Constant => PValueSurface {
            small_p: [2.1659, 1.4412, 0.038269],
            large_p: [1.7339, 0.93202, -0.12745, -0.010368],
            tau_star: -1.61,
            tau_min: -18.83,
            tau_max: 2.74,
        },
        Deterministic::ConstantTrend => PValueSurface {
            small_p: [3.2512, 1.6047, 0.049588],
            large_p: [2.5261, 0.61654, -0.37956, -0.060285],
            tau_star: -2.89,
            tau_min: -16.18,
            tau_max: 0.7,
        },
    }
}

/// Approximate asymptotic p-value of a Dickey–Fuller `τ` statistic.
pub fn mackinnon_p_value(stat: f64, det: Deterministic) -> f64 {
    let s = surface(det);
    if stat > s.tau_max {
        return 1.0;
    }
    if stat < s.tau_min {
        return 0.0;
    }
    let coeffs: &[f64] = if stat <= s.tau_star { &s.small_p } else { &s.large_p };
    normal_cdf(polyval(coeffs, stat))
}

/// 1/5/10% critical values for a sample of `nobs` observations.
pub fn mackinnon_critical_values(det: Deterministic, nobs: usize) -> CriticalValues {
    let table: [[f64; 4]; 3] = match det {
        Deterministic::None => [
            [-2.56574, -2.2358, -3.627, 0.0],
            [-1.941, -0.2686, -3.365, 31.223],
            [-1.61682, 0.2656, -2.714, 25.364],
        ],
        Deterministic::Constant => [
            [-3.43035, -6.5393, -16.786, -79.433],
            [-2.86154, -2.8903, -4.234, -40.04],
            [-2.56677, -1.5384, -2.809, 0.0],
        ],
        Deterministic::ConstantTrend => [
            [-3.95877, -9.0531, -28.428, -134.155],
            [-3.41049, -4.3904, -9.036, -45.374],
            [-3.12705, -2.5856, -3.925, -22.38],
        ],
    };
    let inv_t = 1.0 / nobs as f64;
    let eval = |c: &[f64; 4]| c[0] + c[1] * inv_t + c[2] * inv_t.powi(2) + c[3] * inv_t.powi(3);
    CriticalValues { one: eval(&table[0]), five: eval(&table[1]), ten: eval(&table[2]) }
}

/// `c₀ + c₁x + c₂x² + …`.
fn polyval(coeffs: &[f64], x: f64) -> f64 {
    coeffs.iter().rev().fold(0.0, |acc, c| acc * x + c)
}
