//! Reference-distribution helpers over `statrs`.
//!
//! Invalid parameters (non-positive degrees of freedom) yield NaN rather
//! than an error; callers validate degrees of freedom beforehand.
use statrs::distribution::{ChiSquared, ContinuousCDF, Normal};

/// Upper-tail probability `P(χ²_df > stat)`.
pub fn chi2_sf(stat: f64, df: f64) -> f64 {
    ChiSquared::new(df).map(|dist| 1.0 - dist.cdf(stat)).unwrap_or(f64::NAN)
}

/// Standard normal CDF.
pub fn normal_cdf(x: f64) -> f64 {
    Normal::new(0.0, 1.0).map(|dist| dist.cdf(x)).unwrap_or(f64::NAN)
}

/// Two-sided p-value of a z statistic.
pub fn normal_two_sided_p(z: f64) -> f64 {
    2.0 * (1.0 - normal_cdf(z.abs()))
}
