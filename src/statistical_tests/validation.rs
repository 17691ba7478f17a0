//! statistical_tests::validation — shared input guards for test statistics.
//!
//! Every test calls [`validate_series`] before doing any arithmetic so
//! failures surface as [`TestError`] values instead of NaN statistics.
use crate::statistical_tests::errors::{TestError, TestResult};

/// Require at least `min_len` observations, all finite.
///
/// Errors
/// ------
/// - `TestError::InsufficientData` when `data.len() < min_len`.
/// - `TestError::NonFiniteInput` for the first NaN/±∞ entry.
pub fn validate_series(data: &[f64], min_len: usize) -> TestResult<()> {
    if data.len() < min_len {
        return Err(TestError::InsufficientData { required: min_len, available: data.len() });
    }
    if let Some((index, &value)) = data.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(TestError::NonFiniteInput { index, value });
    }
    Ok(())
}

/// Require `1 ≤ lag < n`.
pub fn validate_lag(lag: usize, n: usize) -> TestResult<()> {
    if lag == 0 || lag >= n {
        return Err(TestError::InvalidLag { lag, n });
    }
    Ok(())
}
