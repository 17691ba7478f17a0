//! panel::series — row-shift helpers and date-aligned series.
//!
//! Undefined values produced by a shift (start-of-sample lags, end-of-sample
//! leads, missing auxiliary values) are represented as `f64::NAN` inside the
//! column vectors; the design builder drops any row holding a NaN, so these
//! values are never imputed.
use chrono::NaiveDate;
use serde::Serialize;

/// `values[t − k]`, NaN for `t < k`.
pub fn lagged(values: &[f64], k: usize) -> Vec<f64> {
    (0..values.len()).map(|t| if t >= k { values[t - k] } else { f64::NAN }).collect()
}

/// `values[t + k]`, NaN past the end.
pub fn led(values: &[f64], k: usize) -> Vec<f64> {
    let n = values.len();
    (0..n).map(|t| if t + k < n { values[t + k] } else { f64::NAN }).collect()
}

/// First difference `values[t] − values[t − 1]`, NaN at `t = 0`.
pub fn differenced(values: &[f64]) -> Vec<f64> {
    (0..values.len()).map(|t| if t >= 1 { values[t] - values[t - 1] } else { f64::NAN }).collect()
}

/// Keep only the finite entries.
pub fn dense(values: &[f64]) -> Vec<f64> {
    values.iter().copied().filter(|v| v.is_finite()).collect()
}

/// DatedSeries — values keyed by calendar date.
///
/// Used for residual series that outlive the design they came from: an
/// error-correction term is re-aligned to a new frame by looking up the
/// residual at the previous row's date, so any rows dropped in between are
/// respected rather than silently shifted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatedSeries {
    pub dates: Vec<NaiveDate>,
    pub values: Vec<f64>,
}

impl DatedSeries {
    /// `dates` must be strictly increasing and the same length as `values`.
    pub fn new(dates: Vec<NaiveDate>, values: Vec<f64>) -> Self {
        debug_assert_eq!(dates.len(), values.len());
        Self { dates, values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value recorded on `date`, if any.
    pub fn value_at(&self, date: NaiveDate) -> Option<f64> {
        self.dates.binary_search(&date).ok().map(|i| self.values[i])
    }

    /// Align to `frame_dates` with a one-row lag: entry `t` is the value on
    /// `frame_dates[t − 1]`, NaN at `t = 0` or when that date has no value.
    pub fn lagged_along(&self, frame_dates: &[NaiveDate]) -> Vec<f64> {
        (0..frame_dates.len())
            .map(|t| {
                if t == 0 {
                    return f64::NAN;
                }
                self.value_at(frame_dates[t - 1]).unwrap_or(f64::NAN)
            })
            .collect()
    }
}
