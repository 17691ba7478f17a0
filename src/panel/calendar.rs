//! Deterministic calendar controls computed from the observation date.
use chrono::{Datelike, NaiveDate};
use serde::Serialize;

pub const WEEKEND: &str = "is_weekend";
pub const MONTH_END: &str = "is_month_end";

/// Saturday or Sunday (weekday index ≥ 5 counting Monday as 0).
pub fn is_weekend(date: NaiveDate) -> bool {
    date.weekday().num_days_from_monday() >= 5
}

/// Last calendar day of the month.
pub fn is_month_end(date: NaiveDate) -> bool {
    date.succ_opt().map_or(true, |next| next.month() != date.month())
}

/// 0/1 calendar indicator columns aligned to a date vector.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarControls {
    pub is_weekend: Vec<f64>,
    pub is_month_end: Vec<f64>,
}

impl CalendarControls {
    pub fn from_dates(dates: &[NaiveDate]) -> Self {
        let indicator = |flag: bool| if flag { 1.0 } else { 0.0 };
        Self {
            is_weekend: dates.iter().map(|&d| indicator(is_weekend(d))).collect(),
            is_month_end: dates.iter().map(|&d| indicator(is_month_end(d))).collect(),
        }
    }

    /// Named columns in design order.
    pub fn columns(&self) -> [(&'static str, &[f64]); 2] {
        [(WEEKEND, &self.is_weekend), (MONTH_END, &self.is_month_end)]
    }
}
