//! panel::regimes — the regime schedule value object.
//!
//! Purpose
//! -------
//! Hold the ordered set of structural-break dates that partition a daily
//! panel into consecutive, non-overlapping regimes. Every component that
//! needs regime indicators receives the schedule through the panel it was
//! constructed with, so alternative break dates can be tested by building a
//! different schedule rather than editing constants.
//!
//! Conventions
//! -----------
//! - Regime `i` is active on `[start_i, start_{i+1})`; the last regime is
//!   open-ended.
//! - Observations dated before the first boundary belong to no regime.
//! - The first regime is the baseline: indicator columns are produced for
//!   every later regime only, named `regime_<name>`.
use crate::panel::errors::{PanelError, PanelResult};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

const DEFAULT_BOUNDARIES: [(&str, i32, u32, u32); 3] =
    [("london", 2021, 8, 5), ("merge", 2022, 9, 15), ("dencun", 2024, 3, 13)];

/// A named regime start date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegimeBoundary {
    pub name: String,
    pub start: NaiveDate,
}

impl RegimeBoundary {
    pub fn new(name: impl Into<String>, start: NaiveDate) -> Self {
        Self { name: name.into(), start }
    }
}

/// RegimeSchedule — immutable, ordered list of regime boundaries.
///
/// Invariants
/// ----------
/// - At least one boundary.
/// - Start dates strictly increasing.
/// - Names unique.
///
/// The `Default` schedule carries the London (2021-08-05), Merge
/// (2022-09-15) and Dencun (2024-03-13) upgrade dates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegimeSchedule {
    boundaries: Vec<RegimeBoundary>,
}

impl RegimeSchedule {
    /// Build a validated schedule.
    ///
    /// Errors
    /// ------
    /// - `PanelError::InvalidSchedule` when `boundaries` is empty, dates are
    ///   not strictly increasing, or a name repeats.
    pub fn new(boundaries: Vec<RegimeBoundary>) -> PanelResult<Self> {
        if boundaries.is_empty() {
            return Err(PanelError::InvalidSchedule { reason: "at least one boundary is required" });
        }
        for (i, window) in boundaries.windows(2).enumerate() {
            if window[1].start <= window[0].start {
                return Err(PanelError::InvalidSchedule {
                    reason: "boundary dates must be strictly increasing",
                });
            }
            if boundaries[..=i].iter().any(|b| b.name == window[1].name) {
                return Err(PanelError::InvalidSchedule { reason: "boundary names must be unique" });
            }
        }
        Ok(Self { boundaries })
    }

    pub fn boundaries(&self) -> &[RegimeBoundary] {
        &self.boundaries
    }

    /// Start dates of every regime, in calendar order.
    pub fn change_dates(&self) -> Vec<NaiveDate> {
        self.boundaries.iter().map(|b| b.start).collect()
    }

    /// Index of the regime active on `date`, or `None` before the first boundary.
    pub fn regime_index(&self, date: NaiveDate) -> Option<usize> {
        self.boundaries.iter().rposition(|b| b.start <= date)
    }

    /// Name of the regime active on `date`.
    pub fn regime_name(&self, date: NaiveDate) -> Option<&str> {
        self.regime_index(date).map(|i| self.boundaries[i].name.as_str())
    }

    /// Names of the indicator columns (one per non-baseline regime).
    pub fn flag_names(&self) -> Vec<String> {
        self.boundaries.iter().skip(1).map(|b| format!("regime_{}", b.name)).collect()
    }

    /// 0/1 indicator columns for every non-baseline regime over `dates`.
    ///
    /// At most one indicator is 1 on any date, and each indicator switches
    /// on at its boundary and off at the next one.
    pub fn flags(&self, dates: &[NaiveDate]) -> Vec<(String, Vec<f64>)> {
        let active: Vec<Option<usize>> = dates.iter().map(|&d| self.regime_index(d)).collect();
        self.flag_names()
            .into_iter()
            .enumerate()
            .map(|(offset, name)| {
                let regime = offset + 1;
                let column =
                    active.iter().map(|&a| if a == Some(regime) { 1.0 } else { 0.0 }).collect();
                (name, column)
            })
            .collect()
    }
}

impl Default for RegimeSchedule {
    fn default() -> Self {
        let boundaries = DEFAULT_BOUNDARIES
            .iter()
            .filter_map(|&(name, y, m, d)| {
                NaiveDate::from_ymd_opt(y, m, d).map(|start| RegimeBoundary::new(name, start))
            })
            .collect();
        Self { boundaries }
    }
}
