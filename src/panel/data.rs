//! panel::data — the validated daily panel shared by every estimator.
//!
//! Purpose
//! -------
//! Own one in-memory daily time series: dates, the (log) outcome, the
//! unit-interval treatment share, an optional demand factor, any number of
//! named auxiliary series, and the [`RegimeSchedule`] that partitions the
//! sample. Estimators borrow a panel immutably; reshaping operations
//! (`since`, `excluding_windows`, `winsorized`) return a new panel.
//!
//! Invariants
//! ----------
//! - Dates strictly increasing (no duplicates).
//! - `outcome`, `treatment`, `demand_factor` finite; `treatment ∈ [0, 1]`.
//! - Every column has exactly one value per date.
//! - Auxiliary series may carry NaN to mark a missing observation; rows
//!   missing a series are dropped by whichever design uses that series.
//!
//! Conventions
//! -----------
//! - An absent demand factor is tolerated: designs narrow to the remaining
//!   controls instead of failing.
use crate::panel::{
    calendar::CalendarControls,
    errors::{PanelError, PanelResult},
    regimes::RegimeSchedule,
};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Column selector for the series held by a [`Panel`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SeriesKey {
    Outcome,
    Treatment,
    DemandFactor,
    Named(String),
}

impl SeriesKey {
    pub fn named(name: impl Into<String>) -> Self {
        SeriesKey::Named(name.into())
    }

    /// Column label used in design matrices.
    pub fn label(&self) -> &str {
        match self {
            SeriesKey::Outcome => "outcome",
            SeriesKey::Treatment => "treatment",
            SeriesKey::DemandFactor => "demand_factor",
            SeriesKey::Named(name) => name,
        }
    }
}

impl std::fmt::Display for SeriesKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Panel — validated, regime-annotated daily observations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Panel {
    dates: Vec<NaiveDate>,
    outcome: Vec<f64>,
    treatment: Vec<f64>,
    demand_factor: Option<Vec<f64>>,
    auxiliary: BTreeMap<String, Vec<f64>>,
    schedule: RegimeSchedule,
}

impl Panel {
    /// Build and validate a panel.
    ///
    /// Errors
    /// ------
    /// - `PanelError::EmptyPanel` when `dates` is empty.
    /// - `PanelError::LengthMismatch` when a column length differs from `dates`.
    /// - `PanelError::NonIncreasingDates` on a duplicate or out-of-order date.
    /// - `PanelError::NonFiniteValue` for NaN/±∞ in a required column.
    /// - `PanelError::TreatmentOutOfRange` for treatment outside `[0, 1]`.
    pub fn new(
        dates: Vec<NaiveDate>, outcome: Vec<f64>, treatment: Vec<f64>,
        demand_factor: Option<Vec<f64>>, schedule: RegimeSchedule,
    ) -> PanelResult<Self> {
        let n = dates.len();
        if n == 0 {
            return Err(PanelError::EmptyPanel);
        }
        for (i, pair) in dates.windows(2).enumerate() {
            if pair[1] <= pair[0] {
                return Err(PanelError::NonIncreasingDates {
                    index: i + 1,
                    previous: pair[0],
                    current: pair[1],
                });
            }
        }
        check_column("outcome", &outcome, n)?;
        check_column("treatment", &treatment, n)?;
        if let Some(d) = &demand_factor {
            check_column("demand_factor", d, n)?;
        }
        if let Some((index, &value)) =
            treatment.iter().enumerate().find(|(_, v)| !(0.0..=1.0).contains(*v))
        {
            return Err(PanelError::TreatmentOutOfRange { index, value });
        }
        Ok(Self { dates, outcome, treatment, demand_factor, auxiliary: BTreeMap::new(), schedule })
    }

    /// Attach a named auxiliary series (NaN marks a missing observation).
    ///
    /// Errors
    /// ------
    /// - `PanelError::LengthMismatch` when `values.len() != self.len()`.
    /// - `PanelError::DuplicateSeries` when `name` is already attached.
    pub fn with_series(mut self, name: impl Into<String>, values: Vec<f64>) -> PanelResult<Self> {
        let name = name.into();
        if values.len() != self.len() {
            return Err(PanelError::LengthMismatch {
                series: name,
                expected: self.len(),
                found: values.len(),
            });
        }
        if self.auxiliary.contains_key(&name) {
            return Err(PanelError::DuplicateSeries { name });
        }
        let cleaned = values.into_iter().map(|v| if v.is_finite() { v } else { f64::NAN }).collect();
        self.auxiliary.insert(name, cleaned);
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn outcome(&self) -> &[f64] {
        &self.outcome
    }

    pub fn treatment(&self) -> &[f64] {
        &self.treatment
    }

    pub fn demand_factor(&self) -> Option<&[f64]> {
        self.demand_factor.as_deref()
    }

    pub fn schedule(&self) -> &RegimeSchedule {
        &self.schedule
    }

    pub fn auxiliary_names(&self) -> impl Iterator<Item = &str> {
        self.auxiliary.keys().map(String::as_str)
    }

    /// Look up any column by key; `None` when the series is absent.
    pub fn series(&self, key: &SeriesKey) -> Option<&[f64]> {
        match key {
            SeriesKey::Outcome => Some(&self.outcome),
            SeriesKey::Treatment => Some(&self.treatment),
            SeriesKey::DemandFactor => self.demand_factor(),
            SeriesKey::Named(name) => self.auxiliary.get(name).map(Vec::as_slice),
        }
    }

    pub fn regime_flags(&self) -> Vec<(String, Vec<f64>)> {
        self.schedule.flags(&self.dates)
    }

    pub fn calendar_controls(&self) -> CalendarControls {
        CalendarControls::from_dates(&self.dates)
    }

    /// Observations dated on or after `start`.
    pub fn since(&self, start: NaiveDate) -> PanelResult<Self> {
        let rows: Vec<usize> = (0..self.len()).filter(|&i| self.dates[i] >= start).collect();
        self.select_rows(&rows)
    }

    /// Drop every observation within `half_width_days` of any centre date.
    pub fn excluding_windows(
        &self, centres: &[NaiveDate], half_width_days: i64,
    ) -> PanelResult<Self> {
        let half = Duration::days(half_width_days);
        let rows: Vec<usize> = (0..self.len())
            .filter(|&i| {
                let d = self.dates[i];
                !centres.iter().any(|&c| d >= c - half && d <= c + half)
            })
            .collect();
        self.select_rows(&rows)
    }

    /// Clip outcome, treatment and demand factor at their `pct` and `1 − pct`
    /// empirical quantiles.
    ///
    /// Errors
    /// ------
    /// - `PanelError::InvalidWinsorPct` unless `0 < pct < 0.5`.
    pub fn winsorized(&self, pct: f64) -> PanelResult<Self> {
        if !(pct > 0.0 && pct < 0.5) {
            return Err(PanelError::InvalidWinsorPct { pct });
        }
        let mut out = self.clone();
        out.outcome = winsorize(&self.outcome, pct);
        out.treatment = winsorize(&self.treatment, pct);
        out.demand_factor = self.demand_factor.as_ref().map(|d| winsorize(d, pct));
        Ok(out)
    }

    fn select_rows(&self, rows: &[usize]) -> PanelResult<Self> {
        if rows.is_empty() {
            return Err(PanelError::EmptyPanel);
        }
        let pick = |v: &[f64]| rows.iter().map(|&i| v[i]).collect::<Vec<f64>>();
        Ok(Self {
            dates: rows.iter().map(|&i| self.dates[i]).collect(),
            outcome: pick(&self.outcome),
            treatment: pick(&self.treatment),
            demand_factor: self.demand_factor.as_deref().map(pick),
            auxiliary: self.auxiliary.iter().map(|(k, v)| (k.clone(), pick(v))).collect(),
            schedule: self.schedule.clone(),
        })
    }
}

fn check_column(name: &str, values: &[f64], n: usize) -> PanelResult<()> {
    if values.len() != n {
        return Err(PanelError::LengthMismatch {
            series: name.to_string(),
            expected: n,
            found: values.len(),
        });
    }
    if let Some((index, &value)) = values.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(PanelError::NonFiniteValue { series: name.to_string(), index, value });
    }
    Ok(())
}

/// Linear-interpolation quantile of an ascending-sorted slice.
pub(crate) fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

fn winsorize(values: &[f64], pct: f64) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let lo = quantile_sorted(&sorted, pct);
    let hi = quantile_sorted(&sorted, 1.0 - pct);
    values.iter().map(|v| v.clamp(lo, hi)).collect()
}
