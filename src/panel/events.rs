//! panel::events — the event-control collaborator seam.
//!
//! Event indicators (airdrop days, outages, upgrade shock days) come from an
//! external curated registry. The estimation core only needs a way to ask
//! for 0/1 columns aligned to a date vector, which [`EventControls`]
//! captures. Every specification must still run when no indicators are
//! supplied, so callers pass `Option<&dyn EventControls>` and an empty set
//! simply narrows the design.
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};

/// Supplier of day-indicator columns aligned to requested dates.
pub trait EventControls: Send + Sync {
    /// Return `(name, column)` pairs with one 0/1 value per entry of `dates`.
    fn indicators(&self, dates: &[NaiveDate]) -> Vec<(String, Vec<f64>)>;
}

/// In-memory event registry: event name → set of event days.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventCalendar {
    events: BTreeMap<String, BTreeSet<NaiveDate>>,
}

impl EventCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or extend) an event with the given days.
    pub fn with_event<I>(mut self, name: impl Into<String>, days: I) -> Self
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        self.events.entry(name.into()).or_default().extend(days);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.events.keys().map(String::as_str)
    }
}

impl EventControls for EventCalendar {
    fn indicators(&self, dates: &[NaiveDate]) -> Vec<(String, Vec<f64>)> {
        self.events
            .iter()
            .map(|(name, days)| {
                let column =
                    dates.iter().map(|d| if days.contains(d) { 1.0 } else { 0.0 }).collect();
                (name.clone(), column)
            })
            .collect()
    }
}

/// Materialize indicators from an optional collaborator.
pub(crate) fn materialize(
    events: Option<&dyn EventControls>, dates: &[NaiveDate],
) -> Vec<(String, Vec<f64>)> {
    events.map(|e| e.indicators(dates)).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
    }

    #[test]
    fn calendar_marks_only_listed_days() {
        let calendar = EventCalendar::new()
            .with_event("outage_day", [ymd(2023, 5, 2)])
            .with_event("airdrop_day", [ymd(2023, 5, 1), ymd(2023, 5, 3)]);
        let dates = vec![ymd(2023, 5, 1), ymd(2023, 5, 2), ymd(2023, 5, 3)];

        let columns = calendar.indicators(&dates);

        assert_eq!(columns.len(), 2);
        assert_eq!(columns[0], ("airdrop_day".to_string(), vec![1.0, 0.0, 1.0]));
        assert_eq!(columns[1], ("outage_day".to_string(), vec![0.0, 1.0, 0.0]));
    }

    #[test]
    fn absent_collaborator_yields_no_columns() {
        let dates = vec![ymd(2023, 5, 1)];
        assert!(materialize(None, &dates).is_empty());
    }
}
